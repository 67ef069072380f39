// Dataset loading.
//
// Reads a Basketball-Reference style per-game CSV export. Column names follow
// that site's headers (`Player`, `Team`, `Pos`, `FG%`, `3P%`, ...); extra
// columns such as `Rk` or `Awards` are ignored. Blank or unparsable cells are
// treated as missing, never as errors.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::player::{PlayerRow, Position, StatLine};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("dataset produced zero player rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Required columns
// ---------------------------------------------------------------------------

/// Columns every dataset must carry. Each entry lists accepted spellings;
/// the first one is reported when the column is missing.
const REQUIRED_COLUMNS: &[&[&str]] = &[
    &["Player"],
    &["Team", "Tm"],
    &["Pos"],
    &["Age"],
    &["G"],
    &["PTS"],
    &["TRB"],
    &["AST"],
    &["STL"],
    &["BLK"],
    &["TOV"],
];

/// Name Basketball-Reference gives the aggregate row at the bottom of a table.
const LEAGUE_AVERAGE_ROW: &str = "League Average";

fn missing_columns(headers: &csv::StringRecord) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|spellings| {
            !spellings
                .iter()
                .any(|name| headers.iter().any(|h| h.trim() == *name))
        })
        .map(|spellings| spellings[0].to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// One CSV row as it appears on disk. Every numeric field is optional and
/// `csv::invalid_option` turns unparsable cells into `None`.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawStatRow {
    #[serde(default)]
    Player: String,
    #[serde(default, alias = "Tm")]
    Team: String,
    #[serde(default)]
    Pos: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Age: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    G: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    GS: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    MP: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    FG: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    FGA: Option<f64>,
    #[serde(rename = "FG%", default, deserialize_with = "csv::invalid_option")]
    FG_PCT: Option<f64>,
    #[serde(rename = "3P", default, deserialize_with = "csv::invalid_option")]
    THREE_P: Option<f64>,
    #[serde(rename = "3PA", default, deserialize_with = "csv::invalid_option")]
    THREE_PA: Option<f64>,
    #[serde(rename = "3P%", default, deserialize_with = "csv::invalid_option")]
    THREE_PCT: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    FT: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    FTA: Option<f64>,
    #[serde(rename = "FT%", default, deserialize_with = "csv::invalid_option")]
    FT_PCT: Option<f64>,
    #[serde(rename = "eFG%", default, deserialize_with = "csv::invalid_option")]
    EFG_PCT: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    ORB: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    DRB: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    TRB: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    AST: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    STL: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    BLK: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    TOV: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    PF: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    PTS: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    PER: Option<f64>,
    #[serde(rename = "USG%", default, deserialize_with = "csv::invalid_option")]
    USG_PCT: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drop NaN and infinities so downstream formulas stay finite.
fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

fn stat(v: Option<f64>) -> f64 {
    finite(v).unwrap_or(0.0)
}

fn count(v: Option<f64>) -> u32 {
    finite(v).map(|x| x.max(0.0).round() as u32).unwrap_or(0)
}

impl RawStatRow {
    fn into_row(self) -> PlayerRow {
        PlayerRow {
            name: self.Player.trim().to_string(),
            team: self.Team.trim().to_string(),
            position: Position::from_str_pos(&self.Pos),
            age: count(self.Age),
            stats: StatLine {
                games: count(self.G),
                games_started: count(self.GS),
                minutes: stat(self.MP),
                fg: stat(self.FG),
                fga: stat(self.FGA),
                fg_pct: finite(self.FG_PCT),
                three_p: stat(self.THREE_P),
                three_pa: stat(self.THREE_PA),
                three_pct: finite(self.THREE_PCT),
                ft: stat(self.FT),
                fta: stat(self.FTA),
                ft_pct: finite(self.FT_PCT),
                efg_pct: finite(self.EFG_PCT),
                orb: stat(self.ORB),
                drb: stat(self.DRB),
                trb: stat(self.TRB),
                ast: stat(self.AST),
                stl: stat(self.STL),
                blk: stat(self.BLK),
                tov: stat(self.TOV),
                pf: stat(self.PF),
                pts: stat(self.PTS),
                per: finite(self.PER),
                usage: finite(self.USG_PCT),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse dataset rows from any reader. Rows keep their file order and are not
/// deduplicated.
pub fn load_rows_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRow>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    let headers = reader.headers()?.clone();
    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(DatasetError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<RawStatRow>().enumerate() {
        match result {
            Ok(raw) => {
                let row = raw.into_row();
                if row.name.is_empty() {
                    warn!("skipping dataset row {}: empty player name", line + 2);
                    continue;
                }
                if row.name == LEAGUE_AVERAGE_ROW {
                    warn!("skipping dataset row {}: league average row", line + 2);
                    continue;
                }
                rows.push(row);
            }
            Err(e) => {
                warn!("skipping malformed dataset row {}: {}", line + 2, e);
            }
        }
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(rows)
}

/// Load dataset rows from a CSV file. The file is closed before this returns.
pub fn load_rows(path: &Path) -> Result<Vec<PlayerRow>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_rows_from_reader(file)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
