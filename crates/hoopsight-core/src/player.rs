// Player record types: raw stat lines as read from the dataset and the
// augmented records the rest of the crate works with.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::metrics::AdvancedMetrics;
use crate::tags::{PlayerType, Tag};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Listed basketball position.
///
/// Datasets list dual positions as `PG-SG`; only the first listed position
/// is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
    Guard,
    Forward,
    Unknown,
}

impl Position {
    /// The five concrete positions, in display order.
    pub const PRIMARY: [Position; 5] = [
        Position::PointGuard,
        Position::ShootingGuard,
        Position::SmallForward,
        Position::PowerForward,
        Position::Center,
    ];

    /// Parse a dataset position string. Never fails: anything unrecognised
    /// becomes `Unknown`.
    pub fn from_str_pos(s: &str) -> Self {
        let first = s.split(['-', '/']).next().unwrap_or("").trim();
        match first.to_uppercase().as_str() {
            "PG" => Position::PointGuard,
            "SG" => Position::ShootingGuard,
            "SF" => Position::SmallForward,
            "PF" => Position::PowerForward,
            "C" => Position::Center,
            "G" => Position::Guard,
            "F" => Position::Forward,
            _ => Position::Unknown,
        }
    }

    /// Short abbreviation as it appears in the dataset.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::PointGuard => "PG",
            Position::ShootingGuard => "SG",
            Position::SmallForward => "SF",
            Position::PowerForward => "PF",
            Position::Center => "C",
            Position::Guard => "G",
            Position::Forward => "F",
            Position::Unknown => "?",
        }
    }

    /// Plural long-form name used in rendered answers.
    pub fn plural_name(&self) -> &'static str {
        match self {
            Position::PointGuard => "Point Guards",
            Position::ShootingGuard => "Shooting Guards",
            Position::SmallForward => "Small Forwards",
            Position::PowerForward => "Power Forwards",
            Position::Center => "Centers",
            Position::Guard => "Guards",
            Position::Forward => "Forwards",
            Position::Unknown => "Unlisted Players",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Stat line
// ---------------------------------------------------------------------------

/// Per-game box score and shooting numbers for one player row.
///
/// Counting stats that were missing from the source are stored as zero.
/// Percentages stay `None` when the source left them blank (e.g. a player
/// with no three-point attempts), and formulas treat `None` as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub games: u32,
    pub games_started: u32,
    pub minutes: f64,
    pub fg: f64,
    pub fga: f64,
    pub fg_pct: Option<f64>,
    pub three_p: f64,
    pub three_pa: f64,
    pub three_pct: Option<f64>,
    pub ft: f64,
    pub fta: f64,
    pub ft_pct: Option<f64>,
    pub efg_pct: Option<f64>,
    pub orb: f64,
    pub drb: f64,
    pub trb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub tov: f64,
    pub pf: f64,
    pub pts: f64,
    /// Efficiency rating supplied by the dataset, if any.
    pub per: Option<f64>,
    /// Usage rate supplied by the dataset, if any.
    pub usage: Option<f64>,
}

impl StatLine {
    pub fn fg_pct_or_zero(&self) -> f64 {
        self.fg_pct.unwrap_or(0.0)
    }

    pub fn three_pct_or_zero(&self) -> f64 {
        self.three_pct.unwrap_or(0.0)
    }

    pub fn ft_pct_or_zero(&self) -> f64 {
        self.ft_pct.unwrap_or(0.0)
    }

    /// Steals plus blocks.
    pub fn stocks(&self) -> f64 {
        self.stl + self.blk
    }
}

// ---------------------------------------------------------------------------
// Rows and records
// ---------------------------------------------------------------------------

/// A single dataset row before deduplication and derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub name: String,
    pub team: String,
    pub position: Position,
    pub age: u32,
    pub stats: StatLine,
}

/// One unique player with every derived field filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub team: String,
    pub position: Position,
    pub age: u32,
    pub stats: StatLine,
    pub fantasy_points: f64,
    pub weighted_score: f64,
    pub efficiency_rating: f64,
    pub usage_rate: f64,
    pub advanced: AdvancedMetrics,
    pub tags: Vec<Tag>,
    pub player_type: PlayerType,
}

impl PlayerRecord {
    /// Strip the derived fields back off, e.g. to rescore under new weights.
    pub fn to_row(&self) -> PlayerRow {
        PlayerRow {
            name: self.name.clone(),
            team: self.team.clone(),
            position: self.position,
            age: self.age,
            stats: self.stats.clone(),
        }
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// Comma-separated tag labels, empty when the player has no tags.
    pub fn tag_labels(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_positions() {
        assert_eq!(Position::from_str_pos("PG"), Position::PointGuard);
        assert_eq!(Position::from_str_pos("sg"), Position::ShootingGuard);
        assert_eq!(Position::from_str_pos("SF"), Position::SmallForward);
        assert_eq!(Position::from_str_pos("PF"), Position::PowerForward);
        assert_eq!(Position::from_str_pos("C"), Position::Center);
        assert_eq!(Position::from_str_pos("G"), Position::Guard);
        assert_eq!(Position::from_str_pos("F"), Position::Forward);
    }

    #[test]
    fn dual_position_takes_first() {
        assert_eq!(Position::from_str_pos("PG-SG"), Position::PointGuard);
        assert_eq!(Position::from_str_pos("C-PF"), Position::Center);
        assert_eq!(Position::from_str_pos(" SF/PF "), Position::SmallForward);
    }

    #[test]
    fn unrecognised_position_is_unknown() {
        assert_eq!(Position::from_str_pos(""), Position::Unknown);
        assert_eq!(Position::from_str_pos("QB"), Position::Unknown);
    }

    #[test]
    fn display_matches_abbreviation() {
        for pos in Position::PRIMARY {
            assert_eq!(Position::from_str_pos(pos.display_str()), pos);
        }
        assert_eq!(Position::Center.to_string(), "C");
    }

    #[test]
    fn missing_percentages_read_as_zero() {
        let stats = StatLine::default();
        assert_eq!(stats.fg_pct_or_zero(), 0.0);
        assert_eq!(stats.three_pct_or_zero(), 0.0);
        assert_eq!(stats.ft_pct_or_zero(), 0.0);
    }
}
