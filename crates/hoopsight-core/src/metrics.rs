// Derived metrics: fantasy points, weighted composite score and the
// advanced shooting / ball-handling ratios.
//
// Every function here is a pure function of a single stat line. Missing
// inputs are zero, and ratios with a zero denominator evaluate to zero, so
// nothing in this module can produce NaN or panic.

use serde::{Deserialize, Serialize};

use crate::player::{PlayerRecord, PlayerRow, StatLine};
use crate::tags::{assign_tags, classify_player_type};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Per-category multipliers for fantasy points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub turnovers: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            points: 1.0,
            rebounds: 1.25,
            assists: 1.5,
            steals: 2.0,
            blocks: 2.0,
            turnovers: -1.0,
        }
    }
}

impl ScoringWeights {
    /// Fantasy points for one stat line.
    pub fn fantasy_points(&self, stats: &StatLine) -> f64 {
        stats.pts * self.points
            + stats.trb * self.rebounds
            + stats.ast * self.assists
            + stats.stl * self.steals
            + stats.blk * self.blocks
            + stats.tov * self.turnovers
    }

    /// Named weights, for validation and display.
    pub fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("points", self.points),
            ("rebounds", self.rebounds),
            ("assists", self.assists),
            ("steals", self.steals),
            ("blocks", self.blocks),
            ("turnovers", self.turnovers),
        ]
    }
}

/// Blend of the inputs to the weighted composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub fantasy_points: f64,
    pub efficiency: f64,
    pub usage: f64,
    pub shooting: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        BlendWeights {
            fantasy_points: 0.4,
            efficiency: 0.3,
            usage: 0.2,
            shooting: 0.1,
        }
    }
}

impl BlendWeights {
    pub fn weighted_score(
        &self,
        fantasy_points: f64,
        efficiency_rating: f64,
        usage_rate: f64,
        shooting_pct: f64,
    ) -> f64 {
        fantasy_points * self.fantasy_points
            + efficiency_rating * self.efficiency
            + usage_rate * self.usage
            + shooting_pct * self.shooting
    }

    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("fantasy_points", self.fantasy_points),
            ("efficiency", self.efficiency),
            ("usage", self.usage),
            ("shooting", self.shooting),
        ]
    }
}

// ---------------------------------------------------------------------------
// Single-value metrics
// ---------------------------------------------------------------------------

/// `n / d`, or zero when the denominator is not positive.
fn ratio(n: f64, d: f64) -> f64 {
    if d > 0.0 {
        n / d
    } else {
        0.0
    }
}

/// Efficiency rating: the dataset's own value when present, otherwise the
/// simple box-score sum `PTS + TRB + AST + STL + BLK - TOV`.
pub fn efficiency_rating(stats: &StatLine) -> f64 {
    stats
        .per
        .unwrap_or(stats.pts + stats.trb + stats.ast + stats.stl + stats.blk - stats.tov)
}

/// Usage rate: the dataset's own value when present, otherwise
/// `(FGA + 0.44 * FTA + AST) / MP * 100`.
pub fn usage_rate(stats: &StatLine) -> f64 {
    match stats.usage {
        Some(usage) => usage,
        None => ratio(stats.fga + stats.fta * 0.44 + stats.ast, stats.minutes) * 100.0,
    }
}

/// Mean of FG%, 3P% and FT%, with blanks counted as zero.
pub fn shooting_average(stats: &StatLine) -> f64 {
    (stats.fg_pct_or_zero() + stats.three_pct_or_zero() + stats.ft_pct_or_zero()) / 3.0
}

// ---------------------------------------------------------------------------
// Advanced metrics
// ---------------------------------------------------------------------------

/// Shooting and ball-handling ratios shown alongside the headline scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedMetrics {
    /// True shooting: `PTS / (2 * (FGA + 0.475 * FTA))`.
    pub ts_pct: f64,
    /// Free throw rate: `FT / FGA`.
    pub ftr: f64,
    /// Assists per turnover; turnover-free players divide by 0.1.
    pub ast_tov_ratio: f64,
    /// Hollinger assist ratio: `AST / (FGA + 0.475 * FTA + AST + TOV)`.
    pub hast_pct: f64,
    /// Turnover percentage over the same possessions estimate.
    pub tov_pct: f64,
}

pub fn advanced_metrics(stats: &StatLine) -> AdvancedMetrics {
    let possessions = stats.fga + 0.475 * stats.fta + stats.ast + stats.tov;
    let ast_tov_ratio = if stats.tov > 0.0 {
        stats.ast / stats.tov
    } else {
        stats.ast / 0.1
    };
    AdvancedMetrics {
        ts_pct: ratio(stats.pts, 2.0 * (stats.fga + 0.475 * stats.fta)),
        ftr: ratio(stats.ft, stats.fga),
        ast_tov_ratio,
        hast_pct: ratio(stats.ast, possessions),
        tov_pct: ratio(stats.tov, possessions),
    }
}

// ---------------------------------------------------------------------------
// Record derivation
// ---------------------------------------------------------------------------

/// Compute every derived field for a deduplicated row.
pub fn derive_record(row: PlayerRow, scoring: &ScoringWeights, blend: &BlendWeights) -> PlayerRecord {
    let stats = row.stats;
    let fantasy_points = scoring.fantasy_points(&stats);
    let efficiency = efficiency_rating(&stats);
    let usage = usage_rate(&stats);
    let weighted_score =
        blend.weighted_score(fantasy_points, efficiency, usage, shooting_average(&stats));

    PlayerRecord {
        advanced: advanced_metrics(&stats),
        tags: assign_tags(&stats),
        player_type: classify_player_type(&stats),
        name: row.name,
        team: row.team,
        position: row.position,
        age: row.age,
        fantasy_points,
        weighted_score,
        efficiency_rating: efficiency,
        usage_rate: usage,
        stats,
    }
}
