// Ranking: top-N by fantasy points and by individual stat categories.
//
// All rankings borrow their input and return references in a new order;
// sorts are stable so fully tied players keep their input order.

use std::cmp::Ordering;

use crate::player::{PlayerRecord, Position};

/// Default length of a top-N list.
pub const DEFAULT_TOP_N: usize = 20;

/// Fantasy ordering: fantasy points descending, then weighted score descending.
pub fn compare_fantasy(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.fantasy_points
        .total_cmp(&a.fantasy_points)
        .then_with(|| b.weighted_score.total_cmp(&a.weighted_score))
}

/// The top `n` players by fantasy points. Returns every player when there
/// are fewer than `n`.
pub fn top_n<'a, I>(players: I, n: usize) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut ranked: Vec<&PlayerRecord> = players.into_iter().collect();
    ranked.sort_by(|a, b| compare_fantasy(a, b));
    ranked.truncate(n);
    ranked
}

/// A player with a 1-based rank.
#[derive(Debug, Clone, Copy)]
pub struct RankedPlayer<'a> {
    pub rank: usize,
    pub player: &'a PlayerRecord,
}

fn with_ranks(players: Vec<&PlayerRecord>) -> Vec<RankedPlayer<'_>> {
    players
        .into_iter()
        .enumerate()
        .map(|(i, player)| RankedPlayer { rank: i + 1, player })
        .collect()
}

/// Full fantasy ranking of every player with at least `min_games` games.
pub fn fantasy_ranking<'a, I>(players: I, min_games: u32) -> Vec<RankedPlayer<'a>>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let eligible = players.into_iter().filter(|p| p.stats.games >= min_games);
    with_ranks(top_n(eligible, usize::MAX))
}

/// Fantasy ranking restricted to one listed position.
pub fn position_ranking<'a, I>(players: I, position: Position) -> Vec<RankedPlayer<'a>>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let at_position = players.into_iter().filter(|p| p.position == position);
    with_ranks(top_n(at_position, usize::MAX))
}

// ---------------------------------------------------------------------------
// Stat categories
// ---------------------------------------------------------------------------

/// A single column players can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    FantasyPoints,
    WeightedScore,
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Threes,
    FieldGoalPct,
    Efficiency,
}

impl StatCategory {
    pub fn value(&self, p: &PlayerRecord) -> f64 {
        match self {
            StatCategory::FantasyPoints => p.fantasy_points,
            StatCategory::WeightedScore => p.weighted_score,
            StatCategory::Points => p.stats.pts,
            StatCategory::Rebounds => p.stats.trb,
            StatCategory::Assists => p.stats.ast,
            StatCategory::Steals => p.stats.stl,
            StatCategory::Blocks => p.stats.blk,
            StatCategory::Threes => p.stats.three_p,
            StatCategory::FieldGoalPct => p.stats.fg_pct_or_zero(),
            StatCategory::Efficiency => p.efficiency_rating,
        }
    }

    /// Heading used for leader lists, e.g. "Scorers".
    pub fn leaders_label(&self) -> &'static str {
        match self {
            StatCategory::FantasyPoints => "Fantasy Players",
            StatCategory::WeightedScore => "Weighted Scores",
            StatCategory::Points => "Scorers",
            StatCategory::Rebounds => "Rebounders",
            StatCategory::Assists => "Assist Leaders",
            StatCategory::Steals => "Steal Leaders",
            StatCategory::Blocks => "Shot Blockers",
            StatCategory::Threes => "Three-Point Shooters",
            StatCategory::FieldGoalPct => "Field Goal Percentages",
            StatCategory::Efficiency => "Efficiency Ratings",
        }
    }

    /// Unit suffix shown after the value.
    pub fn unit(&self) -> &'static str {
        match self {
            StatCategory::FantasyPoints => "FP",
            StatCategory::WeightedScore => "WS",
            StatCategory::Points => "PPG",
            StatCategory::Rebounds => "RPG",
            StatCategory::Assists => "APG",
            StatCategory::Steals => "SPG",
            StatCategory::Blocks => "BPG",
            StatCategory::Threes => "3PM",
            StatCategory::FieldGoalPct => "FG%",
            StatCategory::Efficiency => "EFF",
        }
    }

    /// Render a value in this category's usual precision.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            StatCategory::FieldGoalPct => format!("{:.1}%", value * 100.0),
            _ => format!("{value:.1}"),
        }
    }
}

/// The top `n` players in one category; fantasy ordering breaks ties.
pub fn top_by<'a, I>(players: I, category: StatCategory, n: usize) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut ranked: Vec<&PlayerRecord> = players.into_iter().collect();
    ranked.sort_by(|a, b| {
        category
            .value(b)
            .total_cmp(&category.value(a))
            .then_with(|| compare_fantasy(a, b))
    });
    ranked.truncate(n);
    ranked
}

/// The bottom `n` players in one category, lowest first. Ties keep input
/// order.
pub fn bottom_by<'a, I>(players: I, category: StatCategory, n: usize) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut ranked: Vec<&PlayerRecord> = players.into_iter().collect();
    ranked.sort_by(|a, b| category.value(a).total_cmp(&category.value(b)));
    ranked.truncate(n);
    ranked
}
