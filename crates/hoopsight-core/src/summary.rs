// Aggregate views: team and position summaries, league averages, percentiles.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::player::{PlayerRecord, Position, StatLine};
use crate::similarity::compute_pool_stats;

fn mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub team: String,
    pub avg_fantasy_points: f64,
    pub total_fantasy_points: f64,
    pub player_count: usize,
    pub avg_age: f64,
    pub avg_games: f64,
}

/// One summary per team, best average fantasy output first (ties by team).
pub fn team_summaries(players: &[PlayerRecord]) -> Vec<TeamSummary> {
    let mut by_team: BTreeMap<&str, Vec<&PlayerRecord>> = BTreeMap::new();
    for p in players {
        by_team.entry(p.team.as_str()).or_default().push(p);
    }

    let mut summaries: Vec<TeamSummary> = by_team
        .into_iter()
        .map(|(team, members)| {
            let total: f64 = members.iter().map(|p| p.fantasy_points).sum();
            TeamSummary {
                team: team.to_string(),
                avg_fantasy_points: total / members.len() as f64,
                total_fantasy_points: total,
                player_count: members.len(),
                avg_age: mean(members.iter().map(|p| p.age as f64)),
                avg_games: mean(members.iter().map(|p| p.stats.games as f64)),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.avg_fantasy_points
            .total_cmp(&a.avg_fantasy_points)
            .then_with(|| a.team.cmp(&b.team))
    });
    summaries
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSummary {
    pub position: Position,
    pub avg_fantasy_points: f64,
    pub avg_points: f64,
    pub avg_rebounds: f64,
    pub avg_assists: f64,
    pub player_count: usize,
}

/// One summary per position present, in position order.
pub fn position_summaries(players: &[PlayerRecord]) -> Vec<PositionSummary> {
    let mut by_position: BTreeMap<Position, Vec<&PlayerRecord>> = BTreeMap::new();
    for p in players {
        by_position.entry(p.position).or_default().push(p);
    }

    by_position
        .into_iter()
        .map(|(position, members)| PositionSummary {
            position,
            avg_fantasy_points: mean(members.iter().map(|p| p.fantasy_points)),
            avg_points: mean(members.iter().map(|p| p.stats.pts)),
            avg_rebounds: mean(members.iter().map(|p| p.stats.trb)),
            avg_assists: mean(members.iter().map(|p| p.stats.ast)),
            player_count: members.len(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// League
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeagueAverages {
    pub player_count: usize,
    pub fantasy_points: f64,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub fg_pct: f64,
    pub three_pct: f64,
    pub ft_pct: f64,
}

impl LeagueAverages {
    /// Named averages a player can be rated against.
    pub fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("fantasy_points", self.fantasy_points),
            ("points", self.points),
            ("rebounds", self.rebounds),
            ("assists", self.assists),
            ("steals", self.steals),
            ("blocks", self.blocks),
            ("fg_pct", self.fg_pct),
            ("three_pct", self.three_pct),
            ("ft_pct", self.ft_pct),
        ]
    }
}

/// League-wide means. Percentage means skip players with no listed value.
pub fn league_averages(players: &[PlayerRecord]) -> LeagueAverages {
    LeagueAverages {
        player_count: players.len(),
        fantasy_points: mean(players.iter().map(|p| p.fantasy_points)),
        points: mean(players.iter().map(|p| p.stats.pts)),
        rebounds: mean(players.iter().map(|p| p.stats.trb)),
        assists: mean(players.iter().map(|p| p.stats.ast)),
        steals: mean(players.iter().map(|p| p.stats.stl)),
        blocks: mean(players.iter().map(|p| p.stats.blk)),
        fg_pct: mean(players.iter().filter_map(|p| p.stats.fg_pct)),
        three_pct: mean(players.iter().filter_map(|p| p.stats.three_pct)),
        ft_pct: mean(players.iter().filter_map(|p| p.stats.ft_pct)),
    }
}

/// Percentage of `values` strictly below `value`. Zero for an empty slice.
pub fn percentile_rank(value: f64, values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let below = values.iter().filter(|&&v| v < value).count();
    below as f64 / values.len() as f64 * 100.0
}

// ---------------------------------------------------------------------------
// Player ratings
// ---------------------------------------------------------------------------

/// One stat of a player set against the league average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRating {
    pub stat: &'static str,
    pub value: f64,
    pub league_avg: f64,
    pub percentile: f64,
}

/// The player's values in `LeagueAverages::fields` order.
fn rated_values(p: &PlayerRecord) -> [f64; 9] {
    [
        p.fantasy_points,
        p.stats.pts,
        p.stats.trb,
        p.stats.ast,
        p.stats.stl,
        p.stats.blk,
        p.stats.fg_pct_or_zero(),
        p.stats.three_pct_or_zero(),
        p.stats.ft_pct_or_zero(),
    ]
}

/// Rate a player against league averages, one entry per averaged stat.
/// The percentile is 100 when the player is above the average, else 0.
pub fn player_rating(p: &PlayerRecord, averages: &LeagueAverages) -> Vec<StatRating> {
    averages
        .fields()
        .into_iter()
        .zip(rated_values(p))
        .map(|((stat, league_avg), value)| StatRating {
            stat,
            value,
            league_avg,
            percentile: percentile_rank(value, &[league_avg]),
        })
        .collect()
}

/// Shooting consistency: one minus the spread (population standard
/// deviation) of FG%, 3P% and FT%, floored at zero. Blanks count as zero.
pub fn consistency_score(stats: &StatLine) -> f64 {
    let pcts = [
        stats.fg_pct_or_zero(),
        stats.three_pct_or_zero(),
        stats.ft_pct_or_zero(),
    ];
    (1.0 - compute_pool_stats(&pcts).stdev).max(0.0)
}
