// Collapse traded players down to one row each.
//
// Per-game exports list a traded player once per team plus a combined row
// (`2TM`, `3TM`, or `TOT` in older exports). The combined row wins. When a
// multi-team player has no combined row, the configured fallback decides.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::player::{PlayerRow, StatLine};

/// What to do with a multi-team player who has no combined-team row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupFallback {
    /// Merge the team rows: games summed, per-game stats weighted by games,
    /// percentages recomputed from the merged makes and attempts.
    #[default]
    Merge,
    /// Keep the team row with the most points per game.
    HighestPoints,
}

/// Whether a team code marks a combined multi-team row.
pub fn is_combined_team(team: &str) -> bool {
    let team = team.trim();
    if team.eq_ignore_ascii_case("TOT") {
        return true;
    }
    match team.strip_suffix("TM") {
        Some(n) => !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Reduce the rows to exactly one per player name, keeping the order in which
/// each name first appears.
pub fn deduplicate(rows: &[PlayerRow], fallback: DedupFallback) -> Vec<PlayerRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&PlayerRow>> = HashMap::new();
    for row in rows {
        let group = groups.entry(row.name.as_str()).or_default();
        if group.is_empty() {
            order.push(row.name.as_str());
        }
        group.push(row);
    }

    let mut out = Vec::with_capacity(order.len());
    for name in order {
        let Some(group) = groups.get(name) else {
            continue;
        };
        if group.len() == 1 {
            out.push(group[0].clone());
            continue;
        }
        if let Some(combined) = group.iter().find(|r| is_combined_team(&r.team)) {
            debug!("{}: keeping combined {} row", name, combined.team);
            out.push((*combined).clone());
            continue;
        }
        debug!("{}: {} team rows without a combined row, using {:?}", name, group.len(), fallback);
        out.push(match fallback {
            DedupFallback::Merge => merge_rows(group),
            DedupFallback::HighestPoints => highest_points(group),
        });
    }
    out
}

fn highest_points(group: &[&PlayerRow]) -> PlayerRow {
    let mut best = group[0];
    for &row in &group[1..] {
        if row.stats.pts > best.stats.pts {
            best = row;
        }
    }
    best.clone()
}

/// Games-weighted merge of a player's team rows.
fn merge_rows(group: &[&PlayerRow]) -> PlayerRow {
    let total_games: u32 = group.iter().map(|r| r.stats.games).sum();
    // Without any games on record every row counts equally.
    let weight = |r: &PlayerRow| {
        if total_games > 0 {
            r.stats.games as f64
        } else {
            1.0
        }
    };
    let weight_sum: f64 = group.iter().map(|&r| weight(r)).sum();

    let avg = |f: fn(&StatLine) -> f64| -> f64 {
        group.iter().map(|&r| weight(r) * f(&r.stats)).sum::<f64>() / weight_sum
    };
    let avg_opt = |f: fn(&StatLine) -> Option<f64>| -> Option<f64> {
        let present: Vec<(f64, f64)> = group
            .iter()
            .filter_map(|&r| f(&r.stats).map(|v| (weight(r), v)))
            .collect();
        let w: f64 = present.iter().map(|(w, _)| w).sum();
        if present.is_empty() || w <= 0.0 {
            return None;
        }
        Some(present.iter().map(|(w, v)| w * v).sum::<f64>() / w)
    };

    let fg = avg(|s| s.fg);
    let fga = avg(|s| s.fga);
    let three_p = avg(|s| s.three_p);
    let three_pa = avg(|s| s.three_pa);
    let ft = avg(|s| s.ft);
    let fta = avg(|s| s.fta);

    // Prefer makes over attempts; fall back to averaging the listed percentages.
    let pct = |made: f64, att: f64, listed: Option<f64>| -> Option<f64> {
        if att > 0.0 {
            Some(made / att)
        } else {
            listed
        }
    };
    let efg = if fga > 0.0 {
        Some((fg + 0.5 * three_p) / fga)
    } else {
        avg_opt(|s| s.efg_pct)
    };

    let first = group[0];
    let teams = group.iter().map(|r| r.team.as_str()).collect::<HashSet<_>>().len();

    PlayerRow {
        name: first.name.clone(),
        team: format!("{}TM", teams),
        position: first.position,
        age: group.iter().map(|r| r.age).max().unwrap_or(first.age),
        stats: StatLine {
            games: total_games,
            games_started: group.iter().map(|r| r.stats.games_started).sum(),
            minutes: avg(|s| s.minutes),
            fg,
            fga,
            fg_pct: pct(fg, fga, avg_opt(|s| s.fg_pct)),
            three_p,
            three_pa,
            three_pct: pct(three_p, three_pa, avg_opt(|s| s.three_pct)),
            ft,
            fta,
            ft_pct: pct(ft, fta, avg_opt(|s| s.ft_pct)),
            efg_pct: efg,
            orb: avg(|s| s.orb),
            drb: avg(|s| s.drb),
            trb: avg(|s| s.trb),
            ast: avg(|s| s.ast),
            stl: avg(|s| s.stl),
            blk: avg(|s| s.blk),
            tov: avg(|s| s.tov),
            pf: avg(|s| s.pf),
            pts: avg(|s| s.pts),
            per: avg_opt(|s| s.per),
            usage: avg_opt(|s| s.usage),
        },
    }
}
