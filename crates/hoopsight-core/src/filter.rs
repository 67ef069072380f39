// Filtered views over the player table.
//
// Filters never touch the canonical table: `apply` returns references to the
// matching records in their original order.

use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::player::{PlayerRecord, Position};

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("invalid range for `{field}`: {message}")]
    InvalidRange { field: String, message: String },
}

/// Criteria for narrowing the player table. The default filter keeps
/// everyone.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFilter {
    pub position: Option<Position>,
    pub team: Option<String>,
    pub age_range: (u32, u32),
    pub min_games: u32,
    pub ppg_range: (f64, f64),
}

impl Default for PlayerFilter {
    fn default() -> Self {
        PlayerFilter {
            position: None,
            team: None,
            age_range: (0, u32::MAX),
            min_games: 0,
            ppg_range: (0.0, f64::MAX),
        }
    }
}

impl PlayerFilter {
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn ages(mut self, min: u32, max: u32) -> Self {
        self.age_range = (min, max);
        self
    }

    pub fn min_games(mut self, games: u32) -> Self {
        self.min_games = games;
        self
    }

    pub fn points(mut self, min: f64, max: f64) -> Self {
        self.ppg_range = (min, max);
        self
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        let (age_lo, age_hi) = self.age_range;
        if age_lo > age_hi {
            return Err(FilterError::InvalidRange {
                field: "age_range".into(),
                message: format!("minimum {age_lo} is above maximum {age_hi}"),
            });
        }

        let (ppg_lo, ppg_hi) = self.ppg_range;
        if ppg_lo.is_nan() || ppg_hi.is_nan() {
            return Err(FilterError::InvalidRange {
                field: "ppg_range".into(),
                message: "bounds must be numbers".into(),
            });
        }
        if ppg_lo < 0.0 || ppg_hi < 0.0 {
            return Err(FilterError::InvalidRange {
                field: "ppg_range".into(),
                message: format!("bounds must be non-negative, got ({ppg_lo}, {ppg_hi})"),
            });
        }
        if ppg_lo > ppg_hi {
            return Err(FilterError::InvalidRange {
                field: "ppg_range".into(),
                message: format!("minimum {ppg_lo} is above maximum {ppg_hi}"),
            });
        }
        Ok(())
    }

    pub fn matches(&self, p: &PlayerRecord) -> bool {
        if let Some(position) = self.position {
            if p.position != position {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if !p.team.eq_ignore_ascii_case(team) {
                return false;
            }
        }
        let (age_lo, age_hi) = self.age_range;
        let (ppg_lo, ppg_hi) = self.ppg_range;
        (age_lo..=age_hi).contains(&p.age)
            && p.stats.games >= self.min_games
            && p.stats.pts >= ppg_lo
            && p.stats.pts <= ppg_hi
    }

    /// Validate, then return the matching players in input order.
    pub fn apply<'a>(&self, players: &'a [PlayerRecord]) -> Result<Vec<&'a PlayerRecord>, FilterError> {
        self.validate()?;
        Ok(players.iter().filter(|p| self.matches(p)).collect())
    }
}

/// Values available for each filter, for populating selection widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub positions: Vec<Position>,
    pub teams: Vec<String>,
    pub age_range: (u32, u32),
    pub games_range: (u32, u32),
    pub ppg_range: (f64, f64),
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            positions: Vec::new(),
            teams: Vec::new(),
            age_range: (19, 40),
            games_range: (1, 82),
            ppg_range: (0.0, 50.0),
        }
    }
}

impl FilterOptions {
    /// Derive filter choices from a player set; defaults when it is empty.
    pub fn from_players(players: &[PlayerRecord]) -> Self {
        if players.is_empty() {
            return FilterOptions::default();
        }
        let positions: BTreeSet<Position> = players.iter().map(|p| p.position).collect();
        let teams: BTreeSet<&str> = players.iter().map(|p| p.team.as_str()).collect();
        let min_age = players.iter().map(|p| p.age).min().unwrap_or(0);
        let max_age = players.iter().map(|p| p.age).max().unwrap_or(0);
        let max_games = players.iter().map(|p| p.stats.games).max().unwrap_or(0);
        let max_pts = players.iter().map(|p| p.stats.pts).fold(0.0, f64::max);

        FilterOptions {
            positions: positions.into_iter().collect(),
            teams: teams.into_iter().map(String::from).collect(),
            age_range: (min_age, max_age),
            games_range: (1, max_games.max(1)),
            ppg_range: (0.0, max_pts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{derive_record, BlendWeights, ScoringWeights};
    use crate::player::{PlayerRow, StatLine};

    fn player(name: &str, team: &str, position: Position, age: u32, games: u32, pts: f64) -> PlayerRecord {
        derive_record(
            PlayerRow {
                name: name.into(),
                team: team.into(),
                position,
                age,
                stats: StatLine {
                    games,
                    pts,
                    ..StatLine::default()
                },
            },
            &ScoringWeights::default(),
            &BlendWeights::default(),
        )
    }

    fn pool() -> Vec<PlayerRecord> {
        vec![
            player("Vet", "LAL", Position::SmallForward, 39, 71, 25.7),
            player("Kid", "SAS", Position::Center, 20, 71, 21.4),
            player("Bench", "LAL", Position::PointGuard, 27, 15, 4.0),
            player("Starter", "BOS", Position::PointGuard, 26, 75, 18.0),
        ]
    }

    fn names(view: &[&PlayerRecord]) -> Vec<String> {
        view.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn default_filter_keeps_everyone() {
        let players = pool();
        assert_eq!(PlayerFilter::default().apply(&players).unwrap().len(), 4);
    }

    #[test]
    fn filters_combine() {
        let players = pool();
        let view = PlayerFilter::default()
            .position(Position::PointGuard)
            .min_games(20)
            .apply(&players)
            .unwrap();
        assert_eq!(names(&view), vec!["Starter"]);

        let view = PlayerFilter::default().team("lal").apply(&players).unwrap();
        assert_eq!(names(&view), vec!["Vet", "Bench"]);

        let view = PlayerFilter::default().ages(19, 30).points(10.0, 50.0).apply(&players).unwrap();
        assert_eq!(names(&view), vec!["Kid", "Starter"]);
    }

    #[test]
    fn view_does_not_mutate_table() {
        let players = pool();
        let snapshot = players.clone();
        let _ = PlayerFilter::default().min_games(70).apply(&players).unwrap();
        assert_eq!(players, snapshot);
    }

    #[test]
    fn inverted_ranges_rejected() {
        let players = pool();
        let err = PlayerFilter::default().ages(30, 20).apply(&players).unwrap_err();
        assert!(matches!(err, FilterError::InvalidRange { ref field, .. } if field == "age_range"));

        let err = PlayerFilter::default().points(30.0, 10.0).validate().unwrap_err();
        assert!(matches!(err, FilterError::InvalidRange { ref field, .. } if field == "ppg_range"));
    }

    #[test]
    fn negative_points_rejected() {
        assert!(PlayerFilter::default().points(-1.0, 10.0).validate().is_err());
        assert!(PlayerFilter::default().points(f64::NAN, 10.0).validate().is_err());
    }

    #[test]
    fn filter_options_from_players() {
        let options = FilterOptions::from_players(&pool());
        assert_eq!(
            options.positions,
            vec![Position::PointGuard, Position::SmallForward, Position::Center]
        );
        assert_eq!(options.teams, vec!["BOS", "LAL", "SAS"]);
        assert_eq!(options.age_range, (20, 39));
        assert_eq!(options.games_range, (1, 75));
        assert!((options.ppg_range.1 - 25.7).abs() < f64::EPSILON);
    }

    #[test]
    fn filter_options_defaults_when_empty() {
        assert_eq!(FilterOptions::from_players(&[]), FilterOptions::default());
    }
}
