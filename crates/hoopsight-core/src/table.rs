// The canonical player table: deduplicated, fully derived, immutable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::dataset::{self, DatasetError};
use crate::dedup::{deduplicate, DedupFallback};
use crate::metrics::{derive_record, BlendWeights, ScoringWeights};
use crate::player::{PlayerRecord, PlayerRow};

/// Knobs that shape how raw rows become records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    pub fallback: DedupFallback,
    pub scoring: ScoringWeights,
    pub blend: BlendWeights,
}

/// One record per unique player, in dataset order.
#[derive(Debug, Clone)]
pub struct PlayerTable {
    players: Vec<PlayerRecord>,
    index: HashMap<String, usize>,
    options: LoadOptions,
}

impl PlayerTable {
    /// Deduplicate raw rows and derive every record in a single pass.
    pub fn from_rows(rows: &[PlayerRow], options: &LoadOptions) -> Self {
        let unique = deduplicate(rows, options.fallback);
        let players: Vec<PlayerRecord> = unique
            .into_iter()
            .map(|row| derive_record(row, &options.scoring, &options.blend))
            .collect();
        Self::from_records(players, *options)
    }

    fn from_records(players: Vec<PlayerRecord>, options: LoadOptions) -> Self {
        let index = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        PlayerTable {
            players,
            index,
            options,
        }
    }

    /// Load, deduplicate and derive a table from a dataset file.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self, DatasetError> {
        let rows = dataset::load_rows(path)?;
        let table = Self::from_rows(&rows, options);
        info!(
            "Loaded {} rows from {}, {} unique players",
            rows.len(),
            path.display(),
            table.len()
        );
        Ok(table)
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Exact lookup by player name.
    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.index.get(name).map(|&i| &self.players[i])
    }

    /// A copy of this table with every derived field recomputed under new
    /// fantasy weights. The original table is left as it was.
    pub fn rescored(&self, scoring: &ScoringWeights) -> PlayerTable {
        let options = LoadOptions {
            scoring: *scoring,
            ..self.options
        };
        let players = self
            .players
            .iter()
            .map(|p| derive_record(p.to_row(), &options.scoring, &options.blend))
            .collect();
        Self::from_records(players, options)
    }

    /// Serialize the augmented table for the presentation layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.players)
    }
}
