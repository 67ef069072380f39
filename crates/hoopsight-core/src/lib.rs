// Library root: re-exports all modules so integration tests and the CLI can
// access the crate's public API.

pub mod config;
pub mod dataset;
pub mod dedup;
pub mod filter;
pub mod metrics;
pub mod player;
pub mod query;
pub mod ranking;
pub mod similarity;
pub mod store;
pub mod summary;
pub mod table;
pub mod tags;
pub mod text;
