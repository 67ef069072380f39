// Integration tests for hoopsight.
//
// These exercise the full pipeline through the library's public API: CSV
// load, deduplication, derived metrics, tags, ranking, similarity, summaries
// and the question responder, all against a small Basketball-Reference style
// fixture.

use std::path::Path;

use hoopsight_core::dataset::{load_rows, load_rows_from_reader, DatasetError};
use hoopsight_core::dedup::DedupFallback;
use hoopsight_core::filter::{FilterOptions, PlayerFilter};
use hoopsight_core::player::{PlayerRecord, Position};
use hoopsight_core::query::{QueryConfig, QueryResponder, FALLBACK_MESSAGE};
use hoopsight_core::ranking::{fantasy_ranking, top_by, top_n, StatCategory};
use hoopsight_core::similarity::find_similar;
use hoopsight_core::store::TableStore;
use hoopsight_core::summary::{league_averages, percentile_rank, position_summaries, team_summaries};
use hoopsight_core::table::{LoadOptions, PlayerTable};
use hoopsight_core::tags::{PlayerType, Tag};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

const EPS: f64 = 1e-6;

fn fixture_path() -> std::path::PathBuf {
    Path::new(FIXTURES).join("players.csv")
}

fn load_fixture(options: &LoadOptions) -> PlayerTable {
    PlayerTable::load(&fixture_path(), options).expect("fixture should load")
}

fn names(players: &[&PlayerRecord]) -> Vec<String> {
    players.iter().map(|p| p.name.clone()).collect()
}

// ===========================================================================
// Loading and deduplication
// ===========================================================================

#[test]
fn fixture_rows_parse_and_skip_non_players() {
    let rows = load_rows(&fixture_path()).unwrap();
    // 17 data lines minus the blank-name row and the League Average row.
    assert_eq!(rows.len(), 15);
    assert!(rows.iter().all(|r| !r.name.is_empty()));
    assert!(rows.iter().all(|r| r.name != "League Average"));

    let gobert = rows.iter().find(|r| r.name == "Rudy Gobert").unwrap();
    assert_eq!(gobert.stats.three_pct, None);
    assert_eq!(gobert.position, Position::Center);
}

#[test]
fn traded_player_keeps_combined_row() {
    let table = load_fixture(&LoadOptions::default());
    assert_eq!(table.len(), 11);

    let luka = table.get("Luka Dončić").unwrap();
    assert_eq!(luka.team, "2TM");
    assert_eq!(luka.stats.games, 50);
    assert!((luka.stats.pts - 28.2).abs() < EPS);
    assert!((luka.fantasy_points - 50.8).abs() < EPS);

    let count = table.players().iter().filter(|p| p.name == "Luka Dončić").count();
    assert_eq!(count, 1);
}

#[test]
fn multi_team_player_without_combined_row_is_merged() {
    let table = load_fixture(&LoadOptions::default());
    let dennis = table.get("Dennis Schröder").unwrap();

    assert_eq!(dennis.team, "3TM");
    assert_eq!(dennis.stats.games, 77);
    assert_eq!(dennis.stats.games_started, 26);
    assert!((dennis.stats.pts - 946.4 / 77.0).abs() < EPS);
    assert!((dennis.fantasy_points - 1732.25 / 77.0).abs() < EPS);
    assert!(dennis.has_tag(Tag::IronMan));
}

#[test]
fn highest_points_fallback_keeps_best_team_row() {
    let options = LoadOptions {
        fallback: DedupFallback::HighestPoints,
        ..LoadOptions::default()
    };
    let table = load_fixture(&options);
    let dennis = table.get("Dennis Schröder").unwrap();

    assert_eq!(dennis.team, "BRK");
    assert!((dennis.stats.pts - 18.4).abs() < EPS);
    assert!((dennis.fantasy_points - 31.75).abs() < EPS);
}

#[test]
fn dataset_order_is_first_appearance() {
    let table = load_fixture(&LoadOptions::default());
    let order: Vec<&str> = table.players().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(order[0], "Shai Gilgeous-Alexander");
    assert_eq!(order[3], "Luka Dončić");
    assert_eq!(order[7], "Dennis Schröder");
    assert_eq!(order[10], "Bench Guy");
}

#[test]
fn missing_required_column_is_fatal() {
    let csv = "Player,Team,Pos,Age,G,PTS,TRB,AST,STL,BLK\nA,BOS,PG,25,70,20,4,6,1,0";
    match load_rows_from_reader(csv.as_bytes()) {
        Err(DatasetError::MissingColumns(cols)) => assert_eq!(cols, vec!["TOV"]),
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn unreadable_file_is_io_error() {
    let err = PlayerTable::load(Path::new("tests/fixtures/nope.csv"), &LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

// ===========================================================================
// Derived metrics and tags
// ===========================================================================

#[test]
fn derived_fields_match_formulas() {
    let table = load_fixture(&LoadOptions::default());
    let jokic = table.get("Nikola Jokić").unwrap();

    assert!((jokic.fantasy_points - 62.275).abs() < EPS);
    // No PER column: box-score efficiency.
    assert!((jokic.efficiency_rating - (29.6 + 12.7 + 10.2 + 1.8 + 0.6 - 3.3)).abs() < EPS);
    // No USG% column: (FGA + 0.44 FTA + AST) / MP * 100.
    let usage = (19.5 + 0.44 * 6.4 + 10.2) / 36.7 * 100.0;
    assert!((jokic.usage_rate - usage).abs() < EPS);

    let shooting = (0.576 + 0.417 + 0.800) / 3.0;
    let weighted = jokic.fantasy_points * 0.4 + jokic.efficiency_rating * 0.3 + usage * 0.2 + shooting * 0.1;
    assert!((jokic.weighted_score - weighted).abs() < EPS);

    let ts = 29.6 / (2.0 * (19.5 + 0.475 * 6.4));
    assert!((jokic.advanced.ts_pct - ts).abs() < EPS);
}

#[test]
fn tags_and_archetypes() {
    let table = load_fixture(&LoadOptions::default());

    let jokic = table.get("Nikola Jokić").unwrap();
    assert_eq!(
        jokic.tags,
        vec![Tag::Shooter, Tag::BoardMan, Tag::Playmaker, Tag::Scorer, Tag::Efficient]
    );
    assert_eq!(jokic.player_type, PlayerType::Playmaker);

    let wemby = table.get("Victor Wembanyama").unwrap();
    assert!(wemby.has_tag(Tag::Defender));
    assert_eq!(wemby.player_type, PlayerType::Rebounder);

    let sga = table.get("Shai Gilgeous-Alexander").unwrap();
    assert!(sga.has_tag(Tag::IronMan));
    assert_eq!(sga.player_type, PlayerType::Scorer);

    let curry = table.get("Stephen Curry").unwrap();
    assert!(curry.has_tag(Tag::Clutch));
    assert!(!curry.has_tag(Tag::Shooter));

    let bench = table.get("Bench Guy").unwrap();
    assert!(bench.tags.is_empty());
    assert_eq!(bench.player_type, PlayerType::RolePlayer);
}

#[test]
fn reloading_yields_identical_records() {
    let first = load_fixture(&LoadOptions::default());
    let second = load_fixture(&LoadOptions::default());
    assert_eq!(first.players(), second.players());
}

// ===========================================================================
// Ranking and similarity
// ===========================================================================

#[test]
fn top_five_by_fantasy_points() {
    let table = load_fixture(&LoadOptions::default());
    let top = top_n(table.players(), 5);
    assert_eq!(
        names(&top),
        vec![
            "Nikola Jokić",
            "Giannis Antetokounmpo",
            "Shai Gilgeous-Alexander",
            "Luka Dončić",
            "Victor Wembanyama",
        ]
    );
    assert_eq!(top_n(table.players(), 50).len(), 11);
}

#[test]
fn fantasy_ranking_respects_min_games() {
    let table = load_fixture(&LoadOptions::default());
    let ranked = fantasy_ranking(table.players(), 60);
    assert_eq!(ranked.len(), 8);
    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].player.name, "Nikola Jokić");
    assert!(ranked.iter().all(|r| r.player.stats.games >= 60));
}

#[test]
fn category_leaders() {
    let table = load_fixture(&LoadOptions::default());
    let scorers = top_by(table.players(), StatCategory::Points, 1);
    assert_eq!(scorers[0].name, "Shai Gilgeous-Alexander");
    let blockers = top_by(table.players(), StatCategory::Blocks, 1);
    assert_eq!(blockers[0].name, "Victor Wembanyama");
}

#[test]
fn similar_players_exclude_reference() {
    let table = load_fixture(&LoadOptions::default());
    let jokic = table.get("Nikola Jokić").unwrap();
    let similar = find_similar(jokic, table.players(), 3);

    assert_eq!(similar.len(), 3);
    assert!(similar.iter().all(|s| s.player.name != jokic.name));
    for pair in similar.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

// ===========================================================================
// Filters and summaries
// ===========================================================================

#[test]
fn filtered_views_and_options() {
    let table = load_fixture(&LoadOptions::default());
    let guards = PlayerFilter::default()
        .position(Position::PointGuard)
        .apply(table.players())
        .unwrap();
    assert_eq!(guards.len(), 5);

    let veterans = PlayerFilter::default().ages(35, 45).apply(table.players()).unwrap();
    assert_eq!(names(&veterans), vec!["LeBron James", "Stephen Curry"]);

    let options = FilterOptions::from_players(table.players());
    assert_eq!(options.age_range, (21, 40));
    assert!(options.teams.contains(&"2TM".to_string()));
}

#[test]
fn team_and_position_summaries() {
    let table = load_fixture(&LoadOptions::default());

    let teams = team_summaries(table.players());
    assert_eq!(teams[0].team, "DEN");
    let lal = teams.iter().find(|t| t.team == "LAL").unwrap();
    assert_eq!(lal.player_count, 1);

    let positions = position_summaries(table.players());
    assert_eq!(positions[0].position, Position::PointGuard);
    assert_eq!(positions[0].player_count, 5);

    let league = league_averages(table.players());
    assert_eq!(league.player_count, 11);

    let fps: Vec<f64> = table.players().iter().map(|p| p.fantasy_points).collect();
    let jokic = table.get("Nikola Jokić").unwrap();
    assert!((percentile_rank(jokic.fantasy_points, &fps) - 1000.0 / 11.0).abs() < EPS);
}

#[test]
fn rescoring_produces_new_table() {
    let table = load_fixture(&LoadOptions::default());
    let mut weights = table.options().scoring;
    weights.points = 0.0;
    let rescored = table.rescored(&weights);

    let before = table.get("Stephen Curry").unwrap().fantasy_points;
    let after = rescored.get("Stephen Curry").unwrap().fantasy_points;
    assert!((before - 39.0).abs() < EPS);
    assert!((after - 14.5).abs() < EPS);
}

#[test]
fn json_export_round_trips_player_count() {
    let table = load_fixture(&LoadOptions::default());
    let json = table.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(11));
}

// ===========================================================================
// Query responder
// ===========================================================================

#[test]
fn responder_answers_common_questions() {
    let table = load_fixture(&LoadOptions::default());
    let responder = QueryResponder::new(&table, QueryConfig::default());

    let profile = responder.respond("Tell me about Nikola Jokic");
    assert!(profile.starts_with("**Nikola Jokić** (DEN) - C"));
    assert!(profile.contains("- Player Type: Playmaker"));

    let schroder = responder.respond("dennis schroder stats");
    assert!(schroder.starts_with("**Dennis Schröder** (3TM)"));

    let sleepers = responder.respond("fantasy sleepers");
    assert!(sleepers.contains("Rudy Gobert"));
    assert!(!sleepers.contains("Nikola"));

    let comparison = responder.respond("Compare Luka vs LeBron");
    assert!(comparison.contains("**Fantasy Winner:** Luka Dončić"));

    let lakers = responder.respond("Show me the Lakers roster");
    assert!(lakers.contains("LeBron James"));

    let centers = responder.respond("best centers");
    assert!(centers.contains("1. **Nikola Jokić**"));

    assert_eq!(responder.respond("asdkjasd"), FALLBACK_MESSAGE);
}

// ===========================================================================
// Store
// ===========================================================================

#[test]
fn store_loads_fixture_lazily() {
    let mut store = TableStore::new(fixture_path(), LoadOptions::default());
    assert!(!store.is_loaded());
    assert_eq!(store.table().unwrap().len(), 11);
    assert!(store.loaded_at().is_some());
    assert_eq!(store.reload().unwrap().len(), 11);
}
