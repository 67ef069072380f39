// Configuration loading and validation (config/hoopsight.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dedup::DedupFallback;
use crate::metrics::{BlendWeights, ScoringWeights};
use crate::query::QueryConfig;
use crate::ranking::DEFAULT_TOP_N;
use crate::table::LoadOptions;

/// Shipped defaults, written to `config/` when no `defaults/` directory is
/// available to copy from.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../defaults/hoopsight.toml");

const CONFIG_FILE: &str = "hoopsight.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data: DataConfig,
    pub scoring: ScoringWeights,
    pub blend: BlendWeights,
    pub ranking: RankingConfig,
    pub similarity: SimilarityConfig,
    pub query: QueryConfig,
}

impl Config {
    /// The options the player table is built with.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            fallback: self.data.dedup_fallback,
            scoring: self.scoring,
            blend: self.blend,
        }
    }
}

/// Raw deserialization target for hoopsight.toml. Every section but
/// `[data]` may be left out.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataConfig,
    #[serde(default)]
    scoring: ScoringWeights,
    #[serde(default)]
    blend: BlendWeights,
    #[serde(default)]
    ranking: RankingConfig,
    #[serde(default)]
    similarity: SimilarityConfig,
    #[serde(default)]
    query: QueryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub dedup_fallback: DedupFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_n: usize,
    /// Minimum games played to appear in the full fantasy ranking.
    pub min_games: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            top_n: DEFAULT_TOP_N,
            min_games: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub k: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        SimilarityConfig { k: 5 }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate `config/hoopsight.toml` under `base_dir`.
///
/// A relative `data.path` is resolved against `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&config_path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    let mut data = file.data;
    if data.path.is_relative() && !data.path.as_os_str().is_empty() {
        data.path = base_dir.join(&data.path);
    }

    let config = Config {
        data,
        scoring: file.scoring,
        blend: file.blend,
        ranking: file.ranking,
        similarity: file.similarity,
        query: file.query,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure `config/` holds a config file by copying missing ones from
/// `defaults/`. Without a `defaults/` directory the built-in defaults are
/// written instead. Existing files are never overwritten. Returns the files
/// that were created.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    if !defaults_dir.exists() {
        let target = config_dir.join(CONFIG_FILE);
        return Ok(write_new(&target, DEFAULT_CONFIG_TOML.as_bytes())?
            .then_some(target)
            .into_iter()
            .collect());
    }

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        if write_new(&target, &content)? {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures the config file exists before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

/// Create `target` with `content` unless it already exists. Returns whether
/// the file was written.
fn write_new(target: &Path, content: &[u8]) -> Result<bool, ConfigError> {
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.path".into(),
            message: "must not be empty".into(),
        });
    }

    // Scoring weights may be negative (turnovers) but must be real numbers
    for (name, val) in config.scoring.fields() {
        if !val.is_finite() {
            return Err(ConfigError::ValidationError {
                field: format!("scoring.{name}"),
                message: format!("must be a finite number, got {val}"),
            });
        }
    }

    for (name, val) in config.blend.fields() {
        if !val.is_finite() || val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("blend.{name}"),
                message: format!("must be >= 0, got {val}"),
            });
        }
    }

    let sizes: &[(&str, usize)] = &[
        ("ranking.top_n", config.ranking.top_n),
        ("similarity.k", config.similarity.k),
        ("query.list_size", config.query.list_size),
        ("query.draft_list_size", config.query.draft_list_size),
    ];
    for (name, val) in sizes {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be greater than 0".into(),
            });
        }
    }

    let (lo, hi) = (config.query.sleeper_min, config.query.sleeper_max);
    if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || lo >= hi {
        return Err(ConfigError::ValidationError {
            field: "query.sleeper_min".into(),
            message: format!("sleeper range must satisfy 0 <= min < max, got ({lo}, {hi})"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Fresh directory under the system temp dir with `config/hoopsight.toml`
    /// holding `contents`.
    fn config_dir_with(name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("hoopsight_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), contents).unwrap();
        tmp
    }

    fn expect_validation_field(err: ConfigError, expected: &str) {
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn shipped_defaults_load_and_validate() {
        let tmp = config_dir_with("shipped", DEFAULT_CONFIG_TOML);
        let config = load_config_from(&tmp).expect("defaults should load");

        assert_eq!(config.data.path, tmp.join("data/players.csv"));
        assert_eq!(config.data.dedup_fallback, DedupFallback::Merge);
        assert_eq!(config.scoring, ScoringWeights::default());
        assert_eq!(config.blend, BlendWeights::default());
        assert_eq!(config.ranking, RankingConfig::default());
        assert_eq!(config.similarity.k, 5);
        assert_eq!(config.query, QueryConfig::default());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let tmp = config_dir_with(
            "minimal",
            "[data]\npath = \"/srv/nba/players.csv\"\ndedup_fallback = \"highest_points\"\n\n[query]\nlist_size = 8\n",
        );
        let config = load_config_from(&tmp).unwrap();

        assert_eq!(config.data.path, PathBuf::from("/srv/nba/players.csv"));
        assert_eq!(config.data.dedup_fallback, DedupFallback::HighestPoints);
        assert_eq!(config.query.list_size, 8);
        assert_eq!(config.query.draft_list_size, 10);
        assert_eq!(config.ranking.top_n, DEFAULT_TOP_N);

        let options = config.load_options();
        assert_eq!(options.fallback, DedupFallback::HighestPoints);
        assert_eq!(options.scoring, ScoringWeights::default());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn custom_scoring_weights() {
        let text = DEFAULT_CONFIG_TOML.replace("points = 1.0", "points = 1.5");
        let tmp = config_dir_with("custom_scoring", &text);
        let config = load_config_from(&tmp).unwrap();
        assert!((config.scoring.points - 1.5).abs() < f64::EPSILON);
        assert!((config.scoring.turnovers + 1.0).abs() < f64::EPSILON);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn partial_scoring_section_keeps_other_weights() {
        let tmp = config_dir_with(
            "partial_scoring",
            "[data]\npath = \"players.csv\"\n\n[scoring]\nturnovers = -2.0\n",
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.scoring.turnovers, -2.0);
        assert_eq!(config.scoring.assists, 1.5);
        assert_eq!(config.data.path, tmp.join("players.csv"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_list_size() {
        let text = DEFAULT_CONFIG_TOML.replace("list_size = 5", "list_size = 0");
        let tmp = config_dir_with("zero_list", &text);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "query.list_size");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_top_n_and_k() {
        let tmp = config_dir_with("zero_top_n", &DEFAULT_CONFIG_TOML.replace("top_n = 20", "top_n = 0"));
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "ranking.top_n");
        let _ = fs::remove_dir_all(&tmp);

        let tmp = config_dir_with("zero_k", &DEFAULT_CONFIG_TOML.replace("k = 5", "k = 0"));
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "similarity.k");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_blend_weight() {
        let text = DEFAULT_CONFIG_TOML.replace("usage = 0.2", "usage = -0.2");
        let tmp = config_dir_with("negative_blend", &text);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "blend.usage");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_inverted_sleeper_range() {
        let text = DEFAULT_CONFIG_TOML.replace("sleeper_min = 25.0", "sleeper_min = 40.0");
        let tmp = config_dir_with("sleeper_range", &text);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "query.sleeper_min");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_data_path() {
        let text = DEFAULT_CONFIG_TOML.replace("path = \"data/players.csv\"", "path = \"\"");
        let tmp = config_dir_with("empty_path", &text);
        expect_validation_field(load_config_from(&tmp).unwrap_err(), "data.path");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = config_dir_with("invalid_toml", "[data\npath = ");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("config/hoopsight.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_unknown_fallback() {
        let text = DEFAULT_CONFIG_TOML.replace("dedup_fallback = \"merge\"", "dedup_fallback = \"sum\"");
        let tmp = config_dir_with("bad_fallback", &text);
        assert!(matches!(load_config_from(&tmp), Err(ConfigError::ParseError { .. })));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("hoopsight_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("hoopsight.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("hoopsight_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), DEFAULT_CONFIG_TOML).unwrap();
        fs::write(defaults_dir.join("local.toml.example"), "# example\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config/hoopsight.toml").exists());
        assert!(!tmp.join("config/local.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = config_dir_with("ensure_skips", "# custom\n");
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join(CONFIG_FILE), DEFAULT_CONFIG_TOML).unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config/hoopsight.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_writes_builtin_defaults() {
        let tmp = std::env::temp_dir().join("hoopsight_config_builtin");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied, vec![tmp.join("config/hoopsight.toml")]);
        assert!(load_config_from(&tmp).is_ok());

        // Second run leaves the file alone.
        assert!(ensure_config_files(&tmp).unwrap().is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }
}
