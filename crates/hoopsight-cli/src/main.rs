// hoopsight entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the player table store and load the dataset
// 4. Question loop on stdin until `:quit` or end of input

use hoopsight_core::config::{self, Config};
use hoopsight_core::query::QueryResponder;
use hoopsight_core::ranking::{bottom_by, fantasy_ranking, StatCategory};
use hoopsight_core::similarity::find_similar;
use hoopsight_core::store::TableStore;
use hoopsight_core::summary::{consistency_score, league_averages, player_rating};

use anyhow::Context;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

const BANNER: &str = "\
hoopsight - ask about NBA players, stat leaders, fantasy picks, teams and positions.
Commands: :top [n]  :bottom [n]  :similar <name>  :rate <name>  :export <path>  :reload  :quit";

/// What the loop should do after handling a line.
enum Flow {
    Continue,
    Quit,
}

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("hoopsight starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: dataset={}, fallback={:?}, top_n={}",
        config.data.path.display(),
        config.data.dedup_fallback,
        config.ranking.top_n
    );

    // 3. Open the store and load the dataset up front so a bad file fails fast
    let mut store = TableStore::new(&config.data.path, config.load_options());
    let count = store
        .table()
        .with_context(|| format!("failed to load dataset {}", config.data.path.display()))?
        .len();
    info!("Dataset ready with {} players", count);

    // 4. Question loop
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "{BANNER}")?;
    writeln!(out, "Loaded {count} players.\n")?;
    prompt(&mut out)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            prompt(&mut out)?;
            continue;
        }
        match handle_line(&mut store, &config, line, &mut out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                warn!("Command {:?} failed: {:#}", line, e);
                writeln!(out, "Error: {e:#}")?;
            }
        }
        writeln!(out)?;
        prompt(&mut out)?;
    }

    info!("hoopsight shut down cleanly");
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

fn handle_line(
    store: &mut TableStore,
    config: &Config,
    line: &str,
    out: &mut impl Write,
) -> anyhow::Result<Flow> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((c, rest)) => (c, rest.trim()),
        None => (line, ""),
    };

    match command {
        ":quit" | ":q" | ":exit" => return Ok(Flow::Quit),
        ":reload" => {
            let table = store.reload().context("reload failed")?;
            writeln!(out, "Reloaded {} players.", table.len())?;
        }
        ":top" => {
            let n = list_length(arg, config.ranking.top_n)?;
            let table = store.table()?;
            let ranked = fantasy_ranking(table.players(), config.ranking.min_games);
            for entry in ranked.iter().take(n) {
                let p = entry.player;
                writeln!(
                    out,
                    "{:>3}. {} ({}, {}) - {:.1} FP, {:.1} WS",
                    entry.rank, p.name, p.team, p.position, p.fantasy_points, p.weighted_score
                )?;
            }
        }
        ":bottom" => {
            let n = list_length(arg, config.ranking.top_n)?;
            let table = store.table()?;
            for (i, p) in bottom_by(table.players(), StatCategory::FantasyPoints, n)
                .iter()
                .enumerate()
            {
                writeln!(
                    out,
                    "{:>3}. {} ({}, {}) - {:.1} FP",
                    i + 1,
                    p.name,
                    p.team,
                    p.position,
                    p.fantasy_points
                )?;
            }
        }
        ":rate" => {
            if arg.is_empty() {
                writeln!(out, "Usage: :rate <player name>")?;
                return Ok(Flow::Continue);
            }
            let table = store.table()?;
            let responder = QueryResponder::new(table, config.query);
            let Some(player) = responder.find_player(arg) else {
                writeln!(out, "No player matches '{arg}'.")?;
                return Ok(Flow::Continue);
            };
            let averages = league_averages(table.players());
            writeln!(out, "{} against the league:", player.name)?;
            for r in player_rating(player, &averages) {
                let verdict = if r.percentile > 0.0 { "above" } else { "at or below" };
                writeln!(
                    out,
                    "- {}: {:.3} vs {:.3} ({verdict})",
                    r.stat, r.value, r.league_avg
                )?;
            }
            writeln!(
                out,
                "Shooting consistency: {:.2}",
                consistency_score(&player.stats)
            )?;
        }
        ":similar" => {
            if arg.is_empty() {
                writeln!(out, "Usage: :similar <player name>")?;
                return Ok(Flow::Continue);
            }
            let table = store.table()?;
            let responder = QueryResponder::new(table, config.query);
            let Some(reference) = responder.find_player(arg) else {
                writeln!(out, "No player matches '{arg}'.")?;
                return Ok(Flow::Continue);
            };
            writeln!(out, "Players most similar to {}:", reference.name)?;
            for s in find_similar(reference, table.players(), config.similarity.k) {
                writeln!(
                    out,
                    "- {} ({}) - distance {:.2}, {:.1} FP",
                    s.player.name, s.player.team, s.distance, s.player.fantasy_points
                )?;
            }
        }
        ":export" => {
            if arg.is_empty() {
                writeln!(out, "Usage: :export <path>")?;
                return Ok(Flow::Continue);
            }
            let table = store.table()?;
            let json = table.to_json().context("failed to serialize player table")?;
            std::fs::write(arg, json).with_context(|| format!("failed to write {arg}"))?;
            info!("Exported {} players to {}", table.len(), arg);
            writeln!(out, "Exported {} players to {arg}.", table.len())?;
        }
        _ if command.starts_with(':') => {
            writeln!(out, "Unknown command {command}.")?;
            writeln!(out, "{BANNER}")?;
        }
        _ => {
            let table = store.table()?;
            let responder = QueryResponder::new(table, config.query);
            writeln!(out, "{}", responder.respond(line))?;
        }
    }
    Ok(Flow::Continue)
}

/// Parse an optional list length argument.
fn list_length(arg: &str, default: usize) -> anyhow::Result<usize> {
    if arg.is_empty() {
        return Ok(default);
    }
    arg.parse::<usize>()
        .with_context(|| format!("`{arg}` is not a list length"))
}

/// Initialize tracing to log to a file (stdout carries the answers).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("hoopsight.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hoopsight=info,hoopsight_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
