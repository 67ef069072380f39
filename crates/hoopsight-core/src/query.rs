// Rule-based question answering over the player table.
//
// A question is folded (lowercase, diacritics stripped), classified by the
// first matching entry of `INTENT_RULES`, and answered with a templated
// string built from the table. Every path returns text; nothing here can
// fail or panic on user input.

use serde::Deserialize;
use tracing::debug;

use crate::player::{PlayerRecord, Position};
use crate::ranking::{compare_fantasy, top_by, top_n, StatCategory};
use crate::summary::{position_summaries, team_summaries};
use crate::table::PlayerTable;
use crate::text::{contains_phrase, fold, words};

/// Answer for anything the responder cannot classify.
pub const FALLBACK_MESSAGE: &str = "I'm not sure how to help with that. Try asking about a \
specific player, stat leaders, fantasy picks, teams or positions. Type 'help' to see what I can do!";

pub const HELP_MESSAGE: &str = "\
**NBA Fantasy Assistant Help**

I can help you with:

**Player Information:**
- \"Tell me about LeBron James\"
- \"Who is Stephen Curry?\"
- \"Show me Nikola Jokic stats\"

**Statistical Queries:**
- \"Top fantasy players\"
- \"Best scorers\"
- \"Top 10 rebounders\"
- \"Assist leaders\"

**Fantasy Recommendations:**
- \"Draft picks\"
- \"Fantasy sleepers\"
- \"Who should I pick?\"

**Player Comparisons:**
- \"Compare LeBron vs Curry\"
- \"Is Luka better than Jokic?\"

**Team Information:**
- \"Lakers players\"
- \"Show me the Warriors roster\"
- \"Best teams\"

**Position Analysis:**
- \"Best centers\"
- \"Top point guards\"
- \"Position overview\"";

const PLAYER_GUIDANCE: &str = "I couldn't find a player name in your question. Try asking about a \
specific player like 'Tell me about LeBron James' or 'Who is Stephen Curry?'";
const CATEGORY_GUIDANCE: &str = "I can help you find top performers! Try asking about 'top fantasy \
players', 'top scorers', 'top rebounders', or 'top assist leaders'.";
const COMPARISON_GUIDANCE: &str = "I need at least two player names to make a comparison. Try \
asking 'Compare LeBron James vs Stephen Curry' or 'Who is better: Luka Doncic or Nikola Jokic?'";
const COMPARISON_NOT_FOUND: &str = "I couldn't find enough players for comparison. Please check \
the spelling of the player names.";
const TEAM_GUIDANCE: &str = "I couldn't identify a team name. Try asking 'Show me Lakers players' \
or 'Who plays for the Warriors?'";
const EMPTY_TABLE: &str = "No players are loaded yet, so there is nothing to rank.";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// List lengths and thresholds used when rendering answers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Entries in ordinary top lists.
    pub list_size: usize,
    /// Entries in the draft-pick list.
    pub draft_list_size: usize,
    /// Sleepers score strictly between these fantasy point bounds.
    pub sleeper_min: f64,
    pub sleeper_max: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            list_size: 5,
            draft_list_size: 10,
            sleeper_min: 25.0,
            sleeper_max: 35.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Help,
    Comparison,
    PositionSummary,
    TeamSummary,
    FantasyAdvice,
    TopByCategory,
    PlayerLookup,
}

/// A question in both raw and folded form.
struct Query<'t> {
    raw: &'t str,
    folded: String,
}

impl<'t> Query<'t> {
    fn new(raw: &'t str) -> Self {
        Query {
            raw,
            folded: fold(raw),
        }
    }

    fn mentions(&self, phrase: &str) -> bool {
        contains_phrase(&self.folded, phrase)
    }

    fn mentions_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.mentions(p))
    }

    /// First number in the question between 1 and 100, e.g. "top 10".
    fn requested_count(&self) -> Option<usize> {
        words(&self.folded)
            .into_iter()
            .filter_map(|w| w.parse::<usize>().ok())
            .find(|n| (1..=100).contains(n))
    }
}

struct IntentRule {
    intent: Intent,
    phrases: &'static [&'static str],
    /// Extra recognizer consulted when no phrase matches.
    also: Option<fn(&QueryResponder<'_>, &Query<'_>) -> bool>,
}

fn names_a_team(_: &QueryResponder<'_>, query: &Query<'_>) -> bool {
    find_franchise(query).is_some()
}

/// A lookup phrase ("who is", "tell me about", ...) followed by a name that
/// resolves to a player. Wins over team and category words inside the name,
/// e.g. "Who is PJ Washington?".
fn asks_about_named_player(responder: &QueryResponder<'_>, query: &Query<'_>) -> bool {
    QueryResponder::extract_name(query).is_some_and(|name| responder.find_player(&name).is_some())
}

fn names_a_player(responder: &QueryResponder<'_>, query: &Query<'_>) -> bool {
    responder.scan_for_player(&query.folded).is_some()
}

/// Intent table; the first matching rule wins.
static INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Help,
        phrases: &["help", "what can", "how to", "explain"],
        also: None,
    },
    IntentRule {
        intent: Intent::Comparison,
        phrases: &["compare", "vs", "versus", "better"],
        also: None,
    },
    IntentRule {
        intent: Intent::PlayerLookup,
        phrases: &[],
        also: Some(asks_about_named_player),
    },
    IntentRule {
        intent: Intent::PositionSummary,
        phrases: &[
            "point guard",
            "point guards",
            "pg",
            "shooting guard",
            "shooting guards",
            "sg",
            "small forward",
            "small forwards",
            "sf",
            "power forward",
            "power forwards",
            "pf",
            "center",
            "centers",
            "centre",
            "centres",
            "guards",
            "forwards",
            "position",
            "positions",
        ],
        also: None,
    },
    IntentRule {
        intent: Intent::TeamSummary,
        phrases: &["team", "teams", "roster", "players on", "plays for"],
        also: Some(names_a_team),
    },
    IntentRule {
        intent: Intent::FantasyAdvice,
        phrases: &[
            "draft",
            "pick",
            "picks",
            "sleeper",
            "sleepers",
            "undervalued",
            "recommend",
            "should i",
        ],
        also: None,
    },
    IntentRule {
        intent: Intent::TopByCategory,
        phrases: &["top", "best", "highest", "most", "leader", "leaders", "leading"],
        also: None,
    },
    IntentRule {
        intent: Intent::PlayerLookup,
        phrases: &["who is", "tell me about", "show me", "player", "stats"],
        also: Some(names_a_player),
    },
];

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

/// Category keywords, checked in order. Threes come before points so that
/// "three point shooters" is not read as a scoring question.
static CATEGORY_KEYWORDS: &[(&[&str], StatCategory)] = &[
    (&["fantasy"], StatCategory::FantasyPoints),
    (&["weighted", "overall"], StatCategory::WeightedScore),
    (
        &["three", "threes", "3pt", "3s", "three point", "shooters", "shooter"],
        StatCategory::Threes,
    ),
    (&["field goal", "fg", "percentage"], StatCategory::FieldGoalPct),
    (&["efficiency", "efficient"], StatCategory::Efficiency),
    (
        &["point", "points", "score", "scorer", "scorers", "scoring", "ppg"],
        StatCategory::Points,
    ),
    (
        &["rebound", "rebounds", "rebounder", "rebounders", "boards", "rpg"],
        StatCategory::Rebounds,
    ),
    (
        &["assist", "assists", "passer", "passers", "playmaker", "playmakers", "apg"],
        StatCategory::Assists,
    ),
    (&["steal", "steals", "stealer"], StatCategory::Steals),
    (&["block", "blocks", "blocker", "blockers", "shot blockers"], StatCategory::Blocks),
];

struct PositionGroup {
    phrases: &'static [&'static str],
    positions: &'static [Position],
    label: &'static str,
}

/// Position groups, most specific first.
static POSITION_GROUPS: &[PositionGroup] = &[
    PositionGroup {
        phrases: &["point guard", "point guards", "pg"],
        positions: &[Position::PointGuard],
        label: "Point Guards",
    },
    PositionGroup {
        phrases: &["shooting guard", "shooting guards", "sg"],
        positions: &[Position::ShootingGuard],
        label: "Shooting Guards",
    },
    PositionGroup {
        phrases: &["small forward", "small forwards", "sf"],
        positions: &[Position::SmallForward],
        label: "Small Forwards",
    },
    PositionGroup {
        phrases: &["power forward", "power forwards", "pf"],
        positions: &[Position::PowerForward],
        label: "Power Forwards",
    },
    PositionGroup {
        phrases: &["center", "centers", "centre", "centres"],
        positions: &[Position::Center],
        label: "Centers",
    },
    PositionGroup {
        phrases: &["guard", "guards"],
        positions: &[Position::PointGuard, Position::ShootingGuard, Position::Guard],
        label: "Guards",
    },
    PositionGroup {
        phrases: &["forward", "forwards"],
        positions: &[Position::SmallForward, Position::PowerForward, Position::Forward],
        label: "Forwards",
    },
];

/// An NBA franchise as it may be named in a question.
struct Franchise {
    name: &'static str,
    /// Dataset team codes, Basketball-Reference first.
    codes: &'static [&'static str],
    /// Folded nicknames and cities.
    keywords: &'static [&'static str],
}

static FRANCHISES: &[Franchise] = &[
    Franchise { name: "Atlanta Hawks", codes: &["ATL"], keywords: &["hawks", "atlanta"] },
    Franchise { name: "Boston Celtics", codes: &["BOS"], keywords: &["celtics", "boston"] },
    Franchise { name: "Brooklyn Nets", codes: &["BRK", "BKN"], keywords: &["nets", "brooklyn"] },
    Franchise { name: "Charlotte Hornets", codes: &["CHO", "CHA"], keywords: &["hornets", "charlotte"] },
    Franchise { name: "Chicago Bulls", codes: &["CHI"], keywords: &["bulls", "chicago"] },
    Franchise { name: "Cleveland Cavaliers", codes: &["CLE"], keywords: &["cavaliers", "cavs", "cleveland"] },
    Franchise { name: "Dallas Mavericks", codes: &["DAL"], keywords: &["mavericks", "mavs", "dallas"] },
    Franchise { name: "Denver Nuggets", codes: &["DEN"], keywords: &["nuggets", "denver"] },
    Franchise { name: "Detroit Pistons", codes: &["DET"], keywords: &["pistons", "detroit"] },
    Franchise { name: "Golden State Warriors", codes: &["GSW", "GS"], keywords: &["warriors", "golden state"] },
    Franchise { name: "Houston Rockets", codes: &["HOU"], keywords: &["rockets", "houston"] },
    Franchise { name: "Indiana Pacers", codes: &["IND"], keywords: &["pacers", "indiana"] },
    Franchise { name: "Los Angeles Clippers", codes: &["LAC"], keywords: &["clippers"] },
    Franchise { name: "Los Angeles Lakers", codes: &["LAL"], keywords: &["lakers"] },
    Franchise { name: "Memphis Grizzlies", codes: &["MEM"], keywords: &["grizzlies", "memphis"] },
    Franchise { name: "Miami Heat", codes: &["MIA"], keywords: &["heat", "miami"] },
    Franchise { name: "Milwaukee Bucks", codes: &["MIL"], keywords: &["bucks", "milwaukee"] },
    Franchise { name: "Minnesota Timberwolves", codes: &["MIN"], keywords: &["timberwolves", "wolves", "minnesota"] },
    Franchise { name: "New Orleans Pelicans", codes: &["NOP", "NO"], keywords: &["pelicans", "new orleans"] },
    Franchise { name: "New York Knicks", codes: &["NYK", "NY"], keywords: &["knicks", "new york"] },
    Franchise { name: "Oklahoma City Thunder", codes: &["OKC"], keywords: &["thunder", "oklahoma city", "oklahoma"] },
    Franchise { name: "Orlando Magic", codes: &["ORL"], keywords: &["magic", "orlando"] },
    Franchise { name: "Philadelphia 76ers", codes: &["PHI"], keywords: &["76ers", "sixers", "philadelphia"] },
    Franchise { name: "Phoenix Suns", codes: &["PHO", "PHX"], keywords: &["suns", "phoenix"] },
    Franchise { name: "Portland Trail Blazers", codes: &["POR"], keywords: &["trail blazers", "blazers", "portland"] },
    Franchise { name: "Sacramento Kings", codes: &["SAC"], keywords: &["kings", "sacramento"] },
    Franchise { name: "San Antonio Spurs", codes: &["SAS", "SA"], keywords: &["spurs", "san antonio"] },
    Franchise { name: "Toronto Raptors", codes: &["TOR"], keywords: &["raptors", "toronto"] },
    Franchise { name: "Utah Jazz", codes: &["UTA", "UTAH"], keywords: &["jazz", "utah"] },
    Franchise { name: "Washington Wizards", codes: &["WAS", "WSH"], keywords: &["wizards", "washington"] },
];

/// Find the franchise a question refers to. Nicknames and cities match
/// anywhere; team codes only when written in capitals, so "min" or "sac"
/// inside ordinary text do not count.
fn find_franchise(query: &Query<'_>) -> Option<&'static Franchise> {
    let capital_tokens: Vec<&str> = query
        .raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2 && t.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()))
        .collect();

    FRANCHISES.iter().find(|f| {
        query.mentions_any(f.keywords) || capital_tokens.iter().any(|t| f.codes.contains(t))
    })
}

/// Words that never start or end a player name in a question.
static STOP_WORDS: &[&str] = &[
    "a", "about", "and", "are", "best", "better", "compare", "data", "does", "for", "get", "give",
    "his", "how", "i", "in", "information", "is", "me", "of", "on", "or", "player", "players",
    "please", "season", "should", "show", "stat", "stats", "tell", "than", "the", "this", "to",
    "top", "versus", "vs", "what", "whats", "which", "who", "whos", "with", "would", "year",
    "fantasy", "between", "rather", "have", "pick", "start",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Lookup patterns: the player name follows the phrase.
static NAME_PREFIXES: &[&str] = &["tell me about", "who is", "show me", "player"];

/// Lookup patterns: the player name precedes the word.
static NAME_SUFFIXES: &[&str] = &["stats", "stat", "information"];

/// Words that separate names in a comparison.
static COMPARISON_SEPARATORS: &[&str] = &["vs", "versus", "and", "or", "than"];

fn impact_line(fantasy_points: f64) -> String {
    if fantasy_points > 40.0 {
        format!("**Fantasy Impact:** Elite fantasy player with {fantasy_points:.1} fantasy points per game!")
    } else if fantasy_points > 30.0 {
        format!("**Fantasy Impact:** Strong fantasy contributor with {fantasy_points:.1} fantasy points per game.")
    } else {
        format!("**Fantasy Impact:** Solid role player with {fantasy_points:.1} fantasy points per game.")
    }
}

fn fantasy_list(players: &[&PlayerRecord]) -> String {
    let mut s = String::new();
    for (i, p) in players.iter().enumerate() {
        s.push_str(&format!(
            "{}. **{}** ({}) - {:.1} FP\n",
            i + 1,
            p.name,
            p.team,
            p.fantasy_points
        ));
    }
    s
}

// ---------------------------------------------------------------------------
// Responder
// ---------------------------------------------------------------------------

/// Answers free-text questions about one loaded table.
pub struct QueryResponder<'a> {
    table: &'a PlayerTable,
    config: QueryConfig,
    /// Folded player names, aligned with `table.players()`.
    folded_names: Vec<String>,
}

impl<'a> QueryResponder<'a> {
    pub fn new(table: &'a PlayerTable, config: QueryConfig) -> Self {
        let folded_names = table.players().iter().map(|p| fold(&p.name)).collect();
        QueryResponder {
            table,
            config,
            folded_names,
        }
    }

    /// The intent a question maps to, or `None` when nothing matches.
    pub fn classify(&self, text: &str) -> Option<Intent> {
        self.classify_query(&Query::new(text))
    }

    fn classify_query(&self, query: &Query<'_>) -> Option<Intent> {
        if query.folded.is_empty() {
            return None;
        }
        INTENT_RULES
            .iter()
            .find(|rule| {
                query.mentions_any(rule.phrases) || rule.also.is_some_and(|f| f(self, query))
            })
            .map(|rule| rule.intent)
    }

    /// Answer a question. Unrecognised input gets `FALLBACK_MESSAGE`.
    pub fn respond(&self, text: &str) -> String {
        let query = Query::new(text);
        let intent = self.classify_query(&query);
        debug!("Query {:?} classified as {:?}", text, intent);

        match intent {
            None => FALLBACK_MESSAGE.to_string(),
            Some(Intent::Help) => HELP_MESSAGE.to_string(),
            Some(Intent::Comparison) => self.answer_comparison(&query),
            Some(Intent::PositionSummary) => self.answer_position(&query),
            Some(Intent::TeamSummary) => self.answer_team(&query),
            Some(Intent::FantasyAdvice) => self.answer_fantasy(&query),
            Some(Intent::TopByCategory) => self.answer_top(&query),
            Some(Intent::PlayerLookup) => self.answer_player(&query),
        }
    }

    /// Resolve a free-text name to a player.
    ///
    /// Tries an exact folded match, then names containing the text, then
    /// names containing every word of it. Among several matches the highest
    /// fantasy scorer wins, ties by name.
    pub fn find_player(&self, name: &str) -> Option<&'a PlayerRecord> {
        let needle = fold(name);
        if needle.is_empty() {
            return None;
        }
        let needle_words = words(&needle);

        let strategies: [&dyn Fn(&str) -> bool; 3] = [
            &|n: &str| n == needle,
            &|n: &str| n.contains(needle.as_str()),
            &|n: &str| needle_words.iter().all(|w| n.contains(w)),
        ];
        strategies
            .iter()
            .find_map(|matches| self.best_match(|n| matches(n)))
    }

    fn best_match<F: Fn(&str) -> bool>(&self, matches: F) -> Option<&'a PlayerRecord> {
        let players: &'a [PlayerRecord] = self.table.players();
        players
            .iter()
            .zip(&self.folded_names)
            .filter(|(_, folded)| matches(folded.as_str()))
            .map(|(p, _)| p)
            .min_by(|a, b| {
                b.fantasy_points
                    .total_cmp(&a.fantasy_points)
                    .then_with(|| a.name.cmp(&b.name))
            })
    }

    /// Look for a player named anywhere in folded text, longest word runs
    /// first. Runs must match whole words of a name.
    fn scan_for_player(&self, folded: &str) -> Option<&'a PlayerRecord> {
        let text_words = words(folded);
        for len in (1..=3).rev() {
            for window in text_words.windows(len) {
                if is_stop_word(window[0]) || is_stop_word(window[len - 1]) {
                    continue;
                }
                let phrase = window.join(" ");
                if phrase.len() < 3 {
                    continue;
                }
                if let Some(p) = self.best_match(|n| contains_phrase(n, &phrase)) {
                    return Some(p);
                }
            }
        }
        None
    }

    /// The name a lookup question asks about, from its phrasing alone.
    fn extract_name(query: &Query<'_>) -> Option<String> {
        let text_words = words(&query.folded);

        for prefix in NAME_PREFIXES {
            let prefix_words = words(prefix);
            let found = text_words
                .windows(prefix_words.len())
                .position(|w| w == prefix_words.as_slice());
            if let Some(start) = found {
                let rest: Vec<&str> = text_words[start + prefix_words.len()..]
                    .iter()
                    .copied()
                    .take_while(|w| !NAME_SUFFIXES.contains(w) && *w != "data")
                    .collect();
                if !rest.is_empty() {
                    return Some(rest.join(" "));
                }
            }
        }

        for suffix in NAME_SUFFIXES {
            if let Some(end) = text_words.iter().position(|w| w == suffix) {
                let before: Vec<&str> = text_words[..end]
                    .iter()
                    .copied()
                    .skip_while(|w| is_stop_word(w))
                    .collect();
                if !before.is_empty() {
                    return Some(before.join(" "));
                }
            }
        }
        None
    }

    // -- handlers -----------------------------------------------------------

    fn answer_player(&self, query: &Query<'_>) -> String {
        let requested = Self::extract_name(query);
        let player = requested
            .as_deref()
            .and_then(|name| self.find_player(name))
            .or_else(|| self.scan_for_player(&query.folded));

        match (player, requested) {
            (Some(p), _) => self.player_profile(p),
            (None, Some(name)) => format!(
                "I couldn't find a player named '{name}' in the current dataset. Please check the spelling and try again."
            ),
            (None, None) => PLAYER_GUIDANCE.to_string(),
        }
    }

    fn player_profile(&self, p: &PlayerRecord) -> String {
        let mut s = format!("**{}** ({}) - {}\n\n", p.name, p.team, p.position);
        s.push_str("**Key Stats:**\n");
        s.push_str(&format!("- Points: {:.1} PPG\n", p.stats.pts));
        s.push_str(&format!("- Rebounds: {:.1} RPG\n", p.stats.trb));
        s.push_str(&format!("- Assists: {:.1} APG\n", p.stats.ast));
        s.push_str(&format!("- Fantasy Points: {:.1}\n", p.fantasy_points));
        s.push_str(&format!("- Player Type: {}\n", p.player_type));
        if !p.tags.is_empty() {
            s.push_str(&format!("- Tags: {}\n", p.tag_labels()));
        }
        s.push('\n');
        s.push_str(&impact_line(p.fantasy_points));
        s
    }

    fn answer_top(&self, query: &Query<'_>) -> String {
        let Some(category) = CATEGORY_KEYWORDS
            .iter()
            .find(|(keywords, _)| query.mentions_any(keywords))
            .map(|&(_, category)| category)
        else {
            return CATEGORY_GUIDANCE.to_string();
        };
        if self.table.is_empty() {
            return EMPTY_TABLE.to_string();
        }

        let n = query.requested_count().unwrap_or(self.config.list_size);
        let leaders = top_by(self.table.players(), category, n);

        let mut s = format!("**Top {} {}:**\n\n", leaders.len(), category.leaders_label());
        for (i, p) in leaders.iter().enumerate() {
            s.push_str(&format!(
                "{}. **{}** ({}) - {} {}\n",
                i + 1,
                p.name,
                p.team,
                category.format_value(category.value(p)),
                category.unit()
            ));
        }
        s
    }

    fn answer_fantasy(&self, query: &Query<'_>) -> String {
        if self.table.is_empty() {
            return EMPTY_TABLE.to_string();
        }

        if query.mentions_any(&["sleeper", "sleepers", "undervalued"]) {
            let (lo, hi) = (self.config.sleeper_min, self.config.sleeper_max);
            let in_range = self
                .table
                .players()
                .iter()
                .filter(|p| p.fantasy_points > lo && p.fantasy_points < hi);
            let sleepers = top_n(in_range, self.config.list_size);
            if sleepers.is_empty() {
                return format!("No players currently fall in the sleeper range ({lo:.0}-{hi:.0} FP).");
            }
            let mut s = String::from("**Fantasy Sleepers (Undervalued Players):**\n\n");
            s.push_str(&fantasy_list(&sleepers));
            s.push_str("\n**Tip:** These players offer great value in later rounds!");
            return s;
        }

        let n = query.requested_count().unwrap_or(self.config.draft_list_size);
        let picks = top_n(self.table.players(), n);
        let mut s = format!("**Top {} Draft Picks for Fantasy:**\n\n", picks.len());
        s.push_str(&fantasy_list(&picks));
        s.push_str("\n**Tip:** These players provide the most consistent fantasy value!");
        s
    }

    fn answer_comparison(&self, query: &Query<'_>) -> String {
        // "&" and "," fold away to spaces, so mark them as separators first.
        let marked = query.raw.replace(['&', ','], " and ");
        let folded = fold(&marked);

        let mut segments: Vec<Vec<&str>> = vec![Vec::new()];
        for word in words(&folded) {
            if COMPARISON_SEPARATORS.contains(&word) {
                segments.push(Vec::new());
            } else if !is_stop_word(word) {
                if let Some(current) = segments.last_mut() {
                    current.push(word);
                }
            }
        }
        let names: Vec<String> = segments
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.join(" "))
            .collect();
        if names.len() < 2 {
            return COMPARISON_GUIDANCE.to_string();
        }

        let mut players: Vec<&PlayerRecord> = Vec::new();
        for name in &names {
            if let Some(p) = self.find_player(name) {
                if !players.iter().any(|q| q.name == p.name) {
                    players.push(p);
                }
            }
        }
        if players.len() < 2 {
            return COMPARISON_NOT_FOUND.to_string();
        }

        let mut s = String::from("**Player Comparison:**\n\n");
        for p in &players {
            s.push_str(&format!("**{}** ({}):\n", p.name, p.team));
            s.push_str(&format!("- Fantasy Points: {:.1}\n", p.fantasy_points));
            s.push_str(&format!(
                "- Points: {:.1} | Rebounds: {:.1} | Assists: {:.1}\n",
                p.stats.pts, p.stats.trb, p.stats.ast
            ));
            s.push_str(&format!("- Player Type: {}\n\n", p.player_type));
        }
        if let Some(winner) = players.iter().min_by(|a, b| compare_fantasy(a, b)) {
            s.push_str(&format!(
                "**Fantasy Winner:** {} with {:.1} fantasy points!",
                winner.name, winner.fantasy_points
            ));
        }
        s
    }

    fn answer_team(&self, query: &Query<'_>) -> String {
        let Some(franchise) = find_franchise(query) else {
            if query.mentions("teams") {
                return self.team_overview();
            }
            return TEAM_GUIDANCE.to_string();
        };

        let roster = self
            .table
            .players()
            .iter()
            .filter(|p| franchise.codes.iter().any(|c| p.team.eq_ignore_ascii_case(c)));
        let n = query.requested_count().unwrap_or(self.config.list_size);
        let top = top_n(roster, n);
        if top.is_empty() {
            return format!(
                "I couldn't find players for the {} in the current dataset.",
                franchise.name
            );
        }

        let mut s = format!("**Top {} Players:**\n\n", franchise.name);
        for (i, p) in top.iter().enumerate() {
            s.push_str(&format!(
                "{}. **{}** ({}) - {:.1} FP\n",
                i + 1,
                p.name,
                p.position,
                p.fantasy_points
            ));
        }
        s
    }

    fn team_overview(&self) -> String {
        let summaries = team_summaries(self.table.players());
        if summaries.is_empty() {
            return EMPTY_TABLE.to_string();
        }
        let mut s = String::from("**Top Teams by Average Fantasy Points:**\n\n");
        for (i, t) in summaries.iter().take(self.config.list_size).enumerate() {
            s.push_str(&format!(
                "{}. **{}** - {:.1} avg FP ({} players)\n",
                i + 1,
                t.team,
                t.avg_fantasy_points,
                t.player_count
            ));
        }
        s
    }

    fn answer_position(&self, query: &Query<'_>) -> String {
        let Some(group) = POSITION_GROUPS.iter().find(|g| query.mentions_any(g.phrases)) else {
            return self.position_overview();
        };
        if self.table.is_empty() {
            return EMPTY_TABLE.to_string();
        }

        let at_position = self
            .table
            .players()
            .iter()
            .filter(|p| group.positions.contains(&p.position));
        let n = query.requested_count().unwrap_or(self.config.list_size);
        let top = top_n(at_position, n);
        if top.is_empty() {
            return format!("No {} found in the current dataset.", group.label.to_lowercase());
        }

        let mut s = format!("**Top {}:**\n\n", group.label);
        s.push_str(&fantasy_list(&top));
        s
    }

    fn position_overview(&self) -> String {
        let summaries = position_summaries(self.table.players());
        if summaries.is_empty() {
            return EMPTY_TABLE.to_string();
        }
        let mut s = String::from("**Position Overview:**\n\n");
        for p in &summaries {
            s.push_str(&format!(
                "- **{}** ({} players): {:.1} avg FP, {:.1} PPG, {:.1} RPG, {:.1} APG\n",
                p.position.plural_name(),
                p.player_count,
                p.avg_fantasy_points,
                p.avg_points,
                p.avg_rebounds,
                p.avg_assists
            ));
        }
        s
    }
}
