// Threshold-based tags and player archetypes.
//
// Both are tables of (label, predicate) pairs so each rule can be read and
// tested on its own. Tags are non-exclusive; the archetype is the first
// matching rule.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::player::StatLine;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Descriptive label attached when a stat threshold is met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tag {
    Shooter,
    #[serde(rename = "Board Man")]
    BoardMan,
    Playmaker,
    Scorer,
    Defender,
    Efficient,
    Clutch,
    #[serde(rename = "Iron Man")]
    IronMan,
}

impl Tag {
    pub fn label(&self) -> &'static str {
        match self {
            Tag::Shooter => "Shooter",
            Tag::BoardMan => "Board Man",
            Tag::Playmaker => "Playmaker",
            Tag::Scorer => "Scorer",
            Tag::Defender => "Defender",
            Tag::Efficient => "Efficient",
            Tag::Clutch => "Clutch",
            Tag::IronMan => "Iron Man",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One tag rule: the tag is attached when `applies` holds.
pub struct TagRule {
    pub tag: Tag,
    pub applies: fn(&StatLine) -> bool,
}

fn is_shooter(s: &StatLine) -> bool {
    s.three_pct_or_zero() > 0.40
}

fn is_board_man(s: &StatLine) -> bool {
    s.trb > 8.0
}

fn is_playmaker(s: &StatLine) -> bool {
    s.ast > 8.0
}

fn is_scorer(s: &StatLine) -> bool {
    s.pts > 25.0
}

fn is_defender(s: &StatLine) -> bool {
    s.stocks() > 3.0
}

fn is_efficient(s: &StatLine) -> bool {
    s.fg_pct_or_zero() > 0.55 && s.three_pct_or_zero() > 0.40
}

fn is_clutch(s: &StatLine) -> bool {
    s.ft_pct_or_zero() > 0.90
}

fn is_iron_man(s: &StatLine) -> bool {
    s.games > 75
}

/// Tag rules in the order tags are listed on a record.
pub static TAG_RULES: &[TagRule] = &[
    TagRule { tag: Tag::Shooter, applies: is_shooter },
    TagRule { tag: Tag::BoardMan, applies: is_board_man },
    TagRule { tag: Tag::Playmaker, applies: is_playmaker },
    TagRule { tag: Tag::Scorer, applies: is_scorer },
    TagRule { tag: Tag::Defender, applies: is_defender },
    TagRule { tag: Tag::Efficient, applies: is_efficient },
    TagRule { tag: Tag::Clutch, applies: is_clutch },
    TagRule { tag: Tag::IronMan, applies: is_iron_man },
];

/// Every tag whose rule holds for the stat line, in rule order.
pub fn assign_tags(stats: &StatLine) -> Vec<Tag> {
    TAG_RULES
        .iter()
        .filter(|rule| (rule.applies)(stats))
        .map(|rule| rule.tag)
        .collect()
}

// ---------------------------------------------------------------------------
// Archetypes
// ---------------------------------------------------------------------------

/// Single best-fit label derived from the stat profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerType {
    Playmaker,
    Rebounder,
    Scorer,
    Defender,
    #[serde(rename = "Role Player")]
    RolePlayer,
}

impl PlayerType {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerType::Playmaker => "Playmaker",
            PlayerType::Rebounder => "Rebounder",
            PlayerType::Scorer => "Scorer",
            PlayerType::Defender => "Defender",
            PlayerType::RolePlayer => "Role Player",
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Archetype rules, first match wins; `RolePlayer` when none match.
pub static ARCHETYPE_RULES: &[(PlayerType, fn(&StatLine) -> bool)] = &[
    (PlayerType::Playmaker, runs_offense),
    (PlayerType::Rebounder, crashes_boards),
    (PlayerType::Scorer, is_scorer),
    (PlayerType::Defender, is_defender),
];

fn runs_offense(s: &StatLine) -> bool {
    s.ast > 7.0
}

fn crashes_boards(s: &StatLine) -> bool {
    s.trb > 10.0
}

pub fn classify_player_type(stats: &StatLine) -> PlayerType {
    ARCHETYPE_RULES
        .iter()
        .find(|(_, applies)| applies(stats))
        .map(|(player_type, _)| *player_type)
        .unwrap_or(PlayerType::RolePlayer)
}
