//! Pure game rules. Nothing in here touches tasks, clocks or I/O; callers
//! pass in randomness and timestamps.

pub mod bondi;
pub mod bounded_log;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod digu;
pub mod invariants;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use cards_types::{Card, Rank, Suit};

pub type PlayerId = String;

/// Which rule set a room runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Bondi,
    Digu,
}

impl GameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Bondi => "bondi",
            GameKind::Digu => "digu",
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display names handed to bot seats, cycled by seat count.
pub const BOT_NAMES: [&str; 4] = ["Bot Aisha", "Bot Ahmed", "Bot Hana", "Bot Zain"];

pub fn bot_name(n: usize) -> &'static str {
    BOT_NAMES[n % BOT_NAMES.len()]
}

/// First `bot-N` id not already taken in the room.
pub fn next_bot_id<'a>(taken: impl IntoIterator<Item = &'a str>) -> PlayerId {
    let taken: HashSet<&str> = taken.into_iter().collect();
    (0u32..)
        .map(|n| format!("bot-{n}"))
        .find(|id| !taken.contains(id.as_str()))
        .unwrap_or_default()
}

/// Ordinal label used in placement log lines.
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
