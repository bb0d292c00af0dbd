//! Bot seats: heuristic decisions for both rule sets.
//!
//! Bots read the same state a room worker holds and act through the regular
//! engine operations, so every bot move passes the same validation as a
//! human move.

pub mod bondi_bot;
pub mod digu_bot;
mod trait_def;

pub use bondi_bot::choose_card;
pub use digu_bot::{play_turn, DiguBotTurn};
pub use trait_def::AiError;

/// Chance a bot takes a helpful discard instead of drawing blind.
pub const DISCARD_PICKUP_CHANCE: f64 = 0.7;
/// Chance an eligible bot knocks right away.
pub const KNOCK_CHANCE: f64 = 0.6;
