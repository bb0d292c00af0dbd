//! Bondi: shedding trick game where an off-suit play interrupts the trick
//! and hands every card in it to the current leader.

pub mod lobby;
pub mod state;
pub mod tricks;

#[cfg(test)]
pub(crate) mod test_helpers;
#[cfg(test)]
mod tests_tricks;
#[cfg(test)]
mod tests_win_condition;

pub use state::{BondiGameState, BondiPlayer, BondiStatus, TrickPlay};
pub use tricks::{
    check_win_condition, is_valid_move, legal_moves, process_turn, validate_move, PlayCardResult,
    TrickResolution,
};

/// Max ring-buffer size for the Bondi event log.
pub const BONDI_LOG_CAPACITY: usize = 50;
/// Default seat cap for a Bondi room.
pub const BONDI_MAX_PLAYERS: usize = 8;
pub const BONDI_MIN_PLAYERS: usize = 2;
