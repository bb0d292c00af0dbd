//! Digu: four-seat rummy. Players draw, discard and declare melds; a knock
//! ends the round and scores deadwood.

pub mod melds;
pub mod round;
pub mod scoring;
pub mod state;
pub mod vote;

#[cfg(test)]
pub(crate) mod test_helpers;
#[cfg(test)]
mod tests_melds;
#[cfg(test)]
mod tests_round;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_vote;

pub use melds::{calculate_deadwood, deadwood_cards, find_best_melds, validate_meld, MeldValidation};
pub use scoring::{can_knock, handle_drop, is_big_digu, process_knock, DropOutcome};
pub use state::{DiguGameState, DiguPlayer, DiguStatus, Meld, MeldKind, RoundResult};
pub use vote::{VoteOutcome, VoteProgress};

pub const DIGU_LOG_CAPACITY: usize = 100;
pub const DIGU_SEATS: usize = 4;
pub const DEFAULT_TARGET_SCORE: u32 = 100;

/// Highest deadwood that may still knock.
pub const KNOCK_THRESHOLD: u32 = 10;
pub const GIN_BONUS: u32 = 25;
pub const BIG_DIGU_BONUS: u32 = 50;
pub const UNDERCUT_BONUS: u32 = 25;
pub const DROP_PENALTY: u32 = 25;
