//! Shared helpers for the cardroom integration test binaries.

pub mod logging;
pub mod unique_helpers;

pub use unique_helpers::{unique_name, unique_player_id};
