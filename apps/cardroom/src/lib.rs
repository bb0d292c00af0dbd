#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod protocol;
pub mod session;
pub mod telemetry;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::EngineConfig;
pub use domain::{Card, GameKind, PlayerId, Rank, Suit};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use protocol::{handle_client_msg, ClientMsg, ServerMsg};
pub use session::{
    FinishedGame, GameState, HistorySink, InMemoryHistorySink, RoomAction, RoomSnapshot,
    SessionStore,
};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
