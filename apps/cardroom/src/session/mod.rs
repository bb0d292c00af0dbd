//! Room lifecycle: the session store, per-room workers and what they own.

pub mod chat;
pub mod history;
pub mod room;
pub mod room_code;
pub mod store;
mod worker;

pub use chat::{ChatKind, ChatMessage, CHAT_CAPACITY};
pub use history::{FinishedGame, HistorySink, InMemoryHistorySink, PlayerResult, TracingHistorySink};
pub use room::{apply_action, ActionCtx, GameState, Room, RoomAction, RoomSnapshot};
pub use store::SessionStore;
