//! Error codes reported to the acting player.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that the transport layer sends back to the sender.

use core::fmt;

use serde::{Serialize, Serializer};

/// Centralized error codes for room actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lookup
    /// No room with the given code
    RoomNotFound,
    /// Player is not seated in the room
    PlayerNotFound,

    // Lobby
    /// All seats are taken
    RoomFull,
    /// Join/start attempted after the game left `waiting`
    GameNotInWaitingState,
    /// Too few players to start
    NotEnoughPlayers,

    // Play
    /// Wrong turn, card not held, or suit-follow violation
    InvalidMove,
    /// Too few cards, mixed rank/suit, Ace in a run, cards not held
    InvalidMeld,
    /// Deadwood above the knock threshold
    KnockNotEligible,
    /// Player already cast a ballot in the open vote
    AlreadyVoted,
    /// Action not legal in the current status
    InvalidPhase,
    /// Action belongs to the other game's rule set
    UnsupportedAction,
    /// Malformed card token in a request
    ParseCard,

    // System
    /// No unused room code could be generated
    RoomCodeExhausted,
    /// Card accounting or bookkeeping inconsistency; mutation refused
    InvariantViolation,
    /// Room worker is no longer running
    RoomUnavailable,
    /// Invalid configuration value
    ConfigError,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Get the canonical string representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::RoomFull => "ROOM_FULL",
            Self::GameNotInWaitingState => "GAME_NOT_IN_WAITING_STATE",
            Self::NotEnoughPlayers => "NOT_ENOUGH_PLAYERS",
            Self::InvalidMove => "INVALID_MOVE",
            Self::InvalidMeld => "INVALID_MELD",
            Self::KnockNotEligible => "KNOCK_NOT_ELIGIBLE",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::InvalidPhase => "INVALID_PHASE",
            Self::UnsupportedAction => "UNSUPPORTED_ACTION",
            Self::ParseCard => "PARSE_CARD",
            Self::RoomCodeExhausted => "ROOM_CODE_EXHAUSTED",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::RoomUnavailable => "ROOM_UNAVAILABLE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }

    /// Every code, in declaration order.
    pub const ALL: [ErrorCode; 17] = [
        Self::RoomNotFound,
        Self::PlayerNotFound,
        Self::RoomFull,
        Self::GameNotInWaitingState,
        Self::NotEnoughPlayers,
        Self::InvalidMove,
        Self::InvalidMeld,
        Self::KnockNotEligible,
        Self::AlreadyVoted,
        Self::InvalidPhase,
        Self::UnsupportedAction,
        Self::ParseCard,
        Self::RoomCodeExhausted,
        Self::InvariantViolation,
        Self::RoomUnavailable,
        Self::ConfigError,
        Self::Internal,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
