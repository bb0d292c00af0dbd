//! Domain-level error type used by the rule engines and the session layer.
//!
//! This error type is transport-agnostic. The session layer returns
//! `Result<T, crate::error::AppError>` and converts from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Validation kinds for rule violations a player can trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    OutOfTurn,
    CardNotInHand,
    MustFollowSuit,
    /// Draw source unavailable (empty discard pile, nothing left to reshuffle).
    NothingToDraw,
    InvalidMeld,
    KnockNotEligible,
    /// Action not legal in the room's current status.
    PhaseMismatch,
    /// Lobby action attempted after the game left `waiting`.
    NotWaiting,
    NotEnoughPlayers,
    /// Action belongs to the other game's rule set.
    WrongGame,
    ParseCard,
    Other(String),
}

/// Domain-level not found entities.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Room,
    Player,
    Other(String),
}

/// Domain-level conflict kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    RoomFull,
    AlreadyVoted,
    RoomCodeExhausted,
    Other(String),
}

/// Infra error kinds to distinguish operational failures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    /// Card accounting or turn bookkeeping no longer consistent.
    InvariantViolation,
    /// Room worker stopped or its queue closed.
    RoomUnavailable,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn player_not_found(player_id: &str) -> Self {
        Self::not_found(NotFoundKind::Player, format!("Player {player_id} is not seated"))
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::infra(InfraErrorKind::InvariantViolation, detail)
    }
}
