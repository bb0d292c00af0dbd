use thiserror::Error;

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;

/// Error returned to the caller of any room action.
///
/// Every variant carries the [`ErrorCode`] the transport layer forwards to
/// the acting player; other room members never see a rejected action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { code, .. } => *code,
        }
    }

    /// Helper method to extract error detail from any error variant
    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. } => detail,
            AppError::NotFound { detail, .. } => detail,
            AppError::Conflict { detail, .. } => detail,
            AppError::Config { detail } => detail,
            AppError::Internal { detail, .. } => detail,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn room_not_found(room_code: &str) -> Self {
        Self::NotFound {
            code: ErrorCode::RoomNotFound,
            detail: format!("Room {room_code} not found"),
        }
    }

    pub fn room_unavailable(room_code: &str) -> Self {
        Self::Internal {
            code: ErrorCode::RoomUnavailable,
            detail: format!("Room {room_code} is no longer accepting actions"),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::Internal,
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::OutOfTurn
                    | ValidationKind::CardNotInHand
                    | ValidationKind::MustFollowSuit
                    | ValidationKind::NothingToDraw => ErrorCode::InvalidMove,
                    ValidationKind::InvalidMeld => ErrorCode::InvalidMeld,
                    ValidationKind::KnockNotEligible => ErrorCode::KnockNotEligible,
                    ValidationKind::PhaseMismatch => ErrorCode::InvalidPhase,
                    ValidationKind::NotWaiting => ErrorCode::GameNotInWaitingState,
                    ValidationKind::NotEnoughPlayers => ErrorCode::NotEnoughPlayers,
                    ValidationKind::WrongGame => ErrorCode::UnsupportedAction,
                    ValidationKind::ParseCard => ErrorCode::ParseCard,
                    ValidationKind::Other(_) => ErrorCode::InvalidMove,
                };
                AppError::Validation { code, detail }
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Room => ErrorCode::RoomNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                    NotFoundKind::Other(_) => ErrorCode::Internal,
                };
                AppError::NotFound { code, detail }
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::RoomFull => ErrorCode::RoomFull,
                    ConflictKind::AlreadyVoted => ErrorCode::AlreadyVoted,
                    ConflictKind::RoomCodeExhausted => ErrorCode::RoomCodeExhausted,
                    ConflictKind::Other(_) => ErrorCode::Internal,
                };
                AppError::Conflict { code, detail }
            }
            DomainError::Infra(kind, detail) => {
                let code = match kind {
                    InfraErrorKind::InvariantViolation => ErrorCode::InvariantViolation,
                    InfraErrorKind::RoomUnavailable => ErrorCode::RoomUnavailable,
                    InfraErrorKind::Other(_) => ErrorCode::Internal,
                };
                AppError::Internal { code, detail }
            }
        }
    }
}
