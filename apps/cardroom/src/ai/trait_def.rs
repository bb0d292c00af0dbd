use std::fmt;

use crate::error::AppError;
use crate::errors::domain::DomainError;

/// Errors that can occur during bot decision-making.
#[derive(Debug)]
pub enum AiError {
    /// Asked to act while it is not the bot's turn.
    NotBotsTurn(String),
    /// No legal option exists (empty hand, nothing to draw).
    NoLegalMove(String),
    /// The engine refused the bot's move.
    Rejected(DomainError),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::NotBotsTurn(id) => write!(f, "not {id}'s turn"),
            AiError::NoLegalMove(msg) => write!(f, "no legal move: {msg}"),
            AiError::Rejected(err) => write!(f, "bot move rejected: {err}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<DomainError> for AiError {
    fn from(err: DomainError) -> Self {
        AiError::Rejected(err)
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Rejected(domain) => AppError::from(domain),
            other => AppError::internal(format!("Bot error: {other}")),
        }
    }
}
