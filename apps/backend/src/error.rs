use thiserror::Error;

use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;

/// Service-level error returned by every game-flow operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Invariant violated: {detail}")]
    Invariant { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Invariant { .. } => ErrorCode::InvariantViolation,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Invariant { detail }
            | AppError::Config { detail }
            | AppError::Internal { detail } => detail,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                    ValidationKind::OutOfTurn => ErrorCode::OutOfTurn,
                    ValidationKind::CardNotInHand => ErrorCode::CardNotInHand,
                    ValidationKind::InvalidCombination => ErrorCode::InvalidCombination,
                    ValidationKind::ShapeMismatch => ErrorCode::ShapeMismatch,
                    ValidationKind::CountMismatch => ErrorCode::CountMismatch,
                    ValidationKind::DoesNotBeat => ErrorCode::DoesNotBeat,
                    ValidationKind::EmptyPlay => ErrorCode::EmptyPlay,
                    ValidationKind::ParseCard => ErrorCode::ParseCard,
                    ValidationKind::InvalidVote => ErrorCode::InvalidVote,
                    ValidationKind::PlayerEliminated => ErrorCode::PlayerEliminated,
                    ValidationKind::CheatNotAllowed => ErrorCode::CheatNotAllowed,
                    ValidationKind::InvestigationNotAllowed => ErrorCode::InvestigationNotAllowed,
                    ValidationKind::InvalidTarget => ErrorCode::InvalidTarget,
                    ValidationKind::ChatLimitReached => ErrorCode::ChatLimitReached,
                    ValidationKind::InvalidSetup => ErrorCode::InvalidSetup,
                    ValidationKind::GameOver => ErrorCode::GameOver,
                    ValidationKind::Other(_) => ErrorCode::ValidationError,
                };
                AppError::invalid(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Game => ErrorCode::GameNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                    NotFoundKind::PendingCheat => ErrorCode::PendingCheatNotFound,
                    NotFoundKind::Other(_) => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::PendingCheatExists => ErrorCode::PendingCheatExists,
                    ConflictKind::AlreadyUsed => ErrorCode::AlreadyUsed,
                    ConflictKind::Other(_) => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::Invariant(detail) => AppError::Invariant { detail },
        }
    }
}
