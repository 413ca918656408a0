//! Error codes for the daifugo backend.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE.

use core::fmt;

/// Centralized error codes surfaced at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Illegal actions
    /// Action not allowed in the current phase
    PhaseMismatch,
    /// Not this player's turn
    OutOfTurn,
    /// Card not in hand
    CardNotInHand,
    /// Cards do not form a recognised combination
    InvalidCombination,
    /// Combination shape differs from the table
    ShapeMismatch,
    /// Combination size differs from the table
    CountMismatch,
    /// Combination does not beat the table
    DoesNotBeat,
    /// No cards selected
    EmptyPlay,
    /// Card code could not be parsed
    ParseCard,
    /// Vote target or voter is not allowed
    InvalidVote,
    /// Player has been eliminated
    PlayerEliminated,
    /// Cheat attempt not permitted
    CheatNotAllowed,
    /// Investigation not permitted
    InvestigationNotAllowed,
    /// Target player not allowed
    InvalidTarget,
    /// Daily chat allowance exhausted
    ChatLimitReached,
    /// Game setup rejected
    InvalidSetup,
    /// Game already has winners
    GameOver,
    /// General validation error
    ValidationError,

    // Not found
    /// Game not found
    GameNotFound,
    /// Player not found
    PlayerNotFound,
    /// No pending cheat for this defender
    PendingCheatNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// A human-targeted cheat is already pending
    PendingCheatExists,
    /// One-shot allowance already used
    AlreadyUsed,
    /// Generic conflict
    Conflict,

    // System
    /// Engine invariant violated
    InvariantViolation,
    /// Configuration error
    ConfigError,
    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::InvalidCombination => "INVALID_COMBINATION",
            Self::ShapeMismatch => "SHAPE_MISMATCH",
            Self::CountMismatch => "COUNT_MISMATCH",
            Self::DoesNotBeat => "DOES_NOT_BEAT",
            Self::EmptyPlay => "EMPTY_PLAY",
            Self::ParseCard => "PARSE_CARD",
            Self::InvalidVote => "INVALID_VOTE",
            Self::PlayerEliminated => "PLAYER_ELIMINATED",
            Self::CheatNotAllowed => "CHEAT_NOT_ALLOWED",
            Self::InvestigationNotAllowed => "INVESTIGATION_NOT_ALLOWED",
            Self::InvalidTarget => "INVALID_TARGET",
            Self::ChatLimitReached => "CHAT_LIMIT_REACHED",
            Self::InvalidSetup => "INVALID_SETUP",
            Self::GameOver => "GAME_OVER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::PendingCheatNotFound => "PENDING_CHEAT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::PendingCheatExists => "PENDING_CHEAT_EXISTS",
            Self::AlreadyUsed => "ALREADY_USED",
            Self::Conflict => "CONFLICT",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
