use serde::Serialize;
use thiserror::Error;

/// Stable, caller-facing error codes
///
/// The string form is the lookup key for translated messages at the
/// HTTP boundary and must not change once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidCredentials,
    EmailExists,
    InvalidToken,
    TeamNotFound,
    PlayerNotFound,
    DoNotOwnPlayer,
    InsufficientFunds,
    PlayerNotForSale,
    OwnPlayerBuy,
    Unauthorized,
    EmailRequired,
    InvalidEmail,
    PasswordShort,
    PasswordTooLong,
    TeamNameRequired,
    CountryRequired,
    NameRequired,
    NameTooLong,
    InvalidPrice,
    InvalidJson,
    InternalError,
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::EmailExists => "email_exists",
            Self::InvalidToken => "invalid_token",
            Self::TeamNotFound => "team_not_found",
            Self::PlayerNotFound => "player_not_found",
            Self::DoNotOwnPlayer => "do_not_own_player",
            Self::InsufficientFunds => "insufficient_funds",
            Self::PlayerNotForSale => "player_not_for_sale",
            Self::OwnPlayerBuy => "own_player_buy",
            Self::Unauthorized => "unauthorized",
            Self::EmailRequired => "email_required",
            Self::InvalidEmail => "invalid_email",
            Self::PasswordShort => "password_short",
            Self::PasswordTooLong => "password_too_long",
            Self::TeamNameRequired => "team_name_required",
            Self::CountryRequired => "country_required",
            Self::NameRequired => "name_required",
            Self::NameTooLong => "name_too_long",
            Self::InvalidPrice => "invalid_price",
            Self::InvalidJson => "invalid_json",
            Self::InternalError => "internal_error",
            Self::ServiceUnavailable => "service_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Core domain errors
///
/// Business-rule failures carry an [`ErrorCode`] only. Infrastructure
/// failures carry internal detail that is logged, never shown to callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {code}")]
    Validation { code: ErrorCode },

    #[error("Unauthenticated: {code}")]
    Unauthenticated { code: ErrorCode },

    /// Nonexistence and ownership mismatch share this kind
    #[error("Not found: {code}")]
    NotFound { code: ErrorCode },

    #[error("Conflict: {code}")]
    Conflict { code: ErrorCode },

    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Store unreachable or timed out; safe to retry
    #[error("Service unavailable: {message}")]
    Unavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(code: ErrorCode) -> Self {
        Self::Validation { code }
    }

    pub fn unauthenticated(code: ErrorCode) -> Self {
        Self::Unauthenticated { code }
    }

    pub fn not_found(code: ErrorCode) -> Self {
        Self::NotFound { code }
    }

    pub fn conflict(code: ErrorCode) -> Self {
        Self::Conflict { code }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::unauthenticated(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token() -> Self {
        Self::unauthenticated(ErrorCode::InvalidToken)
    }

    pub fn duplicate_identity() -> Self {
        Self::conflict(ErrorCode::EmailExists)
    }

    pub fn team_not_found() -> Self {
        Self::not_found(ErrorCode::TeamNotFound)
    }

    pub fn player_not_found() -> Self {
        Self::not_found(ErrorCode::PlayerNotFound)
    }

    pub fn not_owned() -> Self {
        Self::not_found(ErrorCode::DoNotOwnPlayer)
    }

    pub fn not_listed() -> Self {
        Self::conflict(ErrorCode::PlayerNotForSale)
    }

    pub fn insufficient_funds() -> Self {
        Self::conflict(ErrorCode::InsufficientFunds)
    }

    pub fn self_transfer() -> Self {
        Self::conflict(ErrorCode::OwnPlayerBuy)
    }

    /// The code a caller is allowed to see
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code }
            | Self::Unauthenticated { code }
            | Self::NotFound { code }
            | Self::Conflict { code } => *code,
            Self::Unavailable { .. } => ErrorCode::ServiceUnavailable,
            Self::Storage { .. } | Self::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Whether the failure is transient and the caller may retry unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Whether the failure originates below the business rules
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Unavailable { .. } | Self::Internal { .. }
        )
    }
}
