//! Error codes for the rewards API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and appears verbatim in the `code`
//! member of problem responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Access denied
    Forbidden,

    // Request validation
    /// Negative or otherwise malformed score/duration
    InvalidScore,
    /// Score not reachable in the reported duration
    ImplausibleScore,
    /// Unknown or unsupported game kind
    InvalidGameKind,
    /// Wallet address has the wrong shape
    InvalidWallet,
    /// Query/path parameter out of range
    InvalidParameter,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Quota denials
    /// Daily earn cap reached
    DailyLimitReached,
    /// Per-game play cap reached for today
    GameDailyLimitReached,
    /// Per-game earn cap reached for today
    GameRewardCapReached,
    /// Per-game cooldown still running
    CooldownActive,

    // Resource not found
    /// Player not found
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Submission key already used by a different result
    DuplicateSubmission,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generic conflict
    Conflict,

    // System errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Submission did not complete in the allotted time
    SubmissionTimeout,

    // Database constraint violations
    /// Unique constraint violation (SQLSTATE 23505)
    UniqueViolation,
    /// Foreign key constraint violation (SQLSTATE 23503)
    FkViolation,
    /// Check constraint violation (SQLSTATE 23514)
    CheckViolation,
    /// Record not found (DB-driven)
    RecordNotFound,

    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Stored data could not be decoded
    DataCorruption,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::Forbidden => "FORBIDDEN",

            Self::InvalidScore => "INVALID_SCORE",
            Self::ImplausibleScore => "IMPLAUSIBLE_SCORE",
            Self::InvalidGameKind => "INVALID_GAME_KIND",
            Self::InvalidWallet => "INVALID_WALLET",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::DailyLimitReached => "DAILY_LIMIT_REACHED",
            Self::GameDailyLimitReached => "GAME_DAILY_LIMIT_REACHED",
            Self::GameRewardCapReached => "GAME_REWARD_CAP_REACHED",
            Self::CooldownActive => "COOLDOWN_ACTIVE",

            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::DuplicateSubmission => "DUPLICATE_SUBMISSION",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::SubmissionTimeout => "SUBMISSION_TIMEOUT",

            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",
            Self::CheckViolation => "CHECK_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",

            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }

    /// All codes, for uniqueness checks.
    pub const ALL: &'static [ErrorCode] = &[
        Self::Unauthorized,
        Self::UnauthorizedMissingBearer,
        Self::UnauthorizedInvalidJwt,
        Self::UnauthorizedExpiredJwt,
        Self::Forbidden,
        Self::InvalidScore,
        Self::ImplausibleScore,
        Self::InvalidGameKind,
        Self::InvalidWallet,
        Self::InvalidParameter,
        Self::ValidationError,
        Self::BadRequest,
        Self::DailyLimitReached,
        Self::GameDailyLimitReached,
        Self::GameRewardCapReached,
        Self::CooldownActive,
        Self::PlayerNotFound,
        Self::NotFound,
        Self::DuplicateSubmission,
        Self::OptimisticLock,
        Self::Conflict,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::SubmissionTimeout,
        Self::UniqueViolation,
        Self::FkViolation,
        Self::CheckViolation,
        Self::RecordNotFound,
        Self::Internal,
        Self::ConfigError,
        Self::DataCorruption,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
