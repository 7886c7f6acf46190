//! Failure taxonomy surfaced by note store clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes reported by the remote note service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadDataFormat,
    PermissionDenied,
    InternalError,
    DataRequired,
    LimitReached,
    QuotaReached,
    InvalidAuth,
    AuthExpired,
    DataConflict,
    EnmlValidation,
    ShardUnavailable,
    LenTooShort,
    LenTooLong,
    TooFew,
    TooMany,
    UnsupportedOperation,
    TakenDown,
    RateLimitReached,
    #[serde(other)]
    Unknown,
}

impl ErrorCode {
    /// Returns the wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadDataFormat => "BAD_DATA_FORMAT",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::DataRequired => "DATA_REQUIRED",
            ErrorCode::LimitReached => "LIMIT_REACHED",
            ErrorCode::QuotaReached => "QUOTA_REACHED",
            ErrorCode::InvalidAuth => "INVALID_AUTH",
            ErrorCode::AuthExpired => "AUTH_EXPIRED",
            ErrorCode::DataConflict => "DATA_CONFLICT",
            ErrorCode::EnmlValidation => "ENML_VALIDATION",
            ErrorCode::ShardUnavailable => "SHARD_UNAVAILABLE",
            ErrorCode::LenTooShort => "LEN_TOO_SHORT",
            ErrorCode::LenTooLong => "LEN_TOO_LONG",
            ErrorCode::TooFew => "TOO_FEW",
            ErrorCode::TooMany => "TOO_MANY",
            ErrorCode::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            ErrorCode::TakenDown => "TAKEN_DOWN",
            ErrorCode::RateLimitReached => "RATE_LIMIT_REACHED",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by a [`NoteStore`](crate::service::NoteStore).
///
/// Every variant is unrecoverable for the current run except `NotFound`,
/// which only concerns a single note.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service rejected the request because of credentials, quota or an
    /// invalid parameter.
    #[error("{}", user_message(.code, .parameter))]
    User {
        code: ErrorCode,
        parameter: Option<String>,
    },

    /// The service failed internally.
    #[error("system error: {code}{}", detail(.message))]
    System {
        code: ErrorCode,
        message: Option<String>,
    },

    /// The service could not be reached or answered with garbage.
    #[error("networking error: {message}")]
    Transport { message: String },

    /// The requested object does not exist.
    #[error("{identifier} not found{}", detail(.key))]
    NotFound {
        identifier: String,
        key: Option<String>,
    },
}

/// Result type for note store operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Shorthand for a transport failure.
    pub fn transport(message: impl Into<String>) -> Self {
        ServiceError::Transport {
            message: message.into(),
        }
    }

    /// Returns the service error code, if the failure carries one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ServiceError::User { code, .. } | ServiceError::System { code, .. } => Some(*code),
            ServiceError::Transport { .. } | ServiceError::NotFound { .. } => None,
        }
    }

    /// Whether the failure affects the whole account rather than one note.
    ///
    /// Credential, quota, service and network failures would repeat for every
    /// remaining note of a batch.
    pub fn is_account_wide(&self) -> bool {
        !matches!(self, ServiceError::NotFound { .. })
    }
}

fn user_message(code: &ErrorCode, parameter: &Option<String>) -> String {
    match code {
        ErrorCode::AuthExpired => "authentication token is expired".to_string(),
        ErrorCode::InvalidAuth => "authentication token is invalid".to_string(),
        ErrorCode::QuotaReached => "account quota reached".to_string(),
        code => match parameter {
            Some(parameter) => format!("error {} for parameter '{}'", code, parameter),
            None => format!("error {}", code),
        },
    }
}

fn detail(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(|v| format!(" ({})", v))
        .unwrap_or_default()
}
