//! Error types for GapForge.

use thiserror::Error;

/// Maximum number of characters of raw upstream output carried in a [`Error::Parse`].
pub const EXCERPT_CHARS: usize = 300;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{service} quota exceeded: {message}")]
    Quota {
        service: String,
        message: String,
        hint: String,
    },

    #[error("{service} request failed ({status}): {message}")]
    Upstream {
        service: String,
        status: u16,
        message: String,
    },

    #[error("{service} timed out after {seconds}s")]
    Timeout { service: String, seconds: u64 },

    #[error("Parse error: {message}")]
    Parse { message: String, excerpt: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification used by the HTTP layer and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ModelUnavailable,
    Configuration,
    ExternalService,
    Parse,
    Timeout,
    Cancelled,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::ModelUnavailable => "model_unavailable",
            ErrorKind::Configuration => "configuration_error",
            ErrorKind::ExternalService => "external_service_error",
            ErrorKind::Parse => "parse_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal_error",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Error::Config(_) => ErrorKind::Configuration,
            Error::Quota { .. } | Error::Upstream { .. } => ErrorKind::ExternalService,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Io(_) | Error::Json(_) | Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the failure originated in a network collaborator.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Error::Quota { .. } | Error::Upstream { .. } | Error::Timeout { .. }
        )
    }

    /// Build a parse error carrying a bounded excerpt of the raw payload.
    pub fn parse(message: impl Into<String>, raw: &str) -> Self {
        Error::Parse {
            message: message.into(),
            excerpt: excerpt(raw, EXCERPT_CHARS),
        }
    }
}

/// Truncate `raw` to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn excerpt(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
