//! Shared error type across tracklet crates.

use thiserror::Error;

/// Stable error codes (used as log fields and in tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Page URL carries no `api_key`.
    MissingApiKey,
    /// IP or geo lookup failed.
    LookupFailed,
    /// Batch could not be delivered to the ingestion endpoint.
    TransmissionFailed,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingApiKey => "MISSING_API_KEY",
            ErrorCode::LookupFailed => "LOOKUP_FAILED",
            ErrorCode::TransmissionFailed => "TRANSMISSION_FAILED",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TrackletError>;

/// Unified error type used by core, collector and server.
#[derive(Debug, Error)]
pub enum TrackletError {
    #[error("missing api_key in page url")]
    MissingApiKey,
    #[error("lookup failed: {0}")]
    Lookup(String),
    #[error("transmission failed: {0}")]
    Transmission(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TrackletError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TrackletError::MissingApiKey => ErrorCode::MissingApiKey,
            TrackletError::Lookup(_) => ErrorCode::LookupFailed,
            TrackletError::Transmission(_) => ErrorCode::TransmissionFailed,
            TrackletError::BadConfig(_) => ErrorCode::BadConfig,
            TrackletError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            TrackletError::Internal(_) => ErrorCode::Internal,
        }
    }
}
