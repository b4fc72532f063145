//! # Error Types
//!
//! Every fallible operation in `lib_sicap` returns [`SicapError`]. A non-200
//! answer from a retry-wrapped endpoint is *not* an error: the final
//! [`HttpResponse`](crate::retrieve::http::HttpResponse) is handed back and the
//! caller inspects its status.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SicapError>;

#[derive(Debug, Error)]
/// # Sicap Error
///
/// Failures that can surface from the client, the date helpers or the
/// configuration loaders.
pub enum SicapError {
    /// DNS, connect, TLS or timeout failure reported by the HTTP stack.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A request path could not be joined onto the portal base URL.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// A body could not be serialized or a response could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A local resource (CPV table, configuration file) could not be read.
    #[error("I/O error occurred: {0}")]
    Io(#[from] std::io::Error),

    /// The CPV resource was readable but not a flat `code -> description` object.
    #[error("Malformed CPV table: {0}")]
    CpvTable(String),

    /// Free-text date input matched none of the supported layouts.
    #[error("Unrecognised date: {0:?}")]
    InvalidDate(String),

    /// The portal answered with something other than 200 where no retry applies.
    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// A configuration value was present but could not be interpreted.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
