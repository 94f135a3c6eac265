//! SDK error types.
//!
//! The host primitives themselves have no failure channel in this ABI, so
//! errors only arise from conversions the SDK performs on the guest side.

use thiserror::Error;

/// Errors produced while converting data crossing the plugin boundary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("host-provided data is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed JSON at the host boundary")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using the SDK error.
pub type Result<T> = std::result::Result<T, Error>;
