//! # Error Types
//!
//! Errors raised while constructing the foundational value types of this
//! crate. Envelope validation itself reports through the structured
//! violation collection in `askenv-schema`; these errors surface only when a
//! primitive is built directly (e.g. parsing a timestamp outside a
//! validator).

use thiserror::Error;

/// Top-level error type for `askenv-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    /// A timestamp string did not match the protocol format.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// An identifier failed its format check.
    #[error("invalid {kind}: {reason}")]
    InvalidIdentifier {
        /// Which identifier namespace rejected the value.
        kind: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
