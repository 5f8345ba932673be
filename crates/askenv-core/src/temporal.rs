//! # Temporal Types — Protocol Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp with seconds precision that
//! parses and renders the single wire format used by the skill protocol:
//!
//! ```text
//! YYYY-MM-DDTHH:MM:SSZ
//! ```
//!
//! ## Invariant
//!
//! Parsing is strict: only the fixed format is accepted. Fractional seconds
//! and explicit offsets (`+00:00` included) are rejected, so a parsed value
//! always re-renders to the exact literal it was parsed from.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AskError;

/// The wire format of every timestamp in an envelope.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A UTC-only timestamp with seconds precision.
///
/// Constructed only through [`Timestamp::parse()`] (or `FromStr` / serde,
/// which delegate to it), so every value came from a well-formed wire string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse a timestamp from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns [`AskError::InvalidTimestamp`] if the string does not match
    /// [`TIMESTAMP_FORMAT`] exactly.
    pub fn parse(s: &str) -> Result<Self, AskError> {
        let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|e| {
            AskError::InvalidTimestamp(format!(
                "expected format YYYY-MM-DDTHH:MM:SSZ, got {s:?}: {e}"
            ))
        })?;
        let ts = Self(naive.and_utc());
        // chrono accepts unpadded fields; the wire format does not.
        if ts.to_wire() != s {
            return Err(AskError::InvalidTimestamp(format!(
                "expected format YYYY-MM-DDTHH:MM:SSZ, got {s:?}: fields must be zero-padded"
            )));
        }
        Ok(ts)
    }

    /// Render in the wire format (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_wire(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl std::str::FromStr for Timestamp {
    type Err = AskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
