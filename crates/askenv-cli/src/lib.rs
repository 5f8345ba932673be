//! # askenv-cli — Envelope Validation from the Command Line
//!
//! Thin clap front end over `askenv-schema`, for checking captured or
//! hand-written envelopes during skill development and in CI.
//!
//! ## Subcommands
//!
//! - `validate` — validate a request or response document, print the
//!   normalized envelope or the violations
//! - `schema` — print the JSON Schema of a request or response envelope
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `askenv-schema` and return their output
//!   as strings; `main` decides where it is printed.

pub mod schema;
pub mod validate;

use std::path::Path;

use askenv_schema::{EnvelopeKind, ValidationPolicy};

/// Envelope selector shared by subcommands.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeArg {
    /// Inbound request envelope.
    Request,
    /// Outbound response envelope.
    Response,
}

impl From<EnvelopeArg> for EnvelopeKind {
    fn from(arg: EnvelopeArg) -> Self {
        match arg {
            EnvelopeArg::Request => EnvelopeKind::Request,
            EnvelopeArg::Response => EnvelopeKind::Response,
        }
    }
}

/// Load the policy file if one was given, else the default policy.
pub fn load_policy(path: Option<&Path>) -> anyhow::Result<ValidationPolicy> {
    match path {
        Some(path) => Ok(ValidationPolicy::load(path)?),
        None => Ok(ValidationPolicy::default()),
    }
}
