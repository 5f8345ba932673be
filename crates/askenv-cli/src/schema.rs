//! # Schema Subcommand
//!
//! `askenv schema <request|response>`: prints the envelope schema as a
//! JSON Schema document.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use askenv_schema::{request_schema, response_schema, to_json_schema};

use crate::{load_policy, EnvelopeArg};

/// Arguments for the schema subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Which envelope to describe.
    #[arg(value_enum)]
    pub kind: EnvelopeArg,

    /// Validation policy file (YAML). Affects predicate annotations only.
    #[arg(long)]
    pub policy: Option<PathBuf>,
}

/// Render the requested envelope schema as pretty-printed JSON.
pub fn run(args: &SchemaArgs) -> anyhow::Result<String> {
    let policy = load_policy(args.policy.as_deref())?;
    let tree = match args.kind {
        EnvelopeArg::Request => request_schema(&policy),
        EnvelopeArg::Response => response_schema(&policy),
    };
    serde_json::to_string_pretty(&to_json_schema(&tree)).context("rendering schema")
}
