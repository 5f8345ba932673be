//! # Validate Subcommand
//!
//! `askenv validate <request|response> <file>`: validates one document and
//! reports either the normalized envelope or every violation.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use askenv_schema::{load_document, EnvelopeError, RequestValidator, ResponseValidator};

use crate::{load_policy, EnvelopeArg};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Which envelope the document holds.
    #[arg(value_enum)]
    pub kind: EnvelopeArg,

    /// Document to validate (.json, .yaml or .yml).
    pub path: PathBuf,

    /// Validation policy file (YAML).
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Print nothing when the document is valid.
    #[arg(long)]
    pub quiet: bool,

    /// Report violations as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Result of validating one document.
#[derive(Debug)]
pub struct ValidateReport {
    pub valid: bool,
    /// Normalized envelope when valid, violation report otherwise.
    pub output: String,
}

/// Validate the document named by `args`.
///
/// A document that fails validation is a report, not an error; errors are
/// reserved for unreadable inputs.
pub fn run(args: &ValidateArgs) -> anyhow::Result<ValidateReport> {
    let policy = load_policy(args.policy.as_deref())?;
    let document = load_document(&args.path)?;

    let validated = match args.kind {
        EnvelopeArg::Request => RequestValidator::new(&policy)
            .validate_envelope(&document)
            .map(|env| serde_json::to_string_pretty(&env)),
        EnvelopeArg::Response => ResponseValidator::new(&policy)
            .validate_envelope(&document)
            .map(|env| serde_json::to_string_pretty(&env)),
    };

    match validated {
        Ok(rendered) => {
            let output = rendered.context("rendering envelope")?;
            tracing::info!(path = %args.path.display(), kind = ?args.kind, "document is valid");
            Ok(ValidateReport {
                valid: true,
                output,
            })
        }
        Err(EnvelopeError::ValidationFailed { kind, violations }) => {
            tracing::info!(
                path = %args.path.display(),
                %kind,
                violations = violations.len(),
                "document is invalid"
            );
            let output = if args.json {
                serde_json::to_string_pretty(&violations).context("rendering violations")?
            } else {
                format!("{}: invalid {kind} envelope\n{violations}", args.path.display())
            };
            Ok(ValidateReport {
                valid: false,
                output,
            })
        }
        Err(other) => Err(other.into()),
    }
}
