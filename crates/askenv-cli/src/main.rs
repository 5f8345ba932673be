//! # askenv CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

/// Skill envelope validator.
///
/// Checks request and response envelopes exchanged between the voice
/// platform and a skill backend.
#[derive(Parser, Debug)]
#[command(name = "askenv", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a request or response document.
    Validate(askenv_cli::validate::ValidateArgs),
    /// Print the JSON Schema of an envelope.
    Schema(askenv_cli::schema::SchemaArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => {
            let report = askenv_cli::validate::run(&args)?;
            if report.valid {
                if !args.quiet {
                    println!("{}", report.output);
                }
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{}", report.output);
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Schema(args) => {
            println!("{}", askenv_cli::schema::run(&args)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
