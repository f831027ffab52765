//! formfill binary
//!
//! Fills the credit agreement form for a single borrower or for every row of
//! a batch.

use anyhow::Context;
use clap::{Parser, Subcommand};
use form_batch::{load_config, run_batch, run_fill, BatchError, FillArgs};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "formfill")]
#[command(version, about = "Overlay borrower data onto a PDF form template")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill one form from key=value arguments
    ///
    /// Takes the bare key=value tokens of the single-form filler, e.g.
    /// `formfill fill input_pdf=Form1.pdf output_pdf=out.pdf ...`.
    ///
    /// Required: input_pdf, output_pdf, borrower_name, authorized_signatory,
    /// business_day, margin_amount, interest_rate. Optional: layout.
    Fill {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Fill one form per record of a batch configuration
    Batch {
        /// Batch configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Fill { args } => {
            let args = FillArgs::from_tokens(&args)?;
            let today = chrono::Local::now().date_naive();
            let output = run_fill(&args, today)
                .with_context(|| format!("Failed to fill {}", args.input_pdf.display()))?;
            println!("Wrote filled PDF to: {}", output.display());
        }
        Command::Batch { config } => {
            let batch = load_config(&config)?;
            let started_at = chrono::Local::now().naive_local();
            let report = run_batch(&batch, started_at)
                .with_context(|| format!("Batch {} failed", config.display()))?;
            println!("{}", report.summary());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries command output; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<BatchError>() {
                Some(BatchError::ArgumentError(message)) => eprintln!("{message}"),
                _ => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
