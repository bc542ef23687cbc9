//! inspect-yaml: print the parser event stream of a YAML document.
//!
//! Reads the document from stdin and writes one block per event to stdout.
//! Exits with status 1 if the parser cannot be created or rejects the input;
//! the events produced before the failure are still printed.

use anyhow::{Result, anyhow};
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print the YAML parser event stream of stdin
#[derive(Parser, Debug)]
#[command(name = "inspect-yaml")]
#[command(version)]
#[command(about = "Print the YAML event stream read from stdin", long_about = None)]
struct Cli {}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let _cli = Cli::parse();

    // Logs go to stderr so they never mix with the trace
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let stdin = io::stdin().lock();
    let mut out = BufWriter::new(io::stdout().lock());

    let result = yaml_event_stream::inspect(stdin, &mut out);
    out.flush().map_err(|e| anyhow!("Error writing output: {e}"))?;

    let summary = result?;
    tracing::debug!(events = summary.events, "done");
    Ok(())
}
