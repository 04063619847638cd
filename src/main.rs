mod cli;
mod commands;
mod error;
mod output;
mod page_range;
mod pdf;
mod printer;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use commands::split::Outcome;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let backend = printer::detect();

    let Some(request) = cli.split_request()? else {
        let listing =
            commands::printers::list(backend.as_ref()).context("failed to list printers")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            commands::printers::print_listing(&listing);
        }
        return Ok(());
    };

    let outcome = commands::split::run(&request, backend.as_ref())?;

    // Print failures are listed in the summary but don't change the exit status.
    match outcome {
        Outcome::Preview(preview) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                commands::split::print_preview(&preview);
            }
        }
        Outcome::Completed(summary) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                commands::split::print_summary(&summary);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("pdfchunk={}", level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
