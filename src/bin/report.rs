//! Evaluate a YAML design file and print the results.

use clap::Parser;
use evtol::config::DesignConfig;
use evtol::report::DesignReport;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Conceptual design report for an eVTOL configuration
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Design file (YAML)
    config: PathBuf,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn run(args: &Args) -> evtol::utils::errors::Result<()> {
    let config = DesignConfig::from_file(&args.config)?;
    let report = DesignReport::evaluate(&config)?;
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
