//! Command-line interface for corpcode

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use corpcode::converters::{ConvertOptions, DEFAULT_INPUT, DEFAULT_OUTPUT};

#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "corpcode")]
#[command(
    author,
    version,
    about = "Convert a DART CORPCODE.xml registry to JSON keyed by company name",
    long_about = None
)]
struct Cli {
    /// Path to the XML registry
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Path of the JSON file to create or replace
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[cfg(feature = "cli")]
fn main() {
    // WARN by default, RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match corpcode::convert_with(&ConvertOptions::new(cli.input, cli.output)) {
        Ok(summary) => {
            println!(
                "✓ Conversion complete: {} companies written to {}",
                summary.companies,
                summary.output.display()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
