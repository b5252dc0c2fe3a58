//! Padrino Catalog - Command-line tool for documenting Padrino applications.
//!
//! Scans a project for Ruby sources, recognises Padrino route and handler declarations and
//! prints the resulting catalog, or a documentation statistics table.
//!
//! # Usage
//!
//! ```bash
//! padrino-catalog [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Write the catalog as YAML:
//! ```bash
//! padrino-catalog ./my-padrino-app -o catalog.yaml
//! ```
//!
//! Write the catalog as JSON:
//! ```bash
//! padrino-catalog ./my-padrino-app -f json -o catalog.json
//! ```
//!
//! Show how much of the app is documented:
//! ```bash
//! padrino-catalog ./my-padrino-app --stats
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use padrino_catalog::cli;

fn main() -> Result<()> {
    // Parse once so the verbose flag is known before the logger starts
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Padrino Catalog starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("Catalog generation completed successfully");

    Ok(())
}
