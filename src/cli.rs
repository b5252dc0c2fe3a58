use crate::catalog::CatalogDocument;
use crate::extractor::padrino::PadrinoExtractor;
use crate::extractor::{CatalogExtractor, ExtractionSummary};
use crate::parser::{AstParser, ParsedFile};
use crate::registry::Registry;
use crate::scanner::FileScanner;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use crate::stats::StatsReporter;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Padrino Catalog - Document the routes and handlers of a Padrino application
#[derive(Parser, Debug)]
#[command(name = "padrino-catalog")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Padrino project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Print the documentation statistics table instead of the catalog
    #[arg(short = 's', long = "stats")]
    pub stats: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    if args.stats {
        info!("Output: statistics table");
    } else {
        info!("Output format: {:?}", args.output_format);
    }
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Scans, parses and extracts a whole project into a fresh registry.
///
/// Files that fail to parse are skipped. A file whose extraction fails keeps whatever it
/// registered before the failure; the remaining files are still processed.
pub fn build_registry(project_path: &Path) -> Result<(Registry, ExtractionSummary)> {
    info!("Scanning project directory...");
    let scanner = FileScanner::new(project_path.to_path_buf());
    let scan_result = scanner.scan()?;

    info!("Found {} Ruby files", scan_result.ruby_files.len());
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }

    if scan_result.ruby_files.is_empty() {
        anyhow::bail!("No Ruby files found in the project directory");
    }

    info!("Parsing Ruby files...");
    let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.ruby_files)
        .into_iter()
        .filter_map(|r| match r {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("Skipping file due to parse error: {:#}", e);
                None
            }
        })
        .collect();

    info!("Successfully parsed {} files", parsed_files.len());

    if parsed_files.is_empty() {
        anyhow::bail!("No files could be parsed successfully");
    }

    info!("Extracting declarations...");
    let mut registry = Registry::new();
    let mut summary = ExtractionSummary::default();
    for file in &parsed_files {
        match PadrinoExtractor.extract(file, &mut registry) {
            Ok(file_summary) => summary.absorb(file_summary),
            Err(e) => warn!("Stopped extracting {}: {}", file.path.display(), e),
        }
    }

    info!(
        "Extracted {} routes and {} handlers ({} skipped)",
        summary.routes, summary.handlers, summary.skipped
    );
    if summary.routes == 0 && summary.handlers == 0 {
        warn!("No routes or handlers found in the project");
    }

    Ok((registry, summary))
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting catalog generation...");

    let (registry, summary) = build_registry(&args.project_path)?;
    let reporter = StatsReporter::with_padrino();

    let content = if args.stats {
        reporter.render(&registry)
    } else {
        let document = CatalogDocument::build(&registry, &reporter);
        info!("Serializing to {:?} format...", args.output_format);
        match args.output_format {
            OutputFormat::Yaml => serialize_yaml(&document)?,
            OutputFormat::Json => serialize_json(&document)?,
        }
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote catalog to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Namespaces: {}", registry.namespaces().len());
    info!("  - Routes found: {}", summary.routes);
    info!("  - Handlers found: {}", summary.handlers);

    Ok(())
}
