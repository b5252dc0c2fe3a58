//! Padrino Catalog - Static documentation of Padrino web applications.
//!
//! This library reads Ruby sources without executing them and catalogs the route
//! declarations (`get "/path"`) and request hooks (`before`, `after`, `error`) of Padrino
//! applications, together with the controller they belong to, their literal arguments and
//! their route conditions.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans project directories for Ruby files
//! 2. [`parser`] - Parses Ruby files with tree-sitter and lowers them into [`ast`] nodes
//! 3. [`literal`] - Converts literal syntax nodes into values and option maps
//! 4. [`extractor`] - Walks declarations, tracking the active controller
//! 5. [`record`] - Builds route and handler records from matched declarations
//! 6. [`registry`] - Stores namespaces and records for one run
//! 7. [`tags`] - Documentation tag kinds attached to records
//! 8. [`ordering`] - Presentation order and controller grouping
//! 9. [`stats`] - Documentation statistics
//! 10. [`catalog`] and [`serializer`] - The output document in YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use padrino_catalog::{
//!     catalog::CatalogDocument,
//!     extractor::{padrino::PadrinoExtractor, CatalogExtractor},
//!     parser::AstParser,
//!     registry::Registry,
//!     scanner::FileScanner,
//!     serializer::serialize_yaml,
//!     stats::StatsReporter,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./my-app")).scan().unwrap();
//! let parsed_files: Vec<_> = AstParser::parse_files(&scan_result.ruby_files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let mut registry = Registry::new();
//! for file in &parsed_files {
//!     PadrinoExtractor.extract(file, &mut registry).unwrap();
//! }
//!
//! let document = CatalogDocument::build(&registry, &StatsReporter::with_padrino());
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod ast;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod extractor;
pub mod literal;
pub mod ordering;
pub mod parser;
pub mod record;
pub mod registry;
pub mod scanner;
pub mod serializer;
pub mod stats;
pub mod tags;
