//! Declaration extraction.
//!
//! An extractor walks one parsed file and registers every route and handler declaration it
//! recognises into the run's [`Registry`]. Padrino's vocabulary is implemented by
//! [`padrino::PadrinoExtractor`].
//!
//! # Example
//!
//! ```no_run
//! use padrino_catalog::extractor::{CatalogExtractor, padrino::PadrinoExtractor};
//! use padrino_catalog::parser::AstParser;
//! use padrino_catalog::registry::Registry;
//! use std::path::Path;
//!
//! let parsed = AstParser::parse_file(Path::new("app/app.rb")).unwrap();
//! let mut registry = Registry::new();
//! let summary = PadrinoExtractor.extract(&parsed, &mut registry).unwrap();
//! println!("Found {} routes", summary.routes);
//! ```

pub mod context;
pub mod padrino;

use crate::error::Result;
use crate::parser::ParsedFile;
use crate::registry::Registry;

/// Trait for extracting catalog records from a parsed source file.
pub trait CatalogExtractor {
    /// Walks `file` once and registers every declaration found into `registry`.
    ///
    /// # Errors
    ///
    /// Registry failures (for instance a grouping call whose receiver is not a valid
    /// namespace name) abort the file and are returned to the caller. Declarations whose
    /// arguments cannot be read statically are skipped or degraded, never fatal.
    fn extract(&self, file: &ParsedFile, registry: &mut Registry) -> Result<ExtractionSummary>;
}

/// Counts of what one extraction pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Route records added to the registry
    pub routes: usize,
    /// General handler records added to the registry
    pub handlers: usize,
    /// Declarations that matched but could not be documented or collided with an earlier one
    pub skipped: usize,
}

impl ExtractionSummary {
    pub fn absorb(&mut self, other: ExtractionSummary) {
        self.routes += other.routes;
        self.handlers += other.handlers;
        self.skipped += other.skipped;
    }
}
