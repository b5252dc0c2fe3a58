//! Summary statistics over a finished catalog.
//!
//! The reporter knows nothing about record kinds. Each extension that contributes catalog
//! entries implements [`CatalogStatistics`] and is registered with the reporter, which asks
//! every extension for its counters when rendering.

use crate::record::{HandlerRecord, Verb};
use crate::registry::Registry;
use serde::Serialize;

/// One named counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStatistic {
    pub name: String,
    pub total: usize,
    pub undocumented: usize,
}

/// Extension point for contributing counters to the statistics report.
pub trait CatalogStatistics {
    fn catalog_statistics(&self, registry: &Registry) -> Vec<CatalogStatistic>;
}

/// Route and handler counters.
pub struct PadrinoStatistics;

impl CatalogStatistics for PadrinoStatistics {
    fn catalog_statistics(&self, registry: &Registry) -> Vec<CatalogStatistic> {
        vec![
            count("P) Handlers", registry.handlers()),
            count("P) Routes", registry.routes()),
        ]
    }
}

fn count<V: Verb>(name: &str, records: &[HandlerRecord<V>]) -> CatalogStatistic {
    CatalogStatistic {
        name: name.to_string(),
        total: records.len(),
        undocumented: records.iter().filter(|r| !r.is_documented()).count(),
    }
}

/// Collects counters from the registered extensions.
#[derive(Default)]
pub struct StatsReporter {
    extensions: Vec<Box<dyn CatalogStatistics>>,
}

impl StatsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reporter with the Padrino counters registered.
    pub fn with_padrino() -> Self {
        let mut reporter = Self::new();
        reporter.register(Box::new(PadrinoStatistics));
        reporter
    }

    pub fn register(&mut self, extension: Box<dyn CatalogStatistics>) {
        self.extensions.push(extension);
    }

    pub fn collect(&self, registry: &Registry) -> Vec<CatalogStatistic> {
        self.extensions
            .iter()
            .flat_map(|ext| ext.catalog_statistics(registry))
            .collect()
    }

    /// Renders one aligned line per counter.
    pub fn render(&self, registry: &Registry) -> String {
        self.collect(registry)
            .iter()
            .map(|stat| {
                let label = format!("{}:", stat.name);
                let mut line = format!("{:<21} {:>6}", label, stat.total);
                if stat.undocumented > 0 {
                    line.push_str(&format!(" ({:>5} undocumented)", stat.undocumented));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
