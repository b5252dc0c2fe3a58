//! Serializable view of a finished registry.
//!
//! The document mirrors how the catalog is presented: one section per namespace that owns
//! records, routes and handlers sorted with [`crate::ordering`] and grouped by controller,
//! followed by the summary counters.

use crate::ordering::{group_by_controller, sort_handlers, sort_routes, ControllerGroup};
use crate::record::{DocTag, HandlerRecord, Verb};
use crate::registry::Registry;
use crate::stats::{CatalogStatistic, StatsReporter};
use log::debug;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogDocument {
    pub namespaces: Vec<NamespaceSection>,
    pub statistics: Vec<CatalogStatistic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamespaceSection {
    /// Namespace path; empty for the root
    pub namespace: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<ControllerListing>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub handlers: Vec<ControllerListing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControllerListing {
    pub controller: String,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub identifier: String,
    pub name: String,
    pub verb: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionEntry>,
    pub group: String,
    pub file: PathBuf,
    pub line: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docstring: String,
}

/// A visible documentation tag, labelled with its tag kind's heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionEntry {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub text: String,
}

impl CatalogDocument {
    /// Builds the document for every namespace owning at least one record.
    pub fn build(registry: &Registry, reporter: &StatsReporter) -> Self {
        let mut namespaces = Vec::new();

        for namespace in registry.namespaces() {
            let mut routes: Vec<_> = registry.routes_in(&namespace.path).collect();
            let mut handlers: Vec<_> = registry.handlers_in(&namespace.path).collect();
            if routes.is_empty() && handlers.is_empty() {
                continue;
            }
            sort_routes(&mut routes);
            sort_handlers(&mut handlers);

            debug!(
                "Namespace {:?}: {} routes, {} handlers",
                namespace.path,
                routes.len(),
                handlers.len()
            );
            namespaces.push(NamespaceSection {
                namespace: namespace.path.clone(),
                routes: listings(registry, group_by_controller(&routes)),
                handlers: listings(registry, group_by_controller(&handlers)),
            });
        }

        namespaces.sort_by(|a, b| a.namespace.cmp(&b.namespace));

        Self {
            namespaces,
            statistics: reporter.collect(registry),
        }
    }

    pub fn route_count(&self) -> usize {
        self.namespaces
            .iter()
            .flat_map(|ns| &ns.routes)
            .map(|listing| listing.entries.len())
            .sum()
    }

    pub fn handler_count(&self) -> usize {
        self.namespaces
            .iter()
            .flat_map(|ns| &ns.handlers)
            .map(|listing| listing.entries.len())
            .sum()
    }
}

fn listings<V: Verb>(registry: &Registry, groups: Vec<ControllerGroup<'_, V>>) -> Vec<ControllerListing> {
    groups
        .into_iter()
        .map(|group| ControllerListing {
            controller: group.controller,
            entries: group
                .records
                .into_iter()
                .map(|record| entry(registry, record))
                .collect(),
        })
        .collect()
}

fn entry<V: Verb>(registry: &Registry, record: &HandlerRecord<V>) -> CatalogEntry {
    CatalogEntry {
        identifier: record.identifier().to_string(),
        name: record.display_name().to_string(),
        verb: record.verb().as_str().to_string(),
        controller: record.controller().map(String::from),
        args: record.args().iter().map(|arg| arg.inspect()).collect(),
        conditions: visible_tags(registry, record.tags()),
        group: record.group().to_string(),
        file: record.location().file.clone(),
        line: record.location().line,
        docstring: record.docstring().to_string(),
    }
}

fn visible_tags(registry: &Registry, tags: &[DocTag]) -> Vec<ConditionEntry> {
    let library = registry.tags();
    tags.iter()
        .filter(|tag| library.is_visible(&tag.tag_name))
        .filter_map(|tag| {
            library.definition(&tag.tag_name).map(|definition| ConditionEntry {
                label: definition.label.clone(),
                name: tag.name.clone(),
                text: tag.text.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::padrino::PadrinoExtractor;
    use crate::extractor::CatalogExtractor;
    use crate::parser::AstParser;
    use crate::tags::{TagLibrary, CONDITION_TAG};

    fn extract_into(registry: &mut Registry, code: &str) {
        let parsed = AstParser::parse_source(code, PathBuf::from("app.rb")).unwrap();
        PadrinoExtractor.extract(&parsed, registry).unwrap();
    }

    const APP: &str = r#"
class App
  controllers :users do
    post "/users"
    get "/users", :provides => :json
  end
  get "/"
  after do
  end
  before do
  end
end
"#;

    #[test]
    fn test_document_groups_and_sorts() {
        let mut registry = Registry::new();
        extract_into(&mut registry, APP);
        let doc = CatalogDocument::build(&registry, &StatsReporter::with_padrino());

        assert_eq!(doc.namespaces.len(), 1);
        let app = &doc.namespaces[0];
        assert_eq!(app.namespace, "App");

        let controllers: Vec<&str> = app.routes.iter().map(|l| l.controller.as_str()).collect();
        assert_eq!(controllers, vec!["", "users"]);
        let users: Vec<&str> = app.routes[1].entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(users, vec!["GET \"/users\"", "POST \"/users\""]);

        let hooks: Vec<&str> = app.handlers[0].entries.iter().map(|e| e.verb.as_str()).collect();
        assert_eq!(hooks, vec!["before", "after"]);

        assert_eq!(doc.route_count(), 3);
        assert_eq!(doc.handler_count(), 2);
        assert_eq!(doc.statistics.len(), 2);
    }

    #[test]
    fn test_conditions_are_labelled() {
        let mut registry = Registry::new();
        extract_into(&mut registry, APP);
        let doc = CatalogDocument::build(&registry, &StatsReporter::new());

        let get_users = &doc.namespaces[0].routes[1].entries[0];
        assert_eq!(
            get_users.conditions,
            vec![ConditionEntry {
                label: "Conditions".to_string(),
                name: Some(":provides".to_string()),
                text: "+:json+".to_string(),
            }]
        );
        assert!(doc.statistics.is_empty());
    }

    #[test]
    fn test_hidden_tags_are_left_out() {
        let mut tags = TagLibrary::new();
        tags.define_tag("Conditions", CONDITION_TAG, true);
        let mut registry = Registry::with_tags(tags);
        extract_into(&mut registry, APP);
        let doc = CatalogDocument::build(&registry, &StatsReporter::new());

        assert!(doc.namespaces[0]
            .routes
            .iter()
            .flat_map(|l| &l.entries)
            .all(|e| e.conditions.is_empty()));
    }

    #[test]
    fn test_empty_namespaces_are_omitted() {
        let mut registry = Registry::new();
        extract_into(&mut registry, "module Empty\nend\nclass App\n  get \"/\"\nend\n");
        let doc = CatalogDocument::build(&registry, &StatsReporter::new());

        let names: Vec<&str> = doc.namespaces.iter().map(|n| n.namespace.as_str()).collect();
        assert_eq!(names, vec!["App"]);
    }
}
