//! Document registry for one catalog run.
//!
//! The registry owns every namespace and record discovered while extracting a project. It
//! is created at the start of a run, passed by reference to the extractor for each file and
//! read by the presentation layer afterwards. Entries are only ever appended.

use crate::error::{Error, Result};
use crate::record::{DocTag, GeneralHandlerRecord, RouteRecord, SourceLocation};
use crate::tags::{register_padrino_tags, TagLibrary};
use log::{debug, warn};
use std::collections::HashSet;

/// Namespace path separator.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Path of the root namespace.
pub const ROOT: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceKind {
    Root,
    Class,
    Module,
}

/// A class or module that can own records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceEntity {
    pub path: String,
    pub kind: NamespaceKind,
    /// First place the namespace was seen; `None` for the root
    pub location: Option<SourceLocation>,
}

/// Outcome of registering a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The record was added under this path
    Added(String),
    /// The same declaration was already registered under this path; the new one was not added
    Duplicate(String),
    /// A different declaration reduced to the same path; the new one was not added
    Collision(String),
}

#[derive(Debug)]
pub struct Registry {
    tags: TagLibrary,
    namespaces: Vec<NamespaceEntity>,
    routes: Vec<RouteRecord>,
    handlers: Vec<GeneralHandlerRecord>,
    paths: HashSet<String>,
    next_handler_serial: u64,
}

impl Default for Registry {
    fn default() -> Self {
        let mut tags = TagLibrary::new();
        register_padrino_tags(&mut tags);
        Self::with_tags(tags)
    }
}

impl Registry {
    /// Creates a registry with the condition tag already defined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry over an explicitly prepared tag library.
    pub fn with_tags(tags: TagLibrary) -> Self {
        Self {
            tags,
            namespaces: vec![NamespaceEntity {
                path: ROOT.to_string(),
                kind: NamespaceKind::Root,
                location: None,
            }],
            routes: Vec::new(),
            handlers: Vec::new(),
            paths: HashSet::new(),
            next_handler_serial: 0,
        }
    }

    pub fn tags(&self) -> &TagLibrary {
        &self.tags
    }

    /// Registers `name` as a namespace under `parent` and returns its path.
    ///
    /// Whitespace in `name` is ignored and a leading `::` anchors it at the root. Every
    /// `::`-separated segment must be a constant-like word. Registering an existing
    /// namespace again returns its path without changes.
    ///
    /// # Arguments
    ///
    /// * `parent` - Path of the enclosing namespace, [`ROOT`] at top level
    /// * `name` - Namespace name as written in source, e.g. `Admin::App`
    /// * `kind` - Whether a class or a module introduced the namespace
    /// * `location` - Where the namespace was first seen
    ///
    /// # Returns
    ///
    /// The full `::`-joined path of the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNamespace`] if `parent` was never registered and
    /// [`Error::MalformedNamespace`] if `name` has an empty or non-constant segment.
    pub fn register_namespace(
        &mut self,
        parent: &str,
        name: &str,
        kind: NamespaceKind,
        location: SourceLocation,
    ) -> Result<String> {
        self.require_namespace(parent)?;

        let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        let (base, relative) = match compact.strip_prefix(NAMESPACE_SEPARATOR) {
            Some(rest) => (ROOT, rest),
            None => (parent, compact.as_str()),
        };

        let malformed = || Error::MalformedNamespace {
            parent: parent.to_string(),
            name: name.to_string(),
        };
        if relative.is_empty() || !relative.split(NAMESPACE_SEPARATOR).all(is_namespace_segment) {
            return Err(malformed());
        }

        let path = if base.is_empty() {
            relative.to_string()
        } else {
            format!("{}{}{}", base, NAMESPACE_SEPARATOR, relative)
        };

        if self.namespace(&path).is_none() {
            debug!("Registering namespace {}", path);
            self.namespaces.push(NamespaceEntity {
                path: path.clone(),
                kind,
                location: Some(location),
            });
        }
        Ok(path)
    }

    /// Hands out the next handler serial number.
    pub fn next_handler_serial(&mut self) -> u64 {
        let serial = self.next_handler_serial;
        self.next_handler_serial += 1;
        serial
    }

    /// Adds a route under its `namespace#identifier` path.
    ///
    /// Route identifiers carry no disambiguator, so a second route reducing to an existing
    /// path is not added. A repeat of the same declaration (same controller and arguments)
    /// is a [`Registration::Duplicate`]; a different declaration whose identifier only
    /// matches after sanitising (`"/a-b"` and `"/a_b"`, `:index` and `"index"`) is a
    /// [`Registration::Collision`]. Both keep the first route and log a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNamespace`] if the route's namespace was never registered and
    /// [`Error::UnknownTag`] if it carries a tag the tag library does not define.
    pub fn register_route(&mut self, route: RouteRecord) -> Result<Registration> {
        self.check(route.namespace(), route.tags())?;
        let path = route.path();
        if self.paths.contains(&path) {
            let existing = self.routes.iter().find(|r| r.path() == path);
            let repeated = existing.is_some_and(|first| {
                first.args() == route.args() && first.controller() == route.controller()
            });
            if repeated {
                warn!(
                    "Route {} at {}:{} repeats an earlier declaration; keeping the first",
                    route.display_name(),
                    route.location().file.display(),
                    route.location().line
                );
                return Ok(Registration::Duplicate(path));
            }
            warn!(
                "Route {} at {}:{} has the same identifier as {} ({}); keeping the first",
                route.display_name(),
                route.location().file.display(),
                route.location().line,
                existing.map_or("an earlier route", |first| first.display_name()),
                path
            );
            return Ok(Registration::Collision(path));
        }
        self.paths.insert(path.clone());
        debug!("Registered route {}", path);
        self.routes.push(route);
        Ok(Registration::Added(path))
    }

    /// Adds a general handler under its `namespace#identifier` path.
    ///
    /// Handler identifiers end in a registry-issued serial (see
    /// [`Registry::next_handler_serial`]), so handlers built from it never collide.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::register_route`].
    pub fn register_handler(&mut self, handler: GeneralHandlerRecord) -> Result<Registration> {
        self.check(handler.namespace(), handler.tags())?;
        let path = handler.path();
        if !self.paths.insert(path.clone()) {
            return Ok(Registration::Duplicate(path));
        }
        debug!("Registered handler {}", path);
        self.handlers.push(handler);
        Ok(Registration::Added(path))
    }

    fn check(&self, namespace: &str, tags: &[DocTag]) -> Result<()> {
        self.require_namespace(namespace)?;
        match tags.iter().find(|tag| !self.tags.is_defined(&tag.tag_name)) {
            Some(tag) => Err(Error::UnknownTag(tag.tag_name.clone())),
            None => Ok(()),
        }
    }

    fn require_namespace(&self, path: &str) -> Result<()> {
        match self.namespace(path) {
            Some(_) => Ok(()),
            None => Err(Error::UnknownNamespace(path.to_string())),
        }
    }

    pub fn namespace(&self, path: &str) -> Option<&NamespaceEntity> {
        self.namespaces.iter().find(|ns| ns.path == path)
    }

    pub fn namespaces(&self) -> &[NamespaceEntity] {
        &self.namespaces
    }

    /// All routes in registration order.
    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// All general handlers in registration order.
    pub fn handlers(&self) -> &[GeneralHandlerRecord] {
        &self.handlers
    }

    pub fn routes_in<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a RouteRecord> {
        self.routes.iter().filter(move |r| r.namespace() == namespace)
    }

    pub fn handlers_in<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = &'a GeneralHandlerRecord> {
        self.handlers.iter().filter(move |h| h.namespace() == namespace)
    }
}

fn is_namespace_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
