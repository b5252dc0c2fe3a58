//! Catalog records and the builder that assembles them from a matched declaration.
//!
//! Records come in two flavours sharing one shape, [`HandlerRecord`]: routes
//! ([`RouteRecord`], one per `get`/`post`/... declaration) and general handlers
//! ([`GeneralHandlerRecord`], one per `before`/`after`/`error` hook). Records are immutable
//! once built.

use crate::literal::{ConditionSet, LiteralValue};
use crate::tags::CONDITION_TAG;
use std::fmt;
use std::path::PathBuf;

/// Separator between a namespace path and a record identifier.
pub const INSTANCE_SEPARATOR: &str = "#";

/// HTTP verbs that declare routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteVerb {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

/// Lifecycle hooks that declare general handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerVerb {
    Before,
    After,
    Error,
}

/// Behaviour shared by the two verb sets.
pub trait Verb: Copy + fmt::Debug {
    /// Stored form of the verb (`GET`, `before`, ...)
    fn as_str(&self) -> &'static str;
    /// Presentation priority; higher sorts first
    fn priority(&self) -> u8;
    /// Group label under which records of this kind are presented
    fn group() -> &'static str;
    /// Visibility records of this kind are documented with
    fn visibility() -> Visibility;
}

impl RouteVerb {
    /// Parses the lowercase method name used in source.
    pub fn from_method(name: &str) -> Option<Self> {
        match name {
            "get" => Some(RouteVerb::Get),
            "post" => Some(RouteVerb::Post),
            "put" => Some(RouteVerb::Put),
            "delete" => Some(RouteVerb::Delete),
            "head" => Some(RouteVerb::Head),
            _ => None,
        }
    }
}

impl Verb for RouteVerb {
    fn as_str(&self) -> &'static str {
        match self {
            RouteVerb::Get => "GET",
            RouteVerb::Post => "POST",
            RouteVerb::Put => "PUT",
            RouteVerb::Delete => "DELETE",
            RouteVerb::Head => "HEAD",
        }
    }

    fn priority(&self) -> u8 {
        match self {
            RouteVerb::Get => 5,
            RouteVerb::Post => 4,
            RouteVerb::Head => 3,
            RouteVerb::Put => 2,
            RouteVerb::Delete => 1,
        }
    }

    fn group() -> &'static str {
        "Padrino Routings"
    }

    fn visibility() -> Visibility {
        Visibility::Public
    }
}

impl HandlerVerb {
    pub fn from_method(name: &str) -> Option<Self> {
        match name {
            "before" => Some(HandlerVerb::Before),
            "after" => Some(HandlerVerb::After),
            "error" => Some(HandlerVerb::Error),
            _ => None,
        }
    }
}

impl Verb for HandlerVerb {
    fn as_str(&self) -> &'static str {
        match self {
            HandlerVerb::Before => "before",
            HandlerVerb::After => "after",
            HandlerVerb::Error => "error",
        }
    }

    fn priority(&self) -> u8 {
        match self {
            HandlerVerb::Before => 3,
            HandlerVerb::After => 2,
            HandlerVerb::Error => 1,
        }
    }

    fn group() -> &'static str {
        "Padrino Handlers"
    }

    fn visibility() -> Visibility {
        Visibility::Private
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Where a declaration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
}

/// A documentation tag attached to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// Tag kind, e.g. [`CONDITION_TAG`]
    pub tag_name: String,
    pub name: Option<String>,
    pub text: String,
}

/// Which name a caller wants to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// Registry identifier, e.g. `GET_admin__users`
    Identifier,
    /// Human-readable signature, e.g. `GET "/users"`
    Signature,
}

/// A catalog entry for one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRecord<V> {
    namespace: String,
    identifier: String,
    display_name: String,
    controller: Option<String>,
    verb: V,
    args: Vec<LiteralValue>,
    location: SourceLocation,
    source: String,
    docstring: String,
    conditions: ConditionSet,
    tags: Vec<DocTag>,
}

pub type RouteRecord = HandlerRecord<RouteVerb>;
pub type GeneralHandlerRecord = HandlerRecord<HandlerVerb>;

impl<V: Verb> HandlerRecord<V> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Renders the record's name in the requested style, optionally prefixed with the
    /// instance separator.
    pub fn name(&self, style: NameStyle, prefixed: bool) -> String {
        let name = match style {
            NameStyle::Identifier => &self.identifier,
            NameStyle::Signature => &self.display_name,
        };
        if prefixed {
            format!("{}{}", INSTANCE_SEPARATOR, name)
        } else {
            name.clone()
        }
    }

    /// Registry path: namespace, separator, identifier.
    pub fn path(&self) -> String {
        format!("{}{}{}", self.namespace, INSTANCE_SEPARATOR, self.identifier)
    }

    pub fn controller(&self) -> Option<&str> {
        self.controller.as_deref()
    }

    pub fn verb(&self) -> V {
        self.verb
    }

    pub fn args(&self) -> &[LiteralValue] {
        &self.args
    }

    /// Argument list rendered as `[arg, arg]` using inspect forms.
    pub fn args_text(&self) -> String {
        let inner: Vec<String> = self.args.iter().map(LiteralValue::inspect).collect();
        format!("[{}]", inner.join(", "))
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn docstring(&self) -> &str {
        &self.docstring
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn tags(&self) -> &[DocTag] {
        &self.tags
    }

    pub fn group(&self) -> &'static str {
        V::group()
    }

    pub fn visibility(&self) -> Visibility {
        V::visibility()
    }

    pub fn is_documented(&self) -> bool {
        !self.docstring.trim().is_empty()
    }
}

/// Everything the matcher knows about a declaration besides its verb.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub namespace: String,
    /// Controller in effect when the declaration was seen, copied out of the context
    pub controller: Option<String>,
    pub args: Vec<LiteralValue>,
    pub conditions: ConditionSet,
    pub source: String,
    pub location: SourceLocation,
    pub docstring: String,
}

/// Identifier shared by both record kinds: verb, controller and arguments, each reduced to
/// word characters, joined by `_`.
fn base_identifier(verb: &str, controller: Option<&str>, args: &[LiteralValue]) -> String {
    let mut parts = vec![verb.to_string()];
    parts.extend(controller.map(sanitize));
    parts.extend(args.iter().map(|arg| sanitize(&arg.to_string())));
    parts.join("_")
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn display_name(verb: &str, args: &[LiteralValue]) -> String {
    if args.is_empty() {
        return verb.to_string();
    }
    let rendered: Vec<String> = args.iter().map(LiteralValue::inspect).collect();
    format!("{} {}", verb, rendered.join(", "))
}

fn condition_tags(conditions: &ConditionSet) -> Vec<DocTag> {
    conditions
        .iter()
        .map(|(key, value)| DocTag {
            tag_name: CONDITION_TAG.to_string(),
            name: Some(key.inspect()),
            text: format!("+{}+", value.inspect()),
        })
        .collect()
}

fn build<V: Verb>(verb: V, identifier: String, declaration: Declaration) -> HandlerRecord<V> {
    let tags = condition_tags(&declaration.conditions);
    HandlerRecord {
        display_name: display_name(verb.as_str(), &declaration.args),
        namespace: declaration.namespace,
        identifier,
        controller: declaration.controller,
        verb,
        args: declaration.args,
        location: declaration.location,
        source: declaration.source,
        docstring: declaration.docstring,
        conditions: declaration.conditions,
        tags,
    }
}

/// Builds a route record. The identifier carries no disambiguator, so two identical route
/// declarations in one controller share it.
///
/// # Arguments
///
/// * `verb` - The HTTP verb the declaration was made with
/// * `declaration` - Namespace, controller, path argument, conditions and location of the call
///
/// # Returns
///
/// A [`RouteRecord`] with its identifier, display name and condition tags filled in.
pub fn build_route(verb: RouteVerb, declaration: Declaration) -> RouteRecord {
    let identifier = base_identifier(
        verb.as_str(),
        declaration.controller.as_deref(),
        &declaration.args,
    );
    build(verb, identifier, declaration)
}

/// Builds a general handler record.
///
/// # Arguments
///
/// * `verb` - The hook the declaration was made with
/// * `declaration` - Namespace, controller, literal arguments, conditions and location
/// * `serial` - Registry-issued number appended to the identifier; keeps structurally
///   identical hooks apart
///
/// # Returns
///
/// A [`GeneralHandlerRecord`] whose identifier ends in `#<serial>`.
pub fn build_handler(verb: HandlerVerb, declaration: Declaration, serial: u64) -> GeneralHandlerRecord {
    let identifier = format!(
        "{}{}{}",
        base_identifier(verb.as_str(), declaration.controller.as_deref(), &declaration.args),
        INSTANCE_SEPARATOR,
        serial
    );
    build(verb, identifier, declaration)
}
