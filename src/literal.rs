//! Static literal decoding.
//!
//! Declarations only carry meaning for the catalog when their arguments can be read without
//! running the program. [`convert_literal`] turns one syntax node into a [`LiteralValue`] or
//! reports it as [`Inconvertible`]; [`extract_options`] applies that conversion to every
//! `key => value` pair of a trailing options hash.

use crate::ast::{SyntaxNode, BARE_HASH};
use log::debug;
use std::fmt;

/// A statically known argument or option value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LiteralValue {
    /// `:name`, `"name":`-style labels and `:"quoted"` symbols
    Symbol(String),
    /// A string literal without interpolation
    Text(String),
    /// An integer literal
    Integer(i64),
    /// A regular-expression literal, kept as its full source (`/^\d+$/`)
    Pattern(String),
    /// Source text of a value that could not be decoded statically
    RawSource(String),
}

impl LiteralValue {
    /// Developer-facing form used in display names and condition tags.
    ///
    /// Symbols render as `:name`, text as a double-quoted string, patterns as
    /// `(Regexp)/source/`; integers and raw source render verbatim.
    pub fn inspect(&self) -> String {
        match self {
            LiteralValue::Symbol(name) if is_plain_symbol(name) => format!(":{}", name),
            LiteralValue::Symbol(name) => format!(":{}", quote(name)),
            LiteralValue::Text(text) => quote(text),
            LiteralValue::Integer(value) => value.to_string(),
            LiteralValue::Pattern(source) => format!("(Regexp){}", source),
            LiteralValue::RawSource(source) => source.clone(),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Symbol(s)
            | LiteralValue::Text(s)
            | LiteralValue::Pattern(s)
            | LiteralValue::RawSource(s) => f.write_str(s),
            LiteralValue::Integer(value) => write!(f, "{}", value),
        }
    }
}

/// Method names Ruby prints as bare symbols even though they are not words.
const OPERATOR_SYMBOLS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "==", "===", "!=", "=~", "!~", "!", "<", ">", "<=", ">=",
    "<=>", "<<", ">>", "&", "|", "^", "~", "+@", "-@", "[]", "[]=", "`",
];

/// Whether a symbol name can be written after `:` without quotes.
fn is_plain_symbol(name: &str) -> bool {
    if OPERATOR_SYMBOLS.contains(&name) {
        return true;
    }
    let variable = name
        .strip_prefix("@@")
        .or_else(|| name.strip_prefix('@'))
        .or_else(|| name.strip_prefix('$'));
    if let Some(variable) = variable {
        return is_word(variable);
    }
    is_word(name.strip_suffix(['?', '!', '=']).unwrap_or(name))
}

fn is_word(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A node whose value cannot be known without executing code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inconvertible {
    /// Raw source text of the offending node
    pub source: String,
}

impl fmt::Display for Inconvertible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a static literal: {}", self.source)
    }
}

impl std::error::Error for Inconvertible {}

/// Converts a single syntax node into a [`LiteralValue`].
///
/// Accepted shapes: labels (`key:`), plain and quoted symbols, strings without
/// interpolation, regular expressions and integers. Everything else, including method calls,
/// variables, floats and interpolated strings, is [`Inconvertible`].
///
/// A quoted label (`"key":`) only reads as a symbol in the context of its pair, so on its
/// own it converts like any string; [`extract_options`] handles that case.
///
/// # Arguments
///
/// * `node` - The syntax node to decode, usually a call argument or a hash key or value
///
/// # Returns
///
/// The decoded value, or [`Inconvertible`] carrying the node's source text.
pub fn convert_literal(node: &SyntaxNode) -> Result<LiteralValue, Inconvertible> {
    let inconvertible = || Inconvertible {
        source: node.source.clone(),
    };

    match node.kind {
        "hash_key_symbol" => Ok(LiteralValue::Symbol(
            node.source.trim_end_matches(':').to_string(),
        )),
        "simple_symbol" => Ok(LiteralValue::Symbol(
            node.source.trim_start_matches(':').to_string(),
        )),
        "delimited_symbol" => string_body(node)
            .map(LiteralValue::Symbol)
            .ok_or_else(inconvertible),
        "string" => string_body(node)
            .map(LiteralValue::Text)
            .ok_or_else(inconvertible),
        "regex" => Ok(LiteralValue::Pattern(node.source.clone())),
        "integer" => parse_integer(&node.source)
            .map(LiteralValue::Integer)
            .ok_or_else(inconvertible),
        _ => Err(inconvertible()),
    }
}

/// Raw content of a string-like node, or `None` when it interpolates.
fn string_body(node: &SyntaxNode) -> Option<String> {
    let mut body = String::new();
    for child in &node.children {
        match child.kind {
            "string_content" | "escape_sequence" => body.push_str(&child.source),
            _ => return None,
        }
    }
    Some(body)
}

fn parse_integer(source: &str) -> Option<i64> {
    let digits: String = source.chars().filter(|c| *c != '_').collect();
    let (negative, digits) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest.to_string()),
        None => (false, digits),
    };

    let lower = digits.to_ascii_lowercase();
    let value = if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()?
    } else if let Some(dec) = lower.strip_prefix("0d") {
        dec.parse().ok()?
    } else if lower.len() > 1 && lower.starts_with('0') {
        i64::from_str_radix(&lower[1..], 8).ok()?
    } else {
        lower.parse().ok()?
    };

    Some(if negative { -value } else { value })
}

/// Key/value conditions attached to a declaration.
///
/// Keys are unique; inserting an existing key replaces its value but keeps its position, so
/// entries stay in first-seen source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionSet {
    entries: Vec<(LiteralValue, LiteralValue)>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: LiteralValue, value: LiteralValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &LiteralValue) -> Option<&LiteralValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LiteralValue, &LiteralValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

/// Whether `node` is an associative literal: an explicit `{...}` hash or a run of bare
/// `key => value` arguments, starting with a pair.
pub fn is_hash(node: &SyntaxNode) -> bool {
    matches!(node.kind, "hash" | BARE_HASH)
        && node.children.first().is_some_and(|c| c.is_kind("pair"))
}

/// Extracts the `key => value` pairs of an options hash.
///
/// A node that is not a hash yields an empty set. A pair whose key cannot be decoded is
/// dropped; a value that cannot be decoded is kept as [`LiteralValue::RawSource`]. Label
/// keys become symbols whether written bare (`key:`) or quoted (`"key":`); a string key
/// written with `=>` stays text.
///
/// # Arguments
///
/// * `node` - An explicit `{...}` hash or a bare run of trailing call pairs
///
/// # Returns
///
/// The decoded conditions in first-seen key order, later duplicates overriding earlier
/// values.
pub fn extract_options(node: &SyntaxNode) -> ConditionSet {
    let mut conditions = ConditionSet::new();
    if !matches!(node.kind, "hash" | BARE_HASH) {
        return conditions;
    }

    for pair in node.children.iter().filter(|c| c.is_kind("pair")) {
        let Some(key_node) = pair.child_by_field("key") else {
            continue;
        };
        let key = match convert_literal(key_node) {
            Ok(LiteralValue::Text(name)) if is_quoted_label(pair, key_node) => {
                LiteralValue::Symbol(name)
            }
            Ok(key) => key,
            Err(e) => {
                debug!("Skipping option with dynamic key at line {}: {}", pair.line, e);
                continue;
            }
        };

        let value = match pair.child_by_field("value") {
            Some(value_node) => convert_literal(value_node)
                .unwrap_or_else(|e| LiteralValue::RawSource(e.source)),
            // `key:` shorthand takes its value from a local of the same name
            None => LiteralValue::RawSource(key.to_string()),
        };

        conditions.insert(key, value);
    }

    conditions
}

/// `"key": value`: a string key closed directly by the label colon rather than `=>`.
fn is_quoted_label(pair: &SyntaxNode, key: &SyntaxNode) -> bool {
    key.is_kind("string")
        && pair
            .source
            .strip_prefix(key.source.as_str())
            .is_some_and(|rest| rest.starts_with(':'))
}
