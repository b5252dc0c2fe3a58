//! Owned syntax tree consumed by the extractor.
//!
//! The parser lowers a tree-sitter Ruby tree into [`SyntaxNode`]s so the matching logic
//! never depends on parser lifetimes or grammar internals beyond node kinds and field names.
//! Only named nodes survive lowering; comments are dropped and looked up separately
//! through [`crate::parser::ParsedFile::docstring_for`].

/// Synthetic node kind grouping the trailing `key => value` pairs of an argument list.
pub const BARE_HASH: &str = "bare_hash";

/// A single node of the lowered syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Node kind as reported by the grammar (`call`, `string`, `pair`, ...)
    pub kind: &'static str,
    /// Field name under which this node hangs in its parent, if any
    pub field: Option<&'static str>,
    /// Named children in source order
    pub children: Vec<SyntaxNode>,
    /// Raw source text covered by the node
    pub source: String,
    /// 1-based line of the node's first character
    pub line: usize,
}

impl SyntaxNode {
    /// Creates a leaf node.
    pub fn leaf(kind: &'static str, source: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            field: None,
            children: Vec::new(),
            source: source.into(),
            line,
        }
    }

    /// Creates a node with children.
    pub fn branch(
        kind: &'static str,
        source: impl Into<String>,
        line: usize,
        children: Vec<SyntaxNode>,
    ) -> Self {
        Self {
            kind,
            field: None,
            children,
            source: source.into(),
            line,
        }
    }

    /// Returns the node tagged with the given field name.
    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Named children in source order; lowering keeps no anonymous tokens.
    pub fn named_children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter()
    }

    /// First child hanging under `field`.
    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// Pre-order search over this node and its descendants for the first node whose kind
    /// is one of `kinds`.
    pub fn jump(&self, kinds: &[&str]) -> Option<&SyntaxNode> {
        if kinds.contains(&self.kind) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.jump(kinds))
    }
}
