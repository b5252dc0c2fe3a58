use crate::ast::{SyntaxNode, BARE_HASH};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, TreeCursor};

/// AST (Abstract Syntax Tree) parser for Ruby source files.
///
/// The `AstParser` uses tree-sitter's Ruby grammar to parse source code and lowers the
/// result into an owned [`SyntaxNode`] tree, which the extractor walks to find route and
/// handler declarations.
///
/// # Example
///
/// ```no_run
/// use padrino_catalog::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("app/app.rb")).unwrap();
/// println!("Parsed {} top-level statements", parsed.syntax_tree.children.len());
/// ```
pub struct AstParser;

/// A parsed Ruby file with its lowered syntax tree.
///
/// Keeps the full source text around so declarations can pick up the comment block written
/// above them.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// Full source text
    pub source: String,
    /// The lowered abstract syntax tree, rooted at a `program` node
    pub syntax_tree: SyntaxNode,
}

impl ParsedFile {
    /// Returns the documentation comment written directly above `line` (1-based).
    ///
    /// Collects the contiguous run of `#` comment lines ending on the previous line, strips
    /// the marker and a single following space, and joins them with newlines. A blank line
    /// ends the run. Shebang and magic comments are not documentation.
    pub fn docstring_for(&self, line: usize) -> String {
        let lines: Vec<&str> = self.source.lines().collect();
        let mut collected = Vec::new();

        let mut idx = line.saturating_sub(1);
        while idx > 0 {
            idx -= 1;
            let Some(text) = lines.get(idx).map(|l| l.trim()) else {
                break;
            };
            let Some(comment) = text.strip_prefix('#') else {
                break;
            };
            if is_magic_comment(text) {
                break;
            }
            collected.push(comment.strip_prefix(' ').unwrap_or(comment));
        }

        collected.reverse();
        collected.join("\n")
    }
}

fn is_magic_comment(text: &str) -> bool {
    text.starts_with("#!")
        || text.contains("-*-")
        || text.contains("frozen_string_literal:")
        || text.starts_with("# encoding:")
}

impl AstParser {
    /// Parses a single Ruby source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the Ruby grammar cannot be loaded.
    /// Syntax errors are not fatal: tree-sitter recovers, and the damaged regions simply
    /// match nothing.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let parsed = Self::parse_source(&content, path.to_path_buf())
            .with_context(|| format!("Failed to parse Ruby syntax in file: {}", path.display()))?;

        debug!("Successfully parsed file: {}", path.display());
        Ok(parsed)
    }

    /// Parses Ruby source held in memory.
    pub fn parse_source(source: &str, path: PathBuf) -> Result<ParsedFile> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .context("Failed to load the Ruby grammar")?;

        let tree = parser
            .parse(source, None)
            .context("Parser produced no syntax tree")?;
        let root = tree.root_node();

        if root.has_error() {
            warn!(
                "{} contains syntax errors; extracting what can be recognised",
                path.display()
            );
        }

        let mut cursor = root.walk();
        let syntax_tree = lower(&mut cursor, source.as_bytes(), None);

        Ok(ParsedFile {
            path,
            source: source.to_string(),
            syntax_tree,
        })
    }

    /// Parses multiple Ruby source files, continuing even if some fail.
    ///
    /// Files that fail are logged as warnings; the caller receives one result per path.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| match Self::parse_file(path) {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    Err(e)
                }
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        let failure_count = results.len() - success_count;

        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count, failure_count
        );

        results
    }
}

/// Lowers the node under `cursor` and its named descendants.
fn lower(cursor: &mut TreeCursor, source: &[u8], field: Option<&'static str>) -> SyntaxNode {
    let node = cursor.node();
    let mut children = Vec::new();

    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if child.is_named() && child.kind() != "comment" {
                let child_field = cursor.field_name();
                children.push(lower(cursor, source, child_field));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    if node.kind() == "argument_list" {
        children = group_trailing_pairs(children);
    }

    SyntaxNode {
        kind: node.kind(),
        field,
        children,
        source: node_text(&node, source),
        line: node.start_position().row + 1,
    }
}

/// Collapses runs of `pair` arguments into a single [`BARE_HASH`] node spanning them.
fn group_trailing_pairs(children: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut grouped: Vec<SyntaxNode> = Vec::with_capacity(children.len());

    for child in children {
        if child.kind == "pair" {
            if let Some(last) = grouped.last_mut().filter(|n| n.kind == BARE_HASH) {
                last.source.push_str(", ");
                last.source.push_str(&child.source);
                last.children.push(child);
                continue;
            }
            let line = child.line;
            let text = child.source.clone();
            grouped.push(SyntaxNode::branch(BARE_HASH, text, line, vec![child]));
        } else {
            grouped.push(child);
        }
    }

    grouped
}

fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}
