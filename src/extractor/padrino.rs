use crate::ast::SyntaxNode;
use crate::error::Result;
use crate::extractor::context::ContextStack;
use crate::extractor::{CatalogExtractor, ExtractionSummary};
use crate::literal::{convert_literal, extract_options, is_hash, ConditionSet, LiteralValue};
use crate::parser::ParsedFile;
use crate::record::{
    build_handler, build_route, Declaration, HandlerVerb, RouteVerb, SourceLocation,
};
use crate::registry::{NamespaceKind, Registration, Registry, ROOT};
use log::{debug, warn};

/// Padrino declaration extractor
///
/// Recognises `helpers`, `controllers`/`controller`, the `before`/`after`/`error` hooks and
/// the `get`/`post`/`put`/`delete`/`head` route verbs.
pub struct PadrinoExtractor;

impl CatalogExtractor for PadrinoExtractor {
    fn extract(&self, file: &ParsedFile, registry: &mut Registry) -> Result<ExtractionSummary> {
        debug!("Extracting declarations from {}", file.path.display());

        let mut traversal = Traversal {
            file,
            registry,
            summary: ExtractionSummary::default(),
        };
        let mut context = ContextStack::new();
        traversal.walk_body(&file.syntax_tree, ROOT, Scope::TopLevel, &mut context)?;

        debug!(
            "{}: {} routes, {} handlers, {} skipped",
            file.path.display(),
            traversal.summary.routes,
            traversal.summary.handlers,
            traversal.summary.skipped
        );
        Ok(traversal.summary)
    }
}

/// Whether statements are being read inside a class/module body or grouping block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    TopLevel,
    Namespace,
}

/// State of one pass over one file.
struct Traversal<'a> {
    file: &'a ParsedFile,
    registry: &'a mut Registry,
    summary: ExtractionSummary,
}

impl Traversal<'_> {
    fn walk_body(
        &mut self,
        container: &SyntaxNode,
        namespace: &str,
        scope: Scope,
        context: &mut ContextStack,
    ) -> Result<()> {
        for statement in statements(container) {
            match statement.kind {
                "class" | "module" => self.enter_namespace(statement, namespace, context)?,
                "singleton_class" => self.walk_body(statement, namespace, scope, context)?,
                "call" => self.dispatch(statement, namespace, scope, context)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn enter_namespace(
        &mut self,
        definition: &SyntaxNode,
        namespace: &str,
        context: &mut ContextStack,
    ) -> Result<()> {
        let Some(name) = definition.child_by_field("name") else {
            return Ok(());
        };
        let kind = if definition.is_kind("module") {
            NamespaceKind::Module
        } else {
            NamespaceKind::Class
        };
        let path =
            self.registry
                .register_namespace(namespace, &name.source, kind, self.location(definition))?;
        self.walk_body(definition, &path, Scope::Namespace, context)
    }

    fn dispatch(
        &mut self,
        call: &SyntaxNode,
        namespace: &str,
        scope: Scope,
        context: &mut ContextStack,
    ) -> Result<()> {
        let Some(method) = call.child_by_field("method") else {
            return Ok(());
        };
        let name = method.source.as_str();
        let grouping = matches!(name, "helpers" | "controllers" | "controller");

        // Outside any namespace only `Receiver.helpers`/`Receiver.controllers` name their own scope
        if scope == Scope::TopLevel && !(grouping && dot_receiver(call).is_some()) {
            return Ok(());
        }

        match name {
            "helpers" => self.process_helpers(call, namespace, context),
            "controllers" | "controller" => self.process_controllers(call, namespace, context),
            _ => {
                if let Some(verb) = HandlerVerb::from_method(name) {
                    self.process_handler(call, verb, namespace, context)
                } else if let Some(verb) = RouteVerb::from_method(name) {
                    self.process_route(call, verb, namespace, context)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// `Foo::Bar.helpers do ... end` opens `Foo::Bar`; a bare call stays in `namespace`.
    fn select_namespace(&mut self, call: &SyntaxNode, namespace: &str) -> Result<String> {
        match dot_receiver(call) {
            Some(receiver) => self.registry.register_namespace(
                namespace,
                &receiver.source,
                NamespaceKind::Class,
                self.location(call),
            ),
            None => Ok(namespace.to_string()),
        }
    }

    fn process_helpers(
        &mut self,
        call: &SyntaxNode,
        namespace: &str,
        context: &mut ContextStack,
    ) -> Result<()> {
        let target = self.select_namespace(call, namespace)?;
        debug!("helpers block in {:?}", target);
        match call.child_by_field("block") {
            Some(block) => self.walk_body(block, &target, Scope::Namespace, context),
            None => Ok(()),
        }
    }

    fn process_controllers(
        &mut self,
        call: &SyntaxNode,
        namespace: &str,
        context: &mut ContextStack,
    ) -> Result<()> {
        let target = self.select_namespace(call, namespace)?;
        let controller = positional_args(call)
            .first()
            .and_then(|first| convert_literal(first).ok())
            .map(|value| value.to_string());
        debug!("controller {:?} in {:?}", controller, target);

        let Some(block) = call.child_by_field("block") else {
            return Ok(());
        };
        let mut scope = context.enter(controller);
        self.walk_body(block, &target, Scope::Namespace, &mut scope)
    }

    fn process_handler(
        &mut self,
        call: &SyntaxNode,
        verb: HandlerVerb,
        namespace: &str,
        context: &mut ContextStack,
    ) -> Result<()> {
        let positional = positional_args(call);
        let args: Vec<LiteralValue> = positional
            .iter()
            .filter(|node| !is_hash(node))
            .filter_map(|node| match convert_literal(node) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!("Ignoring dynamic argument at line {}: {}", node.line, e);
                    None
                }
            })
            .collect();
        let conditions = trailing_options(&positional);

        let declaration = self.declaration(call, namespace, context, args, conditions);
        let serial = self.registry.next_handler_serial();
        let record = build_handler(verb, declaration, serial);
        debug!("Found handler: {}", record.display_name());

        match self.registry.register_handler(record)? {
            Registration::Added(_) => self.summary.handlers += 1,
            Registration::Duplicate(_) | Registration::Collision(_) => self.summary.skipped += 1,
        }
        Ok(())
    }

    fn process_route(
        &mut self,
        call: &SyntaxNode,
        verb: RouteVerb,
        namespace: &str,
        context: &mut ContextStack,
    ) -> Result<()> {
        let positional = positional_args(call);
        let path = match positional.first().map(|first| convert_literal(first)) {
            Some(Ok(path)) => path,
            Some(Err(e)) => {
                warn!(
                    "Undocumentable route at {}:{}: {}",
                    self.file.path.display(),
                    call.line,
                    e
                );
                self.summary.skipped += 1;
                return Ok(());
            }
            None => {
                warn!(
                    "Route without a path at {}:{}",
                    self.file.path.display(),
                    call.line
                );
                self.summary.skipped += 1;
                return Ok(());
            }
        };
        let conditions = trailing_options(&positional);

        let declaration = self.declaration(call, namespace, context, vec![path], conditions);
        let record = build_route(verb, declaration);
        debug!("Found route: {}", record.display_name());

        match self.registry.register_route(record)? {
            Registration::Added(_) => self.summary.routes += 1,
            Registration::Duplicate(_) | Registration::Collision(_) => self.summary.skipped += 1,
        }
        Ok(())
    }

    fn declaration(
        &self,
        call: &SyntaxNode,
        namespace: &str,
        context: &ContextStack,
        args: Vec<LiteralValue>,
        conditions: ConditionSet,
    ) -> Declaration {
        Declaration {
            namespace: namespace.to_string(),
            controller: context.current().map(String::from),
            args,
            conditions,
            source: call.source.clone(),
            location: self.location(call),
            docstring: self.file.docstring_for(call.line),
        }
    }

    fn location(&self, node: &SyntaxNode) -> SourceLocation {
        SourceLocation {
            file: self.file.path.clone(),
            line: node.line,
        }
    }
}

/// Statements of a body-bearing node, with body wrappers flattened and clauses that never
/// hold declarations (`rescue`, `ensure`, block parameters, class names) left out.
fn statements(container: &SyntaxNode) -> Vec<&SyntaxNode> {
    let mut out = Vec::new();
    for child in container.named_children() {
        match (child.field, child.kind) {
            (Some("name" | "superclass" | "parameters" | "value"), _) => {}
            (_, "body_statement" | "block_body") => out.extend(statements(child)),
            (_, "rescue" | "ensure" | "else" | "superclass" | "block_parameters") => {}
            _ => out.push(child),
        }
    }
    out
}

/// Receiver of a `receiver.method` call; `None` for bare calls and `Foo::method` calls.
fn dot_receiver(call: &SyntaxNode) -> Option<&SyntaxNode> {
    let receiver = call.child_by_field("receiver")?;
    let rest = call.source.strip_prefix(receiver.source.as_str())?.trim_start();
    (rest.starts_with('.') || rest.starts_with("&.")).then_some(receiver)
}

/// Arguments of a call, excluding any `&block` argument.
fn positional_args(call: &SyntaxNode) -> Vec<&SyntaxNode> {
    call.child_by_field("arguments")
        .map(|list| {
            list.named_children()
                .filter(|arg| !arg.is_kind("block_argument"))
                .collect()
        })
        .unwrap_or_default()
}

fn trailing_options(positional: &[&SyntaxNode]) -> ConditionSet {
    match positional.last() {
        Some(last) if is_hash(last) => extract_options(last),
        _ => ConditionSet::new(),
    }
}
