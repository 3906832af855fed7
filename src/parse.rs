//! Tree-sitter PHP parser adapter.
//!
//! This is where the tree-sitter dependency lives. One `PhpParser` is
//! created per run (or per worker thread); trees are read-only after
//! construction. A file whose tree contains syntax errors is rejected
//! with `ParseError` and skipped by the pipeline.

use std::error::Error;
use std::fmt;

use tree_sitter::{Node, Parser, Tree};

/// Malformed or unparseable source. Skipping the file is the only
/// recovery; the run continues.
#[derive(Debug)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl Error for ParseError {}

/// PHP parser owned by the pipeline, created once and reused per file.
pub struct PhpParser {
    parser: Parser,
}

impl PhpParser {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_php::LANGUAGE_PHP.into())?;
        Ok(PhpParser { parser })
    }

    /// Parse a PHP source file. Trees containing syntax errors are
    /// rejected so that downstream analyzers only see well-formed input.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParseError::new("parser produced no tree"))?;
        if tree.root_node().has_error() {
            return Err(ParseError::new("source contains syntax errors"));
        }
        Ok(tree)
    }
}

/// Node kinds the analyzers dispatch on. Anything else maps to `Other`,
/// so a grammar update cannot silently misroute a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    MethodDeclaration,
    FunctionDefinition,
    ClassDeclaration,
    FunctionCall,
    CompoundStatement,
    ExpressionStatement,
    IfStatement,
    WhileStatement,
    ForStatement,
    ForeachStatement,
    TryStatement,
    Name,
    Other,
}

pub fn kind_of(node: &Node) -> NodeKind {
    match node.kind() {
        "method_declaration" => NodeKind::MethodDeclaration,
        "function_definition" => NodeKind::FunctionDefinition,
        "class_declaration" => NodeKind::ClassDeclaration,
        "function_call_expression" => NodeKind::FunctionCall,
        "compound_statement" => NodeKind::CompoundStatement,
        "expression_statement" => NodeKind::ExpressionStatement,
        "if_statement" => NodeKind::IfStatement,
        "while_statement" => NodeKind::WhileStatement,
        "for_statement" => NodeKind::ForStatement,
        "foreach_statement" => NodeKind::ForeachStatement,
        "try_statement" => NodeKind::TryStatement,
        "name" => NodeKind::Name,
        _ => NodeKind::Other,
    }
}

/// A method or free function declaration.
pub fn is_function_like(node: &Node) -> bool {
    matches!(
        kind_of(node),
        NodeKind::MethodDeclaration | NodeKind::FunctionDefinition
    )
}

/// Preorder traversal over every node in the tree.
pub fn walk_tree<'t>(node: Node<'t>, f: &mut dyn FnMut(Node<'t>)) {
    f(node);
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            walk_tree(child, f);
        }
    }
}

/// Source text spanned by a node.
pub fn node_text<'s>(node: &Node, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// The declared name of a method, function, or class: the text of the
/// first `name` child. Closures and anonymous classes have none.
pub fn declared_name<'s>(node: &Node, source: &'s str) -> Option<&'s str> {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i)
            && kind_of(&child) == NodeKind::Name
        {
            return Some(node_text(&child, source));
        }
    }
    None
}

/// The name a `function_call_expression` invokes: a direct `name` or
/// `qualified_name` child, falling back one level for wrapped names.
pub fn call_name<'s>(node: &Node, source: &'s str) -> Option<&'s str> {
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        match child.kind() {
            "name" | "qualified_name" => return Some(node_text(&child, source)),
            _ => {
                for k in 0..child.child_count() {
                    if let Some(grandchild) = child.child(k)
                        && grandchild.kind() == "name"
                    {
                        return Some(node_text(&grandchild, source));
                    }
                }
            }
        }
    }
    None
}

/// 1-based inclusive line range of a node.
pub fn line_range(node: &Node) -> (usize, usize) {
    (
        node.start_position().row + 1,
        node.end_position().row + 1,
    )
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
