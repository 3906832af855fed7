//! Structural code smells: parameter lists, god classes, complexity,
//! nesting depth, magic numbers, long call chains.

use std::error::Error;
use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::Node;

use crate::issue::{Issue, Severity};
use crate::parse::{declared_name, kind_of, line_range, node_text, walk_tree, NodeKind};
use crate::pipeline::{Analyzer, FileContext};

static PROPERTY_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:public|protected|private)\s+\$\w+").expect("property regex")
});
static LONG_CHAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$this->[^();]+->[^();]+->[^();]+->[^();]+").expect("chain regex")
});
static BIG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3,}\b").expect("number regex"));
static ROUND_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9]00$").expect("round code regex"));

/// Numbers that read as constants already: HTTP codes, round limits,
/// powers of two.
const COMMON_NUMBERS: &[&str] = &[
    "200", "201", "204", "301", "302", "400", "401", "403", "404", "422", "500", "503",
    "1000", "2000", "3000", "5000", "10000",
    "100", "1024", "2048", "4096",
];

const MAX_PARAMETERS: usize = 4;
const MAX_COMPLEXITY: usize = 50;
const MAX_NESTING: usize = 4;

pub struct CodeSmellDetector;

impl CodeSmellDetector {
    pub fn new() -> Self {
        CodeSmellDetector
    }

    fn check_parameters(&self, ctx: &FileContext<'_>, method: &Node, issues: &mut Vec<Issue>) {
        let count = parameter_count(method);
        if count <= MAX_PARAMETERS {
            return;
        }
        let name = declared_name(method, ctx.source).unwrap_or("anonymous");
        let (line, _) = line_range(method);
        issues.push(
            Issue::new(
                "too_many_parameters",
                Severity::Major,
                format!("Method \"{name}\" has {count} parameters (recommended max: {MAX_PARAMETERS})"),
                ctx.path,
                line,
            )
            .with_suggestion(
                "Consider using DTO (Data Transfer Object) or Request object to group parameters",
            ),
        );
    }

    fn check_god_class(&self, ctx: &FileContext<'_>, class: &Node, issues: &mut Vec<Issue>) {
        let class_name = declared_name(class, ctx.source).unwrap_or("anonymous");
        let path = ctx.path.to_string_lossy();

        let mut method_count = 0;
        walk_tree(*class, &mut |node| {
            if kind_of(&node) == NodeKind::MethodDeclaration {
                method_count += 1;
            }
        });

        // Controllers and repositories legitimately carry more methods
        // (CRUD plus helpers).
        let crud_heavy = class_name.contains("Controller")
            || path.contains("Controller")
            || class_name.contains("Repository")
            || path.contains("Repository");
        let method_threshold = if crud_heavy { 20 } else { 15 };

        let (line, _) = line_range(class);
        if method_count > method_threshold {
            issues.push(
                Issue::new(
                    "god_class",
                    Severity::Major,
                    format!(
                        "Class \"{class_name}\" has {method_count} methods (max recommended: {method_threshold})"
                    ),
                    ctx.path,
                    line,
                )
                .with_suggestion("Split responsibilities into smaller collaborating classes"),
            );
        }

        let is_model = ctx.source.contains("extends Model");
        let property_threshold = if is_model { 15 } else { 10 };
        let class_text = node_text(class, ctx.source);
        let property_count = PROPERTY_DECLARATION.find_iter(class_text).count();
        if property_count > property_threshold {
            issues.push(
                Issue::new(
                    "too_many_properties",
                    Severity::Minor,
                    format!(
                        "Class \"{class_name}\" has {property_count} properties (max recommended: {property_threshold})"
                    ),
                    ctx.path,
                    line,
                )
                .with_suggestion("Group related properties into value objects"),
            );
        }
    }

    fn check_complexity(&self, ctx: &FileContext<'_>, method: &Node, issues: &mut Vec<Issue>) {
        let name = declared_name(method, ctx.source).unwrap_or("anonymous");
        let is_service_method = name.starts_with("__") || name.starts_with("scope");
        if is_service_method || is_excluded_path(ctx) {
            return;
        }

        let complexity = cyclomatic_complexity(method, ctx.source);
        let (line, end_line) = line_range(method);
        if complexity > MAX_COMPLEXITY {
            issues.push(
                Issue::new(
                    "high_complexity",
                    Severity::Major,
                    format!("High cyclomatic complexity ({complexity})"),
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion("Consider simplifying the logic or extracting parts into separate methods"),
            );
        }

        let depth = nesting_depth(method, 0);
        if depth > MAX_NESTING {
            issues.push(
                Issue::new(
                    "deep_nesting",
                    Severity::Major,
                    format!("Deep nesting detected (depth: {depth})"),
                    ctx.path,
                    line,
                )
                .with_end_line(end_line)
                .with_suggestion("Extract deeply nested code into separate methods"),
            );
        }
    }

    fn check_magic_numbers(&self, ctx: &FileContext<'_>, method: &Node, issues: &mut Vec<Issue>) {
        let text = node_text(method, ctx.source);
        let magic: Vec<&str> = BIG_NUMBER
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|num| !is_expected_number(num))
            .collect();
        if magic.is_empty() {
            return;
        }
        let (line, end_line) = line_range(method);
        issues.push(
            Issue::new(
                "magic_number",
                Severity::Minor,
                format!("Magic numbers detected: {}", magic.join(", ")),
                ctx.path,
                line,
            )
            .with_end_line(end_line)
            .with_suggestion("Consider extracting these numbers into named constants or configuration"),
        );
    }

    fn check_chaining(&self, ctx: &FileContext<'_>, method: &Node, issues: &mut Vec<Issue>) {
        let text = node_text(method, ctx.source);
        if !LONG_CHAIN.is_match(text) {
            return;
        }
        let (line, end_line) = line_range(method);
        issues.push(
            Issue::new(
                "long_method_chaining",
                Severity::Minor,
                "Long method chaining detected",
                ctx.path,
                line,
            )
            .with_end_line(end_line)
            .with_suggestion(
                "Consider extracting intermediate results into variables for better readability and debugging.",
            ),
        );
    }
}

/// Complex logic is expected in migrations, seeders, and factories.
fn is_excluded_path(ctx: &FileContext<'_>) -> bool {
    let path = ctx.path.to_string_lossy();
    path.contains("migrations") || path.contains("seeders") || path.contains("factories")
}

fn parameter_count(method: &Node) -> usize {
    for i in 0..method.child_count() {
        let Some(child) = method.child(i) else { continue };
        if child.kind() == "formal_parameters" {
            let mut count = 0;
            for k in 0..child.named_child_count() {
                if let Some(param) = child.named_child(k)
                    && param.kind().ends_with("parameter")
                {
                    count += 1;
                }
            }
            return count;
        }
    }
    0
}

/// Decision-point count over the method subtree plus boolean operators.
fn cyclomatic_complexity(method: &Node, source: &str) -> usize {
    let mut complexity = 1;
    walk_tree(*method, &mut |node| {
        match node.kind() {
            "if_statement" | "else_if_clause" | "else_clause" | "while_statement"
            | "for_statement" | "foreach_statement" | "case_statement" | "catch_clause"
            | "conditional_expression" => complexity += 1,
            _ => {}
        }
    });
    let text = node_text(method, source);
    complexity += text.matches("&&").count() + text.matches("||").count();
    complexity
}

/// Deepest chain of nested control structures within the node.
fn nesting_depth(node: &Node, current: usize) -> usize {
    let mut max_depth = current;
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        let child_depth = if matches!(
            kind_of(&child),
            NodeKind::IfStatement
                | NodeKind::WhileStatement
                | NodeKind::ForStatement
                | NodeKind::ForeachStatement
                | NodeKind::TryStatement
        ) {
            nesting_depth(&child, current + 1)
        } else {
            nesting_depth(&child, current)
        };
        max_depth = max_depth.max(child_depth);
    }
    max_depth
}

fn is_expected_number(num: &str) -> bool {
    if COMMON_NUMBERS.contains(&num) {
        return true;
    }
    // Unix timestamps and millisecond timestamps.
    if num.len() >= 10 && num.len() <= 13 {
        return true;
    }
    ROUND_CODE.is_match(num)
}

impl Analyzer for CodeSmellDetector {
    fn name(&self) -> &'static str {
        "code_smell"
    }

    fn analyze(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, Box<dyn Error>> {
        let mut issues = Vec::new();

        walk_tree(ctx.tree.root_node(), &mut |node| match kind_of(&node) {
            NodeKind::MethodDeclaration | NodeKind::FunctionDefinition => {
                self.check_parameters(ctx, &node, &mut issues);
                self.check_complexity(ctx, &node, &mut issues);
                self.check_magic_numbers(ctx, &node, &mut issues);
                self.check_chaining(ctx, &node, &mut issues);
            }
            NodeKind::ClassDeclaration => {
                self.check_god_class(ctx, &node, &mut issues);
            }
            _ => {}
        });

        Ok(issues)
    }
}

#[cfg(test)]
#[path = "code_smell_test.rs"]
mod tests;
