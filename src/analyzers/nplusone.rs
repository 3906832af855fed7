//! N+1 query detection: relationship access and queries inside loops
//! without eager loading.

use std::collections::BTreeMap;
use std::error::Error;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;
use tree_sitter::Node;

use crate::issue::{Issue, Severity};
use crate::parse::{
    declared_name, is_function_like, kind_of, line_range, node_text, walk_tree, NodeKind,
};
use crate::pipeline::{Analyzer, FileContext};

/// Property accesses like `$user->posts`. Whether one is a relationship
/// (not a plain attribute and not a method call) is decided in code,
/// since that needs lookahead the regex engine does not provide.
static PROPERTY_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\w+->([a-z_]\w*)").expect("property access regex"));

/// Attributes that are plain columns, never lazy-loaded relations.
const PLAIN_ATTRIBUTES: &[&str] = &[
    "id",
    "name",
    "title",
    "email",
    "created_at",
    "updated_at",
    "deleted_at",
];

pub struct NPlusOneDetector;

impl NPlusOneDetector {
    pub fn new() -> Self {
        NPlusOneDetector
    }

    fn check_method(
        &self,
        ctx: &FileContext<'_>,
        method: &Node,
        issues: &mut Vec<Issue>,
    ) {
        let text = node_text(method, ctx.source);
        let method_name = declared_name(method, ctx.source).unwrap_or("anonymous");
        let (line, _) = line_range(method);

        let has_loop = has_loop(text);
        let has_relationship = has_relationship_access(text);
        let has_eager = has_eager_loading(text);

        if has_loop && has_relationship && !has_eager {
            let info = BTreeMap::from([
                ("methodName".to_string(), json!(method_name)),
                ("pattern".to_string(), json!("loop_with_relationship")),
                (
                    "recommendation".to_string(),
                    json!("Add ->with() to the query before looping"),
                ),
            ]);
            issues.push(
                Issue::new(
                    "n_plus_one_query",
                    Severity::Critical,
                    format!(
                        "Potential N+1 query in \"{method_name}\": relationship access inside loop without eager loading"
                    ),
                    ctx.path,
                    line,
                )
                .with_suggestion(
                    "Use eager loading with ->with(['relationName']) before the loop to prevent N+1 queries",
                )
                .with_refactor_info(info),
            );
        }

        let has_view_return = text.contains("view(") || text.contains("return view");
        let has_model_get = text.contains("->get()") || text.contains("::all()");
        if has_view_return && has_model_get && !has_eager {
            issues.push(
                Issue::new(
                    "n_plus_one_blade",
                    Severity::Major,
                    "Potential N+1 in view: passing collection without eager loading",
                    ctx.path,
                    line,
                )
                .with_suggestion("Eager load relationships before passing to view: $items->load('relation')"),
            );
        }

        if self.has_query_in_loop(ctx, method) {
            issues.push(
                Issue::new(
                    "query_in_loop",
                    Severity::Critical,
                    "Database query inside loop",
                    ctx.path,
                    line,
                )
                .with_suggestion("Move query outside loop and eager load data, or use whereIn() with collected IDs"),
            );
        }

        let has_get_or_all = text.contains("->get()") || text.contains("::all()");
        if has_get_or_all && !text.contains("with(") && has_relationship && has_loop {
            issues.push(
                Issue::new(
                    "missing_eager_loading",
                    Severity::Major,
                    "Model query without eager loading before collection iteration",
                    ctx.path,
                    line,
                )
                .with_suggestion("Add ->with(['relationships']) to prevent lazy loading during iteration"),
            );
        }
    }

    /// True when any loop body in the method issues a query.
    fn has_query_in_loop(&self, ctx: &FileContext<'_>, method: &Node) -> bool {
        let mut found = false;
        walk_tree(*method, &mut |node| {
            if !matches!(
                kind_of(&node),
                NodeKind::ForStatement | NodeKind::ForeachStatement | NodeKind::WhileStatement
            ) {
                return;
            }
            let body = node_text(&node, ctx.source);
            if body.contains("::find")
                || body.contains("::where")
                || body.contains("::first")
                || body.contains("DB::")
            {
                found = true;
            }
        });
        found
    }
}

fn has_loop(text: &str) -> bool {
    text.contains("foreach")
        || text.contains("for (")
        || text.contains("while (")
        || text.contains("->each(")
        || text.contains("->map(")
}

fn has_eager_loading(text: &str) -> bool {
    text.contains("->with(") || text.contains("::with(") || text.contains("->load(")
}

/// Relationship access is a property read (`$post->comments`) that is not
/// a plain attribute and not a method call, or an explicit lazy-load.
fn has_relationship_access(text: &str) -> bool {
    if text.contains("->load(") || text.contains("->loadMissing(") {
        return true;
    }
    for capture in PROPERTY_ACCESS.captures_iter(text) {
        let Some(property) = capture.get(1) else {
            continue;
        };
        if PLAIN_ATTRIBUTES.contains(&property.as_str()) {
            continue;
        }
        let rest = text[property.end()..].trim_start();
        if !rest.starts_with('(') {
            return true;
        }
    }
    false
}

impl Analyzer for NPlusOneDetector {
    fn name(&self) -> &'static str {
        "nplusone"
    }

    fn analyze(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, Box<dyn Error>> {
        let mut issues = Vec::new();
        walk_tree(ctx.tree.root_node(), &mut |node| {
            if is_function_like(&node) {
                self.check_method(ctx, &node, &mut issues);
            }
        });
        Ok(issues)
    }
}

#[cfg(test)]
#[path = "nplusone_test.rs"]
mod tests;
