//! Performance anti-patterns in query building and loops.

use std::error::Error;
use std::sync::LazyLock;

use regex::Regex;
use tree_sitter::Node;

use crate::issue::{Issue, Severity};
use crate::parse::{is_function_like, kind_of, line_range, node_text, walk_tree, NodeKind};
use crate::pipeline::{Analyzer, FileContext};

static REFERENCE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(Status|Type|Role|Permission|Category|Tag)\b").expect("reference table regex")
});

const WHERE_METHODS: &[&str] = &[
    "->where(",
    "->whereIn(",
    "->whereHas(",
    "->whereNotNull(",
    "->whereNull(",
    "->whereBetween(",
    "->whereDate(",
    "->whereYear(",
    "->whereTime(",
    "::where(",
];

const LIMIT_METHODS: &[&str] = &["->limit(", "->take(", "->paginate(", "->simplePaginate("];

pub struct PerformanceAnalyzer;

impl PerformanceAnalyzer {
    pub fn new() -> Self {
        PerformanceAnalyzer
    }

    fn check_queries(
        &self,
        ctx: &FileContext<'_>,
        text: &str,
        line: usize,
        issues: &mut Vec<Issue>,
    ) {
        let has_where = WHERE_METHODS.iter().any(|m| text.contains(m));
        let has_limit = LIMIT_METHODS.iter().any(|m| text.contains(m));
        let has_with =
            text.contains("->with(") || text.contains("::with(") || text.contains("with([");
        let has_select = text.contains("->select(");
        let has_order_by = text.contains("->orderBy(");
        let has_get = text.contains("->get()") || text.contains("::get()");

        if has_get && !has_where && !has_limit && !has_with && !has_select && !has_order_by {
            issues.push(
                Issue::new(
                    "query_without_limit",
                    Severity::Major,
                    "Query fetches all records without WHERE or LIMIT",
                    ctx.path,
                    line,
                )
                .with_suggestion("Add ->where() conditions or ->limit() to prevent loading all records"),
            );
        }

        if text.contains("::all()") && !REFERENCE_TABLE.is_match(text) {
            issues.push(
                Issue::new(
                    "fetch_all_records",
                    Severity::Major,
                    "Using ::all() loads entire table into memory",
                    ctx.path,
                    line,
                )
                .with_suggestion(
                    "Use ::get() with where() clause or paginate() for large datasets. OK for small reference tables.",
                ),
            );
        }

        if text.contains("count()") && text.contains("get()") {
            issues.push(
                Issue::new(
                    "inefficient_count",
                    Severity::Minor,
                    "Loading records just to count them",
                    ctx.path,
                    line,
                )
                .with_suggestion("Use ->count() directly on query instead of ->get()->count()"),
            );
        }

        if text.contains("->first()") && !text.contains("->orderBy(") {
            issues.push(
                Issue::new(
                    "first_without_order",
                    Severity::Minor,
                    "Using first() without orderBy() can return unpredictable results",
                    ctx.path,
                    line,
                )
                .with_suggestion("Add ->orderBy() before ->first() for consistent results"),
            );
        }

        let has_filters = has_where || has_limit || has_with || has_order_by
            || text.contains("->groupBy(");
        if text.contains("->get()") && !has_select && !has_filters {
            issues.push(
                Issue::new(
                    "select_all_columns",
                    Severity::Minor,
                    "Query selects all columns (SELECT *)",
                    ctx.path,
                    line,
                )
                .with_suggestion(
                    "Use ->select(['column1', 'column2']) to fetch only needed columns and reduce memory usage",
                ),
            );
        }
    }

    fn check_loops(
        &self,
        ctx: &FileContext<'_>,
        method: &Node,
        text: &str,
        line: usize,
        issues: &mut Vec<Issue>,
    ) {
        if text.contains("foreach") && text.contains("array_push") {
            issues.push(
                Issue::new(
                    "inefficient_array_build",
                    Severity::Minor,
                    "Using array_push() in loop is slower than $arr[] = ",
                    ctx.path,
                    line,
                )
                .with_suggestion("Use $array[] = $value instead of array_push($array, $value)"),
            );
        }

        // count() evaluated on every iteration of a loop in this method.
        let mut count_in_loop = false;
        walk_tree(*method, &mut |node| {
            if is_loop(&node) && node_text(&node, ctx.source).contains("count(") {
                count_in_loop = true;
            }
        });
        if count_in_loop {
            issues.push(
                Issue::new(
                    "count_in_loop",
                    Severity::Minor,
                    "Calling count() inside loop on each iteration",
                    ctx.path,
                    line,
                )
                .with_suggestion("Store count() result in variable before loop"),
            );
        }
    }
}

fn is_loop(node: &Node) -> bool {
    matches!(
        kind_of(node),
        NodeKind::ForStatement | NodeKind::ForeachStatement | NodeKind::WhileStatement
    )
}

impl Analyzer for PerformanceAnalyzer {
    fn name(&self) -> &'static str {
        "performance"
    }

    fn analyze(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, Box<dyn Error>> {
        let mut issues = Vec::new();

        walk_tree(ctx.tree.root_node(), &mut |node| {
            if !is_function_like(&node) {
                return;
            }
            let text = node_text(&node, ctx.source);
            let (line, _) = line_range(&node);
            self.check_queries(ctx, text, line, &mut issues);
            self.check_loops(ctx, &node, text, line, &mut issues);
        });

        Ok(issues)
    }
}

#[cfg(test)]
#[path = "performance_test.rs"]
mod tests;
