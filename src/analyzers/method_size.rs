//! Oversized method detection.

use std::collections::BTreeMap;
use std::error::Error;

use serde_json::json;

use crate::issue::{Issue, Severity};
use crate::parse::{declared_name, is_function_like, line_range, walk_tree};
use crate::pipeline::{Analyzer, FileContext};

pub struct MethodSizeAnalyzer {
    max_lines: usize,
}

impl MethodSizeAnalyzer {
    pub fn new(max_lines: usize) -> Self {
        MethodSizeAnalyzer { max_lines }
    }
}

impl Analyzer for MethodSizeAnalyzer {
    fn name(&self) -> &'static str {
        "method_size"
    }

    fn analyze(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, Box<dyn Error>> {
        let mut issues = Vec::new();

        walk_tree(ctx.tree.root_node(), &mut |node| {
            if !is_function_like(&node) {
                return;
            }
            let (start_line, end_line) = line_range(&node);
            let lines_count = end_line - start_line + 1;
            if lines_count <= self.max_lines {
                return;
            }
            let method_name = declared_name(&node, ctx.source).unwrap_or("anonymous");

            let info = BTreeMap::from([
                ("methodName".to_string(), json!(method_name)),
                ("startLine".to_string(), json!(start_line)),
                ("endLine".to_string(), json!(end_line)),
                ("linesCount".to_string(), json!(lines_count)),
                ("suggestedLines".to_string(), json!(self.max_lines)),
            ]);
            issues.push(
                Issue::new(
                    "method_size",
                    Severity::Major,
                    format!(
                        "Method \"{method_name}\" is too long ({lines_count} lines, max recommended: {})",
                        self.max_lines
                    ),
                    ctx.path,
                    start_line,
                )
                .with_end_line(end_line)
                .with_suggestion(
                    "Consider breaking down this method into smaller, focused methods following Single Responsibility Principle",
                )
                .with_refactor_info(info),
            );
        });

        Ok(issues)
    }
}

#[cfg(test)]
#[path = "method_size_test.rs"]
mod tests;
