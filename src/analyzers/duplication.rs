//! Same-file duplication: near-identical methods and repeated code blocks.

use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::issue::{Issue, Severity};
use crate::normalize::{normalize, tokenize};
use crate::parse::{kind_of, line_range, node_text, NodeKind};
use crate::pipeline::{Analyzer, FileContext};
use crate::similarity::jaccard;

use super::methods::extract_methods;

static CONFIG_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"][a-z_]+['"]\s*=>\s*['"]"#).expect("config array regex"));

/// A statement span eligible for block-level comparison.
struct CodeBlock {
    raw: String,
    normalized: String,
    start_line: usize,
    end_line: usize,
}

impl CodeBlock {
    fn overlaps(&self, other: &CodeBlock) -> bool {
        self.start_line <= other.end_line && self.end_line >= other.start_line
    }
}

/// Detects duplicated methods and code blocks within a single file.
/// Cross-file duplication is a separate corpus-level analyzer.
pub struct DuplicationAnalyzer {
    min_lines: usize,
    threshold: f64,
}

impl DuplicationAnalyzer {
    pub fn new(min_lines: usize, threshold: f64) -> Self {
        DuplicationAnalyzer {
            min_lines,
            threshold,
        }
    }

    fn duplicate_methods(&self, ctx: &FileContext<'_>, issues: &mut Vec<Issue>) {
        let methods = extract_methods(ctx.tree, ctx.source, ctx.path, self.min_lines);
        if methods.len() < 2 {
            return;
        }

        let mut compared: HashSet<(String, String)> = HashSet::new();

        for i in 0..methods.len() {
            for j in (i + 1)..methods.len() {
                let first = &methods[i];
                let second = &methods[j];

                // Same declaration reached twice cannot be a duplicate.
                if first.name == second.name && first.start_line == second.start_line {
                    continue;
                }
                if !compared.insert((first.name.clone(), second.name.clone())) {
                    continue;
                }

                let score = jaccard(&first.tokens(), &second.tokens());
                if score < self.threshold {
                    continue;
                }

                let info = BTreeMap::from([
                    ("method1".to_string(), json!(first.name)),
                    ("method2".to_string(), json!(second.name)),
                    ("similarity".to_string(), json!(score)),
                    ("lines1".to_string(), json!(first.lines_label())),
                    ("lines2".to_string(), json!(second.lines_label())),
                ]);
                issues.push(
                    Issue::new(
                        "duplicate_method",
                        Severity::Major,
                        format!(
                            "Methods \"{}\" and \"{}\" are {}% similar",
                            first.name,
                            second.name,
                            (score * 100.0).round()
                        ),
                        ctx.path,
                        first.start_line,
                    )
                    .with_suggestion("Extract common logic into a shared private method or trait")
                    .with_refactor_info(info),
                );
            }
        }
    }

    fn duplicate_blocks(&self, ctx: &FileContext<'_>, issues: &mut Vec<Issue>) {
        let blocks = self.extract_blocks(ctx);
        let mut compared: HashSet<(usize, usize)> = HashSet::new();

        for i in 0..blocks.len() {
            for j in (i + 1)..blocks.len() {
                let first = &blocks[i];
                let second = &blocks[j];

                if first.start_line == second.start_line && first.end_line == second.end_line {
                    continue;
                }
                // Nested or overlapping spans are the same code, not copies.
                if first.overlaps(second) {
                    continue;
                }
                if !compared.insert((first.start_line, second.start_line)) {
                    continue;
                }
                // Route tables, config arrays, and migration schemas are
                // expected to look alike without being duplication.
                if is_boilerplate(&first.raw) && is_boilerplate(&second.raw) {
                    continue;
                }

                let score = jaccard(&tokenize(&first.normalized), &tokenize(&second.normalized));
                if score < self.threshold {
                    continue;
                }

                let lines_count = first.end_line - first.start_line;
                let info = BTreeMap::from([
                    (
                        "block1Lines".to_string(),
                        json!(format!("{}-{}", first.start_line, first.end_line)),
                    ),
                    (
                        "block2Lines".to_string(),
                        json!(format!("{}-{}", second.start_line, second.end_line)),
                    ),
                    ("similarity".to_string(), json!(score)),
                    ("linesCount".to_string(), json!(lines_count)),
                ]);
                issues.push(
                    Issue::new(
                        "duplicate_code_block",
                        Severity::Minor,
                        format!(
                            "Code block at lines {}-{} is {}% similar to lines {}-{}",
                            first.start_line,
                            first.end_line,
                            (score * 100.0).round(),
                            second.start_line,
                            second.end_line
                        ),
                        ctx.path,
                        first.start_line,
                    )
                    .with_suggestion("Extract duplicate code into a separate method")
                    .with_refactor_info(info),
                );
            }
        }
    }

    fn extract_blocks(&self, ctx: &FileContext<'_>) -> Vec<CodeBlock> {
        let mut blocks = Vec::new();
        crate::parse::walk_tree(ctx.tree.root_node(), &mut |node| {
            if !matches!(
                kind_of(&node),
                NodeKind::CompoundStatement | NodeKind::ExpressionStatement
            ) {
                return;
            }
            let (start_line, end_line) = line_range(&node);
            if end_line - start_line < self.min_lines {
                return;
            }
            let raw = node_text(&node, ctx.source).to_string();
            blocks.push(CodeBlock {
                normalized: normalize(&raw),
                raw,
                start_line,
                end_line,
            });
        });
        blocks
    }
}

impl Analyzer for DuplicationAnalyzer {
    fn name(&self) -> &'static str {
        "duplication"
    }

    fn analyze(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, Box<dyn Error>> {
        let mut issues = Vec::new();
        self.duplicate_methods(ctx, &mut issues);
        self.duplicate_blocks(ctx, &mut issues);
        Ok(issues)
    }
}

/// Route registrations, config arrays, and migration schemas share shape
/// by construction; flagging them as duplicates is pure noise.
fn is_boilerplate(code: &str) -> bool {
    if code.contains("Route::")
        && (code.contains("->group(") || code.contains("->middleware(") || code.contains("->prefix("))
    {
        return true;
    }
    if CONFIG_ARRAY.is_match(code) && code.contains('[') && code.contains(']') {
        return true;
    }
    if code.contains("$table->") && code.contains("Schema::") {
        return true;
    }
    false
}

#[cfg(test)]
#[path = "duplication_test.rs"]
mod tests;
