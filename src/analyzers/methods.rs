//! Shared method-candidate extraction for the duplication analyzers.

use std::path::{Path, PathBuf};

use tree_sitter::Tree;

use crate::normalize::{normalize, tokenize};
use crate::parse::{declared_name, is_function_like, line_range, node_text, walk_tree};

/// A method or function body eligible for duplication comparison.
pub struct MethodCandidate {
    pub name: String,
    pub file_path: PathBuf,
    pub body: String,
    pub normalized: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Lines spanned by the declaration (`end_line - start_line`);
    /// candidates below the minimum threshold are never extracted.
    pub line_count: usize,
}

impl MethodCandidate {
    pub fn tokens(&self) -> Vec<&str> {
        tokenize(&self.normalized)
    }

    /// `"start-end"` display form used in refactor info.
    pub fn lines_label(&self) -> String {
        format!("{}-{}", self.start_line, self.end_line)
    }
}

/// Extract every method/function spanning at least `min_lines` lines.
/// Trivial one-liners and short getters never become candidates.
pub fn extract_methods(
    tree: &Tree,
    source: &str,
    path: &Path,
    min_lines: usize,
) -> Vec<MethodCandidate> {
    let mut candidates = Vec::new();

    walk_tree(tree.root_node(), &mut |node| {
        if !is_function_like(&node) {
            return;
        }
        let (start_line, end_line) = line_range(&node);
        let line_count = end_line - start_line;
        if line_count < min_lines {
            return;
        }
        let body = node_text(&node, source);
        candidates.push(MethodCandidate {
            name: declared_name(&node, source)
                .unwrap_or("anonymous")
                .to_string(),
            file_path: path.to_path_buf(),
            normalized: normalize(body),
            body: body.to_string(),
            start_line,
            end_line,
            line_count,
        });
    });

    candidates
}

#[cfg(test)]
#[path = "methods_test.rs"]
mod tests;
