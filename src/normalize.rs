//! Source normalization for structural comparison.
//!
//! Duplication detection must be insensitive to identifier renaming and
//! literal values but sensitive to structural shape, so variables,
//! strings, and numbers are folded to placeholders before tokenizing.

use std::sync::LazyLock;

use regex::Regex;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("line comment regex"));
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment regex"));
static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$[a-zA-Z_][a-zA-Z0-9_]*").expect("variable regex"));
static SINGLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'[^']*'").expect("single-quoted regex"));
static DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*""#).expect("double-quoted regex"));
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("number regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Fold a PHP code span to its comparison-ready form: comments stripped,
/// variables to `$VAR`, string literals to `'STRING'`/`"STRING"`, integer
/// literals to `NUM`, whitespace collapsed. The replacement order matters
/// (comments before variables before strings before numbers) and is part
/// of the contract: two bodies that differ only in names and literals
/// normalize to identical text.
pub fn normalize(code: &str) -> String {
    let code = LINE_COMMENT.replace_all(code, "");
    let code = BLOCK_COMMENT.replace_all(&code, "");
    let code = VARIABLE.replace_all(&code, "$$VAR");
    let code = SINGLE_QUOTED.replace_all(&code, "'STRING'");
    let code = DOUBLE_QUOTED.replace_all(&code, "\"STRING\"");
    let code = NUMBER.replace_all(&code, "NUM");
    let code = WHITESPACE.replace_all(&code, " ");
    code.trim().to_string()
}

/// Split normalized text into comparison tokens. Deterministic and pure:
/// identical input always yields identical output, which the structural
/// hash bucketing depends on.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|token| !token.is_empty() && !is_comment_marker(token))
        .collect()
}

fn is_comment_marker(token: &str) -> bool {
    token.starts_with("//") || token.starts_with("/*") || token.starts_with('*')
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
