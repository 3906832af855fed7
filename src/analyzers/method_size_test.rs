use std::path::Path;

use super::*;
use crate::corpus::CorpusSnapshot;
use crate::parse::PhpParser;

fn analyze(source: &str, max_lines: usize) -> Vec<Issue> {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(source).unwrap();
    let corpus = CorpusSnapshot::default();
    let ctx = FileContext {
        path: Path::new("app/Service.php"),
        source,
        tree: &tree,
        corpus: &corpus,
    };
    MethodSizeAnalyzer::new(max_lines).analyze(&ctx).unwrap()
}

fn method_with_body_lines(lines: usize) -> String {
    let mut source = String::from("<?php\nclass Worker {\n    public function run() {\n");
    for i in 0..lines {
        source.push_str(&format!("        $step{i} = {i};\n"));
    }
    source.push_str("    }\n}\n");
    source
}

#[test]
fn oversized_method_is_flagged() {
    // Declaration spans 2 + 20 body lines.
    let issues = analyze(&method_with_body_lines(20), 15);
    assert_eq!(issues.len(), 1);

    let issue = &issues[0];
    assert_eq!(issue.kind, "method_size");
    assert_eq!(issue.severity, Severity::Major);
    assert!(issue.message.contains("run"));
    assert!(issue.message.contains("22 lines"));

    let info = issue.refactor_info.as_ref().unwrap();
    assert_eq!(info["methodName"], "run");
    assert_eq!(info["linesCount"], 22);
    assert_eq!(info["suggestedLines"], 15);
}

#[test]
fn method_at_the_limit_is_fine() {
    // 13 body lines + declaration and closing brace = exactly 15.
    let issues = analyze(&method_with_body_lines(13), 15);
    assert!(issues.is_empty());
}

#[test]
fn free_functions_are_measured_too() {
    let mut source = String::from("<?php\nfunction migrate() {\n");
    for i in 0..20 {
        source.push_str(&format!("    $step{i} = {i};\n"));
    }
    source.push_str("}\n");

    let issues = analyze(&source, 15);
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("migrate"));
}

#[test]
fn line_range_is_reported() {
    let issues = analyze(&method_with_body_lines(20), 15);
    let issue = &issues[0];
    assert_eq!(issue.line, 3);
    assert_eq!(issue.end_line, Some(24));
}
