use std::path::Path;

use super::*;
use crate::parse::PhpParser;

fn extract(source: &str, min_lines: usize) -> Vec<MethodCandidate> {
    let mut parser = PhpParser::new().unwrap();
    let tree = parser.parse(source).unwrap();
    extract_methods(&tree, source, Path::new("app/Service.php"), min_lines)
}

const SERVICE: &str = "<?php
class Service {
    public function getName() {
        return $this->name;
    }

    public function process(array $rows) {
        $out = [];
        foreach ($rows as $row) {
            $out[] = $row->value * 2;
        }
        return $out;
    }
}
";

#[test]
fn short_methods_are_excluded() {
    let candidates = extract(SERVICE, 5);
    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["process"]);
}

#[test]
fn candidate_locations_are_one_based() {
    let candidates = extract(SERVICE, 5);
    let process = &candidates[0];
    assert_eq!(process.start_line, 7);
    assert_eq!(process.end_line, 13);
    assert_eq!(process.line_count, 6);
    assert_eq!(process.lines_label(), "7-13");
    assert_eq!(process.file_path, Path::new("app/Service.php"));
}

#[test]
fn candidate_body_is_normalized() {
    let candidates = extract(SERVICE, 5);
    let process = &candidates[0];
    assert!(process.normalized.contains("$VAR"));
    assert!(!process.normalized.contains("$rows"));
    assert!(process.body.contains("$rows"));
}

#[test]
fn min_lines_zero_extracts_everything() {
    let candidates = extract(SERVICE, 0);
    assert_eq!(candidates.len(), 2);
}

#[test]
fn free_functions_are_candidates() {
    let source = "<?php
function helper($a) {
    $b = $a + 1;
    $c = $b * 2;
    $d = $c - 3;
    $e = $d / 4;
    return $e;
}
";
    let candidates = extract(source, 5);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name, "helper");
}

#[test]
fn tokens_come_from_normalized_body() {
    let candidates = extract(SERVICE, 5);
    let tokens = candidates[0].tokens();
    assert!(tokens.contains(&"foreach"));
    assert!(tokens.iter().all(|t| *t != "$rows"));
}
