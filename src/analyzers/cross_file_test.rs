use std::path::PathBuf;

use super::*;

fn snapshot(files: &[(&str, &str)]) -> CorpusSnapshot {
    CorpusSnapshot::from_files(
        files
            .iter()
            .map(|(path, content)| (PathBuf::from(path), content.to_string())),
    )
}

fn analyze(files: &[(&str, &str)]) -> Vec<Issue> {
    CrossFileDuplication::new(5, 0.85)
        .analyze(&snapshot(files))
        .unwrap()
}

fn calculate_total(param: &str, bonus: u32) -> String {
    format!(
        "<?php
class OrderService {{
    public function calculateTotal(${param})
    {{
        $total = 0;
        foreach (${param} as $row) {{
            $total += $row->price;
        }}
        return $total + {bonus};
    }}
}}
"
    )
}

#[test]
fn renamed_twin_methods_across_files_are_flagged() {
    let a = calculate_total("items", 10);
    let b = calculate_total("orders", 20);
    let issues = analyze(&[("A.php", &a), ("B.php", &b)]);

    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.kind, "cross_file_duplication");
    assert_eq!(issue.severity, Severity::Major);
    assert_eq!(issue.file_path, PathBuf::from("A.php"));
    assert!(issue.message.contains("A.php"));
    assert!(issue.message.contains("B.php"));
    assert!(issue.end_line.is_some());

    let info = issue.refactor_info.as_ref().unwrap();
    assert!(info["similarity"].as_f64().unwrap() >= 0.85);
    assert_eq!(info["method1"]["file"], "A.php");
    assert_eq!(info["method2"]["file"], "B.php");
    assert!(info["method1"]["lines"].as_str().unwrap().contains('-'));
}

#[test]
fn same_file_twins_are_left_to_the_per_file_analyzer() {
    let a = calculate_total("items", 10);
    let issues = analyze(&[("A.php", &a)]);
    assert!(issues.is_empty());
}

#[test]
fn distinct_methods_hash_into_different_buckets() {
    let a = calculate_total("items", 10);
    let b = "<?php
class Formatter {
    public function render($rows)
    {
        $out = [];
        foreach ($rows as $row) {
            $out[] = strtoupper($row->label);
        }
        return implode(',', $out);
    }
}
";
    let issues = analyze(&[("A.php", &a), ("B.php", b)]);
    assert!(issues.is_empty());
}

#[test]
fn short_methods_are_never_candidates() {
    let getter = "<?php
class Config {
    public function host() {
        return $this->host;
    }
}
";
    let issues = analyze(&[("A.php", getter), ("B.php", getter)]);
    assert!(issues.is_empty());
}

#[test]
fn each_pair_is_reported_once() {
    let a = calculate_total("items", 10);
    let b = calculate_total("orders", 20);
    let c = calculate_total("invoices", 30);
    let issues = analyze(&[("A.php", &a), ("B.php", &b), ("C.php", &c)]);

    // Three files in one bucket: exactly the three unordered pairs.
    assert_eq!(issues.len(), 3);
    let mut pairs: Vec<(String, String)> = issues
        .iter()
        .map(|issue| {
            let info = issue.refactor_info.as_ref().unwrap();
            (
                info["method1"]["file"].as_str().unwrap().to_string(),
                info["method2"]["file"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), 3);
}

#[test]
fn unparseable_corpus_file_contributes_nothing() {
    let a = calculate_total("items", 10);
    let b = calculate_total("orders", 20);
    let issues = analyze(&[
        ("A.php", &a),
        ("B.php", &b),
        ("broken.php", "<?php class {{{{"),
    ]);
    assert_eq!(issues.len(), 1);
}
