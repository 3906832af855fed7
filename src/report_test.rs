use super::*;

use crate::issue::{AnalysisResult, Issue};

fn sample_result() -> AnalysisResult {
    let issues = vec![
        Issue::new("sql_injection_risk", Severity::Critical, "raw query", "app/A.php", 10)
            .with_end_line(14)
            .with_suggestion("use bindings"),
        Issue::new("method_size", Severity::Major, "too long", "app/A.php", 30),
        Issue::new("magic_number", Severity::Minor, "86400", "app/B.php", 7),
    ];
    AnalysisResult::new(3, 3, issues)
}

#[test]
fn display_limit_respects_show_all() {
    assert_eq!(display_limit(100, false), DEFAULT_ISSUE_LIMIT);
    assert_eq!(display_limit(100, true), 100);
    assert_eq!(display_limit(3, false), 3);
    assert_eq!(display_limit(0, false), 0);
}

#[test]
fn print_summary_does_not_panic() {
    print_summary(&sample_result());
}

#[test]
fn print_summary_on_clean_result() {
    let result = AnalysisResult::new(5, 5, Vec::new());
    print_summary(&result);
}

#[test]
fn print_detailed_does_not_panic() {
    print_detailed(&sample_result(), false);
    print_detailed(&sample_result(), true);
}

#[test]
fn json_output_round_trips() {
    let result = sample_result();
    print_json(&result).unwrap();

    let text = serde_json::to_string(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["totalFiles"], 3);
    assert_eq!(value["analyzedFiles"], 3);
    assert_eq!(value["statistics"]["totalIssues"], 3);
    assert_eq!(value["statistics"]["bySeverity"]["critical"], 1);
    assert_eq!(value["issues"][0]["type"], "sql_injection_risk");
}
