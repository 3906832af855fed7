//! Terminal and JSON rendering of an `AnalysisResult`.

use std::error::Error;

use crate::issue::{AnalysisResult, Severity};
use crate::report_helpers;

/// Maximum issues shown by default (use `--show-all` to override).
pub const DEFAULT_ISSUE_LIMIT: usize = 50;

/// Severities in display order.
const SEVERITIES: &[Severity] = &[
    Severity::Critical,
    Severity::Major,
    Severity::Minor,
    Severity::Info,
];

/// Compute how many issues to display based on the `--show-all` flag.
pub fn display_limit(total: usize, show_all: bool) -> usize {
    if show_all {
        total
    } else {
        DEFAULT_ISSUE_LIMIT.min(total)
    }
}

/// Classify the overall result into a human-readable assessment label.
fn assessment(result: &AnalysisResult) -> &'static str {
    let critical = severity_count(result, Severity::Critical);
    let major = severity_count(result, Severity::Major);
    if critical > 0 {
        "Needs attention"
    } else if major > 0 {
        "Moderate"
    } else if result.statistics.total_issues > 0 {
        "Good"
    } else {
        "Excellent"
    }
}

fn severity_count(result: &AnalysisResult, severity: Severity) -> usize {
    result
        .statistics
        .by_severity
        .get(&severity)
        .copied()
        .unwrap_or(0)
}

/// Print a summary of the analysis: file counts, severity breakdown,
/// and the most frequent issue types.
pub fn print_summary(result: &AnalysisResult) {
    let separator = report_helpers::separator(68);

    println!("{separator}");
    println!(" PHP Static Analysis");
    println!();
    println!(" Files discovered:     {:>42}", result.total_files);
    println!(" Files analyzed:       {:>42}", result.analyzed_files);
    println!(" Total issues:         {:>42}", result.statistics.total_issues);

    if result.statistics.total_issues > 0 {
        println!();
        for severity in SEVERITIES {
            let count = severity_count(result, *severity);
            if count > 0 {
                println!("   {:<10}{:>52}", severity.label(), count);
            }
        }

        let mut types: Vec<(&String, &usize)> = result.statistics.by_type.iter().collect();
        types.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        println!();
        println!(" Top issue types:");
        for (kind, count) in types.iter().take(5) {
            println!("   {kind:<40}{count:>22}");
        }
    }

    println!();
    println!(" Assessment:           {:>42}", assessment(result));
    println!("{separator}");
}

/// Print the summary followed by each issue with location, severity,
/// message, and suggestion.
pub fn print_detailed(result: &AnalysisResult, show_all: bool) {
    print_summary(result);

    if result.issues.is_empty() {
        return;
    }

    let separator = report_helpers::separator(68);
    let limit = display_limit(result.issues.len(), show_all);

    println!();
    println!(" Issues (sorted by file and line)");

    for issue in &result.issues[..limit] {
        println!();
        let location = match issue.end_line {
            Some(end) if end > issue.line => {
                format!("{}:{}-{}", issue.file_path.display(), issue.line, end)
            }
            _ => format!("{}:{}", issue.file_path.display(), issue.line),
        };
        println!(" {location} [{}] {}", issue.severity.label(), issue.kind);
        println!("   {}", issue.message);
        if let Some(suggestion) = &issue.suggestion {
            println!("   suggestion: {suggestion}");
        }
    }

    println!();
    println!("{separator}");

    if limit < result.issues.len() {
        println!();
        println!(
            " Showing first {} of {} issues.",
            limit,
            result.issues.len()
        );
        println!(" Use --show-all to see all issues.");
    }
}

/// Print the full result as pretty JSON.
pub fn print_json(result: &AnalysisResult) -> Result<(), Box<dyn Error>> {
    report_helpers::print_json_stdout(result)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
