//! Finding data model and result aggregation.
//!
//! Every rule analyzer produces `Issue` values; the pipeline folds them
//! into one `AnalysisResult` whose statistics are a pure function of the
//! issue list.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// Severity of a finding, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Info,
}

impl Severity {
    /// Human-readable uppercase label for display in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Major => "MAJOR",
            Severity::Minor => "MINOR",
            Severity::Info => "INFO",
        }
    }
}

/// One reported problem with location, severity, and optional remediation
/// hints. Immutable once created; built by exactly one analyzer invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    #[serde(rename = "filePath")]
    pub file_path: PathBuf,
    /// 1-based line of the finding.
    pub line: usize,
    /// 1-based inclusive end line, when the finding spans a range.
    #[serde(rename = "endLine", skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Free-form machine-readable remediation data.
    #[serde(rename = "refactorInfo", skip_serializing_if = "Option::is_none")]
    pub refactor_info: Option<BTreeMap<String, serde_json::Value>>,
}

impl Issue {
    pub fn new(
        kind: &str,
        severity: Severity,
        message: impl Into<String>,
        file_path: impl Into<PathBuf>,
        line: usize,
    ) -> Self {
        Issue {
            kind: kind.to_string(),
            severity,
            message: message.into(),
            file_path: file_path.into(),
            line,
            end_line: None,
            suggestion: None,
            refactor_info: None,
        }
    }

    pub fn with_end_line(mut self, end_line: usize) -> Self {
        self.end_line = Some(end_line);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_refactor_info(mut self, info: BTreeMap<String, serde_json::Value>) -> Self {
        self.refactor_info = Some(info);
        self
    }
}

/// Issue counts broken down by rule identifier and severity.
#[derive(Debug, Default, Serialize)]
pub struct Statistics {
    #[serde(rename = "totalIssues")]
    pub total_issues: usize,
    #[serde(rename = "byType")]
    pub by_type: BTreeMap<String, usize>,
    #[serde(rename = "bySeverity")]
    pub by_severity: BTreeMap<Severity, usize>,
}

impl Statistics {
    /// Fold issue counts. Pure: the same issue list always yields the
    /// same statistics, and `total_issues == issues.len()`.
    pub fn collect(issues: &[Issue]) -> Self {
        issues.iter().fold(Statistics::default(), |mut acc, issue| {
            acc.total_issues += 1;
            *acc.by_type.entry(issue.kind.clone()).or_insert(0) += 1;
            *acc.by_severity.entry(issue.severity).or_insert(0) += 1;
            acc
        })
    }
}

/// Final output of one analysis run.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    #[serde(rename = "totalFiles")]
    pub total_files: usize,
    #[serde(rename = "analyzedFiles")]
    pub analyzed_files: usize,
    pub issues: Vec<Issue>,
    pub statistics: Statistics,
}

impl AnalysisResult {
    /// Build the result from collected issues. Issues are sorted by
    /// `(file_path, line, kind)` so output is deterministic regardless of
    /// worker scheduling; statistics are derived from the sorted list.
    pub fn new(total_files: usize, analyzed_files: usize, mut issues: Vec<Issue>) -> Self {
        issues.sort_by(|a, b| {
            (&a.file_path, a.line, &a.kind).cmp(&(&b.file_path, b.line, &b.kind))
        });
        let statistics = Statistics::collect(&issues);
        AnalysisResult {
            total_files,
            analyzed_files,
            issues,
            statistics,
        }
    }
}

#[cfg(test)]
#[path = "issue_test.rs"]
mod tests;
