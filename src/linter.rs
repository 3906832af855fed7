//! Bridge to external coding-standard tools (phpcs, phpmd).
//!
//! Both tools are optional: a missing binary, a crash, or unparseable
//! output all count as zero findings. Nothing here can fail the run.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

use crate::issue::{Issue, Severity};

pub struct Linter {
    phpcs_cmd: String,
    phpmd_cmd: String,
}

impl Default for Linter {
    fn default() -> Self {
        Linter {
            phpcs_cmd: "vendor/bin/phpcs".to_string(),
            phpmd_cmd: "vendor/bin/phpmd".to_string(),
        }
    }
}

impl Linter {
    pub fn new() -> Self {
        Linter::default()
    }

    /// Override tool paths, mainly for tests and non-standard installs.
    pub fn with_commands(phpcs_cmd: impl Into<String>, phpmd_cmd: impl Into<String>) -> Self {
        Linter {
            phpcs_cmd: phpcs_cmd.into(),
            phpmd_cmd: phpmd_cmd.into(),
        }
    }

    /// Run both tools against one file and collect whatever they report.
    pub fn check(&self, path: &Path) -> Vec<Issue> {
        let mut issues = Vec::new();
        self.check_phpcs(path, &mut issues);
        self.check_phpmd(path, &mut issues);
        issues
    }

    fn check_phpcs(&self, path: &Path, issues: &mut Vec<Issue>) {
        let output = Command::new(&self.phpcs_cmd)
            .args(["--standard=PSR12", "--report=json"])
            .arg(path)
            .output();
        let Ok(output) = output else {
            return;
        };
        let Ok(data) = serde_json::from_slice::<Value>(&output.stdout) else {
            return;
        };

        let Some(files) = data.get("files").and_then(Value::as_object) else {
            return;
        };
        // phpcs keys the report by the path it was given; when that misses
        // (absolute vs relative), fall back to the only entry.
        let file_report = files
            .get(path.to_string_lossy().as_ref())
            .or_else(|| files.values().next());
        let Some(messages) = file_report
            .and_then(|f| f.get("messages"))
            .and_then(Value::as_array)
        else {
            return;
        };

        for message in messages {
            let Some(text) = message.get("message").and_then(Value::as_str) else {
                continue;
            };
            let line = message
                .get("line")
                .and_then(Value::as_u64)
                .unwrap_or(1) as usize;
            let severity = match message.get("severity").and_then(Value::as_u64) {
                Some(5) => Severity::Critical,
                _ => Severity::Minor,
            };
            issues.push(Issue::new("coding_standard", severity, text, path, line));
        }
    }

    fn check_phpmd(&self, path: &Path, issues: &mut Vec<Issue>) {
        let output = Command::new(&self.phpmd_cmd)
            .arg(path)
            .args(["json", "codesize,design,naming,unusedcode"])
            .output();
        let Ok(output) = output else {
            return;
        };
        let Ok(data) = serde_json::from_slice::<Value>(&output.stdout) else {
            return;
        };

        let Some(violations) = data
            .get("files")
            .and_then(Value::as_array)
            .and_then(|files| files.first())
            .and_then(|file| file.get("violations"))
            .and_then(Value::as_array)
        else {
            return;
        };

        for violation in violations {
            let Some(text) = violation.get("message").and_then(Value::as_str) else {
                continue;
            };
            let line = violation
                .get("beginLine")
                .and_then(Value::as_u64)
                .unwrap_or(1) as usize;
            let severity = match violation.get("priority").and_then(Value::as_u64) {
                Some(p) if p >= 5 => Severity::Critical,
                Some(p) if p >= 3 => Severity::Major,
                _ => Severity::Minor,
            };
            issues.push(Issue::new("code_smell", severity, text, path, line));
        }
    }
}

#[cfg(test)]
#[path = "linter_test.rs"]
mod tests;
