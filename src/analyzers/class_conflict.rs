//! Class conflicts across the corpus: several classes bound to one
//! database table, and same-name methods duplicated between classes.

use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::json;

use crate::corpus::CorpusSnapshot;
use crate::issue::{Issue, Severity};
use crate::parse::PhpParser;
use crate::pipeline::CorpusAnalyzer;
use crate::similarity::levenshtein_ratio;

use super::methods::{extract_methods, MethodCandidate};

static TABLE_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"protected\s+\$table\s*=\s*['"](\w+)['"]"#).expect("table binding regex")
});
static CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+(\w+)").expect("class name regex"));

/// Levenshtein ratio above which two same-name method bodies count as
/// duplicated between classes.
const METHOD_BODY_SIMILARITY: f64 = 0.7;

/// Methods shorter than this are too generic to compare across classes.
const MIN_METHOD_LINES: usize = 3;

struct FileFacts {
    path: PathBuf,
    class_name: Option<String>,
    table: Option<String>,
    methods: Vec<MethodCandidate>,
}

pub struct ClassConflictAnalyzer;

impl ClassConflictAnalyzer {
    pub fn new() -> Self {
        ClassConflictAnalyzer
    }

    fn gather_facts(&self, corpus: &CorpusSnapshot) -> Result<Vec<FileFacts>, Box<dyn Error>> {
        let mut parser = PhpParser::new()?;
        let mut facts = Vec::new();
        for (path, source) in corpus.iter() {
            let methods = match parser.parse(source) {
                Ok(tree) => extract_methods(&tree, source, path, MIN_METHOD_LINES),
                Err(_) => Vec::new(),
            };
            facts.push(FileFacts {
                path: path.to_path_buf(),
                class_name: CLASS_NAME
                    .captures(source)
                    .map(|c| c[1].to_string()),
                table: TABLE_BINDING.captures(source).map(|c| c[1].to_string()),
                methods,
            });
        }
        Ok(facts)
    }

    fn check_table_conflicts(&self, facts: &[FileFacts], issues: &mut Vec<Issue>) {
        let mut by_table: HashMap<&str, Vec<&FileFacts>> = HashMap::new();
        for fact in facts {
            if let Some(table) = &fact.table {
                by_table.entry(table.as_str()).or_default().push(fact);
            }
        }

        for (table, users) in by_table {
            if users.len() < 2 {
                continue;
            }
            // Each conflicted file reports its own finding, naming the
            // other classes sharing the table.
            for fact in &users {
                let class_name = fact.class_name.as_deref().unwrap_or("unknown");
                let others: Vec<&str> = users
                    .iter()
                    .filter(|f| f.path != fact.path)
                    .map(|f| f.class_name.as_deref().unwrap_or("unknown"))
                    .collect();
                let info = BTreeMap::from([
                    ("pattern".to_string(), json!("Multiple classes for one table")),
                    ("table".to_string(), json!(table)),
                    ("conflictingClasses".to_string(), json!(others)),
                    (
                        "recommendation".to_string(),
                        json!("Use Strategy Pattern or separate tables"),
                    ),
                ]);
                issues.push(
                    Issue::new(
                        "multiple_classes_for_table",
                        Severity::Major,
                        format!(
                            "Multiple classes ({}) use the same table \"{table}\": {class_name}",
                            users.len()
                        ),
                        fact.path.clone(),
                        1,
                    )
                    .with_suggestion(format!(
                        "Consider using Single Table Inheritance (STI) or separate tables. \
                         Conflicting classes: {}. This creates confusion about which class to use.",
                        others.join(", ")
                    ))
                    .with_refactor_info(info),
                );
            }
        }
    }

    fn check_duplicate_methods(&self, facts: &[FileFacts], issues: &mut Vec<Issue>) {
        for i in 0..facts.len() {
            for j in (i + 1)..facts.len() {
                // Facts follow corpus order, so `facts[i].path < facts[j].path`;
                // each pair is reported once, from the smaller path.
                let (file, other) = (&facts[i], &facts[j]);
                for method in &file.methods {
                    let Some(twin) = other.methods.iter().find(|m| {
                        m.name == method.name
                            && levenshtein_ratio(&m.normalized, &method.normalized)
                                > METHOD_BODY_SIMILARITY
                    }) else {
                        continue;
                    };

                    let other_class = other.class_name.as_deref().unwrap_or("unknown");
                    let info = BTreeMap::from([
                        (
                            "pattern".to_string(),
                            json!("Code duplication between classes"),
                        ),
                        ("methodName".to_string(), json!(method.name)),
                        ("duplicateFile".to_string(), json!(twin.file_path)),
                        (
                            "recommendation".to_string(),
                            json!("Extract to parent class or use trait"),
                        ),
                    ]);
                    issues.push(
                        Issue::new(
                            "duplicate_methods",
                            Severity::Major,
                            format!("Method \"{}\" is duplicated in classes", method.name),
                            file.path.clone(),
                            method.start_line,
                        )
                        .with_end_line(method.end_line)
                        .with_suggestion(format!(
                            "Extract common logic to parent class or trait. Duplicate exists in: {other_class}"
                        ))
                        .with_refactor_info(info),
                    );
                }
            }
        }
    }
}

impl CorpusAnalyzer for ClassConflictAnalyzer {
    fn name(&self) -> &'static str {
        "class_conflict"
    }

    fn analyze(&self, corpus: &CorpusSnapshot) -> Result<Vec<Issue>, Box<dyn Error>> {
        let facts = self.gather_facts(corpus)?;
        let mut issues = Vec::new();
        self.check_table_conflicts(&facts, &mut issues);
        self.check_duplicate_methods(&facts, &mut issues);
        Ok(issues)
    }
}

#[cfg(test)]
#[path = "class_conflict_test.rs"]
mod tests;
