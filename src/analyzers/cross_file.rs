//! Cross-file method duplication over the corpus snapshot.
//!
//! Candidates from every file are bucketed by a structural hash of their
//! normalized body; only same-bucket pairs are compared. Near-duplicates
//! that normalize differently land in different buckets and are never
//! compared — a deliberate recall/throughput trade-off.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error;
use std::path::PathBuf;

use serde_json::json;

use crate::corpus::CorpusSnapshot;
use crate::issue::{Issue, Severity};
use crate::parse::PhpParser;
use crate::pipeline::CorpusAnalyzer;
use crate::similarity::{jaccard, structural_hash};

use super::methods::{extract_methods, MethodCandidate};

pub struct CrossFileDuplication {
    min_lines: usize,
    threshold: f64,
}

impl CrossFileDuplication {
    pub fn new(min_lines: usize, threshold: f64) -> Self {
        CrossFileDuplication {
            min_lines,
            threshold,
        }
    }

    fn collect_candidates(
        &self,
        corpus: &CorpusSnapshot,
    ) -> Result<Vec<MethodCandidate>, Box<dyn Error>> {
        let mut parser = PhpParser::new()?;
        let mut candidates = Vec::new();
        for (path, source) in corpus.iter() {
            // Unparseable files were already reported by the per-file
            // phase; here they simply contribute no candidates.
            let Ok(tree) = parser.parse(source) else {
                continue;
            };
            candidates.extend(extract_methods(&tree, source, path, self.min_lines));
        }
        Ok(candidates)
    }
}

impl CorpusAnalyzer for CrossFileDuplication {
    fn name(&self) -> &'static str {
        "cross_file_duplication"
    }

    fn analyze(&self, corpus: &CorpusSnapshot) -> Result<Vec<Issue>, Box<dyn Error>> {
        let candidates = self.collect_candidates(corpus)?;

        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        for (index, candidate) in candidates.iter().enumerate() {
            buckets
                .entry(structural_hash(&candidate.normalized))
                .or_default()
                .push(index);
        }

        let mut reported: HashSet<(PathBuf, usize, PathBuf, usize)> = HashSet::new();
        let mut issues = Vec::new();

        for bucket in buckets.values().filter(|bucket| bucket.len() > 1) {
            for i in 0..bucket.len() {
                for j in (i + 1)..bucket.len() {
                    let (a, b) = (&candidates[bucket[i]], &candidates[bucket[j]]);

                    // Same-file pairs belong to the per-file analyzer.
                    if a.file_path == b.file_path {
                        continue;
                    }

                    // Canonical order makes the pair key and the reported
                    // location independent of bucket iteration order.
                    let (first, second) =
                        if (&a.file_path, a.start_line) <= (&b.file_path, b.start_line) {
                            (a, b)
                        } else {
                            (b, a)
                        };
                    let key = (
                        first.file_path.clone(),
                        first.start_line,
                        second.file_path.clone(),
                        second.start_line,
                    );
                    if !reported.insert(key) {
                        continue;
                    }

                    let score = jaccard(&first.tokens(), &second.tokens());
                    if score < self.threshold {
                        continue;
                    }

                    let info = BTreeMap::from([
                        (
                            "method1".to_string(),
                            json!({
                                "file": first.file_path,
                                "name": first.name,
                                "lines": first.lines_label(),
                            }),
                        ),
                        (
                            "method2".to_string(),
                            json!({
                                "file": second.file_path,
                                "name": second.name,
                                "lines": second.lines_label(),
                            }),
                        ),
                        ("similarity".to_string(), json!(score)),
                    ]);
                    issues.push(
                        Issue::new(
                            "cross_file_duplication",
                            Severity::Major,
                            format!(
                                "Method \"{}\" in {}:{} is {}% similar to \"{}\" in {}:{}",
                                first.name,
                                first.file_path.display(),
                                first.start_line,
                                (score * 100.0).round(),
                                second.name,
                                second.file_path.display(),
                                second.start_line
                            ),
                            first.file_path.clone(),
                            first.start_line,
                        )
                        .with_end_line(first.end_line)
                        .with_suggestion(
                            "Extract common logic into a shared Service, Trait, or Helper class",
                        )
                        .with_refactor_info(info),
                    );
                }
            }
        }

        Ok(issues)
    }
}

#[cfg(test)]
#[path = "cross_file_test.rs"]
mod tests;
