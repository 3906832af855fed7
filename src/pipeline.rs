//! Analyzer contract, registry, and the per-file execution pipeline.
//!
//! Every rule module implements `Analyzer` (per file) or `CorpusAnalyzer`
//! (once per run, over the full snapshot). The pipeline guarantees that a
//! failing file or a failing analyzer never aborts the run: parse and
//! read errors skip the file, analyzer errors skip that analyzer's output
//! for that file only.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tree_sitter::Tree;

use crate::corpus::CorpusSnapshot;
use crate::issue::{AnalysisResult, Issue};
use crate::linter::Linter;
use crate::parse::PhpParser;

/// Everything a per-file analyzer may look at. All borrows are shared;
/// analyzers cannot mutate the tree or the snapshot.
pub struct FileContext<'a> {
    pub path: &'a Path,
    pub source: &'a str,
    pub tree: &'a Tree,
    pub corpus: &'a CorpusSnapshot,
}

/// A rule that inspects one file at a time.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;
    fn analyze(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, Box<dyn Error>>;
}

/// A rule that needs the whole corpus at once. Runs only after every
/// file has been read into the snapshot.
pub trait CorpusAnalyzer: Send + Sync {
    fn name(&self) -> &'static str;
    fn analyze(&self, corpus: &CorpusSnapshot) -> Result<Vec<Issue>, Box<dyn Error>>;
}

/// Ordered collection of registered rules.
#[derive(Default)]
pub struct Registry {
    analyzers: Vec<Box<dyn Analyzer>>,
    corpus_analyzers: Vec<Box<dyn CorpusAnalyzer>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    pub fn register_corpus(&mut self, analyzer: Box<dyn CorpusAnalyzer>) {
        self.corpus_analyzers.push(analyzer);
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty() && self.corpus_analyzers.is_empty()
    }
}

/// One analysis run over a file list.
pub struct Pipeline<'a> {
    registry: &'a Registry,
    linter: Option<&'a Linter>,
    verbose: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(registry: &'a Registry, linter: Option<&'a Linter>, verbose: bool) -> Self {
        Pipeline {
            registry,
            linter,
            verbose,
        }
    }

    /// Run every registered analyzer over every file and aggregate the
    /// findings. Fails only when the parser itself cannot be constructed;
    /// per-file problems are logged and skipped.
    pub fn run(&self, files: &[PathBuf]) -> Result<AnalysisResult, Box<dyn Error>> {
        // Probe grammar loading once so a broken install is a clear
        // top-level error instead of a silent all-files skip.
        PhpParser::new()?;

        let total_files = files.len();
        let mut sources: Vec<(PathBuf, String)> = Vec::with_capacity(files.len());
        for path in files {
            match fs::read_to_string(path) {
                Ok(content) => sources.push((path.clone(), content)),
                Err(err) => {
                    if self.verbose {
                        eprintln!("warning: could not read {}: {err}", path.display());
                    }
                }
            }
        }

        // Hard barrier: the snapshot must be complete before any
        // cross-file analyzer can run.
        let corpus = CorpusSnapshot::from_files(sources);

        let entries: Vec<(&Path, &str)> = corpus.iter().collect();
        let per_file: Vec<(usize, Vec<Issue>)> = entries
            .par_iter()
            .map_init(
                || PhpParser::new().ok(),
                |parser, &(path, source)| match parser.as_mut() {
                    Some(parser) => self.analyze_file(parser, path, source, &corpus),
                    None => (0, Vec::new()),
                },
            )
            .collect();

        let analyzed_files = per_file.iter().map(|(n, _)| n).sum();
        let mut issues: Vec<Issue> = per_file.into_iter().flat_map(|(_, found)| found).collect();

        for analyzer in &self.registry.corpus_analyzers {
            match analyzer.analyze(&corpus) {
                Ok(found) => issues.extend(found),
                Err(err) => {
                    eprintln!("warning: analyzer {} failed: {err}", analyzer.name());
                }
            }
        }

        Ok(AnalysisResult::new(total_files, analyzed_files, issues))
    }

    /// Parse one file and run every per-file analyzer over it. Returns
    /// `(1, issues)` when the file was analyzed, `(0, [])` when skipped.
    fn analyze_file(
        &self,
        parser: &mut PhpParser,
        path: &Path,
        source: &str,
        corpus: &CorpusSnapshot,
    ) -> (usize, Vec<Issue>) {
        let tree = match parser.parse(source) {
            Ok(tree) => tree,
            Err(err) => {
                if self.verbose {
                    eprintln!("warning: skipping {}: {err}", path.display());
                }
                return (0, Vec::new());
            }
        };

        let ctx = FileContext {
            path,
            source,
            tree: &tree,
            corpus,
        };

        let mut issues = Vec::new();
        for analyzer in &self.registry.analyzers {
            match analyzer.analyze(&ctx) {
                Ok(found) => issues.extend(found),
                Err(err) => {
                    eprintln!(
                        "warning: analyzer {} failed on {}: {err}",
                        analyzer.name(),
                        path.display()
                    );
                }
            }
        }

        if let Some(linter) = self.linter {
            for mut issue in linter.check(path) {
                // External findings all surface under one rule identifier.
                issue.kind = "linting".to_string();
                issues.push(issue);
            }
        }

        (1, issues)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
