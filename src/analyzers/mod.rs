//! Rule analyzers and registry construction.

mod class_conflict;
mod code_smell;
mod cross_file;
mod duplication;
mod method_size;
mod methods;
mod nplusone;
mod performance;
mod security;

pub use class_conflict::ClassConflictAnalyzer;
pub use code_smell::CodeSmellDetector;
pub use cross_file::CrossFileDuplication;
pub use duplication::DuplicationAnalyzer;
pub use method_size::MethodSizeAnalyzer;
pub use nplusone::NPlusOneDetector;
pub use performance::PerformanceAnalyzer;
pub use security::SecurityAnalyzer;

use crate::config::Config;
use crate::pipeline::Registry;

/// The full rule set, in execution order.
pub fn default_registry(config: &Config) -> Registry {
    let mut registry = Registry::new();
    registry.register(Box::new(SecurityAnalyzer::new()));
    registry.register(Box::new(NPlusOneDetector::new()));
    registry.register(Box::new(PerformanceAnalyzer::new()));
    registry.register(Box::new(MethodSizeAnalyzer::new(config.max_method_lines)));
    registry.register(Box::new(CodeSmellDetector::new()));
    registry.register(Box::new(DuplicationAnalyzer::new(
        config.min_lines,
        config.similarity_threshold,
    )));
    registry.register_corpus(Box::new(CrossFileDuplication::new(
        config.min_lines,
        config.similarity_threshold,
    )));
    registry.register_corpus(Box::new(ClassConflictAnalyzer::new()));
    registry
}

/// Duplication-only rule set for the `dups` subcommand.
pub fn duplication_registry(config: &Config) -> Registry {
    let mut registry = Registry::new();
    registry.register(Box::new(DuplicationAnalyzer::new(
        config.min_lines,
        config.similarity_threshold,
    )));
    registry.register_corpus(Box::new(CrossFileDuplication::new(
        config.min_lines,
        config.similarity_threshold,
    )));
    registry
}
