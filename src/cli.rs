/// CLI argument definitions for the `phaudit` command.
///
/// Defines all subcommands, their arguments, and long help text
/// using the `clap` derive macros.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(name = "phaudit", version, about = "Static analysis for PHP codebases")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Common arguments shared by the analysis commands.
#[derive(Args)]
pub struct CommonArgs {
    /// Directory to analyze (default: current directory)
    pub path: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Log skipped files and other diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Additional exclude pattern (repeatable); adds to vendor,
    /// node_modules, storage, bootstrap/cache
    #[arg(long)]
    pub exclude: Vec<String>,
}

/// All available analysis subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run every analyzer: security, performance, N+1 queries, method
    /// size, code smells, duplication, class conflicts, plus external
    /// coding-standard tools when available
    #[command(long_about = "\
Run the full analyzer registry over every PHP file under the target path.

Per-file rules (security, performance, N+1 queries, method size, code
smells, same-file duplication) run against each file's syntax tree;
cross-file rules (cross-file duplication, class/table conflicts) run once
over the whole corpus. Findings from vendor/bin/phpcs (PSR-12) and
vendor/bin/phpmd are merged when those tools are installed; their absence
is not an error.

Files that fail to parse are skipped and the run continues.")]
    Analyze {
        #[command(flatten)]
        common: CommonArgs,

        /// Show every issue with location and suggestion
        #[arg(short, long)]
        report: bool,

        /// Show all issues (default: first 50)
        #[arg(long)]
        show_all: bool,

        /// Skip the external phpcs/phpmd bridge
        #[arg(long)]
        no_lint: bool,
    },

    /// Detect duplicated methods and code blocks only
    #[command(long_about = "\
Run only the duplication analyzers: same-file duplicate methods and code
blocks, and cross-file duplicate methods.

Method bodies are normalized (variables, string and numeric literals
folded to placeholders, comments stripped) and compared by token-set
Jaccard similarity. Cross-file candidates are bucketed by a structural
hash of the normalized body, so only same-bucket pairs are compared.")]
    Dups {
        #[command(flatten)]
        common: CommonArgs,

        /// Show every issue with location and suggestion
        #[arg(short, long)]
        report: bool,

        /// Show all issues (default: first 50)
        #[arg(long)]
        show_all: bool,

        /// Minimum lines for a duplication candidate (default: 5)
        #[arg(long)]
        min_lines: Option<usize>,
    },
}
