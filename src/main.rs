mod analyzers;
mod cli;
mod config;
mod corpus;
mod issue;
mod linter;
mod normalize;
mod parse;
mod pipeline;
mod report;
mod report_helpers;
mod similarity;
mod walk;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;

use cli::{Cli, Commands, CommonArgs};
use config::Config;
use issue::AnalysisResult;
use linter::Linter;
use pipeline::{Pipeline, Registry};

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Analyze {
            common,
            report,
            show_all,
            no_lint,
        } => run_analyze(&common, report, show_all, no_lint),
        Commands::Dups {
            common,
            report,
            show_all,
            min_lines,
        } => run_dups(&common, report, show_all, min_lines),
    };

    if let Err(err) = outcome {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_config(target: &Path, common: &CommonArgs) -> Result<Config, Box<dyn Error>> {
    let mut config = Config::load(target)?;
    config.exclude.extend(common.exclude.iter().cloned());
    Ok(config)
}

fn analyze_target(
    target: &Path,
    config: &Config,
    registry: &Registry,
    linter: Option<&Linter>,
    verbose: bool,
) -> Result<AnalysisResult, Box<dyn Error>> {
    if !target.exists() {
        return Err(format!("path not found: {}", target.display()).into());
    }
    let excludes = walk::build_exclude_set(&config.exclude)?;
    let files = walk::find_php_files(target, &excludes);
    Pipeline::new(registry, linter, verbose).run(&files)
}

fn print_result(
    result: &AnalysisResult,
    json: bool,
    report_flag: bool,
    show_all: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        report::print_json(result)
    } else if report_flag {
        report::print_detailed(result, show_all);
        Ok(())
    } else {
        report::print_summary(result);
        Ok(())
    }
}

fn run_analyze(
    common: &CommonArgs,
    report_flag: bool,
    show_all: bool,
    no_lint: bool,
) -> Result<(), Box<dyn Error>> {
    let target = common.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(&target, common)?;

    let registry = analyzers::default_registry(&config);
    let linter = (config.lint && !no_lint).then(Linter::new);
    let result = analyze_target(&target, &config, &registry, linter.as_ref(), common.verbose)?;

    print_result(&result, common.json, report_flag, show_all)
}

fn run_dups(
    common: &CommonArgs,
    report_flag: bool,
    show_all: bool,
    min_lines: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let target = common.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut config = load_config(&target, common)?;
    if let Some(min_lines) = min_lines {
        config.min_lines = min_lines;
    }

    let registry = analyzers::duplication_registry(&config);
    let result = analyze_target(&target, &config, &registry, None, common.verbose)?;

    print_result(&result, common.json, report_flag, show_all)
}
