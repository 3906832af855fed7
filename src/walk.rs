use std::error::Error;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

/// Compile user exclude patterns into a matcher. Each pattern matches the
/// directory itself, anything beneath it, and is also taken verbatim so
/// explicit globs like `app/Legacy/*.php` work.
pub fn build_exclude_set(patterns: &[String]) -> Result<GlobSet, Box<dyn Error>> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
        builder.add(Glob::new(&format!("**/{pattern}"))?);
        builder.add(Glob::new(&format!("**/{pattern}/**"))?);
    }
    Ok(builder.build()?)
}

/// Walk the target directory and collect every `.php` file, honoring
/// `.gitignore`, skipping `.git`, and pruning excluded directories.
/// Returned paths are sorted for deterministic processing order.
pub fn find_php_files(root: &Path, excludes: &GlobSet) -> Vec<PathBuf> {
    let root_owned = root.to_path_buf();
    let exclude_filter = excludes.clone();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                if entry.file_name() == ".git" {
                    return false;
                }
                let rel = entry.path().strip_prefix(&root_owned).unwrap_or(entry.path());
                if exclude_filter.is_match(rel) {
                    return false;
                }
            }
            true
        })
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                eprintln!("warning: {err}");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("php") {
            continue;
        }
        let rel = path.strip_prefix(root).unwrap_or(path);
        if excludes.is_match(rel) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    files
}

#[cfg(test)]
#[path = "walk_test.rs"]
mod tests;
