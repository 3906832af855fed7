use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Read-only map of every analyzed file's content, built once per run
/// before any cross-file analyzer executes. Never mutated afterwards;
/// analyzers receive it by shared borrow only.
#[derive(Debug, Default)]
pub struct CorpusSnapshot {
    files: BTreeMap<PathBuf, String>,
}

impl CorpusSnapshot {
    pub fn from_files(files: impl IntoIterator<Item = (PathBuf, String)>) -> Self {
        CorpusSnapshot {
            files: files.into_iter().collect(),
        }
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Iterate files in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().map(|(p, c)| (p.as_path(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
