//! Aggregated repository list

use std::path::{Path, PathBuf};
use std::slice;
use std::str;

use crate::repository::Repository;

/// A repository together with the file and line it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Parsed repository
    pub repository: Repository,
    /// Source list file containing the line
    pub file: PathBuf,
    /// 1-based line number within `file`
    pub line: usize,
}

/// Repositories in file scan order, then line order
///
/// Lookups use [`Repository::equivalent`], not derived equality.
#[derive(Debug, Clone, Default)]
pub struct RepositoryList {
    entries: Vec<SourceEntry>,
}

impl RepositoryList {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every line of `content`, tagging matches with `file`
    #[must_use]
    pub fn parse(content: &str, file: &Path) -> Self {
        Self::parse_bytes(content.as_bytes(), file)
    }

    /// Like [`RepositoryList::parse`], skipping lines that are not UTF-8
    #[must_use]
    pub fn parse_bytes(content: &[u8], file: &Path) -> Self {
        let entries = byte_lines(content)
            .enumerate()
            .filter_map(|(idx, line)| {
                let line = str::from_utf8(line).ok()?;
                Repository::parse_line(line).map(|repository| SourceEntry {
                    repository,
                    file: file.to_path_buf(),
                    line: idx + 1,
                })
            })
            .collect();
        Self { entries }
    }

    /// Append another list, keeping order
    pub fn append(&mut self, other: RepositoryList) {
        self.entries.extend(other.entries);
    }

    /// First entry equivalent to `repo`
    #[must_use]
    pub fn find(&self, repo: &Repository) -> Option<&SourceEntry> {
        self.entries.iter().find(|e| e.repository.equivalent(repo))
    }

    /// Whether an equivalent repository is present
    #[must_use]
    pub fn contains(&self, repo: &Repository) -> bool {
        self.find(repo).is_some()
    }

    pub fn iter(&self) -> slice::Iter<'_, SourceEntry> {
        self.entries.iter()
    }

    /// Iterate over the repositories alone
    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.entries.iter().map(|e| &e.repository)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split on `\n`, dropping a trailing `\r` from each line
pub(crate) fn byte_lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    content
        .split_inclusive(|&b| b == b'\n')
        .map(|line| match line.strip_suffix(b"\n") {
            Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
            None => line,
        })
}

impl IntoIterator for RepositoryList {
    type Item = SourceEntry;
    type IntoIter = std::vec::IntoIter<SourceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a RepositoryList {
    type Item = &'a SourceEntry;
    type IntoIter = slice::Iter<'a, SourceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
