//! APT configuration folder scanning and editing

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::error::SourcesError;
use crate::fileops::{FileOps, StdFileOps, replace_file};
use crate::list::{RepositoryList, byte_lines};
use crate::repository::Repository;

/// Base source list inside the config folder
pub const SOURCES_LIST: &str = "sources.list";
/// Folder of additional `*.list` files
pub const SOURCES_LIST_D: &str = "sources.list.d";
/// File inside [`SOURCES_LIST_D`] receiving added repositories
pub const MANAGED_LIST: &str = "managed.list";

const LIST_SUFFIX: &str = ".list";

/// An APT configuration folder, usually `/etc/apt`
///
/// Every operation rescans the folder; nothing is cached. Concurrent
/// writers to the same folder are not coordinated.
pub struct SourcesFolder {
    /// Folder containing `sources.list` and `sources.list.d`
    root: PathBuf,
    /// File name of the managed list
    managed_file: String,
    /// Primitives used to rewrite files
    file_ops: Arc<dyn FileOps>,
}

impl SourcesFolder {
    /// Create a handle on the config folder at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            managed_file: MANAGED_LIST.to_string(),
            file_ops: Arc::new(StdFileOps),
        }
    }

    /// Use a different managed file name inside `sources.list.d`
    #[must_use]
    pub fn with_managed_file(mut self, name: impl Into<String>) -> Self {
        self.managed_file = name.into();
        self
    }

    /// Use custom filesystem primitives for rewrites
    #[must_use]
    pub fn with_file_ops(mut self, file_ops: Arc<dyn FileOps>) -> Self {
        self.file_ops = file_ops;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the base `sources.list`
    #[must_use]
    pub fn sources_list_path(&self) -> PathBuf {
        self.root.join(SOURCES_LIST)
    }

    /// Path of the `sources.list.d` folder
    #[must_use]
    pub fn sources_list_d_path(&self) -> PathBuf {
        self.root.join(SOURCES_LIST_D)
    }

    /// Path of the managed list
    #[must_use]
    pub fn managed_path(&self) -> PathBuf {
        self.sources_list_d_path().join(&self.managed_file)
    }

    /// Files to scan: `sources.list` if it is a file, then every `*.list`
    /// in `sources.list.d` sorted by name
    fn source_files(&self) -> Result<Vec<PathBuf>, SourcesError> {
        let mut files = Vec::new();

        let sources_list = self.sources_list_path();
        if sources_list.is_file() {
            files.push(sources_list);
        }

        let dir = self.sources_list_d_path();
        let read_dir_err = |source: io::Error| SourcesError::ReadDir {
            path: dir.clone(),
            source,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            let name = entry.file_name();
            if is_list_file_name(&name.to_string_lossy()) {
                names.push(name);
            }
        }
        names.sort();
        files.extend(names.into_iter().map(|name| dir.join(name)));

        Ok(files)
    }

    /// Read every repository in the folder
    ///
    /// A missing `sources.list` is skipped; a missing `sources.list.d` or
    /// any unreadable list file fails the whole scan.
    ///
    /// # Errors
    /// Returns [`SourcesError::ReadDir`] or [`SourcesError::Read`].
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn scan(&self) -> Result<RepositoryList, SourcesError> {
        let mut list = RepositoryList::new();

        for file in self.source_files()? {
            let parsed = parse_config_file(&file)?;
            debug!(file = %file.display(), count = parsed.len(), "parsed source list");
            list.append(parsed);
        }

        debug!(count = list.len(), "scanned APT config folder");
        Ok(list)
    }

    /// Append `repo` to the managed list, creating it if needed
    ///
    /// # Errors
    /// Returns [`SourcesError::AlreadyExists`] if an equivalent repository
    /// is configured in any scanned file, [`SourcesError::InvalidLine`] if
    /// `repo` does not render to a readable line and
    /// [`SourcesError::InvalidManagedFile`] if the managed file name lacks
    /// the `.list` suffix.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn add(&self, repo: &Repository) -> Result<(), SourcesError> {
        if !is_list_file_name(&self.managed_file) {
            return Err(SourcesError::InvalidManagedFile(self.managed_file.clone()));
        }
        repo.validate()?;

        let repos = self.scan()?;
        if repos.contains(repo) {
            return Err(SourcesError::AlreadyExists(repo.config_line()));
        }

        let path = self.managed_path();
        let needs_newline = match fs::read(&path) {
            Ok(data) => !data.is_empty() && !data.ends_with(b"\n"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(source) => return Err(SourcesError::Read { path, source }),
        };

        let write_err = |source: io::Error| SourcesError::Write {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(write_err)?;

        let mut line = String::new();
        if needs_newline {
            line.push('\n');
        }
        line.push_str(&repo.config_line());
        line.push('\n');
        file.write_all(line.as_bytes()).map_err(write_err)?;

        info!(file = %path.display(), repository = %repo, "repository added");
        Ok(())
    }

    /// Remove every line equivalent to `repo` from the file holding the
    /// first match
    ///
    /// # Errors
    /// Returns [`SourcesError::NotFound`] if no equivalent repository is
    /// configured.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn remove(&self, repo: &Repository) -> Result<(), SourcesError> {
        let file = self.locate(repo)?;

        let content = rewrite_lines(&file, |r| {
            if r.equivalent(repo) {
                LineEdit::Drop
            } else {
                LineEdit::Keep
            }
        })?;
        replace_file(self.file_ops.as_ref(), &file, &content)?;

        info!(file = %file.display(), repository = %repo, "repository removed");
        Ok(())
    }

    /// Replace lines equivalent to `old` with `new` in the file holding the
    /// first match
    ///
    /// # Errors
    /// Returns [`SourcesError::NotFound`] if no repository equivalent to
    /// `old` is configured, or [`SourcesError::InvalidLine`] if `new` does
    /// not render to a readable line.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn edit(&self, old: &Repository, new: &Repository) -> Result<(), SourcesError> {
        new.validate()?;
        let file = self.locate(old)?;

        let content = rewrite_lines(&file, |r| {
            if r.equivalent(old) {
                LineEdit::Replace(new.config_line())
            } else {
                LineEdit::Keep
            }
        })?;
        replace_file(self.file_ops.as_ref(), &file, &content)?;

        info!(file = %file.display(), old = %old, new = %new, "repository edited");
        Ok(())
    }

    /// File containing the first repository equivalent to `repo`
    fn locate(&self, repo: &Repository) -> Result<PathBuf, SourcesError> {
        let repos = self.scan()?;
        repos
            .find(repo)
            .map(|entry| entry.file.clone())
            .ok_or_else(|| SourcesError::NotFound(repo.config_line()))
    }
}

/// Parse a single source list file
///
/// Lines that are not valid UTF-8 are skipped.
///
/// # Errors
/// Returns [`SourcesError::Read`] if the file cannot be read.
pub fn parse_config_file(path: &Path) -> Result<RepositoryList, SourcesError> {
    let content = fs::read(path).map_err(|source| SourcesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RepositoryList::parse_bytes(&content, path))
}

/// Whether `name` is a file name [`SourcesFolder::scan`] reads from
/// `sources.list.d`
#[must_use]
pub fn is_list_file_name(name: &str) -> bool {
    name.ends_with(LIST_SUFFIX) && !name.contains('/')
}

/// What to do with a parsed line when rewriting a file
enum LineEdit {
    Keep,
    Drop,
    Replace(String),
}

/// Re-emit the lines of `path`, passing each parsed repository to `f`
///
/// Lines that do not parse, including ones that are not UTF-8, are kept
/// byte for byte. Lines end with `\n`.
fn rewrite_lines<F>(path: &Path, mut f: F) -> Result<Vec<u8>, SourcesError>
where
    F: FnMut(&Repository) -> LineEdit,
{
    let content = fs::read(path).map_err(|source| SourcesError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = Vec::with_capacity(content.len());
    for line in byte_lines(&content) {
        let parsed = str::from_utf8(line).ok().and_then(Repository::parse_line);
        match parsed.as_ref().map_or(LineEdit::Keep, &mut f) {
            LineEdit::Keep => out.extend_from_slice(line),
            LineEdit::Drop => continue,
            LineEdit::Replace(new) => out.extend_from_slice(new.as_bytes()),
        }
        out.push(b'\n');
    }
    Ok(out)
}
