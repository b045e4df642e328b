//! aptkit-sources: APT repository configuration
//!
//! Parses `deb`/`deb-src` lines from `sources.list` and
//! `sources.list.d/*.list`, and adds, removes or replaces entries by
//! rewriting the owning file.

pub mod error;
pub mod fileops;
pub mod folder;
pub mod list;
pub mod repository;

pub use error::SourcesError;
pub use fileops::{FileOps, StdFileOps, replace_file};
pub use folder::{
    MANAGED_LIST, SOURCES_LIST, SOURCES_LIST_D, SourcesFolder, is_list_file_name,
    parse_config_file,
};
pub use list::{RepositoryList, SourceEntry};
pub use repository::Repository;
