//! The `deb`/`deb-src` line grammar

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SourcesError;

// [# ]deb|deb-src [ [options]] uri distribution components[ # comment]
static CONFIG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(# )?(deb|deb-src)(?: \[(.*)\])? ([^ ]+) ([^ ]+) ([^#\n]+)(?: +# *(.*))?$")
        .expect("config line regex is valid")
});

/// A repository definition from an APT source list
///
/// Derived equality compares every field. Use [`Repository::equivalent`]
/// to compare the way APT identifies a source, ignoring `enabled` and
/// `comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// False when the line is commented out with `# `
    pub enabled: bool,
    /// `deb-src` rather than `deb`
    pub source_repo: bool,
    /// Raw text between the option brackets
    #[serde(default)]
    pub options: String,
    pub uri: String,
    pub distribution: String,
    /// Space separated component list, kept as raw text
    pub components: String,
    /// Trailing annotation after ` # `
    #[serde(default)]
    pub comment: String,
}

impl Repository {
    /// Create an enabled binary (`deb`) repository
    pub fn new(
        uri: impl Into<String>,
        distribution: impl Into<String>,
        components: impl Into<String>,
    ) -> Self {
        Self {
            enabled: true,
            source_repo: false,
            options: String::new(),
            uri: uri.into(),
            distribution: distribution.into(),
            components: components.into(),
            comment: String::new(),
        }
    }

    /// Mark as a source (`deb-src`) repository
    #[must_use]
    pub fn source(mut self) -> Self {
        self.source_repo = true;
        self
    }

    /// Set the enabled flag
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set bracketed options, e.g. `arch=amd64`
    #[must_use]
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = options.into();
        self
    }

    /// Set trailing comment
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Compare identity fields: URI, distribution, components, source flag
    /// and options
    #[must_use]
    pub fn equivalent(&self, other: &Repository) -> bool {
        self.components == other.components
            && self.distribution == other.distribution
            && self.uri == other.uri
            && self.source_repo == other.source_repo
            && self.options == other.options
    }

    /// Parse a single source list line
    ///
    /// Returns `None` for anything that is not a (possibly disabled)
    /// `deb`/`deb-src` line: blank lines, comments, other directives.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = CONFIG_LINE.captures(line)?;
        let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        Some(Self {
            enabled: caps.get(1).is_none(),
            source_repo: field(2) == "deb-src",
            options: field(3).to_string(),
            uri: field(4).to_string(),
            distribution: field(5).to_string(),
            components: field(6).trim_end().to_string(),
            comment: field(7).trim_end().to_string(),
        })
    }

    /// Render the line to put in a source list
    #[must_use]
    pub fn config_line(&self) -> String {
        let mut line = String::new();
        if !self.enabled {
            line.push_str("# ");
        }
        line.push_str(if self.source_repo { "deb-src" } else { "deb" });
        if !self.options.trim().is_empty() {
            line.push_str(" [");
            line.push_str(&self.options);
            line.push(']');
        }
        line.push(' ');
        line.push_str(&self.uri);
        line.push(' ');
        line.push_str(&self.distribution);
        line.push(' ');
        line.push_str(&self.components);
        if !self.comment.trim().is_empty() {
            line.push_str(" # ");
            line.push_str(&self.comment);
        }
        line
    }
}

impl Repository {
    /// Check that [`Repository::config_line`] reads back as an equivalent
    /// repository
    ///
    /// Empty fields, `#` inside components or spaces inside the URI or
    /// distribution render lines that a scan would not recognise.
    ///
    /// # Errors
    /// Returns [`SourcesError::InvalidLine`] with the rendered line.
    pub fn validate(&self) -> Result<(), SourcesError> {
        let line = self.config_line();
        match Self::parse_line(&line) {
            Some(parsed) if parsed.equivalent(self) && parsed.enabled == self.enabled => Ok(()),
            _ => Err(SourcesError::InvalidLine(line)),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.config_line())
    }
}

impl FromStr for Repository {
    type Err = SourcesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s).ok_or_else(|| SourcesError::InvalidLine(s.to_string()))
    }
}
