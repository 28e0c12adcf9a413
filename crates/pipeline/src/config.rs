use std::{
    fs,
    path::{Path, PathBuf},
};

use modscan_engine::RecencyWindow;
use modscan_fs::{PatternError, PatternMatcher, split_tokens};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no directory given to search")]
    EmptyRoot,

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("no file extensions given to search")]
    NoExtensions,

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Everything a single search needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    root: PathBuf,
    matcher: PatternMatcher,
    window: RecencyWindow,
    legend: bool,
}

/// Validate user input and compile it into a [`SearchConfig`].
///
/// `root` must name an existing directory; symbolic links are not followed.
/// `extension_tokens` must contain at least one token, see
/// [`modscan_fs::split_tokens`].
pub fn configure(
    root: &str,
    extension_tokens: &str,
    window: RecencyWindow,
) -> Result<SearchConfig, ConfigurationError> {
    let root = root.trim();
    if root.is_empty() {
        return Err(ConfigurationError::EmptyRoot);
    }

    let root = PathBuf::from(root);
    if !is_directory(&root) {
        return Err(ConfigurationError::NotADirectory(root));
    }

    let tokens = split_tokens(extension_tokens);
    if tokens.is_empty() {
        return Err(ConfigurationError::NoExtensions);
    }

    let matcher = PatternMatcher::new(tokens)?;

    Ok(SearchConfig {
        root,
        matcher,
        window,
        legend: true,
    })
}

fn is_directory(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

impl SearchConfig {
    /// Whether to put the color legend on the info stream when the search
    /// starts. On by default.
    pub fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    pub fn window(&self) -> RecencyWindow {
        self.window
    }

    pub fn legend(&self) -> bool {
        self.legend
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
