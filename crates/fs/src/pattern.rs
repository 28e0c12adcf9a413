use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid extension pattern '{token}': {source}")]
    InvalidGlob {
        token: String,
        #[source]
        source: globset::Error,
    },
}

#[derive(Debug, Clone)]
enum Rule {
    /// `*` or `*.*` was given: every file name matches.
    Any,
    /// File name must match one of the compiled `*.<ext>` globs. An empty
    /// set rejects everything.
    Extensions(GlobSet),
}

/// Precompiled file-name matcher built from user supplied extension tokens.
///
/// Only the final path component is tested. Directories are never run
/// through the matcher; the walker always visits them.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rule: Rule,
    pattern: String,
}

/// Split raw user input into extension tokens.
///
/// Tokens are separated by whitespace, commas, and single or double quotes.
/// Empty tokens are dropped.
pub fn split_tokens(input: &str) -> Vec<&str> {
    input
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '"' | '\''))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Strip a leading `.` or, failing that, a leading `*.` from a token.
#[inline]
pub fn normalize_token(token: &str) -> &str {
    if let Some(rest) = token.strip_prefix('.') {
        rest
    } else if let Some(rest) = token.strip_prefix("*.") {
        rest
    } else {
        token
    }
}

impl PatternMatcher {
    /// Compile a matcher from already split tokens.
    pub fn new<'a, I>(tokens: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let exts: Vec<&str> = tokens
            .into_iter()
            .map(normalize_token)
            .filter(|t| !t.is_empty())
            .collect();

        if exts.contains(&"*") {
            debug!("[pattern] wildcard token given, matching every file");
            return Ok(Self {
                rule: Rule::Any,
                pattern: "*".to_owned(),
            });
        }

        let mut builder = GlobSetBuilder::new();
        for ext in &exts {
            let glob = GlobBuilder::new(&format!("*.{ext}"))
                .literal_separator(true)
                .build()
                .map_err(|source| PatternError::InvalidGlob {
                    token: (*ext).to_owned(),
                    source,
                })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|source| PatternError::InvalidGlob {
            token: exts.join(","),
            source,
        })?;

        let pattern = format!("*.{{{}}}", exts.join(","));
        debug!("[pattern] compiled {pattern} from {} token(s)", exts.len());

        Ok(Self {
            rule: Rule::Extensions(set),
            pattern,
        })
    }

    /// Split `input` with [`split_tokens`] and compile the result.
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        Self::new(split_tokens(input))
    }

    /// A matcher that accepts every file name.
    pub fn any() -> Self {
        Self {
            rule: Rule::Any,
            pattern: "*".to_owned(),
        }
    }

    /// Test the file name of `path` against the compiled rule.
    #[inline]
    #[must_use]
    pub fn is_match(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };

        match &self.rule {
            Rule::Any => true,
            Rule::Extensions(set) => set.is_match(Path::new(name)),
        }
    }

    /// Whether the matcher can accept anything at all.
    pub fn is_empty(&self) -> bool {
        matches!(&self.rule, Rule::Extensions(set) if set.is_empty())
    }

    /// Combined glob text, e.g. `*.{java,xml}`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
