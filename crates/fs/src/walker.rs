use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use log::{debug, warn};
use thiserror::Error;

use crate::{
    cancel::CancelToken, pattern::PatternMatcher, provider::FileSystem, record::VisitEvent,
};

/// An I/O failure, other than a permission failure, that stops the walk.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct WalkError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Counters collected over one walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub directories: usize,
    /// Files accepted by the matcher
    pub files: usize,
    /// Files rejected by the matcher
    pub skipped: usize,
    pub inaccessible: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Completed(WalkStats),
    Cancelled,
}

/// Result of inspecting a single entry. The driver in [`TreeWalker::walk`]
/// decides from the variant whether to continue.
enum EntryOutcome {
    /// Directory event plus its children, in listing order.
    Directory(VisitEvent, Vec<PathBuf>),
    Matched(VisitEvent),
    Skipped,
    Inaccessible(VisitEvent),
    Fatal(WalkError),
}

/// Depth-first, pre-order walker.
///
/// Directories are always reported and descended into; other entries are
/// reported only when their file name passes the matcher. Permission
/// failures produce an inaccessible event and the walk moves on. Any other
/// I/O failure ends the walk with a [`WalkError`].
pub struct TreeWalker<'a> {
    fs: &'a dyn FileSystem,
    matcher: &'a PatternMatcher,
    cancel: &'a CancelToken,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        matcher: &'a PatternMatcher,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            fs,
            matcher,
            cancel,
        }
    }

    /// Walk `root`, handing each event to `sink` in traversal order before
    /// moving to the next entry.
    pub fn walk<S>(&self, root: &Path, mut sink: S) -> Result<WalkOutcome, WalkError>
    where
        S: FnMut(VisitEvent),
    {
        let mut stats = WalkStats::default();
        let mut stack = vec![root.to_path_buf()];

        debug!(
            "[walk] starting at {:?} with pattern {}",
            root,
            self.matcher.pattern()
        );

        while let Some(path) = stack.pop() {
            if self.cancel.is_cancelled() {
                debug!("[walk] cancelled with {} entries pending", stack.len() + 1);
                return Ok(WalkOutcome::Cancelled);
            }

            match self.inspect_entry(path) {
                EntryOutcome::Directory(event, children) => {
                    stats.directories += 1;
                    sink(event);
                    // Reverse so the first listed child is popped first.
                    stack.extend(children.into_iter().rev());
                }
                EntryOutcome::Matched(event) => {
                    stats.files += 1;
                    sink(event);
                }
                EntryOutcome::Skipped => {
                    stats.skipped += 1;
                }
                EntryOutcome::Inaccessible(event) => {
                    warn!("[walk] access denied: {:?}", event.path());
                    stats.inaccessible += 1;
                    sink(event);
                }
                EntryOutcome::Fatal(err) => {
                    warn!("[walk] aborting: {err}");
                    return Err(err);
                }
            }
        }

        debug!("[walk] finished: {:?}", stats);
        Ok(WalkOutcome::Completed(stats))
    }

    fn inspect_entry(&self, path: PathBuf) -> EntryOutcome {
        let attributes = match self.fs.attributes(&path) {
            Ok(a) => a,
            Err(e) => return Self::failed(path, e),
        };

        if attributes.is_directory {
            // An unreadable directory is reported once, as inaccessible.
            match self.fs.read_dir(&path) {
                Ok(children) => {
                    EntryOutcome::Directory(VisitEvent::directory(path, attributes), children)
                }
                Err(e) => Self::failed(path, e),
            }
        } else if self.matcher.is_match(&path) {
            EntryOutcome::Matched(VisitEvent::file(path, attributes))
        } else {
            EntryOutcome::Skipped
        }
    }

    fn failed(path: PathBuf, err: io::Error) -> EntryOutcome {
        if err.kind() == ErrorKind::PermissionDenied {
            EntryOutcome::Inaccessible(VisitEvent::inaccessible(path))
        } else {
            EntryOutcome::Fatal(WalkError { path, source: err })
        }
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
