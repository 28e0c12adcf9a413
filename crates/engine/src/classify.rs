use std::{path::PathBuf, time::SystemTime};

use modscan_fs::{EntryKind, VisitEvent};
use thiserror::Error;

use crate::{
    display::{Category, DisplayRecord},
    recency::RecencyWindow,
};

/// A visit event whose attributes disagree with its kind. Never produced by
/// the walker; seeing one means a caller built a malformed event.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("{kind:?} entry {} has no attributes", .path.display())]
    MissingAttributes { path: PathBuf, kind: EntryKind },

    #[error("inaccessible entry {} carries attributes", .path.display())]
    UnexpectedAttributes { path: PathBuf },
}

/// Turn a visit event into a display record.
///
/// Rules, first match wins:
/// 1. inaccessible entries become a diagnostic, "Could not access {path}";
/// 2. directories are labelled as directories;
/// 3. files are modified when their last modification is strictly after the
///    window's baseline (creation time for [`RecencyWindow::Always`],
///    otherwise `now` minus the window), unmodified otherwise.
pub fn classify(
    event: &VisitEvent,
    now: SystemTime,
    window: RecencyWindow,
) -> Result<DisplayRecord, ClassificationError> {
    let path = event.path();

    match (event.kind(), event.attributes()) {
        (EntryKind::Inaccessible, None) => Ok(DisplayRecord::diagnostic(format!(
            "Could not access {}",
            path.display()
        ))),
        (EntryKind::Inaccessible, Some(_)) => Err(ClassificationError::UnexpectedAttributes {
            path: path.to_path_buf(),
        }),
        (kind @ (EntryKind::Directory | EntryKind::File), None) => {
            Err(ClassificationError::MissingAttributes {
                path: path.to_path_buf(),
                kind,
            })
        }
        (EntryKind::Directory, Some(_)) => Ok(DisplayRecord::new(
            path.display().to_string(),
            Category::Directory,
        )),
        (EntryKind::File, Some(attrs)) => {
            let baseline = window.baseline(now, attrs.created);
            let category = if attrs.last_modified > baseline {
                Category::Modified
            } else {
                Category::Unmodified
            };
            Ok(DisplayRecord::new(path.display().to_string(), category))
        }
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
