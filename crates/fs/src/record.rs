use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Inaccessible,
}

/// Basic attributes fetched for a visited entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileAttributes {
    pub is_directory: bool,
    /// File last modified time
    pub last_modified: SystemTime,
    /// File creation time. Falls back to `last_modified` on file systems
    /// that do not record one.
    pub created: SystemTime,
}

/// One file-system entry observed during a walk.
#[derive(Debug, PartialEq, Eq)]
pub struct VisitEvent {
    path: PathBuf,
    kind: EntryKind,
    attributes: Option<FileAttributes>,
}

impl VisitEvent {
    pub fn directory(path: PathBuf, attributes: FileAttributes) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            attributes: Some(attributes),
        }
    }

    pub fn file(path: PathBuf, attributes: FileAttributes) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            attributes: Some(attributes),
        }
    }

    pub fn inaccessible(path: PathBuf) -> Self {
        Self {
            path,
            kind: EntryKind::Inaccessible,
            attributes: None,
        }
    }

    /// Build an event from raw parts without checking that `attributes`
    /// agrees with `kind`. The classifier rejects inconsistent events.
    pub fn from_parts(path: PathBuf, kind: EntryKind, attributes: Option<FileAttributes>) -> Self {
        Self {
            path,
            kind,
            attributes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn attributes(&self) -> Option<&FileAttributes> {
        self.attributes.as_ref()
    }
}
