use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::record::FileAttributes;

/// File-system operations the walker depends on.
///
/// Permission failures must surface as `io::ErrorKind::PermissionDenied`;
/// the walker tolerates those and treats every other error as fatal.
pub trait FileSystem: Send + Sync {
    /// Immediate children of `dir`, in listing order.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Attributes of `path` itself. Symbolic links are not followed.
    fn attributes(&self, path: &Path) -> io::Result<FileAttributes>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn attributes(&self, path: &Path) -> io::Result<FileAttributes> {
        let metadata = fs::symlink_metadata(path)?;
        let last_modified = metadata.modified()?;

        // Many UNIX file systems cannot report a birth time. Treat such
        // files as created at their last modification, which classifies
        // them as unmodified when comparing against creation time.
        let created = metadata.created().unwrap_or(last_modified);

        Ok(FileAttributes {
            is_directory: metadata.is_dir(),
            last_modified,
            created,
        })
    }
}
