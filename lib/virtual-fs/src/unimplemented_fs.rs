use std::path::Path;

use crate::{DirEntry, FileSystem, FsError, Metadata, OpenFlags, Result, VirtualFile};

/// A filesystem that supports nothing.
///
/// Useful as a preopen backend when the guest only needs the directory to
/// exist, since preopens are opened lazily.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedFileSystem;

impl FileSystem for UnimplementedFileSystem {
    fn open(&self, _path: &Path, _flags: OpenFlags, _perm: u32) -> Result<Box<dyn VirtualFile>> {
        Err(FsError::NotImplemented)
    }

    fn metadata(&self, _path: &Path) -> Result<Metadata> {
        Err(FsError::NotImplemented)
    }

    fn create_dir(&self, _path: &Path, _perm: u32) -> Result<()> {
        Err(FsError::NotImplemented)
    }

    fn remove_dir(&self, _path: &Path) -> Result<()> {
        Err(FsError::NotImplemented)
    }

    fn remove_file(&self, _path: &Path) -> Result<()> {
        Err(FsError::NotImplemented)
    }

    fn rename(&self, _from: &Path, _to: &Path) -> Result<()> {
        Err(FsError::NotImplemented)
    }

    fn read_dir(&self, _path: &Path) -> Result<Vec<DirEntry>> {
        Err(FsError::NotImplemented)
    }
}
