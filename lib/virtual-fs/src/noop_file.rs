use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use crate::{AccessMode, Metadata, Result, VirtualFile};

/// A placeholder that accepts every operation.
///
/// Reads see end-of-file, writes are discarded but reported as complete.
#[derive(Debug, Clone, Default)]
pub struct NoopFile {
    path: PathBuf,
}

impl NoopFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VirtualFile for NoopFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn access_mode(&self) -> AccessMode {
        AccessMode::ReadWrite
    }

    fn is_dir(&self) -> bool {
        false
    }

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Ok(0)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(buf.len())
    }

    fn seek(&mut self, _pos: SeekFrom) -> Result<u64> {
        Ok(0)
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn datasync(&mut self) -> Result<()> {
        Ok(())
    }

    fn truncate(&mut self, _size: i64) -> Result<()> {
        Ok(())
    }

    fn stat(&mut self) -> Result<Metadata> {
        Ok(Metadata::default())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
