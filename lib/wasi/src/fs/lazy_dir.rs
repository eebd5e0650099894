use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use wasi_host_vfs::{
    AccessMode, FileSystem, FileType, FsError, Metadata, OpenFlags, Result, VirtualFile,
};

/// A preopened directory that is opened through its filesystem on first use.
///
/// Building a context therefore never requires the filesystem to support
/// opening directories.
#[derive(Debug)]
pub struct LazyDir {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    dir: Option<Box<dyn VirtualFile>>,
    closed: bool,
}

impl LazyDir {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            path: PathBuf::from("."),
            dir: None,
            closed: false,
        }
    }

    /// Whether the underlying directory has been opened yet.
    pub fn is_open(&self) -> bool {
        self.dir.is_some()
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(FsError::InvalidFd);
        }
        Ok(())
    }

    fn dir(&mut self) -> Result<&mut Box<dyn VirtualFile>> {
        self.check_open()?;
        if self.dir.is_none() {
            debug!("opening preopened directory");
            let dir = self
                .fs
                .open(&self.path, OpenFlags::READ | OpenFlags::DIRECTORY, 0)?;
            self.dir = Some(dir);
        }
        self.dir.as_mut().ok_or(FsError::InvalidFd)
    }
}

impl VirtualFile for LazyDir {
    fn path(&self) -> &Path {
        &self.path
    }

    fn access_mode(&self) -> AccessMode {
        AccessMode::ReadOnly
    }

    fn is_dir(&self) -> bool {
        true
    }

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        self.check_open()?;
        Err(FsError::IsADirectory)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        self.check_open()?;
        Err(FsError::IsADirectory)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.dir()?.seek(pos)
    }

    fn sync(&mut self) -> Result<()> {
        self.dir()?.sync()
    }

    fn datasync(&mut self) -> Result<()> {
        self.dir()?.datasync()
    }

    fn truncate(&mut self, _size: i64) -> Result<()> {
        self.check_open()?;
        Err(FsError::IsADirectory)
    }

    fn stat(&mut self) -> Result<Metadata> {
        match self.dir() {
            Ok(dir) => dir.stat(),
            // The filesystem cannot open directories; still report one.
            Err(FsError::NotImplemented) => Ok(Metadata {
                file_type: FileType::Dir,
                ..Default::default()
            }),
            Err(err) => Err(err),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        match self.dir.take() {
            Some(mut dir) => dir.close(),
            None => Ok(()),
        }
    }
}
