use std::fmt;
use std::io::{Read, SeekFrom, Write};
use std::path::{Path, PathBuf};

use wasi_host_vfs::{AccessMode, FileType, FsError, Metadata, Result, VirtualFile};

/// A stdio stream backed by a caller-supplied reader or writer.
pub struct Stdio {
    path: PathBuf,
    reader: Option<Box<dyn Read + Send>>,
    writer: Option<Box<dyn Write + Send>>,
    closed: bool,
}

impl Stdio {
    pub fn from_reader(name: &str, reader: Box<dyn Read + Send>) -> Self {
        Self {
            path: PathBuf::from(format!("/dev/{name}")),
            reader: Some(reader),
            writer: None,
            closed: false,
        }
    }

    pub fn from_writer(name: &str, writer: Box<dyn Write + Send>) -> Self {
        Self {
            path: PathBuf::from(format!("/dev/{name}")),
            reader: None,
            writer: Some(writer),
            closed: false,
        }
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            Err(FsError::InvalidFd)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Stdio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stdio")
            .field("path", &self.path)
            .field("readable", &self.reader.is_some())
            .field("writable", &self.writer.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}

impl VirtualFile for Stdio {
    fn path(&self) -> &Path {
        &self.path
    }

    fn access_mode(&self) -> AccessMode {
        if self.reader.is_some() {
            AccessMode::ReadOnly
        } else {
            AccessMode::WriteOnly
        }
    }

    fn is_dir(&self) -> bool {
        false
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check_open()?;
        let reader = self.reader.as_mut().ok_or(FsError::InvalidFd)?;
        Ok(reader.read(buf)?)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.check_open()?;
        let writer = self.writer.as_mut().ok_or(FsError::InvalidFd)?;
        Ok(writer.write(buf)?)
    }

    fn seek(&mut self, _pos: SeekFrom) -> Result<u64> {
        self.check_open()?;
        Err(FsError::Unsupported)
    }

    fn sync(&mut self) -> Result<()> {
        self.check_open()?;
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    fn datasync(&mut self) -> Result<()> {
        self.sync()
    }

    fn truncate(&mut self, _size: i64) -> Result<()> {
        self.check_open()?;
        Err(FsError::InvalidInput)
    }

    fn stat(&mut self) -> Result<Metadata> {
        self.check_open()?;
        Ok(Metadata {
            file_type: FileType::CharDevice,
            ..Default::default()
        })
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.reader = None;
        match self.writer.take() {
            Some(mut writer) => Ok(writer.flush()?),
            None => Ok(()),
        }
    }
}
