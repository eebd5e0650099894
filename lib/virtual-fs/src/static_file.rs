use std::borrow::Cow;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use crate::{AccessMode, FileType, FsError, Metadata, Result, VirtualFile};

/// Read-only bytes presented as a file, e.g. a resource embedded in the host.
///
/// There is nothing to flush, so sync and datasync succeed while the file is
/// open.
#[derive(Debug, Clone)]
pub struct StaticFile {
    path: PathBuf,
    data: Cow<'static, [u8]>,
    cursor: u64,
    closed: bool,
}

impl StaticFile {
    pub fn new(path: impl Into<PathBuf>, data: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
            cursor: 0,
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

impl VirtualFile for StaticFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn access_mode(&self) -> AccessMode {
        AccessMode::ReadOnly
    }

    fn is_dir(&self) -> bool {
        false
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check_open()?;
        let start = usize::try_from(self.cursor)
            .unwrap_or(usize::MAX)
            .min(self.data.len());
        let remaining = &self.data[start..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.cursor += n as u64;
        Ok(n)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        self.check_open()?;
        Err(FsError::PermissionDenied)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.check_open()?;
        let len = self.data.len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => i64::try_from(offset).map_err(|_| FsError::InvalidInput)?,
            SeekFrom::End(delta) => len.checked_add(delta).ok_or(FsError::InvalidInput)?,
            SeekFrom::Current(delta) => (self.cursor as i64)
                .checked_add(delta)
                .ok_or(FsError::InvalidInput)?,
        };
        if target < 0 {
            return Err(FsError::InvalidInput);
        }
        self.cursor = target as u64;
        Ok(self.cursor)
    }

    fn sync(&mut self) -> Result<()> {
        self.check_open()
    }

    fn datasync(&mut self) -> Result<()> {
        self.check_open()
    }

    fn truncate(&mut self, size: i64) -> Result<()> {
        self.check_open()?;
        if size < 0 {
            return Err(FsError::InvalidInput);
        }
        Err(FsError::PermissionDenied)
    }

    fn stat(&mut self) -> Result<Metadata> {
        self.check_open()?;
        Ok(Metadata {
            file_type: FileType::File,
            mode: 0o444,
            size: self.data.len() as u64,
            ..Default::default()
        })
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_and_seeks() {
        let mut file = StaticFile::new("/etc/motd", &b"hello world"[..]);
        let mut buf = [0u8; 5];
        assert_eq!(file.read(&mut buf), Ok(5));
        assert_eq!(&buf, b"hello");

        assert_eq!(file.seek(SeekFrom::End(-5)), Ok(6));
        assert_eq!(file.read(&mut buf), Ok(5));
        assert_eq!(&buf, b"world");
        assert_eq!(file.read(&mut buf), Ok(0));

        assert_eq!(file.seek(SeekFrom::Current(-20)), Err(FsError::InvalidInput));
    }

    #[test]
    fn sync_is_a_noop_until_closed() {
        let mut file = StaticFile::new("/embedded", Vec::from(&b"abc"[..]));
        assert_eq!(file.sync(), Ok(()));
        assert_eq!(file.datasync(), Ok(()));
        assert_eq!(file.stat().map(|m| m.size), Ok(3));

        file.close().unwrap();
        assert_eq!(file.sync(), Err(FsError::InvalidFd));
        assert_eq!(file.datasync(), Err(FsError::InvalidFd));
        assert_eq!(file.close(), Ok(()));
    }

    #[test]
    fn rejects_mutation() {
        let mut file = StaticFile::new("/embedded", &b"abc"[..]);
        assert_eq!(file.write(b"x"), Err(FsError::PermissionDenied));
        assert_eq!(file.truncate(-1), Err(FsError::InvalidInput));
        assert_eq!(file.truncate(0), Err(FsError::PermissionDenied));
    }
}
