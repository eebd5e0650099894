//! Files and directories backed by the host operating system.

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::{platform, AccessMode, DirEntry, FsError, Metadata, OpenFlags, Result, VirtualFile};

/// A filesystem rooted at a host directory.
///
/// Guest paths are resolved lexically beneath the root; `..` may not climb
/// above it. Before touching the host, the existing part of a path is
/// canonicalized and must still lie under the root, so symlinks cannot lead
/// out of it either.
#[derive(Debug, Clone)]
pub struct FileSystem {
    root: PathBuf,
    canonical_root: PathBuf,
}

impl FileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !fs::metadata(&root)?.is_dir() {
            return Err(FsError::BaseNotDirectory);
        }
        let canonical_root = fs::canonicalize(&root)?;
        Ok(Self {
            root,
            canonical_root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::Prefix(_) => return Err(FsError::PermissionDenied),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(FsError::PermissionDenied);
                    }
                }
                Component::Normal(part) => parts.push(part),
            }
        }

        let mut resolved = self.root.clone();
        resolved.extend(parts);
        Ok(resolved)
    }

    /// Resolves `path` and checks that following it on the host stays under
    /// the root.
    ///
    /// With `follow_last` unset the final component is not followed, as for
    /// operations on the directory entry itself (unlink, rename, mkdir).
    fn resolve_confined(&self, path: &Path, follow_last: bool) -> Result<PathBuf> {
        let host_path = self.resolve(path)?;
        match host_path.parent() {
            Some(parent) if !follow_last && host_path != self.root => self.confine(parent)?,
            _ => self.confine(&host_path)?,
        }
        Ok(host_path)
    }

    /// The deepest existing ancestor of `host_path` decides where the host
    /// would land.
    fn confine(&self, host_path: &Path) -> Result<()> {
        for ancestor in host_path.ancestors() {
            match fs::canonicalize(ancestor) {
                Ok(real) if real.starts_with(&self.canonical_root) => return Ok(()),
                Ok(real) => {
                    debug!(
                        path = %host_path.display(),
                        target = %real.display(),
                        "path escapes the filesystem root"
                    );
                    return Err(FsError::PermissionDenied);
                }
                // Missing, below a file, or unreadable: the caller's own
                // operation reports that. A symlink that cannot be resolved
                // could still be created through, so it is refused.
                Err(_) => {
                    let is_symlink = fs::symlink_metadata(ancestor)
                        .map(|meta| meta.file_type().is_symlink())
                        .unwrap_or(false);
                    if is_symlink {
                        debug!(path = %ancestor.display(), "unresolvable symlink in path");
                        return Err(FsError::PermissionDenied);
                    }
                }
            }
        }
        Err(FsError::PermissionDenied)
    }
}

impl crate::FileSystem for FileSystem {
    fn open(&self, path: &Path, flags: OpenFlags, perm: u32) -> Result<Box<dyn VirtualFile>> {
        let follow = !flags.contains(OpenFlags::NOFOLLOW);
        let host_path = self.resolve_confined(path, follow)?;
        let file = platform::open_file(&host_path, flags, perm)?;
        if file.metadata()?.is_dir() {
            trace!(path = %host_path.display(), "opened directory");
            Ok(Box::new(Dir::new(file, host_path)))
        } else {
            trace!(path = %host_path.display(), ?flags, "opened file");
            Ok(Box::new(File::new(file, host_path, flags.into())))
        }
    }

    fn metadata(&self, path: &Path) -> Result<Metadata> {
        Ok(fs::metadata(self.resolve_confined(path, true)?)?.into())
    }

    fn create_dir(&self, path: &Path, perm: u32) -> Result<()> {
        platform::create_dir(&self.resolve_confined(path, false)?, perm)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        Ok(fs::remove_dir(self.resolve_confined(path, false)?)?)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        Ok(fs::remove_file(self.resolve_confined(path, false)?)?)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = self.resolve_confined(from, false)?;
        let to = self.resolve_confined(to, false)?;
        Ok(fs::rename(from, to)?)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = fs::read_dir(self.resolve_confined(path, true)?)?
            .map(|entry| {
                let entry = entry?;
                Ok(DirEntry {
                    name: entry.file_name(),
                    file_type: entry.file_type()?.into(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// A regular host file.
#[derive(Debug)]
pub struct File {
    inner: Option<fs::File>,
    path: PathBuf,
    access_mode: AccessMode,
}

impl File {
    pub fn new(file: fs::File, path: PathBuf, access_mode: AccessMode) -> Self {
        Self {
            inner: Some(file),
            path,
            access_mode,
        }
    }

    /// Opens a host file through the platform open routine.
    pub fn open(path: impl Into<PathBuf>, flags: OpenFlags, perm: u32) -> Result<Self> {
        let path = path.into();
        let file = platform::open_file(&path, flags, perm)?;
        Ok(Self::new(file, path, flags.into()))
    }

    fn handle(&mut self) -> Result<&mut fs::File> {
        self.inner.as_mut().ok_or(FsError::InvalidFd)
    }
}

impl VirtualFile for File {
    fn path(&self) -> &Path {
        &self.path
    }

    fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    fn is_dir(&self) -> bool {
        false
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.handle()?.read(buf)?)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(self.handle()?.write(buf)?)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        Ok(self.handle()?.seek(pos)?)
    }

    fn sync(&mut self) -> Result<()> {
        match self.inner.as_mut() {
            Some(file) => Ok(file.sync_all()?),
            None => platform::sync_closed(&self.path),
        }
    }

    fn datasync(&mut self) -> Result<()> {
        match self.inner.as_mut() {
            Some(file) => Ok(file.sync_data()?),
            None => platform::sync_closed(&self.path),
        }
    }

    fn truncate(&mut self, size: i64) -> Result<()> {
        let size = u64::try_from(size).map_err(|_| FsError::InvalidInput)?;
        match self.inner.as_mut() {
            Some(file) => Ok(file.set_len(size)?),
            None => platform::truncate_closed(&self.path, size),
        }
    }

    fn stat(&mut self) -> Result<Metadata> {
        Ok(self.handle()?.metadata()?.into())
    }

    fn close(&mut self) -> Result<()> {
        if self.inner.take().is_some() {
            debug!(path = %self.path.display(), "closed host file");
        }
        Ok(())
    }
}

/// A host directory handle.
#[derive(Debug)]
pub struct Dir {
    inner: Option<fs::File>,
    path: PathBuf,
}

impl Dir {
    pub fn new(dir: fs::File, path: PathBuf) -> Self {
        Self {
            inner: Some(dir),
            path,
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dir = platform::open_file(&path, OpenFlags::READ | OpenFlags::DIRECTORY, 0)?;
        Ok(Self::new(dir, path))
    }

    fn handle(&mut self) -> Result<&mut fs::File> {
        self.inner.as_mut().ok_or(FsError::InvalidFd)
    }
}

impl VirtualFile for Dir {
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
        self.handle()?;
        Err(FsError::IsADirectory)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        self.handle()?;
        Err(FsError::IsADirectory)
    }

    fn seek(&mut self, _pos: SeekFrom) -> Result<u64> {
        self.handle()?;
        Err(FsError::IsADirectory)
    }

    fn sync(&mut self) -> Result<()> {
        match self.inner.as_ref() {
            Some(dir) => platform::sync_dir(dir),
            None => platform::sync_closed(&self.path),
        }
    }

    fn datasync(&mut self) -> Result<()> {
        self.sync()
    }

    fn truncate(&mut self, _size: i64) -> Result<()> {
        self.handle()?;
        Err(FsError::IsADirectory)
    }

    fn stat(&mut self) -> Result<Metadata> {
        Ok(self.handle()?.metadata()?.into())
    }

    fn close(&mut self) -> Result<()> {
        if self.inner.take().is_some() {
            debug!(path = %self.path.display(), "closed host directory");
        }
        Ok(())
    }
}
