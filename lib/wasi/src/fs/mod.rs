//! The guest's view of open files: a descriptor table plus the filesystems
//! that paths resolve against.

mod lazy_dir;
mod stdio;
mod table;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace, warn};
use wasi_host_types::wasi::Fd;
use wasi_host_vfs::{FileSystem, FsError, Metadata, NoopFile, OpenFlags, Result, VirtualFile};

pub use self::lazy_dir::LazyDir;
pub use self::stdio::Stdio;
pub use self::table::{FileEntry, FileTable};

/// Mount point of the root preopen.
pub const ROOT_PREOPEN_NAME: &str = "/";

/// Owns every file the guest has open.
///
/// Path operations take a directory descriptor and walk that directory's
/// filesystem, never the host filesystem directly.
#[derive(Debug)]
pub struct FsContext {
    files: FileTable,
    root_fs: Option<Arc<dyn FileSystem>>,
}

impl FsContext {
    /// Creates the table with stdio at 0, 1 and 2 and, when `root_fs` is
    /// given, a preopen named `/` at 3.
    ///
    /// Missing stdio streams are replaced by no-op files.
    pub fn new(
        stdin: Option<Box<dyn Read + Send>>,
        stdout: Option<Box<dyn Write + Send>>,
        stderr: Option<Box<dyn Write + Send>>,
        root_fs: Option<Arc<dyn FileSystem>>,
    ) -> Self {
        let stdin: Box<dyn VirtualFile> = match stdin {
            Some(reader) => Box::new(Stdio::from_reader("stdin", reader)),
            None => Box::new(NoopFile::new("/dev/stdin")),
        };
        let stdout: Box<dyn VirtualFile> = match stdout {
            Some(writer) => Box::new(Stdio::from_writer("stdout", writer)),
            None => Box::new(NoopFile::new("/dev/stdout")),
        };
        let stderr: Box<dyn VirtualFile> = match stderr {
            Some(writer) => Box::new(Stdio::from_writer("stderr", writer)),
            None => Box::new(NoopFile::new("/dev/stderr")),
        };

        let mut files = FileTable::with_stdio(
            stdio_entry("stdin", stdin),
            stdio_entry("stdout", stdout),
            stdio_entry("stderr", stderr),
        );

        if let Some(fs) = &root_fs {
            let fd = files.insert(FileEntry {
                name: ROOT_PREOPEN_NAME.to_string(),
                is_preopen: true,
                is_dir: true,
                fs: Some(fs.clone()),
                file: Box::new(LazyDir::new(fs.clone())),
            });
            debug!(fd, name = ROOT_PREOPEN_NAME, "preopened root directory");
        }

        Self { files, root_fs }
    }

    /// The filesystem backing the root preopen.
    pub fn root_fs(&self) -> Option<&Arc<dyn FileSystem>> {
        self.root_fs.as_ref()
    }

    pub fn file_table(&self) -> &FileTable {
        &self.files
    }

    pub fn lookup_file(&self, fd: Fd) -> Option<&FileEntry> {
        self.files.get(fd)
    }

    pub fn lookup_file_mut(&mut self, fd: Fd) -> Option<&mut FileEntry> {
        self.files.get_mut(fd)
    }

    /// Registers an already open file, e.g. one embedded in the host.
    pub fn insert_file(&mut self, name: impl Into<String>, file: Box<dyn VirtualFile>) -> Fd {
        let is_dir = file.is_dir();
        self.files.insert(FileEntry {
            name: name.into(),
            is_preopen: false,
            is_dir,
            fs: None,
            file,
        })
    }

    /// Opens `path` relative to the directory `dir_fd` and returns the new
    /// descriptor.
    pub fn open_file(&mut self, dir_fd: Fd, path: &str, flags: OpenFlags, perm: u32) -> Result<Fd> {
        let (fs, full_path) = self.resolve(dir_fd, path)?;
        let file = fs.open(&full_path, flags, perm)?;
        let is_dir = file.is_dir();

        let fd = self.files.insert(FileEntry {
            name: full_path.to_string_lossy().into_owned(),
            is_preopen: false,
            is_dir,
            fs: if is_dir { Some(fs) } else { None },
            file,
        });
        trace!(fd, dir_fd, path, is_dir, "opened");
        Ok(fd)
    }

    /// Removes `fd` from the table, then closes it.
    pub fn close_file(&mut self, fd: Fd) -> Result<()> {
        let mut entry = self.files.remove(fd).ok_or(FsError::InvalidFd)?;
        trace!(fd, name = %entry.name, "closing");
        entry.file.close()
    }

    pub fn stat_path(&self, dir_fd: Fd, path: &str) -> Result<Metadata> {
        let (fs, full_path) = self.resolve(dir_fd, path)?;
        fs.metadata(&full_path)
    }

    pub fn create_dir(&self, dir_fd: Fd, path: &str, perm: u32) -> Result<()> {
        let (fs, full_path) = self.resolve(dir_fd, path)?;
        fs.create_dir(&full_path, perm)
    }

    pub fn remove_dir(&self, dir_fd: Fd, path: &str) -> Result<()> {
        let (fs, full_path) = self.resolve(dir_fd, path)?;
        fs.remove_dir(&full_path)
    }

    pub fn unlink(&self, dir_fd: Fd, path: &str) -> Result<()> {
        let (fs, full_path) = self.resolve(dir_fd, path)?;
        fs.remove_file(&full_path)
    }

    /// Renames within one filesystem; both directories must share it.
    pub fn rename(&self, from_fd: Fd, from: &str, to_fd: Fd, to: &str) -> Result<()> {
        let (from_fs, from_path) = self.resolve(from_fd, from)?;
        let (to_fs, to_path) = self.resolve(to_fd, to)?;
        if !same_fs(&from_fs, &to_fs) {
            return Err(FsError::Unsupported);
        }
        from_fs.rename(&from_path, &to_path)
    }

    /// Closes every open file, stdio included, and empties the table.
    ///
    /// All files are closed even if some fail; the first failure is returned.
    pub fn close(&mut self) -> Result<()> {
        let mut result = Ok(());
        for (fd, mut entry) in self.files.drain() {
            if let Err(err) = entry.file.close() {
                warn!(fd, name = %entry.name, %err, "failed to close file");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        debug!("closed all files");
        result
    }

    fn resolve(&self, dir_fd: Fd, path: &str) -> Result<(Arc<dyn FileSystem>, PathBuf)> {
        let dir = self.files.get(dir_fd).ok_or(FsError::InvalidFd)?;
        if !dir.is_dir {
            return Err(FsError::BaseNotDirectory);
        }
        let fs = dir.fs.clone().ok_or(FsError::BaseNotDirectory)?;
        let full_path = if dir.is_preopen {
            Path::new(path).to_path_buf()
        } else {
            // A leading `/` would replace the directory in `join`.
            Path::new(&dir.name).join(path.trim_start_matches('/'))
        };
        Ok((fs, full_path))
    }
}

impl Drop for FsContext {
    fn drop(&mut self) {
        if !self.files.is_empty() {
            let _ = self.close();
        }
    }
}

fn stdio_entry(name: &str, file: Box<dyn VirtualFile>) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        is_preopen: false,
        is_dir: false,
        fs: None,
        file,
    }
}

fn same_fs(a: &Arc<dyn FileSystem>, b: &Arc<dyn FileSystem>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wasi_host_vfs::{host_fs, StaticFile, UnimplementedFileSystem};

    fn host_context() -> (tempfile::TempDir, FsContext) {
        let dir = tempfile::tempdir().unwrap();
        let fs: Arc<dyn FileSystem> = Arc::new(host_fs::FileSystem::new(dir.path()).unwrap());
        (dir, FsContext::new(None, None, None, Some(fs)))
    }

    #[test]
    fn stdio_and_root_preopen() {
        let ctx = FsContext::new(None, None, None, Some(Arc::new(UnimplementedFileSystem)));
        let names: Vec<(Fd, &str, bool)> = ctx
            .file_table()
            .iter()
            .map(|(fd, e)| (fd, e.name.as_str(), e.is_preopen))
            .collect();
        assert_eq!(
            names,
            vec![
                (0, "stdin", false),
                (1, "stdout", false),
                (2, "stderr", false),
                (3, "/", true),
            ]
        );

        let root = ctx.lookup_file(3).unwrap();
        assert!(root.is_dir);
        assert!(root.fs.is_some());
        assert!(ctx.root_fs().is_some());
    }

    #[test]
    fn no_root_fs_means_no_preopen() {
        let ctx = FsContext::new(None, None, None, None);
        assert_eq!(ctx.file_table().len(), 3);
        assert!(ctx.lookup_file(3).is_none());
        assert!(ctx.root_fs().is_none());
    }

    #[test]
    fn open_and_close() {
        let (dir, mut ctx) = host_context();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();

        let fd = ctx.open_file(3, "a.txt", OpenFlags::READ, 0).unwrap();
        assert_eq!(fd, 4);

        let mut buf = [0u8; 5];
        let entry = ctx.lookup_file_mut(fd).unwrap();
        assert_eq!(entry.file.read(&mut buf), Ok(5));
        assert_eq!(&buf, b"hello");

        ctx.close_file(fd).unwrap();
        assert!(ctx.lookup_file(fd).is_none());
        assert_eq!(ctx.close_file(fd), Err(FsError::InvalidFd));

        let again = ctx.open_file(3, "/a.txt", OpenFlags::READ, 0).unwrap();
        assert_eq!(again, fd);
    }

    #[test]
    fn paths_resolve_against_directory_descriptors() {
        let (dir, mut ctx) = host_context();
        ctx.create_dir(3, "sub", 0o755).unwrap();
        std::fs::write(dir.path().join("sub").join("f"), b"x").unwrap();

        let sub = ctx.open_file(3, "sub", OpenFlags::READ, 0).unwrap();
        assert!(ctx.lookup_file(sub).unwrap().is_dir);
        assert_eq!(ctx.stat_path(sub, "f").map(|m| m.size), Ok(1));

        let file = ctx.open_file(sub, "f", OpenFlags::READ, 0).unwrap();
        assert_eq!(
            ctx.open_file(file, "g", OpenFlags::READ, 0),
            Err(FsError::BaseNotDirectory)
        );
        assert_eq!(ctx.stat_path(99, "f").map(|_| ()), Err(FsError::InvalidFd));
        ctx.close_file(file).unwrap();

        ctx.rename(sub, "f", 3, "g").unwrap();
        ctx.unlink(3, "g").unwrap();
        ctx.close_file(sub).unwrap();
        ctx.remove_dir(3, "sub").unwrap();
        assert_eq!(ctx.stat_path(3, "sub").map(|_| ()), Err(FsError::EntryNotFound));
    }

    #[test]
    fn absolute_paths_stay_under_the_directory_descriptor() {
        let (dir, mut ctx) = host_context();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("top"), b"root").unwrap();
        std::fs::write(dir.path().join("sub").join("inner"), b"sub").unwrap();

        let sub = ctx.open_file(3, "sub", OpenFlags::READ, 0).unwrap();
        assert_eq!(
            ctx.open_file(sub, "/top", OpenFlags::READ, 0),
            Err(FsError::EntryNotFound)
        );
        assert_eq!(ctx.stat_path(sub, "/inner").map(|m| m.size), Ok(3));
        assert_eq!(ctx.stat_path(sub, "//inner").map(|m| m.size), Ok(3));
    }

    #[test]
    fn stdio_is_not_a_directory() {
        let (_dir, mut ctx) = host_context();
        assert_eq!(
            ctx.open_file(1, "a", OpenFlags::READ, 0),
            Err(FsError::BaseNotDirectory)
        );
    }

    #[test]
    fn inserted_files_are_closed_with_the_context() {
        let mut ctx = FsContext::new(None, None, None, None);
        let fd = ctx.insert_file("motd", Box::new(StaticFile::new("/motd", &b"hi"[..])));
        assert_eq!(fd, 3);

        assert_eq!(ctx.close(), Ok(()));
        assert!(ctx.file_table().is_empty());
        assert!(ctx.lookup_file(0).is_none());
    }
}
