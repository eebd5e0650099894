use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::{self, SeekFrom};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

pub mod host_fs;
mod noop_file;
pub mod platform;
mod static_file;
mod unimplemented_fs;

pub use noop_file::NoopFile;
pub use static_file::StaticFile;
pub use unimplemented_fs::UnimplementedFileSystem;

pub type Result<T> = std::result::Result<T, FsError>;

bitflags::bitflags! {
    /// Flags accepted by [`FileSystem::open`].
    ///
    /// `DIRECTORY` and `NOFOLLOW` sit in high bits that no host uses for
    /// anything else, so hosts without a native equivalent can strip them.
    #[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
    pub struct OpenFlags: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const APPEND = 1 << 2;
        const CREATE = 1 << 3;
        const EXCL = 1 << 4;
        const TRUNC = 1 << 5;
        const DIRECTORY = 1 << 29;
        const NOFOLLOW = 1 << 30;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum AccessMode {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn can_read(self) -> bool {
        matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
    }
}

impl From<OpenFlags> for AccessMode {
    fn from(flags: OpenFlags) -> Self {
        match (
            flags.contains(OpenFlags::READ),
            flags.intersects(OpenFlags::WRITE | OpenFlags::APPEND),
        ) {
            (true, true) => AccessMode::ReadWrite,
            (false, true) => AccessMode::WriteOnly,
            _ => AccessMode::ReadOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum FileType {
    #[default]
    Unknown,
    File,
    Dir,
    Symlink,
    CharDevice,
    BlockDevice,
    Socket,
    Fifo,
}

impl From<fs::FileType> for FileType {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            FileType::Dir
        } else if file_type.is_file() {
            FileType::File
        } else if file_type.is_symlink() {
            FileType::Symlink
        } else {
            platform::special_file_type(&file_type)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct Metadata {
    pub file_type: FileType,
    /// Permission bits, `0` where the host has none.
    pub mode: u32,
    /// Size of file in bytes.
    pub size: u64,
    /// Access time in nanoseconds since the UNIX epoch.
    pub atime: u64,
    /// Modification time in nanoseconds since the UNIX epoch.
    pub mtime: u64,
    /// Change time in nanoseconds since the UNIX epoch.
    pub ctime: u64,
}

impl Metadata {
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Dir
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl From<fs::Metadata> for Metadata {
    fn from(metadata: fs::Metadata) -> Self {
        Metadata {
            file_type: metadata.file_type().into(),
            mode: platform::mode(&metadata),
            size: metadata.len(),
            atime: unix_nanos(metadata.accessed()),
            mtime: unix_nanos(metadata.modified()),
            ctime: platform::ctime(&metadata),
        }
    }
}

pub(crate) fn unix_nanos(time: io::Result<SystemTime>) -> u64 {
    time.ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|duration| duration.as_nanos() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    pub file_type: FileType,
}

/// An open file or directory.
///
/// Every operation reports failures as [`FsError`]. Once [`VirtualFile::close`]
/// has returned, operations on a host-backed handle fail with
/// [`FsError::InvalidFd`], while closing again succeeds.
pub trait VirtualFile: fmt::Debug + Send {
    /// The path this file was opened with.
    fn path(&self) -> &Path;

    fn access_mode(&self) -> AccessMode;

    fn is_dir(&self) -> bool;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Flushes data and metadata to durable storage.
    fn sync(&mut self) -> Result<()>;

    /// Flushes data, and only the metadata needed to read it back.
    fn datasync(&mut self) -> Result<()>;

    /// Changes the file length to exactly `size` bytes, zero-filling on growth.
    ///
    /// Negative sizes are [`FsError::InvalidInput`], directories are
    /// [`FsError::IsADirectory`].
    fn truncate(&mut self, size: i64) -> Result<()>;

    fn stat(&mut self) -> Result<Metadata>;

    fn close(&mut self) -> Result<()>;
}

/// A filesystem capability that can back a preopened directory.
pub trait FileSystem: fmt::Debug + Send + Sync {
    fn open(&self, path: &Path, flags: OpenFlags, perm: u32) -> Result<Box<dyn VirtualFile>>;
    fn metadata(&self, path: &Path) -> Result<Metadata>;
    fn create_dir(&self, path: &Path, perm: u32) -> Result<()>;
    fn remove_dir(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;
}

/// Error type for external users
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum FsError {
    /// Operation would block, this error lets the caller know that they can try again
    #[error("blocking operation. try again")]
    WouldBlock,
    /// The fd given was not usable
    #[error("invalid fd")]
    InvalidFd,
    /// File exists
    #[error("file exists")]
    AlreadyExists,
    /// The operation was interrupted before it could finish
    #[error("operation interrupted")]
    Interrupted,
    /// The provided data is invalid
    #[error("invalid input")]
    InvalidInput,
    /// Something failed when doing IO. These errors can generally not be handled.
    /// It may work if tried again.
    #[error("io error")]
    IOError,
    /// Expected a file but found a directory
    #[error("is a directory")]
    IsADirectory,
    /// Symlink resolution looped or went too deep
    #[error("too many levels of symbolic links")]
    TooManySymlinks,
    #[error("name too long")]
    NameTooLong,
    /// The requested file or directory could not be found
    #[error("entry not found")]
    EntryNotFound,
    /// The host does not implement this operation
    #[error("not implemented")]
    NotImplemented,
    /// The fd given as a base was not a directory so the operation was not possible
    #[error("fd not a directory")]
    BaseNotDirectory,
    /// Directory not empty
    #[error("directory not empty")]
    DirectoryNotEmpty,
    /// The operation is not supported on this kind of file
    #[error("unsupported operation")]
    Unsupported,
    /// Caller was not allowed to perform this operation
    #[error("permission denied")]
    PermissionDenied,
    /// Some other unhandled error. If you see this, it's probably a bug.
    #[error("unknown error found")]
    UnknownError,
}

impl From<io::Error> for FsError {
    fn from(io_error: io::Error) -> Self {
        FsError::from(&io_error)
    }
}

impl From<&io::Error> for FsError {
    fn from(io_error: &io::Error) -> Self {
        if let Some(inner) = io_error.get_ref() {
            if let Some(fs_error) = inner.downcast_ref::<FsError>() {
                return *fs_error;
            }
            if let Some(inner) = inner.downcast_ref::<io::Error>() {
                return FsError::from(inner);
            }
        }

        if let Some(code) = io_error.raw_os_error() {
            return platform::fs_error_from_os_code(code).unwrap_or(FsError::UnknownError);
        }

        match io_error.kind() {
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists,
            io::ErrorKind::Interrupted => FsError::Interrupted,
            io::ErrorKind::InvalidInput => FsError::InvalidInput,
            io::ErrorKind::NotFound => FsError::EntryNotFound,
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
            io::ErrorKind::Unsupported => FsError::Unsupported,
            io::ErrorKind::WouldBlock => FsError::WouldBlock,
            io::ErrorKind::Other => FsError::IOError,
            _ => FsError::UnknownError,
        }
    }
}

impl From<FsError> for io::Error {
    fn from(fs_error: FsError) -> Self {
        let kind = match fs_error {
            FsError::WouldBlock => io::ErrorKind::WouldBlock,
            FsError::AlreadyExists => io::ErrorKind::AlreadyExists,
            FsError::Interrupted => io::ErrorKind::Interrupted,
            FsError::InvalidFd | FsError::InvalidInput => io::ErrorKind::InvalidInput,
            FsError::EntryNotFound => io::ErrorKind::NotFound,
            FsError::PermissionDenied => io::ErrorKind::PermissionDenied,
            FsError::NotImplemented | FsError::Unsupported => io::ErrorKind::Unsupported,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, fs_error)
    }
}
