use std::io;

use wasi_host_types::wasi::Errno;
use wasi_host_vfs::FsError;

/// Converts a host filesystem error into a `wasi_snapshot_preview1` errno.
pub fn to_errno(err: &FsError) -> Errno {
    match err {
        FsError::WouldBlock => Errno::Again,
        FsError::InvalidFd => Errno::Badf,
        FsError::AlreadyExists => Errno::Exist,
        FsError::Interrupted => Errno::Intr,
        FsError::InvalidInput => Errno::Inval,
        FsError::IOError => Errno::Io,
        FsError::IsADirectory => Errno::Isdir,
        FsError::TooManySymlinks => Errno::Loop,
        FsError::NameTooLong => Errno::Nametoolong,
        FsError::EntryNotFound => Errno::Noent,
        FsError::NotImplemented => Errno::Nosys,
        FsError::BaseNotDirectory => Errno::Notdir,
        FsError::DirectoryNotEmpty => Errno::Notempty,
        FsError::Unsupported => Errno::Notsup,
        FsError::PermissionDenied => Errno::Perm,
        FsError::UnknownError => Errno::Io,
    }
}

/// Converts a raw host I/O error, looking through any wrapping first.
pub fn io_error_to_errno(err: &io::Error) -> Errno {
    to_errno(&FsError::from(err))
}
