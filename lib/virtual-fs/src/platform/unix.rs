use std::fs;
use std::os::unix::fs::{DirBuilderExt, FileTypeExt, MetadataExt, OpenOptionsExt};
use std::path::Path;

use crate::{FileType, FsError, OpenFlags, Result};

pub fn open_file(path: &Path, flags: OpenFlags, perm: u32) -> Result<fs::File> {
    let mut custom_flags = libc::O_CLOEXEC;
    if flags.contains(OpenFlags::DIRECTORY) {
        custom_flags |= libc::O_DIRECTORY;
    }
    if flags.contains(OpenFlags::NOFOLLOW) {
        custom_flags |= libc::O_NOFOLLOW;
    }

    let mut options = super::base_open_options(flags);
    options.custom_flags(custom_flags).mode(perm);
    Ok(options.open(path)?)
}

pub fn create_dir(path: &Path, perm: u32) -> Result<()> {
    Ok(fs::DirBuilder::new().mode(perm).create(path)?)
}

pub fn sync_dir(dir: &fs::File) -> Result<()> {
    Ok(dir.sync_all()?)
}

/// A closed descriptor cannot be flushed.
pub fn sync_closed(_path: &Path) -> Result<()> {
    Err(FsError::InvalidFd)
}

/// A closed descriptor cannot be truncated.
pub fn truncate_closed(_path: &Path, _size: u64) -> Result<()> {
    Err(FsError::InvalidFd)
}

pub fn fs_error_from_os_code(code: i32) -> Option<FsError> {
    Some(match code {
        libc::EAGAIN => FsError::WouldBlock,
        libc::EBADF => FsError::InvalidFd,
        libc::EEXIST => FsError::AlreadyExists,
        libc::EINTR => FsError::Interrupted,
        libc::EINVAL => FsError::InvalidInput,
        libc::EIO => FsError::IOError,
        libc::EISDIR => FsError::IsADirectory,
        libc::ELOOP => FsError::TooManySymlinks,
        libc::ENAMETOOLONG => FsError::NameTooLong,
        libc::ENOENT => FsError::EntryNotFound,
        libc::ENOSYS => FsError::NotImplemented,
        libc::ENOTDIR => FsError::BaseNotDirectory,
        libc::ENOTEMPTY => FsError::DirectoryNotEmpty,
        libc::ENOTSUP => FsError::Unsupported,
        libc::EPERM => FsError::PermissionDenied,
        _ => return None,
    })
}

pub(crate) fn special_file_type(file_type: &fs::FileType) -> FileType {
    if file_type.is_char_device() {
        FileType::CharDevice
    } else if file_type.is_block_device() {
        FileType::BlockDevice
    } else if file_type.is_socket() {
        FileType::Socket
    } else if file_type.is_fifo() {
        FileType::Fifo
    } else {
        FileType::Unknown
    }
}

pub(crate) fn mode(metadata: &fs::Metadata) -> u32 {
    metadata.mode() & 0o7777
}

pub(crate) fn ctime(metadata: &fs::Metadata) -> u64 {
    let secs = u64::try_from(metadata.ctime()).unwrap_or(0);
    let nanos = u64::try_from(metadata.ctime_nsec()).unwrap_or(0);
    secs.saturating_mul(1_000_000_000).saturating_add(nanos)
}
