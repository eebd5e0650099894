use std::fs;
use std::io;
use std::os::windows::fs::{MetadataExt, OpenOptionsExt};
use std::path::Path;

use tracing::debug;
use windows_sys::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_ALREADY_EXISTS, ERROR_CALL_NOT_IMPLEMENTED,
    ERROR_CANT_RESOLVE_FILENAME, ERROR_DIRECTORY, ERROR_DIR_NOT_EMPTY, ERROR_FILENAME_EXCED_RANGE,
    ERROR_FILE_EXISTS, ERROR_FILE_NOT_FOUND, ERROR_INVALID_HANDLE, ERROR_INVALID_NAME,
    ERROR_INVALID_PARAMETER, ERROR_NEGATIVE_SEEK, ERROR_NOT_SUPPORTED, ERROR_OPERATION_ABORTED,
    ERROR_PATH_NOT_FOUND,
};
use windows_sys::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_READONLY, FILE_FLAG_BACKUP_SEMANTICS, FILE_FLAG_OPEN_REPARSE_POINT,
    FILE_SHARE_DELETE, FILE_SHARE_READ, FILE_SHARE_WRITE,
};

use crate::{FileType, FsError, OpenFlags, Result};

/// Opens `path` with POSIX-like sharing: the file may be renamed or deleted
/// by others while this handle is open.
pub fn open_file(path: &Path, flags: OpenFlags, perm: u32) -> Result<fs::File> {
    let want_dir = flags.contains(OpenFlags::DIRECTORY);
    let nofollow = flags.contains(OpenFlags::NOFOLLOW);
    let flags = flags - (OpenFlags::DIRECTORY | OpenFlags::NOFOLLOW);

    let mut custom_flags = FILE_FLAG_BACKUP_SEMANTICS;
    if nofollow {
        custom_flags |= FILE_FLAG_OPEN_REPARSE_POINT;
    }

    let mut options = super::base_open_options(flags);
    options
        .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE)
        .custom_flags(custom_flags);

    let read_only = flags.contains(OpenFlags::CREATE) && perm & 0o222 == 0;
    if read_only {
        options.attributes(FILE_ATTRIBUTE_READONLY);

        // CREATE_ALWAYS would also stamp the read-only attribute onto an
        // existing file. POSIX open keeps an existing file's permissions, so
        // truncate it through a plain open first.
        if flags.contains(OpenFlags::TRUNC) && !flags.contains(OpenFlags::EXCL) {
            let mut existing = options.clone();
            existing.create(false);
            match existing.open(path) {
                Ok(file) => return check_dir(file, want_dir),
                Err(err) if err.kind() != io::ErrorKind::NotFound => {
                    return Err(open_error(&err));
                }
                Err(_) => debug!(path = %path.display(), "read-only create of a new file"),
            }
        }
    }

    let file = options.open(path).map_err(|err| open_error(&err))?;
    check_dir(file, want_dir)
}

fn check_dir(file: fs::File, want_dir: bool) -> Result<fs::File> {
    if want_dir && !file.metadata()?.is_dir() {
        return Err(FsError::BaseNotDirectory);
    }
    Ok(file)
}

/// Opening through a path whose parent is a file reports not-a-directory on
/// Windows, where POSIX reports the entry as missing.
fn open_error(err: &io::Error) -> FsError {
    match FsError::from(err) {
        FsError::BaseNotDirectory => FsError::EntryNotFound,
        other => other,
    }
}

pub fn create_dir(path: &Path, _perm: u32) -> Result<()> {
    Ok(fs::create_dir(path)?)
}

/// Windows cannot flush directory handles.
pub fn sync_dir(_dir: &fs::File) -> Result<()> {
    Ok(())
}

/// Windows does not detect flushing a closed handle.
pub fn sync_closed(path: &Path) -> Result<()> {
    debug!(path = %path.display(), "sync of a closed file ignored");
    Ok(())
}

/// Windows truncates by path once the handle is gone.
pub fn truncate_closed(path: &Path, size: u64) -> Result<()> {
    debug!(path = %path.display(), size, "truncate of a closed file applied by path");
    let file = open_file(path, OpenFlags::WRITE, 0)?;
    Ok(file.set_len(size)?)
}

pub fn fs_error_from_os_code(code: i32) -> Option<FsError> {
    Some(match code as u32 {
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND | ERROR_INVALID_NAME => FsError::EntryNotFound,
        ERROR_ACCESS_DENIED => FsError::PermissionDenied,
        ERROR_INVALID_HANDLE => FsError::InvalidFd,
        ERROR_FILE_EXISTS | ERROR_ALREADY_EXISTS => FsError::AlreadyExists,
        ERROR_INVALID_PARAMETER | ERROR_NEGATIVE_SEEK => FsError::InvalidInput,
        ERROR_DIR_NOT_EMPTY => FsError::DirectoryNotEmpty,
        ERROR_DIRECTORY => FsError::BaseNotDirectory,
        ERROR_FILENAME_EXCED_RANGE => FsError::NameTooLong,
        ERROR_CANT_RESOLVE_FILENAME => FsError::TooManySymlinks,
        ERROR_NOT_SUPPORTED => FsError::Unsupported,
        ERROR_CALL_NOT_IMPLEMENTED => FsError::NotImplemented,
        ERROR_OPERATION_ABORTED => FsError::Interrupted,
        _ => return None,
    })
}

pub(crate) fn special_file_type(_file_type: &fs::FileType) -> FileType {
    FileType::Unknown
}

pub(crate) fn mode(metadata: &fs::Metadata) -> u32 {
    if metadata.file_attributes() & FILE_ATTRIBUTE_READONLY != 0 {
        0o444
    } else {
        0o666
    }
}

pub(crate) fn ctime(metadata: &fs::Metadata) -> u64 {
    crate::unix_nanos(metadata.created())
}
