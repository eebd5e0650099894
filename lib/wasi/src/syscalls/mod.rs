//! Host halves of the `wasi_snapshot_preview1` calls this layer serves.
//!
//! Each call works on plain Rust values; copying to and from guest memory is
//! left to the interpreter. Failures come back as a WASI [`Errno`].

pub mod wasi;

pub use self::wasi::*;

#[allow(unused_imports)]
use std::io::SeekFrom;

#[allow(unused_imports)]
use tracing::{debug, instrument, trace};
#[allow(unused_imports)]
use wasi_host_types::wasi::{
    Clockid, Errno, Fd, FileDelta, Filesize, Filestat, Filetype, Timestamp, Whence,
};
#[allow(unused_imports)]
use wasi_host_vfs::{FileType, Metadata, OpenFlags};

#[allow(unused_imports)]
use crate::fs::FileEntry;
#[allow(unused_imports)]
use crate::SysContext;

pub(crate) fn filetype_from(file_type: FileType) -> Filetype {
    match file_type {
        FileType::Unknown => Filetype::Unknown,
        FileType::File => Filetype::RegularFile,
        FileType::Dir => Filetype::Directory,
        FileType::Symlink => Filetype::SymbolicLink,
        FileType::CharDevice => Filetype::CharacterDevice,
        FileType::BlockDevice => Filetype::BlockDevice,
        FileType::Socket => Filetype::SocketStream,
        FileType::Fifo => Filetype::Fifo,
    }
}

pub(crate) fn filestat_from(meta: &Metadata) -> Filestat {
    Filestat {
        st_filetype: filetype_from(meta.file_type),
        st_size: meta.size,
        st_atim: meta.atime,
        st_mtim: meta.mtime,
        st_ctim: meta.ctime,
    }
}

/// Looks up `fd`, failing with [`Errno::Badf`] when it is not open.
pub(crate) fn get_fd(ctx: &mut SysContext, fd: Fd) -> Result<&mut FileEntry, Errno> {
    ctx.fs_mut().lookup_file_mut(fd).ok_or(Errno::Badf)
}
