//! Error codes of the JS host ABI.
//!
//! A JS guest turns a failed host call into a `syscall.Errno` by looking up the
//! error *message* in its own table, so the message must be the bare code
//! (`"EINVAL"`), never a human readable description.
//!
//! The variants follow the same order as [`crate::wasi::Errno`] to keep the two
//! translators easy to compare.

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum Errno {
    /// Resource unavailable, or operation would block.
    Again,
    /// Bad file descriptor.
    Badf,
    /// File exists.
    Exist,
    /// Interrupted function.
    Intr,
    /// Invalid argument.
    Inval,
    /// I/O error.
    Io,
    /// Is a directory.
    Isdir,
    /// Too many levels of symbolic links.
    Loop,
    /// Filename too long.
    Nametoolong,
    /// No such file or directory.
    Noent,
    /// Function not supported.
    Nosys,
    /// Not a directory or a symbolic link to a directory.
    Notdir,
    /// Directory not empty.
    Notempty,
    /// Not supported, or operation not supported on socket.
    Notsup,
    /// Operation not permitted.
    Perm,
}

impl Errno {
    pub const ALL: &'static [Errno] = &[
        Errno::Again,
        Errno::Badf,
        Errno::Exist,
        Errno::Intr,
        Errno::Inval,
        Errno::Io,
        Errno::Isdir,
        Errno::Loop,
        Errno::Nametoolong,
        Errno::Noent,
        Errno::Nosys,
        Errno::Notdir,
        Errno::Notempty,
        Errno::Notsup,
        Errno::Perm,
    ];

    /// The code the guest matches on, e.g. `"EBADF"`.
    pub fn code(&self) -> &'static str {
        match self {
            Errno::Again => "EAGAIN",
            Errno::Badf => "EBADF",
            Errno::Exist => "EEXIST",
            Errno::Intr => "EINTR",
            Errno::Inval => "EINVAL",
            Errno::Io => "EIO",
            Errno::Isdir => "EISDIR",
            Errno::Loop => "ELOOP",
            Errno::Nametoolong => "ENAMETOOLONG",
            Errno::Noent => "ENOENT",
            Errno::Nosys => "ENOSYS",
            Errno::Notdir => "ENOTDIR",
            Errno::Notempty => "ENOTEMPTY",
            Errno::Notsup => "ENOTSUP",
            Errno::Perm => "EPERM",
        }
    }
}

impl core::fmt::Display for Errno {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::error::Error for Errno {}
