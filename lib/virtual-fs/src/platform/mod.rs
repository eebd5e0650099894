//! Host specific pieces of file handling, selected at build time.

use std::fs;

use crate::{AccessMode, OpenFlags};

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        pub use self::unix::*;
    } else if #[cfg(windows)] {
        mod windows;
        pub use self::windows::*;
    } else {
        compile_error!("wasi-host-vfs supports unix and windows hosts only");
    }
}

/// Translates the portable access and creation bits into std options.
///
/// `DIRECTORY` and `NOFOLLOW` are left to the host module.
pub(crate) fn base_open_options(flags: OpenFlags) -> fs::OpenOptions {
    let access = AccessMode::from(flags);
    let create = flags.contains(OpenFlags::CREATE);
    let exclusive = flags.contains(OpenFlags::EXCL);

    let mut options = fs::OpenOptions::new();
    options
        .read(access.can_read())
        .write(access.can_write())
        .append(flags.contains(OpenFlags::APPEND))
        .truncate(flags.contains(OpenFlags::TRUNC))
        .create(create && !exclusive)
        .create_new(create && exclusive);
    options
}
