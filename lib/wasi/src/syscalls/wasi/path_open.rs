use crate::syscalls::*;

/// ### `path_open()`
/// Open file located at the given path
/// Inputs:
/// - `Fd dirfd`
///     The fd corresponding to the directory that the file is in
/// - `&str path`
///     The path of the file or directory to open, relative to `dirfd`
/// - `OpenFlags flags`
///     How the file will be opened and whether it is created or truncated
/// - `u32 perm`
///     Permission bits for a newly created file
/// Output:
/// - `Fd fd`
///     The new file descriptor
#[instrument(level = "trace", skip_all, fields(%dirfd, %path, ?flags), ret)]
pub fn path_open(
    ctx: &mut SysContext,
    dirfd: Fd,
    path: &str,
    flags: OpenFlags,
    perm: u32,
) -> Result<Fd, Errno> {
    let fd = wasi_try!(ctx.fs_mut().open_file(dirfd, path, flags, perm));
    Ok(fd)
}
