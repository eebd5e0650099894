use crate::syscalls::*;

/// ### `fd_close()`
/// Close an open file descriptor
/// Inputs:
/// - `Fd fd`
///     A file descriptor mapping to an open file to close
/// Errors:
/// - `Errno::Badf`
///     If `fd` is invalid or not open
#[instrument(level = "debug", skip_all, fields(%fd), ret)]
pub fn fd_close(ctx: &mut SysContext, fd: Fd) -> Result<(), Errno> {
    wasi_try!(ctx.fs_mut().close_file(fd));
    Ok(())
}
