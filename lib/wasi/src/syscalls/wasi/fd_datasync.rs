use crate::syscalls::*;

/// ### `fd_datasync()`
/// Synchronize the file data to disk
/// Inputs:
/// - `Fd fd`
///     The file descriptor to sync
#[instrument(level = "debug", skip_all, fields(%fd), ret)]
pub fn fd_datasync(ctx: &mut SysContext, fd: Fd) -> Result<(), Errno> {
    let entry = get_fd(ctx, fd)?;
    wasi_try!(entry.file.datasync());
    Ok(())
}
