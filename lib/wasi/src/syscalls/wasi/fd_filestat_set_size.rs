use crate::syscalls::*;

/// ### `fd_filestat_set_size()`
/// Change the size of an open file, zeroing out any new bytes
/// Inputs:
/// - `Fd fd`
///     File descriptor to adjust
/// - `Filesize st_size`
///     New size that `fd` will be set to
#[instrument(level = "trace", skip_all, fields(%fd, %st_size), ret)]
pub fn fd_filestat_set_size(ctx: &mut SysContext, fd: Fd, st_size: Filesize) -> Result<(), Errno> {
    let size = wasi_try!(i64::try_from(st_size).ok(); Errno::Inval);
    let entry = get_fd(ctx, fd)?;
    wasi_try!(entry.file.truncate(size));
    Ok(())
}
