use crate::syscalls::*;

/// ### `fd_read()`
/// Read data from file descriptor
/// Inputs:
/// - `Fd fd`
///     File descriptor from which data will be read
/// - `u8 buf[]`
///     Buffer the data is read into
/// Output:
/// - `usize nread`
///     Number of bytes read
#[instrument(level = "trace", skip_all, fields(%fd, buf_len = buf.len()), ret)]
pub fn fd_read(ctx: &mut SysContext, fd: Fd, buf: &mut [u8]) -> Result<usize, Errno> {
    let entry = get_fd(ctx, fd)?;
    let nread = wasi_try!(entry.file.read(buf));
    Ok(nread)
}
