use crate::syscalls::*;

/// ### `fd_write()`
/// Write data to the file descriptor
/// Inputs:
/// - `Fd fd`
///     File descriptor (opened with writing) to write to
/// - `u8 buf[]`
///     Data to write
/// Output:
/// - `usize nwritten`
///     Number of bytes written
#[instrument(level = "trace", skip_all, fields(%fd, buf_len = buf.len()), ret)]
pub fn fd_write(ctx: &mut SysContext, fd: Fd, buf: &[u8]) -> Result<usize, Errno> {
    let entry = get_fd(ctx, fd)?;
    let nwritten = wasi_try!(entry.file.write(buf));
    Ok(nwritten)
}
