use crate::syscalls::*;

/// ### `fd_seek()`
/// Update file descriptor offset
/// Inputs:
/// - `Fd fd`
///     File descriptor to mutate
/// - `FileDelta offset`
///     Number of bytes to adjust offset by
/// - `Whence whence`
///     What the offset is relative to
/// Output:
/// - `Filesize newoffset`
///     The new offset relative to the start of the file
#[instrument(level = "trace", skip_all, fields(%fd, %offset, ?whence), ret)]
pub fn fd_seek(
    ctx: &mut SysContext,
    fd: Fd,
    offset: FileDelta,
    whence: Whence,
) -> Result<Filesize, Errno> {
    let pos = match whence {
        Whence::Set => SeekFrom::Start(wasi_try!(u64::try_from(offset).ok(); Errno::Inval)),
        Whence::Cur => SeekFrom::Current(offset),
        Whence::End => SeekFrom::End(offset),
    };
    let entry = get_fd(ctx, fd)?;
    let new_offset = wasi_try!(entry.file.seek(pos));
    Ok(new_offset)
}
