use crate::syscalls::*;

/// ### `fd_sync()`
/// Synchronize file and metadata to disk
/// Inputs:
/// - `Fd fd`
///     The file descriptor to sync
/// Errors:
/// - `Errno::Badf`
///     If `fd` is not open
#[instrument(level = "debug", skip_all, fields(%fd), ret)]
pub fn fd_sync(ctx: &mut SysContext, fd: Fd) -> Result<(), Errno> {
    let entry = get_fd(ctx, fd)?;
    wasi_try!(entry.file.sync());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syscalls::test_utils::host_context;
    use pretty_assertions::assert_eq;

    #[test]
    fn sync_files_and_placeholders() {
        let (_dir, mut ctx) = host_context();
        let fd = path_open(
            &mut ctx,
            3,
            "a",
            OpenFlags::WRITE | OpenFlags::CREATE,
            0o644,
        )
        .unwrap();
        fd_write(&mut ctx, fd, b"data").unwrap();

        assert_eq!(fd_sync(&mut ctx, fd), Ok(()));
        assert_eq!(fd_sync(&mut ctx, 1), Ok(()));
        fd_close(&mut ctx, fd).unwrap();
        assert_eq!(fd_sync(&mut ctx, fd), Err(Errno::Badf));
    }
}
