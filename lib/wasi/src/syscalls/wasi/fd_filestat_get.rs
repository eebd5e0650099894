use crate::syscalls::*;

/// ### `fd_filestat_get()`
/// Get the metadata of an open file
/// Input:
/// - `Fd fd`
///     The open file descriptor whose metadata will be read
/// Output:
/// - `Filestat buf`
///     The metadata of the file
#[instrument(level = "trace", skip_all, fields(%fd), ret)]
pub fn fd_filestat_get(ctx: &mut SysContext, fd: Fd) -> Result<Filestat, Errno> {
    let entry = get_fd(ctx, fd)?;
    let meta = wasi_try!(entry.file.stat());
    Ok(filestat_from(&meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syscalls::test_utils::host_context;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_directory_and_stdio() {
        let (dir, mut ctx) = host_context();
        std::fs::write(dir.path().join("a"), b"12345").unwrap();
        let fd = path_open(&mut ctx, 3, "a", OpenFlags::READ, 0).unwrap();

        let stat = fd_filestat_get(&mut ctx, fd).unwrap();
        assert_eq!(stat.st_filetype, Filetype::RegularFile);
        assert_eq!(stat.st_size, 5);
        assert!(stat.st_mtim > 0);

        assert_eq!(
            fd_filestat_get(&mut ctx, 3).map(|s| s.st_filetype),
            Ok(Filetype::Directory)
        );
        assert_eq!(
            fd_filestat_get(&mut ctx, 11).map(|s| s.st_size),
            Err(Errno::Badf)
        );
    }
}
