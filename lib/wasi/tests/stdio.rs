use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use wasi_host::syscalls::{fd_close, fd_read, fd_sync, fd_write};
use wasi_host::types::wasi::Errno;
use wasi_host::SysContext;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_stdout() {
    let stdout = Capture::default();
    let mut ctx = SysContext::builder()
        .stdout(Box::new(stdout.clone()))
        .build()
        .unwrap();

    assert_eq!(fd_write(&mut ctx, 1, b"hello world\n"), Ok(12));
    assert_eq!(fd_sync(&mut ctx, 1), Ok(()));
    assert_eq!(stdout.contents(), b"hello world\n");
}

#[test]
fn test_stdin() {
    let mut ctx = SysContext::builder()
        .stdin(Box::new(Cursor::new(b"Hello, stdin!".to_vec())))
        .build()
        .unwrap();

    let mut buf = [0u8; 32];
    let n = fd_read(&mut ctx, 0, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"Hello, stdin!");
    assert_eq!(fd_write(&mut ctx, 0, b"x"), Err(Errno::Badf));
}

#[test]
fn test_stderr_closed() {
    let stderr = Capture::default();
    let mut ctx = SysContext::builder()
        .stderr(Box::new(stderr.clone()))
        .build()
        .unwrap();

    assert_eq!(fd_write(&mut ctx, 2, b"oops"), Ok(4));
    assert_eq!(fd_close(&mut ctx, 2), Ok(()));
    assert_eq!(fd_write(&mut ctx, 2, b"again"), Err(Errno::Badf));
    assert_eq!(stderr.contents(), b"oops");
}

#[test]
fn test_placeholders() {
    let mut ctx = SysContext::builder().build().unwrap();
    assert_eq!(fd_write(&mut ctx, 1, b"dropped"), Ok(7));
    assert_eq!(fd_read(&mut ctx, 0, &mut [0u8; 4]), Ok(0));
}
