use std::sync::Arc;

use pretty_assertions::assert_eq;
use wasi_host::clock::{FAKE_EPOCH_NANOS, SystemClock};
use wasi_host::types::types::time::MAX_CLOCK_RESOLUTION;
use wasi_host::vfs::{host_fs, FileSystem, UnimplementedFileSystem};
use wasi_host::{ClockKind, SysContext, SysContextCreationError, SysLimits};

fn args(max: u32, args: &[&[u8]]) -> Result<SysContext, SysContextCreationError> {
    SysContext::builder()
        .max_args_size(max)
        .args(args.iter().copied())
        .build()
}

fn environ(max: u32, environ: &[&[u8]]) -> Result<SysContext, SysContextCreationError> {
    let mut builder = SysContext::builder().max_environ_size(max);
    for entry in environ {
        builder = builder.environ_entry(entry);
    }
    builder.build()
}

#[test]
fn args_ok() {
    let ctx = args(10, &[b"a", b"bc"]).unwrap();
    assert_eq!(ctx.args(), &[b"a".to_vec(), b"bc".to_vec()]);
    assert_eq!(ctx.args_size(), 5);
}

#[test]
fn args_exceed_max_count() {
    assert_eq!(
        args(1, &[b"a", b"bc"]).unwrap_err(),
        SysContextCreationError::ExceedsMaximumCount("args")
    );
}

#[test]
fn args_exceed_max_size() {
    let err = args(4, &[b"a", b"bc"]).unwrap_err();
    assert_eq!(err, SysContextCreationError::ExceedsMaximumSize("args"));
    assert_eq!(err.to_string(), "args invalid: exceeds maximum size");
}

#[test]
fn args_with_nul() {
    let err = args(10, &[b"a", &[b'b', 0]]).unwrap_err();
    assert_eq!(err.to_string(), "args invalid: contains NUL character");
}

#[test]
fn environ_ok() {
    let ctx = environ(10, &[b"a=b", b"c=de"]).unwrap();
    assert_eq!(ctx.environ(), &[b"a=b".to_vec(), b"c=de".to_vec()]);
    assert_eq!(ctx.environ_size(), 9);
}

#[test]
fn environ_exceed_max_count() {
    assert_eq!(
        environ(1, &[b"a=b", b"c=de"]).unwrap_err().to_string(),
        "environ invalid: exceeds maximum count"
    );
}

#[test]
fn environ_exceed_max_size() {
    assert_eq!(
        environ(4, &[b"a=b", b"c=de"]).unwrap_err().to_string(),
        "environ invalid: exceeds maximum size"
    );
}

#[test]
fn environ_with_nul() {
    assert_eq!(
        environ(10, &[b"a=b", &[b'c', b'=', 0]]).unwrap_err(),
        SysContextCreationError::ContainsNulCharacter("environ")
    );
}

#[test]
fn args_are_checked_before_environ() {
    let err = SysContext::builder()
        .limits(SysLimits {
            max_args_size: 0,
            max_environ_size: 0,
        })
        .arg("a")
        .env("b", "c")
        .build()
        .unwrap_err();
    assert_eq!(err, SysContextCreationError::ExceedsMaximumCount("args"));
}

#[test]
fn walltime_resolution() {
    for resolution in [1, 1_000, MAX_CLOCK_RESOLUTION] {
        let ctx = SysContext::builder()
            .walltime(SystemClock::new(), resolution)
            .build()
            .unwrap();
        assert_eq!(ctx.walltime_resolution(), resolution);
    }

    for resolution in [0, MAX_CLOCK_RESOLUTION + 1] {
        let err = SysContext::builder()
            .walltime(SystemClock::new(), resolution)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SysContextCreationError::InvalidResolution {
                clock: ClockKind::Walltime,
                resolution,
            }
        );
    }

    let err = SysContext::builder()
        .walltime(SystemClock::new(), 0)
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid Walltime resolution: 0");
}

#[test]
fn nanotime_resolution() {
    let err = SysContext::builder()
        .nanotime(SystemClock::new(), 0)
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid Nanotime resolution: 0");

    let ctx = SysContext::builder().sys_nanotime().build().unwrap();
    assert_eq!(ctx.nanotime_resolution(), 1);
}

#[test]
fn host_backed_context() {
    let mut ctx = SysContext::builder()
        .sys_walltime()
        .sys_nanotime()
        .sys_nanosleep()
        .sys_rand_source()
        .build()
        .unwrap();

    assert!(ctx.walltime_nanos() > FAKE_EPOCH_NANOS);
    let before = ctx.nanotime();
    ctx.nanosleep(1_000_000);
    assert!(ctx.nanotime() - before >= 1_000_000);

    let mut buf = [0u8; 32];
    ctx.fill_random(&mut buf);
    assert_ne!(buf, [0u8; 32]);
}

#[test]
fn root_fs_is_preopened() {
    let ctx = SysContext::builder()
        .fs(Arc::new(UnimplementedFileSystem))
        .build()
        .unwrap();
    let root = ctx.fs().lookup_file(3).unwrap();
    assert_eq!(root.name, "/");
    assert!(root.is_preopen);
    assert!(root.is_dir);

    let ctx = SysContext::builder().build().unwrap();
    assert!(ctx.fs().lookup_file(3).is_none());
    assert_eq!(ctx.fs().file_table().len(), 3);
}

#[test]
fn closing_the_context_closes_files() {
    let dir = tempfile::tempdir().unwrap();
    let fs: Arc<dyn FileSystem> = Arc::new(host_fs::FileSystem::new(dir.path()).unwrap());
    let mut ctx = SysContext::builder().fs(fs).build().unwrap();

    let fd = ctx
        .fs_mut()
        .open_file(
            3,
            "a",
            wasi_host::vfs::OpenFlags::WRITE | wasi_host::vfs::OpenFlags::CREATE,
            0o644,
        )
        .unwrap();
    assert_eq!(fd, 4);

    assert_eq!(ctx.fs_mut().close(), Ok(()));
    assert!(ctx.fs().file_table().is_empty());
}
