//! Per-instance process state a guest sees through its system calls.
//!
//! A [`SysContext`] is created once per guest instantiation through
//! [`SysContextBuilder`]. It is driven by the single thread executing that
//! guest and carries no internal locking; independent contexts share nothing
//! and may live on different threads.

mod builder;

use std::fmt;

use rand::RngCore;
use tracing::trace;

use crate::clock::{self, Nanosleep, Nanotime, Walltime};
use crate::fs::FsContext;

pub use self::builder::{
    ClockKind, SysContextBuilder, SysContextCreationError, SysLimits, FAKE_RAND_SEED,
};

/// Arguments, environment, clocks, entropy and open files of one guest.
pub struct SysContext {
    pub(crate) args: Vec<Vec<u8>>,
    pub(crate) args_size: u32,
    pub(crate) environ: Vec<Vec<u8>>,
    pub(crate) environ_size: u32,
    pub(crate) walltime: Box<dyn Walltime>,
    pub(crate) walltime_resolution: u64,
    pub(crate) nanotime: Box<dyn Nanotime>,
    pub(crate) nanotime_resolution: u64,
    pub(crate) nanosleep: Nanosleep,
    pub(crate) rand_source: Box<dyn RngCore + Send>,
    pub(crate) fs: FsContext,
}

impl fmt::Debug for SysContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysContext")
            .field("args", &self.args)
            .field("args_size", &self.args_size)
            .field("environ", &self.environ)
            .field("environ_size", &self.environ_size)
            .field("walltime_resolution", &self.walltime_resolution)
            .field("nanotime_resolution", &self.nanotime_resolution)
            .field("fs", &self.fs)
            .finish_non_exhaustive()
    }
}

impl SysContext {
    /// Shorthand for [`SysContextBuilder::new`].
    pub fn builder() -> SysContextBuilder {
        SysContextBuilder::new()
    }

    /// Guest argv, without NUL terminators.
    pub fn args(&self) -> &[Vec<u8>] {
        &self.args
    }

    /// Bytes needed to hold all arguments, one NUL terminator each.
    pub fn args_size(&self) -> u32 {
        self.args_size
    }

    /// `key=value` entries, without NUL terminators.
    pub fn environ(&self) -> &[Vec<u8>] {
        &self.environ
    }

    /// Bytes needed to hold all environment entries, one NUL terminator each.
    pub fn environ_size(&self) -> u32 {
        self.environ_size
    }

    /// Seconds and nanoseconds since the UNIX epoch.
    pub fn walltime(&mut self) -> (i64, i32) {
        self.walltime.walltime()
    }

    /// [`SysContext::walltime`] as nanoseconds since the UNIX epoch.
    pub fn walltime_nanos(&mut self) -> i64 {
        clock::join_nanos(self.walltime())
    }

    pub fn walltime_resolution(&self) -> u64 {
        self.walltime_resolution
    }

    /// Monotonic nanoseconds since an arbitrary epoch.
    pub fn nanotime(&mut self) -> i64 {
        self.nanotime.nanotime()
    }

    pub fn nanotime_resolution(&self) -> u64 {
        self.nanotime_resolution
    }

    /// Suspends the guest for `ns` nanoseconds, blocking the caller.
    pub fn nanosleep(&mut self, ns: i64) {
        trace!(ns, "nanosleep");
        (self.nanosleep)(ns)
    }

    /// Fills `buf` from the random source.
    pub fn fill_random(&mut self, buf: &mut [u8]) {
        self.rand_source.fill_bytes(buf)
    }

    pub fn fs(&self) -> &FsContext {
        &self.fs
    }

    pub fn fs_mut(&mut self) -> &mut FsContext {
        &mut self.fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FAKE_EPOCH_NANOS;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_deterministic() {
        let mut ctx = SysContext::builder().build().unwrap();
        assert_eq!(ctx.walltime_nanos(), FAKE_EPOCH_NANOS);
        assert_eq!(ctx.walltime_resolution(), 1_000);
        assert_eq!(ctx.nanotime(), 0);
        assert_eq!(ctx.nanotime_resolution(), 1);
        assert_eq!(ctx.args_size(), 0);
        assert_eq!(ctx.environ_size(), 0);
        ctx.nanosleep(1_000_000_000);

        let mut other = SysContext::builder().build().unwrap();
        let (mut a, mut b) = ([0u8; 16], [0u8; 16]);
        ctx.fill_random(&mut a);
        other.fill_random(&mut b);
        assert_eq!(a, b);
        assert_ne!(a, [0u8; 16]);
    }

    #[test]
    fn custom_clocks_and_sleep() {
        let mut ticks = 0i64;
        let slept = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = slept.clone();

        let mut ctx = SysContext::builder()
            .walltime(|| (1i64, 5i32), 10)
            .nanotime(
                move || {
                    ticks += 3;
                    ticks
                },
                7,
            )
            .nanosleep(Box::new(move |ns: i64| record.lock().unwrap().push(ns)))
            .build()
            .unwrap();

        assert_eq!(ctx.walltime(), (1, 5));
        assert_eq!(ctx.walltime_nanos(), 1_000_000_005);
        assert_eq!(ctx.walltime_resolution(), 10);
        assert_eq!(ctx.nanotime(), 3);
        assert_eq!(ctx.nanotime(), 6);
        assert_eq!(ctx.nanotime_resolution(), 7);

        ctx.nanosleep(42);
        assert_eq!(*slept.lock().unwrap(), vec![42]);
    }

    #[tracing_test::traced_test]
    #[test]
    fn build_is_logged() {
        let fs: std::sync::Arc<dyn wasi_host_vfs::FileSystem> =
            std::sync::Arc::new(wasi_host_vfs::UnimplementedFileSystem);
        let _ctx = SysContext::builder().arg("prog").fs(fs).build().unwrap();
        assert!(logs_contain("created system context"));
        assert!(logs_contain("preopened root directory"));
    }

    #[test]
    fn contexts_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<SysContext>();
    }
}
