//! Clock sources a [`SysContext`](crate::SysContext) reads on behalf of the guest.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// 2022-01-01T00:00:00Z, the wall time reported by [`FakeClock`].
pub const FAKE_EPOCH_NANOS: i64 = 1_640_995_200_000_000_000;

/// Resolution of the default wall clock: one microsecond.
pub const DEFAULT_WALLTIME_RESOLUTION: u64 = 1_000;

/// Resolution of the default monotonic clock: one nanosecond.
pub const DEFAULT_NANOTIME_RESOLUTION: u64 = 1;

/// Reads wall-clock time as seconds and nanoseconds since the UNIX epoch.
pub trait Walltime: Send {
    fn walltime(&mut self) -> (i64, i32);
}

/// Reads monotonic nanoseconds since an arbitrary epoch.
pub trait Nanotime: Send {
    fn nanotime(&mut self) -> i64;
}

impl<F> Walltime for F
where
    F: FnMut() -> (i64, i32) + Send,
{
    fn walltime(&mut self) -> (i64, i32) {
        self()
    }
}

impl<F> Nanotime for F
where
    F: FnMut() -> i64 + Send,
{
    fn nanotime(&mut self) -> i64 {
        self()
    }
}

/// Suspends the caller for the given number of nanoseconds.
pub type Nanosleep = Box<dyn FnMut(i64) + Send>;

/// A deterministic clock for guests that were given no real one.
///
/// Wall time is fixed at [`FAKE_EPOCH_NANOS`], monotonic time at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FakeClock;

impl Walltime for FakeClock {
    fn walltime(&mut self) -> (i64, i32) {
        split_nanos(FAKE_EPOCH_NANOS)
    }
}

impl Nanotime for FakeClock {
    fn nanotime(&mut self) -> i64 {
        0
    }
}

/// The host's clocks.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Walltime for SystemClock {
    fn walltime(&mut self) -> (i64, i32) {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since) => (since.as_secs() as i64, since.subsec_nanos() as i32),
            Err(before) => {
                let before = before.duration();
                let nanos = before.as_nanos().min(i64::MAX as u128) as i64;
                split_nanos(-nanos)
            }
        }
    }
}

impl Nanotime for SystemClock {
    fn nanotime(&mut self) -> i64 {
        self.start.elapsed().as_nanos().min(i64::MAX as u128) as i64
    }
}

/// A sleep that returns immediately.
pub fn noop_nanosleep() -> Nanosleep {
    Box::new(|_ns: i64| {})
}

/// A sleep that blocks the calling thread.
pub fn sys_nanosleep() -> Nanosleep {
    Box::new(|ns: i64| {
        if ns > 0 {
            std::thread::sleep(Duration::from_nanos(ns as u64));
        }
    })
}

pub(crate) fn split_nanos(nanos: i64) -> (i64, i32) {
    (nanos.div_euclid(1_000_000_000), nanos.rem_euclid(1_000_000_000) as i32)
}

pub(crate) fn join_nanos((sec, nsec): (i64, i32)) -> i64 {
    sec.saturating_mul(1_000_000_000).saturating_add(nsec as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fake_clock_is_fixed() {
        let mut clock = FakeClock;
        assert_eq!(clock.walltime(), (1_640_995_200, 0));
        assert_eq!(clock.walltime(), (1_640_995_200, 0));
        assert_eq!(clock.nanotime(), 0);
        assert_eq!(join_nanos(clock.walltime()), FAKE_EPOCH_NANOS);
    }

    #[test]
    fn closures_are_clocks() {
        let mut ticks = 0i64;
        let mut nanotime = move || {
            ticks += 10;
            ticks
        };
        assert_eq!(Nanotime::nanotime(&mut nanotime), 10);
        assert_eq!(Nanotime::nanotime(&mut nanotime), 20);

        let mut walltime = || (5i64, 7i32);
        assert_eq!(Walltime::walltime(&mut walltime), (5, 7));
    }

    #[test]
    fn system_clock_moves_forward() {
        let mut clock = SystemClock::new();
        let (sec, _) = clock.walltime();
        assert!(sec > 1_640_995_200);
        let first = clock.nanotime();
        assert!(clock.nanotime() >= first);
    }

    #[test]
    fn split_negative() {
        assert_eq!(split_nanos(-1), (-1, 999_999_999));
        assert_eq!(join_nanos(split_nanos(-1)), -1);
    }
}
