use crate::syscalls::*;

/// ### `poll_oneoff()` with a single relative clock subscription
/// Suspends the guest until the timeout elapses.
/// Inputs:
/// - `Timestamp timeout`
///     Nanoseconds to sleep, clamped to the largest value the sleeper accepts
#[instrument(level = "trace", skip_all, fields(%timeout), ret)]
pub fn poll_oneoff_sleep(ctx: &mut SysContext, timeout: Timestamp) -> Result<(), Errno> {
    let ns = i64::try_from(timeout).unwrap_or(i64::MAX);
    ctx.nanosleep(ns);
    Ok(())
}
