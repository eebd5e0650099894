use crate::syscalls::*;

/// ### `clock_res_get()`
/// Get the resolution of the specified clock
/// Input:
/// - `Clockid clock_id`
///     The ID of the clock to get the resolution of
/// Output:
/// - `Timestamp resolution`
///     The resolution of the clock in nanoseconds
/// Errors:
/// - `Errno::Inval`
///     If the clock is neither the realtime nor the monotonic clock
#[instrument(level = "trace", skip_all, fields(?clock_id), ret)]
pub fn clock_res_get(ctx: &SysContext, clock_id: Clockid) -> Result<Timestamp, Errno> {
    match clock_id {
        Clockid::Realtime => Ok(ctx.walltime_resolution()),
        Clockid::Monotonic => Ok(ctx.nanotime_resolution()),
        _ => Err(Errno::Inval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolutions() {
        let ctx = SysContext::builder()
            .walltime(|| (0i64, 0i32), 100)
            .build()
            .unwrap();
        assert_eq!(clock_res_get(&ctx, Clockid::Realtime), Ok(100));
        assert_eq!(clock_res_get(&ctx, Clockid::Monotonic), Ok(1));
        assert_eq!(
            clock_res_get(&ctx, Clockid::ProcessCputimeId),
            Err(Errno::Inval)
        );
        assert_eq!(
            clock_res_get(&ctx, Clockid::ThreadCputimeId),
            Err(Errno::Inval)
        );
    }
}
