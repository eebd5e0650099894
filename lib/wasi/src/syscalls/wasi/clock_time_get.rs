use crate::syscalls::*;

// NOTE: not instrumented, guests poll clocks in tight loops.

/// ### `clock_time_get()`
/// Get the time of the specified clock
/// Inputs:
/// - `Clockid clock_id`
///     The ID of the clock to query
/// - `Timestamp precision`
///     The maximum amount of error the reading may have, ignored
/// Output:
/// - `Timestamp time`
///     The value of the clock in nanoseconds
/// Errors:
/// - `Errno::Overflow`
///     If the wall clock reads before the UNIX epoch
pub fn clock_time_get(
    ctx: &mut SysContext,
    clock_id: Clockid,
    _precision: Timestamp,
) -> Result<Timestamp, Errno> {
    let nanos = match clock_id {
        Clockid::Realtime => ctx.walltime_nanos(),
        Clockid::Monotonic => ctx.nanotime(),
        _ => return Err(Errno::Inval),
    };
    Timestamp::try_from(nanos).map_err(|_| Errno::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FAKE_EPOCH_NANOS;
    use pretty_assertions::assert_eq;

    #[test]
    fn fake_clocks() {
        let mut ctx = SysContext::builder().build().unwrap();
        assert_eq!(
            clock_time_get(&mut ctx, Clockid::Realtime, 0),
            Ok(FAKE_EPOCH_NANOS as Timestamp)
        );
        assert_eq!(clock_time_get(&mut ctx, Clockid::Monotonic, 0), Ok(0));
        assert_eq!(
            clock_time_get(&mut ctx, Clockid::ProcessCputimeId, 0),
            Err(Errno::Inval)
        );
    }

    #[test]
    fn before_epoch_overflows() {
        let mut ctx = SysContext::builder()
            .walltime(|| (-1i64, 0i32), 1)
            .build()
            .unwrap();
        assert_eq!(
            clock_time_get(&mut ctx, Clockid::Realtime, 0),
            Err(Errno::Overflow)
        );
    }
}
