use crate::syscalls::*;

/// ### `environ_sizes_get()`
/// Return environment variable data sizes.
/// Outputs:
/// - `u32 environ_count`
///     The number of `key=value` entries.
/// - `u32 environ_buf_size`
///     The size of the entries, NUL terminators included.
#[instrument(level = "trace", skip_all, ret)]
pub fn environ_sizes_get(ctx: &SysContext) -> Result<(u32, u32), Errno> {
    let count = wasi_try!(u32::try_from(ctx.environ().len()).ok(); Errno::Overflow);
    Ok((count, ctx.environ_size()))
}
