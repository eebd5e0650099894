use crate::syscalls::*;

/// ### `args_sizes_get()`
/// Return command-line argument data sizes.
/// Outputs:
/// - `u32 argc`
///     The number of arguments.
/// - `u32 argv_buf_size`
///     The size of the argument string data, NUL terminators included.
#[instrument(level = "trace", skip_all, ret)]
pub fn args_sizes_get(ctx: &SysContext) -> Result<(u32, u32), Errno> {
    let argc = wasi_try!(u32::try_from(ctx.args().len()).ok(); Errno::Overflow);
    Ok((argc, ctx.args_size()))
}
