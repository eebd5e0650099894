use crate::syscalls::*;

/// ### `random_get()`
/// Fill buffer with random data from the context's random source.
/// Inputs:
/// - `u8 buf[]`
///     The buffer the random bytes will be written to
#[instrument(level = "trace", skip_all, fields(buf_len = buf.len()), ret)]
pub fn random_get(ctx: &mut SysContext, buf: &mut [u8]) -> Result<(), Errno> {
    ctx.fill_random(buf);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    #[test]
    fn uses_configured_source() {
        let mut ctx = SysContext::builder()
            .rand_source(Box::new(StdRng::seed_from_u64(7)))
            .build()
            .unwrap();
        let mut buf = [0u8; 32];
        assert_eq!(random_get(&mut ctx, &mut buf), Ok(()));

        let mut expected = [0u8; 32];
        StdRng::seed_from_u64(7).fill_bytes(&mut expected);
        assert_eq!(buf, expected);
        assert_eq!(random_get(&mut ctx, &mut []), Ok(()));
    }
}
