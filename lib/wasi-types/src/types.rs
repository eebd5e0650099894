pub mod file {
    use crate::wasi::Fd;

    pub const __WASI_STDIN_FILENO: Fd = 0;
    pub const __WASI_STDOUT_FILENO: Fd = 1;
    pub const __WASI_STDERR_FILENO: Fd = 2;

    /// The first descriptor that is not reserved for stdio.
    pub const __WASI_FIRST_FREE_FD: Fd = 3;
}

pub mod time {
    /// Nanoseconds in one second.
    pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

    /// The coarsest resolution a clock may declare: two hours.
    pub const MAX_CLOCK_RESOLUTION: u64 = 2 * 3600 * NANOS_PER_SECOND;
}
