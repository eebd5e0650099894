//! Host side of the system interface seen by sandboxed guests.
//!
//! A [`SysContext`] holds everything a guest may observe about its "process":
//! arguments, environment, clocks, randomness, sleep and an [`FsContext`] that
//! maps small integer descriptors to open files. Failures are reported in the
//! error vocabulary of the guest ABI through the translators in [`abi`].

#[macro_use]
mod macros;

pub mod abi;
pub mod clock;
pub mod fs;
mod state;
pub mod syscalls;

pub use wasi_host_types as types;
pub use wasi_host_vfs as vfs;

pub use crate::fs::{FileEntry, FileTable, FsContext};
pub use crate::state::{
    ClockKind, SysContext, SysContextBuilder, SysContextCreationError, SysLimits, FAKE_RAND_SEED,
};
