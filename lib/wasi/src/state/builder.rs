//! Builder system for configuring a [`SysContext`] and creating it.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use wasi_host_types::types::time::MAX_CLOCK_RESOLUTION;
use wasi_host_vfs::FileSystem;

use crate::clock::{
    self, FakeClock, Nanosleep, Nanotime, SystemClock, Walltime, DEFAULT_NANOTIME_RESOLUTION,
    DEFAULT_WALLTIME_RESOLUTION,
};
use crate::fs::FsContext;

use super::SysContext;

/// Seed of the random source used when none is configured.
pub const FAKE_RAND_SEED: u64 = 42;

/// Limits on what a guest may be handed at startup.
///
/// Each limit bounds both the number of entries and their encoded size: the
/// sum of entry lengths plus one NUL terminator per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct SysLimits {
    pub max_args_size: u32,
    pub max_environ_size: u32,
}

impl Default for SysLimits {
    fn default() -> Self {
        Self {
            max_args_size: u32::MAX,
            max_environ_size: u32::MAX,
        }
    }
}

/// Which clock a resolution was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    Walltime,
    Nanotime,
}

impl fmt::Display for ClockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockKind::Walltime => f.write_str("Walltime"),
            ClockKind::Nanotime => f.write_str("Nanotime"),
        }
    }
}

/// Error type returned when bad data is given to [`SysContextBuilder`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SysContextCreationError {
    #[error("{0} invalid: exceeds maximum count")]
    ExceedsMaximumCount(&'static str),
    #[error("{0} invalid: contains NUL character")]
    ContainsNulCharacter(&'static str),
    #[error("{0} invalid: exceeds maximum size")]
    ExceedsMaximumSize(&'static str),
    #[error("invalid {clock} resolution: {resolution}")]
    InvalidResolution { clock: ClockKind, resolution: u64 },
}

/// Builder API for configuring a [`SysContext`].
///
/// Anything left unset gets a deterministic stand-in: a fixed clock, a seeded
/// random source, a sleep that returns at once and no-op stdio.
///
/// Usage:
/// ```no_run
/// # use wasi_host::{SysContextBuilder, SysContextCreationError};
/// # fn main() -> Result<(), SysContextCreationError> {
/// let ctx = SysContextBuilder::new()
///     .arg("prog")
///     .arg("--verbose")
///     .env("HOME", "/")
///     .sys_walltime()
///     .sys_nanotime()
///     .build()?;
/// assert_eq!(ctx.args().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SysContextBuilder {
    limits: SysLimits,
    args: Vec<Vec<u8>>,
    environ: Vec<Vec<u8>>,
    stdin: Option<Box<dyn Read + Send>>,
    stdout: Option<Box<dyn Write + Send>>,
    stderr: Option<Box<dyn Write + Send>>,
    rand_source: Option<Box<dyn RngCore + Send>>,
    walltime: Option<(Box<dyn Walltime>, u64)>,
    nanotime: Option<(Box<dyn Nanotime>, u64)>,
    nanosleep: Option<Nanosleep>,
    fs: Option<Arc<dyn FileSystem>>,
}

impl fmt::Debug for SysContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SysContextBuilder")
            .field("limits", &self.limits)
            .field("args", &self.args)
            .field("environ", &self.environ)
            .field("stdin exists", &self.stdin.is_some())
            .field("stdout exists", &self.stdout.is_some())
            .field("stderr exists", &self.stderr.is_some())
            .field("rand_source exists", &self.rand_source.is_some())
            .field("walltime resolution", &self.walltime.as_ref().map(|(_, r)| r))
            .field("nanotime resolution", &self.nanotime.as_ref().map(|(_, r)| r))
            .field("nanosleep exists", &self.nanosleep.is_some())
            .field("fs", &self.fs)
            .finish()
    }
}

impl SysContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limits(mut self, limits: SysLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Caps the number of arguments and their encoded size.
    pub fn max_args_size(mut self, max: u32) -> Self {
        self.limits.max_args_size = max;
        self
    }

    /// Caps the number of environment entries and their encoded size.
    pub fn max_environ_size(mut self, max: u32) -> Self {
        self.limits.max_environ_size = max;
        self
    }

    /// Add an argument.
    ///
    /// Arguments must not contain the nul (0x0) byte.
    pub fn arg<V>(mut self, arg: V) -> Self
    where
        V: AsRef<[u8]>,
    {
        self.add_arg(arg);
        self
    }

    /// Add an argument.
    ///
    /// Arguments must not contain the nul (0x0) byte.
    pub fn add_arg<V>(&mut self, arg: V)
    where
        V: AsRef<[u8]>,
    {
        self.args.push(arg.as_ref().to_vec());
    }

    /// Add multiple arguments.
    pub fn args<I, Arg>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
        Arg: AsRef<[u8]>,
    {
        args.into_iter().for_each(|arg| {
            self.add_arg(arg);
        });
        self
    }

    /// Add an environment variable pair, stored as `key=value`.
    ///
    /// Neither part may contain a nul byte (`0x0`).
    pub fn env<Key, Value>(mut self, key: Key, value: Value) -> Self
    where
        Key: AsRef<[u8]>,
        Value: AsRef<[u8]>,
    {
        self.add_env(key, value);
        self
    }

    /// Add an environment variable pair, stored as `key=value`.
    pub fn add_env<Key, Value>(&mut self, key: Key, value: Value)
    where
        Key: AsRef<[u8]>,
        Value: AsRef<[u8]>,
    {
        let (key, value) = (key.as_ref(), value.as_ref());
        let mut entry = Vec::with_capacity(key.len() + value.len() + 1);
        entry.extend_from_slice(key);
        entry.push(b'=');
        entry.extend_from_slice(value);
        self.environ.push(entry);
    }

    /// Add multiple environment variable pairs.
    pub fn envs<I, Key, Value>(mut self, env_pairs: I) -> Self
    where
        I: IntoIterator<Item = (Key, Value)>,
        Key: AsRef<[u8]>,
        Value: AsRef<[u8]>,
    {
        env_pairs.into_iter().for_each(|(key, value)| {
            self.add_env(key, value);
        });
        self
    }

    /// Add an already formatted `key=value` entry as is.
    pub fn environ_entry<V>(mut self, entry: V) -> Self
    where
        V: AsRef<[u8]>,
    {
        self.environ.push(entry.as_ref().to_vec());
        self
    }

    pub fn stdin(mut self, stdin: Box<dyn Read + Send>) -> Self {
        self.stdin = Some(stdin);
        self
    }

    pub fn stdout(mut self, stdout: Box<dyn Write + Send>) -> Self {
        self.stdout = Some(stdout);
        self
    }

    pub fn stderr(mut self, stderr: Box<dyn Write + Send>) -> Self {
        self.stderr = Some(stderr);
        self
    }

    /// Give the guest the host process's own standard input.
    pub fn inherit_stdin(self) -> Self {
        self.stdin(Box::new(io::stdin()))
    }

    pub fn inherit_stdout(self) -> Self {
        self.stdout(Box::new(io::stdout()))
    }

    pub fn inherit_stderr(self) -> Self {
        self.stderr(Box::new(io::stderr()))
    }

    /// Inherit all three standard streams from the host process.
    pub fn inherit_stdio(self) -> Self {
        self.inherit_stdin().inherit_stdout().inherit_stderr()
    }

    pub fn rand_source(mut self, rand_source: Box<dyn RngCore + Send>) -> Self {
        self.rand_source = Some(rand_source);
        self
    }

    /// Random bytes from the host's entropy source.
    pub fn sys_rand_source(self) -> Self {
        self.rand_source(Box::new(StdRng::from_os_rng()))
    }

    /// Sets the wall clock and the resolution, in nanoseconds, it is
    /// advertised with.
    pub fn walltime<W>(mut self, walltime: W, resolution: u64) -> Self
    where
        W: Walltime + 'static,
    {
        self.walltime = Some((Box::new(walltime), resolution));
        self
    }

    /// Sets the monotonic clock and the resolution, in nanoseconds, it is
    /// advertised with.
    pub fn nanotime<N>(mut self, nanotime: N, resolution: u64) -> Self
    where
        N: Nanotime + 'static,
    {
        self.nanotime = Some((Box::new(nanotime), resolution));
        self
    }

    /// Reads the host's wall clock, advertised at microsecond resolution.
    pub fn sys_walltime(self) -> Self {
        self.walltime(SystemClock::new(), DEFAULT_WALLTIME_RESOLUTION)
    }

    /// Reads the host's monotonic clock, advertised at nanosecond resolution.
    pub fn sys_nanotime(self) -> Self {
        self.nanotime(SystemClock::new(), DEFAULT_NANOTIME_RESOLUTION)
    }

    pub fn nanosleep(mut self, nanosleep: Nanosleep) -> Self {
        self.nanosleep = Some(nanosleep);
        self
    }

    /// Sleeps by blocking the calling thread.
    pub fn sys_nanosleep(self) -> Self {
        self.nanosleep(clock::sys_nanosleep())
    }

    /// Sets the filesystem preopened at `/`.
    pub fn fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Validates the configuration and creates the context.
    ///
    /// Arguments are checked before the environment; for each the entry
    /// count is checked first, then NUL bytes, then the encoded size.
    pub fn build(self) -> Result<SysContext, SysContextCreationError> {
        let args_size = validate_entries("args", &self.args, self.limits.max_args_size)?;
        let environ_size =
            validate_entries("environ", &self.environ, self.limits.max_environ_size)?;

        let (walltime, walltime_resolution) = match self.walltime {
            Some((walltime, resolution)) => {
                validate_resolution(ClockKind::Walltime, resolution)?;
                (walltime, resolution)
            }
            None => (
                Box::new(FakeClock) as Box<dyn Walltime>,
                DEFAULT_WALLTIME_RESOLUTION,
            ),
        };

        let (nanotime, nanotime_resolution) = match self.nanotime {
            Some((nanotime, resolution)) => {
                validate_resolution(ClockKind::Nanotime, resolution)?;
                (nanotime, resolution)
            }
            None => (
                Box::new(FakeClock) as Box<dyn Nanotime>,
                DEFAULT_NANOTIME_RESOLUTION,
            ),
        };

        let rand_source = self
            .rand_source
            .unwrap_or_else(|| Box::new(StdRng::seed_from_u64(FAKE_RAND_SEED)));
        let nanosleep = self.nanosleep.unwrap_or_else(clock::noop_nanosleep);

        let fs = FsContext::new(self.stdin, self.stdout, self.stderr, self.fs);

        debug!(
            args = self.args.len(),
            args_size,
            environ = self.environ.len(),
            environ_size,
            walltime_resolution,
            nanotime_resolution,
            "created system context"
        );

        Ok(SysContext {
            args: self.args,
            args_size,
            environ: self.environ,
            environ_size,
            walltime,
            walltime_resolution,
            nanotime,
            nanotime_resolution,
            nanosleep,
            rand_source,
            fs,
        })
    }
}

/// Returns the encoded size of `entries`: their lengths plus one terminator each.
fn validate_entries(
    field: &'static str,
    entries: &[Vec<u8>],
    max: u32,
) -> Result<u32, SysContextCreationError> {
    if entries.len() as u64 > u64::from(max) {
        return Err(SysContextCreationError::ExceedsMaximumCount(field));
    }

    let mut size: u64 = 0;
    for entry in entries {
        if entry.contains(&0) {
            return Err(SysContextCreationError::ContainsNulCharacter(field));
        }
        size += entry.len() as u64 + 1;
    }

    if size > u64::from(max) {
        return Err(SysContextCreationError::ExceedsMaximumSize(field));
    }
    Ok(size as u32)
}

fn validate_resolution(clock: ClockKind, resolution: u64) -> Result<(), SysContextCreationError> {
    if resolution == 0 || resolution > MAX_CLOCK_RESOLUTION {
        return Err(SysContextCreationError::InvalidResolution { clock, resolution });
    }
    Ok(())
}
