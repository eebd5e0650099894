#![deny(unused_mut)]
#![allow(non_camel_case_types)]

//! Types shared between the host system layer and the guest ABIs it serves.
//!
//! Two guest ABIs are supported and each has its own closed error vocabulary:
//!
//! - [`wasi`]: the `wasi_snapshot_preview1` ABI, where errors are small
//!   integers returned from every import.
//! - [`js`]: the JS host ABI used by `GOOS=js GOARCH=wasm` guests, where the
//!   error message itself is the code (e.g. `"EINVAL"`).

pub mod js;
pub mod types;
pub mod wasi;

pub use types::*;
