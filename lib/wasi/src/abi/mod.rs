//! Host error to guest errno translation, one module per guest ABI.
//!
//! Both translators are total: a host error without a counterpart in the
//! guest vocabulary becomes that ABI's generic I/O error.

pub mod js;
pub mod wasi;
