/// Unwraps a filesystem result, returning the translated WASI errno on failure.
///
/// The second form turns a missing value into the given errno.
macro_rules! wasi_try {
    ($expr:expr) => {{
        let res: Result<_, wasi_host_vfs::FsError> = $expr;
        match res {
            Ok(val) => val,
            Err(err) => return Err($crate::abi::wasi::to_errno(&err)),
        }
    }};
    ($expr:expr; $e:expr) => {{
        let opt: Option<_> = $expr;
        match opt {
            Some(val) => val,
            None => return Err($e),
        }
    }};
}
