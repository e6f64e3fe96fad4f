//! Helper macros used across the crate.

/// Returns early with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
///
/// ```ignore
/// ensure!(self.header_num < MAX_HEADER_NUM, ParseError::too_many_headers(MAX_HEADER_NUM));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
