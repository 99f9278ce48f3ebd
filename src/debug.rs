//! Macros for last-resort debugging.
//!
//! Since the decoder reports only an error kind and a position, finding out
//! which code path rejected some input can be tedious. This module contains
//! a macro `xerr!()` that logs a backtrace through the `log` facade if the
//! `extra-debug` feature is enabled before resolving into whatever the
//! expression it encloses resolves to otherwise. Use it whenever you
//! initially produce an error, i.e.:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(Err(DecodeError::new(DecodeErrorKind::MalformedTag, pos)))
//! }
//! ```
//!
//! or, with an early return:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(return Err(DecodeError::new(DecodeErrorKind::MalformedTag, pos)));
//! }
//! ```

#[cfg(feature = "extra-debug")]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => {{
        log::debug!(
            "--- EXTRA DEBUG ---\n{}\n--- EXTRA DEBUG ---",
            std::backtrace::Backtrace::force_capture()
        );
        $test
    }}
}

#[cfg(not(feature = "extra-debug"))]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => { $test };
}
