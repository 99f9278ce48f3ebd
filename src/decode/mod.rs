//! Decoding BER encoded data.
//!
//! This module provides the means to decode BER or DER encoded data into a
//! generic tree of [`Value`][crate::Value]s. Interpretation of the content
//! of the tree is left to the accessor methods of the values which report
//! mismatches as [`SchemaError`][crate::SchemaError]s.
//!
//! Decoding is done through a [`Decoder`]. It is configured with the
//! [`Mode`][crate::Mode] to decode in, a limit for the nesting depth of
//! constructed values, and whether data may trail the decoded value. For
//! the common case, [`Mode::decode`][crate::Mode::decode] is a shortcut.
//!
//! All errors that can happen while decoding are reported as a
//! [`DecodeError`] which contains the kind of error and the position in
//! the input where it was detected.

pub use self::decoder::{DEFAULT_MAX_DEPTH, Decoder};
pub use self::error::{DecodeError, DecodeErrorKind, Pos};
pub use self::source::SliceSource;

mod decoder;
mod error;
mod source;
