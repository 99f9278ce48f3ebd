//! The encoding rules mode.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::{DecodeError, Decoder};
use crate::value::Value;


//------------ Mode ----------------------------------------------------------

/// The encoding rules to apply while decoding.
///
/// Encoding always produces DER since that is the only form that can be
/// signed. Decoding can either be relaxed and accept anything BER allows or
/// insist on the restrictions DER places on the structure of the data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings
    /// for lengths as well as indefinite length values.
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding of the length octets.
    Der,
}

impl Mode {
    /// Returns whether this mode is DER.
    pub fn is_restricted(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Returns whether this mode allows indefinite length values.
    pub fn allow_indefinite(self) -> bool {
        matches!(self, Mode::Ber)
    }

    /// Decodes a single value from `data` using this mode.
    ///
    /// This uses the default [`Decoder`] settings, i.e., trailing data
    /// after the value is ignored.
    pub fn decode(self, data: impl Into<Bytes>) -> Result<Value, DecodeError> {
        Decoder::new(self).decode(data)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Ber
    }
}
