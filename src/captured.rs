//! Captured encoded data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, ops};
use bytes::Bytes;
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::mode::Mode;
use crate::value::Value;


//------------ Captured ------------------------------------------------------

/// The complete encoding of a value.
///
/// Values of this type hold the exact octets a value was decoded from,
/// including its identifier and length octets. This is necessary wherever
/// the encoding itself matters, such as for the signed portion of a
/// certificate: re-encoding a decoded value may well result in different
/// octets.
///
/// A captured value can also be created by encoding a value tree.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Captured(Bytes);

impl Captured {
    /// Creates a captured value from raw octets.
    ///
    /// The octets are not checked.
    pub fn from_bytes(bytes: Bytes) -> Self {
        Captured(bytes)
    }

    /// Creates a captured value from the DER encoding of a value.
    pub fn from_value(value: &Value) -> Result<Self, EncodeError> {
        value.to_der().map(|res| Captured(res.into()))
    }

    /// Returns a bytes slice with the raw data of the captured value.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns a reference to the underlying bytes value.
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Converts the captured value into the underlying bytes value.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Decodes the captured value again using the given mode.
    ///
    /// Anything after the first value results in an error.
    pub fn decode(&self, mode: Mode) -> Result<Value, DecodeError> {
        crate::decode::Decoder::new(mode).exact(true).decode(self.0.clone())
    }
}


//--- Deref and AsRef

impl ops::Deref for Captured {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for Captured {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- Debug

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Captured(")?;
        for ch in self.0.iter() {
            write!(f, "{:02x}", ch)?;
        }
        write!(f, ")")
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn captured_roundtrip() {
        let value = Value::sequence(vec![Value::integer(5i64)]);
        let captured = Captured::from_value(&value).unwrap();
        assert_eq!(captured.as_slice(), b"\x30\x03\x02\x01\x05");
        assert_eq!(captured.decode(Mode::Der).unwrap(), value);
        assert_eq!(format!("{:?}", captured), "Captured(3003020105)");
    }
}
