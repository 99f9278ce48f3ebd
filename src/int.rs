//! Variable-length integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{cmp, hash};
use bytes::Bytes;
use crate::mode::Mode;
use crate::tag::Tag;
use crate::value::SchemaError;


//------------ Integer -------------------------------------------------------

/// A BER encoded integer.
///
/// As integers are variable length in BER, this type is just a simple
/// wrapper atop the underlying `Bytes` value containing the raw content.
/// It guarantees that the wrapped integer is correctly encoded, i.e., it
/// is not empty.
///
/// A BER encoded integer is encoded in the content octets as a two’s
/// complement value with the most significant octet first. DER requires
/// the shortest possible form, i.e., the first nine bits must not be all
/// zero or all one. Integers decoded in BER mode may be longer than
/// necessary. The redundant octets are ignored when comparing or
/// converting values and dropped when encoding.
///
/// The type provides conversions to and from native integers. Integers
/// of arbitrary size, such as certificate serial numbers, can be kept as
/// is and accessed via [`as_slice`][Self::as_slice].
#[derive(Clone, Debug)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from its content octets.
    ///
    /// The content must not be empty. In DER mode, it also has to be in
    /// the shortest possible form.
    pub fn from_content(content: Bytes, mode: Mode) -> Result<Self, SchemaError> {
        if content.is_empty() {
            xerr!(return Err(SchemaError::InvalidValue(Tag::INTEGER)))
        }
        if mode.is_restricted() && !Self::is_canonical(content.as_ref()) {
            xerr!(return Err(SchemaError::InvalidValue(Tag::INTEGER)))
        }
        Ok(Integer(content))
    }

    /// Creates an integer from a native signed integer.
    pub fn from_i64(value: i64) -> Self {
        let bytes = value.to_be_bytes();
        Integer(Bytes::copy_from_slice(Self::canonical(&bytes)))
    }

    /// Creates an integer from a native unsigned integer.
    pub fn from_u64(value: u64) -> Self {
        Self::from_unsigned_be(&value.to_be_bytes())
    }

    /// Creates a non-negative integer from big-endian unsigned octets.
    ///
    /// Leading zeros are dropped and, if necessary, a single zero octet is
    /// added so the value isn’t mistaken for a negative one. An empty slice
    /// results in the integer zero.
    pub fn from_unsigned_be(octets: &[u8]) -> Self {
        let start = octets.iter().position(|&ch| ch != 0);
        let octets = match start {
            Some(start) => &octets[start..],
            None => return Integer(Bytes::from_static(b"\x00")),
        };
        let mut res = Vec::with_capacity(octets.len() + 1);
        if octets[0] & 0x80 != 0 {
            res.push(0);
        }
        res.extend_from_slice(octets);
        Integer(res.into())
    }

    /// Returns a slice of the minimal content octets.
    pub fn as_slice(&self) -> &[u8] {
        Self::canonical(self.0.as_ref())
    }

    /// Returns the raw content octets as they were decoded.
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Converts the integer into its raw content octets.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns whether the integer is negative.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|ch| ch & 0x80 != 0).unwrap_or(false)
    }

    /// Returns whether the integer is zero.
    pub fn is_zero(&self) -> bool {
        self.as_slice() == b"\x00"
    }

    /// Converts the integer into a native signed integer if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        let slice = self.as_slice();
        if slice.len() > 8 {
            return None
        }
        let mut res = if self.is_negative() { -1i64 } else { 0 };
        for &ch in slice {
            res = res << 8 | i64::from(ch);
        }
        Some(res)
    }

    /// Converts the integer into a native unsigned integer if it fits.
    ///
    /// Negative integers never fit.
    pub fn to_u64(&self) -> Option<u64> {
        if self.is_negative() {
            return None
        }
        let mut slice = self.as_slice();
        if slice.len() == 9 {
            // The zero octet keeping the value positive.
            slice = &slice[1..];
        }
        if slice.len() > 8 {
            return None
        }
        let mut res = 0u64;
        for &ch in slice {
            res = res << 8 | u64::from(ch);
        }
        Some(res)
    }

    /// Returns the shortest form of the two’s complement integer `content`.
    ///
    /// Redundant leading octets, i.e., zero octets followed by an octet with
    /// the top bit cleared and 0xFF octets followed by an octet with the top
    /// bit set, are dropped.
    pub fn canonical(content: &[u8]) -> &[u8] {
        let mut content = content;
        while let [first, second, ..] = content {
            let redundant = {
                (*first == 0 && second & 0x80 == 0)
                || (*first == 0xFF && second & 0x80 != 0)
            };
            if !redundant {
                break
            }
            content = &content[1..];
        }
        content
    }

    /// Returns whether `content` is a non-empty integer in its shortest form.
    pub fn is_canonical(content: &[u8]) -> bool {
        !content.is_empty() && Self::canonical(content).len() == content.len()
    }
}


//--- From

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}


//--- PartialEq and Eq

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Integer { }


//--- PartialOrd and Ord

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => cmp::Ordering::Greater,
            (true, false) => cmp::Ordering::Less,
            // Same sign: the longer one has the larger magnitude. For
            // negative values this means it is smaller, which the octet
            // comparison of the sign extended values handles as well.
            (negative, _) => {
                let (left, right) = (self.as_slice(), other.as_slice());
                match left.len().cmp(&right.len()) {
                    cmp::Ordering::Equal => left.cmp(right),
                    ord if negative => ord.reverse(),
                    ord => ord,
                }
            }
        }
    }
}


//--- Hash

impl hash::Hash for Integer {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn content(data: &'static [u8], mode: Mode) -> Result<Integer, SchemaError> {
        Integer::from_content(Bytes::from_static(data), mode)
    }

    #[test]
    fn decode_integer() {
        assert!(content(b"", Mode::Ber).is_err());
        assert!(content(b"\x00", Mode::Der).is_ok());
        assert!(content(b"\x00\x80", Mode::Der).is_ok());
        assert!(content(b"\xFF\x00", Mode::Der).is_ok());
        assert!(content(b"\x00\x7F", Mode::Der).is_err());
        assert!(content(b"\xFF\x80", Mode::Der).is_err());
        assert_eq!(
            content(b"\x00\x00\x7F", Mode::Ber).unwrap().to_i64(),
            Some(127)
        );
        assert_eq!(
            content(b"\xFF\xFF\x80", Mode::Ber).unwrap().to_i64(),
            Some(-128)
        );
    }

    #[test]
    fn native_conversions() {
        for value in [
            0i64, 1, 127, 128, 255, 256, -1, -128, -129, i64::MIN, i64::MAX
        ] {
            let int = Integer::from_i64(value);
            assert!(Integer::is_canonical(int.as_slice()));
            assert_eq!(int.to_i64(), Some(value), "{}", value);
        }
        for value in [0u64, 127, 128, 0xFFFF, u64::MAX] {
            let int = Integer::from_u64(value);
            assert!(!int.is_negative());
            assert_eq!(int.to_u64(), Some(value), "{}", value);
        }
        assert_eq!(Integer::from_i64(128).as_slice(), b"\x00\x80");
        assert_eq!(Integer::from_i64(-128).as_slice(), b"\x80");
        assert_eq!(Integer::from_u64(u64::MAX).to_i64(), None);
        assert_eq!(Integer::from_i64(-1).to_u64(), None);
    }

    #[test]
    fn unsigned_be() {
        assert_eq!(Integer::from_unsigned_be(b"").as_slice(), b"\x00");
        assert_eq!(Integer::from_unsigned_be(b"\x00\x00").as_slice(), b"\x00");
        assert_eq!(
            Integer::from_unsigned_be(b"\x00\x9a\x01").as_slice(),
            b"\x00\x9a\x01"
        );
        assert_eq!(
            Integer::from_unsigned_be(b"\x00\x00\x12").as_slice(), b"\x12"
        );
    }

    #[test]
    fn ordering() {
        let mut ints: Vec<_> = [300i64, -1, 0, -300, 5, i64::MIN]
            .iter().map(|v| Integer::from_i64(*v)).collect();
        ints.sort();
        let values: Vec<_> = ints.iter().filter_map(Integer::to_i64).collect();
        assert_eq!(values, [i64::MIN, -300, -1, 0, 5, 300]);
        assert_eq!(
            content(b"\x00\x05", Mode::Ber).unwrap(), Integer::from_i64(5)
        );
    }
}
