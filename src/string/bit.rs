//! BER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::slice;
use bytes::Bytes;
use crate::tag::Tag;
use crate::value::SchemaError;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike octet strings, they do not
/// need to contain a multiple of eight bits.
///
/// The [`from_content`][Self::from_content] function parses the content
/// octets of a bit string value. Alternatively, you can create a new simple
/// bit string via the [`new`][Self::new] method or from a named bit list
/// through [`from_bits`][Self::from_bits].
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// When encoded in BER, bit strings can either be a primitive or
/// constructed value.
///
/// If encoded as a primitive value, the first octet of the
/// content contains the number of unused bits in the last octet and the
/// following octets contain the bits with the first bit in the most
/// significant bit of the octet.
///
/// With DER, only the primitive form is allowed and the unused bits of the
/// last octet must be zero.
///
/// # Limitation
///
/// The `BitString` type does not implement the constructed encoding of a
/// bit string. Such values only appear in the value tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// # Panics
    ///
    /// The function panics if `unused` is larger than 7 or if it isn’t zero
    /// while `bits` is empty.
    pub fn new(unused: u8, bits: Bytes) -> Self {
        assert!(unused < 8 && (unused == 0 || !bits.is_empty()));
        Self { unused, bits }
    }

    /// Creates a bit string from a list of set bits.
    ///
    /// This is how the value of a named bit list type is built: the
    /// resulting bit string ends with the highest set bit as trailing zero
    /// bits must be removed in DER.
    pub fn from_bits(bits: &[usize]) -> Self {
        let len = match bits.iter().max() {
            Some(max) => max + 1,
            None => return Self { unused: 0, bits: Bytes::new() },
        };
        let mut octets = vec![0u8; (len + 7) / 8];
        for &bit in bits {
            octets[bit >> 3] |= 0x80 >> (bit & 7);
        }
        Self {
            unused: (octets.len() * 8 - len) as u8,
            bits: octets.into(),
        }
    }

    /// Returns the value of the given bit.
    ///
    /// Bits beyond the end of the bit string are never set.
    pub fn bit(&self, bit: usize) -> bool {
        let idx = bit >> 3;
        if self.bits.len() <= idx {
            return false
        }
        let bit = 7 - (bit as u8 & 7);
        if idx + 1 == self.bits.len() && self.unused > bit {
            return false
        }
        self.bits[idx] & (1 << bit) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - (self.unused as usize)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns an iterator over the octets in the bit string.
    pub fn octets(&self) -> BitStringIter {
        BitStringIter(self.bits.iter())
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }
}

/// # Decoding and Encoding
///
impl BitString {
    /// Parses the content octets of a primitive bit string value.
    pub fn from_content(content: Bytes) -> Result<Self, SchemaError> {
        match content.first() {
            Some(&unused) if Self::unused_is_valid(unused, content.len()) => {
                Ok(BitString { unused, bits: content.slice(1..) })
            }
            _ => xerr!(Err(SchemaError::InvalidValue(Tag::BIT_STRING)))
        }
    }

    /// Returns the DER content octets of the bit string.
    ///
    /// Any unused bits in the last octet are cleared.
    pub fn to_content(&self) -> Vec<u8> {
        let mut res = Vec::with_capacity(self.bits.len() + 1);
        res.push(self.unused);
        res.extend_from_slice(self.bits.as_ref());
        Self::clear_unused(&mut res);
        res
    }

    /// Returns whether `content` is a valid primitive bit string content.
    pub(crate) fn is_valid_content(content: &[u8]) -> bool {
        match content.first() {
            Some(&unused) => Self::unused_is_valid(unused, content.len()),
            None => false
        }
    }

    /// Clears the unused bits in valid bit string content octets.
    pub(crate) fn clear_unused(content: &mut [u8]) {
        let unused = content.first().copied().unwrap_or(0);
        if let Some(last) = content.last_mut() {
            if unused > 0 && unused < 8 {
                *last &= 0xFF << unused;
            }
        }
    }

    fn unused_is_valid(unused: u8, content_len: usize) -> bool {
        unused < 8 && (unused == 0 || content_len > 1)
    }
}


//------------ BitStringIter -------------------------------------------------

/// An iterator over the octets in the bit string.
#[derive(Clone, Debug)]
pub struct BitStringIter<'a>(slice::Iter<'a, u8>);

impl<'a> Iterator for BitStringIter<'a> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.0.next().cloned()
    }
}


//============ Tests =========================================================
