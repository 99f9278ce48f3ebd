//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::{DecodeError, DecodeErrorKind, SliceSource};
use crate::encode::EncodeError;
use crate::mode::Mode;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-value marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// Under DER rules, a definite length must be encoded in the minimum
/// number of octets and the indefinite form is not allowed at all.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    /// A length value in its definite form.
    ///
    /// Provides the actual length of the content in octets.
    Definite(usize),

    /// A length value in its indefinite form.
    ///
    /// In this form, the end of a value is determined by a special tagged
    /// value called an ‘end-of-value’ marker.
    Indefinite,
}

/// The maximum number of octets following the first length octet we emit.
pub const MAX_LENGTH_OCTETS: usize = 4;

impl Length {
    /// Takes a length value from the beginning of a source.
    ///
    /// In DER mode, the indefinite form as well as definite lengths not in
    /// their shortest form result in a malformed length error.
    pub fn take_from(
        source: &mut SliceSource, mode: Mode,
    ) -> Result<Self, DecodeError> {
        let start = source.pos();
        let err = || DecodeError::new(DecodeErrorKind::MalformedLength, start);
        match source.take_u8()? {
            // Bit 7 clear: other bits are the length
            n if (n & 0x80) == 0 => Ok(Length::Definite(n as usize)),

            // Bit 7 set: other bits are the number of octets that
            // encode the length. Unless they are all 0, in which case this
            // is the indefinite form.
            0x80 => {
                if mode.allow_indefinite() {
                    Ok(Length::Indefinite)
                }
                else {
                    xerr!(Err(err()))
                }
            }

            // 0xFF is reserved.
            0xFF => xerr!(Err(err())),

            n => {
                let count = (n & 0x7F) as usize;
                let octets = source.take_bytes(count)?;
                let mut res = 0usize;
                let mut leading = true;
                for &octet in octets.iter() {
                    if leading && octet == 0 {
                        if mode.is_restricted() {
                            xerr!(return Err(err()))
                        }
                        continue
                    }
                    leading = false;
                    res = match res.checked_mul(0x100) {
                        Some(res) => res | usize::from(octet),
                        None => xerr!(return Err(err())),
                    };
                }
                // The short form would have done.
                if mode.is_restricted() && res < 0x80 {
                    xerr!(return Err(err()))
                }
                Ok(Length::Definite(res))
            }
        }
    }

    /// Returns the definite length or `None` for the indefinite form.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns whether the length is definite and zero.
    pub fn is_zero(self) -> bool {
        self == Length::Definite(0)
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Indefinite => 1,
            Length::Definite(len) => {
                if len < 0x80 {
                    1
                }
                else {
                    1 + Self::octet_count(len)
                }
            }
        }
    }

    /// Appends the encoded length to the end of `target`.
    ///
    /// Definite lengths are always encoded in their shortest form. If that
    /// would need more than [`MAX_LENGTH_OCTETS`] octets after the first,
    /// an error is returned and nothing is appended.
    pub fn append_encoded(
        self, target: &mut Vec<u8>
    ) -> Result<(), EncodeError> {
        match self {
            Length::Indefinite => target.push(0x80),
            Length::Definite(len) if len < 0x80 => target.push(len as u8),
            Length::Definite(len) => {
                let count = Self::octet_count(len);
                if count > MAX_LENGTH_OCTETS {
                    xerr!(return Err(EncodeError::OversizedLength(len)))
                }
                target.push(0x80 | count as u8);
                let bytes = len.to_be_bytes();
                target.extend_from_slice(&bytes[bytes.len() - count..]);
            }
        }
        Ok(())
    }

    /// Returns the number of octets needed for a definite length.
    fn octet_count(len: usize) -> usize {
        let bits = usize::BITS - len.leading_zeros();
        ((bits + 7) / 8).max(1) as usize
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use super::*;

    fn take_from(
        data: &'static [u8], mode: Mode
    ) -> Result<Option<usize>, DecodeErrorKind> {
        let mut src = SliceSource::new(Bytes::from_static(data));
        let res = Length::take_from(&mut src, mode).map_err(|e| e.kind())?;
        assert!(src.is_empty());
        Ok(res.definite())
    }

    #[test]
    fn ber_take_from() {
        let ber = |data| take_from(data, Mode::Ber);
        assert_eq!(ber(b"\x00"), Ok(Some(0x00)));
        assert_eq!(ber(b"\x12"), Ok(Some(0x12)));
        assert_eq!(ber(b"\x7f"), Ok(Some(0x7f)));
        assert_eq!(ber(b"\x80"), Ok(None));
        assert_eq!(ber(b"\x81\x00"), Ok(Some(0)));
        assert_eq!(ber(b"\x81\xF0"), Ok(Some(0xF0)));
        assert_eq!(ber(b"\x82\x00\x00"), Ok(Some(0)));
        assert_eq!(ber(b"\x82\xF0\x0E"), Ok(Some(0xF00E)));
        assert_eq!(ber(b"\x82\x00\x0E"), Ok(Some(0x0E)));
        assert_eq!(ber(b"\xFF"), Err(DecodeErrorKind::MalformedLength));
        assert_eq!(
            ber(b"\x89\x01\x00\x00\x00\x00\x00\x00\x00\x00"),
            Err(DecodeErrorKind::MalformedLength)
        );
        assert_eq!(
            take_from(b"\x82\x01", Mode::Ber),
            Err(DecodeErrorKind::TruncatedInput)
        );
    }

    #[test]
    fn der_take_from() {
        let der = |data| take_from(data, Mode::Der);
        assert_eq!(der(b"\x00"), Ok(Some(0x00)));
        assert_eq!(der(b"\x7f"), Ok(Some(0x7f)));
        assert_eq!(der(b"\x80"), Err(DecodeErrorKind::MalformedLength));
        assert_eq!(der(b"\x81\x00"), Err(DecodeErrorKind::MalformedLength));
        assert_eq!(der(b"\x81\x7f"), Err(DecodeErrorKind::MalformedLength));
        assert_eq!(der(b"\x81\x80"), Ok(Some(0x80)));
        assert_eq!(der(b"\x81\xF0"), Ok(Some(0xF0)));
        assert_eq!(
            der(b"\x82\x00\x00"), Err(DecodeErrorKind::MalformedLength)
        );
        assert_eq!(der(b"\x82\xF0\x0E"), Ok(Some(0xF00E)));
        assert_eq!(
            der(b"\x82\x00\x0E"), Err(DecodeErrorKind::MalformedLength)
        );
        assert_eq!(der(b"\xFF"), Err(DecodeErrorKind::MalformedLength));
    }

    #[test]
    fn encode() {
        fn step(l: Length, res: &[u8]) {
            let mut vec = Vec::new();
            l.append_encoded(&mut vec).unwrap();
            assert_eq!(vec.as_slice(), res, "append failed for {l:?}");
            assert_eq!(l.encoded_len(), res.len());
        }

        step(Length::Indefinite, b"\x80");
        step(Length::Definite(0), b"\x00");
        step(Length::Definite(0x12), b"\x12");
        step(Length::Definite(0x7f), b"\x7f");
        step(Length::Definite(0x80), b"\x81\x80");
        step(Length::Definite(0xdead), b"\x82\xde\xad");
        step(Length::Definite(0xFFFF_FFFF), b"\x84\xff\xff\xff\xff");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn encode_oversized() {
        let mut vec = Vec::new();
        assert_eq!(
            Length::Definite(0x1_0000_0000).append_encoded(&mut vec),
            Err(EncodeError::OversizedLength(0x1_0000_0000))
        );
        assert!(vec.is_empty());
    }
}
