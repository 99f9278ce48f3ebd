//! The identifier octets of a BER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::decode::{DecodeError, DecodeErrorKind, SliceSource};


//------------ Tag -----------------------------------------------------------

/// The tag of a BER encoded value.
///
/// Each BER encoded value starts with the _identifier octets._ They contain
/// the class and number of the value’s tag as well as a flag whether the
/// value uses primitive or constructed encoding. The `Tag` type only holds
/// class and number. Whether a value is constructed follows from its
/// content.
///
/// Tag numbers up to 30 are encoded in the first identifier octet. Larger
/// numbers follow in base 128 in subsequent octets. When decoding, at most
/// three such octets are accepted, limiting tag numbers to
/// [`MAX_NUMBER`][Self::MAX_NUMBER].
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    class: Class,
    number: u32,
}

/// # Constants for Often Used Tag Values
///
impl Tag {
    /// The largest tag number accepted when decoding.
    pub const MAX_NUMBER: u32 = 0x1f_ffff;

    /// The tag marking the end of an indefinite length value, UNIVERSAL 0.
    pub const END_OF_VALUE: Self = Tag::universal(0);

    pub const BOOLEAN: Self = Tag::universal(1);
    pub const INTEGER: Self = Tag::universal(2);
    pub const BIT_STRING: Self = Tag::universal(3);
    pub const OCTET_STRING: Self = Tag::universal(4);
    pub const NULL: Self = Tag::universal(5);
    pub const OID: Self = Tag::universal(6);
    pub const ENUMERATED: Self = Tag::universal(10);
    pub const UTF8_STRING: Self = Tag::universal(12);

    /// The tag for both SEQUENCE and SEQUENCE OF.
    pub const SEQUENCE: Self = Tag::universal(16);

    /// The tag for both SET and SET OF.
    pub const SET: Self = Tag::universal(17);

    pub const NUMERIC_STRING: Self = Tag::universal(18);
    pub const PRINTABLE_STRING: Self = Tag::universal(19);
    pub const TELETEX_STRING: Self = Tag::universal(20);
    pub const IA5_STRING: Self = Tag::universal(22);
    pub const UTC_TIME: Self = Tag::universal(23);
    pub const GENERALIZED_TIME: Self = Tag::universal(24);
    pub const VISIBLE_STRING: Self = Tag::universal(26);
    pub const UNIVERSAL_STRING: Self = Tag::universal(28);
    pub const BMP_STRING: Self = Tag::universal(30);

    pub const CTX_0: Self = Tag::ctx(0);
    pub const CTX_1: Self = Tag::ctx(1);
    pub const CTX_2: Self = Tag::ctx(2);
    pub const CTX_3: Self = Tag::ctx(3);
    pub const CTX_4: Self = Tag::ctx(4);
    pub const CTX_5: Self = Tag::ctx(5);
    pub const CTX_6: Self = Tag::ctx(6);
}

/// # Creation and Access
///
impl Tag {
    /// The bit of the first identifier octet marking constructed encoding.
    const CONSTRUCTED_BIT: u8 = 0x20;

    /// The number bits of the first octet signalling the high number form.
    const HIGH_NUMBER_FORM: u8 = 0x1f;

    /// The bit in subsequent octets signalling that more octets follow.
    const MORE_BIT: u8 = 0x80;

    /// Creates a new tag of the given class with the given number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in the universal class.
    pub const fn universal(number: u32) -> Self {
        Tag::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class.
    pub const fn application(number: u32) -> Self {
        Tag::new(Class::Application, number)
    }

    /// Creates a new tag in the context specific class.
    pub const fn ctx(number: u32) -> Self {
        Tag::new(Class::ContextSpecific, number)
    }

    /// Creates a new tag in the private class.
    pub const fn private(number: u32) -> Self {
        Tag::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag is of the universal class.
    pub fn is_universal(self) -> bool {
        self.class == Class::Universal
    }

    /// Returns whether the tag is of the context specific class.
    pub fn is_context_specific(self) -> bool {
        self.class == Class::ContextSpecific
    }
}

/// # Decoding and Encoding
///
impl Tag {
    /// Takes a tag from the beginning of a source.
    ///
    /// Upon success, returns both the tag and whether the value is
    /// constructed. If the source ends in the middle of the identifier
    /// octets, a truncation error is returned. Tag numbers that need more
    /// than three subsequent octets as well as tag numbers not encoded in
    /// the shortest possible form result in a malformed tag error.
    pub fn take_from(
        source: &mut SliceSource,
    ) -> Result<(Self, bool), DecodeError> {
        let start = source.pos();
        let first = source.take_u8()?;
        let class = Class::from_octet(first);
        let constructed = first & Tag::CONSTRUCTED_BIT != 0;
        if first & Tag::HIGH_NUMBER_FORM != Tag::HIGH_NUMBER_FORM {
            return Ok((
                Tag::new(class, u32::from(first & Tag::HIGH_NUMBER_FORM)),
                constructed
            ))
        }

        let mut number = 0u32;
        for idx in 0..3 {
            let octet = source.take_u8()?;
            if idx == 0 && octet == Tag::MORE_BIT {
                // Leading zero septet: there is a shorter form.
                xerr!(return Err(DecodeError::new(
                    DecodeErrorKind::MalformedTag, start
                )))
            }
            number = number << 7 | u32::from(octet & !Tag::MORE_BIT);
            if octet & Tag::MORE_BIT == 0 {
                if number < u32::from(Tag::HIGH_NUMBER_FORM) {
                    // Must have used the low tag number form.
                    xerr!(return Err(DecodeError::new(
                        DecodeErrorKind::MalformedTag, start
                    )))
                }
                return Ok((Tag::new(class, number), constructed))
            }
        }
        xerr!(Err(DecodeError::new(DecodeErrorKind::MalformedTag, start)))
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if self.number < u32::from(Tag::HIGH_NUMBER_FORM) {
            return 1
        }
        let mut len = 2;
        let mut number = self.number >> 7;
        while number != 0 {
            len += 1;
            number >>= 7;
        }
        len
    }

    /// Appends the encoded tag to the end of `target`.
    ///
    /// If `constructed` is `true`, the encoded tag will signal a value in
    /// constructed encoding and primitive encoding otherwise.
    pub fn append_encoded(self, constructed: bool, target: &mut Vec<u8>) {
        let mut first = self.class.to_octet();
        if constructed {
            first |= Tag::CONSTRUCTED_BIT
        }
        if self.number < u32::from(Tag::HIGH_NUMBER_FORM) {
            target.push(first | self.number as u8);
            return
        }
        target.push(first | Tag::HIGH_NUMBER_FORM);
        for shift in (0..self.encoded_len() - 1).rev() {
            let septet = (self.number >> (7 * shift)) as u8 & !Tag::MORE_BIT;
            if shift == 0 {
                target.push(septet)
            }
            else {
                target.push(septet | Tag::MORE_BIT)
            }
        }
    }
}


//--- Display and Debug

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Tag::BOOLEAN => "BOOLEAN",
            Tag::INTEGER => "INTEGER",
            Tag::BIT_STRING => "BIT STRING",
            Tag::OCTET_STRING => "OCTET STRING",
            Tag::NULL => "NULL",
            Tag::OID => "OBJECT IDENTIFIER",
            Tag::ENUMERATED => "ENUMERATED",
            Tag::UTF8_STRING => "UTF8String",
            Tag::SEQUENCE => "SEQUENCE",
            Tag::SET => "SET",
            Tag::NUMERIC_STRING => "NumericString",
            Tag::PRINTABLE_STRING => "PrintableString",
            Tag::TELETEX_STRING => "TeletexString",
            Tag::IA5_STRING => "IA5String",
            Tag::UTC_TIME => "UTCTime",
            Tag::GENERALIZED_TIME => "GeneralizedTime",
            Tag::VISIBLE_STRING => "VisibleString",
            Tag::UNIVERSAL_STRING => "UniversalString",
            Tag::BMP_STRING => "BMPString",
            _ => {
                return match self.class {
                    Class::Universal => {
                        write!(f, "[UNIVERSAL {}]", self.number)
                    }
                    Class::Application => {
                        write!(f, "[APPLICATION {}]", self.number)
                    }
                    Class::ContextSpecific => write!(f, "[{}]", self.number),
                    Class::Private => write!(f, "[PRIVATE {}]", self.number),
                }
            }
        };
        f.write_str(name)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// Tags defined by X.680 itself.
    Universal,

    /// Tags defined by an application.
    Application,

    /// Tags whose meaning depends on the enclosing type.
    ContextSpecific,

    /// Privately defined tags.
    Private,
}

impl Class {
    /// Returns the class encoded in the top two bits of an octet.
    fn from_octet(octet: u8) -> Self {
        match octet >> 6 {
            0 => Class::Universal,
            1 => Class::Application,
            2 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }

    /// Returns the class bits of the first identifier octet.
    fn to_octet(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::ContextSpecific => 0x80,
            Class::Private => 0xc0,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use bytes::Bytes;
    use super::*;

    const CLASSES: &[Class] = &[
        Class::Universal, Class::Application, Class::ContextSpecific,
        Class::Private
    ];

    fn roundtrip(tag: Tag, constructed: bool) -> (Tag, bool) {
        let mut buf = Vec::new();
        tag.append_encoded(constructed, &mut buf);
        assert_eq!(buf.len(), tag.encoded_len());
        let mut source = SliceSource::new(Bytes::from(buf));
        let res = Tag::take_from(&mut source).unwrap();
        assert!(source.is_empty());
        res
    }

    #[test]
    fn single_octet_tags() {
        for &class in CLASSES {
            for number in (0..5).chain(25..31) {
                let tag = Tag::new(class, number);
                assert_eq!(tag.encoded_len(), 1);
                assert_eq!(tag.number(), number);
                assert_eq!(tag.class(), class);
                assert_eq!(roundtrip(tag, false), (tag, false));
                assert_eq!(roundtrip(tag, true), (tag, true));
            }
        }
    }

    #[test]
    fn multi_octet_tags() {
        let cases = [
            (31, 2), (0x7f, 2), (0x80, 3), (0x3fff, 3), (0x4000, 4),
            (Tag::MAX_NUMBER, 4)
        ];
        for &class in CLASSES {
            for &(number, len) in &cases {
                let tag = Tag::new(class, number);
                assert_eq!(tag.encoded_len(), len);
                assert_eq!(roundtrip(tag, true), (tag, true));
            }
        }
    }

    #[test]
    fn known_encodings() {
        let mut buf = Vec::new();
        Tag::SEQUENCE.append_encoded(true, &mut buf);
        Tag::CTX_3.append_encoded(true, &mut buf);
        Tag::ctx(0x80).append_encoded(false, &mut buf);
        Tag::private(31).append_encoded(false, &mut buf);
        assert_eq!(buf, b"\x30\xa3\x9f\x81\x00\xdf\x1f");
    }

    #[test]
    fn tag_failures() {
        fn take(data: &'static [u8]) -> DecodeErrorKind {
            Tag::take_from(
                &mut SliceSource::new(Bytes::from_static(data))
            ).unwrap_err().kind()
        }

        // Too many octets.
        assert_eq!(
            take(b"\xff\x81\x80\x80\x00"), DecodeErrorKind::MalformedTag
        );
        // Leading zero septet.
        assert_eq!(take(b"\x1f\x80\x7f"), DecodeErrorKind::MalformedTag);
        // High form for a low number.
        assert_eq!(take(b"\x1f\x1e"), DecodeErrorKind::MalformedTag);
        // Truncated.
        assert_eq!(take(b"\x1f\x81"), DecodeErrorKind::TruncatedInput);
        assert_eq!(take(b""), DecodeErrorKind::TruncatedInput);
    }

    #[test]
    fn display() {
        assert_eq!(Tag::SEQUENCE.to_string(), "SEQUENCE");
        assert_eq!(Tag::CTX_3.to_string(), "[3]");
        assert_eq!(Tag::application(40).to_string(), "[APPLICATION 40]");
        assert_eq!(Tag::universal(99).to_string(), "[UNIVERSAL 99]");
    }
}
