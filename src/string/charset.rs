//! Character sets of restricted character strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{char, error, fmt, str};
use std::borrow::Cow;
use crate::tag::Tag;


//------------ CharSet -------------------------------------------------------

/// The character set of a restricted character string type.
pub trait CharSet {
    /// The natural tag of the related restricted character string type.
    const TAG: Tag;

    /// Decodes content octets into a string.
    fn decode(slice: &[u8]) -> Result<Cow<str>, CharSetError>;

    /// Encodes a string into content octets.
    fn encode(s: &str) -> Result<Cow<[u8]>, CharSetError>;
}


//------------ Ascii subsets -------------------------------------------------

/// Implements a character set that is a subset of ASCII.
macro_rules! ascii_charset {
    ( $(#[$attr:meta])* $name:ident, $tag:expr, $check:expr ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl $name {
            /// Returns whether all octets are in the character set.
            pub fn check_slice(slice: &[u8]) -> bool {
                slice.iter().copied().all($check)
            }
        }

        impl CharSet for $name {
            const TAG: Tag = $tag;

            fn decode(slice: &[u8]) -> Result<Cow<str>, CharSetError> {
                if !Self::check_slice(slice) {
                    return Err(CharSetError)
                }
                str::from_utf8(slice).map(Cow::Borrowed).map_err(|_| {
                    CharSetError
                })
            }

            fn encode(s: &str) -> Result<Cow<[u8]>, CharSetError> {
                if Self::check_slice(s.as_bytes()) {
                    Ok(Cow::Borrowed(s.as_bytes()))
                }
                else {
                    Err(CharSetError)
                }
            }
        }
    }
}

ascii_charset!(
    /// The character set for the PrintableString ASN.1 type.
    ///
    /// Allows the letters `A` to `Z` and `a` to `z`, the digits `0` to `9`,
    /// the space character, and the symbols `'`, `(`, `)`, `+`, `,`, `-`,
    /// `.`, `/`, `:`, `=`, and `?`.
    PrintableCharSet, Tag::PRINTABLE_STRING,
    |x: u8| {
        x.is_ascii_alphanumeric() || // A-Z a-z 0-9
        x == b' ' || x == b'\'' || x == b'(' || x == b')' ||
        x == b'+' || x == b',' || x == b'-' || x == b'.' ||
        x == b'/' || x == b':' || x == b'=' || x == b'?'
    }
);

ascii_charset!(
    /// The character set for the IA5String ASN.1 type, i.e., ASCII.
    Ia5CharSet, Tag::IA5_STRING, |x: u8| x < 0x80
);

ascii_charset!(
    /// The character set for the NumericString ASN.1 type.
    NumericCharSet, Tag::NUMERIC_STRING,
    |x: u8| x.is_ascii_digit() || x == b' '
);

ascii_charset!(
    /// The character set for the VisibleString ASN.1 type.
    ///
    /// This is printing ASCII characters plus space.
    VisibleCharSet, Tag::VISIBLE_STRING, |x: u8| (0x20..0x7F).contains(&x)
);


//------------ Utf8CharSet ---------------------------------------------------

/// The character set for the UTF8String ASN.1 type.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8CharSet;

impl CharSet for Utf8CharSet {
    const TAG: Tag = Tag::UTF8_STRING;

    fn decode(slice: &[u8]) -> Result<Cow<str>, CharSetError> {
        str::from_utf8(slice).map(Cow::Borrowed).map_err(|_| CharSetError)
    }

    fn encode(s: &str) -> Result<Cow<[u8]>, CharSetError> {
        Ok(Cow::Borrowed(s.as_bytes()))
    }
}


//------------ TeletexCharSet ------------------------------------------------

/// The character set for the TeletexString ASN.1 type.
///
/// Real-world certificates use this type for Latin-1 text, so this is how
/// the content is interpreted.
#[derive(Clone, Copy, Debug, Default)]
pub struct TeletexCharSet;

impl CharSet for TeletexCharSet {
    const TAG: Tag = Tag::TELETEX_STRING;

    fn decode(slice: &[u8]) -> Result<Cow<str>, CharSetError> {
        Ok(Cow::Owned(slice.iter().map(|&ch| char::from(ch)).collect()))
    }

    fn encode(s: &str) -> Result<Cow<[u8]>, CharSetError> {
        s.chars().map(|ch| u8::try_from(ch).map_err(|_| CharSetError))
            .collect::<Result<Vec<_>, _>>().map(Cow::Owned)
    }
}


//------------ BmpCharSet ----------------------------------------------------

/// The character set for the BMPString ASN.1 type.
///
/// This is UCS-2, i.e., each character of the Basic Multilingual Plane is
/// encoded as two octets in big-endian order.
#[derive(Clone, Copy, Debug, Default)]
pub struct BmpCharSet;

impl CharSet for BmpCharSet {
    const TAG: Tag = Tag::BMP_STRING;

    fn decode(slice: &[u8]) -> Result<Cow<str>, CharSetError> {
        if slice.len() % 2 != 0 {
            return Err(CharSetError)
        }
        slice.chunks(2).map(|pair| {
            char::from_u32(u32::from(pair[0]) << 8 | u32::from(pair[1]))
                .ok_or(CharSetError)
        }).collect::<Result<String, _>>().map(Cow::Owned)
    }

    fn encode(s: &str) -> Result<Cow<[u8]>, CharSetError> {
        let mut res = Vec::with_capacity(s.len() * 2);
        for ch in s.chars() {
            let ch = u16::try_from(u32::from(ch)).map_err(|_| CharSetError)?;
            res.extend_from_slice(&ch.to_be_bytes());
        }
        Ok(Cow::Owned(res))
    }
}


//------------ UniversalCharSet ----------------------------------------------

/// The character set for the UniversalString ASN.1 type.
///
/// This is UCS-4, i.e., each character is encoded as four octets in
/// big-endian order.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniversalCharSet;

impl CharSet for UniversalCharSet {
    const TAG: Tag = Tag::UNIVERSAL_STRING;

    fn decode(slice: &[u8]) -> Result<Cow<str>, CharSetError> {
        if slice.len() % 4 != 0 {
            return Err(CharSetError)
        }
        slice.chunks(4).map(|quad| {
            char::from_u32(u32::from_be_bytes(
                [quad[0], quad[1], quad[2], quad[3]]
            )).ok_or(CharSetError)
        }).collect::<Result<String, _>>().map(Cow::Owned)
    }

    fn encode(s: &str) -> Result<Cow<[u8]>, CharSetError> {
        Ok(Cow::Owned(
            s.chars().flat_map(|ch| u32::from(ch).to_be_bytes()).collect()
        ))
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns whether a string can be encoded as a PrintableString.
pub fn is_printable(s: &str) -> bool {
    PrintableCharSet::check_slice(s.as_bytes())
}

/// Returns whether `tag` is the tag of a known character string type.
pub fn is_string_tag(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::UTF8_STRING | Tag::PRINTABLE_STRING | Tag::IA5_STRING
        | Tag::NUMERIC_STRING | Tag::VISIBLE_STRING | Tag::TELETEX_STRING
        | Tag::BMP_STRING | Tag::UNIVERSAL_STRING
    )
}

/// Decodes the content of a character string value with the given tag.
///
/// Returns `None` if `tag` isn’t the tag of a known string type.
pub fn decode_string(
    tag: Tag, content: &[u8]
) -> Option<Result<Cow<str>, CharSetError>> {
    Some(match tag {
        Tag::UTF8_STRING => Utf8CharSet::decode(content),
        Tag::PRINTABLE_STRING => PrintableCharSet::decode(content),
        Tag::IA5_STRING => Ia5CharSet::decode(content),
        Tag::NUMERIC_STRING => NumericCharSet::decode(content),
        Tag::VISIBLE_STRING => VisibleCharSet::decode(content),
        Tag::TELETEX_STRING => TeletexCharSet::decode(content),
        Tag::BMP_STRING => BmpCharSet::decode(content),
        Tag::UNIVERSAL_STRING => UniversalCharSet::decode(content),
        _ => return None
    })
}


//------------ CharSetError --------------------------------------------------

/// The content of a string value contained invalid characters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CharSetError;

impl fmt::Display for CharSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid characters")
    }
}

impl error::Error for CharSetError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn printable() {
        assert!(is_printable("Alice Example (Test) 1.0"));
        assert!(!is_printable("alice@example.com"));
        assert!(!is_printable("Zoë"));
        assert!(PrintableCharSet::decode(b"a*b").is_err());
    }

    #[test]
    fn decode_known_strings() {
        assert_eq!(
            decode_string(Tag::BMP_STRING, b"\x00A\x00\xe9").unwrap().unwrap(),
            "Aé"
        );
        assert_eq!(
            decode_string(Tag::TELETEX_STRING, b"\xe9t\xe9")
                .unwrap().unwrap(),
            "été"
        );
        assert_eq!(
            decode_string(Tag::UNIVERSAL_STRING, b"\x00\x01\xF6\x00")
                .unwrap().unwrap(),
            "\u{1F600}"
        );
        assert!(decode_string(Tag::UTF8_STRING, b"\xff").unwrap().is_err());
        assert!(decode_string(Tag::IA5_STRING, b"\x80").unwrap().is_err());
        assert!(decode_string(Tag::INTEGER, b"\x01").is_none());
    }

    #[test]
    fn encode_strings() {
        assert_eq!(BmpCharSet::encode("Aé").unwrap().as_ref(), b"\x00A\x00\xe9");
        assert!(BmpCharSet::encode("\u{1F600}").is_err());
        assert!(Ia5CharSet::encode("alice@example.com").is_ok());
        assert!(TeletexCharSet::encode("日本").is_err());
    }
}
