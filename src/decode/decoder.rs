//! Decoding a value tree.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use bytes::Bytes;
use crate::captured::Captured;
use crate::length::Length;
use crate::mode::Mode;
use crate::tag::Tag;
use crate::value::Value;
use super::error::{DecodeError, DecodeErrorKind};
use super::source::SliceSource;


//------------ Decoder -------------------------------------------------------

/// The default limit for the nesting of constructed values.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// A BER decoder.
///
/// The decoder turns a sequence of octets into a [`Value`] tree. It can be
/// configured to use the stricter rules of DER for the length octets,
/// to limit how deeply constructed values may be nested, and whether data
/// after the decoded value is acceptable.
///
/// The decoder never copies any content. All content octets of primitive
/// values as well as the captured encodings are slices of the input.
///
/// ```
/// use bercert::{Mode, Tag};
/// use bercert::decode::Decoder;
///
/// let value = Decoder::new(Mode::Der).decode(
///     &b"\x30\x03\x02\x01\x05"[..]
/// ).unwrap();
/// assert_eq!(value.tag(), Tag::SEQUENCE);
/// assert_eq!(value.children().unwrap().len(), 1);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Decoder {
    /// The encoding rules to apply.
    mode: Mode,

    /// The deepest nesting of constructed values allowed.
    max_depth: usize,

    /// Whether all input must be consumed.
    exact: bool,
}

impl Decoder {
    /// Creates a new decoder using the given mode and default settings.
    pub fn new(mode: Mode) -> Self {
        Decoder { mode, max_depth: DEFAULT_MAX_DEPTH, exact: false }
    }

    /// Sets the nesting limit for constructed values.
    pub fn max_depth(self, max_depth: usize) -> Self {
        Decoder { max_depth, ..self }
    }

    /// Sets whether the input must be consumed completely.
    pub fn exact(self, exact: bool) -> Self {
        Decoder { exact, ..self }
    }

    /// Returns the mode of the decoder.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Decodes a single value from the beginning of `data`.
    ///
    /// Whether data may follow the value depends on the decoder’s `exact`
    /// setting.
    pub fn decode(&self, data: impl Into<Bytes>) -> Result<Value, DecodeError> {
        let data = data.into();
        let len = data.len();
        let (value, end) = self.decode_prefix(data)?;
        if self.exact && end != len {
            xerr!(return Err(DecodeError::new(
                DecodeErrorKind::TrailingData, end
            )))
        }
        Ok(value)
    }

    /// Decodes a single value from the beginning of `data`.
    ///
    /// Returns the value and the offset of the first octet following it.
    /// The `exact` setting is ignored.
    pub fn decode_prefix(
        &self, data: impl Into<Bytes>
    ) -> Result<(Value, usize), DecodeError> {
        let mut source = SliceSource::new(data.into());
        match self.take_value(&mut source, 0, false)? {
            Some(value) => Ok((value, source.offset())),
            // Only returned inside indefinite length values.
            None => xerr!(Err(DecodeError::new(
                DecodeErrorKind::UnexpectedEndOfContents, 0
            )))
        }
    }

    /// Takes a single value from the source.
    ///
    /// Returns `Ok(None)` if an end-of-contents marker was found and
    /// `in_indefinite` signals that the value is an element of an
    /// indefinite length value.
    fn take_value(
        &self,
        source: &mut SliceSource,
        depth: usize,
        in_indefinite: bool,
    ) -> Result<Option<Value>, DecodeError> {
        let start = source.offset();
        let (tag, constructed) = Tag::take_from(source)?;
        let length_pos = source.pos();
        let length = Length::take_from(source, self.mode)?;

        if tag == Tag::END_OF_VALUE {
            if constructed {
                xerr!(return Err(DecodeError::new(
                    DecodeErrorKind::MalformedTag, start
                )))
            }
            if !length.is_zero() {
                xerr!(return Err(DecodeError::new(
                    DecodeErrorKind::MalformedLength, length_pos
                )))
            }
            if !in_indefinite {
                xerr!(return Err(DecodeError::new(
                    DecodeErrorKind::UnexpectedEndOfContents, start
                )))
            }
            return Ok(None)
        }

        let value = if constructed {
            if depth >= self.max_depth {
                xerr!(return Err(DecodeError::new(
                    DecodeErrorKind::RecursionLimitExceeded, start
                )))
            }
            let mut children = Vec::new();
            match length {
                Length::Definite(len) => {
                    let mut inner = source.split_to(len)?;
                    while !inner.is_empty() {
                        if let Some(child) = self.take_value(
                            &mut inner, depth + 1, false
                        )? {
                            children.push(child)
                        }
                    }
                }
                Length::Indefinite => {
                    while let Some(child) = self.take_value(
                        source, depth + 1, true
                    )? {
                        children.push(child)
                    }
                }
            }
            Value::constructed(tag, children)
        }
        else {
            match length {
                Length::Definite(len) => {
                    Value::primitive(tag, source.take_bytes(len)?)
                }
                Length::Indefinite => {
                    xerr!(return Err(DecodeError::new(
                        DecodeErrorKind::MalformedLength, length_pos
                    )))
                }
            }
        };
        Ok(Some(value.with_captured(
            Captured::from_bytes(source.bytes_since(start))
        )))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn ber(data: &'static [u8]) -> Result<Value, DecodeErrorKind> {
        Decoder::new(Mode::Ber).decode(data).map_err(|err| err.kind())
    }

    fn der(data: &'static [u8]) -> Result<Value, DecodeErrorKind> {
        Decoder::new(Mode::Der).decode(data).map_err(|err| err.kind())
    }

    #[test]
    fn decode_simple_tree() {
        let value = der(b"\x30\x08\x02\x01\x05\x31\x03\x01\x01\xff").unwrap();
        assert_eq!(
            value,
            Value::sequence(vec![
                Value::integer(5i64),
                Value::set(vec![Value::boolean(true)]),
            ])
        );
        let children = value.children().unwrap();
        assert_eq!(
            children[1].captured().unwrap().as_slice(),
            b"\x31\x03\x01\x01\xff"
        );
        assert_eq!(
            value.captured().unwrap().as_slice(),
            b"\x30\x08\x02\x01\x05\x31\x03\x01\x01\xff"
        );
    }

    #[test]
    fn indefinite_length() {
        let definite = ber(b"\x30\x07\xa0\x03\x02\x01\x02\x05\x00").unwrap();
        let indefinite = ber(
            b"\x30\x80\xa0\x80\x02\x01\x02\x00\x00\x05\x00\x00\x00"
        ).unwrap();
        assert_eq!(definite, indefinite);
        assert_eq!(
            der(b"\x30\x80\x05\x00\x00\x00").unwrap_err(),
            DecodeErrorKind::MalformedLength
        );
        // Primitive values can’t be indefinite.
        assert_eq!(
            ber(b"\x04\x80\x01\x00\x00").unwrap_err(),
            DecodeErrorKind::MalformedLength
        );
        // Missing end-of-contents.
        assert_eq!(
            ber(b"\x30\x80\x05\x00").unwrap_err(),
            DecodeErrorKind::TruncatedInput
        );
    }

    #[test]
    fn end_of_contents() {
        assert_eq!(
            ber(b"\x00\x00").unwrap_err(),
            DecodeErrorKind::UnexpectedEndOfContents
        );
        assert_eq!(
            ber(b"\x30\x02\x00\x00").unwrap_err(),
            DecodeErrorKind::UnexpectedEndOfContents
        );
        assert_eq!(
            ber(b"\x30\x80\x00\x01\x00").unwrap_err(),
            DecodeErrorKind::MalformedLength
        );
    }

    #[test]
    fn truncation() {
        let data = b"\x30\x0a\x30\x08\x02\x01\x05\x04\x03abc";
        assert!(ber(data).is_ok());
        for len in 1..data.len() {
            let err = Decoder::new(Mode::Ber).decode(
                Bytes::copy_from_slice(&data[..len])
            ).unwrap_err();
            assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput, "{}", len);
        }
        // A child that overruns its parent.
        let err = Decoder::new(Mode::Ber).decode(
            &b"\x30\x03\x04\x03abc"[..]
        ).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
        assert_eq!(err.pos().offset(), 4);
    }

    #[test]
    fn recursion_limit() {
        let mut data = Vec::new();
        for _ in 0..10 {
            data.extend_from_slice(b"\x30\x80");
        }
        for _ in 0..10 {
            data.extend_from_slice(b"\x00\x00");
        }
        let data = Bytes::from(data);
        assert!(Decoder::new(Mode::Ber).decode(data.clone()).is_ok());
        assert!(
            Decoder::new(Mode::Ber).max_depth(10).decode(data.clone()).is_ok()
        );
        assert_eq!(
            Decoder::new(Mode::Ber).max_depth(9).decode(data)
                .unwrap_err().kind(),
            DecodeErrorKind::RecursionLimitExceeded
        );
    }

    #[test]
    fn trailing_data() {
        let data = Bytes::from_static(b"\x05\x00\xff");
        let (value, end) = Decoder::new(Mode::Der).decode_prefix(
            data.clone()
        ).unwrap();
        assert_eq!(value, Value::null());
        assert_eq!(end, 2);
        assert!(Decoder::new(Mode::Der).decode(data.clone()).is_ok());
        let err = Decoder::new(Mode::Der).exact(true).decode(data)
            .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TrailingData);
        assert_eq!(err.pos().offset(), 2);
    }

    #[test]
    fn high_tag_numbers() {
        let value = ber(b"\x9f\x81\x00\x01\x07").unwrap();
        assert_eq!(value.tag(), Tag::ctx(0x80));
        assert_eq!(value.to_octets().unwrap().as_ref(), b"\x07");
        assert_eq!(
            ber(b"\x1f\x05\x00").unwrap_err(), DecodeErrorKind::MalformedTag
        );
    }
}
