//! The source of octets for decoding.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use bytes::Bytes;
use super::error::{DecodeError, DecodeErrorKind, Pos};


//------------ SliceSource ---------------------------------------------------

/// A source of octets backed by a shared bytes value.
///
/// The source keeps track of its position within the original input so
/// that errors can report where they happened. It can be limited to a
/// window of the input which is how the content of definite length
/// constructed values is processed.
///
/// Everything taken out of the source is a cheap slice of the underlying
/// bytes value, no data is ever copied.
#[derive(Clone, Debug)]
pub struct SliceSource {
    /// The complete input.
    data: Bytes,

    /// The index of the next octet to read.
    pos: usize,

    /// The index just after the last octet available to this source.
    end: usize,
}

impl SliceSource {
    /// Creates a new source covering all of `data`.
    pub fn new(data: Bytes) -> Self {
        let end = data.len();
        SliceSource { data, pos: 0, end }
    }

    /// Returns the current position.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Returns the current position as an index into the input.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Returns the number of octets left in the source.
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Returns whether the source has been exhausted.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.end
    }

    /// Returns a slice of the remaining octets.
    pub fn slice(&self) -> &[u8] {
        &self.data[self.pos..self.end]
    }

    /// Returns the n-th octet from the current position without consuming
    /// anything.
    ///
    /// If there aren’t that many octets left, returns a truncation error.
    pub fn peek_nth(&self, n: usize) -> Result<u8, DecodeError> {
        match self.slice().get(n) {
            Some(value) => Ok(*value),
            None => xerr!(Err(self.err(DecodeErrorKind::TruncatedInput))),
        }
    }

    /// Takes a single octet from the source.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        let res = self.peek_nth(0)?;
        self.pos += 1;
        Ok(res)
    }

    /// Takes `len` octets from the source.
    pub fn take_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if len > self.remaining() {
            xerr!(return Err(self.err(DecodeErrorKind::TruncatedInput)))
        }
        let res = self.data.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(res)
    }

    /// Splits off a source covering the next `len` octets.
    ///
    /// The returned source starts at the current position. This source
    /// advances past the octets given to the new source.
    pub fn split_to(&mut self, len: usize) -> Result<SliceSource, DecodeError> {
        if len > self.remaining() {
            xerr!(return Err(self.err(DecodeErrorKind::TruncatedInput)))
        }
        let res = SliceSource {
            data: self.data.clone(),
            pos: self.pos,
            end: self.pos + len,
        };
        self.pos += len;
        Ok(res)
    }

    /// Returns the octets between `start` and the current position.
    pub fn bytes_since(&self, start: usize) -> Bytes {
        self.data.slice(start..self.pos)
    }

    /// Returns an error of the given kind at the current position.
    pub fn err(&self, kind: DecodeErrorKind) -> DecodeError {
        DecodeError::new(kind, self.pos)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn take_and_split() {
        let mut src = SliceSource::new(Bytes::from_static(b"\x01\x02\x03\x04"));
        assert_eq!(src.take_u8().unwrap(), 1);
        let mut inner = src.split_to(2).unwrap();
        assert_eq!(src.pos().offset(), 3);
        assert_eq!(inner.take_u8().unwrap(), 2);
        assert_eq!(inner.take_u8().unwrap(), 3);
        assert_eq!(
            inner.take_u8().unwrap_err().kind(),
            DecodeErrorKind::TruncatedInput
        );
        assert_eq!(src.take_bytes(1).unwrap().as_ref(), b"\x04");
        assert!(src.is_empty());
    }

    #[test]
    fn truncation_reports_position() {
        let mut src = SliceSource::new(Bytes::from_static(b"\x01\x02"));
        src.take_u8().unwrap();
        let err = src.take_bytes(5).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedInput);
        assert_eq!(err.pos().offset(), 1);
    }
}
