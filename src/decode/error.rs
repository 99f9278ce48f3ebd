//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error consists of the kind of problem encountered and the position
/// in the input where it was detected. Decoding errors are always fatal for
/// the decoding call that produced them. No partially decoded value is
/// ever returned.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeError {
    /// What went wrong.
    kind: DecodeErrorKind,

    /// Where it went wrong.
    pos: Pos,
}

impl DecodeError {
    /// Creates a new error of the given kind at the given position.
    pub fn new(kind: DecodeErrorKind, pos: impl Into<Pos>) -> Self {
        DecodeError { kind, pos: pos.into() }
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> DecodeErrorKind {
        self.kind
    }

    /// Returns the position in the input where the error was detected.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (at position {})", self.kind, self.pos)
    }
}

impl error::Error for DecodeError { }


//------------ DecodeErrorKind -----------------------------------------------

/// The kind of problem encountered while decoding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DecodeErrorKind {
    /// The input ended before a value was complete.
    ///
    /// This includes a declared length that exceeds the available octets.
    TruncatedInput,

    /// The identifier octets are not a valid encoding of a tag.
    MalformedTag,

    /// The length octets are not valid for the decoding mode or for the
    /// value they belong to.
    MalformedLength,

    /// Values were nested deeper than the decoder allows.
    RecursionLimitExceeded,

    /// An end-of-contents marker appeared outside of an indefinite length
    /// constructed value.
    UnexpectedEndOfContents,

    /// There was data left after the value and the decoder was asked to
    /// consume its input completely.
    TrailingData,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            DecodeErrorKind::TruncatedInput => "unexpected end of data",
            DecodeErrorKind::MalformedTag => "malformed identifier octets",
            DecodeErrorKind::MalformedLength => "malformed length octets",
            DecodeErrorKind::RecursionLimitExceeded => {
                "values nested too deeply"
            }
            DecodeErrorKind::UnexpectedEndOfContents => {
                "unexpected end-of-contents marker"
            }
            DecodeErrorKind::TrailingData => "trailing data",
        })
    }
}


//------------ Pos -----------------------------------------------------------

/// The position of an error in the input.
///
/// This is the number of octets from the start of the input passed to the
/// decoder.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the position as an octet offset.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl From<Pos> for usize {
    fn from(pos: Pos) -> usize {
        pos.0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
