//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt};
use crate::tag::Tag;


//------------ EncodeError ---------------------------------------------------

/// A value tree could not be encoded in DER.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodeError {
    /// The length of some content is too large to be encoded.
    OversizedLength(usize),

    /// The elements of a SET ended up in the wrong order.
    InvalidSetOrdering,

    /// The content of a primitive value with the given tag can’t be
    /// brought into canonical form.
    InvalidContent(Tag),

    /// The tag number is too large to be decoded again.
    UnsupportedTag(Tag),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EncodeError::OversizedLength(len) => {
                write!(f, "content length {} too large", len)
            }
            EncodeError::InvalidSetOrdering => {
                f.write_str("invalid ordering of SET elements")
            }
            EncodeError::InvalidContent(tag) => {
                write!(f, "invalid content for {} value", tag)
            }
            EncodeError::UnsupportedTag(tag) => {
                write!(f, "tag number of {} too large", tag)
            }
        }
    }
}

impl error::Error for EncodeError { }
