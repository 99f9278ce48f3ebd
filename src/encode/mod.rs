//! Encoding data in DER.
//!
//! This modules provides means to encode a tree of [`Value`]s using the
//! Distinguished Encoding Rules. The result of encoding is always the one
//! valid DER encoding of the value, no matter how the value was created:
//!
//! * all lengths are in definite form and use as few octets as possible,
//! * the elements of SET values are sorted by their encoding while those
//!   of all other constructed values keep their order,
//! * BOOLEAN values are encoded as 0x00 or 0xFF,
//! * INTEGER values use the shortest two’s complement form, and
//! * the unused bits of a BIT STRING are cleared.
//!
//! Values whose content can’t be brought into that form as well as lengths
//! that can’t be expressed in [`MAX_LENGTH_OCTETS`] octets result in an
//! [`EncodeError`].
//!
//! [`Value`]: crate::Value
//! [`MAX_LENGTH_OCTETS`]: crate::MAX_LENGTH_OCTETS

pub use self::der::{
    append_header, append_value, encoded_len, to_vec, total_encoded_len,
};
pub use self::error::EncodeError;

mod der;
mod error;
