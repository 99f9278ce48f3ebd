//! BER encoding for various strings types.
//!
//! This module provides the [`BitString`] type for bit strings, i.e., a
//! sequence of bits that does not need to be of a length divisible by
//! eight, and the character sets of the restricted character string types
//! that appear in certificates.
//!
//! ASN.1 defines quite a few restricted character strings of which the
//! crate implements the subset commonly found in distinguished names.
//! Specifically:
//!
//! * [`Ia5CharSet`] contains ASCII characters only (IA5 is an alternative
//!   name for ASCII),
//! * [`NumericCharSet`] contains only decimals digits and spaces,
//! * [`PrintableCharSet`] contains a subset of ASCII characters including
//!   letters, digits, and a few symbols,
//! * [`VisibleCharSet`] contains the printing ASCII characters,
//! * [`Utf8CharSet`] contains a sequence of Unicode code points encoded as
//!   octets through UTF-8,
//! * [`BmpCharSet`] and [`UniversalCharSet`] contain Unicode code points
//!   encoded as two or four octets, and
//! * [`TeletexCharSet`], which is treated as Latin-1.

//--- Re-exports

pub use self::bit::{BitString, BitStringIter};
pub use self::charset::{
    BmpCharSet, CharSet, CharSetError, Ia5CharSet, NumericCharSet,
    PrintableCharSet, TeletexCharSet, UniversalCharSet, Utf8CharSet,
    VisibleCharSet, decode_string, is_printable, is_string_tag,
};

//--- Private modules

mod bit;
mod charset;
