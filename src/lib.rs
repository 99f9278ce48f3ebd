//! Handling of certificates in Basic and Distinguished Encoding Rules.
//!
//! This crate decodes BER or DER encoded data into a generic tree of
//! [`Value`]s and encodes such trees back into DER. The [`x509`] module
//! builds on this to interpret the tree as an X.509 certificate and to
//! create and self-sign new certificates.
//!
//! The BER and DER basics are available through the [`decode`] and
//! [`encode`] modules and the types re-exported at the top level. Object
//! identifiers live in [`oid`] and the types for strings in [`string`].
//!
//! Cryptographic operations are not part of this crate. Signing and
//! verifying signatures is left to implementations of the
//! [`x509::Signer`] and [`x509::Verifier`] traits.

pub use self::captured::Captured;
pub use self::int::Integer;
pub use self::length::{Length, MAX_LENGTH_OCTETS};
pub use self::mode::Mode;
pub use self::oid::{ConstOid, Oid};
pub use self::string::BitString;
pub use self::tag::{Class, Tag};
pub use self::time::Time;
pub use self::value::{Content, Kind, SchemaError, Value};

#[macro_use] pub mod debug;

pub mod decode;
pub mod encode;
pub mod oid;
pub mod string;
pub mod x509;

mod captured;
mod int;
mod length;
mod mode;
mod tag;
mod time;
mod value;
