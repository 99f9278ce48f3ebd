//! X.509 certificates.
//!
//! This module interprets a decoded [`Value`] tree as an X.509 certificate
//! as defined in [RFC 5280]. A [`CertificateInfo`] provides read access to
//! the fields of a parsed certificate while a [`CertificateRequest`] allows
//! assembling a new certificate and self-signing it or turning it into a
//! PKCS #10 certification request.
//!
//! Distinguished names are accessed via [`Name`] and modified via
//! [`NameMut`]. Certificate extensions are handled through [`Extensions`]
//! and [`ExtensionsMut`] which have specific support for the key usage,
//! extended key usage, basic constraints, and subject key identifier
//! extensions. All other extensions are available as raw octets.
//!
//! The object identifiers used by all of this are collected in [`oid`].
//!
//! [`Value`]: crate::Value
//! [RFC 5280]: https://tools.ietf.org/html/rfc5280

pub use self::cert::CertificateInfo;
pub use self::crypto::{AlgorithmIdentifier, PublicKeyInfo, Signer, Verifier};
pub use self::error::{CertificateError, RequestError, VerificationError};
pub use self::ext::{
    BasicConstraints, ExtendedKeyUsage, Extension, Extensions, ExtensionsMut,
    KeyUsage, NATIVE_EXTENSIONS,
};
pub use self::name::{Name, NameMut};
pub use self::request::{CertificateRequest, RequestState};

pub mod oid;

mod cert;
mod crypto;
mod error;
mod ext;
mod name;
mod request;
mod tbs;
