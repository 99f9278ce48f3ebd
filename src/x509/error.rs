//! Errors of the certificate layer.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::value::SchemaError;


//------------ CertificateError ----------------------------------------------

/// A certificate could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CertificateError {
    /// The data was not correctly encoded BER.
    Decode(DecodeError),

    /// The data did not have the outer structure of a certificate.
    Schema(SchemaError),
}

impl From<DecodeError> for CertificateError {
    fn from(err: DecodeError) -> Self {
        CertificateError::Decode(err)
    }
}

impl From<SchemaError> for CertificateError {
    fn from(err: SchemaError) -> Self {
        CertificateError::Schema(err)
    }
}

impl fmt::Display for CertificateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CertificateError::Decode(ref err) => err.fmt(f),
            CertificateError::Schema(ref err) => err.fmt(f),
        }
    }
}

impl error::Error for CertificateError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            CertificateError::Decode(ref err) => Some(err),
            CertificateError::Schema(ref err) => Some(err),
        }
    }
}


//------------ RequestError --------------------------------------------------

/// An operation on a certificate request failed.
#[derive(Debug)]
pub enum RequestError {
    /// The request has been signed already and can’t be changed anymore.
    ImmutableStructure,

    /// The request does not have a public key.
    MissingPublicKey,

    /// The signer failed to produce a signature.
    ///
    /// The signer’s error is kept unchanged and can be recovered by
    /// downcasting.
    SigningFailed(Box<dyn error::Error + Send + Sync>),

    /// The request could not be encoded.
    Encode(EncodeError),

    /// A value had an unexpected structure or content.
    Schema(SchemaError),
}

impl From<EncodeError> for RequestError {
    fn from(err: EncodeError) -> Self {
        RequestError::Encode(err)
    }
}

impl From<SchemaError> for RequestError {
    fn from(err: SchemaError) -> Self {
        RequestError::Schema(err)
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RequestError::ImmutableStructure => {
                f.write_str("certificate request has already been signed")
            }
            RequestError::MissingPublicKey => {
                f.write_str("certificate request has no public key")
            }
            RequestError::SigningFailed(ref err) => {
                write!(f, "signing failed: {}", err)
            }
            RequestError::Encode(ref err) => err.fmt(f),
            RequestError::Schema(ref err) => err.fmt(f),
        }
    }
}

impl error::Error for RequestError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            RequestError::SigningFailed(ref err) => Some(err.as_ref()),
            RequestError::Encode(ref err) => Some(err),
            RequestError::Schema(ref err) => Some(err),
            _ => None
        }
    }
}


//------------ VerificationError ---------------------------------------------

/// The signature of a certificate could not be verified.
#[derive(Debug)]
pub enum VerificationError {
    /// The certificate lacks something needed for verification.
    Schema(SchemaError),

    /// The signature does not match.
    BadSignature,

    /// The verifier failed.
    ///
    /// The verifier’s error is kept unchanged.
    VerificationFailed(Box<dyn error::Error + Send + Sync>),
}

impl From<SchemaError> for VerificationError {
    fn from(err: SchemaError) -> Self {
        VerificationError::Schema(err)
    }
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            VerificationError::Schema(ref err) => err.fmt(f),
            VerificationError::BadSignature => {
                f.write_str("invalid signature")
            }
            VerificationError::VerificationFailed(ref err) => {
                write!(f, "verification failed: {}", err)
            }
        }
    }
}

impl error::Error for VerificationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            VerificationError::Schema(ref err) => Some(err),
            VerificationError::BadSignature => None,
            VerificationError::VerificationFailed(ref err) => {
                Some(err.as_ref())
            }
        }
    }
}
