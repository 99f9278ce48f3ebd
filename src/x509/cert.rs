//! Parsed certificates.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use log::debug;
use crate::captured::Captured;
use crate::decode::Decoder;
use crate::int::Integer;
use crate::mode::Mode;
use crate::oid::Oid;
use crate::tag::Tag;
use crate::time::Time;
use crate::value::{SchemaError, Value};
use super::crypto::{AlgorithmIdentifier, PublicKeyInfo, Verifier};
use super::error::{CertificateError, VerificationError};
use super::ext::{Extensions, KeyUsage};
use super::name::Name;
use super::tbs;


//------------ CertificateInfo -----------------------------------------------

/// A parsed certificate.
///
/// ```text
/// Certificate  ::=  SEQUENCE  {
///      tbsCertificate       TBSCertificate,
///      signatureAlgorithm   AlgorithmIdentifier,
///      signatureValue       BIT STRING  }
/// ```
///
/// Parsing only checks the outer structure of the certificate. Access to
/// the individual fields happens through methods that interpret the
/// decoded value tree on demand. If a field doesn’t have the expected
/// structure, only the method accessing it fails.
///
/// Two certificates are equal if their encoded data is identical.
#[derive(Clone, Debug)]
pub struct CertificateInfo {
    /// The encoded certificate.
    data: Bytes,

    /// The decoded certificate.
    value: Value,

    /// The encoded TBSCertificate as it appeared in the data.
    signed: Captured,
}

/// # Parsing
///
impl CertificateInfo {
    /// Parses a BER encoded certificate.
    ///
    /// Data following the certificate is ignored.
    pub fn parse(data: impl Into<Bytes>) -> Result<Self, CertificateError> {
        Self::parse_with(Decoder::new(Mode::Ber), data)
    }

    /// Parses a certificate using the given decoder.
    pub fn parse_with(
        decoder: Decoder, data: impl Into<Bytes>
    ) -> Result<Self, CertificateError> {
        let res = match decoder.decode(data) {
            Ok(value) => Self::from_value(value).map_err(Into::into),
            Err(err) => Err(CertificateError::Decode(err)),
        };
        if let Err(ref err) = res {
            debug!("Failed to parse certificate: {}", err);
        }
        res
    }

    /// Creates a certificate from a decoded value.
    ///
    /// The value must have been decoded and not been modified since.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let items = value.expect_tag(Tag::SEQUENCE)?.children()?;
        if items.len() != 3 {
            xerr!(return Err(SchemaError::InvalidValue(Tag::SEQUENCE)))
        }
        items[0].expect_tag(Tag::SEQUENCE)?.children()?;
        items[1].expect_tag(Tag::SEQUENCE)?;
        items[2].expect_tag(Tag::BIT_STRING)?;
        let signed = match items[0].captured() {
            Some(signed) => signed.clone(),
            None => xerr!(return Err(
                SchemaError::MissingRequiredField("tbsCertificate")
            ))
        };
        let data = match value.captured() {
            Some(data) => data.as_bytes().clone(),
            None => xerr!(return Err(
                SchemaError::MissingRequiredField("certificate")
            ))
        };
        Ok(CertificateInfo { data, value, signed })
    }
}

/// # Access to Certificate Data
///
impl CertificateInfo {
    /// Returns the encoded certificate.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the decoded value of the certificate.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Returns the version of the certificate.
    ///
    /// This is the actual number, e.g., 3 for a v3 certificate.
    pub fn version(&self) -> Result<u8, SchemaError> {
        tbs::version(self.tbs()?)
    }

    /// Returns the serial number.
    pub fn serial_number(&self) -> Result<Integer, SchemaError> {
        self.field(tbs::SERIAL_NUMBER)?.to_integer()
    }

    /// Returns the start of the validity period.
    pub fn valid_from(&self) -> Result<Time, SchemaError> {
        self.validity()?.child(0, "notBefore")?.to_time()
    }

    /// Returns the end of the validity period.
    pub fn valid_to(&self) -> Result<Time, SchemaError> {
        self.validity()?.child(1, "notAfter")?.to_time()
    }

    /// Returns whether the certificate is valid at the given time.
    ///
    /// Both ends of the validity period are included.
    pub fn is_valid_at(&self, time: Time) -> Result<bool, SchemaError> {
        Ok(self.valid_from()? <= time && time <= self.valid_to()?)
    }

    /// Returns the subject name.
    pub fn subject(&self) -> Result<Name, SchemaError> {
        Name::from_value(self.field(tbs::SUBJECT)?)
    }

    /// Returns the issuer name.
    pub fn issuer(&self) -> Result<Name, SchemaError> {
        Name::from_value(self.field(tbs::ISSUER)?)
    }

    /// Returns whether the certificate is self-issued.
    ///
    /// This is the case if the issuer and subject names are equal.
    pub fn is_root(&self) -> bool {
        match (self.subject(), self.issuer()) {
            (Ok(subject), Ok(issuer)) => subject == issuer,
            _ => false
        }
    }

    /// Returns the extensions.
    ///
    /// Returns `Ok(None)` if the certificate has no extensions, as is the
    /// case for certificates before version 3.
    pub fn extensions(&self) -> Result<Option<Extensions>, SchemaError> {
        match tbs::extensions(self.tbs()?)? {
            Some(value) => Extensions::from_value(value).map(Some),
            None => Ok(None)
        }
    }

    /// Returns whether the key may be used for all of the requested usages.
    ///
    /// See [`Extensions::allows_key_usage`] for the rules applied. A
    /// certificate without extensions allows all usages.
    pub fn allows_key_usage(&self, requested: KeyUsage) -> bool {
        match self.extensions() {
            Ok(Some(exts)) => exts.allows_key_usage(requested),
            Ok(None) => true,
            Err(_) => false,
        }
    }

    /// Returns whether the key may be used for all requested purposes.
    pub fn allows_extended_key_usage<T: AsRef<[u8]>>(
        &self, requested: &[Oid<T>]
    ) -> bool {
        match self.extensions() {
            Ok(Some(exts)) => exts.allows_extended_key_usage(requested),
            Ok(None) => true,
            Err(_) => false,
        }
    }

    /// Returns the subject’s public key.
    pub fn subject_public_key(&self) -> Result<PublicKeyInfo, SchemaError> {
        PublicKeyInfo::from_value(self.field(tbs::SUBJECT_PUBLIC_KEY_INFO)?)
    }

    /// Returns the bits of the subject’s public key.
    pub fn subject_public_key_bytes(&self) -> Result<Bytes, SchemaError> {
        self.subject_public_key().map(|key| key.key().octet_bytes())
    }

    /// Returns the algorithm of the subject’s public key.
    pub fn subject_public_key_algorithm(
        &self
    ) -> Result<AlgorithmIdentifier, SchemaError> {
        self.subject_public_key().map(|key| key.algorithm().clone())
    }

    /// Returns the signed data.
    ///
    /// These are the octets of the TBSCertificate exactly as they appear in
    /// the certificate data.
    pub fn signed_bytes(&self) -> &Captured {
        &self.signed
    }

    /// Returns the algorithm used for the signature.
    pub fn signature_algorithm(
        &self
    ) -> Result<AlgorithmIdentifier, SchemaError> {
        AlgorithmIdentifier::from_value(
            self.value.child(1, "signatureAlgorithm")?
        )
    }

    /// Returns the signature.
    pub fn signature_bytes(&self) -> Result<Bytes, SchemaError> {
        self.value.child(2, "signatureValue")?.to_bit_string().map(|bits| {
            bits.octet_bytes()
        })
    }

    fn tbs(&self) -> Result<&Value, SchemaError> {
        self.value.child(0, "tbsCertificate")
    }

    fn field(&self, idx: usize) -> Result<&Value, SchemaError> {
        tbs::field(self.tbs()?, idx)
    }

    fn validity(&self) -> Result<&Value, SchemaError> {
        self.field(tbs::VALIDITY)?.expect_tag(Tag::SEQUENCE)
    }
}

/// # Verification
///
impl CertificateInfo {
    /// Verifies the signature of the certificate.
    ///
    /// The signature is checked against `issuer_key`. If no issuer key is
    /// given, the certificate must be self-issued and its own key is used.
    pub fn verify_signature<V: Verifier>(
        &self,
        verifier: &V,
        issuer_key: Option<&PublicKeyInfo>,
    ) -> Result<(), VerificationError> {
        let own_key;
        let key = match issuer_key {
            Some(key) => key,
            None => {
                if !self.is_root() {
                    xerr!(return Err(VerificationError::Schema(
                        SchemaError::MissingRequiredField("issuerKey")
                    )))
                }
                own_key = self.subject_public_key()?;
                &own_key
            }
        };
        let algorithm = self.signature_algorithm()?;
        let signature = self.signature_bytes()?;
        match verifier.verify(
            &algorithm, self.signed.as_slice(), signature.as_ref(), key
        ) {
            Ok(true) => Ok(()),
            Ok(false) => {
                debug!(
                    "Rejected signature of certificate with algorithm {}",
                    algorithm.oid()
                );
                Err(VerificationError::BadSignature)
            }
            Err(err) => Err(VerificationError::VerificationFailed(
                Box::new(err)
            ))
        }
    }
}


//--- PartialEq and Eq

impl PartialEq for CertificateInfo {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for CertificateInfo { }


//============ Tests =========================================================
