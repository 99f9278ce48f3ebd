//! Building and self-signing certificates.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use log::debug;
use crate::encode::{self, EncodeError};
use crate::int::Integer;
use crate::string::BitString;
use crate::tag::Tag;
use crate::time::Time;
use crate::value::{SchemaError, Value};
use super::crypto::{AlgorithmIdentifier, PublicKeyInfo, Signer};
use super::error::RequestError;
use super::ext::{Extensions, ExtensionsMut};
use super::name::{Name, NameMut};
use super::{oid, tbs};


//------------ RequestState --------------------------------------------------

/// The state of a certificate request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RequestState {
    /// Nothing but possibly the public key has been set.
    Blank,

    /// Some fields have been set.
    Populated,

    /// The certificate has been signed. The request can’t be changed
    /// anymore.
    Signed,
}


//------------ CertificateRequest --------------------------------------------

/// A certificate under construction.
///
/// A request starts out blank, holding at most the public key for the
/// certificate. The subject name, validity period, serial number, and
/// extensions are then set as needed. Finally, the certificate is signed
/// via [`self_sign`][Self::self_sign] with the private key belonging to
/// its own public key. After that, the request is frozen and any attempt
/// to change it fails with [`RequestError::ImmutableStructure`].
///
/// The request can also be turned into a signed PKCS #10 certification
/// request via [`request_data`][Self::request_data] for having the
/// certificate issued by someone else.
#[derive(Clone, Debug)]
pub struct CertificateRequest {
    /// The TBSCertificate under construction.
    tbs: Value,

    /// The public key of the certificate.
    public_key: Option<PublicKeyInfo>,

    /// The serial number if set explicitly.
    serial_number: Option<Integer>,

    /// The start of the validity period if set explicitly.
    valid_from: Option<Time>,

    /// The end of the validity period if set explicitly.
    valid_to: Option<Time>,

    /// The state of the request.
    state: RequestState,

    /// The encoded certificate once signed.
    certificate: Option<Bytes>,
}

/// # Creation
///
impl CertificateRequest {
    /// Creates a new, blank request without a public key.
    pub fn new() -> Self {
        CertificateRequest {
            tbs: Value::sequence(vec![
                // version: v3
                Value::explicit(0, Value::integer(2i64)),
                // serialNumber
                Value::integer(0i64),
                // signature
                Value::sequence(Vec::new()),
                // issuer
                Value::sequence(Vec::new()),
                // validity
                Value::sequence(Vec::new()),
                // subject
                Value::sequence(Vec::new()),
                // subjectPublicKeyInfo
                Value::sequence(Vec::new()),
            ]),
            public_key: None,
            serial_number: None,
            valid_from: None,
            valid_to: None,
            state: RequestState::Blank,
            certificate: None,
        }
    }

    /// Creates a new, blank request for the given public key.
    pub fn with_public_key(key: PublicKeyInfo) -> Self {
        let mut res = Self::new();
        res.tbs = res.tbs_with_public_key(&key);
        res.public_key = Some(key);
        res
    }

    fn tbs_with_public_key(&self, key: &PublicKeyInfo) -> Value {
        let mut tbs = self.tbs.clone();
        if let Ok(field) = tbs::field_mut(
            &mut tbs, tbs::SUBJECT_PUBLIC_KEY_INFO
        ) {
            *field = key.to_value()
        }
        tbs
    }
}

/// # Access to the Fields
///
impl CertificateRequest {
    /// Returns the state of the request.
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Returns the public key if it has been set.
    pub fn public_key(&self) -> Option<&PublicKeyInfo> {
        self.public_key.as_ref()
    }

    /// Sets the public key.
    pub fn set_public_key(
        &mut self, key: PublicKeyInfo
    ) -> Result<(), RequestError> {
        self.check_unsigned()?;
        *tbs::field_mut(&mut self.tbs, tbs::SUBJECT_PUBLIC_KEY_INFO)?
            = key.to_value();
        self.public_key = Some(key);
        Ok(())
    }

    /// Returns the subject name.
    pub fn subject(&self) -> Result<Name, SchemaError> {
        Name::from_value(tbs::field(&self.tbs, tbs::SUBJECT)?)
    }

    /// Returns the subject name for modification.
    pub fn subject_mut(&mut self) -> Result<NameMut, RequestError> {
        self.populate()?;
        Ok(NameMut::new(tbs::field_mut(&mut self.tbs, tbs::SUBJECT)?))
    }

    /// Returns the issuer name.
    ///
    /// This will be empty until the request is signed.
    pub fn issuer(&self) -> Result<Name, SchemaError> {
        Name::from_value(tbs::field(&self.tbs, tbs::ISSUER)?)
    }

    /// Returns the start of the validity period if known.
    pub fn valid_from(&self) -> Option<Time> {
        self.valid_from
    }

    /// Sets the start of the validity period.
    ///
    /// Fails if the time can’t be encoded.
    pub fn set_valid_from(&mut self, time: Time) -> Result<(), RequestError> {
        self.populate()?;
        self.valid_from = Some(check_time(time)?);
        Ok(())
    }

    /// Returns the end of the validity period if known.
    pub fn valid_to(&self) -> Option<Time> {
        self.valid_to
    }

    /// Sets the end of the validity period.
    ///
    /// Fails if the time can’t be encoded.
    pub fn set_valid_to(&mut self, time: Time) -> Result<(), RequestError> {
        self.populate()?;
        self.valid_to = Some(check_time(time)?);
        Ok(())
    }

    /// Returns the serial number if known.
    pub fn serial_number(&self) -> Option<&Integer> {
        self.serial_number.as_ref()
    }

    /// Sets the serial number.
    ///
    /// If no serial number is set, one will be derived from the time of
    /// signing.
    pub fn set_serial_number(
        &mut self, serial: Integer
    ) -> Result<(), RequestError> {
        self.populate()?;
        self.serial_number = Some(serial);
        Ok(())
    }

    /// Returns the extensions if there are any.
    pub fn extensions(&self) -> Result<Option<Extensions>, SchemaError> {
        match tbs::extensions(&self.tbs)? {
            Some(value) => Extensions::from_value(value).map(Some),
            None => Ok(None)
        }
    }

    /// Returns the extensions for modification.
    pub fn extensions_mut(&mut self) -> Result<ExtensionsMut, RequestError> {
        self.populate()?;
        Ok(ExtensionsMut::new(tbs::extensions_mut(&mut self.tbs)?))
    }

    /// Returns the encoded certificate if the request has been signed.
    pub fn certificate_data(&self) -> Option<&Bytes> {
        self.certificate.as_ref()
    }

    fn check_unsigned(&self) -> Result<(), RequestError> {
        if self.state == RequestState::Signed {
            xerr!(return Err(RequestError::ImmutableStructure))
        }
        Ok(())
    }

    fn populate(&mut self) -> Result<(), RequestError> {
        self.check_unsigned()?;
        self.state = RequestState::Populated;
        Ok(())
    }
}

/// # Signing
///
impl CertificateRequest {
    /// Signs the certificate with its own key.
    ///
    /// This is the same as [`self_sign_at`][Self::self_sign_at] using the
    /// current time.
    pub fn self_sign<S: Signer>(
        &mut self,
        signer: &S,
        key: &S::KeyId,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<Bytes, RequestError> {
        self.self_sign_at(Time::now(), signer, key, algorithm)
    }

    /// Signs the certificate with its own key at the given time.
    ///
    /// The issuer name is set to the subject name. If the validity period
    /// has not been set, it starts at `now` and ends one year after its
    /// start. If no serial number has been set, it is derived from `now`.
    /// `key` must refer to the private key for the request’s public key.
    ///
    /// Upon success, the request moves into the signed state and the
    /// encoded certificate is returned. If signing fails, the request is
    /// left unchanged.
    pub fn self_sign_at<S: Signer>(
        &mut self,
        now: Time,
        signer: &S,
        key: &S::KeyId,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<Bytes, RequestError> {
        self.check_unsigned()?;
        if self.public_key.is_none() {
            xerr!(return Err(RequestError::MissingPublicKey))
        }
        let valid_from = check_time(self.valid_from.unwrap_or(now))?;
        let valid_to = match self.valid_to {
            Some(valid_to) => valid_to,
            None => match valid_from.years_later(1) {
                Some(valid_to) => check_time(valid_to)?,
                None => xerr!(return Err(
                    SchemaError::InvalidValue(Tag::GENERALIZED_TIME).into()
                ))
            }
        };
        let serial_number = match self.serial_number {
            Some(ref serial) => serial.clone(),
            None => serial_from_time(now),
        };

        let mut tbs = self.tbs.clone();
        *tbs::field_mut(&mut tbs, tbs::SERIAL_NUMBER)?
            = Value::integer(serial_number.clone());
        *tbs::field_mut(&mut tbs, tbs::SIGNATURE)? = algorithm.to_value();
        let subject = tbs::field(&tbs, tbs::SUBJECT)?.clone();
        *tbs::field_mut(&mut tbs, tbs::ISSUER)? = subject;
        *tbs::field_mut(&mut tbs, tbs::VALIDITY)? = Value::sequence(vec![
            Value::time(valid_from), Value::time(valid_to)
        ]);
        tbs::remove_empty_extensions(&mut tbs)?;

        let tbs_der = tbs.to_der()?;
        let signature = signer.sign(key, algorithm, &tbs_der).map_err(|err| {
            RequestError::SigningFailed(Box::new(err))
        })?;
        let data = signed_structure(&tbs_der, algorithm, signature)?;

        debug!(
            "Self-signed certificate with serial {:02x?} valid from {} to {}.",
            serial_number.as_slice(), valid_from, valid_to
        );
        self.tbs = tbs;
        self.serial_number = Some(serial_number);
        self.valid_from = Some(valid_from);
        self.valid_to = Some(valid_to);
        self.state = RequestState::Signed;
        self.certificate = Some(data.clone());
        Ok(data)
    }

    /// Returns a signed PKCS #10 certification request.
    ///
    /// ```text
    /// CertificationRequest ::= SEQUENCE {
    ///      certificationRequestInfo CertificationRequestInfo,
    ///      signatureAlgorithm AlgorithmIdentifier,
    ///      signature          BIT STRING }
    ///
    /// CertificationRequestInfo ::= SEQUENCE {
    ///      version       INTEGER { v1(0) },
    ///      subject       Name,
    ///      subjectPKInfo SubjectPublicKeyInfo,
    ///      attributes    [0] Attributes }
    /// ```
    ///
    /// If the request has extensions, they are included in an
    /// extension request attribute. The state of the request is not
    /// changed.
    pub fn request_data<S: Signer>(
        &self,
        signer: &S,
        key: &S::KeyId,
        algorithm: &AlgorithmIdentifier,
    ) -> Result<Bytes, RequestError> {
        let public_key = match self.public_key {
            Some(ref key) => key,
            None => xerr!(return Err(RequestError::MissingPublicKey))
        };
        let mut attributes = Vec::new();
        if let Some(exts) = tbs::extensions(&self.tbs)? {
            if !exts.children()?.is_empty() {
                attributes.push(Value::sequence(vec![
                    Value::oid(&oid::EXTENSION_REQUEST),
                    Value::set(vec![exts.clone()]),
                ]))
            }
        }
        let info = Value::sequence(vec![
            Value::integer(0i64),
            tbs::field(&self.tbs, tbs::SUBJECT)?.clone(),
            public_key.to_value(),
            Value::constructed(Tag::CTX_0, attributes),
        ]).to_der()?;
        let signature = signer.sign(key, algorithm, &info).map_err(|err| {
            RequestError::SigningFailed(Box::new(err))
        })?;
        Ok(signed_structure(&info, algorithm, signature)?)
    }
}


//--- Default

impl Default for CertificateRequest {
    fn default() -> Self {
        Self::new()
    }
}


//------------ Helper Functions ----------------------------------------------

/// Returns the time if it can be encoded in a certificate.
fn check_time(time: Time) -> Result<Time, RequestError> {
    if !time.is_encodable() {
        xerr!(return Err(
            SchemaError::InvalidValue(Tag::GENERALIZED_TIME).into()
        ))
    }
    Ok(time)
}

/// Derives a serial number from a point in time.
///
/// Uses the milliseconds since the Unix epoch.
fn serial_from_time(now: Time) -> Integer {
    Integer::from_u64(now.to_datetime().timestamp_millis().unsigned_abs())
}

/// Assembles signed data, its algorithm, and the signature.
fn signed_structure(
    data: &[u8], algorithm: &AlgorithmIdentifier, signature: Vec<u8>
) -> Result<Bytes, EncodeError> {
    let algorithm = algorithm.to_value().to_der()?;
    let signature = Value::bit_string(
        &BitString::new(0, signature.into())
    ).to_der()?;
    let mut res = Vec::new();
    encode::append_header(
        &mut res, Tag::SEQUENCE, true,
        data.len() + algorithm.len() + signature.len()
    )?;
    res.extend_from_slice(data);
    res.extend_from_slice(&algorithm);
    res.extend_from_slice(&signature);
    Ok(res.into())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::mode::Mode;
    use super::super::cert::CertificateInfo;
    use super::super::crypto::testing::{
        test_key, FailingSigner, TestError, TestSigner, TestVerifier
    };
    use super::super::crypto::Verifier;
    use super::super::ext::KeyUsage;
    use super::*;

    fn time(year: i32) -> Time {
        Time::utc(year, 6, 15, 8, 30, 0).unwrap()
    }

    fn alg() -> AlgorithmIdentifier {
        AlgorithmIdentifier::ecdsa_with_sha256()
    }

    #[test]
    fn self_signed_alice() {
        let key = test_key();
        let mut req = CertificateRequest::with_public_key(key.clone());
        assert_eq!(req.state(), RequestState::Blank);
        req.subject_mut().unwrap().set_common_name(Some("Alice")).unwrap();
        assert_eq!(req.state(), RequestState::Populated);
        req.set_valid_from(time(2024)).unwrap();
        req.set_valid_to(time(2024).years_later(1).unwrap()).unwrap();

        let data = req.self_sign(&TestSigner, key.key_bytes(), &alg())
            .unwrap();
        assert_eq!(req.state(), RequestState::Signed);
        assert_eq!(req.certificate_data(), Some(&data));

        let cert = CertificateInfo::parse(data).unwrap();
        assert!(cert.is_root());
        assert_eq!(
            cert.subject().unwrap().common_name().unwrap().unwrap(), "Alice"
        );
        assert_eq!(
            cert.issuer().unwrap().common_name().unwrap().unwrap(), "Alice"
        );
        assert_eq!(cert.valid_from().unwrap(), time(2024));
        assert_eq!(cert.valid_to().unwrap(), time(2025));
        assert_eq!(cert.subject_public_key().unwrap(), key);
        cert.verify_signature(&TestVerifier, None).unwrap();
        assert_eq!(
            req.issuer().unwrap().common_name().unwrap().unwrap(), "Alice"
        );
    }

    #[test]
    fn defaults_at_signing() {
        let key = test_key();
        let now = time(2030);
        let mut req = CertificateRequest::with_public_key(key.clone());
        assert_eq!(req.valid_from(), None);
        assert_eq!(req.serial_number(), None);
        let data = req.self_sign_at(
            now, &TestSigner, key.key_bytes(), &alg()
        ).unwrap();
        assert_eq!(req.valid_from(), Some(now));
        assert_eq!(req.valid_to(), Some(time(2031)));
        let serial = Integer::from_u64(now.timestamp() as u64 * 1000);
        assert_eq!(req.serial_number(), Some(&serial));

        let cert = CertificateInfo::parse(data).unwrap();
        assert_eq!(cert.serial_number().unwrap(), serial);
        assert_eq!(cert.valid_from().unwrap(), now);
        assert_eq!(cert.valid_to().unwrap(), time(2031));
        assert_eq!(cert.version().unwrap(), 3);
        assert!(cert.subject().unwrap().is_empty());
        assert!(cert.is_root());
        assert_eq!(cert.signature_algorithm().unwrap(), alg());
    }

    #[test]
    fn explicit_serial() {
        let key = test_key();
        let mut req = CertificateRequest::with_public_key(key.clone());
        req.set_serial_number(Integer::from_unsigned_be(b"\xff\x01")).unwrap();
        let data = req.self_sign_at(
            time(2024), &TestSigner, key.key_bytes(), &alg()
        ).unwrap();
        let cert = CertificateInfo::parse(data).unwrap();
        assert_eq!(cert.serial_number().unwrap().to_u64(), Some(0xff01));
    }

    #[test]
    fn unencodable_validity() {
        fn schema_error<T>(res: Result<T, RequestError>) -> bool {
            matches!(
                res,
                Err(RequestError::Schema(
                    SchemaError::InvalidValue(Tag::GENERALIZED_TIME)
                ))
            )
        }

        let key = test_key();
        let mut req = CertificateRequest::with_public_key(key.clone());
        assert!(schema_error(req.set_valid_from(time(10000))));
        assert!(schema_error(req.set_valid_to(time(-1))));
        assert_eq!(req.valid_from(), None);
        assert_eq!(req.valid_to(), None);

        // The default end of validity would be in the year 10000.
        req.set_valid_from(time(9999)).unwrap();
        assert!(schema_error(
            req.self_sign(&TestSigner, key.key_bytes(), &alg())
        ));
        assert!(schema_error(req.self_sign_at(
            time(10000), &TestSigner, key.key_bytes(), &alg()
        )));
        assert_eq!(req.state(), RequestState::Populated);

        req.set_valid_to(Time::utc(9999, 12, 31, 23, 59, 59).unwrap())
            .unwrap();
        let data = req.self_sign(&TestSigner, key.key_bytes(), &alg())
            .unwrap();
        let cert = CertificateInfo::parse(data).unwrap();
        assert_eq!(cert.valid_from().unwrap(), time(9999));
    }

    #[test]
    fn signed_is_immutable() {
        let key = test_key();
        let mut req = CertificateRequest::with_public_key(key.clone());
        req.self_sign(&TestSigner, key.key_bytes(), &alg()).unwrap();
        assert!(matches!(
            req.subject_mut(), Err(RequestError::ImmutableStructure)
        ));
        assert!(matches!(
            req.extensions_mut(), Err(RequestError::ImmutableStructure)
        ));
        assert!(matches!(
            req.set_valid_from(time(2024)),
            Err(RequestError::ImmutableStructure)
        ));
        assert!(matches!(
            req.set_valid_to(time(2024)),
            Err(RequestError::ImmutableStructure)
        ));
        assert!(matches!(
            req.set_serial_number(Integer::from_u64(1)),
            Err(RequestError::ImmutableStructure)
        ));
        assert!(matches!(
            req.set_public_key(key.clone()),
            Err(RequestError::ImmutableStructure)
        ));
        assert!(matches!(
            req.self_sign(&TestSigner, key.key_bytes(), &alg()),
            Err(RequestError::ImmutableStructure)
        ));
        assert_eq!(req.state(), RequestState::Signed);
    }

    #[test]
    fn missing_public_key() {
        let mut req = CertificateRequest::new();
        req.subject_mut().unwrap().set_common_name(Some("Bob")).unwrap();
        assert!(matches!(
            req.self_sign(&TestSigner, b"", &alg()),
            Err(RequestError::MissingPublicKey)
        ));
        assert!(matches!(
            req.request_data(&TestSigner, b"", &alg()),
            Err(RequestError::MissingPublicKey)
        ));
        assert_eq!(req.state(), RequestState::Populated);

        let key = test_key();
        req.set_public_key(key.clone()).unwrap();
        assert_eq!(req.public_key(), Some(&key));
        req.self_sign(&TestSigner, key.key_bytes(), &alg()).unwrap();
    }

    #[test]
    fn signing_failure() {
        let key = test_key();
        let mut req = CertificateRequest::with_public_key(key.clone());
        match req.self_sign(&FailingSigner, key.key_bytes(), &alg()) {
            Err(RequestError::SigningFailed(err)) => {
                assert!(err.downcast_ref::<TestError>().is_some())
            }
            _ => panic!("expected signing failure")
        }
        assert_eq!(req.state(), RequestState::Blank);
        assert_eq!(req.certificate_data(), None);
        assert_eq!(req.valid_from(), None);
        req.self_sign(&TestSigner, key.key_bytes(), &alg()).unwrap();
    }

    #[test]
    fn certification_request() {
        let key = test_key();
        let mut req = CertificateRequest::with_public_key(key.clone());
        req.subject_mut().unwrap().set_common_name(Some("Carol")).unwrap();
        req.extensions_mut().unwrap().set_key_usage(
            KeyUsage::DIGITAL_SIGNATURE, true
        ).unwrap();
        let data = req.request_data(&TestSigner, key.key_bytes(), &alg())
            .unwrap();
        assert_eq!(req.state(), RequestState::Populated);

        let value = Mode::Der.decode(data).unwrap();
        let items = value.children().unwrap();
        assert_eq!(items.len(), 3);
        let info = &items[0];
        assert_eq!(info.child(0, "version").unwrap().to_integer().unwrap()
            .to_i64(), Some(0));
        let subject = Name::from_value(info.child(1, "subject").unwrap())
            .unwrap();
        assert_eq!(subject.common_name().unwrap().unwrap(), "Carol");
        assert_eq!(
            PublicKeyInfo::from_value(info.child(2, "key").unwrap()).unwrap(),
            key
        );
        let attrs = info.child(3, "attributes").unwrap();
        assert_eq!(attrs.tag(), Tag::CTX_0);
        let attr = attrs.child(0, "attribute").unwrap();
        assert_eq!(
            attr.child(0, "type").unwrap().to_oid().unwrap(),
            oid::EXTENSION_REQUEST
        );
        let exts = Extensions::from_value(
            attr.child(1, "values").unwrap().child(0, "value").unwrap()
        ).unwrap();
        assert_eq!(exts.key_usage().unwrap(), KeyUsage::DIGITAL_SIGNATURE);

        assert_eq!(
            AlgorithmIdentifier::from_value(&items[1]).unwrap(),
            alg()
        );
        let signature = items[2].to_bit_string().unwrap();
        assert!(TestVerifier.verify(
            &alg(), info.captured().unwrap().as_slice(),
            signature.octet_slice(), &key
        ).unwrap());

        // Still usable for self-signing afterwards.
        req.self_sign(&TestSigner, key.key_bytes(), &alg()).unwrap();
        let data = req.request_data(&TestSigner, key.key_bytes(), &alg())
            .unwrap();
        assert!(!data.is_empty());
    }

    #[test]
    fn request_without_extensions() {
        let key = test_key();
        let req = CertificateRequest::with_public_key(key.clone());
        let data = req.request_data(&TestSigner, key.key_bytes(), &alg())
            .unwrap();
        let value = Mode::Der.decode(data).unwrap();
        let attrs = value.child(0, "info").unwrap()
            .child(3, "attributes").unwrap();
        assert!(attrs.children().unwrap().is_empty());
        assert_eq!(req.state(), RequestState::Blank);
    }
}
