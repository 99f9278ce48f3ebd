//! Algorithm identifiers, public keys, and the signing interface.
//!
//! The crate does not implement any cryptographic algorithms itself.
//! Instead, signing and verification are delegated to implementations of
//! the [`Signer`] and [`Verifier`] traits provided by the user.

use std::error;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use crate::mode::Mode;
use crate::oid::Oid;
use crate::string::BitString;
use crate::tag::Tag;
use crate::value::{SchemaError, Value};
use super::error::CertificateError;
use super::oid;


//------------ AlgorithmIdentifier -------------------------------------------

/// An algorithm identifier.
///
/// ```text
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///      algorithm               OBJECT IDENTIFIER,
///      parameters              ANY DEFINED BY algorithm OPTIONAL  }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlgorithmIdentifier {
    /// The object identifier of the algorithm.
    oid: Oid,

    /// The algorithm parameters, if present.
    parameters: Option<Value>,
}

impl AlgorithmIdentifier {
    /// Creates a new algorithm identifier.
    pub fn new(oid: Oid, parameters: Option<Value>) -> Self {
        AlgorithmIdentifier { oid, parameters }
    }

    /// RSA PKCS #1 v1.5 with SHA-1.
    pub fn sha1_with_rsa() -> Self {
        Self::new(oid::SHA1_WITH_RSA_ENCRYPTION.to_oid(), Some(Value::null()))
    }

    /// RSA PKCS #1 v1.5 with SHA-256.
    pub fn sha256_with_rsa() -> Self {
        Self::new(
            oid::SHA256_WITH_RSA_ENCRYPTION.to_oid(), Some(Value::null())
        )
    }

    /// ECDSA with SHA-256.
    ///
    /// RFC 5758 requires the parameters to be absent.
    pub fn ecdsa_with_sha256() -> Self {
        Self::new(oid::ECDSA_WITH_SHA256.to_oid(), None)
    }

    /// The RSA public key algorithm.
    pub fn rsa_encryption() -> Self {
        Self::new(oid::RSA_ENCRYPTION.to_oid(), Some(Value::null()))
    }

    /// An elliptic curve public key on the P-256 curve.
    pub fn ec_p256() -> Self {
        Self::new(
            oid::EC_PUBLIC_KEY.to_oid(),
            Some(Value::oid(&oid::SECP256R1))
        )
    }

    /// Returns the object identifier of the algorithm.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns the parameters, if present.
    pub fn parameters(&self) -> Option<&Value> {
        self.parameters.as_ref()
    }

    /// Interprets a value as an algorithm identifier.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let items = value.expect_tag(Tag::SEQUENCE)?.children()?;
        let oid = value.child(0, "algorithm")?.to_oid()?;
        match items.len() {
            1 => Ok(Self::new(oid, None)),
            2 => Ok(Self::new(oid, Some(items[1].clone()))),
            _ => xerr!(Err(SchemaError::InvalidValue(Tag::SEQUENCE)))
        }
    }

    /// Returns the value for the algorithm identifier.
    pub fn to_value(&self) -> Value {
        let mut items = vec![Value::oid(&self.oid)];
        if let Some(ref parameters) = self.parameters {
            items.push(parameters.clone())
        }
        Value::sequence(items)
    }
}


//------------ PublicKeyInfo -------------------------------------------------

/// A public key with its algorithm.
///
/// ```text
/// SubjectPublicKeyInfo  ::=  SEQUENCE  {
///      algorithm            AlgorithmIdentifier,
///      subjectPublicKey     BIT STRING  }
/// ```
///
/// The content of the key bits depends on the algorithm and is not
/// interpreted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKeyInfo {
    algorithm: AlgorithmIdentifier,
    key: BitString,
}

impl PublicKeyInfo {
    /// Creates a new value from an algorithm and the key bits.
    pub fn new(algorithm: AlgorithmIdentifier, key: BitString) -> Self {
        PublicKeyInfo { algorithm, key }
    }

    /// Interprets a value as subject public key info.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        value.expect_tag(Tag::SEQUENCE)?;
        Ok(PublicKeyInfo {
            algorithm: AlgorithmIdentifier::from_value(
                value.child(0, "algorithm")?
            )?,
            key: value.child(1, "subjectPublicKey")?.to_bit_string()?,
        })
    }

    /// Decodes DER encoded subject public key info.
    pub fn decode(data: impl Into<Bytes>) -> Result<Self, CertificateError> {
        let value = Mode::Der.decode(data)?;
        Ok(Self::from_value(&value)?)
    }

    /// Returns the value for the subject public key info.
    pub fn to_value(&self) -> Value {
        Value::sequence(vec![
            self.algorithm.to_value(),
            Value::bit_string(&self.key),
        ])
    }

    /// Returns the algorithm of the key.
    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    /// Returns the key bits.
    pub fn key(&self) -> &BitString {
        &self.key
    }

    /// Returns the octets of the key bits.
    pub fn key_bytes(&self) -> &[u8] {
        self.key.octet_slice()
    }

    /// Returns the key identifier of the key.
    ///
    /// This is the SHA-1 hash over the key bits as described in method (1)
    /// of section 4.2.1.2 of RFC 5280.
    pub fn key_identifier(&self) -> [u8; 20] {
        let mut res = [0u8; 20];
        res.copy_from_slice(&Sha1::digest(self.key_bytes()));
        res
    }
}


//------------ Signer --------------------------------------------------------

/// A type that can create signatures.
///
/// The private keys are kept by the signer and referred to through key
/// identifiers of the associated type `KeyId`.
pub trait Signer {
    /// The type used for identifying keys.
    type KeyId: ?Sized;

    /// The error produced by the signer.
    type Error: error::Error + Send + Sync + 'static;

    /// Signs `data` with the given key and algorithm.
    ///
    /// Returns the raw signature octets.
    fn sign(
        &self,
        key: &Self::KeyId,
        algorithm: &AlgorithmIdentifier,
        data: &[u8],
    ) -> Result<Vec<u8>, Self::Error>;
}


//------------ Verifier ------------------------------------------------------

/// A type that can verify signatures.
pub trait Verifier {
    /// The error produced by the verifier.
    type Error: error::Error + Send + Sync + 'static;

    /// Verifies the signature of a message.
    ///
    /// Returns `Ok(false)` if the signature does not match and an error
    /// only if verification could not be attempted.
    fn verify(
        &self,
        algorithm: &AlgorithmIdentifier,
        message: &[u8],
        signature: &[u8],
        public_key: &PublicKeyInfo,
    ) -> Result<bool, Self::Error>;
}


//============ Testing =======================================================

/// A fake signer and verifier for tests.
///
/// The ‘signature’ is the SHA-1 hash over the key bits followed by the
/// message. The signer uses the key bits of the public key as its key
/// identifier.
#[cfg(test)]
pub(crate) mod testing {
    use std::{error, fmt};
    use sha1::{Digest, Sha1};
    use crate::string::BitString;
    use super::*;

    pub fn test_key() -> PublicKeyInfo {
        PublicKeyInfo::new(
            AlgorithmIdentifier::ec_p256(),
            BitString::new(0, Bytes::from_static(b"\x04test public key"))
        )
    }

    fn fake_signature(key: &[u8], data: &[u8]) -> Vec<u8> {
        let mut hasher = Sha1::new();
        hasher.update(key);
        hasher.update(data);
        hasher.finalize().to_vec()
    }

    #[derive(Debug)]
    pub struct TestError;

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("test error")
        }
    }

    impl error::Error for TestError { }

    pub struct TestSigner;

    impl Signer for TestSigner {
        type KeyId = [u8];
        type Error = TestError;

        fn sign(
            &self,
            key: &[u8],
            _algorithm: &AlgorithmIdentifier,
            data: &[u8],
        ) -> Result<Vec<u8>, TestError> {
            Ok(fake_signature(key, data))
        }
    }

    pub struct FailingSigner;

    impl Signer for FailingSigner {
        type KeyId = [u8];
        type Error = TestError;

        fn sign(
            &self,
            _key: &[u8],
            _algorithm: &AlgorithmIdentifier,
            _data: &[u8],
        ) -> Result<Vec<u8>, TestError> {
            Err(TestError)
        }
    }

    pub struct TestVerifier;

    impl Verifier for TestVerifier {
        type Error = TestError;

        fn verify(
            &self,
            _algorithm: &AlgorithmIdentifier,
            message: &[u8],
            signature: &[u8],
            public_key: &PublicKeyInfo,
        ) -> Result<bool, TestError> {
            Ok(fake_signature(public_key.key_bytes(), message) == signature)
        }
    }
}


//============ Tests =========================================================
