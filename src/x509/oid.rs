//! Object identifiers used in certificates.
//!
//! The constants were created with the `mkoid` binary.

use crate::oid::{ConstOid, Oid};


//------------ Attribute Types -----------------------------------------------

/// `id-at-commonName`: 2.5.4.3
pub const AT_COMMON_NAME: ConstOid = Oid(&[85, 4, 3]);

/// `id-at-surname`: 2.5.4.4
pub const AT_SURNAME: ConstOid = Oid(&[85, 4, 4]);

/// `id-at-description`: 2.5.4.13
pub const AT_DESCRIPTION: ConstOid = Oid(&[85, 4, 13]);

/// `id-at-givenName`: 2.5.4.42
pub const AT_GIVEN_NAME: ConstOid = Oid(&[85, 4, 42]);

/// `id-emailAddress`: 1.2.840.113549.1.9.1
pub const EMAIL_ADDRESS: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 1]);


//------------ PKCS #9 Attributes --------------------------------------------

/// `id-challengePassword`: 1.2.840.113549.1.9.7
pub const CHALLENGE_PASSWORD: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 7]);

/// `id-extensionRequest`: 1.2.840.113549.1.9.14
pub const EXTENSION_REQUEST: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 14]);


//------------ Certificate Extensions ----------------------------------------

/// `id-ce-subjectKeyIdentifier`: 2.5.29.14
pub const CE_SUBJECT_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 14]);

/// `id-ce-keyUsage`: 2.5.29.15
pub const CE_KEY_USAGE: ConstOid = Oid(&[85, 29, 15]);

/// `id-ce-basicConstraints`: 2.5.29.19
pub const CE_BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);

/// `id-ce-extKeyUsage`: 2.5.29.37
pub const CE_EXTENDED_KEY_USAGE: ConstOid = Oid(&[85, 29, 37]);


//------------ Key Purposes --------------------------------------------------

/// `anyExtendedKeyUsage`: 2.5.29.37.0
pub const ANY_EXTENDED_KEY_USAGE: ConstOid = Oid(&[85, 29, 37, 0]);

/// `id-kp-serverAuth`: 1.3.6.1.5.5.7.3.1
pub const KP_SERVER_AUTH: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 1]);

/// `id-kp-clientAuth`: 1.3.6.1.5.5.7.3.2
pub const KP_CLIENT_AUTH: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 2]);

/// `id-kp-codeSigning`: 1.3.6.1.5.5.7.3.3
pub const KP_CODE_SIGNING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 3]);

/// `id-kp-emailProtection`: 1.3.6.1.5.5.7.3.4
pub const KP_EMAIL_PROTECTION: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 4]);

/// `id-kp-timeStamping`: 1.3.6.1.5.5.7.3.8
pub const KP_TIME_STAMPING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 8]);

/// `id-kp-OCSPSigning`: 1.3.6.1.5.5.7.3.9
pub const KP_OCSP_SIGNING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 9]);


//------------ Algorithms ----------------------------------------------------

/// `rsaEncryption`: 1.2.840.113549.1.1.1
pub const RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 1]);

/// `sha1WithRSAEncryption`: 1.2.840.113549.1.1.5
pub const SHA1_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 5]);

/// `sha256WithRSAEncryption`: 1.2.840.113549.1.1.11
pub const SHA256_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 11]);

/// `id-ecPublicKey`: 1.2.840.10045.2.1
pub const EC_PUBLIC_KEY: ConstOid = Oid(&[42, 134, 72, 206, 61, 2, 1]);

/// `secp256r1`: 1.2.840.10045.3.1.7
pub const SECP256R1: ConstOid = Oid(&[42, 134, 72, 206, 61, 3, 1, 7]);

/// `ecdsa-with-SHA256`: 1.2.840.10045.4.3.2
pub const ECDSA_WITH_SHA256: ConstOid
    = Oid(&[42, 134, 72, 206, 61, 4, 3, 2]);


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dotted_forms() {
        for (oid, dotted) in [
            (AT_COMMON_NAME, "2.5.4.3"),
            (AT_GIVEN_NAME, "2.5.4.42"),
            (EMAIL_ADDRESS, "1.2.840.113549.1.9.1"),
            (EXTENSION_REQUEST, "1.2.840.113549.1.9.14"),
            (CE_EXTENDED_KEY_USAGE, "2.5.29.37"),
            (ANY_EXTENDED_KEY_USAGE, "2.5.29.37.0"),
            (KP_OCSP_SIGNING, "1.3.6.1.5.5.7.3.9"),
            (SHA256_WITH_RSA_ENCRYPTION, "1.2.840.113549.1.1.11"),
            (EC_PUBLIC_KEY, "1.2.840.10045.2.1"),
            (SECP256R1, "1.2.840.10045.3.1.7"),
            (ECDSA_WITH_SHA256, "1.2.840.10045.4.3.2"),
        ] {
            assert_eq!(oid.to_string(), dotted);
            assert_eq!(dotted.parse::<Oid>().unwrap(), oid);
        }
    }
}
