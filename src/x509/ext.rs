//! Certificate extensions.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::ops;
use bytes::Bytes;
use crate::decode::Decoder;
use crate::int::Integer;
use crate::mode::Mode;
use crate::oid::{ConstOid, Oid};
use crate::string::BitString;
use crate::tag::Tag;
use crate::value::{SchemaError, Value};
use super::error::RequestError;
use super::oid;


/// The extensions this module knows how to interpret.
pub const NATIVE_EXTENSIONS: &[ConstOid] = &[
    oid::CE_KEY_USAGE,
    oid::CE_EXTENDED_KEY_USAGE,
    oid::CE_BASIC_CONSTRAINTS,
    oid::CE_SUBJECT_KEY_IDENTIFIER,
];


//------------ Extensions ----------------------------------------------------

/// A view on the extensions of a certificate.
///
/// ```text
/// Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension
/// ```
///
/// The extensions are kept in the order they appear in the certificate.
#[derive(Clone, Copy, Debug)]
pub struct Extensions<'a> {
    items: &'a [Value],
}

impl<'a> Extensions<'a> {
    /// Creates the view atop the value of the extensions sequence.
    pub fn from_value(value: &'a Value) -> Result<Self, SchemaError> {
        Ok(Extensions {
            items: value.expect_tag(Tag::SEQUENCE)?.children()?
        })
    }

    /// Returns the number of extensions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether there are no extensions.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an iterator over the extensions.
    pub fn iter(
        &self
    ) -> impl Iterator<Item = Result<Extension<'a>, SchemaError>> + 'a {
        self.items.iter().map(Extension::from_value)
    }

    /// Returns the object identifiers of all extensions.
    pub fn oids(&self) -> Result<Vec<Oid>, SchemaError> {
        self.iter().map(|ext| ext.map(|ext| ext.oid)).collect()
    }

    /// Returns the extension with the given object identifier.
    pub fn get<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Result<Option<Extension<'a>>, SchemaError> {
        for ext in self.iter() {
            let ext = ext?;
            if ext.oid == *oid {
                return Ok(Some(ext))
            }
        }
        Ok(None)
    }

    /// Returns the key usage.
    ///
    /// If the extension is not present, returns
    /// [`KeyUsage::UNSPECIFIED`].
    pub fn key_usage(&self) -> Result<KeyUsage, SchemaError> {
        match self.get(&oid::CE_KEY_USAGE)? {
            Some(ext) => KeyUsage::from_value(&ext.decode_value()?),
            None => Ok(KeyUsage::UNSPECIFIED)
        }
    }

    /// Returns the extended key usage if present.
    pub fn extended_key_usage(
        &self
    ) -> Result<Option<ExtendedKeyUsage>, SchemaError> {
        match self.get(&oid::CE_EXTENDED_KEY_USAGE)? {
            Some(ext) => {
                ExtendedKeyUsage::from_value(&ext.decode_value()?).map(Some)
            }
            None => Ok(None)
        }
    }

    /// Returns the basic constraints if present.
    pub fn basic_constraints(
        &self
    ) -> Result<Option<BasicConstraints>, SchemaError> {
        match self.get(&oid::CE_BASIC_CONSTRAINTS)? {
            Some(ext) => {
                BasicConstraints::from_value(&ext.decode_value()?).map(Some)
            }
            None => Ok(None)
        }
    }

    /// Returns the subject key identifier if present.
    pub fn subject_key_identifier(
        &self
    ) -> Result<Option<Bytes>, SchemaError> {
        match self.get(&oid::CE_SUBJECT_KEY_IDENTIFIER)? {
            Some(ext) => {
                let value = ext.decode_value()?;
                let key_id = value.expect_tag(Tag::OCTET_STRING)?;
                Ok(Some(key_id.to_octets()?.clone()))
            }
            None => Ok(None)
        }
    }

    /// Returns whether the key may be used for all of the requested usages.
    ///
    /// Only a critical key usage extension restricts the use of the key.
    /// If the extension is absent or not critical, any usage is allowed.
    /// A critical extension that can’t be decoded allows nothing.
    pub fn allows_key_usage(&self, requested: KeyUsage) -> bool {
        let ext = match self.get(&oid::CE_KEY_USAGE) {
            Ok(Some(ext)) => ext,
            Ok(None) => return true,
            Err(_) => return false,
        };
        if !ext.is_critical() {
            return true
        }
        match ext.decode_value().and_then(|value| {
            KeyUsage::from_value(&value)
        }) {
            Ok(usage) => usage.contains(requested),
            Err(_) => false
        }
    }

    /// Returns whether the key may be used for all the requested purposes.
    ///
    /// The same rules as for [`allows_key_usage`][Self::allows_key_usage]
    /// apply.
    pub fn allows_extended_key_usage<T: AsRef<[u8]>>(
        &self, requested: &[Oid<T>]
    ) -> bool {
        let ext = match self.get(&oid::CE_EXTENDED_KEY_USAGE) {
            Ok(Some(ext)) => ext,
            Ok(None) => return true,
            Err(_) => return false,
        };
        if !ext.is_critical() {
            return true
        }
        match ext.decode_value().and_then(|value| {
            ExtendedKeyUsage::from_value(&value)
        }) {
            Ok(usage) => requested.iter().all(|oid| usage.contains(oid)),
            Err(_) => false
        }
    }

    /// Checks that all critical extensions are understood.
    ///
    /// The extensions interpreted by this module are always understood.
    /// Additional extensions understood by the caller can be given in
    /// `understood`.
    pub fn check_critical<T: AsRef<[u8]>>(
        &self, understood: &[Oid<T>]
    ) -> Result<(), SchemaError> {
        for ext in self.iter() {
            let ext = ext?;
            if !ext.is_critical()
                || NATIVE_EXTENSIONS.iter().any(|oid| *oid == ext.oid)
                || understood.iter().any(|oid| *oid == ext.oid)
            {
                continue
            }
            xerr!(return Err(SchemaError::UnknownCriticalExtension(ext.oid)))
        }
        Ok(())
    }
}


//------------ Extension -----------------------------------------------------

/// A single extension.
///
/// ```text
/// Extension  ::=  SEQUENCE  {
///      extnID      OBJECT IDENTIFIER,
///      critical    BOOLEAN DEFAULT FALSE,
///      extnValue   OCTET STRING
///                  -- contains the DER encoding of an ASN.1 value
///                  -- corresponding to the extension type identified
///                  -- by extnID
///      }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Extension<'a> {
    oid: Oid,
    critical: bool,
    value: &'a Bytes,
}

impl<'a> Extension<'a> {
    /// Interprets a value as an extension.
    pub fn from_value(value: &'a Value) -> Result<Self, SchemaError> {
        let items = value.expect_tag(Tag::SEQUENCE)?.children()?;
        let oid = value.child(0, "extnID")?.to_oid()?;
        let (critical, ext_value) = match items.len() {
            2 => (false, &items[1]),
            3 => (items[1].to_bool()?, &items[2]),
            1 => xerr!(return Err(SchemaError::MissingRequiredField(
                "extnValue"
            ))),
            _ => xerr!(return Err(SchemaError::InvalidValue(Tag::SEQUENCE)))
        };
        Ok(Extension {
            oid,
            critical,
            value: ext_value.expect_tag(Tag::OCTET_STRING)?.to_octets()?,
        })
    }

    /// Returns the object identifier of the extension.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns whether the extension is marked critical.
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Returns the encoded value of the extension.
    pub fn value(&self) -> &'a Bytes {
        self.value
    }

    /// Decodes the value of the extension.
    pub fn decode_value(&self) -> Result<Value, SchemaError> {
        Decoder::new(Mode::Ber).exact(true).decode(self.value.clone())
            .map_err(|_| SchemaError::InvalidValue(Tag::OCTET_STRING))
    }
}


//------------ ExtensionsMut -------------------------------------------------

/// A view on the extensions of a certificate request allowing changes.
#[derive(Debug)]
pub struct ExtensionsMut<'a> {
    value: &'a mut Value,
}

impl<'a> ExtensionsMut<'a> {
    pub(crate) fn new(value: &'a mut Value) -> Self {
        ExtensionsMut { value }
    }

    /// Returns a read-only view on the extensions.
    pub fn as_extensions(&self) -> Result<Extensions, SchemaError> {
        Extensions::from_value(&*self.value)
    }

    /// Sets an extension to an already encoded value.
    ///
    /// If an extension with this object identifier is present already, it
    /// is replaced in place. Otherwise it is added at the end.
    pub fn set_raw<T: AsRef<[u8]>>(
        &mut self, oid: &Oid<T>, value: Bytes, critical: bool
    ) -> Result<(), RequestError> {
        let mut items = vec![Value::oid(oid)];
        if critical {
            items.push(Value::boolean(true))
        }
        items.push(Value::octet_string(value));
        let ext = Value::sequence(items);
        match self.position(oid)? {
            Some(idx) => self.value.children_mut()?[idx] = ext,
            None => self.value.children_mut()?.push(ext),
        }
        Ok(())
    }

    /// Sets an extension to the DER encoding of a value.
    pub fn set<T: AsRef<[u8]>>(
        &mut self, oid: &Oid<T>, value: &Value, critical: bool
    ) -> Result<(), RequestError> {
        self.set_raw(oid, value.to_der()?.into(), critical)
    }

    /// Removes an extension.
    ///
    /// Returns whether the extension was present.
    pub fn remove<T: AsRef<[u8]>>(
        &mut self, oid: &Oid<T>
    ) -> Result<bool, RequestError> {
        match self.position(oid)? {
            Some(idx) => {
                self.value.children_mut()?.remove(idx);
                Ok(true)
            }
            None => Ok(false)
        }
    }

    /// Sets the key usage extension.
    pub fn set_key_usage(
        &mut self, usage: KeyUsage, critical: bool
    ) -> Result<(), RequestError> {
        self.set(&oid::CE_KEY_USAGE, &usage.to_value(), critical)
    }

    /// Sets the extended key usage extension.
    pub fn set_extended_key_usage(
        &mut self, usage: &ExtendedKeyUsage, critical: bool
    ) -> Result<(), RequestError> {
        self.set(&oid::CE_EXTENDED_KEY_USAGE, &usage.to_value(), critical)
    }

    /// Sets the basic constraints extension.
    ///
    /// RFC 5280 requires the extension to be critical in CA certificates.
    pub fn set_basic_constraints(
        &mut self, constraints: BasicConstraints, critical: bool
    ) -> Result<(), RequestError> {
        self.set(&oid::CE_BASIC_CONSTRAINTS, &constraints.to_value(), critical)
    }

    /// Sets the subject key identifier extension.
    pub fn set_subject_key_identifier(
        &mut self, key_id: &[u8]
    ) -> Result<(), RequestError> {
        self.set(
            &oid::CE_SUBJECT_KEY_IDENTIFIER,
            &Value::octet_string(Bytes::copy_from_slice(key_id)),
            false
        )
    }

    /// Returns the index of the extension with the given oid.
    fn position<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Result<Option<usize>, SchemaError> {
        for (idx, item) in self.value.children()?.iter().enumerate() {
            if item.child(0, "extnID")?.to_oid()? == *oid {
                return Ok(Some(idx))
            }
        }
        Ok(None)
    }
}


//------------ KeyUsage ------------------------------------------------------

/// The set of usages permitted by the key usage extension.
///
/// ```text
/// KeyUsage ::= BIT STRING {
///      digitalSignature        (0),
///      nonRepudiation          (1),
///      keyEncipherment         (2),
///      dataEncipherment        (3),
///      keyAgreement            (4),
///      keyCertSign             (5),
///      cRLSign                 (6),
///      encipherOnly            (7),
///      decipherOnly            (8) }
/// ```
///
/// Values can be combined using `|`. The special value
/// [`UNSPECIFIED`][Self::UNSPECIFIED] marks the absence of the extension.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct KeyUsage(u16);

impl KeyUsage {
    pub const DIGITAL_SIGNATURE: Self = KeyUsage(1 << 0);
    pub const NON_REPUDIATION: Self = KeyUsage(1 << 1);
    pub const KEY_ENCIPHERMENT: Self = KeyUsage(1 << 2);
    pub const DATA_ENCIPHERMENT: Self = KeyUsage(1 << 3);
    pub const KEY_AGREEMENT: Self = KeyUsage(1 << 4);
    pub const KEY_CERT_SIGN: Self = KeyUsage(1 << 5);
    pub const CRL_SIGN: Self = KeyUsage(1 << 6);
    pub const ENCIPHER_ONLY: Self = KeyUsage(1 << 7);
    pub const DECIPHER_ONLY: Self = KeyUsage(1 << 8);

    /// The key usage extension is not present.
    pub const UNSPECIFIED: Self = KeyUsage(1 << 15);

    /// The mask of all defined usage bits.
    const ALL: u16 = 0x01ff;

    /// Returns an empty set of usages.
    pub fn empty() -> Self {
        KeyUsage(0)
    }

    /// Returns the raw flags.
    ///
    /// Bit _n_ corresponds to the named bit _n_ of the extension.
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Returns whether this is the marker for an absent extension.
    pub fn is_unspecified(self) -> bool {
        self.0 & Self::UNSPECIFIED.0 != 0
    }

    /// Returns whether all usages in `other` are included in `self`.
    pub fn contains(self, other: Self) -> bool {
        let other = other.0 & Self::ALL;
        self.0 & other == other
    }

    /// Creates the usages from the bit string of the extension.
    pub fn from_bit_string(bits: &BitString) -> Self {
        let mut res = 0;
        for bit in 0..9 {
            if bits.bit(bit) {
                res |= 1 << bit
            }
        }
        KeyUsage(res)
    }

    /// Returns the bit string for the extension.
    pub fn to_bit_string(self) -> BitString {
        let bits: Vec<usize> = (0..9).filter(|bit| {
            self.0 & (1 << bit) != 0
        }).collect();
        BitString::from_bits(&bits)
    }

    /// Interprets the decoded value of the extension.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        value.to_bit_string().map(|bits| Self::from_bit_string(&bits))
    }

    /// Returns the value of the extension.
    pub fn to_value(self) -> Value {
        Value::bit_string(&self.to_bit_string())
    }
}

impl ops::BitOr for KeyUsage {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        KeyUsage((self.0 | other.0) & !Self::UNSPECIFIED.0)
    }
}

impl ops::BitOrAssign for KeyUsage {
    fn bitor_assign(&mut self, other: Self) {
        *self = *self | other
    }
}


//------------ ExtendedKeyUsage ----------------------------------------------

/// The key purposes of the extended key usage extension.
///
/// ```text
/// ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
///
/// KeyPurposeId ::= OBJECT IDENTIFIER
/// ```
///
/// The purposes are kept in order without duplicates.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExtendedKeyUsage(Vec<Oid>);

impl ExtendedKeyUsage {
    /// Creates an empty set of purposes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a purpose unless it is present already.
    pub fn push<T: AsRef<[u8]>>(&mut self, oid: &Oid<T>) {
        if !self.contains(oid) {
            self.0.push(oid.to_bytes())
        }
    }

    /// Returns whether a purpose is included.
    pub fn contains<T: AsRef<[u8]>>(&self, oid: &Oid<T>) -> bool {
        self.0.iter().any(|item| item == oid)
    }

    /// Returns an iterator over the purposes.
    pub fn iter(&self) -> impl Iterator<Item = &Oid> {
        self.0.iter()
    }

    /// Returns the number of purposes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are no purposes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interprets the decoded value of the extension.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let mut res = Self::new();
        for item in value.expect_tag(Tag::SEQUENCE)?.children()? {
            res.push(&item.to_oid()?)
        }
        if res.is_empty() {
            xerr!(return Err(SchemaError::InvalidValue(Tag::SEQUENCE)))
        }
        Ok(res)
    }

    /// Returns the value of the extension.
    pub fn to_value(&self) -> Value {
        Value::sequence(self.0.iter().map(Value::oid).collect())
    }
}

impl<T: AsRef<[u8]>> FromIterator<Oid<T>> for ExtendedKeyUsage {
    fn from_iter<I: IntoIterator<Item = Oid<T>>>(iter: I) -> Self {
        let mut res = Self::new();
        for oid in iter {
            res.push(&oid)
        }
        res
    }
}


//------------ BasicConstraints ----------------------------------------------

/// The basic constraints extension.
///
/// ```text
/// BasicConstraints ::= SEQUENCE {
///      cA                      BOOLEAN DEFAULT FALSE,
///      pathLenConstraint       INTEGER (0..MAX) OPTIONAL }
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BasicConstraints {
    /// Whether the subject is a CA.
    pub ca: bool,

    /// The maximum number of intermediate certificates below this one.
    pub path_len: Option<u64>,
}

impl BasicConstraints {
    /// Interprets the decoded value of the extension.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let mut items = value.expect_tag(Tag::SEQUENCE)?.children()?.iter()
            .peekable();
        let ca = match items.peek() {
            Some(item) if item.tag() == Tag::BOOLEAN => {
                let res = item.to_bool()?;
                items.next();
                res
            }
            _ => false
        };
        let path_len = match items.next() {
            Some(item) => match item.to_integer()?.to_u64() {
                Some(len) => Some(len),
                None => xerr!(return Err(
                    SchemaError::InvalidValue(Tag::INTEGER)
                ))
            }
            None => None
        };
        if items.next().is_some() {
            xerr!(return Err(SchemaError::InvalidValue(Tag::SEQUENCE)))
        }
        Ok(BasicConstraints { ca, path_len })
    }

    /// Returns the value of the extension.
    pub fn to_value(self) -> Value {
        let mut items = Vec::new();
        if self.ca {
            items.push(Value::boolean(true))
        }
        if let Some(len) = self.path_len {
            items.push(Value::integer(Integer::from_u64(len)))
        }
        Value::sequence(items)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn extensions(items: Vec<(ConstOid, bool, Value)>) -> Value {
        let mut value = Value::sequence(Vec::new());
        let mut exts = ExtensionsMut::new(&mut value);
        for (oid, critical, item) in items {
            exts.set(&oid, &item, critical).unwrap();
        }
        value
    }

    #[test]
    fn key_usage_bits() {
        assert_eq!(
            KeyUsage::KEY_CERT_SIGN.to_value().to_der().unwrap(),
            b"\x03\x02\x02\x04"
        );
        assert_eq!(
            (KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_ENCIPHERMENT)
                .to_value().to_der().unwrap(),
            b"\x03\x02\x05\xa0"
        );
        assert_eq!(
            KeyUsage::DECIPHER_ONLY.to_value().to_der().unwrap(),
            b"\x03\x03\x07\x00\x80"
        );
        let usage = KeyUsage::from_value(&Value::primitive(
            Tag::BIT_STRING, &b"\x01\x86"[..]
        )).unwrap();
        assert_eq!(
            usage,
            KeyUsage::DIGITAL_SIGNATURE | KeyUsage::KEY_CERT_SIGN
                | KeyUsage::CRL_SIGN
        );
        assert!(usage.contains(KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN));
        assert!(!usage.contains(KeyUsage::KEY_AGREEMENT));
        assert!(!usage.is_unspecified());
        assert!(KeyUsage::UNSPECIFIED.is_unspecified());
    }

    #[test]
    fn read_extensions() {
        let mut eku = ExtendedKeyUsage::new();
        eku.push(&oid::KP_SERVER_AUTH);
        eku.push(&oid::KP_CLIENT_AUTH);
        eku.push(&oid::KP_SERVER_AUTH);
        assert_eq!(eku.len(), 2);
        let value = extensions(vec![
            (oid::CE_BASIC_CONSTRAINTS, true, BasicConstraints {
                ca: true, path_len: Some(0)
            }.to_value()),
            (oid::CE_KEY_USAGE, false, KeyUsage::DIGITAL_SIGNATURE.to_value()),
            (oid::CE_EXTENDED_KEY_USAGE, false, eku.to_value()),
        ]);
        let exts = Extensions::from_value(&value).unwrap();
        assert_eq!(exts.len(), 3);
        assert_eq!(
            exts.oids().unwrap(),
            [
                oid::CE_BASIC_CONSTRAINTS.to_oid(),
                oid::CE_KEY_USAGE.to_oid(),
                oid::CE_EXTENDED_KEY_USAGE.to_oid(),
            ]
        );
        let bc = exts.get(&oid::CE_BASIC_CONSTRAINTS).unwrap().unwrap();
        assert!(bc.is_critical());
        assert_eq!(bc.value().as_ref(), b"\x30\x06\x01\x01\xff\x02\x01\x00");
        assert_eq!(
            exts.basic_constraints().unwrap(),
            Some(BasicConstraints { ca: true, path_len: Some(0) })
        );
        assert_eq!(exts.key_usage().unwrap(), KeyUsage::DIGITAL_SIGNATURE);
        assert_eq!(exts.extended_key_usage().unwrap(), Some(eku));
        assert!(!exts.get(&oid::CE_KEY_USAGE).unwrap().unwrap().is_critical());
        assert_eq!(exts.get(&oid::CE_SUBJECT_KEY_IDENTIFIER).unwrap(), None);
    }

    #[test]
    fn absence_and_non_critical_are_permissive() {
        let empty = Value::sequence(Vec::new());
        let exts = Extensions::from_value(&empty).unwrap();
        assert_eq!(exts.key_usage().unwrap(), KeyUsage::UNSPECIFIED);
        assert_eq!(exts.extended_key_usage().unwrap(), None);
        for bit in 0..9 {
            let usage = KeyUsage(1 << bit);
            assert!(exts.allows_key_usage(usage));
        }
        assert!(exts.allows_extended_key_usage(&[oid::KP_CODE_SIGNING]));

        let value = extensions(vec![
            (oid::CE_KEY_USAGE, false, KeyUsage::KEY_CERT_SIGN.to_value()),
            (oid::CE_EXTENDED_KEY_USAGE, false, [oid::KP_SERVER_AUTH]
                .into_iter().collect::<ExtendedKeyUsage>().to_value()),
        ]);
        let exts = Extensions::from_value(&value).unwrap();
        assert!(exts.allows_key_usage(KeyUsage::DIGITAL_SIGNATURE));
        assert!(exts.allows_key_usage(
            KeyUsage::KEY_AGREEMENT | KeyUsage::DECIPHER_ONLY
        ));
        assert!(exts.allows_extended_key_usage(&[oid::KP_CODE_SIGNING]));
    }

    #[test]
    fn critical_restricts() {
        let value = extensions(vec![
            (oid::CE_KEY_USAGE, true, KeyUsage::KEY_CERT_SIGN.to_value()),
            (oid::CE_EXTENDED_KEY_USAGE, true, [
                oid::KP_SERVER_AUTH, oid::KP_CLIENT_AUTH
            ].into_iter().collect::<ExtendedKeyUsage>().to_value()),
        ]);
        let exts = Extensions::from_value(&value).unwrap();
        assert!(exts.allows_key_usage(KeyUsage::KEY_CERT_SIGN));
        assert!(!exts.allows_key_usage(KeyUsage::DIGITAL_SIGNATURE));
        assert!(!exts.allows_key_usage(
            KeyUsage::KEY_CERT_SIGN | KeyUsage::CRL_SIGN
        ));
        assert!(exts.allows_extended_key_usage(&[oid::KP_CLIENT_AUTH]));
        assert!(exts.allows_extended_key_usage(
            &[oid::KP_SERVER_AUTH, oid::KP_CLIENT_AUTH]
        ));
        assert!(!exts.allows_extended_key_usage(
            &[oid::KP_SERVER_AUTH, oid::KP_EMAIL_PROTECTION]
        ));

        // Malformed critical extension allows nothing.
        let value = extensions(vec![
            (oid::CE_KEY_USAGE, true, Value::null()),
        ]);
        let exts = Extensions::from_value(&value).unwrap();
        assert!(!exts.allows_key_usage(KeyUsage::KEY_CERT_SIGN));
        assert!(exts.key_usage().is_err());
    }

    #[test]
    fn check_critical() {
        let private = Oid::from_components(&[1, 3, 6, 1, 4, 1, 99999, 1])
            .unwrap();
        let mut value = extensions(vec![
            (oid::CE_BASIC_CONSTRAINTS, true,
                BasicConstraints::default().to_value()),
        ]);
        ExtensionsMut::new(&mut value).set_raw(
            &private, Bytes::from_static(b"\x05\x00"), true
        ).unwrap();
        let exts = Extensions::from_value(&value).unwrap();
        assert_eq!(
            exts.check_critical::<&[u8]>(&[]),
            Err(SchemaError::UnknownCriticalExtension(private.clone()))
        );
        assert_eq!(exts.check_critical(&[private.clone()]), Ok(()));

        ExtensionsMut::new(&mut value).set_raw(
            &private, Bytes::from_static(b"\x05\x00"), false
        ).unwrap();
        let exts = Extensions::from_value(&value).unwrap();
        assert_eq!(exts.len(), 2);
        assert_eq!(exts.check_critical::<&[u8]>(&[]), Ok(()));
    }

    #[test]
    fn modify_extensions() {
        let mut value = Value::sequence(Vec::new());
        let mut exts = ExtensionsMut::new(&mut value);
        exts.set_key_usage(KeyUsage::DIGITAL_SIGNATURE, true).unwrap();
        exts.set_subject_key_identifier(b"\x01\x02").unwrap();
        exts.set_key_usage(KeyUsage::KEY_CERT_SIGN, false).unwrap();
        let view = exts.as_extensions().unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.oids().unwrap()[0], oid::CE_KEY_USAGE);
        assert_eq!(view.key_usage().unwrap(), KeyUsage::KEY_CERT_SIGN);
        assert_eq!(
            view.subject_key_identifier().unwrap().unwrap().as_ref(),
            b"\x01\x02"
        );
        assert!(exts.remove(&oid::CE_KEY_USAGE).unwrap());
        assert!(!exts.remove(&oid::CE_KEY_USAGE).unwrap());
        assert_eq!(exts.as_extensions().unwrap().len(), 1);

        // Non-critical extensions omit the default.
        assert_eq!(
            value.to_der().unwrap(),
            b"\x30\x0d\x30\x0b\x06\x03\x55\x1d\x0e\x04\x04\x04\x02\x01\x02"
        );
    }

    #[test]
    fn basic_constraints() {
        for (der, expected) in [
            (&b"\x30\x00"[..], BasicConstraints { ca: false, path_len: None }),
            (&b"\x30\x03\x01\x01\xff"[..], BasicConstraints {
                ca: true, path_len: None
            }),
            (&b"\x30\x03\x02\x01\x03"[..], BasicConstraints {
                ca: false, path_len: Some(3)
            }),
        ] {
            let value = Mode::Der.decode(Bytes::copy_from_slice(der)).unwrap();
            assert_eq!(BasicConstraints::from_value(&value).unwrap(), expected);
            assert_eq!(expected.to_value().to_der().unwrap(), der);
        }
        let value = Mode::Der.decode(
            &b"\x30\x06\x02\x01\x03\x02\x01\x03"[..]
        ).unwrap();
        assert!(BasicConstraints::from_value(&value).is_err());
        let value = Mode::Der.decode(&b"\x30\x03\x02\x01\xff"[..]).unwrap();
        assert!(BasicConstraints::from_value(&value).is_err());
    }
}
