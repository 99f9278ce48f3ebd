//! Access to the fields of a to-be-signed certificate.
//!
//! ```text
//! TBSCertificate  ::=  SEQUENCE  {
//!      version         [0]  EXPLICIT Version DEFAULT v1,
//!      serialNumber         CertificateSerialNumber,
//!      signature            AlgorithmIdentifier,
//!      issuer               Name,
//!      validity             Validity,
//!      subject              Name,
//!      subjectPublicKeyInfo SubjectPublicKeyInfo,
//!      issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
//!      subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
//!      extensions      [3]  EXPLICIT Extensions OPTIONAL }
//! ```
//!
//! The fields after the optional version are addressed by the index
//! constants below. The functions here shift them past the version if it
//! is present.

use crate::tag::Tag;
use crate::value::{SchemaError, Value};


pub const SERIAL_NUMBER: usize = 0;
pub const SIGNATURE: usize = 1;
pub const ISSUER: usize = 2;
pub const VALIDITY: usize = 3;
pub const SUBJECT: usize = 4;
pub const SUBJECT_PUBLIC_KEY_INFO: usize = 5;

const FIELD_NAMES: [&str; 6] = [
    "serialNumber", "signature", "issuer", "validity", "subject",
    "subjectPublicKeyInfo"
];

/// Returns the index of the serial number.
fn offset(tbs: &Value) -> Result<usize, SchemaError> {
    match tbs.expect_tag(Tag::SEQUENCE)?.children()?.first() {
        Some(item) if item.tag() == Tag::CTX_0 => Ok(1),
        _ => Ok(0)
    }
}

/// Returns the field with the given index.
pub fn field(tbs: &Value, idx: usize) -> Result<&Value, SchemaError> {
    tbs.child(idx + offset(tbs)?, FIELD_NAMES[idx])
}

/// Returns the field with the given index for modification.
pub fn field_mut(
    tbs: &mut Value, idx: usize
) -> Result<&mut Value, SchemaError> {
    let pos = idx + offset(tbs)?;
    match tbs.children_mut()?.get_mut(pos) {
        Some(item) => Ok(item),
        None => xerr!(Err(SchemaError::MissingRequiredField(FIELD_NAMES[idx])))
    }
}

/// Returns the version number.
///
/// This is the actual number, i.e., 3 for a v3 certificate.
pub fn version(tbs: &Value) -> Result<u8, SchemaError> {
    if offset(tbs)? == 0 {
        return Ok(1)
    }
    let version = tbs.child(0, "version")?.child(0, "version")?;
    match version.to_integer()?.to_u64() {
        Some(value) if value < 255 => Ok(value as u8 + 1),
        _ => xerr!(Err(SchemaError::InvalidValue(Tag::INTEGER)))
    }
}

/// Returns the index of the extensions wrapper if present.
fn extensions_pos(tbs: &Value) -> Result<Option<usize>, SchemaError> {
    let start = offset(tbs)? + SUBJECT_PUBLIC_KEY_INFO + 1;
    Ok(tbs.children()?.iter().enumerate().skip(start).find(|(_, item)| {
        item.tag() == Tag::CTX_3
    }).map(|(idx, _)| idx))
}

/// Returns the extensions sequence if present.
pub fn extensions(tbs: &Value) -> Result<Option<&Value>, SchemaError> {
    match extensions_pos(tbs)? {
        Some(idx) => tbs.child(idx, "extensions")?.child(0, "extensions")
            .map(Some),
        None => Ok(None)
    }
}

/// Returns the extensions sequence for modification.
///
/// Adds an empty sequence if there are no extensions yet.
pub fn extensions_mut(tbs: &mut Value) -> Result<&mut Value, SchemaError> {
    let idx = match extensions_pos(tbs)? {
        Some(idx) => idx,
        None => {
            let items = tbs.children_mut()?;
            items.push(Value::explicit(3, Value::sequence(Vec::new())));
            items.len() - 1
        }
    };
    let wrapper = &mut tbs.children_mut()?[idx];
    match wrapper.children_mut()?.first_mut() {
        Some(item) => Ok(item),
        None => xerr!(Err(SchemaError::MissingRequiredField("extensions")))
    }
}

/// Removes the extensions if there aren’t any.
///
/// An empty extensions sequence must not be encoded.
pub fn remove_empty_extensions(tbs: &mut Value) -> Result<(), SchemaError> {
    if let Some(exts) = extensions(tbs)? {
        if !exts.children()?.is_empty() {
            return Ok(())
        }
    }
    if let Some(idx) = extensions_pos(tbs)? {
        tbs.children_mut()?.remove(idx);
    }
    Ok(())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn tbs(version: Option<i64>) -> Value {
        let mut items = Vec::new();
        if let Some(version) = version {
            items.push(Value::explicit(0, Value::integer(version)));
        }
        items.push(Value::integer(7i64));
        for _ in 0..5 {
            items.push(Value::sequence(Vec::new()));
        }
        Value::sequence(items)
    }

    #[test]
    fn field_offsets() {
        let v1 = tbs(None);
        assert_eq!(version(&v1).unwrap(), 1);
        assert_eq!(
            field(&v1, SERIAL_NUMBER).unwrap().to_integer().unwrap().to_i64(),
            Some(7)
        );
        let v3 = tbs(Some(2));
        assert_eq!(version(&v3).unwrap(), 3);
        assert_eq!(
            field(&v3, SERIAL_NUMBER).unwrap().to_integer().unwrap().to_i64(),
            Some(7)
        );
        assert_eq!(
            field(&Value::sequence(Vec::new()), ISSUER),
            Err(SchemaError::MissingRequiredField("issuer"))
        );
    }

    #[test]
    fn extensions_wrapper() {
        let mut value = tbs(Some(2));
        assert_eq!(extensions(&value).unwrap(), None);
        extensions_mut(&mut value).unwrap().children_mut().unwrap().push(
            Value::null()
        );
        assert_eq!(value.children().unwrap().len(), 8);
        assert_eq!(
            extensions(&value).unwrap().unwrap().children().unwrap().len(), 1
        );
        extensions_mut(&mut value).unwrap().children_mut().unwrap().clear();
        assert_eq!(value.children().unwrap().len(), 8);
        remove_empty_extensions(&mut value).unwrap();
        assert_eq!(value.children().unwrap().len(), 7);
        assert_eq!(extensions(&value).unwrap(), None);
    }
}
