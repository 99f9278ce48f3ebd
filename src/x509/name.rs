//! Distinguished names.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::oid::{ConstOid, Oid};
use crate::string::is_printable;
use crate::tag::Tag;
use crate::value::{SchemaError, Value};
use super::error::RequestError;
use super::oid;


//------------ Name ----------------------------------------------------------

/// A view on a distinguished name.
///
/// ```text
/// Name ::= CHOICE { -- only one possibility for now --
///     rdnSequence  RDNSequence }
///
/// RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
///
/// RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue
///
/// AttributeTypeAndValue ::= SEQUENCE {
///     type     AttributeType,
///     value    AttributeValue }
/// ```
///
/// The view refers to the name’s value inside a certificate. Attribute
/// values are only converted into strings when asked for. Two names are
/// equal if their values are structurally equal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Name<'a> {
    value: &'a Value,
}

impl<'a> Name<'a> {
    /// Creates a name view atop a value.
    pub fn from_value(value: &'a Value) -> Result<Self, SchemaError> {
        value.expect_tag(Tag::SEQUENCE)?.children()?;
        Ok(Name { value })
    }

    /// Returns the underlying value.
    pub fn as_value(&self) -> &'a Value {
        self.value
    }

    /// Returns whether the name has no attributes at all.
    pub fn is_empty(&self) -> bool {
        match self.pairs() {
            Ok(pairs) => pairs.is_empty(),
            Err(_) => false,
        }
    }

    /// Returns all attributes in order as pairs of type and string value.
    ///
    /// Fails if any attribute value isn’t a string.
    pub fn attributes(&self) -> Result<Vec<(Oid, String)>, SchemaError> {
        self.pairs()?.into_iter().map(|(oid, value)| {
            Ok((oid, value.to_str()?.into_owned()))
        }).collect()
    }

    /// Returns the string values of all attributes of the given type.
    pub fn strings_for_oid<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Result<Vec<String>, SchemaError> {
        let mut res = Vec::new();
        for (attr_type, value) in self.pairs()? {
            if attr_type == *oid {
                res.push(value.to_str()?.into_owned())
            }
        }
        Ok(res)
    }

    /// Returns the string value of the first attribute of the given type.
    pub fn string_for_oid<T: AsRef<[u8]>>(
        &self, oid: &Oid<T>
    ) -> Result<Option<String>, SchemaError> {
        for (attr_type, value) in self.pairs()? {
            if attr_type == *oid {
                return value.to_str().map(|s| Some(s.into_owned()))
            }
        }
        Ok(None)
    }

    /// Returns the common name.
    pub fn common_name(&self) -> Result<Option<String>, SchemaError> {
        self.string_for_oid(&oid::AT_COMMON_NAME)
    }

    /// Returns the given name.
    pub fn given_name(&self) -> Result<Option<String>, SchemaError> {
        self.string_for_oid(&oid::AT_GIVEN_NAME)
    }

    /// Returns the surname.
    pub fn surname(&self) -> Result<Option<String>, SchemaError> {
        self.string_for_oid(&oid::AT_SURNAME)
    }

    /// Returns the description.
    pub fn description(&self) -> Result<Option<String>, SchemaError> {
        self.string_for_oid(&oid::AT_DESCRIPTION)
    }

    /// Returns the first email address.
    pub fn email_address(&self) -> Result<Option<String>, SchemaError> {
        self.string_for_oid(&oid::EMAIL_ADDRESS)
    }

    /// Returns all email addresses.
    pub fn email_addresses(&self) -> Result<Vec<String>, SchemaError> {
        self.strings_for_oid(&oid::EMAIL_ADDRESS)
    }

    /// Returns the types and values of all attributes in order.
    fn pairs(&self) -> Result<Vec<(Oid, &'a Value)>, SchemaError> {
        let mut res = Vec::new();
        for rdn in self.value.children()? {
            for atv in rdn.expect_tag(Tag::SET)?.children()? {
                atv.expect_tag(Tag::SEQUENCE)?;
                res.push((
                    atv.child(0, "type")?.to_oid()?,
                    atv.child(1, "value")?
                ));
            }
        }
        Ok(res)
    }
}


//------------ NameMut -------------------------------------------------------

/// A view on a distinguished name that allows changing it.
///
/// This is only available for names of certificate requests that haven’t
/// been signed yet.
#[derive(Debug)]
pub struct NameMut<'a> {
    value: &'a mut Value,
}

impl<'a> NameMut<'a> {
    pub(crate) fn new(value: &'a mut Value) -> Self {
        NameMut { value }
    }

    /// Returns a read-only view on the name.
    pub fn as_name(&self) -> Result<Name, SchemaError> {
        Name::from_value(&*self.value)
    }

    /// Sets the value of the attribute of the given type.
    ///
    /// If there already are attributes of this type, the first one is
    /// changed in place and all others are removed. Otherwise a new
    /// relative distinguished name is added at the end. If `value` is
    /// `None`, all attributes of the type are removed.
    pub fn set_string_for_oid<T: AsRef<[u8]>>(
        &mut self, oid: &Oid<T>, value: Option<&str>
    ) -> Result<(), RequestError> {
        let new = match value {
            Some(value) => Some(string_value(oid, value)?),
            None => None,
        };

        // Find all attributes of the type first so that a malformed name
        // is left untouched.
        let mut found = Vec::new();
        for (rdn_idx, rdn) in self.value.children()?.iter().enumerate() {
            for (atv_idx, atv) in rdn.children()?.iter().enumerate() {
                if atv.child(0, "type")?.to_oid()? != *oid {
                    continue
                }
                if found.is_empty() && new.is_some()
                    && atv.children()?.len() != 2
                {
                    xerr!(return Err(
                        SchemaError::InvalidValue(Tag::SEQUENCE).into()
                    ))
                }
                found.push((rdn_idx, atv_idx));
            }
        }

        let rdns = self.value.children_mut()?;
        let mut found = found.into_iter();
        if let Some(value) = new {
            match found.next() {
                Some((rdn, atv)) => {
                    rdns[rdn].children_mut()?[atv].children_mut()?[1] = value
                }
                None => rdns.push(relative_name(oid, value)),
            }
        }
        for (rdn, atv) in found.rev() {
            rdns[rdn].children_mut()?.remove(atv);
        }
        rdns.retain(|rdn| {
            !matches!(rdn.children(), Ok(items) if items.is_empty())
        });
        Ok(())
    }

    /// Adds an attribute of the given type.
    ///
    /// Existing attributes of the type are kept. This can be used for
    /// adding multiple email addresses.
    pub fn add_string_for_oid<T: AsRef<[u8]>>(
        &mut self, oid: &Oid<T>, value: &str
    ) -> Result<(), RequestError> {
        let value = string_value(oid, value)?;
        self.value.children_mut()?.push(relative_name(oid, value));
        Ok(())
    }

    /// Sets or removes the common name.
    pub fn set_common_name(
        &mut self, value: Option<&str>
    ) -> Result<(), RequestError> {
        self.set_string_for_oid(&oid::AT_COMMON_NAME, value)
    }

    /// Sets or removes the given name.
    pub fn set_given_name(
        &mut self, value: Option<&str>
    ) -> Result<(), RequestError> {
        self.set_string_for_oid(&oid::AT_GIVEN_NAME, value)
    }

    /// Sets or removes the surname.
    pub fn set_surname(
        &mut self, value: Option<&str>
    ) -> Result<(), RequestError> {
        self.set_string_for_oid(&oid::AT_SURNAME, value)
    }

    /// Sets or removes the description.
    pub fn set_description(
        &mut self, value: Option<&str>
    ) -> Result<(), RequestError> {
        self.set_string_for_oid(&oid::AT_DESCRIPTION, value)
    }

    /// Sets or removes the email address.
    pub fn set_email_address(
        &mut self, value: Option<&str>
    ) -> Result<(), RequestError> {
        self.set_string_for_oid(&oid::EMAIL_ADDRESS, value)
    }

    /// Adds another email address.
    pub fn add_email_address(
        &mut self, value: &str
    ) -> Result<(), RequestError> {
        self.add_string_for_oid(&oid::EMAIL_ADDRESS, value)
    }
}


//------------ Helper Functions ----------------------------------------------

/// Attribute types whose values must be IA5Strings.
const IA5_ATTRIBUTES: &[ConstOid] = &[oid::EMAIL_ADDRESS];

/// Creates the value for an attribute.
///
/// Uses a PrintableString if possible and a UTF8String otherwise.
fn string_value<T: AsRef<[u8]>>(
    oid: &Oid<T>, value: &str
) -> Result<Value, SchemaError> {
    if IA5_ATTRIBUTES.iter().any(|item| item == oid) {
        Value::ia5_string(value)
    }
    else if is_printable(value) {
        Value::printable_string(value)
    }
    else {
        Ok(Value::utf8_string(value))
    }
}

/// Creates a relative distinguished name with a single attribute.
fn relative_name<T: AsRef<[u8]>>(oid: &Oid<T>, value: Value) -> Value {
    Value::set(vec![Value::sequence(vec![Value::oid(oid), value])])
}


//============ Tests =========================================================
