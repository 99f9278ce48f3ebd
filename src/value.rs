//! The generic value tree.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt, str};
use std::borrow::Cow;
use bytes::Bytes;
use crate::captured::Captured;
use crate::encode::{self, EncodeError};
use crate::int::Integer;
use crate::mode::Mode;
use crate::oid::Oid;
use crate::string::{self, BitString, Ia5CharSet, PrintableCharSet};
use crate::tag::{Class, Tag};
use crate::time::Time;


//------------ Value ---------------------------------------------------------

/// A single BER encoded value.
///
/// A value consists of its tag and its content. The content is either
/// primitive, in which case it is kept as its raw content octets, or
/// constructed, in which case it is a sequence of further values.
///
/// The content octets of a primitive value are never interpreted when the
/// value is created. Instead, the various `to_*` methods try to interpret
/// them as the type expected at the point of access. They return a
/// [`SchemaError`] if the value isn’t what they expect.
///
/// A value decoded from BER data keeps the octets it was decoded from.
/// These are available via [`captured`][Self::captured]. They are ignored
/// when comparing values, which compare by their DER encoding. Modifying a
/// value through one of the `_mut` methods drops them.
#[derive(Clone, Debug)]
pub struct Value {
    /// The tag of the value.
    tag: Tag,

    /// The content of the value.
    content: Content,

    /// The complete encoding the value was decoded from, if any.
    captured: Option<Captured>,
}

/// # Creation
///
impl Value {
    /// Creates a primitive value.
    pub fn primitive(tag: Tag, content: impl Into<Bytes>) -> Self {
        Value { tag, content: Content::Primitive(content.into()), captured: None }
    }

    /// Creates a constructed value.
    pub fn constructed(tag: Tag, values: Vec<Value>) -> Self {
        Value { tag, content: Content::Constructed(values), captured: None }
    }

    /// Creates a BOOLEAN value.
    pub fn boolean(value: bool) -> Self {
        Self::primitive(
            Tag::BOOLEAN,
            Bytes::from_static(if value { b"\xFF" } else { b"\x00" })
        )
    }

    /// Creates an INTEGER value.
    pub fn integer(value: impl Into<Integer>) -> Self {
        Self::primitive(
            Tag::INTEGER,
            Bytes::copy_from_slice(value.into().as_slice())
        )
    }

    /// Creates an OCTET STRING value.
    pub fn octet_string(content: impl Into<Bytes>) -> Self {
        Self::primitive(Tag::OCTET_STRING, content)
    }

    /// Creates a BIT STRING value.
    pub fn bit_string(bits: &BitString) -> Self {
        Self::primitive(Tag::BIT_STRING, bits.to_content())
    }

    /// Creates a NULL value.
    pub fn null() -> Self {
        Self::primitive(Tag::NULL, Bytes::new())
    }

    /// Creates an OBJECT IDENTIFIER value.
    pub fn oid<T: AsRef<[u8]>>(oid: &Oid<T>) -> Self {
        Self::primitive(Tag::OID, Bytes::copy_from_slice(oid.as_slice()))
    }

    /// Creates a UTF8String value.
    pub fn utf8_string(s: &str) -> Self {
        Self::primitive(Tag::UTF8_STRING, Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Creates a PrintableString value.
    ///
    /// Fails if the string contains characters not allowed in this type.
    pub fn printable_string(s: &str) -> Result<Self, SchemaError> {
        if !PrintableCharSet::check_slice(s.as_bytes()) {
            xerr!(return Err(SchemaError::InvalidValue(Tag::PRINTABLE_STRING)))
        }
        Ok(Self::primitive(
            Tag::PRINTABLE_STRING, Bytes::copy_from_slice(s.as_bytes())
        ))
    }

    /// Creates an IA5String value.
    ///
    /// Fails if the string contains non-ASCII characters.
    pub fn ia5_string(s: &str) -> Result<Self, SchemaError> {
        if !Ia5CharSet::check_slice(s.as_bytes()) {
            xerr!(return Err(SchemaError::InvalidValue(Tag::IA5_STRING)))
        }
        Ok(Self::primitive(
            Tag::IA5_STRING, Bytes::copy_from_slice(s.as_bytes())
        ))
    }

    /// Creates a UTCTime or GeneralizedTime value.
    pub fn time(time: Time) -> Self {
        time.to_value()
    }

    /// Creates a SEQUENCE value.
    pub fn sequence(values: Vec<Value>) -> Self {
        Self::constructed(Tag::SEQUENCE, values)
    }

    /// Creates a SET value.
    ///
    /// The elements will be put in the correct order when encoding.
    pub fn set(values: Vec<Value>) -> Self {
        Self::constructed(Tag::SET, values)
    }

    /// Creates an explicitly tagged value with a context specific tag.
    pub fn explicit(number: u32, value: Value) -> Self {
        Self::constructed(Tag::ctx(number), vec![value])
    }

    /// Adds the captured encoding to a decoded value.
    pub(crate) fn with_captured(mut self, captured: Captured) -> Self {
        self.captured = Some(captured);
        self
    }
}

/// # Access to the Raw Parts
///
impl Value {
    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the content of the value.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Returns a mutable reference to the content of the value.
    ///
    /// This drops the captured encoding.
    pub fn content_mut(&mut self) -> &mut Content {
        self.captured = None;
        &mut self.content
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(&self) -> bool {
        matches!(self.content, Content::Constructed(_))
    }

    /// Returns the encoding this value was decoded from.
    ///
    /// Returns `None` for values that were not decoded or have been
    /// modified since.
    pub fn captured(&self) -> Option<&Captured> {
        self.captured.as_ref()
    }

    /// Returns the DER encoding of the value.
    pub fn to_der(&self) -> Result<Vec<u8>, EncodeError> {
        encode::to_vec(self)
    }
}

/// # Typed Projections
///
impl Value {
    /// Returns the typed interpretation of the value.
    ///
    /// Universal types the crate knows about are interpreted according to
    /// their tag. Context specific values keep their content. Everything
    /// else is returned as [`Kind::Other`].
    pub fn kind(&self) -> Result<Kind, SchemaError> {
        if self.tag.class() == Class::ContextSpecific {
            return Ok(Kind::ContextSpecific(self.tag.number(), &self.content))
        }
        Ok(match self.tag {
            Tag::BOOLEAN => Kind::Boolean(self.to_bool()?),
            Tag::INTEGER => Kind::Integer(self.to_integer()?),
            Tag::OCTET_STRING if !self.is_constructed() => {
                Kind::OctetString(self.to_octets()?.as_ref())
            }
            Tag::BIT_STRING if !self.is_constructed() => {
                Kind::BitString(self.to_bit_string()?)
            }
            Tag::UTF8_STRING if !self.is_constructed() => {
                Kind::Utf8String(self.borrowed_str()?)
            }
            Tag::PRINTABLE_STRING if !self.is_constructed() => {
                Kind::PrintableString(self.borrowed_str()?)
            }
            Tag::IA5_STRING if !self.is_constructed() => {
                Kind::Ia5String(self.borrowed_str()?)
            }
            Tag::UTC_TIME => Kind::UtcTime(self.to_time()?),
            Tag::GENERALIZED_TIME => Kind::GeneralizedTime(self.to_time()?),
            Tag::NULL => {
                if !self.to_octets()?.is_empty() {
                    xerr!(return Err(SchemaError::InvalidValue(Tag::NULL)))
                }
                Kind::Null
            }
            Tag::OID => Kind::ObjectIdentifier(self.to_oid()?),
            Tag::SEQUENCE => Kind::Sequence(self.children()?),
            Tag::SET => Kind::Set(self.children()?),
            _ => Kind::Other(self)
        })
    }

    /// Checks that the value has the given tag.
    pub fn expect_tag(&self, tag: Tag) -> Result<&Self, SchemaError> {
        if self.tag == tag {
            Ok(self)
        }
        else {
            xerr!(Err(SchemaError::UnexpectedType {
                expected: tag, found: self.tag
            }))
        }
    }

    /// Returns the elements of a constructed value.
    pub fn children(&self) -> Result<&[Value], SchemaError> {
        match self.content {
            Content::Constructed(ref values) => Ok(values),
            Content::Primitive(_) => {
                xerr!(Err(SchemaError::InvalidValue(self.tag)))
            }
        }
    }

    /// Returns the elements of a constructed value for modification.
    ///
    /// This drops the captured encoding.
    pub fn children_mut(&mut self) -> Result<&mut Vec<Value>, SchemaError> {
        let tag = self.tag;
        match self.content_mut() {
            Content::Constructed(values) => Ok(values),
            Content::Primitive(_) => {
                xerr!(Err(SchemaError::InvalidValue(tag)))
            }
        }
    }

    /// Returns the element at `index` of a constructed value.
    ///
    /// If there is no such element, returns a missing field error naming
    /// `field`.
    pub fn child(
        &self, index: usize, field: &'static str
    ) -> Result<&Value, SchemaError> {
        match self.children()?.get(index) {
            Some(value) => Ok(value),
            None => xerr!(Err(SchemaError::MissingRequiredField(field)))
        }
    }

    /// Returns the content octets of a primitive value.
    pub fn to_octets(&self) -> Result<&Bytes, SchemaError> {
        match self.content {
            Content::Primitive(ref content) => Ok(content),
            Content::Constructed(_) => {
                xerr!(Err(SchemaError::InvalidValue(self.tag)))
            }
        }
    }

    /// Interprets the value as a BOOLEAN.
    ///
    /// Any non-zero content octet means true.
    pub fn to_bool(&self) -> Result<bool, SchemaError> {
        match self.expect_tag(Tag::BOOLEAN)?.to_octets()?.as_ref() {
            [value] => Ok(*value != 0),
            _ => xerr!(Err(SchemaError::InvalidValue(Tag::BOOLEAN)))
        }
    }

    /// Interprets the value as an INTEGER.
    pub fn to_integer(&self) -> Result<Integer, SchemaError> {
        self.to_integer_tagged(Tag::INTEGER)
    }

    /// Interprets the value as an implicitly tagged INTEGER.
    pub fn to_integer_tagged(&self, tag: Tag) -> Result<Integer, SchemaError> {
        Integer::from_content(
            self.expect_tag(tag)?.to_octets()?.clone(), Mode::Ber
        )
    }

    /// Interprets the value as an OBJECT IDENTIFIER.
    pub fn to_oid(&self) -> Result<Oid, SchemaError> {
        Oid::from_content(self.expect_tag(Tag::OID)?.to_octets()?.clone())
            .map_err(|_| SchemaError::InvalidValue(Tag::OID))
    }

    /// Interprets the value as a primitive BIT STRING.
    pub fn to_bit_string(&self) -> Result<BitString, SchemaError> {
        BitString::from_content(
            self.expect_tag(Tag::BIT_STRING)?.to_octets()?.clone()
        )
    }

    /// Interprets the value as a character string.
    ///
    /// This works for all the restricted character string types commonly
    /// found in certificates.
    pub fn to_str(&self) -> Result<Cow<str>, SchemaError> {
        let content = self.to_octets()?;
        match string::decode_string(self.tag, content.as_ref()) {
            Some(Ok(res)) => Ok(res),
            Some(Err(_)) => xerr!(Err(SchemaError::InvalidValue(self.tag))),
            None => xerr!(Err(SchemaError::UnexpectedType {
                expected: Tag::UTF8_STRING, found: self.tag
            }))
        }
    }

    /// Interprets the value as either a UTCTime or GeneralizedTime.
    pub fn to_time(&self) -> Result<Time, SchemaError> {
        match self.tag {
            Tag::UTC_TIME => Time::from_utc_time(self.to_octets()?),
            Tag::GENERALIZED_TIME => {
                Time::from_generalized_time(self.to_octets()?)
            }
            found => xerr!(Err(SchemaError::UnexpectedType {
                expected: Tag::UTC_TIME, found
            }))
        }
    }

    /// Returns the content of a string type that is always valid UTF-8.
    fn borrowed_str(&self) -> Result<&str, SchemaError> {
        match self.to_str()? {
            Cow::Borrowed(_) => {
                str::from_utf8(self.to_octets()?.as_ref()).map_err(|_| {
                    SchemaError::InvalidValue(self.tag)
                })
            }
            Cow::Owned(_) => xerr!(Err(SchemaError::InvalidValue(self.tag)))
        }
    }
}


//--- PartialEq and Eq

/// Two values are equal if they have the same DER encoding.
///
/// The order of SET elements doesn’t matter, neither does the form of
/// strings or non-canonical BOOLEAN, INTEGER, and BIT STRING content. Values
/// that can’t be encoded are only equal to each other if their tags and
/// contents are.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.tag != other.tag {
            return false
        }
        match (self.to_der(), other.to_der()) {
            (Ok(left), Ok(right)) => left == right,
            (Err(_), Err(_)) => self.content == other.content,
            _ => false,
        }
    }
}

impl Eq for Value { }


//------------ Content -------------------------------------------------------

/// The content of a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Content {
    /// The content octets of a primitive value.
    Primitive(Bytes),

    /// The elements of a constructed value.
    Constructed(Vec<Value>),
}


//------------ Kind ----------------------------------------------------------

/// The typed interpretation of a value.
#[derive(Clone, Debug)]
pub enum Kind<'a> {
    Boolean(bool),
    Integer(Integer),
    OctetString(&'a [u8]),
    BitString(BitString),
    Utf8String(&'a str),
    PrintableString(&'a str),
    Ia5String(&'a str),
    UtcTime(Time),
    GeneralizedTime(Time),
    Null,
    ObjectIdentifier(Oid),
    Sequence(&'a [Value]),
    Set(&'a [Value]),

    /// A value with a context specific tag of the given number.
    ContextSpecific(u32, &'a Content),

    /// Any other value.
    Other(&'a Value),
}


//------------ SchemaError ---------------------------------------------------

/// A value did not match the structure expected of it.
///
/// These errors are produced when accessing the content of a value and
/// only affect that particular access.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchemaError {
    /// A required field was not present.
    MissingRequiredField(&'static str),

    /// A value had a different tag than expected.
    UnexpectedType {
        /// The tag that was expected.
        expected: Tag,

        /// The tag that was found.
        found: Tag,
    },

    /// A value with the given tag had content that couldn’t be decoded.
    InvalidValue(Tag),

    /// An extension marked critical was not understood.
    UnknownCriticalExtension(Oid),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SchemaError::MissingRequiredField(field) => {
                write!(f, "missing required field '{}'", field)
            }
            SchemaError::UnexpectedType { expected, found } => {
                write!(f, "expected {} but found {}", expected, found)
            }
            SchemaError::InvalidValue(tag) => {
                write!(f, "invalid {} value", tag)
            }
            SchemaError::UnknownCriticalExtension(ref oid) => {
                write!(f, "unknown critical extension {}", oid)
            }
        }
    }
}

impl error::Error for SchemaError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn typed_projections() {
        let value = Value::sequence(vec![
            Value::boolean(true),
            Value::integer(-5i64),
            Value::oid(&Oid::from_components(&[2, 5, 4, 3]).unwrap()),
            Value::printable_string("Alice").unwrap(),
            Value::explicit(3, Value::null()),
        ]);
        let children = value.children().unwrap();
        assert!(children[0].to_bool().unwrap());
        assert_eq!(children[1].to_integer().unwrap().to_i64(), Some(-5));
        assert_eq!(children[2].to_oid().unwrap().to_string(), "2.5.4.3");
        assert_eq!(children[3].to_str().unwrap(), "Alice");
        assert!(matches!(
            children[3].kind().unwrap(), Kind::PrintableString("Alice")
        ));
        assert!(matches!(
            children[4].kind().unwrap(), Kind::ContextSpecific(3, _)
        ));
        assert!(matches!(value.kind().unwrap(), Kind::Sequence(items)
            if items.len() == 5
        ));
    }

    #[test]
    fn schema_errors() {
        let value = Value::integer(1i64);
        assert_eq!(
            value.to_bool(),
            Err(SchemaError::UnexpectedType {
                expected: Tag::BOOLEAN, found: Tag::INTEGER
            })
        );
        assert_eq!(value.children(), Err(SchemaError::InvalidValue(Tag::INTEGER)));
        assert_eq!(
            Value::sequence(Vec::new()).child(0, "version"),
            Err(SchemaError::MissingRequiredField("version"))
        );
        assert!(Value::primitive(Tag::OID, Bytes::new()).to_oid().is_err());
        assert!(Value::primitive(Tag::BOOLEAN, Bytes::new()).to_bool().is_err());
        assert!(Value::printable_string("a@b").is_err());
        assert!(Value::ia5_string("é").is_err());
    }

    #[test]
    fn mutation_drops_captured() {
        let mut value = Value::sequence(vec![Value::null()]).with_captured(
            Captured::from_bytes(Bytes::from_static(b"\x30\x02\x05\x00"))
        );
        assert!(value.captured().is_some());
        value.children_mut().unwrap().push(Value::null());
        assert!(value.captured().is_none());
    }
}
