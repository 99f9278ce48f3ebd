//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ANS.1 to uniquely identify all sorts of things. The
//! type is also re-exported at the top-level.

use std::{cmp, error, fmt, hash};
use std::str::FromStr;
use bytes::Bytes;
use smallvec::SmallVec;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’ or with
/// the integers separated by white space and enclosed in curly braces such
/// as ‘{ 1 3 6 1 5 5 7 1 }’.
///
/// Values of this type keep a single object identifer in its BER encoding,
/// i.e., the content octets of an OBJECT IDENTIFIER value. Because
/// different representations may be useful, the type is generic over
/// something that can become a reference to a bytes slice. Values created
/// through [`from_content`][Oid::from_content] or
/// [`from_components`][Oid::from_components] are always well-formed.
///
/// Known object identifiers are typically defined in an `oid` submodule as
/// contants of `Oid<&'static [u8]>` – or its type alias `ConstOid`. The
/// crate ships with a `mkoid` binary which accepts object identifiers in
/// ‘dot integer’ notation and produces the `u8` array for their encoded
/// value.
///
/// Two object identifiers are equal if their component sequences are
/// equal. They are ordered by comparing their components one by one.
#[derive(Clone, Debug)]
pub struct Oid<T: AsRef<[u8]> = Bytes>(pub T);

/// A type alias for `Oid<&'static [u8]>.
///
/// This is useful when defining object identifier constants.
pub type ConstOid = Oid<&'static [u8]>;

/// The maximum number of components we keep on the stack.
type ComponentVec = SmallVec<[u64; 12]>;


/// # Creation
///
impl Oid<Bytes> {
    /// Creates an object identifier from its content octets.
    ///
    /// The content is checked for being a valid sequence of subidentifiers:
    /// it must not be empty, every subidentifier must be encoded in the
    /// shortest form, and the last octet must not have its continuation bit
    /// set.
    pub fn from_content(content: Bytes) -> Result<Self, OidError> {
        check_content(content.as_ref())?;
        Ok(Oid(content))
    }

    /// Creates an object identifier from a sequence of components.
    ///
    /// There must be at least two components. The first one must be 0, 1,
    /// or 2 and if it is 0 or 1, the second one must be less than 40.
    pub fn from_components(components: &[u64]) -> Result<Self, OidError> {
        let (first, second, tail) = match components {
            [first, second, tail @ ..] => (*first, *second, tail),
            _ => return Err(OidError::TooFewComponents),
        };
        if first > 2 {
            return Err(OidError::InvalidFirstComponent)
        }
        if first < 2 && second >= 40 {
            return Err(OidError::InvalidSecondComponent)
        }
        let mut res = Vec::new();
        append_subidentifier(
            u128::from(first) * 40 + u128::from(second), &mut res
        );
        for &component in tail {
            append_subidentifier(component.into(), &mut res)
        }
        Ok(Oid(res.into()))
    }
}

impl Oid<&'static [u8]> {
    /// Converts a constant into an owned object identifier.
    pub fn to_oid(&self) -> Oid {
        Oid(Bytes::from_static(self.0))
    }
}

/// # Access to Sub-identifiers
///
impl<T: AsRef<[u8]>> Oid<T> {
    /// Returns the content octets of the object identifier.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the object identifier into one backed by `Bytes`.
    pub fn to_bytes(&self) -> Oid {
        Oid(Bytes::copy_from_slice(self.0.as_ref()))
    }

    /// Returns an iterator to the components of this object identifiers.
    ///
    /// If the content octets are malformed, the iterator stops early.
    pub fn iter(&self) -> Iter {
        Iter::new(self.0.as_ref())
    }

    /// Returns the components as native integers.
    ///
    /// Fails if any component does not fit into a `u64` or if the content
    /// octets are malformed.
    pub fn components(&self) -> Result<ComponentVec, OidError> {
        check_content(self.0.as_ref())?;
        self.iter().map(|item| {
            item.to_u64().ok_or(OidError::Malformed)
        }).collect()
    }

    /// Returns an iterator over the encoded subidentifiers.
    fn subidentifiers(&self) -> Subidentifiers {
        Subidentifiers(self.0.as_ref())
    }
}


//--- AsRef

impl<T: AsRef<[u8]>> AsRef<[u8]> for Oid<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<Oid<U>> for Oid<T> {
    fn eq(&self, other: &Oid<U>) -> bool {
        // Subidentifiers are minimal, so equal components means equal
        // octets.
        self.0.as_ref() == other.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> Eq for Oid<T> { }


//--- PartialOrd and Ord

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialOrd<Oid<U>> for Oid<T> {
    fn partial_cmp(&self, other: &Oid<U>) -> Option<cmp::Ordering> {
        Some(self.subidentifiers().compare(other.subidentifiers()))
    }
}

impl<T: AsRef<[u8]>> Ord for Oid<T> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.subidentifiers().compare(other.subidentifiers())
    }
}


//--- Hash

impl<T: AsRef<[u8]>> hash::Hash for Oid<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- FromStr

impl FromStr for Oid<Bytes> {
    type Err = OidError;

    /// Parses an object identifier in dotted notation such as ‘2.5.4.3’.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s.split('.').map(|item| {
            if item.is_empty() || !item.bytes().all(|ch| ch.is_ascii_digit()) {
                return Err(OidError::InvalidDottedForm)
            }
            u64::from_str(item).map_err(|_| OidError::InvalidDottedForm)
        }).collect::<Result<ComponentVec, _>>()?;
        Self::from_components(&components)
    }
}


//--- Display

impl<T: AsRef<[u8]>> fmt::Display for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut components = self.iter();
        match components.next() {
            Some(first) => write!(f, "{}", first)?,
            None => return Ok(())
        }
        for component in components {
            write!(f, ".{}", component)?;
        }
        Ok(())
    }
}


//------------ Component -----------------------------------------------------

/// A component of an object identifier.
///
/// Although these components are integers, they are encoded in a slightly
/// inconvenient way. Because of this we don’t convert them to native integers
/// but rather keep them as references to the underlying octets.
///
/// This type allows comparison and formatting, which hopefully is all you’ll
/// need. If you insist, the method `to_u64` allows you to try to convert a
/// component to a native integer.
#[derive(Clone, Copy, Debug)]
pub struct Component<'a> {
    /// The position of the component in the object identifer.
    position: Position,

    /// The octets of the subidentifer.
    ///
    /// These octets translate to an integer value. The most significant bit
    /// of each octet indicates whether there are more octets to follow (and
    /// can thus be ignored in this context), the lower seven bits are then
    /// shifted accordingly to make up an unsigned integer in big endian
    /// notation.
    slice: &'a [u8],
}

/// The position of the component in the object identifier.
///
/// As the first two components of the object identifer are encoded in the
/// first subidentifier of the encoded value, we have three different cases.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Position {
    /// This is the first component of the identifier.
    ///
    /// This is 0 if the integer value of the subidentifer is 0..39,
    /// 1 for 40..79, and 2 for anything else.
    First,

    /// This is the second component of the identifier.
    ///
    /// This is the integer value of the subidentifer module 40 if the value
    /// is below 80 and otherwise the value minus 80.
    Second,

    /// This is any later component of the identifier.
    ///
    /// This is identical to the integer value of the subidentifier.
    Other,
}

impl<'a> Component<'a> {
    /// Attempts to convert the component to `u64`.
    ///
    /// Since the component’s value can be larger than the maximum value of
    /// a `u64`, this may fail in which case the method will return `None`.
    pub fn to_u64(self) -> Option<u64> {
        match self.position {
            Position::First => {
                // A first component is always small, even if the
                // subidentifier isn’t.
                match self.value() {
                    Some(res) if res < 40 => Some(0),
                    Some(res) if res < 80 => Some(1),
                    _ => Some(2)
                }
            }
            Position::Second => {
                let res = self.value()?;
                let res = if res < 80 { res % 40 } else { res - 80 };
                u64::try_from(res).ok()
            }
            Position::Other => {
                u64::try_from(self.value()?).ok()
            }
        }
    }

    /// Returns the value of the subidentifier if it fits into a `u128`.
    fn value(self) -> Option<u128> {
        let mut res = 0u128;
        for &ch in self.slice {
            if res.leading_zeros() < 7 {
                return None
            }
            res = res << 7 | u128::from(ch & 0x7F);
        }
        Some(res)
    }

    /// Returns the decimal digits of the component, most significant first.
    ///
    /// This works for any size of the component.
    fn decimal(self) -> Vec<u8> {
        // Little endian decimal digits.
        let mut digits = vec![0u8];
        for &ch in self.slice {
            let mut carry = u32::from(ch & 0x7F);
            for digit in digits.iter_mut() {
                let val = u32::from(*digit) * 128 + carry;
                *digit = (val % 10) as u8;
                carry = val / 10;
            }
            while carry > 0 {
                digits.push((carry % 10) as u8);
                carry /= 10;
            }
        }
        if self.position == Position::Second {
            // We only get here with values of at least 80.
            let mut borrow = 80u32;
            for digit in digits.iter_mut() {
                let sub = borrow % 10;
                borrow /= 10;
                if u32::from(*digit) < sub {
                    *digit = (u32::from(*digit) + 10 - sub) as u8;
                    borrow += 1;
                }
                else {
                    *digit -= sub as u8;
                }
                if borrow == 0 {
                    break
                }
            }
            while digits.len() > 1 && digits.last() == Some(&0) {
                digits.pop();
            }
        }
        digits.reverse();
        digits
    }
}


//--- PartialEq and Eq

impl<'a> PartialEq for Component<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self.to_u64(), other.to_u64()) {
            (Some(left), Some(right)) => left == right,
            _ => self.position == other.position && self.slice == other.slice
        }
    }
}

impl<'a> Eq for Component<'a> { }


//--- Display

impl<'a> fmt::Display for Component<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(value) = self.to_u64() {
            return write!(f, "{}", value)
        }
        for digit in self.decimal() {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}


//------------ Iter ----------------------------------------------------------

/// An iterator over the components in an object identifier.
pub struct Iter<'a> {
    /// The remainder of the object identifier’s encoded octets.
    slice: &'a [u8],

    /// The position of the next component.
    position: Position,
}

impl<'a> Iter<'a> {
    /// Creates a new iterator.
    fn new(slice: &'a [u8]) -> Self {
        Iter {
            slice,
            position: Position::First
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (subid, tail) = match self.position {
            Position::First => (Subidentifiers(self.slice).next()?, self.slice),
            _ => {
                let mut subids = Subidentifiers(self.slice);
                let res = subids.next()?;
                (res, subids.0)
            }
        };
        let res = Component { position: self.position, slice: subid };
        self.slice = tail;
        self.position = match self.position {
            Position::First => Position::Second,
            _ => Position::Other,
        };
        Some(res)
    }
}


//------------ Subidentifiers ------------------------------------------------

/// An iterator over the encoded subidentifiers.
struct Subidentifiers<'a>(&'a [u8]);

impl<'a> Subidentifiers<'a> {
    /// Compares two sequences of subidentifiers.
    ///
    /// Since subidentifiers are minimally encoded, a shorter one is always
    /// smaller and ones of equal length compare like their octets. This
    /// also holds for the first subidentifier and its two components.
    fn compare(self, other: Subidentifiers) -> cmp::Ordering {
        Iterator::cmp(
            self.map(|s| (s.len(), s)),
            other.map(|s| (s.len(), s)),
        )
    }
}

impl<'a> Iterator for Subidentifiers<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.0.iter().position(|ch| ch & 0x80 == 0)?;
        let (res, tail) = self.0.split_at(end + 1);
        self.0 = tail;
        Some(res)
    }
}


//------------ Helper Functions ----------------------------------------------

/// Checks that `content` is a valid sequence of subidentifiers.
fn check_content(content: &[u8]) -> Result<(), OidError> {
    match content.last() {
        None => return Err(OidError::Malformed),
        Some(last) if last & 0x80 != 0 => return Err(OidError::Malformed),
        _ => { }
    }
    let mut start = true;
    for &ch in content {
        if start && ch == 0x80 {
            return Err(OidError::Malformed)
        }
        start = ch & 0x80 == 0;
    }
    Ok(())
}

/// Appends the base 128 encoding of a subidentifier.
fn append_subidentifier(mut value: u128, target: &mut Vec<u8>) {
    let mut buf = [0u8; 19];
    let mut idx = buf.len() - 1;
    buf[idx] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        idx -= 1;
        buf[idx] = (value & 0x7F) as u8 | 0x80;
        value >>= 7;
    }
    target.extend_from_slice(&buf[idx..]);
}


//------------ OidError ------------------------------------------------------

/// An object identifier could not be created.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OidError {
    /// There were less than two components.
    TooFewComponents,

    /// The first component was larger than 2.
    InvalidFirstComponent,

    /// The second component was 40 or more under an arc of 0 or 1.
    InvalidSecondComponent,

    /// The content octets were not a valid object identifier.
    Malformed,

    /// The string was not in dotted integer notation.
    InvalidDottedForm,
}

impl fmt::Display for OidError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            OidError::TooFewComponents => "less than two components",
            OidError::InvalidFirstComponent => "invalid first component",
            OidError::InvalidSecondComponent => "invalid second component",
            OidError::Malformed => "malformed object identifier",
            OidError::InvalidDottedForm => "invalid dotted notation",
        })
    }
}

impl error::Error for OidError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const CN: ConstOid = Oid(&[85, 4, 3]);

    fn oid(s: &str) -> Oid {
        Oid::from_str(s).unwrap()
    }

    #[test]
    fn from_components() {
        assert_eq!(Oid::from_components(&[2, 5, 4, 3]).unwrap(), CN);
        assert_eq!(
            Oid::from_components(&[1, 2, 840, 113549, 1, 1, 1])
                .unwrap().as_slice(),
            b"\x2a\x86\x48\x86\xf7\x0d\x01\x01\x01"
        );
        assert_eq!(
            Oid::from_components(&[2, 999, 3]).unwrap().as_slice(),
            b"\x88\x37\x03"
        );
        assert_eq!(
            Oid::from_components(&[1]), Err(OidError::TooFewComponents)
        );
        assert_eq!(
            Oid::from_components(&[3, 1]),
            Err(OidError::InvalidFirstComponent)
        );
        assert_eq!(
            Oid::from_components(&[1, 40]),
            Err(OidError::InvalidSecondComponent)
        );
    }

    #[test]
    fn components() {
        for s in [
            "0.0", "1.39", "2.5.4.3", "2.999.3", "1.2.840.113549.1.9.1",
            "1.3.6.1.4.1.18446744073709551615",
        ] {
            let oid = oid(s);
            assert_eq!(oid.to_string(), s);
            let parsed: Vec<String> = s.split('.').map(Into::into).collect();
            let components: Vec<String> = oid.components().unwrap()
                .iter().map(ToString::to_string).collect();
            assert_eq!(components, parsed);
        }
    }

    #[test]
    fn from_content() {
        assert!(Oid::from_content(Bytes::from_static(b"\x55\x04\x03")).is_ok());
        assert_eq!(
            Oid::from_content(Bytes::new()), Err(OidError::Malformed)
        );
        assert_eq!(
            Oid::from_content(Bytes::from_static(b"\x55\x84")),
            Err(OidError::Malformed)
        );
        assert_eq!(
            Oid::from_content(Bytes::from_static(b"\x55\x80\x04")),
            Err(OidError::Malformed)
        );
    }

    #[test]
    fn overflowing_component() {
        let oid = Oid::from_content(Bytes::from_static(
            b"\x2a\x82\x80\x80\x80\x80\x80\x80\x80\x80\x00"
        )).unwrap();
        assert_eq!(oid.components(), Err(OidError::Malformed));
        assert_eq!(oid.to_string(), "1.2.18446744073709551616");
    }

    #[test]
    fn dotted_form() {
        assert_eq!("1..2".parse::<Oid>(), Err(OidError::InvalidDottedForm));
        assert_eq!("1.2a".parse::<Oid>(), Err(OidError::InvalidDottedForm));
        assert_eq!("+1.2".parse::<Oid>(), Err(OidError::InvalidDottedForm));
        assert_eq!("".parse::<Oid>(), Err(OidError::InvalidDottedForm));
        assert_eq!("7".parse::<Oid>(), Err(OidError::TooFewComponents));
    }

    #[test]
    fn ordering() {
        let mut oids = vec![
            oid("2.5.4.3"), oid("1.2.840"), oid("2.5.4"), oid("2.5.4.200"),
            oid("0.39"), oid("2.100"), oid("2.5.4.42"),
        ];
        oids.sort();
        let sorted: Vec<String> = oids.iter().map(ToString::to_string)
            .collect();
        assert_eq!(
            sorted,
            [
                "0.39", "1.2.840", "2.5.4", "2.5.4.3", "2.5.4.42",
                "2.5.4.200", "2.100",
            ]
        );
        assert_eq!(CN, oid("2.5.4.3"));
        assert_ne!(CN, oid("2.5.4.4"));
    }
}
