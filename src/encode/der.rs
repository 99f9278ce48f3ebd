//! Encoding value trees in DER.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use crate::int::Integer;
use crate::length::Length;
use crate::string::BitString;
use crate::tag::Tag;
use crate::value::{Content, Value};
use super::error::EncodeError;


//============ Standard Functions ============================================

/// Returns the DER encoding of a value.
pub fn to_vec(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut target = Vec::new();
    append_value(value, &mut target)?;
    Ok(target)
}

/// Appends the DER encoding of a value to the end of `target`.
///
/// The content of primitive BOOLEAN, INTEGER, and BIT STRING values is
/// brought into canonical form, string types in constructed form are
/// joined into a single primitive value, and the elements of SET values
/// are sorted by their encoding. If the function fails, `target` may
/// contain a partial encoding.
pub fn append_value(
    value: &Value, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    match *value.content() {
        Content::Primitive(ref content) => {
            let content = canonical_content(value.tag(), content.as_ref())?;
            append_header(target, value.tag(), false, content.len())?;
            target.extend_from_slice(content.as_ref());
        }
        Content::Constructed(ref values) if is_string(value.tag()) => {
            let content = joined_string(value.tag(), values)?;
            append_header(target, value.tag(), false, content.len())?;
            target.extend_from_slice(&content);
        }
        Content::Constructed(ref values) => {
            let mut encoded = values.iter().map(to_vec).collect::<Result<
                Vec<_>, _
            >>()?;
            if value.tag() == Tag::SET {
                encoded.sort();
                if encoded.windows(2).any(|pair| pair[0] > pair[1]) {
                    xerr!(return Err(EncodeError::InvalidSetOrdering))
                }
            }
            let len = encoded.iter().map(Vec::len).sum();
            append_header(target, value.tag(), true, len)?;
            for item in encoded {
                target.extend_from_slice(&item)
            }
        }
    }
    Ok(())
}

/// Returns the length of the DER encoding of a value.
pub fn encoded_len(value: &Value) -> Result<usize, EncodeError> {
    let content_len = match *value.content() {
        Content::Primitive(ref content) => {
            canonical_content(value.tag(), content.as_ref())?.len()
        }
        Content::Constructed(ref values) if is_string(value.tag()) => {
            joined_string(value.tag(), values)?.len()
        }
        Content::Constructed(ref values) => {
            let mut len = 0;
            for item in values {
                len += encoded_len(item)?;
            }
            len
        }
    };
    total_encoded_len(value.tag(), content_len)
}

/// Returns the length for a structure based on the tag and content length.
pub fn total_encoded_len(
    tag: Tag, content_l: usize
) -> Result<usize, EncodeError> {
    check_tag(tag)?;
    // Check that the length is representable at all.
    Length::Definite(content_l).append_encoded(&mut Vec::new())?;
    Ok(
        tag.encoded_len() + Length::Definite(content_l).encoded_len()
        + content_l
    )
}

/// Appends the identifier and length octets for a value.
///
/// Fails if the tag number is larger than [`Tag::MAX_NUMBER`] since the
/// result couldn’t be decoded again.
pub fn append_header(
    target: &mut Vec<u8>,
    tag: Tag,
    constructed: bool,
    content_length: usize
) -> Result<(), EncodeError> {
    check_tag(tag)?;
    let mut header = Vec::with_capacity(8);
    tag.append_encoded(constructed, &mut header);
    Length::Definite(content_length).append_encoded(&mut header)?;
    target.extend_from_slice(&header);
    Ok(())
}

fn check_tag(tag: Tag) -> Result<(), EncodeError> {
    if tag.number() > Tag::MAX_NUMBER {
        xerr!(return Err(EncodeError::UnsupportedTag(tag)))
    }
    Ok(())
}

/// Returns whether BER allows constructed encoding for the tag’s type.
///
/// DER requires primitive encoding for all of them.
fn is_string(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::OCTET_STRING | Tag::BIT_STRING | Tag::UTF8_STRING
        | Tag::NUMERIC_STRING | Tag::PRINTABLE_STRING | Tag::TELETEX_STRING
        | Tag::IA5_STRING | Tag::UTC_TIME | Tag::GENERALIZED_TIME
        | Tag::VISIBLE_STRING | Tag::UNIVERSAL_STRING | Tag::BMP_STRING
    )
}

/// Returns the primitive content of a string in constructed form.
///
/// The segments of a BIT STRING must be BIT STRINGs and only the last
/// of them may have unused bits. The segments of all other string types
/// are OCTET STRINGs or of the string’s own type.
fn joined_string(
    tag: Tag, segments: &[Value]
) -> Result<Vec<u8>, EncodeError> {
    let mut res = Vec::new();
    if tag == Tag::BIT_STRING {
        let mut unused = 0;
        append_bit_segments(segments, &mut res, &mut unused)?;
        res.insert(0, unused);
        Ok(canonical_content(tag, &res)?.into_owned())
    }
    else {
        append_string_segments(tag, segments, &mut res)?;
        Ok(res)
    }
}

fn append_string_segments(
    tag: Tag, segments: &[Value], target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    for item in segments {
        if item.tag() != tag && item.tag() != Tag::OCTET_STRING {
            xerr!(return Err(EncodeError::InvalidContent(tag)))
        }
        match *item.content() {
            Content::Primitive(ref content) => {
                target.extend_from_slice(content)
            }
            Content::Constructed(ref inner) => {
                append_string_segments(tag, inner, target)?
            }
        }
    }
    Ok(())
}

fn append_bit_segments(
    segments: &[Value], target: &mut Vec<u8>, unused: &mut u8
) -> Result<(), EncodeError> {
    for item in segments {
        // Only the final segment may have unused bits.
        if item.tag() != Tag::BIT_STRING || *unused != 0 {
            xerr!(return Err(EncodeError::InvalidContent(Tag::BIT_STRING)))
        }
        match *item.content() {
            Content::Primitive(ref content) => {
                if !BitString::is_valid_content(content) {
                    xerr!(return Err(
                        EncodeError::InvalidContent(Tag::BIT_STRING)
                    ))
                }
                *unused = content[0];
                target.extend_from_slice(&content[1..]);
            }
            Content::Constructed(ref inner) => {
                append_bit_segments(inner, target, unused)?
            }
        }
    }
    Ok(())
}

/// Returns the canonical content octets of a primitive value.
fn canonical_content(
    tag: Tag, content: &[u8]
) -> Result<Cow<[u8]>, EncodeError> {
    match tag {
        Tag::BOOLEAN => {
            match content {
                [0] => Ok(Cow::Borrowed(content)),
                [_] => Ok(Cow::Borrowed(b"\xFF")),
                _ => xerr!(Err(EncodeError::InvalidContent(tag)))
            }
        }
        Tag::INTEGER => {
            if content.is_empty() {
                xerr!(return Err(EncodeError::InvalidContent(tag)))
            }
            Ok(Cow::Borrowed(Integer::canonical(content)))
        }
        Tag::BIT_STRING => {
            if !BitString::is_valid_content(content) {
                xerr!(return Err(EncodeError::InvalidContent(tag)))
            }
            let mut res = Cow::Borrowed(content);
            let unused = content[0];
            let mask = (1u8 << unused) - 1;
            if content.len() > 1 && content[content.len() - 1] & mask != 0 {
                BitString::clear_unused(res.to_mut());
            }
            Ok(res)
        }
        _ => Ok(Cow::Borrowed(content))
    }
}


//============ Tests =========================================================
