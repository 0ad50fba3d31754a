//! Best-effort decoding of compiler-mangled symbol names.
//!
//! Only the nested-name part of an Itanium-style symbol is decoded: the
//! length-prefixed scope segments plus constructor/destructor markers.
//! Parameter types, templates, and substitutions are ignored, which is enough
//! to recover `Namespace::Class::method` for ownership matching.
//!
//! Decoding never fails. Malformed or truncated input yields whatever
//! segments were read before the damage.

use std::borrow::Cow;

use crate::model::QualifiedName;

/// Prefix that marks a mangled symbol.
pub const MANGLING_MARKER: &str = "_Z";

const CONSTRUCTOR_MARKER: u8 = b'C';
const DESTRUCTOR_MARKER: u8 = b'D';

/// Decode `raw` into a qualified name.
///
/// Plain (non-mangled) names come back unchanged as a single segment, as does
/// a mangled name from which no segment could be read.
pub fn demangle(raw: &str) -> QualifiedName {
    let segments = demangle_segments(raw);
    if segments.is_empty() {
        return QualifiedName::from_segments([raw]);
    }
    QualifiedName::from_segments(segments)
}

/// Returns true if `raw` carries the mangling marker.
pub fn is_mangled(raw: &str) -> bool {
    raw.starts_with(MANGLING_MARKER)
}

/// Decode the nested-name segments of `raw` without copying.
///
/// Segments borrow from `raw`; only destructor names (`~Class`) are owned.
/// Returns an empty vector for plain names and for mangled names with no
/// readable segment.
pub fn demangle_segments(raw: &str) -> Vec<Cow<'_, str>> {
    if !is_mangled(raw) {
        return Vec::new();
    }

    let bytes = raw.as_bytes();
    let mut cursor = match bytes[MANGLING_MARKER.len()..].iter().position(u8::is_ascii_digit) {
        Some(offset) => MANGLING_MARKER.len() + offset,
        None => return Vec::new(),
    };

    let mut segments: Vec<Cow<'_, str>> = Vec::new();
    loop {
        // Constructor/destructor markers sit right before a digit and reuse
        // the most recent segment instead of reading a new one.
        if let Some(marker) = special_marker(bytes, cursor) {
            let Some(previous) = segments.last() else {
                break;
            };
            let segment = match marker {
                CONSTRUCTOR_MARKER => previous.clone(),
                _ => Cow::Owned(format!("~{previous}")),
            };
            segments.push(segment);
            cursor += 2;
            continue;
        }

        let Some((length, digits_end)) = read_length(bytes, cursor) else {
            break;
        };
        let Some(end) = digits_end.checked_add(length) else {
            break;
        };
        let Some(segment) = raw.get(digits_end..end) else {
            break;
        };
        segments.push(Cow::Borrowed(segment));
        cursor = end;
    }

    segments
}

/// Detects `C<digit>` / `D<digit>` at `cursor`.
fn special_marker(bytes: &[u8], cursor: usize) -> Option<u8> {
    let marker = *bytes.get(cursor)?;
    let next = *bytes.get(cursor + 1)?;
    if (marker == CONSTRUCTOR_MARKER || marker == DESTRUCTOR_MARKER) && next.is_ascii_digit() {
        Some(marker)
    } else {
        None
    }
}

/// Reads a decimal length prefix starting at `cursor`.
///
/// Returns the length and the index just past its digits, or `None` when
/// there is no digit or the value overflows.
fn read_length(bytes: &[u8], cursor: usize) -> Option<(usize, usize)> {
    let mut end = cursor;
    let mut value: usize = 0;
    while let Some(&b) = bytes.get(end) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.checked_mul(10)?.checked_add(usize::from(b - b'0'))?;
        end += 1;
    }
    if end == cursor {
        None
    } else {
        Some((value, end))
    }
}
