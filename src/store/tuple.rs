//! Tuple key encoding
//!
//! Order-preserving encoding of string tuples. Each element is written as
//! the type code `0x02`, its UTF-8 bytes with every `0x00` escaped as
//! `0x00 0xFF`, and a `0x00` terminator. Encoded tuples sort the same way as
//! the element lists they encode, and no encoded element is a prefix of
//! another, so every key nested under a tuple lies in [`range`] of it.

use crate::store::interface::KeyRange;
use thiserror::Error;

const STRING_CODE: u8 = 0x02;
const NIL: u8 = 0x00;
const ESCAPE: u8 = 0xFF;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TupleError {
    #[error("unexpected end of tuple at byte {0}")]
    Truncated(usize),
    #[error("unknown type code {code:#04x} at byte {offset}")]
    UnknownTypeCode { code: u8, offset: usize },
    #[error("element is not valid UTF-8")]
    InvalidUtf8,
}

/// Append one string element to `out`
pub fn pack_str_into(out: &mut Vec<u8>, element: &str) {
    out.push(STRING_CODE);
    for &byte in element.as_bytes() {
        out.push(byte);
        if byte == NIL {
            out.push(ESCAPE);
        }
    }
    out.push(NIL);
}

/// Encode a tuple of string elements
pub fn pack<S: AsRef<str>>(elements: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    for element in elements {
        pack_str_into(&mut out, element.as_ref());
    }
    out
}

/// Decode a key produced by [`pack`]
pub fn unpack(key: &[u8]) -> Result<Vec<String>, TupleError> {
    let mut elements = Vec::new();
    let mut pos = 0;

    while pos < key.len() {
        if key[pos] != STRING_CODE {
            return Err(TupleError::UnknownTypeCode {
                code: key[pos],
                offset: pos,
            });
        }
        pos += 1;

        let mut bytes = Vec::new();
        loop {
            match key.get(pos) {
                None => return Err(TupleError::Truncated(pos)),
                Some(&NIL) if key.get(pos + 1) == Some(&ESCAPE) => {
                    bytes.push(NIL);
                    pos += 2;
                }
                Some(&NIL) => {
                    pos += 1;
                    break;
                }
                Some(&byte) => {
                    bytes.push(byte);
                    pos += 1;
                }
            }
        }

        elements.push(String::from_utf8(bytes).map_err(|_| TupleError::InvalidUtf8)?);
    }

    Ok(elements)
}

/// Range covering every key that extends `prefix` with further elements
pub fn range(prefix: &[u8]) -> KeyRange {
    let mut begin = Vec::with_capacity(prefix.len() + 1);
    begin.extend_from_slice(prefix);
    begin.push(NIL);

    let mut end = Vec::with_capacity(prefix.len() + 1);
    end.extend_from_slice(prefix);
    end.push(ESCAPE);

    KeyRange::new(begin, end)
}

/// Key prefix of a table
pub fn table_prefix(table_name: &str) -> Vec<u8> {
    pack(&[table_name])
}

/// Key range holding every row of a table
pub fn table_range(table_name: &str) -> KeyRange {
    range(&table_prefix(table_name))
}
