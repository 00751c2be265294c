//! CBOR helpers shared by the seed, path and attribute codecs.

use std::io::{BufRead, Cursor};

use cbor_event::de::Deserializer;
use cbor_event::se::Serializer;

use crate::domain::errors::FormatError;

/// Deserializer over an in-memory buffer.
pub(crate) type SliceReader<'a> = Deserializer<Cursor<&'a [u8]>>;

pub(crate) fn reader(bytes: &[u8]) -> SliceReader<'_> {
    Deserializer::from(Cursor::new(bytes))
}

/// Fails with `LeftoverBytes` unless the reader is exhausted.
pub(crate) fn ensure_consumed<R: BufRead>(raw: &mut Deserializer<R>) -> Result<(), FormatError> {
    if raw.cbor_type().is_ok() {
        return Err(FormatError::LeftoverBytes);
    }
    Ok(())
}

pub(crate) fn read_u32<R: BufRead>(raw: &mut Deserializer<R>) -> Result<u32, FormatError> {
    let value = raw.unsigned_integer()?;
    u32::try_from(value).map_err(|_| FormatError::IntegerOutOfRange {
        target: "u32",
        value,
    })
}

pub(crate) fn read_u8<R: BufRead>(raw: &mut Deserializer<R>) -> Result<u8, FormatError> {
    let value = raw.unsigned_integer()?;
    u8::try_from(value).map_err(|_| FormatError::IntegerOutOfRange {
        target: "u8",
        value,
    })
}

/// Encode `data` as a single CBOR byte string.
pub fn wrap_bytes(data: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut se = Serializer::new_vec();
    se.write_bytes(data)?;
    Ok(se.finalize())
}

/// Decode a buffer holding exactly one CBOR byte string.
pub fn unwrap_bytes(encoded: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut raw = reader(encoded);
    let bytes = raw.bytes()?;
    ensure_consumed(&mut raw)?;
    Ok(bytes)
}
