//! # Derivation Path Codec
//!
//! A path is encoded as an indefinite-length CBOR list of two unsigned
//! integers closed by a break marker:
//!
//! ```text
//! 9f <account:u32> <address:u32> ff
//! ```
//!
//! Legacy decoders only accept the indefinite form, so a definite-length list
//! is rejected even when its contents are valid.

use cbor_event::se::Serializer;
use cbor_event::{Len, Special, Type};

use crate::domain::cbor::{self, SliceReader};
use crate::domain::entities::DerivationPath;
use crate::domain::errors::FormatError;

/// Number of indices in an encoded path.
pub const PATH_LEN: usize = 2;

/// Encode a path as an indefinite-length CBOR list.
pub fn encode_derivation_path(path: &DerivationPath) -> Result<Vec<u8>, FormatError> {
    let mut se = Serializer::new_vec();
    se.write_array(Len::Indefinite)?
        .write_unsigned_integer(u64::from(path.account_index))?
        .write_unsigned_integer(u64::from(path.address_index))?
        .write_special(Special::Break)?;
    Ok(se.finalize())
}

/// Decode a path produced by [`encode_derivation_path`].
///
/// # Errors
/// - `ExpectedIndefiniteList` for a definite-length list
/// - `InvalidLength` unless the list holds exactly two elements
/// - `IntegerOutOfRange` for an element wider than 32 bits
/// - `LeftoverBytes` if anything follows the break marker
pub fn decode_derivation_path(bytes: &[u8]) -> Result<DerivationPath, FormatError> {
    let mut raw = cbor::reader(bytes);

    if raw.array()? != Len::Indefinite {
        return Err(FormatError::ExpectedIndefiniteList);
    }

    let mut indices = Vec::with_capacity(PATH_LEN);
    while !at_break(&mut raw)? {
        let index = cbor::read_u32(&mut raw)?;
        indices.push(index);
        // An over-long list can't become valid, stop before reading it all.
        if indices.len() > PATH_LEN {
            return Err(FormatError::InvalidLength {
                expected: PATH_LEN,
                actual: indices.len(),
            });
        }
    }

    if indices.len() != PATH_LEN {
        return Err(FormatError::InvalidLength {
            expected: PATH_LEN,
            actual: indices.len(),
        });
    }
    cbor::ensure_consumed(&mut raw)?;

    Ok(DerivationPath::from_raw(indices[0], indices[1]))
}

/// Consume the break marker if it is next.
fn at_break(raw: &mut SliceReader<'_>) -> Result<bool, FormatError> {
    if raw.cbor_type()? != Type::Special {
        return Ok(false);
    }
    match raw.special()? {
        Special::Break => Ok(true),
        other => Err(FormatError::Cbor(format!(
            "unexpected simple value {:?} in derivation path",
            other
        ))),
    }
}
