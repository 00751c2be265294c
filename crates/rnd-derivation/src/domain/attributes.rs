//! # Address Attributes
//!
//! A legacy address payload is the CBOR 3-tuple
//!
//! ```text
//! [ rootHash : bytes, attributes : { u8 => bytes }, addrType : u8 ]
//! ```
//!
//! Attribute 1 carries the encrypted derivation path. Its value is itself a
//! CBOR byte string wrapping the AEAD payload:
//!
//! ```text
//! attributes[1] = CBOR-bytes( encrypt( 9f <account> <address> ff ) )
//! ```
//!
//! ## Ownership probing
//!
//! [`decode_address_derivation_path`] answers "is this address mine, and at
//! which path?" The answer is [`Ownership`]; a failed AEAD tag is
//! [`Ownership::NotMine`], the common case when scanning a ledger.

use std::collections::BTreeMap;
use std::io::BufRead;

use cbor_event::de::Deserializer;
use cbor_event::se::Serializer;
use cbor_event::Len;
use serde::{Deserialize, Serialize};
use shared_crypto::Decryption;

use crate::domain::cbor;
use crate::domain::entities::DerivationPath;
use crate::domain::errors::{FormatError, RndResult};
use crate::domain::passphrase::{Passphrase, PayloadDerivation};
use crate::domain::path_codec::{decode_derivation_path, encode_derivation_path};
use crate::domain::payload::{decrypt_payload, encrypt_payload};

/// Attribute tag of the encrypted derivation path.
pub const DERIVATION_PATH_ATTRIBUTE: u8 = 1;

/// The only supported address type: public key.
pub const PUBLIC_KEY_ADDRESS_TYPE: u8 = 0;

/// Number of elements in an address payload tuple.
const ADDRESS_TUPLE_LEN: usize = 3;

// =============================================================================
// Ownership
// =============================================================================

/// Outcome of probing an address with a wallet's payload passphrase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    /// The address belongs to the wallet at this path.
    Decoded(DerivationPath),
    /// The payload does not authenticate under this wallet's key.
    NotMine,
    /// The address bytes are not a valid legacy payload.
    Malformed(#[serde(with = "format_error_string")] FormatError),
}

impl Ownership {
    /// The recovered path, if the address is ours.
    pub fn path(&self) -> Option<DerivationPath> {
        match self {
            Ownership::Decoded(path) => Some(*path),
            _ => None,
        }
    }

    /// True for [`Ownership::Decoded`].
    pub fn is_mine(&self) -> bool {
        matches!(self, Ownership::Decoded(_))
    }
}

impl From<Result<DerivationPath, FormatError>> for Ownership {
    fn from(result: Result<DerivationPath, FormatError>) -> Self {
        match result {
            Ok(path) => Ownership::Decoded(path),
            Err(e) => Ownership::Malformed(e),
        }
    }
}

/// Serialize a `FormatError` as its message; deserialized errors become `Cbor`.
mod format_error_string {
    use super::FormatError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(error: &FormatError, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&error.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<FormatError, D::Error> {
        String::deserialize(d).map(FormatError::Cbor)
    }
}

// =============================================================================
// Attribute map
// =============================================================================

/// Address attributes, ordered by tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressAttributes {
    entries: BTreeMap<u8, Vec<u8>>,
}

impl AddressAttributes {
    /// Empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set attribute `tag`, returning the previous value.
    pub fn insert(&mut self, tag: u8, value: Vec<u8>) -> Option<Vec<u8>> {
        self.entries.insert(tag, value)
    }

    /// Raw value of attribute `tag`.
    pub fn get(&self, tag: u8) -> Option<&[u8]> {
        self.entries.get(&tag).map(Vec::as_slice)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes carrying an encrypted derivation path.
    pub fn with_derivation_path(
        passphrase: &Passphrase<PayloadDerivation>,
        path: &DerivationPath,
    ) -> RndResult<Self> {
        let mut attributes = Self::new();
        attributes.insert(
            DERIVATION_PATH_ATTRIBUTE,
            encode_derivation_path_attribute(passphrase, path)?,
        );
        Ok(attributes)
    }

    /// The AEAD payload held in attribute 1, with its byte-string wrapper
    /// removed.
    pub fn derivation_path_payload(&self) -> Result<Vec<u8>, FormatError> {
        let value = self
            .get(DERIVATION_PATH_ATTRIBUTE)
            .ok_or(FormatError::MissingAttribute(DERIVATION_PATH_ATTRIBUTE))?;
        cbor::unwrap_bytes(value)
    }

    /// Encode as a canonical CBOR map.
    pub fn to_cbor(&self) -> Result<Vec<u8>, FormatError> {
        let mut se = Serializer::new_vec();
        self.write(&mut se)?;
        Ok(se.finalize())
    }

    /// Decode a canonical CBOR map.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut raw = cbor::reader(bytes);
        let attributes = Self::read(&mut raw)?;
        cbor::ensure_consumed(&mut raw)?;
        Ok(attributes)
    }

    fn write(&self, se: &mut Serializer<Vec<u8>>) -> Result<(), FormatError> {
        se.write_map(Len::Len(self.entries.len() as u64))?;
        for (tag, value) in &self.entries {
            se.write_unsigned_integer(u64::from(*tag))?
                .write_bytes(value)?;
        }
        Ok(())
    }

    /// Only the length header is checked for canonical form. Keys may come
    /// in any order but each at most once.
    fn read<R: BufRead>(raw: &mut Deserializer<R>) -> Result<Self, FormatError> {
        let len = match raw.map()? {
            Len::Len(len) => len,
            Len::Indefinite => return Err(FormatError::NonCanonicalMap),
        };

        let mut entries = BTreeMap::new();
        for _ in 0..len {
            let tag = cbor::read_u8(raw)?;
            if entries.insert(tag, raw.bytes()?).is_some() {
                return Err(FormatError::DuplicateAttribute(tag));
            }
        }
        Ok(Self { entries })
    }
}

// =============================================================================
// Address payload
// =============================================================================

/// The `[rootHash, attributes, addrType]` tuple of a legacy address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressPayload {
    /// Hash committing to the spending data, computed by the caller.
    pub root_hash: Vec<u8>,
    /// Address attributes.
    pub attributes: AddressAttributes,
    /// Address type tag.
    pub addr_type: u8,
}

impl AddressPayload {
    /// Public key address payload.
    pub fn new(root_hash: Vec<u8>, attributes: AddressAttributes) -> Self {
        Self {
            root_hash,
            attributes,
            addr_type: PUBLIC_KEY_ADDRESS_TYPE,
        }
    }

    /// Encode as a definite-length CBOR 3-tuple.
    pub fn to_cbor(&self) -> Result<Vec<u8>, FormatError> {
        let mut se = Serializer::new_vec();
        se.write_array(Len::Len(ADDRESS_TUPLE_LEN as u64))?
            .write_bytes(&self.root_hash)?;
        self.attributes.write(&mut se)?;
        se.write_unsigned_integer(u64::from(self.addr_type))?;
        Ok(se.finalize())
    }

    /// Decode a CBOR 3-tuple. Any address type is accepted here.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut raw = cbor::reader(bytes);
        match raw.array()? {
            Len::Len(len) if len == ADDRESS_TUPLE_LEN as u64 => {}
            Len::Len(len) => {
                return Err(FormatError::InvalidLength {
                    expected: ADDRESS_TUPLE_LEN,
                    actual: usize::try_from(len).unwrap_or(usize::MAX),
                })
            }
            Len::Indefinite => {
                return Err(FormatError::Cbor(
                    "address tuple must have a definite length".to_string(),
                ))
            }
        }

        let root_hash = raw.bytes()?;
        let attributes = AddressAttributes::read(&mut raw)?;
        let addr_type = cbor::read_u8(&mut raw)?;
        cbor::ensure_consumed(&mut raw)?;

        Ok(Self {
            root_hash,
            attributes,
            addr_type,
        })
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Build the value stored under attribute 1 for `path`.
pub fn encode_derivation_path_attribute(
    passphrase: &Passphrase<PayloadDerivation>,
    path: &DerivationPath,
) -> RndResult<Vec<u8>> {
    let plaintext = encode_derivation_path(path)?;
    let payload = encrypt_payload(passphrase, &plaintext)?;
    Ok(cbor::wrap_bytes(&payload)?)
}

/// Check an encoded address payload against this wallet's payload passphrase.
///
/// The whole tuple is checked structurally before decryption, so a
/// malformed address is reported as such even if it is not ours.
pub fn decode_address_derivation_path(
    passphrase: &Passphrase<PayloadDerivation>,
    address: &[u8],
) -> Ownership {
    let payload = match AddressPayload::from_cbor(address).and_then(|decoded| {
        if decoded.addr_type != PUBLIC_KEY_ADDRESS_TYPE {
            return Err(FormatError::UnsupportedAddressType(decoded.addr_type));
        }
        decoded.attributes.derivation_path_payload()
    }) {
        Ok(payload) => payload,
        Err(e) => return Ownership::Malformed(e),
    };

    match decrypt_payload(passphrase, &payload) {
        Decryption::Plaintext(plaintext) => decode_derivation_path(&plaintext).into(),
        Decryption::AuthenticationFailed => Ownership::NotMine,
    }
}
