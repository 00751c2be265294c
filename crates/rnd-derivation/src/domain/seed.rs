//! # Seed Hashing
//!
//! Turns raw seed entropy into the input of root key generation:
//!
//! ```text
//! CBOR-bytes( Blake2b-256( CBOR-bytes(seed) ) )
//! ```
//!
//! The digest is wrapped in a second CBOR byte string, not re-hashed. The
//! resulting 34 bytes keep their CBOR header; root generation keys its HMAC
//! with all of them.

use shared_crypto::blake2b_256;
use zeroize::Zeroizing;

use crate::domain::cbor;
use crate::domain::errors::{RndError, RndResult};
use crate::domain::passphrase::{Passphrase, Seed};

/// Shortest accepted seed.
pub const MIN_SEED_LEN: usize = 16;

/// Longest accepted seed.
pub const MAX_SEED_LEN: usize = 255;

/// Length of a seed hash: two CBOR header bytes and the digest.
pub const SEED_HASH_LEN: usize = 34;

/// Hash seed entropy into root generation input.
///
/// # Errors
/// `InvariantViolation` if the seed is not 16 to 255 bytes long.
pub fn hash_seed(seed: &Passphrase<Seed>) -> RndResult<Zeroizing<Vec<u8>>> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
        return Err(RndError::InvariantViolation(format!(
            "seed must be {} to {} bytes, got {}",
            MIN_SEED_LEN,
            MAX_SEED_LEN,
            seed.len()
        )));
    }

    let encoded = Zeroizing::new(cbor::wrap_bytes(seed.as_bytes())?);
    let digest = Zeroizing::new(blake2b_256(&encoded));
    Ok(Zeroizing::new(cbor::wrap_bytes(digest.as_ref())?))
}
