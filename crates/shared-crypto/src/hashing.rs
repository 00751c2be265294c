//! # BLAKE2b Hashing
//!
//! 256-bit BLAKE2b, the digest used by the legacy seed hashing.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

/// BLAKE2b-256 hash output.
pub type Hash = [u8; 32];

type Blake2b256 = Blake2b<U32>;

/// Hash data with BLAKE2b-256 (one-shot).
pub fn blake2b_256(data: &[u8]) -> Hash {
    Blake2b256::digest(data).into()
}
