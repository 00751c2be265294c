//! # SHA-512 based MACs and key stretching
//!
//! HMAC-SHA512 and PBKDF2-HMAC-SHA512 with caller-owned output buffers so
//! secret material never lands in an intermediate allocation.

use hmac::digest::generic_array::GenericArray;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// SHA-512 block length, the HMAC key width.
const HMAC_BLOCK_SIZE: usize = 128;

/// SHA-512 digest (one-shot).
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Sha512::digest(data));
    out
}

/// HMAC-SHA512 keyed with `key` over `data`.
///
/// Keys of any length are accepted. The key is normalised to one block
/// (hashed first when longer than a block, then zero padded) before keying.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut block = Zeroizing::new([0u8; HMAC_BLOCK_SIZE]);
    if key.len() > HMAC_BLOCK_SIZE {
        block[..64].copy_from_slice(&Sha512::digest(key));
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let mut mac = <HmacSha512 as KeyInit>::new(GenericArray::from_slice(&block[..]));
    mac.update(data);

    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// PBKDF2 with HMAC-SHA512 as the PRF.
///
/// `password` keys the HMAC, `salt` is mixed into the first block of every
/// output chunk. Fills `output` entirely.
pub fn pbkdf2_hmac_sha512(password: &[u8], salt: &[u8], rounds: u32, output: &mut [u8]) {
    pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, rounds, output);
}
