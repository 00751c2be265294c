//! # Ed25519-BIP32 Engine
//!
//! Production [`ExtendedKeyEngine`] for the legacy 128-byte key layout:
//!
//! ```text
//! encrypted extended secret (64) ‖ public key (32) ‖ chain code (32)
//! ```
//!
//! ## Root generation
//!
//! ```text
//! for i in 1..=1000:
//!     block    = HMAC-SHA512(key = seedHash, "Root Seed Chain " ‖ i)
//!     extended = clamp(SHA-512(block[0..32]))
//!     if extended[31] & 0x20 == 0: return (extended, chainCode = block[32..64])
//! ```
//!
//! ## Child derivation
//!
//! ```text
//! hardened: Z = HMAC(cc, 0x00 ‖ kl ‖ kr ‖ i)   C = HMAC(cc, 0x01 ‖ kl ‖ kr ‖ i)
//! soft:     Z = HMAC(cc, 0x02 ‖ A ‖ i)         C = HMAC(cc, 0x03 ‖ A ‖ i)
//! chainCode' = C[32..64]
//! ```
//!
//! | Scheme | `i` encoding | `kl'` | `kr'` |
//! |--------|--------------|-------|-------|
//! | V1 | big-endian | `kl + 8·zl` (bytewise shift, mod ℓ) | bytewise `kr + zr` |
//! | V2 | little-endian | `kl + 8·zl[0..28]` | `kr + zr` mod 2²⁵⁶ |
//!
//! Public keys are `(kl mod ℓ)·B`, so any 64 bytes form a usable secret.
//! A wrong passphrase decrypts to garbage that still derives.
//!
//! ## Encryption at rest
//!
//! The 64-byte extended secret is XORed with a ChaCha20 keystream whose key
//! and nonce are stretched from the passphrase. The empty passphrase leaves
//! it in clear.

use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
use curve25519_dalek::scalar::Scalar;
use shared_crypto::{
    apply_legacy_keystream, hmac_sha512, pbkdf2_hmac_sha512, sha512, LEGACY_NONCE_LEN,
};
use tracing::trace;
use zeroize::Zeroizing;

use crate::domain::entities::{XPrv, XPub, CHAIN_CODE_SIZE, XPRV_SIZE, XPUB_SIZE};
use crate::domain::errors::{RndError, RndResult};
use crate::domain::index::HARDENED_OFFSET;
use crate::domain::passphrase::{Encryption, Passphrase};
use crate::ports::outbound::{DerivationScheme, ExtendedKeyEngine};

/// Extended secret key length.
const EXTENDED_SECRET_SIZE: usize = 64;

const SCALAR_SIZE: usize = 32;

const PUBLIC_KEY_SIZE: usize = 32;

/// Shortest seed hash accepted by root generation.
const MIN_SEED_HASH_LEN: usize = 32;

/// Root generation gives up after this many rejected candidates.
pub const MAX_ROOT_ATTEMPTS: u32 = 1000;

const ROOT_CHAIN_PREFIX: &str = "Root Seed Chain ";

// HMAC domain tags
const TAG_HARDENED_SECRET: u8 = 0x00;
const TAG_HARDENED_CHAIN: u8 = 0x01;
const TAG_SOFT_SECRET: u8 = 0x02;
const TAG_SOFT_CHAIN: u8 = 0x03;

/// Salt for passphrase stretching, NUL terminator included.
const ENCRYPTION_SALT: &[u8] = b"encrypted wallet salt\0";

const ENCRYPTION_ROUNDS: u32 = 15_000;

const ENCRYPTION_KEY_SIZE: usize = 32;

type ExtendedSecret = Zeroizing<[u8; EXTENDED_SECRET_SIZE]>;

/// Extended-key engine for legacy Ed25519-BIP32 keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Bip32Engine;

impl Ed25519Bip32Engine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    /// Decrypt the extended secret of `xprv` and split off its chain code.
    fn open(
        &self,
        passphrase: &Passphrase<Encryption>,
        xprv: &XPrv,
    ) -> (ExtendedSecret, [u8; CHAIN_CODE_SIZE]) {
        let bytes = xprv.as_bytes();
        let mut extended = Zeroizing::new([0u8; EXTENDED_SECRET_SIZE]);
        extended.copy_from_slice(&bytes[..EXTENDED_SECRET_SIZE]);
        apply_passphrase(passphrase, &mut extended[..]);

        let mut chain_code = [0u8; CHAIN_CODE_SIZE];
        chain_code.copy_from_slice(&bytes[XPRV_SIZE - CHAIN_CODE_SIZE..]);
        (extended, chain_code)
    }

    /// Compute the public key of a clear secret and encrypt it under `passphrase`.
    fn seal(
        &self,
        passphrase: &Passphrase<Encryption>,
        mut extended: ExtendedSecret,
        chain_code: &[u8; CHAIN_CODE_SIZE],
    ) -> XPrv {
        let mut xpub = [0u8; XPUB_SIZE];
        xpub[..PUBLIC_KEY_SIZE].copy_from_slice(&public_key(&extended[..SCALAR_SIZE]));
        xpub[PUBLIC_KEY_SIZE..].copy_from_slice(chain_code);
        assemble(passphrase, &mut extended, &xpub)
    }
}

impl ExtendedKeyEngine for Ed25519Bip32Engine {
    fn generate(&self, seed_hash: &[u8], passphrase: &Passphrase<Encryption>) -> RndResult<XPrv> {
        if seed_hash.len() < MIN_SEED_HASH_LEN {
            return Err(RndError::InvariantViolation(format!(
                "seed hash must be at least {} bytes, got {}",
                MIN_SEED_HASH_LEN,
                seed_hash.len()
            )));
        }

        for attempt in 1..=MAX_ROOT_ATTEMPTS {
            let message = format!("{}{}", ROOT_CHAIN_PREFIX, attempt);
            let block = Zeroizing::new(hmac_sha512(seed_hash, message.as_bytes()));

            let mut extended = Zeroizing::new(sha512(&block[..32]));
            extended[0] &= 0b1111_1000;
            extended[31] &= 0b0011_1111;
            extended[31] |= 0b0100_0000;
            if extended[31] & 0b0010_0000 != 0 {
                continue;
            }

            trace!(attempts = attempt, "[Ed25519Bip32Engine] root key generated");

            let mut chain_code = [0u8; CHAIN_CODE_SIZE];
            chain_code.copy_from_slice(&block[32..]);
            return Ok(self.seal(passphrase, extended, &chain_code));
        }

        Err(RndError::InvariantViolation(format!(
            "no valid root key after {} attempts",
            MAX_ROOT_ATTEMPTS
        )))
    }

    fn derive_child(
        &self,
        scheme: DerivationScheme,
        passphrase: &Passphrase<Encryption>,
        parent: &XPrv,
        index: u32,
    ) -> XPrv {
        let (extended, chain_code) = self.open(passphrase, parent);
        let (child, child_chain_code) = derive_extended(scheme, &extended, &chain_code, index);
        self.seal(passphrase, child, &child_chain_code)
    }

    fn to_public(&self, xprv: &XPrv) -> XPub {
        let mut xpub = [0u8; XPUB_SIZE];
        xpub.copy_from_slice(&xprv.as_bytes()[EXTENDED_SECRET_SIZE..]);
        XPub::from_bytes(xpub)
    }

    fn reencrypt(
        &self,
        old: &Passphrase<Encryption>,
        new: &Passphrase<Encryption>,
        xprv: &XPrv,
    ) -> XPrv {
        let bytes = xprv.as_bytes();
        let mut extended = Zeroizing::new([0u8; EXTENDED_SECRET_SIZE]);
        extended.copy_from_slice(&bytes[..EXTENDED_SECRET_SIZE]);
        apply_passphrase(old, &mut extended[..]);
        assemble(new, &mut extended, &bytes[EXTENDED_SECRET_SIZE..])
    }
}

// =============================================================================
// Derivation arithmetic
// =============================================================================

/// Child extended secret and chain code of a clear parent.
fn derive_extended(
    scheme: DerivationScheme,
    extended: &[u8; EXTENDED_SECRET_SIZE],
    chain_code: &[u8; CHAIN_CODE_SIZE],
    index: u32,
) -> (ExtendedSecret, [u8; CHAIN_CODE_SIZE]) {
    let serialized = match scheme {
        DerivationScheme::V1 => index.to_be_bytes(),
        DerivationScheme::V2 => index.to_le_bytes(),
    };

    let (z, c) = if index >= HARDENED_OFFSET {
        (
            tagged_mac(chain_code, TAG_HARDENED_SECRET, &extended[..], &serialized),
            tagged_mac(chain_code, TAG_HARDENED_CHAIN, &extended[..], &serialized),
        )
    } else {
        let public = public_key(&extended[..SCALAR_SIZE]);
        (
            tagged_mac(chain_code, TAG_SOFT_SECRET, &public, &serialized),
            tagged_mac(chain_code, TAG_SOFT_CHAIN, &public, &serialized),
        )
    };

    let (kl, kr) = extended.split_at(SCALAR_SIZE);
    let (zl, zr) = z.split_at(SCALAR_SIZE);

    let mut child = Zeroizing::new([0u8; EXTENDED_SECRET_SIZE]);
    let (child_kl, child_kr) = child.split_at_mut(SCALAR_SIZE);
    match scheme {
        DerivationScheme::V1 => {
            child_kl.copy_from_slice(&add_scalar_mul8_v1(kl, zl)[..]);
            add_bytewise(child_kr, kr, zr);
        }
        DerivationScheme::V2 => {
            child_kl.copy_from_slice(&add_28_mul8(kl, zl)[..]);
            child_kr.copy_from_slice(&add_256bits(kr, zr)[..]);
        }
    }

    let mut child_chain_code = [0u8; CHAIN_CODE_SIZE];
    child_chain_code.copy_from_slice(&c[SCALAR_SIZE..]);
    (child, child_chain_code)
}

fn tagged_mac(
    chain_code: &[u8; CHAIN_CODE_SIZE],
    tag: u8,
    body: &[u8],
    serialized_index: &[u8; 4],
) -> Zeroizing<[u8; 64]> {
    let mut message = Zeroizing::new(Vec::with_capacity(1 + body.len() + 4));
    message.push(tag);
    message.extend_from_slice(body);
    message.extend_from_slice(serialized_index);
    Zeroizing::new(hmac_sha512(chain_code, &message))
}

/// Compressed `(kl mod ℓ)·B`.
fn public_key(kl: &[u8]) -> [u8; PUBLIC_KEY_SIZE] {
    let scalar = Scalar::from_bytes_mod_order(scalar_bytes(kl));
    (ED25519_BASEPOINT_TABLE * &scalar).compress().to_bytes()
}

fn scalar_bytes(bytes: &[u8]) -> [u8; SCALAR_SIZE] {
    let mut out = [0u8; SCALAR_SIZE];
    out.copy_from_slice(&bytes[..SCALAR_SIZE]);
    out
}

/// V1 left half: `(kl + mul8_v1(zl)) mod ℓ`.
fn add_scalar_mul8_v1(kl: &[u8], zl: &[u8]) -> Zeroizing<[u8; SCALAR_SIZE]> {
    let sum = Scalar::from_bytes_mod_order(scalar_bytes(kl))
        + Scalar::from_bytes_mod_order(*mul8_v1(zl));
    Zeroizing::new(sum.to_bytes())
}

/// Legacy eight-fold multiply. The carry is masked to a bit it never holds,
/// so every byte shifts on its own.
fn mul8_v1(z: &[u8]) -> Zeroizing<[u8; SCALAR_SIZE]> {
    let mut out = Zeroizing::new([0u8; SCALAR_SIZE]);
    let mut acc = 0u8;
    for (o, &b) in out.iter_mut().zip(z.iter()) {
        *o = (b << 3).wrapping_add(acc & 0x8);
        acc = b >> 5;
    }
    out
}

/// V1 right half: per-byte wrapping addition, no carry.
fn add_bytewise(out: &mut [u8], x: &[u8], y: &[u8]) {
    for ((o, &a), &b) in out.iter_mut().zip(x.iter()).zip(y.iter()) {
        *o = a.wrapping_add(b);
    }
}

/// V2 left half: `x + 8·y[0..28]` with carry through all 32 bytes.
fn add_28_mul8(x: &[u8], y: &[u8]) -> Zeroizing<[u8; SCALAR_SIZE]> {
    let mut out = Zeroizing::new([0u8; SCALAR_SIZE]);
    let mut carry: u16 = 0;
    for i in 0..28 {
        let r = x[i] as u16 + ((y[i] as u16) << 3) + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    for i in 28..SCALAR_SIZE {
        let r = x[i] as u16 + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    out
}

/// V2 right half: `x + y` mod 2²⁵⁶.
fn add_256bits(x: &[u8], y: &[u8]) -> Zeroizing<[u8; SCALAR_SIZE]> {
    let mut out = Zeroizing::new([0u8; SCALAR_SIZE]);
    let mut carry: u16 = 0;
    for i in 0..SCALAR_SIZE {
        let r = x[i] as u16 + y[i] as u16 + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    out
}

// =============================================================================
// Encryption at rest
// =============================================================================

/// Encrypt `extended` in place and lay out the 128-byte key.
fn assemble(
    passphrase: &Passphrase<Encryption>,
    extended: &mut [u8; EXTENDED_SECRET_SIZE],
    xpub: &[u8],
) -> XPrv {
    apply_passphrase(passphrase, extended);

    let mut key = Zeroizing::new([0u8; XPRV_SIZE]);
    key[..EXTENDED_SECRET_SIZE].copy_from_slice(&extended[..]);
    key[EXTENDED_SECRET_SIZE..].copy_from_slice(xpub);
    XPrv::from_bytes(*key)
}

/// XOR `extended` with the passphrase keystream. Its own inverse.
fn apply_passphrase(passphrase: &Passphrase<Encryption>, extended: &mut [u8]) {
    if passphrase.is_empty() {
        return;
    }

    let mut stretched = Zeroizing::new([0u8; ENCRYPTION_KEY_SIZE + LEGACY_NONCE_LEN]);
    pbkdf2_hmac_sha512(
        passphrase.as_bytes(),
        ENCRYPTION_SALT,
        ENCRYPTION_ROUNDS,
        &mut stretched[..],
    );

    let mut key = Zeroizing::new([0u8; ENCRYPTION_KEY_SIZE]);
    key.copy_from_slice(&stretched[..ENCRYPTION_KEY_SIZE]);
    let mut nonce = [0u8; LEGACY_NONCE_LEN];
    nonce.copy_from_slice(&stretched[ENCRYPTION_KEY_SIZE..]);

    apply_legacy_keystream(&key, &nonce, extended);
}
