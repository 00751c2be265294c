//! # Symmetric Encryption
//!
//! - **ChaCha20-Poly1305** (IETF, 96-bit nonce) with caller-supplied nonces and
//!   no associated data. Output layout is `ciphertext || tag`.
//! - **ChaCha20 legacy keystream** (64-bit nonce, 20 rounds) for XOR-style
//!   encryption of key material at rest.
//!
//! ## Nonce discipline
//!
//! The AEAD takes the nonce as an explicit argument because some wire formats
//! pin it to a constant. Reusing a nonce is only sound when every key encrypts
//! at most one distinct plaintext under it.

use crate::CryptoError;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::{ChaCha20Legacy, LegacyNonce};
use chacha20poly1305::{
    aead::{Aead, AeadInPlace, KeyInit},
    ChaCha20Poly1305, Key, Nonce as AeadNonce, Tag,
};
use zeroize::{Zeroize, Zeroizing};

/// Poly1305 authentication tag length.
pub const TAG_LEN: usize = 16;

/// ChaCha20-Poly1305 nonce length.
pub const NONCE_LEN: usize = 12;

/// Legacy ChaCha20 nonce length.
pub const LEGACY_NONCE_LEN: usize = 8;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Nonce for ChaCha20-Poly1305.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Create from bytes.
    pub const fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Outcome of an authenticated decryption.
///
/// A tag mismatch is an expected result for callers that try payloads with
/// candidate keys, so it is a variant rather than an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decryption {
    /// Tag verified; the recovered plaintext.
    Plaintext(Vec<u8>),
    /// Tag did not verify under this key and nonce.
    AuthenticationFailed,
}

/// Encrypt `plaintext` with ChaCha20-Poly1305 and empty associated data.
///
/// Returns `ciphertext || tag`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(key: &SecretKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));

    cipher
        .encrypt(AeadNonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypt `ciphertext || tag` with ChaCha20-Poly1305 and empty associated data.
///
/// Payloads shorter than the tag cannot authenticate.
pub fn decrypt(key: &SecretKey, nonce: &Nonce, payload: &[u8]) -> Decryption {
    if payload.len() < TAG_LEN {
        return Decryption::AuthenticationFailed;
    }
    let (ciphertext, tag) = payload.split_at(payload.len() - TAG_LEN);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let mut buffer = Zeroizing::new(ciphertext.to_vec());

    match cipher.decrypt_in_place_detached(
        AeadNonce::from_slice(nonce.as_bytes()),
        b"",
        &mut buffer,
        Tag::from_slice(tag),
    ) {
        Ok(()) => Decryption::Plaintext(buffer.to_vec()),
        Err(_) => Decryption::AuthenticationFailed,
    }
}

/// XOR `buffer` with the ChaCha20 keystream (64-bit nonce, counter from zero).
///
/// Applying it twice with the same key and nonce restores the input.
pub fn apply_legacy_keystream(key: &[u8; 32], nonce: &[u8; LEGACY_NONCE_LEN], buffer: &mut [u8]) {
    let mut cipher = ChaCha20Legacy::new(
        chacha20::Key::from_slice(key),
        LegacyNonce::from_slice(nonce),
    );
    cipher.apply_keystream(buffer);
}
