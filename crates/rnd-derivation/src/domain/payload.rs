//! # Payload Cipher
//!
//! ChaCha20-Poly1305 over encoded derivation paths, keyed by the wallet's
//! payload passphrase, with a nonce fixed for every wallet.
//!
//! The nonce is constant, so confidentiality rests entirely on the key being
//! unique per wallet. A wallet encrypts each of its paths deterministically;
//! the legacy format offers nothing stronger.

use shared_crypto::{decrypt, encrypt, Decryption, Nonce};

use crate::domain::errors::RndResult;
use crate::domain::passphrase::{Passphrase, PayloadDerivation};

/// The nonce shared by every legacy derivation path payload.
pub const PAYLOAD_NONCE: Nonce = Nonce::from_bytes(*b"serokellfore");

/// Encrypt an encoded path; returns `ciphertext ‖ tag`.
pub fn encrypt_payload(
    passphrase: &Passphrase<PayloadDerivation>,
    plaintext: &[u8],
) -> RndResult<Vec<u8>> {
    Ok(encrypt(&passphrase.secret_key(), &PAYLOAD_NONCE, plaintext)?)
}

/// Decrypt `ciphertext ‖ tag`.
///
/// A tag mismatch is [`Decryption::AuthenticationFailed`], the normal
/// outcome when probing another wallet's address.
pub fn decrypt_payload(
    passphrase: &Passphrase<PayloadDerivation>,
    payload: &[u8],
) -> Decryption {
    decrypt(&passphrase.secret_key(), &PAYLOAD_NONCE, payload)
}
