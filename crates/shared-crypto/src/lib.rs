//! # Shared Crypto - Primitive Wrappers
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | ChaCha20-Poly1305, ChaCha20 (legacy nonce) | Payload and key-at-rest encryption |
//! | `hashing` | BLAKE2b-256 | Seed hashing |
//! | `kdf` | SHA-512, HMAC-SHA512, PBKDF2-HMAC-SHA512 | Key generation and stretching |
//!
//! ## Security Properties
//!
//! - **ChaCha20-Poly1305**: constant-time tag comparison; a failed tag is a
//!   value ([`Decryption::AuthenticationFailed`]), not an error
//! - **Secrets**: [`SecretKey`] zeroizes on drop and never prints its bytes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod kdf;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{blake2b_256, Hash};
pub use kdf::{hmac_sha512, pbkdf2_hmac_sha512, sha512};
pub use symmetric::{
    apply_legacy_keystream, decrypt, encrypt, Decryption, Nonce, SecretKey, LEGACY_NONCE_LEN,
    NONCE_LEN, TAG_LEN,
};
