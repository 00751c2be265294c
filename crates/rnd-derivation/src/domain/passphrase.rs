//! # Passphrases
//!
//! Secret byte buffers tagged with their purpose so a seed can never be used
//! where an encryption passphrase is expected, and so on.
//!
//! The payload passphrase is the per-wallet AEAD key protecting embedded
//! derivation paths. It is a function of the root public key only:
//!
//! ```text
//! PBKDF2-HMAC-SHA512(password = rootXPub(64), salt = "address-hashing",
//!                    rounds = 500, len = 32)
//! ```

use std::fmt;
use std::marker::PhantomData;

use shared_crypto::{pbkdf2_hmac_sha512, SecretKey};
use zeroize::Zeroizing;


/// Constant PBKDF2 input for payload passphrase derivation.
pub const PAYLOAD_KEY_SALT: &[u8] = b"address-hashing";

/// PBKDF2 iteration count for payload passphrase derivation.
pub const PAYLOAD_KEY_ROUNDS: u32 = 500;

/// Payload passphrase length.
pub const PAYLOAD_KEY_SIZE: usize = 32;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Seed {}
    impl Sealed for super::Encryption {}
    impl Sealed for super::PayloadDerivation {}
}

/// Passphrase purpose tag.
pub trait PassphrasePurpose: sealed::Sealed + Send + Sync + 'static {
    /// Purpose name used in `Debug` output.
    const NAME: &'static str;
}

/// Purposes whose passphrases may hold arbitrary caller-supplied bytes.
pub trait FreeformPurpose: PassphrasePurpose {}

/// Seed entropy fed to root key generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seed;

/// Passphrase encrypting private keys at rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encryption;

/// AEAD key protecting embedded derivation paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayloadDerivation;

impl PassphrasePurpose for Seed {
    const NAME: &'static str = "seed";
}

impl PassphrasePurpose for Encryption {
    const NAME: &'static str = "encryption";
}

impl PassphrasePurpose for PayloadDerivation {
    const NAME: &'static str = "payload-derivation";
}

impl FreeformPurpose for Seed {}
impl FreeformPurpose for Encryption {}

/// Secret bytes tagged with purpose `P`. Wiped on drop, never printed.
#[derive(Clone)]
pub struct Passphrase<P: PassphrasePurpose> {
    bytes: Zeroizing<Vec<u8>>,
    _purpose: PhantomData<P>,
}

impl<P: PassphrasePurpose> Passphrase<P> {
    fn wrap(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
            _purpose: PhantomData,
        }
    }

    /// Secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of secret bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for the empty passphrase.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl<P: FreeformPurpose> Passphrase<P> {
    /// Take ownership of caller-supplied secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self::wrap(bytes.into())
    }
}

impl Passphrase<Encryption> {
    /// The empty passphrase, under which keys are stored unencrypted.
    pub fn empty() -> Self {
        Self::wrap(Vec::new())
    }
}

impl Passphrase<PayloadDerivation> {
    /// Wrap an already derived 32-byte payload key.
    pub fn from_key(key: [u8; PAYLOAD_KEY_SIZE]) -> Self {
        let key = Zeroizing::new(key);
        Self::wrap(key.to_vec())
    }

    /// AEAD key view of this passphrase.
    pub(crate) fn secret_key(&self) -> SecretKey {
        // Both constructors produce exactly PAYLOAD_KEY_SIZE bytes.
        let mut key = Zeroizing::new([0u8; PAYLOAD_KEY_SIZE]);
        key.copy_from_slice(&self.bytes[..PAYLOAD_KEY_SIZE]);
        SecretKey::from_bytes(*key)
    }
}

impl<P: PassphrasePurpose> fmt::Debug for Passphrase<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passphrase<{}>(<redacted>)", P::NAME)
    }
}

/// Derive the payload passphrase from the raw bytes of a root extended
/// public key.
///
/// Byte-exact with legacy wallets; addresses already on the ledger are only
/// recoverable with exactly this output.
pub fn derive_payload_passphrase(root_public: &[u8]) -> Passphrase<PayloadDerivation> {
    let mut key = Zeroizing::new([0u8; PAYLOAD_KEY_SIZE]);
    pbkdf2_hmac_sha512(
        root_public,
        PAYLOAD_KEY_SALT,
        PAYLOAD_KEY_ROUNDS,
        &mut key[..],
    );
    Passphrase::wrap(key.to_vec())
}
