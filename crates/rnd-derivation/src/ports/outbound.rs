//! # Outbound Ports (Driven Ports / SPI)
//!
//! The extended-key engine this subsystem delegates curve arithmetic to.
//! It is a trusted primitive: results are taken as correct.

use crate::domain::entities::{XPrv, XPub};
use crate::domain::errors::RndResult;
use crate::domain::passphrase::{Encryption, Passphrase};

/// Child derivation algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DerivationScheme {
    /// Scheme 1, used by the legacy random scheme.
    V1,
    /// Scheme 2, used by sequential wallets.
    V2,
}

/// Extended-key engine.
///
/// Private keys are held encrypted under an encryption passphrase. Every
/// operation taking a passphrase is total: a wrong passphrase produces a
/// wrong but well-formed key, never an error.
pub trait ExtendedKeyEngine: Send + Sync {
    /// Generate a root key from a seed hash, encrypted under `passphrase`.
    ///
    /// # Errors
    /// `InvariantViolation` if the seed hash is unusable.
    fn generate(&self, seed_hash: &[u8], passphrase: &Passphrase<Encryption>) -> RndResult<XPrv>;

    /// Derive the child of `parent` at `index`.
    fn derive_child(
        &self,
        scheme: DerivationScheme,
        passphrase: &Passphrase<Encryption>,
        parent: &XPrv,
        index: u32,
    ) -> XPrv;

    /// Extended public key of `xprv`.
    fn to_public(&self, xprv: &XPrv) -> XPub;

    /// Re-encrypt `xprv` from `old` to `new`.
    fn reencrypt(
        &self,
        old: &Passphrase<Encryption>,
        new: &Passphrase<Encryption>,
        xprv: &XPrv,
    ) -> XPrv;

    /// Raw bytes of an extended public key, as hashed into the payload
    /// passphrase.
    fn raw_public_bytes<'a>(&self, xpub: &'a XPub) -> &'a [u8] {
        xpub.as_bytes()
    }
}
