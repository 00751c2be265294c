//! # Inbound Ports (Driving Ports / API)
//!
//! The operations the surrounding wallet engine calls. All of them are pure
//! functions of their arguments.

use crate::domain::attributes::Ownership;
use crate::domain::entities::{Account, Address, DerivationPath, RndKey, RndKeyBundle, Root};
use crate::domain::errors::{FormatError, RndResult};
use crate::domain::index::{AddressIndex, Hardened, Index};
use crate::domain::passphrase::{Encryption, Passphrase, PayloadDerivation, Seed};
use crate::domain::scan::ScanReport;

/// Random-scheme derivation API.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait RndDerivationApi: Send + Sync {
    // =========================================================================
    // Key hierarchy
    // =========================================================================

    /// Materialize the root key for a seed.
    ///
    /// # Errors
    /// `InvariantViolation` for a seed outside 16 to 255 bytes.
    fn generate_root_key(
        &self,
        seed: &Passphrase<Seed>,
        passphrase: &Passphrase<Encryption>,
    ) -> RndResult<RndKey<Root>>;

    /// Account private key at a hardened index.
    fn derive_account_private_key(
        &self,
        passphrase: &Passphrase<Encryption>,
        root: &RndKey<Root>,
        account: Index<Hardened>,
    ) -> RndKey<Account>;

    /// Address private key at an index of either kind.
    fn derive_address_private_key(
        &self,
        passphrase: &Passphrase<Encryption>,
        account: &RndKey<Account>,
        address: AddressIndex,
    ) -> RndKey<Address>;

    /// Key bundle at the sentinel path, carrying the payload passphrase.
    fn build_key_bundle(
        &self,
        passphrase: &Passphrase<Encryption>,
        root: &RndKey<Root>,
    ) -> RndKeyBundle;

    /// Re-encrypt the root key and rebuild its bundle.
    ///
    /// # Security
    /// `old` is not checked. A wrong `old` silently yields a corrupt key;
    /// verify it before calling.
    fn change_passphrase(
        &self,
        old: &Passphrase<Encryption>,
        new: &Passphrase<Encryption>,
        root: &RndKey<Root>,
    ) -> RndKeyBundle;

    // =========================================================================
    // Derivation path payloads
    // =========================================================================

    /// CBOR encoding of a path.
    fn encode_derivation_path(&self, path: &DerivationPath) -> Result<Vec<u8>, FormatError>;

    /// Encrypted attribute value embedding `path` in an address.
    fn encode_derivation_path_attribute(
        &self,
        passphrase: &Passphrase<PayloadDerivation>,
        path: &DerivationPath,
    ) -> RndResult<Vec<u8>>;

    /// Decode a path produced by `encode_derivation_path`.
    fn decode_derivation_path(&self, bytes: &[u8]) -> Result<DerivationPath, FormatError>;

    /// Check one address payload for ownership.
    fn decode_address_derivation_path(
        &self,
        passphrase: &Passphrase<PayloadDerivation>,
        address: &[u8],
    ) -> Ownership;

    /// Check a batch of address payloads for ownership.
    ///
    /// # Performance
    /// Large batches run on the rayon pool.
    fn scan_addresses(
        &self,
        passphrase: &Passphrase<PayloadDerivation>,
        candidates: &[Vec<u8>],
    ) -> ScanReport;
}
