//! # Key Hierarchy
//!
//! Root → Account → Address derivation with scheme 1, plus passphrase
//! rotation. Every function here is deterministic in its inputs.
//!
//! ## Passphrase rotation hazard
//!
//! [`change_passphrase`] cannot tell whether `old` is the passphrase the
//! root key is encrypted under. A wrong `old` yields a well-formed key whose
//! secret no longer matches its public key, with no error. Callers verify
//! the old passphrase first.

use tracing::debug;

use crate::domain::entities::{
    Account, Address, DerivationPath, ParentLevel, RndKey, RndKeyBundle, Root,
};
use crate::domain::errors::RndResult;
use crate::domain::index::{AddressIndex, Hardened, Index};
use crate::domain::passphrase::{
    derive_payload_passphrase, Encryption, Passphrase, PayloadDerivation, Seed,
};
use crate::domain::seed::hash_seed;
use crate::ports::outbound::{DerivationScheme, ExtendedKeyEngine};

/// Indices used by [`build_key_bundle`]. Never a spendable address.
pub const SENTINEL_INDEX: Index<Hardened> = Index::<Hardened>::MIN;

/// Materialize the root key for a seed.
///
/// # Errors
/// `InvariantViolation` for a seed outside 16 to 255 bytes.
pub fn generate_root_key<E: ExtendedKeyEngine + ?Sized>(
    engine: &E,
    seed: &Passphrase<Seed>,
    passphrase: &Passphrase<Encryption>,
) -> RndResult<RndKey<Root>> {
    let seed_hash = hash_seed(seed)?;
    let xprv = engine.generate(&seed_hash, passphrase)?;
    debug!("[KeyHierarchy] root key materialized");
    Ok(RndKey::new(xprv))
}

/// Derive the child of `parent` one level down.
///
/// Any index is accepted; hardened and soft discipline belongs to callers.
pub fn derive_child<E, L>(
    engine: &E,
    passphrase: &Passphrase<Encryption>,
    parent: &RndKey<L>,
    index: u32,
) -> RndKey<L::Child>
where
    E: ExtendedKeyEngine + ?Sized,
    L: ParentLevel,
{
    RndKey::new(engine.derive_child(DerivationScheme::V1, passphrase, parent.xprv(), index))
}

/// Account key at a hardened index.
pub fn derive_account_key<E: ExtendedKeyEngine + ?Sized>(
    engine: &E,
    passphrase: &Passphrase<Encryption>,
    root: &RndKey<Root>,
    account: Index<Hardened>,
) -> RndKey<Account> {
    derive_child(engine, passphrase, root, account.value())
}

/// Address key at an index of either kind.
pub fn derive_address_key<E: ExtendedKeyEngine + ?Sized>(
    engine: &E,
    passphrase: &Passphrase<Encryption>,
    account: &RndKey<Account>,
    address: AddressIndex,
) -> RndKey<Address> {
    derive_child(engine, passphrase, account, address.value())
}

/// The wallet's payload passphrase. Depends on the root public key only,
/// in the raw form the engine reports for it.
pub fn payload_passphrase<E: ExtendedKeyEngine + ?Sized>(
    engine: &E,
    root: &RndKey<Root>,
) -> Passphrase<PayloadDerivation> {
    let root_xpub = engine.to_public(root.xprv());
    derive_payload_passphrase(engine.raw_public_bytes(&root_xpub))
}

/// Bundle at the sentinel path `(2^31, 2^31)`.
///
/// Used to obtain the payload passphrase alongside a complete key set.
pub fn build_key_bundle<E: ExtendedKeyEngine + ?Sized>(
    engine: &E,
    passphrase: &Passphrase<Encryption>,
    root: &RndKey<Root>,
) -> RndKeyBundle {
    build_key_bundle_at(
        engine,
        passphrase,
        root,
        SENTINEL_INDEX,
        AddressIndex::Hardened(SENTINEL_INDEX),
    )
}

/// Bundle at an explicit path.
pub fn build_key_bundle_at<E: ExtendedKeyEngine + ?Sized>(
    engine: &E,
    passphrase: &Passphrase<Encryption>,
    root: &RndKey<Root>,
    account: Index<Hardened>,
    address: AddressIndex,
) -> RndKeyBundle {
    let account_key = derive_account_key(engine, passphrase, root, account);
    let address_key = derive_address_key(engine, passphrase, &account_key, address);

    RndKeyBundle {
        root_key: root.clone(),
        account_key,
        address_key,
        path: DerivationPath::new(account, address),
        payload_passphrase: payload_passphrase(engine, root),
    }
}

/// Re-encrypt the root key under `new` and rebuild the sentinel bundle.
///
/// `old` is not verified. See the module docs.
pub fn change_passphrase<E: ExtendedKeyEngine + ?Sized>(
    engine: &E,
    old: &Passphrase<Encryption>,
    new: &Passphrase<Encryption>,
    root: &RndKey<Root>,
) -> RndKeyBundle {
    let rotated = RndKey::new(engine.reencrypt(old, new, root.xprv()));
    debug!("[KeyHierarchy] root key re-encrypted");
    build_key_bundle(engine, new, &rotated)
}
