//! # Domain Entities
//!
//! Key material, hierarchy levels and derivation paths for the random scheme.
//!
//! ## Key layout
//!
//! | Type | Size | Layout |
//! |------|------|--------|
//! | [`XPrv`] | 128 | encrypted extended secret (64) ‖ public key (32) ‖ chain code (32) |
//! | [`XPub`] | 64 | public key (32) ‖ chain code (32) |
//!
//! The extended secret is stored encrypted under the wallet's encryption
//! passphrase. Only the extended-key engine interprets it.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::errors::{RndError, RndResult};
use crate::domain::index::{AddressIndex, Hardened, Index};
use crate::domain::passphrase::{Passphrase, PayloadDerivation};

/// Size of an encoded extended private key.
pub const XPRV_SIZE: usize = 128;

/// Size of an encoded extended public key.
pub const XPUB_SIZE: usize = 64;

/// Size of a raw public key.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of a chain code.
pub const CHAIN_CODE_SIZE: usize = 32;

// =============================================================================
// Extended keys
// =============================================================================

/// Extended private key with its secret half encrypted at rest.
///
/// Wiped on drop. Equality is constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct XPrv([u8; XPRV_SIZE]);

impl XPrv {
    /// Wrap an encoded key.
    pub fn from_bytes(bytes: [u8; XPRV_SIZE]) -> Self {
        Self(bytes)
    }

    /// Wrap an encoded key from a slice.
    ///
    /// # Errors
    /// `InvariantViolation` if `bytes` is not exactly 128 bytes.
    pub fn from_slice(bytes: &[u8]) -> RndResult<Self> {
        if bytes.len() != XPRV_SIZE {
            return Err(RndError::InvariantViolation(format!(
                "extended private key must be {} bytes, got {}",
                XPRV_SIZE,
                bytes.len()
            )));
        }
        let mut key = [0u8; XPRV_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Encoded key bytes.
    pub fn as_bytes(&self) -> &[u8; XPRV_SIZE] {
        &self.0
    }
}

impl PartialEq for XPrv {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for XPrv {}

impl fmt::Debug for XPrv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XPrv(<redacted>)")
    }
}

/// Extended public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct XPub([u8; XPUB_SIZE]);

impl XPub {
    /// Wrap an encoded key.
    pub const fn from_bytes(bytes: [u8; XPUB_SIZE]) -> Self {
        Self(bytes)
    }

    /// Wrap an encoded key from a slice.
    ///
    /// # Errors
    /// `InvariantViolation` if `bytes` is not exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> RndResult<Self> {
        if bytes.len() != XPUB_SIZE {
            return Err(RndError::InvariantViolation(format!(
                "extended public key must be {} bytes, got {}",
                XPUB_SIZE,
                bytes.len()
            )));
        }
        let mut key = [0u8; XPUB_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Raw bytes: public key followed by chain code.
    pub fn as_bytes(&self) -> &[u8; XPUB_SIZE] {
        &self.0
    }

    /// The 32-byte Ed25519 public key.
    pub fn public_key(&self) -> &[u8] {
        &self.0[..PUBLIC_KEY_SIZE]
    }

    /// The 32-byte chain code.
    pub fn chain_code(&self) -> &[u8] {
        &self.0[PUBLIC_KEY_SIZE..]
    }
}

impl fmt::Debug for XPub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XPub(")?;
        for byte in &self.0[..8] {
            write!(f, "{:02x}", byte)?;
        }
        f.write_str("..)")
    }
}

// =============================================================================
// Hierarchy levels
// =============================================================================

/// Runtime view of a key's hierarchy level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Wallet root, derived from the seed.
    Root,
    /// First level below the root.
    Account,
    /// Leaf level; one key per address.
    Address,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Root => f.write_str("root"),
            Level::Account => f.write_str("account"),
            Level::Address => f.write_str("address"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Root {}
    impl Sealed for super::Account {}
    impl Sealed for super::Address {}
}

/// Type-level hierarchy tag.
pub trait KeyLevel: sealed::Sealed + Send + Sync + 'static {
    /// Runtime level.
    const LEVEL: Level;
}

/// A level with a child level directly below it.
///
/// Only `Root → Account` and `Account → Address` exist, so a key can never
/// skip a level.
pub trait ParentLevel: KeyLevel {
    /// The level directly below.
    type Child: KeyLevel;
}

/// Root level marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Root;

/// Account level marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account;

/// Address level marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Address;

impl KeyLevel for Root {
    const LEVEL: Level = Level::Root;
}

impl KeyLevel for Account {
    const LEVEL: Level = Level::Account;
}

impl KeyLevel for Address {
    const LEVEL: Level = Level::Address;
}

impl ParentLevel for Root {
    type Child = Account;
}

impl ParentLevel for Account {
    type Child = Address;
}

/// Extended private key tagged with its hierarchy level.
#[derive(Clone, PartialEq, Eq)]
pub struct RndKey<L: KeyLevel> {
    xprv: XPrv,
    _level: PhantomData<L>,
}

impl<L: KeyLevel> RndKey<L> {
    /// Tag an extended key with level `L`.
    pub fn new(xprv: XPrv) -> Self {
        Self {
            xprv,
            _level: PhantomData,
        }
    }

    /// The underlying extended key.
    pub fn xprv(&self) -> &XPrv {
        &self.xprv
    }

    /// Drop the level tag.
    pub fn into_xprv(self) -> XPrv {
        self.xprv
    }

    /// Hierarchy level of this key.
    pub fn level(&self) -> Level {
        L::LEVEL
    }
}

impl<L: KeyLevel> fmt::Debug for RndKey<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RndKey")
            .field("level", &L::LEVEL)
            .field("xprv", &self.xprv)
            .finish()
    }
}

// =============================================================================
// Derivation path
// =============================================================================

/// An (account index, address index) pair embedded in addresses.
///
/// Indices decoded from the ledger are kept verbatim; range discipline is
/// applied only when building a path from typed indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DerivationPath {
    /// Account index, hardened for every path this wallet issues.
    pub account_index: u32,
    /// Address index.
    pub address_index: u32,
}

impl DerivationPath {
    /// Build a path from a hardened account index and an address index of
    /// either kind.
    pub fn new(account: Index<Hardened>, address: impl Into<AddressIndex>) -> Self {
        Self {
            account_index: account.value(),
            address_index: address.into().value(),
        }
    }

    /// Build a path from raw indices without range checks.
    pub const fn from_raw(account_index: u32, address_index: u32) -> Self {
        Self {
            account_index,
            address_index,
        }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}/{:#x}", self.account_index, self.address_index)
    }
}

// =============================================================================
// Key bundle
// =============================================================================

/// A fully materialized derivation instance.
///
/// Built on demand and never persisted.
#[derive(Clone, Debug)]
pub struct RndKeyBundle {
    /// Wallet root key.
    pub root_key: RndKey<Root>,
    /// Account key at `path.account_index`.
    pub account_key: RndKey<Account>,
    /// Address key at `path.address_index`.
    pub address_key: RndKey<Address>,
    /// Indices used for the account and address keys.
    pub path: DerivationPath,
    /// Symmetric key protecting embedded derivation paths.
    pub payload_passphrase: Passphrase<PayloadDerivation>,
}
