//! # Wallet Key Capability
//!
//! Common surface over the derivation schemes a wallet engine may hold keys
//! for. Only the random scheme lives in this crate.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{DerivationPath, RndKey, Root, XPrv, XPub};
use crate::domain::errors::RndResult;
use crate::domain::hierarchy::{derive_account_key, derive_address_key};
use crate::domain::index::{AddressIndex, Hardened, Index};
use crate::domain::passphrase::{Encryption, Passphrase};
use crate::ports::outbound::ExtendedKeyEngine;

/// Address derivation scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemeKind {
    /// Legacy random scheme: paths are embedded, encrypted, in addresses.
    Random,
}

/// Capabilities shared by wallet root keys of every scheme.
pub trait WalletKey: Sized {
    /// Scheme this key belongs to.
    fn scheme(&self) -> SchemeKind;

    /// Extended public key of the wallet root.
    fn public_key(&self) -> XPub;

    /// Private key of the address at `path`.
    fn derive_path(
        &self,
        passphrase: &Passphrase<Encryption>,
        path: &DerivationPath,
    ) -> RndResult<XPrv>;

    /// The same wallet with its key re-encrypted under `new`.
    ///
    /// `old` is trusted as given.
    fn change_passphrase(
        &self,
        old: &Passphrase<Encryption>,
        new: &Passphrase<Encryption>,
    ) -> Self;
}

/// Random-scheme wallet root bound to the engine that interprets it.
#[derive(Clone, Debug)]
pub struct RndWallet<'e, E: ?Sized> {
    engine: &'e E,
    root: RndKey<Root>,
}

impl<'e, E: ExtendedKeyEngine + ?Sized> RndWallet<'e, E> {
    /// Bind `root` to `engine`.
    pub fn new(engine: &'e E, root: RndKey<Root>) -> Self {
        Self { engine, root }
    }

    /// The root key.
    pub fn root(&self) -> &RndKey<Root> {
        &self.root
    }
}

impl<E: ExtendedKeyEngine + ?Sized> WalletKey for RndWallet<'_, E> {
    fn scheme(&self) -> SchemeKind {
        SchemeKind::Random
    }

    fn public_key(&self) -> XPub {
        self.engine.to_public(self.root.xprv())
    }

    /// # Errors
    /// `IndexOutOfRange` if the account index is not hardened.
    fn derive_path(
        &self,
        passphrase: &Passphrase<Encryption>,
        path: &DerivationPath,
    ) -> RndResult<XPrv> {
        let account = Index::<Hardened>::new(path.account_index)?;
        let account_key = derive_account_key(self.engine, passphrase, &self.root, account);
        let address_key = derive_address_key(
            self.engine,
            passphrase,
            &account_key,
            AddressIndex::from(path.address_index),
        );
        Ok(address_key.into_xprv())
    }

    fn change_passphrase(
        &self,
        old: &Passphrase<Encryption>,
        new: &Passphrase<Encryption>,
    ) -> Self {
        let root = RndKey::new(self.engine.reencrypt(old, new, self.root.xprv()));
        Self::new(self.engine, root)
    }
}
