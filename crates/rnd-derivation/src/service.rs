//! # Random Derivation Service
//!
//! Application service layer that implements the `RndDerivationApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`RndDerivationApi`)
//! - Uses the outbound port (`ExtendedKeyEngine`) for curve arithmetic
//! - Delegates codec and cipher work to the domain layer

use tracing::debug;

use crate::domain::attributes::{self, Ownership};
use crate::domain::config::ScanConfig;
use crate::domain::entities::{Account, Address, DerivationPath, RndKey, RndKeyBundle, Root};
use crate::domain::errors::{FormatError, RndResult};
use crate::domain::hierarchy;
use crate::domain::index::{AddressIndex, Hardened, Index};
use crate::domain::passphrase::{Encryption, Passphrase, PayloadDerivation, Seed};
use crate::domain::path_codec;
use crate::domain::scan::{self, ScanReport};
use crate::ports::inbound::RndDerivationApi;
use crate::ports::outbound::ExtendedKeyEngine;

/// Random-scheme derivation service.
///
/// Stateless apart from its engine and scan configuration; share it freely
/// between threads.
pub struct RndDerivationService<E: ExtendedKeyEngine> {
    engine: E,
    config: ScanConfig,
}

impl<E: ExtendedKeyEngine> RndDerivationService<E> {
    /// Create a service with the default scan configuration.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            config: ScanConfig::default(),
        }
    }

    /// Create a service with an explicit scan configuration.
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration does not validate.
    pub fn with_config(engine: E, config: ScanConfig) -> RndResult<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    /// The extended-key engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The scan configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The wallet's payload passphrase.
    pub fn payload_passphrase(&self, root: &RndKey<Root>) -> Passphrase<PayloadDerivation> {
        hierarchy::payload_passphrase(&self.engine, root)
    }
}

impl<E: ExtendedKeyEngine> RndDerivationApi for RndDerivationService<E> {
    fn generate_root_key(
        &self,
        seed: &Passphrase<Seed>,
        passphrase: &Passphrase<Encryption>,
    ) -> RndResult<RndKey<Root>> {
        hierarchy::generate_root_key(&self.engine, seed, passphrase)
    }

    fn derive_account_private_key(
        &self,
        passphrase: &Passphrase<Encryption>,
        root: &RndKey<Root>,
        account: Index<Hardened>,
    ) -> RndKey<Account> {
        hierarchy::derive_account_key(&self.engine, passphrase, root, account)
    }

    fn derive_address_private_key(
        &self,
        passphrase: &Passphrase<Encryption>,
        account: &RndKey<Account>,
        address: AddressIndex,
    ) -> RndKey<Address> {
        hierarchy::derive_address_key(&self.engine, passphrase, account, address)
    }

    fn build_key_bundle(
        &self,
        passphrase: &Passphrase<Encryption>,
        root: &RndKey<Root>,
    ) -> RndKeyBundle {
        hierarchy::build_key_bundle(&self.engine, passphrase, root)
    }

    fn change_passphrase(
        &self,
        old: &Passphrase<Encryption>,
        new: &Passphrase<Encryption>,
        root: &RndKey<Root>,
    ) -> RndKeyBundle {
        hierarchy::change_passphrase(&self.engine, old, new, root)
    }

    fn encode_derivation_path(&self, path: &DerivationPath) -> Result<Vec<u8>, FormatError> {
        path_codec::encode_derivation_path(path)
    }

    fn encode_derivation_path_attribute(
        &self,
        passphrase: &Passphrase<PayloadDerivation>,
        path: &DerivationPath,
    ) -> RndResult<Vec<u8>> {
        attributes::encode_derivation_path_attribute(passphrase, path)
    }

    fn decode_derivation_path(&self, bytes: &[u8]) -> Result<DerivationPath, FormatError> {
        path_codec::decode_derivation_path(bytes)
    }

    fn decode_address_derivation_path(
        &self,
        passphrase: &Passphrase<PayloadDerivation>,
        address: &[u8],
    ) -> Ownership {
        attributes::decode_address_derivation_path(passphrase, address)
    }

    fn scan_addresses(
        &self,
        passphrase: &Passphrase<PayloadDerivation>,
        candidates: &[Vec<u8>],
    ) -> ScanReport {
        let parallel = self.config.runs_parallel(candidates.len());
        let report = scan::scan_validated(passphrase, candidates, &self.config);

        for (index, reason) in &report.malformed {
            debug!(
                candidate = index,
                error = %reason,
                "[RndDerivationService] skipping malformed address"
            );
        }
        debug!(
            scanned = report.scanned(),
            matches = report.matches.len(),
            malformed = report.malformed.len(),
            parallel,
            "[RndDerivationService] ownership scan complete"
        );

        report
    }
}
