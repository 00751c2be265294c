//! # Legacy Random-Scheme Derivation
//!
//! Hierarchical-deterministic key derivation for legacy ("random scheme")
//! Cardano wallets, kept for backward compatibility with addresses already on
//! the ledger.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure derivation and codec logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Adapters Layer** (`adapters/`): The Ed25519-BIP32 extended-key engine (legacy V1 and V2)
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Data flow
//!
//! ```text
//! generation:  seed ─→ hash_seed ─→ root ─→ account ─→ address
//!                                    │
//!                                    └─→ payload passphrase ─→ encrypt(encode(path)) ─→ attribute 1
//!
//! recovery:    address ─→ attributes ─→ decrypt ─┬─→ decode ─→ Decoded(path)
//!                                                └─→ NotMine
//! ```
//!
//! ## Wire format
//!
//! Every byte layout is frozen: seed hashing, the payload passphrase, the
//! path encoding and the payload cipher must match legacy wallets exactly or
//! existing addresses become unrecoverable.
//!
//! ## Security Notes
//!
//! - **Secrets**: passphrases and private keys zeroize on drop and print
//!   redacted
//! - **Ownership probing**: an authentication failure is `NotMine`, a normal
//!   outcome that is never logged
//! - **Passphrase rotation**: the old passphrase is not verified

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::ed25519::Ed25519Bip32Engine;
pub use domain::attributes::{
    decode_address_derivation_path, encode_derivation_path_attribute, AddressAttributes,
    AddressPayload, Ownership, DERIVATION_PATH_ATTRIBUTE, PUBLIC_KEY_ADDRESS_TYPE,
};
pub use domain::config::{ScanConfig, ScanConfigBuilder};
pub use domain::entities::{
    Account, Address, DerivationPath, KeyLevel, Level, ParentLevel, RndKey, RndKeyBundle, Root,
    XPrv, XPub,
};
pub use domain::errors::{FormatError, RndError, RndResult};
pub use domain::hierarchy::{
    build_key_bundle, build_key_bundle_at, change_passphrase, derive_account_key,
    derive_address_key, derive_child, generate_root_key, payload_passphrase, SENTINEL_INDEX,
};
pub use domain::index::{AddressIndex, Hardened, Index, IndexKind, Soft, HARDENED_OFFSET};
pub use domain::passphrase::{
    derive_payload_passphrase, Encryption, Passphrase, PassphrasePurpose, PayloadDerivation, Seed,
};
pub use domain::path_codec::{decode_derivation_path, encode_derivation_path};
pub use domain::payload::{decrypt_payload, encrypt_payload, PAYLOAD_NONCE};
pub use domain::scan::{scan_addresses, ScanReport};
pub use domain::seed::hash_seed;
pub use domain::wallet_key::{RndWallet, SchemeKind, WalletKey};
pub use ports::inbound::RndDerivationApi;
pub use ports::outbound::{DerivationScheme, ExtendedKeyEngine};
pub use service::RndDerivationService;
pub use shared_crypto::Decryption;
