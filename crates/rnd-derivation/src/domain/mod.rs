//! # Domain Layer
//!
//! Pure derivation and codec logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod attributes;
pub(crate) mod cbor;
pub mod config;
pub mod entities;
pub mod errors;
pub mod hierarchy;
pub mod index;
pub mod passphrase;
pub mod path_codec;
pub mod payload;
pub mod scan;
pub mod seed;
pub mod wallet_key;
