//! # Integration Tests
//!
//! Wallet lifecycles driven through the public API only.

pub mod flows;
pub mod vectors;
