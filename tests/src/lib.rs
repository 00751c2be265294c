//! # Random Derivation Test Suite
//!
//! Unified test crate for the workspace.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # End-to-end wallet flows across crates
//! └── benches/           # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rnd-tests
//!
//! # Integration flows only
//! cargo test -p rnd-tests integration::
//!
//! # Benchmarks
//! cargo bench -p rnd-tests
//! ```

pub mod integration;
