//! Ownership scan configuration and validation
//!
//! Frozen protocol constants (PBKDF2 rounds, nonce, salts) are not
//! configurable; only how a batch scan is scheduled is.
//!
//! # Example
//!
//! ```ignore
//! use rnd_derivation::ScanConfigBuilder;
//!
//! let config = ScanConfigBuilder::new()
//!     .parallel_threshold(256)
//!     .min_chunk_len(32)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::errors::{RndError, RndResult};

/// Batch ownership scan configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Use the rayon pool for large batches
    pub parallel: bool,
    /// Batches smaller than this are scanned on the calling thread
    pub parallel_threshold: usize,
    /// Minimum number of candidates per rayon task
    pub min_chunk_len: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 64,
            min_chunk_len: 16,
        }
    }
}

impl ScanConfig {
    /// Create a new configuration with validation
    pub fn new(parallel: bool, parallel_threshold: usize, min_chunk_len: usize) -> RndResult<Self> {
        let config = Self {
            parallel,
            parallel_threshold,
            min_chunk_len,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sequential configuration
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> RndResult<()> {
        if self.parallel_threshold == 0 {
            return Err(RndError::InvalidConfig(
                "parallel_threshold cannot be 0".to_string(),
            ));
        }

        if self.min_chunk_len == 0 {
            return Err(RndError::InvalidConfig(
                "min_chunk_len cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether a batch of `len` candidates goes to the rayon pool
    pub fn runs_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.parallel_threshold
    }

    // The with_* setters do not validate. Scans validate before use.

    /// Builder-style method to toggle parallel scanning
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builder-style method to set the parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Builder-style method to set the minimum chunk length
    pub fn with_min_chunk_len(mut self, len: usize) -> Self {
        self.min_chunk_len = len;
        self
    }
}

/// Builder for ScanConfig with validation
#[derive(Default)]
pub struct ScanConfigBuilder {
    parallel: Option<bool>,
    parallel_threshold: Option<usize>,
    min_chunk_len: Option<usize>,
}

impl ScanConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel scanning
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Set the batch size from which scans run in parallel (must be ≥ 1)
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }

    /// Set the minimum number of candidates per task (must be ≥ 1)
    pub fn min_chunk_len(mut self, len: usize) -> Self {
        self.min_chunk_len = Some(len);
        self
    }

    /// Build the ScanConfig, validating all parameters
    pub fn build(self) -> RndResult<ScanConfig> {
        let defaults = ScanConfig::default();

        let config = ScanConfig {
            parallel: self.parallel.unwrap_or(defaults.parallel),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
            min_chunk_len: self.min_chunk_len.unwrap_or(defaults.min_chunk_len),
        };

        config.validate()?;
        Ok(config)
    }
}
