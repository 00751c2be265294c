//! # Batch Ownership Scan
//!
//! Checks many candidate addresses with one payload passphrase. Each check
//! is independent, so large batches are split across the rayon pool.
//! Results keep candidate order whichever way the batch ran.

use rayon::prelude::*;

use crate::domain::attributes::{decode_address_derivation_path, Ownership};
use crate::domain::config::ScanConfig;
use crate::domain::entities::DerivationPath;
use crate::domain::errors::{FormatError, RndResult};
use crate::domain::passphrase::{Passphrase, PayloadDerivation};

/// Summary of a batch scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// `(candidate index, path)` for every address that belongs to the wallet.
    pub matches: Vec<(usize, DerivationPath)>,
    /// Number of candidates that belong to someone else.
    pub not_mine: usize,
    /// `(candidate index, reason)` for every candidate that failed to decode.
    pub malformed: Vec<(usize, FormatError)>,
}

impl ScanReport {
    /// Number of candidates scanned.
    pub fn scanned(&self) -> usize {
        self.matches.len() + self.not_mine + self.malformed.len()
    }

    fn record(&mut self, index: usize, outcome: Ownership) {
        match outcome {
            Ownership::Decoded(path) => self.matches.push((index, path)),
            Ownership::NotMine => self.not_mine += 1,
            Ownership::Malformed(reason) => self.malformed.push((index, reason)),
        }
    }
}

impl FromIterator<Ownership> for ScanReport {
    fn from_iter<I: IntoIterator<Item = Ownership>>(outcomes: I) -> Self {
        let mut report = ScanReport::default();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            report.record(index, outcome);
        }
        report
    }
}

/// Check every candidate against `passphrase`.
///
/// # Errors
/// `InvalidConfig` if `config` does not validate.
pub fn scan_addresses<A>(
    passphrase: &Passphrase<PayloadDerivation>,
    candidates: &[A],
    config: &ScanConfig,
) -> RndResult<ScanReport>
where
    A: AsRef<[u8]> + Sync,
{
    config.validate()?;
    Ok(scan_validated(passphrase, candidates, config))
}

/// [`scan_addresses`] for a configuration the caller already validated.
pub(crate) fn scan_validated<A>(
    passphrase: &Passphrase<PayloadDerivation>,
    candidates: &[A],
    config: &ScanConfig,
) -> ScanReport
where
    A: AsRef<[u8]> + Sync,
{
    let check = |candidate: &A| decode_address_derivation_path(passphrase, candidate.as_ref());

    if config.runs_parallel(candidates.len()) {
        let outcomes: Vec<Ownership> = candidates
            .par_iter()
            .with_min_len(config.min_chunk_len)
            .map(check)
            .collect();
        outcomes.into_iter().collect()
    } else {
        candidates.iter().map(check).collect()
    }
}
