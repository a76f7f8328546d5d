// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Random number generation: TRNG sampling, SP800-90B health tests, DRBGs and
//! the system RNG service built on top.

use crate::CryptoError;
use core::convert;

pub mod entropy;
pub mod fast;
pub mod hash_drbg;
pub mod health_tests;
pub mod hmac_drbg;
pub mod system_rng;
pub mod trng;

pub use hash_drbg::HashDrbg;
pub use hmac_drbg::HmacDrbg;
pub use system_rng::{RngQuality, SystemRng};

/// Error type returned by [`RngCore::generate()`](RngCore::generate).
#[derive(Debug)]
pub enum RngGenerateError {
    /// A reseed is required before producing more random data.
    ReseedRequired,
    /// Some crypto primitive failed its operation.
    CryptoError(CryptoError),
}

impl convert::From<convert::Infallible> for RngGenerateError {
    fn from(value: convert::Infallible) -> Self {
        match value {}
    }
}

impl convert::From<CryptoError> for RngGenerateError {
    fn from(value: CryptoError) -> Self {
        RngGenerateError::CryptoError(value)
    }
}

impl convert::From<RngGenerateError> for CryptoError {
    fn from(value: RngGenerateError) -> Self {
        match value {
            RngGenerateError::ReseedRequired => CryptoError::RngFailure,
            RngGenerateError::CryptoError(e) => e,
        }
    }
}

/// Main functionality implemented by random number generators.
///
/// The trait is `dyn`-compatible, algorithms needing randomness, like the
/// projective blinding in scalar multiplication, take a `&mut dyn RngCore`.
pub trait RngCore {
    /// Generate random bytes.
    ///
    /// # Arguments:
    ///
    /// * `output` - Destination buffer to fill with random data.
    /// * `additional_input` - Optional additional input to consider from the
    ///   random number generation process. How it's used depend on the actual
    ///   implementation, the most common cases being that the additional data
    ///   is either not considered at all or that it's getting mixed into the
    ///   random number generators internal state in a non-destructive manner
    ///   before generating random output.
    fn generate(&mut self, output: &mut [u8], additional_input: Option<&[u8]>) -> Result<(), RngGenerateError>;
}

/// Error type returned by [`Drbg::reseed()`](Drbg::reseed).
#[derive(Debug)]
pub enum RngReseedError {
    CryptoError(CryptoError),
}

impl convert::From<convert::Infallible> for RngReseedError {
    fn from(value: convert::Infallible) -> Self {
        match value {}
    }
}

impl convert::From<CryptoError> for RngReseedError {
    fn from(value: CryptoError) -> Self {
        RngReseedError::CryptoError(value)
    }
}

impl convert::From<RngReseedError> for CryptoError {
    fn from(value: RngReseedError) -> Self {
        match value {
            RngReseedError::CryptoError(e) => e,
        }
    }
}

/// Deterministic random bit generator as specified by NIST SP800-90Ar1.
///
/// Implemented by the [`HmacDrbg`] and [`HashDrbg`] constructions, the
/// [`SystemRng`] is generic over it.
pub trait Drbg: RngCore + Sized {
    /// Construction parameters, e.g. the underlying hash algorithm.
    type Params: Copy;

    /// Minimum entropy data length in units of Bytes required for
    /// instantiation or a reseed.
    fn min_seed_entropy_len(params: Self::Params) -> usize;

    /// Instantiate the DRBG.
    ///
    /// # Arguments:
    ///
    /// * `params` - Construction parameters.
    /// * `entropy` - The seed entropy. Must be at least
    ///   [`min_seed_entropy_len()`](Self::min_seed_entropy_len) in length.
    /// * `nonce` - The `nonce` input parameter specified in NIST SP800-90Ar1.
    /// * `personalization` - The `personalization` input parameter specified in
    ///   NIST SP800-90Ar1.
    fn instantiate(
        params: Self::Params,
        entropy: &[u8],
        nonce: Option<&[u8]>,
        personalization: Option<&[u8]>,
    ) -> Result<Self, CryptoError>;

    /// Reseed the DRBG.
    ///
    /// # Arguments:
    ///
    /// * `entropy` - The entropy to reseed from.
    /// * `additional_input` - Optional additional input mixed into the state
    ///   alongside the `entropy`.
    fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<(), RngReseedError>;

    /// Limit the number of generate requests served between two reseeds.
    ///
    /// Once exhausted, [`generate()`](RngCore::generate) fails with
    /// [`RngGenerateError::ReseedRequired`]. Values exceeding the
    /// construction's own limit get clamped.
    fn set_reseed_interval(&mut self, interval: u64);
}

/// Check that `nrequests` more DRBG generate requests fit into the reseed
/// interval.
///
/// The `reseed_counter` is one for the first request after a (re)seed.
/// Requests larger than a construction's maximum request length get served in
/// multiple chunks, each counting as a request of its own. Checking them all
/// up front makes sure a generate either produces its output completely or
/// not at all.
pub(crate) fn check_reseed_budget(
    reseed_counter: u64,
    reseed_interval: u64,
    nrequests: usize,
) -> Result<(), RngGenerateError> {
    if nrequests == 0 {
        return Ok(());
    }
    let last_request = reseed_counter.saturating_add(u64::try_from(nrequests - 1).unwrap_or(u64::MAX));
    if last_request > reseed_interval {
        return Err(RngGenerateError::ReseedRequired);
    }
    Ok(())
}

#[cfg(test)]
pub fn test_rng() -> HashDrbg {
    use super::hash;
    use alloc::vec;

    let hash_alg = hash::test_hash_alg();
    let min_entropy_len = HashDrbg::min_seed_entropy_len(hash_alg);
    let entropy = vec![0u8; min_entropy_len];
    HashDrbg::instantiate(hash_alg, &entropy, None, None).unwrap()
}

#[test]
fn test_check_reseed_budget() {
    assert!(check_reseed_budget(1, 1, 0).is_ok());
    assert!(check_reseed_budget(1, 1, 1).is_ok());
    assert!(matches!(
        check_reseed_budget(1, 1, 2),
        Err(RngGenerateError::ReseedRequired)
    ));
    assert!(matches!(
        check_reseed_budget(2, 1, 1),
        Err(RngGenerateError::ReseedRequired)
    ));
    assert!(check_reseed_budget(3, 5, 3).is_ok());
    assert!(matches!(
        check_reseed_budget(3, 5, 4),
        Err(RngGenerateError::ReseedRequired)
    ));
    assert!(check_reseed_budget(u64::MAX - 1, u64::MAX - 1, usize::MAX).is_err());
}
