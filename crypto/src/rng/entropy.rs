// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Entropy collection from the TRNG.

use super::health_tests::{HealthTests, STARTUP_TEST_SAMPLES};
use super::trng::{NoiseSource, TRNG_SAMPLE_SIZE, Trng};
use crate::CryptoError;
use crate::config::CoreConfig;

/// Entropy source combining the [`Trng`] sampling with the SP800-90B
/// [`HealthTests`].
pub struct EntropySource<N: NoiseSource> {
    trng: Trng<N>,
    health_tests: HealthTests,
}

impl<N: NoiseSource> EntropySource<N> {
    /// Create an entropy source.
    ///
    /// The health tests start out disabled, c.f.
    /// [`sp800_90b_mode()`](Self::sp800_90b_mode).
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidTrngConfig`] - The TRNG configuration is invalid.
    /// * [`CryptoError::InvalidThreshold`] - The health test cutoffs are out
    ///   of range.
    pub fn new(source: N, config: &CoreConfig) -> Result<Self, CryptoError> {
        let trng = Trng::new(source, config.trng, config.max_attempts)?;
        let health_tests = HealthTests::new(&config.health_tests)?;
        Ok(Self { trng, health_tests })
    }

    /// Fill a buffer with raw entropy.
    ///
    /// If a startup test is pending, [`STARTUP_TEST_SAMPLES`] samples get drawn
    /// and discarded first. The TRNG gets disabled again before returning, in
    /// the error case as well.
    ///
    /// # Arguments:
    ///
    /// * `entropy` - Destination buffer, its length must be a multiple of
    ///   [`TRNG_SAMPLE_SIZE`].
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidInputLength`] - The `entropy` buffer's length is
    ///   not a multiple of [`TRNG_SAMPLE_SIZE`].
    /// * [`CryptoError::InvalidTrngConfig`] - The TRNG configuration is invalid.
    /// * [`CryptoError::TooManyAttempts`] - The TRNG hardware self-tests kept
    ///   failing.
    /// * [`CryptoError::RepetitionCountTestFailure`],
    ///   [`CryptoError::AdaptiveProportionTestFailure`] - A health test failed.
    pub fn get_entropy(&mut self, entropy: &mut [u8]) -> Result<(), CryptoError> {
        if entropy.len() % TRNG_SAMPLE_SIZE != 0 {
            return Err(CryptoError::InvalidInputLength);
        }
        self.trng.validate_config()?;

        self.trng.init();
        let result = self._get_entropy(entropy);
        self.trng.finish();
        result
    }

    fn _get_entropy(&mut self, entropy: &mut [u8]) -> Result<(), CryptoError> {
        let mut sample = [0u8; TRNG_SAMPLE_SIZE];
        if self.health_tests.is_startup_pending() {
            for _ in 0..STARTUP_TEST_SAMPLES {
                self.trng.get_sample(&mut sample)?;
                self.health_tests.continuous_test(&sample)?;
            }
            self.health_tests.startup_done();
        }

        for chunk in entropy.chunks_exact_mut(TRNG_SAMPLE_SIZE) {
            self.trng.get_sample(&mut sample)?;
            if self.health_tests.is_continuous() {
                self.health_tests.continuous_test(&sample)?;
            }
            chunk.copy_from_slice(&sample);
        }
        Ok(())
    }

    /// Enable or disable SP800-90B operation.
    ///
    /// Enabling arms the health tests and configures the TRNG's hardware
    /// self-tests accordingly.
    pub fn sp800_90b_mode(&mut self, enable: bool) {
        self.health_tests.sp800_90b_mode(enable);
        self.trng.sp800_90b_mode(enable);
    }

    /// Reconfigure the health test cutoffs.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidThreshold`] - Either cutoff is out of range.
    pub fn sp800_90b_set_config(&mut self, apt_cutoff: u32, rct_cutoff: u32) -> Result<(), CryptoError> {
        self.health_tests.set_config(apt_cutoff, rct_cutoff)
    }

    /// The underlying TRNG.
    pub fn trng(&self) -> &Trng<N> {
        &self.trng
    }

    /// The underlying TRNG, e.g. for reconfiguration.
    pub fn trng_mut(&mut self) -> &mut Trng<N> {
        &mut self.trng
    }

    /// The SP800-90B health test state.
    pub fn health_tests(&self) -> &HealthTests {
        &self.health_tests
    }
}

#[cfg(test)]
use super::trng::{HwTestErrors, TestNoiseSource};

#[cfg(test)]
fn test_entropy_source() -> EntropySource<TestNoiseSource> {
    EntropySource::new(TestNoiseSource::new(), &CoreConfig::default()).unwrap()
}

#[test]
fn test_get_entropy() {
    let mut source = test_entropy_source();
    let mut entropy = [0u8; 2 * TRNG_SAMPLE_SIZE];
    source.get_entropy(&mut entropy).unwrap();
    assert!(entropy.iter().any(|b| *b != 0));
    assert_ne!(entropy[..TRNG_SAMPLE_SIZE], entropy[TRNG_SAMPLE_SIZE..]);
    assert_eq!(source.trng().source().samples_read, 2);
    assert!(!source.trng().source().enabled);

    source.get_entropy(&mut [0u8; 0]).unwrap();

    let mut entropy = [0u8; TRNG_SAMPLE_SIZE + 1];
    assert!(matches!(
        source.get_entropy(&mut entropy),
        Err(CryptoError::InvalidInputLength)
    ));
    assert_eq!(source.trng().source().samples_read, 2);
}

#[test]
fn test_get_entropy_startup_test() {
    let mut source = test_entropy_source();
    source.sp800_90b_mode(true);
    assert!(source.health_tests().is_startup_pending());
    assert_eq!(source.trng().get_config().debug_control, 0b1010);

    let mut entropy = [0u8; 3 * TRNG_SAMPLE_SIZE];
    source.get_entropy(&mut entropy).unwrap();
    assert_eq!(source.trng().source().samples_read, STARTUP_TEST_SAMPLES as u32 + 3);
    assert!(!source.health_tests().is_startup_pending());

    source.get_entropy(&mut entropy).unwrap();
    assert_eq!(source.trng().source().samples_read, STARTUP_TEST_SAMPLES as u32 + 6);
}

#[test]
fn test_get_entropy_health_test_failure() {
    let mut source = test_entropy_source();
    source.sp800_90b_mode(true);
    source.trng_mut().source_mut().fixed_sample = Some([0u8; TRNG_SAMPLE_SIZE]);
    let mut entropy = [0u8; TRNG_SAMPLE_SIZE];
    assert!(matches!(
        source.get_entropy(&mut entropy),
        Err(CryptoError::RepetitionCountTestFailure)
    ));
    assert!(!source.trng().source().enabled);
    assert!(source.health_tests().is_startup_pending());

    // The stuck source passes without the health tests.
    source.sp800_90b_mode(false);
    source.get_entropy(&mut entropy).unwrap();
    assert_eq!(entropy, [0u8; TRNG_SAMPLE_SIZE]);
}

#[test]
fn test_get_entropy_trng_failure() {
    let mut source = test_entropy_source();
    source.sp800_90b_set_config(1024, 2).unwrap();
    assert!(matches!(
        source.sp800_90b_set_config(1024, 1),
        Err(CryptoError::InvalidThreshold)
    ));

    let failure = HwTestErrors {
        autocorr: true,
        crngt: false,
        vnc: false,
    };
    source.trng_mut().source_mut().failures.extend([failure; 100]);
    let mut entropy = [0u8; TRNG_SAMPLE_SIZE];
    assert!(matches!(
        source.get_entropy(&mut entropy),
        Err(CryptoError::TooManyAttempts)
    ));
    assert!(!source.trng().source().enabled);
}
