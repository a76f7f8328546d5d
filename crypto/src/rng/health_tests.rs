// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! NIST SP800-90B continuous health tests for a binary noise source.
//!
//! Two tests run on every raw TRNG sample while enabled:
//! - The Repetition Count Test (SP800-90B, 4.4.1) tracks the current run of
//!   identical bits, scanning each byte from its least significant bit.
//! - The Adaptive Proportion Test (SP800-90B, 4.4.2) counts the zero bits
//!   within consecutive windows of [`APT_WINDOW_SIZE`] bits.
//!
//! In addition, a startup test gets armed whenever testing is enabled: before
//! any sample is released, [`STARTUP_TEST_SAMPLES`] samples are drawn, run
//! through the continuous tests and discarded.

use crate::config::HealthTestConfig;
use crate::utils_common::bitmanip::bytes_zero_bits;
use crate::{CryptoError, report_fatal};

/// Adaptive Proportion Test window size in bits.
pub const APT_WINDOW_SIZE: u32 = 1024;

/// Adaptive Proportion Test cutoff for an entropy estimate of 0.5 bits per
/// sample and a false positive probability of 2^-40.
pub const APT_DEFAULT_CUTOFF: u32 = 821;

/// Repetition Count Test cutoff for an entropy estimate of 0.5 bits per
/// sample and a false positive probability of 2^-40.
pub const RCT_DEFAULT_CUTOFF: u32 = 81;

/// Number of TRNG samples consumed by the startup test.
pub const STARTUP_TEST_SAMPLES: usize = 22;

/// SP800-90B health test state.
#[derive(Debug)]
pub struct HealthTests {
    apt_cutoff: u32,
    rct_cutoff: u32,

    total_bits_count: u32,
    number_of_0s: u32,
    number_of_contiguous_0s: u32,
    number_of_contiguous_1s: u32,

    continuous: bool,
    startup: bool,
}

impl HealthTests {
    /// Create a disabled health test state.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidThreshold`] - The configured cutoffs are out of
    ///   range, c.f. [`set_config()`](Self::set_config).
    pub fn new(config: &HealthTestConfig) -> Result<Self, CryptoError> {
        let mut tests = Self {
            apt_cutoff: APT_DEFAULT_CUTOFF,
            rct_cutoff: RCT_DEFAULT_CUTOFF,
            total_bits_count: 0,
            number_of_0s: 0,
            number_of_contiguous_0s: 0,
            number_of_contiguous_1s: 0,
            continuous: false,
            startup: false,
        };
        tests.set_config(config.apt_cutoff, config.rct_cutoff)?;
        Ok(tests)
    }

    /// Reconfigure the test cutoffs.
    ///
    /// # Arguments:
    ///
    /// * `apt_cutoff` - Adaptive Proportion Test cutoff, must be in the range
    ///   (`APT_WINDOW_SIZE / 2`, `APT_WINDOW_SIZE`].
    /// * `rct_cutoff` - Repetition Count Test cutoff, must be in the range (1,
    ///   `APT_WINDOW_SIZE`].
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidThreshold`] - Either cutoff is out of range.
    pub fn set_config(&mut self, apt_cutoff: u32, rct_cutoff: u32) -> Result<(), CryptoError> {
        if apt_cutoff <= APT_WINDOW_SIZE / 2 || apt_cutoff > APT_WINDOW_SIZE {
            return Err(CryptoError::InvalidThreshold);
        }
        if rct_cutoff <= 1 || rct_cutoff > APT_WINDOW_SIZE {
            return Err(CryptoError::InvalidThreshold);
        }
        self.apt_cutoff = apt_cutoff;
        self.rct_cutoff = rct_cutoff;
        Ok(())
    }

    /// Enable or disable SP800-90B testing.
    ///
    /// Enabling arms the continuous tests as well as the startup test,
    /// disabling clears all of the state.
    pub fn sp800_90b_mode(&mut self, enable: bool) {
        self.reset_counters();
        self.continuous = enable;
        self.startup = enable;
        log::debug!("SP800-90B health tests {}", if enable { "enabled" } else { "disabled" });
    }

    /// Whether the continuous tests are enabled.
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Whether the startup test is pending.
    pub fn is_startup_pending(&self) -> bool {
        self.startup
    }

    pub(crate) fn startup_done(&mut self) {
        self.startup = false;
        log::debug!("SP800-90B startup test completed");
    }

    /// Run both continuous tests on a sample.
    ///
    /// A partially filled Adaptive Proportion Test window carries over to the
    /// next invocation. On failure, all counters get reset and the startup
    /// test is rearmed, so that the noise source gets revalidated before any
    /// more samples are released.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::RepetitionCountTestFailure`] - A run of identical bits
    ///   reached the cutoff. Reported as fatal.
    /// * [`CryptoError::AdaptiveProportionTestFailure`] - A window's zero or
    ///   one bit count reached the cutoff. Reported as fatal.
    pub fn continuous_test(&mut self, sample: &[u8]) -> Result<(), CryptoError> {
        let result = self
            .repetition_count_test(sample)
            .and_then(|_| self.adaptive_proportion_test(sample));
        if let Err(e) = result {
            self.reset_counters();
            self.startup = self.continuous;
            return Err(report_fatal(e));
        }
        Ok(())
    }

    fn repetition_count_test(&mut self, sample: &[u8]) -> Result<(), CryptoError> {
        for byte in sample.iter() {
            for bit in 0..8 {
                if (byte >> bit) & 1 != 0 {
                    self.number_of_contiguous_1s += 1;
                    self.number_of_contiguous_0s = 0;
                } else {
                    self.number_of_contiguous_0s += 1;
                    self.number_of_contiguous_1s = 0;
                }
                if self.number_of_contiguous_0s >= self.rct_cutoff || self.number_of_contiguous_1s >= self.rct_cutoff
                {
                    return Err(CryptoError::RepetitionCountTestFailure);
                }
            }
        }
        Ok(())
    }

    fn adaptive_proportion_test(&mut self, mut sample: &[u8]) -> Result<(), CryptoError> {
        while !sample.is_empty() {
            let bytes_left_in_window = ((APT_WINDOW_SIZE - self.total_bits_count) / 8) as usize;
            let counted;
            (counted, sample) = sample.split_at(sample.len().min(bytes_left_in_window));
            self.number_of_0s += bytes_zero_bits(counted);
            self.total_bits_count += 8 * counted.len() as u32;

            if self.total_bits_count == APT_WINDOW_SIZE {
                let number_of_1s = APT_WINDOW_SIZE - self.number_of_0s;
                if self.number_of_0s >= self.apt_cutoff || number_of_1s >= self.apt_cutoff {
                    return Err(CryptoError::AdaptiveProportionTestFailure);
                }
                self.total_bits_count = 0;
                self.number_of_0s = 0;
            }
        }
        Ok(())
    }

    fn reset_counters(&mut self) {
        self.total_bits_count = 0;
        self.number_of_0s = 0;
        self.number_of_contiguous_0s = 0;
        self.number_of_contiguous_1s = 0;
    }
}

#[cfg(test)]
fn test_health_tests() -> HealthTests {
    let mut tests = HealthTests::new(&HealthTestConfig::default()).unwrap();
    tests.sp800_90b_mode(true);
    tests
}

#[test]
fn test_set_config() {
    let mut tests = test_health_tests();
    assert!(tests.set_config(APT_WINDOW_SIZE / 2 + 1, 2).is_ok());
    assert!(tests.set_config(APT_WINDOW_SIZE, APT_WINDOW_SIZE).is_ok());
    assert!(matches!(
        tests.set_config(APT_WINDOW_SIZE / 2, RCT_DEFAULT_CUTOFF),
        Err(CryptoError::InvalidThreshold)
    ));
    assert!(matches!(
        tests.set_config(APT_WINDOW_SIZE + 1, RCT_DEFAULT_CUTOFF),
        Err(CryptoError::InvalidThreshold)
    ));
    assert!(matches!(
        tests.set_config(APT_DEFAULT_CUTOFF, 1),
        Err(CryptoError::InvalidThreshold)
    ));
    assert!(matches!(
        tests.set_config(APT_DEFAULT_CUTOFF, APT_WINDOW_SIZE + 1),
        Err(CryptoError::InvalidThreshold)
    ));

    assert!(matches!(
        HealthTests::new(&HealthTestConfig {
            apt_cutoff: 0,
            rct_cutoff: RCT_DEFAULT_CUTOFF
        }),
        Err(CryptoError::InvalidThreshold)
    ));
}

#[test]
fn test_repetition_count_test() {
    // 80 zero bits followed by a one pass.
    let mut tests = test_health_tests();
    let mut sample = [0u8; 11];
    sample[10] = 0x01;
    tests.continuous_test(&sample).unwrap();

    // 81 zero bits fail, at the 81st.
    sample[10] = 0x02;
    let mut tests = test_health_tests();
    assert!(matches!(
        tests.continuous_test(&sample),
        Err(CryptoError::RepetitionCountTestFailure)
    ));

    // Runs of ones are tracked independently, also across invocations.
    let mut tests = test_health_tests();
    tests.continuous_test(&[0x00, 0xff, 0xff, 0xff, 0xff, 0xff]).unwrap();
    tests.continuous_test(&[0xff, 0xff, 0xff, 0xff, 0xff]).unwrap();
    assert!(matches!(
        tests.continuous_test(&[0x01]),
        Err(CryptoError::RepetitionCountTestFailure)
    ));
    // The failure rearmed the startup test and reset the run.
    assert!(tests.is_startup_pending());
    tests.continuous_test(&[0xff]).unwrap();
}

#[test]
fn test_adaptive_proportion_test() {
    // Balanced bits pass over many windows.
    let mut tests = test_health_tests();
    for _ in 0..100 {
        tests.continuous_test(&[0x55u8; 24]).unwrap();
    }

    // Seven zeros per byte: the window completes on the 128th byte, after
    // the sixth 24 byte sample.
    let mut tests = test_health_tests();
    for _ in 0..5 {
        tests.continuous_test(&[0x01u8; 24]).unwrap();
    }
    assert!(matches!(
        tests.continuous_test(&[0x01u8; 24]),
        Err(CryptoError::AdaptiveProportionTestFailure)
    ));

    // Seven ones per byte fail just the same.
    let mut tests = test_health_tests();
    assert!(matches!(
        tests.continuous_test(&[0xfeu8; 128]),
        Err(CryptoError::AdaptiveProportionTestFailure)
    ));

    // 896 zeros per window hit a cutoff of 896, but not one of 897.
    let mut tests = test_health_tests();
    tests.set_config(897, RCT_DEFAULT_CUTOFF).unwrap();
    tests.continuous_test(&[0x01u8; 256]).unwrap();
    tests.set_config(896, RCT_DEFAULT_CUTOFF).unwrap();
    assert!(matches!(
        tests.continuous_test(&[0x01u8; 128]),
        Err(CryptoError::AdaptiveProportionTestFailure)
    ));
}

#[test]
fn test_adaptive_proportion_test_default_cutoff() {
    // One full window made of bytes with seven and bytes with six bits of the
    // majority kind, for 7 * n + 6 * (128 - n) = 768 + n in total.
    fn window(n: usize, seven: u8, six: u8) -> [u8; 128] {
        let mut window = [six; 128];
        window[..n].fill(seven);
        window
    }
    let zeros_820 = window(52, 0x01, 0x03);
    let zeros_821 = window(53, 0x01, 0x03);
    let ones_820 = window(52, 0xfe, 0xfc);
    let ones_821 = window(53, 0xfe, 0xfc);
    assert_eq!(bytes_zero_bits(&zeros_820), 820);
    assert_eq!(bytes_zero_bits(&zeros_821), 821);
    assert_eq!(APT_WINDOW_SIZE - bytes_zero_bits(&ones_820), 820);
    assert_eq!(APT_WINDOW_SIZE - bytes_zero_bits(&ones_821), 821);

    // Keep the repetition count test out of the way.
    let mut tests = test_health_tests();
    tests.set_config(APT_DEFAULT_CUTOFF, APT_WINDOW_SIZE).unwrap();

    // Just below the cutoff passes, and every window gets counted afresh.
    for _ in 0..3 {
        tests.continuous_test(&zeros_820).unwrap();
        tests.continuous_test(&ones_820).unwrap();
    }
    assert!(matches!(
        tests.continuous_test(&zeros_821),
        Err(CryptoError::AdaptiveProportionTestFailure)
    ));

    // The failure restarted the window.
    tests.continuous_test(&zeros_820).unwrap();
    assert!(matches!(
        tests.continuous_test(&ones_821),
        Err(CryptoError::AdaptiveProportionTestFailure)
    ));

    // A window split across samples is counted as a whole.
    tests.continuous_test(&zeros_821[..100]).unwrap();
    assert!(matches!(
        tests.continuous_test(&zeros_821[100..]),
        Err(CryptoError::AdaptiveProportionTestFailure)
    ));
}

#[test]
fn test_sp800_90b_mode() {
    let mut tests = HealthTests::new(&HealthTestConfig::default()).unwrap();
    assert!(!tests.is_continuous());
    assert!(!tests.is_startup_pending());
    tests.sp800_90b_mode(true);
    assert!(tests.is_continuous());
    assert!(tests.is_startup_pending());
    tests.startup_done();
    assert!(!tests.is_startup_pending());

    // Disabling drops partial windows and runs.
    tests.continuous_test(&[0x00u8; 10]).unwrap();
    tests.sp800_90b_mode(false);
    assert!(!tests.is_continuous());
    assert!(!tests.is_startup_pending());
    tests.continuous_test(&[0x00u8; 10]).unwrap();
}
