// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Ring oscillator based TRNG sampling.
//!
//! The hardware access is abstracted by the [`NoiseSource`] trait, [`Trng`]
//! implements the sampling protocol on top: oscillator configuration, polling
//! for samples and the escalation of the sampling parameters after hardware
//! self-test failures.

use crate::config::{
    TRNG_DEBUG_CONTROL_AUTOCORR_BYPASS, TRNG_DEBUG_CONTROL_CRNGT_BYPASS, TRNG_DEBUG_CONTROL_VNC_BYPASS,
    TRNG_ROSC_COUNT, TrngConfig,
};
use crate::{CryptoError, report_fatal};

/// Size of one hardware sample in bytes.
pub const TRNG_SAMPLE_SIZE: usize = 24;

/// Hardware self-test failures reported along with a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HwTestErrors {
    /// Autocorrelation test failure.
    pub autocorr: bool,
    /// Continuous random number generator test failure.
    pub crngt: bool,
    /// Von Neumann corrector failure.
    pub vnc: bool,
}

/// Noise source sampling status, as returned by [`NoiseSource::poll()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleStatus {
    /// Sampling is still in progress.
    Pending,
    /// A sample is available for [reading](NoiseSource::read_sample).
    Ready,
    /// At least one of the hardware self-tests failed, the sample buffer
    /// contents are not random.
    TestFailure(HwTestErrors),
}

/// Hardware noise source interface.
pub trait NoiseSource {
    /// Enable the noise source.
    ///
    /// # Arguments:
    ///
    /// * `rosc_id` - Ring oscillator to sample.
    /// * `subsampling_rate` - Number of RNG clock cycles between consecutive
    ///   oscillator samples.
    /// * `debug_control` - Hardware self-test bypass flags, a combination of
    ///   the `TRNG_DEBUG_CONTROL_*` bits.
    fn enable(&mut self, rosc_id: u32, subsampling_rate: u32, debug_control: u32);

    /// Poll the sampling status.
    fn poll(&mut self) -> SampleStatus;

    /// Read out a sample after [`poll()`](Self::poll) reported
    /// [`SampleStatus::Ready`]. Restarts the sampling.
    fn read_sample(&mut self, sample: &mut [u8; TRNG_SAMPLE_SIZE]);

    /// Stop sampling and discard collected bits after a self-test failure.
    fn reset_after_failure(&mut self);

    /// Disable the noise source.
    fn disable(&mut self);
}

/// Hardware self-test failure counters.
#[cfg(feature = "trng_statistics")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrngStatistics {
    pub autocorr_errors: u32,
    pub crngt_errors: u32,
    pub vnc_errors: u32,
}

/// TRNG sampling engine.
pub struct Trng<N: NoiseSource> {
    source: N,
    config: TrngConfig,
    max_attempts: u32,
    #[cfg(feature = "trng_statistics")]
    stats: TrngStatistics,
}

impl<N: NoiseSource> Trng<N> {
    /// Create a TRNG sampling engine.
    ///
    /// # Arguments:
    ///
    /// * `source` - The hardware noise source.
    /// * `config` - Initial sampling parameters.
    /// * `max_attempts` - Ceiling on the number of hardware self-test failures
    ///   tolerated within a single [`get_sample()`](Self::get_sample).
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidTrngConfig`] - The `config` is invalid.
    pub fn new(source: N, config: TrngConfig, max_attempts: u32) -> Result<Self, CryptoError> {
        if !config.is_valid() {
            return Err(CryptoError::InvalidTrngConfig);
        }
        Ok(Self {
            source,
            config,
            max_attempts,
            #[cfg(feature = "trng_statistics")]
            stats: TrngStatistics::default(),
        })
    }

    /// The current sampling parameters.
    pub fn get_config(&self) -> &TrngConfig {
        &self.config
    }

    /// Set the ring oscillator and subsampling rate.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidTrngConfig`] - The `rosc_id` is out of range or
    ///   the `subsampling_rate` is zero. The current configuration is left
    ///   unmodified.
    pub fn set_config(&mut self, rosc_id: u32, subsampling_rate: u32) -> Result<(), CryptoError> {
        let config = TrngConfig {
            rosc_id,
            subsampling_rate,
            ..self.config
        };
        if !config.is_valid() {
            log::error!("invalid TRNG configuration: rosc {}, rate {}", rosc_id, subsampling_rate);
            return Err(CryptoError::InvalidTrngConfig);
        }
        self.config = config;
        Ok(())
    }

    /// Check the current sampling parameters for validity.
    pub fn validate_config(&self) -> Result<(), CryptoError> {
        if !self.config.is_valid() {
            return Err(CryptoError::InvalidTrngConfig);
        }
        Ok(())
    }

    /// Select the hardware self-tests to bypass.
    pub fn set_hw_test_bypass(&mut self, bypass_autocorr: bool, bypass_crngt: bool, bypass_vnc: bool) {
        let mut debug_control = 0;
        if bypass_autocorr {
            debug_control |= TRNG_DEBUG_CONTROL_AUTOCORR_BYPASS;
        }
        if bypass_crngt {
            debug_control |= TRNG_DEBUG_CONTROL_CRNGT_BYPASS;
        }
        if bypass_vnc {
            debug_control |= TRNG_DEBUG_CONTROL_VNC_BYPASS;
        }
        self.config.debug_control = debug_control;
    }

    /// Configure the hardware for operation under SP800-90B.
    ///
    /// The raw noise gets health tested in software then, bypass the
    /// autocorrelation test and the von Neumann corrector, but keep the
    /// CRNGT. Disabling leaves the hardware configuration alone.
    pub fn sp800_90b_mode(&mut self, enable: bool) {
        if enable {
            self.set_hw_test_bypass(true, false, true);
        }
    }

    /// Start the noise source with the current sampling parameters.
    pub fn init(&mut self) {
        self.source.enable(
            self.config.rosc_id,
            self.config.subsampling_rate,
            self.config.debug_control,
        );
    }

    /// Disable the noise source.
    pub fn finish(&mut self) {
        self.source.disable();
    }

    /// Escalate the sampling parameters.
    ///
    /// Cycles through the ring oscillators first and doubles the subsampling
    /// rate, saturating, whenever wrapping around. Returns `false` if the
    /// parameters are at their maximum already.
    pub fn bump_parameters(&mut self) -> bool {
        let config = &mut self.config;
        if config.rosc_id == TRNG_ROSC_COUNT - 1 && config.subsampling_rate == u32::MAX {
            return false;
        }

        if config.rosc_id < TRNG_ROSC_COUNT - 1 {
            config.rosc_id += 1;
        } else {
            config.rosc_id = 0;
            config.subsampling_rate = config.subsampling_rate.saturating_mul(2);
        }
        true
    }

    /// Wait for and read out a sample.
    ///
    /// Hardware self-test failures restart the noise source with
    /// [escalated](Self::bump_parameters) sampling parameters.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::TooManyAttempts`] - The number of self-test failures
    ///   reached the attempt ceiling. The noise source is left disabled.
    ///   Reported as fatal.
    pub fn get_sample(&mut self, sample: &mut [u8; TRNG_SAMPLE_SIZE]) -> Result<(), CryptoError> {
        let mut attempts = 0;
        loop {
            match self.source.poll() {
                SampleStatus::Ready => break,
                SampleStatus::Pending => core::hint::spin_loop(),
                SampleStatus::TestFailure(errors) => {
                    self.source.reset_after_failure();
                    self.record_hw_test_errors(&errors);
                    self.bump_parameters();
                    log::warn!(
                        "TRNG self-test failure {:?}, continuing with rosc {}, rate {}",
                        errors,
                        self.config.rosc_id,
                        self.config.subsampling_rate
                    );
                    self.init();

                    attempts += 1;
                    if attempts >= self.max_attempts {
                        self.finish();
                        return Err(report_fatal(CryptoError::TooManyAttempts));
                    }
                }
            }
        }

        self.source.read_sample(sample);
        Ok(())
    }

    #[cfg(feature = "trng_statistics")]
    fn record_hw_test_errors(&mut self, errors: &HwTestErrors) {
        self.stats.autocorr_errors = self.stats.autocorr_errors.saturating_add(errors.autocorr as u32);
        self.stats.crngt_errors = self.stats.crngt_errors.saturating_add(errors.crngt as u32);
        self.stats.vnc_errors = self.stats.vnc_errors.saturating_add(errors.vnc as u32);
    }

    #[cfg(not(feature = "trng_statistics"))]
    fn record_hw_test_errors(&mut self, _errors: &HwTestErrors) {}

    /// Hardware self-test failure counters accumulated so far.
    #[cfg(feature = "trng_statistics")]
    pub fn stats(&self) -> &TrngStatistics {
        &self.stats
    }

    /// Reset the hardware self-test failure counters.
    #[cfg(feature = "trng_statistics")]
    pub fn clear_stats(&mut self) {
        self.stats = TrngStatistics::default();
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &N {
        &self.source
    }

    #[cfg(test)]
    pub(crate) fn source_mut(&mut self) -> &mut N {
        &mut self.source
    }
}

/// Scripted [`NoiseSource`] simulation.
///
/// Produces xorshift generated samples unless a fixed sample is set, with a
/// number of `Pending` polls before each, and reports queued self-test
/// failures first.
#[cfg(test)]
pub(crate) struct TestNoiseSource {
    pub(crate) failures: alloc::collections::VecDeque<HwTestErrors>,
    pub(crate) pending_polls: u32,
    pub(crate) fixed_sample: Option<[u8; TRNG_SAMPLE_SIZE]>,
    pub(crate) enabled: bool,
    pub(crate) enable_count: u32,
    pub(crate) last_enable: (u32, u32, u32),
    pub(crate) reset_count: u32,
    pub(crate) samples_read: u32,
    state: u64,
    polls_left: u32,
}

#[cfg(test)]
impl TestNoiseSource {
    pub(crate) fn new() -> Self {
        Self {
            failures: alloc::collections::VecDeque::new(),
            pending_polls: 2,
            fixed_sample: None,
            enabled: false,
            enable_count: 0,
            last_enable: (0, 0, 0),
            reset_count: 0,
            samples_read: 0,
            state: 0x9e3779b97f4a7c15,
            polls_left: 0,
        }
    }
}

#[cfg(test)]
impl NoiseSource for TestNoiseSource {
    fn enable(&mut self, rosc_id: u32, subsampling_rate: u32, debug_control: u32) {
        self.enabled = true;
        self.enable_count += 1;
        self.last_enable = (rosc_id, subsampling_rate, debug_control);
        self.polls_left = self.pending_polls;
    }

    fn poll(&mut self) -> SampleStatus {
        assert!(self.enabled);
        if self.polls_left > 0 {
            self.polls_left -= 1;
            return SampleStatus::Pending;
        }
        match self.failures.pop_front() {
            Some(errors) => SampleStatus::TestFailure(errors),
            None => SampleStatus::Ready,
        }
    }

    fn read_sample(&mut self, sample: &mut [u8; TRNG_SAMPLE_SIZE]) {
        assert!(self.enabled);
        self.samples_read += 1;
        self.polls_left = self.pending_polls;
        if let Some(fixed_sample) = self.fixed_sample {
            *sample = fixed_sample;
            return;
        }
        for chunk in sample.chunks_mut(8) {
            self.state ^= self.state << 13;
            self.state ^= self.state >> 7;
            self.state ^= self.state << 17;
            chunk.copy_from_slice(&self.state.to_le_bytes());
        }
    }

    fn reset_after_failure(&mut self) {
        self.reset_count += 1;
        self.enabled = false;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

#[cfg(test)]
fn test_trng() -> Trng<TestNoiseSource> {
    Trng::new(TestNoiseSource::new(), TrngConfig::default(), 10).unwrap()
}

#[test]
fn test_trng_config() {
    let mut trng = test_trng();
    assert!(matches!(
        Trng::new(
            TestNoiseSource::new(),
            TrngConfig {
                subsampling_rate: 0,
                ..TrngConfig::default()
            },
            10
        ),
        Err(CryptoError::InvalidTrngConfig)
    ));

    trng.set_config(3, 1000).unwrap();
    assert_eq!(trng.get_config().rosc_id, 3);
    assert_eq!(trng.get_config().subsampling_rate, 1000);
    assert!(matches!(trng.set_config(4, 1000), Err(CryptoError::InvalidTrngConfig)));
    assert!(matches!(trng.set_config(0, 0), Err(CryptoError::InvalidTrngConfig)));
    assert_eq!(trng.get_config().rosc_id, 3);
    trng.validate_config().unwrap();

    trng.set_hw_test_bypass(true, true, true);
    assert_eq!(trng.get_config().debug_control, 0b1110);
    trng.sp800_90b_mode(false);
    assert_eq!(trng.get_config().debug_control, 0b1110);
    trng.sp800_90b_mode(true);
    assert_eq!(
        trng.get_config().debug_control,
        TRNG_DEBUG_CONTROL_AUTOCORR_BYPASS | TRNG_DEBUG_CONTROL_VNC_BYPASS
    );

    trng.init();
    assert!(trng.source().enabled);
    assert_eq!(trng.source().last_enable, (3, 1000, 0b1010));
    trng.finish();
    assert!(!trng.source().enabled);
}

#[test]
fn test_trng_bump_parameters() {
    let mut trng = test_trng();
    trng.set_config(0, 0x1000).unwrap();
    for rosc_id in 1..TRNG_ROSC_COUNT {
        assert!(trng.bump_parameters());
        assert_eq!(trng.get_config().rosc_id, rosc_id);
        assert_eq!(trng.get_config().subsampling_rate, 0x1000);
    }
    assert!(trng.bump_parameters());
    assert_eq!(trng.get_config().rosc_id, 0);
    assert_eq!(trng.get_config().subsampling_rate, 0x2000);

    // The rate saturates, after which the oscillators get cycled once more.
    trng.set_config(3, 0x8000_0001).unwrap();
    assert!(trng.bump_parameters());
    assert_eq!(trng.get_config().rosc_id, 0);
    assert_eq!(trng.get_config().subsampling_rate, u32::MAX);
    for _ in 0..3 {
        assert!(trng.bump_parameters());
    }
    assert_eq!(trng.get_config().rosc_id, 3);
    assert!(!trng.bump_parameters());
    assert_eq!(trng.get_config().rosc_id, 3);
    assert_eq!(trng.get_config().subsampling_rate, u32::MAX);
}

#[test]
fn test_trng_get_sample() {
    let mut trng = test_trng();
    trng.init();
    let mut sample0 = [0u8; TRNG_SAMPLE_SIZE];
    let mut sample1 = [0u8; TRNG_SAMPLE_SIZE];
    trng.get_sample(&mut sample0).unwrap();
    trng.get_sample(&mut sample1).unwrap();
    assert_ne!(sample0, sample1);
    assert_eq!(trng.source().samples_read, 2);

    // Self-test failures bump the parameters and restart the source.
    let failure = HwTestErrors {
        autocorr: true,
        crngt: false,
        vnc: true,
    };
    trng.source_mut().failures.extend([failure, failure]);
    trng.get_sample(&mut sample0).unwrap();
    assert_eq!(trng.source().reset_count, 2);
    assert_eq!(trng.source().enable_count, 3);
    assert_eq!(trng.get_config().rosc_id, 2);
    #[cfg(feature = "trng_statistics")]
    {
        assert_eq!(
            *trng.stats(),
            TrngStatistics {
                autocorr_errors: 2,
                crngt_errors: 0,
                vnc_errors: 2
            }
        );
        trng.clear_stats();
        assert_eq!(*trng.stats(), TrngStatistics::default());
    }
    trng.finish();
}

#[test]
fn test_trng_too_many_attempts() {
    let mut trng = test_trng();
    trng.init();
    let failure = HwTestErrors {
        autocorr: false,
        crngt: true,
        vnc: false,
    };
    trng.source_mut().failures.extend([failure; 10]);
    let mut sample = [0u8; TRNG_SAMPLE_SIZE];
    assert!(matches!(trng.get_sample(&mut sample), Err(CryptoError::TooManyAttempts)));
    assert!(!trng.source().enabled);
    assert_eq!(trng.source().samples_read, 0);

    // One failure less than the ceiling gets tolerated.
    let mut trng = test_trng();
    trng.init();
    trng.source_mut().failures.extend([failure; 9]);
    trng.get_sample(&mut sample).unwrap();
    assert_eq!(trng.source().samples_read, 1);
}
