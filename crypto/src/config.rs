// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Crypto core configuration.
//!
//! The structures here get populated by the platform integration and passed
//! to the respective service object constructors. Build time variants
//! (curves, DRBG backend, DPA mitigations) are selected through Cargo
//! features instead.

use crate::rng::health_tests;

/// Number of available ring oscillators.
pub const TRNG_ROSC_COUNT: u32 = 4;

/// Bit in [`TrngConfig::debug_control`] bypassing the hardware autocorrelation test.
pub const TRNG_DEBUG_CONTROL_AUTOCORR_BYPASS: u32 = 1 << 3;
/// Bit in [`TrngConfig::debug_control`] bypassing the hardware CRNGT test.
pub const TRNG_DEBUG_CONTROL_CRNGT_BYPASS: u32 = 1 << 2;
/// Bit in [`TrngConfig::debug_control`] bypassing the von Neumann corrector.
pub const TRNG_DEBUG_CONTROL_VNC_BYPASS: u32 = 1 << 1;

/// Ring oscillator sampling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrngConfig {
    /// Selected ring oscillator, in the range `0..TRNG_ROSC_COUNT`.
    pub rosc_id: u32,
    /// Number of RNG clock cycles between consecutive ROSC samples, nonzero.
    pub subsampling_rate: u32,
    /// Hardware self-test bypass flags, a combination of the
    /// `TRNG_DEBUG_CONTROL_*` bits.
    pub debug_control: u32,
}

impl TrngConfig {
    /// Check the oscillator id and subsampling rate for validity.
    pub fn is_valid(&self) -> bool {
        self.rosc_id < TRNG_ROSC_COUNT && self.subsampling_rate != 0
    }
}

impl Default for TrngConfig {
    fn default() -> Self {
        Self {
            rosc_id: 0,
            subsampling_rate: 0x1337,
            debug_control: 0,
        }
    }
}

/// SP800-90B continuous health test cutoffs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthTestConfig {
    /// Adaptive Proportion Test cutoff: number of equal bits within one
    /// window triggering a failure.
    pub apt_cutoff: u32,
    /// Repetition Count Test cutoff: run length of identical bits triggering
    /// a failure.
    pub rct_cutoff: u32,
}

impl Default for HealthTestConfig {
    fn default() -> Self {
        Self {
            apt_cutoff: health_tests::APT_DEFAULT_CUTOFF,
            rct_cutoff: health_tests::RCT_DEFAULT_CUTOFF,
        }
    }
}

/// Top-level crypto core configuration.
#[derive(Clone, Copy, Debug)]
pub struct CoreConfig {
    /// Ceiling on hardware sampling retries as well as on rejection sampling
    /// iterations.
    pub max_attempts: u32,
    /// Initial TRNG parameters.
    pub trng: TrngConfig,
    /// SP800-90B health test cutoffs.
    pub health_tests: HealthTestConfig,
    /// Whether permutations and word copies get randomized.
    pub dpa_mitigations: bool,
    /// DRBG generate requests served between two reseeds.
    pub drbg_reseed_limit: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            trng: TrngConfig::default(),
            health_tests: HealthTestConfig::default(),
            dpa_mitigations: cfg!(feature = "dpa_mitigations"),
            drbg_reseed_limit: u32::MAX,
        }
    }
}

#[test]
fn test_trng_config_validity() {
    assert!(TrngConfig::default().is_valid());
    let mut config = TrngConfig {
        rosc_id: 3,
        ..TrngConfig::default()
    };
    assert!(config.is_valid());
    config.rosc_id = 4;
    assert!(!config.is_valid());
    config.rosc_id = 0;
    config.subsampling_rate = 0;
    assert!(!config.is_valid());
}
