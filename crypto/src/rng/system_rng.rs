// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! System random number generation service.

extern crate alloc;
use alloc::vec::Vec;

use super::entropy::EntropySource;
use super::fast::{XORSHIFT128PLUS_SEED_LEN, XorShift128Plus};
use super::trng::{NoiseSource, TRNG_SAMPLE_SIZE};
use super::{Drbg, RngCore, RngGenerateError};
use crate::config::CoreConfig;
use crate::utils_common::{
    alloc::{try_alloc_identity_index_vec, try_alloc_zeroizing_vec},
    bitmanip::UBitManip as _,
    zeroize,
};
use crate::{CryptoError, report_fatal};
use core::convert;

/// Maximum number of words [copied](SystemRng::dpa_hardened_word_copy) in a
/// single randomized order.
pub const DPA_WORD_COPY_CHUNK_LEN: usize = 32;

/// Selects the generator backing a random data request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RngQuality {
    /// The non-cryptographic [`XorShift128Plus`] generator. Not suitable for
    /// key material.
    Fast = 0,
    /// The DRBG.
    Crypto = 1,
}

impl convert::TryFrom<u32> for RngQuality {
    type Error = CryptoError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Fast),
            1 => Ok(Self::Crypto),
            _ => Err(CryptoError::InvalidRngSelector),
        }
    }
}

/// System random number generator.
///
/// Owns the [`EntropySource`] as well as the two generators seeded from it:
/// a [fast](RngQuality::Fast) one and a [DRBG](RngQuality::Crypto). Both get
/// instantiated lazily, upon their first use.
pub struct SystemRng<N: NoiseSource, D: Drbg> {
    entropy: EntropySource<N>,
    fast: Option<XorShift128Plus>,
    drbg: Option<D>,
    drbg_params: D::Params,
    drbg_reseed_limit: u32,
    max_attempts: u32,
    dpa_mitigations: bool,
}

impl<N: NoiseSource, D: Drbg> SystemRng<N, D> {
    /// Create a system random number generator.
    ///
    /// # Arguments:
    ///
    /// * `source` - The hardware noise source.
    /// * `drbg_params` - The DRBG construction parameters.
    /// * `config` - The crypto core configuration.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidTrngConfig`] - The TRNG configuration is invalid.
    /// * [`CryptoError::InvalidThreshold`] - The health test cutoffs are out
    ///   of range.
    pub fn new(source: N, drbg_params: D::Params, config: &CoreConfig) -> Result<Self, CryptoError> {
        let entropy = EntropySource::new(source, config)?;
        Ok(Self {
            entropy,
            fast: None,
            drbg: None,
            drbg_params,
            drbg_reseed_limit: config.drbg_reseed_limit,
            max_attempts: config.max_attempts,
            dpa_mitigations: config.dpa_mitigations,
        })
    }

    /// Fill a buffer with random data.
    ///
    /// # Arguments:
    ///
    /// * `output` - The destination buffer.
    /// * `quality` - The generator to draw from.
    ///
    /// # Errors:
    ///
    /// Entropy collection errors from the generator's (re)seeding, c.f.
    /// [`EntropySource::get_entropy()`], as well as DRBG failures.
    pub fn get_random(&mut self, output: &mut [u8], quality: RngQuality) -> Result<(), CryptoError> {
        match quality {
            RngQuality::Fast => self.generate_fast(output),
            RngQuality::Crypto => self.generate_crypto(output, None),
        }
    }

    fn generate_fast(&mut self, output: &mut [u8]) -> Result<(), CryptoError> {
        let fast = match self.fast.take() {
            Some(fast) => fast,
            None => {
                let mut seed = zeroize::Zeroizing::from([0u8; TRNG_SAMPLE_SIZE]);
                self.entropy.get_entropy(seed.as_mut_slice())?;
                let mut fast_seed = zeroize::Zeroizing::from([0u8; XORSHIFT128PLUS_SEED_LEN]);
                fast_seed.copy_from_slice(&seed[..XORSHIFT128PLUS_SEED_LEN]);
                log::debug!("fast RNG seeded");
                XorShift128Plus::from_seed(&fast_seed)
            }
        };
        self.fast.insert(fast).fill_bytes(output);
        Ok(())
    }

    fn drbg_seed_len(params: D::Params) -> usize {
        D::min_seed_entropy_len(params)
            .max(TRNG_SAMPLE_SIZE)
            .next_multiple_of(TRNG_SAMPLE_SIZE)
    }

    fn get_seed(entropy: &mut EntropySource<N>, len: usize) -> Result<zeroize::Zeroizing<Vec<u8>>, CryptoError> {
        let mut seed = try_alloc_zeroizing_vec::<u8>(len)?;
        entropy.get_entropy(&mut seed)?;
        Ok(seed)
    }

    fn generate_crypto(&mut self, output: &mut [u8], additional_input: Option<&[u8]>) -> Result<(), CryptoError> {
        let seed_len = Self::drbg_seed_len(self.drbg_params);
        let drbg = match self.drbg.take() {
            Some(drbg) => drbg,
            None => {
                let seed = Self::get_seed(&mut self.entropy, seed_len)?;
                let mut drbg = D::instantiate(self.drbg_params, &seed, None, None)?;
                drbg.set_reseed_interval(self.drbg_reseed_limit as u64);
                log::debug!("system DRBG seeded");
                drbg
            }
        };
        let drbg = self.drbg.insert(drbg);

        match drbg.generate(output, additional_input) {
            Ok(()) => Ok(()),
            Err(RngGenerateError::ReseedRequired) => {
                let seed = Self::get_seed(&mut self.entropy, seed_len)?;
                drbg.reseed(&seed, None)?;
                log::debug!("system DRBG reseeded");
                drbg.generate(output, additional_input).map_err(CryptoError::from)
            }
            Err(RngGenerateError::CryptoError(e)) => Err(e),
        }
    }

    /// Draw a uniformly distributed integer from the range [0, `bound`).
    ///
    /// Random values get masked to `bound`'s bit length and rejected if out of
    /// range.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidParams`] - The `bound` is zero.
    /// * [`CryptoError::TooManyAttempts`] - All of the configured number of
    ///   draws got rejected. Reported as fatal.
    /// * Any error from [`get_random()`](Self::get_random).
    pub fn get_random_uint(&mut self, bound: u32, quality: RngQuality) -> Result<u32, CryptoError> {
        if bound == 0 {
            return Err(CryptoError::InvalidParams);
        }

        let mask = bound.range_mask();
        for _ in 0..self.max_attempts {
            let mut buf = [0u8; 4];
            self.get_random(&mut buf, quality)?;
            let value = u32::from_ne_bytes(buf) & mask;
            if value < bound {
                return Ok(value);
            }
        }
        Err(report_fatal(CryptoError::TooManyAttempts))
    }

    /// Fill a buffer with a permutation of `[0, 1, ..., permutation.len() - 1]`.
    ///
    /// The permutation is the identity unless DPA mitigations are
    /// configured, in which case it's shuffled with Fisher-Yates.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidInputLength`] - The length exceeds the range of
    ///   `u32`.
    /// * Any error from [`get_random_uint()`](Self::get_random_uint).
    pub fn get_random_permutation(&mut self, permutation: &mut [usize], quality: RngQuality) -> Result<(), CryptoError> {
        for (i, p) in permutation.iter_mut().enumerate() {
            *p = i;
        }
        self.shuffle(permutation, quality)
    }

    /// Allocate a random permutation of `[0, 1, ..., len - 1]`, c.f.
    /// [`get_random_permutation()`](Self::get_random_permutation).
    pub fn random_permutation(&mut self, len: usize, quality: RngQuality) -> Result<Vec<usize>, CryptoError> {
        let mut permutation = try_alloc_identity_index_vec(len)?;
        self.shuffle(&mut permutation, quality)?;
        Ok(permutation)
    }

    fn shuffle(&mut self, permutation: &mut [usize], quality: RngQuality) -> Result<(), CryptoError> {
        if !self.dpa_mitigations {
            return Ok(());
        }

        let len = u32::try_from(permutation.len()).map_err(|_| CryptoError::InvalidInputLength)?;
        for idx in 0..len {
            let offset = self.get_random_uint(len - idx, quality)?;
            permutation.swap(idx as usize, (idx + offset) as usize);
        }
        Ok(())
    }

    /// Copy words in a randomized order.
    ///
    /// The words get copied in chunks of at most [`DPA_WORD_COPY_CHUNK_LEN`],
    /// each in the order of an independent [`RngQuality::Fast`] permutation.
    /// A plain copy if DPA mitigations are not configured.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidInputLength`] - The lengths of `dst` and `src`
    ///   differ.
    /// * Any error from [`get_random_permutation()`](Self::get_random_permutation).
    pub fn dpa_hardened_word_copy(&mut self, dst: &mut [u32], src: &[u32]) -> Result<(), CryptoError> {
        if dst.len() != src.len() {
            return Err(CryptoError::InvalidInputLength);
        }
        if !self.dpa_mitigations {
            dst.copy_from_slice(src);
            return Ok(());
        }

        let mut order = [0usize; DPA_WORD_COPY_CHUNK_LEN];
        for (dst, src) in dst
            .chunks_mut(DPA_WORD_COPY_CHUNK_LEN)
            .zip(src.chunks(DPA_WORD_COPY_CHUNK_LEN))
        {
            let order = &mut order[..dst.len()];
            self.get_random_permutation(order, RngQuality::Fast)?;
            for i in order.iter() {
                dst[*i] = src[*i];
            }
        }
        Ok(())
    }

    /// Fill a buffer with raw entropy, c.f. [`EntropySource::get_entropy()`].
    pub fn get_entropy(&mut self, entropy: &mut [u8]) -> Result<(), CryptoError> {
        self.entropy.get_entropy(entropy)
    }

    /// Enable or disable SP800-90B operation of the entropy source.
    pub fn sp800_90b_mode(&mut self, enable: bool) {
        self.entropy.sp800_90b_mode(enable)
    }

    /// Reconfigure the entropy source's health test cutoffs.
    pub fn sp800_90b_set_config(&mut self, apt_cutoff: u32, rct_cutoff: u32) -> Result<(), CryptoError> {
        self.entropy.sp800_90b_set_config(apt_cutoff, rct_cutoff)
    }

    pub fn entropy_source(&self) -> &EntropySource<N> {
        &self.entropy
    }

    pub fn entropy_source_mut(&mut self) -> &mut EntropySource<N> {
        &mut self.entropy
    }
}

impl<N: NoiseSource, D: Drbg> RngCore for SystemRng<N, D> {
    fn generate(&mut self, output: &mut [u8], additional_input: Option<&[u8]>) -> Result<(), RngGenerateError> {
        Ok(self.generate_crypto(output, additional_input)?)
    }
}

#[cfg(test)]
use super::{HmacDrbg, trng::TestNoiseSource};
#[cfg(test)]
use crate::hash::HashAlgorithm;

#[cfg(test)]
fn test_system_rng(config: &CoreConfig) -> SystemRng<TestNoiseSource, HmacDrbg> {
    SystemRng::new(TestNoiseSource::new(), HashAlgorithm::Sha256, config).unwrap()
}

#[cfg(test)]
fn test_samples_read(rng: &SystemRng<TestNoiseSource, HmacDrbg>) -> u32 {
    rng.entropy_source().trng().source().samples_read
}

#[test]
fn test_rng_quality_try_from() {
    assert_eq!(RngQuality::try_from(0u32).unwrap(), RngQuality::Fast);
    assert_eq!(RngQuality::try_from(1u32).unwrap(), RngQuality::Crypto);
    assert!(matches!(
        RngQuality::try_from(2u32),
        Err(CryptoError::InvalidRngSelector)
    ));
}

#[test]
fn test_get_random_fast() {
    let config = CoreConfig::default();
    let mut rng = test_system_rng(&config);
    let mut output = [0u8; 20];
    rng.get_random(&mut output, RngQuality::Fast).unwrap();
    assert_eq!(test_samples_read(&rng), 1);

    // The generator gets seeded from the leading bytes of the first sample.
    let mut expected_source = EntropySource::new(TestNoiseSource::new(), &config).unwrap();
    let mut seed = [0u8; TRNG_SAMPLE_SIZE];
    expected_source.get_entropy(&mut seed).unwrap();
    let mut fast_seed = [0u8; XORSHIFT128PLUS_SEED_LEN];
    fast_seed.copy_from_slice(&seed[..XORSHIFT128PLUS_SEED_LEN]);
    let mut expected_rng = XorShift128Plus::from_seed(&fast_seed);
    let mut expected = [0u8; 20];
    expected_rng.fill_bytes(&mut expected);
    assert_eq!(output, expected);

    rng.get_random(&mut output, RngQuality::Fast).unwrap();
    expected_rng.fill_bytes(&mut expected);
    assert_eq!(output, expected);
    assert_eq!(test_samples_read(&rng), 1);
}

#[test]
fn test_get_random_crypto() {
    let config = CoreConfig {
        drbg_reseed_limit: 2,
        ..CoreConfig::default()
    };
    let mut rng = test_system_rng(&config);
    let mut output0 = [0u8; 32];
    let mut output1 = [0u8; 32];
    rng.get_random(&mut output0, RngQuality::Crypto).unwrap();
    // A SHA-256 HMAC-DRBG gets seeded from two samples.
    assert_eq!(test_samples_read(&rng), 2);
    rng.generate(&mut output1, None).unwrap();
    assert_ne!(output0, output1);
    assert_eq!(test_samples_read(&rng), 2);

    // The reseed limit is reached now.
    rng.get_random(&mut output0, RngQuality::Crypto).unwrap();
    assert_eq!(test_samples_read(&rng), 4);
    assert_ne!(output0, output1);
    rng.get_random(&mut output1, RngQuality::Crypto).unwrap();
    assert_eq!(test_samples_read(&rng), 4);

    // The fast generator is seeded independently.
    rng.get_random(&mut output0, RngQuality::Fast).unwrap();
    assert_eq!(test_samples_read(&rng), 5);
}

#[test]
fn test_get_random_crypto_reseed_cycles() {
    // A SHA-256 HMAC-DRBG seed is 48 bytes, i.e. two samples.
    const SAMPLES_PER_SEED: u32 = 2;

    for reseed_limit in [2u32, 3] {
        let mut rng = test_system_rng(&CoreConfig {
            drbg_reseed_limit: reseed_limit,
            ..CoreConfig::default()
        });
        let mut output = [0u8; 32];
        let mut prev_output = [0u8; 32];
        for ncalls in 1..=(3 * reseed_limit + 1) {
            rng.get_random(&mut output, RngQuality::Crypto).unwrap();
            assert_ne!(output, prev_output);
            prev_output = output;
            // One seed for the instantiation, one more for every
            // reseed_limit requests served thereafter.
            let nseeds = 1 + (ncalls - 1) / reseed_limit;
            assert_eq!(test_samples_read(&rng), SAMPLES_PER_SEED * nseeds);
        }
    }
}

#[test]
fn test_get_random_health_test_failure() {
    let mut rng = test_system_rng(&CoreConfig::default());
    rng.sp800_90b_mode(true);
    rng.entropy_source_mut().trng_mut().source_mut().fixed_sample = Some([0xffu8; TRNG_SAMPLE_SIZE]);
    let mut output = [0u8; 16];
    assert!(matches!(
        rng.get_random(&mut output, RngQuality::Crypto),
        Err(CryptoError::RepetitionCountTestFailure)
    ));
    assert!(matches!(
        rng.get_random(&mut output, RngQuality::Fast),
        Err(CryptoError::RepetitionCountTestFailure)
    ));
    assert!(matches!(
        rng.generate(&mut output, None),
        Err(RngGenerateError::CryptoError(CryptoError::RepetitionCountTestFailure))
    ));

    rng.entropy_source_mut().trng_mut().source_mut().fixed_sample = None;
    rng.get_random(&mut output, RngQuality::Crypto).unwrap();
}

#[test]
fn test_get_random_uint() {
    let mut rng = test_system_rng(&CoreConfig::default());
    assert!(matches!(
        rng.get_random_uint(0, RngQuality::Fast),
        Err(CryptoError::InvalidParams)
    ));
    assert_eq!(rng.get_random_uint(1, RngQuality::Crypto).unwrap(), 0);

    let mut seen = [false; 10];
    for _ in 0..200 {
        let value = rng.get_random_uint(10, RngQuality::Fast).unwrap();
        assert!(value < 10);
        seen[value as usize] = true;
    }
    assert!(seen.iter().all(|s| *s));

    for _ in 0..20 {
        assert!(rng.get_random_uint(u32::MAX, RngQuality::Crypto).unwrap() < u32::MAX);
    }

    let mut rng = test_system_rng(&CoreConfig {
        max_attempts: 0,
        ..CoreConfig::default()
    });
    assert!(matches!(
        rng.get_random_uint(10, RngQuality::Fast),
        Err(CryptoError::TooManyAttempts)
    ));
}

#[test]
fn test_get_random_uint_distribution() {
    const NDRAWS: u32 = 10000;

    for quality in [RngQuality::Fast, RngQuality::Crypto] {
        let mut rng = test_system_rng(&CoreConfig::default());

        for _ in 0..NDRAWS {
            assert_eq!(rng.get_random_uint(1, quality).unwrap(), 0);
        }

        for bound in [1u32 << 31, 0x8000_0001] {
            let mut nupper = 0u32;
            for _ in 0..NDRAWS {
                let value = rng.get_random_uint(bound, quality).unwrap();
                assert!(value < bound);
                if value >= bound / 2 {
                    nupper += 1;
                }
            }
            // Both halves of the range get hit about equally often.
            assert!((4000..6000).contains(&nupper));
        }

        for bound in [8u32, 10] {
            let mut buckets = [0u32; 10];
            for _ in 0..NDRAWS {
                let value = rng.get_random_uint(bound, quality).unwrap();
                assert!(value < bound);
                buckets[value as usize] += 1;
            }
            // Allow for a quarter deviation from the expected count.
            let expected = NDRAWS / bound;
            let tolerance = expected / 4;
            for count in buckets[..bound as usize].iter() {
                assert!((expected - tolerance..=expected + tolerance).contains(count));
            }
            assert!(buckets[bound as usize..].iter().all(|count| *count == 0));
        }
    }
}

#[test]
fn test_get_random_permutation() {
    let mut rng = test_system_rng(&CoreConfig {
        dpa_mitigations: false,
        ..CoreConfig::default()
    });
    let mut permutation = [usize::MAX; 7];
    rng.get_random_permutation(&mut permutation, RngQuality::Fast).unwrap();
    assert_eq!(permutation, [0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(rng.random_permutation(4, RngQuality::Crypto).unwrap(), [0, 1, 2, 3]);
    assert_eq!(test_samples_read(&rng), 0);

    let mut rng = test_system_rng(&CoreConfig {
        dpa_mitigations: true,
        ..CoreConfig::default()
    });
    assert!(rng.random_permutation(0, RngQuality::Fast).unwrap().is_empty());
    for len in [1usize, 2, 5, 33, 100] {
        for quality in [RngQuality::Fast, RngQuality::Crypto] {
            let mut permutation = rng.random_permutation(len, quality).unwrap();
            permutation.sort_unstable();
            assert!(permutation.iter().copied().eq(0..len));
        }
    }

    // With 100 elements, the identity is practically impossible.
    let permutation = rng.random_permutation(100, RngQuality::Fast).unwrap();
    assert!(!permutation.iter().copied().eq(0..100));
}

#[test]
fn test_dpa_hardened_word_copy() {
    let src: Vec<u32> = (0..100u32).map(|i| i.wrapping_mul(0x9e3779b9)).collect();
    for dpa_mitigations in [false, true] {
        let mut rng = test_system_rng(&CoreConfig {
            dpa_mitigations,
            ..CoreConfig::default()
        });
        for len in [0usize, 1, 31, 32, 33, 100] {
            let mut dst = alloc::vec![0u32; len];
            rng.dpa_hardened_word_copy(&mut dst, &src[..len]).unwrap();
            assert_eq!(dst, src[..len]);
        }

        let mut dst = [0u32; 4];
        assert!(matches!(
            rng.dpa_hardened_word_copy(&mut dst, &src[..5]),
            Err(CryptoError::InvalidInputLength)
        ));
    }
}
