// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Implementation of the NIST SP800-90Ar1 HMAC_DRBG construction.

use alloc::vec::Vec;

use super::{Drbg, RngCore, RngGenerateError, RngReseedError, check_reseed_budget};
use crate::utils_common::{alloc::try_alloc_zeroizing_vec, zeroize};
use crate::{CryptoError, hash};

/// NIST SP800-90Ar1 HMAC_DRBG [random number generator](RngCore)
/// implementation.
pub struct HmacDrbg {
    /// Hash algorithm HMAC gets instantiated with.
    alg: hash::HashAlgorithm,

    /// Number of requests processed since last (re)seed
    reseed_counter: u64,
    reseed_interval: u64,

    k: zeroize::Zeroizing<Vec<u8>>,
    v: zeroize::Zeroizing<Vec<u8>>,
}

impl HmacDrbg {
    const MAX_REQUESTS: u64 = u32::MAX as u64;
    const MAX_REQUEST_LEN: usize = 1usize << 16; // 2^19 bits

    /// Generate a bit string of specified length.
    ///
    /// The output is filled from the most significant bit of `output[0]`
    /// onwards, any bits in the last byte beyond `nbits` are cleared.
    ///
    /// # Arguments:
    ///
    /// * `output` - Destination buffer, must be exactly `nbits` rounded up to
    ///   the next byte boundary in length.
    /// * `nbits` - Number of random bits to generate.
    /// * `additional_input` - Optional additional input mixed into the state
    ///   before and after generating the output.
    ///
    /// # Errors:
    ///
    /// * [`RngGenerateError::ReseedRequired`] - The reseed interval is
    ///   exhausted.
    /// * [`CryptoError::InvalidInputLength`] - The `output` length doesn't
    ///   match `nbits`.
    pub fn generate_bits(
        &mut self,
        output: &mut [u8],
        nbits: usize,
        additional_input: Option<&[u8]>,
    ) -> Result<(), RngGenerateError> {
        if output.len() != nbits.div_ceil(8) {
            return Err(RngGenerateError::CryptoError(CryptoError::InvalidInputLength));
        }
        self.generate(output, additional_input)?;
        if nbits % 8 != 0 {
            if let Some(last) = output.last_mut() {
                *last &= !(u8::MAX >> (nbits % 8));
            }
        }
        Ok(())
    }

    fn generate_chunks(&mut self, output: &mut [u8], additional_input: Option<&[u8]>) -> Result<(), RngGenerateError> {
        let additional_input = additional_input.filter(|additional_input| !additional_input.is_empty());
        // NIST SP 800-90Ar1, 10.1.2.5: HMAC_DRBG_Generate_algorithm.
        // Step 1.), for all chunks at once.
        check_reseed_budget(
            self.reseed_counter,
            self.reseed_interval,
            output.len().div_ceil(Self::MAX_REQUEST_LEN),
        )?;

        for output in output.chunks_mut(Self::MAX_REQUEST_LEN) {
            // Step 2.)
            if additional_input.is_some() {
                self.update(&[additional_input])?;
            }

            // Step 3.) - 5.)
            for output_chunk in output.chunks_mut(self.v.len()) {
                let mut h = hash::HmacInstance::new(self.alg, &self.k)?;
                h.update(&self.v);
                h.finalize_into(&mut self.v);
                output_chunk.copy_from_slice(&self.v[..output_chunk.len()]);
            }

            // Step 6.)
            self.update(&[additional_input])?;
            // Step 7.)
            self.reseed_counter += 1;
        }

        Ok(())
    }

    fn update(&mut self, provided_data: &[Option<&[u8]>]) -> Result<(), CryptoError> {
        // NIST SP 800-90Ar1, 10.1.2.2: HMAC_DRBG_Update().
        let have_provided_data = provided_data.iter().flatten().any(|data| !data.is_empty());
        for separator in [0x00u8, 0x01u8] {
            if separator == 0x01 && !have_provided_data {
                break;
            }

            // K = HMAC(K, V || separator || provided_data)
            let mut h = hash::HmacInstance::new(self.alg, &self.k)?;
            h.update(&self.v);
            h.update(&[separator]);
            for data in provided_data.iter().flatten() {
                h.update(data);
            }
            h.finalize_into(&mut self.k);

            // V = HMAC(K, V)
            let mut h = hash::HmacInstance::new(self.alg, &self.k)?;
            h.update(&self.v);
            h.finalize_into(&mut self.v);
        }

        Ok(())
    }
}

impl RngCore for HmacDrbg {
    /// Generate random bytes.
    ///
    /// Requests exceeding 2^16 bytes are split into several, each consuming
    /// one unit of the reseed interval. If the interval can't accommodate all
    /// of them, nothing gets generated and `output` is cleared.
    fn generate(&mut self, output: &mut [u8], additional_input: Option<&[u8]>) -> Result<(), RngGenerateError> {
        let result = self.generate_chunks(output, additional_input);
        if result.is_err() {
            output.fill(0);
        }
        result
    }
}

impl Drbg for HmacDrbg {
    type Params = hash::HashAlgorithm;

    /// The security strength is taken to equal the digest length.
    fn min_seed_entropy_len(alg: Self::Params) -> usize {
        alg.digest_len()
    }

    fn instantiate(
        alg: Self::Params,
        entropy: &[u8],
        nonce: Option<&[u8]>,
        personalization: Option<&[u8]>,
    ) -> Result<Self, CryptoError> {
        if entropy.len() < Self::min_seed_entropy_len(alg) {
            return Err(CryptoError::InsufficientSeedLength);
        }

        // NIST SP 800-90Ar1, 10.1.2.3: HMAC_DRBG_Instantiate_algorithm.
        let digest_len = alg.digest_len();
        let k = try_alloc_zeroizing_vec::<u8>(digest_len)?;
        let mut v = try_alloc_zeroizing_vec::<u8>(digest_len)?;
        v.fill(0x01);

        let mut drbg = Self {
            alg,
            reseed_counter: 1,
            reseed_interval: Self::MAX_REQUESTS,
            k,
            v,
        };
        drbg.update(&[Some(entropy), nonce, personalization])?;

        log::debug!("HMAC_DRBG instantiated ({:?})", alg);
        Ok(drbg)
    }

    fn reseed(&mut self, entropy: &[u8], additional_input: Option<&[u8]>) -> Result<(), RngReseedError> {
        if entropy.len() < Self::min_seed_entropy_len(self.alg) {
            return Err(RngReseedError::CryptoError(CryptoError::InsufficientSeedLength));
        }

        // NIST SP 800-90Ar1, 10.1.2.4: HMAC_DRBG_Reseed_algorithm.
        self.update(&[Some(entropy), additional_input])?;
        self.reseed_counter = 1;

        log::debug!("HMAC_DRBG reseeded");
        Ok(())
    }

    fn set_reseed_interval(&mut self, interval: u64) {
        self.reseed_interval = interval.min(Self::MAX_REQUESTS);
    }
}

#[cfg(test)]
const TEST_HMAC_DRBG_ENTROPY: [u8; 32] = cmpa::hexstr::bytes_from_hexstr_cnst::<32>(
    "0102030405060708090a0b0c0d0e0f10\
     1112131415161718191a1b1c1d1e1f20",
);
#[cfg(test)]
const TEST_HMAC_DRBG_NONCE: &[u8] =
    &cmpa::hexstr::bytes_from_hexstr_cnst::<20>("746573745f686d61635f647262675f6e6f6e6365");
#[cfg(test)]
const TEST_HMAC_DRBG_PERSONALIZATION: &[u8] =
    &cmpa::hexstr::bytes_from_hexstr_cnst::<30>("746573745f686d61635f647262675f706572736f6e616c697a6174696f6e");
#[cfg(test)]
const TEST_HMAC_DRBG_ADDITIONAL_INPUT: &[u8] =
    &cmpa::hexstr::bytes_from_hexstr_cnst::<31>("746573745f686d61635f647262675f6164646974696f6e616c5f696e707574");

#[test]
fn test_hmac_drbg_sha256_cavp() {
    // NIST CAVP HMAC_DRBG, SHA-256, no prediction resistance, COUNT = 0.
    let entropy =
        cmpa::hexstr::bytes_from_hexstr_cnst::<32>("ca851911349384bffe89de1cbdc46e6831e44d34a4fb935ee285dd14b71a7488");
    let nonce = cmpa::hexstr::bytes_from_hexstr_cnst::<16>("659ba96c601dc69fc902940805ec0ca8");
    let expected = cmpa::hexstr::bytes_from_hexstr_cnst::<128>(
        "e528e9abf2dece54d47c7e75e5fe3021\
         49f817ea9fb4bee6f4199697d04d5b89\
         d54fbb978a15b5c443c9ec21036d2460\
         b6f73ebad0dc2aba6e624abf07745bc1\
         07694bb7547bb0995f70de25d6b29e2d\
         3011bb19d27676c07162c8b5ccde0668\
         961df86803482cb37ed6d5c0bb8d50cf\
         1f50d476aa0458bdaba806f48be9dcb8",
    );

    let mut drbg = HmacDrbg::instantiate(hash::HashAlgorithm::Sha256, &entropy, Some(&nonce), None).unwrap();
    let mut output = [0u8; 128];
    drbg.generate(&mut output, None).unwrap();
    drbg.generate(&mut output, None).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn test_hmac_drbg_sha256() {
    struct HmacDrbgTestVec<'a> {
        with_optional_inputs: bool,
        expected_outputs: [&'a [u8]; 2], // Once after instantiate, once after reseed.
    }

    let vecs: [HmacDrbgTestVec; 2] = [
        HmacDrbgTestVec {
            with_optional_inputs: false,
            expected_outputs: [
                &cmpa::hexstr::bytes_from_hexstr_cnst::<80>(
                    "7f9533ad83d815a860dd8ef577f3b9b8\
                     1178449bf35cdf581ef4ba92b718f041\
                     e29c91d582789c32a8f282adc9201941\
                     419542852298651e1c1e2fbf4cb5cedf\
                     193d6ffcdf7fa25bf607d588fdae687b",
                ),
                &cmpa::hexstr::bytes_from_hexstr_cnst::<15>("670b9b91b70f00c01d632b4d549afa"),
            ],
        },
        HmacDrbgTestVec {
            with_optional_inputs: true,
            expected_outputs: [
                &cmpa::hexstr::bytes_from_hexstr_cnst::<80>(
                    "668ff77f88b4f26d3413ea615d5b9d17\
                     30904bb4c4001564c44c115767334936\
                     f233a52f92644affcc52db9f018cae08\
                     7a3919de9f1c7149621839e45a6017d2\
                     7b593cb2e4bc61ad25710c1132ba0b2f",
                ),
                &cmpa::hexstr::bytes_from_hexstr_cnst::<15>("bc7da844bf9146e1feca5fc3d41d90"),
            ],
        },
    ];

    for v in vecs.iter() {
        let (nonce, personalization, additional_input) = if v.with_optional_inputs {
            (
                Some(TEST_HMAC_DRBG_NONCE),
                Some(TEST_HMAC_DRBG_PERSONALIZATION),
                Some(TEST_HMAC_DRBG_ADDITIONAL_INPUT),
            )
        } else {
            (None, None, None)
        };

        let mut drbg =
            HmacDrbg::instantiate(hash::HashAlgorithm::Sha256, &TEST_HMAC_DRBG_ENTROPY, nonce, personalization)
                .unwrap();
        let mut output = [0u8; 80];
        drbg.generate(&mut output, additional_input).unwrap();
        assert_eq!(output.as_slice(), v.expected_outputs[0]);

        HmacDrbg::reseed(&mut drbg, &TEST_HMAC_DRBG_ENTROPY, additional_input).unwrap();
        let mut output = [0u8; 15];
        drbg.generate(&mut output, additional_input).unwrap();
        assert_eq!(output.as_slice(), v.expected_outputs[1]);
    }
}

#[test]
fn test_hmac_drbg_generate_bits() {
    let mut drbg = HmacDrbg::instantiate(hash::HashAlgorithm::Sha256, &TEST_HMAC_DRBG_ENTROPY, None, None).unwrap();
    let mut output = [0u8; 2];
    drbg.generate_bits(&mut output, 13, None).unwrap();
    assert_eq!(output, [0x7f, 0x90]);

    assert!(matches!(
        drbg.generate_bits(&mut output, 17, None),
        Err(RngGenerateError::CryptoError(CryptoError::InvalidInputLength))
    ));
}

#[test]
fn test_hmac_drbg_reseed_required() {
    let mut drbg = HmacDrbg::instantiate(hash::HashAlgorithm::Sha256, &TEST_HMAC_DRBG_ENTROPY, None, None).unwrap();
    Drbg::set_reseed_interval(&mut drbg, 1);
    let mut output = [0u8; 4];
    drbg.generate(&mut output, None).unwrap();
    assert!(matches!(
        drbg.generate(&mut output, None),
        Err(RngGenerateError::ReseedRequired)
    ));
    HmacDrbg::reseed(&mut drbg, &TEST_HMAC_DRBG_ENTROPY, None).unwrap();
    drbg.generate(&mut output, None).unwrap();

    assert!(matches!(
        HmacDrbg::reseed(&mut drbg, &TEST_HMAC_DRBG_ENTROPY[..16], None),
        Err(RngReseedError::CryptoError(CryptoError::InsufficientSeedLength))
    ));
}

#[test]
fn test_hmac_drbg_oversized_request_exceeding_reseed_interval() {
    use alloc::vec;

    let mut drbg = HmacDrbg::instantiate(hash::HashAlgorithm::Sha256, &TEST_HMAC_DRBG_ENTROPY, None, None).unwrap();
    Drbg::set_reseed_interval(&mut drbg, 1);

    // Two chunks but only one request left until the next reseed.
    let mut output = vec![0xaau8; HmacDrbg::MAX_REQUEST_LEN + 1];
    assert!(matches!(
        drbg.generate(&mut output, None),
        Err(RngGenerateError::ReseedRequired)
    ));
    assert!(output.iter().all(|b| *b == 0));

    // The failed request didn't consume anything, the state is as if freshly
    // instantiated.
    let mut output = [0u8; 2];
    drbg.generate_bits(&mut output, 13, None).unwrap();
    assert_eq!(output, [0x7f, 0x90]);

    // After a reseed, an interval of two accommodates the two chunks.
    HmacDrbg::reseed(&mut drbg, &TEST_HMAC_DRBG_ENTROPY, None).unwrap();
    Drbg::set_reseed_interval(&mut drbg, 2);
    let mut output = vec![0u8; HmacDrbg::MAX_REQUEST_LEN + 1];
    drbg.generate(&mut output, None).unwrap();
    assert!(output.iter().any(|b| *b != 0));
    assert!(matches!(
        drbg.generate(&mut [0u8; 1], None),
        Err(RngGenerateError::ReseedRequired)
    ));
}
