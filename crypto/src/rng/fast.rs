// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Non-cryptographic xorshift128+ generator.
//!
//! Only meant for randomizing the order of operations, e.g. in
//! [permutations](super::SystemRng::get_random_permutation) used as a
//! side-channel countermeasure, never for producing key material.

use super::{RngCore, RngGenerateError};
use crate::utils_common::zeroize::Zeroize as _;

/// Seed length of [`XorShift128Plus`] in units of bytes.
pub const XORSHIFT128PLUS_SEED_LEN: usize = 16;

/// xorshift128+ generator state.
pub struct XorShift128Plus {
    state: [u64; 2],
}

impl XorShift128Plus {
    /// Instantiate from a seed.
    ///
    /// The seed's two halves get interpreted as native-endian 64 bit
    /// integers.
    pub fn from_seed(seed: &[u8; XORSHIFT128PLUS_SEED_LEN]) -> Self {
        let mut s0 = [0u8; 8];
        let mut s1 = [0u8; 8];
        s0.copy_from_slice(&seed[..8]);
        s1.copy_from_slice(&seed[8..]);
        Self {
            state: [u64::from_ne_bytes(s0), u64::from_ne_bytes(s1)],
        }
    }

    /// Advance the state and return the next output word.
    pub fn next_u64(&mut self) -> u64 {
        let mut t0 = self.state[0];
        let t1 = self.state[1];
        self.state[0] = t1;
        t0 ^= t0 << 23;
        t0 ^= t0 >> 18;
        t0 ^= t1 ^ (t1 >> 5);
        self.state[1] = t0;
        t0.wrapping_add(t1)
    }

    /// Fill a buffer with output bytes.
    ///
    /// Each output word contributes eight native-endian bytes, a partial
    /// trailing chunk takes the word's leading ones.
    pub fn fill_bytes(&mut self, output: &mut [u8]) {
        for chunk in output.chunks_mut(8) {
            let word = self.next_u64().to_ne_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

impl RngCore for XorShift128Plus {
    fn generate(&mut self, output: &mut [u8], _additional_input: Option<&[u8]>) -> Result<(), RngGenerateError> {
        self.fill_bytes(output);
        Ok(())
    }
}

impl Drop for XorShift128Plus {
    fn drop(&mut self) {
        self.state.zeroize();
    }
}

#[cfg(test)]
fn test_seed(s0: u64, s1: u64) -> [u8; XORSHIFT128PLUS_SEED_LEN] {
    let mut seed = [0u8; XORSHIFT128PLUS_SEED_LEN];
    seed[..8].copy_from_slice(&s0.to_ne_bytes());
    seed[8..].copy_from_slice(&s1.to_ne_bytes());
    seed
}

#[test]
fn test_xorshift128plus_next_u64() {
    let mut rng = XorShift128Plus::from_seed(&test_seed(1, 2));
    assert_eq!(rng.next_u64(), 0x0000_0000_0080_0025);
    assert_eq!(rng.next_u64(), 0x0000_0000_0204_0083);
    assert_eq!(rng.next_u64(), 0x0000_4000_020c_2460);
}

#[test]
fn test_xorshift128plus_fill_bytes() {
    let mut rng0 = XorShift128Plus::from_seed(&test_seed(0x0123456789abcdef, 0xfedcba9876543210));
    let mut rng1 = XorShift128Plus::from_seed(&test_seed(0x0123456789abcdef, 0xfedcba9876543210));

    let mut output = [0u8; 13];
    rng0.fill_bytes(&mut output);
    let w0 = rng1.next_u64().to_ne_bytes();
    let w1 = rng1.next_u64().to_ne_bytes();
    assert_eq!(output[..8], w0);
    assert_eq!(output[8..], w1[..5]);

    // The partial chunk consumed a full word.
    let mut output = [0u8; 8];
    rng0.generate(&mut output, None).unwrap();
    assert_eq!(output, rng1.next_u64().to_ne_bytes());
}
