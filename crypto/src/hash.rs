// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Common interface to the hash and HMAC implementations backing the DRBGs.
//!
//! Algorithms are specified in terms of a [`HashAlgorithm`] and routed to the
//! respective RustCrypto implementation. SHA-256 is always available, as the
//! HMAC-DRBG is specified on top of it, everything else is subject to Cargo
//! features.

use crate::CryptoError;

use crypto_common::{self, KeyInit as _};
use digest::{self, Digest as _};
use hmac::{self, Hmac};
#[cfg(feature = "sha1")]
use sha1;
use sha2;
#[cfg(any(feature = "sha3_256", feature = "sha3_384", feature = "sha3_512"))]
use sha3;

/// Hash algorithm identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashAlgorithm {
    #[cfg(feature = "sha1")]
    Sha1,
    Sha256,
    #[cfg(feature = "sha384")]
    Sha384,
    #[cfg(feature = "sha512")]
    Sha512,
    #[cfg(feature = "sha3_256")]
    Sha3_256,
    #[cfg(feature = "sha3_384")]
    Sha3_384,
    #[cfg(feature = "sha3_512")]
    Sha3_512,
}

impl HashAlgorithm {
    /// Output digest length in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            #[cfg(feature = "sha1")]
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            #[cfg(feature = "sha384")]
            Self::Sha384 => 48,
            #[cfg(feature = "sha512")]
            Self::Sha512 => 64,
            #[cfg(feature = "sha3_256")]
            Self::Sha3_256 => 32,
            #[cfg(feature = "sha3_384")]
            Self::Sha3_384 => 48,
            #[cfg(feature = "sha3_512")]
            Self::Sha3_512 => 64,
        }
    }
}

/// Run `$body` on the variant's inner instance, with `$d` aliased to the
/// matching RustCrypto digest type.
macro_rules! with_hash_variant {
    ($enum:ident, $state:expr, $instance:ident, $d:ident, $body:block) => {
        match $state {
            #[cfg(feature = "sha1")]
            $enum::Sha1($instance) => {
                #[allow(dead_code)]
                type $d = sha1::Sha1;
                $body
            }
            $enum::Sha256($instance) => {
                #[allow(dead_code)]
                type $d = sha2::Sha256;
                $body
            }
            #[cfg(feature = "sha384")]
            $enum::Sha384($instance) => {
                #[allow(dead_code)]
                type $d = sha2::Sha384;
                $body
            }
            #[cfg(feature = "sha512")]
            $enum::Sha512($instance) => {
                #[allow(dead_code)]
                type $d = sha2::Sha512;
                $body
            }
            #[cfg(feature = "sha3_256")]
            $enum::Sha3_256($instance) => {
                #[allow(dead_code)]
                type $d = sha3::Sha3_256;
                $body
            }
            #[cfg(feature = "sha3_384")]
            $enum::Sha3_384($instance) => {
                #[allow(dead_code)]
                type $d = sha3::Sha3_384;
                $body
            }
            #[cfg(feature = "sha3_512")]
            $enum::Sha3_512($instance) => {
                #[allow(dead_code)]
                type $d = sha3::Sha3_512;
                $body
            }
        }
    };
}

/// A hash instance.
#[derive(Clone)]
pub struct HashInstance {
    state: HashInstanceState,
}

impl HashInstance {
    /// Create a new hash instance for the specified algorithm.
    ///
    /// # Arguments:
    ///
    /// * `alg` - The hash algorithm to create an instance for.
    pub fn new(alg: HashAlgorithm) -> Self {
        let state = match alg {
            #[cfg(feature = "sha1")]
            HashAlgorithm::Sha1 => HashInstanceState::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha256 => HashInstanceState::Sha256(sha2::Sha256::new()),
            #[cfg(feature = "sha384")]
            HashAlgorithm::Sha384 => HashInstanceState::Sha384(sha2::Sha384::new()),
            #[cfg(feature = "sha512")]
            HashAlgorithm::Sha512 => HashInstanceState::Sha512(sha2::Sha512::new()),
            #[cfg(feature = "sha3_256")]
            HashAlgorithm::Sha3_256 => HashInstanceState::Sha3_256(sha3::Sha3_256::new()),
            #[cfg(feature = "sha3_384")]
            HashAlgorithm::Sha3_384 => HashInstanceState::Sha3_384(sha3::Sha3_384::new()),
            #[cfg(feature = "sha3_512")]
            HashAlgorithm::Sha3_512 => HashInstanceState::Sha3_512(sha3::Sha3_512::new()),
        };
        Self { state }
    }

    /// Append to the digested data.
    ///
    /// # Arguments:
    ///
    /// * `data` - The data to digest.
    pub fn update(&mut self, data: &[u8]) {
        with_hash_variant!(HashInstanceState, &mut self.state, instance, D, {
            digest::Update::update(instance, data);
        })
    }

    /// Produce a digest into a provided buffer and reset the hash instance.
    ///
    /// # Arguments:
    ///
    /// * `digest` - Destination to write the produced digest to, must be
    ///   exactly [`digest_len()`](Self::digest_len) in length.
    pub fn finalize_into_reset(&mut self, digest: &mut [u8]) {
        with_hash_variant!(HashInstanceState, &mut self.state, instance, D, {
            let digest: &mut crypto_common::Output<D> = digest.into();
            digest::FixedOutputReset::finalize_into_reset(instance, digest);
        })
    }

    /// Produce the final digest into a provided buffer.
    ///
    /// # Arguments:
    ///
    /// * `digest` - Destination to write the produced digest to, must be
    ///   exactly [`digest_len()`](Self::digest_len) in length.
    pub fn finalize_into(mut self, digest: &mut [u8]) {
        self.finalize_into_reset(digest)
    }

    /// Determine the instance's associated hash algorithm's digest length.
    pub fn digest_len(&self) -> usize {
        self.alg().digest_len()
    }

    /// The instance's associated hash algorithm.
    pub fn alg(&self) -> HashAlgorithm {
        match &self.state {
            #[cfg(feature = "sha1")]
            HashInstanceState::Sha1(_) => HashAlgorithm::Sha1,
            HashInstanceState::Sha256(_) => HashAlgorithm::Sha256,
            #[cfg(feature = "sha384")]
            HashInstanceState::Sha384(_) => HashAlgorithm::Sha384,
            #[cfg(feature = "sha512")]
            HashInstanceState::Sha512(_) => HashAlgorithm::Sha512,
            #[cfg(feature = "sha3_256")]
            HashInstanceState::Sha3_256(_) => HashAlgorithm::Sha3_256,
            #[cfg(feature = "sha3_384")]
            HashInstanceState::Sha3_384(_) => HashAlgorithm::Sha3_384,
            #[cfg(feature = "sha3_512")]
            HashInstanceState::Sha3_512(_) => HashAlgorithm::Sha3_512,
        }
    }
}

#[derive(Clone)]
enum HashInstanceState {
    #[cfg(feature = "sha1")]
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    #[cfg(feature = "sha384")]
    Sha384(sha2::Sha384),
    #[cfg(feature = "sha512")]
    Sha512(sha2::Sha512),
    #[cfg(feature = "sha3_256")]
    Sha3_256(sha3::Sha3_256),
    #[cfg(feature = "sha3_384")]
    Sha3_384(sha3::Sha3_384),
    #[cfg(feature = "sha3_512")]
    Sha3_512(sha3::Sha3_512),
}

/// An HMAC instance.
pub struct HmacInstance {
    state: HmacInstanceState,
}

impl HmacInstance {
    /// Create a new HMAC instance for the specified algorithm and key.
    ///
    /// # Arguments:
    ///
    /// * `alg` - The hash algorithm to instantiate HMAC with.
    /// * `key` - The HMAC key, of arbitrary length.
    pub fn new(alg: HashAlgorithm, key: &[u8]) -> Result<Self, CryptoError> {
        // HMAC accepts keys of any length, the error paths are unreachable.
        let state = match alg {
            #[cfg(feature = "sha1")]
            HashAlgorithm::Sha1 => HmacInstanceState::Sha1(Hmac::from_core(
                hmac::HmacCore::<sha1::Sha1>::new_from_slice(key).map_err(|_| CryptoError::Internal)?,
            )),
            HashAlgorithm::Sha256 => HmacInstanceState::Sha256(Hmac::from_core(
                hmac::HmacCore::<sha2::Sha256>::new_from_slice(key).map_err(|_| CryptoError::Internal)?,
            )),
            #[cfg(feature = "sha384")]
            HashAlgorithm::Sha384 => HmacInstanceState::Sha384(Hmac::from_core(
                hmac::HmacCore::<sha2::Sha384>::new_from_slice(key).map_err(|_| CryptoError::Internal)?,
            )),
            #[cfg(feature = "sha512")]
            HashAlgorithm::Sha512 => HmacInstanceState::Sha512(Hmac::from_core(
                hmac::HmacCore::<sha2::Sha512>::new_from_slice(key).map_err(|_| CryptoError::Internal)?,
            )),
            #[cfg(feature = "sha3_256")]
            HashAlgorithm::Sha3_256 => HmacInstanceState::Sha3_256(Hmac::from_core(
                hmac::HmacCore::<sha3::Sha3_256>::new_from_slice(key).map_err(|_| CryptoError::Internal)?,
            )),
            #[cfg(feature = "sha3_384")]
            HashAlgorithm::Sha3_384 => HmacInstanceState::Sha3_384(Hmac::from_core(
                hmac::HmacCore::<sha3::Sha3_384>::new_from_slice(key).map_err(|_| CryptoError::Internal)?,
            )),
            #[cfg(feature = "sha3_512")]
            HashAlgorithm::Sha3_512 => HmacInstanceState::Sha3_512(Hmac::from_core(
                hmac::HmacCore::<sha3::Sha3_512>::new_from_slice(key).map_err(|_| CryptoError::Internal)?,
            )),
        };
        Ok(Self { state })
    }

    /// Append to the authenticated data.
    ///
    /// # Arguments:
    ///
    /// * `data` - The data to authenticate.
    pub fn update(&mut self, data: &[u8]) {
        with_hash_variant!(HmacInstanceState, &mut self.state, instance, D, {
            digest::Update::update(instance, data);
        })
    }

    /// Produce the final HMAC into a provided buffer.
    ///
    /// # Arguments:
    ///
    /// * `digest` - Destination to write the produced HMAC to, must be
    ///   exactly the hash algorithm's digest length.
    pub fn finalize_into(self, digest: &mut [u8]) {
        with_hash_variant!(HmacInstanceState, self.state, instance, D, {
            let digest: &mut crypto_common::Output<Hmac<D>> = digest.into();
            digest::FixedOutput::finalize_into(instance, digest);
        })
    }
}

enum HmacInstanceState {
    #[cfg(feature = "sha1")]
    Sha1(Hmac<sha1::Sha1>),
    Sha256(Hmac<sha2::Sha256>),
    #[cfg(feature = "sha384")]
    Sha384(Hmac<sha2::Sha384>),
    #[cfg(feature = "sha512")]
    Sha512(Hmac<sha2::Sha512>),
    #[cfg(feature = "sha3_256")]
    Sha3_256(Hmac<sha3::Sha3_256>),
    #[cfg(feature = "sha3_384")]
    Sha3_384(Hmac<sha3::Sha3_384>),
    #[cfg(feature = "sha3_512")]
    Sha3_512(Hmac<sha3::Sha3_512>),
}

#[cfg(test)]
macro_rules! cfg_select_hash {
    (($f:literal, $id:ident)) => {
        #[cfg(feature = $f)]
        return HashAlgorithm::$id;
        #[cfg(not(feature = $f))]
        {
            HashAlgorithm::Sha256
        }
    };
    (($f:literal, $id:ident), $(($f_more:literal, $id_more:ident)),+) => {
        #[cfg(feature = $f)]
        return HashAlgorithm::$id;
        #[cfg(not(feature = $f))]
        {
            cfg_select_hash!($(($f_more, $id_more)),+)
        }
    };
}

/// Select the strongest enabled hash algorithm for exercising the DRBGs.
#[cfg(test)]
pub const fn test_hash_alg() -> HashAlgorithm {
    cfg_select_hash!(("sha512", Sha512), ("sha3_512", Sha3_512), ("sha384", Sha384));
}

#[test]
fn test_sha256_abc() {
    // FIPS 180-2, appendix B.1.
    const EXPECTED: [u8; 32] =
        cmpa::hexstr::bytes_from_hexstr_cnst::<32>("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    let mut h = HashInstance::new(HashAlgorithm::Sha256);
    assert_eq!(h.digest_len(), 32);
    assert_eq!(h.alg(), HashAlgorithm::Sha256);
    h.update(b"a");
    h.update(b"bc");
    let mut digest = [0u8; 32];
    h.finalize_into_reset(&mut digest);
    assert_eq!(digest, EXPECTED);

    // Reset to initial state.
    h.update(b"abc");
    h.finalize_into(&mut digest);
    assert_eq!(digest, EXPECTED);
}

#[test]
fn test_hmac_sha256_rfc4231_case2() {
    const EXPECTED: [u8; 32] =
        cmpa::hexstr::bytes_from_hexstr_cnst::<32>("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    let mut h = HmacInstance::new(HashAlgorithm::Sha256, b"Jefe").unwrap();
    h.update(b"what do ya want ");
    h.update(b"for nothing?");
    let mut digest = [0u8; 32];
    h.finalize_into(&mut digest);
    assert_eq!(digest, EXPECTED);
}
