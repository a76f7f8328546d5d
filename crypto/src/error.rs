// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Crypto core error type definitions.

use crate::utils_common;
use core::convert;

const CRYPTO_ERROR_CODE_MEMORY_ALLOCATION_FAILURE: isize = 1;
const CRYPTO_ERROR_CODE_INTERNAL: isize = 2;
const CRYPTO_ERROR_CODE_INVALID_PARAMS: isize = 3;
const CRYPTO_ERROR_CODE_INVALID_TRNG_CONFIG: isize = 4;
const CRYPTO_ERROR_CODE_INVALID_INPUT_LENGTH: isize = 5;
const CRYPTO_ERROR_CODE_TOO_MANY_ATTEMPTS: isize = 6;
const CRYPTO_ERROR_CODE_REPETITION_COUNT_TEST_FAILURE: isize = 7;
const CRYPTO_ERROR_CODE_ADAPTIVE_PROPORTION_TEST_FAILURE: isize = 8;
const CRYPTO_ERROR_CODE_INVALID_THRESHOLD: isize = 9;
const CRYPTO_ERROR_CODE_UNEXPECTED_INFINITY: isize = 10;
const CRYPTO_ERROR_CODE_POINT_AT_INFINITY: isize = 11;
const CRYPTO_ERROR_CODE_INVALID_POINT: isize = 12;
const CRYPTO_ERROR_CODE_INVALID_RNG_SELECTOR: isize = 13;
const CRYPTO_ERROR_CODE_REGISTER_ARENA_EXHAUSTED: isize = 14;
const CRYPTO_ERROR_CODE_RNG_FAILURE: isize = 15;
const CRYPTO_ERROR_CODE_INSUFFICIENT_SEED_LENGTH: isize = 16;
const CRYPTO_ERROR_CODE_REQUEST_TOO_BIG: isize = 17;

/// Common error returned by the crypto core primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// Memory allocation failure.
    MemoryAllocationFailure = CRYPTO_ERROR_CODE_MEMORY_ALLOCATION_FAILURE,
    /// Internal logic error.
    Internal = CRYPTO_ERROR_CODE_INTERNAL,
    /// Invalid parameters.
    InvalidParams = CRYPTO_ERROR_CODE_INVALID_PARAMS,
    /// Invalid TRNG configuration.
    ///
    /// Either the ring oscillator id is out of range or the subsampling rate
    /// is zero.
    InvalidTrngConfig = CRYPTO_ERROR_CODE_INVALID_TRNG_CONFIG,
    /// A buffer length is not a multiple of the required granularity.
    InvalidInputLength = CRYPTO_ERROR_CODE_INVALID_INPUT_LENGTH,
    /// Some hardware polling or probabilistic sampling loop exhausted its
    /// attempt ceiling.
    TooManyAttempts = CRYPTO_ERROR_CODE_TOO_MANY_ATTEMPTS,
    /// The SP800-90B Repetition Count Test failed.
    RepetitionCountTestFailure = CRYPTO_ERROR_CODE_REPETITION_COUNT_TEST_FAILURE,
    /// The SP800-90B Adaptive Proportion Test failed.
    AdaptiveProportionTestFailure = CRYPTO_ERROR_CODE_ADAPTIVE_PROPORTION_TEST_FAILURE,
    /// Health test cutoff values out of their admissible range.
    InvalidThreshold = CRYPTO_ERROR_CODE_INVALID_THRESHOLD,
    /// A scalar multiplication accumulator became the group identity at a
    /// step where it must not.
    ///
    /// Indicates a possible fault injection.
    UnexpectedInfinity = CRYPTO_ERROR_CODE_UNEXPECTED_INFINITY,
    /// The result of some point computation is the group identity, which has
    /// no affine representation.
    PointAtInfinity = CRYPTO_ERROR_CODE_POINT_AT_INFINITY,
    /// A point is not in the expected domain.
    InvalidPoint = CRYPTO_ERROR_CODE_INVALID_POINT,
    /// Unknown random number generator quality selector.
    InvalidRngSelector = CRYPTO_ERROR_CODE_INVALID_RNG_SELECTOR,
    /// All registers of a [`PkaArena`](crate::pka::PkaArena) are in use.
    ///
    /// Indicates an internal logic error: algorithms are designed against a
    /// fixed register budget.
    RegisterArenaExhausted = CRYPTO_ERROR_CODE_REGISTER_ARENA_EXHAUSTED,
    /// Unspecified random number generator failure condition.
    RngFailure = CRYPTO_ERROR_CODE_RNG_FAILURE,
    /// Attempt to seed a random number generator with a seed of insufficient
    /// length.
    InsufficientSeedLength = CRYPTO_ERROR_CODE_INSUFFICIENT_SEED_LENGTH,
    /// Request size is not supported.
    RequestTooBig = CRYPTO_ERROR_CODE_REQUEST_TOO_BIG,
}

impl CryptoError {
    const fn from_int(value: isize) -> Self {
        match value {
            CRYPTO_ERROR_CODE_MEMORY_ALLOCATION_FAILURE => Self::MemoryAllocationFailure,
            CRYPTO_ERROR_CODE_INTERNAL => Self::Internal,
            CRYPTO_ERROR_CODE_INVALID_PARAMS => Self::InvalidParams,
            CRYPTO_ERROR_CODE_INVALID_TRNG_CONFIG => Self::InvalidTrngConfig,
            CRYPTO_ERROR_CODE_INVALID_INPUT_LENGTH => Self::InvalidInputLength,
            CRYPTO_ERROR_CODE_TOO_MANY_ATTEMPTS => Self::TooManyAttempts,
            CRYPTO_ERROR_CODE_REPETITION_COUNT_TEST_FAILURE => Self::RepetitionCountTestFailure,
            CRYPTO_ERROR_CODE_ADAPTIVE_PROPORTION_TEST_FAILURE => Self::AdaptiveProportionTestFailure,
            CRYPTO_ERROR_CODE_INVALID_THRESHOLD => Self::InvalidThreshold,
            CRYPTO_ERROR_CODE_UNEXPECTED_INFINITY => Self::UnexpectedInfinity,
            CRYPTO_ERROR_CODE_POINT_AT_INFINITY => Self::PointAtInfinity,
            CRYPTO_ERROR_CODE_INVALID_POINT => Self::InvalidPoint,
            CRYPTO_ERROR_CODE_INVALID_RNG_SELECTOR => Self::InvalidRngSelector,
            CRYPTO_ERROR_CODE_REGISTER_ARENA_EXHAUSTED => Self::RegisterArenaExhausted,
            CRYPTO_ERROR_CODE_RNG_FAILURE => Self::RngFailure,
            CRYPTO_ERROR_CODE_INSUFFICIENT_SEED_LENGTH => Self::InsufficientSeedLength,
            CRYPTO_ERROR_CODE_REQUEST_TOO_BIG => Self::RequestTooBig,
            _ => {
                debug_assert!(false);
                Self::Internal
            }
        }
    }

    /// Numeric error code, stable across releases.
    pub fn code(self) -> isize {
        self as isize
    }

    /// Reconstruct an error from its numeric [code](Self::code).
    ///
    /// Returns `None` for codes not corresponding to any variant.
    pub fn try_from_code(code: isize) -> Option<Self> {
        if (CRYPTO_ERROR_CODE_MEMORY_ALLOCATION_FAILURE..=CRYPTO_ERROR_CODE_REQUEST_TOO_BIG).contains(&code) {
            Some(Self::from_int(code))
        } else {
            None
        }
    }

    /// Whether the error is a security relevant event.
    ///
    /// Health test failures, an unexpected group identity in the middle of a
    /// scalar multiplication and exhausted attempt ceilings are candidates for
    /// a platform specific halt policy and must never be retried silently.
    pub fn is_security_relevant(self) -> bool {
        const SECURITY_RELEVANT_SET: [CryptoError; 4] = [
            CryptoError::RepetitionCountTestFailure,
            CryptoError::AdaptiveProportionTestFailure,
            CryptoError::UnexpectedInfinity,
            CryptoError::TooManyAttempts,
        ];
        let value = self as cmpa::LimbType;
        let mut is_relevant = cmpa::LimbChoice::new(0);
        for relevant in SECURITY_RELEVANT_SET {
            is_relevant |= cmpa::ct_eq_l_l(value, relevant as cmpa::LimbType);
        }
        is_relevant.unwrap() != 0
    }

    pub fn map(self, from_code: Self, to_code: Self) -> Self {
        Self::from_int(
            cmpa::ct_eq_l_l(self as cmpa::LimbType, from_code as cmpa::LimbType)
                .select(self as cmpa::LimbType, to_code as cmpa::LimbType) as isize,
        )
    }
}

/// Escalate an error condition.
///
/// Security relevant errors, c.f. [`CryptoError::is_security_relevant()`], as
/// well as internal logic errors get logged at error level. The error is
/// returned unchanged for propagation to the caller, which is responsible for
/// applying any platform halt policy.
pub fn report_fatal(err: CryptoError) -> CryptoError {
    if err.is_security_relevant()
        || err == CryptoError::Internal
        || err == CryptoError::RegisterArenaExhausted
    {
        log::error!("crypto core fatal condition: {:?} (code {})", err, err.code());
    }
    err
}

impl convert::From<convert::Infallible> for CryptoError {
    fn from(value: convert::Infallible) -> Self {
        match value {}
    }
}

impl convert::From<utils_common::alloc::TryNewError> for CryptoError {
    fn from(value: utils_common::alloc::TryNewError) -> Self {
        match value {
            utils_common::alloc::TryNewError::MemoryAllocationFailure => CryptoError::MemoryAllocationFailure,
        }
    }
}

#[test]
fn test_error_code_roundtrip() {
    for code in -1..20 {
        match CryptoError::try_from_code(code) {
            Some(e) => assert_eq!(e.code(), code),
            None => assert!(!(1..=17).contains(&code)),
        }
    }
}

#[test]
fn test_is_security_relevant() {
    assert!(CryptoError::RepetitionCountTestFailure.is_security_relevant());
    assert!(CryptoError::AdaptiveProportionTestFailure.is_security_relevant());
    assert!(CryptoError::UnexpectedInfinity.is_security_relevant());
    assert!(CryptoError::TooManyAttempts.is_security_relevant());
    assert!(!CryptoError::PointAtInfinity.is_security_relevant());
    assert!(!CryptoError::InvalidTrngConfig.is_security_relevant());
    assert_eq!(
        report_fatal(CryptoError::UnexpectedInfinity),
        CryptoError::UnexpectedInfinity
    );
}

#[test]
fn test_map() {
    assert_eq!(
        CryptoError::PointAtInfinity.map(CryptoError::PointAtInfinity, CryptoError::InvalidPoint),
        CryptoError::InvalidPoint
    );
    assert_eq!(
        CryptoError::Internal.map(CryptoError::PointAtInfinity, CryptoError::InvalidPoint),
        CryptoError::Internal
    );
}
