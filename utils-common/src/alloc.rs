// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Fallible allocation helpers.
//!
//! Firmware style consumers must never abort on an allocation failure, so
//! every heap allocation made on behalf of the core goes through one of the
//! primitives here and gets reported as a [`TryNewError`].

extern crate alloc;
use alloc::vec::Vec;

use crate::zeroize;

/// Memory allocation error.
#[derive(Clone, Copy, Debug)]
pub enum TryNewError {
    /// Memory allocation failure.
    MemoryAllocationFailure,
}

/// Allocate a default-initialized `Vec` of a given length, handling memory
/// allocation failure gracefully.
///
/// # Arguments:
///
/// * `len` - The length to resize the `Vec` to.
///
/// # Errors:
///
/// * [`TryNewError::MemoryAllocationFailure`] - The memory allocation has
///   failed.
pub fn try_alloc_vec<T: Default + Clone>(len: usize) -> Result<Vec<T>, TryNewError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| TryNewError::MemoryAllocationFailure)?;
    v.resize(len, T::default());
    Ok(v)
}

/// Allocate a default-initialized, [`Zeroizing`](zeroize::Zeroizing) wrapped
/// `Vec` of a given length, handling memory allocation failure gracefully.
///
/// Meant for buffers receiving key material, seeds or intermediate values of
/// computations involving secrets.
///
/// # Arguments:
///
/// * `len` - The length to resize the `Vec` to.
///
/// # Errors:
///
/// * [`TryNewError::MemoryAllocationFailure`] - The memory allocation has
///   failed.
pub fn try_alloc_zeroizing_vec<T: zeroize::Zeroize + Default + Clone>(
    len: usize,
) -> Result<zeroize::Zeroizing<Vec<T>>, TryNewError> {
    Ok(try_alloc_vec(len)?.into())
}

/// Allocate the identity index sequence `[0, 1, ..., len - 1]`.
///
/// # Errors:
///
/// * [`TryNewError::MemoryAllocationFailure`] - The memory allocation has
///   failed.
pub fn try_alloc_identity_index_vec(len: usize) -> Result<Vec<usize>, TryNewError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| TryNewError::MemoryAllocationFailure)?;
    v.extend(0..len);
    Ok(v)
}

#[test]
fn test_try_alloc_identity_index_vec() {
    let v = try_alloc_identity_index_vec(5).unwrap();
    assert_eq!(v.as_slice(), &[0, 1, 2, 3, 4]);
    assert!(try_alloc_identity_index_vec(0).unwrap().is_empty());
}

#[test]
fn test_try_alloc_zeroizing_vec() {
    let v = try_alloc_zeroizing_vec::<u8>(24).unwrap();
    assert_eq!(v.len(), 24);
    assert!(v.iter().all(|b| *b == 0));
}
