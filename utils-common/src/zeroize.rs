// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Secret wiping, switchable by the `zeroize` Cargo feature.
//!
//! Register arena storage, DRBG state, entropy seeds and the fast generator
//! state get wiped through [`Zeroize`] and [`Zeroizing`]. With the feature
//! enabled these are the [`zeroize` crate](https://docs.rs/zeroize)'s items,
//! otherwise no-op stand-ins with the subset of the API used here.

#[cfg(feature = "zeroize")]
pub use zeroize::{Zeroize, Zeroizing};

#[cfg(not(feature = "zeroize"))]
pub use nop::{Zeroize, Zeroizing};

#[cfg(not(feature = "zeroize"))]
mod nop {
    pub trait Zeroize {
        fn zeroize(&mut self);
    }

    impl<T> Zeroize for T {
        fn zeroize(&mut self) {}
    }

    /// Transparent wrapper, nothing gets wiped on drop.
    #[repr(transparent)]
    pub struct Zeroizing<T>(T);

    impl<T> From<T> for Zeroizing<T> {
        fn from(value: T) -> Self {
            Self(value)
        }
    }

    impl<T> core::ops::Deref for Zeroizing<T> {
        type Target = T;

        fn deref(&self) -> &T {
            &self.0
        }
    }

    impl<T> core::ops::DerefMut for Zeroizing<T> {
        fn deref_mut(&mut self) -> &mut T {
            &mut self.0
        }
    }
}

#[test]
fn test_zeroizing_vec() {
    extern crate alloc;

    let mut v = Zeroizing::from(alloc::vec![0xa5u8; 4]);
    v[1] = 0;
    assert_eq!(v.as_slice(), &[0xa5, 0, 0xa5, 0xa5]);

    let mut state = [1u64, 2u64];
    state.zeroize();
    #[cfg(feature = "zeroize")]
    assert_eq!(state, [0, 0]);
}
