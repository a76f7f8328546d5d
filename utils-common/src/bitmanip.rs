// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Bit manipulation primitives for native integers and big-endian byte
//! encoded multiprecision integers.
//!
//! Everything operating on potentially secret values is implemented without
//! value dependent branches.

/// Bit manipulation primitives on unsigned native integers.
pub trait UBitManip: Sized + Copy {
    /// Returns 1 if the value is nonzero, 0 otherwise.
    fn is_nonzero(self) -> Self;

    /// Test whether the value is a power of two or zero.
    fn is_pow2(self) -> bool;

    /// Mask covering all bits up to and including the most significant set
    /// one.
    ///
    /// For a power of two `v`, this is `v - 1`, i.e. the mask covers exactly
    /// the range `[0, v)`. For any other nonzero `v`, it is the all-ones
    /// value of `v`'s significant bit length. Intended for rejection
    /// sampling of uniformly distributed values below `v`.
    fn range_mask(self) -> Self;

    /// Number of cleared bits.
    fn zero_bits(self) -> u32;
}

macro_rules! impl_ubitmanip {
    ($ut:ty) => {
        impl UBitManip for $ut {
            fn is_nonzero(self) -> Self {
                (self | self.wrapping_neg()) >> (<$ut>::BITS - 1)
            }

            fn is_pow2(self) -> bool {
                self & self.wrapping_sub(1) == 0
            }

            fn range_mask(self) -> Self {
                debug_assert!(self != 0);
                if self.is_pow2() {
                    self - 1
                } else {
                    <$ut>::MAX >> self.leading_zeros()
                }
            }

            fn zero_bits(self) -> u32 {
                self.count_zeros()
            }
        }
    };
}

impl_ubitmanip!(u8);
impl_ubitmanip!(u32);
impl_ubitmanip!(u64);
impl_ubitmanip!(usize);

/// Number of significant bits in a big-endian encoded unsigned integer.
///
/// All bytes are inspected independent of their value. A zero value has zero
/// significant bits.
///
/// # Arguments:
///
/// * `bytes` - The big-endian encoded integer.
pub fn be_bytes_significant_bits(bytes: &[u8]) -> usize {
    let mut bits = 0usize;
    for (i, b) in bytes.iter().rev().enumerate() {
        let candidate = i * 8 + (u8::BITS - b.leading_zeros()) as usize;
        let take = 0usize.wrapping_sub(b.is_nonzero() as usize);
        bits = (candidate & take) | (bits & !take);
    }
    bits
}

/// Extract a window of up to eight bits from a big-endian encoded unsigned
/// integer.
///
/// Returns the `count` bits starting at bit position `pos`, with position
/// zero denoting the least significant bit of the last byte. Bits beyond the
/// encoded length read as zero. Only the (public) position determines the
/// memory locations accessed.
///
/// # Arguments:
///
/// * `bytes` - The big-endian encoded integer.
/// * `pos` - Position of the window's least significant bit.
/// * `count` - Width of the window, at most eight.
pub fn be_bytes_test_bits(bytes: &[u8], pos: usize, count: u32) -> u8 {
    debug_assert!(count > 0 && count <= 8);
    let byte_at = |i: usize| -> u16 {
        if i < bytes.len() {
            bytes[bytes.len() - 1 - i] as u16
        } else {
            0
        }
    };
    let lo = byte_at(pos / 8);
    let hi = byte_at(pos / 8 + 1);
    let window = ((hi << 8) | lo) >> (pos % 8);
    (window & ((1u16 << count) - 1)) as u8
}

/// Total number of cleared bits in a byte buffer.
pub fn bytes_zero_bits(bytes: &[u8]) -> u32 {
    bytes.iter().map(|b| b.zero_bits()).sum()
}

#[test]
fn test_range_mask() {
    assert_eq!(1u32.range_mask(), 0);
    assert_eq!(2u32.range_mask(), 1);
    assert_eq!(3u32.range_mask(), 3);
    assert_eq!(8u32.range_mask(), 7);
    assert_eq!(9u32.range_mask(), 15);
    assert_eq!(u32::MAX.range_mask(), u32::MAX);
    assert_eq!((1u32 << 31).range_mask(), u32::MAX >> 1);
}

#[test]
fn test_is_nonzero() {
    assert_eq!(0u8.is_nonzero(), 0);
    assert_eq!(0x80u8.is_nonzero(), 1);
    assert_eq!(usize::MAX.is_nonzero(), 1);
}

#[test]
fn test_be_bytes_significant_bits() {
    assert_eq!(be_bytes_significant_bits(&[]), 0);
    assert_eq!(be_bytes_significant_bits(&[0, 0, 0]), 0);
    assert_eq!(be_bytes_significant_bits(&[0, 0, 1]), 1);
    assert_eq!(be_bytes_significant_bits(&[0, 0x80, 0xff]), 16);
    assert_eq!(be_bytes_significant_bits(&[0x01, 0x00, 0x00]), 17);
    assert_eq!(be_bytes_significant_bits(&[0xff; 32]), 256);
}

#[test]
fn test_be_bytes_test_bits() {
    let v = [0b1010_0000u8, 0b0000_0011];
    assert_eq!(be_bytes_test_bits(&v, 0, 2), 0b11);
    assert_eq!(be_bytes_test_bits(&v, 1, 2), 0b01);
    assert_eq!(be_bytes_test_bits(&v, 7, 2), 0b00);
    assert_eq!(be_bytes_test_bits(&v, 13, 2), 0b01);
    assert_eq!(be_bytes_test_bits(&v, 14, 2), 0b10);
    assert_eq!(be_bytes_test_bits(&v, 15, 2), 0b01);
    assert_eq!(be_bytes_test_bits(&v, 16, 2), 0);
    assert_eq!(be_bytes_test_bits(&v, 14, 1), 0);
    assert_eq!(be_bytes_test_bits(&v, 15, 1), 1);
}

#[test]
fn test_bytes_zero_bits() {
    assert_eq!(bytes_zero_bits(&[]), 0);
    assert_eq!(bytes_zero_bits(&[0x00, 0xff, 0x0f]), 12);
}
