// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Public key accelerator register arena.
//!
//! A [`PkaArena`] manages a fixed budget of equally sized multiprecision
//! registers for arithmetic modulo some odd modulus *p*. Registers are handed
//! out as scoped [`PkaReg`] handles, which get zeroized and returned to the
//! arena when dropped. All register values are kept in Montgomery form
//! internally, conversions happen only when loading from or storing to
//! external big-endian byte buffers.
//!
//! In addition to the logical allocation state, the arena mimics the limited
//! set of physical registers of the accelerator: logical registers get mapped
//! to physical ones on first access and the mapping can be dropped all at once
//! by means of [`unmap_physical_registers()`](PkaArena::unmap_physical_registers).
//! Long running algorithms are expected to do so periodically in order to keep
//! the working set within the physical register file.

extern crate alloc;
use alloc::vec::Vec;

use crate::utils_common::{
    alloc::{try_alloc_vec, try_alloc_zeroizing_vec},
    zeroize,
};
use crate::{CryptoError, report_fatal};
use cmpa::{self, MpMutUInt as _, MpUIntCommon as _};
use core::{cell, ops};

/// Maximum number of logical registers an arena can manage.
pub const PKA_MAX_REGISTERS: usize = 64;

/// Number of physical registers available for mapping logical ones to.
pub const PKA_PHYS_REGISTERS: usize = 32;

/// Register arena for arithmetic modulo an odd modulus.
pub struct PkaArena {
    p: Vec<u8>,
    nlimbs: usize,
    capacity: usize,
    mg_neg_p0_inv_mod_l: cmpa::LimbType,
    mg_radix2_mod_p: Vec<cmpa::LimbType>,
    mg_one: Vec<cmpa::LimbType>,
    storage: cell::RefCell<zeroize::Zeroizing<Vec<cmpa::LimbType>>>,
    scratch: cell::RefCell<zeroize::Zeroizing<Vec<cmpa::LimbType>>>,
    in_use: cell::Cell<u64>,
    mapped: cell::Cell<u64>,
    remap_count: cell::Cell<usize>,
}

/// Handle to a register allocated from a [`PkaArena`].
///
/// The register's contents are zeroized and its slot released when the handle
/// goes out of scope.
pub struct PkaReg<'a> {
    arena: &'a PkaArena,
    idx: usize,
}

impl<'a> PkaReg<'a> {
    /// The arena the register has been allocated from.
    pub fn arena(&self) -> &'a PkaArena {
        self.arena
    }
}

impl<'a> Drop for PkaReg<'a> {
    fn drop(&mut self) {
        self.arena.release(self.idx);
    }
}

impl PkaArena {
    /// Create a `PkaArena` instance.
    ///
    /// # Arguments:
    ///
    /// * `p` - The modulus in big-endian format. Must be odd and greater than
    ///   one.
    /// * `capacity` - Number of registers to provide. At most
    ///   [`PKA_MAX_REGISTERS`].
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidParams`] - Either `p` is not an odd modulus
    ///   greater than one or `capacity` is out of range.
    /// * [`CryptoError::MemoryAllocationFailure`] - Memory allocation failure.
    pub fn try_new(p: &[u8], capacity: usize) -> Result<Self, CryptoError> {
        if capacity == 0 || capacity > PKA_MAX_REGISTERS {
            return Err(CryptoError::InvalidParams);
        }
        if p.is_empty() || p[p.len() - 1] & 1 == 0 {
            return Err(CryptoError::InvalidParams);
        }
        let p_mp = cmpa::MpBigEndianUIntByteSlice::from_bytes(p);
        let (_, p_last_set_bit) = cmpa::ct_find_last_set_bit_mp(&p_mp);
        if p_last_set_bit < 2 {
            return Err(CryptoError::InvalidParams);
        }

        let nlimbs = cmpa::MpMutNativeEndianUIntLimbsSlice::nlimbs_for_len(p.len());
        let mut p_buf = try_alloc_vec::<u8>(p.len())?;
        p_buf.copy_from_slice(p);

        let mut mg_radix2_mod_p = try_alloc_vec::<cmpa::LimbType>(nlimbs)?;
        cmpa::ct_montgomery_radix2_mod_n_mp(
            &mut cmpa::MpMutNativeEndianUIntLimbsSlice::from_limbs(&mut mg_radix2_mod_p),
            &p_mp,
        )
        .map_err(|_| CryptoError::InvalidParams)?;
        let mg_neg_p0_inv_mod_l = cmpa::ct_montgomery_neg_n0_inv_mod_l_mp(&p_mp).map_err(|_| CryptoError::InvalidParams)?;

        // The Montgomery form of one is the radix modulo p, obtained by
        // reducing radix^2 once.
        let mut mg_one = try_alloc_vec::<cmpa::LimbType>(nlimbs)?;
        let mut mg_one_slice = cmpa::MpMutNativeEndianUIntLimbsSlice::from_limbs(&mut mg_one);
        mg_one_slice.copy_from(&cmpa::MpNativeEndianUIntLimbsSlice::from_limbs(&mg_radix2_mod_p));
        cmpa::ct_montgomery_redc_mp(&mut mg_one_slice, &p_mp, mg_neg_p0_inv_mod_l).unwrap();

        let storage = try_alloc_zeroizing_vec::<cmpa::LimbType>(capacity * nlimbs)?;
        let scratch = try_alloc_zeroizing_vec::<cmpa::LimbType>(4 * nlimbs)?;

        Ok(Self {
            p: p_buf,
            nlimbs,
            capacity,
            mg_neg_p0_inv_mod_l,
            mg_radix2_mod_p,
            mg_one,
            storage: cell::RefCell::new(storage),
            scratch: cell::RefCell::new(scratch),
            in_use: cell::Cell::new(0),
            mapped: cell::Cell::new(0),
            remap_count: cell::Cell::new(0),
        })
    }

    /// The modulus in big-endian format.
    pub fn modulus(&self) -> &[u8] {
        &self.p
    }

    /// Length of the modulus in bytes.
    ///
    /// Register contents get loaded from and stored to byte buffers of this
    /// length.
    pub fn modulus_len(&self) -> usize {
        self.p.len()
    }

    /// Number of registers managed by the arena.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of registers currently allocated.
    pub fn in_use(&self) -> usize {
        self.in_use.get().count_ones() as usize
    }

    /// Number of logical registers currently mapped to physical ones.
    pub fn mapped(&self) -> usize {
        self.mapped.get().count_ones() as usize
    }

    /// Number of times a logical register had to get mapped while all
    /// physical registers had been occupied already.
    pub fn remap_count(&self) -> usize {
        self.remap_count.get()
    }

    /// Drop all logical to physical register mappings.
    ///
    /// Register contents are retained.
    pub fn unmap_physical_registers(&self) {
        self.mapped.set(0);
    }

    /// Allocate a register.
    ///
    /// The register's initial value is zero.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::RegisterArenaExhausted`] - All registers are in use.
    pub fn alloc_reg(&self) -> Result<PkaReg<'_>, CryptoError> {
        let in_use = self.in_use.get();
        let free = !in_use & Self::capacity_mask(self.capacity);
        if free == 0 {
            return Err(report_fatal(CryptoError::RegisterArenaExhausted));
        }
        let idx = free.trailing_zeros() as usize;
        self.in_use.set(in_use | 1u64 << idx);
        Ok(PkaReg { arena: self, idx })
    }

    /// Allocate a register and initialize it with a copy of another one.
    pub fn alloc_copy(&self, src: &PkaReg<'_>) -> Result<PkaReg<'_>, CryptoError> {
        let reg = self.alloc_reg()?;
        self.copy(&reg, src);
        Ok(reg)
    }

    fn capacity_mask(capacity: usize) -> u64 {
        if capacity >= 64 { !0 } else { (1u64 << capacity) - 1 }
    }

    fn release(&self, idx: usize) {
        let range = self.reg_range(idx);
        self.storage.borrow_mut()[range].fill(0);
        self.in_use.set(self.in_use.get() & !(1u64 << idx));
        self.mapped.set(self.mapped.get() & !(1u64 << idx));
    }

    fn reg_range(&self, idx: usize) -> ops::Range<usize> {
        idx * self.nlimbs..(idx + 1) * self.nlimbs
    }

    fn touch(&self, reg: &PkaReg<'_>) {
        debug_assert!(core::ptr::eq(reg.arena, self));
        let mapped = self.mapped.get();
        let bit = 1u64 << reg.idx;
        if mapped & bit == 0 {
            if mapped.count_ones() as usize >= PKA_PHYS_REGISTERS {
                self.remap_count.set(self.remap_count.get() + 1);
            }
            self.mapped.set(mapped | bit);
        }
    }

    fn get_p(&self) -> cmpa::MpBigEndianUIntByteSlice<'_> {
        cmpa::MpBigEndianUIntByteSlice::from_bytes(&self.p)
    }

    fn get_mg_radix2_mod_p(&self) -> cmpa::MpNativeEndianUIntLimbsSlice<'_> {
        cmpa::MpNativeEndianUIntLimbsSlice::from_limbs(&self.mg_radix2_mod_p)
    }

    /// Evaluate `f` into the first scratch area and write the result to `res`
    /// afterwards.
    ///
    /// This allows for `res` to alias any of the operands.
    fn compute<F>(&self, res: &PkaReg<'_>, operands: &[&PkaReg<'_>], f: F)
    where
        F: FnOnce(&Self, &[cmpa::LimbType], &mut cmpa::MpMutNativeEndianUIntLimbsSlice, &mut [cmpa::LimbType]),
    {
        self.touch(res);
        for op in operands {
            self.touch(op);
        }
        let mut storage = self.storage.borrow_mut();
        let mut scratch = self.scratch.borrow_mut();
        let (result_buf, scratch_tail) = scratch.split_at_mut(self.nlimbs);
        {
            let mut result = cmpa::MpMutNativeEndianUIntLimbsSlice::from_limbs(result_buf);
            f(self, &storage, &mut result, scratch_tail);
        }
        let range = self.reg_range(res.idx);
        storage[range].copy_from_slice(result_buf);
        result_buf.fill(0);
        scratch_tail.fill(0);
    }

    fn reg_slice<'s>(&self, storage: &'s [cmpa::LimbType], reg: &PkaReg<'_>) -> cmpa::MpNativeEndianUIntLimbsSlice<'s> {
        cmpa::MpNativeEndianUIntLimbsSlice::from_limbs(&storage[self.reg_range(reg.idx)])
    }

    /// Set `res` to zero.
    pub fn clear(&self, res: &PkaReg<'_>) {
        self.touch(res);
        let range = self.reg_range(res.idx);
        self.storage.borrow_mut()[range].fill(0);
    }

    /// Set `res` to one.
    pub fn set_one(&self, res: &PkaReg<'_>) {
        self.touch(res);
        let range = self.reg_range(res.idx);
        self.storage.borrow_mut()[range].copy_from_slice(&self.mg_one);
    }

    /// Set `res` to a small integer value.
    pub fn set_u8(&self, res: &PkaReg<'_>, value: u8) {
        self.compute(res, &[], |arena, _, result, scratch| {
            let mut plain = cmpa::MpMutNativeEndianUIntLimbsSlice::from_limbs(&mut scratch[..arena.nlimbs]);
            plain.set_to_u8(value);
            debug_assert_ne!(cmpa::ct_lt_mp_mp(&plain, &arena.get_p()).unwrap(), 0);
            cmpa::ct_to_montgomery_form_mp(
                result,
                &plain,
                &arena.get_p(),
                arena.mg_neg_p0_inv_mod_l,
                &arena.get_mg_radix2_mod_p(),
            )
            .unwrap();
        });
    }

    /// Load a big-endian encoded value into `res`.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidParams`] - The value is not less than the
    ///   modulus or `bytes` is too long.
    pub fn load_be_bytes(&self, res: &PkaReg<'_>, bytes: &[u8]) -> Result<(), CryptoError> {
        if bytes.len() > self.p.len() {
            // Tolerate leading zeroes beyond the modulus length.
            let excess = bytes.len() - self.p.len();
            if bytes[..excess].iter().any(|b| *b != 0) {
                return Err(CryptoError::InvalidParams);
            }
            return self.load_be_bytes(res, &bytes[excess..]);
        }
        let value = cmpa::MpBigEndianUIntByteSlice::from_bytes(bytes);
        if cmpa::ct_lt_mp_mp(&value, &self.get_p()).unwrap() == 0 {
            return Err(CryptoError::InvalidParams);
        }
        self.compute(res, &[], |arena, _, result, _| {
            cmpa::ct_to_montgomery_form_mp(
                result,
                &value,
                &arena.get_p(),
                arena.mg_neg_p0_inv_mod_l,
                &arena.get_mg_radix2_mod_p(),
            )
            .unwrap();
        });
        Ok(())
    }

    /// Store the value of `src` in big-endian format.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidParams`] - `out` is too short to hold a value
    ///   of the modulus' length.
    pub fn store_be_bytes(&self, out: &mut [u8], src: &PkaReg<'_>) -> Result<(), CryptoError> {
        if out.len() < self.p.len() {
            return Err(CryptoError::InvalidParams);
        }
        self.touch(src);
        let storage = self.storage.borrow();
        let mut scratch = self.scratch.borrow_mut();
        let plain_buf = &mut scratch[..self.nlimbs];
        plain_buf.copy_from_slice(&storage[self.reg_range(src.idx)]);
        let mut plain = cmpa::MpMutNativeEndianUIntLimbsSlice::from_limbs(plain_buf);
        cmpa::ct_montgomery_redc_mp(&mut plain, &self.get_p(), self.mg_neg_p0_inv_mod_l).unwrap();
        cmpa::MpMutBigEndianUIntByteSlice::from_bytes(out).copy_from(&plain);
        plain_buf.fill(0);
        Ok(())
    }

    /// Copy `src` to `res`.
    pub fn copy(&self, res: &PkaReg<'_>, src: &PkaReg<'_>) {
        if res.idx == src.idx {
            return;
        }
        self.compute(res, &[src], |arena, storage, result, _| {
            result.copy_from(&arena.reg_slice(storage, src));
        });
    }

    /// Copy `src` to `res` if `cond` is set, in constant time.
    pub fn copy_cond(&self, res: &PkaReg<'_>, src: &PkaReg<'_>, cond: cmpa::LimbChoice) {
        self.compute(res, &[src], |arena, storage, result, _| {
            result.copy_from(&arena.reg_slice(storage, res));
            result.copy_from_cond(&arena.reg_slice(storage, src), cond);
        });
    }

    /// Compute `res = a + b mod p`.
    pub fn mod_add(&self, res: &PkaReg<'_>, a: &PkaReg<'_>, b: &PkaReg<'_>) {
        self.compute(res, &[a, b], |arena, storage, result, _| {
            result.copy_from(&arena.reg_slice(storage, a));
            cmpa::ct_add_mod_mp_mp(result, &arena.reg_slice(storage, b), &arena.get_p()).unwrap();
        });
    }

    /// Compute `res = a - b mod p`.
    pub fn mod_sub(&self, res: &PkaReg<'_>, a: &PkaReg<'_>, b: &PkaReg<'_>) {
        self.compute(res, &[a, b], |arena, storage, result, _| {
            result.copy_from(&arena.reg_slice(storage, a));
            cmpa::ct_sub_mod_mp_mp(result, &arena.reg_slice(storage, b), &arena.get_p()).unwrap();
        });
    }

    /// Compute `res = -a mod p`.
    pub fn mod_neg(&self, res: &PkaReg<'_>, a: &PkaReg<'_>) {
        self.compute(res, &[a], |arena, storage, result, _| {
            result.set_to_u8(0);
            cmpa::ct_sub_mod_mp_mp(result, &arena.reg_slice(storage, a), &arena.get_p()).unwrap();
        });
    }

    /// Compute `res = a * b mod p`.
    pub fn mod_mul(&self, res: &PkaReg<'_>, a: &PkaReg<'_>, b: &PkaReg<'_>) {
        self.compute(res, &[a, b], |arena, storage, result, _| {
            cmpa::ct_montgomery_mul_mod_mp_mp(
                result,
                &arena.reg_slice(storage, a),
                &arena.reg_slice(storage, b),
                &arena.get_p(),
                arena.mg_neg_p0_inv_mod_l,
            )
            .unwrap();
        });
    }

    /// Compute `res = a^2 mod p`.
    pub fn mod_sqr(&self, res: &PkaReg<'_>, a: &PkaReg<'_>) {
        self.mod_mul(res, a, a)
    }

    /// Compute `res = a^-1 mod p`.
    ///
    /// The modulus is required to be prime for the result to be meaningful.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidParams`] - `a` is not invertible, e.g. it is
    ///   zero.
    pub fn mod_inv(&self, res: &PkaReg<'_>, a: &PkaReg<'_>) -> Result<(), CryptoError> {
        let mut r = Ok(());
        self.compute(res, &[a], |arena, storage, result, scratch| {
            let nlimbs = arena.nlimbs;
            let (plain_buf, scratch) = scratch.split_at_mut(nlimbs);
            let (scratch0, scratch1) = scratch.split_at_mut(nlimbs);
            let mut plain = cmpa::MpMutNativeEndianUIntLimbsSlice::from_limbs(plain_buf);
            plain.copy_from(&arena.reg_slice(storage, a));
            cmpa::ct_montgomery_redc_mp(&mut plain, &arena.get_p(), arena.mg_neg_p0_inv_mod_l).unwrap();

            // Invert in plain form into result, then reuse the plain buffer as
            // the Montgomery form destination.
            match cmpa::ct_inv_mod_odd_mp_mp(result, &mut plain, &arena.get_p(), [scratch0, scratch1]) {
                Ok(()) => (),
                Err(cmpa::CtInvModOddMpMpError::OperandsNotCoprime) => {
                    r = Err(CryptoError::InvalidParams);
                    result.set_to_u8(0);
                    return;
                }
                Err(_) => {
                    r = Err(CryptoError::Internal);
                    result.set_to_u8(0);
                    return;
                }
            }
            let mut mg_inv = cmpa::MpMutNativeEndianUIntLimbsSlice::from_limbs(plain_buf);
            cmpa::ct_to_montgomery_form_mp(
                &mut mg_inv,
                &*result,
                &arena.get_p(),
                arena.mg_neg_p0_inv_mod_l,
                &arena.get_mg_radix2_mod_p(),
            )
            .unwrap();
            result.copy_from(&mg_inv);
        });
        r
    }

    /// Compare two registers for equality in constant time.
    pub fn are_equal(&self, a: &PkaReg<'_>, b: &PkaReg<'_>) -> bool {
        self.ct_are_equal(a, b).unwrap() != 0
    }

    /// Compare two registers for equality in constant time, returning a
    /// [`LimbChoice`](cmpa::LimbChoice).
    pub fn ct_are_equal(&self, a: &PkaReg<'_>, b: &PkaReg<'_>) -> cmpa::LimbChoice {
        self.touch(a);
        self.touch(b);
        let storage = self.storage.borrow();
        cmpa::ct_eq_mp_mp(&self.reg_slice(&storage, a), &self.reg_slice(&storage, b))
    }

    /// Test whether a register's value is zero.
    pub fn is_zero(&self, a: &PkaReg<'_>) -> bool {
        self.ct_is_zero(a).unwrap() != 0
    }

    /// Test whether a register's value is zero, returning a
    /// [`LimbChoice`](cmpa::LimbChoice).
    pub fn ct_is_zero(&self, a: &PkaReg<'_>) -> cmpa::LimbChoice {
        self.touch(a);
        let storage = self.storage.borrow();
        cmpa::ct_is_zero_mp(&self.reg_slice(&storage, a))
    }
}

#[cfg(test)]
fn test_load(arena: &PkaArena, value: u64) -> PkaReg<'_> {
    let reg = arena.alloc_reg().unwrap();
    let bytes = value.to_be_bytes();
    arena.load_be_bytes(&reg, &bytes[8 - arena.modulus_len()..]).unwrap();
    reg
}

#[cfg(test)]
fn test_store(arena: &PkaArena, reg: &PkaReg<'_>) -> u64 {
    let mut bytes = [0u8; 8];
    let len = arena.modulus_len();
    arena.store_be_bytes(&mut bytes[8 - len..], reg).unwrap();
    u64::from_be_bytes(bytes)
}

#[test]
fn test_arena_alloc_release() {
    let arena = PkaArena::try_new(&[0x9c, 0x5f], 3).unwrap();
    assert!(matches!(PkaArena::try_new(&[0x9c, 0x5e], 3), Err(CryptoError::InvalidParams)));
    assert!(matches!(PkaArena::try_new(&[0x9c, 0x5f], 65), Err(CryptoError::InvalidParams)));

    let r0 = arena.alloc_reg().unwrap();
    let r1 = arena.alloc_reg().unwrap();
    let r2 = arena.alloc_reg().unwrap();
    assert_eq!(arena.in_use(), 3);
    assert!(matches!(arena.alloc_reg(), Err(CryptoError::RegisterArenaExhausted)));
    arena.set_u8(&r1, 7);
    drop(r1);
    assert_eq!(arena.in_use(), 2);
    // A released register gets handed out zeroized again.
    let r1 = arena.alloc_reg().unwrap();
    assert!(arena.is_zero(&r1));
    drop((r0, r1, r2));
    assert_eq!(arena.in_use(), 0);
}

#[test]
fn test_arena_arithmetic() {
    const P: u64 = 40031;
    let arena = PkaArena::try_new(&[0x9c, 0x5f], 8).unwrap();
    let a = test_load(&arena, 12345);
    let b = test_load(&arena, 39999);
    let r = arena.alloc_reg().unwrap();

    arena.mod_add(&r, &a, &b);
    assert_eq!(test_store(&arena, &r), (12345 + 39999) % P);
    arena.mod_sub(&r, &a, &b);
    assert_eq!(test_store(&arena, &r), (12345 + P - 39999) % P);
    arena.mod_mul(&r, &a, &b);
    assert_eq!(test_store(&arena, &r), 12345 * 39999 % P);
    arena.mod_neg(&r, &a);
    assert_eq!(test_store(&arena, &r), P - 12345);
    arena.mod_neg(&r, &r);
    assert_eq!(test_store(&arena, &r), 12345);
    assert!(arena.are_equal(&r, &a));

    // Aliasing of the destination with the operands.
    arena.copy(&r, &a);
    arena.mod_mul(&r, &r, &r);
    assert_eq!(test_store(&arena, &r), 12345 * 12345 % P);

    arena.mod_inv(&r, &a).unwrap();
    arena.mod_mul(&r, &r, &a);
    assert_eq!(test_store(&arena, &r), 1);

    let zero = arena.alloc_reg().unwrap();
    assert!(matches!(arena.mod_inv(&r, &zero), Err(CryptoError::InvalidParams)));

    arena.set_u8(&r, 3);
    assert_eq!(test_store(&arena, &r), 3);
    arena.set_one(&r);
    assert_eq!(test_store(&arena, &r), 1);

    arena.copy_cond(&r, &b, cmpa::LimbChoice::new(0));
    assert_eq!(test_store(&arena, &r), 1);
    arena.copy_cond(&r, &b, cmpa::LimbChoice::new(1));
    assert_eq!(test_store(&arena, &r), 39999);
}

#[test]
fn test_arena_load_bounds() {
    let arena = PkaArena::try_new(&[0x9c, 0x5f], 2).unwrap();
    let r = arena.alloc_reg().unwrap();
    assert!(matches!(arena.load_be_bytes(&r, &[0x9c, 0x5f]), Err(CryptoError::InvalidParams)));
    assert!(matches!(arena.load_be_bytes(&r, &[0x01, 0x00, 0x00]), Err(CryptoError::InvalidParams)));
    arena.load_be_bytes(&r, &[0x00, 0x12, 0x34]).unwrap();
    assert_eq!(test_store(&arena, &r), 0x1234);
    let mut short = [0u8; 1];
    assert!(matches!(arena.store_be_bytes(&mut short, &r), Err(CryptoError::InvalidParams)));
}

#[test]
fn test_arena_physical_mapping() {
    let arena = PkaArena::try_new(&[0x9c, 0x5f], PKA_MAX_REGISTERS).unwrap();
    let mut regs = Vec::new();
    for _ in 0..PKA_PHYS_REGISTERS + 2 {
        let r = arena.alloc_reg().unwrap();
        arena.set_u8(&r, 1);
        regs.push(r);
    }
    assert_eq!(arena.mapped(), PKA_PHYS_REGISTERS + 2);
    assert_eq!(arena.remap_count(), 2);
    arena.unmap_physical_registers();
    assert_eq!(arena.mapped(), 0);
    // Contents survive unmapping.
    assert_eq!(test_store(&arena, &regs[0]), 1);
    assert_eq!(arena.mapped(), 1);
}
