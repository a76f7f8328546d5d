// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Affine and Jacobian projective point representations.
//!
//! Coordinates live in [`PkaReg`] registers of some [`PkaArena`] and are
//! released together with the point.

use crate::pka::{PkaArena, PkaReg};
use crate::rng::RngCore;
use crate::utils_common::alloc::try_alloc_zeroizing_vec;
use crate::{CryptoError, report_fatal};

/// Point in affine coordinates *(x, y)*.
///
/// An `AffinePoint` cannot represent the point at infinity. Nothing about its
/// coordinates is known before it has been validated.
pub struct AffinePoint<'a> {
    x: PkaReg<'a>,
    y: PkaReg<'a>,
}

impl<'a> AffinePoint<'a> {
    /// Load a point from big-endian encoded coordinates.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidPoint`] - A coordinate is not less than the
    ///   field prime.
    /// * [`CryptoError::RegisterArenaExhausted`] - Out of registers.
    pub fn try_from_be_bytes(arena: &'a PkaArena, x: &[u8], y: &[u8]) -> Result<Self, CryptoError> {
        let point = Self {
            x: arena.alloc_reg()?,
            y: arena.alloc_reg()?,
        };
        arena
            .load_be_bytes(&point.x, x)
            .map_err(|e| e.map(CryptoError::InvalidParams, CryptoError::InvalidPoint))?;
        arena
            .load_be_bytes(&point.y, y)
            .map_err(|e| e.map(CryptoError::InvalidParams, CryptoError::InvalidPoint))?;
        Ok(point)
    }

    pub(crate) fn from_regs(x: PkaReg<'a>, y: PkaReg<'a>) -> Self {
        Self { x, y }
    }

    /// Store the coordinates in big-endian format.
    ///
    /// Both output buffers must be at least as long as the field prime.
    pub fn to_be_bytes(&self, x: &mut [u8], y: &mut [u8]) -> Result<(), CryptoError> {
        let arena = self.arena();
        arena.store_be_bytes(x, &self.x)?;
        arena.store_be_bytes(y, &self.y)
    }

    pub fn arena(&self) -> &'a PkaArena {
        self.x.arena()
    }

    pub fn get_x(&self) -> &PkaReg<'a> {
        &self.x
    }

    pub fn get_y(&self) -> &PkaReg<'a> {
        &self.y
    }

    pub fn try_clone(&self) -> Result<Self, CryptoError> {
        let arena = self.arena();
        Ok(Self {
            x: arena.alloc_copy(&self.x)?,
            y: arena.alloc_copy(&self.y)?,
        })
    }

    /// Compute *(x, -y)*.
    pub fn negate(&self) -> Result<Self, CryptoError> {
        let arena = self.arena();
        let neg = Self {
            x: arena.alloc_copy(&self.x)?,
            y: arena.alloc_reg()?,
        };
        arena.mod_neg(&neg.y, &self.y);
        Ok(neg)
    }

    /// Compare two points for equality.
    pub fn equals(&self, other: &AffinePoint<'_>) -> bool {
        let arena = self.arena();
        (arena.ct_are_equal(&self.x, &other.x) & arena.ct_are_equal(&self.y, &other.y)).unwrap() != 0
    }
}

/// Point in Jacobian projective coordinates *(X, Y, Z)*, representing the
/// affine point *(X/Z<sup>2</sup>, Y/Z<sup>3</sup>)*.
///
/// *Z = 0* denotes the point at infinity.
pub struct ProjectivePoint<'a> {
    x: PkaReg<'a>,
    y: PkaReg<'a>,
    z: PkaReg<'a>,
}

impl<'a> ProjectivePoint<'a> {
    /// Create the point at infinity.
    pub fn try_new_infinity(arena: &'a PkaArena) -> Result<Self, CryptoError> {
        let point = Self::try_alloc(arena)?;
        point.make_infinity();
        Ok(point)
    }

    pub(crate) fn from_regs(x: PkaReg<'a>, y: PkaReg<'a>, z: PkaReg<'a>) -> Self {
        Self { x, y, z }
    }

    /// Allocate a point with all coordinates zero.
    pub(crate) fn try_alloc(arena: &'a PkaArena) -> Result<Self, CryptoError> {
        Ok(Self {
            x: arena.alloc_reg()?,
            y: arena.alloc_reg()?,
            z: arena.alloc_reg()?,
        })
    }

    /// Lift an [`AffinePoint`] with *Z = 1*.
    pub fn from_affine(p: &AffinePoint<'a>) -> Result<Self, CryptoError> {
        let arena = p.arena();
        let point = Self {
            x: arena.alloc_copy(&p.x)?,
            y: arena.alloc_copy(&p.y)?,
            z: arena.alloc_reg()?,
        };
        arena.set_one(&point.z);
        Ok(point)
    }

    /// Lift an [`AffinePoint`] with a random, nonzero *Z*.
    ///
    /// The resulting coordinates are *(x·z<sup>2</sup>, y·z<sup>3</sup>, z)*.
    ///
    /// # Arguments:
    ///
    /// * `p` - The point to lift.
    /// * `rng` - Random number generator to draw *z* from.
    /// * `max_attempts` - Ceiling on the number of rejection sampling
    ///   attempts.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::TooManyAttempts`] - No suitable *z* found within
    ///   `max_attempts`.
    /// * Any error reported by the `rng`.
    pub fn from_affine_with_random_z(
        p: &AffinePoint<'a>,
        rng: &mut dyn RngCore,
        max_attempts: u32,
    ) -> Result<Self, CryptoError> {
        let arena = p.arena();
        let point = Self::try_alloc(arena)?;

        let modulus = arena.modulus();
        let top_mask = u8::MAX >> modulus[0].leading_zeros();
        let mut z_buf = try_alloc_zeroizing_vec::<u8>(modulus.len())?;
        let mut attempts = 0u32;
        loop {
            if attempts >= max_attempts {
                return Err(report_fatal(CryptoError::TooManyAttempts));
            }
            attempts += 1;
            rng.generate(&mut z_buf, None)?;
            z_buf[0] &= top_mask;
            if arena.load_be_bytes(&point.z, &z_buf).is_ok() && !arena.is_zero(&point.z) {
                break;
            }
        }

        // Y = y·z^3, X = x·z^2.
        arena.mod_sqr(&point.x, &point.z);
        arena.mod_mul(&point.y, &point.x, &point.z);
        arena.mod_mul(&point.y, &point.y, &p.y);
        arena.mod_mul(&point.x, &point.x, &p.x);
        Ok(point)
    }

    /// Convert into affine coordinates.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::PointAtInfinity`] - The point is the point at
    ///   infinity.
    pub fn into_affine(&self) -> Result<AffinePoint<'a>, CryptoError> {
        if self.is_infinity() {
            return Err(CryptoError::PointAtInfinity);
        }
        let arena = self.arena();
        let z_inv = arena.alloc_reg()?;
        arena.mod_inv(&z_inv, &self.z)?;
        let z_inv_pow = arena.alloc_reg()?;
        arena.mod_sqr(&z_inv_pow, &z_inv);
        let x = arena.alloc_reg()?;
        arena.mod_mul(&x, &self.x, &z_inv_pow);
        arena.mod_mul(&z_inv_pow, &z_inv_pow, &z_inv);
        let y = arena.alloc_reg()?;
        arena.mod_mul(&y, &self.y, &z_inv_pow);
        Ok(AffinePoint { x, y })
    }

    /// Turn the point into the point at infinity.
    pub fn make_infinity(&self) {
        let arena = self.arena();
        arena.set_one(&self.x);
        arena.set_one(&self.y);
        arena.clear(&self.z);
    }

    /// Test whether the point is the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.ct_is_infinity().unwrap() != 0
    }

    /// Test whether the point is the point at infinity, returning a
    /// [`LimbChoice`](cmpa::LimbChoice).
    pub fn ct_is_infinity(&self) -> cmpa::LimbChoice {
        self.arena().ct_is_zero(&self.z)
    }

    pub fn arena(&self) -> &'a PkaArena {
        self.x.arena()
    }

    pub fn get_x(&self) -> &PkaReg<'a> {
        &self.x
    }

    pub fn get_y(&self) -> &PkaReg<'a> {
        &self.y
    }

    pub fn get_z(&self) -> &PkaReg<'a> {
        &self.z
    }

    pub fn try_clone(&self) -> Result<Self, CryptoError> {
        let arena = self.arena();
        Ok(Self {
            x: arena.alloc_copy(&self.x)?,
            y: arena.alloc_copy(&self.y)?,
            z: arena.alloc_copy(&self.z)?,
        })
    }

    /// Overwrite with another point.
    pub fn copy_from(&mut self, src: &ProjectivePoint<'_>) {
        let arena = self.arena();
        arena.copy(&self.x, &src.x);
        arena.copy(&self.y, &src.y);
        arena.copy(&self.z, &src.z);
    }

    /// Conditionally overwrite with another point, in constant time.
    pub fn copy_from_cond(&mut self, src: &ProjectivePoint<'_>, cond: cmpa::LimbChoice) {
        let arena = self.arena();
        arena.copy_cond(&self.x, &src.x, cond);
        arena.copy_cond(&self.y, &src.y, cond);
        arena.copy_cond(&self.z, &src.z, cond);
    }
}

#[cfg(test)]
use super::curve;

#[test]
fn test_affine_load_store() {
    let curve = curve::Curve::from_domain_parameters(curve::TEST_TOY_CURVE).unwrap();
    let arena = PkaArena::try_new(curve.get_p(), 32).unwrap();
    let (g_x, g_y) = curve.get_generator_coordinates();
    let g = AffinePoint::try_from_be_bytes(&arena, g_x, g_y).unwrap();
    let mut x = [0u8; 2];
    let mut y = [0u8; 2];
    g.to_be_bytes(&mut x, &mut y).unwrap();
    assert_eq!(&x, g_x);
    assert_eq!(&y, g_y);

    assert!(matches!(
        AffinePoint::try_from_be_bytes(&arena, &[0x9c, 0x5f], g_y),
        Err(CryptoError::InvalidPoint)
    ));

    let neg_g = g.negate().unwrap();
    neg_g.to_be_bytes(&mut x, &mut y).unwrap();
    assert_eq!(x, [0x99, 0x6b]);
    assert_eq!(y, [0x47, 0xef]);
    assert!(!neg_g.equals(&g));
    assert!(g.try_clone().unwrap().equals(&g));

    drop((g, neg_g));
    assert_eq!(arena.in_use(), 0);
}

#[test]
fn test_projective_conversions() {
    let curve = curve::Curve::from_domain_parameters(curve::TEST_TOY_CURVE).unwrap();
    let arena = PkaArena::try_new(curve.get_p(), 32).unwrap();
    let (g_x, g_y) = curve.get_generator_coordinates();
    let g = AffinePoint::try_from_be_bytes(&arena, g_x, g_y).unwrap();

    let proj = ProjectivePoint::from_affine(&g).unwrap();
    assert!(!proj.is_infinity());
    assert!(proj.into_affine().unwrap().equals(&g));

    let mut rng = crate::rng::test_rng();
    let blinded = ProjectivePoint::from_affine_with_random_z(&g, &mut rng, 100).unwrap();
    assert!(!arena.is_zero(blinded.get_z()));
    assert!(blinded.into_affine().unwrap().equals(&g));

    let mut inf = ProjectivePoint::try_new_infinity(&arena).unwrap();
    assert!(inf.is_infinity());
    assert!(matches!(inf.into_affine(), Err(CryptoError::PointAtInfinity)));
    inf.copy_from_cond(&blinded, cmpa::LimbChoice::new(0));
    assert!(inf.is_infinity());
    inf.copy_from_cond(&blinded, cmpa::LimbChoice::new(1));
    assert!(inf.into_affine().unwrap().equals(&g));
    inf.make_infinity();
    assert!(inf.is_infinity());
    inf.copy_from(&proj);
    assert!(!inf.is_infinity());
}

#[test]
fn test_random_z_attempts_exhausted() {
    struct ZeroRng;
    impl RngCore for ZeroRng {
        fn generate(
            &mut self,
            output: &mut [u8],
            _additional_input: Option<&[u8]>,
        ) -> Result<(), crate::rng::RngGenerateError> {
            output.fill(0);
            Ok(())
        }
    }

    let curve = curve::Curve::from_domain_parameters(curve::TEST_TOY_CURVE).unwrap();
    let arena = PkaArena::try_new(curve.get_p(), 32).unwrap();
    let (g_x, g_y) = curve.get_generator_coordinates();
    let g = AffinePoint::try_from_be_bytes(&arena, g_x, g_y).unwrap();
    assert!(matches!(
        ProjectivePoint::from_affine_with_random_z(&g, &mut ZeroRng, 5),
        Err(CryptoError::TooManyAttempts)
    ));
}
