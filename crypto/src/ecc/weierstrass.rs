// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Group law on short Weierstrass curves in Jacobian coordinates.
//!
//! The formulas follow the "2007-bl" family from the Explicit-Formulas
//! Database: `dbl-2007-bl` for doubling with a generic *a*, `add-2007-bl` for
//! general addition, `madd-2007-bl` for addition of an affine point to a
//! projective one and `mmadd-2007-bl` for adding two affine points.

use super::{
    curve::Curve,
    point::{AffinePoint, ProjectivePoint},
    scalar_mul,
};
use crate::pka::{PKA_MAX_REGISTERS, PkaArena, PkaReg};
use crate::rng::RngCore;
use crate::{CryptoError, report_fatal};

/// A [`Curve`] bound to a [`PkaArena`] for the arithmetic.
pub struct WeierstrassCurve<'a> {
    arena: &'a PkaArena,
    curve: &'a Curve,
    a: PkaReg<'a>,
    b: PkaReg<'a>,
    max_attempts: u32,
}

/// Create a [`PkaArena`] suitable for arithmetic on the given curve.
pub fn try_new_arena(curve: &Curve) -> Result<PkaArena, CryptoError> {
    PkaArena::try_new(curve.get_p(), PKA_MAX_REGISTERS)
}

impl<'a> WeierstrassCurve<'a> {
    /// Create a `WeierstrassCurve` instance.
    ///
    /// # Arguments:
    ///
    /// * `arena` - The register arena. Its modulus must equal the curve's
    ///   field prime.
    /// * `curve` - The curve.
    /// * `max_attempts` - Ceiling on rejection sampling iterations for
    ///   projective blinding.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidParams`] - The arena's modulus doesn't match.
    pub fn try_new(arena: &'a PkaArena, curve: &'a Curve, max_attempts: u32) -> Result<Self, CryptoError> {
        if arena.modulus() != curve.get_p() {
            return Err(CryptoError::InvalidParams);
        }
        let (a_bytes, b_bytes) = curve.get_curve_coefficients();
        let a = arena.alloc_reg()?;
        arena.load_be_bytes(&a, a_bytes)?;
        let b = arena.alloc_reg()?;
        arena.load_be_bytes(&b, b_bytes)?;
        Ok(Self {
            arena,
            curve,
            a,
            b,
            max_attempts,
        })
    }

    pub fn get_arena(&self) -> &'a PkaArena {
        self.arena
    }

    pub fn get_curve(&self) -> &'a Curve {
        self.curve
    }

    pub fn get_max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Load the curve's generator.
    pub fn get_generator(&self) -> Result<AffinePoint<'a>, CryptoError> {
        let (g_x, g_y) = self.curve.get_generator_coordinates();
        AffinePoint::try_from_be_bytes(self.arena, g_x, g_y)
    }

    /// Negate a point.
    pub fn negate(&self, p: &ProjectivePoint<'a>) -> Result<ProjectivePoint<'a>, CryptoError> {
        let neg = p.try_clone()?;
        self.arena.mod_neg(neg.get_y(), p.get_y());
        Ok(neg)
    }

    /// Double a point.
    ///
    /// The point at infinity doubles to itself.
    pub fn double(&self, p: &ProjectivePoint<'a>) -> Result<ProjectivePoint<'a>, CryptoError> {
        let arena = self.arena;
        if p.is_infinity() {
            return ProjectivePoint::try_new_infinity(arena);
        }
        let (x1, y1, z1) = (p.get_x(), p.get_y(), p.get_z());

        let t0 = arena.alloc_reg()?;
        let t1 = arena.alloc_reg()?;
        let t2 = arena.alloc_reg()?;
        let t3 = arena.alloc_reg()?;
        let x3 = arena.alloc_reg()?;
        let y3 = arena.alloc_reg()?;
        let z3 = arena.alloc_reg()?;

        // YY, ZZ, XX and YYYY.
        arena.mod_sqr(&t0, y1);
        arena.mod_sqr(&t1, z1);
        arena.mod_sqr(&t2, x1);
        arena.mod_sqr(&t3, &t0);

        // Z3 = (Y1 + Z1)^2 - YY - ZZ
        arena.mod_add(&z3, y1, z1);
        arena.mod_sqr(&z3, &z3);
        arena.mod_sub(&z3, &z3, &t0);
        arena.mod_sub(&z3, &z3, &t1);

        // S = 2((X1 + YY)^2 - XX - YYYY)
        arena.mod_add(&t0, x1, &t0);
        arena.mod_sqr(&t0, &t0);
        arena.mod_sub(&t0, &t0, &t2);
        arena.mod_sub(&t0, &t0, &t3);
        arena.mod_add(&t0, &t0, &t0);

        // M = 3XX + a·ZZ^2
        arena.mod_sqr(&t1, &t1);
        arena.mod_mul(&t1, &t1, &self.a);
        arena.mod_add(&t1, &t1, &t2);
        arena.mod_add(&t2, &t2, &t2);
        arena.mod_add(&t1, &t1, &t2);

        // X3 = M^2 - 2S
        arena.mod_sqr(&x3, &t1);
        arena.mod_sub(&x3, &x3, &t0);
        arena.mod_sub(&x3, &x3, &t0);

        // Y3 = M(S - X3) - 8YYYY
        arena.mod_sub(&y3, &t0, &x3);
        arena.mod_mul(&y3, &y3, &t1);
        arena.mod_add(&t3, &t3, &t3);
        arena.mod_add(&t3, &t3, &t3);
        arena.mod_add(&t3, &t3, &t3);
        arena.mod_sub(&y3, &y3, &t3);

        Ok(ProjectivePoint::from_regs(x3, y3, z3))
    }

    /// Add two points in Jacobian coordinates.
    pub fn add(&self, p: &ProjectivePoint<'a>, q: &ProjectivePoint<'a>) -> Result<ProjectivePoint<'a>, CryptoError> {
        let arena = self.arena;
        if p.is_infinity() {
            return q.try_clone();
        } else if q.is_infinity() {
            return p.try_clone();
        }
        let (x1, y1, z1) = (p.get_x(), p.get_y(), p.get_z());
        let (x2, y2, z2) = (q.get_x(), q.get_y(), q.get_z());

        let t0 = arena.alloc_reg()?;
        let t1 = arena.alloc_reg()?;
        let u1 = arena.alloc_reg()?;
        let u2 = arena.alloc_reg()?;
        let s1 = arena.alloc_reg()?;
        let s2 = arena.alloc_reg()?;

        // Z1Z1, Z2Z2, U1 = X1·Z2Z2, U2 = X2·Z1Z1, S1 = Y1·Z2·Z2Z2, S2 =
        // Y2·Z1·Z1Z1.
        arena.mod_sqr(&t0, z1);
        arena.mod_sqr(&t1, z2);
        arena.mod_mul(&u1, x1, &t1);
        arena.mod_mul(&u2, x2, &t0);
        arena.mod_mul(&s1, y1, z2);
        arena.mod_mul(&s1, &s1, &t1);
        arena.mod_mul(&s2, y2, z1);
        arena.mod_mul(&s2, &s2, &t0);

        if arena.are_equal(&u1, &u2) {
            return self.add_same_x(&s1, &s2, || self.double(p));
        }

        // H = U2 - U1
        let h = u2;
        arena.mod_sub(&h, &h, &u1);

        let x3 = arena.alloc_reg()?;
        let y3 = arena.alloc_reg()?;
        let z3 = arena.alloc_reg()?;

        // Z3 = ((Z1 + Z2)^2 - Z1Z1 - Z2Z2)·H
        arena.mod_add(&z3, z1, z2);
        arena.mod_sqr(&z3, &z3);
        arena.mod_sub(&z3, &z3, &t0);
        arena.mod_sub(&z3, &z3, &t1);
        arena.mod_mul(&z3, &z3, &h);

        // I = (2H)^2, J = H·I, V = U1·I
        let (i, j, v) = (t0, t1, u1);
        arena.mod_add(&i, &h, &h);
        arena.mod_sqr(&i, &i);
        arena.mod_mul(&j, &h, &i);
        arena.mod_mul(&v, &v, &i);

        // r = 2(S2 - S1)
        let r = s2;
        arena.mod_sub(&r, &r, &s1);
        arena.mod_add(&r, &r, &r);

        self.finish_add(&x3, &y3, &r, &j, &v, &s1);
        Ok(ProjectivePoint::from_regs(x3, y3, z3))
    }

    /// Add an affine point to a point in Jacobian coordinates.
    pub fn add_mixed(&self, p: &ProjectivePoint<'a>, q: &AffinePoint<'a>) -> Result<ProjectivePoint<'a>, CryptoError> {
        let arena = self.arena;
        if p.is_infinity() {
            return ProjectivePoint::from_affine(q);
        }
        let (x1, y1, z1) = (p.get_x(), p.get_y(), p.get_z());
        let (x2, y2) = (q.get_x(), q.get_y());

        let t0 = arena.alloc_reg()?;
        let t1 = arena.alloc_reg()?;
        let u2 = arena.alloc_reg()?;
        let s2 = arena.alloc_reg()?;

        // Z1Z1, U2 = X2·Z1Z1, S2 = Y2·Z1·Z1Z1
        arena.mod_sqr(&t0, z1);
        arena.mod_mul(&u2, x2, &t0);
        arena.mod_mul(&s2, y2, z1);
        arena.mod_mul(&s2, &s2, &t0);

        if arena.are_equal(x1, &u2) {
            return self.add_same_x(y1, &s2, || self.double(p));
        }

        // H = U2 - X1, HH = H^2
        let h = u2;
        arena.mod_sub(&h, &h, x1);
        arena.mod_sqr(&t1, &h);

        let x3 = arena.alloc_reg()?;
        let y3 = arena.alloc_reg()?;
        let z3 = arena.alloc_reg()?;

        // Z3 = (Z1 + H)^2 - Z1Z1 - HH
        arena.mod_add(&z3, z1, &h);
        arena.mod_sqr(&z3, &z3);
        arena.mod_sub(&z3, &z3, &t0);
        arena.mod_sub(&z3, &z3, &t1);

        // r = 2(S2 - Y1)
        let r = s2;
        arena.mod_sub(&r, &r, y1);
        arena.mod_add(&r, &r, &r);

        // I = 4HH, J = H·I, V = X1·I
        let (i, j) = (t1, t0);
        arena.mod_add(&i, &i, &i);
        arena.mod_add(&i, &i, &i);
        arena.mod_mul(&j, &h, &i);
        let v = i;
        arena.mod_mul(&v, x1, &v);

        self.finish_add(&x3, &y3, &r, &j, &v, y1);
        Ok(ProjectivePoint::from_regs(x3, y3, z3))
    }

    /// Add two affine points.
    pub fn add_affine(&self, p: &AffinePoint<'a>, q: &AffinePoint<'a>) -> Result<ProjectivePoint<'a>, CryptoError> {
        let arena = self.arena;
        let (x1, y1) = (p.get_x(), p.get_y());
        let (x2, y2) = (q.get_x(), q.get_y());

        if arena.are_equal(x1, x2) {
            return self.add_same_x(y1, y2, || self.double(&ProjectivePoint::from_affine(p)?));
        }

        let t0 = arena.alloc_reg()?;
        let t1 = arena.alloc_reg()?;
        let h = arena.alloc_reg()?;
        let r = arena.alloc_reg()?;
        let x3 = arena.alloc_reg()?;
        let y3 = arena.alloc_reg()?;
        let z3 = arena.alloc_reg()?;

        // H = X2 - X1, I = 4H^2, J = H·I, V = X1·I
        arena.mod_sub(&h, x2, x1);
        let (i, j) = (t0, t1);
        arena.mod_sqr(&i, &h);
        arena.mod_add(&i, &i, &i);
        arena.mod_add(&i, &i, &i);
        arena.mod_mul(&j, &h, &i);
        let v = i;
        arena.mod_mul(&v, x1, &v);

        // Z3 = 2H
        arena.mod_add(&z3, &h, &h);

        // r = 2(Y2 - Y1)
        arena.mod_sub(&r, y2, y1);
        arena.mod_add(&r, &r, &r);

        self.finish_add(&x3, &y3, &r, &j, &v, y1);
        Ok(ProjectivePoint::from_regs(x3, y3, z3))
    }

    /// Common tail of the addition formulas.
    ///
    /// X3 = r^2 - J - 2V, Y3 = r(V - X3) - 2·S1·J. `j` gets clobbered.
    fn finish_add(&self, x3: &PkaReg<'a>, y3: &PkaReg<'a>, r: &PkaReg<'a>, j: &PkaReg<'a>, v: &PkaReg<'a>, s1: &PkaReg<'a>) {
        let arena = self.arena;
        arena.mod_sqr(x3, r);
        arena.mod_sub(x3, x3, j);
        arena.mod_sub(x3, x3, v);
        arena.mod_sub(x3, x3, v);

        arena.mod_sub(y3, v, x3);
        arena.mod_mul(y3, y3, r);
        arena.mod_mul(j, j, s1);
        arena.mod_add(j, j, j);
        arena.mod_sub(y3, y3, j);
    }

    /// Handle addition of two points sharing the same affine x coordinate.
    ///
    /// `s1` and `s2` are the operands' y coordinates, scaled to a common
    /// denominator. Equal values mean the points are equal, opposite values
    /// mean they are each other's negative.
    fn add_same_x<F>(&self, s1: &PkaReg<'a>, s2: &PkaReg<'a>, double: F) -> Result<ProjectivePoint<'a>, CryptoError>
    where
        F: FnOnce() -> Result<ProjectivePoint<'a>, CryptoError>,
    {
        let arena = self.arena;
        if arena.are_equal(s1, s2) {
            return double();
        }
        let neg_s2 = arena.alloc_reg()?;
        arena.mod_neg(&neg_s2, s2);
        if arena.are_equal(s1, &neg_s2) {
            return ProjectivePoint::try_new_infinity(arena);
        }
        Err(report_fatal(CryptoError::Internal))
    }

    /// Check that a point satisfies the curve equation and, for curves with
    /// a cofactor other than one, that it is in the generator subgroup.
    ///
    /// # Arguments:
    ///
    /// * `p` - The point to validate.
    /// * `rng` - Random number generator for the blinding in the subgroup
    ///   membership test's scalar multiplication.
    ///
    /// # Errors:
    ///
    /// Any error from the subgroup membership test's scalar multiplication
    /// other than its result being the point at infinity is forwarded.
    pub fn validate(&self, p: &AffinePoint<'a>, rng: &mut dyn RngCore) -> Result<bool, CryptoError> {
        let arena = self.arena;
        {
            let lhs = arena.alloc_reg()?;
            let rhs = arena.alloc_reg()?;
            arena.mod_sqr(&lhs, p.get_y());
            // x^3 + ax + b = (x^2 + a)·x + b
            arena.mod_sqr(&rhs, p.get_x());
            arena.mod_add(&rhs, &rhs, &self.a);
            arena.mod_mul(&rhs, &rhs, p.get_x());
            arena.mod_add(&rhs, &rhs, &self.b);
            if !arena.are_equal(&lhs, &rhs) {
                return Ok(false);
            }
        }

        if self.curve.get_cofactor() == 1 {
            return Ok(true);
        }

        match scalar_mul::multiply_point_by_scalar(self, p, self.curve.get_order(), rng) {
            Ok(_) => Ok(false),
            Err(CryptoError::PointAtInfinity) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Double an affine point.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::PointAtInfinity`] - The result is the point at
    ///   infinity.
    pub fn double_point(&self, p: &AffinePoint<'a>) -> Result<AffinePoint<'a>, CryptoError> {
        self.double(&ProjectivePoint::from_affine(p)?)?.into_affine()
    }

    /// Add two affine points.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::PointAtInfinity`] - The result is the point at
    ///   infinity.
    pub fn add_points(&self, p: &AffinePoint<'a>, q: &AffinePoint<'a>) -> Result<AffinePoint<'a>, CryptoError> {
        self.add_affine(p, q)?.into_affine()
    }
}

#[cfg(test)]
use super::curve;

#[cfg(test)]
fn test_affine_eq(p: &AffinePoint<'_>, x: &[u8], y: &[u8]) -> bool {
    use alloc::vec;
    let len = p.arena().modulus_len();
    let mut p_x = vec![0u8; len];
    let mut p_y = vec![0u8; len];
    p.to_be_bytes(&mut p_x, &mut p_y).unwrap();
    p_x == x && p_y == y
}

#[cfg(test)]
fn test_group_law_common(curve: &Curve) {
    let arena = try_new_arena(curve).unwrap();
    let wc = WeierstrassCurve::try_new(&arena, curve, 100).unwrap();
    let mut rng = crate::rng::test_rng();

    let g = wc.get_generator().unwrap();
    assert!(wc.validate(&g, &mut rng).unwrap());

    // double(G) == add(G, G), through all of the addition variants.
    let g_proj = ProjectivePoint::from_affine_with_random_z(&g, &mut rng, 100).unwrap();
    let g2 = wc.double(&g_proj).unwrap().into_affine().unwrap();
    assert!(wc.add(&g_proj, &g_proj).unwrap().into_affine().unwrap().equals(&g2));
    assert!(wc.add_mixed(&g_proj, &g).unwrap().into_affine().unwrap().equals(&g2));
    assert!(wc.add_affine(&g, &g).unwrap().into_affine().unwrap().equals(&g2));
    assert!(wc.double_point(&g).unwrap().equals(&g2));
    assert!(wc.validate(&g2, &mut rng).unwrap());

    // 3G computed in different ways.
    let g2_proj = ProjectivePoint::from_affine_with_random_z(&g2, &mut rng, 100).unwrap();
    let g3 = wc.add(&g2_proj, &g_proj).unwrap().into_affine().unwrap();
    assert!(wc.add(&g_proj, &g2_proj).unwrap().into_affine().unwrap().equals(&g3));
    assert!(wc.add_mixed(&g2_proj, &g).unwrap().into_affine().unwrap().equals(&g3));
    assert!(wc.add_mixed(&g_proj, &g2).unwrap().into_affine().unwrap().equals(&g3));
    assert!(wc.add_points(&g, &g2).unwrap().equals(&g3));
    assert!(!g3.equals(&g2));

    // P + (-P) == infinity
    let neg_g_proj = wc.negate(&g_proj).unwrap();
    assert!(wc.add(&g_proj, &neg_g_proj).unwrap().is_infinity());
    assert!(wc.add_mixed(&neg_g_proj, &g).unwrap().is_infinity());
    let neg_g = g.negate().unwrap();
    assert!(wc.add_affine(&g, &neg_g).unwrap().is_infinity());
    assert!(matches!(wc.add_points(&neg_g, &g), Err(CryptoError::PointAtInfinity)));
    assert!(wc.negate(&neg_g_proj).unwrap().into_affine().unwrap().equals(&g));

    // P + infinity == infinity + P == P
    let inf = ProjectivePoint::try_new_infinity(&arena).unwrap();
    assert!(wc.add(&g_proj, &inf).unwrap().into_affine().unwrap().equals(&g));
    assert!(wc.add(&inf, &g_proj).unwrap().into_affine().unwrap().equals(&g));
    assert!(wc.add_mixed(&inf, &g).unwrap().into_affine().unwrap().equals(&g));
    assert!(wc.double(&inf).unwrap().is_infinity());
    assert!(wc.negate(&inf).unwrap().is_infinity());

    // Off-curve point.
    let y_plus_one = arena.alloc_reg().unwrap();
    arena.set_one(&y_plus_one);
    arena.mod_add(&y_plus_one, &y_plus_one, g.get_y());
    let off_curve = AffinePoint::from_regs(arena.alloc_copy(g.get_x()).unwrap(), y_plus_one);
    assert!(!wc.validate(&off_curve, &mut rng).unwrap());

    // "Same x, unrelated y" is an internal error.
    let off_curve_proj = ProjectivePoint::from_affine(&off_curve).unwrap();
    assert!(matches!(wc.add(&g_proj, &off_curve_proj), Err(CryptoError::Internal)));
    assert!(matches!(wc.add_mixed(&g_proj, &off_curve), Err(CryptoError::Internal)));
    assert!(matches!(wc.add_affine(&g, &off_curve), Err(CryptoError::Internal)));
}

#[cfg(test)]
fn test_group_law_curve_id(curve_id: curve::CurveId) {
    let curve = Curve::new(curve_id).unwrap();
    test_group_law_common(&curve);
}

#[cfg(feature = "ecc_nist_p192")]
#[test]
fn test_group_law_nist_p192() {
    test_group_law_curve_id(curve::CurveId::NistP192)
}

#[cfg(feature = "ecc_nist_p224")]
#[test]
fn test_group_law_nist_p224() {
    test_group_law_curve_id(curve::CurveId::NistP224)
}

#[cfg(feature = "ecc_nist_p256")]
#[test]
fn test_group_law_nist_p256() {
    test_group_law_curve_id(curve::CurveId::NistP256)
}

#[cfg(feature = "ecc_nist_p384")]
#[test]
fn test_group_law_nist_p384() {
    test_group_law_curve_id(curve::CurveId::NistP384)
}

#[cfg(feature = "ecc_nist_p521")]
#[test]
fn test_group_law_nist_p521() {
    test_group_law_curve_id(curve::CurveId::NistP521)
}

#[cfg(feature = "ecc_bp_p256_r1")]
#[test]
fn test_group_law_bp_p256_r1() {
    test_group_law_curve_id(curve::CurveId::BpP256R1)
}

#[cfg(feature = "ecc_bp_p384_r1")]
#[test]
fn test_group_law_bp_p384_r1() {
    test_group_law_curve_id(curve::CurveId::BpP384R1)
}

#[cfg(feature = "ecc_bp_p512_r1")]
#[test]
fn test_group_law_bp_p512_r1() {
    test_group_law_curve_id(curve::CurveId::BpP512R1)
}

#[test]
fn test_group_law_toy_curve() {
    let curve = Curve::from_domain_parameters(curve::TEST_TOY_CURVE).unwrap();
    test_group_law_common(&curve);
}

#[cfg(feature = "ecc_nist_p256")]
#[test]
fn test_group_law_nist_p256_known_answers() {
    let curve = Curve::new(curve::CurveId::NistP256).unwrap();
    let arena = try_new_arena(&curve).unwrap();
    let wc = WeierstrassCurve::try_new(&arena, &curve, 100).unwrap();
    let g = wc.get_generator().unwrap();

    let g2 = wc.double_point(&g).unwrap();
    assert!(test_affine_eq(
        &g2,
        &cmpa::hexstr::bytes_from_hexstr_cnst::<32>("7cf27b188d034f7e8a52380304b51ac3c08969e277f21b35a60b48fc47669978"),
        &cmpa::hexstr::bytes_from_hexstr_cnst::<32>("07775510db8ed040293d9ac69f7430dbba7dade63ce982299e04b79d227873d1"),
    ));
    let g3 = wc.add_points(&g2, &g).unwrap();
    assert!(test_affine_eq(
        &g3,
        &cmpa::hexstr::bytes_from_hexstr_cnst::<32>("5ecbe4d1a6330a44c8f7ef951d4bf165e6c6b721efada985fb41661bc6e7fd6c"),
        &cmpa::hexstr::bytes_from_hexstr_cnst::<32>("8734640c4998ff7e374b06ce1a64a2ecd82ab036384fb83d9a79b127a27d5032"),
    ));
}

#[test]
fn test_validate_cofactor() {
    let curve = Curve::from_domain_parameters(curve::TEST_TOY_CURVE).unwrap();
    let arena = try_new_arena(&curve).unwrap();
    let wc = WeierstrassCurve::try_new(&arena, &curve, 100).unwrap();
    let mut rng = crate::rng::test_rng();

    // On the curve, but outside of the generator subgroup.
    let (x, y) = curve::TEST_TOY_CURVE_NON_SUBGROUP_POINT;
    let p = AffinePoint::try_from_be_bytes(&arena, &x, &y).unwrap();
    assert!(!wc.validate(&p, &mut rng).unwrap());

    // 4P is in the subgroup.
    let p2 = wc.double_point(&p).unwrap();
    let p4 = wc.double_point(&p2).unwrap();
    assert!(wc.validate(&p4, &mut rng).unwrap());

    drop((p, p2, p4));
    drop(wc);
    assert_eq!(arena.in_use(), 0);
}

#[test]
fn test_arena_mismatch() {
    let curve = Curve::from_domain_parameters(curve::TEST_TOY_CURVE).unwrap();
    let arena = PkaArena::try_new(&[0x9c, 0x63], 8).unwrap();
    assert!(matches!(
        WeierstrassCurve::try_new(&arena, &curve, 100),
        Err(CryptoError::InvalidParams)
    ));
}
