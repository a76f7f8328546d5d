// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Scalar multiplication.
//!
//! Two algorithms are provided:
//! - [`hardened_multiply_point_by_scalar()`], a signed 2-bit window ladder on
//!   a randomized projective representation of the input point. The sequence
//!   of group operations is independent of the scalar's value, only its bit
//!   length shows.
//! - [`shamir_multiply_points_by_scalars()`], the plain joint double-and-add
//!   ladder for *k<sub>1</sub>·P<sub>1</sub> + k<sub>2</sub>·P<sub>2</sub>*,
//!   which must never get used with secret scalars.
//!
//! [`multiply_point_by_scalar()`] and
//! [`shamir_multiply_points_by_scalars_and_add()`] dispatch to either,
//! depending on the `scalar_mult_no_secret` and `shamir_trick` features.

use super::{
    point::{AffinePoint, ProjectivePoint},
    weierstrass::WeierstrassCurve,
};
use crate::rng::RngCore;
use crate::utils_common::bitmanip::{be_bytes_significant_bits, be_bytes_test_bits};
use crate::{CryptoError, report_fatal};

// Window table layout, indexed by carry * 4 + window + 4 with carry being
// either 0 or -1. Entries are multiples of the input point P:
// [-4P, -2P, -2P, -P, P, P, 2P, 4P]. The entries at indices 1, 4 and 7
// produce a carry of -1 into the next window, all others a carry of 0.
const WINDOW_CARRY_NEG: [bool; 8] = [false, true, false, false, true, false, false, true];

/// Select an entry from the window table in constant time.
///
/// Returns 1 if the selected entry produces a carry of -1, 0 otherwise.
fn select_window_entry<'a>(
    dst: &mut ProjectivePoint<'a>,
    table: &[&ProjectivePoint<'a>; 8],
    sel: cmpa::LimbType,
) -> cmpa::LimbType {
    let mut carry_neg = cmpa::LimbChoice::new(0);
    for (i, entry) in table.iter().enumerate() {
        let is_sel = cmpa::ct_eq_l_l(i as cmpa::LimbType, sel);
        dst.copy_from_cond(entry, is_sel);
        if WINDOW_CARRY_NEG[i] {
            carry_neg |= is_sel;
        }
    }
    carry_neg.unwrap()
}

/// Compute *k·P* with side channel hardening.
///
/// The input point gets lifted to a projective representation with a random
/// *Z* and the scalar processed in 2-bit windows from the most significant
/// end, with exactly two doublings and one addition per window.
///
/// # Arguments:
///
/// * `curve` - The curve to operate on.
/// * `p` - The point to multiply.
/// * `scalar` - The scalar in big-endian format.
/// * `rng` - Random number generator for the projective blinding.
///
/// # Errors:
///
/// * [`CryptoError::UnexpectedInfinity`] - The accumulator became the point
///   at infinity before the last window, or the blinded input point is the
///   point at infinity. Reported as fatal.
/// * [`CryptoError::TooManyAttempts`] - No blinding factor could be drawn.
/// * Any error from the `rng`.
pub fn hardened_multiply_point_by_scalar<'a>(
    curve: &WeierstrassCurve<'a>,
    p: &AffinePoint<'a>,
    scalar: &[u8],
    rng: &mut dyn RngCore,
) -> Result<ProjectivePoint<'a>, CryptoError> {
    let arena = curve.get_arena();

    let proj_p = ProjectivePoint::from_affine_with_random_z(p, rng, curve.get_max_attempts())?;
    if proj_p.is_infinity() {
        return Err(report_fatal(CryptoError::UnexpectedInfinity));
    }
    let neg_p = curve.negate(&proj_p)?;
    let p2 = curve.double(&proj_p)?;
    let neg_p2 = curve.negate(&p2)?;
    let p4 = curve.double(&p2)?;
    let neg_p4 = curve.negate(&p4)?;

    // A zero scalar is processed as a single all-zero window, which yields
    // the point at infinity only through the final carry correction.
    let nbits = be_bytes_significant_bits(scalar).max(2);
    let mut idx = nbits.next_multiple_of(2) - 2;

    let mut acc = ProjectivePoint::try_alloc(arena)?;
    let mut selected = ProjectivePoint::try_alloc(arena)?;
    let mut carry_neg;
    {
        let table: [&ProjectivePoint<'a>; 8] = [&neg_p4, &neg_p2, &neg_p2, &neg_p, &proj_p, &proj_p, &p2, &p4];

        let window = be_bytes_test_bits(scalar, idx, 2) as cmpa::LimbType;
        carry_neg = select_window_entry(&mut acc, &table, window + 4);

        while idx > 0 {
            idx -= 2;
            arena.unmap_physical_registers();

            let window = be_bytes_test_bits(scalar, idx, 2) as cmpa::LimbType;
            acc = curve.double(&acc)?;
            acc = curve.double(&acc)?;
            let sel = window + 4 - (carry_neg << 2);
            carry_neg = select_window_entry(&mut selected, &table, sel);
            acc = curve.add(&acc, &selected)?;

            if idx > 0 && acc.is_infinity() {
                return Err(report_fatal(CryptoError::UnexpectedInfinity));
            }
        }
    }
    drop((selected, p2, neg_p2, p4, neg_p4));

    // Undo the final carry: the accumulator holds (k + 1)·P if it's set.
    let corrected = curve.add(&acc, &neg_p)?;
    acc.copy_from_cond(&corrected, cmpa::LimbChoice::from(carry_neg));
    Ok(acc)
}

/// Compute *k<sub>1</sub>·P<sub>1</sub> + k<sub>2</sub>·P<sub>2</sub>* by
/// means of Shamir's trick.
///
/// Not side channel hardened, the scalars must not be secret.
///
/// # Arguments:
///
/// * `curve` - The curve to operate on.
/// * `p1` - The first point.
/// * `k1` - The first scalar in big-endian format.
/// * `p2` - The second point.
/// * `k2` - The second scalar in big-endian format.
///
/// # Errors:
///
/// * [`CryptoError::UnexpectedInfinity`] - The accumulator became the point
///   at infinity before the last bit. Reported as fatal.
pub fn shamir_multiply_points_by_scalars<'a>(
    curve: &WeierstrassCurve<'a>,
    p1: &AffinePoint<'a>,
    k1: &[u8],
    p2: &AffinePoint<'a>,
    k2: &[u8],
) -> Result<ProjectivePoint<'a>, CryptoError> {
    let arena = curve.get_arena();
    let nbits1 = be_bytes_significant_bits(k1);
    let nbits2 = be_bytes_significant_bits(k2);
    let nbits = nbits1.max(nbits2);
    if nbits == 0 {
        return ProjectivePoint::try_new_infinity(arena);
    }

    let p1p2 = curve.add_affine(p1, p2)?;
    let mut acc = match nbits1.cmp(&nbits2) {
        core::cmp::Ordering::Greater => ProjectivePoint::from_affine(p1)?,
        core::cmp::Ordering::Less => ProjectivePoint::from_affine(p2)?,
        core::cmp::Ordering::Equal => p1p2.try_clone()?,
    };

    let mut idx = nbits - 1;
    while idx > 0 {
        idx -= 1;
        arena.unmap_physical_registers();

        acc = curve.double(&acc)?;
        let pair = (be_bytes_test_bits(k1, idx, 1) << 1) | be_bytes_test_bits(k2, idx, 1);
        match pair {
            1 => acc = curve.add_mixed(&acc, p2)?,
            2 => acc = curve.add_mixed(&acc, p1)?,
            3 => acc = curve.add(&acc, &p1p2)?,
            _ => (),
        }

        if idx > 0 && acc.is_infinity() {
            return Err(report_fatal(CryptoError::UnexpectedInfinity));
        }
    }

    Ok(acc)
}

/// Compute *k·P*.
///
/// With the `scalar_mult_no_secret` feature enabled, the computation runs
/// through [`shamir_multiply_points_by_scalars()`] with a zero second scalar,
/// otherwise through [`hardened_multiply_point_by_scalar()`].
///
/// # Errors:
///
/// * [`CryptoError::PointAtInfinity`] - The result is the point at infinity.
/// * Any error from the underlying algorithm.
pub fn multiply_point_by_scalar<'a>(
    curve: &WeierstrassCurve<'a>,
    p: &AffinePoint<'a>,
    scalar: &[u8],
    rng: &mut dyn RngCore,
) -> Result<AffinePoint<'a>, CryptoError> {
    #[cfg(feature = "scalar_mult_no_secret")]
    {
        let _ = rng;
        shamir_multiply_points_by_scalars(curve, p, scalar, p, &[0u8])?.into_affine()
    }
    #[cfg(not(feature = "scalar_mult_no_secret"))]
    {
        hardened_multiply_point_by_scalar(curve, p, scalar, rng)?.into_affine()
    }
}

/// Compute *k<sub>1</sub>·P<sub>1</sub> + k<sub>2</sub>·P<sub>2</sub>*.
///
/// With the `shamir_trick` feature enabled, the computation runs through
/// [`shamir_multiply_points_by_scalars()`] and the scalars must not be secret.
/// Otherwise, two independent [hardened
/// multiplications](hardened_multiply_point_by_scalar) get summed up.
///
/// # Errors:
///
/// * [`CryptoError::PointAtInfinity`] - The result is the point at infinity.
/// * Any error from the underlying algorithm.
pub fn shamir_multiply_points_by_scalars_and_add<'a>(
    curve: &WeierstrassCurve<'a>,
    p1: &AffinePoint<'a>,
    k1: &[u8],
    p2: &AffinePoint<'a>,
    k2: &[u8],
    rng: &mut dyn RngCore,
) -> Result<AffinePoint<'a>, CryptoError> {
    #[cfg(feature = "shamir_trick")]
    {
        let _ = rng;
        shamir_multiply_points_by_scalars(curve, p1, k1, p2, k2)?.into_affine()
    }
    #[cfg(not(feature = "shamir_trick"))]
    {
        let r1 = hardened_multiply_point_by_scalar(curve, p1, k1, rng)?;
        let r2 = hardened_multiply_point_by_scalar(curve, p2, k2, rng)?;
        curve.add(&r1, &r2)?.into_affine()
    }
}

#[cfg(test)]
use super::{curve, weierstrass::try_new_arena};

#[cfg(test)]
fn test_order_minus(curve: &curve::Curve, d: cmpa::LimbType) -> alloc::vec::Vec<u8> {
    let mut k = alloc::vec::Vec::from(curve.get_order());
    cmpa::ct_sub_mp_l(&mut cmpa::MpMutBigEndianUIntByteSlice::from_bytes(&mut k), d);
    k
}

#[cfg(test)]
fn test_scalar_mul_common(curve: &curve::Curve) {
    let arena = try_new_arena(curve).unwrap();
    let wc = WeierstrassCurve::try_new(&arena, curve, 100).unwrap();
    let mut rng = crate::rng::test_rng();
    let g = wc.get_generator().unwrap();
    let in_use = arena.in_use();

    let g2 = wc.double_point(&g).unwrap();
    let g3 = wc.add_points(&g2, &g).unwrap();
    let neg_g = g.negate().unwrap();

    // 1·G, 2·G, 3·G and (n - 1)·G through the hardened ladder.
    let mul = |k: &[u8], rng: &mut dyn RngCore| {
        hardened_multiply_point_by_scalar(&wc, &g, k, rng).and_then(|r| r.into_affine())
    };
    assert!(mul(&[1], &mut rng).unwrap().equals(&g));
    assert!(mul(&[2], &mut rng).unwrap().equals(&g2));
    assert!(mul(&[0, 3], &mut rng).unwrap().equals(&g3));
    assert!(mul(&test_order_minus(curve, 1), &mut rng).unwrap().equals(&neg_g));

    // The identity results are no errors of the algorithm itself.
    assert!(hardened_multiply_point_by_scalar(&wc, &g, &[0], &mut rng).unwrap().is_infinity());
    assert!(hardened_multiply_point_by_scalar(&wc, &g, curve.get_order(), &mut rng).unwrap().is_infinity());
    assert!(matches!(mul(&[], &mut rng), Err(CryptoError::PointAtInfinity)));
    assert!(matches!(
        multiply_point_by_scalar(&wc, &g, curve.get_order(), &mut rng),
        Err(CryptoError::PointAtInfinity)
    ));
    assert!(multiply_point_by_scalar(&wc, &g, &[3], &mut rng).unwrap().equals(&g3));

    // Both dual multiplication variants agree with the single ones.
    let k1 = test_order_minus(curve, 5);
    let k2 = test_order_minus(curve, 7);
    {
        let expected = {
            let r1 = hardened_multiply_point_by_scalar(&wc, &g, &k1, &mut rng).unwrap();
            let r2 = hardened_multiply_point_by_scalar(&wc, &g2, &k2, &mut rng).unwrap();
            wc.add(&r1, &r2).unwrap().into_affine().unwrap()
        };
        let r = shamir_multiply_points_by_scalars(&wc, &g, &k1, &g2, &k2).unwrap();
        assert!(r.into_affine().unwrap().equals(&expected));
        drop(r);
        let r = shamir_multiply_points_by_scalars_and_add(&wc, &g, &k1, &g2, &k2, &mut rng).unwrap();
        assert!(r.equals(&expected));
    }

    // Unequal scalar lengths and zero scalars in the joint ladder.
    {
        let expected = {
            let r2 = hardened_multiply_point_by_scalar(&wc, &g2, &k2, &mut rng).unwrap();
            wc.add_mixed(&r2, &g3).unwrap().into_affine().unwrap()
        };
        let r = shamir_multiply_points_by_scalars(&wc, &g, &[0x03], &g2, &k2).unwrap();
        assert!(r.into_affine().unwrap().equals(&expected));
    }
    let r = shamir_multiply_points_by_scalars(&wc, &g, &[0x02], &g2, &[]).unwrap();
    assert!(r.into_affine().unwrap().equals(&g2));
    drop(r);
    let r = shamir_multiply_points_by_scalars(&wc, &g, &[0x00], &g2, &[0x01]).unwrap();
    assert!(r.into_affine().unwrap().equals(&g2));
    drop(r);
    assert!(shamir_multiply_points_by_scalars(&wc, &g, &[0x00], &g2, &[0x00]).unwrap().is_infinity());
    assert!(matches!(
        shamir_multiply_points_by_scalars_and_add(&wc, &g, &[0x02], &neg_g, &[0x02], &mut rng),
        Err(CryptoError::PointAtInfinity)
    ));

    drop((g2, g3, neg_g));
    assert_eq!(arena.in_use(), in_use);
}

#[cfg(test)]
fn test_scalar_mul_curve_id(curve_id: curve::CurveId) {
    let curve = curve::Curve::new(curve_id).unwrap();
    test_scalar_mul_common(&curve);
}

#[cfg(feature = "ecc_nist_p192")]
#[test]
fn test_scalar_mul_nist_p192() {
    test_scalar_mul_curve_id(curve::CurveId::NistP192)
}

#[cfg(feature = "ecc_nist_p224")]
#[test]
fn test_scalar_mul_nist_p224() {
    test_scalar_mul_curve_id(curve::CurveId::NistP224)
}

#[cfg(feature = "ecc_nist_p256")]
#[test]
fn test_scalar_mul_nist_p256() {
    test_scalar_mul_curve_id(curve::CurveId::NistP256)
}

#[cfg(feature = "ecc_nist_p384")]
#[test]
fn test_scalar_mul_nist_p384() {
    test_scalar_mul_curve_id(curve::CurveId::NistP384)
}

#[cfg(feature = "ecc_nist_p521")]
#[test]
fn test_scalar_mul_nist_p521() {
    test_scalar_mul_curve_id(curve::CurveId::NistP521)
}

#[cfg(feature = "ecc_bp_p256_r1")]
#[test]
fn test_scalar_mul_bp_p256_r1() {
    test_scalar_mul_curve_id(curve::CurveId::BpP256R1)
}

#[cfg(feature = "ecc_bp_p384_r1")]
#[test]
fn test_scalar_mul_bp_p384_r1() {
    test_scalar_mul_curve_id(curve::CurveId::BpP384R1)
}

#[cfg(feature = "ecc_bp_p512_r1")]
#[test]
fn test_scalar_mul_bp_p512_r1() {
    test_scalar_mul_curve_id(curve::CurveId::BpP512R1)
}

#[test]
fn test_scalar_mul_toy_curve() {
    let curve = curve::Curve::from_domain_parameters(curve::TEST_TOY_CURVE).unwrap();
    test_scalar_mul_common(&curve);

    let arena = try_new_arena(&curve).unwrap();
    let wc = WeierstrassCurve::try_new(&arena, &curve, 100).unwrap();
    let mut rng = crate::rng::test_rng();
    let g = wc.get_generator().unwrap();
    let mut x = [0u8; 2];
    let mut y = [0u8; 2];

    let r = hardened_multiply_point_by_scalar(&wc, &g, &[0x04, 0xd2], &mut rng).unwrap();
    r.into_affine().unwrap().to_be_bytes(&mut x, &mut y).unwrap();
    assert_eq!((x, y), ([0x13, 0x82], [0x4b, 0xa5]));

    let (p_x, p_y) = curve::TEST_TOY_CURVE_NON_SUBGROUP_POINT;
    let p = AffinePoint::try_from_be_bytes(&arena, &p_x, &p_y).unwrap();
    let r = shamir_multiply_points_by_scalars_and_add(&wc, &g, &[77], &p, &[0x03, 0xe8], &mut rng).unwrap();
    r.to_be_bytes(&mut x, &mut y).unwrap();
    assert_eq!((x, y), ([0x98, 0x67], [0x8b, 0x6e]));

    // 4n + 1: the accumulator hits the identity one window before the end.
    assert!(matches!(
        hardened_multiply_point_by_scalar(&wc, &g, &[0x9b, 0xd5], &mut rng),
        Err(CryptoError::UnexpectedInfinity)
    ));
}

#[cfg(feature = "ecc_nist_p256")]
#[test]
fn test_scalar_mul_nist_p256_known_answers() {
    let curve = curve::Curve::new(curve::CurveId::NistP256).unwrap();
    let arena = try_new_arena(&curve).unwrap();
    let wc = WeierstrassCurve::try_new(&arena, &curve, 100).unwrap();
    let mut rng = crate::rng::test_rng();
    let g = wc.get_generator().unwrap();
    let g2 = wc.double_point(&g).unwrap();
    let mut x = [0u8; 32];
    let mut y = [0u8; 32];

    let k1 = cmpa::hexstr::bytes_from_hexstr_cnst::<32>("c51e4753afdec1e6b6c6a5b992f43f8dd0c7a8933072708b6522468b2ffb06fd");
    let r = multiply_point_by_scalar(&wc, &g, &k1, &mut rng).unwrap();
    r.to_be_bytes(&mut x, &mut y).unwrap();
    assert_eq!(
        x,
        cmpa::hexstr::bytes_from_hexstr_cnst::<32>("942c9f408ead9d82d34a1b9a6a827ebe3e2ddf782b448d23be1b6143988ccef4")
    );
    assert_eq!(
        y,
        cmpa::hexstr::bytes_from_hexstr_cnst::<32>("8c9eaf6c0d14d992fc63bad3e2496be2eee61cb5b97f65f428ca94a5d0ee19a1")
    );

    let k2 = cmpa::hexstr::bytes_from_hexstr_cnst::<32>("1bc4b3c0a1c8d2e6f7a0e5d3b2c1a09f8e7d6c5b4a3928170f1e2d3c4b5a6978");
    let r = shamir_multiply_points_by_scalars_and_add(&wc, &g, &k1, &g2, &k2, &mut rng).unwrap();
    r.to_be_bytes(&mut x, &mut y).unwrap();
    assert_eq!(
        x,
        cmpa::hexstr::bytes_from_hexstr_cnst::<32>("fbb2526bc6faf1094d7e4327258cbde4ab085dcf16434044dfbd063ab4f18365")
    );
    assert_eq!(
        y,
        cmpa::hexstr::bytes_from_hexstr_cnst::<32>("01fd55e4e372345bbfb937c61e736087a772a1983bf2c216d2351b2dcaae8795")
    );
}
