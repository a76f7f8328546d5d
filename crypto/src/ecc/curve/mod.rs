// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Short Weierstrass curve domain parameters.

use crate::CryptoError;
use cmpa::MpUIntCommon as _;

#[cfg(feature = "ecc_nist_p192")]
const NIST_P192_P: [u8; 24] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<24>("fffffffffffffffffffffffffffffffeffffffffffffffff");
#[cfg(feature = "ecc_nist_p192")]
const NIST_P192_N: [u8; 24] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<24>("ffffffffffffffffffffffff99def836146bc9b1b4d22831");
#[cfg(feature = "ecc_nist_p192")]
const NIST_P192_A: [u8; 24] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<24>("fffffffffffffffffffffffffffffffefffffffffffffffc");
#[cfg(feature = "ecc_nist_p192")]
const NIST_P192_B: [u8; 24] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<24>("64210519e59c80e70fa7e9ab72243049feb8deecc146b9b1");
#[cfg(feature = "ecc_nist_p192")]
const NIST_P192_G_X: [u8; 24] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<24>("188da80eb03090f67cbf20eb43a18800f4ff0afd82ff1012");
#[cfg(feature = "ecc_nist_p192")]
const NIST_P192_G_Y: [u8; 24] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<24>("07192b95ffc8da78631011ed6b24cdd573f977a11e794811");

#[cfg(feature = "ecc_nist_p224")]
const NIST_P224_P: [u8; 28] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<28>("ffffffffffffffffffffffffffffffff000000000000000000000001");
#[cfg(feature = "ecc_nist_p224")]
const NIST_P224_N: [u8; 28] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<28>("ffffffffffffffffffffffffffff16a2e0b8f03e13dd29455c5c2a3d");
#[cfg(feature = "ecc_nist_p224")]
const NIST_P224_A: [u8; 28] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<28>("fffffffffffffffffffffffffffffffefffffffffffffffffffffffe");
#[cfg(feature = "ecc_nist_p224")]
const NIST_P224_B: [u8; 28] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<28>("b4050a850c04b3abf54132565044b0b7d7bfd8ba270b39432355ffb4");
#[cfg(feature = "ecc_nist_p224")]
const NIST_P224_G_X: [u8; 28] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<28>("b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21");
#[cfg(feature = "ecc_nist_p224")]
const NIST_P224_G_Y: [u8; 28] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<28>("bd376388b5f723fb4c22dfe6cd4375a05a07476444d5819985007e34");

#[cfg(feature = "ecc_nist_p256")]
const NIST_P256_P: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
#[cfg(feature = "ecc_nist_p256")]
const NIST_P256_N: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");
#[cfg(feature = "ecc_nist_p256")]
const NIST_P256_A: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc");
#[cfg(feature = "ecc_nist_p256")]
const NIST_P256_B: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b");
#[cfg(feature = "ecc_nist_p256")]
const NIST_P256_G_X: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296");
#[cfg(feature = "ecc_nist_p256")]
const NIST_P256_G_Y: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5");

#[cfg(feature = "ecc_nist_p384")]
const NIST_P384_P: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe\
     ffffffff0000000000000000ffffffff",
);
#[cfg(feature = "ecc_nist_p384")]
const NIST_P384_N: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf\
     581a0db248b0a77aecec196accc52973",
);
#[cfg(feature = "ecc_nist_p384")]
const NIST_P384_A: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe\
     ffffffff0000000000000000fffffffc",
);
#[cfg(feature = "ecc_nist_p384")]
const NIST_P384_B: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875a\
     c656398d8a2ed19d2a85c8edd3ec2aef",
);
#[cfg(feature = "ecc_nist_p384")]
const NIST_P384_G_X: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a38\
     5502f25dbf55296c3a545e3872760ab7",
);
#[cfg(feature = "ecc_nist_p384")]
const NIST_P384_G_Y: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c0\
     0a60b1ce1d7e819d7a431d7c90ea0e5f",
);

#[cfg(feature = "ecc_nist_p521")]
const NIST_P521_P: [u8; 66] = cmpa::hexstr::bytes_from_hexstr_cnst::<66>(
    "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
     ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
     ffff",
);
#[cfg(feature = "ecc_nist_p521")]
const NIST_P521_N: [u8; 66] = cmpa::hexstr::bytes_from_hexstr_cnst::<66>(
    "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
     fffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e9138\
     6409",
);
#[cfg(feature = "ecc_nist_p521")]
const NIST_P521_A: [u8; 66] = cmpa::hexstr::bytes_from_hexstr_cnst::<66>(
    "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
     ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
     fffc",
);
#[cfg(feature = "ecc_nist_p521")]
const NIST_P521_B: [u8; 66] = cmpa::hexstr::bytes_from_hexstr_cnst::<66>(
    "0051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef1\
     09e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b50\
     3f00",
);
#[cfg(feature = "ecc_nist_p521")]
const NIST_P521_G_X: [u8; 66] = cmpa::hexstr::bytes_from_hexstr_cnst::<66>(
    "00c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d\
     3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5\
     bd66",
);
#[cfg(feature = "ecc_nist_p521")]
const NIST_P521_G_Y: [u8; 66] = cmpa::hexstr::bytes_from_hexstr_cnst::<66>(
    "011839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e\
     662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd1\
     6650",
);

#[cfg(feature = "ecc_bp_p256_r1")]
const BP_P256_R1_P: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("a9fb57dba1eea9bc3e660a909d838d726e3bf623d52620282013481d1f6e5377");
#[cfg(feature = "ecc_bp_p256_r1")]
const BP_P256_R1_N: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("a9fb57dba1eea9bc3e660a909d838d718c397aa3b561a6f7901e0e82974856a7");
#[cfg(feature = "ecc_bp_p256_r1")]
const BP_P256_R1_A: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("7d5a0975fc2c3057eef67530417affe7fb8055c126dc5c6ce94a4b44f330b5d9");
#[cfg(feature = "ecc_bp_p256_r1")]
const BP_P256_R1_B: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("26dc5c6ce94a4b44f330b5d9bbd77cbf958416295cf7e1ce6bccdc18ff8c07b6");
#[cfg(feature = "ecc_bp_p256_r1")]
const BP_P256_R1_G_X: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("8bd2aeb9cb7e57cb2c4b482ffc81b7afb9de27e1e3bd23c23a4453bd9ace3262");
#[cfg(feature = "ecc_bp_p256_r1")]
const BP_P256_R1_G_Y: [u8; 32] =
    cmpa::hexstr::bytes_from_hexstr_cnst::<32>("547ef835c3dac4fd97f8461a14611dc9c27745132ded8e545c1d54c72f046997");

#[cfg(feature = "ecc_bp_p384_r1")]
const BP_P384_R1_P: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "8cb91e82a3386d280f5d6f7e50e641df152f7109ed5456b412b1da197fb71123\
     acd3a729901d1a71874700133107ec53",
);
#[cfg(feature = "ecc_bp_p384_r1")]
const BP_P384_R1_N: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "8cb91e82a3386d280f5d6f7e50e641df152f7109ed5456b31f166e6cac0425a7\
     cf3ab6af6b7fc3103b883202e9046565",
);
#[cfg(feature = "ecc_bp_p384_r1")]
const BP_P384_R1_A: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "7bc382c63d8c150c3c72080ace05afa0c2bea28e4fb22787139165efba91f90f\
     8aa5814a503ad4eb04a8c7dd22ce2826",
);
#[cfg(feature = "ecc_bp_p384_r1")]
const BP_P384_R1_B: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "04a8c7dd22ce28268b39b55416f0447c2fb77de107dcd2a62e880ea53eeb62d5\
     7cb4390295dbc9943ab78696fa504c11",
);
#[cfg(feature = "ecc_bp_p384_r1")]
const BP_P384_R1_G_X: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "1d1c64f068cf45ffa2a63a81b7c13f6b8847a3e77ef14fe3db7fcafe0cbd10e8\
     e826e03436d646aaef87b2e247d4af1e",
);
#[cfg(feature = "ecc_bp_p384_r1")]
const BP_P384_R1_G_Y: [u8; 48] = cmpa::hexstr::bytes_from_hexstr_cnst::<48>(
    "8abe1d7520f9c2a45cb1eb8e95cfd55262b70b29feec5864e19c054ff9912928\
     0e4646217791811142820341263c5315",
);

#[cfg(feature = "ecc_bp_p512_r1")]
const BP_P512_R1_P: [u8; 64] = cmpa::hexstr::bytes_from_hexstr_cnst::<64>(
    "aadd9db8dbe9c48b3fd4e6ae33c9fc07cb308db3b3c9d20ed6639cca70330871\
     7d4d9b009bc66842aecda12ae6a380e62881ff2f2d82c68528aa6056583a48f3",
);
#[cfg(feature = "ecc_bp_p512_r1")]
const BP_P512_R1_N: [u8; 64] = cmpa::hexstr::bytes_from_hexstr_cnst::<64>(
    "aadd9db8dbe9c48b3fd4e6ae33c9fc07cb308db3b3c9d20ed6639cca70330870\
     553e5c414ca92619418661197fac10471db1d381085ddaddb58796829ca90069",
);
#[cfg(feature = "ecc_bp_p512_r1")]
const BP_P512_R1_A: [u8; 64] = cmpa::hexstr::bytes_from_hexstr_cnst::<64>(
    "7830a3318b603b89e2327145ac234cc594cbdd8d3df91610a83441caea9863bc\
     2ded5d5aa8253aa10a2ef1c98b9ac8b57f1117a72bf2c7b9e7c1ac4d77fc94ca",
);
#[cfg(feature = "ecc_bp_p512_r1")]
const BP_P512_R1_B: [u8; 64] = cmpa::hexstr::bytes_from_hexstr_cnst::<64>(
    "3df91610a83441caea9863bc2ded5d5aa8253aa10a2ef1c98b9ac8b57f1117a7\
     2bf2c7b9e7c1ac4d77fc94cadc083e67984050b75ebae5dd2809bd638016f723",
);
#[cfg(feature = "ecc_bp_p512_r1")]
const BP_P512_R1_G_X: [u8; 64] = cmpa::hexstr::bytes_from_hexstr_cnst::<64>(
    "81aee4bdd82ed9645a21322e9c4c6a9385ed9f70b5d916c1b43b62eef4d0098e\
     ff3b1f78e2d0d48d50d1687b93b97d5f7c6d5047406a5e688b352209bcb9f822",
);
#[cfg(feature = "ecc_bp_p512_r1")]
const BP_P512_R1_G_Y: [u8; 64] = cmpa::hexstr::bytes_from_hexstr_cnst::<64>(
    "7dde385d566332ecc0eabfa9cf7822fdf209f70024a57b1aa000c55b881f8111\
     b2dcde494a5f485e5bca4bd88a2763aed1ca2b2fa8f0540678cd1e0f3ad80892",
);

/// Identifiers of the built-in curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveId {
    NistP192,
    NistP224,
    NistP256,
    NistP384,
    NistP521,
    BpP256R1,
    BpP384R1,
    BpP512R1,
}

/// Domain parameters of a short Weierstrass curve *y<sup>2</sup> =
/// x<sup>3</sup> + ax + b* over a prime field.
///
/// All values are in big-endian format.
#[derive(Clone, Copy, Debug)]
pub struct CurveDomainParameters {
    /// The field prime *p*.
    pub p: &'static [u8],
    /// The order of the generator subgroup.
    pub n: &'static [u8],
    /// The curve coefficient *a*.
    pub a: &'static [u8],
    /// The curve coefficient *b*.
    pub b: &'static [u8],
    /// The generator's x coordinate.
    pub g_x: &'static [u8],
    /// The generator's y coordinate.
    pub g_y: &'static [u8],
    /// The curve group's cofactor.
    pub cofactor: u32,
}

/// Provide information about an elliptic curve.
#[derive(Clone, Debug)]
pub struct Curve {
    curve_id: Option<CurveId>,
    params: CurveDomainParameters,
}

impl Curve {
    /// Create a new `Curve` instance for one of the built-in curves.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidParams`] - Support for the curve has not been
    ///   enabled at build time.
    pub fn new(curve_id: CurveId) -> Result<Self, CryptoError> {
        let (p, n, a, b, g_x, g_y): (&[u8], &[u8], &[u8], &[u8], &[u8], &[u8]) = match curve_id {
            #[cfg(feature = "ecc_nist_p192")]
            CurveId::NistP192 => (
                &NIST_P192_P,
                &NIST_P192_N,
                &NIST_P192_A,
                &NIST_P192_B,
                &NIST_P192_G_X,
                &NIST_P192_G_Y,
            ),
            #[cfg(feature = "ecc_nist_p224")]
            CurveId::NistP224 => (
                &NIST_P224_P,
                &NIST_P224_N,
                &NIST_P224_A,
                &NIST_P224_B,
                &NIST_P224_G_X,
                &NIST_P224_G_Y,
            ),
            #[cfg(feature = "ecc_nist_p256")]
            CurveId::NistP256 => (
                &NIST_P256_P,
                &NIST_P256_N,
                &NIST_P256_A,
                &NIST_P256_B,
                &NIST_P256_G_X,
                &NIST_P256_G_Y,
            ),
            #[cfg(feature = "ecc_nist_p384")]
            CurveId::NistP384 => (
                &NIST_P384_P,
                &NIST_P384_N,
                &NIST_P384_A,
                &NIST_P384_B,
                &NIST_P384_G_X,
                &NIST_P384_G_Y,
            ),
            #[cfg(feature = "ecc_nist_p521")]
            CurveId::NistP521 => (
                &NIST_P521_P,
                &NIST_P521_N,
                &NIST_P521_A,
                &NIST_P521_B,
                &NIST_P521_G_X,
                &NIST_P521_G_Y,
            ),
            #[cfg(feature = "ecc_bp_p256_r1")]
            CurveId::BpP256R1 => (
                &BP_P256_R1_P,
                &BP_P256_R1_N,
                &BP_P256_R1_A,
                &BP_P256_R1_B,
                &BP_P256_R1_G_X,
                &BP_P256_R1_G_Y,
            ),
            #[cfg(feature = "ecc_bp_p384_r1")]
            CurveId::BpP384R1 => (
                &BP_P384_R1_P,
                &BP_P384_R1_N,
                &BP_P384_R1_A,
                &BP_P384_R1_B,
                &BP_P384_R1_G_X,
                &BP_P384_R1_G_Y,
            ),
            #[cfg(feature = "ecc_bp_p512_r1")]
            CurveId::BpP512R1 => (
                &BP_P512_R1_P,
                &BP_P512_R1_N,
                &BP_P512_R1_A,
                &BP_P512_R1_B,
                &BP_P512_R1_G_X,
                &BP_P512_R1_G_Y,
            ),
            #[allow(unreachable_patterns)]
            _ => return Err(CryptoError::InvalidParams),
        };
        Ok(Self {
            curve_id: Some(curve_id),
            params: CurveDomainParameters {
                p,
                n,
                a,
                b,
                g_x,
                g_y,
                cofactor: 1,
            },
        })
    }

    /// Create a `Curve` from explicitly specified domain parameters.
    ///
    /// Only basic sanity checks are applied, the parameters are trusted to
    /// describe a valid curve otherwise.
    ///
    /// # Errors:
    ///
    /// * [`CryptoError::InvalidParams`] - The prime is even, some coefficient
    ///   or generator coordinate doesn't fit the field or the cofactor is zero.
    pub fn from_domain_parameters(params: CurveDomainParameters) -> Result<Self, CryptoError> {
        let p_len = params.p.len();
        if p_len == 0 || params.p[p_len - 1] & 1 == 0 || params.cofactor == 0 || params.n.is_empty() {
            return Err(CryptoError::InvalidParams);
        }
        let p = cmpa::MpBigEndianUIntByteSlice::from_bytes(params.p);
        for v in [params.a, params.b, params.g_x, params.g_y] {
            let v = cmpa::MpBigEndianUIntByteSlice::from_bytes(v);
            if !p.len_is_compatible_with(v.len()) || cmpa::ct_lt_mp_mp(&v, &p).unwrap() == 0 {
                return Err(CryptoError::InvalidParams);
            }
        }
        Ok(Self {
            curve_id: None,
            params,
        })
    }

    /// Get the curve's identifier, if it is one of the built-in ones.
    pub fn get_curve_id(&self) -> Option<CurveId> {
        self.curve_id
    }

    /// Get the curve's field prime.
    pub fn get_p(&self) -> &'static [u8] {
        self.params.p
    }

    /// Get the length of the field prime in units of bytes.
    pub fn get_p_len(&self) -> usize {
        self.params.p.len()
    }

    /// Get the generator subgroup's order.
    pub fn get_order(&self) -> &'static [u8] {
        self.params.n
    }

    /// Get the curve group's cofactor.
    pub fn get_cofactor(&self) -> u32 {
        self.params.cofactor
    }

    /// Get the width in units of bits of the field prime.
    pub fn get_nbits(&self) -> usize {
        let (_, nbits) = cmpa::ct_find_last_set_bit_mp(&cmpa::MpBigEndianUIntByteSlice::from_bytes(self.params.p));
        nbits
    }

    /// Get the curve's coefficients *a* and *b*.
    pub fn get_curve_coefficients(&self) -> (&'static [u8], &'static [u8]) {
        (self.params.a, self.params.b)
    }

    /// Get the curve's (subgroup) generator point in affine, "plain"
    /// coordinates.
    pub fn get_generator_coordinates(&self) -> (&'static [u8], &'static [u8]) {
        (self.params.g_x, self.params.g_y)
    }
}

/// A small curve with cofactor four over a 16 bit prime field, suitable for
/// exercising corner cases.
#[cfg(test)]
pub const TEST_TOY_CURVE: CurveDomainParameters = CurveDomainParameters {
    p: &[0x9c, 0x5f],
    n: &[0x26, 0xf5],
    a: &[0x05],
    b: &[0x06],
    g_x: &[0x99, 0x6b],
    g_y: &[0x54, 0x70],
    cofactor: 4,
};

/// A point of order 4 * n on [`TEST_TOY_CURVE`], i.e. outside the generator
/// subgroup.
#[cfg(test)]
pub const TEST_TOY_CURVE_NON_SUBGROUP_POINT: ([u8; 2], [u8; 2]) = ([0x00, 0x1c], [0x76, 0xbd]);

#[cfg(test)]
macro_rules! cfg_select_curve_id {
    (($f:literal, $id:ident)) => {{
        #[cfg(feature = $f)]
        return CurveId::$id;
        #[cfg(not(feature = $f))]
        {
            "Force compile error for no ECC curve configured"
        }
    }};
    (($f:literal, $id:ident), $(($f_more:literal, $id_more:ident)),+) => {{
        #[cfg(feature = $f)]
        return CurveId::$id;
        #[cfg(not(feature = $f))]
        {
            cfg_select_curve_id!($(($f_more, $id_more)),+)
        }
    }};
}

#[cfg(test)]
pub fn test_curve_id() -> CurveId {
    cfg_select_curve_id!(
        ("ecc_nist_p256", NistP256),
        ("ecc_nist_p192", NistP192),
        ("ecc_nist_p224", NistP224),
        ("ecc_nist_p384", NistP384),
        ("ecc_nist_p521", NistP521),
        ("ecc_bp_p256_r1", BpP256R1),
        ("ecc_bp_p384_r1", BpP384R1),
        ("ecc_bp_p512_r1", BpP512R1)
    );
}

#[cfg(test)]
fn test_curve_params_common(curve_id: CurveId, nbits: usize) {
    let curve = Curve::new(curve_id).unwrap();
    assert_eq!(curve.get_curve_id(), Some(curve_id));
    assert_eq!(curve.get_nbits(), nbits);
    assert_eq!(curve.get_p_len(), nbits.div_ceil(8));
    assert_eq!(curve.get_cofactor(), 1);
    let (a, b) = curve.get_curve_coefficients();
    let (g_x, g_y) = curve.get_generator_coordinates();
    for v in [a, b, g_x, g_y] {
        assert_eq!(v.len(), curve.get_p_len());
    }
    assert!(Curve::from_domain_parameters(curve.params).is_ok());
}

#[cfg(feature = "ecc_nist_p192")]
#[test]
fn test_curve_params_nist_p192() {
    test_curve_params_common(CurveId::NistP192, 192)
}

#[cfg(feature = "ecc_nist_p224")]
#[test]
fn test_curve_params_nist_p224() {
    test_curve_params_common(CurveId::NistP224, 224)
}

#[cfg(feature = "ecc_nist_p256")]
#[test]
fn test_curve_params_nist_p256() {
    test_curve_params_common(CurveId::NistP256, 256)
}

#[cfg(feature = "ecc_nist_p384")]
#[test]
fn test_curve_params_nist_p384() {
    test_curve_params_common(CurveId::NistP384, 384)
}

#[cfg(feature = "ecc_nist_p521")]
#[test]
fn test_curve_params_nist_p521() {
    test_curve_params_common(CurveId::NistP521, 521)
}

#[cfg(feature = "ecc_bp_p256_r1")]
#[test]
fn test_curve_params_bp_p256_r1() {
    test_curve_params_common(CurveId::BpP256R1, 256)
}

#[cfg(feature = "ecc_bp_p384_r1")]
#[test]
fn test_curve_params_bp_p384_r1() {
    test_curve_params_common(CurveId::BpP384R1, 384)
}

#[cfg(feature = "ecc_bp_p512_r1")]
#[test]
fn test_curve_params_bp_p512_r1() {
    test_curve_params_common(CurveId::BpP512R1, 512)
}

#[test]
fn test_curve_from_domain_parameters() {
    let curve = Curve::from_domain_parameters(TEST_TOY_CURVE).unwrap();
    assert_eq!(curve.get_curve_id(), None);
    assert_eq!(curve.get_nbits(), 16);
    assert_eq!(curve.get_cofactor(), 4);

    let mut params = TEST_TOY_CURVE;
    params.cofactor = 0;
    assert!(matches!(Curve::from_domain_parameters(params), Err(CryptoError::InvalidParams)));
    let mut params = TEST_TOY_CURVE;
    params.g_x = &[0x9c, 0x60];
    assert!(matches!(Curve::from_domain_parameters(params), Err(CryptoError::InvalidParams)));
    let mut params = TEST_TOY_CURVE;
    params.p = &[0x9c, 0x5e];
    assert!(matches!(Curve::from_domain_parameters(params), Err(CryptoError::InvalidParams)));
}
