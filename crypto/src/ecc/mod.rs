// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

//! Elliptic curve arithmetic on short Weierstrass curves.

pub mod curve;
pub mod point;
pub mod scalar_mul;
pub mod weierstrass;

pub use point::{AffinePoint, ProjectivePoint};
pub use weierstrass::WeierstrassCurve;
