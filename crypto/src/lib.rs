// SPDX-License-Identifier: Apache-2.0
// Copyright 2023-2025 SUSE LLC
// Author: Nicolai Stange <nstange@suse.de>

#![no_std]

extern crate alloc;

use cc3xx_core_utils_common as utils_common;

pub mod config;
pub mod ecc;
mod error;
pub mod hash;
pub mod pka;
pub mod rng;

pub use error::*;
