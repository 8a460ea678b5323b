#![doc = include_str!("../README.md")]
/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

extern crate log;

pub mod constants;
pub mod errors;
pub mod hardware;
pub mod math;
pub mod projection;

/// Re-export of hifitime
pub mod time {
    pub use core::str::FromStr;
    pub use hifitime::*;
}

pub mod prelude {
    pub use crate::errors::{HardwareError, HardwareResult};
    pub use crate::hardware::{Hardware, HardwareRecord, Positioner};
    pub use crate::math::shape::Shape;
    pub use crate::math::Vector2;
    pub use crate::projection::Tile;
    pub use crate::time::*;
    pub use crate::LocId;
}

/// Fiber positioners are keyed by their focal plane location identifier.
pub type LocId = i32;
