/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

/// Number of science fibers hosted by each petal.
pub const NFIBER_PETAL: usize = 500;

/// Number of 36 degree petal wedges on the focal plane.
pub const N_PETAL: usize = 10;

/// Angular span of one petal wedge, in degrees.
pub const PETAL_WEDGE_DEG: f64 = 36.0;

/// Angular radius of the focal plane on the sky, in degrees.
pub const FOCALPLANE_RADIUS_DEG: f64 = 1.65;

/// Two positioners whose centers are within this distance can physically
/// interfere and are recorded as neighbors.
pub const NEIGHBOR_RADIUS_MM: f64 = 14.05;

/// Shrink applied to the outer patrol radius when filtering targets, so that
/// assignments keep a mechanical margin from the fully extended posture.
pub const PATROL_BUFFER_MM: f64 = 0.2;

/// Coefficients of the radial plate-scale polynomial mapping an angle off the
/// optical axis (radians) to a focal plane radius (mm), highest order first,
/// with a zero constant term.
pub const RADIAL_ANG2DIST_COEFF: [f64; 4] = [8.297e5, -1_750.0, 1.394e4, 0.0];

/// Positioner state bitmask values. A status of `OK` (all bits clear) means
/// the device is fully operational.
pub mod state {
    pub const OK: i32 = 0;
    pub const STUCK: i32 = 2;
    pub const BROKEN: i32 = 4;
    pub const RESTRICT: i32 = 8;

    /// Union of every state bit the model understands. Construction rejects
    /// status words carrying bits outside this mask.
    pub const KNOWN_MASK: i32 = STUCK | BROKEN | RESTRICT;
}

/// Device type strings used in the device table.
pub mod device_type {
    /// Science fiber positioner
    pub const POS: &str = "POS";
    /// Exposure time calculator (sky monitor) fiber
    pub const ETC: &str = "ETC";
    /// Fixed illuminated fiducial
    pub const FIF: &str = "FIF";
}
