/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::math::shape::Shape;
use crate::LocId;

/// The raw, index-aligned per-location columns a focal plane model is built
/// from, as handed over by the external loader. All angle columns are in
/// degrees (the survey convention for the upstream tables) and are converted
/// to radians on ingest; arm lengths and centers are in millimeters.
///
/// [crate::hardware::Hardware::new] consumes this record and validates it as
/// a whole: the model is never partially initialized.
#[derive(Clone, Debug, Default)]
pub struct HardwareRecord {
    /// Time stamp string identifying the mechanical snapshot this model describes.
    pub time: String,
    /// Location id of each device.
    pub location: Vec<LocId>,
    /// Petal index hosting each device.
    pub petal: Vec<i32>,
    /// Device id within its petal.
    pub device: Vec<i32>,
    /// Device type ("POS", "ETC", "FIF", ...).
    pub device_type: Vec<String>,
    /// Spectrograph slit block.
    pub slitblock: Vec<i32>,
    /// Fiber index within the slit block.
    pub blockfiber: Vec<i32>,
    /// Global fiber id.
    pub fiber: Vec<i32>,
    /// Nominal center of the positioner, X, in mm.
    pub x_mm: Vec<f64>,
    /// Nominal center of the positioner, Y, in mm.
    pub y_mm: Vec<f64>,
    /// State bitmask, all bits clear when the device is fully operational.
    pub status: Vec<i32>,
    /// Theta arm zero angle, in degrees.
    pub theta_offset_deg: Vec<f64>,
    /// Theta arm minimum angle relative to the offset, in degrees.
    pub theta_min_deg: Vec<f64>,
    /// Theta arm maximum angle relative to the offset, in degrees.
    pub theta_max_deg: Vec<f64>,
    /// Theta arm length, in mm.
    pub theta_arm_mm: Vec<f64>,
    /// Phi arm zero angle, in degrees.
    pub phi_offset_deg: Vec<f64>,
    /// Phi arm minimum angle relative to the offset, in degrees.
    pub phi_min_deg: Vec<f64>,
    /// Phi arm maximum angle relative to the offset, in degrees.
    pub phi_max_deg: Vec<f64>,
    /// Phi arm length, in mm.
    pub phi_arm_mm: Vec<f64>,
    /// Polygon scan radii of the keep-out metrology, informational.
    pub ps_radius: Vec<Vec<f64>>,
    /// Polygon scan angles of the keep-out metrology, informational.
    pub ps_theta: Vec<Vec<f64>>,
    /// Keep-out polygon of the theta arm body, in the arm frame.
    pub excl_theta: Vec<Shape>,
    /// Keep-out polygon of the phi arm, in the arm frame.
    pub excl_phi: Vec<Shape>,
    /// Keep-out polygon of the GFA camera of this petal, in the canonical
    /// petal frame (rotated into place at construction).
    pub excl_gfa: Vec<Shape>,
    /// Keep-out polygon of the petal edge, in the canonical petal frame
    /// (rotated into place at construction).
    pub excl_petal: Vec<Shape>,
}
