/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use focalplane::prelude::*;

/// Octagonal keep-out of the theta arm body, in the arm frame.
pub fn theta_body(radius_mm: f64) -> Shape {
    let vertices = (0..8)
        .map(|i| {
            let ang = f64::from(i) * core::f64::consts::FRAC_PI_4;
            radius_mm * Vector2::new(ang.cos(), ang.sin())
        })
        .collect();
    Shape::new(vertices)
}

/// Rectangular keep-out of a phi arm of the provided length, in the arm
/// frame: the phi axis at the origin, the fiber tip at `(arm_mm, 0)`, with a
/// short overhang on both ends.
pub fn phi_arm(arm_mm: f64, half_width_mm: f64) -> Shape {
    Shape::rectangle(-0.3, arm_mm + 0.3, -half_width_mm, half_width_mm)
}

/// A rectangular grid of identical positioners with realistic keep-outs:
/// `nx * ny` devices pitched `pitch_mm` apart, theta and phi arms of
/// `arm_mm`, full angular ranges. Location ids count row-major from 1000,
/// all on petal 3 (whose boundary templates are not rotated).
pub fn grid_record(nx: usize, ny: usize, pitch_mm: f64, arm_mm: f64) -> HardwareRecord {
    let n = nx * ny;
    let mut record = HardwareRecord {
        time: "2025-07-15T08:00:00 UTC".to_string(),
        location: Vec::with_capacity(n),
        petal: vec![3; n],
        device: (0..n as i32).collect(),
        device_type: vec!["POS".to_string(); n],
        slitblock: vec![0; n],
        blockfiber: (0..n as i32).collect(),
        fiber: (0..n as i32).collect(),
        x_mm: Vec::with_capacity(n),
        y_mm: Vec::with_capacity(n),
        status: vec![0; n],
        theta_offset_deg: vec![0.0; n],
        theta_min_deg: vec![-180.0; n],
        theta_max_deg: vec![180.0; n],
        theta_arm_mm: vec![arm_mm; n],
        phi_offset_deg: vec![0.0; n],
        phi_min_deg: vec![-180.0; n],
        phi_max_deg: vec![180.0; n],
        phi_arm_mm: vec![arm_mm; n],
        ps_radius: vec![Vec::new(); n],
        ps_theta: vec![Vec::new(); n],
        excl_theta: vec![theta_body(2.2); n],
        excl_phi: vec![phi_arm(arm_mm, 0.8); n],
        excl_gfa: vec![Shape::default(); n],
        excl_petal: vec![Shape::default(); n],
    };
    for row in 0..ny {
        for col in 0..nx {
            record.location.push(1000 + (row * nx + col) as i32);
            record.x_mm.push(pitch_mm * col as f64);
            record.y_mm.push(pitch_mm * row as f64);
        }
    }
    record
}

/// The grid above as a built model.
pub fn grid_hardware(nx: usize, ny: usize, pitch_mm: f64, arm_mm: f64) -> Hardware {
    Hardware::new(grid_record(nx, ny, pitch_mm, arm_mm)).unwrap()
}
