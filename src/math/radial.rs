/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use crate::errors::MathError;

/// Forward finite difference step of the inverse plate-scale iteration, in radians.
const INV_STEP_RAD: f64 = 1e-4;
/// Convergence criterion of the inverse plate-scale iteration, in millimeters.
const INV_TOL_MM: f64 = 1e-7;
/// Iteration cap. The iteration converges well under this cap everywhere on
/// the plate; hitting it means the requested radius is outside the supported domain.
const INV_MAX_ITER: usize = 100;

/// Evaluates the radial plate-scale polynomial, mapping an angle off the
/// optical axis (radians) to a focal plane radius (mm). Horner form of
/// `p0 t^4 + p1 t^3 + p2 t^2 + p3 t`, monotonically increasing over the plate.
pub fn ang2dist(coeff: &[f64; 4], theta_rad: f64) -> f64 {
    let t = theta_rad;
    t * (((coeff[0] * t + coeff[1]) * t + coeff[2]) * t + coeff[3])
}

/// Numerically inverts [ang2dist]: given a focal plane radius in mm, returns
/// the angle off the optical axis in radians.
///
/// Newton iteration seeded at 0.01 rad with a forward finite difference
/// derivative. Only radii on the plate are supported; outside that domain the
/// iteration cap reports [MathError::MaxIterationsReached] rather than spinning.
pub fn dist2ang(coeff: &[f64; 4], dist_mm: f64) -> Result<f64, MathError> {
    let mut theta_rad: f64 = 0.01;
    for _ in 0..INV_MAX_ITER {
        let delta_mm = ang2dist(coeff, theta_rad) - dist_mm;
        if delta_mm.abs() < INV_TOL_MM {
            return Ok(theta_rad);
        }
        let slope = (ang2dist(coeff, theta_rad + INV_STEP_RAD) - ang2dist(coeff, theta_rad))
            / INV_STEP_RAD;
        if slope.abs() < f64::EPSILON {
            return Err(MathError::DivisionByZero {
                action: "inverting the radial plate-scale polynomial",
            });
        }
        theta_rad -= delta_mm / slope;
    }
    Err(MathError::MaxIterationsReached {
        iter: INV_MAX_ITER,
        action: "inverting the radial plate-scale polynomial",
    })
}
