/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use core::f64::consts::PI;

use crate::constants::{state, PATROL_BUFFER_MM};
use crate::math::angles::fold_into_range;
use crate::math::shape::Shape;
use crate::math::Vector2;
use crate::LocId;

/// One rotor of a two-arm positioner: its length and its mechanical angle
/// range. The range is stored relative to the zero offset; [Arm::min_rad] and
/// [Arm::max_rad] are the absolute bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Arm {
    /// Arm length in mm.
    pub length_mm: f64,
    /// Zero angle of the rotor in the focal plane frame, in radians.
    pub offset_rad: f64,
    /// Minimum angle relative to the offset, in radians.
    pub rel_min_rad: f64,
    /// Maximum angle relative to the offset, in radians.
    pub rel_max_rad: f64,
}

impl Arm {
    /// Lower absolute angle bound of this rotor.
    pub fn min_rad(&self) -> f64 {
        self.offset_rad + self.rel_min_rad
    }

    /// Upper absolute angle bound of this rotor.
    pub fn max_rad(&self) -> f64 {
        self.offset_rad + self.rel_max_rad
    }

    /// Folds the provided absolute angle into the mechanical range of this
    /// rotor by at most one full turn, or reports it unreachable.
    pub fn fold_into_range(&self, ang_rad: f64) -> Option<f64> {
        fold_into_range(ang_rad, self.min_rad(), self.max_rad())
    }
}

/// A single robotic fiber positioner: its identity within the focal plane,
/// its two-arm geometry, and the keep-out polygons of its moving parts and of
/// the fixed boundaries it must respect. Immutable once the model is built.
#[derive(Clone, Debug)]
pub struct Positioner {
    pub location: LocId,
    pub petal: i32,
    pub device: i32,
    pub fiber: i32,
    pub slitblock: i32,
    pub blockfiber: i32,
    pub device_type: String,
    /// Nominal center on the focal plane, in mm.
    pub center_mm: Vector2,
    /// State bitmask, `state::OK` when fully operational.
    pub status: i32,
    pub theta: Arm,
    pub phi: Arm,
    /// Polygon scan radii of the keep-out metrology, informational.
    pub ps_radius: Vec<f64>,
    /// Polygon scan angles of the keep-out metrology, informational.
    pub ps_theta: Vec<f64>,
    /// Keep-out of the theta arm body, in the arm frame (centered, theta = 0).
    pub excl_theta: Shape,
    /// Keep-out of the phi arm, in the arm frame (phi axis at the origin).
    pub excl_phi: Shape,
    /// Keep-out of the GFA camera of this petal, in focal plane coordinates.
    pub excl_gfa: Shape,
    /// Keep-out of the petal edge, in focal plane coordinates.
    pub excl_petal: Shape,
}

impl Positioner {
    /// Returns whether every state bit of this device is clear.
    pub fn state_ok(&self) -> bool {
        self.status == state::OK
    }

    /// Reachable radial annulus about the center: `|L_theta - L_phi|` to
    /// `L_theta + L_phi` shrunk by the patrol buffer on the outer edge.
    pub fn patrol_range(&self) -> (f64, f64) {
        let inner = (self.theta.length_mm - self.phi.length_mm).abs();
        let outer = self.theta.length_mm + self.phi.length_mm - PATROL_BUFFER_MM;
        (inner, outer)
    }

    /// Solves the inverse kinematics for the fiber to land on `xy_mm`,
    /// returning the absolute (theta, phi) joint angles folded into the
    /// mechanical ranges, or `None` when the target is unreachable.
    ///
    /// The two-arm geometry admits two elbow branches; the hardware only
    /// supports one of them within its angle limits, so this always takes the
    /// same branch and lets the range fold reject what the rotors cannot do.
    pub fn xy_to_thetaphi(&self, xy_mm: &Vector2) -> Option<(f64, f64)> {
        let arm_t = self.theta.length_mm;
        let arm_p = self.phi.length_mm;
        let offset = xy_mm - self.center_mm;
        let dist_sq = offset.norm_squared();
        let extended_sq = (arm_t + arm_p) * (arm_t + arm_p);
        let retracted_sq = (arm_t - arm_p) * (arm_t - arm_p);
        let eps = f64::from(f32::EPSILON);

        let (theta, phi) = if (dist_sq - extended_sq).abs() <= eps {
            // Fully extended, both arms along the target direction
            (offset.y.atan2(offset.x), 0.0)
        } else if (dist_sq - retracted_sq).abs() <= eps {
            // Fully retracted, phi arm folded back over theta
            (offset.y.atan2(offset.x), PI)
        } else if dist_sq > extended_sq || dist_sq < retracted_sq {
            // Outside the patrol annulus
            return None;
        } else {
            let dist = dist_sq.sqrt();
            let opening =
                ((arm_t * arm_t + arm_p * arm_p - dist_sq) / (2.0 * arm_t * arm_p)).acos();
            let to_target =
                ((arm_t * arm_t + dist_sq - arm_p * arm_p) / (2.0 * arm_t * dist)).acos();
            (offset.y.atan2(offset.x) - to_target, PI - opening)
        };

        let theta = self.theta.fold_into_range(theta)?;
        let phi = self.phi.fold_into_range(phi)?;
        Some((theta, phi))
    }

    /// Forward kinematics: the focal plane position of the fiber tip for the
    /// provided absolute joint angles, or `None` when either angle cannot be
    /// folded into its mechanical range.
    pub fn thetaphi_to_xy(&self, theta_rad: f64, phi_rad: f64) -> Option<Vector2> {
        let theta = self.theta.fold_into_range(theta_rad)?;
        let phi = self.phi.fold_into_range(phi_rad)?;
        let elbow = self.center_mm
            + self.theta.length_mm * Vector2::new(theta.cos(), theta.sin());
        let reach = theta + phi;
        Some(elbow + self.phi.length_mm * Vector2::new(reach.cos(), reach.sin()))
    }

    /// Places the theta and phi keep-out polygons of this positioner for the
    /// provided absolute joint angles, or `None` when either angle is out of
    /// range. The returned shapes are working copies in focal plane
    /// coordinates; the stored templates are never mutated.
    pub fn place_thetaphi(&self, theta_rad: f64, phi_rad: f64) -> Option<(Shape, Shape)> {
        let theta = self.theta.fold_into_range(theta_rad)?;
        let phi = self.phi.fold_into_range(phi_rad)?;

        let mut shape_theta = self.excl_theta.clone();
        let mut shape_phi = self.excl_phi.clone();

        // Extend the phi template to the fully open posture, rotate the whole
        // assembly to theta, articulate phi about its own axis, then move the
        // assembly onto the positioner center.
        shape_phi.translate(&Vector2::new(self.theta.length_mm, 0.0));
        let trig_theta = (theta.cos(), theta.sin());
        shape_theta.rotate_origin(trig_theta);
        shape_phi.rotate_origin(trig_theta);
        shape_phi.rotate_pivot((phi.cos(), phi.sin()));
        shape_theta.translate(&self.center_mm);
        shape_phi.translate(&self.center_mm);

        Some((shape_theta, shape_phi))
    }

    /// Places the keep-out polygons for the fiber to land on `xy_mm`, or
    /// `None` when the target is unreachable.
    pub fn place_xy(&self, xy_mm: &Vector2) -> Option<(Shape, Shape)> {
        let (theta, phi) = self.xy_to_thetaphi(xy_mm)?;
        self.place_thetaphi(theta, phi)
    }
}
