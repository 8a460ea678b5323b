/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use core::fmt;

use nalgebra::Rotation3;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use snafu::{ensure, ResultExt};

use crate::errors::{AppliedMathSnafu, BatchShapeSnafu, HardwareResult, WorkerPoolSnafu};
use crate::hardware::Hardware;
use crate::math::{angles::between_0_360, Vector2, Vector3};

/// One telescope pointing: the sky coordinates of the plate center and the
/// in-plane field rotation. The rotation already carries the hour angle
/// correction of the planned observation time; this module treats it as a
/// single opaque angle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub theta_deg: f64,
}

impl Tile {
    pub fn new(ra_deg: f64, dec_deg: f64, theta_deg: f64) -> Self {
        Self {
            ra_deg,
            dec_deg,
            theta_deg,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Tile [RA {:.4} deg, Dec {:.4} deg, rot {:.4} deg]",
            self.ra_deg, self.dec_deg, self.theta_deg
        )
    }
}

impl Hardware {
    /// Projects one sky position onto the focal plane of the provided tile,
    /// in mm. The sign convention puts increasing RA towards -X.
    pub fn radec2xy(&self, tile: &Tile, ra_deg: f64, dec_deg: f64) -> Vector2 {
        let ra = ra_deg.to_radians();
        let dec = dec_deg.to_radians();
        let tile_theta = tile.theta_deg.to_radians();

        let sky = Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin());
        // Bring the tile center onto the +X axis: undo its RA about Z, then
        // its Dec about Y.
        let centered = Rotation3::from_axis_angle(&Vector3::y_axis(), tile.dec_deg.to_radians())
            * (Rotation3::from_axis_angle(&Vector3::z_axis(), -tile.ra_deg.to_radians()) * sky);

        // Angular separation from the field center and position angle on the plate
        let rho = centered.y.hypot(centered.z).atan2(centered.x);
        let pos_angle = centered.z.atan2(-centered.y);

        let radius_mm = self.radial_ang2dist(rho);
        let plate_angle = pos_angle + tile_theta;
        Vector2::new(
            radius_mm * plate_angle.cos(),
            radius_mm * plate_angle.sin(),
        )
    }

    /// Deprojects one focal plane position of the provided tile back to the
    /// sky, returning (RA, Dec) in degrees with RA in [0, 360).
    ///
    /// Exact inverse of [Hardware::radec2xy] on the plate; off the plate the
    /// radial inversion fails.
    pub fn xy2radec(&self, tile: &Tile, xy_mm: &Vector2) -> HardwareResult<(f64, f64)> {
        let tile_theta = tile.theta_deg.to_radians();

        let radius_mm = xy_mm.norm();
        let pos_angle = xy_mm.y.atan2(xy_mm.x) - tile_theta;
        let rho = self
            .radial_dist2ang(radius_mm)
            .context(AppliedMathSnafu {
                action: "deprojecting focal plane coordinates to the sky",
            })?;

        let centered = Vector3::new(
            rho.cos(),
            -(rho.sin() * pos_angle.cos()),
            rho.sin() * pos_angle.sin(),
        );
        // Undo the tile-centering rotations, Dec about Y then RA about Z
        let sky = Rotation3::from_axis_angle(&Vector3::z_axis(), tile.ra_deg.to_radians())
            * (Rotation3::from_axis_angle(&Vector3::y_axis(), -tile.dec_deg.to_radians())
                * centered);

        let dec_deg = sky.z.asin().to_degrees();
        let ra_deg = between_0_360(sky.y.atan2(sky.x).to_degrees());
        Ok((ra_deg, dec_deg))
    }

    /// Projects index-aligned RA and Dec arrays onto the focal plane of the
    /// provided tile. `threads` bounds the worker count, 0 meaning the
    /// platform default; output order matches input order.
    pub fn radec2xy_multi(
        &self,
        tile: &Tile,
        ra_deg: &[f64],
        dec_deg: &[f64],
        threads: usize,
    ) -> HardwareResult<Vec<Vector2>> {
        ensure!(
            ra_deg.len() == dec_deg.len(),
            BatchShapeSnafu {
                action: "batch sky to focal plane projection",
                got: dec_deg.len(),
                need: ra_deg.len(),
            }
        );
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| {
                WorkerPoolSnafu {
                    action: "batch sky to focal plane projection",
                    err: err.to_string(),
                }
                .build()
            })?;
        Ok(pool.install(|| {
            ra_deg
                .par_iter()
                .zip(dec_deg.par_iter())
                .map(|(ra, dec)| self.radec2xy(tile, *ra, *dec))
                .collect()
        }))
    }

    /// Deprojects an array of focal plane positions of the provided tile back
    /// to the sky. `threads` bounds the worker count, 0 meaning the platform
    /// default; output order matches input order.
    pub fn xy2radec_multi(
        &self,
        tile: &Tile,
        xy_mm: &[Vector2],
        threads: usize,
    ) -> HardwareResult<Vec<(f64, f64)>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| {
                WorkerPoolSnafu {
                    action: "batch focal plane to sky deprojection",
                    err: err.to_string(),
                }
                .build()
            })?;
        pool.install(|| {
            xy_mm
                .par_iter()
                .map(|xy| self.xy2radec(tile, xy))
                .collect()
        })
    }
}
