/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use snafu::ensure;

use super::Hardware;
use crate::errors::{BatchShapeSnafu, HardwareResult, WorkerPoolSnafu};
use crate::math::shape::Shape;
use crate::math::Vector2;
use crate::LocId;

/// Pair test between two placed positioners: the phi arms against each other,
/// and each phi arm against the other theta body. Theta bodies are never
/// tested against each other; their swept volumes cannot meet by construction.
fn pair_hit(placed_a: &(Shape, Shape), placed_b: &(Shape, Shape)) -> bool {
    let (theta_a, phi_a) = placed_a;
    let (theta_b, phi_b) = placed_b;
    phi_a.intersects(phi_b) || theta_a.intersects(phi_b) || theta_b.intersects(phi_a)
}

impl Hardware {
    /// Returns whether the kinematics alone make `xy_mm` infeasible for this
    /// location: out of the patrol annulus, or joint angles out of range.
    pub fn position_xy_bad(&self, loc: LocId, xy_mm: &Vector2) -> HardwareResult<bool> {
        Ok(self.positioner(loc)?.xy_to_thetaphi(xy_mm).is_none())
    }

    /// Places the theta and phi keep-outs of this location for the fiber to
    /// land on `xy_mm`. `Ok(None)` means the target is unreachable.
    pub fn loc_position_xy(
        &self,
        loc: LocId,
        xy_mm: &Vector2,
    ) -> HardwareResult<Option<(Shape, Shape)>> {
        Ok(self.positioner(loc)?.place_xy(xy_mm))
    }

    /// Places the theta and phi keep-outs of this location for the provided
    /// absolute joint angles. `Ok(None)` means an angle is out of range.
    pub fn loc_position_thetaphi(
        &self,
        loc: LocId,
        theta_rad: f64,
        phi_rad: f64,
    ) -> HardwareResult<Option<(Shape, Shape)>> {
        Ok(self.positioner(loc)?.place_thetaphi(theta_rad, phi_rad))
    }

    /// Returns whether driving the two positioners onto their targets
    /// collides them, counting a kinematically infeasible placement of either
    /// as a collision.
    pub fn collide_xy(
        &self,
        loc_a: LocId,
        xy_a: &Vector2,
        loc_b: LocId,
        xy_b: &Vector2,
    ) -> HardwareResult<bool> {
        let placed_a = self.loc_position_xy(loc_a, xy_a)?;
        let placed_b = self.loc_position_xy(loc_b, xy_b)?;
        Ok(match (placed_a, placed_b) {
            (Some(a), Some(b)) => pair_hit(&a, &b),
            _ => true,
        })
    }

    /// [Hardware::collide_xy] with the postures given as joint angles.
    pub fn collide_thetaphi(
        &self,
        loc_a: LocId,
        theta_a: f64,
        phi_a: f64,
        loc_b: LocId,
        theta_b: f64,
        phi_b: f64,
    ) -> HardwareResult<bool> {
        let placed_a = self.loc_position_thetaphi(loc_a, theta_a, phi_a)?;
        let placed_b = self.loc_position_thetaphi(loc_b, theta_b, phi_b)?;
        Ok(match (placed_a, placed_b) {
            (Some(a), Some(b)) => pair_hit(&a, &b),
            _ => true,
        })
    }

    /// Returns whether driving this positioner onto `xy_mm` runs its phi arm
    /// into the GFA or petal boundary of its own petal, counting an
    /// infeasible placement as a collision. The theta body never reaches the
    /// boundaries and is not tested.
    pub fn collide_xy_edges(&self, loc: LocId, xy_mm: &Vector2) -> HardwareResult<bool> {
        let device = self.positioner(loc)?;
        Ok(match device.place_xy(xy_mm) {
            Some((_, phi_shape)) => {
                phi_shape.intersects(&device.excl_gfa) || phi_shape.intersects(&device.excl_petal)
            }
            None => true,
        })
    }

    /// [Hardware::collide_xy_edges] with the posture given as joint angles.
    pub fn collide_thetaphi_edges(
        &self,
        loc: LocId,
        theta_rad: f64,
        phi_rad: f64,
    ) -> HardwareResult<bool> {
        let device = self.positioner(loc)?;
        Ok(match device.place_thetaphi(theta_rad, phi_rad) {
            Some((_, phi_shape)) => {
                phi_shape.intersects(&device.excl_gfa) || phi_shape.intersects(&device.excl_petal)
            }
            None => true,
        })
    }

    /// Batch pair-collision check: drives every listed positioner onto its
    /// target and flags, for each one, whether it is part of at least one
    /// colliding neighbor pair. A pair collides when either placement is
    /// kinematically infeasible or any keep-out pair test fires.
    ///
    /// Only pairs drawn from the neighbor graph and restricted to the input
    /// set are tested: a positioner with no in-batch neighbor is never
    /// flagged, and boundary collisions are the separate
    /// [Hardware::collide_xy_edges] check.
    ///
    /// `threads` bounds the worker count, 0 meaning the platform default. The
    /// output is index-aligned with the input and idempotent across calls.
    pub fn check_collisions_xy(
        &self,
        locs: &[LocId],
        xy_mm: &[Vector2],
        threads: usize,
    ) -> HardwareResult<Vec<bool>> {
        ensure!(
            locs.len() == xy_mm.len(),
            BatchShapeSnafu {
                action: "batch collision check on targets",
                got: xy_mm.len(),
                need: locs.len(),
            }
        );
        self.check_collisions(locs, |i, device| device.place_xy(&xy_mm[i]), threads)
    }

    /// [Hardware::check_collisions_xy] with the postures given as joint angles.
    pub fn check_collisions_thetaphi(
        &self,
        locs: &[LocId],
        theta_rad: &[f64],
        phi_rad: &[f64],
        threads: usize,
    ) -> HardwareResult<Vec<bool>> {
        ensure!(
            locs.len() == theta_rad.len(),
            BatchShapeSnafu {
                action: "batch collision check on theta angles",
                got: theta_rad.len(),
                need: locs.len(),
            }
        );
        ensure!(
            locs.len() == phi_rad.len(),
            BatchShapeSnafu {
                action: "batch collision check on phi angles",
                got: phi_rad.len(),
                need: locs.len(),
            }
        );
        self.check_collisions(
            locs,
            |i, device| device.place_thetaphi(theta_rad[i], phi_rad[i]),
            threads,
        )
    }

    fn check_collisions<F>(
        &self,
        locs: &[LocId],
        place: F,
        threads: usize,
    ) -> HardwareResult<Vec<bool>>
    where
        F: Fn(usize, &super::Positioner) -> Option<(Shape, Shape)> + Sync,
    {
        // Resolve every device up front so workers cannot fail.
        let mut devices = Vec::with_capacity(locs.len());
        for loc in locs {
            devices.push(self.positioner(*loc)?);
        }

        let index_of: HashMap<LocId, usize> =
            locs.iter().enumerate().map(|(i, loc)| (*loc, i)).collect();

        // Unordered neighbor pairs restricted to the input set, deduplicated
        // by (lo, hi) ordering so each pair is tested exactly once.
        let mut pairs = BTreeSet::new();
        for (i, loc) in locs.iter().enumerate() {
            for nb in self.neighbors(*loc)? {
                if let Some(&j) = index_of.get(nb) {
                    pairs.insert((i.min(j), i.max(j)));
                }
            }
        }
        let pairs: Vec<(usize, usize)> = pairs.into_iter().collect();

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| {
                WorkerPoolSnafu {
                    action: "batch collision check",
                    err: err.to_string(),
                }
                .build()
            })?;

        Ok(pool.install(|| {
            let placed: Vec<Option<(Shape, Shape)>> = devices
                .par_iter()
                .enumerate()
                .map(|(i, device)| place(i, device))
                .collect();

            let hit: Vec<AtomicBool> = (0..locs.len()).map(|_| AtomicBool::new(false)).collect();
            pairs.par_iter().for_each(|&(i, j)| {
                let colliding = match (&placed[i], &placed[j]) {
                    (Some(a), Some(b)) => pair_hit(a, b),
                    _ => true,
                };
                if colliding {
                    // Idempotent per-index writes, no ordering needed.
                    hit[i].store(true, Ordering::Relaxed);
                    hit[j].store(true, Ordering::Relaxed);
                }
            });
            hit.into_iter().map(AtomicBool::into_inner).collect()
        }))
    }
}
