/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

use std::collections::{BTreeMap, HashMap};

use hifitime::Epoch;
use log::{debug, error, warn};
use snafu::ensure;

use crate::constants::{
    state, FOCALPLANE_RADIUS_DEG, NEIGHBOR_RADIUS_MM, NFIBER_PETAL, PATROL_BUFFER_MM,
    PETAL_WEDGE_DEG, RADIAL_ANG2DIST_COEFF,
};
use crate::errors::{
    ColumnLengthSnafu, DuplicateLocationSnafu, HardwareResult, MathError, UnknownLocationSnafu,
    UnknownStateBitsSnafu,
};
use crate::math::{angles::between_0_360, dist, radial, Vector2};
use crate::LocId;

mod collision;
mod positioner;
mod record;

pub use positioner::{Arm, Positioner};
pub use record::HardwareRecord;

/// The focal plane model: every positioner of the instrument, its mechanical
/// snapshot, and the neighbor graph bounding which pairs can interfere.
///
/// Built once per planning run by [Hardware::new], then read-only: it is
/// freely shareable across worker threads, and every keep-out placement works
/// on clones of the stored templates.
#[derive(Clone, Debug)]
pub struct Hardware {
    /// Time stamp string identifying the mechanical snapshot.
    pub time: String,
    /// The snapshot time stamp parsed into an epoch, when it is well formed.
    pub epoch: Option<Epoch>,
    /// Angular radius of the focal plane on the sky, in degrees.
    pub focalplane_radius_deg: f64,
    /// Science fibers per petal.
    pub nfiber_petal: usize,
    /// Center distance under which two positioners are neighbors, in mm.
    pub neighbor_radius_mm: f64,
    /// Outer patrol radius shrink, in mm.
    pub patrol_buffer_mm: f64,
    ang2dist_coeff: [f64; 4],
    locations: Vec<LocId>,
    petal_locations: BTreeMap<i32, Vec<LocId>>,
    neighbors: HashMap<LocId, Vec<LocId>>,
    devices: HashMap<LocId, Positioner>,
}

impl Hardware {
    /// Builds and validates the focal plane model from the loader's record.
    ///
    /// Fails without partially initializing anything if any column length
    /// disagrees with the location column, if a location id repeats, or if a
    /// status word carries state bits the model does not know about.
    pub fn new(record: HardwareRecord) -> HardwareResult<Self> {
        let nloc = record.location.len();

        macro_rules! check_column {
            ($field:ident) => {
                if record.$field.len() != nloc {
                    error!(
                        "[hardware] column {} has {} entries for {} locations",
                        stringify!($field),
                        record.$field.len(),
                        nloc
                    );
                }
                ensure!(
                    record.$field.len() == nloc,
                    ColumnLengthSnafu {
                        column: stringify!($field),
                        got: record.$field.len(),
                        need: nloc,
                    }
                );
            };
        }

        check_column!(petal);
        check_column!(device);
        check_column!(device_type);
        check_column!(slitblock);
        check_column!(blockfiber);
        check_column!(fiber);
        check_column!(x_mm);
        check_column!(y_mm);
        check_column!(status);
        check_column!(theta_offset_deg);
        check_column!(theta_min_deg);
        check_column!(theta_max_deg);
        check_column!(theta_arm_mm);
        check_column!(phi_offset_deg);
        check_column!(phi_min_deg);
        check_column!(phi_max_deg);
        check_column!(phi_arm_mm);
        check_column!(ps_radius);
        check_column!(ps_theta);
        check_column!(excl_theta);
        check_column!(excl_phi);
        check_column!(excl_gfa);
        check_column!(excl_petal);

        let mut devices = HashMap::with_capacity(nloc);
        let mut petal_locations: BTreeMap<i32, Vec<LocId>> = BTreeMap::new();

        for i in 0..nloc {
            let loc = record.location[i];
            let status = record.status[i];
            if status & !state::KNOWN_MASK != 0 {
                error!("[hardware] location {loc} has unexpected state bits {status:#x}");
            }
            ensure!(
                status & !state::KNOWN_MASK == 0,
                UnknownStateBitsSnafu { loc, bits: status }
            );

            // Rotate the canonical GFA and petal boundary templates about the
            // plate center into this petal's wedge.
            let petal = record.petal[i];
            let wedge_deg = between_0_360(f64::from(7 + petal) * PETAL_WEDGE_DEG);
            let wedge_rad = wedge_deg.to_radians();
            let trig_wedge = (wedge_rad.cos(), wedge_rad.sin());
            let mut excl_gfa = record.excl_gfa[i].clone();
            let mut excl_petal = record.excl_petal[i].clone();
            excl_gfa.rotate_origin(trig_wedge);
            excl_petal.rotate_origin(trig_wedge);

            let positioner = Positioner {
                location: loc,
                petal,
                device: record.device[i],
                fiber: record.fiber[i],
                slitblock: record.slitblock[i],
                blockfiber: record.blockfiber[i],
                device_type: record.device_type[i].clone(),
                center_mm: Vector2::new(record.x_mm[i], record.y_mm[i]),
                status,
                theta: Arm {
                    length_mm: record.theta_arm_mm[i],
                    offset_rad: record.theta_offset_deg[i].to_radians(),
                    rel_min_rad: record.theta_min_deg[i].to_radians(),
                    rel_max_rad: record.theta_max_deg[i].to_radians(),
                },
                phi: Arm {
                    length_mm: record.phi_arm_mm[i],
                    offset_rad: record.phi_offset_deg[i].to_radians(),
                    rel_min_rad: record.phi_min_deg[i].to_radians(),
                    rel_max_rad: record.phi_max_deg[i].to_radians(),
                },
                ps_radius: record.ps_radius[i].clone(),
                ps_theta: record.ps_theta[i].clone(),
                excl_theta: record.excl_theta[i].clone(),
                excl_phi: record.excl_phi[i].clone(),
                excl_gfa,
                excl_petal,
            };

            if devices.insert(loc, positioner).is_some() {
                error!("[hardware] location {loc} repeats in the device table");
                return DuplicateLocationSnafu { loc }.fail();
            }
            petal_locations.entry(petal).or_default().push(loc);
        }

        let mut locations: Vec<LocId> = devices.keys().copied().collect();
        locations.sort_unstable();
        for locs in petal_locations.values_mut() {
            locs.sort_unstable();
        }

        // All-pairs scan: N is a few thousand, and this happens once per run.
        let mut neighbors: HashMap<LocId, Vec<LocId>> =
            locations.iter().map(|loc| (*loc, Vec::new())).collect();
        for (i, loc_a) in locations.iter().enumerate() {
            for loc_b in locations.iter().skip(i + 1) {
                let center_a = devices[loc_a].center_mm;
                let center_b = devices[loc_b].center_mm;
                if dist(&center_a, &center_b) <= NEIGHBOR_RADIUS_MM {
                    neighbors.get_mut(loc_a).unwrap().push(*loc_b);
                    neighbors.get_mut(loc_b).unwrap().push(*loc_a);
                }
            }
        }
        for nbs in neighbors.values_mut() {
            nbs.sort_unstable();
        }

        let epoch = match record.time.parse::<Epoch>() {
            Ok(epoch) => Some(epoch),
            Err(err) => {
                warn!(
                    "[hardware] snapshot time {:?} does not parse as an epoch: {err}",
                    record.time
                );
                None
            }
        };

        debug!(
            "[hardware] loaded focal plane snapshot {:?}: {} locations on {} petals",
            record.time,
            locations.len(),
            petal_locations.len()
        );

        Ok(Self {
            time: record.time,
            epoch,
            focalplane_radius_deg: FOCALPLANE_RADIUS_DEG,
            nfiber_petal: NFIBER_PETAL,
            neighbor_radius_mm: NEIGHBOR_RADIUS_MM,
            patrol_buffer_mm: PATROL_BUFFER_MM,
            ang2dist_coeff: RADIAL_ANG2DIST_COEFF,
            locations,
            petal_locations,
            neighbors,
            devices,
        })
    }

    /// All location ids of the model, ascending.
    pub fn device_locations(&self) -> &[LocId] {
        &self.locations
    }

    /// Location ids hosted by the provided petal, ascending.
    pub fn petal_locations(&self, petal: i32) -> &[LocId] {
        match self.petal_locations.get(&petal) {
            Some(locs) => locs,
            None => &[],
        }
    }

    /// The positioner at the provided location.
    pub fn positioner(&self, loc: LocId) -> HardwareResult<&Positioner> {
        self.devices
            .get(&loc)
            .ok_or_else(|| UnknownLocationSnafu { loc }.build())
    }

    /// Locations whose centers are within the neighbor radius of this one.
    /// The relation is symmetric and never includes the location itself.
    pub fn neighbors(&self, loc: LocId) -> HardwareResult<&[LocId]> {
        self.neighbors
            .get(&loc)
            .map(Vec::as_slice)
            .ok_or_else(|| UnknownLocationSnafu { loc }.build())
    }

    /// Returns whether the device at this location is fully operational.
    pub fn state_ok(&self, loc: LocId) -> HardwareResult<bool> {
        Ok(self.positioner(loc)?.state_ok())
    }

    /// Reachable radial annulus of the device at this location, buffered on
    /// the outer edge.
    pub fn patrol_range(&self, loc: LocId) -> HardwareResult<(f64, f64)> {
        Ok(self.positioner(loc)?.patrol_range())
    }

    /// Radial plate scale: angle off the optical axis (radians) to focal
    /// plane radius (mm).
    pub fn radial_ang2dist(&self, theta_rad: f64) -> f64 {
        radial::ang2dist(&self.ang2dist_coeff, theta_rad)
    }

    /// Inverse radial plate scale: focal plane radius (mm) to angle off the
    /// optical axis (radians). Only valid on the plate.
    pub fn radial_dist2ang(&self, dist_mm: f64) -> Result<f64, MathError> {
        radial::dist2ang(&self.ang2dist_coeff, dist_mm)
    }
}
