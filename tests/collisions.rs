/*
 * FOCALPLANE Toolkit
 * Copyright (C) 2021-onward Christopher Rabotin <christopher.rabotin@gmail.com> et al. (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Documentation: https://nyxspace.com/
 */

mod common;

use common::{grid_hardware, grid_record, phi_arm, theta_body};
use focalplane::prelude::*;
use rstest::*;

#[fixture]
fn grid() -> Hardware {
    grid_hardware(5, 4, 10.4, 3.0)
}

/// Two positioners, 7 mm apart, 4 mm arms, 2 mm wide phi keep-outs.
#[fixture]
fn facing_pair() -> Hardware {
    let mut record = grid_record(2, 1, 7.0, 4.0);
    record.excl_theta = vec![theta_body(2.2); 2];
    record.excl_phi = vec![phi_arm(4.0, 1.0); 2];
    Hardware::new(record).unwrap()
}

#[rstest]
fn test_baseline_retracted_is_collision_free(grid: Hardware) {
    let _ = pretty_env_logger::try_init();

    let locs: Vec<LocId> = grid.device_locations().to_vec();
    let targets: Vec<Vector2> = locs
        .iter()
        .map(|loc| grid.positioner(*loc).unwrap().center_mm)
        .collect();
    let hits = grid.check_collisions_xy(&locs, &targets, 0).unwrap();
    assert_eq!(hits.len(), locs.len());
    assert!(
        hits.iter().all(|hit| !hit),
        "fully retracted postures must not collide"
    );
}

#[rstest]
fn test_empty_keepouts_never_collide() {
    // Keep-out polygons drive the decision: with empty templates even
    // coincident targets pass the pair test, provided both are reachable.
    let mut record = grid_record(2, 1, 10.0, 3.0);
    record.excl_theta = vec![Shape::default(); 2];
    record.excl_phi = vec![Shape::default(); 2];
    let hw = Hardware::new(record).unwrap();

    assert!(!hw
        .collide_xy(1000, &Vector2::new(3.0, 0.0), 1001, &Vector2::new(7.0, 0.0))
        .unwrap());
    // Both reach (5, 0), shapes are empty, so no collision is reported
    assert!(!hw
        .collide_xy(1000, &Vector2::new(5.0, 0.0), 1001, &Vector2::new(5.0, 0.0))
        .unwrap());
    // An unreachable target still collides regardless of shapes
    assert!(hw
        .collide_xy(1000, &Vector2::new(6.5, 0.0), 1001, &Vector2::new(5.0, 0.0))
        .unwrap());
}

#[rstest]
fn test_facing_arms_collide_and_clear(facing_pair: Hardware) {
    // Reaching towards each other with overlapping keep-outs
    assert!(facing_pair
        .collide_xy(1000, &Vector2::new(4.0, 0.0), 1001, &Vector2::new(3.0, 0.0))
        .unwrap());
    // Pulled back onto their own halves
    assert!(!facing_pair
        .collide_xy(1000, &Vector2::new(2.0, 0.0), 1001, &Vector2::new(5.0, 0.0))
        .unwrap());
    // Same postures through the joint angle entry point
    let pos_a = facing_pair.positioner(1000).unwrap();
    let pos_b = facing_pair.positioner(1001).unwrap();
    let (theta_a, phi_a) = pos_a.xy_to_thetaphi(&Vector2::new(4.0, 0.0)).unwrap();
    let (theta_b, phi_b) = pos_b.xy_to_thetaphi(&Vector2::new(3.0, 0.0)).unwrap();
    assert!(facing_pair
        .collide_thetaphi(1000, theta_a, phi_a, 1001, theta_b, phi_b)
        .unwrap());
}

#[rstest]
fn test_midpoint_batch_marks_both(facing_pair: Hardware) {
    let locs = [1000, 1001];
    let midpoint = Vector2::new(3.5, 0.0);
    let targets = [midpoint, midpoint];
    let hits = facing_pair.check_collisions_xy(&locs, &targets, 0).unwrap();
    assert_eq!(hits, vec![true, true]);
    // Idempotent across calls
    let again = facing_pair.check_collisions_xy(&locs, &targets, 0).unwrap();
    assert_eq!(hits, again);
}

#[rstest]
fn test_singleton_batch_only_tests_pairs(facing_pair: Hardware) {
    // This target is out of reach: the placement fails...
    let bad_target = Vector2::new(20.0, 0.0);
    assert!(facing_pair.position_xy_bad(1000, &bad_target).unwrap());
    // ...but a batch of one has no neighbor pairs, so nothing is flagged.
    // Edge checks are a separate API, never folded into the pair batch.
    let hits = facing_pair
        .check_collisions_xy(&[1000], &[bad_target], 0)
        .unwrap();
    assert_eq!(hits, vec![false]);
}

#[rstest]
fn test_batch_matches_pairwise_oracle(grid: Hardware) {
    // Deterministic spread of reachable targets, some of which clash
    let locs: Vec<LocId> = grid.device_locations().to_vec();
    let targets: Vec<Vector2> = locs
        .iter()
        .enumerate()
        .map(|(i, loc)| {
            let ang = 0.7 * i as f64;
            grid.positioner(*loc).unwrap().center_mm
                + 5.5 * Vector2::new(ang.cos(), ang.sin())
        })
        .collect();

    let hits = grid.check_collisions_xy(&locs, &targets, 0).unwrap();

    // Oracle: a location is flagged iff one of its in-batch neighbor pairs
    // collides under the pairwise primitive.
    let mut expected = vec![false; locs.len()];
    for (i, loc) in locs.iter().enumerate() {
        for (j, other) in locs.iter().enumerate().skip(i + 1) {
            if !grid.neighbors(*loc).unwrap().contains(other) {
                continue;
            }
            if grid
                .collide_xy(*loc, &targets[i], *other, &targets[j])
                .unwrap()
            {
                expected[i] = true;
                expected[j] = true;
            }
        }
    }
    assert_eq!(hits, expected);

    // Worker count must not change the outcome
    for threads in [1, 2, 7] {
        assert_eq!(
            grid.check_collisions_xy(&locs, &targets, threads).unwrap(),
            expected
        );
    }
}

#[rstest]
fn test_batch_thetaphi_matches_batch_xy(grid: Hardware) {
    let locs: Vec<LocId> = grid.device_locations().to_vec();
    let targets: Vec<Vector2> = locs
        .iter()
        .enumerate()
        .map(|(i, loc)| {
            let ang = 1.3 * i as f64;
            grid.positioner(*loc).unwrap().center_mm
                + 5.2 * Vector2::new(ang.cos(), ang.sin())
        })
        .collect();
    let mut theta = Vec::with_capacity(locs.len());
    let mut phi = Vec::with_capacity(locs.len());
    for (loc, target) in locs.iter().zip(&targets) {
        let (t, p) = grid
            .positioner(*loc)
            .unwrap()
            .xy_to_thetaphi(target)
            .unwrap();
        theta.push(t);
        phi.push(p);
    }
    assert_eq!(
        grid.check_collisions_xy(&locs, &targets, 0).unwrap(),
        grid.check_collisions_thetaphi(&locs, &theta, &phi, 0).unwrap()
    );
}

#[rstest]
fn test_edge_collisions() {
    let mut record = grid_record(1, 1, 10.0, 4.0);
    // Petal 3 templates are not rotated, so this boundary sits exactly at
    // x in [4, 5] next to the single positioner at the origin.
    record.excl_petal = vec![Shape::rectangle(4.0, 5.0, -2.0, 2.0)];
    let hw = Hardware::new(record).unwrap();

    // Reaching through the boundary band
    assert!(hw.collide_xy_edges(1000, &Vector2::new(5.8, 0.0)).unwrap());
    // Reaching the other way
    assert!(!hw.collide_xy_edges(1000, &Vector2::new(-5.8, 0.0)).unwrap());
    // Unreachable counts as a collision
    assert!(hw.collide_xy_edges(1000, &Vector2::new(9.0, 0.0)).unwrap());

    // Same through the joint angle entry point
    let (theta, phi) = hw
        .positioner(1000)
        .unwrap()
        .xy_to_thetaphi(&Vector2::new(5.8, 0.0))
        .unwrap();
    assert!(hw.collide_thetaphi_edges(1000, theta, phi).unwrap());
}

#[rstest]
fn test_restricted_theta_range_makes_center_bad() {
    let mut record = grid_record(1, 1, 10.0, 3.0);
    // Equal arms reach the center only in the fully retracted posture, which
    // demands theta = 0 here; this range does not contain it.
    record.theta_min_deg = vec![10.0];
    record.theta_max_deg = vec![180.0];
    let hw = Hardware::new(record).unwrap();
    assert!(hw.position_xy_bad(1000, &Vector2::zeros()).unwrap());
    // A target in the allowed sector is fine
    assert!(!hw.position_xy_bad(1000, &Vector2::new(0.0, 5.0)).unwrap());
}

#[rstest]
fn test_batch_input_validation(grid: Hardware) {
    let err = grid
        .check_collisions_xy(&[1000, 1001], &[Vector2::zeros()], 0)
        .unwrap_err();
    assert!(matches!(err, HardwareError::BatchShape { .. }));

    let err = grid
        .check_collisions_xy(&[424242], &[Vector2::zeros()], 0)
        .unwrap_err();
    assert_eq!(err, HardwareError::UnknownLocation { loc: 424242 });

    let err = grid
        .check_collisions_thetaphi(&[1000], &[0.0, 0.0], &[0.0], 0)
        .unwrap_err();
    assert!(matches!(err, HardwareError::BatchShape { .. }));
}
