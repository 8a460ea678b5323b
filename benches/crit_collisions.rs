use criterion::{black_box, criterion_group, criterion_main, Criterion};
use focalplane::prelude::*;

const GRID_SIDE: usize = 22;
const PITCH_MM: f64 = 10.4;
const ARM_MM: f64 = 3.0;

fn octagon(radius_mm: f64) -> Shape {
    Shape::new(
        (0..8)
            .map(|i| {
                let ang = f64::from(i) * core::f64::consts::FRAC_PI_4;
                radius_mm * Vector2::new(ang.cos(), ang.sin())
            })
            .collect(),
    )
}

fn grid_hardware() -> Hardware {
    let n = GRID_SIDE * GRID_SIDE;
    let mut record = HardwareRecord {
        time: "2025-07-15T08:00:00 UTC".to_string(),
        petal: vec![3; n],
        device: (0..n as i32).collect(),
        device_type: vec!["POS".to_string(); n],
        slitblock: vec![0; n],
        blockfiber: (0..n as i32).collect(),
        fiber: (0..n as i32).collect(),
        status: vec![0; n],
        theta_offset_deg: vec![0.0; n],
        theta_min_deg: vec![-180.0; n],
        theta_max_deg: vec![180.0; n],
        theta_arm_mm: vec![ARM_MM; n],
        phi_offset_deg: vec![0.0; n],
        phi_min_deg: vec![-180.0; n],
        phi_max_deg: vec![180.0; n],
        phi_arm_mm: vec![ARM_MM; n],
        ps_radius: vec![Vec::new(); n],
        ps_theta: vec![Vec::new(); n],
        excl_theta: vec![octagon(2.2); n],
        excl_phi: vec![Shape::rectangle(-0.3, ARM_MM + 0.3, -0.8, 0.8); n],
        excl_gfa: vec![Shape::default(); n],
        excl_petal: vec![Shape::default(); n],
        ..Default::default()
    };
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            record.location.push((row * GRID_SIDE + col) as i32);
            record.x_mm.push(PITCH_MM * col as f64);
            record.y_mm.push(PITCH_MM * row as f64);
        }
    }
    Hardware::new(record).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let hw = grid_hardware();
    let locs: Vec<LocId> = hw.device_locations().to_vec();
    // Contentious posture: every fiber near full extension, direction varying
    let targets: Vec<Vector2> = locs
        .iter()
        .enumerate()
        .map(|(i, loc)| {
            let ang = 2.39996 * i as f64;
            hw.positioner(*loc).unwrap().center_mm + 5.6 * Vector2::new(ang.cos(), ang.sin())
        })
        .collect();

    c.bench_function("check_collisions_xy 484 positioners", |b| {
        b.iter(|| black_box(hw.check_collisions_xy(&locs, &targets, 0).unwrap()))
    });

    c.bench_function("radec2xy_multi 5000 targets", |b| {
        let tile = Tile::new(150.0, 2.2, 0.0);
        let ra: Vec<f64> = (0..5000).map(|i| 150.0 + (i as f64 * 1e-4) - 0.25).collect();
        let dec: Vec<f64> = (0..5000).map(|i| 2.2 + (i as f64 * 7e-5) - 0.175).collect();
        b.iter(|| black_box(hw.radec2xy_multi(&tile, &ra, &dec, 0).unwrap()))
    });
}

criterion_group!(collisions, criterion_benchmark);
criterion_main!(collisions);
