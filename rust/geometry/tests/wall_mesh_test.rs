// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end wall and floor meshing scenarios.

use approx::assert_relative_eq;
use wallmesh_geometry::{
    build_floor_mesh, build_wall_mesh, wall_boundary, wall_offsets, BoundaryLoop,
    CatmullRomCurve, ControlPoint, ElementSpec, Error, FloorSpec, MeshGenerator, MeshSettings,
    Point2, WallSpec,
};

fn pts(coords: &[(f64, f64)]) -> Vec<ControlPoint> {
    coords.iter().copied().map(ControlPoint::from).collect()
}

fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b - a).perp(&(c - a))
}

fn segments_cross(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, d: &Point2<f64>) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// True when no two non-adjacent edges of the loop cross
fn is_simple(boundary: &BoundaryLoop) -> bool {
    let edges: Vec<_> = boundary.edges().collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a, b) = edges[i];
            let (c, d) = edges[j];
            if segments_cross(&a, &b, &c, &d) {
                return false;
            }
        }
    }
    true
}

#[test]
fn open_right_angle_wall_is_simple_and_bounded() {
    let settings = MeshSettings::default();
    let spec = WallSpec::new(pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]), 0.4, 3.0);

    let boundary = wall_boundary(&spec, &settings).unwrap();
    assert_eq!(boundary.len(), 6);
    assert!(is_simple(&boundary));

    let (pair, _) = wall_offsets(&spec, &settings).unwrap();
    let bound = 0.4 / 2.0 * 3.0;
    for (i, center) in spec.points.iter().enumerate() {
        let c = center.to_nalgebra();
        assert!((pair.outer[i] - c).norm() <= bound + 1e-12);
        assert!((pair.inner[i] - c).norm() <= bound + 1e-12);
    }

    // L-shaped footprint: two 0.4 wide arms, 4.2 long on the outside
    assert_relative_eq!(boundary.area(), 0.4 * 4.0 * 2.0, epsilon = 1e-9);
}

#[test]
fn closed_square_ring_area_is_perimeter_times_thickness() {
    let settings = MeshSettings::default();
    let spec = WallSpec::new(
        pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
        0.2,
        3.0,
    )
    .closed(true);

    let boundary = wall_boundary(&spec, &settings).unwrap();
    assert_relative_eq!(boundary.area(), 16.0 * 0.2, epsilon = 1e-9);

    let mesh = build_wall_mesh(&spec, &settings).unwrap();
    assert_relative_eq!(mesh.signed_volume(), 3.2 * 3.0, epsilon = 1e-3);

    let (min, max) = mesh.bounds();
    assert_relative_eq!(min.x, -0.1, epsilon = 1e-5);
    assert_relative_eq!(max.x, 4.1, epsilon = 1e-5);
    assert_relative_eq!(min.z, -0.1, epsilon = 1e-5);
    assert_relative_eq!(max.z, 4.1, epsilon = 1e-5);
}

#[test]
fn closed_wall_with_repeated_start_point_matches_plain_ring() {
    let settings = MeshSettings::default();
    let ring = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let mut repeated = ring.clone();
    repeated.push(ControlPoint::new(0.0, 0.0));

    let plain = wall_boundary(&WallSpec::new(ring, 0.2, 3.0).closed(true), &settings).unwrap();
    let looped =
        wall_boundary(&WallSpec::new(repeated, 0.2, 3.0).closed(true), &settings).unwrap();
    assert_eq!(plain, looped);
}

#[test]
fn curved_wall_offsets_advance_along_the_curve() {
    let settings = MeshSettings::default();
    let control = pts(&[(0.0, 0.0), (4.0, 1.0), (8.0, 0.0)]);
    let spec = WallSpec::new(control.clone(), 0.2, 3.0).with_tension(0.5);

    let (pair, closed) = wall_offsets(&spec, &settings).unwrap();
    assert!(!closed);

    let centers: Vec<Point2<f64>> = control.iter().map(|p| p.to_nalgebra()).collect();
    let samples = CatmullRomCurve::new(&centers, false, 0.5).sample(centers.len() * 12);
    assert_eq!(samples.len(), pair.len());

    for i in 0..samples.len() - 1 {
        let forward = samples[i + 1] - samples[i];
        let step = forward.norm();
        assert!(step > 0.0 && step < 0.5, "center step {} out of range", step);

        let outer_step = pair.outer[i + 1] - pair.outer[i];
        let inner_step = pair.inner[i + 1] - pair.inner[i];
        assert!(outer_step.dot(&forward) > 0.0, "outer side backtracks at {}", i);
        assert!(inner_step.dot(&forward) > 0.0, "inner side backtracks at {}", i);
        // Offsets on a gentle curve stay close to the centerline spacing
        assert!(outer_step.norm() < step * 1.5);
        assert!(inner_step.norm() < step * 1.5);
    }

    let boundary = wall_boundary(&spec, &settings).unwrap();
    assert!(is_simple(&boundary));
}

#[test]
fn curved_closed_wall_builds_a_ring() {
    let settings = MeshSettings::default();
    let spec = WallSpec::new(
        pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
        0.2,
        2.5,
    )
    .with_tension(0.5)
    .closed(true);

    let boundary = wall_boundary(&spec, &settings).unwrap();
    assert_eq!(boundary.seams.len(), 2);
    assert_eq!(boundary.len(), 2 * 48 + 2);

    let mesh = build_wall_mesh(&spec, &settings).unwrap();
    let (min, max) = mesh.bounds();
    assert_relative_eq!(min.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(max.y, 2.5, epsilon = 1e-5);
    assert_relative_eq!(mesh.signed_volume(), boundary.area() * 2.5, epsilon = 1e-3);
}

#[test]
fn identical_specs_give_identical_meshes() {
    let settings = MeshSettings::default();
    let straight = WallSpec::new(pts(&[(0.0, 0.0), (3.0, 1.0), (5.0, -2.0)]), 0.3, 2.7);
    let curved = straight.clone().with_tension(0.35);

    assert_eq!(
        build_wall_mesh(&straight, &settings).unwrap(),
        build_wall_mesh(&straight.clone(), &settings).unwrap()
    );
    assert_eq!(
        build_wall_mesh(&curved, &settings).unwrap(),
        build_wall_mesh(&curved.clone(), &settings).unwrap()
    );
}

#[test]
fn too_few_points_give_no_geometry() {
    let generator = MeshGenerator::default();
    let settings = MeshSettings::default();

    for points in [Vec::new(), pts(&[(1.0, 1.0)])] {
        let spec = WallSpec::new(points.clone(), 0.2, 3.0);
        assert!(generator.wall_mesh(&spec).is_none());
        assert!(generator.wall_mesh(&spec.clone().with_tension(0.5)).is_none());
        assert_eq!(
            build_wall_mesh(&spec, &settings),
            Err(Error::InsufficientPoints {
                required: 2,
                actual: points.len()
            })
        );

        let floor = FloorSpec::new(points, 0.2);
        assert!(generator.floor_mesh(&floor).is_none());
    }
}

#[test]
fn straight_two_point_wall_is_a_box() {
    let spec = WallSpec {
        points: pts(&[(0.0, 0.0), (2.0, 0.0)]),
        thickness: 0.2,
        height: 3.0,
        tension: 0.0,
        closed: false,
    };
    let mesh = build_wall_mesh(&spec, &MeshSettings::default()).unwrap();

    // Two 4-vertex caps and four side quads
    assert_eq!(mesh.vertex_count(), 8 + 16);
    assert_eq!(mesh.triangle_count(), 4 + 8);

    let (min, max) = mesh.bounds();
    assert_relative_eq!(min.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(max.x, 2.0, epsilon = 1e-5);
    assert_relative_eq!(min.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(max.y, 3.0, epsilon = 1e-5);
    assert_relative_eq!(min.z, -0.1, epsilon = 1e-5);
    assert_relative_eq!(max.z, 0.1, epsilon = 1e-5);
    assert_relative_eq!(mesh.signed_volume(), 2.0 * 0.2 * 3.0, epsilon = 1e-4);

    // Every normal is unit length and axis aligned
    for n in mesh.normals.chunks_exact(3) {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert_relative_eq!(len, 1.0, epsilon = 1e-5);
    }
}

#[test]
fn ground_axes_are_not_mirrored() {
    // A wall drawn along +y on the ground must land along +z in the world
    let spec = WallSpec::new(pts(&[(0.0, 0.0), (0.0, 2.0)]), 0.2, 1.0);
    let mesh = build_wall_mesh(&spec, &MeshSettings::default()).unwrap();
    let (min, max) = mesh.bounds();
    assert_relative_eq!(min.z, 0.0, epsilon = 1e-5);
    assert_relative_eq!(max.z, 2.0, epsilon = 1e-5);
    assert_relative_eq!(min.x, -0.1, epsilon = 1e-5);
    assert_relative_eq!(max.x, 0.1, epsilon = 1e-5);
}

#[test]
fn floor_slab_lies_flat_under_the_polygon() {
    let spec = FloorSpec::new(pts(&[(1.0, 1.0), (6.0, 1.0), (6.0, 4.0), (1.0, 4.0)]), 0.15);
    let mesh = build_floor_mesh(&spec, &MeshSettings::default()).unwrap();

    let (min, max) = mesh.bounds();
    assert_relative_eq!(min.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(max.x, 6.0, epsilon = 1e-5);
    assert_relative_eq!(min.z, 1.0, epsilon = 1e-5);
    assert_relative_eq!(max.z, 4.0, epsilon = 1e-5);
    assert_relative_eq!(max.y - min.y, 0.15, epsilon = 1e-5);
    assert_relative_eq!(mesh.signed_volume(), 15.0 * 0.15, epsilon = 1e-4);
}

#[test]
fn batch_generation_matches_sequential() {
    let generator = MeshGenerator::default();
    let specs: Vec<ElementSpec> = vec![
        WallSpec::new(pts(&[(0.0, 0.0), (2.0, 0.0)]), 0.2, 3.0).into(),
        WallSpec::new(pts(&[(0.0, 0.0), (4.0, 1.0), (8.0, 0.0)]), 0.2, 3.0)
            .with_tension(0.5)
            .into(),
        WallSpec::new(pts(&[(0.0, 0.0)]), 0.2, 3.0).into(),
        FloorSpec::new(pts(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)]), 0.1).into(),
    ];

    let batch = generator.generate_batch(&specs);
    let sequential: Vec<_> = specs.iter().map(|s| generator.generate(s)).collect();

    assert_eq!(batch.len(), 4);
    assert!(batch[2].is_none());
    assert_eq!(batch, sequential);
}

#[cfg(feature = "serde")]
#[test]
fn collaborator_json_specs_build() {
    let json = r#"[
        {"kind": "wall", "points": [{"x": 0.0, "y": 0.0}, {"x": 2.0, "y": 0.0}],
         "thickness": 0.2, "height": 3.0, "tension": 0.0, "closed": false},
        {"kind": "floor", "points": [{"x": 0.0, "y": 0.0}, {"x": 2.0, "y": 0.0}, {"x": 2.0, "y": 2.0}],
         "depth": 0.1}
    ]"#;

    let specs: Vec<ElementSpec> = serde_json::from_str(json).unwrap();
    let meshes = MeshGenerator::default().generate_batch(&specs);
    assert!(meshes.iter().all(Option::is_some));
}
