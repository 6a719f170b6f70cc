// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - sweeping boundary loops into solids

use crate::boundary::BoundaryLoop;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::triangulation::{triangulate_earcut, triangulate_polygon};
use nalgebra::{Matrix4, Point2, Point3, Rotation3, Vector3};
use std::f64::consts::FRAC_PI_2;

/// Twice the triangle area below which cap triangles are dropped
const DEGENERATE_AREA: f64 = 1e-14;

/// Placement for walls: shape-space +Z (the sweep axis) becomes world +Y
///
/// Rotates -90° about X, mapping local `(u, v, h)` to world `(u, h, -v)`.
#[inline]
pub fn wall_placement() -> Matrix4<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2).to_homogeneous()
}

/// Placement for floor slabs: same rotation, lowered so the top face sits at Y = 0
#[inline]
pub fn floor_placement(depth: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(0.0, -depth, 0.0)) * wall_placement()
}

/// Extrude a boundary loop along local +Z from 0 to `height`
///
/// Produces a bottom cap facing -Z, a top cap facing +Z and one flat-shaded
/// quad per loop edge. Seam edges and zero-length edges get no side faces.
/// Either loop winding is accepted.
pub fn extrude_loop(
    boundary: &BoundaryLoop,
    height: f64,
    transform: Option<&Matrix4<f64>>,
) -> Result<Mesh> {
    if !(height.is_finite() && height > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "Extrusion height must be positive, got {}",
            height
        )));
    }
    if boundary.len() < 3 {
        return Err(Error::InsufficientPoints {
            required: 3,
            actual: boundary.len(),
        });
    }

    let signed_area = boundary.signed_area();
    if signed_area.abs() <= DEGENERATE_AREA {
        return Err(Error::EmptyMesh("boundary loop encloses no area".to_string()));
    }
    let winding = signed_area.signum();

    let indices = if boundary.seams.is_empty() {
        triangulate_polygon(&boundary.points)?
    } else {
        triangulate_earcut(&boundary.points)?
    };

    let n = boundary.len();
    let mut mesh = Mesh::with_capacity(n * 2 + n * 4, indices.len() * 2 + n * 6);

    create_cap(&boundary.points, &indices, 0.0, false, &mut mesh);
    create_cap(&boundary.points, &indices, height, true, &mut mesh);
    create_side_walls(boundary, height, winding, &mut mesh);

    if let Some(mat) = transform {
        apply_transform(&mut mesh, mat);
    }

    Ok(mesh)
}

/// Create a cap (top or bottom) from a triangulation
///
/// Each triangle is wound to face the cap normal, whatever order the
/// triangulator produced.
#[inline]
fn create_cap(points: &[Point2<f64>], indices: &[usize], z: f64, top: bool, mesh: &mut Mesh) {
    let base_index = mesh.vertex_count() as u32;
    let normal = if top {
        Vector3::new(0.0, 0.0, 1.0)
    } else {
        Vector3::new(0.0, 0.0, -1.0)
    };

    for point in points {
        mesh.add_vertex(Point3::new(point.x, point.y, z), normal);
    }

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (points[tri[0]], points[tri[1]], points[tri[2]]);
        let cross = (b - a).perp(&(c - a));
        if cross.abs() <= DEGENERATE_AREA {
            continue;
        }

        let i0 = base_index + tri[0] as u32;
        let i1 = base_index + tri[1] as u32;
        let i2 = base_index + tri[2] as u32;

        if (cross > 0.0) == top {
            mesh.add_triangle(i0, i1, i2);
        } else {
            mesh.add_triangle(i0, i2, i1);
        }
    }
}

/// Create side walls for a loop boundary
#[inline]
fn create_side_walls(boundary: &BoundaryLoop, height: f64, winding: f64, mesh: &mut Mesh) {
    for (i, (p0, p1)) in boundary.edges().enumerate() {
        if boundary.is_seam(i) {
            continue;
        }

        // Outward normal: right of the edge for counter-clockwise loops
        let edge = p1 - p0;
        let outward = Vector3::new(edge.y * winding, -edge.x * winding, 0.0);
        let normal = match outward.try_normalize(1e-10) {
            Some(n) => n,
            None => continue, // Skip degenerate edge (duplicate points in loop)
        };

        let idx = mesh.vertex_count() as u32;
        mesh.add_vertex(Point3::new(p0.x, p0.y, 0.0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, 0.0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, height), normal);
        mesh.add_vertex(Point3::new(p0.x, p0.y, height), normal);

        if winding > 0.0 {
            mesh.add_triangle(idx, idx + 1, idx + 2);
            mesh.add_triangle(idx, idx + 2, idx + 3);
        } else {
            mesh.add_triangle(idx, idx + 2, idx + 1);
            mesh.add_triangle(idx, idx + 3, idx + 2);
        }
    }
}

/// Apply transformation matrix to mesh
#[inline]
pub fn apply_transform(mesh: &mut Mesh, transform: &Matrix4<f64>) {
    mesh.positions.chunks_exact_mut(3).for_each(|chunk| {
        let point = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        let transformed = transform.transform_point(&point);
        chunk[0] = transformed.x as f32;
        chunk[1] = transformed.y as f32;
        chunk[2] = transformed.z as f32;
    });

    // Transform normals (use inverse transpose for correct normal transformation)
    let normal_matrix = transform.try_inverse().unwrap_or(*transform).transpose();

    mesh.normals.chunks_exact_mut(3).for_each(|chunk| {
        let normal = Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
        let transformed = (normal_matrix * normal.to_homogeneous()).xyz();
        let transformed = transformed.try_normalize(1e-12).unwrap_or(transformed);
        chunk[0] = transformed.x as f32;
        chunk[1] = transformed.y as f32;
        chunk[2] = transformed.z as f32;
    });
}
