// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh generation pipeline
//!
//! ```text
//! WallSpec ─ dedup ─┬─ tension == 0 → offset_path ───┐
//!                   └─ tension  > 0 → spline_offset ─┴─ assemble_boundary ─ extrude_loop ─ Mesh
//! FloorSpec ─ dedup ─ BoundaryLoop ─ extrude_loop (flattened) ─ Mesh
//! ```
//!
//! Every stage is a pure function of its inputs. The `build_*` functions
//! report failures as `Error`; `MeshGenerator` turns them into "no geometry"
//! for callers inside a render loop.

use crate::boundary::{assemble_boundary, BoundaryLoop};
use crate::error::{Error, Result};
use crate::extrusion::{extrude_loop, wall_placement};
use crate::floor::build_floor_mesh;
use crate::mesh::Mesh;
use crate::offset::{offset_path, OffsetPair};
use crate::settings::MeshSettings;
use crate::spline::spline_offset;
use crate::spec::{dedup_points, ElementSpec, FloorSpec, WallSpec, MIN_WALL_POINTS};

/// Offset a wall centerline with the builder its tension selects
pub fn wall_offsets(spec: &WallSpec, settings: &MeshSettings) -> Result<(OffsetPair, bool)> {
    let (thickness, _) = spec.validate(settings)?;
    resolved_wall_offsets(spec, thickness, settings)
}

/// Offsets for a wall whose thickness has already been validated and resolved
fn resolved_wall_offsets(
    spec: &WallSpec,
    thickness: f64,
    settings: &MeshSettings,
) -> Result<(OffsetPair, bool)> {
    let points = dedup_points(&spec.points, spec.closed, settings.coincident_epsilon);
    if points.len() < MIN_WALL_POINTS {
        return Err(Error::InsufficientPoints {
            required: MIN_WALL_POINTS,
            actual: points.len(),
        });
    }
    if points.len() != spec.points.len() {
        tracing::debug!(
            removed = spec.points.len() - points.len(),
            "Dropped coincident wall control points"
        );
    }

    let closed = spec.closed && points.len() > 2;
    let half_thickness = thickness / 2.0;

    let pair = if spec.is_curved() {
        spline_offset(&points, half_thickness, spec.tension, closed, settings)?
    } else {
        offset_path(&points, half_thickness, closed, settings)?
    };

    Ok((pair, closed))
}

/// The 2D cross-section of a wall, before extrusion
pub fn wall_boundary(spec: &WallSpec, settings: &MeshSettings) -> Result<BoundaryLoop> {
    let (pair, closed) = wall_offsets(spec, settings)?;
    Ok(assemble_boundary(&pair, closed))
}

/// Build the solid mesh for a wall, standing on the ground plane
pub fn build_wall_mesh(spec: &WallSpec, settings: &MeshSettings) -> Result<Mesh> {
    let (thickness, height) = spec.validate(settings)?;
    let (pair, closed) = resolved_wall_offsets(spec, thickness, settings)?;
    let boundary = assemble_boundary(&pair, closed);
    let mesh = extrude_loop(&boundary, height, Some(&wall_placement()))?;

    tracing::trace!(
        points = spec.points.len(),
        curved = spec.is_curved(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Built wall mesh"
    );

    Ok(mesh)
}

/// Render-loop facing mesh generator
///
/// Never fails: anything that cannot be meshed comes back as `None`.
#[derive(Debug, Clone, Default)]
pub struct MeshGenerator {
    settings: MeshSettings,
}

impl MeshGenerator {
    /// Create a generator, rejecting unusable settings up front
    pub fn new(settings: MeshSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    #[inline]
    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    pub fn wall_mesh(&self, spec: &WallSpec) -> Option<Mesh> {
        no_geometry_on_error("wall", build_wall_mesh(spec, &self.settings))
    }

    pub fn floor_mesh(&self, spec: &FloorSpec) -> Option<Mesh> {
        no_geometry_on_error("floor", build_floor_mesh(spec, &self.settings))
    }

    pub fn generate(&self, spec: &ElementSpec) -> Option<Mesh> {
        match spec {
            ElementSpec::Wall(wall) => self.wall_mesh(wall),
            ElementSpec::Floor(floor) => self.floor_mesh(floor),
        }
    }

    /// Generate meshes for independent specs, in input order
    pub fn generate_batch(&self, specs: &[ElementSpec]) -> Vec<Option<Mesh>> {
        #[cfg(not(target_arch = "wasm32"))]
        use rayon::prelude::*;

        // On native: use parallel iteration for multi-core speedup
        // On WASM: use sequential iteration (no threads available)
        #[cfg(not(target_arch = "wasm32"))]
        let meshes = specs.par_iter().map(|spec| self.generate(spec)).collect();

        #[cfg(target_arch = "wasm32")]
        let meshes = specs.iter().map(|spec| self.generate(spec)).collect();

        meshes
    }
}

fn no_geometry_on_error(kind: &str, result: Result<Mesh>) -> Option<Mesh> {
    match result {
        Ok(mesh) => Some(mesh),
        Err(err) if err.is_no_geometry() => {
            tracing::debug!(kind, %err, "Skipping element with no geometry");
            None
        }
        Err(err) => {
            tracing::warn!(kind, %err, "Failed to build element mesh");
            None
        }
    }
}
