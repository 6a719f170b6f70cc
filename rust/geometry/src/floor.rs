// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor slabs: the drawn polygon extruded by its depth and laid flat

use crate::boundary::BoundaryLoop;
use crate::error::{Error, Result};
use crate::extrusion::{extrude_loop, floor_placement};
use crate::mesh::Mesh;
use crate::settings::MeshSettings;
use crate::spec::{dedup_points, FloorSpec, MIN_FLOOR_POINTS};

/// Build the slab mesh for a floor polygon
///
/// The polygon is the boundary as drawn, with no offsetting. The slab's top
/// face lies on the ground plane and it extends `depth` below it.
pub fn build_floor_mesh(spec: &FloorSpec, settings: &MeshSettings) -> Result<Mesh> {
    let depth = spec.validate(settings)?;

    let points = dedup_points(&spec.points, true, settings.coincident_epsilon);
    if points.len() < MIN_FLOOR_POINTS {
        return Err(Error::InsufficientPoints {
            required: MIN_FLOOR_POINTS,
            actual: points.len(),
        });
    }

    let boundary = BoundaryLoop::from_ground_points(&points);
    extrude_loop(&boundary, depth, Some(&floor_placement(depth)))
}
