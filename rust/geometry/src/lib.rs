// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WallMesh Geometry
//!
//! Procedural meshes for walls and floors drawn as control points: mitered
//! or spline offsets of a centerline, stitched into a boundary loop and
//! extruded into a solid, using earcutr triangulation and nalgebra math.

pub mod boundary;
pub mod cache;
pub mod error;
pub mod extrusion;
pub mod floor;
pub mod generator;
pub mod mesh;
pub mod offset;
pub mod settings;
pub mod spec;
pub mod spline;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use boundary::{assemble_boundary, BoundaryLoop};
pub use cache::MeshCache;
pub use error::{Error, Result};
pub use extrusion::{extrude_loop, floor_placement, wall_placement};
pub use floor::build_floor_mesh;
pub use generator::{build_wall_mesh, wall_boundary, wall_offsets, MeshGenerator};
pub use mesh::Mesh;
pub use offset::{offset_path, OffsetPair};
pub use settings::MeshSettings;
pub use spec::{ControlPoint, ElementSpec, FloorSpec, WallSpec};
pub use spline::{spline_offset, CatmullRomCurve};
pub use triangulation::triangulate_polygon;
