// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during wall and floor mesh generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Fewer control points than the builder needs. Callers treat this as
    /// "nothing to draw yet", not as a fault.
    #[error("Insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    /// Two consecutive control points coincide, so the segment starting at
    /// `index` has no direction.
    #[error("Degenerate segment at point {index}: consecutive points coincide")]
    DegenerateSegment { index: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Empty mesh: {0}")]
    EmptyMesh(String),
}

impl Error {
    /// True for the non-fatal outcome where the spec simply has nothing to
    /// draw yet (a wall with one point while the user is still clicking).
    #[inline]
    pub fn is_no_geometry(&self) -> bool {
        matches!(self, Error::InsufficientPoints { .. })
    }
}
