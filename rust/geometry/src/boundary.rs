// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary loops: the closed 2D cross-section handed to the extruder
//!
//! Loops live in shape space, where the ground plane's second axis is
//! negated. The extruder's placement rotation undoes the negation, so a
//! control point `(x, y)` ends up at world `(x, _, y)` without mirroring.

use crate::offset::OffsetPair;
use nalgebra::Point2;
use smallvec::SmallVec;

/// Map a ground-plane point into shape space
#[inline]
pub fn to_shape_space(p: &Point2<f64>) -> Point2<f64> {
    Point2::new(p.x, -p.y)
}

/// A single closed polygon, implicitly closed from the last point to the first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryLoop {
    /// Loop vertices in shape space
    pub points: Vec<Point2<f64>>,
    /// Edges (by start index) that are zero-width connectors between an outer
    /// and an inner ring; they get no side faces
    pub seams: SmallVec<[usize; 2]>,
}

impl BoundaryLoop {
    /// Loop from ground-plane polygon points (no seams)
    pub fn from_ground_points(points: &[Point2<f64>]) -> Self {
        Self {
            points: points.iter().map(to_shape_space).collect(),
            seams: SmallVec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn is_seam(&self, edge: usize) -> bool {
        self.seams.contains(&edge)
    }

    /// Edges as `(start, end)` point pairs, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace area, positive for counter-clockwise loops
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            / 2.0
    }

    /// Enclosed area regardless of winding
    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}

/// Stitch an offset pair into one boundary loop
///
/// Open walls walk `outer` forwards then `inner` backwards, closing from the
/// last inner point back to the first outer point. Closed walls walk the full
/// outer ring back to `outer[0]`, cross to `inner[0]`, walk the inner ring
/// backwards and return to `inner[0]` and then `outer[0]`; the two crossings
/// are recorded as seams.
pub fn assemble_boundary(pair: &OffsetPair, closed: bool) -> BoundaryLoop {
    let n = pair.outer.len().min(pair.inner.len());
    if n == 0 {
        return BoundaryLoop::default();
    }

    let closed = closed && n > 2;
    let capacity = if closed { 2 * n + 2 } else { 2 * n };
    let mut points = Vec::with_capacity(capacity);
    let mut seams = SmallVec::new();

    points.extend(pair.outer[..n].iter().map(to_shape_space));

    if closed {
        points.push(to_shape_space(&pair.outer[0]));
        seams.push(points.len() - 1);
        points.push(to_shape_space(&pair.inner[0]));
        points.extend(pair.inner[1..n].iter().rev().map(to_shape_space));
        points.push(to_shape_space(&pair.inner[0]));
        seams.push(points.len() - 1);
    } else {
        points.extend(pair.inner[..n].iter().rev().map(to_shape_space));
    }

    BoundaryLoop { points, seams }
}
