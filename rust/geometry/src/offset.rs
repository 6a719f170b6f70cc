// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mitered offset curves for straight-segment walls
//!
//! Each centerline vertex is pushed out along its miter normal by the miter
//! length, once to each side, giving the two faces of the wall.

use crate::error::{Error, Result};
use crate::settings::MeshSettings;
use nalgebra::{Point2, Vector2};

/// The two offset sides of a wall centerline
///
/// `outer` lies along the left-hand normal of the path direction,
/// `inner` along the right-hand normal. Both always have equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OffsetPair {
    pub outer: Vec<Point2<f64>>,
    pub inner: Vec<Point2<f64>>,
}

impl OffsetPair {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outer: Vec::with_capacity(capacity),
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Offset one centerline sample along `normal` by `distance` on both sides
    #[inline]
    pub fn push(&mut self, center: Point2<f64>, normal: Vector2<f64>, distance: f64) {
        let offset = normal * distance;
        self.outer.push(center + offset);
        self.inner.push(center - offset);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.outer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outer.is_empty()
    }
}

/// Left-hand perpendicular of a direction
#[inline]
pub(crate) fn left_normal(direction: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-direction.y, direction.x)
}

/// Unit direction of the segment `from -> to`, or `DegenerateSegment`
#[inline]
fn segment_direction(from: &Point2<f64>, to: &Point2<f64>, index: usize) -> Result<Vector2<f64>> {
    (to - from)
        .try_normalize(f64::EPSILON)
        .ok_or(Error::DegenerateSegment { index })
}

/// Build mitered offsets of a polyline centerline
///
/// Interior vertices (every vertex of a closed path) use the normalized sum
/// of the incoming and outgoing left normals, pushed out by
/// `half_thickness / sqrt((1 + cos) / 2)` and capped at
/// `miter_limit * half_thickness`. Corners whose normals are at or beyond
/// `reflex_cos_threshold` apart fall back to the plain half thickness.
/// Endpoints of open paths use their single segment's normal with no miter.
pub fn offset_path(
    points: &[Point2<f64>],
    half_thickness: f64,
    closed: bool,
    settings: &MeshSettings,
) -> Result<OffsetPair> {
    let n = points.len();
    if n < 2 {
        return Err(Error::InsufficientPoints {
            required: 2,
            actual: n,
        });
    }
    if !(half_thickness.is_finite() && half_thickness > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "half thickness must be positive, got {}",
            half_thickness
        )));
    }

    // A closed path of two points would fold back onto itself
    let closed = closed && n > 2;
    let segment_count = if closed { n } else { n - 1 };

    // Direction of segment i runs from point i to point i + 1 (wrapping)
    let mut directions = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let j = (i + 1) % n;
        directions.push(segment_direction(&points[i], &points[j], i)?);
    }

    let max_length = settings.miter_limit * half_thickness;
    let mut pair = OffsetPair::with_capacity(n);

    for (i, point) in points.iter().enumerate() {
        let incoming = if closed {
            Some(directions[(i + n - 1) % n])
        } else if i > 0 {
            Some(directions[i - 1])
        } else {
            None
        };
        let outgoing = if closed || i < n - 1 {
            Some(directions[i])
        } else {
            None
        };

        let (normal, length) = match (incoming, outgoing) {
            (Some(d_in), Some(d_out)) => {
                miter_join(&d_in, &d_out, half_thickness, max_length, settings)
            }
            (Some(d), None) | (None, Some(d)) => (left_normal(&d), half_thickness),
            (None, None) => unreachable!("every vertex touches at least one segment"),
        };

        pair.push(*point, normal, length);
    }

    Ok(pair)
}

/// Miter normal and length for a corner between two unit directions
#[inline]
fn miter_join(
    d_in: &Vector2<f64>,
    d_out: &Vector2<f64>,
    half_thickness: f64,
    max_length: f64,
    settings: &MeshSettings,
) -> (Vector2<f64>, f64) {
    let n_in = left_normal(d_in);
    let n_out = left_normal(d_out);
    let cos_angle = n_in.dot(&n_out);

    let miter = (n_in + n_out).try_normalize(f64::EPSILON).unwrap_or(n_in);

    if cos_angle <= settings.reflex_cos_threshold {
        return (miter, half_thickness);
    }

    let length = half_thickness / ((1.0 + cos_angle) / 2.0).sqrt();
    (miter, length.min(max_length))
}
