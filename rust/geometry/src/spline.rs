// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curved walls: Catmull-Rom centerline sampling and normal offsets

use crate::error::{Error, Result};
use crate::offset::{left_normal, OffsetPair};
use crate::settings::{MeshSettings, MAX_SAMPLES_PER_POINT};
use nalgebra::{Point2, Vector2};

/// Interpolating Catmull-Rom curve through a set of control points
///
/// `tension` scales the Hermite tangents: 0.5 is the classic Catmull-Rom
/// spline, smaller values pull the curve tighter around the control points.
/// Open curves extrapolate a phantom point past each end; closed curves wrap.
#[derive(Debug, Clone, Copy)]
pub struct CatmullRomCurve<'a> {
    points: &'a [Point2<f64>],
    closed: bool,
    tension: f64,
}

impl<'a> CatmullRomCurve<'a> {
    pub fn new(points: &'a [Point2<f64>], closed: bool, tension: f64) -> Self {
        Self {
            points,
            // A two-point loop has nothing to wrap around
            closed: closed && points.len() > 2,
            tension,
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Point at curve parameter `t` in [0, 1]
    pub fn point_at(&self, t: f64) -> Point2<f64> {
        let points = self.points;
        let l = points.len();
        match l {
            0 => return Point2::origin(),
            1 => return points[0],
            _ => {}
        }

        let span = if self.closed { l } else { l - 1 };
        let p = span as f64 * t.clamp(0.0, 1.0);
        let mut index = p.floor() as usize;
        let mut weight = p - index as f64;

        if self.closed {
            index %= l;
        } else if index >= l - 1 {
            index = l - 2;
            weight = 1.0;
        }

        let p1 = points[index];
        let p2 = points[(index + 1) % l];
        let p0 = if self.closed || index > 0 {
            points[(index + l - 1) % l]
        } else {
            points[0] + (points[0] - points[1])
        };
        let p3 = if self.closed || index + 2 < l {
            points[(index + 2) % l]
        } else {
            points[l - 1] + (points[l - 1] - points[l - 2])
        };

        let t0 = (p2 - p0) * self.tension;
        let t1 = (p3 - p1) * self.tension;
        hermite(&p1, &p2, &t0, &t1, weight)
    }

    /// Sample the curve at `divisions` uniform parameter steps
    ///
    /// Open curves return `divisions + 1` points including both ends.
    /// Closed curves return `divisions` points; the duplicate of the first
    /// point at `t = 1` is left off.
    pub fn sample(&self, divisions: usize) -> Vec<Point2<f64>> {
        let divisions = divisions.max(1);
        let count = if self.closed { divisions } else { divisions + 1 };
        (0..count)
            .map(|k| self.point_at(k as f64 / divisions as f64))
            .collect()
    }
}

/// Cubic Hermite interpolation between `x0` and `x1`
#[inline]
fn hermite(
    x0: &Point2<f64>,
    x1: &Point2<f64>,
    t0: &Vector2<f64>,
    t1: &Vector2<f64>,
    w: f64,
) -> Point2<f64> {
    let c0 = x0.coords;
    let c1 = *t0;
    let c2 = x0.coords * -3.0 + x1.coords * 3.0 - t0 * 2.0 - t1;
    let c3 = x0.coords * 2.0 - x1.coords * 2.0 + t0 + t1;
    let w2 = w * w;
    let w3 = w2 * w;
    Point2::from(c0 + c1 * w + c2 * w2 + c3 * w3)
}

/// Unit tangents of a sampled polyline by central differences
///
/// Open ends fall back to one-sided differences. A zero difference reuses
/// the previous tangent; a zero difference at the very first sample is
/// reported as `DegenerateSegment`.
pub fn sample_tangents(
    samples: &[Point2<f64>],
    closed: bool,
    samples_per_point: usize,
) -> Result<Vec<Vector2<f64>>> {
    let n = samples.len();
    if n < 2 {
        return Err(Error::InsufficientPoints {
            required: 2,
            actual: n,
        });
    }

    let mut tangents: Vec<Vector2<f64>> = Vec::with_capacity(n);
    for i in 0..n {
        let (prev, next) = if closed {
            (samples[(i + n - 1) % n], samples[(i + 1) % n])
        } else if i == 0 {
            (samples[0], samples[1])
        } else if i == n - 1 {
            (samples[n - 2], samples[n - 1])
        } else {
            (samples[i - 1], samples[i + 1])
        };

        let tangent = match ((next - prev).try_normalize(f64::EPSILON), tangents.last()) {
            (Some(t), _) => t,
            (None, Some(&previous)) => previous,
            (None, None) => {
                return Err(Error::DegenerateSegment {
                    index: i / samples_per_point.max(1),
                })
            }
        };
        tangents.push(tangent);
    }

    Ok(tangents)
}

/// Build offsets of a smooth curve through the centerline
///
/// The curve is sampled `samples_per_point` times per control point, each
/// sample is offset by `half_thickness` along its left-hand normal.
pub fn spline_offset(
    points: &[Point2<f64>],
    half_thickness: f64,
    tension: f64,
    closed: bool,
    settings: &MeshSettings,
) -> Result<OffsetPair> {
    if points.len() < 2 {
        return Err(Error::InsufficientPoints {
            required: 2,
            actual: points.len(),
        });
    }
    if !(tension > 0.0 && tension <= 1.0) {
        return Err(Error::InvalidParameter(format!(
            "spline tension must lie in (0, 1], got {}",
            tension
        )));
    }
    if !(half_thickness.is_finite() && half_thickness > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "half thickness must be positive, got {}",
            half_thickness
        )));
    }

    let divisions = Some(settings.samples_per_point)
        .filter(|k| (1..=MAX_SAMPLES_PER_POINT).contains(k))
        .and_then(|k| points.len().checked_mul(k))
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "cannot sample {} points at {} samples per point",
                points.len(),
                settings.samples_per_point
            ))
        })?;

    let curve = CatmullRomCurve::new(points, closed, tension);
    let samples = curve.sample(divisions);
    let tangents = sample_tangents(&samples, curve.is_closed(), settings.samples_per_point)?;

    let mut pair = OffsetPair::with_capacity(samples.len());
    for (sample, tangent) in samples.iter().zip(&tangents) {
        pair.push(*sample, left_normal(tangent), half_thickness);
    }

    tracing::trace!(
        control_points = points.len(),
        samples = samples.len(),
        "Sampled spline centerline"
    );

    Ok(pair)
}
