// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall and floor descriptions supplied by the editor and map import

use crate::error::{Error, Result};
use crate::settings::MeshSettings;
use nalgebra::Point2;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Minimum control points for a wall centerline
pub const MIN_WALL_POINTS: usize = 2;

/// Minimum control points for a floor polygon
pub const MIN_FLOOR_POINTS: usize = 3;

/// A planar control point on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
}

impl ControlPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    #[inline]
    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    #[inline]
    fn hash_bits<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point2<f64>> for ControlPoint {
    fn from(p: Point2<f64>) -> Self {
        Self::from_nalgebra(&p)
    }
}

/// A wall drawn as a centerline with thickness and height
///
/// `tension == 0` selects the mitered straight-segment builder, any positive
/// tension selects the spline builder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallSpec {
    pub points: Vec<ControlPoint>,
    pub thickness: f64,
    pub height: f64,
    pub tension: f64,
    pub closed: bool,
}

impl WallSpec {
    /// Straight (mitered) open wall
    pub fn new(points: Vec<ControlPoint>, thickness: f64, height: f64) -> Self {
        Self {
            points,
            thickness,
            height,
            tension: 0.0,
            closed: false,
        }
    }

    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Whether the spline builder handles this wall
    #[inline]
    pub fn is_curved(&self) -> bool {
        self.tension > 0.0
    }

    /// Check the wall invariants, returning the resolved (thickness, height)
    ///
    /// Point count is checked last so that a wall the user is still drawing
    /// reports `InsufficientPoints` only once its parameters are sane.
    pub fn validate(&self, settings: &MeshSettings) -> Result<(f64, f64)> {
        let thickness = settings.resolve_dimension("thickness", self.thickness)?;
        let height = settings.resolve_dimension("height", self.height)?;
        if !(0.0..=1.0).contains(&self.tension) {
            return Err(Error::InvalidParameter(format!(
                "tension must lie in [0, 1], got {}",
                self.tension
            )));
        }
        check_finite(&self.points)?;
        if self.points.len() < MIN_WALL_POINTS {
            return Err(Error::InsufficientPoints {
                required: MIN_WALL_POINTS,
                actual: self.points.len(),
            });
        }
        Ok((thickness, height))
    }

    /// Bit-exact hash of every field, for dirty detection by the caller
    pub fn cache_key(&self) -> u64 {
        let mut hasher = FxHasher::default();
        0u8.hash(&mut hasher);
        self.points.len().hash(&mut hasher);
        for p in &self.points {
            p.hash_bits(&mut hasher);
        }
        self.thickness.to_bits().hash(&mut hasher);
        self.height.to_bits().hash(&mut hasher);
        self.tension.to_bits().hash(&mut hasher);
        self.closed.hash(&mut hasher);
        hasher.finish()
    }
}

/// A floor drawn as a polygon with slab depth
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorSpec {
    pub points: Vec<ControlPoint>,
    pub depth: f64,
}

impl FloorSpec {
    pub fn new(points: Vec<ControlPoint>, depth: f64) -> Self {
        Self { points, depth }
    }

    /// Check the floor invariants, returning the resolved depth
    pub fn validate(&self, settings: &MeshSettings) -> Result<f64> {
        let depth = settings.resolve_dimension("depth", self.depth)?;
        check_finite(&self.points)?;
        if self.points.len() < MIN_FLOOR_POINTS {
            return Err(Error::InsufficientPoints {
                required: MIN_FLOOR_POINTS,
                actual: self.points.len(),
            });
        }
        Ok(depth)
    }

    pub fn cache_key(&self) -> u64 {
        let mut hasher = FxHasher::default();
        1u8.hash(&mut hasher);
        self.points.len().hash(&mut hasher);
        for p in &self.points {
            p.hash_bits(&mut hasher);
        }
        self.depth.to_bits().hash(&mut hasher);
        hasher.finish()
    }
}

/// Either kind of drawable element
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ElementSpec {
    Wall(WallSpec),
    Floor(FloorSpec),
}

impl ElementSpec {
    pub fn cache_key(&self) -> u64 {
        match self {
            Self::Wall(wall) => wall.cache_key(),
            Self::Floor(floor) => floor.cache_key(),
        }
    }
}

impl From<WallSpec> for ElementSpec {
    fn from(spec: WallSpec) -> Self {
        Self::Wall(spec)
    }
}

impl From<FloorSpec> for ElementSpec {
    fn from(spec: FloorSpec) -> Self {
        Self::Floor(spec)
    }
}

fn check_finite(points: &[ControlPoint]) -> Result<()> {
    match points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        Some(index) => Err(Error::InvalidParameter(format!(
            "control point {} is not finite",
            index
        ))),
        None => Ok(()),
    }
}

/// Drop consecutive control points closer than `epsilon`
///
/// For closed paths the last point is also dropped when it coincides with
/// the first, since the closing segment would otherwise be zero-length.
pub fn dedup_points(points: &[ControlPoint], closed: bool, epsilon: f64) -> Vec<Point2<f64>> {
    let mut result: Vec<Point2<f64>> = Vec::with_capacity(points.len());

    for p in points {
        let p = p.to_nalgebra();
        match result.last() {
            Some(last) if nalgebra::distance(last, &p) <= epsilon => continue,
            _ => result.push(p),
        }
    }

    if closed && result.len() > 1 {
        let first = result[0];
        if let Some(last) = result.last() {
            if nalgebra::distance(last, &first) <= epsilon {
                result.pop();
            }
        }
    }

    result
}
