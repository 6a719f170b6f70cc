// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunable constants for mesh generation.

use crate::error::{Error, Result};

/// Spline samples generated per control point.
pub const DEFAULT_SAMPLES_PER_POINT: usize = 12;

/// Upper bound on `samples_per_point`; denser sampling adds nothing visible.
pub const MAX_SAMPLES_PER_POINT: usize = 256;

/// Miter length cap, as a multiple of half the wall thickness.
pub const DEFAULT_MITER_LIMIT: f64 = 3.0;

/// Normal dot product at or below which a corner counts as a near-reversal.
/// Such corners use the plain half thickness instead of a miter length,
/// since `sqrt((1 + cos) / 2)` approaches zero there.
pub const DEFAULT_REFLEX_COS_THRESHOLD: f64 = -0.99;

/// Distance under which consecutive control points are treated as the same point.
pub const DEFAULT_COINCIDENT_EPSILON: f64 = 1e-9;

/// Thickness, height or depth substituted for non-positive values when clamping.
pub const DEFAULT_MIN_DIMENSION: f64 = 1e-4;

/// Mesh generation settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeshSettings {
    /// Spline sampling density (samples per input control point)
    pub samples_per_point: usize,
    /// Miter clamp as a multiple of half thickness
    pub miter_limit: f64,
    /// Near-180° corner threshold on the cosine between adjacent normals
    pub reflex_cos_threshold: f64,
    /// Duplicate control point filter distance
    pub coincident_epsilon: f64,
    /// Replacement for a non-positive thickness/height/depth when clamping
    pub min_dimension: f64,
    /// Clamp non-positive dimensions to `min_dimension` instead of rejecting them
    pub clamp_parameters: bool,
}

impl MeshSettings {
    /// Check that every setting is usable
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SAMPLES_PER_POINT).contains(&self.samples_per_point) {
            return Err(Error::InvalidParameter(format!(
                "samples_per_point must lie in [1, {}], got {}",
                MAX_SAMPLES_PER_POINT, self.samples_per_point
            )));
        }
        if !self.miter_limit.is_finite() || self.miter_limit < 1.0 {
            return Err(Error::InvalidParameter(format!(
                "miter_limit must be finite and >= 1, got {}",
                self.miter_limit
            )));
        }
        if !(-1.0..1.0).contains(&self.reflex_cos_threshold) {
            return Err(Error::InvalidParameter(format!(
                "reflex_cos_threshold must lie in [-1, 1), got {}",
                self.reflex_cos_threshold
            )));
        }
        if !self.coincident_epsilon.is_finite() || self.coincident_epsilon < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "coincident_epsilon must be finite and non-negative, got {}",
                self.coincident_epsilon
            )));
        }
        if !self.min_dimension.is_finite() || self.min_dimension <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "min_dimension must be finite and positive, got {}",
                self.min_dimension
            )));
        }
        Ok(())
    }

    /// Resolve a thickness/height/depth value
    ///
    /// Any finite positive value is returned unchanged. A value at or below
    /// zero becomes `min_dimension` when clamping is enabled and is an
    /// `InvalidParameter` otherwise. NaN and +inf are always rejected.
    pub fn resolve_dimension(&self, name: &str, value: f64) -> Result<f64> {
        if value.is_finite() && value > 0.0 {
            return Ok(value);
        }
        if self.clamp_parameters && value <= 0.0 {
            tracing::debug!(
                parameter = name,
                value,
                clamped = self.min_dimension,
                "Clamping dimension"
            );
            return Ok(self.min_dimension);
        }
        Err(Error::InvalidParameter(format!(
            "{} must be finite and positive, got {}",
            name, value
        )))
    }
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            samples_per_point: DEFAULT_SAMPLES_PER_POINT,
            miter_limit: DEFAULT_MITER_LIMIT,
            reflex_cos_threshold: DEFAULT_REFLEX_COS_THRESHOLD,
            coincident_epsilon: DEFAULT_COINCIDENT_EPSILON,
            min_dimension: DEFAULT_MIN_DIMENSION,
            clamp_parameters: false,
        }
    }
}
