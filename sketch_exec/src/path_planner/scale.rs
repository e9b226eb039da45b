//! Conversion between capture space (pixels) and physical units (meters)

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::PlanError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Dimensions of the map image and of the area it represents.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct MapParams {
    /// Width of the map image.
    ///
    /// Units: pixels
    pub width_px: f64,

    /// Height of the map image.
    ///
    /// Units: pixels
    pub height_px: f64,

    /// Width of the physical area shown in the map.
    ///
    /// Units: meters
    pub width_m: f64,

    /// Height of the physical area shown in the map.
    ///
    /// Units: meters
    pub height_m: f64,
}

/// Per-axis scale from capture space into meters.
///
/// Both factors are strictly positive and finite, which is checked on construction. The axes may
/// be scaled differently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale {
    x_m_per_px: f64,
    y_m_per_px: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scale {
    pub fn new(x_m_per_px: f64, y_m_per_px: f64) -> Result<Self, PlanError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;

        if valid(x_m_per_px) && valid(y_m_per_px) {
            Ok(Self {
                x_m_per_px,
                y_m_per_px,
            })
        } else {
            Err(PlanError::InvalidScale {
                x_m_per_px,
                y_m_per_px,
            })
        }
    }

    /// Same scale on both axes.
    pub fn isotropic(m_per_px: f64) -> Result<Self, PlanError> {
        Self::new(m_per_px, m_per_px)
    }

    /// Get the scale of a map from its dimensions.
    pub fn from_map(map: &MapParams) -> Result<Self, PlanError> {
        Self::new(map.width_m / map.width_px, map.height_m / map.height_px)
    }

    pub fn x_m_per_px(&self) -> f64 {
        self.x_m_per_px
    }

    pub fn y_m_per_px(&self) -> f64 {
        self.y_m_per_px
    }

    /// Convert a displacement in pixels into meters.
    pub fn to_meters(&self, delta_px: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(delta_px.x * self.x_m_per_px, delta_px.y * self.y_m_per_px)
    }

    /// Convert a displacement in meters into pixels.
    pub fn to_pixels(&self, delta_m: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(delta_m.x / self.x_m_per_px, delta_m.y / self.y_m_per_px)
    }
}
