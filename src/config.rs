//! Configuration parameters for diorama rendering
//!
//! Every tunable constant of the pipeline lives here. Defaults reproduce the
//! reference look; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Biome generator knobs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeParams {
    /// Number of rivers crossing the grid
    pub river_count: usize,
    /// Per-week probability a river drifts one day up
    pub drift_left: f64,
    /// Per-week probability a river drifts one day down
    pub drift_right: f64,
    /// Range of pond seeds picked from river bends (min, max)
    pub pond_seeds: (usize, usize),
    /// Range of cells per pond (min, max)
    pub pond_size: (usize, usize),
    /// Number of forest nuclei
    pub forest_nuclei: usize,
    /// Range of forest radii in cells (min, max)
    pub forest_radius: (f64, f64),
}

impl Default for BiomeParams {
    fn default() -> Self {
        Self {
            river_count: 2,
            drift_left: 0.2,
            drift_right: 0.2,
            pond_seeds: (1, 2),
            pond_size: (3, 6),
            forest_nuclei: 5,
            forest_radius: (2.0, 5.0),
        }
    }
}

/// Decoration selector knobs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationParams {
    /// Cap on decorations animated with SMIL motion
    pub smil_budget: usize,
    /// Cap on decorations animated with CSS keyframes
    pub css_budget: usize,
    /// Added chance per unit of neighbourhood richness
    pub richness_bonus: f64,
    /// Richness above which a second decoration may appear
    pub second_min_richness: f64,
    /// Intensity at or above which a second decoration may appear
    pub second_min_intensity: u8,
    /// Chance of the second decoration
    pub second_chance: f64,
}

impl Default for DecorationParams {
    fn default() -> Self {
        Self {
            smil_budget: 6,
            css_budget: 10,
            richness_bonus: 0.2,
            second_min_richness: 0.5,
            second_min_intensity: 30,
            second_chance: 0.3,
        }
    }
}

/// Landmark selector knobs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkParams {
    /// Maximum landmarks per render
    pub budget: usize,
    /// Minimum Manhattan distance between landmarks, in cells
    pub min_spacing: usize,
}

impl Default for LandmarkParams {
    fn default() -> Self {
        Self { budget: 3, min_spacing: 8 }
    }
}

/// Complete render configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    // Canvas
    pub canvas_width: f64,
    pub canvas_height: f64,

    // Tile geometry: half the diamond's width and height
    pub tile_half_width: f64,
    pub tile_half_height: f64,

    pub biome: BiomeParams,
    pub decorations: DecorationParams,
    pub landmarks: LandmarkParams,

    /// Falling particles per present season
    pub particles_per_season: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: 880.0,
            canvas_height: 520.0,

            tile_half_width: 12.0,
            tile_half_height: 6.0,

            biome: BiomeParams::default(),
            decorations: DecorationParams::default(),
            landmarks: LandmarkParams::default(),

            particles_per_season: 24,
        }
    }
}

impl RenderConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: RenderConfig =
            serde_json::from_str(r#"{"landmarks": {"budget": 1}, "canvas_width": 1000}"#).unwrap();
        assert_eq!(cfg.landmarks.budget, 1);
        assert_eq!(cfg.landmarks.min_spacing, 8);
        assert_eq!(cfg.canvas_width, 1000.0);
        assert_eq!(cfg.biome, BiomeParams::default());
    }
}
