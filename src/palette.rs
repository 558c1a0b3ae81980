//! Intensity → colour and block height
//!
//! Each colour mode carries two anchor tables over the 0-99 intensity scale.
//! Lookups find the bracketing anchor pair and interpolate linearly. Intensity
//! 0 is the water band: a flat, zero-height tile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::biome::BiomeCell;

/// Cells at or below this intensity are open water and render flat.
pub const WATER_BAND_MAX: u8 = 0;

/// 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Linear interpolation, rounded per channel.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Scale every channel by `factor`.
    pub fn darken(self, factor: f64) -> Rgb {
        let scale = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The two supported colour modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Dark,
    Light,
}

impl ColorMode {
    pub fn all() -> &'static [ColorMode] {
        &[ColorMode::Dark, ColorMode::Light]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Dark => "dark",
            ColorMode::Light => "light",
        }
    }

    fn color_anchors(&self) -> &'static [(u8, Rgb)] {
        match self {
            ColorMode::Dark => &DARK_COLOR_ANCHORS,
            ColorMode::Light => &LIGHT_COLOR_ANCHORS,
        }
    }

    fn height_anchors(&self) -> &'static [(u8, f64)] {
        match self {
            ColorMode::Dark => &DARK_HEIGHT_ANCHORS,
            ColorMode::Light => &LIGHT_HEIGHT_ANCHORS,
        }
    }

    /// Colour that biome water blends toward.
    pub fn water(&self) -> Rgb {
        match self {
            ColorMode::Dark => Rgb::new(36, 78, 128),
            ColorMode::Light => Rgb::new(96, 164, 222),
        }
    }

    /// Deep shade used under forest canopy.
    pub fn canopy(&self) -> Rgb {
        match self {
            ColorMode::Dark => Rgb::new(28, 74, 40),
            ColorMode::Light => Rgb::new(58, 120, 62),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(ColorMode::Dark),
            "light" => Ok(ColorMode::Light),
            other => Err(format!("unknown colour mode '{}' (expected dark or light)", other)),
        }
    }
}

// =============================================================================
// ANCHOR TABLES
// =============================================================================

const DARK_COLOR_ANCHORS: [(u8, Rgb); 14] = [
    (0, Rgb::new(30, 58, 95)),     // open water
    (1, Rgb::new(92, 98, 72)),     // wet sand
    (8, Rgb::new(68, 112, 62)),
    (15, Rgb::new(74, 128, 60)),
    (22, Rgb::new(82, 142, 58)),
    (30, Rgb::new(92, 152, 56)),   // meadow
    (38, Rgb::new(104, 158, 60)),
    (46, Rgb::new(118, 150, 64)),
    (54, Rgb::new(122, 136, 70)),  // upland
    (62, Rgb::new(128, 120, 82)),
    (70, Rgb::new(132, 112, 92)),  // rock
    (78, Rgb::new(140, 128, 118)),
    (88, Rgb::new(176, 176, 180)),
    (99, Rgb::new(228, 232, 240)), // snowcap
];

const LIGHT_COLOR_ANCHORS: [(u8, Rgb); 14] = [
    (0, Rgb::new(110, 170, 220)),
    (1, Rgb::new(214, 200, 150)),
    (8, Rgb::new(160, 204, 120)),
    (15, Rgb::new(140, 196, 104)),
    (22, Rgb::new(124, 186, 92)),
    (30, Rgb::new(112, 176, 84)),
    (38, Rgb::new(104, 164, 78)),
    (46, Rgb::new(120, 156, 80)),
    (54, Rgb::new(140, 146, 88)),
    (62, Rgb::new(156, 138, 100)),
    (70, Rgb::new(164, 132, 110)),
    (78, Rgb::new(176, 164, 150)),
    (88, Rgb::new(214, 214, 218)),
    (99, Rgb::new(250, 250, 252)),
];

const DARK_HEIGHT_ANCHORS: [(u8, f64); 14] = [
    (0, 0.0),
    (1, 2.0),
    (8, 3.0),
    (15, 4.0),
    (22, 5.0),
    (30, 6.0),
    (38, 8.0),
    (46, 10.0),
    (54, 12.0),
    (62, 14.0),
    (70, 17.0),
    (78, 20.0),
    (88, 24.0),
    (99, 28.0),
];

// Light mode sits a touch lower so pale snowcaps do not dominate the frame.
const LIGHT_HEIGHT_ANCHORS: [(u8, f64); 14] = [
    (0, 0.0),
    (1, 2.0),
    (8, 3.0),
    (15, 4.0),
    (22, 5.0),
    (30, 6.0),
    (38, 7.0),
    (46, 9.0),
    (54, 11.0),
    (62, 13.0),
    (70, 16.0),
    (78, 19.0),
    (88, 22.0),
    (99, 26.0),
];

/// Find the anchor pair bracketing `level` and the interpolation factor.
fn bracket<T: Copy>(anchors: &[(u8, T)], level: u8) -> (T, T, f64) {
    let level = level.min(anchors[anchors.len() - 1].0);
    for pair in anchors.windows(2) {
        let (lo, a) = pair[0];
        let (hi, b) = pair[1];
        if level >= lo && level <= hi {
            let t = if hi == lo { 0.0 } else { (level - lo) as f64 / (hi - lo) as f64 };
            return (a, b, t);
        }
    }
    let (_, first) = anchors[0];
    (first, first, 0.0)
}

/// Top/left/right face colours of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevationColors {
    pub top: Rgb,
    pub left: Rgb,
    pub right: Rgb,
}

impl ElevationColors {
    pub fn from_top(top: Rgb) -> Self {
        Self {
            top,
            left: top.darken(0.75),
            right: top.darken(0.6),
        }
    }

    /// Apply a colour transform to all three faces.
    pub fn map(self, f: impl Fn(Rgb) -> Rgb) -> Self {
        Self {
            top: f(self.top),
            left: f(self.left),
            right: f(self.right),
        }
    }
}

/// Interpolated base colour for an intensity.
pub fn color_at(mode: ColorMode, level: u8) -> Rgb {
    let (a, b, t) = bracket(mode.color_anchors(), level);
    a.lerp(b, t)
}

pub fn get_elevation(mode: ColorMode, level: u8) -> ElevationColors {
    ElevationColors::from_top(color_at(mode, level))
}

pub fn get_height(mode: ColorMode, level: u8) -> u32 {
    let (a, b, t) = bracket(mode.height_anchors(), level);
    (a + (b - a) * t).round().max(0.0) as u32
}

/// Memoized lookups for all 100 intensity levels of one mode.
#[derive(Clone, Debug)]
pub struct Palette {
    pub mode: ColorMode,
    elevations: Vec<ElevationColors>,
    heights: Vec<u32>,
}

impl Palette {
    pub fn new(mode: ColorMode) -> Self {
        let levels = 0..=crate::normalize::MAX_INTENSITY;
        Self {
            mode,
            elevations: levels.clone().map(|l| get_elevation(mode, l)).collect(),
            heights: levels.map(|l| get_height(mode, l)).collect(),
        }
    }

    pub fn elevation(&self, level: u8) -> ElevationColors {
        self.elevations[level.min(crate::normalize::MAX_INTENSITY) as usize]
    }

    pub fn height(&self, level: u8) -> u32 {
        self.heights[level.min(crate::normalize::MAX_INTENSITY) as usize]
    }

    /// Blend a block's colours toward water or canopy according to its biome.
    pub fn blend_biome(&self, colors: ElevationColors, biome: &BiomeCell) -> ElevationColors {
        if biome.is_water() {
            let water = ElevationColors::from_top(self.mode.water());
            return ElevationColors {
                top: colors.top.lerp(water.top, 0.55),
                left: colors.left.lerp(water.left, 0.35),
                right: colors.right.lerp(water.right, 0.35),
            };
        }
        if biome.forest_density > 0.0 {
            let canopy = self.mode.canopy();
            let t = biome.forest_density * 0.45;
            return ElevationColors {
                top: colors.top.lerp(canopy, t),
                left: colors.left.lerp(canopy.darken(0.75), t * 0.6),
                right: colors.right.lerp(canopy.darken(0.6), t * 0.6),
            };
        }
        colors
    }
}
