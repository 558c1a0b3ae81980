//! Percentile-curved intensity scale
//!
//! Raw counts are heavy-tailed: one day with 80 commits would flatten every
//! other day to the bottom of a linear scale. Counts are therefore measured
//! against the 90th percentile of non-zero days and pushed through a square
//! root before being mapped onto 1-99. Zero stays zero.

use serde::{Deserialize, Serialize};

use crate::calendar::Grid;
use crate::tilemap::Tilemap;

/// Highest value on the intensity scale.
pub const MAX_INTENSITY: u8 = 99;

/// A grid cell after normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell100 {
    pub week: usize,
    pub day: usize,
    pub raw_count: u32,
    pub intensity: u8,
}

/// Normalizer output: cells in week-major order plus a lookup map.
#[derive(Clone, Debug)]
pub struct Normalized {
    pub cells: Vec<GridCell100>,
    pub intensities: Tilemap<u8>,
    pub effective_max: u32,
}

/// The 90th-percentile non-zero count, or 1 when there are none.
pub fn effective_max(counts: impl IntoIterator<Item = u32>) -> u32 {
    let mut non_zero: Vec<u32> = counts.into_iter().filter(|&c| c > 0).collect();
    if non_zero.is_empty() {
        return 1;
    }
    non_zero.sort_unstable();
    let idx = ((non_zero.len() as f64 * 0.9).floor() as usize).min(non_zero.len() - 1);
    non_zero[idx]
}

/// Map a raw count onto 0-99 given the effective maximum.
pub fn intensity_for(raw_count: u32, effective_max: u32) -> u8 {
    if raw_count == 0 {
        return 0;
    }
    let ratio = (raw_count as f64 / effective_max.max(1) as f64).clamp(0.0, 1.0);
    let scaled = (ratio.sqrt() * 98.0).round() + 1.0;
    scaled.clamp(1.0, MAX_INTENSITY as f64) as u8
}

pub fn normalize(grid: &Grid) -> Normalized {
    let weeks = grid.week_count();
    let days = grid.day_count();
    let eff = effective_max(grid.counts().iter().map(|(_, _, &c)| c));

    let mut cells = Vec::with_capacity(weeks * days);
    let mut intensities = Tilemap::new_with(weeks, days, 0u8);

    for week in 0..weeks {
        for day in 0..days {
            let raw_count = grid.count(week, day);
            let intensity = intensity_for(raw_count, eff);
            intensities.set(week, day, intensity);
            cells.push(GridCell100 { week, day, raw_count, intensity });
        }
    }

    tracing::debug!(effective_max = eff, cells = cells.len(), "normalized activity grid");

    Normalized { cells, intensities, effective_max: eff }
}
