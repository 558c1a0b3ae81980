//! Procedural biome context: rivers, ponds and forests
//!
//! The biome layer is independent of activity: it depends only on the grid
//! shape and the seed, so even an empty calendar gets its rivers.
//!
//! Generation order is fixed and shares one generator:
//! 1. rivers walk west→east, drifting a day up or down
//! 2. ponds grow out of a few river bends
//! 3. cells touching water are flagged `near_water`
//! 4. forest nuclei are scattered and density is the max over nuclei
//!
//! Reordering any step changes every later draw.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::BiomeParams;
use crate::tilemap::Tilemap;

/// Biome flags for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomeCell {
    pub is_river: bool,
    pub is_pond: bool,
    pub near_water: bool,
    /// 0.0 (open land) to 1.0 (forest core)
    pub forest_density: f64,
}

impl BiomeCell {
    pub fn is_water(&self) -> bool {
        self.is_river || self.is_pond
    }
}

pub type BiomeMap = Tilemap<BiomeCell>;

/// Summary counts, for logging and the debug binary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BiomeStats {
    pub river_cells: usize,
    pub pond_cells: usize,
    pub near_water_cells: usize,
    pub forest_cells: usize,
}

pub fn biome_stats(map: &BiomeMap) -> BiomeStats {
    let mut stats = BiomeStats::default();
    for (_, _, cell) in map.iter() {
        if cell.is_river {
            stats.river_cells += 1;
        }
        if cell.is_pond {
            stats.pond_cells += 1;
        }
        if cell.near_water {
            stats.near_water_cells += 1;
        }
        if cell.forest_density > 0.0 {
            stats.forest_cells += 1;
        }
    }
    stats
}

/// Generate the biome map for a `weeks`×`days` grid.
pub fn generate_biomes(weeks: usize, days: usize, seed: u64, params: &BiomeParams) -> BiomeMap {
    let mut map = BiomeMap::new(weeks, days);
    if weeks == 0 || days == 0 {
        return map;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let bends = carve_rivers(&mut map, params, &mut rng);
    grow_ponds(&mut map, bends, params, &mut rng);
    mark_near_water(&mut map);
    plant_forests(&mut map, params, &mut rng);

    let stats = biome_stats(&map);
    tracing::debug!(
        rivers = stats.river_cells,
        ponds = stats.pond_cells,
        near_water = stats.near_water_cells,
        forest = stats.forest_cells,
        "generated biome map"
    );

    map
}

/// Walk each river across every week. Returns the cells where a river turned.
fn carve_rivers(map: &mut BiomeMap, params: &BiomeParams, rng: &mut ChaCha8Rng) -> Vec<(usize, usize)> {
    let weeks = map.width;
    let days = map.height;
    let mut bends = Vec::new();

    for _ in 0..params.river_count {
        let mut day = rng.gen_range(0..days);

        for week in 0..weeks {
            map.get_mut(week, day).is_river = true;

            let roll: f64 = rng.gen();
            let next = if roll < params.drift_left {
                day.saturating_sub(1)
            } else if roll < params.drift_left + params.drift_right {
                (day + 1).min(days - 1)
            } else {
                day
            };

            if next != day {
                bends.push((week, day));
                day = next;
            }
        }
    }

    bends
}

fn grow_ponds(map: &mut BiomeMap, mut bends: Vec<(usize, usize)>, params: &BiomeParams, rng: &mut ChaCha8Rng) {
    if bends.is_empty() {
        return;
    }

    let (seed_min, seed_max) = params.pond_seeds;
    let count = rng.gen_range(seed_min..=seed_max.max(seed_min)).min(bends.len());

    for _ in 0..count {
        let start = bends.swap_remove(rng.gen_range(0..bends.len()));

        let (size_min, size_max) = params.pond_size;
        let target = rng.gen_range(size_min..=size_max.max(size_min)).max(1);

        let mut cells = vec![start];
        let mut attempts = 0;
        while cells.len() < target && attempts < target * 8 {
            attempts += 1;
            let (bx, by) = cells[rng.gen_range(0..cells.len())];
            let dx = rng.gen_range(-1i32..=1);
            let dy = rng.gen_range(-1i32..=1);
            let nx = bx as i32 + dx;
            let ny = by as i32 + dy;
            if map.try_get(nx, ny).is_none() {
                continue;
            }
            let cell = (nx as usize, ny as usize);
            if !cells.contains(&cell) {
                cells.push(cell);
            }
        }

        for (x, y) in cells {
            map.get_mut(x, y).is_pond = true;
        }
    }
}

fn mark_near_water(map: &mut BiomeMap) {
    let mut flagged = Vec::new();
    for (x, y, cell) in map.iter() {
        if cell.is_water() {
            continue;
        }
        if map.neighbors(x, y).iter().any(|&(nx, ny)| map.get(nx, ny).is_water()) {
            flagged.push((x, y));
        }
    }
    for (x, y) in flagged {
        map.get_mut(x, y).near_water = true;
    }
}

fn plant_forests(map: &mut BiomeMap, params: &BiomeParams, rng: &mut ChaCha8Rng) {
    let weeks = map.width;
    let days = map.height;
    let (radius_min, radius_max) = params.forest_radius;

    let nuclei: Vec<(f64, f64, f64)> = (0..params.forest_nuclei)
        .map(|_| {
            let week = rng.gen_range(0..weeks) as f64;
            let day = rng.gen_range(0..days) as f64;
            let radius = if radius_max > radius_min {
                rng.gen_range(radius_min..radius_max)
            } else {
                radius_min
            };
            (week, day, radius)
        })
        .collect();

    for (x, y, cell) in map.iter_mut() {
        cell.forest_density = nuclei
            .iter()
            .map(|&(nx, ny, radius)| {
                let dist = ((x as f64 - nx).powi(2) + (y as f64 - ny).powi(2)).sqrt();
                if radius > 0.0 && dist < radius {
                    1.0 - dist / radius
                } else {
                    0.0
                }
            })
            .fold(0.0, f64::max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BiomeParams {
        BiomeParams::default()
    }

    #[test]
    fn test_deterministic() {
        let a = generate_biomes(52, 7, 42, &params());
        let b = generate_biomes(52, 7, 42, &params());
        assert_eq!(a, b);
        let c = generate_biomes(52, 7, 43, &params());
        assert_ne!(a, c);
    }

    #[test]
    fn test_every_week_has_a_river_cell() {
        let map = generate_biomes(52, 7, 7, &params());
        for week in 0..52 {
            assert!((0..7).any(|day| map.get(week, day).is_river), "week {} has no river", week);
        }
    }

    #[test]
    fn test_near_water_is_adjacent_and_dry() {
        for seed in 0..20 {
            let map = generate_biomes(52, 7, seed, &params());
            for (x, y, cell) in map.iter() {
                let touches = map.neighbors(x, y).iter().any(|&(nx, ny)| map.get(nx, ny).is_water());
                if cell.is_water() {
                    assert!(!cell.near_water);
                } else {
                    assert_eq!(cell.near_water, touches);
                }
            }
        }
    }

    #[test]
    fn test_forest_density_bounded() {
        for seed in 0..20 {
            let map = generate_biomes(52, 7, seed, &params());
            assert!(map.iter().all(|(_, _, c)| (0.0..=1.0).contains(&c.forest_density)));
            assert!(map.iter().any(|(_, _, c)| c.forest_density > 0.0));
        }
    }

    #[test]
    fn test_ponds_touch_a_river() {
        for seed in 0..20 {
            let map = generate_biomes(52, 7, seed, &params());
            let stats = biome_stats(&map);
            if stats.pond_cells > 0 {
                assert!(map.iter().any(|(_, _, c)| c.is_pond && c.is_river));
            }
        }
    }

    #[test]
    fn test_no_drift_means_straight_rivers_and_no_ponds() {
        let straight = BiomeParams {
            drift_left: 0.0,
            drift_right: 0.0,
            river_count: 1,
            ..params()
        };
        let map = generate_biomes(52, 7, 3, &straight);
        let stats = biome_stats(&map);
        assert_eq!(stats.river_cells, 52);
        assert_eq!(stats.pond_cells, 0);
    }

    #[test]
    fn test_empty_grid() {
        let map = generate_biomes(0, 7, 1, &params());
        assert!(map.is_empty());
    }
}
