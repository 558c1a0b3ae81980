//! Rare landmark structures
//!
//! A landmark has to clear three gates. The render's aggregate statistics
//! decide which tiers exist at all. The cell's own intensity and the richness
//! of its neighbourhood then decide which of those tiers it may attempt.
//! Only the highest qualifying tier is rolled, a placed landmark consumes its
//! cell, and no two landmarks may sit within a Manhattan radius of each other.

use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::biome::BiomeMap;
use crate::calendar::ActivityStats;
use crate::config::LandmarkParams;
use crate::iso::IsoCell;
use crate::palette::Rgb;
use crate::scene::Point;
use crate::tilemap::Tilemap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LandmarkTier {
    Rare,
    Epic,
    Legendary,
}

/// Fixed thresholds of one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierRules {
    pub min_intensity: u8,
    pub min_richness: f64,
    pub base_chance: f64,
}

impl LandmarkTier {
    /// Highest first, the order tiers are attempted in.
    pub fn descending() -> &'static [LandmarkTier] {
        &[LandmarkTier::Legendary, LandmarkTier::Epic, LandmarkTier::Rare]
    }

    pub fn name(&self) -> &'static str {
        match self {
            LandmarkTier::Rare => "rare",
            LandmarkTier::Epic => "epic",
            LandmarkTier::Legendary => "legendary",
        }
    }

    pub fn rules(&self) -> TierRules {
        match self {
            LandmarkTier::Rare => TierRules { min_intensity: 70, min_richness: 0.55, base_chance: 0.05 },
            LandmarkTier::Epic => TierRules { min_intensity: 85, min_richness: 0.70, base_chance: 0.03 },
            LandmarkTier::Legendary => TierRules { min_intensity: 95, min_richness: 0.85, base_chance: 0.015 },
        }
    }

    /// Global gate on the render's aggregate statistics.
    pub fn unlocked_by(&self, stats: &ActivityStats) -> bool {
        match self {
            LandmarkTier::Rare => stats.total >= 200 || stats.longest_streak >= 14,
            LandmarkTier::Epic => stats.total >= 1000 && stats.longest_streak >= 30,
            LandmarkTier::Legendary => {
                stats.total >= 2500 && stats.longest_streak >= 60 && stats.current_streak >= 14
            }
        }
    }

    pub fn roster(&self) -> &'static [LandmarkKind] {
        match self {
            LandmarkTier::Rare => &[
                LandmarkKind::Lighthouse,
                LandmarkKind::StoneCircle,
                LandmarkKind::Observatory,
                LandmarkKind::AncientTree,
            ],
            LandmarkTier::Epic => &[LandmarkKind::Castle, LandmarkKind::Cathedral, LandmarkKind::Pagoda],
            LandmarkTier::Legendary => &[
                LandmarkKind::WizardTower,
                LandmarkKind::DragonLair,
                LandmarkKind::FloatingIsland,
            ],
        }
    }

    /// Colour of the glow drawn under landmarks of this tier.
    pub fn glow(&self) -> Rgb {
        match self {
            LandmarkTier::Rare => Rgb::new(120, 200, 255),
            LandmarkTier::Epic => Rgb::new(190, 120, 255),
            LandmarkTier::Legendary => Rgb::new(255, 200, 80),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LandmarkKind {
    Lighthouse,
    StoneCircle,
    Observatory,
    AncientTree,
    Castle,
    Cathedral,
    Pagoda,
    WizardTower,
    DragonLair,
    FloatingIsland,
}

impl LandmarkKind {
    pub const ALL: [LandmarkKind; 10] = [
        LandmarkKind::Lighthouse,
        LandmarkKind::StoneCircle,
        LandmarkKind::Observatory,
        LandmarkKind::AncientTree,
        LandmarkKind::Castle,
        LandmarkKind::Cathedral,
        LandmarkKind::Pagoda,
        LandmarkKind::WizardTower,
        LandmarkKind::DragonLair,
        LandmarkKind::FloatingIsland,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn tier(&self) -> LandmarkTier {
        match self {
            LandmarkKind::Lighthouse
            | LandmarkKind::StoneCircle
            | LandmarkKind::Observatory
            | LandmarkKind::AncientTree => LandmarkTier::Rare,
            LandmarkKind::Castle | LandmarkKind::Cathedral | LandmarkKind::Pagoda => LandmarkTier::Epic,
            LandmarkKind::WizardTower | LandmarkKind::DragonLair | LandmarkKind::FloatingIsland => {
                LandmarkTier::Legendary
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedLandmark {
    pub kind: LandmarkKind,
    pub tier: LandmarkTier,
    pub week: usize,
    pub day: usize,
    /// Top-face centre of the host block
    pub position: Point,
}

/// Multiplier rewarding an ongoing streak.
pub fn streak_multiplier(current_streak: u32) -> f64 {
    if current_streak >= 30 {
        1.44
    } else if current_streak >= 7 {
        1.15
    } else {
        1.0
    }
}

/// Roll probability for a cell that passed a tier's cell gates.
pub fn final_chance(rules: &TierRules, richness: f64, multiplier: f64) -> f64 {
    let bonus = (2.0 * (richness - rules.min_richness)).min(0.5);
    rules.base_chance * (1.0 + bonus) * multiplier
}

fn manhattan(a: (usize, usize), b: (usize, usize)) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

/// Everything the selector reads.
pub struct LandmarkInput<'a> {
    pub cells: &'a [IsoCell],
    pub intensities: &'a Tilemap<u8>,
    pub biomes: Option<&'a BiomeMap>,
    pub stats: &'a ActivityStats,
    pub params: &'a LandmarkParams,
}

pub fn select_landmarks(input: &LandmarkInput, seed: u64) -> Vec<PlacedLandmark> {
    let unlocked: Vec<LandmarkTier> = LandmarkTier::descending()
        .iter()
        .copied()
        .filter(|t| t.unlocked_by(input.stats))
        .collect();

    if unlocked.is_empty() || input.params.budget == 0 {
        tracing::debug!(total = input.stats.total, "no landmark tier unlocked");
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..input.cells.len()).collect();
    order.shuffle(&mut rng);

    let multiplier = streak_multiplier(input.stats.current_streak);
    let mut placed: Vec<PlacedLandmark> = Vec::new();

    for idx in order {
        if placed.len() >= input.params.budget {
            break;
        }

        let cell = &input.cells[idx];
        if input.biomes.is_some_and(|m| m.get(cell.week, cell.day).is_water()) {
            continue;
        }

        let richness = input.intensities.richness(cell.week, cell.day);
        let Some(tier) = unlocked.iter().copied().find(|t| {
            let rules = t.rules();
            cell.intensity >= rules.min_intensity && richness >= rules.min_richness
        }) else {
            continue;
        };

        let here = (cell.week, cell.day);
        if placed.iter().any(|p| manhattan((p.week, p.day), here) < input.params.min_spacing) {
            continue;
        }

        let available: Vec<LandmarkKind> = tier
            .roster()
            .iter()
            .copied()
            .filter(|k| placed.iter().all(|p| p.kind != *k))
            .collect();
        if available.is_empty() {
            continue;
        }

        let roll: f64 = rng.gen();
        if roll >= final_chance(&tier.rules(), richness, multiplier) {
            continue;
        }

        let kind = available[rng.gen_range(0..available.len())];
        tracing::debug!(kind = ?kind, tier = tier.name(), week = cell.week, day = cell.day, "placed landmark");
        placed.push(PlacedLandmark {
            kind,
            tier,
            week: cell.week,
            day: cell.day,
            position: cell.top_center(),
        });
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::generate_biomes;
    use crate::calendar::Grid;
    use crate::config::{BiomeParams, RenderConfig};
    use crate::iso::{build_iso_cells, Projector};
    use crate::normalize::normalize;
    use crate::palette::{ColorMode, Palette};
    use chrono::NaiveDate;

    fn stats(total: u64, longest: u32, current: u32) -> ActivityStats {
        ActivityStats {
            total,
            longest_streak: longest,
            current_streak: current,
            active_days: longest,
            max_count: 1,
        }
    }

    #[test]
    fn test_rosters_match_tiers() {
        for tier in LandmarkTier::descending() {
            for kind in tier.roster() {
                assert_eq!(kind.tier(), *tier);
            }
        }
        let total: usize = LandmarkTier::descending().iter().map(|t| t.roster().len()).sum();
        assert_eq!(total, LandmarkKind::ALL.len());
    }

    #[test]
    fn test_stats_gates() {
        assert!(!LandmarkTier::Rare.unlocked_by(&stats(100, 5, 0)));
        assert!(LandmarkTier::Rare.unlocked_by(&stats(100, 14, 0)));
        assert!(LandmarkTier::Rare.unlocked_by(&stats(200, 0, 0)));
        assert!(!LandmarkTier::Epic.unlocked_by(&stats(5000, 29, 0)));
        assert!(LandmarkTier::Epic.unlocked_by(&stats(1000, 30, 0)));
        assert!(!LandmarkTier::Legendary.unlocked_by(&stats(5000, 100, 13)));
        assert!(LandmarkTier::Legendary.unlocked_by(&stats(2500, 60, 14)));
    }

    #[test]
    fn test_stats_gates_are_monotone() {
        let totals = [0, 100, 199, 200, 999, 1000, 2499, 2500, 5000];
        let longest = [0, 13, 14, 29, 30, 59, 60, 100];
        let current = [0, 6, 7, 13, 14, 29, 30, 60];
        let mut all = Vec::new();
        for &t in &totals {
            for &l in &longest {
                for &c in &current {
                    all.push((t, l, c));
                }
            }
        }
        for &a in &all {
            for &b in &all {
                if a.0 > b.0 || a.1 > b.1 || a.2 > b.2 {
                    continue;
                }
                for tier in LandmarkTier::descending() {
                    let (lo, hi) = (stats(a.0, a.1, a.2), stats(b.0, b.1, b.2));
                    assert!(!tier.unlocked_by(&lo) || tier.unlocked_by(&hi), "{:?} {:?} {:?}", tier, a, b);
                }
            }
        }
    }

    #[test]
    fn test_final_chance() {
        let rules = LandmarkTier::Rare.rules();
        assert!((final_chance(&rules, 0.55, 1.0) - 0.05).abs() < 1e-12);
        assert!((final_chance(&rules, 1.0, 1.0) - 0.075).abs() < 1e-12);
        assert!((final_chance(&rules, 1.0, 1.44) - 0.108).abs() < 1e-12);
        assert_eq!(streak_multiplier(6), 1.0);
        assert_eq!(streak_multiplier(7), 1.15);
        assert_eq!(streak_multiplier(30), 1.44);
    }

    fn uniform_input(count: u32) -> (Vec<IsoCell>, Tilemap<u8>, BiomeMap, ActivityStats) {
        let grid = Grid::uniform(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), count);
        let n = normalize(&grid);
        let projector = Projector::fit(52, 7, 28.0, &RenderConfig::default());
        let cells = build_iso_cells(&n, &Palette::new(ColorMode::Dark), &projector);
        let biomes = generate_biomes(52, 7, 11, &BiomeParams::default());
        (cells, n.intensities, biomes, grid.stats())
    }

    #[test]
    fn test_cap_spacing_water_and_uniqueness() {
        let (cells, intensities, biomes, stats) = uniform_input(20);
        let params = LandmarkParams::default();
        let input = LandmarkInput {
            cells: &cells,
            intensities: &intensities,
            biomes: Some(&biomes),
            stats: &stats,
            params: &params,
        };
        for seed in 0..20 {
            let placed = select_landmarks(&input, seed);
            assert!(!placed.is_empty());
            assert!(placed.len() <= params.budget);
            for (i, a) in placed.iter().enumerate() {
                assert!(!biomes.get(a.week, a.day).is_water());
                for b in &placed[i + 1..] {
                    assert!(manhattan((a.week, a.day), (b.week, b.day)) >= params.min_spacing);
                    assert_ne!(a.kind, b.kind);
                }
            }
        }
    }

    #[test]
    fn test_highest_tier_wins() {
        let (cells, intensities, _, stats) = uniform_input(20);
        let params = LandmarkParams::default();
        let input = LandmarkInput {
            cells: &cells,
            intensities: &intensities,
            biomes: None,
            stats: &stats,
            params: &params,
        };
        let placed = select_landmarks(&input, 3);
        assert!(placed.iter().all(|p| p.tier == LandmarkTier::Legendary));
    }

    #[test]
    fn test_nothing_without_activity() {
        let (cells, intensities, biomes, stats) = uniform_input(0);
        let params = LandmarkParams::default();
        let input = LandmarkInput {
            cells: &cells,
            intensities: &intensities,
            biomes: Some(&biomes),
            stats: &stats,
            params: &params,
        };
        assert!(select_landmarks(&input, 1).is_empty());
    }
}
