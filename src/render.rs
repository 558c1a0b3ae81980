//! The full pipeline: calendar grid in, layered scene out
//!
//! Stages run in a fixed order and each randomized stage draws from its own
//! seed, so the same grid, options and seeds always produce the same diorama.

use serde::Serialize;

use crate::biome::{generate_biomes, BiomeMap};
use crate::calendar::{ActivityStats, Grid};
use crate::compositor::{compose, CompositorInput};
use crate::config::RenderConfig;
use crate::decorations::{select_decorations, DecorationInput, PlacedDecoration};
use crate::iso::{build_iso_cells, IsoCell, Projector};
use crate::landmarks::{select_landmarks, LandmarkInput, PlacedLandmark};
use crate::normalize::{normalize, MAX_INTENSITY};
use crate::palette::{ColorMode, Palette};
use crate::scene::Scene;
use crate::seasons::{Hemisphere, SeasonCalendar};
use crate::seeds::RenderSeeds;
use crate::sprites::SpriteBook;

/// How to render one diorama.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub mode: ColorMode,
    pub hemisphere: Hemisphere,
    pub seeds: RenderSeeds,
    pub title: String,
    pub config: RenderConfig,
}

impl RenderOptions {
    /// Defaults for an identity (usually a username) in one mode.
    pub fn for_identity(identity: &str, mode: ColorMode) -> Self {
        Self {
            mode,
            hemisphere: Hemisphere::default(),
            seeds: RenderSeeds::from_identity(identity, mode),
            title: format!("{} activity diorama ({})", identity, mode),
            config: RenderConfig::default(),
        }
    }

    pub fn with_seeds(mut self, seeds: RenderSeeds) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_hemisphere(mut self, hemisphere: Hemisphere) -> Self {
        self.hemisphere = hemisphere;
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }
}

/// Every intermediate product of a render, plus the finished scene.
#[derive(Clone, Debug, Serialize)]
pub struct Diorama {
    pub mode: ColorMode,
    pub effective_max: u32,
    pub rotation: usize,
    pub stats: ActivityStats,
    pub cells: Vec<IsoCell>,
    #[serde(skip)]
    pub biomes: BiomeMap,
    pub decorations: Vec<PlacedDecoration>,
    pub landmarks: Vec<PlacedLandmark>,
    pub scene: Scene,
}

pub fn render(grid: &Grid, options: &RenderOptions) -> Diorama {
    let config = &options.config;
    let seeds = &options.seeds;
    let weeks = grid.week_count();
    let days = grid.day_count();

    let normalized = normalize(grid);
    let palette = Palette::new(options.mode);
    let projector = Projector::fit(weeks, days, palette.height(MAX_INTENSITY) as f64, config);
    let cells = build_iso_cells(&normalized, &palette, &projector);

    let biomes = generate_biomes(weeks, days, seeds.biome, &config.biome);
    let seasons = SeasonCalendar::new(grid.oldest_date(), options.hemisphere);
    let stats = grid.stats();

    let decorations = select_decorations(
        &DecorationInput {
            cells: &cells,
            intensities: &normalized.intensities,
            biomes: Some(&biomes),
            seasons: Some(&seasons),
            params: &config.decorations,
        },
        seeds.decorations,
        seeds.variants,
    );

    let landmarks = select_landmarks(
        &LandmarkInput {
            cells: &cells,
            intensities: &normalized.intensities,
            biomes: Some(&biomes),
            stats: &stats,
            params: &config.landmarks,
        },
        seeds.landmarks,
    );

    let sprites = SpriteBook::new(options.mode);
    let scene = compose(
        &CompositorInput {
            title: &options.title,
            weeks,
            cells: &cells,
            biomes: &biomes,
            seasons: &seasons,
            palette: &palette,
            projector: &projector,
            decorations: &decorations,
            landmarks: &landmarks,
            sprites: &sprites,
            config,
        },
        seeds.particles,
    );

    tracing::info!(
        mode = %options.mode,
        cells = cells.len(),
        decorations = decorations.len(),
        landmarks = landmarks.len(),
        rotation = seasons.rotation,
        "rendered diorama"
    );

    Diorama {
        mode: options.mode,
        effective_max: normalized.effective_max,
        rotation: seasons.rotation,
        stats,
        cells,
        biomes,
        decorations,
        landmarks,
        scene,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorations::AnimationClass;
    use crate::scene::{LayerKind, Shape};
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
    }

    fn busy_grid() -> Grid {
        let counts: Vec<[u32; 7]> = (0..52u32)
            .map(|w| {
                let mut week = [0u32; 7];
                for (d, c) in week.iter_mut().enumerate() {
                    *c = (w * 7 + d as u32 * 3) % 11;
                }
                week
            })
            .collect();
        Grid::from_counts(start(), &counts)
    }

    #[test]
    fn test_deterministic() {
        let grid = busy_grid();
        let options = RenderOptions::for_identity("octocat", ColorMode::Dark);
        let a = render(&grid, &options);
        let b = render(&grid, &options);
        assert_eq!(a.cells, b.cells);
        assert_eq!(a.decorations, b.decorations);
        assert_eq!(a.landmarks, b.landmarks);
        assert_eq!(a.scene, b.scene);
    }

    #[test]
    fn test_all_zero_grid() {
        let grid = Grid::uniform(start(), 0);
        for mode in ColorMode::all() {
            let d = render(&grid, &RenderOptions::for_identity("quiet", *mode));
            assert_eq!(d.effective_max, 1);
            assert!(d.cells.iter().all(|c| c.intensity == 0 && c.block_height == 0));
            assert!(d.decorations.is_empty());
            assert!(d.landmarks.is_empty());
            assert_eq!(d.cells.len(), 364);
        }
    }

    #[test]
    fn test_uniform_max_activity() {
        let grid = Grid::uniform(start(), 20);
        let options = RenderOptions::for_identity("busy", ColorMode::Dark).with_seeds(RenderSeeds::from_master(42));
        let d = render(&grid, &options);
        assert_eq!(d.effective_max, 20);
        assert!(d.cells.iter().all(|c| c.intensity == 99));
        assert_eq!(d.stats.total, 20 * 364);
        assert!(!d.landmarks.is_empty());
        assert!(d.landmarks.len() <= options.config.landmarks.budget);
        for l in &d.landmarks {
            assert!(!d.biomes.get(l.week, l.day).is_water());
        }
    }

    #[test]
    fn test_budgets_hold_for_many_identities() {
        let grid = busy_grid();
        for name in ["a", "b", "c", "d", "e", "f"] {
            let d = render(&grid, &RenderOptions::for_identity(name, ColorMode::Light));
            let config = RenderConfig::default();
            let motion = d
                .decorations
                .iter()
                .filter(|p| p.kind.animation() == Some(AnimationClass::Motion))
                .count();
            let css = d
                .decorations
                .iter()
                .filter(|p| p.kind.animation() == Some(AnimationClass::Css))
                .count();
            assert!(motion <= config.decorations.smil_budget);
            assert!(css <= config.decorations.css_budget);
            assert!(d.landmarks.len() <= config.landmarks.budget);
        }
    }

    #[test]
    fn test_variant_seed_keeps_placement() {
        let grid = busy_grid();
        let base = RenderOptions::for_identity("octocat", ColorMode::Dark);
        let master = base.seeds.master;
        let other = base.clone().with_seeds(RenderSeeds::builder(master).variants(99).build());
        let a = render(&grid, &base);
        let b = render(&grid, &other);
        let cells = |d: &Diorama| d.decorations.iter().map(|p| (p.week, p.day, p.kind)).collect::<Vec<_>>();
        assert_eq!(cells(&a), cells(&b));
        assert_eq!(a.landmarks, b.landmarks);
    }

    #[test]
    fn test_layers_in_fixed_order() {
        let d = render(&busy_grid(), &RenderOptions::for_identity("octocat", ColorMode::Dark));
        let kinds: Vec<LayerKind> = d.scene.layers.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, LayerKind::all().to_vec());
        let decorations = d.scene.layer(LayerKind::Decorations).map(|l| l.shapes.len());
        assert_eq!(decorations, Some(d.decorations.len()));
        let landmarks = d.scene.layer(LayerKind::Landmarks).map(|l| l.shapes.len());
        assert_eq!(landmarks, Some(d.landmarks.len() * 2));
    }

    #[test]
    fn test_summer_only_grid_has_no_particles() {
        // Four weeks from early June sit entirely inside the summer zone.
        let counts = vec![[3u32; 7]; 4];
        let grid = Grid::from_counts(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), &counts);
        let d = render(&grid, &RenderOptions::for_identity("sunny", ColorMode::Light));
        let particles = d.scene.layer(LayerKind::Particles).map(|l| l.shapes.len());
        assert_eq!(particles, Some(0));
    }

    #[test]
    fn test_winter_water_freezes() {
        let counts = vec![[0u32; 7]; 3];
        let grid = Grid::from_counts(NaiveDate::from_ymd_opt(2023, 12, 3).unwrap(), &counts);
        let d = render(&grid, &RenderOptions::for_identity("frost", ColorMode::Dark));
        let terrain = d.scene.layer(LayerKind::Terrain).map(|l| l.shapes.clone()).unwrap_or_default();
        let lines = terrain.iter().filter(|s| matches!(s, Shape::Line { .. })).count();
        assert_eq!(lines, 21);
    }

    #[test]
    fn test_empty_grid() {
        let d = render(&Grid::from_weeks(&[]), &RenderOptions::for_identity("nobody", ColorMode::Dark));
        assert!(d.cells.is_empty());
        assert!(d.decorations.is_empty());
        assert!(d.landmarks.is_empty());
    }
}
