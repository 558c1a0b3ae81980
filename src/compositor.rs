//! Scene assembly
//!
//! Turns the outputs of every earlier stage into an ordered list of layers.
//! Each layer is built from its direct inputs only, so layers can be dropped
//! or concatenated without affecting each other.

use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::biome::BiomeMap;
use crate::config::RenderConfig;
use crate::decorations::PlacedDecoration;
use crate::iso::{self, IsoCell, Projector, Surface, WATER_DEPTH_LEFT, WATER_DEPTH_RIGHT};
use crate::landmarks::PlacedLandmark;
use crate::palette::{ColorMode, Palette, Rgb, WATER_BAND_MAX};
use crate::scene::{
    Animation, CssAnimation, GradientStop, Layer, LayerKind, LinearGradient, Point, Scene, Shape, Style,
};
use crate::seasons::{Season, SeasonCalendar, SeasonZone};
use crate::sprites::SpriteBook;

pub const SKY: &str = "sky";

/// Everything the compositor reads.
pub struct CompositorInput<'a> {
    pub title: &'a str,
    pub weeks: usize,
    pub cells: &'a [IsoCell],
    pub biomes: &'a BiomeMap,
    pub seasons: &'a SeasonCalendar,
    pub palette: &'a Palette,
    pub projector: &'a Projector,
    pub decorations: &'a [PlacedDecoration],
    pub landmarks: &'a [PlacedLandmark],
    pub sprites: &'a SpriteBook,
    pub config: &'a RenderConfig,
}

pub fn compose(input: &CompositorInput, particle_seed: u64) -> Scene {
    let mut rng = ChaCha8Rng::seed_from_u64(particle_seed);

    let layers = vec![
        Layer { kind: LayerKind::Background, shapes: background(input, &mut rng) },
        Layer { kind: LayerKind::Terrain, shapes: terrain(input) },
        Layer { kind: LayerKind::Water, shapes: water(input) },
        Layer { kind: LayerKind::Decorations, shapes: decorations(input) },
        Layer { kind: LayerKind::Landmarks, shapes: landmarks(input) },
        Layer { kind: LayerKind::Particles, shapes: particles(input, &mut rng) },
    ];

    Scene {
        width: input.config.canvas_width,
        height: input.config.canvas_height,
        title: input.title.to_string(),
        gradients: gradients(input.palette.mode),
        layers,
    }
}

fn stop(offset: f64, color: Rgb, opacity: f64) -> GradientStop {
    GradientStop { offset, color, opacity }
}

fn gradients(mode: ColorMode) -> Vec<LinearGradient> {
    let (sky_top, sky_bottom) = match mode {
        ColorMode::Dark => (Rgb::new(13, 17, 23), Rgb::new(24, 36, 56)),
        ColorMode::Light => (Rgb::new(176, 214, 250), Rgb::new(246, 250, 255)),
    };
    let water = mode.water();
    vec![
        LinearGradient {
            id: SKY.to_string(),
            vertical: true,
            stops: vec![stop(0.0, sky_top, 1.0), stop(1.0, sky_bottom, 1.0)],
        },
        LinearGradient {
            id: WATER_DEPTH_LEFT.to_string(),
            vertical: true,
            stops: vec![stop(0.0, water, 0.2), stop(1.0, water.darken(0.6), 0.9)],
        },
        LinearGradient {
            id: WATER_DEPTH_RIGHT.to_string(),
            vertical: true,
            stops: vec![stop(0.0, water, 0.1), stop(1.0, water.darken(0.5), 0.8)],
        },
    ]
}

// =============================================================================
// LAYERS
// =============================================================================

fn background(input: &CompositorInput, rng: &mut ChaCha8Rng) -> Vec<Shape> {
    let (w, h) = (input.config.canvas_width, input.config.canvas_height);
    let mut shapes = vec![Shape::rect((0.0, 0.0), w, h, Style::gradient(SKY))];

    match input.palette.mode {
        ColorMode::Dark => {
            for i in 0..40 {
                let at = (rng.gen_range(0.0..w), rng.gen_range(0.0..h * 0.45));
                let r = rng.gen_range(0.4..1.1);
                let star = Shape::circle((0.0, 0.0), r, Style::fill(Rgb::new(230, 236, 255)).opacity(0.8));
                if i % 4 == 0 {
                    shapes.push(Shape::animated(at, Animation::Css(CssAnimation::Twinkle), vec![star]));
                } else {
                    shapes.push(Shape::group(at, vec![star]));
                }
            }
        }
        ColorMode::Light => {
            let sun = (w * 0.86, h * 0.14);
            shapes.push(Shape::circle(sun, 34.0, Style::fill(Rgb::new(255, 236, 160)).opacity(0.35)));
            shapes.push(Shape::circle(sun, 20.0, Style::fill(Rgb::new(255, 214, 90))));
        }
    }

    shapes
}

fn terrain(input: &CompositorInput) -> Vec<Shape> {
    let mut shapes = Vec::with_capacity(input.cells.len() * 3);
    for cell in input.cells {
        let biome = input.biomes.get(cell.week, cell.day);
        let mut colors = cell.colors;
        if cell.intensity > WATER_BAND_MAX {
            colors = input.palette.blend_biome(colors, biome);
        }
        let tint = input.seasons.tint(cell.week);
        let colors = colors.map(|c| tint.apply(c));

        let surface = if cell.block_height > 0 {
            Surface::Ground
        } else if input.seasons.season(cell.week) == Season::Winter {
            Surface::Ice
        } else {
            Surface::Water
        };
        let water_sides = biome.is_water() && cell.block_height > 0;

        shapes.extend(iso::render_block(cell, colors, surface, water_sides, input.projector));
    }
    shapes
}

fn water(input: &CompositorInput) -> Vec<Shape> {
    let p = input.projector;
    let water = input.palette.mode.water();
    let mut shapes = Vec::new();

    for cell in input.cells {
        if cell.intensity <= WATER_BAND_MAX || !input.biomes.get(cell.week, cell.day).is_water() {
            continue;
        }
        let center = cell.top_center();
        if input.seasons.season(cell.week) == Season::Winter {
            shapes.push(Shape::polygon(
                iso::diamond(center, p.half_width * 0.9, p.half_height * 0.9),
                Style::fill(iso::ICE).opacity(0.75),
            ));
            continue;
        }
        shapes.push(Shape::polygon(
            iso::diamond(center, p.half_width * 0.85, p.half_height * 0.85),
            Style::fill(water).opacity(0.45),
        ));
        for k in [0.3, 0.55] {
            shapes.push(Shape::ellipse(
                center,
                p.half_width * k,
                p.half_height * k,
                Style::fill(water).opacity(0.0).stroke(Rgb::WHITE, 0.4),
            ));
        }
    }

    shapes
}

fn cell_index(cells: &[IsoCell]) -> HashMap<(usize, usize), &IsoCell> {
    cells.iter().map(|c| ((c.week, c.day), c)).collect()
}

fn decorations(input: &CompositorInput) -> Vec<Shape> {
    let index = cell_index(input.cells);
    let p = input.projector;
    input
        .decorations
        .iter()
        .filter_map(|d| {
            let cell = index.get(&(d.week, d.day))?;
            let (x, y) = cell.top_center();
            let at: Point = (x + d.offset.0 * p.half_width, y + d.offset.1 * p.half_height);
            Some(input.sprites.decoration(d.kind, d.variant).place(at))
        })
        .collect()
}

fn landmarks(input: &CompositorInput) -> Vec<Shape> {
    let p = input.projector;
    let mut ordered: Vec<&PlacedLandmark> = input.landmarks.iter().collect();
    ordered.sort_by_key(|l| (l.week + l.day, l.week));

    let mut shapes = Vec::with_capacity(ordered.len() * 2);
    for l in ordered {
        let glow = Shape::ellipse(
            (0.0, 0.0),
            p.half_width * 1.4,
            p.half_height * 1.4,
            Style::fill(l.tier.glow()).opacity(0.45),
        );
        shapes.push(Shape::animated(l.position, Animation::Css(CssAnimation::Pulse), vec![glow]));
        shapes.push(input.sprites.landmark(l.kind).place(l.position));
    }
    shapes
}

fn particle_shape(season: Season, rng: &mut ChaCha8Rng) -> Shape {
    match season {
        Season::Spring => Shape::ellipse((0.0, 0.0), 1.4, 0.8, Style::fill(Rgb::new(248, 190, 214)).opacity(0.9)),
        Season::Autumn => {
            let color = if rng.gen_bool(0.5) { Rgb::new(214, 108, 40) } else { Rgb::new(196, 150, 52) };
            Shape::polygon(vec![(0.0, -1.5), (1.2, 0.0), (0.0, 1.5), (-1.2, 0.0)], Style::fill(color))
        }
        _ => Shape::circle((0.0, 0.0), 1.1, Style::fill(Rgb::new(245, 248, 255)).opacity(0.9)),
    }
}

/// Seasons whose particles appear, given the zones present in the grid.
pub fn particle_seasons(zones: &std::collections::BTreeSet<SeasonZone>) -> Vec<Season> {
    [
        (SeasonZone::Winter, Season::Winter),
        (SeasonZone::Spring, Season::Spring),
        (SeasonZone::Autumn, Season::Autumn),
    ]
    .into_iter()
    .filter(|(zone, _)| zones.contains(zone))
    .map(|(_, season)| season)
    .collect()
}

fn particles(input: &CompositorInput, rng: &mut ChaCha8Rng) -> Vec<Shape> {
    let zones = input.seasons.zones_present(input.weeks);
    let (w, h) = (input.config.canvas_width, input.config.canvas_height);
    let mut shapes = Vec::new();

    for season in particle_seasons(&zones) {
        for _ in 0..input.config.particles_per_season {
            let at = (rng.gen_range(0.0..w), rng.gen_range(-h * 0.1..h * 0.5));
            let flake = particle_shape(season, rng);
            shapes.push(Shape::animated(at, Animation::Css(CssAnimation::Fall), vec![flake]));
        }
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_particle_gating() {
        let none: BTreeSet<SeasonZone> = [SeasonZone::Summer, SeasonZone::SpringToSummer].into_iter().collect();
        assert!(particle_seasons(&none).is_empty());

        let some: BTreeSet<SeasonZone> = [SeasonZone::Winter, SeasonZone::Autumn].into_iter().collect();
        assert_eq!(particle_seasons(&some), vec![Season::Winter, Season::Autumn]);

        let cal = SeasonCalendar::with_rotation(0);
        assert_eq!(particle_seasons(&cal.zones_present(52)).len(), 3);
    }

    #[test]
    fn test_gradients_cover_block_references() {
        for mode in ColorMode::all() {
            let ids: Vec<String> = gradients(*mode).into_iter().map(|g| g.id).collect();
            assert!(ids.contains(&SKY.to_string()));
            assert!(ids.contains(&WATER_DEPTH_LEFT.to_string()));
            assert!(ids.contains(&WATER_DEPTH_RIGHT.to_string()));
        }
    }
}
