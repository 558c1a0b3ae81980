//! Isometric projection and block geometry
//!
//! Grid cells become diamonds on screen: weeks run down-right, days run
//! down-left. Cells are painted back to front, ordered by `week + day` and
//! then by week, so nearer blocks always overlap farther ones.

use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::normalize::Normalized;
use crate::palette::{ElevationColors, Palette, Rgb};
use crate::scene::{Point, Shape, Style};

/// Maps (week, day) to screen space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projector {
    pub origin_x: f64,
    pub origin_y: f64,
    pub half_width: f64,
    pub half_height: f64,
}

impl Projector {
    pub fn new(origin_x: f64, origin_y: f64, half_width: f64, half_height: f64) -> Self {
        Self { origin_x, origin_y, half_width, half_height }
    }

    /// Centre a `weeks`×`days` grid whose tallest block is `max_height` on the canvas.
    pub fn fit(weeks: usize, days: usize, max_height: f64, config: &RenderConfig) -> Self {
        let hw = config.tile_half_width;
        let hh = config.tile_half_height;
        let span_x = (weeks + days) as f64 * hw;
        let span_y = (weeks + days) as f64 * hh + max_height;
        Self {
            origin_x: ((config.canvas_width - span_x) / 2.0 + days as f64 * hw).round(),
            origin_y: ((config.canvas_height - span_y) / 2.0 + max_height + hh).round(),
            half_width: hw,
            half_height: hh,
        }
    }

    /// Centre of the cell's ground diamond.
    pub fn project(&self, week: usize, day: usize) -> Point {
        let w = week as f64;
        let d = day as f64;
        (
            self.origin_x + (w - d) * self.half_width,
            self.origin_y + (w + d) * self.half_height,
        )
    }
}

/// A grid cell placed on screen with its resolved colour and height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IsoCell {
    pub week: usize,
    pub day: usize,
    pub intensity: u8,
    pub block_height: u32,
    pub screen_x: f64,
    pub screen_y: f64,
    pub colors: ElevationColors,
}

impl IsoCell {
    pub fn depth(&self) -> usize {
        self.week + self.day
    }

    /// Centre of the top face.
    pub fn top_center(&self) -> Point {
        (self.screen_x, self.screen_y - self.block_height as f64)
    }
}

/// Sort back to front: `(week + day)` ascending, then week ascending.
pub fn depth_sort(cells: &mut [IsoCell]) {
    cells.sort_by_key(|c| (c.depth(), c.week));
}

/// Project every normalized cell and return them in paint order.
pub fn build_iso_cells(normalized: &Normalized, palette: &Palette, projector: &Projector) -> Vec<IsoCell> {
    let mut cells: Vec<IsoCell> = normalized
        .cells
        .iter()
        .map(|c| {
            let (screen_x, screen_y) = projector.project(c.week, c.day);
            IsoCell {
                week: c.week,
                day: c.day,
                intensity: c.intensity,
                block_height: palette.height(c.intensity),
                screen_x,
                screen_y,
                colors: palette.elevation(c.intensity),
            }
        })
        .collect();
    depth_sort(&mut cells);
    cells
}

// =============================================================================
// BLOCK GEOMETRY
// =============================================================================

/// Diamond corners (N, E, S, W) centred on `center`.
pub fn diamond(center: Point, hw: f64, hh: f64) -> Vec<Point> {
    let (x, y) = center;
    vec![(x, y - hh), (x + hw, y), (x, y + hh), (x - hw, y)]
}

pub fn top_face(cell: &IsoCell, p: &Projector) -> Vec<Point> {
    diamond(cell.top_center(), p.half_width, p.half_height)
}

pub fn left_face(cell: &IsoCell, p: &Projector) -> Vec<Point> {
    let (x, y) = (cell.screen_x, cell.screen_y);
    let h = cell.block_height as f64;
    vec![
        (x - p.half_width, y - h),
        (x, y - h + p.half_height),
        (x, y + p.half_height),
        (x - p.half_width, y),
    ]
}

pub fn right_face(cell: &IsoCell, p: &Projector) -> Vec<Point> {
    let (x, y) = (cell.screen_x, cell.screen_y);
    let h = cell.block_height as f64;
    vec![
        (x, y - h + p.half_height),
        (x + p.half_width, y - h),
        (x + p.half_width, y),
        (x, y + p.half_height),
    ]
}

/// How the top of a block is finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Ground,
    /// Open water: inset highlight and a specular glint
    Water,
    /// Frozen water: pale sheet with cracks
    Ice,
}

pub const ICE: Rgb = Rgb::new(214, 232, 244);

/// Gradient ids the block renderer expects the scene to declare.
pub const WATER_DEPTH_LEFT: &str = "water-depth-left";
pub const WATER_DEPTH_RIGHT: &str = "water-depth-right";

/// Shapes for one block in paint order.
pub fn render_block(
    cell: &IsoCell,
    colors: ElevationColors,
    surface: Surface,
    water_sides: bool,
    p: &Projector,
) -> Vec<Shape> {
    if cell.block_height == 0 {
        return render_flat(cell, colors, surface, p);
    }

    let mut shapes = Vec::with_capacity(5);

    shapes.push(Shape::polygon(left_face(cell, p), Style::fill(colors.left)));
    shapes.push(Shape::polygon(right_face(cell, p), Style::fill(colors.right)));

    if water_sides {
        shapes.push(Shape::polygon(left_face(cell, p), Style::gradient(WATER_DEPTH_LEFT).opacity(0.5)));
        shapes.push(Shape::polygon(right_face(cell, p), Style::gradient(WATER_DEPTH_RIGHT).opacity(0.5)));
    }

    shapes.push(Shape::polygon(top_face(cell, p), Style::fill(colors.top)));
    shapes
}

fn render_flat(cell: &IsoCell, colors: ElevationColors, surface: Surface, p: &Projector) -> Vec<Shape> {
    let center = cell.top_center();
    match surface {
        Surface::Ground => vec![Shape::polygon(top_face(cell, p), Style::fill(colors.top))],
        Surface::Water => {
            let glint = (center.0 + p.half_width * 0.2, center.1 - p.half_height * 0.2);
            vec![
                Shape::polygon(top_face(cell, p), Style::fill(colors.top)),
                Shape::polygon(
                    diamond(center, p.half_width * 0.6, p.half_height * 0.6),
                    Style::fill(colors.top.lerp(Rgb::WHITE, 0.25)).opacity(0.5),
                ),
                Shape::ellipse(glint, p.half_width * 0.18, p.half_height * 0.12, Style::fill(Rgb::WHITE).opacity(0.35)),
            ]
        }
        Surface::Ice => {
            let crack = ICE.darken(0.8);
            vec![
                Shape::polygon(top_face(cell, p), Style::fill(ICE)),
                Shape::line(
                    (center.0 - p.half_width * 0.4, center.1),
                    (center.0 + p.half_width * 0.1, center.1 - p.half_height * 0.3),
                    crack,
                    0.6,
                ),
            ]
        }
    }
}
