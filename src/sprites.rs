//! Vector sprites for decorations and landmarks
//!
//! Each kind maps to one recipe through an exhaustive `match`, so adding a
//! kind without a drawing is a compile error. Sprites are drawn in local
//! coordinates with the ground contact point at the origin and negative y
//! pointing up.

use crate::decorations::DecorationKind;
use crate::landmarks::LandmarkKind;
use crate::palette::{ColorMode, Rgb};
use crate::scene::{Animation, CssAnimation, Point, Shape, Style};

/// A drawable sprite in local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub shapes: Vec<Shape>,
    /// Whole-sprite motion; keyframed parts live inside `shapes`
    pub motion: Option<Animation>,
}

impl Sprite {
    fn still(shapes: Vec<Shape>) -> Self {
        Self { shapes, motion: None }
    }

    fn moving(shapes: Vec<Shape>, path: Vec<Point>, duration: f64) -> Self {
        Self { shapes, motion: Some(Animation::Smil { path, duration }) }
    }

    /// Instantiate at `at` in scene coordinates.
    pub fn place(&self, at: Point) -> Shape {
        match &self.motion {
            Some(a) => Shape::animated(at, a.clone(), self.shapes.clone()),
            None => Shape::group(at, self.shapes.clone()),
        }
    }

    pub fn scaled(&self, sx: f64, sy: f64) -> Sprite {
        Sprite {
            shapes: self.shapes.iter().map(|s| s.scaled(sx, sy)).collect(),
            motion: self.motion.clone(),
        }
    }

    /// True if any part of the sprite is keyframed.
    pub fn has_css(&self) -> bool {
        let mut found = false;
        for s in &self.shapes {
            s.walk(&mut |s| {
                if let Shape::Group { animation: Some(Animation::Css(_)), .. } = s {
                    found = true;
                }
            });
        }
        found
    }
}

/// Scale for each of the four decoration variants. Odd variants are mirrored.
pub fn variant_scale(variant: u8) -> (f64, f64) {
    match variant % 4 {
        0 => (0.85, 0.85),
        1 => (-1.0, 1.0),
        2 => (1.1, 1.1),
        _ => (-0.95, 0.95),
    }
}

/// Sprite ink for one colour mode.
#[derive(Clone, Copy, Debug)]
pub struct SpriteColors {
    pub leaf: Rgb,
    pub leaf_dark: Rgb,
    pub trunk: Rgb,
    pub wall: Rgb,
    pub roof: Rgb,
    pub stone: Rgb,
    pub snow: Rgb,
    pub flower: Rgb,
    pub accent: Rgb,
    pub water: Rgb,
    pub ink: Rgb,
    pub fire: Rgb,
}

impl SpriteColors {
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Dark => Self {
                leaf: Rgb::new(46, 125, 70),
                leaf_dark: Rgb::new(30, 90, 52),
                trunk: Rgb::new(92, 64, 44),
                wall: Rgb::new(180, 160, 130),
                roof: Rgb::new(150, 60, 50),
                stone: Rgb::new(120, 125, 135),
                snow: Rgb::new(225, 235, 245),
                flower: Rgb::new(230, 120, 170),
                accent: Rgb::new(255, 200, 80),
                water: Rgb::new(60, 120, 190),
                ink: Rgb::new(20, 24, 30),
                fire: Rgb::new(255, 140, 40),
            },
            ColorMode::Light => Self {
                leaf: Rgb::new(70, 160, 80),
                leaf_dark: Rgb::new(45, 120, 60),
                trunk: Rgb::new(120, 85, 55),
                wall: Rgb::new(235, 220, 190),
                roof: Rgb::new(190, 80, 60),
                stone: Rgb::new(160, 165, 175),
                snow: Rgb::new(250, 252, 255),
                flower: Rgb::new(240, 110, 160),
                accent: Rgb::new(250, 190, 40),
                water: Rgb::new(90, 160, 230),
                ink: Rgb::new(60, 60, 70),
                fire: Rgb::new(255, 120, 30),
            },
        }
    }
}

/// All sprites for one colour mode, built once per render.
pub struct SpriteBook {
    pub mode: ColorMode,
    decorations: Vec<Sprite>,
    landmarks: Vec<Sprite>,
}

impl SpriteBook {
    pub fn new(mode: ColorMode) -> Self {
        let c = SpriteColors::for_mode(mode);
        Self {
            mode,
            decorations: DecorationKind::ALL.iter().map(|k| decoration_recipe(*k, &c)).collect(),
            landmarks: LandmarkKind::ALL.iter().map(|k| landmark_recipe(*k, &c)).collect(),
        }
    }

    pub fn decoration(&self, kind: DecorationKind, variant: u8) -> Sprite {
        let (sx, sy) = variant_scale(variant);
        self.decorations[kind.index()].scaled(sx, sy)
    }

    pub fn landmark(&self, kind: LandmarkKind) -> &Sprite {
        &self.landmarks[kind.index()]
    }
}

// =============================================================================
// BUILDING BLOCKS
// =============================================================================

fn poly(points: &[Point], color: Rgb) -> Shape {
    Shape::polygon(points.to_vec(), Style::fill(color))
}

fn trunk(height: f64, width: f64, color: Rgb) -> Shape {
    Shape::rect((-width / 2.0, -height), width, height, Style::fill(color))
}

fn round_tree(trunk_h: f64, r: f64, leaf: Rgb, shade: Rgb, bark: Rgb) -> Vec<Shape> {
    let cy = -trunk_h - r * 0.8;
    vec![
        trunk(trunk_h, 1.6, bark),
        Shape::circle((0.0, cy), r, Style::fill(shade)),
        Shape::circle((-r * 0.25, cy - r * 0.2), r * 0.7, Style::fill(leaf)),
    ]
}

fn cone_tree(height: f64, half_w: f64, leaf: Rgb, shade: Rgb, bark: Rgb) -> Vec<Shape> {
    let base = -2.0;
    vec![
        trunk(2.5, 1.4, bark),
        poly(&[(-half_w, base), (0.0, base - height * 0.7), (half_w, base)], shade),
        poly(
            &[(-half_w * 0.75, base - height * 0.35), (0.0, base - height), (half_w * 0.75, base - height * 0.35)],
            leaf,
        ),
    ]
}

fn snowcap(height: f64, half_w: f64, snow: Rgb) -> Shape {
    poly(
        &[(-half_w * 0.35, -2.0 - height * 0.8), (0.0, -2.0 - height), (half_w * 0.35, -2.0 - height * 0.8)],
        snow,
    )
}

fn cabin(w: f64, h: f64, roof_h: f64, wall: Rgb, roof: Rgb, ink: Rgb) -> Vec<Shape> {
    vec![
        Shape::rect((-w / 2.0, -h), w, h, Style::fill(wall)),
        poly(&[(-w / 2.0 - 1.0, -h), (0.0, -h - roof_h), (w / 2.0 + 1.0, -h)], roof),
        Shape::rect((-w * 0.12, -h * 0.55), w * 0.24, h * 0.55, Style::fill(ink)),
    ]
}

fn keyframed(pivot: Point, anim: CssAnimation, children: Vec<Shape>) -> Shape {
    Shape::animated(pivot, Animation::Css(anim), children)
}

fn blades(len: f64, color: Rgb) -> Vec<Shape> {
    vec![
        Shape::line((-len, 0.0), (len, 0.0), color, 1.2),
        Shape::line((0.0, -len), (0.0, len), color, 1.2),
    ]
}

fn flame(c: &SpriteColors) -> Shape {
    keyframed(
        (0.0, -1.5),
        CssAnimation::Flicker,
        vec![
            poly(&[(-1.6, 0.0), (0.0, -4.0), (1.6, 0.0)], c.fire),
            poly(&[(-0.8, 0.0), (0.0, -2.4), (0.8, 0.0)], c.accent),
        ],
    )
}

fn bird_body(c: &SpriteColors) -> Vec<Shape> {
    vec![
        Shape::line((-2.5, -14.0), (0.0, -12.8), c.ink, 0.8),
        Shape::line((0.0, -12.8), (2.5, -14.0), c.ink, 0.8),
    ]
}

fn flower_head(x: f64, y: f64, color: Rgb, center: Rgb, stem: Rgb) -> Vec<Shape> {
    vec![
        Shape::line((x, 0.0), (x, y), stem, 0.5),
        Shape::circle((x, y), 1.1, Style::fill(color)),
        Shape::circle((x, y), 0.45, Style::fill(center)),
    ]
}

// =============================================================================
// DECORATIONS
// =============================================================================

pub fn decoration_recipe(kind: DecorationKind, c: &SpriteColors) -> Sprite {
    use DecorationKind::*;
    match kind {
        Grass => Sprite::still(vec![
            Shape::line((-1.5, 0.0), (-2.0, -3.0), c.leaf, 0.6),
            Shape::line((0.0, 0.0), (0.2, -3.8), c.leaf, 0.6),
            Shape::line((1.5, 0.0), (2.1, -2.8), c.leaf_dark, 0.6),
        ]),
        Flower => Sprite::still(
            [flower_head(-1.2, -3.0, c.flower, c.accent, c.leaf), flower_head(1.3, -2.4, c.accent, c.flower, c.leaf)]
                .concat(),
        ),
        Bush => Sprite::still(vec![
            Shape::ellipse((0.0, -2.0), 3.4, 2.4, Style::fill(c.leaf_dark)),
            Shape::ellipse((-0.8, -2.6), 2.2, 1.6, Style::fill(c.leaf)),
        ]),
        Rock => Sprite::still(vec![poly(
            &[(-2.6, 0.0), (-1.8, -2.2), (0.6, -2.8), (2.4, -1.0), (2.0, 0.0)],
            c.stone,
        )]),
        Boulder => Sprite::still(vec![
            poly(&[(-4.5, 0.0), (-3.6, -4.0), (0.0, -5.5), (3.8, -3.5), (4.2, 0.0)], c.stone.darken(0.85)),
            poly(&[(-3.0, -3.6), (0.0, -5.0), (2.4, -3.6), (-0.4, -2.6)], c.stone),
        ]),
        Mushroom => Sprite::still(vec![
            Shape::rect((-0.5, -2.0), 1.0, 2.0, Style::fill(c.wall)),
            Shape::ellipse((0.0, -2.2), 2.0, 1.2, Style::fill(c.roof)),
            Shape::circle((-0.6, -2.5), 0.3, Style::fill(Rgb::WHITE)),
        ]),
        Sapling => Sprite::still(round_tree(2.5, 2.2, c.leaf, c.leaf_dark, c.trunk)),
        Pine => Sprite::still(cone_tree(11.0, 4.0, c.leaf, c.leaf_dark, c.trunk)),
        Oak => Sprite::still(round_tree(4.0, 4.5, c.leaf, c.leaf_dark, c.trunk)),
        Birch => Sprite::still(
            [
                vec![trunk(7.0, 1.2, c.snow)],
                vec![Shape::ellipse((0.0, -9.5), 3.0, 4.0, Style::fill(c.leaf))],
                vec![Shape::line((-0.6, -2.0), (0.6, -2.0), c.ink, 0.4)],
            ]
            .concat(),
        ),
        GiantPine => Sprite::still(cone_tree(17.0, 5.5, c.leaf, c.leaf_dark, c.trunk)),
        Reeds => Sprite::still(vec![
            Shape::line((-1.0, 0.0), (-1.4, -4.0), c.leaf_dark, 0.5),
            Shape::line((0.0, 0.0), (0.2, -5.0), c.leaf_dark, 0.5),
            Shape::line((1.0, 0.0), (1.6, -3.6), c.leaf_dark, 0.5),
            Shape::ellipse((0.2, -5.0), 0.5, 1.0, Style::fill(c.trunk)),
        ]),
        LilyPad => Sprite::still(vec![
            Shape::ellipse((0.0, 0.0), 2.6, 1.3, Style::fill(c.leaf)),
            Shape::circle((0.8, -0.4), 0.6, Style::fill(c.flower)),
        ]),
        Bird => Sprite::moving(bird_body(c), vec![(0.0, 0.0), (6.0, -3.0), (12.0, 0.0), (6.0, 3.0), (0.0, 0.0)], 8.0),
        Butterfly => Sprite::moving(
            vec![
                Shape::ellipse((-0.9, -6.0), 1.0, 0.7, Style::fill(c.flower)),
                Shape::ellipse((0.9, -6.0), 1.0, 0.7, Style::fill(c.accent)),
            ],
            vec![(0.0, 0.0), (2.0, -2.0), (4.0, 0.0), (2.0, 1.0), (0.0, 0.0)],
            5.0,
        ),
        Duck => Sprite::moving(
            vec![
                Shape::ellipse((0.0, -1.0), 2.0, 1.1, Style::fill(c.wall)),
                Shape::circle((1.6, -2.2), 0.8, Style::fill(c.leaf_dark)),
                poly(&[(2.3, -2.2), (3.2, -2.0), (2.3, -1.8)], c.accent),
            ],
            vec![(0.0, 0.0), (4.0, 1.0), (0.0, 2.0), (-4.0, 1.0), (0.0, 0.0)],
            10.0,
        ),
        Fish => Sprite::moving(
            vec![
                Shape::ellipse((0.0, -1.0), 1.6, 0.7, Style::fill(c.accent)),
                poly(&[(-1.4, -1.0), (-2.6, -1.8), (-2.6, -0.2)], c.accent),
            ],
            vec![(0.0, 0.0), (2.0, -4.0), (4.0, 0.0), (0.0, 0.0)],
            3.0,
        ),
        Boat => Sprite::moving(
            vec![
                poly(&[(-3.5, -1.5), (3.5, -1.5), (2.5, 0.0), (-2.5, 0.0)], c.trunk),
                Shape::line((0.0, -1.5), (0.0, -7.0), c.ink, 0.5),
                poly(&[(0.2, -6.8), (3.0, -2.0), (0.2, -2.0)], c.snow),
            ],
            vec![(0.0, 0.0), (5.0, 2.5), (0.0, 0.0)],
            12.0,
        ),
        Tent => Sprite::still(vec![
            poly(&[(-4.0, 0.0), (0.0, -6.0), (4.0, 0.0)], c.accent.darken(0.8)),
            poly(&[(-0.8, 0.0), (0.0, -2.5), (0.8, 0.0)], c.ink),
        ]),
        Hut => Sprite::still(cabin(6.0, 4.0, 3.5, c.trunk.lerp(c.wall, 0.4), c.accent.darken(0.7), c.ink)),
        House => Sprite::still(cabin(8.0, 5.5, 4.5, c.wall, c.roof, c.ink)),
        Barn => Sprite::still(cabin(10.0, 6.0, 4.0, c.roof.darken(0.85), c.ink.lerp(c.roof, 0.4), c.wall)),
        Well => Sprite::still(vec![
            Shape::ellipse((0.0, -1.5), 2.6, 1.4, Style::fill(c.stone)),
            Shape::ellipse((0.0, -2.0), 1.8, 0.8, Style::fill(c.water)),
            Shape::line((-2.2, -1.5), (-2.2, -6.0), c.trunk, 0.6),
            Shape::line((2.2, -1.5), (2.2, -6.0), c.trunk, 0.6),
            poly(&[(-3.0, -6.0), (0.0, -8.0), (3.0, -6.0)], c.roof),
        ]),
        Fence => Sprite::still(vec![
            Shape::line((-4.0, -1.0), (4.0, 1.0), c.trunk, 0.6),
            Shape::line((-4.0, -2.5), (4.0, -0.5), c.trunk, 0.6),
            Shape::line((-3.5, 0.0), (-3.5, -3.2), c.trunk, 0.7),
            Shape::line((0.0, 0.8), (0.0, -2.4), c.trunk, 0.7),
            Shape::line((3.5, 1.6), (3.5, -1.6), c.trunk, 0.7),
        ]),
        Crops => Sprite::still(
            (0..4)
                .map(|i| {
                    let x = -3.0 + i as f64 * 2.0;
                    Shape::line((x, 0.0), (x + 0.5, -3.0), c.accent.lerp(c.leaf, 0.4), 0.9)
                })
                .collect(),
        ),
        Dock => Sprite::still(vec![
            poly(&[(-1.0, -1.0), (5.0, 2.0), (6.0, 1.5), (0.0, -1.5)], c.trunk),
            Shape::line((5.0, 2.0), (5.0, 4.0), c.trunk.darken(0.7), 0.6),
        ]),
        Woodpile => Sprite::still(vec![
            Shape::circle((-1.2, -1.0), 1.0, Style::fill(c.trunk)),
            Shape::circle((1.0, -1.0), 1.0, Style::fill(c.trunk)),
            Shape::circle((-0.1, -2.7), 1.0, Style::fill(c.trunk.darken(0.85))),
        ]),
        Tower => Sprite::still(vec![
            Shape::rect((-2.0, -11.0), 4.0, 11.0, Style::fill(c.stone)),
            poly(&[(-2.8, -11.0), (0.0, -15.0), (2.8, -11.0)], c.roof),
            Shape::rect((-0.6, -8.0), 1.2, 1.8, Style::fill(c.accent)),
        ]),
        Windmill => Sprite::still(vec![
            poly(&[(-2.5, 0.0), (-1.6, -9.0), (1.6, -9.0), (2.5, 0.0)], c.wall),
            poly(&[(-2.0, -9.0), (0.0, -11.0), (2.0, -9.0)], c.roof),
            keyframed((0.0, -9.5), CssAnimation::Spin, blades(5.0, c.ink)),
        ]),
        Campfire => Sprite::still(vec![
            Shape::line((-2.2, 0.0), (2.2, -1.0), c.trunk, 0.8),
            Shape::line((-2.2, -1.0), (2.2, 0.0), c.trunk, 0.8),
            flame(c),
        ]),
        Waterwheel => Sprite::still(vec![
            Shape::rect((-3.0, -5.0), 3.0, 5.0, Style::fill(c.wall)),
            keyframed(
                (2.0, -3.0),
                CssAnimation::Spin,
                [vec![Shape::circle((0.0, 0.0), 3.0, Style::fill(c.trunk).opacity(0.0).stroke(c.trunk, 0.6))], blades(3.0, c.trunk)]
                    .concat(),
            ),
        ]),
        Flag => Sprite::still(vec![
            Shape::line((0.0, 0.0), (0.0, -10.0), c.ink, 0.5),
            keyframed((0.0, -10.0), CssAnimation::Wave, vec![poly(&[(0.0, 0.0), (4.5, 1.2), (0.0, 2.6)], c.roof)]),
        ]),
        Snowman => Sprite::still(vec![
            Shape::circle((0.0, -1.8), 1.8, Style::fill(c.snow)),
            Shape::circle((0.0, -4.5), 1.2, Style::fill(c.snow)),
            poly(&[(0.3, -4.5), (1.6, -4.3), (0.3, -4.1)], c.fire),
        ]),
        SnowyPine => {
            let mut shapes = cone_tree(11.0, 4.0, c.leaf_dark, c.leaf_dark.darken(0.8), c.trunk);
            shapes.push(snowcap(11.0, 4.0, c.snow));
            Sprite::still(shapes)
        }
        Sled => Sprite::still(vec![
            poly(&[(-2.5, -1.5), (2.5, -1.5), (2.5, -0.8), (-2.5, -0.8)], c.roof),
            Shape::line((-3.0, 0.0), (3.2, 0.0), c.ink, 0.5),
        ]),
        Igloo => Sprite::still(vec![
            Shape::ellipse((0.0, 0.0), 4.5, 4.0, Style::fill(c.snow).stroke(c.stone, 0.3)),
            Shape::ellipse((2.5, -0.5), 1.3, 1.6, Style::fill(c.ink)),
        ]),
        CherryTree => Sprite::still(round_tree(4.0, 4.0, c.flower, c.flower.darken(0.85), c.trunk)),
        Tulips => Sprite::still(
            [
                flower_head(-1.5, -3.0, c.roof, c.roof, c.leaf),
                flower_head(0.0, -3.6, c.accent, c.accent, c.leaf),
                flower_head(1.5, -2.8, c.flower, c.flower, c.leaf),
            ]
            .concat(),
        ),
        Beehive => Sprite::still(vec![
            Shape::line((0.0, 0.0), (0.0, -2.0), c.trunk, 0.6),
            Shape::ellipse((0.0, -3.6), 2.0, 1.8, Style::fill(c.accent)),
            Shape::line((-1.8, -3.6), (1.8, -3.6), c.trunk, 0.3),
        ]),
        Sunflower => Sprite::still(vec![
            Shape::line((0.0, 0.0), (0.0, -6.0), c.leaf, 0.6),
            Shape::circle((0.0, -6.5), 1.8, Style::fill(c.accent)),
            Shape::circle((0.0, -6.5), 0.8, Style::fill(c.trunk)),
        ]),
        Picnic => Sprite::still(vec![
            poly(&[(-3.5, 0.0), (0.0, -1.8), (3.5, 0.0), (0.0, 1.8)], c.roof),
            Shape::line((-1.75, -0.9), (1.75, 0.9), Rgb::WHITE, 0.4),
            Shape::rect((0.5, -1.5), 1.4, 1.0, Style::fill(c.trunk)),
        ]),
        MapleTree => Sprite::still(round_tree(4.0, 4.5, c.fire, c.roof, c.trunk)),
        Pumpkins => Sprite::still(vec![
            Shape::ellipse((-1.2, -1.0), 1.5, 1.1, Style::fill(c.fire)),
            Shape::ellipse((1.3, -0.8), 1.1, 0.9, Style::fill(c.fire.darken(0.9))),
            Shape::line((-1.2, -2.0), (-1.0, -2.6), c.leaf_dark, 0.4),
        ]),
        HayBale => Sprite::still(vec![
            Shape::rect((-2.5, -2.6), 5.0, 2.6, Style::fill(c.accent.darken(0.9))),
            Shape::line((-2.5, -1.3), (2.5, -1.3), c.trunk, 0.3),
        ]),
        Scarecrow => Sprite::still(vec![
            Shape::line((0.0, 0.0), (0.0, -7.0), c.trunk, 0.6),
            Shape::line((-3.0, -5.0), (3.0, -5.0), c.trunk, 0.6),
            Shape::circle((0.0, -7.6), 1.0, Style::fill(c.accent)),
            poly(&[(-1.5, -8.2), (0.0, -9.6), (1.5, -8.2)], c.trunk.darken(0.7)),
        ]),
    }
}

// =============================================================================
// LANDMARKS
// =============================================================================

pub fn landmark_recipe(kind: LandmarkKind, c: &SpriteColors) -> Sprite {
    match kind {
        LandmarkKind::Lighthouse => Sprite::still(vec![
            poly(&[(-3.0, 0.0), (-2.0, -18.0), (2.0, -18.0), (3.0, 0.0)], Rgb::WHITE),
            poly(&[(-2.6, -6.0), (-2.3, -12.0), (2.3, -12.0), (2.6, -6.0)], c.roof),
            Shape::rect((-2.0, -21.0), 4.0, 3.0, Style::fill(c.accent)),
            poly(&[(-2.6, -21.0), (0.0, -24.0), (2.6, -21.0)], c.ink),
            keyframed(
                (0.0, -19.5),
                CssAnimation::Pulse,
                vec![poly(&[(0.0, 0.0), (14.0, -3.0), (14.0, 3.0)], c.accent)],
            ),
        ]),
        LandmarkKind::StoneCircle => Sprite::still(
            (0..6)
                .map(|i| {
                    let a = i as f64 * std::f64::consts::TAU / 6.0;
                    let (x, y) = (a.cos() * 6.0, a.sin() * 3.0);
                    Shape::rect((x - 0.9, y - 5.0), 1.8, 5.0, Style::fill(c.stone))
                })
                .chain(std::iter::once(Shape::rect((-3.0, -6.0), 6.0, 1.2, Style::fill(c.stone.darken(0.8)))))
                .collect(),
        ),
        LandmarkKind::Observatory => Sprite::still(vec![
            Shape::rect((-5.0, -8.0), 10.0, 8.0, Style::fill(c.wall)),
            Shape::ellipse((0.0, -8.0), 5.0, 5.0, Style::fill(c.stone)),
            poly(&[(0.5, -10.0), (6.0, -16.0), (7.0, -15.0), (1.5, -9.0)], c.ink),
            Shape::rect((-1.0, -4.0), 2.0, 4.0, Style::fill(c.ink)),
        ]),
        LandmarkKind::AncientTree => Sprite::still(vec![
            poly(&[(-3.0, 0.0), (-1.5, -10.0), (1.5, -10.0), (3.0, 0.0)], c.trunk),
            Shape::circle((-5.0, -14.0), 6.0, Style::fill(c.leaf_dark)),
            Shape::circle((5.0, -14.0), 6.0, Style::fill(c.leaf_dark)),
            Shape::circle((0.0, -19.0), 7.0, Style::fill(c.leaf)),
            Shape::circle((2.0, -20.0), 1.0, Style::fill(c.accent)),
        ]),
        LandmarkKind::Castle => Sprite::still(vec![
            Shape::rect((-9.0, -10.0), 18.0, 10.0, Style::fill(c.stone)),
            Shape::rect((-11.0, -16.0), 5.0, 16.0, Style::fill(c.stone.darken(0.9))),
            Shape::rect((6.0, -16.0), 5.0, 16.0, Style::fill(c.stone.darken(0.9))),
            poly(&[(-11.5, -16.0), (-8.5, -21.0), (-5.5, -16.0)], c.roof),
            poly(&[(5.5, -16.0), (8.5, -21.0), (11.5, -16.0)], c.roof),
            Shape::rect((-2.0, -6.0), 4.0, 6.0, Style::fill(c.ink)),
            Shape::line((0.0, -10.0), (0.0, -18.0), c.ink, 0.5),
            keyframed((0.0, -18.0), CssAnimation::Wave, vec![poly(&[(0.0, 0.0), (4.0, 1.0), (0.0, 2.2)], c.accent)]),
        ]),
        LandmarkKind::Cathedral => Sprite::still(vec![
            Shape::rect((-7.0, -12.0), 14.0, 12.0, Style::fill(c.wall)),
            poly(&[(-8.0, -12.0), (0.0, -18.0), (8.0, -12.0)], c.roof),
            Shape::rect((-2.0, -26.0), 4.0, 14.0, Style::fill(c.wall.darken(0.9))),
            poly(&[(-2.5, -26.0), (0.0, -32.0), (2.5, -26.0)], c.roof),
            Shape::circle((0.0, -8.0), 2.2, Style::fill(c.accent).stroke(c.ink, 0.4)),
        ]),
        LandmarkKind::Pagoda => Sprite::still(
            (0..3)
                .flat_map(|tier| {
                    let t = tier as f64;
                    let y = -t * 7.0;
                    let w = 7.0 - t * 1.6;
                    vec![
                        Shape::rect((-w * 0.7, y - 5.0), w * 1.4, 5.0, Style::fill(c.wall)),
                        poly(&[(-w - 1.5, y - 5.0), (0.0, y - 8.0), (w + 1.5, y - 5.0)], c.roof),
                    ]
                })
                .collect(),
        ),
        LandmarkKind::WizardTower => Sprite::still(vec![
            poly(&[(-3.5, 0.0), (-2.5, -22.0), (2.5, -22.0), (3.5, 0.0)], c.stone.lerp(c.flower, 0.2)),
            poly(&[(-4.0, -22.0), (0.0, -32.0), (4.0, -22.0)], Rgb::new(90, 60, 160)),
            Shape::rect((-0.8, -16.0), 1.6, 2.4, Style::fill(c.accent)),
            keyframed(
                (0.0, -33.0),
                CssAnimation::Twinkle,
                vec![Shape::circle((0.0, 0.0), 1.4, Style::fill(c.accent))],
            ),
        ]),
        LandmarkKind::DragonLair => Sprite::still(vec![
            poly(&[(-12.0, 0.0), (-6.0, -12.0), (0.0, -16.0), (7.0, -11.0), (12.0, 0.0)], c.stone.darken(0.7)),
            Shape::ellipse((0.0, -3.5), 4.0, 3.5, Style::fill(c.ink)),
            Shape::circle((-1.2, -4.0), 0.5, Style::fill(c.fire)),
            Shape::circle((1.2, -4.0), 0.5, Style::fill(c.fire)),
            keyframed(
                (0.0, -16.0),
                CssAnimation::Flicker,
                vec![poly(&[(-1.5, 0.0), (0.0, -5.0), (1.5, 0.0)], c.fire)],
            ),
        ]),
        LandmarkKind::FloatingIsland => Sprite::moving(
            vec![
                poly(&[(-8.0, -18.0), (8.0, -18.0), (3.0, -10.0), (0.0, -7.0), (-3.0, -10.0)], c.stone.darken(0.8)),
                Shape::ellipse((0.0, -18.0), 8.0, 2.5, Style::fill(c.leaf)),
                Shape::circle((-3.0, -22.0), 2.8, Style::fill(c.leaf_dark)),
                Shape::line((5.0, -18.0), (5.0, -13.0), c.water, 0.8),
            ],
            vec![(0.0, 0.0), (0.0, -3.0), (0.0, 0.0)],
            6.0,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorations::AnimationClass;

    #[test]
    fn test_every_kind_has_a_sprite() {
        for mode in ColorMode::all() {
            let book = SpriteBook::new(*mode);
            for kind in DecorationKind::ALL {
                assert!(!book.decoration(kind, 0).shapes.is_empty(), "{:?}", kind);
            }
            for kind in LandmarkKind::ALL {
                assert!(!book.landmark(kind).shapes.is_empty(), "{:?}", kind);
            }
        }
    }

    #[test]
    fn test_animation_class_matches_sprite() {
        let book = SpriteBook::new(ColorMode::Dark);
        for kind in DecorationKind::ALL {
            let sprite = book.decoration(kind, 1);
            match kind.animation() {
                Some(AnimationClass::Motion) => assert!(sprite.motion.is_some(), "{:?}", kind),
                Some(AnimationClass::Css) => assert!(sprite.has_css(), "{:?}", kind),
                None => assert!(sprite.motion.is_none() && !sprite.has_css(), "{:?}", kind),
            }
        }
    }

    #[test]
    fn test_mirrored_variant() {
        let book = SpriteBook::new(ColorMode::Light);
        let plain = book.decoration(DecorationKind::Rock, 2);
        let mirrored = book.decoration(DecorationKind::Rock, 3);
        let (Shape::Polygon { points: a, .. }, Shape::Polygon { points: b, .. }) = (&plain.shapes[0], &mirrored.shapes[0])
        else {
            panic!("rock is a polygon");
        };
        assert!(a[0].0 < 0.0);
        assert!(b[0].0 > 0.0);
    }

    #[test]
    fn test_place_wraps_motion() {
        let book = SpriteBook::new(ColorMode::Dark);
        match book.decoration(DecorationKind::Bird, 0).place((10.0, 20.0)) {
            Shape::Group { translate, animation: Some(Animation::Smil { .. }), .. } => {
                assert_eq!(translate, (10.0, 20.0))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
