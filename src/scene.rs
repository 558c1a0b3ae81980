//! Layered, format-independent description of a finished diorama
//!
//! The compositor fills a [`Scene`]; serializers (see [`crate::export`]) turn
//! it into markup. Nothing here knows about SVG syntax.

use serde::{Deserialize, Serialize};

use crate::palette::Rgb;

pub type Point = (f64, f64);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Rgb),
    /// Reference to a gradient declared in [`Scene::gradients`]
    Gradient(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Paint,
    pub opacity: f64,
    pub stroke: Option<(Rgb, f64)>,
}

impl Style {
    pub fn fill(color: Rgb) -> Self {
        Self { fill: Paint::Solid(color), opacity: 1.0, stroke: None }
    }

    pub fn gradient(id: &str) -> Self {
        Self { fill: Paint::Gradient(id.to_string()), opacity: 1.0, stroke: None }
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn stroke(mut self, color: Rgb, width: f64) -> Self {
        self.stroke = Some((color, width));
        self
    }
}

/// Keyframe animations driven by a style sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CssAnimation {
    Spin,
    Flicker,
    Wave,
    Pulse,
    Twinkle,
    Fall,
}

impl CssAnimation {
    pub fn class(&self) -> &'static str {
        match self {
            CssAnimation::Spin => "anim-spin",
            CssAnimation::Flicker => "anim-flicker",
            CssAnimation::Wave => "anim-wave",
            CssAnimation::Pulse => "anim-pulse",
            CssAnimation::Twinkle => "anim-twinkle",
            CssAnimation::Fall => "anim-fall",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Animation {
    Css(CssAnimation),
    /// Motion along a closed path relative to the group origin
    Smil { path: Vec<Point>, duration: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Polygon { points: Vec<Point>, style: Style },
    Ellipse { center: Point, rx: f64, ry: f64, style: Style },
    Rect { origin: Point, width: f64, height: f64, style: Style },
    Line { from: Point, to: Point, color: Rgb, width: f64, opacity: f64 },
    Group { translate: Point, animation: Option<Animation>, children: Vec<Shape> },
}

impl Shape {
    pub fn polygon(points: Vec<Point>, style: Style) -> Self {
        Shape::Polygon { points, style }
    }

    pub fn circle(center: Point, r: f64, style: Style) -> Self {
        Shape::Ellipse { center, rx: r, ry: r, style }
    }

    pub fn ellipse(center: Point, rx: f64, ry: f64, style: Style) -> Self {
        Shape::Ellipse { center, rx, ry, style }
    }

    pub fn rect(origin: Point, width: f64, height: f64, style: Style) -> Self {
        Shape::Rect { origin, width, height, style }
    }

    pub fn line(from: Point, to: Point, color: Rgb, width: f64) -> Self {
        Shape::Line { from, to, color, width, opacity: 1.0 }
    }

    pub fn group(translate: Point, children: Vec<Shape>) -> Self {
        Shape::Group { translate, animation: None, children }
    }

    pub fn animated(translate: Point, animation: Animation, children: Vec<Shape>) -> Self {
        Shape::Group { translate, animation: Some(animation), children }
    }

    /// Scale about the local origin. A negative `sx` mirrors horizontally.
    pub fn scaled(&self, sx: f64, sy: f64) -> Shape {
        let sp = |(x, y): Point| (x * sx, y * sy);
        let k = (sx.abs() + sy.abs()) / 2.0;
        match self {
            Shape::Polygon { points, style } => Shape::Polygon {
                points: points.iter().copied().map(sp).collect(),
                style: style.clone(),
            },
            Shape::Ellipse { center, rx, ry, style } => Shape::Ellipse {
                center: sp(*center),
                rx: rx * sx.abs(),
                ry: ry * sy.abs(),
                style: style.clone(),
            },
            Shape::Rect { origin, width, height, style } => {
                let (x0, y0) = sp(*origin);
                let (x1, y1) = sp((origin.0 + width, origin.1 + height));
                Shape::Rect {
                    origin: (x0.min(x1), y0.min(y1)),
                    width: (x1 - x0).abs(),
                    height: (y1 - y0).abs(),
                    style: style.clone(),
                }
            }
            Shape::Line { from, to, color, width, opacity } => Shape::Line {
                from: sp(*from),
                to: sp(*to),
                color: *color,
                width: width * k,
                opacity: *opacity,
            },
            Shape::Group { translate, animation, children } => Shape::Group {
                translate: sp(*translate),
                animation: animation.as_ref().map(|a| match a {
                    Animation::Smil { path, duration } => Animation::Smil {
                        path: path.iter().copied().map(sp).collect(),
                        duration: *duration,
                    },
                    css => css.clone(),
                }),
                children: children.iter().map(|c| c.scaled(sx, sy)).collect(),
            },
        }
    }

    /// Visit this shape and every nested shape.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Shape)) {
        f(self);
        if let Shape::Group { children, .. } = self {
            for child in children {
                child.walk(f);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgb,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub id: String,
    /// Top-to-bottom when true, left-to-right otherwise
    pub vertical: bool,
    pub stops: Vec<GradientStop>,
}

/// Layers in paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerKind {
    Background,
    Terrain,
    Water,
    Decorations,
    Landmarks,
    Particles,
}

impl LayerKind {
    pub fn all() -> &'static [LayerKind] {
        &[
            LayerKind::Background,
            LayerKind::Terrain,
            LayerKind::Water,
            LayerKind::Decorations,
            LayerKind::Landmarks,
            LayerKind::Particles,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::Terrain => "terrain",
            LayerKind::Water => "water",
            LayerKind::Decorations => "decorations",
            LayerKind::Landmarks => "landmarks",
            LayerKind::Particles => "particles",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub kind: LayerKind,
    pub shapes: Vec<Shape>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub gradients: Vec<LinearGradient>,
    pub layers: Vec<Layer>,
}

impl Scene {
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    /// Every animation used anywhere in the scene.
    pub fn animations(&self) -> Vec<&Animation> {
        let mut found = Vec::new();
        for layer in &self.layers {
            for shape in &layer.shapes {
                shape.walk(&mut |s| {
                    if let Shape::Group { animation: Some(a), .. } = s {
                        found.push(a);
                    }
                });
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_mirrors_rects() {
        let rect = Shape::rect((1.0, -4.0), 2.0, 4.0, Style::fill(Rgb::WHITE));
        match rect.scaled(-2.0, 1.0) {
            Shape::Rect { origin, width, height, .. } => {
                assert_eq!(origin, (-6.0, -4.0));
                assert_eq!((width, height), (4.0, 4.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_animations_found_in_nested_groups() {
        let inner = Shape::animated((0.0, 0.0), Animation::Css(CssAnimation::Spin), Vec::new());
        let scene = Scene {
            width: 10.0,
            height: 10.0,
            title: String::new(),
            gradients: Vec::new(),
            layers: vec![Layer { kind: LayerKind::Decorations, shapes: vec![Shape::group((1.0, 1.0), vec![inner])] }],
        };
        assert_eq!(scene.animations(), vec![&Animation::Css(CssAnimation::Spin)]);
    }
}
