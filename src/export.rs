//! SVG serialization of a [`Scene`]
//!
//! Keyframes are emitted only for the CSS animations the scene actually uses.
//! Numbers are printed with at most two decimals, so identical scenes always
//! serialize to identical bytes.

use std::collections::BTreeSet;
use std::fmt::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::scene::{Animation, CssAnimation, LinearGradient, Paint, Point, Scene, Shape, Style};

/// Serialize a scene into a standalone SVG document.
pub fn to_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    // fmt::Write for String never fails.
    let _ = write_scene(&mut svg, scene);
    svg
}

pub fn write_svg(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let svg = to_svg(scene);
    std::fs::write(path, &svg)?;
    tracing::debug!(path = %path.display(), bytes = svg.len(), "wrote svg");
    Ok(())
}

fn write_scene(svg: &mut String, scene: &Scene) -> fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img">"#,
        w = num(scene.width),
        h = num(scene.height),
    )?;
    writeln!(svg, "<title>{}</title>", escape(&scene.title))?;

    writeln!(svg, "<defs>")?;
    for gradient in &scene.gradients {
        write_gradient(svg, gradient)?;
    }
    writeln!(svg, "</defs>")?;

    let used: BTreeSet<CssAnimation> = scene
        .animations()
        .into_iter()
        .filter_map(|a| match a {
            Animation::Css(css) => Some(*css),
            Animation::Smil { .. } => None,
        })
        .collect();
    if !used.is_empty() {
        writeln!(svg, "<style>")?;
        for anim in used {
            writeln!(svg, "{}", keyframes(anim))?;
        }
        writeln!(svg, "</style>")?;
    }

    for layer in &scene.layers {
        writeln!(svg, r#"<g id="layer-{}">"#, layer.kind.id())?;
        for shape in &layer.shapes {
            write_shape(svg, shape)?;
        }
        writeln!(svg, "</g>")?;
    }

    writeln!(svg, "</svg>")
}

fn write_gradient(svg: &mut String, g: &LinearGradient) -> fmt::Result {
    let (x2, y2) = if g.vertical { (0, 1) } else { (1, 0) };
    writeln!(
        svg,
        r#"<linearGradient id="{}" x1="0" y1="0" x2="{}" y2="{}">"#,
        escape(&g.id),
        x2,
        y2
    )?;
    for stop in &g.stops {
        writeln!(
            svg,
            r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
            num(stop.offset),
            stop.color,
            num(stop.opacity)
        )?;
    }
    writeln!(svg, "</linearGradient>")
}

fn write_shape(svg: &mut String, shape: &Shape) -> fmt::Result {
    match shape {
        Shape::Polygon { points, style } => {
            writeln!(svg, r#"<polygon points="{}"{}/>"#, point_list(points), style_attrs(style))
        }
        Shape::Ellipse { center, rx, ry, style } => {
            if (rx - ry).abs() < f64::EPSILON {
                writeln!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                    num(center.0),
                    num(center.1),
                    num(*rx),
                    style_attrs(style)
                )
            } else {
                writeln!(
                    svg,
                    r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}"{}/>"#,
                    num(center.0),
                    num(center.1),
                    num(*rx),
                    num(*ry),
                    style_attrs(style)
                )
            }
        }
        Shape::Rect { origin, width, height, style } => writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}"{}/>"#,
            num(origin.0),
            num(origin.1),
            num(*width),
            num(*height),
            style_attrs(style)
        ),
        Shape::Line { from, to, color, width, opacity } => {
            write!(
                svg,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-linecap="round""#,
                num(from.0),
                num(from.1),
                num(to.0),
                num(to.1),
                color,
                num(*width)
            )?;
            if *opacity < 1.0 {
                write!(svg, r#" stroke-opacity="{}""#, num(*opacity))?;
            }
            writeln!(svg, "/>")
        }
        Shape::Group { translate, animation, children } => {
            writeln!(svg, r#"<g transform="translate({} {})">"#, num(translate.0), num(translate.1))?;
            match animation {
                None => {
                    for child in children {
                        write_shape(svg, child)?;
                    }
                }
                // The class goes on an inner group so its transform does not
                // replace the translation.
                Some(Animation::Css(css)) => {
                    writeln!(svg, r#"<g class="{}">"#, css.class())?;
                    for child in children {
                        write_shape(svg, child)?;
                    }
                    writeln!(svg, "</g>")?;
                }
                Some(Animation::Smil { path, duration }) => {
                    writeln!(svg, "<g>")?;
                    for child in children {
                        write_shape(svg, child)?;
                    }
                    writeln!(
                        svg,
                        r#"<animateMotion path="{}" dur="{}s" repeatCount="indefinite"/>"#,
                        motion_path(path),
                        num(*duration)
                    )?;
                    writeln!(svg, "</g>")?;
                }
            }
            writeln!(svg, "</g>")
        }
    }
}

fn style_attrs(style: &Style) -> String {
    let mut attrs = match &style.fill {
        Paint::Solid(color) => format!(r#" fill="{}""#, color),
        Paint::Gradient(id) => format!(r#" fill="url(#{})""#, escape(id)),
    };
    if style.opacity < 1.0 {
        attrs.push_str(&format!(r#" fill-opacity="{}""#, num(style.opacity)));
    }
    if let Some((color, width)) = style.stroke {
        attrs.push_str(&format!(r#" stroke="{}" stroke-width="{}""#, color, num(width)));
    }
    attrs
}

fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn motion_path(points: &[Point]) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            d.push(' ');
        }
        d.push_str(&format!("{}{} {}", cmd, num(*x), num(*y)));
    }
    d
}

fn keyframes(anim: CssAnimation) -> String {
    let (name, frames, timing) = match anim {
        CssAnimation::Spin => (
            "spin",
            "from{transform:rotate(0deg)}to{transform:rotate(360deg)}",
            "4s linear infinite",
        ),
        CssAnimation::Flicker => (
            "flicker",
            "0%,100%{opacity:1;transform:scaleY(1)}50%{opacity:.65;transform:scaleY(.85)}",
            ".8s ease-in-out infinite",
        ),
        CssAnimation::Wave => (
            "wave",
            "from{transform:skewY(0deg)}to{transform:skewY(-10deg)}",
            "1.6s ease-in-out infinite alternate",
        ),
        CssAnimation::Pulse => (
            "pulse",
            "from{opacity:.4;transform:scale(.9)}to{opacity:1;transform:scale(1.1)}",
            "2.4s ease-in-out infinite alternate",
        ),
        CssAnimation::Twinkle => ("twinkle", "0%,100%{opacity:1}50%{opacity:.2}", "3s ease-in-out infinite"),
        CssAnimation::Fall => (
            "fall",
            "from{transform:translate(0,0);opacity:0}10%{opacity:1}to{transform:translate(-24px,320px);opacity:0}",
            "9s linear infinite",
        ),
    };
    format!(
        "@keyframes {name}{{{frames}}}\n.{class}{{animation:{name} {timing};transform-box:fill-box;transform-origin:center}}",
        name = name,
        frames = frames,
        class = anim.class(),
        timing = timing,
    )
}

/// Format with at most two decimals and no trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;
    use crate::scene::{Layer, LayerKind};

    fn scene(shapes: Vec<Shape>) -> Scene {
        Scene {
            width: 100.0,
            height: 50.0,
            title: "a <b> & c".to_string(),
            gradients: Vec::new(),
            layers: vec![Layer { kind: LayerKind::Decorations, shapes }],
        }
    }

    #[test]
    fn test_num() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(1.256), "1.26");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(120.0), "120");
    }

    #[test]
    fn test_header_and_escaped_title() {
        let svg = to_svg(&scene(Vec::new()));
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"50\""));
        assert!(svg.contains("<title>a &lt;b&gt; &amp; c</title>"));
        assert!(svg.contains(r#"<g id="layer-decorations">"#));
        assert!(!svg.contains("<style>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_only_used_keyframes() {
        let spin = Shape::animated((1.0, 2.0), Animation::Css(CssAnimation::Spin), vec![Shape::circle(
            (0.0, 0.0),
            1.0,
            Style::fill(Rgb::WHITE),
        )]);
        let svg = to_svg(&scene(vec![spin]));
        assert!(svg.contains("@keyframes spin"));
        assert!(!svg.contains("@keyframes fall"));
        assert!(svg.contains(r#"<g transform="translate(1 2)">"#));
        assert!(svg.contains(r#"<g class="anim-spin">"#));
        assert!(svg.contains(r##"<circle cx="0" cy="0" r="1" fill="#ffffff"/>"##));
    }

    #[test]
    fn test_smil_motion() {
        let bird = Shape::animated(
            (0.0, 0.0),
            Animation::Smil { path: vec![(0.0, 0.0), (6.0, -3.0), (0.0, 0.0)], duration: 8.0 },
            vec![Shape::line((0.0, 0.0), (1.0, 1.0), Rgb::BLACK, 0.5)],
        );
        let svg = to_svg(&scene(vec![bird]));
        assert!(svg.contains(r#"<animateMotion path="M0 0 L6 -3 L0 0" dur="8s" repeatCount="indefinite"/>"#));
    }

    #[test]
    fn test_style_attributes() {
        let style = Style::gradient("sky").opacity(0.5).stroke(Rgb::BLACK, 0.25);
        assert_eq!(style_attrs(&style), r##" fill="url(#sky)" fill-opacity="0.5" stroke="#000000" stroke-width="0.25""##);
    }

    #[test]
    fn test_write_svg_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        let s = scene(Vec::new());
        write_svg(&s, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), to_svg(&s));
    }
}
