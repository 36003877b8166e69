//! Ornaments shared by the built-in templates.

use std::f64::consts::{PI, TAU};

use kurbo::Shape;

use crate::foundation::core::{Affine, BezPath, Point, Rgba8};
use crate::foundation::error::PhotocardResult;
use crate::render::painter::{Painter, Shadow};

/// Five-pointed star around the origin, inner radius 0.4 of `size`, first tip pointing up.
pub(crate) fn star_path(size: f64) -> BezPath {
    let mut p = BezPath::new();
    for i in 0..5 {
        let angle = f64::from(i) * TAU / 5.0 - PI / 2.0;
        let tip = Point::new(angle.cos() * size, angle.sin() * size);
        if i == 0 {
            p.move_to(tip);
        } else {
            p.line_to(tip);
        }
        let inner = angle + PI / 5.0;
        p.line_to((inner.cos() * size * 0.4, inner.sin() * size * 0.4));
    }
    p.close_path();
    p
}

pub(crate) fn placed(path: BezPath, at: (f64, f64), rotation: f64) -> BezPath {
    Affine::translate(at) * Affine::rotate(rotation) * path
}

pub(crate) fn starfish(
    p: &mut Painter<'_>,
    at: (f64, f64),
    size: f64,
    color: Rgba8,
    rotation: f64,
) -> PhotocardResult<()> {
    let star = placed(star_path(size), at, rotation);
    p.fill(&star, color)?;
    p.stroke(&star, 2.0, Rgba8::BLACK.with_alpha(0.2))
}

/// Oval shell with fanned ridges.
pub(crate) fn shell(
    p: &mut Painter<'_>,
    at: (f64, f64),
    size: f64,
    body: Rgba8,
    ridge: Rgba8,
    rotation: f64,
) -> PhotocardResult<()> {
    let tf = Affine::translate(at) * Affine::rotate(rotation);
    let oval = tf * kurbo::Ellipse::new((0.0, 0.0), (size, size * 0.85), 0.0).to_path(0.1);
    p.fill(&oval, body)?;
    p.stroke(&oval, 3.0, ridge)?;
    for i in -4..=4 {
        let i = f64::from(i);
        let line = kurbo::Line::new(
            tf * Point::new(i * size / 5.0, -size * 0.85),
            tf * Point::new(i * size / 8.0, size * 0.85),
        );
        p.stroke(&line, 2.0, ridge)?;
    }
    Ok(())
}

/// Three overlapping puffs; nonzero fill merges them.
pub(crate) fn cloud(p: &mut Painter<'_>, x: f64, y: f64, scale: f64) -> PhotocardResult<()> {
    let mut path = BezPath::new();
    for (dx, dy, r) in [(0.0, 0.0, 35.0), (35.0, -15.0, 40.0), (70.0, 0.0, 35.0)] {
        let c = kurbo::Circle::new((x + dx * scale, y + dy * scale), r * scale);
        path.extend(c.path_elements(0.1));
    }
    p.fill(&path, Rgba8::WHITE.with_alpha(0.85))
}

pub(crate) fn dot(p: &mut Painter<'_>, x: f64, y: f64, r: f64, color: Rgba8) -> PhotocardResult<()> {
    p.fill(&kurbo::Circle::new((x, y), r), color)
}

/// White photo mount with a drop shadow underneath.
pub(crate) fn mount(p: &mut Painter<'_>, frame: &impl Shape, shadow: &Shadow) -> PhotocardResult<()> {
    p.shadow(frame, shadow)?;
    p.fill(frame, Rgba8::WHITE)
}
