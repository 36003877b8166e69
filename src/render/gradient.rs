use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{PhotocardError, PhotocardResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba8,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

/// Canvas-style gradient: a linear axis, or concentric circles from `r0` to `r1`.
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    Linear {
        start: Point,
        end: Point,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: Point,
        r0: f64,
        r1: f64,
        stops: Vec<ColorStop>,
    },
}

impl Gradient {
    pub fn linear(start: impl Into<Point>, end: impl Into<Point>, stops: &[ColorStop]) -> Self {
        Self::Linear {
            start: start.into(),
            end: end.into(),
            stops: stops.to_vec(),
        }
    }

    pub fn radial(center: impl Into<Point>, r0: f64, r1: f64, stops: &[ColorStop]) -> Self {
        Self::Radial {
            center: center.into(),
            r0,
            r1,
            stops: stops.to_vec(),
        }
    }

    fn stops(&self) -> &[ColorStop] {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops,
        }
    }

    /// Gradient parameter at a canvas position, before clamping.
    fn param_at(&self, p: Point) -> f64 {
        match self {
            Self::Linear { start, end, .. } => {
                let axis = *end - *start;
                let len2 = axis.hypot2();
                if len2 <= f64::EPSILON {
                    return 0.0;
                }
                (p - *start).dot(axis) / len2
            }
            Self::Radial { center, r0, r1, .. } => {
                let span = r1 - r0;
                if span.abs() <= f64::EPSILON {
                    return 0.0;
                }
                ((p - *center).hypot() - r0) / span
            }
        }
    }

    /// Color at canvas position `p` (pixel centers are `x + 0.5`).
    pub fn color_at(&self, p: Point) -> Rgba8 {
        sample_stops(self.stops(), self.param_at(p) as f32)
    }

    /// Rasterize the gradient over `region` (canvas coordinates, rounded outwards).
    ///
    /// The returned image's top-left pixel sits at the returned origin.
    pub(crate) fn rasterize(&self, region: Rect) -> PhotocardResult<(DecodedImage, Point)> {
        if self.stops().is_empty() {
            return Err(PhotocardError::validation("gradient needs at least one stop"));
        }
        let region = region.expand();
        let w = region.width().max(1.0) as u32;
        let h = region.height().max(1.0) as u32;

        let mut bytes = vec![0u8; (w as usize) * (h as usize) * 4];
        for (i, px) in bytes.chunks_exact_mut(4).enumerate() {
            let x = (i % w as usize) as f64 + region.x0 + 0.5;
            let y = (i / w as usize) as f64 + region.y0 + 0.5;
            px.copy_from_slice(&self.color_at(Point::new(x, y)).premultiply().to_array());
        }

        let image = DecodedImage::from_premul_rgba8(w, h, &bytes)?;
        Ok((image, Point::new(region.x0, region.y0)))
    }
}

/// Piecewise-linear lookup; `t` outside the stop range takes the nearest end color.
pub fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba8 {
    let Some(first) = stops.first() else {
        return Rgba8::TRANSPARENT;
    };
    if !t.is_finite() || t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f32::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKY: [ColorStop; 3] = [
        ColorStop::new(0.0, Rgba8::hex(0x87CEEB)),
        ColorStop::new(0.4, Rgba8::hex(0x5FB8E3)),
        ColorStop::new(1.0, Rgba8::hex(0x1E90FF)),
    ];

    #[test]
    fn stops_clamp_and_interpolate() {
        assert_eq!(sample_stops(&SKY, -1.0), Rgba8::hex(0x87CEEB));
        assert_eq!(sample_stops(&SKY, 0.4), Rgba8::hex(0x5FB8E3));
        assert_eq!(sample_stops(&SKY, 2.0), Rgba8::hex(0x1E90FF));
        let mid = sample_stops(&SKY, 0.7);
        assert_eq!(mid, Rgba8::hex(0x5FB8E3).lerp(Rgba8::hex(0x1E90FF), 0.5));
        assert_eq!(sample_stops(&[], 0.5), Rgba8::TRANSPARENT);
    }

    #[test]
    fn vertical_linear_gradient_varies_only_with_y() {
        let g = Gradient::linear((0.0, 0.0), (0.0, 100.0), &SKY);
        assert_eq!(g.color_at(Point::new(0.0, 10.0)), g.color_at(Point::new(90.0, 10.0)));
        assert_ne!(g.color_at(Point::new(0.0, 10.0)), g.color_at(Point::new(0.0, 90.0)));
    }

    #[test]
    fn radial_gradient_uses_distance_between_radii() {
        let stops = [
            ColorStop::new(0.0, Rgba8::hex(0xFFD700)),
            ColorStop::new(1.0, Rgba8::hex(0xFFA500)),
        ];
        let g = Gradient::radial((50.0, 50.0), 10.0, 20.0, &stops);
        assert_eq!(g.color_at(Point::new(55.0, 50.0)), Rgba8::hex(0xFFD700));
        assert_eq!(g.color_at(Point::new(50.0, 80.0)), Rgba8::hex(0xFFA500));
    }

    #[test]
    fn rasterize_covers_region() {
        let g = Gradient::linear((0.0, 0.0), (0.0, 4.0), &SKY);
        let (img, origin) = g.rasterize(Rect::new(1.2, 0.0, 3.0, 4.0)).unwrap();
        assert_eq!(origin, Point::new(1.0, 0.0));
        assert_eq!((img.width(), img.height()), (2, 4));
        assert_eq!(img.rgba8_premul()[3], 255);
    }
}
