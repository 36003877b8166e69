use std::f64::consts::PI;

use crate::foundation::core::{BezPath, Point, Rect, Rgba8};
use crate::foundation::error::PhotocardResult;
use crate::render::gradient::{ColorStop, Gradient};
use crate::render::painter::{Painter, Shadow};
use crate::render::text::TextStyle;
use crate::templates::motifs::{cloud, mount, shell, starfish};
use crate::templates::{Template, TemplateInput};

const PHOTO_HEIGHT: f64 = 520.0;
const PHOTO_TOP: f64 = 190.0;
const PHOTO_GAP: f64 = 30.0;

const SKY: Rgba8 = Rgba8::hex(0x87CEEB);
const OCEAN: Rgba8 = Rgba8::hex(0x1E90FF);
const DEEP_SKY: Rgba8 = Rgba8::hex(0x00BFFF);
const SAND: Rgba8 = Rgba8::hex(0xF4E4C1);

/// `classic`: sky-to-ocean backdrop, sun, clouds, beach ornaments.
#[derive(Clone, Copy, Debug, Default)]
pub struct BeachVibes;

impl Template for BeachVibes {
    fn id(&self) -> &str {
        "classic"
    }

    fn name(&self) -> &str {
        "Beach Vibes"
    }

    fn paint(&self, p: &mut Painter<'_>, input: &TemplateInput<'_>) -> PhotocardResult<()> {
        let (w, h) = (p.width(), p.height());

        let backdrop = Gradient::linear(
            (0.0, 0.0),
            (0.0, h),
            &[
                ColorStop::new(0.0, SKY),
                ColorStop::new(0.4, Rgba8::hex(0x5FB8E3)),
                ColorStop::new(1.0, OCEAN),
            ],
        );
        p.fill(&Rect::new(0.0, 0.0, w, h), backdrop)?;

        for (x, y, scale) in [
            (80.0, 80.0, 1.0),
            (700.0, 120.0, 0.8),
            (500.0, 1750.0, 0.9),
            (150.0, 1650.0, 0.7),
            (850.0, 1800.0, 0.85),
        ] {
            cloud(p, x, y, scale)?;
        }

        sun(p, Point::new(w - 120.0, 100.0))?;
        p.fill(&header_wave(w), Rgba8::WHITE)?;

        let title = Gradient::linear(
            (0.0, 50.0),
            (0.0, 100.0),
            &[ColorStop::new(0.0, OCEAN), ColorStop::new(1.0, DEEP_SKY)],
        );
        p.text_with_shadow(
            "PIKUL RANGERS",
            TextStyle::sans(60.0).bold(),
            title,
            Point::new(w / 2.0, 90.0),
            &Shadow::new(Rgba8::BLACK.with_alpha(0.2), 5.0, 0.0, 3.0),
        )?;

        let photo_width = w - 120.0;
        let shadow = Shadow::new(Rgba8::BLACK.with_alpha(0.35), 30.0, 10.0, 10.0);
        for (i, image) in input.images.images().iter().enumerate() {
            let y = PHOTO_TOP + (PHOTO_HEIGHT + PHOTO_GAP) * i as f64;
            let border = Rect::new(50.0, y - 15.0, 80.0 + photo_width, y + PHOTO_HEIGHT + 15.0);
            mount(p, &border, &shadow)?;
            p.draw_image_cover(image, Rect::new(60.0, y, 60.0 + photo_width, y + PHOTO_HEIGHT));
        }

        for (x, y, size, color, rot) in [
            (w - 80.0, 250.0, 35.0, 0xFF6B6B, PI / 6.0),
            (50.0, 850.0, 40.0, 0xFFA07A, -PI / 4.0),
            (w - 90.0, 1400.0, 38.0, 0xFF7F7F, PI / 3.0),
            (60.0, 1650.0, 42.0, 0xFFB6C1, PI / 8.0),
        ] {
            starfish(p, (x, y), size, Rgba8::hex(color), rot)?;
        }
        for (x, y, size, body, ridge, rot) in [
            (w - 70.0, 650.0, 32.0, 0xFFE4E1, 0xFF69B4, -PI / 6.0),
            (65.0, 450.0, 36.0, 0xFFC0CB, 0xFF1493, PI / 5.0),
            (w - 85.0, 1150.0, 34.0, 0xFADADD, 0xFF69B4, PI / 4.0),
            (55.0, 1250.0, 38.0, 0xFFB6C1, 0xDB7093, -PI / 8.0),
        ] {
            shell(p, (x, y), size, Rgba8::hex(body), Rgba8::hex(ridge), rot)?;
        }

        footer(p, input)
    }
}

fn sun(p: &mut Painter<'_>, c: Point) -> PhotocardResult<()> {
    let glow = Gradient::radial(
        c,
        15.0,
        90.0,
        &[
            ColorStop::new(0.0, Rgba8::hex(0xFFD700)),
            ColorStop::new(0.5, Rgba8::hex(0xFFA500)),
            ColorStop::new(1.0, Rgba8::hex(0xFFA500).with_alpha(0.3)),
        ],
    );
    p.fill(&kurbo::Circle::new(c, 90.0), glow)?;

    let ray = Rgba8::hex(0xFFD700).with_alpha(0.5);
    for i in 0..12 {
        let angle = f64::from(i) * PI / 6.0;
        let tip = c + kurbo::Vec2::new(angle.cos(), angle.sin()) * 130.0;
        p.stroke(&kurbo::Line::new(c, tip), 4.0, ray)?;
    }
    Ok(())
}

/// White band across the top whose lower edge ripples every 60 px.
fn header_wave(w: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((0.0, 140.0));
    let mut x = 0.0;
    while x < w {
        path.quad_to((x + 15.0, 155.0), (x + 30.0, 140.0));
        path.quad_to((x + 45.0, 125.0), (x + 60.0, 140.0));
        x += 60.0;
    }
    path.line_to((w, 0.0));
    path.close_path();
    path
}

fn footer(p: &mut Painter<'_>, input: &TemplateInput<'_>) -> PhotocardResult<()> {
    let (w, h) = (p.width(), p.height());
    let fy = h - 140.0;

    p.fill(&Rect::new(0.0, fy + 40.0, w, fy + 140.0), SAND)?;

    let mut surf = BezPath::new();
    surf.move_to((0.0, fy));
    let mut x = 0.0;
    while x < w {
        surf.quad_to((x + 20.0, fy - 15.0), (x + 40.0, fy));
        surf.quad_to((x + 60.0, fy + 15.0), (x + 80.0, fy));
        x += 80.0;
    }
    surf.line_to((w, fy + 40.0));
    surf.line_to((0.0, fy + 40.0));
    surf.close_path();
    p.fill(&surf, Rgba8::WHITE)?;

    for (x, y, size, color, rot) in [
        (200.0, fy + 80.0, 35.0, 0xFF6B6B, PI / 7.0),
        (w - 180.0, fy + 85.0, 38.0, 0xFFA07A, -PI / 5.0),
        (w / 2.0 + 100.0, fy + 75.0, 32.0, 0xFFB6C1, PI / 4.0),
    ] {
        starfish(p, (x, y), size, Rgba8::hex(color), rot)?;
    }
    for (x, y, size, body, ridge, rot) in [
        (350.0, fy + 80.0, 30.0, 0xFFE4E1, 0xFF69B4, PI / 6.0),
        (w - 350.0, fy + 85.0, 32.0, 0xFFC0CB, 0xFF1493, -PI / 4.0),
        (w / 2.0 - 150.0, fy + 90.0, 28.0, 0xFADADD, 0xDB7093, PI / 8.0),
    ] {
        shell(p, (x, y), size, Rgba8::hex(body), Rgba8::hex(ridge), rot)?;
    }

    let plate = Rect::new(w / 2.0 - 450.0, fy + 5.0, w / 2.0 + 450.0, fy + 95.0);
    p.fill(&plate.to_rounded_rect(15.0), Rgba8::WHITE.with_alpha(0.9))?;

    let soft = Shadow::new(Rgba8::BLACK.with_alpha(0.1), 2.0, 0.0, 0.0);
    let caption = input.caption;
    p.text_with_shadow(
        &caption.event,
        TextStyle::serif(38.0).bold().italic(),
        OCEAN,
        Point::new(w / 2.0, fy + 35.0),
        &soft,
    )?;
    p.text_with_shadow(
        &format!("{} - {}", caption.location, caption.date),
        TextStyle::sans(30.0).bold(),
        DEEP_SKY,
        Point::new(w / 2.0, fy + 75.0),
        &soft,
    )?;
    Ok(())
}
