use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::PhotocardResult;
use crate::render::painter::{Painter, Shadow};
use crate::render::text::TextStyle;
use crate::templates::motifs::{dot, mount};
use crate::templates::{Template, TemplateInput};

const PHOTO_HEIGHT: f64 = 480.0;
const BOTTOM_SPACE: f64 = 100.0;
const FRAME_TOP: f64 = 160.0;
const FRAME_GAP: f64 = 35.0;
const DOT_PITCH: usize = 30;

/// `polaroid`: instant-film frames on a dotted grey board.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolaroidStyle;

impl Template for PolaroidStyle {
    fn id(&self) -> &str {
        "polaroid"
    }

    fn name(&self) -> &str {
        "Polaroid Style"
    }

    fn paint(&self, p: &mut Painter<'_>, input: &TemplateInput<'_>) -> PhotocardResult<()> {
        let (w, h) = (p.width(), p.height());
        p.fill(&Rect::new(0.0, 0.0, w, h), Rgba8::hex(0xF5F5F5))?;

        let grid = Rgba8::hex(0xE0E0E0);
        for x in (0..p.canvas().width).step_by(DOT_PITCH) {
            for y in (0..p.canvas().height).step_by(DOT_PITCH) {
                dot(p, f64::from(x), f64::from(y), 2.0, grid)?;
            }
        }

        p.text(
            "MOMENT KKN",
            TextStyle::serif(52.0).bold(),
            Rgba8::hex(0x333333),
            Point::new(w / 2.0, 90.0),
        )?;
        // The third frame runs to the bottom edge, so the date goes under the title.
        let caption = input.caption;
        p.text(
            &format!("{} · {} · {}", caption.event, caption.location, caption.date),
            TextStyle::serif(24.0).italic(),
            Rgba8::hex(0x777777),
            Point::new(w / 2.0, 132.0),
        )?;

        let frame_width = w - 150.0;
        let frame_height = PHOTO_HEIGHT + BOTTOM_SPACE;
        let shadow = Shadow::new(Rgba8::BLACK.with_alpha(0.25), 25.0, 0.0, 10.0);
        for (i, image) in input.images.images().iter().enumerate() {
            let y = FRAME_TOP + (frame_height + FRAME_GAP) * i as f64;
            mount(p, &Rect::new(75.0, y, 75.0 + frame_width, y + frame_height), &shadow)?;
            p.draw_image_cover(
                image,
                Rect::new(90.0, y + 15.0, 60.0 + frame_width, y + 15.0 + PHOTO_HEIGHT),
            );
            p.text(
                &format!("Memory {}", i + 1),
                TextStyle::serif(32.0).italic(),
                Rgba8::hex(0x555555),
                Point::new(w / 2.0, y + PHOTO_HEIGHT + 60.0),
            )?;
        }

        Ok(())
    }
}
