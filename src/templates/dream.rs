use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::PhotocardResult;
use crate::render::gradient::{ColorStop, Gradient};
use crate::render::painter::{Painter, Shadow};
use crate::render::text::TextStyle;
use crate::templates::motifs::{dot, mount};
use crate::templates::{Template, TemplateInput};

const PHOTO_HEIGHT: f64 = 500.0;
const PHOTO_TOP: f64 = 180.0;
const PHOTO_GAP: f64 = 40.0;
const CORNER: f64 = 25.0;
const SPECKS: usize = 50;

const INDIGO: Rgba8 = Rgba8::hex(0x667EEA);

/// `gradient`: indigo-to-pink wash, rounded photos with numbered badges.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientDream;

impl Template for GradientDream {
    fn id(&self) -> &str {
        "gradient"
    }

    fn name(&self) -> &str {
        "Gradient Dream"
    }

    fn paint(&self, p: &mut Painter<'_>, input: &TemplateInput<'_>) -> PhotocardResult<()> {
        let (w, h) = (p.width(), p.height());
        let wash = Gradient::linear(
            (0.0, 0.0),
            (0.0, h),
            &[
                ColorStop::new(0.0, INDIGO),
                ColorStop::new(0.5, Rgba8::hex(0x764BA2)),
                ColorStop::new(1.0, Rgba8::hex(0xF093FB)),
            ],
        );
        p.fill(&Rect::new(0.0, 0.0, w, h), wash)?;

        // The only randomized layer.
        let mut rng = input.decor_rng();
        let speck = Rgba8::WHITE.with_alpha(0.05);
        for _ in 0..SPECKS {
            let x = rng.range(0.0, w);
            let y = rng.range(0.0, h);
            let r = rng.range(1.0, 4.0);
            dot(p, x, y, r, speck)?;
        }

        p.outlined_text(
            "KKN MEMORIES",
            TextStyle::sans(56.0).bold(),
            Rgba8::WHITE,
            Rgba8::BLACK,
            4.0,
            Point::new(w / 2.0, 100.0),
        )?;

        let photo_width = w - 140.0;
        let shadow = Shadow::new(Rgba8::BLACK.with_alpha(0.5), 25.0, 0.0, 12.0);
        for (i, image) in input.images.images().iter().enumerate() {
            let y = PHOTO_TOP + (PHOTO_HEIGHT + PHOTO_GAP) * i as f64;
            let border = Rect::new(65.0, y - 8.0, 81.0 + photo_width, y + PHOTO_HEIGHT + 8.0)
                .to_rounded_rect(CORNER);
            mount(p, &border, &shadow)?;
            p.draw_image_cover_rounded(
                image,
                Rect::new(70.0, y, 70.0 + photo_width, y + PHOTO_HEIGHT),
                CORNER - 5.0,
            );

            let badge = Point::new(w - 110.0, y + 40.0);
            p.fill(&kurbo::Circle::new(badge, 35.0), Rgba8::WHITE)?;
            p.text(
                &(i + 1).to_string(),
                TextStyle::sans(32.0).bold(),
                INDIGO,
                Point::new(badge.x, badge.y + 10.0),
            )?;
        }

        let caption = input.caption;
        p.outlined_text(
            &format!("{} - {} - {}", caption.event, caption.location, caption.date),
            TextStyle::sans(30.0).bold(),
            Rgba8::WHITE,
            Rgba8::BLACK.with_alpha(0.6),
            3.0,
            Point::new(w / 2.0, h - 60.0),
        )?;
        Ok(())
    }
}
