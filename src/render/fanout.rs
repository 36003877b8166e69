use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::PhotocardResult;
use crate::render::painter::Painter;
use crate::render::surface::{RenderStamp, RenderTarget};
use crate::render::text::Typesetter;
use crate::templates::{Template, TemplateInput};

/// Paint `template` onto every target, in order.
///
/// Each target is resized to the export canvas and cleared before the template runs on it.
/// Stamps are recorded only once every target has been painted: if any target fails, none of
/// the targets acquired in this pass carries a stamp.
#[tracing::instrument(skip_all, fields(template = template.id(), targets = targets.len()))]
pub fn render_all(
    template: &dyn Template,
    input: &TemplateInput<'_>,
    targets: &mut [&mut dyn RenderTarget],
    typesetter: &mut Typesetter,
) -> PhotocardResult<()> {
    for (i, target) in targets.iter_mut().enumerate() {
        if let Err(err) = paint_unstamped(template, input, &mut **target, typesetter) {
            tracing::warn!(target_index = i, error = %err, "render pass aborted");
            return Err(err);
        }
    }
    let stamp = stamp_for(template, input);
    for target in targets.iter_mut() {
        target.stamp(stamp.clone());
    }
    tracing::debug!(revision = input.images.revision(), "render pass complete");
    Ok(())
}

/// Paint one target: white canvas, then the template.
pub fn paint_one(
    template: &dyn Template,
    input: &TemplateInput<'_>,
    target: &mut dyn RenderTarget,
    typesetter: &mut Typesetter,
) -> PhotocardResult<()> {
    paint_unstamped(template, input, target, typesetter)?;
    target.stamp(stamp_for(template, input));
    Ok(())
}

fn paint_unstamped(
    template: &dyn Template,
    input: &TemplateInput<'_>,
    target: &mut dyn RenderTarget,
    typesetter: &mut Typesetter,
) -> PhotocardResult<()> {
    let canvas = Canvas::PHOTOCARD;
    let pixmap = target.acquire(canvas)?;

    let mut painter = Painter::new(canvas, typesetter)?;
    painter.fill(&canvas.rect(), Rgba8::WHITE)?;
    template.paint(&mut painter, input)?;
    painter.finish(pixmap)
}

fn stamp_for(template: &dyn Template, input: &TemplateInput<'_>) -> RenderStamp {
    RenderStamp {
        revision: input.images.revision(),
        template_id: template.id().to_string(),
    }
}
