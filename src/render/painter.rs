use kurbo::Shape;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{PhotocardError, PhotocardResult};
use crate::render::blur::blur_rgba8_premul;
use crate::render::cover::cover_crop;
use crate::render::gradient::Gradient;
use crate::render::text::{TextBlock, TextStyle, Typesetter};

const TOLERANCE: f64 = 0.1;

/// How a shape or a label is filled.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Rgba8),
    Gradient(Gradient),
}

impl From<Rgba8> for Brush {
    fn from(c: Rgba8) -> Self {
        Self::Solid(c)
    }
}

impl From<Gradient> for Brush {
    fn from(g: Gradient) -> Self {
        Self::Gradient(g)
    }
}

/// Canvas-style drop shadow: `blur` is the canvas `shadowBlur` value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Rgba8,
    pub blur: f64,
    pub offset: Vec2,
}

impl Shadow {
    pub const fn new(color: Rgba8, blur: f64, dx: f64, dy: f64) -> Self {
        Self {
            color,
            blur,
            offset: Vec2::new(dx, dy),
        }
    }
}

/// Immediate-mode drawing API handed to templates. All coordinates are canvas pixels.
pub struct Painter<'a> {
    ctx: vello_cpu::RenderContext,
    canvas: Canvas,
    typesetter: &'a mut Typesetter,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(canvas: Canvas, typesetter: &'a mut Typesetter) -> PhotocardResult<Self> {
        let (w, h) = canvas_u16(canvas)?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            canvas,
            typesetter,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> f64 {
        f64::from(self.canvas.width)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.canvas.height)
    }

    pub fn fill(&mut self, shape: &impl Shape, brush: impl Into<Brush>) -> PhotocardResult<()> {
        let path = shape.to_path(TOLERANCE);
        let brush = brush.into();
        if !self.set_brush(&brush, path.bounding_box(), Vec2::ZERO)? {
            return Ok(());
        }
        self.ctx.fill_path(&bezpath_to_cpu(&path));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    /// Stroke with butt caps and miter joins, the canvas defaults.
    pub fn stroke(
        &mut self,
        shape: &impl Shape,
        width: f64,
        brush: impl Into<Brush>,
    ) -> PhotocardResult<()> {
        let outline = stroke_outline(shape, width);
        self.fill(&outline, brush)
    }

    /// Blurred, offset silhouette of `shape`. Draw the shape itself afterwards.
    pub fn shadow(&mut self, shape: &impl Shape, shadow: &Shadow) -> PhotocardResult<()> {
        let path = shape.to_path(TOLERANCE);
        let cpu_path = bezpath_to_cpu(&path);
        self.soft_shadow(path.bounding_box(), shadow, |ctx, _| ctx.fill_path(&cpu_path))
    }

    /// Cover-fit `image` into `dst`: fills the box, keeps aspect ratio, crops the overflow evenly.
    pub fn draw_image_cover(&mut self, image: &DecodedImage, dst: Rect) {
        self.fill_image_cover(image, dst, &dst.to_path(TOLERANCE));
    }

    /// Like [`Self::draw_image_cover`], clipped to a rounded rectangle.
    pub fn draw_image_cover_rounded(&mut self, image: &DecodedImage, dst: Rect, radius: f64) {
        let clip = dst.to_rounded_rect(radius).to_path(TOLERANCE);
        self.fill_image_cover(image, dst, &clip);
    }

    /// Label centered on `at.x` with its alphabetic baseline on `at.y`.
    ///
    /// Returns `false` when no font face was available and nothing was drawn.
    pub fn text(
        &mut self,
        text: &str,
        style: TextStyle,
        brush: impl Into<Brush>,
        at: Point,
    ) -> PhotocardResult<bool> {
        let Some(block) = self.typesetter.layout(text, style) else {
            return Ok(false);
        };
        let origin = block_origin(&block, at);
        self.draw_block(&block, origin, &brush.into())?;
        Ok(true)
    }

    pub fn text_with_shadow(
        &mut self,
        text: &str,
        style: TextStyle,
        brush: impl Into<Brush>,
        at: Point,
        shadow: &Shadow,
    ) -> PhotocardResult<bool> {
        let Some(block) = self.typesetter.layout(text, style) else {
            return Ok(false);
        };
        let origin = block_origin(&block, at);
        let bounds = block_bounds(&block, origin);
        let glyphs = block.glyphs();
        self.soft_shadow(bounds, shadow, |ctx, base| {
            ctx.set_transform(affine_to_cpu(base * Affine::translate(origin.to_vec2())));
            ctx.glyph_run(&block.font)
                .font_size(block.size)
                .fill_glyphs(glyphs.into_iter());
        })?;
        self.draw_block(&block, origin, &brush.into())?;
        Ok(true)
    }

    /// Label with a stroked outline, drawn as eight offset copies under the fill.
    pub fn outlined_text(
        &mut self,
        text: &str,
        style: TextStyle,
        fill: impl Into<Brush>,
        outline: Rgba8,
        outline_width: f64,
        at: Point,
    ) -> PhotocardResult<bool> {
        let Some(block) = self.typesetter.layout(text, style) else {
            return Ok(false);
        };
        let origin = block_origin(&block, at);
        let r = outline_width / 2.0;
        let outline = Brush::Solid(outline);
        for i in 0..8 {
            let angle = f64::from(i) * std::f64::consts::FRAC_PI_4;
            let offset = Vec2::new(angle.cos() * r, angle.sin() * r);
            self.draw_block(&block, origin + offset, &outline)?;
        }
        self.draw_block(&block, origin, &fill.into())?;
        Ok(true)
    }

    /// Rasterize everything drawn so far into `dst`, replacing its content.
    pub(crate) fn finish(mut self, dst: &mut vello_cpu::Pixmap) -> PhotocardResult<()> {
        if u32::from(dst.width()) != self.canvas.width
            || u32::from(dst.height()) != self.canvas.height
        {
            return Err(PhotocardError::surface(format!(
                "target is {}x{}, painter is {}x{}",
                dst.width(),
                dst.height(),
                self.canvas.width,
                self.canvas.height
            )));
        }
        self.ctx.flush();
        self.ctx.render_to_pixmap(dst);
        Ok(())
    }

    fn draw_block(&mut self, block: &TextBlock, origin: Point, brush: &Brush) -> PhotocardResult<()> {
        let bounds = block_bounds(block, origin);
        if !self.set_brush(brush, bounds, origin.to_vec2())? {
            return Ok(());
        }
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        self.ctx
            .glyph_run(&block.font)
            .font_size(block.size)
            .fill_glyphs(block.glyphs().into_iter());
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    /// Select `brush` for the next fill. `user_offset` is the translation the next draw runs
    /// under, so gradient images can stay anchored in canvas space. Returns `false` when the
    /// fill would be invisible.
    fn set_brush(&mut self, brush: &Brush, bounds: Rect, user_offset: Vec2) -> PhotocardResult<bool> {
        match brush {
            Brush::Solid(c) => {
                if c.is_transparent() {
                    return Ok(false);
                }
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                Ok(true)
            }
            Brush::Gradient(g) => {
                let region = bounds.intersect(self.canvas.rect());
                if region.width() <= 0.0 || region.height() <= 0.0 {
                    return Ok(false);
                }
                let (image, at) = g.rasterize(region)?;
                let local = at.to_vec2() - user_offset;
                self.ctx
                    .set_paint_transform(vello_cpu::kurbo::Affine::translate((local.x, local.y)));
                self.ctx.set_paint(image.paint());
                Ok(true)
            }
        }
    }

    fn fill_image_cover(&mut self, image: &DecodedImage, dst: Rect, clip: &BezPath) {
        if dst.width() <= 0.0 || dst.height() <= 0.0 {
            return;
        }
        let crop = cover_crop(
            f64::from(image.width()),
            f64::from(image.height()),
            dst.width(),
            dst.height(),
        );
        let paint_tf = Affine::translate((dst.x0, dst.y0))
            * Affine::scale_non_uniform(dst.width() / crop.sw, dst.height() / crop.sh)
            * Affine::translate((-crop.sx, -crop.sy));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(affine_to_cpu(paint_tf));
        self.ctx.set_paint(image.paint());
        self.ctx.fill_path(&bezpath_to_cpu(clip));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Render a silhouette offscreen at reduced resolution, blur it and draw it back.
    ///
    /// `draw` runs with the shadow color selected and the offscreen transform (also passed in)
    /// mapping canvas coordinates into the buffer.
    fn soft_shadow(
        &mut self,
        bounds: Rect,
        shadow: &Shadow,
        draw: impl FnOnce(&mut vello_cpu::RenderContext, Affine),
    ) -> PhotocardResult<()> {
        if shadow.color.is_transparent() {
            return Ok(());
        }
        let sigma = (shadow.blur.max(0.0) / 2.0) as f32;
        let scale = if sigma > 4.0 { 0.25 } else { 1.0 };
        let pad = f64::from(sigma) * 3.0 + 2.0;
        let region = bounds.inflate(pad, pad).expand();

        let w = (region.width() * scale).ceil().max(1.0) as u32;
        let h = (region.height() * scale).ceil().max(1.0) as u32;
        let (w16, h16) = canvas_u16(Canvas {
            width: w,
            height: h,
        })?;

        let mut off = vello_cpu::RenderContext::new(w16, h16);
        let to_off = Affine::scale(scale) * Affine::translate(-region.origin().to_vec2());
        off.set_transform(affine_to_cpu(to_off));
        let c = shadow.color;
        off.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        draw(&mut off, to_off);
        off.flush();
        let mut mask = vello_cpu::Pixmap::new(w16, h16);
        off.render_to_pixmap(&mut mask);

        let blurred = blur_rgba8_premul(mask.data_as_u8_slice(), w, h, sigma * scale as f32)?;
        let image = DecodedImage::from_premul_rgba8(w, h, &blurred)?;

        let dst = region + shadow.offset;
        let paint_tf = Affine::translate(dst.origin().to_vec2()) * Affine::scale(1.0 / scale);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(affine_to_cpu(paint_tf));
        self.ctx.set_paint(image.paint());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            dst.x0,
            dst.y0,
            dst.x0 + f64::from(w) / scale,
            dst.y0 + f64::from(h) / scale,
        ));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

/// Outline of a stroked shape as a fillable path.
pub fn stroke_outline(shape: &impl Shape, width: f64) -> BezPath {
    let style = kurbo::Stroke::new(width)
        .with_join(kurbo::Join::Miter)
        .with_caps(kurbo::Cap::Butt);
    kurbo::stroke(
        shape.path_elements(TOLERANCE),
        &style,
        &kurbo::StrokeOpts::default(),
        TOLERANCE,
    )
}

fn block_origin(block: &TextBlock, at: Point) -> Point {
    Point::new(at.x - block.width() / 2.0, at.y - block.baseline())
}

fn block_bounds(block: &TextBlock, origin: Point) -> Rect {
    let height = f64::from(block.layout.height()).max(f64::from(block.size));
    Rect::new(
        origin.x,
        origin.y,
        origin.x + block.width().max(1.0),
        origin.y + height,
    )
}

fn canvas_u16(canvas: Canvas) -> PhotocardResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| PhotocardError::surface(format!("width {} exceeds u16", canvas.width)))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| PhotocardError::surface(format!("height {} exceeds u16", canvas.height)))?;
    if w == 0 || h == 0 {
        return Err(PhotocardError::surface("zero-sized canvas"));
    }
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
