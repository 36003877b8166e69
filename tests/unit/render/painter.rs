use super::*;
use crate::render::gradient::ColorStop;
use crate::render::text::FontBook;

fn render(w: u32, h: u32, draw: impl FnOnce(&mut Painter<'_>)) -> vello_cpu::Pixmap {
    render_with(FontBook::empty(), w, h, draw)
}

fn render_with(
    book: FontBook,
    w: u32,
    h: u32,
    draw: impl FnOnce(&mut Painter<'_>),
) -> vello_cpu::Pixmap {
    let mut ts = Typesetter::new(book);
    let mut painter = Painter::new(
        Canvas {
            width: w,
            height: h,
        },
        &mut ts,
    )
    .unwrap();
    draw(&mut painter);
    let mut pm = vello_cpu::Pixmap::new(w as u16, h as u16);
    painter.finish(&mut pm).unwrap();
    pm
}

fn px(pm: &vello_cpu::Pixmap, x: usize, y: usize) -> [u8; 4] {
    let i = (y * pm.width() as usize + x) * 4;
    let d = pm.data_as_u8_slice();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

fn image(pixels: &[[u8; 4]], w: u32, h: u32) -> DecodedImage {
    let bytes: Vec<u8> = pixels.iter().flatten().copied().collect();
    DecodedImage::from_premul_rgba8(w, h, &bytes).unwrap()
}

#[test]
fn solid_fill_covers_shape_only() {
    let pm = render(8, 8, |p| {
        p.fill(&Rect::new(0.0, 0.0, 4.0, 8.0), Rgba8::rgb(255, 0, 0))
            .unwrap();
    });
    assert_eq!(px(&pm, 1, 1), [255, 0, 0, 255]);
    assert_eq!(px(&pm, 6, 1), [0, 0, 0, 0]);
}

#[test]
fn transparent_brush_draws_nothing() {
    let pm = render(4, 4, |p| {
        p.fill(&Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::TRANSPARENT)
            .unwrap();
    });
    assert!(pm.data_as_u8_slice().iter().all(|&b| b == 0));
}

#[test]
fn cover_draw_shows_the_center_of_a_wide_image() {
    let red = [255, 0, 0, 255];
    let green = [0, 255, 0, 255];
    let blue = [0, 0, 255, 255];
    let img = image(&[red, green, green, blue], 4, 1);
    let pm = render(8, 8, |p| p.draw_image_cover(&img, Rect::new(0.0, 0.0, 8.0, 8.0)));
    for y in 0..8 {
        for x in 0..8 {
            let [r, g, b, a] = px(&pm, x, y);
            assert!(g >= 200 && r <= 50 && b <= 50 && a == 255, "({x},{y})");
        }
    }
}

#[test]
fn rounded_cover_clips_corners() {
    let img = image(&[[255, 255, 255, 255]], 1, 1);
    let pm = render(16, 16, |p| {
        p.draw_image_cover_rounded(&img, Rect::new(0.0, 0.0, 16.0, 16.0), 6.0)
    });
    assert_eq!(px(&pm, 0, 0)[3], 0);
    assert_eq!(px(&pm, 8, 8), [255, 255, 255, 255]);
}

#[test]
fn shadow_spreads_past_the_shape_and_fades() {
    let shape = Rect::new(16.0, 16.0, 32.0, 32.0);
    let pm = render(64, 64, |p| {
        p.shadow(&shape, &Shadow::new(Rgba8::BLACK, 10.0, 6.0, 6.0))
            .unwrap();
    });
    assert!(px(&pm, 30, 30)[3] > 100);
    assert!(px(&pm, 38, 38)[3] > 0);
    assert_eq!(px(&pm, 2, 62)[3], 0);
}

#[test]
fn gradient_fill_follows_axis() {
    let g = Gradient::linear(
        (0.0, 0.0),
        (0.0, 32.0),
        &[
            ColorStop::new(0.0, Rgba8::BLACK),
            ColorStop::new(1.0, Rgba8::WHITE),
        ],
    );
    let pm = render(8, 32, |p| p.fill(&Rect::new(0.0, 0.0, 8.0, 32.0), g).unwrap());
    let top = px(&pm, 4, 1);
    let bottom = px(&pm, 4, 30);
    assert!(top[0] < 40);
    assert!(bottom[0] > 215);
    assert_eq!(px(&pm, 0, 16), px(&pm, 7, 16));
}

#[test]
fn stroke_outline_has_the_requested_width() {
    let line = kurbo::Line::new((0.0, 5.0), (10.0, 5.0));
    let bb = stroke_outline(&line, 4.0).bounding_box();
    assert!((bb.height() - 4.0).abs() < 1e-6);
    assert!((bb.width() - 10.0).abs() < 1e-6);
}

#[test]
fn text_without_fonts_is_skipped() {
    let pm = render(16, 16, |p| {
        let drawn = p
            .text("KKN", TextStyle::sans(12.0), Rgba8::BLACK, Point::new(8.0, 12.0))
            .unwrap();
        assert!(!drawn);
    });
    assert!(pm.data_as_u8_slice().iter().all(|&b| b == 0));
}

#[test]
fn text_with_installed_fonts_paints_glyphs_around_the_anchor() {
    let book = FontBook::load(&crate::config::FontConfig::default());
    if book.face_count() == 0 {
        eprintln!("no font faces installed, skipping");
        return;
    }
    let pm = render_with(book, 120, 40, |p| {
        let drawn = p
            .text("KKN", TextStyle::sans(24.0).bold(), Rgba8::BLACK, Point::new(60.0, 30.0))
            .unwrap();
        assert!(drawn);
    });

    let inked: Vec<(usize, usize)> = (0..40)
        .flat_map(|y| (0..120).map(move |x| (x, y)))
        .filter(|&(x, y)| px(&pm, x, y)[3] > 0)
        .collect();
    assert!(!inked.is_empty());
    let min_x = inked.iter().map(|p| p.0).min().unwrap();
    let max_x = inked.iter().map(|p| p.0).max().unwrap();
    let max_y = inked.iter().map(|p| p.1).max().unwrap();
    // Centered on x = 60, sitting on the baseline at y = 30.
    assert!(min_x < 60 && max_x > 60, "ink spans {min_x}..{max_x}");
    assert!((60 - min_x as i32 - (max_x as i32 - 60)).abs() <= 6);
    assert!(max_y <= 31, "ink below baseline at {max_y}");
}

#[test]
fn finish_rejects_mismatched_target() {
    let mut ts = Typesetter::new(FontBook::empty());
    let painter = Painter::new(
        Canvas {
            width: 4,
            height: 4,
        },
        &mut ts,
    )
    .unwrap();
    let mut pm = vello_cpu::Pixmap::new(2, 2);
    assert!(matches!(
        painter.finish(&mut pm),
        Err(PhotocardError::SurfaceAcquisition(_))
    ));
}
