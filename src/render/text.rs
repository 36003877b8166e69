use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::config::FontConfig;

/// Generic family requested by a template; resolved against whatever faces are installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Sans,
    Serif,
}

impl FontFamily {
    fn candidates(self) -> &'static [fontdb::Family<'static>] {
        match self {
            Self::Sans => &[
                fontdb::Family::Name("Arial"),
                fontdb::Family::Name("Liberation Sans"),
                fontdb::Family::Name("DejaVu Sans"),
                fontdb::Family::Name("Noto Sans"),
                fontdb::Family::SansSerif,
            ],
            Self::Serif => &[
                fontdb::Family::Name("Georgia"),
                fontdb::Family::Name("Times New Roman"),
                fontdb::Family::Name("Liberation Serif"),
                fontdb::Family::Name("DejaVu Serif"),
                fontdb::Family::Name("Noto Serif"),
                fontdb::Family::Serif,
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub family: FontFamily,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    pub const fn sans(size: f32) -> Self {
        Self {
            family: FontFamily::Sans,
            size,
            bold: false,
            italic: false,
        }
    }

    pub const fn serif(size: f32) -> Self {
        Self {
            family: FontFamily::Serif,
            size,
            bold: false,
            italic: false,
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    pub const fn italic(self) -> Self {
        Self {
            italic: true,
            ..self
        }
    }

    fn face_key(self) -> FaceKey {
        FaceKey {
            family: self.family,
            bold: self.bold,
            italic: self.italic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct FaceKey {
    family: FontFamily,
    bold: bool,
    italic: bool,
}

/// Installed font faces: system fonts and configured directories.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<fontdb::Database>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl FontBook {
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
        }
    }

    pub fn load(cfg: &FontConfig) -> Self {
        let mut db = fontdb::Database::new();
        if cfg.system {
            db.load_system_fonts();
        }
        for dir in &cfg.dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "font book loaded");
        Self { db: Arc::new(db) }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Bytes and collection index of the best face for `key`, if any face is installed.
    fn resolve(&self, key: FaceKey) -> Option<(Vec<u8>, u32)> {
        let weight = if key.bold {
            fontdb::Weight::BOLD
        } else {
            fontdb::Weight::NORMAL
        };
        let style = if key.italic {
            fontdb::Style::Italic
        } else {
            fontdb::Style::Normal
        };
        let query = fontdb::Query {
            families: key.family.candidates(),
            weight,
            stretch: fontdb::Stretch::Normal,
            style,
        };
        let id = self.db.query(&query).or_else(|| {
            // Nothing in the requested family: take the closest weight/style of any family.
            self.db
                .faces()
                .min_by_key(|f| {
                    let weight_gap = (i32::from(f.weight.0) - i32::from(weight.0)).abs();
                    let style_gap = i32::from(f.style != style) * 1000;
                    weight_gap + style_gap
                })
                .map(|f| f.id)
        })?;
        self.db.with_face_data(id, |data, index| (data.to_vec(), index))
    }
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

#[derive(Clone)]
struct LoadedFace {
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// A shaped single-line label, positioned relative to its own top-left corner.
pub struct TextBlock {
    pub(crate) layout: parley::Layout<()>,
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) size: f32,
}

impl TextBlock {
    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    /// Distance from the top of the block to the first baseline.
    pub fn baseline(&self) -> f64 {
        self.layout
            .lines()
            .next()
            .map_or(0.0, |l| f64::from(l.metrics().baseline))
    }

    pub(crate) fn glyphs(&self) -> Vec<vello_cpu::Glyph> {
        let mut out = Vec::new();
        for line in self.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                out.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }
        out
    }
}

/// Shapes labels with parley against faces from a [`FontBook`].
pub struct Typesetter {
    book: FontBook,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: HashMap<FaceKey, Option<LoadedFace>>,
}

impl Typesetter {
    pub fn new(book: FontBook) -> Self {
        Self {
            book,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    pub fn book(&self) -> &FontBook {
        &self.book
    }

    /// Shape `text`; `None` when no face could be resolved or the text is empty.
    pub fn layout(&mut self, text: &str, style: TextStyle) -> Option<TextBlock> {
        if text.is_empty() || !style.size.is_finite() || style.size <= 0.0 {
            return None;
        }
        let face = self.face(style.face_key())?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size));
        builder.push_default(parley::style::StyleProperty::FontWeight(if style.bold {
            parley::style::FontWeight::BOLD
        } else {
            parley::style::FontWeight::NORMAL
        }));
        if style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Some(TextBlock {
            layout,
            font: face.font,
            size: style.size,
        })
    }

    fn face(&mut self, key: FaceKey) -> Option<LoadedFace> {
        if let Some(cached) = self.faces.get(&key) {
            return cached.clone();
        }
        let loaded = self.load_face(key);
        if loaded.is_none() {
            tracing::warn!(?key, "no font face available, text will be skipped");
        }
        self.faces.insert(key, loaded.clone());
        loaded
    }

    fn load_face(&mut self, key: FaceKey) -> Option<LoadedFace> {
        let (bytes, index) = self.book.resolve(key)?;
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id)?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)?
            .to_string();
        Some(LoadedFace {
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index),
        })
    }
}
