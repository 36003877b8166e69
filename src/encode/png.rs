use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{PhotocardError, PhotocardResult};
use crate::render::surface::Surface;

/// A finished export: suggested file name plus PNG bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub png: Vec<u8>,
}

impl std::fmt::Debug for ExportFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportFile")
            .field("file_name", &self.file_name)
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// `<prefix>-<unix_ms>.png`
pub fn export_file_name(prefix: &str, unix_ms: i64) -> String {
    format!("{prefix}-{unix_ms}.png")
}

/// Encode a painted surface as straight-alpha RGBA PNG.
#[tracing::instrument(skip(surface), fields(width = surface.width(), height = surface.height()))]
pub fn encode_png(surface: &Surface) -> PhotocardResult<Vec<u8>> {
    if surface.width() == 0 || surface.height() == 0 {
        return Err(PhotocardError::validation("surface has not been painted"));
    }
    let img = image::RgbaImage::from_raw(surface.width(), surface.height(), surface.to_rgba8_straight())
        .ok_or_else(|| PhotocardError::validation("surface buffer does not match its size"))?;
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode export png")?;
    tracing::debug!(bytes = png.len(), "export encoded");
    Ok(png)
}

pub fn export_surface(
    surface: &Surface,
    prefix: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> PhotocardResult<ExportFile> {
    Ok(ExportFile {
        file_name: export_file_name(prefix, now.timestamp_millis()),
        png: encode_png(surface)?,
    })
}
