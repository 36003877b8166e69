use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::capture::device::CapturedFrame;
use crate::foundation::error::{PhotocardError, PhotocardResult};

/// An encoded bitmap held by a slot: the bytes of a data URI plus its media type.
///
/// Cloning is cheap; the payload is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageSource {
    mime: String,
    bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageSource {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes: Arc::new(bytes),
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Parse `data:[<mime>][;base64],<payload>`.
    ///
    /// Non-base64 payloads are percent-decoded. A missing media type defaults to `text/plain`
    /// like browsers do; decoding will reject it later.
    pub fn from_data_uri(uri: &str) -> PhotocardResult<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| PhotocardError::validation("data URI must start with 'data:'"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| PhotocardError::validation("data URI is missing ','"))?;

        let mut params = header.split(';');
        let mime = match params.next().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_ascii_lowercase(),
            _ => "text/plain".to_string(),
        };
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        let bytes = if is_base64 {
            base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|e| PhotocardError::validation(format!("invalid base64 payload: {e}")))?
        } else {
            percent_decode(payload)?
        };

        Ok(Self::new(mime, bytes))
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(self.bytes.as_slice())
        )
    }

    /// Encode a straight-alpha camera frame as PNG, like a canvas `toDataURL("image/png")`.
    pub fn from_camera_frame(frame: &CapturedFrame) -> PhotocardResult<Self> {
        let expected = (frame.width as usize)
            .checked_mul(frame.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| PhotocardError::validation("camera frame size overflow"))?;
        if frame.width == 0 || frame.height == 0 || frame.rgba8.len() != expected {
            return Err(PhotocardError::validation(format!(
                "camera frame {}x{} does not match {} RGBA bytes",
                frame.width,
                frame.height,
                frame.rgba8.len()
            )));
        }

        let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba8.clone())
            .ok_or_else(|| PhotocardError::validation("camera frame buffer rejected"))?;
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .context("encode camera frame as png")?;
        Ok(Self::new("image/png", png))
    }
}

/// A file picked on the upload path, before it is accepted into a slot.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub name: Option<String>,
    /// Media type reported by the picker, if any.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Read a file from disk, inferring the media type from its extension.
    pub fn from_path(path: &Path) -> PhotocardResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read upload '{}'", path.display()))?;
        let mime = image::ImageFormat::from_path(path)
            .ok()
            .map(|f| f.to_mime_type().to_string());
        Ok(Self {
            name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            mime,
            bytes,
        })
    }
}

/// Normalize an upload into a slot payload. Anything that is not `image/*` is refused with
/// [`PhotocardError::UnsupportedFileType`].
pub fn accept_upload(file: UploadedFile) -> PhotocardResult<ImageSource> {
    let mime = file
        .mime
        .as_deref()
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !mime.starts_with("image/") {
        let label = file.name.unwrap_or_else(|| "<unnamed>".to_string());
        return Err(PhotocardError::unsupported_file_type(format!(
            "'{label}' has media type '{mime}'"
        )));
    }
    Ok(ImageSource::new(mime, file.bytes))
}

fn percent_decode(s: &str) -> PhotocardResult<Vec<u8>> {
    let raw = s.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let hex = raw
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| PhotocardError::validation("invalid percent escape in data URI"))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
