use std::sync::Arc;

use anyhow::Context;
use rayon::prelude::*;

use crate::assets::source::ImageSource;
use crate::capture::slots::PhotoSlotSet;
use crate::foundation::core::SLOT_COUNT;
use crate::foundation::error::{PhotocardError, PhotocardResult};
use crate::foundation::math::mul_div255;

/// First-phase decode output: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

/// A decoded bitmap ready to be used as an image paint.
#[derive(Clone)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl DecodedImage {
    /// Wrap premultiplied RGBA8 bytes. Dimensions must fit the rasterizer's `u16` limits.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: &[u8]) -> PhotocardResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| PhotocardError::validation("image width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PhotocardError::validation("image height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(PhotocardError::validation("image has zero size"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(PhotocardError::validation("image byte length mismatch"));
        }

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for px in rgba8_premul.chunks_exact(4) {
            let a = px[3];
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a,
            });
        }

        Ok(Self {
            width,
            height,
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels,
                w,
                h,
                may_have_opacities,
            )),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba8_premul(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Optional per-bitmap transform applied after the primary decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostFilter {
    #[default]
    None,
    /// Luminance-only output using the Rec. 709 weights of CSS `grayscale(1)`.
    Grayscale,
}

impl PostFilter {
    /// Second decode phase: filter the raster and build the paintable bitmap.
    pub fn apply(self, mut raster: Raster) -> PhotocardResult<DecodedImage> {
        match self {
            Self::None => {}
            Self::Grayscale => grayscale_in_place(&mut raster.rgba8_premul),
        }
        DecodedImage::from_premul_rgba8(raster.width, raster.height, &raster.rgba8_premul)
    }
}

/// Three bitmaps in slot order, tagged with the slot revision they were decoded from.
#[derive(Clone, Debug)]
pub struct DecodedImageSet {
    images: [DecodedImage; SLOT_COUNT],
    revision: u64,
}

impl DecodedImageSet {
    pub fn images(&self) -> &[DecodedImage; SLOT_COUNT] {
        &self.images
    }

    pub fn get(&self, slot: usize) -> Option<&DecodedImage> {
        self.images.get(slot)
    }

    /// Slot revision of the [`PhotoSlotSet`] these bitmaps came from.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PhotocardResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Raster {
        width,
        height,
        rgba8_premul,
    })
}

/// Decode every slot of a complete set.
///
/// Fails with a validation error while any slot is empty, and with [`PhotocardError::Decode`] if
/// any single payload is unreadable; partial sets are never returned.
pub fn decode_all(slots: &PhotoSlotSet, filter: PostFilter) -> PhotocardResult<DecodedImageSet> {
    let sources = slots
        .sources()
        .ok_or_else(|| PhotocardError::validation("decode requires all slots to be filled"))?;
    let images = decode_sources(&sources, filter)?;
    Ok(DecodedImageSet {
        images,
        revision: slots.revision(),
    })
}

/// Decode the three payloads concurrently, keeping slot order.
#[tracing::instrument(skip(sources))]
pub fn decode_sources(
    sources: &[ImageSource; SLOT_COUNT],
    filter: PostFilter,
) -> PhotocardResult<[DecodedImage; SLOT_COUNT]> {
    let rasters = sources
        .par_iter()
        .enumerate()
        .map(|(slot, src)| {
            decode_image(src.bytes()).map_err(|e| PhotocardError::decode(slot, format!("{e:#}")))
        })
        .collect::<PhotocardResult<Vec<_>>>()?;

    // Second barrier: filtered rasters must all be ready before the set is.
    let images = rasters
        .into_par_iter()
        .enumerate()
        .map(|(slot, raster)| {
            filter
                .apply(raster)
                .map_err(|e| PhotocardError::decode(slot, e.to_string()))
        })
        .collect::<PhotocardResult<Vec<_>>>()?;

    tracing::debug!(
        sizes = ?images.iter().map(|i| (i.width(), i.height())).collect::<Vec<_>>(),
        "decoded slot images"
    );

    images
        .try_into()
        .map_err(|_| PhotocardError::validation("decode produced wrong image count"))
}

pub(crate) fn with_revision(images: [DecodedImage; SLOT_COUNT], revision: u64) -> DecodedImageSet {
    DecodedImageSet { images, revision }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255(*c, a);
        }
    }
}

// Weights sum to 256 so premultiplied input stays premultiplied.
fn grayscale_in_place(rgba8_premul: &mut [u8]) {
    for px in rgba8_premul.chunks_exact_mut(4) {
        let y = (54 * u32::from(px[0]) + 183 * u32::from(px[1]) + 19 * u32::from(px[2]) + 128) >> 8;
        let y = y.min(u32::from(px[3])) as u8;
        px[0] = y;
        px[1] = y;
        px[2] = y;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
