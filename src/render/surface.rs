use crate::foundation::core::Canvas;
use crate::foundation::error::{PhotocardError, PhotocardResult};
use crate::foundation::math::Fnv1a64;

/// What a surface was last painted from. A stamp whose revision no longer matches the slot
/// set marks the surface as stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderStamp {
    pub revision: u64,
    pub template_id: String,
}

/// A drawing surface the compositor can paint into.
pub trait RenderTarget {
    /// Resize to `canvas` and discard previous content and stamp.
    fn acquire(&mut self, canvas: Canvas) -> PhotocardResult<&mut vello_cpu::Pixmap>;
    /// Record what the content painted since the last `acquire` corresponds to.
    fn stamp(&mut self, stamp: RenderStamp);
    fn last_stamp(&self) -> Option<&RenderStamp>;
}

/// In-memory premultiplied RGBA8 surface.
#[derive(Default)]
pub struct Surface {
    pixmap: Option<vello_cpu::Pixmap>,
    stamp: Option<RenderStamp>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("stamp", &self.stamp)
            .finish()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, |p| u32::from(p.width()))
    }

    pub fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, |p| u32::from(p.height()))
    }

    pub fn is_painted(&self) -> bool {
        self.stamp.is_some()
    }

    /// Premultiplied RGBA8 bytes; empty before the first paint.
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map_or(&[], |p| p.data_as_u8_slice())
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = (y as usize * self.width() as usize + x as usize) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Content hash over size and pixels.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width());
        h.write_u32(self.height());
        h.write_bytes(self.data());
        h.finish()
    }

    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        let mut out = self.data().to_vec();
        unpremultiply_in_place(&mut out);
        out
    }

    /// Forget the painted content's provenance without touching the pixels.
    pub fn invalidate(&mut self) {
        self.stamp = None;
    }
}

impl RenderTarget for Surface {
    fn acquire(&mut self, canvas: Canvas) -> PhotocardResult<&mut vello_cpu::Pixmap> {
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| PhotocardError::surface(format!("width {} exceeds u16", canvas.width)))?;
        let h: u16 = canvas.height.try_into().map_err(|_| {
            PhotocardError::surface(format!("height {} exceeds u16", canvas.height))
        })?;
        if w == 0 || h == 0 {
            return Err(PhotocardError::surface("surface has zero size"));
        }

        self.stamp = None;
        let pixmap = match self.pixmap.take() {
            Some(mut p) if p.width() == w && p.height() == h => {
                p.data_as_u8_slice_mut().fill(0);
                p
            }
            _ => vello_cpu::Pixmap::new(w, h),
        };
        Ok(self.pixmap.insert(pixmap))
    }

    fn stamp(&mut self, stamp: RenderStamp) {
        self.stamp = Some(stamp);
    }

    fn last_stamp(&self) -> Option<&RenderStamp> {
        self.stamp.as_ref()
    }
}

/// The two surfaces every render pass paints: the on-screen preview and the export source.
#[derive(Debug, Default)]
pub struct RenderTargets {
    pub preview: Surface,
    pub export: Surface,
}

impl RenderTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.preview.invalidate();
        self.export.invalidate();
    }
}

pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        match a {
            0 => px[..3].fill(0),
            255 => {}
            _ => {
                for c in &mut px[..3] {
                    let v = (u16::from(*c) * 255 + a / 2) / a;
                    *c = v.min(255) as u8;
                }
            }
        }
    }
}
