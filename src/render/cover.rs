/// Source rectangle selected by [`cover_crop`], in image pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverCrop {
    pub sx: f64,
    pub sy: f64,
    pub sw: f64,
    pub sh: f64,
}

impl CoverCrop {
    pub fn full(iw: f64, ih: f64) -> Self {
        Self {
            sx: 0.0,
            sy: 0.0,
            sw: iw,
            sh: ih,
        }
    }
}

/// Largest centered region of an `iw`×`ih` image with the aspect ratio of a `bw`×`bh` box.
///
/// Scaling that region onto the box fills it completely without distortion. Degenerate sizes
/// (zero, negative or non-finite) fall back to the whole image.
pub fn cover_crop(iw: f64, ih: f64, bw: f64, bh: f64) -> CoverCrop {
    let sane = |v: f64| v.is_finite() && v > 0.0;
    if !(sane(iw) && sane(ih) && sane(bw) && sane(bh)) {
        return CoverCrop::full(iw.max(0.0), ih.max(0.0));
    }

    let img_ratio = iw / ih;
    let box_ratio = bw / bh;
    if img_ratio > box_ratio {
        let sw = ih * box_ratio;
        CoverCrop {
            sx: (iw - sw) / 2.0,
            sy: 0.0,
            sw,
            sh: ih,
        }
    } else {
        let sh = iw / box_ratio;
        CoverCrop {
            sx: 0.0,
            sy: (ih - sh) / 2.0,
            sw: iw,
            sh,
        }
    }
}
