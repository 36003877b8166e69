use super::*;
use crate::capture::machine::{AcquisitionPath, CaptureStateMachine};

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn source(bytes: Vec<u8>) -> ImageSource {
    ImageSource::new("image/png", bytes)
}

#[test]
fn decode_image_premultiplies_alpha() {
    let raster = decode_image(&png(1, 1, [200, 100, 50, 128])).unwrap();
    assert_eq!((raster.width, raster.height), (1, 1));
    assert_eq!(raster.rgba8_premul, vec![100, 50, 25, 128]);

    let clear = decode_image(&png(1, 1, [200, 100, 50, 0])).unwrap();
    assert_eq!(clear.rgba8_premul, vec![0, 0, 0, 0]);
}

#[test]
fn decode_sources_keeps_slot_order() {
    let sources = [
        source(png(3, 1, [255, 0, 0, 255])),
        source(png(1, 2, [0, 255, 0, 255])),
        source(png(2, 2, [0, 0, 255, 255])),
    ];
    let images = decode_sources(&sources, PostFilter::None).unwrap();
    assert_eq!((images[0].width(), images[0].height()), (3, 1));
    assert_eq!((images[1].width(), images[1].height()), (1, 2));
    assert_eq!((images[2].width(), images[2].height()), (2, 2));
    assert_eq!(&images[2].rgba8_premul()[..4], &[0, 0, 255, 255]);
}

#[test]
fn one_bad_payload_fails_the_whole_set() {
    let sources = [
        source(png(2, 2, [1, 2, 3, 255])),
        source(b"not an image".to_vec()),
        source(png(2, 2, [1, 2, 3, 255])),
    ];
    let err = decode_sources(&sources, PostFilter::None).unwrap_err();
    assert!(matches!(err, PhotocardError::Decode { slot: 1, .. }));
}

#[test]
fn grayscale_filter_equalizes_channels() {
    let sources = [
        source(png(1, 1, [255, 0, 0, 255])),
        source(png(1, 1, [0, 255, 0, 255])),
        source(png(1, 1, [10, 20, 30, 0])),
    ];
    let images = decode_sources(&sources, PostFilter::Grayscale).unwrap();
    let red = images[0].rgba8_premul();
    assert_eq!(red[0], red[1]);
    assert_eq!(red[1], red[2]);
    assert_eq!(red[0], 54);
    assert_eq!(images[1].rgba8_premul()[0], 182);
    assert_eq!(images[2].rgba8_premul(), &[0, 0, 0, 0]);
}

#[test]
fn decode_all_requires_a_complete_set() {
    let mut machine = CaptureStateMachine::new();
    machine
        .fill(None, source(png(1, 1, [0, 0, 0, 255])), AcquisitionPath::Upload)
        .unwrap();
    let err = decode_all(machine.slots(), PostFilter::None).unwrap_err();
    assert!(matches!(err, PhotocardError::Validation(_)));
}

#[test]
fn decode_all_tags_result_with_slot_revision() {
    let mut machine = CaptureStateMachine::new();
    for px in [[9, 9, 9, 255], [8, 8, 8, 255], [7, 7, 7, 255]] {
        machine
            .fill(None, source(png(1, 1, px)), AcquisitionPath::Upload)
            .unwrap();
    }
    let set = decode_all(machine.slots(), PostFilter::None).unwrap();
    assert_eq!(set.revision(), machine.slots().revision());
    assert_eq!(set.get(2).unwrap().rgba8_premul()[0], 7);
    assert!(set.get(3).is_none());
}

#[test]
fn decoded_image_rejects_oversized_and_mismatched_input() {
    assert!(DecodedImage::from_premul_rgba8(70_000, 1, &[]).is_err());
    assert!(DecodedImage::from_premul_rgba8(0, 1, &[]).is_err());
    assert!(DecodedImage::from_premul_rgba8(2, 1, &[0; 4]).is_err());
}

#[test]
fn post_filter_parses_snake_case() {
    let f: PostFilter = serde_json::from_str("\"grayscale\"").unwrap();
    assert_eq!(f, PostFilter::Grayscale);
    assert_eq!(PostFilter::default(), PostFilter::None);
}
