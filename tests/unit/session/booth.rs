use super::*;
use crate::encode::sink::InMemorySink;
use crate::capture::machine::DeviceState;

fn png(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn upload_file(px: [u8; 4]) -> UploadedFile {
    UploadedFile {
        name: Some("photo.png".to_string()),
        mime: Some("image/png".to_string()),
        bytes: png(8, 6, px),
    }
}

fn session() -> PhotoboothSession {
    let config = ComposerConfig {
        decor_seed: Some(11),
        ..ComposerConfig::default()
    };
    PhotoboothSession::with_fonts(config, TemplateRegistry::builtin(), FontBook::empty()).unwrap()
}

fn filled_session() -> PhotoboothSession {
    let mut s = session();
    for px in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]] {
        s.upload(upload_file(px)).unwrap();
    }
    s
}

fn slot(i: usize) -> SlotIndex {
    SlotIndex::new(i).unwrap()
}

#[test]
fn non_image_uploads_are_ignored() {
    let mut s = session();
    let revision = s.slots().revision();
    let outcome = s
        .upload(UploadedFile {
            name: Some("notes.txt".to_string()),
            mime: Some("text/plain".to_string()),
            bytes: b"hello".to_vec(),
        })
        .unwrap();
    assert_eq!(outcome, UploadOutcome::Ignored);
    assert_eq!(s.slots().revision(), revision);
}

#[test]
fn fourth_upload_is_refused() {
    let mut s = filled_session();
    assert!(matches!(
        s.upload(upload_file([1, 2, 3, 255])),
        Err(PhotocardError::SlotsFull)
    ));
}

#[test]
fn template_selection_waits_for_all_slots() {
    let mut s = session();
    s.upload(upload_file([9, 9, 9, 255])).unwrap();
    assert!(matches!(
        s.select_template("classic"),
        Err(PhotocardError::Validation(_))
    ));

    let mut s = filled_session();
    assert!(matches!(
        s.select_template("sepia"),
        Err(PhotocardError::UnknownTemplate(_))
    ));
    assert_eq!(s.selected_template(), None);
}

#[test]
fn compose_paints_both_targets_and_exports() {
    let mut s = filled_session();
    s.select_template("polaroid").unwrap();
    s.compose().unwrap();

    assert!(s.is_target_valid(s.preview()));
    assert!(s.is_target_valid(s.export_surface()));
    assert_eq!(s.preview().fingerprint(), s.export_surface().fingerprint());

    let mut sink = InMemorySink::new();
    s.export(&mut sink).unwrap();
    let file = &sink.files()[0];
    assert!(file.file_name.starts_with("KKN-Photo-"));
    assert!(file.file_name.ends_with(".png"));
    let back = image::load_from_memory(&file.png).unwrap();
    assert_eq!((back.width(), back.height()), (1080, 1920));
}

#[test]
fn retake_invalidates_painted_targets() {
    let mut s = filled_session();
    s.select_template("classic").unwrap();
    s.compose().unwrap();

    assert_eq!(s.retake(slot(1)), Some(DeviceSignal::Start));
    assert!(!s.is_target_valid(s.preview()));
    assert!(!s.is_target_valid(s.export_surface()));
    assert!(s.decoded().is_none());
    assert!(s.export_file().is_err());
    assert!(s.render().is_err());
}

#[test]
fn stale_decode_is_discarded() {
    let mut s = filled_session();
    let job = s.begin_decode().unwrap();
    s.retake(slot(0));
    s.stop_camera();
    s.upload(upload_file([50, 50, 50, 255])).unwrap();

    let done = job.run();
    assert_eq!(s.complete_decode(done).unwrap(), DecodeOutcome::Stale);
    assert!(s.decoded().is_none());

    let fresh = s.begin_decode().unwrap().run();
    assert_eq!(s.complete_decode(fresh).unwrap(), DecodeOutcome::Applied);
    assert_eq!(s.decoded().unwrap().revision(), s.slots().revision());
}

#[test]
fn failed_decode_leaves_session_complete_but_unrendered() {
    let mut s = session();
    s.upload(upload_file([1, 1, 1, 255])).unwrap();
    s.upload(UploadedFile {
        name: Some("broken.png".to_string()),
        mime: Some("image/png".to_string()),
        bytes: b"not a png".to_vec(),
    })
    .unwrap();
    s.upload(upload_file([2, 2, 2, 255])).unwrap();
    s.select_template("gradient").unwrap();

    assert!(matches!(s.compose(), Err(PhotocardError::Decode { slot: 1, .. })));
    assert!(s.is_complete());
    assert!(!s.preview().is_painted());
}

#[test]
fn camera_frames_fill_in_order_and_stop() {
    let mut s = session();
    assert_eq!(s.start_camera(), Some(DeviceSignal::Start));
    let frame = CapturedFrame {
        width: 2,
        height: 2,
        rgba8: vec![200; 16],
    };
    assert_eq!(s.camera_frame(&frame).unwrap().slot, Some(slot(0)));
    assert_eq!(s.camera_frame(&frame).unwrap().slot, Some(slot(1)));
    let last = s.camera_frame(&frame).unwrap();
    assert_eq!(last.slot, Some(slot(2)));
    assert_eq!(last.signal, Some(DeviceSignal::Stop));
    assert!(s.is_complete());
}

#[test]
fn upload_filling_the_last_slot_reports_stop_to_the_caller() {
    let mut s = session();
    s.start_camera();
    let frame = CapturedFrame {
        width: 2,
        height: 2,
        rgba8: vec![90; 16],
    };
    s.camera_frame(&frame).unwrap();
    s.camera_frame(&frame).unwrap();

    assert_eq!(
        s.upload(upload_file([1, 2, 3, 255])).unwrap(),
        UploadOutcome::Filled {
            slot: slot(2),
            signal: Some(DeviceSignal::Stop),
        }
    );
    assert_eq!(s.machine().device_state(), DeviceState::Idle);
}

#[test]
fn reset_forgets_template_and_slots() {
    let mut s = filled_session();
    s.select_template("polaroid").unwrap();
    s.compose().unwrap();
    s.reset();
    assert_eq!(s.selected_template(), None);
    assert_eq!(s.slots().filled_count(), 0);
    assert!(!s.is_target_valid(s.preview()));
}

#[test]
fn invalid_config_is_rejected() {
    let config = ComposerConfig {
        export_prefix: "../out".to_string(),
        ..ComposerConfig::default()
    };
    assert!(
        PhotoboothSession::with_fonts(config, TemplateRegistry::builtin(), FontBook::empty())
            .is_err()
    );
}
