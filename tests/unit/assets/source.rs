use super::*;

#[test]
fn data_uri_base64_roundtrip_keeps_mime_and_bytes() {
    let src = ImageSource::new("image/png", vec![0x89, b'P', b'N', b'G', 0, 255]);
    let uri = src.to_data_uri();
    assert!(uri.starts_with("data:image/png;base64,"));
    assert_eq!(ImageSource::from_data_uri(&uri).unwrap(), src);
}

#[test]
fn data_uri_plain_payload_is_percent_decoded() {
    let src = ImageSource::from_data_uri("data:,a%20b%2Cc").unwrap();
    assert_eq!(src.mime(), "text/plain");
    assert_eq!(src.bytes(), b"a b,c");
}

#[test]
fn malformed_data_uris_are_rejected() {
    assert!(ImageSource::from_data_uri("image/png;base64,AAAA").is_err());
    assert!(ImageSource::from_data_uri("data:image/png;base64").is_err());
    assert!(ImageSource::from_data_uri("data:image/png;base64,@@@").is_err());
    assert!(ImageSource::from_data_uri("data:,%zz").is_err());
}

#[test]
fn upload_requires_image_media_type() {
    let ok = accept_upload(UploadedFile {
        name: Some("a.jpg".to_string()),
        mime: Some("Image/JPEG".to_string()),
        bytes: vec![1, 2, 3],
    })
    .unwrap();
    assert_eq!(ok.mime(), "image/jpeg");

    let err = accept_upload(UploadedFile {
        name: Some("notes.txt".to_string()),
        mime: Some("text/plain".to_string()),
        bytes: vec![1],
    })
    .unwrap_err();
    assert!(matches!(err, PhotocardError::UnsupportedFileType(_)));

    let err = accept_upload(UploadedFile {
        name: None,
        mime: None,
        bytes: vec![1],
    })
    .unwrap_err();
    assert!(matches!(err, PhotocardError::UnsupportedFileType(_)));
}

#[test]
fn camera_frame_encodes_to_decodable_png() {
    let frame = CapturedFrame {
        width: 2,
        height: 1,
        rgba8: vec![255, 0, 0, 255, 0, 0, 255, 255],
    };
    let src = ImageSource::from_camera_frame(&frame).unwrap();
    assert_eq!(src.mime(), "image/png");
    let back = image::load_from_memory(src.bytes()).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (2, 1));
    assert_eq!(back.into_raw(), frame.rgba8);
}

#[test]
fn camera_frame_with_wrong_length_is_rejected() {
    let frame = CapturedFrame {
        width: 2,
        height: 2,
        rgba8: vec![0; 4],
    };
    assert!(ImageSource::from_camera_frame(&frame).is_err());
}
