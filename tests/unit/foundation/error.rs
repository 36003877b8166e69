use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PhotocardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PhotocardError::device_access_denied("x")
            .to_string()
            .contains("device access denied:")
    );
    assert!(
        PhotocardError::surface("x")
            .to_string()
            .contains("surface acquisition failed:")
    );
    assert_eq!(
        PhotocardError::decode(2, "bad header").to_string(),
        "decode error in slot 2: bad header"
    );
    assert_eq!(
        PhotocardError::UnknownTemplate("nope".to_string()).to_string(),
        "unknown template 'nope'"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PhotocardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
