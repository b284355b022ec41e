use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MorphError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MorphError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        MorphError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MorphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
