use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AzothError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        AzothError::degenerate("x")
            .to_string()
            .contains("degenerate generation:")
    );
    assert!(
        AzothError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn asset_not_found_names_kind_and_path() {
    let err = AzothError::asset_not_found(AssetKind::Font, "fonts/missing.ttf");
    let msg = err.to_string();
    assert!(msg.contains("font not found"));
    assert!(msg.contains("missing.ttf"));
    assert!(err.is_asset_not_found());
    assert!(!AzothError::validation("x").is_asset_not_found());
}

#[test]
fn io_errors_pass_through_unchanged() {
    let base = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
    let err = AzothError::from(base);
    assert_eq!(err.to_string(), "read-only volume");
    let AzothError::Io(inner) = err else {
        panic!("expected Io variant");
    };
    assert_eq!(inner.kind(), std::io::ErrorKind::PermissionDenied);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AzothError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let parse = serde_json::from_str::<u32>("nope").unwrap_err();
    let err = AzothError::from(parse);
    assert!(matches!(err, AzothError::Serde(_)));
}
