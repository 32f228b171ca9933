//! Tests for manifest parsing.

use catalex::build::{CatalogManifest, MANIFEST_VERSION};

#[test]
fn test_parse_manifest_valid() {
    let json = r#"{
        "version": 1,
        "channels": ["redstone.json", "farms.json"]
    }"#;
    let manifest = CatalogManifest::parse(json).unwrap();
    assert_eq!(manifest.version, MANIFEST_VERSION);
    assert_eq!(manifest.channels.len(), 2);
    assert_eq!(manifest.schema_updated_at, None);
}

#[test]
fn test_parse_manifest_empty_channels() {
    let manifest = CatalogManifest::parse(r#"{"version": 1, "channels": []}"#).unwrap();
    assert!(manifest.channels.is_empty());
}

#[test]
fn test_parse_manifest_styles_any_json() {
    let json = r#"{"version": 1, "channels": [], "schemaStyles": ["a", 1, null]}"#;
    let manifest = CatalogManifest::parse(json).unwrap();
    assert_eq!(manifest.schema_styles, r#"["a",1,null]"#);
}

#[test]
fn test_parse_manifest_invalid_json() {
    assert!(CatalogManifest::parse("{ invalid }").is_err());
}

#[test]
fn test_parse_manifest_wrong_version() {
    let err = CatalogManifest::parse(r#"{"version": 3, "channels": []}"#).unwrap_err();
    assert!(err.to_string().contains("Unsupported manifest version 3"));
}

#[test]
fn test_parse_manifest_missing_version() {
    assert!(CatalogManifest::parse(r#"{"channels": []}"#).is_err());
}
