//! End-to-end tests for the build workflow.

use std::fs;

use catalex::build::{load_source, output_filename, run_build};
use catalex::{decode, project};
use tempfile::TempDir;

const BUILD_FIXTURES_DIR: &str = "data/build-fixtures";

#[test]
fn test_run_build_e2e_basic() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output");
    let input_path = format!("{}/valid", BUILD_FIXTURES_DIR);

    let built = run_build(&input_path, output_path.to_str().unwrap(), false, "catalog")
        .expect("build should succeed");

    assert!(built.path.exists(), "{} should exist", built.path.display());
    assert!(built.brotli_path.is_none());
    assert_eq!(
        built.path.file_name().unwrap().to_str().unwrap(),
        output_filename("catalog", built.crc32)
    );
    assert_eq!(built.channel_count, 2);
    assert_eq!(built.entry_count, 4);

    let bytes = fs::read(&built.path).unwrap();
    assert_eq!(bytes.len(), built.bytes);

    let index = decode(&bytes).unwrap();
    assert_eq!(index.schema_updated_at, Some(1_700_000_000_000));
    assert_eq!(index.schema_styles, r##"{"tagColors":{"redstone":"#c0392b"}}"##);

    let view = project(&index);
    assert_eq!(view.channels[0].code, "redstone");
    assert_eq!(view.channels[1].code, "farms");
    assert_eq!(view.posts[0].id, "iron-farm");
    assert_eq!(view.channels[0].category, "Contraptions");
}

#[test]
fn test_run_build_fills_channel_tags_from_entries() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = format!("{}/valid", BUILD_FIXTURES_DIR);
    let built =
        run_build(&input_path, temp_dir.path().to_str().unwrap(), false, "catalog").unwrap();

    let view = project(&decode(&fs::read(&built.path).unwrap()).unwrap());
    // "doors" is listed in the channel file; the rest come from its entries
    assert_eq!(view.channels[0].tags, vec!["doors", "redstone", "piston", "clock"]);
}

#[test]
fn test_run_build_e2e_with_brotli() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = format!("{}/valid", BUILD_FIXTURES_DIR);

    let built =
        run_build(&input_path, temp_dir.path().to_str().unwrap(), true, "archive").unwrap();
    let br_path = built.brotli_path.expect("brotli output");
    assert!(br_path.to_str().unwrap().ends_with(".ctlx.br"));

    let compressed = fs::read(&br_path).unwrap();
    let mut decompressed = Vec::new();
    brotli::BrotliDecompress(&mut &compressed[..], &mut decompressed).unwrap();
    assert_eq!(decompressed, fs::read(&built.path).unwrap());
}

#[test]
fn test_run_build_is_reproducible() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    let input_path = format!("{}/valid", BUILD_FIXTURES_DIR);

    let first = run_build(&input_path, a.path().to_str().unwrap(), false, "catalog").unwrap();
    let second = run_build(&input_path, b.path().to_str().unwrap(), false, "catalog").unwrap();
    assert_eq!(first.crc32, second.crc32);
    assert_eq!(fs::read(&first.path).unwrap(), fs::read(&second.path).unwrap());
}

#[test]
fn test_run_build_e2e_missing_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output");

    let err = run_build(
        temp_dir.path().to_str().unwrap(),
        output_path.to_str().unwrap(),
        false,
        "catalog",
    )
    .unwrap_err();
    assert!(
        format!("{:#}", err).contains("Failed to read manifest"),
        "Error should mention manifest: {:#}",
        err
    );
    assert!(!output_path.exists());
}

#[test]
fn test_run_build_e2e_invalid_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = format!("{}/invalid-manifest", BUILD_FIXTURES_DIR);

    let err = run_build(&input_path, temp_dir.path().to_str().unwrap(), false, "catalog")
        .unwrap_err();
    assert!(
        format!("{:#}", err).contains("Invalid manifest"),
        "Error should mention the manifest: {:#}",
        err
    );
}

#[test]
fn test_run_build_rejects_entry_without_codes() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = format!("{}/bad-entry", BUILD_FIXTURES_DIR);

    let err = run_build(&input_path, temp_dir.path().to_str().unwrap(), false, "catalog")
        .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("has no codes"), "{}", msg);
    assert!(fs::read_dir(temp_dir.path()).unwrap().next().is_none());
}

#[test]
fn test_load_source_keeps_manifest_order() {
    let temp_dir = TempDir::new().unwrap();
    for code in ["b", "a", "c"] {
        fs::write(
            temp_dir.path().join(format!("{}.json", code)),
            format!(r#"{{"code": "{}", "name": "{}"}}"#, code, code.to_uppercase()),
        )
        .unwrap();
    }
    fs::write(
        temp_dir.path().join("manifest.json"),
        r#"{"version": 1, "channels": ["c.json", "a.json", "b.json"]}"#,
    )
    .unwrap();

    let source = load_source(temp_dir.path()).unwrap();
    let codes: Vec<_> = source.channels.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["c", "a", "b"]);
}
