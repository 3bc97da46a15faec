//! CLI command tests
//!
//! Drive each subcommand end to end through argument parsing.

use super::*;
use crate::config::parse_args;
use crate::integrity::Manifest;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn run(args: &[&str]) -> Result<()> {
    let mut argv = vec!["fxpack"];
    argv.extend_from_slice(args);
    run_command(parse_args(argv).unwrap())
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Write a fixture model and return its path
fn fixture(dir: &TempDir, extra: &[&str]) -> PathBuf {
    let path = dir.path().join("model.safetensors");
    let mut args = vec!["fixture", "-q", "-o", path_str(&path)];
    args.extend_from_slice(extra);
    run(&args).unwrap();
    path
}

#[test]
fn test_fixture_then_export() {
    let tmp = TempDir::new().unwrap();
    let weights = fixture(&tmp, &["--seed", "3"]);
    let out = tmp.path().join("artifacts");

    run(&["export", "-q", "-w", path_str(&weights), "-o", path_str(&out), "--seed", "1"]).unwrap();

    assert_eq!(std::fs::metadata(out.join("dw3x3_c3.bin")).unwrap().len(), 27);
    assert_eq!(std::fs::metadata(out.join("pw1x1_c10x3.bin")).unwrap().len(), 30);
    assert_eq!(std::fs::metadata(out.join("labels.txt")).unwrap().len(), 20);
    assert_eq!(std::fs::metadata(out.join("sample_32x32.bmp")).unwrap().len(), 3126);
}

#[test]
fn test_export_manifest_then_verify() {
    let tmp = TempDir::new().unwrap();
    let weights = fixture(&tmp, &[]);
    let out = tmp.path().join("artifacts");
    let manifest = tmp.path().join("manifest.json");

    run(&[
        "export",
        "-q",
        "-w",
        path_str(&weights),
        "-o",
        path_str(&out),
        "--seed",
        "9",
        "--manifest-out",
        path_str(&manifest),
    ])
    .unwrap();

    assert_eq!(Manifest::load(&manifest).unwrap().artifacts.len(), 4);
    run(&["verify", "-q", "--dir", path_str(&out), "--manifest", path_str(&manifest)]).unwrap();

    std::fs::write(out.join("labels.txt"), b"tampered").unwrap();
    let err = run(&["verify", "-q", "--dir", path_str(&out), "--manifest", path_str(&manifest)])
        .unwrap_err();
    assert_eq!(err.code(), "E060");
}

#[test]
fn test_export_json_format() {
    let tmp = TempDir::new().unwrap();
    let weights = fixture(&tmp, &["--fill-depthwise", "0.5", "--fill-pointwise", "-0.25"]);
    let out = tmp.path().join("artifacts");

    run(&[
        "export",
        "--format",
        "json",
        "-w",
        path_str(&weights),
        "-o",
        path_str(&out),
        "--seed",
        "2",
    ])
    .unwrap();
    assert!(out.join("sample_32x32.bmp").exists());
}

#[test]
fn test_export_without_source_fails() {
    let err = run(&["export", "-q"]).unwrap_err();
    assert!(err.is_user_error());
}

#[test]
fn test_export_missing_weights() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("missing.safetensors");
    let out = tmp.path().join("artifacts");
    let err = run(&["export", "-q", "-w", path_str(&missing), "-o", path_str(&out)]).unwrap_err();

    assert_eq!(err.code(), "E010");
    assert!(!out.exists());
}

#[test]
fn test_validate_command() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("export.yaml");
    std::fs::write(&config, "input:\n  path: model.safetensors\n").unwrap();
    run(&["validate", "-q", "-c", path_str(&config)]).unwrap();

    std::fs::write(&config, "input:\n  path: ''\n").unwrap();
    let err = run(&["validate", "-q", "-c", path_str(&config)]).unwrap_err();
    assert_eq!(err.code(), "E003");
}

#[test]
fn test_validate_missing_config() {
    let err = run(&["validate", "-q", "-c", "/nonexistent/export.yaml"]).unwrap_err();
    assert_eq!(err.code(), "E001");
}
