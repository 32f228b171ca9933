//! Custom cargo commands for catalex.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests (default and no-default features)
//!   cargo xtask kani      - Run Kani proofs for the varint codec
//!   cargo xtask fuzz      - Short fuzzing pass over every target
//!   cargo xtask check     - Quick check (no Kani, no fuzz)
//!   cargo xtask bench     - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

const FUZZ_TARGETS: &[&str] = &["catalog_decode", "catalog_roundtrip", "varint_codec"];

/// Seconds per target for `cargo xtask fuzz`.
const FUZZ_SECONDS: u32 = 30;

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("kani") => kani()?,
        Some("fuzz") => fuzz()?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify    Run full verification suite (format constants + tests + clippy + Kani)
  test      Run all Rust tests, with and without default features
  kani      Run Kani proofs only
  fuzz      Run each fuzz target for {}s
  check     Quick check (cargo check + test + clippy)
  bench     Run benchmarks
"#,
        FUZZ_SECONDS
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("Catalex Verification Suite");
    println!("==========================================\n");

    println!("[1/4] Checking format constants...");
    verify_format_constants()?;
    println!("✓ Magic and version match the documented layout\n");

    println!("[2/4] Running Rust tests...");
    test()?;
    println!("✓ All Rust tests passed\n");

    println!("[3/4] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("[4/4] Running Kani proofs...");
    kani()?;
    println!("✓ Kani proofs pass\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test", "--quiet"])?;
    run_cargo(&["test", "--quiet", "--no-default-features"])
}

/// Kani proofs live behind `cfg(kani)` in the varint codec.
fn kani() -> Result<()> {
    if !tool_available("cargo-kani") {
        println!("  (cargo-kani not installed, skipping)");
        return Ok(());
    }
    run_cargo(&["kani", "--no-default-features"])
}

/// Short fuzzing pass. Needs a nightly toolchain and cargo-fuzz.
fn fuzz() -> Result<()> {
    if !tool_available("cargo-fuzz") {
        bail!("cargo-fuzz not installed (cargo install cargo-fuzz)");
    }

    let max_time = format!("-max_total_time={}", FUZZ_SECONDS);
    for target in FUZZ_TARGETS {
        println!("Fuzzing {} for {}s...", target, FUZZ_SECONDS);
        run_cargo(&["+nightly", "fuzz", "run", target, "--", &max_time])?;
    }

    println!("\n✓ No crashes in {} targets", FUZZ_TARGETS.len());
    Ok(())
}

/// Quick check (no Kani)
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("No current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

fn tool_available(name: &str) -> bool {
    Command::new(name)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// The header constants and the layout table in the module docs must agree.
fn verify_format_constants() -> Result<()> {
    let root = project_root()?;
    let header = std::fs::read_to_string(root.join("src/binary/header.rs"))
        .context("Failed to read header.rs")?;
    let docs = std::fs::read_to_string(root.join("src/binary/mod.rs"))
        .context("Failed to read binary/mod.rs")?;

    let magic = extract_const(&header, "MAGIC").context("MAGIC not found in header.rs")?;
    let bytes: Vec<u8> = magic
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|b| u8::from_str_radix(b.trim().trim_start_matches("0x"), 16))
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Unparseable MAGIC: {}", magic))?;
    let magic_text = String::from_utf8(bytes).context("MAGIC is not ASCII")?;
    if magic_text != "CTLX" {
        bail!("MAGIC spells {:?}, expected \"CTLX\"", magic_text);
    }
    if !docs.contains(&magic_text) {
        bail!("binary/mod.rs layout docs do not mention {}", magic_text);
    }

    let version = extract_const(&header, "VERSION").context("VERSION not found in header.rs")?;
    if !docs.contains(&version) {
        bail!("binary/mod.rs layout docs do not mention version {}", version);
    }

    Ok(())
}

/// Value of `pub const NAME: T = VALUE;`
fn extract_const(content: &str, name: &str) -> Option<String> {
    let prefix = format!("pub const {}:", name);
    content
        .lines()
        .find(|line| line.trim_start().starts_with(&prefix))
        .and_then(|line| line.split('=').nth(1))
        .map(|value| value.trim().trim_end_matches(';').trim().to_string())
}
