//! Offline catalog build: manifest + channel files in, `.ctlx` out.

pub mod manifest;
pub mod parallel;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

#[cfg(feature = "parallel")]
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::binary::encode;
use crate::types::CatalogSource;

pub use manifest::*;
pub use parallel::*;

/// What a build wrote to disk.
#[derive(Debug, Clone)]
pub struct BuiltCatalog {
    pub path: PathBuf,
    pub brotli_path: Option<PathBuf>,
    pub bytes: usize,
    pub crc32: u32,
    pub channel_count: usize,
    pub entry_count: usize,
}

/// Create a progress style for the main progress bars
#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╸")
}

/// Read manifest and channels from `input_dir` into an encodable source.
pub fn load_source(input_dir: &Path) -> anyhow::Result<CatalogSource> {
    let manifest_path = input_dir.join("manifest.json");
    let manifest_content = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
    let manifest = CatalogManifest::parse(&manifest_content)
        .with_context(|| format!("Invalid manifest {}", manifest_path.display()))?;

    #[cfg(feature = "parallel")]
    let channels = {
        let multi = MultiProgress::new();
        let load_pb = multi.add(ProgressBar::new(manifest.channels.len() as u64));
        load_pb.set_style(create_progress_style());
        load_pb.set_prefix("Loading");
        load_pb.set_message("channels...");
        let channels = parallel::load_channels_with_progress(input_dir, &manifest, &load_pb)?;
        load_pb.finish_with_message(format!("loaded {} channels", channels.len()));
        channels
    };

    #[cfg(not(feature = "parallel"))]
    let channels = parallel::load_channels_with_progress(input_dir, &manifest)?;

    let mut source = CatalogSource {
        schema_updated_at: manifest.schema_updated_at,
        schema_styles: manifest.schema_styles,
        channels,
    };
    source.fill_channel_tags();
    Ok(source)
}

/// Content-hashed output name: `{stem}-{crc32:08x}.ctlx`.
pub fn output_filename(stem: &str, crc32: u32) -> String {
    format!("{}-{:08x}.ctlx", stem, crc32)
}

pub fn run_build(
    input_dir: &str,
    output_dir: &str,
    brotli: bool,
    name: &str,
) -> anyhow::Result<BuiltCatalog> {
    let input_path = Path::new(input_dir);
    let output_path = Path::new(output_dir);

    let source = load_source(input_path)?;
    if source.channels.is_empty() {
        eprintln!("⚠️  Manifest lists no channels; writing an empty catalog");
    }

    let bytes = encode(&source).context("Failed to encode catalog")?;
    let crc32 = compute_crc32(&bytes);

    fs::create_dir_all(output_path)
        .with_context(|| format!("Failed to create output dir {}", output_path.display()))?;

    let path = output_path.join(output_filename(name, crc32));
    fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("  ✓ {}", path.display());

    let brotli_path = if brotli {
        let compressed = compress_brotli(&bytes)?;
        let br_path = path.with_extension("ctlx.br");
        fs::write(&br_path, &compressed)
            .with_context(|| format!("Failed to write {}", br_path.display()))?;
        eprintln!("  ✓ {} ({})", br_path.display(), format_bytes(compressed.len()));
        Some(br_path)
    } else {
        None
    };

    let built = BuiltCatalog {
        path,
        brotli_path,
        bytes: bytes.len(),
        crc32,
        channel_count: source.channels.len(),
        entry_count: source.entry_count(),
    };

    eprintln!();
    eprintln!("✅ Build complete");
    eprintln!(
        "   {} channels │ {} entries │ {}",
        built.channel_count,
        built.entry_count,
        format_bytes(built.bytes)
    );

    Ok(built)
}

/// Brotli at quality 11, window 22, the way static hosts pre-compress assets.
pub fn compress_brotli(bytes: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut compressed = Vec::new();
    {
        let mut encoder = brotli::CompressorWriter::new(&mut compressed, 4096, 11, 22);
        encoder
            .write_all(bytes)
            .context("Brotli compression failed")?;
    }
    Ok(compressed)
}

/// CRC32 of an encoded catalog, used for content-hashed filenames.
pub fn compute_crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

pub fn format_bytes(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
