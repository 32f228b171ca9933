use std::fs;

use anyhow::Context;
use clap::Parser;

use catalex::binary::{decode, major, SUPPORTED_MAJOR};
use catalex::build::{compress_brotli, compute_crc32, format_bytes, run_build};
use catalex::{project, ArchiveView, CatalogIndex};

mod cli;
use cli::display::{
    banner, dangling_count, kv_row, pad_right, row, savings_colored, section_bot, section_mid,
    section_top, themed, timestamp, truncate, CYAN, GRAY,
};
use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            input,
            output,
            brotli,
            name,
        } => run_build(&input, &output, brotli, &name).map(|_| ()),
        Commands::Inspect { file } => inspect_catalog_file(&file),
        Commands::Dump {
            file,
            limit,
            pretty,
        } => dump_catalog_file(&file, limit, pretty),
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn read_catalog(path: &str) -> anyhow::Result<(Vec<u8>, CatalogIndex)> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path))?;
    let index = decode(&bytes).with_context(|| format!("Failed to decode {}", path))?;
    Ok((bytes, index))
}

// ═══════════════════════════════════════════════════════════════════════════
// INSPECT
// ═══════════════════════════════════════════════════════════════════════════

const MAX_LISTED_CHANNELS: usize = 20;

fn inspect_catalog_file(path: &str) -> anyhow::Result<()> {
    let (bytes, index) = read_catalog(path)?;
    let compressed = compress_brotli(&bytes)?;
    let dangling = index.dangling_references();

    banner("CATALEX CATALOG");

    section_top("FILE");
    kv_row("path", &truncate(path, 52));
    kv_row("size", &format_bytes(bytes.len()));
    kv_row("crc32", &format!("{:08x}", compute_crc32(&bytes)));
    kv_row(
        "brotli",
        &format!(
            "{} ({})",
            format_bytes(compressed.len()),
            savings_colored(bytes.len(), compressed.len())
        ),
    );

    section_mid("HEADER");
    kv_row(
        "version",
        &format!(
            "{:#04x} (major {}, minor {}, reader supports {})",
            index.version,
            major(index.version),
            index.version & 0x0f,
            SUPPORTED_MAJOR
        ),
    );
    kv_row("schema updated", &timestamp(index.schema_updated_at));
    kv_row(
        "schema styles",
        &if index.schema_styles.is_empty() {
            themed(GRAY, &[], "none")
        } else {
            format_bytes(index.schema_styles.len())
        },
    );

    section_mid("TABLES");
    kv_row("categories", &index.categories.len().to_string());
    kv_row("tags", &index.tags.len().to_string());
    kv_row("authors", &index.authors.len().to_string());

    section_mid("CHANNELS");
    kv_row("channels", &index.channels.len().to_string());
    kv_row("entries", &index.entry_count().to_string());
    for channel in index.channels.iter().take(MAX_LISTED_CHANNELS) {
        let category = catalex::types::resolve(&index.categories, channel.category).unwrap_or("");
        row(&format!(
            "   {} {} {} {}",
            pad_right(&themed(CYAN, &[], &truncate(&channel.code, 10)), 10),
            pad_right(&truncate(&channel.name, 28), 28),
            pad_right(&format!("{} entries", channel.entries.len()), 12),
            themed(GRAY, &[], &truncate(category, 16)),
        ));
    }
    if index.channels.len() > MAX_LISTED_CHANNELS {
        row(&themed(
            GRAY,
            &[],
            &format!("   … {} more", index.channels.len() - MAX_LISTED_CHANNELS),
        ));
    }

    section_mid("REFERENCES");
    kv_row("bad categories", &dangling_count(dangling.categories));
    kv_row("bad tags", &dangling_count(dangling.tags));
    kv_row("bad authors", &dangling_count(dangling.authors));

    section_mid("FRESHNESS");
    kv_row("updated at", &timestamp(Some(index.freshness())));
    section_bot();

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// DUMP
// ═══════════════════════════════════════════════════════════════════════════

fn render_view(
    mut view: ArchiveView,
    limit: Option<usize>,
    pretty: bool,
) -> serde_json::Result<String> {
    if let Some(n) = limit {
        view.posts.truncate(n);
    }
    if pretty {
        serde_json::to_string_pretty(&view)
    } else {
        serde_json::to_string(&view)
    }
}

fn dump_catalog_file(path: &str, limit: Option<usize>, pretty: bool) -> anyhow::Result<()> {
    let (_, index) = read_catalog(path)?;
    let json = render_view(project(&index), limit, pretty)?;
    println!("{}", json);
    Ok(())
}
