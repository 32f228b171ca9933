// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the catalex command-line interface.
//!
//! Three subcommands: `build` turns a manifest and channel files into a
//! `.ctlx` catalog, `inspect` prints what a catalog holds, and `dump` prints
//! the projected view as JSON.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "catalex",
    about = "Compact binary catalog index builder and inspector",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a catalog from a directory with manifest.json and channel files
    Build {
        /// Input directory containing manifest.json and channel files
        #[arg(short, long)]
        input: String,

        /// Output directory for the .ctlx file
        #[arg(short, long)]
        output: String,

        /// Also write a brotli-compressed .ctlx.br next to it
        #[arg(long)]
        brotli: bool,

        /// File name stem; the CRC32 of the contents is appended
        #[arg(long, default_value = "catalog")]
        name: String,
    },

    /// Print a summary of a .ctlx file
    Inspect {
        /// Path to .ctlx file
        file: String,
    },

    /// Decode, project, and print the archive view as JSON
    Dump {
        /// Path to .ctlx file
        file: String,

        /// Only print the newest N posts
        #[arg(short, long)]
        limit: Option<usize>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}
