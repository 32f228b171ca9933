//! Compact binary catalog index for static archive sites.
//!
//! A whole archive (channels, their entries, and the tag, author and category
//! strings they share) packed into one small buffer that a browser fetches in
//! a single request and decodes in a single pass.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐  encode   ┌──────────┐  decode   ┌──────────────┐  project  ┌─────────────┐
//! │ CatalogSource │──────────▶│  bytes   │──────────▶│ CatalogIndex │──────────▶│ ArchiveView │
//! │ (strings)     │           │  (.ctlx) │           │ (raw indices)│           │ (resolved,  │
//! └───────────────┘           └──────────┘           └──────────────┘           │  sorted)    │
//!        ▲                                                                      └─────────────┘
//!        │ build (manifest.json + channel files)
//! ```
//!
//! Decoding is strict about shape and lenient about references: a truncated
//! or malformed buffer is an error, but a tag index past the end of the tag
//! table just disappears during projection.
//!
//! # Usage
//!
//! ```ignore
//! use catalex::{decode, encode, project};
//!
//! let bytes = encode(&source)?;
//! let index = decode(&bytes)?;
//! let view = project(&index);
//! for post in &view.posts {
//!     println!("{} {:?}", post.name, post.tags);
//! }
//! ```

// Module declarations
pub mod binary;
#[cfg(not(target_arch = "wasm32"))]
pub mod build;
pub mod error;
pub mod testing;
pub mod types;
pub mod util;
pub mod view;

#[cfg(feature = "wasm")]
mod wasm;

// Re-exports for public API
pub use binary::{decode, encode, encode_index, sniff};
pub use error::{EncodeError, FormatError, FormatErrorKind};
pub use types::{
    CatalogIndex, CatalogSource, ChannelRecord, ChannelSource, DanglingRefs, EntryRecord,
    EntrySource, ImagePath,
};
pub use view::{project, ArchiveView, ChannelView, PostView};
