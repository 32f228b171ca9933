use serde::Deserialize;

use crate::types::raw_json;

/// Manifest format the build tool understands.
pub const MANIFEST_VERSION: u32 = 1;

/// `manifest.json` at the root of a build input directory.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CatalogManifest {
    pub version: u32,
    #[serde(default)]
    pub schema_updated_at: Option<i64>,
    /// Kept as compact JSON text; never interpreted
    #[serde(default, deserialize_with = "raw_json")]
    pub schema_styles: String,
    /// Channel files, relative to the manifest, in catalog order
    pub channels: Vec<String>,
}

impl CatalogManifest {
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let manifest: CatalogManifest = serde_json::from_str(json)?;
        if manifest.version != MANIFEST_VERSION {
            anyhow::bail!(
                "Unsupported manifest version {} (expected {})",
                manifest.version,
                MANIFEST_VERSION
            );
        }
        Ok(manifest)
    }
}
