//! WebAssembly bindings.
//!
//! The browser already has the `.ctlx` bytes (fetched, maybe brotli-decoded by
//! the HTTP layer). These bindings decode and project them and hand back plain
//! JS objects shaped like [`ArchiveView`]:
//! - `decodeCatalog(bytes)`: one-shot, returns the whole view
//! - `catalogFreshness(bytes)`: just the freshness timestamp
//! - `CatalexArchive`: keeps the view on the Rust side for lookups

use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

use crate::binary::decode;
use crate::error::FormatError;
use crate::view::{project, ArchiveView};

fn js_error(e: FormatError) -> JsValue {
    js_sys::Error::new(&format!("Failed to decode catalog: {}", e)).into()
}

fn load(bytes: &[u8]) -> Result<ArchiveView, JsValue> {
    let index = decode(bytes).map_err(js_error)?;
    Ok(project(&index))
}

/// Decode and project a catalog buffer into a plain JS object.
#[wasm_bindgen(js_name = decodeCatalog)]
pub fn decode_catalog(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let view = load(bytes)?;
    to_value(&view).map_err(|e| e.to_string().into())
}

/// Freshness of a catalog buffer, without building the view.
///
/// Returned as f64 since JS numbers can't hold every i64.
#[wasm_bindgen(js_name = catalogFreshness)]
pub fn catalog_freshness(bytes: &[u8]) -> Result<f64, JsValue> {
    let index = decode(bytes).map_err(js_error)?;
    Ok(index.freshness() as f64)
}

/// A decoded archive held on the Rust side.
#[wasm_bindgen]
pub struct CatalexArchive {
    view: ArchiveView,
}

#[wasm_bindgen]
impl CatalexArchive {
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8]) -> Result<CatalexArchive, JsValue> {
        Ok(CatalexArchive { view: load(bytes)? })
    }

    /// The whole view as a JS object.
    #[wasm_bindgen]
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_value(&self.view).map_err(|e| e.to_string().into())
    }

    #[wasm_bindgen(js_name = updatedAt)]
    pub fn updated_at(&self) -> f64 {
        self.view.updated_at as f64
    }

    #[wasm_bindgen(js_name = postCount)]
    pub fn post_count(&self) -> usize {
        self.view.posts.len()
    }

    /// Look a post up by any of its codes; `undefined` when not found.
    #[wasm_bindgen(js_name = postByCode)]
    pub fn post_by_code(&self, code: &str) -> Result<JsValue, JsValue> {
        match self.view.post_by_code(code) {
            Some(post) => to_value(post).map_err(|e| e.to_string().into()),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = isNewerThan)]
    pub fn is_newer_than(&self, updated_at: f64) -> bool {
        self.view.is_newer_than(updated_at as i64)
    }
}
