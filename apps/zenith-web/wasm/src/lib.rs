//! WASM bindings for the Zenith PDF annotation editor
//!
//! All editor state lives in Rust inside an [`EditSession`]. The page shell
//! renders pages and the text layer with pdf.js, forwards pointer events, and
//! paints the overlay items the session hands back.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { EditSession, analyzePage } from './pkg/zenith_wasm.js';
//!
//! await init();
//!
//! const session = new EditSession();
//! session.loadDocument(file.name, bytes);
//! session.setTool("pen");
//! session.pointerDown(x, y, undefined);
//! session.pointerMove(x2, y2);
//! session.pointerUp();
//! paintOverlay(session.renderOverlay());
//!
//! const request = session.beginAnalysis();
//! const analysis = await analyzePage(apiKey, canvas.toDataURL("image/png"));
//! session.finishAnalysis(request, analysis);
//!
//! session.download();
//! ```

pub mod download;
pub mod edit_session;

use wasm_bindgen::prelude::*;
use zenith_core::analysis::{self, GeminiBackend, PageAnalysis, PageImage};
use zenith_core::config::AnalysisConfig;

pub use edit_session::{AnalysisRequest, EditSession, RenderRequest};

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Summarize a rendered page. Resolves to the fallback analysis on any
/// failure, never rejects.
#[wasm_bindgen(js_name = analyzePage)]
pub async fn analyze_page(api_key: String, image_data_uri: String) -> Result<JsValue, JsValue> {
    let config = AnalysisConfig::default();
    let result = match GeminiBackend::new(api_key, &config) {
        Ok(backend) => {
            let image = PageImage::from_data_uri(&image_data_uri);
            analysis::analyze_page(&backend, &image, config.max_key_points).await
        }
        Err(e) => {
            tracing::warn!("analysis backend unavailable: {}", e);
            PageAnalysis::fallback()
        }
    };
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Suggest a more professional wording for `text`; resolves to `text`
/// itself when the backend is unavailable.
#[wasm_bindgen(js_name = suggestEdit)]
pub async fn suggest_edit(api_key: String, text: String) -> String {
    match GeminiBackend::new(api_key, &AnalysisConfig::default()) {
        Ok(backend) => analysis::suggest_edit(&backend, &text).await,
        Err(e) => {
            tracing::warn!("analysis backend unavailable: {}", e);
            text
        }
    }
}
