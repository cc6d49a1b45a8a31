//! Edit session for PDF annotation editing
//!
//! Thin `wasm-bindgen` wrapper over [`zenith_core::Editor`]. Coordinates
//! coming in are viewport pixels; structured results go out as JSON strings
//! or plain JS objects.

use wasm_bindgen::prelude::*;
use zenith_core::analysis::PageAnalysis;
use zenith_core::annotation::{AnnotationId, AnnotationPatch, ToolSettings};
use zenith_core::config::EditorConfig;
use zenith_core::editor::{AnalysisTicket, RenderTicket};
use zenith_core::geometry::{Point, Rect};
use zenith_core::{Editor, EditorError, LopdfExporter, PointerTarget, TextSpan, Tool};

fn js_error(e: EditorError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn decode_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> Result<T, EditorError> {
    serde_json::from_str(json)
        .map_err(|e| EditorError::SerializationError(format!("invalid {} JSON: {}", what, e)))
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, EditorError> {
    serde_json::to_string(value).map_err(|e| EditorError::SerializationError(e.to_string()))
}

fn parse_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> Result<T, JsValue> {
    decode_json(what, json).map_err(js_error)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    encode_json(value).map_err(js_error)
}

/// A page render in flight. Paint only if `isRenderCurrent` still says so.
#[wasm_bindgen]
pub struct RenderRequest {
    ticket: RenderTicket,
}

#[wasm_bindgen]
impl RenderRequest {
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.ticket.scale
    }

    /// 0-based page index to render
    #[wasm_bindgen(getter)]
    pub fn page(&self) -> u32 {
        self.ticket.page
    }
}

/// An analysis call in flight, tied to the document it was started for.
#[wasm_bindgen]
pub struct AnalysisRequest {
    ticket: AnalysisTicket,
}

/// Session for annotating a single PDF document at a time
#[wasm_bindgen]
#[derive(Default)]
pub struct EditSession {
    editor: Editor,
}

#[wasm_bindgen]
impl EditSession {
    /// Create a session, optionally from a TOML editor config
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<EditSession, JsValue> {
        let config = match config_toml.as_deref() {
            Some(toml) => EditorConfig::from_toml_str(toml).map_err(js_error)?,
            None => EditorConfig::default(),
        };
        let editor = Editor::new(config).map_err(js_error)?;
        Ok(EditSession { editor })
    }

    // =========================================================================
    // DOCUMENT
    // =========================================================================

    /// Load a PDF. Returns page sizes as JSON; on failure the previous
    /// document stays loaded.
    #[wasm_bindgen(js_name = loadDocument)]
    pub fn load_document(&mut self, name: &str, bytes: &[u8]) -> Result<String, JsValue> {
        let info = self
            .editor
            .load_document(name, bytes.to_vec())
            .map_err(|e| JsValue::from_str(&format!("Parse error: {}", e)))?;
        to_json(info)
    }

    #[wasm_bindgen(getter, js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.editor.is_loaded()
    }

    #[wasm_bindgen(getter, js_name = pageCount)]
    pub fn page_count(&self) -> u32 {
        self.editor.page().count()
    }

    #[wasm_bindgen(getter, js_name = documentName)]
    pub fn document_name(&self) -> Option<String> {
        self.editor.document_name().map(str::to_string)
    }

    /// Get document bytes for pdf.js rendering
    #[wasm_bindgen(js_name = getDocumentBytes)]
    pub fn get_document_bytes(&self) -> Option<js_sys::Uint8Array> {
        self.editor.document_bytes().map(js_sys::Uint8Array::from)
    }

    // =========================================================================
    // TOOLS
    // =========================================================================

    #[wasm_bindgen(getter)]
    pub fn tool(&self) -> String {
        self.editor.tool().name().to_string()
    }

    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, name: &str) -> Result<(), JsValue> {
        let tool = Tool::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown tool: {}", name)))?;
        self.editor.set_tool(tool);
        Ok(())
    }

    #[wasm_bindgen(js_name = getSettings)]
    pub fn get_settings(&self) -> Result<String, JsValue> {
        to_json(self.editor.settings())
    }

    /// Replace tool settings from JSON; omitted fields take defaults
    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&mut self, settings_json: &str) -> Result<(), JsValue> {
        let settings: ToolSettings = parse_json("settings", settings_json)?;
        self.editor.set_settings(settings);
        Ok(())
    }

    // =========================================================================
    // POINTER INPUT
    // =========================================================================

    /// Pointer pressed at viewport `(x, y)`, on `target` if an annotation
    /// element received the event.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, target: Option<u64>) -> Result<(), JsValue> {
        let target = match target {
            Some(id) => PointerTarget::Annotation(AnnotationId::new(id)),
            None => PointerTarget::Background,
        };
        self.editor
            .pointer_down(Point::new(x, y), target)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.editor.pointer_move(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<(), JsValue> {
        self.editor.pointer_up().map_err(js_error)
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Result<(), JsValue> {
        self.editor.pointer_leave().map_err(js_error)
    }

    /// Whiteout a text-layer span (viewport box) and overlay editable text
    #[wasm_bindgen(js_name = editTextSpan)]
    pub fn edit_text_span(
        &mut self,
        text: &str,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        let span = TextSpan {
            text: text.to_string(),
            bounds: Rect::new(left, top, width, height),
        };
        self.editor.edit_text_span(&span).map_err(js_error)
    }

    // =========================================================================
    // ANNOTATIONS AND HISTORY
    // =========================================================================

    /// Current annotation set as JSON, in paint order
    #[wasm_bindgen(js_name = getAnnotationsJson)]
    pub fn get_annotations_json(&self) -> Result<String, JsValue> {
        to_json(&self.editor.annotations().to_vec())
    }

    #[wasm_bindgen(getter)]
    pub fn selection(&self) -> Option<u64> {
        self.editor.selection().map(AnnotationId::get)
    }

    pub fn select(&mut self, id: Option<u64>) -> bool {
        self.editor.select(id.map(AnnotationId::new))
    }

    /// Apply a properties-panel patch. Returns false for an unknown id.
    #[wasm_bindgen(js_name = updateAnnotation)]
    pub fn update_annotation(&mut self, id: u64, patch_json: &str) -> Result<bool, JsValue> {
        let patch: AnnotationPatch = parse_json("patch", patch_json)?;
        self.editor
            .update_annotation(AnnotationId::new(id), &patch)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = deleteAnnotation)]
    pub fn delete_annotation(&mut self, id: u64) -> Result<bool, JsValue> {
        self.editor
            .delete_annotation(AnnotationId::new(id))
            .map_err(js_error)
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    // =========================================================================
    // VIEW
    // =========================================================================

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.editor.scale()
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> f64 {
        self.editor.zoom_in()
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> f64 {
        self.editor.zoom_out()
    }

    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        self.editor.set_scale(scale)
    }

    #[wasm_bindgen(getter, js_name = currentPage)]
    pub fn current_page(&self) -> u32 {
        self.editor.page().index()
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&mut self) -> u32 {
        self.editor.next_page()
    }

    #[wasm_bindgen(js_name = prevPage)]
    pub fn prev_page(&mut self) -> u32 {
        self.editor.prev_page()
    }

    #[wasm_bindgen(js_name = setPage)]
    pub fn set_page(&mut self, index: u32) -> Result<u32, JsValue> {
        self.editor.set_page(index).map_err(js_error)
    }

    /// "3 / 10" style label
    #[wasm_bindgen(getter, js_name = pageLabel)]
    pub fn page_label(&self) -> String {
        self.editor.page().label()
    }

    #[wasm_bindgen(js_name = requestRender)]
    pub fn request_render(&mut self) -> RenderRequest {
        RenderRequest {
            ticket: self.editor.request_render(),
        }
    }

    #[wasm_bindgen(js_name = isRenderCurrent)]
    pub fn is_render_current(&self, request: &RenderRequest) -> bool {
        self.editor.is_render_current(&request.ticket)
    }

    /// Overlay items for the current page as JSON
    #[wasm_bindgen(js_name = renderOverlay)]
    pub fn render_overlay(&self) -> Result<String, JsValue> {
        to_json(&self.editor.render_overlay())
    }

    #[wasm_bindgen(js_name = hitTest)]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<u64> {
        self.editor.hit_test(Point::new(x, y)).map(AnnotationId::get)
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Flatten the current annotations into the PDF and return the bytes.
    /// History is untouched whether or not this succeeds.
    pub fn export(&self) -> Result<js_sys::Uint8Array, JsValue> {
        let bytes = self.export_bytes().map_err(js_error)?;
        Ok(js_sys::Uint8Array::from(bytes.as_slice()))
    }

    /// Export and hand the file to the browser as a download
    pub fn download(&self) -> Result<(), JsValue> {
        let bytes = self.export_bytes().map_err(js_error)?;
        crate::download::download_pdf(&bytes, &self.editor.export_file_name())
    }

    #[wasm_bindgen(getter, js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        self.editor.export_file_name()
    }

    // =========================================================================
    // ANALYSIS
    // =========================================================================

    /// Mark analysis pending for the current document
    #[wasm_bindgen(js_name = beginAnalysis)]
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, JsValue> {
        let ticket = self.editor.begin_analysis().map_err(js_error)?;
        Ok(AnalysisRequest { ticket })
    }

    /// Store an analysis result. Returns false if another document was
    /// loaded since the request started.
    #[wasm_bindgen(js_name = finishAnalysis)]
    pub fn finish_analysis(&mut self, request: AnalysisRequest, result: JsValue) -> bool {
        let analysis: PageAnalysis =
            serde_wasm_bindgen::from_value(result).unwrap_or_else(|_| PageAnalysis::fallback());
        self.editor.finish_analysis(request.ticket, analysis)
    }

    #[wasm_bindgen(getter, js_name = analysisPending)]
    pub fn analysis_pending(&self) -> bool {
        self.editor.analysis_pending()
    }

    #[wasm_bindgen(js_name = getAnalysisJson)]
    pub fn get_analysis_json(&self) -> Result<Option<String>, JsValue> {
        self.editor.analysis_result().map(to_json).transpose()
    }
}

impl EditSession {
    fn export_bytes(&self) -> Result<Vec<u8>, EditorError> {
        self.editor.export_with(&LopdfExporter)
    }
}
