//! Editor context
//!
//! Owns the loaded document and every piece of per-session state, and is
//! the only place history commits happen. Async work (render, export,
//! analysis) is split into begin/finish halves stamped with the document
//! generation, so a result that arrives after another document was loaded
//! is dropped instead of applied.

use crate::analysis::PageAnalysis;
use crate::annotation::{
    Annotation, AnnotationId, AnnotationPatch, IdAllocator, InkStyle, ToolSettings, HIGHLIGHT_COLOR,
};
use crate::config::EditorConfig;
use crate::document::DocumentInfo;
use crate::error::EditorError;
use crate::export::{self, PdfExporter};
use crate::flatten;
use crate::geometry::{PageCursor, Point, Zoom};
use crate::history::{HistoryStore, Snapshot};
use crate::overlay::{self, OverlayItem};
use crate::redaction::{self, TextSpan};
use crate::tools::{PointerTarget, Tool, ToolContext, ToolEffect, ToolMachine};
use serde::Serialize;
use std::sync::Arc;

struct LoadedDocument {
    name: String,
    bytes: Arc<[u8]>,
    info: DocumentInfo,
}

/// Identifies one page render request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderTicket {
    pub generation: u64,
    pub sequence: u64,
    pub scale: f64,
    pub page: u32,
}

/// Everything an export needs, captured at one instant.
#[derive(Debug, Clone)]
pub struct ExportJob {
    generation: u64,
    bytes: Arc<[u8]>,
    snapshot: Snapshot,
    page_heights: Vec<f64>,
}

impl ExportJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
}

#[derive(Debug, Default)]
struct AnalysisState {
    pending: bool,
    result: Option<PageAnalysis>,
}

pub struct Editor {
    config: EditorConfig,
    document: Option<LoadedDocument>,
    generation: u64,
    history: HistoryStore,
    tools: ToolMachine,
    selection: Option<AnnotationId>,
    settings: ToolSettings,
    zoom: Zoom,
    page: PageCursor,
    ids: IdAllocator,
    render_sequence: u64,
    analysis: AnalysisState,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            config: EditorConfig::default(),
            document: None,
            generation: 0,
            history: HistoryStore::new(),
            tools: ToolMachine::new(),
            selection: None,
            settings: ToolSettings::default(),
            zoom: Zoom::default(),
            page: PageCursor::new(0),
            ids: IdAllocator::new(),
            render_sequence: 0,
            analysis: AnalysisState::default(),
        }
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        Ok(Self {
            zoom: Zoom::from_config(&config.zoom)?,
            settings: config.tools.clone(),
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // =========================================================================
    // DOCUMENT
    // =========================================================================

    /// Parse and adopt a new document. On failure the current document,
    /// history, and selection are left exactly as they were.
    pub fn load_document(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<&DocumentInfo, EditorError> {
        let info = DocumentInfo::inspect(&bytes)
            .inspect_err(|e| tracing::warn!("Failed to load {}: {}", name, e))?;

        self.generation += 1;
        self.history = HistoryStore::new();
        self.tools.cancel();
        self.selection = None;
        self.page = PageCursor::new(info.page_count());
        self.analysis = AnalysisState::default();
        tracing::info!(
            "Loaded {} ({} pages, generation {})",
            name,
            info.page_count(),
            self.generation
        );

        let doc = self.document.insert(LoadedDocument {
            name: name.to_string(),
            bytes: Arc::from(bytes),
            info,
        });
        Ok(&doc.info)
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.name.as_str())
    }

    pub fn document_info(&self) -> Option<&DocumentInfo> {
        self.document.as_ref().map(|d| &d.info)
    }

    pub fn document_bytes(&self) -> Option<&[u8]> {
        self.document.as_ref().map(|d| &*d.bytes)
    }

    fn require_document(&self) -> Result<&LoadedDocument, EditorError> {
        self.document.as_ref().ok_or(EditorError::NoDocument)
    }

    // =========================================================================
    // TOOLS AND POINTER INPUT
    // =========================================================================

    pub fn tool(&self) -> Tool {
        self.tools.tool()
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.set_tool(tool);
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ToolSettings) {
        self.settings = settings;
    }

    /// Pointer pressed at a viewport point on the current page.
    ///
    /// Pressing on an existing annotation selects it whatever the tool.
    pub fn pointer_down(
        &mut self,
        viewport: Point,
        target: PointerTarget,
    ) -> Result<(), EditorError> {
        self.require_document()?;

        if let PointerTarget::Annotation(id) = target {
            if self.history.current().contains(id) {
                self.selection = Some(id);
                return Ok(());
            }
        }

        let mut ctx = ToolContext {
            page_index: self.page.index(),
            scale: self.zoom.scale(),
            settings: &self.settings,
            ids: &mut self.ids,
        };
        let effect = self
            .tools
            .pointer_down(&mut ctx, viewport, PointerTarget::Background)?;
        self.apply(effect)
    }

    pub fn pointer_move(&mut self, viewport: Point) {
        self.tools.pointer_move(self.zoom.scale(), viewport);
    }

    pub fn pointer_up(&mut self) -> Result<(), EditorError> {
        let mut ctx = ToolContext {
            page_index: self.page.index(),
            scale: self.zoom.scale(),
            settings: &self.settings,
            ids: &mut self.ids,
        };
        let effect = self.tools.pointer_up(&mut ctx);
        self.apply(effect)
    }

    /// Leaving the page finishes a stroke the same way releasing does.
    pub fn pointer_leave(&mut self) -> Result<(), EditorError> {
        self.pointer_up()
    }

    /// Whiteout a text-layer span and place an editable copy over it.
    /// Spans are only editable with the edit-text tool; otherwise a no-op.
    pub fn edit_text_span(&mut self, span: &TextSpan) -> Result<(), EditorError> {
        self.require_document()?;
        if self.tools.tool() != Tool::EditText {
            return Ok(());
        }
        let placement = redaction::redact_span(
            span,
            self.zoom.scale(),
            self.page.index(),
            &self.settings,
            &mut self.ids,
        );
        self.apply(ToolEffect::Commit(placement))
    }

    fn apply(&mut self, effect: ToolEffect) -> Result<(), EditorError> {
        match effect {
            ToolEffect::None => {}
            ToolEffect::ClearSelection => self.selection = None,
            ToolEffect::Commit(placement) => {
                let next = self.history.current().with_appended(placement.annotations);
                self.history.commit(next)?;
                if placement.select.is_some() {
                    self.selection = placement.select;
                }
                if let Some(tool) = placement.switch_to {
                    self.tools.set_tool(tool);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // ANNOTATIONS AND HISTORY
    // =========================================================================

    pub fn annotations(&self) -> &Snapshot {
        self.history.current()
    }

    pub fn selection(&self) -> Option<AnnotationId> {
        self.selection
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selection.and_then(|id| self.history.current().get(id))
    }

    /// Select `id`, or clear with `None`. Unknown ids are refused.
    pub fn select(&mut self, id: Option<AnnotationId>) -> bool {
        match id {
            Some(id) if !self.history.current().contains(id) => false,
            _ => {
                self.selection = id;
                true
            }
        }
    }

    pub fn update_annotation(
        &mut self,
        id: AnnotationId,
        patch: &AnnotationPatch,
    ) -> Result<bool, EditorError> {
        let Some(next) = self.history.current().with_patched(id, patch) else {
            return Ok(false);
        };
        self.history.commit(next)?;
        Ok(true)
    }

    pub fn delete_annotation(&mut self, id: AnnotationId) -> Result<bool, EditorError> {
        let Some(next) = self.history.current().without(id) else {
            return Ok(false);
        };
        self.history.commit(next)?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        Ok(true)
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            self.drop_dangling_selection();
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            self.drop_dangling_selection();
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn drop_dangling_selection(&mut self) {
        if let Some(id) = self.selection {
            if !self.history.current().contains(id) {
                self.selection = None;
            }
        }
    }

    // =========================================================================
    // VIEW
    // =========================================================================

    pub fn scale(&self) -> f64 {
        self.zoom.scale()
    }

    pub fn zoom(&self) -> &Zoom {
        &self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom.zoom_out()
    }

    pub fn set_scale(&mut self, scale: f64) -> f64 {
        self.zoom.set(scale)
    }

    pub fn page(&self) -> &PageCursor {
        &self.page
    }

    pub fn next_page(&mut self) -> u32 {
        self.tools.cancel();
        self.page.next()
    }

    pub fn prev_page(&mut self) -> u32 {
        self.tools.cancel();
        self.page.prev()
    }

    pub fn set_page(&mut self, index: u32) -> Result<u32, EditorError> {
        let index = self.page.set(index)?;
        self.tools.cancel();
        Ok(index)
    }

    /// Start a page render for the current page, scale, and snapshot.
    pub fn request_render(&mut self) -> RenderTicket {
        self.render_sequence += 1;
        RenderTicket {
            generation: self.generation,
            sequence: self.render_sequence,
            scale: self.zoom.scale(),
            page: self.page.index(),
        }
    }

    /// Only the newest ticket of the current document may paint.
    pub fn is_render_current(&self, ticket: &RenderTicket) -> bool {
        ticket.generation == self.generation && ticket.sequence == self.render_sequence
    }

    /// Overlay items for the current page, stroke preview last.
    pub fn render_overlay(&self) -> Vec<OverlayItem> {
        let scale = self.zoom.scale();
        let mut items = overlay::render_page(
            self.history.current(),
            self.page.index(),
            scale,
            self.selection,
        );
        if let Some((style, points)) = self.tools.stroke_in_progress() {
            let color = match style {
                InkStyle::Highlight => HIGHLIGHT_COLOR,
                InkStyle::Pen => self.settings.color.as_str(),
            };
            items.push(overlay::render_stroke_preview(style, points, color, scale));
        }
        items
    }

    pub fn hit_test(&self, viewport: Point) -> Option<AnnotationId> {
        overlay::hit_test(
            self.history.current(),
            self.page.index(),
            viewport,
            self.zoom.scale(),
        )
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Capture the document bytes and the current snapshot for export.
    pub fn begin_export(&self) -> Result<ExportJob, EditorError> {
        let doc = self.require_document()?;
        tracing::info!(
            "Export started ({} annotations, generation {})",
            self.history.current().len(),
            self.generation
        );
        Ok(ExportJob {
            generation: self.generation,
            bytes: Arc::clone(&doc.bytes),
            snapshot: self.history.current().clone(),
            page_heights: doc.info.page_heights(),
        })
    }

    /// Flatten and export the captured snapshot. Touches no editor state.
    pub fn run_export<E>(job: &ExportJob, exporter: &E) -> Result<Vec<u8>, EditorError>
    where
        E: PdfExporter + ?Sized,
    {
        let pages = flatten::flatten(&job.snapshot, &job.page_heights)?;
        exporter.export(&job.bytes, &pages)
    }

    /// Accept an export result. A job from an older document yields
    /// `Ok(None)`; a failed export leaves history as it was.
    pub fn finish_export(
        &self,
        job: &ExportJob,
        result: Result<Vec<u8>, EditorError>,
    ) -> Result<Option<Vec<u8>>, EditorError> {
        if job.generation != self.generation {
            tracing::debug!(
                "Discarding export for generation {} (current {})",
                job.generation,
                self.generation
            );
            return Ok(None);
        }
        match result {
            Ok(bytes) => {
                tracing::info!("Export finished ({} bytes)", bytes.len());
                Ok(Some(bytes))
            }
            Err(e) => {
                tracing::warn!("Export failed: {}", e);
                Err(e)
            }
        }
    }

    /// Synchronous begin/run/finish.
    pub fn export_with<E>(&self, exporter: &E) -> Result<Vec<u8>, EditorError>
    where
        E: PdfExporter + ?Sized,
    {
        let job = self.begin_export()?;
        let result = Self::run_export(&job, exporter);
        self.finish_export(&job, result)?
            .ok_or_else(|| EditorError::OperationError("export superseded".into()))
    }

    pub fn export_file_name(&self) -> String {
        export::export_file_name(self.document_name())
    }

    // =========================================================================
    // ANALYSIS
    // =========================================================================

    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, EditorError> {
        self.require_document()?;
        self.analysis.pending = true;
        Ok(AnalysisTicket {
            generation: self.generation,
        })
    }

    /// Store `result` if the ticket belongs to the current document.
    pub fn finish_analysis(&mut self, ticket: AnalysisTicket, result: PageAnalysis) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding analysis for generation {} (current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.analysis.pending = false;
        self.analysis.result = Some(result);
        true
    }

    pub fn analysis_pending(&self) -> bool {
        self.analysis.pending
    }

    pub fn analysis_result(&self) -> Option<&PageAnalysis> {
        self.analysis.result.as_ref()
    }

    pub fn max_key_points(&self) -> usize {
        self.config.analysis.max_key_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;
    use crate::document::fixtures::pdf_with_pages;
    use crate::export::LopdfExporter;
    use crate::geometry::Rect;
    use pretty_assertions::assert_eq;

    fn loaded(pages: &[(i64, i64)]) -> Editor {
        let mut editor = Editor::default();
        editor.set_scale(1.0);
        editor.load_document("lease.pdf", pdf_with_pages(pages)).unwrap();
        editor
    }

    fn place_rectangle(editor: &mut Editor, x: f64, y: f64) -> AnnotationId {
        editor.set_tool(Tool::Rectangle);
        editor.pointer_down(Point::new(x, y), PointerTarget::Background).unwrap();
        editor.annotations().last().unwrap().id()
    }

    struct FailingExporter;

    impl PdfExporter for FailingExporter {
        fn export(
            &self,
            _original: &[u8],
            _pages: &[flatten::PageDrawList],
        ) -> Result<Vec<u8>, EditorError> {
            Err(EditorError::OperationError("disk full".into()))
        }
    }

    #[test]
    fn test_pointer_down_requires_document() {
        let mut editor = Editor::default();
        assert!(matches!(
            editor.pointer_down(Point::new(0.0, 0.0), PointerTarget::Background),
            Err(EditorError::NoDocument)
        ));
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut editor = loaded(&[(612, 792)]);
        let id = place_rectangle(&mut editor, 10.0, 10.0);
        editor.select(Some(id));
        let generation = editor.generation();

        assert!(matches!(
            editor.load_document("broken.pdf", b"%PDF-garbage".to_vec()),
            Err(EditorError::ParseError(_))
        ));
        assert_eq!(editor.generation(), generation);
        assert_eq!(editor.document_name(), Some("lease.pdf"));
        assert_eq!(editor.annotations().len(), 1);
        assert_eq!(editor.selection(), Some(id));
    }

    #[test]
    fn test_load_resets_history_and_page() {
        let mut editor = loaded(&[(612, 792), (612, 792)]);
        place_rectangle(&mut editor, 10.0, 10.0);
        editor.next_page();

        editor.load_document("other.pdf", pdf_with_pages(&[(300, 300)])).unwrap();
        assert!(editor.annotations().is_empty());
        assert!(!editor.can_undo());
        assert_eq!(editor.page().index(), 0);
        assert_eq!(editor.page().count(), 1);
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_rectangle_path_commits_white() {
        let mut editor = loaded(&[(612, 792)]);
        editor.set_settings(ToolSettings {
            color: "#000000".into(),
            ..ToolSettings::default()
        });
        place_rectangle(&mut editor, 10.0, 10.0);
        assert_eq!(editor.annotations()[0].color(), Some("#ffffff"));
        assert_eq!(editor.tool(), Tool::Select);
    }

    #[test]
    fn test_stroke_commits_once_on_release() {
        let mut editor = loaded(&[(612, 792)]);
        editor.set_scale(2.0);
        editor.set_tool(Tool::Pen);
        editor.pointer_down(Point::new(0.0, 0.0), PointerTarget::Background).unwrap();
        editor.pointer_move(Point::new(20.0, 0.0));
        editor.pointer_move(Point::new(20.0, 20.0));
        assert!(editor.annotations().is_empty());
        assert!(matches!(
            editor.render_overlay().last(),
            Some(OverlayItem::Polyline { id: None, .. })
        ));

        editor.pointer_leave().unwrap();
        assert_eq!(editor.annotations().len(), 1);
        assert_eq!(
            editor.annotations()[0].kind(),
            &AnnotationKind::Ink {
                style: InkStyle::Pen,
                points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            }
        );
        assert_eq!(editor.tool(), Tool::Pen);
        editor.pointer_up().unwrap();
        assert_eq!(editor.annotations().len(), 1);
    }

    #[test]
    fn test_pressing_annotation_selects_it_under_any_tool() {
        let mut editor = loaded(&[(612, 792)]);
        let id = place_rectangle(&mut editor, 10.0, 10.0);
        editor.set_tool(Tool::Pen);
        editor
            .pointer_down(Point::new(20.0, 20.0), PointerTarget::Annotation(id))
            .unwrap();
        assert_eq!(editor.selection(), Some(id));
        let preview = |i: &OverlayItem| matches!(i, OverlayItem::Polyline { id: None, .. });
        assert!(!editor.render_overlay().iter().any(preview));
        assert_eq!(editor.annotations().len(), 1);
    }

    #[test]
    fn test_redaction_commits_one_entry() {
        let mut editor = loaded(&[(612, 792)]);
        editor.set_tool(Tool::EditText);
        editor
            .edit_text_span(&TextSpan {
                text: "Net 30".into(),
                bounds: Rect::new(40.0, 60.0, 100.0, 20.0),
            })
            .unwrap();
        assert_eq!(editor.annotations().len(), 2);
        assert_eq!(editor.selection(), Some(editor.annotations()[1].id()));
        assert_eq!(editor.tool(), Tool::Select);

        assert!(editor.undo());
        assert!(editor.annotations().is_empty());
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_text_span_ignored_outside_edit_text_tool() {
        let mut editor = loaded(&[(612, 792)]);
        let span = TextSpan {
            text: "Net 30".into(),
            bounds: Rect::new(40.0, 60.0, 100.0, 20.0),
        };

        for tool in [Tool::Pen, Tool::Select, Tool::Highlight, Tool::AddText] {
            editor.set_tool(tool);
            editor.edit_text_span(&span).unwrap();
            assert!(editor.annotations().is_empty());
            assert_eq!(editor.tool(), tool);
            assert!(!editor.can_undo());
        }
    }

    #[test]
    fn test_undo_clears_dangling_selection_only() {
        let mut editor = loaded(&[(612, 792)]);
        let first = place_rectangle(&mut editor, 10.0, 10.0);
        let second = place_rectangle(&mut editor, 50.0, 50.0);

        editor.select(Some(first));
        assert!(editor.undo());
        assert_eq!(editor.selection(), Some(first));

        editor.redo();
        editor.select(Some(second));
        assert!(editor.undo());
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_update_and_delete() {
        let mut editor = loaded(&[(612, 792)]);
        let id = place_rectangle(&mut editor, 10.0, 10.0);
        editor.select(Some(id));

        let patch = AnnotationPatch {
            color: Some("#ff0000".into()),
            width: Some(40.0),
            ..AnnotationPatch::default()
        };
        assert!(editor.update_annotation(id, &patch).unwrap());
        assert_eq!(editor.annotations()[0].bounds(), Some(Rect::new(10.0, 10.0, 40.0, 50.0)));
        assert!(!editor.update_annotation(AnnotationId::new(999), &patch).unwrap());

        assert!(editor.delete_annotation(id).unwrap());
        assert!(editor.annotations().is_empty());
        assert_eq!(editor.selection(), None);
        assert!(!editor.delete_annotation(id).unwrap());

        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.annotations()[0].color(), Some("#ffffff"));
    }

    #[test]
    fn test_ids_are_not_reused_after_undo() {
        let mut editor = loaded(&[(612, 792)]);
        let first = place_rectangle(&mut editor, 10.0, 10.0);
        editor.undo();
        let second = place_rectangle(&mut editor, 10.0, 10.0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_stale_render_is_not_current() {
        let mut editor = loaded(&[(612, 792)]);
        let first = editor.request_render();
        editor.zoom_in();
        let second = editor.request_render();
        assert!(!editor.is_render_current(&first));
        assert!(editor.is_render_current(&second));
        assert_eq!(second.scale, 1.25);

        editor.load_document("next.pdf", pdf_with_pages(&[(612, 792)])).unwrap();
        assert!(!editor.is_render_current(&second));
    }

    #[test]
    fn test_export_reads_captured_snapshot() {
        let mut editor = loaded(&[(612, 792)]);
        place_rectangle(&mut editor, 10.0, 10.0);
        let job = editor.begin_export().unwrap();
        place_rectangle(&mut editor, 100.0, 100.0);

        assert_eq!(job.snapshot().len(), 1);
        let result = Editor::run_export(&job, &LopdfExporter);
        let bytes = editor.finish_export(&job, result).unwrap().unwrap();
        assert!(lopdf::Document::load_mem(&bytes).is_ok());
        assert_eq!(editor.annotations().len(), 2);
    }

    #[test]
    fn test_export_for_replaced_document_is_dropped() {
        let mut editor = loaded(&[(612, 792)]);
        let job = editor.begin_export().unwrap();
        editor.load_document("next.pdf", pdf_with_pages(&[(612, 792)])).unwrap();
        let result = Editor::run_export(&job, &LopdfExporter);
        assert_eq!(editor.finish_export(&job, result).unwrap(), None);
    }

    #[test]
    fn test_failed_export_keeps_history() {
        let mut editor = loaded(&[(612, 792)]);
        place_rectangle(&mut editor, 10.0, 10.0);
        assert!(matches!(
            editor.export_with(&FailingExporter),
            Err(EditorError::OperationError(_))
        ));
        assert_eq!(editor.annotations().len(), 1);
        assert!(editor.can_undo());
        assert_eq!(editor.export_file_name(), "lease_edited.pdf");
    }

    #[test]
    fn test_analysis_ticket_generation_guard() {
        let mut editor = loaded(&[(612, 792)]);
        let stale = editor.begin_analysis().unwrap();
        assert!(editor.analysis_pending());

        editor.load_document("next.pdf", pdf_with_pages(&[(612, 792)])).unwrap();
        assert!(!editor.analysis_pending());
        let current = editor.begin_analysis().unwrap();

        assert!(!editor.finish_analysis(stale, PageAnalysis::fallback()));
        assert!(editor.analysis_pending());
        assert_eq!(editor.analysis_result(), None);

        assert!(editor.finish_analysis(current, PageAnalysis::fallback()));
        assert!(!editor.analysis_pending());
        assert_eq!(editor.analysis_result(), Some(&PageAnalysis::fallback()));
    }

    #[test]
    fn test_page_change_abandons_stroke() {
        let mut editor = loaded(&[(612, 792), (612, 792)]);
        editor.set_tool(Tool::Pen);
        editor.pointer_down(Point::new(0.0, 0.0), PointerTarget::Background).unwrap();
        editor.next_page();
        editor.pointer_up().unwrap();
        assert!(editor.annotations().is_empty());
    }
}
