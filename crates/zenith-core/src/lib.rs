//! In-browser PDF annotation editor core
//!
//! Annotations are kept in page space (PDF points, top-left origin) in an
//! undoable history of immutable snapshots. Pointer input from the overlay
//! drives a tool state machine; on export the current snapshot is flattened
//! into draw commands and stamped into the original PDF with lopdf.
//!
//! The [`Editor`] ties the pieces together and is what the wasm session
//! wraps. Everything here also runs natively, which is how it is tested.

pub mod analysis;
pub mod annotation;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod export;
pub mod flatten;
pub mod geometry;
pub mod history;
pub mod overlay;
pub mod redaction;
pub mod signature;
pub mod tools;

pub use analysis::{
    analyze_page, suggest_edit, AnalysisBackend, GeminiBackend, PageAnalysis, PageImage,
};
pub use annotation::{
    Annotation, AnnotationId, AnnotationKind, AnnotationPatch, InkStyle, ToolSettings,
};
pub use config::EditorConfig;
pub use document::{DocumentInfo, PageInfo};
pub use editor::{AnalysisTicket, Editor, ExportJob, RenderTicket};
pub use error::EditorError;
pub use export::{export_file_name, LopdfExporter, PdfExporter};
pub use geometry::{Point, Rect};
pub use history::{HistoryStore, Snapshot};
pub use overlay::OverlayItem;
pub use redaction::TextSpan;
pub use tools::{PointerTarget, Tool};
