//! Redaction bridge for extracted text spans
//!
//! Clicking a text span from the page's text layer (Edit Text tool) covers
//! it with a white box and drops an editable copy of its text on top.

use crate::annotation::{Annotation, IdAllocator, ToolSettings, BLACK, WHITE};
use crate::geometry::{Point, Rect};
use crate::tools::{Placement, Tool};
use serde::{Deserialize, Serialize};

/// Text baseline sits this fraction of the span height below its top.
pub const BASELINE_OFFSET_RATIO: f64 = 0.1;
/// Font size estimate as a fraction of the span height.
pub const FONT_SIZE_RATIO: f64 = 0.8;

/// A span from the text-extraction collaborator, boxed in viewport space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub bounds: Rect,
}

/// Whiteout + replacement text for `span`, committed as one history entry.
///
/// Paint order is rectangle first, then text. The text inherits the
/// current font family but is always black.
pub fn redact_span(
    span: &TextSpan,
    scale: f64,
    page_index: u32,
    settings: &ToolSettings,
    ids: &mut IdAllocator,
) -> Placement {
    let rect = span.bounds.to_page_space(scale);
    let whiteout = Annotation::rectangle(ids.next(), page_index, rect, WHITE);

    let replacement_settings = ToolSettings {
        color: BLACK.to_string(),
        font_size: rect.height * FONT_SIZE_RATIO,
        font_family: settings.font_family.clone(),
        stroke_width: settings.stroke_width,
    };
    let text = Annotation::text(
        ids.next(),
        page_index,
        Point::new(rect.x, rect.y + rect.height * BASELINE_OFFSET_RATIO),
        span.text.clone(),
        &replacement_settings,
    );

    Placement {
        select: Some(text.id()),
        annotations: vec![whiteout, text],
        switch_to: Some(Tool::Select),
    }
}
