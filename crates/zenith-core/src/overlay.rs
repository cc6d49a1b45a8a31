//! Overlay render plan and hit testing
//!
//! Turns the page-space annotation set into viewport-space items for the
//! DOM/SVG overlay, applying the zoom at paint time only.

use crate::annotation::{Annotation, AnnotationId, AnnotationKind, InkStyle, DEFAULT_FONT_SIZE};
use crate::geometry::{Point, Rect};
use serde::Serialize;

/// Average glyph advance as a fraction of font size, for text hit boxes.
const GLYPH_WIDTH_RATIO: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OverlayItem {
    Text {
        id: AnnotationId,
        x: f64,
        y: f64,
        font_size: f64,
        font_family: String,
        color: Option<String>,
        content: String,
        selected: bool,
    },
    Fill {
        id: AnnotationId,
        rect: Rect,
        fill: Option<String>,
        selected: bool,
    },
    Image {
        id: AnnotationId,
        rect: Rect,
        src: String,
        selected: bool,
    },
    Polyline {
        id: Option<AnnotationId>,
        points: Vec<Point>,
        stroke: String,
        stroke_width: f64,
        opacity: f64,
        selected: bool,
    },
}

/// Items for `page` in paint order, scaled to the viewport.
pub fn render_page(
    set: &[Annotation],
    page: u32,
    scale: f64,
    selection: Option<AnnotationId>,
) -> Vec<OverlayItem> {
    set.iter()
        .filter(|a| a.page_index() == page)
        .map(|a| render_annotation(a, scale, selection == Some(a.id())))
        .collect()
}

fn render_annotation(ann: &Annotation, scale: f64, selected: bool) -> OverlayItem {
    let id = ann.id();
    let origin = ann.position().to_viewport_space(scale);
    match ann.kind() {
        AnnotationKind::Text {
            content,
            font_size,
            font_family,
        } => OverlayItem::Text {
            id,
            x: origin.x,
            y: origin.y,
            font_size: effective_font_size(*font_size) * scale,
            font_family: font_family.clone(),
            color: ann.color().map(str::to_string),
            content: content.clone(),
            selected,
        },
        AnnotationKind::Rectangle { width, height } => OverlayItem::Fill {
            id,
            rect: Rect::new(ann.position().x, ann.position().y, *width, *height)
                .to_viewport_space(scale),
            fill: ann.color().map(str::to_string),
            selected,
        },
        AnnotationKind::Signature {
            width,
            height,
            image,
        } => OverlayItem::Image {
            id,
            rect: Rect::new(ann.position().x, ann.position().y, *width, *height)
                .to_viewport_space(scale),
            src: image.clone(),
            selected,
        },
        AnnotationKind::Ink { style, points } => {
            polyline(Some(id), *style, points, ann.color().unwrap_or_default(), scale, selected)
        }
    }
}

/// Preview of the stroke being drawn, drawn on top of everything else.
pub fn render_stroke_preview(
    style: InkStyle,
    points: &[Point],
    color: &str,
    scale: f64,
) -> OverlayItem {
    polyline(None, style, points, color, scale, false)
}

fn polyline(
    id: Option<AnnotationId>,
    style: InkStyle,
    points: &[Point],
    color: &str,
    scale: f64,
    selected: bool,
) -> OverlayItem {
    OverlayItem::Polyline {
        id,
        points: points.iter().map(|p| p.to_viewport_space(scale)).collect(),
        stroke: color.to_string(),
        stroke_width: style.overlay_thickness() * scale,
        opacity: style.opacity(),
        selected,
    }
}

fn effective_font_size(size: f64) -> f64 {
    if size > 0.0 {
        size
    } else {
        DEFAULT_FONT_SIZE
    }
}

/// Topmost annotation on `page` under a viewport point.
pub fn hit_test(
    set: &[Annotation],
    page: u32,
    viewport: Point,
    scale: f64,
) -> Option<AnnotationId> {
    let p = viewport.to_page_space(scale);
    set.iter()
        .rev()
        .filter(|a| a.page_index() == page)
        .find(|a| hits(a, p))
        .map(Annotation::id)
}

fn hits(ann: &Annotation, p: Point) -> bool {
    match ann.kind() {
        AnnotationKind::Rectangle { .. } | AnnotationKind::Signature { .. } => {
            ann.bounds().is_some_and(|r| r.contains(p))
        }
        AnnotationKind::Text {
            content, font_size, ..
        } => {
            let size = effective_font_size(*font_size);
            let chars = content.chars().count().max(1) as f64;
            Rect::new(
                ann.position().x,
                ann.position().y,
                chars * size * GLYPH_WIDTH_RATIO,
                size,
            )
            .contains(p)
        }
        AnnotationKind::Ink { style, points } => {
            let reach = style.overlay_thickness() / 2.0;
            match points.as_slice() {
                [] => false,
                [only] => p.distance_to_segment(*only, *only) <= reach,
                _ => points
                    .windows(2)
                    .any(|w| p.distance_to_segment(w[0], w[1]) <= reach),
            }
        }
    }
}
