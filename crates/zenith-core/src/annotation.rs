//! Annotation model
//!
//! One placed object on a page. All coordinates are page space (unscaled
//! points, top-left origin); scaling happens only when rendering.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TEXT_PLACEHOLDER: &str = "Type here";
pub const HIGHLIGHT_COLOR: &str = "#FFFF00";
pub const WHITE: &str = "#ffffff";
pub const BLACK: &str = "#000000";
pub const DEFAULT_FONT_SIZE: f64 = 12.0;
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(u64);

impl AnnotationId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out session-unique ids. Never rewinds on undo, so an id that was
/// undone away is never reused for a different annotation.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_id: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InkStyle {
    Pen,
    Highlight,
}

impl InkStyle {
    /// Stroke width in the exported document, in points.
    pub fn export_thickness(self) -> f64 {
        match self {
            InkStyle::Pen => 2.0,
            InkStyle::Highlight => 10.0,
        }
    }

    /// Stroke width on the overlay before scaling.
    pub fn overlay_thickness(self) -> f64 {
        match self {
            InkStyle::Pen => 2.0,
            InkStyle::Highlight => 14.0,
        }
    }

    pub fn opacity(self) -> f64 {
        match self {
            InkStyle::Pen => 1.0,
            InkStyle::Highlight => 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnnotationKind {
    Text {
        content: String,
        font_size: f64,
        font_family: String,
    },
    Ink {
        style: InkStyle,
        points: Vec<Point>,
    },
    Rectangle {
        width: f64,
        height: f64,
    },
    Signature {
        width: f64,
        height: f64,
        /// PNG payload as a data URI
        image: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    id: AnnotationId,
    page_index: u32,
    position: Point,
    color: Option<String>,
    #[serde(flatten)]
    kind: AnnotationKind,
}

impl Annotation {
    pub fn new(
        id: AnnotationId,
        page_index: u32,
        position: Point,
        color: Option<String>,
        kind: AnnotationKind,
    ) -> Self {
        Self {
            id,
            page_index,
            position,
            color,
            kind,
        }
    }

    pub fn text(
        id: AnnotationId,
        page_index: u32,
        position: Point,
        content: impl Into<String>,
        settings: &ToolSettings,
    ) -> Self {
        Self::new(
            id,
            page_index,
            position,
            Some(settings.color.clone()),
            AnnotationKind::Text {
                content: content.into(),
                font_size: settings.font_size,
                font_family: settings.font_family.clone(),
            },
        )
    }

    pub fn ink(
        id: AnnotationId,
        page_index: u32,
        style: InkStyle,
        points: Vec<Point>,
        color: String,
    ) -> Self {
        // Ink points carry their own page-space coordinates; the anchor stays at the origin.
        Self::new(
            id,
            page_index,
            Point::default(),
            Some(color),
            AnnotationKind::Ink { style, points },
        )
    }

    pub fn rectangle(
        id: AnnotationId,
        page_index: u32,
        rect: Rect,
        color: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            page_index,
            rect.origin(),
            Some(color.into()),
            AnnotationKind::Rectangle {
                width: rect.width,
                height: rect.height,
            },
        )
    }

    pub fn signature(id: AnnotationId, page_index: u32, rect: Rect, image: String) -> Self {
        Self::new(
            id,
            page_index,
            rect.origin(),
            None,
            AnnotationKind::Signature {
                width: rect.width,
                height: rect.height,
                image,
            },
        )
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn kind(&self) -> &AnnotationKind {
        &self.kind
    }

    /// Box of the box-shaped variants, `None` for text and ink.
    pub fn bounds(&self) -> Option<Rect> {
        match &self.kind {
            AnnotationKind::Rectangle { width, height }
            | AnnotationKind::Signature { width, height, .. } => Some(Rect::new(
                self.position.x,
                self.position.y,
                *width,
                *height,
            )),
            AnnotationKind::Text { .. } | AnnotationKind::Ink { .. } => None,
        }
    }

    /// Structural checks a committed annotation must satisfy.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.position.x.is_finite() && self.position.y.is_finite()) {
            return Err(format!("annotation {} has a non-finite position", self.id));
        }
        match &self.kind {
            AnnotationKind::Ink { points, .. } if points.is_empty() => {
                Err(format!("ink annotation {} has no points", self.id))
            }
            AnnotationKind::Text { font_size, .. }
                if !font_size.is_finite() || *font_size < 0.0 =>
            {
                Err(format!("text annotation {} has invalid font size", self.id))
            }
            _ => Ok(()),
        }
    }

    /// Copy with a properties-panel edit applied. Id, page, and variant are
    /// never touched; fields that don't belong to the variant are ignored.
    pub fn patched(&self, patch: &AnnotationPatch) -> Self {
        let mut next = self.clone();
        if let Some(position) = patch.position {
            if !matches!(next.kind, AnnotationKind::Ink { .. }) {
                next.position = position;
            }
        }
        if let Some(color) = &patch.color {
            next.color = Some(color.clone());
        }
        match &mut next.kind {
            AnnotationKind::Text {
                content,
                font_size,
                font_family,
            } => {
                if let Some(c) = &patch.content {
                    *content = c.clone();
                }
                if let Some(size) = patch.font_size {
                    *font_size = size;
                }
                if let Some(family) = &patch.font_family {
                    *font_family = family.clone();
                }
            }
            AnnotationKind::Rectangle { width, height }
            | AnnotationKind::Signature { width, height, .. } => {
                if let Some(w) = patch.width {
                    *width = w;
                }
                if let Some(h) = patch.height {
                    *height = h;
                }
            }
            AnnotationKind::Ink { .. } => {}
        }
        next
    }
}

/// Partial update from the properties panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnnotationPatch {
    pub content: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub position: Option<Point>,
}

/// Default style used to seed new annotations. Not versioned by history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolSettings {
    pub color: String,
    pub font_size: f64,
    pub font_family: String,
    pub stroke_width: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            color: BLACK.to_string(),
            font_size: 16.0,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            stroke_width: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_id_allocator_is_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.next();
        let b = ids.next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_text_seeded_from_settings() {
        let settings = ToolSettings {
            color: "#ff0000".to_string(),
            font_size: 20.0,
            font_family: "Georgia".to_string(),
            stroke_width: 2.0,
        };
        let ann = Annotation::text(AnnotationId::new(1), 2, Point::new(5.0, 6.0), "", &settings);
        assert_eq!(ann.page_index(), 2);
        assert_eq!(ann.color(), Some("#ff0000"));
        assert_eq!(
            ann.kind(),
            &AnnotationKind::Text {
                content: String::new(),
                font_size: 20.0,
                font_family: "Georgia".to_string(),
            }
        );
    }

    #[test]
    fn test_patch_keeps_identity() {
        let rect = Annotation::rectangle(
            AnnotationId::new(7),
            1,
            Rect::new(10.0, 10.0, 100.0, 50.0),
            WHITE,
        );
        let patched = rect.patched(&AnnotationPatch {
            width: Some(120.0),
            content: Some("ignored".into()),
            color: Some("#00ff00".into()),
            ..AnnotationPatch::default()
        });
        assert_eq!(patched.id(), rect.id());
        assert_eq!(patched.page_index(), 1);
        assert_eq!(patched.color(), Some("#00ff00"));
        assert_eq!(patched.bounds(), Some(Rect::new(10.0, 10.0, 120.0, 50.0)));
        // original untouched
        assert_eq!(rect.bounds(), Some(Rect::new(10.0, 10.0, 100.0, 50.0)));
    }

    #[test]
    fn test_patch_never_moves_ink() {
        let ink = Annotation::ink(
            AnnotationId::new(1),
            0,
            InkStyle::Pen,
            vec![Point::new(1.0, 1.0)],
            BLACK.into(),
        );
        let patched = ink.patched(&AnnotationPatch {
            position: Some(Point::new(50.0, 50.0)),
            ..AnnotationPatch::default()
        });
        assert_eq!(patched, ink);
    }

    #[test]
    fn test_validate_rejects_empty_ink() {
        let ink = Annotation::ink(AnnotationId::new(1), 0, InkStyle::Pen, vec![], BLACK.into());
        assert!(ink.validate().is_err());
    }

    #[test]
    fn test_json_is_tagged_by_type() {
        let ann = Annotation::rectangle(
            AnnotationId::new(3),
            0,
            Rect::new(1.0, 2.0, 3.0, 4.0),
            WHITE,
        );
        let json = serde_json::to_value(&ann).unwrap();
        assert_eq!(json["type"], "Rectangle");
        assert_eq!(json["id"], 3);
        let back: Annotation = serde_json::from_value(json).unwrap();
        assert_eq!(back, ann);
    }
}
