//! Flattening: annotation set -> page-space draw commands
//!
//! The output is what the export collaborator consumes: per-page draw lists
//! in the PDF's own bottom-left, y-up convention. Order within a page is
//! the annotation paint order; pages are emitted in ascending order.

use crate::annotation::{
    Annotation, AnnotationKind, BLACK, DEFAULT_FONT_SIZE, HIGHLIGHT_COLOR, WHITE,
};
use crate::error::EditorError;
use crate::geometry::Point;
use crate::signature;
use serde::Serialize;
use std::collections::BTreeMap;

/// The three standard fonts text annotations flatten to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StandardFont {
    Helvetica,
    TimesRoman,
    Courier,
}

impl StandardFont {
    /// Map a CSS-ish font family to a standard font. Only the serif and
    /// monospace buckets are distinguished; anything else is Helvetica.
    pub fn from_family(family: &str) -> Self {
        let lower = family.to_lowercase();

        match lower.as_str() {
            "serif" => return StandardFont::TimesRoman,
            "monospace" => return StandardFont::Courier,
            _ => {}
        }

        if lower.contains("times") || lower.contains("georgia") || lower.contains("garamond") {
            return StandardFont::TimesRoman;
        }

        if lower.contains("courier")
            || lower.contains("mono")
            || lower.contains("consolas")
            || lower.contains("monaco")
        {
            return StandardFont::Courier;
        }

        StandardFont::Helvetica
    }

    /// PDF BaseFont name
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::Courier => "Courier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Parse `#rrggbb` (case-insensitive, `#` optional). Anything else is black.
    pub fn from_hex(color: &str) -> Self {
        let hex = color.trim().trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        if hex.len() == 6 && hex.is_ascii() {
            if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
                return Self {
                    r: f32::from(r) / 255.0,
                    g: f32::from(g) / 255.0,
                    b: f32::from(b) / 255.0,
                };
            }
        }
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        font: StandardFont,
        color: Rgb,
    },
    Line {
        start: Point,
        end: Point,
        thickness: f64,
        color: Rgb,
        opacity: f64,
    },
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// Encoded PNG bytes
        #[serde(skip)]
        png: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDrawList {
    /// 0-based page index
    pub page_index: u32,
    pub commands: Vec<DrawCommand>,
}

/// Top-left/y-down stored coordinate -> bottom-left/y-up export coordinate.
pub fn export_y(page_height: f64, stored_y: f64, element_height: f64) -> f64 {
    page_height - stored_y - element_height
}

/// Flatten `set` against the given page heights (indexed by page).
///
/// Pages without any drawable output are omitted.
pub fn flatten(set: &[Annotation], page_heights: &[f64]) -> Result<Vec<PageDrawList>, EditorError> {
    let mut pages: BTreeMap<u32, Vec<DrawCommand>> = BTreeMap::new();

    for ann in set {
        let page = ann.page_index();
        let height = *page_heights
            .get(page as usize)
            .ok_or(EditorError::PageOutOfRange {
                page,
                count: page_heights.len() as u32,
            })?;
        let commands = flatten_annotation(ann, height)?;
        if !commands.is_empty() {
            pages.entry(page).or_default().extend(commands);
        }
    }

    Ok(pages
        .into_iter()
        .map(|(page_index, commands)| PageDrawList {
            page_index,
            commands,
        })
        .collect())
}

fn flatten_annotation(ann: &Annotation, page_height: f64) -> Result<Vec<DrawCommand>, EditorError> {
    let pos = ann.position();
    let commands = match ann.kind() {
        AnnotationKind::Text {
            content,
            font_size,
            font_family,
        } => {
            if content.is_empty() {
                return Ok(Vec::new());
            }
            let size = if *font_size > 0.0 {
                *font_size
            } else {
                DEFAULT_FONT_SIZE
            };
            vec![DrawCommand::Text {
                text: content.clone(),
                x: pos.x,
                y: export_y(page_height, pos.y, size),
                size,
                font: StandardFont::from_family(font_family),
                color: Rgb::from_hex(ann.color().unwrap_or(BLACK)),
            }]
        }
        AnnotationKind::Ink { style, points } => {
            let color = Rgb::from_hex(ann.color().unwrap_or(HIGHLIGHT_COLOR));
            let flip = |p: &Point| Point::new(p.x, export_y(page_height, p.y, 0.0));
            points
                .windows(2)
                .map(|w| DrawCommand::Line {
                    start: flip(&w[0]),
                    end: flip(&w[1]),
                    thickness: style.export_thickness(),
                    color,
                    opacity: style.opacity(),
                })
                .collect()
        }
        AnnotationKind::Rectangle { width, height } => {
            if *width <= 0.0 || *height <= 0.0 {
                return Ok(Vec::new());
            }
            vec![DrawCommand::Rectangle {
                x: pos.x,
                y: export_y(page_height, pos.y, *height),
                width: *width,
                height: *height,
                color: Rgb::from_hex(ann.color().unwrap_or(WHITE)),
            }]
        }
        AnnotationKind::Signature {
            width,
            height,
            image,
        } => {
            if *width <= 0.0 || *height <= 0.0 || image.is_empty() {
                return Ok(Vec::new());
            }
            vec![DrawCommand::Image {
                x: pos.x,
                y: export_y(page_height, pos.y, *height),
                width: *width,
                height: *height,
                png: signature::decode_data_uri(image)?,
            }]
        }
    };
    Ok(commands)
}
