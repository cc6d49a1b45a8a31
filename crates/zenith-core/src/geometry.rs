//! Coordinate mapping between page space and viewport space
//!
//! Page space is unscaled PDF points. Viewport space is on-screen pixels at
//! the current zoom. Both use a top-left origin inside the editor; the
//! vertical flip to the PDF bottom-left convention only happens when
//! flattening (see [`crate::flatten::export_y`]).

use crate::config::ZoomConfig;
use crate::error::EditorError;
use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;
pub const SCALE_STEP: f64 = 0.25;
pub const DEFAULT_SCALE: f64 = 1.2;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Viewport pixels -> page points.
    pub fn to_page_space(self, scale: f64) -> Self {
        Self {
            x: self.x / scale,
            y: self.y / scale,
        }
    }

    /// Page points -> viewport pixels.
    pub fn to_viewport_space(self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
        }
    }

    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return ((self.x - a.x).powi(2) + (self.y - a.y).powi(2)).sqrt();
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        let (px, py) = (a.x + t * dx, a.y + t * dy);
        ((self.x - px).powi(2) + (self.y - py).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn to_page_space(self, scale: f64) -> Self {
        Self {
            x: self.x / scale,
            y: self.y / scale,
            width: self.width / scale,
            height: self.height / scale,
        }
    }

    pub fn to_viewport_space(self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Process-wide zoom factor, always inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    scale: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            min: MIN_SCALE,
            max: MAX_SCALE,
            step: SCALE_STEP,
        }
    }
}

impl Zoom {
    pub fn from_config(config: &ZoomConfig) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self {
            scale: config.initial.clamp(config.min, config.max),
            min: config.min,
            max: config.max,
            step: config.step,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.scale = (self.scale + self.step).min(self.max);
        self.scale
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.scale = (self.scale - self.step).max(self.min);
        self.scale
    }

    /// Set an explicit scale; non-finite input is ignored.
    pub fn set(&mut self, scale: f64) -> f64 {
        if scale.is_finite() {
            self.scale = scale.clamp(self.min, self.max);
        }
        self.scale
    }

    pub fn can_zoom_in(&self) -> bool {
        self.scale < self.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.scale > self.min
    }
}

/// Current page (0-based) within a loaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCursor {
    index: u32,
    count: u32,
}

impl PageCursor {
    pub fn new(count: u32) -> Self {
        Self { index: 0, count }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn next(&mut self) -> u32 {
        if self.index + 1 < self.count {
            self.index += 1;
        }
        self.index
    }

    pub fn prev(&mut self) -> u32 {
        self.index = self.index.saturating_sub(1);
        self.index
    }

    pub fn set(&mut self, index: u32) -> Result<u32, EditorError> {
        if index >= self.count {
            return Err(EditorError::PageOutOfRange {
                page: index,
                count: self.count,
            });
        }
        self.index = index;
        Ok(self.index)
    }

    /// "3 / 10" style label, 1-based.
    pub fn label(&self) -> String {
        format!("{} / {}", self.index + 1, self.count)
    }
}
