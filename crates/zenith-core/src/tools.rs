//! Pointer-driven tool state machine
//!
//! The machine never touches history directly. Each pointer event yields a
//! [`ToolEffect`] that the editor applies (commit, select, switch tool).
//! Pointer input arrives in viewport space and is mapped to page space here,
//! before anything is stored.

use crate::annotation::{
    Annotation, AnnotationId, IdAllocator, InkStyle, ToolSettings, BLACK, HIGHLIGHT_COLOR,
    TEXT_PLACEHOLDER, WHITE,
};
use crate::error::EditorError;
use crate::geometry::{Point, Rect};
use crate::signature;
use serde::{Deserialize, Serialize};

pub const RECTANGLE_SIZE: (f64, f64) = (100.0, 50.0);
pub const SIGNATURE_SIZE: (f64, f64) = (150.0, 60.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Select,
    AddText,
    EditText,
    Highlight,
    Pen,
    Rectangle,
    Signature,
}

impl Tool {
    pub fn ink_style(self) -> Option<InkStyle> {
        match self {
            Tool::Pen => Some(InkStyle::Pen),
            Tool::Highlight => Some(InkStyle::Highlight),
            _ => None,
        }
    }

    /// Toolbar name, accepted back by [`Tool::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::AddText => "text",
            Tool::EditText => "edit_text",
            Tool::Highlight => "highlight",
            Tool::Pen => "pen",
            Tool::Rectangle => "rectangle",
            Tool::Signature => "signature",
        }
    }

    /// Parse the toolbar's tool names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "select" => Some(Tool::Select),
            "text" | "addtext" | "add_text" => Some(Tool::AddText),
            "edit_text" | "edittext" => Some(Tool::EditText),
            "highlight" => Some(Tool::Highlight),
            "pen" => Some(Tool::Pen),
            "rectangle" => Some(Tool::Rectangle),
            "signature" => Some(Tool::Signature),
            _ => None,
        }
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Background,
    Annotation(AnnotationId),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolState {
    #[default]
    Idle,
    DrawingStroke {
        style: InkStyle,
        points: Vec<Point>,
    },
}

/// Everything a tool needs from the editor for one event.
pub struct ToolContext<'a> {
    pub page_index: u32,
    pub scale: f64,
    pub settings: &'a ToolSettings,
    pub ids: &'a mut IdAllocator,
}

/// New annotations to commit as a single history entry, plus follow-ups.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub annotations: Vec<Annotation>,
    pub select: Option<AnnotationId>,
    pub switch_to: Option<Tool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolEffect {
    None,
    ClearSelection,
    Commit(Placement),
}

#[derive(Debug, Clone, Default)]
pub struct ToolMachine {
    tool: Tool,
    state: ToolState,
}

impl ToolMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// Switching tools abandons any stroke in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.cancel();
    }

    /// Drop any stroke in progress without committing it.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// The uncommitted stroke, for preview rendering.
    pub fn stroke_in_progress(&self) -> Option<(InkStyle, &[Point])> {
        match &self.state {
            ToolState::DrawingStroke { style, points } => Some((*style, points.as_slice())),
            ToolState::Idle => None,
        }
    }

    pub fn pointer_down(
        &mut self,
        ctx: &mut ToolContext<'_>,
        viewport: Point,
        target: PointerTarget,
    ) -> Result<ToolEffect, EditorError> {
        let pos = viewport.to_page_space(ctx.scale);
        let effect = match self.tool {
            Tool::Select => match target {
                PointerTarget::Background => ToolEffect::ClearSelection,
                PointerTarget::Annotation(_) => ToolEffect::None,
            },
            Tool::EditText => ToolEffect::None,
            Tool::Pen | Tool::Highlight => {
                let style = self.tool.ink_style().unwrap_or(InkStyle::Pen);
                self.state = ToolState::DrawingStroke {
                    style,
                    points: vec![pos],
                };
                ToolEffect::None
            }
            Tool::AddText => {
                let ann = Annotation::text(
                    ctx.ids.next(),
                    ctx.page_index,
                    pos,
                    TEXT_PLACEHOLDER,
                    ctx.settings,
                );
                ToolEffect::Commit(Placement {
                    select: Some(ann.id()),
                    annotations: vec![ann],
                    switch_to: Some(Tool::Select),
                })
            }
            Tool::Rectangle => {
                // Black on a white page is the whiteout case; default it to white.
                let color = if ctx.settings.color.eq_ignore_ascii_case(BLACK) {
                    WHITE.to_string()
                } else {
                    ctx.settings.color.clone()
                };
                let (w, h) = RECTANGLE_SIZE;
                let ann = Annotation::rectangle(
                    ctx.ids.next(),
                    ctx.page_index,
                    Rect::new(pos.x, pos.y, w, h),
                    color,
                );
                ToolEffect::Commit(Placement {
                    annotations: vec![ann],
                    select: None,
                    switch_to: Some(Tool::Select),
                })
            }
            Tool::Signature => {
                let (w, h) = SIGNATURE_SIZE;
                let ann = Annotation::signature(
                    ctx.ids.next(),
                    ctx.page_index,
                    Rect::new(pos.x, pos.y, w, h),
                    signature::placeholder_data_uri()?,
                );
                ToolEffect::Commit(Placement {
                    select: Some(ann.id()),
                    annotations: vec![ann],
                    switch_to: Some(Tool::Select),
                })
            }
        };
        Ok(effect)
    }

    pub fn pointer_move(&mut self, scale: f64, viewport: Point) {
        if let ToolState::DrawingStroke { points, .. } = &mut self.state {
            points.push(viewport.to_page_space(scale));
        }
    }

    /// Pointer-up and pointer-leave both finish a stroke.
    pub fn pointer_up(&mut self, ctx: &mut ToolContext<'_>) -> ToolEffect {
        let ToolState::DrawingStroke { style, points } = std::mem::take(&mut self.state) else {
            return ToolEffect::None;
        };
        if points.is_empty() {
            return ToolEffect::None;
        }
        let color = match style {
            InkStyle::Highlight => HIGHLIGHT_COLOR.to_string(),
            InkStyle::Pen => ctx.settings.color.clone(),
        };
        let ann = Annotation::ink(ctx.ids.next(), ctx.page_index, style, points, color);
        ToolEffect::Commit(Placement {
            annotations: vec![ann],
            select: None,
            switch_to: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;
    use pretty_assertions::assert_eq;

    struct Fixture {
        settings: ToolSettings,
        ids: IdAllocator,
    }

    impl Fixture {
        fn new(color: &str) -> Self {
            Self {
                settings: ToolSettings {
                    color: color.to_string(),
                    ..ToolSettings::default()
                },
                ids: IdAllocator::new(),
            }
        }

        fn ctx(&mut self, scale: f64) -> ToolContext<'_> {
            ToolContext {
                page_index: 0,
                scale,
                settings: &self.settings,
                ids: &mut self.ids,
            }
        }
    }

    fn placement(effect: ToolEffect) -> Placement {
        match effect {
            ToolEffect::Commit(p) => p,
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_select_on_background_clears_selection() {
        let mut fx = Fixture::new(BLACK);
        let mut machine = ToolMachine::new();
        let effect = machine
            .pointer_down(&mut fx.ctx(1.0), Point::new(1.0, 1.0), PointerTarget::Background)
            .unwrap();
        assert_eq!(effect, ToolEffect::ClearSelection);
    }

    #[test]
    fn test_add_text_is_single_shot() {
        let mut fx = Fixture::new("#123456");
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::AddText);
        let p = placement(
            machine
                .pointer_down(&mut fx.ctx(2.0), Point::new(100.0, 200.0), PointerTarget::Background)
                .unwrap(),
        );
        assert_eq!(p.annotations.len(), 1);
        let ann = &p.annotations[0];
        assert_eq!(ann.position(), Point::new(50.0, 100.0));
        assert_eq!(ann.color(), Some("#123456"));
        assert!(matches!(
            ann.kind(),
            AnnotationKind::Text { content, font_size, .. }
                if content == "Type here" && *font_size == 16.0
        ));
        assert_eq!(p.select, Some(ann.id()));
        assert_eq!(p.switch_to, Some(Tool::Select));
    }

    #[test]
    fn test_rectangle_black_becomes_white() {
        let mut fx = Fixture::new("#000000");
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::Rectangle);
        let p = placement(
            machine
                .pointer_down(&mut fx.ctx(1.0), Point::new(10.0, 20.0), PointerTarget::Background)
                .unwrap(),
        );
        let ann = &p.annotations[0];
        assert_eq!(ann.color(), Some("#ffffff"));
        assert_eq!(ann.bounds(), Some(Rect::new(10.0, 20.0, 100.0, 50.0)));
        assert_eq!(p.select, None);
        assert_eq!(p.switch_to, Some(Tool::Select));
    }

    #[test]
    fn test_rectangle_keeps_other_colors() {
        let mut fx = Fixture::new("#ff0000");
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::Rectangle);
        let p = placement(
            machine
                .pointer_down(&mut fx.ctx(1.0), Point::new(0.0, 0.0), PointerTarget::Background)
                .unwrap(),
        );
        assert_eq!(p.annotations[0].color(), Some("#ff0000"));
    }

    #[test]
    fn test_signature_placeholder() {
        let mut fx = Fixture::new(BLACK);
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::Signature);
        let p = placement(
            machine
                .pointer_down(&mut fx.ctx(1.0), Point::new(5.0, 5.0), PointerTarget::Background)
                .unwrap(),
        );
        let ann = &p.annotations[0];
        assert_eq!(ann.bounds(), Some(Rect::new(5.0, 5.0, 150.0, 60.0)));
        assert!(matches!(
            ann.kind(),
            AnnotationKind::Signature { image, .. } if image.starts_with("data:image/png;base64,")
        ));
        assert_eq!(p.select, Some(ann.id()));
    }

    #[test]
    fn test_pen_stroke_commits_on_pointer_up() {
        let mut fx = Fixture::new("#0000ff");
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::Pen);
        let effect = machine
            .pointer_down(&mut fx.ctx(2.0), Point::new(0.0, 0.0), PointerTarget::Background)
            .unwrap();
        assert_eq!(effect, ToolEffect::None);
        machine.pointer_move(2.0, Point::new(20.0, 0.0));
        machine.pointer_move(2.0, Point::new(20.0, 20.0));
        assert_eq!(machine.stroke_in_progress().map(|(_, p)| p.len()), Some(3));

        let p = placement(machine.pointer_up(&mut fx.ctx(2.0)));
        assert_eq!(machine.state(), &ToolState::Idle);
        let ann = &p.annotations[0];
        assert_eq!(ann.color(), Some("#0000ff"));
        assert_eq!(
            ann.kind(),
            &AnnotationKind::Ink {
                style: InkStyle::Pen,
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0)
                ],
            }
        );
        assert_eq!(p.switch_to, None);
    }

    #[test]
    fn test_highlight_forces_yellow() {
        let mut fx = Fixture::new("#ff0000");
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::Highlight);
        machine
            .pointer_down(&mut fx.ctx(1.0), Point::new(0.0, 0.0), PointerTarget::Background)
            .unwrap();
        let p = placement(machine.pointer_up(&mut fx.ctx(1.0)));
        assert_eq!(p.annotations[0].color(), Some("#FFFF00"));
    }

    #[test]
    fn test_single_click_stroke_still_commits() {
        let mut fx = Fixture::new(BLACK);
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::Pen);
        machine
            .pointer_down(&mut fx.ctx(1.0), Point::new(3.0, 3.0), PointerTarget::Background)
            .unwrap();
        let p = placement(machine.pointer_up(&mut fx.ctx(1.0)));
        assert!(matches!(
            p.annotations[0].kind(),
            AnnotationKind::Ink { points, .. } if points.len() == 1
        ));
    }

    #[test]
    fn test_move_and_up_without_stroke_are_ignored() {
        let mut fx = Fixture::new(BLACK);
        let mut machine = ToolMachine::new();
        machine.pointer_move(1.0, Point::new(3.0, 3.0));
        assert_eq!(machine.pointer_up(&mut fx.ctx(1.0)), ToolEffect::None);
    }

    #[test]
    fn test_edit_text_ignores_pointer_down() {
        let mut fx = Fixture::new(BLACK);
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::EditText);
        let effect = machine
            .pointer_down(&mut fx.ctx(1.0), Point::new(3.0, 3.0), PointerTarget::Background)
            .unwrap();
        assert_eq!(effect, ToolEffect::None);
    }

    #[test]
    fn test_switching_tool_abandons_stroke() {
        let mut fx = Fixture::new(BLACK);
        let mut machine = ToolMachine::new();
        machine.set_tool(Tool::Pen);
        machine
            .pointer_down(&mut fx.ctx(1.0), Point::new(3.0, 3.0), PointerTarget::Background)
            .unwrap();
        machine.set_tool(Tool::Select);
        assert!(machine.stroke_in_progress().is_none());
        assert_eq!(machine.pointer_up(&mut fx.ctx(1.0)), ToolEffect::None);
    }

    #[test]
    fn test_tool_from_name() {
        assert_eq!(Tool::from_name("edit_text"), Some(Tool::EditText));
        assert_eq!(Tool::from_name("PEN"), Some(Tool::Pen));
        assert_eq!(Tool::from_name("eraser"), None);
        for tool in [
            Tool::Select,
            Tool::AddText,
            Tool::EditText,
            Tool::Highlight,
            Tool::Pen,
            Tool::Rectangle,
            Tool::Signature,
        ] {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
    }
}
