use egui::Color32;
use crate::document::Document;
use crate::input::Gesture;
use crate::stroke::{StrokeIndex, DEFAULT_STROKE_COLOR};

/// Where the tool is in a single pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Drawing {
        stroke: StrokeIndex,
    },
}

/// Turns pan gestures into strokes on the document.
///
/// Idle + start begins a stroke, Drawing + update extends it, end or cancel
/// returns to Idle. The stroke is complete as soon as its last point is
/// appended, so ending needs no finalize step and a cancelled stroke stays in
/// the drawing as drawn so far.
#[derive(Debug)]
pub struct DrawStrokeTool {
    state: CaptureState,
    color: Color32,
}

impl Default for DrawStrokeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawStrokeTool {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            color: DEFAULT_STROKE_COLOR,
        }
    }

    pub fn with_color(color: Color32) -> Self {
        Self {
            state: CaptureState::Idle,
            color,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn handle_gesture(&mut self, gesture: Gesture, doc: &mut Document) {
        match (self.state, gesture) {
            (CaptureState::Idle, Gesture::PanStart(pos)) => {
                if let Some(stroke) = doc.begin_stroke(pos.x, pos.y, self.color) {
                    log::debug!("Stroke {} started at {:?}", stroke, pos);
                    self.state = CaptureState::Drawing { stroke };
                }
            }
            (CaptureState::Drawing { .. }, Gesture::PanUpdate(pos)) => {
                doc.extend_stroke(pos.x, pos.y);
            }
            (CaptureState::Drawing { stroke }, Gesture::PanEnd { cancelled }) => {
                if cancelled {
                    log::debug!("Stroke {} cancelled, keeping partial stroke", stroke);
                } else {
                    log::debug!("Stroke {} finished", stroke);
                }
                self.state = CaptureState::Idle;
            }
            (state, gesture) => {
                log::trace!("Ignoring {:?} while {:?}", gesture, state);
            }
        }
    }

    /// Drop any interaction in progress, e.g. when the canvas is torn down
    pub fn deactivate(&mut self) {
        self.state = CaptureState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::PathCommand;
    use egui::pos2;

    #[test]
    fn test_update_while_idle_is_ignored() {
        let mut doc = Document::new();
        let mut tool = DrawStrokeTool::new();
        tool.handle_gesture(Gesture::PanUpdate(pos2(1.0, 1.0)), &mut doc);
        assert_eq!(doc.stroke_count(), 0);
        assert_eq!(tool.state(), CaptureState::Idle);
    }

    #[test]
    fn test_start_update_end() {
        let mut doc = Document::new();
        let mut tool = DrawStrokeTool::with_color(Color32::RED);
        tool.handle_gesture(Gesture::PanStart(pos2(1.0, 2.0)), &mut doc);
        assert_eq!(tool.state(), CaptureState::Drawing { stroke: 0 });
        tool.handle_gesture(Gesture::PanUpdate(pos2(3.0, 4.0)), &mut doc);
        tool.handle_gesture(Gesture::PanEnd { cancelled: false }, &mut doc);

        assert_eq!(tool.state(), CaptureState::Idle);
        let stroke = &doc.strokes()[0];
        assert_eq!(stroke.color(), Color32::RED);
        assert_eq!(
            stroke.commands(),
            &[PathCommand::MoveTo(pos2(1.0, 2.0)), PathCommand::LineTo(pos2(3.0, 4.0))]
        );
    }

    #[test]
    fn test_cancel_keeps_partial_stroke() {
        let mut doc = Document::new();
        let mut tool = DrawStrokeTool::new();
        tool.handle_gesture(Gesture::PanStart(pos2(0.0, 0.0)), &mut doc);
        tool.handle_gesture(Gesture::PanUpdate(pos2(5.0, 0.0)), &mut doc);
        tool.handle_gesture(Gesture::PanEnd { cancelled: true }, &mut doc);

        assert_eq!(doc.stroke_count(), 1);
        assert_eq!(doc.strokes()[0].commands().len(), 2);
        assert_eq!(doc.strokes()[0].color(), DEFAULT_STROKE_COLOR);
    }
}
