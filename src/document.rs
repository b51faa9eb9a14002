use egui::{Color32, Pos2, Vec2};

use crate::background::BackgroundRef;
use crate::event::{DrawingEvent, EventBus, EventHandler};
use crate::stroke::{Stroke, StrokeIndex};

/// The drawing for the current session: strokes over an optional background.
///
/// Strokes are kept in insertion order, which is also their z-order. Only the
/// last stroke can still grow; everything before it is frozen. Each mutation
/// bumps [`Document::revision`] and is broadcast on the event bus right away,
/// one event per appended point.
#[derive(Debug, Default)]
pub struct Document {
    strokes: Vec<Stroke>,
    background: Option<BackgroundRef>,
    revision: u64,
    events: EventBus,
}

/// Frozen copy of everything needed to rasterize the canvas
#[derive(Debug, Clone)]
pub struct CanvasSnapshot {
    pub strokes: Vec<Stroke>,
    pub background: Option<BackgroundRef>,
    /// Size of the drawing surface in canvas units
    pub view_size: Vec2,
    /// Physical pixels per canvas unit
    pub pixels_per_point: f32,
    pub stroke_width: f32,
    pub revision: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    /// Start a new stroke at `(x, y)`. Returns its index, always the new last one.
    pub fn begin_stroke(&mut self, x: f32, y: f32, color: Color32) -> Option<StrokeIndex> {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("Ignoring stroke start at non-finite point ({}, {})", x, y);
            return None;
        }

        self.strokes.push(Stroke::new(Pos2::new(x, y), color));
        let index = self.strokes.len() - 1;
        self.touch(DrawingEvent::StrokeStarted { index });
        Some(index)
    }

    /// Append a segment to the last stroke. Does nothing when no stroke has begun.
    pub fn extend_stroke(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            log::warn!("Ignoring stroke point at non-finite position ({}, {})", x, y);
            return;
        }

        let Some(index) = self.strokes.len().checked_sub(1) else {
            log::debug!("extend_stroke called with no stroke in progress");
            return;
        };

        let stroke = &mut self.strokes[index];
        stroke.line_to(Pos2::new(x, y));
        let commands = stroke.commands().len();
        self.touch(DrawingEvent::StrokeExtended { index, commands });
    }

    /// Swap the background image. Strokes are left untouched.
    pub fn set_background(&mut self, background: BackgroundRef) {
        let id = background.id();
        log::info!("Background set to {} (id {})", background.source().display(), id);
        self.background = Some(background);
        self.touch(DrawingEvent::BackgroundChanged { id });
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn background(&self) -> Option<&BackgroundRef> {
        self.background.as_ref()
    }

    /// Incremented on every change; renderers compare it to detect new content
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self, view_size: Vec2, pixels_per_point: f32, stroke_width: f32) -> CanvasSnapshot {
        CanvasSnapshot {
            strokes: self.strokes.clone(),
            background: self.background.clone(),
            view_size,
            pixels_per_point,
            stroke_width,
            revision: self.revision,
        }
    }

    fn touch(&mut self, event: DrawingEvent) {
        self.revision += 1;
        self.events.emit(event);
    }
}
