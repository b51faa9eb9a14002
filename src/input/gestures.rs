use egui::Pos2;
use super::state::{TouchPoint, TouchPhase};

/// A recognized single-pointer pan, in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Pointer went down
    PanStart(Pos2),
    /// Pointer moved far enough from the last reported position
    PanUpdate(Pos2),
    /// Pointer lifted or the interaction was cancelled
    PanEnd { cancelled: bool },
}

/// Configuration for gesture recognition
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GestureConfig {
    /// Moves shorter than this (in canvas units) from the last reported
    /// point are dropped
    pub min_distance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { min_distance: 1.0 }
    }
}

/// Recognizes a single-pointer pan and filters out sub-threshold movement
#[derive(Debug, Default)]
pub struct PanRecognizer {
    config: GestureConfig,
    active_id: Option<u64>,
    last_reported: Option<Pos2>,
}

impl PanRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            active_id: None,
            last_reported: None,
        }
    }

    /// Feed one touch sample, returning the gesture it produces if any
    pub fn update(&mut self, touch: &TouchPoint) -> Option<Gesture> {
        match touch.phase {
            TouchPhase::Started => {
                if self.active_id.is_some() {
                    // Only one pointer at a time
                    return None;
                }
                self.active_id = Some(touch.id);
                self.last_reported = Some(touch.pos);
                Some(Gesture::PanStart(touch.pos))
            }
            TouchPhase::Moved => {
                if self.active_id != Some(touch.id) {
                    return None;
                }
                let last = self.last_reported?;
                if touch.pos.distance(last) < self.config.min_distance {
                    return None;
                }
                self.last_reported = Some(touch.pos);
                Some(Gesture::PanUpdate(touch.pos))
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.active_id != Some(touch.id) {
                    return None;
                }
                self.active_id = None;
                self.last_reported = None;
                Some(Gesture::PanEnd {
                    cancelled: touch.phase == TouchPhase::Cancelled,
                })
            }
        }
    }

    pub fn is_panning(&self) -> bool {
        self.active_id.is_some()
    }
}
