use egui::{Pos2, Rect, Response};

/// A single pointer sample in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub pos: Pos2,
    pub phase: TouchPhase,
}

/// Phase of a touch interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Turns the per-frame pointer state of the canvas widget into a stream of
/// [`TouchPoint`]s relative to the canvas origin.
///
/// Only the primary pointer is tracked. egui already folds a single touch
/// into the pointer, extra fingers are ignored.
#[derive(Debug, Default)]
pub struct PointerSampler {
    active: bool,
    last_pos: Option<Pos2>,
    next_id: u64,
}

impl PointerSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the canvas response for this frame
    pub fn sample(&mut self, response: &Response) -> Option<TouchPoint> {
        let down = response.is_pointer_button_down_on();
        let pos = if self.active {
            response.interact_pointer_pos()
        } else {
            // Start exactly where the press happened, not where the pointer
            // is by the time egui reports the drag
            response
                .ctx
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos())
        };
        self.update(down, pos, response.rect)
    }

    /// Core of [`Self::sample`]: `down` is the primary button state over the
    /// canvas and `pos` the pointer position in screen space.
    pub fn update(&mut self, down: bool, pos: Option<Pos2>, canvas: Rect) -> Option<TouchPoint> {
        let local = pos.map(|p| (p - canvas.min).to_pos2());

        match (self.active, down) {
            (false, true) => {
                let pos = local?;
                if !canvas.contains(pos + canvas.min.to_vec2()) {
                    return None;
                }
                self.active = true;
                self.next_id += 1;
                self.last_pos = Some(pos);
                Some(self.point(pos, TouchPhase::Started))
            }
            (true, true) => {
                let pos = local.or(self.last_pos)?;
                if Some(pos) == self.last_pos {
                    return None;
                }
                self.last_pos = Some(pos);
                Some(self.point(pos, TouchPhase::Moved))
            }
            (true, false) => {
                self.active = false;
                let pos = local.or(self.last_pos).unwrap_or_default();
                self.last_pos = None;
                Some(self.point(pos, TouchPhase::Ended))
            }
            (false, false) => None,
        }
    }

    /// Abort the current interaction, e.g. because the canvas went away
    pub fn cancel(&mut self) -> Option<TouchPoint> {
        if !self.active {
            return None;
        }
        self.active = false;
        let pos = self.last_pos.take().unwrap_or_default();
        Some(self.point(pos, TouchPhase::Cancelled))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn point(&self, pos: Pos2, phase: TouchPhase) -> TouchPoint {
        TouchPoint {
            id: self.next_id,
            pos,
            phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(300.0, 300.0))
    }

    #[test]
    fn test_positions_are_canvas_local() {
        let mut sampler = PointerSampler::new();
        let start = sampler.update(true, Some(pos2(110.0, 60.0)), canvas()).unwrap();
        assert_eq!(start.phase, TouchPhase::Started);
        assert_eq!(start.pos, pos2(10.0, 10.0));

        let moved = sampler.update(true, Some(pos2(112.0, 60.0)), canvas()).unwrap();
        assert_eq!(moved.phase, TouchPhase::Moved);
        assert_eq!(moved.pos, pos2(12.0, 10.0));
        assert_eq!(moved.id, start.id);
    }

    #[test]
    fn test_stationary_pointer_yields_nothing() {
        let mut sampler = PointerSampler::new();
        sampler.update(true, Some(pos2(110.0, 60.0)), canvas());
        assert!(sampler.update(true, Some(pos2(110.0, 60.0)), canvas()).is_none());
    }

    #[test]
    fn test_release_ends_interaction() {
        let mut sampler = PointerSampler::new();
        sampler.update(true, Some(pos2(110.0, 60.0)), canvas());
        let end = sampler.update(false, None, canvas()).unwrap();
        assert_eq!(end.phase, TouchPhase::Ended);
        assert_eq!(end.pos, pos2(10.0, 10.0));
        assert!(!sampler.is_active());
        assert!(sampler.update(false, None, canvas()).is_none());
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let mut sampler = PointerSampler::new();
        assert!(sampler.update(true, Some(pos2(10.0, 10.0)), canvas()).is_none());
        assert!(!sampler.is_active());
    }

    #[test]
    fn test_each_interaction_gets_new_id() {
        let mut sampler = PointerSampler::new();
        let first = sampler.update(true, Some(pos2(110.0, 60.0)), canvas()).unwrap();
        sampler.update(false, None, canvas());
        let second = sampler.update(true, Some(pos2(120.0, 60.0)), canvas()).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_cancel_only_when_active() {
        let mut sampler = PointerSampler::new();
        assert!(sampler.cancel().is_none());
        sampler.update(true, Some(pos2(110.0, 60.0)), canvas());
        assert_eq!(sampler.cancel().unwrap().phase, TouchPhase::Cancelled);
    }
}
