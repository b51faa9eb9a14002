use std::rc::Rc;
use std::cell::RefCell;
use crate::event::{DrawingEvent, EventHandler};

/// Asks egui for a new frame whenever the drawing changes, so every appended
/// point gets painted.
#[derive(Debug)]
pub struct RepaintHandler {
    ctx: egui::Context,
}

impl RepaintHandler {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl EventHandler for RepaintHandler {
    fn handle_event(&mut self, event: &DrawingEvent) {
        log::trace!("repaint requested for {:?}", event);
        self.ctx.request_repaint();
    }
}

/// Records every event it sees into a shared list
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<DrawingEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DrawingEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventHandler for EventLog {
    fn handle_event(&mut self, event: &DrawingEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
