mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::DrawingEvent;
pub use handlers::{EventLog, RepaintHandler};

pub trait EventHandler {
    fn handle_event(&mut self, event: &DrawingEvent);
}
