pub mod gestures;
pub mod state;

pub use gestures::{Gesture, GestureConfig, PanRecognizer};
pub use state::{PointerSampler, TouchPhase, TouchPoint};
