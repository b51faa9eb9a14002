use crate::stroke::StrokeIndex;

/// Changes to the drawing, emitted once per mutation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingEvent {
    StrokeStarted {
        index: StrokeIndex,
    },
    StrokeExtended {
        index: StrokeIndex,
        /// Number of commands the stroke holds after the append
        commands: usize,
    },
    BackgroundChanged {
        id: usize,
    },
}
