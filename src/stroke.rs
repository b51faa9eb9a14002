use egui::{Color32, Pos2};
use std::fmt::Write as _;

/// Color every stroke gets unless the caller injects another one.
pub const DEFAULT_STROKE_COLOR: Color32 = Color32::from_rgb(0x06, 0xd6, 0xa0);

/// Position of a stroke inside the drawing (also its z-order)
pub type StrokeIndex = usize;

/// A single drawing instruction, in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Pos2),
    LineTo(Pos2),
}

impl PathCommand {
    pub fn point(&self) -> Pos2 {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => p,
        }
    }
}

/// One continuous freehand line.
///
/// Always starts with exactly one `MoveTo`; every later command is a `LineTo`
/// in the order the pointer produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    commands: Vec<PathCommand>,
    color: Color32,
}

impl Stroke {
    // Create a stroke holding only its starting point
    pub fn new(start: Pos2, color: Color32) -> Self {
        Self {
            commands: vec![PathCommand::MoveTo(start)],
            color,
        }
    }

    // Append a segment to the end of the stroke
    pub fn line_to(&mut self, point: Pos2) {
        self.commands.push(PathCommand::LineTo(point));
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// The polyline traced by this stroke, starting point included
    pub fn points(&self) -> Vec<Pos2> {
        self.commands.iter().map(PathCommand::point).collect()
    }

    /// Number of `LineTo` commands, i.e. visible segments
    pub fn segment_count(&self) -> usize {
        self.commands.len().saturating_sub(1)
    }
}

/// Render a stroke as an SVG-style path string: `M x y L x y L x y ...`
pub fn serialize_path(stroke: &Stroke) -> String {
    let mut out = String::with_capacity(stroke.commands.len() * 12);
    for (i, command) in stroke.commands.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let (token, p) = match command {
            PathCommand::MoveTo(p) => ('M', p),
            PathCommand::LineTo(p) => ('L', p),
        };
        // Writing into a String cannot fail
        let _ = write!(out, "{} {} {}", token, p.x, p.y);
    }
    out
}
