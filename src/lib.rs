#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod document;
pub mod error;
pub mod event;
pub mod export;
pub mod file_handler;
mod geometry;
pub mod input;
pub mod picker;
pub mod renderer;
pub mod settings;
pub mod stroke;
pub mod tools;
pub mod util;

pub use app::PaintApp;
pub use background::{BackgroundImage, BackgroundRef};
pub use document::{CanvasSnapshot, Document};
pub use error::{ExportError, MediaIndexError, PickError};
pub use export::{CompositeExporter, ExportWorker};
pub use renderer::Renderer;
pub use settings::Settings;
pub use stroke::{serialize_path, PathCommand, Stroke, StrokeIndex};
pub use tools::DrawStrokeTool;
