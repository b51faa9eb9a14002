use egui::{Color32, Vec2};

use crate::export::ExportSettings;
use crate::input::GestureConfig;
use crate::stroke::DEFAULT_STROKE_COLOR;

/// User-tunable behavior, restored from eframe storage between runs.
/// The drawing itself is never stored.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Settings {
    pub stroke_color: Color32,
    pub stroke_width: f32,
    pub gesture: GestureConfig,
    /// Size of the drawing surface in points
    pub canvas_size: Vec2,
    pub export: ExportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR,
            stroke_width: 5.0,
            gesture: GestureConfig::default(),
            canvas_size: Vec2::new(300.0, 300.0),
            export: ExportSettings::default(),
        }
    }
}

impl Settings {
    /// Load from storage, falling back to defaults for anything missing or invalid
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let settings: Self = storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        settings.sanitized()
    }

    pub fn store(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Replace out-of-range values with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            log::warn!("Invalid stroke width {}, using {}", self.stroke_width, defaults.stroke_width);
            self.stroke_width = defaults.stroke_width;
        }
        if !(self.gesture.min_distance.is_finite() && self.gesture.min_distance >= 0.0) {
            log::warn!("Invalid minimum distance {}, using default", self.gesture.min_distance);
            self.gesture = defaults.gesture;
        }
        if !(self.canvas_size.x >= 1.0 && self.canvas_size.y >= 1.0) {
            log::warn!("Invalid canvas size {:?}, using default", self.canvas_size);
            self.canvas_size = defaults.canvas_size;
        }
        if self.export.width == 0 || self.export.height == 0 {
            log::warn!("Invalid export size {}x{}, using default", self.export.width, self.export.height);
            self.export.width = defaults.export.width;
            self.export.height = defaults.export.height;
        }
        self.export.quality = self.export.quality.clamp(1, 100);
        self
    }
}
