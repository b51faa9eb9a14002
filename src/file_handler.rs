use eframe::egui;

use crate::background::BackgroundImage;
use crate::picker::{decode_background, is_image_path, load_background};

/// Picks up image files dropped onto the window as an alternative to the picker
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect newly dropped files from the UI context.
    /// Returns true if any new files arrived.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;

        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });

        new_dropped_files
    }

    /// Decode the last dropped image. Only one background can be active, so
    /// earlier files in the same drop are skipped.
    pub fn take_background(&mut self) -> Option<BackgroundImage> {
        let files = std::mem::take(&mut self.dropped_files);
        files.iter().rev().find_map(|file| self.load_dropped(file))
    }

    fn load_dropped(&self, file: &egui::DroppedFile) -> Option<BackgroundImage> {
        let name = file
            .path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| file.name.clone());

        if !Self::is_image_file(file) {
            log::warn!("Dropped file is not a supported type: {}", name);
            return None;
        }

        let result = if let Some(bytes) = &file.bytes {
            decode_background(std::path::Path::new(&name), bytes)
        } else if let Some(path) = &file.path {
            load_background(path)
        } else {
            log::warn!("Dropped file has no accessible data: {}", name);
            return None;
        };

        result
            .map_err(|err| log::error!("Failed to load dropped image: {}", err))
            .ok()
    }

    /// Check if a file is an image based on MIME type or extension
    fn is_image_file(file: &egui::DroppedFile) -> bool {
        if !file.mime.is_empty() {
            file.mime.starts_with("image/")
        } else if let Some(path) = &file.path {
            is_image_path(path)
        } else {
            is_image_path(std::path::Path::new(&file.name))
        }
    }

    /// Dim the window while files hover over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop an image to draw on it",
            FontId::proportional(24.0),
            Color32::WHITE,
        );
    }
}
