use egui::{Rect, Vec2, pos2};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// Static counter for generating unique IDs
static NEXT_IMAGE_ID: AtomicUsize = AtomicUsize::new(1);

/// The decoded photo the user draws over
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    id: usize,         // Unique identifier, used to key the GPU texture
    source: PathBuf,   // Where the image was picked from
    pixels: RgbaImage,
}

// Background is shared between the UI and the export worker
pub type BackgroundRef = Arc<BackgroundImage>;

impl BackgroundImage {
    pub fn new(source: impl Into<PathBuf>, pixels: RgbaImage) -> Self {
        let id = NEXT_IMAGE_ID.fetch_add(1, Ordering::SeqCst);
        Self {
            id,
            source: source.into(),
            pixels,
        }
    }

    pub fn new_ref(source: impl Into<PathBuf>, pixels: RgbaImage) -> BackgroundRef {
        Arc::new(Self::new(source, pixels))
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.pixels.width() as usize, self.pixels.height() as usize],
            self.pixels.as_raw(),
        )
    }
}

/// Normalized source rectangle that makes an image of `image_size` cover a
/// view of `view_size` without distortion, cropping the overflow evenly.
pub fn cover_uv(image_size: Vec2, view_size: Vec2) -> Rect {
    let full = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
    if image_size.x <= 0.0 || image_size.y <= 0.0 || view_size.x <= 0.0 || view_size.y <= 0.0 {
        return full;
    }

    let image_aspect = image_size.x / image_size.y;
    let view_aspect = view_size.x / view_size.y;

    if image_aspect > view_aspect {
        // Too wide: crop left and right
        let visible = view_aspect / image_aspect;
        let margin = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(margin, 0.0), pos2(1.0 - margin, 1.0))
    } else {
        // Too tall: crop top and bottom
        let visible = image_aspect / view_aspect;
        let margin = (1.0 - visible) / 2.0;
        Rect::from_min_max(pos2(0.0, margin), pos2(1.0, 1.0 - margin))
    }
}
