use std::path::{Path, PathBuf};

use egui::{Pos2, Rect, pos2};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::background::cover_uv;
use crate::document::CanvasSnapshot;
use crate::error::{ExportError, ExportResult};
use crate::geometry::{calculate_bounds, distance_to_line_segment};
use crate::stroke::Stroke;

/// Turns the canvas as currently drawn into a raster file
pub trait ViewCapture: Send + Sync {
    /// Write the composite to a temporary file under `scratch_dir` and return its path
    fn capture(&self, snapshot: &CanvasSnapshot, scratch_dir: &Path) -> ExportResult<PathBuf>;
}

/// Rasterizes the snapshot on the CPU at its native pixel size
#[derive(Debug, Clone, Copy)]
pub struct RasterCapture {
    /// Color under the background, visible when no photo is picked
    pub fill: Rgba<u8>,
}

impl Default for RasterCapture {
    fn default() -> Self {
        Self {
            fill: Rgba([255, 255, 255, 255]),
        }
    }
}

impl ViewCapture for RasterCapture {
    fn capture(&self, snapshot: &CanvasSnapshot, scratch_dir: &Path) -> ExportResult<PathBuf> {
        let raster = rasterize(snapshot, self.fill)?;

        std::fs::create_dir_all(scratch_dir)
            .map_err(|err| ExportError::Capture(format!("{}: {}", scratch_dir.display(), err)))?;
        let path = scratch_dir.join(format!("capture_{}.png", uuid::Uuid::new_v4()));
        raster
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|err| ExportError::Capture(format!("{}: {}", path.display(), err)))?;

        log::debug!("Captured {}x{} canvas to {}", raster.width(), raster.height(), path.display());
        Ok(path)
    }
}

/// Composite the background and every stroke into one image
pub fn rasterize(snapshot: &CanvasSnapshot, fill: Rgba<u8>) -> ExportResult<RgbaImage> {
    let ppp = snapshot.pixels_per_point;
    if !ppp.is_finite() || ppp <= 0.0 {
        return Err(ExportError::Capture(format!("invalid pixels per point {}", ppp)));
    }

    let width = (snapshot.view_size.x * ppp).round();
    let height = (snapshot.view_size.y * ppp).round();
    if !(width >= 1.0 && height >= 1.0) {
        return Err(ExportError::Capture(format!(
            "canvas has no area ({}x{}), is it on screen?",
            snapshot.view_size.x, snapshot.view_size.y
        )));
    }
    let (width, height) = (width as u32, height as u32);

    let mut canvas = RgbaImage::from_pixel(width, height, fill);

    if let Some(background) = &snapshot.background {
        let source = background.pixels();
        if source.width() > 0 && source.height() > 0 {
            let uv = cover_uv(background.size(), snapshot.view_size);
            let (sw, sh) = (source.width() as f32, source.height() as f32);
            let x = ((uv.min.x * sw).floor() as u32).min(source.width() - 1);
            let y = ((uv.min.y * sh).floor() as u32).min(source.height() - 1);
            let w = ((uv.width() * sw).round() as u32).clamp(1, source.width() - x);
            let h = ((uv.height() * sh).round() as u32).clamp(1, source.height() - y);

            let cropped = imageops::crop_imm(source, x, y, w, h).to_image();
            let scaled = imageops::resize(&cropped, width, height, FilterType::Triangle);
            imageops::overlay(&mut canvas, &scaled, 0, 0);
        }
    }

    let radius = snapshot.stroke_width * ppp / 2.0;
    for stroke in &snapshot.strokes {
        paint_stroke(&mut canvas, stroke, ppp, radius);
    }

    Ok(canvas)
}

// Build a coverage mask over the stroke's bounds, one capsule per segment,
// then blend it once so overlapping segments do not darken the joints.
fn paint_stroke(canvas: &mut RgbaImage, stroke: &Stroke, scale: f32, radius: f32) {
    let points: Vec<Pos2> = stroke
        .points()
        .into_iter()
        .map(|p| pos2(p.x * scale, p.y * scale))
        .collect();
    if points.len() < 2 || radius <= 0.0 {
        return;
    }

    let image_rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(canvas.width() as f32, canvas.height() as f32));
    let bounds = calculate_bounds(&points, radius + 1.0).intersect(image_rect);
    if !bounds.is_positive() {
        return;
    }

    let x0 = bounds.min.x.floor() as u32;
    let y0 = bounds.min.y.floor() as u32;
    let x1 = (bounds.max.x.ceil() as u32).min(canvas.width());
    let y1 = (bounds.max.y.ceil() as u32).min(canvas.height());
    let mask_w = (x1 - x0) as usize;
    let mut mask = vec![0.0f32; mask_w * (y1 - y0) as usize];

    for segment in points.windows(2) {
        let seg_bounds = calculate_bounds(segment, radius + 1.0).intersect(bounds);
        if !seg_bounds.is_positive() {
            continue;
        }
        let sx0 = (seg_bounds.min.x.floor() as u32).max(x0);
        let sy0 = (seg_bounds.min.y.floor() as u32).max(y0);
        let sx1 = (seg_bounds.max.x.ceil() as u32).min(x1);
        let sy1 = (seg_bounds.max.y.ceil() as u32).min(y1);

        for py in sy0..sy1 {
            for px in sx0..sx1 {
                let center = pos2(px as f32 + 0.5, py as f32 + 0.5);
                let distance = distance_to_line_segment(center, segment[0], segment[1]);
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                let slot = &mut mask[(py - y0) as usize * mask_w + (px - x0) as usize];
                *slot = slot.max(coverage);
            }
        }
    }

    let [r, g, b, a] = stroke.color().to_srgba_unmultiplied();
    let color = [r as f32, g as f32, b as f32];
    let alpha = a as f32 / 255.0;

    for py in y0..y1 {
        for px in x0..x1 {
            let coverage = mask[(py - y0) as usize * mask_w + (px - x0) as usize];
            if coverage <= 0.0 {
                continue;
            }
            let src_alpha = alpha * coverage;
            let dst = canvas.get_pixel_mut(px, py);
            for (channel, src) in dst.0.iter_mut().take(3).zip(color) {
                *channel = (src * src_alpha + *channel as f32 * (1.0 - src_alpha)).round() as u8;
            }
            let dst_alpha = dst.0[3] as f32 / 255.0;
            dst.0[3] = ((src_alpha + dst_alpha * (1.0 - src_alpha)) * 255.0).round() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::BackgroundImage;
    use egui::{Color32, vec2};

    fn snapshot(strokes: Vec<Stroke>) -> CanvasSnapshot {
        CanvasSnapshot {
            strokes,
            background: None,
            view_size: vec2(100.0, 50.0),
            pixels_per_point: 2.0,
            stroke_width: 5.0,
            revision: 0,
        }
    }

    #[test]
    fn test_native_resolution_uses_pixels_per_point() {
        let image = rasterize(&snapshot(Vec::new()), Rgba([255, 255, 255, 255])).unwrap();
        assert_eq!(image.dimensions(), (200, 100));
        assert_eq!(*image.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_zero_sized_view_is_capture_error() {
        let mut snap = snapshot(Vec::new());
        snap.view_size = vec2(0.0, 50.0);
        let err = rasterize(&snap, Rgba([0, 0, 0, 255])).unwrap_err();
        assert!(matches!(err, ExportError::Capture(_)));
    }

    #[test]
    fn test_stroke_is_painted_along_its_path() {
        let mut stroke = Stroke::new(pos2(10.0, 25.0), Color32::from_rgb(255, 0, 0));
        stroke.line_to(pos2(90.0, 25.0));
        let image = rasterize(&snapshot(vec![stroke]), Rgba([255, 255, 255, 255])).unwrap();

        // On the line (scaled by 2)
        assert_eq!(*image.get_pixel(100, 50), Rgba([255, 0, 0, 255]));
        // Far from the line
        assert_eq!(*image.get_pixel(100, 5), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_lone_move_paints_nothing() {
        let stroke = Stroke::new(pos2(50.0, 25.0), Color32::from_rgb(255, 0, 0));
        let image = rasterize(&snapshot(vec![stroke]), Rgba([255, 255, 255, 255])).unwrap();
        assert_eq!(*image.get_pixel(100, 50), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_background_fills_view() {
        let mut snap = snapshot(Vec::new());
        snap.background = Some(BackgroundImage::new_ref(
            "blue.png",
            RgbaImage::from_pixel(30, 60, Rgba([0, 0, 255, 255])),
        ));
        let image = rasterize(&snap, Rgba([255, 255, 255, 255])).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*image.get_pixel(199, 99), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_capture_writes_png() {
        let dir = std::env::temp_dir().join(format!("photo_doodle_capture_{}", uuid::Uuid::new_v4()));
        let path = RasterCapture::default().capture(&snapshot(Vec::new()), &dir).unwrap();
        assert_eq!(image::image_dimensions(&path).unwrap(), (200, 100));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
