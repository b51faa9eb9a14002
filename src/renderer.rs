use eframe::egui::{self, Color32, Rect, Stroke as EguiStroke};

use crate::background::cover_uv;
use crate::document::Document;

/// Paints the document into the canvas rect: the background photo first,
/// then every stroke on top in insertion order.
pub struct Renderer {
    stroke_width: f32,
    background_texture: Option<(usize, egui::TextureHandle)>,
    last_revision: Option<u64>,
}

// Custom Debug implementation since TextureHandle doesn't implement Debug
impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("stroke_width", &self.stroke_width)
            .field("background_id", &self.background_texture.as_ref().map(|(id, _)| *id))
            .field("last_revision", &self.last_revision)
            .finish()
    }
}

impl Renderer {
    pub fn new(stroke_width: f32) -> Self {
        Self {
            stroke_width,
            background_texture: None,
            last_revision: None,
        }
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// True if the document changed since the last [`Self::render`]
    pub fn needs_repaint(&self, document: &Document) -> bool {
        self.last_revision != Some(document.revision())
    }

    pub fn render(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect, document: &Document) {
        painter.rect_filled(rect, 0.0, Color32::WHITE);

        if let Some(background) = document.background() {
            let texture = match &self.background_texture {
                Some((id, texture)) if *id == background.id() => texture.clone(),
                _ => {
                    log::debug!("Uploading background texture {}", background.id());
                    let texture = ctx.load_texture(
                        format!("background_{}", background.id()),
                        background.to_color_image(),
                        egui::TextureOptions::LINEAR,
                    );
                    self.background_texture = Some((background.id(), texture.clone()));
                    texture
                }
            };
            let uv = cover_uv(background.size(), rect.size());
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }

        let painter = painter.with_clip_rect(rect);
        let offset = rect.min.to_vec2();
        for stroke in document.strokes() {
            // A path that only moves has nothing to draw
            if stroke.segment_count() == 0 {
                continue;
            }
            let points = stroke.points().into_iter().map(|p| p + offset).collect();
            painter.add(egui::Shape::line(points, EguiStroke::new(self.stroke_width, stroke.color())));
        }

        self.last_revision = Some(document.revision());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::BackgroundImage;
    use crate::stroke::DEFAULT_STROKE_COLOR;
    use image::RgbaImage;

    fn painter(ctx: &egui::Context, rect: Rect) -> egui::Painter {
        egui::Painter::new(ctx.clone(), egui::LayerId::background(), rect)
    }

    #[test]
    fn test_render_tracks_revision() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let mut renderer = Renderer::new(5.0);
        let mut doc = Document::new();

        assert!(renderer.needs_repaint(&doc));
        renderer.render(&ctx, &painter(&ctx, rect), rect, &doc);
        assert!(!renderer.needs_repaint(&doc));

        doc.begin_stroke(1.0, 1.0, DEFAULT_STROKE_COLOR);
        assert!(renderer.needs_repaint(&doc));
        doc.extend_stroke(5.0, 5.0);
        renderer.render(&ctx, &painter(&ctx, rect), rect, &doc);
        assert!(!renderer.needs_repaint(&doc));
    }

    #[test]
    fn test_background_texture_is_cached_per_image() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let mut renderer = Renderer::new(5.0);
        let mut doc = Document::new();

        let first = BackgroundImage::new_ref("a.png", RgbaImage::new(4, 4));
        let first_id = first.id();
        doc.set_background(first);
        renderer.render(&ctx, &painter(&ctx, rect), rect, &doc);
        assert_eq!(renderer.background_texture.as_ref().map(|(id, _)| *id), Some(first_id));

        let second = BackgroundImage::new_ref("b.png", RgbaImage::new(4, 4));
        let second_id = second.id();
        doc.set_background(second);
        renderer.render(&ctx, &painter(&ctx, rect), rect, &doc);
        assert_eq!(renderer.background_texture.as_ref().map(|(id, _)| *id), Some(second_id));
    }
}
