use crate::document::Document;
use crate::error::ExportError;
use crate::event::RepaintHandler;
use crate::export::{CompositeExporter, ExportWorker};
use crate::file_handler::FileHandler;
use crate::input::{PanRecognizer, PointerSampler};
use crate::picker::{load_background, ImageSource, NativeImagePicker};
use crate::renderer::Renderer;
use crate::settings::Settings;
use crate::tools::DrawStrokeTool;

/// How long a status message stays on screen, in seconds
const NOTIFICATION_SECS: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
struct Notification {
    kind: NotificationKind,
    text: String,
    shown_at: Option<f64>,
}

/// The single screen of the app: a picker button, the canvas and a save button
pub struct PaintApp {
    settings: Settings,
    document: Document,
    renderer: Renderer,
    sampler: PointerSampler,
    pan: PanRecognizer,
    tool: DrawStrokeTool,
    picker: Box<dyn ImageSource>,
    file_handler: FileHandler,
    export: ExportWorker,
    notification: Option<Notification>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load(cc.storage);
        let app = Self::with_settings(settings, Box::new(NativeImagePicker));
        app.document.subscribe(Box::new(RepaintHandler::new(cc.egui_ctx.clone())));
        app
    }

    pub fn with_settings(settings: Settings, picker: Box<dyn ImageSource>) -> Self {
        let exporter = CompositeExporter::for_platform(settings.export.clone());
        Self {
            renderer: Renderer::new(settings.stroke_width),
            pan: PanRecognizer::new(settings.gesture),
            tool: DrawStrokeTool::with_color(settings.stroke_color),
            document: Document::new(),
            sampler: PointerSampler::new(),
            picker,
            file_handler: FileHandler::new(),
            export: ExportWorker::new(exporter),
            notification: None,
            settings,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn notify(&mut self, kind: NotificationKind, text: impl Into<String>) {
        self.notification = Some(Notification {
            kind,
            text: text.into(),
            shown_at: None,
        });
    }

    fn pick_image(&mut self) {
        match self.picker.pick() {
            Ok(Some(path)) => match load_background(&path) {
                Ok(background) => self.document.set_background(background.into()),
                Err(err) => {
                    log::error!("{}", err);
                    self.notify(NotificationKind::Error, err.to_string());
                }
            },
            // Dismissed, nothing to do
            Ok(None) => {}
            Err(err) => {
                log::error!("{}", err);
                self.notify(NotificationKind::Error, err.to_string());
            }
        }
    }

    fn save_image(&mut self, ctx: &egui::Context, pixels_per_point: f32) {
        let snapshot = self.document.snapshot(
            self.settings.canvas_size,
            pixels_per_point,
            self.renderer.stroke_width(),
        );
        let repaint_ctx = ctx.clone();
        match self.export.start(snapshot, move || repaint_ctx.request_repaint()) {
            Ok(()) => self.notify(NotificationKind::Info, "Saving…"),
            Err(ExportError::Busy) => self.notify(NotificationKind::Info, "Still saving the previous image"),
            Err(err) => self.notify(NotificationKind::Error, err.to_string()),
        }
    }

    fn collect_export_result(&mut self) {
        match self.export.poll() {
            Some(Ok(path)) => self.notify(NotificationKind::Info, format!("Saved to {}", path.display())),
            Some(Err(err)) => self.notify(NotificationKind::Error, format!("Save failed: {}", err)),
            None => {}
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(self.settings.canvas_size, egui::Sense::drag());

        if let Some(touch) = self.sampler.sample(&response) {
            if let Some(gesture) = self.pan.update(&touch) {
                self.tool.handle_gesture(gesture, &mut self.document);
            }
        }

        self.renderer.render(ui.ctx(), &painter, response.rect, &self.document);
    }

    fn show_notification(&mut self, ui: &mut egui::Ui) {
        let now = ui.input(|i| i.time);
        let Some(notification) = &mut self.notification else {
            return;
        };
        let shown_at = *notification.shown_at.get_or_insert(now);
        if notification.kind == NotificationKind::Info && now - shown_at > NOTIFICATION_SECS {
            self.notification = None;
            return;
        }

        let color = match notification.kind {
            NotificationKind::Info => ui.visuals().text_color(),
            NotificationKind::Error => ui.visuals().error_fg_color,
        };
        ui.colored_label(color, &notification.text);
        if notification.kind == NotificationKind::Error && ui.small_button("Dismiss").clicked() {
            self.notification = None;
        }
        ui.ctx()
            .request_repaint_after(std::time::Duration::from_secs_f64(NOTIFICATION_SECS));
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.store(storage);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_export_result();

        if self.file_handler.check_for_dropped_files(ctx) {
            if let Some(background) = self.file_handler.take_background() {
                self.document.set_background(background.into());
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                if ui.button("Pick an image from gallery").clicked() {
                    self.pick_image();
                }

                self.canvas(ui);

                let label = format!(
                    "Save Image with resize to {}x{}",
                    self.settings.export.width, self.settings.export.height
                );
                let saving = self.export.is_pending();
                if ui.add_enabled(!saving, egui::Button::new(label)).clicked() {
                    self.save_image(ctx, ctx.pixels_per_point());
                }

                self.show_notification(ui);
            });
        });

        self.file_handler.preview_files_being_dropped(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(touch) = self.sampler.cancel() {
            if let Some(gesture) = self.pan.update(&touch) {
                self.tool.handle_gesture(gesture, &mut self.document);
            }
        }
        self.tool.deactivate();

        if let Some(result) = self.export.wait() {
            match result {
                Ok(path) => log::info!("Finished pending save to {}", path.display()),
                Err(err) => log::error!("Pending save failed: {}", err),
            }
        }
    }
}
