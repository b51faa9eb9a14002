use egui::{pos2, vec2, Color32, Rect};
use image::RgbaImage;
use photo_doodle::event::{DrawingEvent, EventLog};
use photo_doodle::input::{PanRecognizer, PointerSampler, GestureConfig};
use photo_doodle::{serialize_path, BackgroundImage, Document, DrawStrokeTool, PathCommand};

/// Drives sampler -> recognizer -> tool the same way the canvas widget does
struct Harness {
    canvas: Rect,
    sampler: PointerSampler,
    pan: PanRecognizer,
    tool: DrawStrokeTool,
    doc: Document,
}

impl Harness {
    fn new(min_distance: f32) -> Self {
        Self {
            canvas: Rect::from_min_size(pos2(40.0, 80.0), vec2(300.0, 300.0)),
            sampler: PointerSampler::new(),
            pan: PanRecognizer::new(GestureConfig { min_distance }),
            tool: DrawStrokeTool::new(),
            doc: Document::new(),
        }
    }

    // Positions are given in canvas-local units and offset to screen space here
    fn frame(&mut self, down: bool, local: Option<(f32, f32)>) {
        let screen = local.map(|(x, y)| pos2(x, y) + self.canvas.min.to_vec2());
        if let Some(touch) = self.sampler.update(down, screen, self.canvas) {
            if let Some(gesture) = self.pan.update(&touch) {
                self.tool.handle_gesture(gesture, &mut self.doc);
            }
        }
    }

    fn gesture(&mut self, points: &[(f32, f32)]) {
        for point in points {
            self.frame(true, Some(*point));
        }
        self.frame(false, None);
    }
}

#[test]
fn test_touch_sequence_builds_expected_path() {
    let mut harness = Harness::new(1.0);
    harness.gesture(&[(10.0, 10.0), (12.0, 10.0), (20.0, 10.0), (20.0, 20.0)]);

    assert_eq!(harness.doc.stroke_count(), 1);
    let stroke = &harness.doc.strokes()[0];
    assert_eq!(
        stroke.commands(),
        &[
            PathCommand::MoveTo(pos2(10.0, 10.0)),
            PathCommand::LineTo(pos2(12.0, 10.0)),
            PathCommand::LineTo(pos2(20.0, 10.0)),
            PathCommand::LineTo(pos2(20.0, 20.0)),
        ]
    );
    assert_eq!(serialize_path(stroke), "M 10 10 L 12 10 L 20 10 L 20 20");
}

#[test]
fn test_jitter_below_threshold_is_filtered() {
    let mut harness = Harness::new(1.0);
    harness.gesture(&[(10.0, 10.0), (10.3, 10.0), (10.6, 10.2), (12.0, 10.0)]);

    assert_eq!(serialize_path(&harness.doc.strokes()[0]), "M 10 10 L 12 10");
}

#[test]
fn test_serialized_path_has_one_move_and_one_line_per_extend() {
    let mut doc = Document::new();
    doc.begin_stroke(0.0, 0.0, Color32::BLACK);
    let extends = 25;
    for i in 1..=extends {
        doc.extend_stroke(i as f32, (i * 2) as f32);
    }

    let path = serialize_path(&doc.strokes()[0]);
    let tokens: Vec<&str> = path.split(' ').filter(|t| *t == "M" || *t == "L").collect();
    assert_eq!(tokens[0], "M");
    assert_eq!(tokens.iter().filter(|t| **t == "M").count(), 1);
    assert_eq!(tokens.iter().filter(|t| **t == "L").count(), extends);
    assert!(path.ends_with("L 25 50"));
    assert!(path.contains("L 3 6 L 4 8"));
}

#[test]
fn test_extend_without_stroke_changes_nothing() {
    let mut doc = Document::new();
    let log = EventLog::new();
    doc.subscribe(Box::new(log.clone()));

    doc.extend_stroke(1.0, 2.0);

    assert_eq!(doc.stroke_count(), 0);
    assert!(log.is_empty());
}

#[test]
fn test_second_gesture_does_not_touch_first() {
    let mut harness = Harness::new(1.0);
    harness.gesture(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]);
    let first = harness.doc.strokes()[0].clone();

    harness.gesture(&[(50.0, 50.0), (60.0, 60.0)]);

    assert_eq!(harness.doc.stroke_count(), 2);
    assert_eq!(harness.doc.strokes()[0], first);
    assert_eq!(serialize_path(&harness.doc.strokes()[1]), "M 50 50 L 60 60");
}

#[test]
fn test_every_point_is_announced() {
    let mut harness = Harness::new(1.0);
    let log = EventLog::new();
    harness.doc.subscribe(Box::new(log.clone()));

    harness.gesture(&[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)]);

    assert_eq!(
        log.events(),
        vec![
            DrawingEvent::StrokeStarted { index: 0 },
            DrawingEvent::StrokeExtended { index: 0, commands: 2 },
            DrawingEvent::StrokeExtended { index: 0, commands: 3 },
        ]
    );
    assert_eq!(harness.doc.revision(), 3);
}

#[test]
fn test_new_background_keeps_strokes() {
    let mut harness = Harness::new(1.0);
    harness.gesture(&[(0.0, 0.0), (5.0, 5.0)]);
    harness.gesture(&[(9.0, 9.0), (1.0, 1.0)]);
    let before = harness.doc.strokes().to_vec();

    harness.doc.set_background(BackgroundImage::new_ref("one.png", RgbaImage::new(8, 8)));
    harness.doc.set_background(BackgroundImage::new_ref("two.png", RgbaImage::new(8, 8)));

    assert_eq!(harness.doc.strokes(), before.as_slice());
    assert_eq!(
        harness.doc.background().map(|b| b.source().to_path_buf()),
        Some(std::path::PathBuf::from("two.png"))
    );
}

#[test]
fn test_cancelled_gesture_keeps_partial_stroke() {
    let mut harness = Harness::new(1.0);
    harness.frame(true, Some((0.0, 0.0)));
    harness.frame(true, Some((3.0, 4.0)));
    if let Some(touch) = harness.sampler.cancel() {
        if let Some(gesture) = harness.pan.update(&touch) {
            harness.tool.handle_gesture(gesture, &mut harness.doc);
        }
    }

    assert_eq!(serialize_path(&harness.doc.strokes()[0]), "M 0 0 L 3 4");

    // The next gesture starts a fresh stroke
    harness.gesture(&[(7.0, 7.0)]);
    assert_eq!(harness.doc.stroke_count(), 2);
}
