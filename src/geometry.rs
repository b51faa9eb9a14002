use egui::{Pos2, Rect};

/// Distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Bounding box of a set of points, grown by `padding` on every side
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_distance_to_segment() {
        let d = distance_to_line_segment(pos2(5.0, 3.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-6);

        // Beyond the end the distance is to the endpoint
        let d = distance_to_line_segment(pos2(13.0, 4.0), pos2(0.0, 0.0), pos2(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-6);

        // Degenerate segment
        let d = distance_to_line_segment(pos2(3.0, 4.0), pos2(0.0, 0.0), pos2(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_with_padding() {
        let rect = calculate_bounds(&[pos2(1.0, 2.0), pos2(5.0, -1.0)], 1.0);
        assert_eq!(rect.min, pos2(0.0, -2.0));
        assert_eq!(rect.max, pos2(6.0, 3.0));
        assert_eq!(calculate_bounds(&[], 1.0), Rect::NOTHING);
    }
}
