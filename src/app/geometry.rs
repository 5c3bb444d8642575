use eframe::egui::{Pos2, Rect, Vec2, vec2};

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

/// Rescales the camera about `focus` (a screen offset from the canvas
/// center) so the world point under the cursor stays put. Returns the
/// clamped zoom and the compensating pan.
pub(super) fn zoom_about(focus: Vec2, pan: Vec2, zoom: f32, scroll: f32) -> (f32, Vec2) {
    let step = (1.0 + scroll * 0.0018).clamp(0.85, 1.15);
    let next_zoom = (zoom * step).clamp(0.1, 6.0);
    let world = (focus - pan) / zoom;
    (next_zoom, focus - world * next_zoom)
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Shortens a link's straight-line path at both ends so arrowheads clear the
/// node icons: the direction vector is normalized and each endpoint moves
/// inward by its padding. Returns `None` when the nodes sit too close for
/// any visible segment to remain; callers skip such links for the tick.
pub(super) fn padded_segment(
    source: Vec2,
    target: Vec2,
    source_padding: f32,
    target_padding: f32,
) -> Option<(Vec2, Vec2)> {
    let delta = target - source;
    let distance = delta.length();
    if distance <= source_padding + target_padding {
        return None;
    }

    let direction = delta / distance;
    Some((
        source + direction * source_padding,
        target - direction * target_padding,
    ))
}

/// Link label anchor. The horizontal factor is deliberately 0.51 rather than
/// the exact midpoint: the slight bias keeps labels of overlapping opposite
/// edges from landing on each other.
pub(super) fn label_anchor(source: Vec2, target: Vec2) -> Vec2 {
    vec2(0.51 * (source.x + target.x), 0.5 * (source.y + target.y))
}

/// Arrowhead triangle for an edge ending at `tip`, coming from `from`.
/// Returns the tip and the two base corners, or `None` for a degenerate
/// direction.
pub(super) fn arrowhead(tip: Pos2, from: Pos2, size: f32) -> Option<[Pos2; 3]> {
    let delta = tip - from;
    let length = delta.length();
    if length < 1e-4 {
        return None;
    }

    let unit = delta / length;
    let base = tip - unit * size;
    let half_width = size * 0.4;
    let normal = vec2(-unit.y, unit.x);

    Some([tip, base + normal * half_width, base - normal * half_width])
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn padded_segment_moves_both_endpoints_inward() {
        let (start, end) = padded_segment(vec2(0.0, 0.0), vec2(100.0, 0.0), 30.0, 40.0).unwrap();
        assert_eq!(start, vec2(30.0, 0.0));
        assert_eq!(end, vec2(60.0, 0.0));
    }

    #[test]
    fn padded_segment_rejects_overlapping_nodes() {
        assert!(padded_segment(vec2(0.0, 0.0), vec2(50.0, 0.0), 30.0, 30.0).is_none());
        assert!(padded_segment(vec2(5.0, 5.0), vec2(5.0, 5.0), 1.0, 1.0).is_none());
    }

    #[test]
    fn label_anchor_keeps_the_horizontal_bias() {
        let anchor = label_anchor(vec2(0.0, 0.0), vec2(100.0, 200.0));
        assert_eq!(anchor, vec2(51.0, 100.0));
    }

    #[test]
    fn arrowhead_base_sits_behind_the_tip() {
        let [tip, left, right] = arrowhead(pos2(100.0, 50.0), pos2(50.0, 50.0), 10.0).unwrap();
        assert_eq!(tip, pos2(100.0, 50.0));
        assert!(left.x < tip.x && right.x < tip.x);
        // Base corners sit on opposite sides of the edge.
        assert!((left.y - right.y).abs() > 1.0);
    }

    #[test]
    fn arrowhead_degenerate_direction_is_none() {
        assert!(arrowhead(pos2(5.0, 5.0), pos2(5.0, 5.0), 10.0).is_none());
    }

    #[test]
    fn zoom_about_keeps_the_focused_world_point_fixed() {
        let focus = vec2(120.0, -45.0);
        let pan = vec2(12.0, -7.0);
        let zoom = 1.6;

        let world_before = (focus - pan) / zoom;
        let (next_zoom, next_pan) = zoom_about(focus, pan, zoom, 60.0);
        let world_after = (focus - next_pan) / next_zoom;

        assert!(next_zoom > zoom);
        assert!((world_after - world_before).length() < 1e-3);
    }

    #[test]
    fn zoom_about_clamps_the_zoom_range() {
        let (max_zoom, _) = zoom_about(Vec2::ZERO, Vec2::ZERO, 5.9, 1000.0);
        assert_eq!(max_zoom, 6.0);

        let (min_zoom, _) = zoom_about(Vec2::ZERO, Vec2::ZERO, 0.11, -1000.0);
        assert_eq!(min_zoom, 0.1);
    }
}
