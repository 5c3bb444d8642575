use eframe::egui::{self, Align2, Color32, FontId, Sense, Shape, Stroke, Ui, vec2};

use super::geometry::{
    arrowhead, circle_visible, label_anchor, padded_segment, world_to_screen,
};
use super::{FrameClick, PhysicsConfig, ViewModel, layout, physics};

/// Drawn node disc radius in world units.
const NODE_RADIUS: f32 = 26.0;
/// Fixed inset applied to both ends of every edge so arrowheads stay clear
/// of the node icons.
const EDGE_CLEARANCE: f32 = 40.0;
const ARROW_SIZE: f32 = 11.0;

/// The layout canvas is a fraction of the viewport, re-derived at draw time
/// and never persisted.
const CANVAS_WIDTH_FRACTION: f32 = 0.99;
const CANVAS_HEIGHT_FRACTION: f32 = 0.97;

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const BAND_GUIDE: Color32 = Color32::from_rgba_premultiplied(50, 58, 68, 60);
const EDGE_COLOR: Color32 = Color32::from_rgb(148, 155, 164);
const NODE_PLAIN: Color32 = Color32::from_rgb(94, 134, 190);
const NODE_DOCUMENTED: Color32 = Color32::from_rgb(88, 170, 147);
const NODE_HOVERED: Color32 = Color32::from_rgb(255, 164, 101);
const NODE_OPEN_RING: Color32 = Color32::from_rgb(245, 206, 93);

impl ViewModel {
    /// Runs the hierarchical layout once per document (and again after
    /// "Reset layout"), mapping canvas coordinates into the centered world
    /// space the simulation owns from then on.
    fn ensure_layout(&mut self, rect: egui::Rect) {
        if self.layout_done {
            return;
        }

        let width = rect.width() * CANVAS_WIDTH_FRACTION;
        let height = rect.height() * CANVAS_HEIGHT_FRACTION;
        let positions = layout::assign_positions(&self.graph.nodes, width, height);
        let center = vec2(width / 2.0, height / 2.0);

        for (node, position) in self.diagram.nodes.iter_mut().zip(positions) {
            node.world_pos = position - center;
            node.anchor = node.world_pos;
            node.velocity = egui::Vec2::ZERO;
        }

        self.band_guides = band_boundaries(&self.graph.nodes, height)
            .into_iter()
            .map(|y| y - center.y)
            .collect();
        self.layout_done = true;
    }

    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 0.0, BACKGROUND);

        self.ensure_layout(rect);
        self.handle_camera(ui, rect, &response);

        if self.live_physics {
            let config = PhysicsConfig {
                repulsion: self.physics_repulsion,
                spring: self.physics_spring,
                damping: self.physics_damping,
                delta_seconds: ui
                    .ctx()
                    .input(|input| input.stable_dt)
                    .clamp(1.0 / 240.0, 1.0 / 20.0),
            };
            physics::step(&mut self.diagram, config);
            // The refinement loop is free-running for the life of the view.
            ui.ctx().request_repaint();
        }

        let pan = self.pan;
        let zoom = self.zoom;

        for &guide_y in &self.band_guides {
            let screen_y = world_to_screen(rect, pan, zoom, vec2(0.0, guide_y)).y;
            if screen_y >= rect.top() && screen_y <= rect.bottom() {
                painter.line_segment(
                    [
                        egui::pos2(rect.left(), screen_y),
                        egui::pos2(rect.right(), screen_y),
                    ],
                    Stroke::new(1.0, BAND_GUIDE),
                );
            }
        }

        let screen_positions = self
            .diagram
            .nodes
            .iter()
            .map(|node| world_to_screen(rect, pan, zoom, node.world_pos))
            .collect::<Vec<_>>();
        let screen_radius = (NODE_RADIUS * zoom).clamp(4.0, 64.0);

        let hovered = Self::hovered_index(ui, &screen_positions, screen_radius);
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        // Edge pass: padded path, arrowheads, label at the biased midpoint.
        // All of this is recomputed from the current positions every tick.
        let edge_stroke = Stroke::new((1.4 * zoom.sqrt()).clamp(0.7, 3.0), EDGE_COLOR);
        for link in &self.diagram.links {
            let source = self.diagram.nodes[link.source].world_pos;
            let target = self.diagram.nodes[link.target].world_pos;

            let Some((start, end)) = padded_segment(source, target, EDGE_CLEARANCE, EDGE_CLEARANCE)
            else {
                // Nodes momentarily overlapping; skip the edge this tick.
                continue;
            };

            let start = world_to_screen(rect, pan, zoom, start);
            let end = world_to_screen(rect, pan, zoom, end);
            painter.line_segment([start, end], edge_stroke);

            let arrow_size = (ARROW_SIZE * zoom.sqrt()).clamp(5.0, 20.0);
            if link.right
                && let Some(points) = arrowhead(end, start, arrow_size)
            {
                painter.add(Shape::convex_polygon(
                    points.to_vec(),
                    EDGE_COLOR,
                    Stroke::NONE,
                ));
            }
            if link.left
                && let Some(points) = arrowhead(start, end, arrow_size)
            {
                painter.add(Shape::convex_polygon(
                    points.to_vec(),
                    EDGE_COLOR,
                    Stroke::NONE,
                ));
            }

            if let Some(label) = &link.label {
                let anchor = world_to_screen(rect, pan, zoom, label_anchor(source, target));
                painter.text(
                    anchor,
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(12.0),
                    Color32::from_gray(200),
                );
            }
        }

        for (index, record) in self.graph.nodes.iter().enumerate() {
            let position = screen_positions[index];
            if !circle_visible(rect, position, screen_radius + 20.0) {
                continue;
            }

            let is_hovered = hovered == Some(index);
            let is_open = self.panel.open_node_id() == Some(record.id.as_str());

            // The icon image is the node glyph when it resolves; otherwise a
            // colored disc stands in (also covers the loader's first frames).
            let mut icon_drawn = false;
            if let Some(icon) = &record.icon {
                let icon_rect = egui::Rect::from_center_size(
                    position,
                    vec2(screen_radius * 2.0, screen_radius * 2.0),
                );
                let image = egui::Image::new(icon_uri(icon));
                if matches!(
                    image.load_for_size(ui.ctx(), icon_rect.size()),
                    Ok(egui::load::TexturePoll::Ready { .. })
                ) {
                    image.paint_at(ui, icon_rect);
                    icon_drawn = true;
                }
            }

            if icon_drawn {
                if is_hovered {
                    painter.circle_stroke(
                        position,
                        screen_radius + 2.0,
                        Stroke::new(1.6, NODE_HOVERED),
                    );
                }
            } else {
                let fill = if is_hovered {
                    NODE_HOVERED
                } else if record.component.is_some() {
                    NODE_DOCUMENTED
                } else {
                    NODE_PLAIN
                };

                painter.circle_filled(position, screen_radius, fill);
                painter.circle_stroke(
                    position,
                    screen_radius,
                    Stroke::new(1.2, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
                );
            }
            if is_open {
                painter.circle_stroke(
                    position,
                    screen_radius + 3.5,
                    Stroke::new(1.6, NODE_OPEN_RING),
                );
            }

            painter.text(
                position + vec2(0.0, screen_radius + 6.0),
                Align2::CENTER_TOP,
                record.display_label(),
                FontId::proportional(13.0),
                Color32::from_gray(238),
            );
        }

        if let Some(hovered_index) = hovered {
            let record = &self.graph.nodes[hovered_index];
            let mut overlay = format!("{}  |  level {}", record.id, record.level);
            if record.component.is_none() {
                overlay.push_str("  |  no documentation");
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                overlay,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            self.frame_click = Some(FrameClick::Node(index));
        }
    }
}

/// World-space y coordinates of the boundaries between level bands, drawn
/// as faint guides behind the diagram.
fn band_boundaries(nodes: &[crate::taxonomy::NodeRecord], height: f32) -> Vec<f32> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let min_level = nodes.iter().map(|node| node.level).min().unwrap_or(0);
    let max_level = nodes.iter().map(|node| node.level).max().unwrap_or(0);
    let band_count = (max_level - min_level + 1) as usize;
    let band_height = height / band_count as f32;

    (1..band_count)
        .map(|band| band_height * band as f32)
        .collect()
}

/// Icon references may be full URIs (`https://...`, `file://...`) or bare
/// filesystem paths; bare paths get the file scheme so the loaders take them.
fn icon_uri(icon: &str) -> String {
    if icon.contains("://") {
        icon.to_owned()
    } else {
        format!("file://{icon}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::NodeRecord;

    fn record(id: &str, level: u32) -> NodeRecord {
        NodeRecord {
            id: id.to_owned(),
            level,
            label: None,
            icon: None,
            component: None,
        }
    }

    #[test]
    fn icon_uri_passes_full_uris_through() {
        assert_eq!(icon_uri("https://example.org/node.svg"), "https://example.org/node.svg");
        assert_eq!(icon_uri("file:///tmp/node.png"), "file:///tmp/node.png");
    }

    #[test]
    fn icon_uri_gives_bare_paths_the_file_scheme() {
        assert_eq!(icon_uri("icons/node.svg"), "file://icons/node.svg");
        assert_eq!(icon_uri("/srv/icons/node.png"), "file:///srv/icons/node.png");
    }

    #[test]
    fn band_boundaries_fall_between_bands() {
        let nodes = vec![record("a", 1), record("b", 2), record("c", 3)];
        assert_eq!(band_boundaries(&nodes, 300.0), vec![100.0, 200.0]);
    }

    #[test]
    fn band_boundaries_empty_for_a_single_band() {
        assert!(band_boundaries(&[record("a", 4)], 300.0).is_empty());
        assert!(band_boundaries(&[], 300.0).is_empty());
    }
}
