use eframe::egui::{self, Pos2, Rect, Ui};

use super::ViewModel;
use super::geometry::zoom_about;

impl ViewModel {
    /// Camera input for the canvas: dragging with the secondary or middle
    /// button pans, scrolling zooms about the cursor.
    pub(super) fn handle_camera(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }

        if !response.hovered() {
            return;
        }

        let (scroll, pointer) =
            ui.input(|input| (input.raw_scroll_delta.y, input.pointer.hover_pos()));
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let focus = pointer.unwrap_or_else(|| rect.center()) - rect.center();
        (self.zoom, self.pan) = zoom_about(focus, self.pan, self.zoom, scroll);
    }

    /// Closest node under the pointer, if any.
    pub(super) fn hovered_index(
        ui: &Ui,
        screen_positions: &[Pos2],
        screen_radius: f32,
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        screen_positions
            .iter()
            .enumerate()
            .filter_map(|(index, position)| {
                let distance = position.distance(pointer);
                (distance <= screen_radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
