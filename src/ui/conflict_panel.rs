use crate::engine::Conflicts;
use crate::model::{Task, TaskId};
use crate::ui::theme;
use egui::{RichText, Ui};

/// Render the left-side list of scheduling conflicts.
///
/// Returns the task the user clicked, if any.
pub fn show_conflict_panel(
    tasks: &[Task],
    conflicts: &Conflicts,
    selected_task: Option<TaskId>,
    ui: &mut Ui,
) -> Option<TaskId> {
    let mut clicked = None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Conflicts")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", conflicts.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);
    ui.separator();

    if conflicts.is_empty() {
        ui.add_space(8.0);
        ui.label(
            RichText::new("All dependencies are satisfied")
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
        return None;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Row order, so the list reads top to bottom like the chart.
            for task in tasks.iter().filter(|t| conflicts.is_conflicted(t.id)) {
                let is_selected = selected_task == Some(task.id);
                let frame = egui::Frame::none()
                    .fill(if is_selected { theme::BG_SELECTED } else { theme::BG_PANEL })
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::symmetric(6.0, 4.0));

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let (dot_rect, _) =
                            ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot_rect.center(), 3.0, task.color);
                        ui.add(egui::Label::new(RichText::new(&task.name).size(12.0).strong()).truncate());
                    });
                    for message in conflicts.messages_for(task.id) {
                        ui.label(RichText::new(message).size(10.5).color(theme::CONFLICT));
                    }
                });

                let row_click = ui.interact(
                    frame_resp.response.rect,
                    egui::Id::new(("conflict-row", task.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    clicked = Some(task.id);
                }
                ui.add_space(2.0);
            }
        });

    clicked
}
