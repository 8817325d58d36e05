use crate::app::GanttApp;
use crate::model::DependencyKind;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  View  ", |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.viewport.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.viewport.zoom_out();
                ui.close_menu();
            }
        });

        ui.menu_button("  Link  ", |ui| {
            ui.label(RichText::new("New dependencies").small().weak());
            let mut kind = app.controller.kind();
            for option in DependencyKind::ALL {
                if ui.radio_value(&mut kind, option, option.label()).clicked() {
                    ui.close_menu();
                }
            }
            app.controller.set_kind(kind);
        });

        ui.separator();
        ui.label(
            RichText::new(format!("Drag ○ to link  ·  new links: {}", app.controller.kind().short_label()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );

        // Right-aligned project name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(&app.project.name).size(11.0).weak());
        });
    });
}
