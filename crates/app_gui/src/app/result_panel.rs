//! Result card for a successful prediction.

use super::UiApp;
use eframe::egui;
use posture_core::ResultView;

const UNSAFE_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 50, 50);
const SAFE_COLOR: egui::Color32 = egui::Color32::from_rgb(40, 150, 80);

impl UiApp {
    /// Renders the risk badge, class, device and probability listing.
    pub(super) fn render_result_panel(&self, ui: &mut egui::Ui, view: &ResultView) {
        ui.heading("2. Model Output");
        ui.add_space(8.0);

        let color = if view.risk.is_unsafe() {
            UNSAFE_COLOR
        } else {
            SAFE_COLOR
        };
        egui::Frame::new()
            .fill(color.gamma_multiply(0.15))
            .stroke(egui::Stroke::new(1.0, color))
            .corner_radius(6.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(view.risk.label())
                        .color(color)
                        .strong()
                        .size(20.0),
                );
                ui.horizontal(|ui| {
                    ui.label("Unsafe score:");
                    ui.label(egui::RichText::new(&view.score).strong());
                });
            });

        ui.add_space(8.0);
        egui::Grid::new("prediction-output")
            .num_columns(2)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                ui.label("Predicted class:");
                ui.label(egui::RichText::new(&view.predicted_class).strong());
                ui.end_row();

                ui.label("Device:");
                ui.label(&view.device);
                ui.end_row();

                ui.label("Probabilities:");
                ui.end_row();

                for row in &view.probabilities {
                    ui.label(&row.class_name);
                    ui.monospace(&row.percentage);
                    ui.end_row();
                }
            });
    }
}
