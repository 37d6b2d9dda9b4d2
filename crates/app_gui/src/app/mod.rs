mod preview;
mod result_panel;

use eframe::{App, Frame, egui};
use posture_core::{
    ClassifyError, HealthStatus, InferenceClient, SelectedImage, Session, Settlement,
    spawn_health_check, spawn_submission,
};
use preview::TexturePreviews;
use rfd::FileDialog;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "jfif", "png", "gif", "bmp", "webp", "avif", "tif", "tiff", "ico", "heic",
];
const POLL_INTERVAL: Duration = Duration::from_millis(100);

type HealthOutcome = Result<HealthStatus, ClassifyError>;

pub struct UiApp {
    session: Session<TexturePreviews>,
    client: Arc<dyn InferenceClient>,
    base_url: String,
    settlements_tx: Sender<Settlement>,
    settlements_rx: Receiver<Settlement>,
    health_tx: Sender<HealthOutcome>,
    health_rx: Receiver<HealthOutcome>,
    health: Option<HealthOutcome>,
    health_pending: bool,
    status: String,
}

impl UiApp {
    pub fn new(ctx: egui::Context, client: Arc<posture_core::HttpInferenceClient>) -> Self {
        let base_url = client.base_url().to_string();
        let (settlements_tx, settlements_rx) = mpsc::channel();
        let (health_tx, health_rx) = mpsc::channel();
        Self {
            session: Session::new(TexturePreviews::new(ctx)),
            client,
            base_url,
            settlements_tx,
            settlements_rx,
            health_tx,
            health_rx,
            health: None,
            health_pending: false,
            status: String::new(),
        }
    }

    fn drain_channels(&mut self) {
        while let Ok(settlement) = self.settlements_rx.try_recv() {
            self.session.settle(settlement);
        }
        while let Ok(outcome) = self.health_rx.try_recv() {
            self.health = Some(outcome);
            self.health_pending = false;
        }
    }

    fn pick_image(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .set_directory(".")
            .pick_file()
        else {
            return;
        };
        match SelectedImage::from_path(&path) {
            Ok(image) => {
                self.status.clear();
                self.session.select_file(Some(image));
            }
            Err(e) => {
                tracing::warn!("{e:#}");
                self.status = format!("{e:#}");
                self.session.select_file(None);
            }
        }
    }

    fn run_safety_check(&mut self) {
        match self.session.submit() {
            Ok(Some(pending)) => {
                spawn_submission(
                    Arc::clone(&self.client),
                    pending,
                    self.settlements_tx.clone(),
                );
            }
            Ok(None) => {}
            Err(e) => tracing::info!("submit rejected: {e}"),
        }
    }

    fn check_backend(&mut self) {
        if self.health_pending {
            return;
        }
        self.health_pending = true;
        spawn_health_check(Arc::clone(&self.client), self.health_tx.clone());
    }

    fn render_upload_card(&mut self, ui: &mut egui::Ui) {
        ui.heading("1. Upload Image");
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Select posture image...").clicked() {
                self.pick_image();
            }
            if self.session.selected().is_some() && ui.button("Clear").clicked() {
                self.status.clear();
                self.session.select_file(None);
            }
            if let Some(image) = self.session.selected() {
                ui.label(image.name());
            }
        });

        if let Some(texture) = self.session.preview() {
            ui.add_space(6.0);
            ui.label("Preview:");
            ui.image(egui::load::SizedTexture::from_handle(texture));
        } else if self.session.selected().is_some() {
            ui.label("No preview available for this file.");
        }

        ui.add_space(8.0);
        let in_flight = self.session.is_in_flight();
        let label = if in_flight {
            "Analyzing..."
        } else {
            "Run Safety Check"
        };
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!in_flight, egui::Button::new(label))
                .clicked()
            {
                self.run_safety_check();
            }
            if in_flight {
                ui.add(egui::Spinner::new());
            }
        });

        if let Some(message) = self.session.error_message() {
            ui.add_space(6.0);
            ui.colored_label(egui::Color32::from_rgb(220, 60, 60), message);
        }
        if !self.status.is_empty() {
            ui.label(&self.status);
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drain_channels();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.heading("Posture Safety Classifier");
            ui.label(
                "Upload a frame or image. The model classifies it as safe or unsafe \
                 and reports the unsafe probability.",
            );
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Backend: {}", self.base_url));
                if ui
                    .add_enabled(!self.health_pending, egui::Button::new("Check backend"))
                    .clicked()
                {
                    self.check_backend();
                }
                if self.health_pending {
                    ui.add(egui::Spinner::new());
                } else if let Some(outcome) = &self.health {
                    ui.label(health_summary(outcome));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("v{}", env!("POSTURE_CHECK_VERSION")));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        self.render_upload_card(ui);
                    });
                    if let Some(view) = self.session.view() {
                        ui.add_space(12.0);
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            self.render_result_panel(ui, &view);
                        });
                    }
                });
        });

        if self.session.is_in_flight() || self.health_pending {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}

/// One-line footer text for a `/health` answer.
fn health_summary(outcome: &HealthOutcome) -> String {
    match outcome {
        Ok(health) if health.is_ok() => format!(
            "online on {}, classes: {}",
            health.device,
            health.class_names.join(", ")
        ),
        Ok(health) => format!("status: {}", health.status),
        Err(e) => format!("offline ({e})"),
    }
}
