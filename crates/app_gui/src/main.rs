mod app;

use app::UiApp;
use eframe::NativeOptions;
use posture_core::{ClientConfig, HttpInferenceClient};
use std::sync::Arc;

fn main() {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::with_base_url(env!("POSTURE_API_BASE"));
    let client = match HttpInferenceClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Cannot start HTTP client: {e:#}");
            return;
        }
    };
    tracing::info!(
        "PostureCheck {} using {}",
        env!("POSTURE_CHECK_VERSION"),
        client.base_url()
    );

    let options = NativeOptions::default();
    if let Err(e) = eframe::run_native(
        "Posture Safety Classifier",
        options,
        Box::new(move |cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new(
                cc.egui_ctx.clone(),
                client,
            )))
        }),
    ) {
        eprintln!("Application stopped with error: {e}");
    }
}
