use eframe::egui;

use crate::config::DashboardConfig;
use crate::create_app;

const MIN_WINDOW: [f32; 2] = [900.0, 600.0];

/// Entry point used by the native executable.
pub fn run(config: DashboardConfig) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size(MIN_WINDOW),
        ..Default::default()
    };

    eframe::run_native(
        "Customer Segmentation Dashboard",
        native_options,
        Box::new(move |cc| Ok(Box::new(create_app(cc, &config)))),
    )
}
