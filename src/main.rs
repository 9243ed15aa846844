mod commands;
mod error;
mod filters;
mod image_store;
mod placement;
mod session;
mod state;
mod tools;
mod ui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1080.0, 720.0])
            .with_min_inner_size([640.0, 420.0])
            .with_title("Image Processing App"),
        ..Default::default()
    };

    eframe::run_native(
        "imagelab",
        options,
        Box::new(|cc| Ok(Box::new(ui::LabApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start application: {e}"))
}
