use device_panel::app::DevicePanel;
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([520.0, 640.0])
            .with_min_inner_size([400.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Device Control Panel",
        options,
        Box::new(|cc| Box::new(DevicePanel::new(cc))),
    ) {
        log::error!("Failed to start UI: {}", e);
    }
}
