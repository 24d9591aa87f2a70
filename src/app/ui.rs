use super::{ActionOutcome, DevicePanel, UploadProgress};
use eframe::egui::{self, Align, Color32, RichText};
use rfd::FileDialog;

impl DevicePanel {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 40.0;
            let footer_margin = 15.0;
            let content_height = total_height - footer_height - footer_margin;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Device Control Panel");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Manage the device filesystem, clock and buzzer")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_device_url(ui);
                    ui.add_space(20.0);
                    self.render_file_selection(ui);
                    ui.add_space(20.0);
                    self.render_actions(ui);
                    ui.add_space(20.0);

                    if !matches!(self.state.progress, UploadProgress::Idle) {
                        self.render_progress(ui);
                    }

                    if !self.state.reports.is_empty() {
                        ui.add_space(10.0);
                        self.render_details(ui);
                    }

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(footer_margin);
                self.render_footer(ui);
            });
        });
    }

    fn render_device_url(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Device address");
                ui.add(
                    egui::TextEdit::singleline(&mut self.device_url)
                        .font(egui::TextStyle::Monospace)
                        .desired_width(220.0)
                        .hint_text("http://192.168.4.1"),
                );
                if ui.button("🌐 Open in Browser").clicked() {
                    if let Err(e) = open::that(&self.device_url) {
                        log::error!("Failed to open device page: {}", e);
                    }
                }
            });
        });
    }

    fn render_file_selection(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                if ui.button("📁 Select Files").clicked() {
                    if let Some(paths) = FileDialog::new().pick_files() {
                        self.selected_files = paths;
                    }
                }
                if self.selected_files.is_empty() {
                    ui.label("No files selected");
                } else {
                    ui.label(format!("{} file(s) selected", self.selected_files.len()));
                    if ui.button("Clear").clicked() {
                        self.selected_files.clear();
                    }
                }
            });

            if !self.selected_files.is_empty() {
                ui.add_space(5.0);
                for path in &self.selected_files {
                    if let Some(name) = path.file_name() {
                        ui.label(
                            RichText::new(format!("• {}", name.to_string_lossy()))
                                .color(ui.visuals().text_color().gamma_multiply(0.8)),
                        );
                    }
                }
            }

            ui.add_space(5.0);
            ui.checkbox(&mut self.overwrite, "Overwrite existing files");
        });
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            let can_upload = !self.selected_files.is_empty() && !self.state.is_uploading();
            ui.add_enabled_ui(can_upload, |ui| {
                let button =
                    egui::Button::new("📤 Upload Files").min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    self.start_upload();
                }
            });
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if ui.button("🗑 Format Filesystem").clicked() {
                self.trigger_format();
            }
            if ui.button("🕒 Set Time").clicked() {
                self.trigger_set_time();
            }
            if ui.button("📄 List Files").clicked() {
                self.trigger_list_files();
            }
            if ui.button("🔊 Play Sound").clicked() {
                self.trigger_play_sound();
            }
        });
    }

    fn render_progress(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            let heading = match &self.state.progress {
                UploadProgress::Completed { failed, .. } => {
                    if *failed > 0 {
                        "Upload finished with failures"
                    } else {
                        "Upload complete"
                    }
                }
                _ => "📤 Uploading",
            };
            ui.label(heading);

            let progress_bar = egui::ProgressBar::new(self.state.progress_fraction())
                .show_percentage()
                .animate(self.state.is_uploading());
            ui.add(progress_bar);

            ui.label(self.state.status_text());

            if matches!(self.state.progress, UploadProgress::Completed { .. })
                && ui.button("Clear Log").clicked()
            {
                self.reset();
            }
        });
    }

    fn render_details(&mut self, ui: &mut egui::Ui) {
        if ui
            .button(if self.state.show_details {
                "Hide Details"
            } else {
                "Show Details"
            })
            .clicked()
        {
            self.state.show_details = !self.state.show_details;
        }

        if self.state.show_details {
            egui::ScrollArea::vertical()
                .max_height(200.0)
                .show(ui, |ui| {
                    egui::Frame::none()
                        .fill(ui.style().visuals.extreme_bg_color)
                        .show(ui, |ui| {
                            ui.add_space(8.0);
                            for report in &self.state.reports {
                                match &report.outcome {
                                    ActionOutcome::Success(body) => {
                                        ui.horizontal(|ui| {
                                            ui.label("✅");
                                            ui.colored_label(
                                                Color32::from_rgb(0, 180, 0),
                                                report.label(),
                                            );
                                        });
                                        if !body.is_empty() {
                                            ui.label(
                                                RichText::new(body)
                                                    .text_style(egui::TextStyle::Monospace)
                                                    .color(
                                                        ui.visuals()
                                                            .text_color()
                                                            .gamma_multiply(0.8),
                                                    ),
                                            );
                                        }
                                    }
                                    ActionOutcome::Failed(detail) => {
                                        ui.horizontal(|ui| {
                                            ui.label("❌");
                                            ui.colored_label(
                                                Color32::from_rgb(220, 50, 50),
                                                format!("{} - {}", report.label(), detail),
                                            );
                                        });
                                    }
                                }
                                ui.add_space(4.0);
                            }
                            ui.add_space(8.0);
                        });
                });
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        if let Some(error) = &self.state.error_message {
            ui.vertical_centered(|ui| {
                ui.colored_label(Color32::from_rgb(220, 50, 50), error);
            });
        }
    }
}
