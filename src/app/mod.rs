mod state;
mod ui;

use crate::device::{time, DeviceClient, UploadFile};
use crate::utils::file_size::format_size;
use eframe::{egui, App};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

pub use state::{ActionKind, ActionOutcome, ActionReport, PanelState, UploadProgress};

const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";

pub struct DevicePanel {
    device_url: String,
    selected_files: Vec<PathBuf>,
    overwrite: bool,
    state: PanelState,
    reports_tx: Sender<ActionReport>,
    reports_rx: Receiver<ActionReport>,
}

impl Default for DevicePanel {
    fn default() -> Self {
        let (reports_tx, reports_rx) = mpsc::channel();
        Self {
            device_url: DEFAULT_DEVICE_URL.to_string(),
            selected_files: Vec::new(),
            overwrite: false,
            state: PanelState::default(),
            reports_tx,
            reports_rx,
        }
    }
}

impl DevicePanel {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        log::info!("Initializing device control panel");
        Self::default()
    }

    pub fn reset(&mut self) {
        log::info!("Resetting panel state");
        self.selected_files.clear();
        self.state.clear();
    }

    /// Fires one upload request per selected file. The overwrite checkbox is
    /// read once here and shared by the whole submission; an empty selection
    /// sends nothing.
    pub fn start_upload(&mut self) {
        if self.selected_files.is_empty() {
            log::debug!("Upload requested with no files selected, skipping");
            return;
        }

        let client = DeviceClient::new(&self.device_url);
        let files = self.selected_files.clone();
        let overwrite = self.overwrite;
        let sender = self.reports_tx.clone();

        self.state.error_message = None;
        self.state.progress = UploadProgress::Uploading {
            total: files.len(),
            settled: 0,
            successful: 0,
            failed: 0,
        };
        log::info!("Uploading {} file(s), overwrite={}", files.len(), overwrite);

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                // Requests start in selection order but settle in whatever
                // order the device answers; one failure never cancels the
                // rest.
                let mut tasks = Vec::with_capacity(files.len());
                for path in files {
                    let client = client.clone();
                    let sender = sender.clone();
                    tasks.push(tokio::spawn(async move {
                        let report = upload_one(&client, &path, overwrite).await;
                        sender.send(report).unwrap_or_default();
                    }));
                }
                for task in tasks {
                    let _ = task.await;
                }
            });
        });
    }

    pub fn trigger_format(&mut self) {
        self.run_single(ActionKind::Format);
    }

    pub fn trigger_set_time(&mut self) {
        self.run_single(ActionKind::SetTime);
    }

    pub fn trigger_list_files(&mut self) {
        self.run_single(ActionKind::ListFiles);
    }

    pub fn trigger_play_sound(&mut self) {
        self.run_single(ActionKind::PlaySound);
    }

    /// One-shot actions: a single request, settled independently of anything
    /// else in flight.
    fn run_single(&mut self, action: ActionKind) {
        let client = DeviceClient::new(&self.device_url);
        let sender = self.reports_tx.clone();
        log::info!("{} requested", action.label());

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                let outcome = match action {
                    ActionKind::Format => text_outcome(client.format_filesystem().await),
                    ActionKind::SetTime => {
                        // Clock and offset are read at the moment of the
                        // click, never cached across invocations.
                        let timestamp = time::current_device_timestamp();
                        text_outcome(client.set_time(timestamp).await)
                    }
                    ActionKind::ListFiles => match client.list_files().await {
                        Ok(listing) => ActionOutcome::Success(describe_listing(&listing)),
                        Err(e) => ActionOutcome::Failed(e.to_string()),
                    },
                    ActionKind::PlaySound => text_outcome(client.play_sound().await),
                    // Uploads go through start_upload.
                    ActionKind::Upload => return,
                };
                let report = ActionReport {
                    action,
                    subject: None,
                    outcome,
                };
                sender.send(report).unwrap_or_default();
            });
        });
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let mut had_updates = false;

        while let Ok(report) = self.reports_rx.try_recv() {
            had_updates = true;
            if report.action == ActionKind::Upload {
                self.state
                    .note_upload_settled(matches!(report.outcome, ActionOutcome::Success(_)));
            }
            match &report.outcome {
                ActionOutcome::Success(body) => {
                    log::info!("{} succeeded: {}", report.label(), body)
                }
                ActionOutcome::Failed(detail) => {
                    log::error!("{} failed: {}", report.label(), detail)
                }
            }
            self.state.reports.push(report);
        }

        if had_updates || self.state.is_uploading() {
            ctx.request_repaint();
        }
    }
}

impl App for DevicePanel {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}

async fn upload_one(client: &DeviceClient, path: &Path, overwrite: bool) -> ActionReport {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let outcome = match std::fs::read(path) {
        Ok(bytes) => {
            let file = UploadFile {
                name: name.clone(),
                bytes,
            };
            match client.upload_file(file, overwrite).await {
                Ok(body) => ActionOutcome::Success(body),
                Err(e) => ActionOutcome::Failed(e.to_string()),
            }
        }
        Err(e) => ActionOutcome::Failed(format!("failed to read {}: {}", path.display(), e)),
    };

    ActionReport {
        action: ActionKind::Upload,
        subject: Some(name),
        outcome,
    }
}

fn text_outcome(result: Result<String, crate::device::DeviceError>) -> ActionOutcome {
    match result {
        Ok(body) => ActionOutcome::Success(body),
        Err(e) => ActionOutcome::Failed(e.to_string()),
    }
}

/// Renders the device's listing for the log. The firmware doesn't pin a
/// schema, so arrays of `{name, size}` objects get one line per file and
/// anything else falls back to pretty JSON.
fn describe_listing(listing: &serde_json::Value) -> String {
    if let Some(entries) = listing.as_array() {
        let mut lines = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.get("name").and_then(serde_json::Value::as_str);
            let size = entry.get("size").and_then(serde_json::Value::as_u64);
            match (name, size) {
                (Some(name), Some(size)) => lines.push(format!("{} ({})", name, format_size(size))),
                (Some(name), None) => lines.push(name.to_string()),
                _ => return pretty_json(listing),
            }
        }
        if lines.is_empty() {
            return "no files".to_string();
        }
        return lines.join("\n");
    }
    pretty_json(listing)
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_a_no_op() {
        let mut panel = DevicePanel::default();
        panel.start_upload();
        // Nothing sent, nothing in flight.
        assert!(matches!(panel.state.progress, UploadProgress::Idle));
        assert!(panel.state.reports.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn upload_fires_one_independent_request_per_selected_file() {
        use std::time::Duration;
        use wiremock::matchers::{body_string_contains, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/file"))
            .and(body_string_contains("corrupt"))
            .respond_with(ResponseTemplate::new(507).set_body_string("filesystem full"))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/file"))
            .respond_with(ResponseTemplate::new(200).set_body_string("stored"))
            .with_priority(5)
            .mount(&server)
            .await;

        let dir = std::env::temp_dir().join(format!("device-panel-upload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut panel = DevicePanel::default();
        panel.device_url = server.uri();
        panel.overwrite = false;
        for name in ["a.txt", "corrupt.bin", "c.txt"] {
            let path = dir.join(name);
            std::fs::write(&path, name).unwrap();
            panel.selected_files.push(path);
        }

        panel.start_upload();
        assert!(panel.state.is_uploading());

        let mut reports = Vec::new();
        for _ in 0..3 {
            let report = panel
                .reports_rx
                .recv_timeout(Duration::from_secs(10))
                .expect("upload report");
            assert_eq!(report.action, ActionKind::Upload);
            reports.push(report);
        }
        // Exactly one report per selected file, no extras.
        assert!(panel.reports_rx.try_recv().is_err());

        let mut successes = 0;
        for report in &reports {
            match (&report.subject, &report.outcome) {
                (Some(name), ActionOutcome::Failed(detail)) => {
                    assert_eq!(name.as_str(), "corrupt.bin");
                    assert!(detail.contains("507"));
                }
                (Some(_), ActionOutcome::Success(body)) => {
                    assert_eq!(body.as_str(), "stored");
                    successes += 1;
                }
                other => panic!("unexpected report: {:?}", other),
            }
        }
        assert_eq!(successes, 2);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
        for request in &requests {
            let raw = String::from_utf8_lossy(&request.body).into_owned();
            assert!(raw.contains("name=\"overwrite_html\""));
            assert!(raw.contains("false"));
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn listing_with_names_and_sizes_gets_one_line_per_file() {
        let listing = serde_json::json!([
            {"name": "index.html", "size": 2048},
            {"name": "boot.cfg", "size": 16}
        ]);
        let text = describe_listing(&listing);
        assert_eq!(text, "index.html (2.00 KB)\nboot.cfg (16 B)");
    }

    #[test]
    fn unexpected_listing_shapes_fall_back_to_json() {
        let listing = serde_json::json!({"free": 1024, "used": 512});
        let text = describe_listing(&listing);
        assert!(text.contains("\"free\""));
    }

    #[test]
    fn empty_listing_reads_as_no_files() {
        assert_eq!(describe_listing(&serde_json::json!([])), "no files");
    }
}
