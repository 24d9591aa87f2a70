/// Which panel action produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Upload,
    Format,
    SetTime,
    ListFiles,
    PlaySound,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Upload => "Upload",
            ActionKind::Format => "Format filesystem",
            ActionKind::SetTime => "Set time",
            ActionKind::ListFiles => "List files",
            ActionKind::PlaySound => "Play sound",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ActionOutcome {
    Success(String),
    Failed(String),
}

/// One settled request, as reported back from a worker thread.
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub action: ActionKind,
    /// File name for uploads, `None` for the single-shot actions.
    pub subject: Option<String>,
    pub outcome: ActionOutcome,
}

impl ActionReport {
    pub fn label(&self) -> String {
        match &self.subject {
            Some(subject) => format!("{} {}", self.action.label(), subject),
            None => self.action.label().to_string(),
        }
    }
}

#[derive(Clone)]
pub enum UploadProgress {
    Idle,
    Uploading {
        total: usize,
        settled: usize,
        successful: usize,
        failed: usize,
    },
    Completed {
        total: usize,
        successful: usize,
        failed: usize,
    },
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Default)]
pub struct PanelState {
    pub progress: UploadProgress,
    pub reports: Vec<ActionReport>,
    pub error_message: Option<String>,
    pub show_details: bool,
}

impl PanelState {
    pub fn clear(&mut self) {
        *self = PanelState::default();
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.progress, UploadProgress::Uploading { .. })
    }

    /// Folds one settled upload into the progress counters.
    pub fn note_upload_settled(&mut self, success: bool) {
        let mut done = None;
        if let UploadProgress::Uploading {
            total,
            settled,
            successful,
            failed,
        } = &mut self.progress
        {
            *settled += 1;
            if success {
                *successful += 1;
            } else {
                *failed += 1;
            }
            if *settled >= *total {
                done = Some(UploadProgress::Completed {
                    total: *total,
                    successful: *successful,
                    failed: *failed,
                });
            }
        }
        if let Some(done) = done {
            if let UploadProgress::Completed { failed, .. } = &done {
                if *failed > 0 {
                    self.error_message = Some(format!(
                        "{} upload(s) failed. Check details for more information.",
                        failed
                    ));
                }
            }
            self.progress = done;
        }
    }

    pub fn progress_fraction(&self) -> f32 {
        match &self.progress {
            UploadProgress::Idle => 0.0,
            UploadProgress::Uploading { total, settled, .. } => {
                if *total == 0 {
                    0.0
                } else {
                    (*settled as f32) / (*total as f32)
                }
            }
            UploadProgress::Completed { .. } => 1.0,
        }
    }

    pub fn status_text(&self) -> String {
        match &self.progress {
            UploadProgress::Idle => String::new(),
            UploadProgress::Uploading {
                total,
                settled,
                successful,
                failed,
            } => {
                format!(
                    "Progress: {}/{} files | ✅ Success: {} | ❌ Failed: {}",
                    settled, total, successful, failed
                )
            }
            UploadProgress::Completed {
                total,
                successful,
                failed,
            } => {
                format!(
                    "Final Status: {}/{} files | ✅ Success: {} | ❌ Failed: {}",
                    total, total, successful, failed
                )
            }
        }
    }
}
