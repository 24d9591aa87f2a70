use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};

use super::error::DeviceError;
use super::time;

/// A file staged for upload: the original name plus its raw bytes.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Thin client over the device's HTTP API. One method per endpoint, no
/// retries, no timeouts; every call settles with either the response body
/// or a [`DeviceError`].
#[derive(Clone)]
pub struct DeviceClient {
    base_url: String,
    http: reqwest::Client,
}

impl DeviceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `/file` with the content under the `file` field and the
    /// stringified overwrite flag under `overwrite_html`; the field names
    /// are the device's wire contract.
    pub async fn upload_file(
        &self,
        file: UploadFile,
        overwrite: bool,
    ) -> Result<String, DeviceError> {
        log::debug!("POST /file {} ({} bytes)", file.name, file.bytes.len());
        let part = Part::bytes(file.bytes).file_name(file.name);
        let form = Form::new()
            .part("file", part)
            .text("overwrite_html", overwrite.to_string());

        let response = self
            .http
            .post(self.endpoint("/file"))
            .multipart(form)
            .send()
            .await?;
        Self::text_body(response).await
    }

    /// GET `/format`. Wipes the device filesystem, no confirmation step.
    pub async fn format_filesystem(&self) -> Result<String, DeviceError> {
        let response = self.http.get(self.endpoint("/format")).send().await?;
        Self::text_body(response).await
    }

    /// POST `/time` with a JSON-string timestamp, see [`time::timestamp_payload`].
    pub async fn set_time(&self, timestamp: DateTime<Utc>) -> Result<String, DeviceError> {
        let response = self
            .http
            .post(self.endpoint("/time"))
            .body(time::timestamp_payload(timestamp))
            .send()
            .await?;
        Self::text_body(response).await
    }

    /// GET `/files` and parse the body as JSON. Invalid JSON on a success
    /// status is a parse failure, not an HTTP failure.
    pub async fn list_files(&self) -> Result<serde_json::Value, DeviceError> {
        let response = self.http.get(self.endpoint("/files")).send().await?;
        let body = Self::text_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET `/sound`. Plays the device buzzer cue.
    pub async fn play_sound(&self) -> Result<String, DeviceError> {
        let response = self.http.get(self.endpoint("/sound")).send().await?;
        Self::text_body(response).await
    }

    async fn text_body(response: reqwest::Response) -> Result<String, DeviceError> {
        let status = response.status();
        if !status.is_success() {
            // Keep whatever body context the device sent along.
            let body = response.text().await.unwrap_or_default();
            return Err(DeviceError::Http { status, body });
        }
        Ok(response.text().await?)
    }
}
