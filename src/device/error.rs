use thiserror::Error;

/// Ways a device request can fail. HTTP-level, transport-level and
/// listing-parse failures are reported through the same channel but stay
/// distinguishable.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device returned {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid listing payload: {0}")]
    Parse(#[from] serde_json::Error),
}
