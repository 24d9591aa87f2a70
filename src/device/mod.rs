mod client;
mod error;
pub mod time;

pub use client::{DeviceClient, UploadFile};
pub use error::DeviceError;
