pub mod app;
pub mod device;
pub mod utils;
