pub mod app;
pub mod config;
pub mod logging;
pub mod view;

pub use app::Session;
pub use config::{ClientConfig, ConfigError, Overrides};
