pub mod components;
pub mod config;
pub mod error;
pub mod loaders;
pub mod logging;
pub mod platform;
pub mod rendering;
pub mod utils;

pub use config::AppConfig;
pub use error::{ AssetError, ConfigError, PlatformError, RenderError };
