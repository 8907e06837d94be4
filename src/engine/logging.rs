use std::sync::Once;

use serde::{ Deserialize, Serialize };

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogColor {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<LogColor> for env_logger::WriteStyle {
    fn from(color: LogColor) -> Self {
        match color {
            LogColor::Auto => env_logger::WriteStyle::Auto,
            LogColor::Always => env_logger::WriteStyle::Always,
            LogColor::Never => env_logger::WriteStyle::Never,
        }
    }
}

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "diffuse_demo=debug,winit=warn") and takes precedence over `RUST_LOG`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub color: LogColor,
}

static INIT: Once = Once::new();

/// Installs the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.color.into());
        builder.init();

        log::debug!("logging initialized");
    });
}
