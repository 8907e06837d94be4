use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };

use crate::engine::error::ConfigError;
use crate::engine::logging::LoggingConfig;
use crate::engine::utils::math::Vec3;

/// Demo configuration. Every section falls back to its defaults, so a JSON
/// file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub light_source: Vec3,
    pub assets: AssetConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "3D Graphics Test".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// Fixed camera: perspective projection, translated `distance` units back.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            distance: 6.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub data_dir: PathBuf,
    pub model: PathBuf,
    pub texture: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            model: PathBuf::from("DamagedHelmet.gltf"),
            texture: PathBuf::from("Default_albedo.png"),
        }
    }
}

impl AssetConfig {
    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(&self.model)
    }

    pub fn texture_path(&self) -> PathBuf {
        self.data_dir.join(&self.texture)
    }
}

pub const DEFAULT_LIGHT_SOURCE: Vec3 = [0.0, 2.5, -5.0];

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            light_source: DEFAULT_LIGHT_SOURCE,
            assets: AssetConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
