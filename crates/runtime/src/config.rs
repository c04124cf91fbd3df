use std::path::{Path, PathBuf};

use glam::Vec3;
use propscape_assets::PropDescriptor;
use propscape_audio::CollisionAudioConfig;
use propscape_input::Camera;
use propscape_interaction::InteractionConfig;
use propscape_physics::{PhysicsSettings, StepperConfig};
use propscape_spawn::SpawnerConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
}

/// The ground plane: a fixed box whose top face sits at `position.y + size.y / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub size: Vec3,
    pub position: Vec3,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            size: Vec3::new(20.0, 1000.0, 20.0),
            position: Vec3::new(0.0, -500.0, 0.0),
        }
    }
}

/// Everything needed to build a [`crate::SceneRuntime`].
///
/// Every section is optional in the file; missing sections take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub physics: PhysicsSettings,
    pub stepper: StepperConfig,
    pub audio: CollisionAudioConfig,
    pub spawner: SpawnerConfig,
    pub interaction: InteractionConfig,
    pub camera: Camera,
    /// `None` builds a scene without ground.
    pub floor: Option<FloorConfig>,
    pub props: Vec<PropDescriptor>,
    /// Directory prop assets are read from. Without it, assets stay pending
    /// until completed by the embedder.
    pub asset_root: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsSettings::default(),
            stepper: StepperConfig::default(),
            audio: CollisionAudioConfig::default(),
            spawner: SpawnerConfig::default(),
            interaction: InteractionConfig::default(),
            camera: Camera::default(),
            floor: Some(FloorConfig::default()),
            props: Vec::new(),
            asset_root: None,
        }
    }
}

impl SceneConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file. A relative `asset_root`
    /// is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let text = std::fs::read_to_string(path)?;
        let mut config = match ext.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        if let Some(root) = config.asset_root.as_mut() {
            if root.is_relative() {
                if let Some(dir) = path.parent() {
                    *root = dir.join(&*root);
                }
            }
        }
        tracing::info!(path = %path.display(), props = config.props.len(), "scene config loaded");
        Ok(config)
    }

    /// Save as YAML or JSON, chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::to_string(self)?,
            Some("json") => serde_json::to_string_pretty(self)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}
