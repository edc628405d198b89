use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::DEFAULT_SPAWN;
use crate::cli::Cli;
use crate::collision::Player;
use crate::controls::{DEFAULT_MOUSE_SENSITIVITY, DEFAULT_MOVE_SPEED};
use crate::error::ConfigError;
use crate::rooms::SceneKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Museum Walk".to_string(),
        }
    }
}

/// Settings read from a JSON file; every field is optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseumConfig {
    pub window: WindowConfig,
    /// Directory that model and texture paths are relative to
    pub asset_root: PathBuf,
    pub start_scene: SceneKind,
    pub spawn: [f32; 3],
    /// Units per second
    pub move_speed: f32,
    /// Radians per pixel
    pub mouse_sensitivity: f32,
    /// Full size of the player's collision box
    pub player_size: [f32; 3],
    pub show_ui: bool,
}

impl Default for MuseumConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            asset_root: PathBuf::from("assets"),
            start_scene: SceneKind::Lobby,
            spawn: DEFAULT_SPAWN.to_array(),
            move_speed: DEFAULT_MOVE_SPEED,
            mouse_sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            player_size: Player::DEFAULT_SIZE.to_array(),
            show_ui: true,
        }
    }
}

impl MuseumConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// File given by `--config` (or defaults), then the other flags on top
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => {
                let config = Self::load(path)?;
                log::info!("Loaded config from {}", path.display());
                config
            }
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(assets) = &cli.assets {
            self.asset_root = assets.clone();
        }
        if let Some(scene) = cli.scene {
            self.start_scene = scene;
        }
        if let Some(speed) = cli.speed {
            self.move_speed = speed;
        }
        if cli.no_ui {
            self.show_ui = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!("size {}x{} is empty", self.window.width, self.window.height),
            });
        }
        if !(self.move_speed.is_finite() && self.move_speed > 0.0) {
            return Err(ConfigError::Invalid {
                field: "move_speed",
                reason: format!("{} is not a positive number", self.move_speed),
            });
        }
        if !(self.mouse_sensitivity.is_finite() && self.mouse_sensitivity > 0.0) {
            return Err(ConfigError::Invalid {
                field: "mouse_sensitivity",
                reason: format!("{} is not a positive number", self.mouse_sensitivity),
            });
        }
        if self.player_size.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(ConfigError::Invalid {
                field: "player_size",
                reason: format!("{:?} must be positive on every axis", self.player_size),
            });
        }
        Ok(())
    }

    pub fn spawn(&self) -> Vec3 {
        Vec3::from_array(self.spawn)
    }

    pub fn player_size(&self) -> Vec3 {
        Vec3::from_array(self.player_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MuseumConfig::from_json(
            Path::new("museum.json"),
            r#"{ "start_scene": "painter_room", "window": { "title": "Gallery" } }"#,
        )
        .unwrap();
        assert_eq!(config.start_scene, SceneKind::PainterRoom);
        assert_eq!(config.window.title, "Gallery");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.move_speed, DEFAULT_MOVE_SPEED);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = MuseumConfig::from_json(Path::new("museum.json"), r#"{ "move_speed": -3 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "move_speed", .. }));

        let err = MuseumConfig::from_json(Path::new("museum.json"), "{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MuseumConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn cli_flags_override() {
        let cli = Cli::parse_from([
            "museum-walk",
            "--assets",
            "/srv/museum",
            "--scene",
            "museum",
            "--speed",
            "90",
            "--no-ui",
        ]);
        let config = MuseumConfig::resolve(&cli).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("/srv/museum"));
        assert_eq!(config.start_scene, SceneKind::Museum);
        assert_eq!(config.move_speed, 90.0);
        assert!(!config.show_ui);
    }
}
