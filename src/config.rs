use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::modes::TrainConfig;
use crate::rl::QLearningConfig;

/// Where learned tables are kept between runs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub q_table_dir: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig {
            q_table_dir: PathBuf::from("."),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub learning: QLearningConfig,
    pub persistence: PersistenceConfig,
    pub training: TrainConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.learning
            .validate()
            .map_err(|msg| ConfigError::Validation(format!("learning: {}", msg)))?;
        if self.training.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if self.training.log_frequency == 0 {
            return Err(ConfigError::Validation(
                "training.log_frequency must be > 0".into(),
            ));
        }
        if self.training.max_ticks == Some(0) {
            return Err(ConfigError::Validation(
                "training.max_ticks must be > 0 when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.persistence.q_table_dir, PathBuf::from("."));
    }

    #[test]
    fn test_load_partial_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("duel_snake.toml");
        std::fs::write(
            &path,
            r#"
[game]
grid_width = 30
grid_height = 20

[learning]
epsilon = 0.05

[persistence]
q_table_dir = "tables"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.game.grid_width, 30);
        assert_eq!(config.game.grid_height, 20);
        assert_eq!(config.game.tick_ms, 100);
        assert_eq!(config.learning.epsilon, 0.05);
        assert_eq!(config.learning.alpha, 0.1);
        assert_eq!(config.persistence.q_table_dir, PathBuf::from("tables"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "[learning]\ngamma = 2.0\n").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "[game\n").unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.game.grid_width, 80);
    }
}
