//! # Tutorial Configuration
//!
//! Settings read by every tutorial binary. All sections have defaults, so a
//! missing `tutorial.toml` (or a partial one) is valid.
//!
//! Whether validation layers are requested is not configurable here: debug
//! builds ask for them, release builds do not. Unknown keys are rejected, so a
//! stale `[validation]` section is reported instead of silently ignored.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::render::vulkan::device::DeviceRequirements;

/// # Window Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title; the tutorial step provides one when unset
    pub title: Option<String>,
    /// Window width in screen coordinates
    pub width: u32,
    /// Window height in screen coordinates
    pub height: u32,
    /// Whether the user can resize the window
    pub resizable: bool,
}

impl WindowConfig {
    /// Create a window configuration with the given size
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            title: None,
            width,
            height,
            resizable: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Window size must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// # Application Info Configuration
///
/// Metadata passed to the driver in `VkApplicationInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationInfoConfig {
    /// Application name reported to the driver
    pub name: String,
    /// Application version (major, minor, patch)
    pub version: (u32, u32, u32),
    /// Engine name reported to the driver
    pub engine_name: String,
    /// Engine version (major, minor, patch)
    pub engine_version: (u32, u32, u32),
}

impl ApplicationInfoConfig {
    /// Create application info with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: (1, 0, 0),
            engine_name: "No Engine".to_string(),
            engine_version: (1, 0, 0),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Application name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ApplicationInfoConfig {
    fn default() -> Self {
        Self::new("Vulkan Tutorial")
    }
}

/// # Complete Tutorial Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TutorialConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Window settings
    pub window: WindowConfig,
    /// Application metadata for instance creation
    pub application: ApplicationInfoConfig,
    /// Physical device requirements
    pub device: DeviceRequirements,
}

impl TutorialConfig {
    /// Default config file looked up by the tutorial binaries
    pub const DEFAULT_PATH: &'static str = "tutorial.toml";

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate().map_err(ConfigError::Invalid)?;
        self.application.validate().map_err(ConfigError::Invalid)?;
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "Unknown log level: {}",
                self.log_level
            )));
        }
        Ok(())
    }
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            application: ApplicationInfoConfig::default(),
            device: DeviceRequirements::default(),
        }
    }
}

impl Config for TutorialConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::vulkan::device::DeviceFeature;

    #[test]
    fn test_defaults_are_valid() {
        let config = TutorialConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
    }

    #[test]
    fn test_validation_section_is_rejected() {
        let text = r#"
            [validation]
            enabled = true
        "#;
        assert!(toml::from_str::<TutorialConfig>(text).is_err());

        let text = "(validation: (enabled: Some(false)))";
        assert!(ron::from_str::<TutorialConfig>(text).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            log_level = "debug"

            [window]
            title = "Custom"

            [device]
            features = ["GeometryShader"]
        "#;
        let config: TutorialConfig = toml::from_str(text).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.window.title.as_deref(), Some("Custom"));
        assert_eq!(config.window.width, 800);
        assert_eq!(config.device.features, vec![DeviceFeature::GeometryShader]);
        assert_eq!(config.application, ApplicationInfoConfig::default());
    }

    #[test]
    fn test_ron_config() {
        let text = "(log_level: \"warn\", window: (width: 1024, height: 768))";
        let config: TutorialConfig = ron::from_str(text).unwrap();

        assert_eq!(config.log_level, "warn");
        assert_eq!((config.window.width, config.window.height), (1024, 768));
        assert_eq!(config.window.title, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = TutorialConfig::default();
        config.window.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = TutorialConfig::default().with_log_level("loud");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = TutorialConfig::default();
        config.application.name.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = TutorialConfig::load_from_file("tutorial.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = TutorialConfig::load_or_default("definitely/not/here.toml").unwrap();
        assert_eq!(config, TutorialConfig::default());
    }
}
