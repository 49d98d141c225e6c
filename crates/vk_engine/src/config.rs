//! Engine configuration
//!
//! Strongly typed settings for the window, the Vulkan renderer, and the
//! application identity, loadable from a TOML file with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to load
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file contents are not valid TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application identity used for the Vulkan instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Application name
    pub name: String,
    /// Application version (major, minor, patch)
    pub version: (u32, u32, u32),
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: "vk_engine application".to_string(),
            version: (0, 1, 0),
        }
    }
}

/// Initial window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial framebuffer width in pixels
    pub width: u32,
    /// Initial framebuffer height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "vk_engine".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Renderer tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Number of frames the CPU may record ahead of the GPU
    pub frames_in_flight: usize,
    /// Directory containing compiled `<material>.vert.spv` / `.frag.spv` pairs
    pub shader_dir: String,
    /// Clear color applied to the color attachment each frame (RGBA)
    pub clear_color: [f32; 4],
    /// Override for validation layers; defaults to debug builds only
    pub enable_validation: Option<bool>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            frames_in_flight: 2,
            shader_dir: "target/shaders".to_string(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            enable_validation: None,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Application identity
    pub application: ApplicationConfig,
    /// Window settings
    pub window: WindowConfig,
    /// Renderer settings
    pub renderer: RendererConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Whether validation layers should be requested
    pub fn validation_enabled(&self) -> bool {
        self.renderer
            .enable_validation
            .unwrap_or(cfg!(debug_assertions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = EngineConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.renderer.frames_in_flight, 2);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            [window]
            title = "demo"
            width = 1280
            height = 720

            [renderer]
            frames_in_flight = 3
            shader_dir = "shaders"
            clear_color = [0.1, 0.2, 0.3, 1.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 1280);
        assert_eq!(config.renderer.frames_in_flight, 3);
        assert_eq!(config.renderer.clear_color, [0.1, 0.2, 0.3, 1.0]);
        // Unspecified sections keep their defaults.
        assert_eq!(config.application.version, (0, 1, 0));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml("window = 3").is_err());
    }
}
