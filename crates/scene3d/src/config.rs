//! Configuration types
//!
//! Serde-backed configuration for the window, the renderer, and shader
//! lookup. Files load through the [`Config`] trait, which picks the format
//! from the file extension (TOML or RON).

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Loadable, savable configuration object
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a TOML or RON file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a TOML or RON file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents did not parse
    #[error("parse error: {0}")]
    Parse(String),

    /// Value could not be serialized
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Extension is neither .toml nor .ron
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Window creation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Whether the user may resize the window
    pub resizable: bool,
    /// Prefer a vsync'd present mode
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "scene3d application".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            vsync: true,
        }
    }
}

/// Paths to the compiled SPIR-V shader pair
///
/// Shader binaries land in different places depending on how the build was
/// invoked, so resolution scans the conventional locations instead of
/// hardcoding one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Path to the vertex shader SPIR-V file
    pub vertex_shader_path: String,
    /// Path to the fragment shader SPIR-V file
    pub fragment_shader_path: String,
}

impl ShaderConfig {
    /// Create a shader configuration from explicit paths
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }

    /// Resolve shader file names against the conventional search roots
    ///
    /// Checks `target/shaders/` (build script output), then source-tree and
    /// working-directory locations. Falls back to `shaders/<name>` so
    /// [`ShaderConfig::validate`] reports a sensible path when nothing was
    /// found.
    pub fn with_path_resolution(base_vertex: &str, base_fragment: &str) -> Self {
        let shader_dirs = [
            "target/shaders/",
            "shaders/",
            "resources/shaders/",
            "../shaders/",
            "./",
        ];

        let mut vertex_path = None;
        let mut fragment_path = None;

        for dir in &shader_dirs {
            let vertex_test = format!("{}{}", dir, base_vertex);
            let fragment_test = format!("{}{}", dir, base_fragment);

            if Path::new(&vertex_test).exists() && vertex_path.is_none() {
                vertex_path = Some(vertex_test);
            }
            if Path::new(&fragment_test).exists() && fragment_path.is_none() {
                fragment_path = Some(fragment_test);
            }

            if vertex_path.is_some() && fragment_path.is_some() {
                break;
            }
        }

        Self {
            vertex_shader_path: vertex_path.unwrap_or_else(|| format!("shaders/{}", base_vertex)),
            fragment_shader_path: fragment_path
                .unwrap_or_else(|| format!("shaders/{}", base_fragment)),
        }
    }

    /// Check that both shader files exist on disk
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Path::new(&self.vertex_shader_path).exists() {
            return Err(ConfigError::Parse(format!(
                "vertex shader not found: {}",
                self.vertex_shader_path
            )));
        }
        if !Path::new(&self.fragment_shader_path).exists() {
            return Err(ConfigError::Parse(format!(
                "fragment shader not found: {}",
                self.fragment_shader_path
            )));
        }
        Ok(())
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::with_path_resolution("scene.vert.spv", "scene.frag.spv")
    }
}

/// Renderer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Application name reported to the Vulkan instance
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Shader pair used by the forward pass
    pub shaders: ShaderConfig,
    /// Frames the CPU may record ahead of the GPU
    pub max_frames_in_flight: usize,
    /// Validation layer override; `None` follows the build type
    pub enable_validation: Option<bool>,
    /// Background clear color (RGBA)
    pub clear_color: [f32; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            application_name: "scene3d".to_string(),
            application_version: (0, 1, 0),
            shaders: ShaderConfig::default(),
            max_frames_in_flight: 2,
            enable_validation: None,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Top-level configuration for a [`crate::Universe`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Renderer settings
    pub renderer: RendererConfig,
}

impl Config for UniverseConfig {}

impl UniverseConfig {
    /// Create a configuration with the given window title
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            renderer: RendererConfig {
                application_name: title.clone(),
                ..Default::default()
            },
            window: WindowConfig {
                title,
                ..Default::default()
            },
        }
    }

    /// Set the window dimensions, builder style
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults_match_demo_size() {
        let config = WindowConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert!(config.resizable);
    }

    #[test]
    fn universe_config_toml_round_trip() {
        let config = UniverseConfig::new("round trip").with_window_size(640, 480);
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: UniverseConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.window.title, "round trip");
        assert_eq!(parsed.window.width, 640);
        assert_eq!(parsed.window.height, 480);
        assert_eq!(
            parsed.renderer.max_frames_in_flight,
            config.renderer.max_frames_in_flight
        );
    }

    #[test]
    fn missing_shader_files_fail_validation() {
        let config = ShaderConfig::new("no-such.vert.spv", "no-such.frag.spv");
        assert!(config.validate().is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected_on_save() {
        let config = UniverseConfig::default();
        let err = config.save_to_file("config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = UniverseConfig::load_from_file("does-not-exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
