//! Configuration loading.
//!
//! Search order:
//! 1. Explicit path if provided
//! 2. `clinmap.toml` in the working directory
//! 3. Built-in defaults

use crate::error::{Error, Result};
use crate::reference::ReferenceImage;
use crate::svg::RenderOptions;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "clinmap.toml";

/// Size of the editing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub container_width: f64,
    pub container_height: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            container_width: 800.0,
            container_height: 600.0,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: RenderOptions,
    pub reference: Option<ReferenceImage>,
    pub editor: EditorSettings,
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas.width", self.canvas.width),
            ("canvas.height", self.canvas.height),
            ("editor.container_width", self.editor.container_width),
            ("editor.container_height", self.editor.container_height),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{} must be positive, got {}", key, value)));
            }
        }

        let padding = self.canvas.padding;
        if !(padding.is_finite() && padding >= 0.0) {
            return Err(Error::Config(format!(
                "canvas.padding must not be negative, got {}",
                padding
            )));
        }
        if 2.0 * padding >= self.canvas.width.min(self.canvas.height) {
            return Err(Error::Config(format!(
                "canvas.padding {} leaves no drawing area",
                padding
            )));
        }

        Ok(())
    }
}

/// Find and load configuration
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but cannot be read
/// - A config file exists but cannot be parsed or fails validation
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG_FILE);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "missing configuration file: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)?;
    AppConfig::from_toml(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.canvas.width, 500.0);
        assert_eq!(config.canvas.usable_size(), (480.0, 330.0));
        assert!(config.reference.is_none());
    }

    #[test]
    fn test_full_document() {
        let config = AppConfig::from_toml(
            r#"
[canvas]
width = 600
height = 400
padding = 20

[reference]
path = "assets/reference.png"

[editor]
container_width = 1024
"#,
        )
        .unwrap();

        assert_eq!(config.canvas.usable_size(), (560.0, 360.0));
        let reference = config.reference.unwrap();
        assert_eq!(reference.path, Path::new("assets/reference.png"));
        assert_eq!(reference.alt, crate::reference::DEFAULT_ALT);
        assert_eq!(config.editor.container_width, 1024.0);
        assert_eq!(config.editor.container_height, 600.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_toml("[canvas]\nwidth = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[canvas]\npadding = 200"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[canvas\nwidth = 1"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[canvas]\nheight = 250").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.canvas.height, 250.0);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = load_config(Some("/no/such/clinmap.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
