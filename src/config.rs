//! TOML configuration file.
//!
//! ```toml
//! [capture]
//! device_id = 0
//! width = 1280
//! height = 720
//!
//! [key]
//! env_var = "OPTICAL_CAPTURE_KEY"
//!
//! [output]
//! image_path = "output/captured_image.png"
//! preview_chars = 80
//! digest_size = 32
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::capture::{CaptureConfig, ConfigError};
use crate::digest::{DEFAULT_DIGEST_SIZE, MAX_DIGEST_SIZE, MIN_DIGEST_SIZE};
use crate::keys::DEFAULT_KEY_ENV;
use crate::proof::{ProofSettings, DEFAULT_IMAGE_PATH};

/// Full configuration file format.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    /// `[capture]`: device and frame parameters.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// `[key]`: where the combine key is read from.
    #[serde(default)]
    pub key: KeyConfig,
    /// `[output]`: image location, preview and digest size.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Key source configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Environment variable holding the base64 key.
    pub env_var: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_KEY_ENV.to_string(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the captured PNG is written.
    pub image_path: PathBuf,
    /// Number of base64 characters shown in the preview line.
    pub preview_chars: usize,
    /// Digest size in bytes.
    pub digest_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            preview_chars: 80,
            digest_size: DEFAULT_DIGEST_SIZE,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section. Command-line overrides are applied before this runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capture.validate()?;
        if self.key.env_var.trim().is_empty() {
            return Err(ConfigError::EmptyKeySource);
        }
        let size = self.output.digest_size;
        if !(MIN_DIGEST_SIZE..=MAX_DIGEST_SIZE).contains(&size) {
            return Err(ConfigError::InvalidDigestSize(size));
        }
        Ok(())
    }

    /// Orchestrator settings described by this file.
    pub fn proof_settings(&self) -> ProofSettings {
        ProofSettings {
            image_path: self.output.image_path.clone(),
            key_env: self.key.env_var.clone(),
            digest_size: self.output.digest_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.key.env_var, DEFAULT_KEY_ENV);
        assert_eq!(config.output.image_path, PathBuf::from(DEFAULT_IMAGE_PATH));
        assert_eq!(config.output.digest_size, 32);
        assert_eq!(config.capture.width, 640);
    }

    #[test]
    fn test_partial_sections() {
        let config = FileConfig::from_toml(
            r#"
            [capture]
            width = 1280
            height = 720
            grayscale = true

            [key]
            env_var = "CAMERA_PROOF_KEY"

            [output]
            image_path = "frames/latest.png"
            "#,
        )
        .unwrap();

        assert_eq!(config.capture.width, 1280);
        assert!(config.capture.grayscale);
        assert_eq!(config.capture.fps, 30);
        assert_eq!(config.output.preview_chars, 80);

        let settings = config.proof_settings();
        assert_eq!(settings.key_env, "CAMERA_PROOF_KEY");
        assert_eq!(settings.image_path, PathBuf::from("frames/latest.png"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            FileConfig::from_toml("[output]\ndigest_size = 65\n"),
            Err(ConfigError::InvalidDigestSize(65))
        ));
        assert!(matches!(
            FileConfig::from_toml("[key]\nenv_var = \"  \"\n"),
            Err(ConfigError::EmptyKeySource)
        ));
        assert!(matches!(
            FileConfig::from_toml("[capture]\nwidth = 0\n"),
            Err(ConfigError::InvalidDimensions)
        ));
        assert!(matches!(
            FileConfig::from_toml("capture = 3"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileConfig::from_file(dir.path().join("absent.toml")),
            Err(ConfigError::FileReadError(_))
        ));
    }
}
