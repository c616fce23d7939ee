use marquee_core::scan::settings::default_video_file_extensions_vec;
use marquee_core::scan::{SpecialFeatureSettings, VideoPathResolver};
use marquee_model::UserConfiguration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_video_extensions() -> Vec<String> {
    default_video_file_extensions_vec()
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarqueeConfig {
    pub refresh: RefreshConfig,
    /// Policy applied when no per-user configuration is stored.
    pub user: UserConfiguration,
    pub logging: LoggingConfig,
}

impl MarqueeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.refresh.validate()?;
        self.logging.validate()
    }
}

/// Settings for the movie refresh steps.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Which movie subfolders hold special features.
    pub special_features: SpecialFeatureSettings,
    /// File extensions the bundled resolver treats as videos. Defaults
    /// mirror the core's built-in allow-list.
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            special_features: SpecialFeatureSettings::default(),
            video_extensions: default_video_extensions(),
        }
    }
}

impl RefreshConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(position) = self
            .special_features
            .folder_names
            .iter()
            .position(|name| name.trim().is_empty())
        {
            return Err(ConfigError::BlankFolderName { position });
        }
        if self.video_extensions.is_empty() {
            return Err(ConfigError::NoVideoExtensions);
        }
        if let Some(position) = self
            .video_extensions
            .iter()
            .position(|ext| ext.trim().trim_start_matches('.').is_empty())
        {
            return Err(ConfigError::BlankVideoExtension { position });
        }
        Ok(())
    }

    pub fn path_resolver(&self) -> VideoPathResolver {
        VideoPathResolver::with_extensions(self.video_extensions.clone())
    }
}

/// Tracing subscriber settings. `RUST_LOG` takes precedence over
/// `default_directive`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub default_directive: String,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            ansi: true,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_directive.trim().is_empty() {
            return Err(ConfigError::BlankLogDirective);
        }
        Ok(())
    }
}
