use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::debug;

use crate::models::MarqueeConfig;

/// Env var naming a TOML or JSON config file.
pub const CONFIG_PATH_ENV: &str = "MARQUEE_CONFIG_PATH";
/// Env var holding the whole config as inline JSON.
pub const CONFIG_JSON_ENV: &str = "MARQUEE_CONFIG_JSON";

const CANDIDATES: &[&str] =
    &["marquee.toml", "marquee.json", "config/marquee.toml"];

/// Source that produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// A validated configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: MarqueeConfig,
    pub source: ConfigSource,
}

impl MarqueeConfig {
    /// Load configuration using environment variables.
    /// Evaluation order:
    /// 1) `$MARQUEE_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$MARQUEE_CONFIG_JSON` (inline JSON),
    /// 3) the first existing default file in the working directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<ConfigLoad> {
        Self::load_from_vars(|key| env::var(key).ok(), Path::new("."))
    }

    /// Same as [`MarqueeConfig::load_from_env`] with an explicit variable
    /// lookup and directory to search for default files.
    pub fn load_from_vars(
        lookup: impl Fn(&str) -> Option<String>,
        search_root: &Path,
    ) -> anyhow::Result<ConfigLoad> {
        let (config, source) = Self::resolve(lookup, search_root)?;
        config
            .validate()
            .with_context(|| format!("invalid configuration from {source:?}"))?;
        debug!(target: "config", ?source, "configuration loaded");
        Ok(ConfigLoad { config, source })
    }

    fn resolve(
        lookup: impl Fn(&str) -> Option<String>,
        search_root: &Path,
    ) -> anyhow::Result<(Self, ConfigSource)> {
        if let Some(path_str) = lookup(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(search_root) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid config {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!("invalid config {}: {}", path.display(), err)
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // Extension unknown: marquee.toml is the documented format, JSON is
        // what MARQUEE_CONFIG_JSON carries.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "config {origin} is neither TOML nor JSON \
                     (toml error: {toml_err}; json error: {json_err})"
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid config json: {err}"))
    }

    fn find_default_file(search_root: &Path) -> Option<PathBuf> {
        CANDIDATES
            .iter()
            .map(|candidate| search_root.join(candidate))
            .find(|path| path.exists())
    }
}
