use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    magic::ENV_CONFIG_PATH,
    utils::error::{CodecError, CodecResult},
};

/// How list fragments record the type of their elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListElementPolicy {
    /// Write `type="list"` and let every element carry its own type. Lists may mix kinds.
    #[default]
    Infer,

    /// Write `type="list<element>"` and refuse to encode lists mixing kinds.
    Homogeneous,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub elements: ListElementPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlConfig {
    /// Indentation width when rendering documents as XML. `None` renders on one line.
    pub indent: Option<usize>,

    /// Emit an `<?xml ...?>` declaration before the root element.
    pub declaration: bool,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            indent: None,
            declaration: true,
        }
    }
}

/// Codec configuration, usually read from `codec.toml`.
///
/// ```toml
/// [lists]
/// elements = "homogeneous"
///
/// [xml]
/// indent = 2
/// declaration = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub lists: ListConfig,
    pub xml: XmlConfig,
}

impl CodecConfig {
    /// Get the default path to the codec configuration file.
    pub fn default_path() -> PathBuf {
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push("progser");
        path.push("codec.toml");
        path
    }

    /// Load the configuration from [`CodecConfig::default_path`], falling back to the
    /// defaults when no file exists there.
    pub fn load() -> CodecResult<Self> {
        let path = Self::default_path();
        if !path.exists() {
            debug!(
                "No codec configuration at `{}`, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_toml(&path)
    }

    pub fn load_from_toml(path: &Path) -> CodecResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&toml_str).map_err(|e| match e {
            CodecError::ConfigParse { source, .. } => CodecError::ConfigParse {
                source,
                file: path.display().to_string(),
            },
            other => other,
        })?;
        debug!("Loaded codec configuration from `{}`", path.display());
        Ok(config)
    }

    pub fn from_toml_str(toml_str: &str) -> CodecResult<Self> {
        toml::from_str(toml_str).map_err(|e| CodecError::ConfigParse {
            source: e,
            file: "<inline>".to_string(),
        })
    }

    pub fn save_to_toml(&self, path: &Path) -> CodecResult<()> {
        let toml_str = toml::to_string(self).map_err(|e| {
            CodecError::Io(std::io::Error::other(format!(
                "Failed during serialization of TOML to path `{}`: {}",
                path.display(),
                e
            )))
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml_str)?;
        Ok(())
    }
}
