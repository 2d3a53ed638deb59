//! Configuration for schema translation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (odm.toml)
//! - Environment variables (ODM__*)
//!
//! ## Example config file (odm.toml):
//! ```toml
//! [translate]
//! annotation_key = "mongoose"
//! required_policy = "leaves_only"
//! max_depth = 64
//!
//! [export]
//! output_format = "pretty"
//! include_checksums = true
//! include_manifest = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::parse::{DEFAULT_ANNOTATION_KEY, DEFAULT_MAX_DEPTH};
use crate::translate::{RequiredPolicy, Translator, TranslatorOptions};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OdmConfig {
    /// Translation settings
    #[serde(default)]
    pub translate: TranslateConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Translation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Key of the annotation bag in source schemas
    #[serde(default = "default_annotation_key")]
    pub annotation_key: String,

    /// Which fields may be marked required
    #[serde(default)]
    pub required_policy: RequiredPolicy,

    /// Maximum nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Write checksums.sha256
    #[serde(default = "default_true")]
    pub include_checksums: bool,

    /// Write manifest.json
    #[serde(default = "default_true")]
    pub include_manifest: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    pub fn render<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

fn default_annotation_key() -> String {
    DEFAULT_ANNOTATION_KEY.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            annotation_key: default_annotation_key(),
            required_policy: RequiredPolicy::default(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pretty,
            include_checksums: true,
            include_manifest: true,
        }
    }
}

impl TranslateConfig {
    pub fn to_options(&self) -> TranslatorOptions {
        TranslatorOptions {
            annotation_key: self.annotation_key.clone(),
            required_policy: self.required_policy,
            max_depth: self.max_depth,
        }
    }
}

impl OdmConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in ["odm.toml", ".odm.toml", "config/odm.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "odm-schemas") {
            let xdg_config = config_dir.config_dir().join("odm.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // ODM__TRANSLATE__MAX_DEPTH=32
        builder = builder.add_source(
            Environment::with_prefix("ODM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Translator built from the `[translate]` section
    pub fn translator(&self) -> Translator {
        Translator::new(self.translate.to_options())
    }
}
