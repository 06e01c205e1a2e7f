//! Conversion configuration.
//!
//! Defaults for the CLI (and any embedding application) come from an
//! optional `imgnorm.toml`. Stock defaults are overridden key by key by the
//! user file.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [conversion]
//! background = "#ffffff"    # Fill for transparent pixels (#rrggbb, #rgb, white, black)
//! quality = 90              # JPEG quality (1-100)
//! # temp_dir = "/tmp"       # Where byte-path conversions stage files (default: system temp)
//!
//! [resize]
//! deformation_tolerance = 100.0  # Max aspect-ratio change for exact resizes
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Background, DEFAULT_DEFORMATION_TOLERANCE, FormatConverter, Quality, RustCodec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "imgnorm.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `imgnorm.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeConfig {
    /// Format conversion defaults.
    pub conversion: ConversionConfig,
    /// Resize defaults.
    pub resize: ResizeConfig,
}

impl NormalizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.conversion.quality) {
            return Err(ConfigError::Validation(
                "conversion.quality must be 1-100".into(),
            ));
        }
        self.conversion.background()?;
        let tolerance = self.resize.deformation_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Validation(
                "resize.deformation_tolerance must be a finite, non-negative number".into(),
            ));
        }
        Ok(())
    }
}

/// Format conversion defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Background used to flatten transparency.
    pub background: String,
    /// JPEG encode quality.
    pub quality: u32,
    /// Directory for temporary files; system temp when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            background: Background::default().to_string(),
            quality: Quality::default().value(),
            temp_dir: None,
        }
    }
}

impl ConversionConfig {
    pub fn background(&self) -> Result<Background, ConfigError> {
        self.background
            .parse()
            .map_err(|e| ConfigError::Validation(format!("conversion.background: {e}")))
    }

    /// Build a converter honoring quality and temp dir.
    pub fn converter(&self) -> FormatConverter<RustCodec> {
        let converter = FormatConverter::new().quality(Quality::new(self.quality));
        match &self.temp_dir {
            Some(dir) => converter.temp_dir(dir),
            None => converter,
        }
    }
}

/// Resize defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Tolerance for exact-size resizes.
    pub deformation_tolerance: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            deformation_tolerance: DEFAULT_DEFORMATION_TOLERANCE,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(NormalizeConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<NormalizeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: NormalizeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when absent.
pub fn load_config(path: &Path) -> Result<NormalizeConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `imgnorm.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgnorm configuration
# =====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

[conversion]
# Color that replaces transparent pixels when converting bytes or base64.
# Accepts #rrggbb, #rgb, "white" or "black".
background = "#ffffff"

# JPEG encode quality (1-100). Other formats are lossless.
quality = 90

# Directory for temporary files used during conversion.
# Defaults to the system temp directory.
# temp_dir = "/tmp"

[resize]
# Maximum relative aspect-ratio change accepted by exact-size resizes.
# 0 rejects any narrowing; 100 accepts practically everything.
deformation_tolerance = 100.0
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = NormalizeConfig::default();
        assert_eq!(config.conversion.background, "#ffffff");
        assert_eq!(config.conversion.quality, 90);
        assert_eq!(config.conversion.temp_dir, None);
        assert_eq!(config.resize.deformation_tolerance, 100.0);
    }

    #[test]
    fn stock_toml_matches_defaults() {
        let parsed: NormalizeConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = NormalizeConfig::default();
        assert_eq!(parsed.conversion.background, defaults.conversion.background);
        assert_eq!(parsed.conversion.quality, defaults.conversion.quality);
        assert_eq!(
            parsed.resize.deformation_tolerance,
            defaults.resize.deformation_tolerance
        );
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[conversion]
background = "#000"
"##;
        let config: NormalizeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.conversion.background().unwrap(), Background::BLACK);
        assert_eq!(config.conversion.quality, 90);
        assert_eq!(config.resize.deformation_tolerance, 100.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<NormalizeConfig, _> = toml::from_str("[conversion]\nqualty = 80\n");
        assert!(result.is_err());
    }

    #[test]
    fn merge_overlays_nested_keys() {
        let overlay: toml::Value = toml::from_str("[resize]\ndeformation_tolerance = 0.2\n").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.resize.deformation_tolerance, 0.2);
        assert_eq!(config.conversion.quality, 90);
    }

    #[test]
    fn validate_rejects_out_of_range_quality() {
        let mut config = NormalizeConfig::default();
        config.conversion.quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.conversion.quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_bad_background() {
        let mut config = NormalizeConfig::default();
        config.conversion.background = "teal".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_negative_tolerance() {
        let mut config = NormalizeConfig::default();
        config.resize.deformation_tolerance = -0.1;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.resize.deformation_tolerance = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.conversion.quality, 90);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r##"
[conversion]
quality = 75
temp_dir = "/var/tmp"
"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.conversion.quality, 75);
        assert_eq!(config.conversion.temp_dir, Some(PathBuf::from("/var/tmp")));
        assert_eq!(config.conversion.background, "#ffffff");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "this is not toml = = =").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[conversion]\nquality = 500\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn converter_uses_configured_temp_dir() {
        let tmp = TempDir::new().unwrap();
        let config = ConversionConfig {
            temp_dir: Some(tmp.path().to_path_buf()),
            ..ConversionConfig::default()
        };
        let converter = config.converter();
        let png = crate::test_helpers::encoded(
            &crate::test_helpers::gradient_rgb(4, 4),
            crate::imaging::ImageFormat::Png,
        );
        converter
            .convert_bytes(&png, Background::WHITE, crate::imaging::ImageFormat::Gif)
            .unwrap();
        assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
    }
}
