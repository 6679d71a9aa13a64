//! Layout tunables with `IDXD_*` environment overrides.

use thiserror::Error;

use crate::layout::{FlowLayout, MasonryPacker, DEFAULT_CACHE_ENTRIES, FALLBACK_ASPECT_RATIO};

pub const DEFAULT_ROW_HEIGHT: f64 = 220.0;

pub const ENV_ROW_HEIGHT: &str = "IDXD_ROW_HEIGHT";
pub const ENV_ROW_GAP: &str = "IDXD_ROW_GAP";
pub const ENV_JUSTIFY_LAST_ROW: &str = "IDXD_JUSTIFY_LAST_ROW";
pub const ENV_CACHE_ENTRIES: &str = "IDXD_LAYOUT_CACHE_ENTRIES";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("row height must be a positive finite number, got {0}")]
    RowHeight(f64),
    #[error("fallback aspect ratio must be a positive finite number, got {0}")]
    FallbackRatio(f64),
    #[error("gap must be a non-negative finite number, got {0}")]
    Gap(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Fixed grid row height in CSS-like pixels.
    pub row_height: f64,
    /// Ratio assumed for items that have not been measured.
    pub fallback_aspect_ratio: f64,
    /// Horizontal gap between grid cells.
    pub gap: f64,
    pub justify_last_row: bool,
    /// Row-break cache size; 0 disables caching.
    pub cache_entries: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            fallback_aspect_ratio: FALLBACK_ASPECT_RATIO,
            gap: 0.0,
            justify_last_row: false,
            cache_entries: DEFAULT_CACHE_ENTRIES,
        }
    }
}

impl LayoutConfig {
    /// Defaults overridden by any `IDXD_*` variables set in the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_env_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_ROW_HEIGHT) {
            config.row_height = parse_env(ENV_ROW_HEIGHT, &v)?;
        }
        if let Some(v) = lookup(ENV_ROW_GAP) {
            config.gap = parse_env(ENV_ROW_GAP, &v)?;
        }
        if let Some(v) = lookup(ENV_JUSTIFY_LAST_ROW) {
            config.justify_last_row = parse_flag(ENV_JUSTIFY_LAST_ROW, &v)?;
        }
        if let Some(v) = lookup(ENV_CACHE_ENTRIES) {
            config.cache_entries = parse_env(ENV_CACHE_ENTRIES, &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(ConfigError::RowHeight(self.row_height));
        }
        if !(self.fallback_aspect_ratio.is_finite() && self.fallback_aspect_ratio > 0.0) {
            return Err(ConfigError::FallbackRatio(self.fallback_aspect_ratio));
        }
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(ConfigError::Gap(self.gap));
        }
        Ok(())
    }

    pub fn packer(&self) -> MasonryPacker {
        MasonryPacker {
            row_height: self.row_height,
            fallback_ratio: self.fallback_aspect_ratio,
        }
    }

    pub fn flow_layout(&self) -> FlowLayout {
        FlowLayout::new(self.packer(), self.gap, self.justify_last_row)
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::from_env_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LayoutConfig::default());
        assert_eq!(config.row_height, 220.0);
        assert_eq!(config.fallback_aspect_ratio, 1.5);
        assert_eq!(config.cache_entries, 8);
    }

    #[test]
    fn test_env_overrides() {
        let config = LayoutConfig::from_env_lookup(lookup(&[
            (ENV_ROW_HEIGHT, "180"),
            (ENV_ROW_GAP, " 4.5 "),
            (ENV_JUSTIFY_LAST_ROW, "Yes"),
            (ENV_CACHE_ENTRIES, "0"),
        ]))
        .unwrap();
        assert_eq!(config.row_height, 180.0);
        assert_eq!(config.gap, 4.5);
        assert!(config.justify_last_row);
        assert_eq!(config.cache_entries, 0);

        let flow = config.flow_layout();
        assert_eq!(flow.row_height(), 180.0);
        assert_eq!(flow.gap, 4.5);
    }

    #[test]
    fn test_invalid_env_value() {
        let err = LayoutConfig::from_env_lookup(lookup(&[(ENV_ROW_HEIGHT, "tall")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnv {
                name: ENV_ROW_HEIGHT,
                value: "tall".to_string()
            }
        );
        assert!(LayoutConfig::from_env_lookup(lookup(&[(ENV_JUSTIFY_LAST_ROW, "maybe")])).is_err());
        assert!(LayoutConfig::from_env_lookup(lookup(&[(ENV_CACHE_ENTRIES, "-1")])).is_err());
    }

    #[test]
    fn test_validation() {
        let bad_height = LayoutConfig::from_env_lookup(lookup(&[(ENV_ROW_HEIGHT, "0")]));
        assert_eq!(bad_height, Err(ConfigError::RowHeight(0.0)));

        let config = LayoutConfig {
            row_height: f64::NAN,
            ..LayoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::RowHeight(_))));

        let config = LayoutConfig {
            fallback_aspect_ratio: -1.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FallbackRatio(-1.0)));

        let config = LayoutConfig {
            gap: -2.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Gap(-2.0)));
    }
}
