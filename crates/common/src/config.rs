//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frame rounding policy used when deriving frame indices from timecodes.
    pub rounding: RoundingPolicy,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Tie-break rule for `x.5` values when rounding timecodes to frames.
///
/// Both families occur in host applications; the policy must be fixed for
/// the duration of an operation so that every frame derivation agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// `0.5 -> 1`, `1.5 -> 2`, `-0.5 -> -1`.
    #[default]
    HalfAwayFromZero,
    /// Banker's rounding: `0.5 -> 0`, `1.5 -> 2`, `2.5 -> 2`.
    HalfToEven,
}

impl RoundingPolicy {
    /// Round a continuous value to the nearest integer under this policy.
    pub fn round(self, value: f64) -> i64 {
        match self {
            RoundingPolicy::HalfAwayFromZero => value.round() as i64,
            RoundingPolicy::HalfToEven => {
                let floor = value.floor();
                let fract = value - floor;
                if (fract - 0.5).abs() < f64::EPSILON {
                    let low = floor as i64;
                    if low % 2 == 0 {
                        low
                    } else {
                        low + 1
                    }
                } else {
                    value.round() as i64
                }
            }
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "keyforge=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("keyforge").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_away_from_zero() {
        let p = RoundingPolicy::HalfAwayFromZero;
        assert_eq!(p.round(0.5), 1);
        assert_eq!(p.round(1.5), 2);
        assert_eq!(p.round(2.5), 3);
        assert_eq!(p.round(2.4), 2);
        assert_eq!(p.round(-0.5), -1);
    }

    #[test]
    fn test_half_to_even() {
        let p = RoundingPolicy::HalfToEven;
        assert_eq!(p.round(0.5), 0);
        assert_eq!(p.round(1.5), 2);
        assert_eq!(p.round(2.5), 2);
        assert_eq!(p.round(3.5), 4);
        assert_eq!(p.round(2.4), 2);
        assert_eq!(p.round(2.6), 3);
    }

    #[test]
    fn test_policies_agree_off_the_boundary() {
        for v in [0.0, 0.25, 1.75, 10.1, 59.9] {
            assert_eq!(
                RoundingPolicy::HalfAwayFromZero.round(v),
                RoundingPolicy::HalfToEven.round(v)
            );
        }
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig {
            rounding: RoundingPolicy::HalfToEven,
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: true,
                file: None,
            },
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rounding, RoundingPolicy::HalfToEven);
        assert_eq!(parsed.logging.level, "debug");
    }
}
