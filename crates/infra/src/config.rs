//! Engine configuration loaded from the environment.

use thiserror::Error;

use stoneyard_measure::{parse_measure, DEFAULT_DENSITY};

pub const DENSITY_VAR: &str = "STONEYARD_STONE_DENSITY";
pub const POLISHING_RATE_VAR: &str = "STONEYARD_POLISHING_RATE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}='{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Stone density in t/m³ for weight estimates.
    pub density: f64,
    /// Default workers' polishing pay per square foot.
    pub polishing_rate: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            polishing_rate: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`], but logs and falls back to defaults
    /// on invalid values.
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid engine configuration; using defaults");
            Self::default()
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DENSITY_VAR) {
            let density = parse_var(DENSITY_VAR, &raw)?;
            if density == 0.0 {
                return Err(ConfigError::Invalid {
                    var: DENSITY_VAR,
                    value: raw,
                    reason: "density must be greater than zero".to_string(),
                });
            }
            config.density = density;
        } else {
            tracing::debug!(default = DEFAULT_DENSITY, "{} not set", DENSITY_VAR);
        }

        if let Some(raw) = lookup(POLISHING_RATE_VAR) {
            config.polishing_rate = Some(parse_var(POLISHING_RATE_VAR, &raw)?);
        }

        Ok(config)
    }
}

fn parse_var(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    parse_measure(raw).map_err(|e| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
