//! Trainer configuration via TOML files.
//!
//! Parsing is defaults-first: a missing section or key falls back to the
//! documented default, and out-of-range values fall back rather than
//! failing the whole file.

use std::fs;
use std::path::Path;

use serde::Serialize;
use toml::Value;

/// Damping-control settings for the Levenberg-Marquardt trainer.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MarquardtConfig {
    /// Damping factor before the first iteration.
    pub initial_lambda: f64,
    /// Factor applied on every rejection (multiply) and acceptance (divide).
    pub scale_lambda: f64,
    /// Damping ceiling; an iteration gives up once lambda would exceed it.
    pub lambda_max: f64,
    /// Hessian-engine worker blocks; 0 means one per available core.
    pub threads: usize,
}

impl MarquardtConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let value: Value =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let table = value
            .get("marquardt")
            .and_then(|v| v.as_table())
            .cloned()
            .unwrap_or_default();

        let initial_lambda = table
            .get("initial_lambda")
            .and_then(|v| v.as_float())
            .filter(|v| *v > 0.0)
            .unwrap_or(0.1);

        let scale_lambda = table
            .get("scale_lambda")
            .and_then(|v| v.as_float())
            .filter(|v| *v > 1.0)
            .unwrap_or(10.0);

        let lambda_max = table
            .get("lambda_max")
            .and_then(|v| v.as_float())
            .filter(|v| *v > 0.0)
            .unwrap_or(1e25);

        let threads = table
            .get("threads")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(0) as usize)
            .unwrap_or(0);

        Ok(Self {
            initial_lambda,
            scale_lambda,
            lambda_max,
            threads,
        })
    }
}

impl Default for MarquardtConfig {
    fn default() -> Self {
        Self {
            initial_lambda: 0.1,
            scale_lambda: 10.0,
            lambda_max: 1e25,
            threads: 0,
        }
    }
}

/// Stopping rules for the outer training driver.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SessionConfig {
    /// Hard cap on outer iterations.
    pub max_iterations: usize,
    /// Stop once the reported error drops to this value or below.
    pub target_error: f64,
}

impl SessionConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let value: Value =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let table = value
            .get("session")
            .and_then(|v| v.as_table())
            .cloned()
            .unwrap_or_default();

        let max_iterations = table
            .get("max_iterations")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as usize)
            .unwrap_or(500);

        let target_error = table
            .get("target_error")
            .and_then(|v| v.as_float())
            .filter(|v| *v >= 0.0)
            .unwrap_or(0.01);

        Ok(Self {
            max_iterations,
            target_error,
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            target_error: 0.01,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {err}"),
            ConfigError::Parse(err) => write!(f, "Parse error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marquardt_config_defaults_when_section_missing() {
        let config = MarquardtConfig::from_str("[session]\nmax_iterations = 3").unwrap();
        assert_eq!(config.initial_lambda, 0.1);
        assert_eq!(config.scale_lambda, 10.0);
        assert_eq!(config.lambda_max, 1e25);
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn marquardt_config_parses_custom_values() {
        let toml = "[marquardt]\ninitial_lambda = 0.5\nscale_lambda = 5.0\nlambda_max = 1e10\nthreads = 4";
        let config = MarquardtConfig::from_str(toml).unwrap();
        assert_eq!(config.initial_lambda, 0.5);
        assert_eq!(config.scale_lambda, 5.0);
        assert_eq!(config.lambda_max, 1e10);
        assert_eq!(config.threads, 4);
    }

    #[test]
    fn out_of_range_values_fall_back_to_defaults() {
        let toml = "[marquardt]\ninitial_lambda = -1.0\nscale_lambda = 0.5\nthreads = -2";
        let config = MarquardtConfig::from_str(toml).unwrap();
        assert_eq!(config.initial_lambda, 0.1);
        assert_eq!(config.scale_lambda, 10.0);
        assert_eq!(config.threads, 0);
    }

    #[test]
    fn session_config_parses_custom_values() {
        let toml = "[session]\nmax_iterations = 50\ntarget_error = 0.001";
        let config = SessionConfig::from_str(toml).unwrap();
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.target_error, 0.001);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let result = MarquardtConfig::from_str("not [ valid toml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
