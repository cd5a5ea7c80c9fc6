//! Main application configuration
//!
//! This module defines the top-level configuration for the kart-rating tool,
//! including environment variable loading, TOML file loading and validation.

use crate::config::rating::{MissingResultPolicy, RatingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "kart-rating".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(tau) = env::var("RATING_TAU") {
            self.rating.tau = tau
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_TAU value: {}", tau))?;
        }
        if let Ok(tolerance) = env::var("RATING_CONVERGENCE_TOLERANCE") {
            self.rating.convergence_tolerance = tolerance.parse().map_err(|_| {
                anyhow!("Invalid RATING_CONVERGENCE_TOLERANCE value: {}", tolerance)
            })?;
        }
        if let Ok(rating) = env::var("RATING_INITIAL_RATING") {
            self.rating.initial_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_INITIAL_RATING value: {}", rating))?;
        }
        if let Ok(deviation) = env::var("RATING_INITIAL_DEVIATION") {
            self.rating.initial_deviation = deviation
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_INITIAL_DEVIATION value: {}", deviation))?;
        }
        if let Ok(volatility) = env::var("RATING_INITIAL_VOLATILITY") {
            self.rating.initial_volatility = volatility.parse().map_err(|_| {
                anyhow!("Invalid RATING_INITIAL_VOLATILITY value: {}", volatility)
            })?;
        }
        if let Ok(worst_rank) = env::var("RATING_WORST_RANK") {
            self.rating.worst_rank = worst_rank
                .parse()
                .map_err(|_| anyhow!("Invalid RATING_WORST_RANK value: {}", worst_rank))?;
        }
        if let Ok(policy) = env::var("RATING_MISSING_RESULT_POLICY") {
            self.rating.missing_result_policy = policy.parse::<MissingResultPolicy>()?;
        }
        if let Ok(threshold) = env::var("PROVISIONAL_RACE_THRESHOLD") {
            self.rating.provisional_race_threshold = threshold.parse().map_err(|_| {
                anyhow!("Invalid PROVISIONAL_RACE_THRESHOLD value: {}", threshold)
            })?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()
}
