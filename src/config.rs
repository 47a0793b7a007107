//! Service configuration read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::pricing::{EngineSettings, OverridePolicy, DEFAULT_MAX_SCHEDULE_DAYS};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Which placeholder forecaster feeds schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemandSourceKind {
    #[default]
    Uniform,
    Seasonal,
}

impl FromStr for DemandSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "seasonal" => Ok(Self::Seasonal),
            other => Err(other.to_string()),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON catalog file; the demo catalog is used when unset
    pub catalog_path: Option<String>,
    pub demand_source: DemandSourceKind,
    pub override_policy: OverridePolicy,
    pub max_schedule_days: u32,
    pub schedule_cache_ttl_secs: u64,
    pub schedule_cache_capacity: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            catalog_path: None,
            demand_source: DemandSourceKind::Uniform,
            override_policy: OverridePolicy::default(),
            max_schedule_days: DEFAULT_MAX_SCHEDULE_DAYS,
            schedule_cache_ttl_secs: 300,
            schedule_cache_capacity: 1_000,
        }
    }
}

/// Parse an optional variable, keeping `default` when it is unset
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup, validating every value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORT", defaults.port)?;
        let catalog_path = lookup("CATALOG_PATH").filter(|p| !p.trim().is_empty());
        let demand_source = parse_var(&lookup, "DEMAND_SOURCE", defaults.demand_source)?;

        let override_policy = OverridePolicy {
            probability: parse_var::<Decimal>(
                &lookup,
                "OVERRIDE_PROBABILITY",
                defaults.override_policy.probability,
            )?,
            min_adjustment: parse_var::<Decimal>(
                &lookup,
                "OVERRIDE_MIN_ADJUSTMENT",
                defaults.override_policy.min_adjustment,
            )?,
            max_adjustment: parse_var::<Decimal>(
                &lookup,
                "OVERRIDE_MAX_ADJUSTMENT",
                defaults.override_policy.max_adjustment,
            )?,
            ..defaults.override_policy
        };
        override_policy
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        let max_schedule_days = parse_var(&lookup, "MAX_SCHEDULE_DAYS", defaults.max_schedule_days)?;
        if max_schedule_days == 0 {
            return Err(ConfigError::Validation(
                "MAX_SCHEDULE_DAYS must be greater than 0".to_string(),
            ));
        }

        let schedule_cache_ttl_secs = parse_var(
            &lookup,
            "SCHEDULE_CACHE_TTL_SECS",
            defaults.schedule_cache_ttl_secs,
        )?;
        let schedule_cache_capacity = parse_var(
            &lookup,
            "SCHEDULE_CACHE_CAPACITY",
            defaults.schedule_cache_capacity,
        )?;

        Ok(Self {
            host,
            port,
            catalog_path,
            demand_source,
            override_policy,
            max_schedule_days,
            schedule_cache_ttl_secs,
            schedule_cache_capacity,
        })
    }

    /// Address to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn schedule_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.schedule_cache_ttl_secs)
    }

    /// Engine settings with the configured override policy and limits
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            override_policy: self.override_policy.clone(),
            max_schedule_days: self.max_schedule_days,
            ..EngineSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.demand_source, DemandSourceKind::Uniform);
        assert_eq!(config.override_policy, OverridePolicy::default());
        assert_eq!(config.max_schedule_days, 366);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("DEMAND_SOURCE", "Seasonal"),
            ("OVERRIDE_PROBABILITY", "0.25"),
            ("OVERRIDE_MAX_ADJUSTMENT", "0.05"),
            ("CATALOG_PATH", "/etc/hotels.json"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.demand_source, DemandSourceKind::Seasonal);
        assert_eq!(config.override_policy.probability, dec!(0.25));
        assert_eq!(config.override_policy.max_adjustment, dec!(0.05));
        assert_eq!(config.catalog_path.as_deref(), Some("/etc/hotels.json"));

        let settings = config.engine_settings();
        assert_eq!(settings.override_policy.probability, dec!(0.25));
    }

    #[test]
    fn test_rejects_unparseable_values() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        assert!(AppConfig::from_lookup(lookup(&[("DEMAND_SOURCE", "prophet")])).is_err());
    }

    #[test]
    fn test_rejects_invalid_override_policy() {
        let result = AppConfig::from_lookup(lookup(&[("OVERRIDE_PROBABILITY", "1.5")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_rejects_zero_schedule_limit() {
        let result = AppConfig::from_lookup(lookup(&[("MAX_SCHEDULE_DAYS", "0")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
