use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub offers: OfferSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub seed: SeedSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct OfferSettings {
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,
}

impl Default for OfferSettings {
    fn default() -> Self {
        Self {
            expiry_minutes: default_expiry_minutes(),
        }
    }
}

fn default_expiry_minutes() -> i64 { crate::core::DEFAULT_OFFER_DURATION_MINUTES }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_blood_type_weight")]
    pub blood_type: f64,
    #[serde(default = "default_hla_weight")]
    pub hla: f64,
    #[serde(default = "default_cpra_weight")]
    pub cpra: f64,
    #[serde(default = "default_wait_time_weight")]
    pub wait_time: f64,
    #[serde(default = "default_age_weight")]
    pub age: f64,
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_quality_weight")]
    pub quality: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            blood_type: default_blood_type_weight(),
            hla: default_hla_weight(),
            cpra: default_cpra_weight(),
            wait_time: default_wait_time_weight(),
            age: default_age_weight(),
            distance: default_distance_weight(),
            quality: default_quality_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            blood_type: config.blood_type,
            hla: config.hla,
            cpra: config.cpra,
            wait_time: config.wait_time,
            age: config.age,
            distance: config.distance,
            quality: config.quality,
        }
    }
}

fn default_blood_type_weight() -> f64 { 0.25 }
fn default_hla_weight() -> f64 { 0.20 }
fn default_cpra_weight() -> f64 { 0.15 }
fn default_wait_time_weight() -> f64 { 0.15 }
fn default_age_weight() -> f64 { 0.10 }
fn default_distance_weight() -> f64 { 0.10 }
fn default_quality_weight() -> f64 { 0.05 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

pub const DEV_JWT_SECRET: &str = "kidney-match-dev-secret";

fn default_jwt_secret() -> String { DEV_JWT_SECRET.to_string() }
fn default_token_ttl_minutes() -> i64 { 480 }

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with KIDNEY_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., KIDNEY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("KIDNEY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("KIDNEY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Apply well-known unprefixed environment variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.blood_type, 0.25);
        assert_eq!(weights.hla, 0.20);
        assert_eq!(weights.cpra, 0.15);
        assert_eq!(weights.wait_time, 0.15);
        assert_eq!(weights.age, 0.10);
        assert_eq!(weights.distance, 0.10);
        assert_eq!(weights.quality, 0.05);
        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.offers.expiry_minutes, 60);
        assert_eq!(settings.server.port, 8080);
        assert!(settings.seed.enabled);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("kidney-match-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[offers]\nexpiry_minutes = 15\n\n[scoring.weights]\nhla = 0.25\nquality = 0.0\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.offers.expiry_minutes, 15);
        assert_eq!(settings.scoring.weights.hla, 0.25);
        assert!(settings.scoring_weights().validate().is_ok());
    }
}
