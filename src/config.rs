use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::models::{CenterPolicy, EstimatorConfig, RadiusPolicy, RankingOptions};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub overpass: OverpassSettings,
    #[serde(default)]
    pub estimator: EstimatorSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
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
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl GeocoderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_geocoder_endpoint() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { "meetup-finder/1.0".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_suggestion_limit() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassSettings {
    #[serde(default = "default_overpass_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OverpassSettings {
    fn default() -> Self {
        Self {
            endpoint: default_overpass_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OverpassSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_overpass_endpoint() -> String { "https://overpass-api.de/api/interpreter".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct EstimatorSettings {
    #[serde(default)]
    pub policy: CenterPolicy,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_distance_floor")]
    pub distance_floor: f64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            policy: CenterPolicy::default(),
            iterations: default_iterations(),
            distance_floor: default_distance_floor(),
        }
    }
}

impl From<&EstimatorSettings> for EstimatorConfig {
    fn from(settings: &EstimatorSettings) -> Self {
        EstimatorConfig {
            policy: settings.policy,
            iterations: settings.iterations,
            distance_floor: settings.distance_floor,
        }
    }
}

fn default_iterations() -> usize { 50 }
fn default_distance_floor() -> f64 { 0.0001 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_radius_factor")]
    pub radius_factor: f64,
    #[serde(default = "default_min_radius_m")]
    pub min_radius_m: f64,
    #[serde(default = "default_max_radius_m")]
    pub max_radius_m: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            radius_factor: default_radius_factor(),
            min_radius_m: default_min_radius_m(),
            max_radius_m: default_max_radius_m(),
        }
    }
}

impl From<&SearchSettings> for RadiusPolicy {
    fn from(settings: &SearchSettings) -> Self {
        RadiusPolicy {
            factor: settings.radius_factor,
            min_m: settings.min_radius_m,
            max_m: settings.max_radius_m,
        }
    }
}

fn default_radius_factor() -> f64 { 0.5 }
fn default_min_radius_m() -> f64 { 800.0 }
fn default_max_radius_m() -> f64 { 12_000.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_validate_address")]
    pub validate_address: bool,
    /// Enables the per-participant cap when set (5000 is the usual value)
    pub max_individual_distance_m: Option<f64>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            validate_address: default_validate_address(),
            max_individual_distance_m: None,
            top_k: default_top_k(),
        }
    }
}

impl From<&RankingSettings> for RankingOptions {
    fn from(settings: &RankingSettings) -> Self {
        RankingOptions {
            validate_address: settings.validate_address,
            max_individual_distance_m: settings.max_individual_distance_m,
            top_k: settings.top_k,
        }
    }
}

fn default_validate_address() -> bool { true }
fn default_top_k() -> usize { 5 }

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

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line, human-readable
    Pretty,
    /// Single-line text
    Full,
}

impl LogFormat {
    /// Unknown names fall back to the single-line format
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Full,
        }
    }
}

impl LoggingSettings {
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.format)
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
    /// 4. Environment variables (prefixed with MEETUP__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MEETUP__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MEETUP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MEETUP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse settings from TOML text, without environment overrides
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
