//! Application configuration.
//!
//! Settings come from a `transit.toml` file (every section optional) and are
//! then overridden by environment variables:
//!
//! - `TRANSIT_CONFIG`: explicit path to the configuration file
//! - `HOST` / `PORT`: bind address
//! - `TRANSIT_SEED`: fixed RNG seed for reproducible curves and selection
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [search]
//! selection = "round_robin"
//!
//! [[search.phases]]
//! label = "Connecting to database..."
//! duration_ms = 2000
//!
//! [synthesis]
//! seed = 42
//! num_points = 200
//! noise_level = 0.0002
//!
//! [catalog]
//! path = "catalog.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::catalog::selection::SelectionKind;
use crate::services::search::{SearchPhase, SearchPlan};

const CONFIG_FILE: &str = "transit.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Sessions untouched for this long are dropped; 0 keeps them forever.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

impl ServerConfig {
    pub fn session_idle_timeout(&self) -> Option<Duration> {
        (self.session_idle_secs > 0).then(|| Duration::from_secs(self.session_idle_secs))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_session_idle_secs() -> u64 {
    3600
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub label: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// `random`, `round_robin`, `by_id` or `nearest`
    #[serde(default = "default_selection")]
    pub selection: String,
    /// Target of the `by_id` policy
    #[serde(default)]
    pub candidate_id: Option<String>,
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            selection: default_selection(),
            candidate_id: None,
            phases: default_phases(),
        }
    }
}

fn default_selection() -> String {
    "random".to_string()
}

fn default_phases() -> Vec<PhaseConfig> {
    SearchPlan::default()
        .phases()
        .iter()
        .map(|phase| PhaseConfig {
            label: phase.label.clone(),
            duration_ms: phase.duration.as_millis() as u64,
        })
        .collect()
}

impl SearchConfig {
    pub fn selection_kind(&self) -> Result<SelectionKind, ConfigError> {
        self.selection.parse().map_err(ConfigError::Invalid)
    }

    pub fn plan(&self) -> Result<SearchPlan, ConfigError> {
        let phases = self
            .phases
            .iter()
            .map(|p| SearchPhase::new(p.label.clone(), Duration::from_millis(p.duration_ms)))
            .collect();
        SearchPlan::new(phases).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Fixed seed; `None` seeds from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_num_points")]
    pub num_points: usize,
    #[serde(default = "default_noise_level")]
    pub noise_level: f64,
    #[serde(default = "default_span_multiplier")]
    pub span_multiplier: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            seed: None,
            num_points: default_num_points(),
            noise_level: default_noise_level(),
            span_multiplier: default_span_multiplier(),
        }
    }
}

fn default_num_points() -> usize {
    200
}

fn default_noise_level() -> f64 {
    0.0002
}

fn default_span_multiplier() -> f64 {
    2.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML catalog replacing the built-in systems
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from the first `transit.toml` found in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when none exists.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE),
            PathBuf::from("backend").join(CONFIG_FILE),
            PathBuf::from("..").join(CONFIG_FILE),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(&path);
            }
        }

        log::info!("No {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Full startup resolution: file (explicit or searched), then environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("TRANSIT_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::from_default_location()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT` and `TRANSIT_SEED` from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a port number: {}", port)))?;
        }
        if let Some(seed) = lookup("TRANSIT_SEED") {
            let seed = seed
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("TRANSIT_SEED is not a u64: {}", seed)))?;
            self.synthesis.seed = Some(seed);
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.synthesis.num_points == 0 {
            return Err(ConfigError::Invalid(
                "synthesis.num_points must be > 0".to_string(),
            ));
        }
        if !self.synthesis.noise_level.is_finite() || self.synthesis.noise_level < 0.0 {
            return Err(ConfigError::Invalid(
                "synthesis.noise_level must be >= 0".to_string(),
            ));
        }
        if !self.synthesis.span_multiplier.is_finite() || self.synthesis.span_multiplier <= 0.0 {
            return Err(ConfigError::Invalid(
                "synthesis.span_multiplier must be > 0".to_string(),
            ));
        }
        if self.selection_kind()? == SelectionKind::ById && self.search.candidate_id.is_none() {
            return Err(ConfigError::Invalid(
                "search.selection = \"by_id\" requires search.candidate_id".to_string(),
            ));
        }
        self.search.plan()?;
        Ok(())
    }

    pub fn selection_kind(&self) -> Result<SelectionKind, ConfigError> {
        self.search.selection_kind()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search.phases.len(), 5);
        assert_eq!(config.search.phases[0].duration_ms, 2000);
        assert_eq!(config.search.phases[1].duration_ms, 10000);
        assert_eq!(config.synthesis.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let toml = r#"
[server]
port = 9000

[synthesis]
seed = 7
"#;
        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.synthesis.seed, Some(7));
        assert_eq!(config.synthesis.num_points, 200);
        assert_eq!(config.search.selection, "random");
    }

    #[test]
    fn test_session_idle_timeout() {
        let config = AppConfig::default();
        assert_eq!(
            config.server.session_idle_timeout(),
            Some(Duration::from_secs(3600))
        );

        let config = AppConfig::from_toml_str("[server]\nsession_idle_secs = 0\n").unwrap();
        assert_eq!(config.server.session_idle_timeout(), None);
    }

    #[test]
    fn test_parse_phases_and_selection() {
        let toml = r#"
[search]
selection = "round_robin"

[[search.phases]]
label = "Scanning"
duration_ms = 50

[[search.phases]]
label = "Done"
duration_ms = 10
"#;
        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.selection_kind().unwrap(), SelectionKind::RoundRobin);
        let plan = config.search.plan().unwrap();
        assert_eq!(plan.phases().len(), 2);
        assert_eq!(plan.total_duration(), Duration::from_millis(60));
    }

    #[test]
    fn test_zero_phase_duration_rejected() {
        let toml = r#"
[[search.phases]]
label = "Instant"
duration_ms = 0
"#;
        assert!(matches!(
            AppConfig::from_toml_str(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_by_id_requires_candidate() {
        let toml = r#"
[search]
selection = "by_id"
"#;
        assert!(AppConfig::from_toml_str(toml).is_err());

        let toml = r#"
[search]
selection = "by_id"
candidate_id = "toi-700d"
"#;
        assert!(AppConfig::from_toml_str(toml).is_ok());
    }

    #[test]
    fn test_unknown_selection_rejected() {
        let toml = r#"
[search]
selection = "alphabetical"
"#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("[server\nport = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[synthesis]\nnum_points = 64\nnoise_level = 0.0").unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.synthesis.num_points, 64);
        assert_eq!(config.synthesis.noise_level, 0.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [("HOST", "127.0.0.1"), ("PORT", "3001"), ("TRANSIT_SEED", "99")]
            .into_iter()
            .collect();
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3001");
        assert_eq!(config.synthesis.seed, Some(99));
    }

    #[test]
    fn test_bad_env_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
