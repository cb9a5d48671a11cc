use crate::workflows::transactions::{RiskRules, RuleError};
use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Default upper bound on the number of prior events accepted per request.
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub screening: ScreeningConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let denylist = env::var("RISK_DENYLIST")
            .map(|raw| split_locations(&raw))
            .unwrap_or_default();
        let denylist_path = env::var("RISK_DENYLIST_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let max_history = match env::var("RISK_MAX_HISTORY") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(max) if max > 0 => max,
                _ => return Err(ConfigError::InvalidMaxHistory { value: raw }),
            },
            Err(_) => DEFAULT_MAX_HISTORY,
        };
        let rules = match env::var("RISK_RULES_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            Some(path) => load_rules(Path::new(&path))?,
            None => RiskRules::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            screening: ScreeningConfig {
                denylist,
                denylist_path,
                max_history,
                rules,
            },
        })
    }
}

/// Read a JSON rule file; fields it omits keep their default values.
pub fn load_rules(path: &Path) -> Result<RiskRules, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::RulesFile {
        path: path.to_path_buf(),
        source,
    })?;
    let rules: RiskRules =
        serde_json::from_str(&raw).map_err(|source| ConfigError::RulesFormat {
            path: path.to_path_buf(),
            source,
        })?;
    rules.validate().map_err(|source| ConfigError::InvalidRules {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(rules)
}

fn split_locations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|location| !location.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Denylist sources, rule settings and request bounds for transaction screening.
///
/// Locations from `RISK_DENYLIST` and the CSV at `RISK_DENYLIST_PATH` are merged when both are
/// present. `rules` comes from the JSON file at `RISK_RULES_PATH`, validated on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningConfig {
    pub denylist: Vec<String>,
    pub denylist_path: Option<PathBuf>,
    pub max_history: usize,
    pub rules: RiskRules,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            denylist: Vec::new(),
            denylist_path: None,
            max_history: DEFAULT_MAX_HISTORY,
            rules: RiskRules::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMaxHistory { value: String },
    RulesFile { path: PathBuf, source: std::io::Error },
    RulesFormat { path: PathBuf, source: serde_json::Error },
    InvalidRules { path: PathBuf, source: RuleError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMaxHistory { value } => write!(
                f,
                "RISK_MAX_HISTORY must be a positive integer (found '{}')",
                value
            ),
            ConfigError::RulesFile { path, source } => {
                write!(f, "cannot read rule file {}: {}", path.display(), source)
            }
            ConfigError::RulesFormat { path, source } => {
                write!(f, "rule file {} is not valid JSON: {}", path.display(), source)
            }
            ConfigError::InvalidRules { path, source } => {
                write!(f, "rule file {} rejected: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidMaxHistory { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::RulesFile { source, .. } => Some(source),
            ConfigError::RulesFormat { source, .. } => Some(source),
            ConfigError::InvalidRules { source, .. } => Some(source),
        }
    }
}
