use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};

const ENV_PREFIX: &str = "ADVISOR";

/// Top-level application settings loaded from file + environment.
///
/// Built once at startup and shared read-only for the lifetime of the process.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub server: ServerConfig,
    pub cors: CorsSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub security: SecuritySection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    ///
    /// A `.env` file in the working directory is applied to the process
    /// environment first, so its values behave exactly like exported variables.
    pub fn load() -> Result<Self> {
        env_file_outcome(dotenvy::dotenv())?;

        let config_path =
            env::var("ADVISOR_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        Self::load_from(Path::new(&config_path), None)
    }

    /// Load configuration from an explicit file path.
    ///
    /// When `env_overrides` is `Some`, those variables are used instead of the
    /// process environment. Variable values stay strings until deserialized,
    /// so `2.0` or `007` reach string fields unchanged.
    pub fn load_from(
        config_path: &Path,
        env_overrides: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();

        if config_path.exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env_overrides),
        );

        let settings = builder.build().context("failed to assemble configuration")?;
        let mut config: Self = settings
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }
        config.logging.level = config.logging.level.trim().to_ascii_lowercase();

        Ok(config)
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.app.name.trim().is_empty() {
            bail!("app.name must not be empty");
        }

        let prefix = &self.app.api_prefix;
        if !prefix.starts_with('/') {
            bail!("app.api_prefix must start with '/', got '{}'", prefix);
        }
        if prefix.len() > 1 && prefix.ends_with('/') {
            bail!("app.api_prefix must not end with '/', got '{}'", prefix);
        }

        if self.cors.origins.is_empty() {
            bail!("cors.origins must contain at least one origin");
        }

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn env_file_outcome<T>(result: dotenvy::Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).context("failed to load .env file"),
    }
}

/// Accept either a sequence or one comma-separated string, as environment
/// variables can only carry the latter.
fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        List(Vec<String>),
        Joined(String),
    }

    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::List(items) => items,
        StringOrList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub version: String,
    pub environment: Environment,
    pub debug: bool,
    /// Versioned prefix the stock routes are mounted under.
    pub api_prefix: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "Investment Advisor API".to_string(),
            version: "0.1.0".to_string(),
            environment: Environment::Development,
            debug: false,
            api_prefix: "/api/v1".to_string(),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => bail!("unsupported environment: {}", other),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Cross-origin policy. A `"*"` entry means "any".
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    #[serde(deserialize_with = "string_or_list")]
    pub origins: Vec<String>,
    pub allow_credentials: bool,
    #[serde(deserialize_with = "string_or_list")]
    pub allow_methods: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub allow_headers: Vec<String>,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8000".to_string(),
            ],
            allow_credentials: true,
            allow_methods: vec!["*".to_string()],
            allow_headers: vec!["*".to_string()],
        }
    }
}

/// Connection settings reserved for the persistence layer; not read by any
/// current code path.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "investment_advisor".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::KeyValue,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Flat `key="value"` lines.
    #[default]
    KeyValue,
    Json,
    Text,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub secret_key: String,
    pub external_api_key: String,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            secret_key: "change-in-production-use-strong-secret-key".to_string(),
            external_api_key: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            " staging ".parse::<Environment>().unwrap(),
            Environment::Staging
        );
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn derived_environment_flags() {
        let mut config = AppConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());

        config.app.environment = Environment::Production;
        assert!(config.is_production());
        assert!(!config.is_development());
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.app.api_prefix, "/api/v1");
        assert_eq!(config.logging.format, LogFormat::KeyValue);
    }

    #[test]
    fn validate_rejects_bad_prefix() {
        let mut config = AppConfig::default();
        config.app.api_prefix = "api/v1".to_string();
        assert!(config.validate().is_err());

        config.app.api_prefix = "/api/v1/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_env_file_is_ignored() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join(".env");
        assert!(env_file_outcome(dotenvy::from_path(&missing)).is_ok());
    }

    #[test]
    fn malformed_env_file_is_reported() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        std::fs::write(&path, "this is not an assignment\n").unwrap();

        let err = env_file_outcome(dotenvy::from_path(&path)).unwrap_err();
        assert!(err.to_string().contains(".env"), "{err:#}");
    }

    #[test]
    fn validate_rejects_empty_origins() {
        let mut config = AppConfig::default();
        config.cors.origins.clear();
        assert!(config.validate().is_err());
    }
}
