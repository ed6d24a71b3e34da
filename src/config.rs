use secrecy::Secret;
use std::str::FromStr;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Deployment mode. Internal error details are only returned to callers in
/// development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
    Test,
}

impl AppEnv {
    pub fn is_development(self) -> bool {
        self == AppEnv::Development
    }
}

impl FromStr for AppEnv {
    type Err = config::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            "test" => Ok(AppEnv::Test),
            other => Err(config::ConfigError::Message(format!(
                "unknown app_env '{}'",
                other
            ))),
        }
    }
}

/// Which persistence backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = config::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(config::ConfigError::Message(format!(
                "unknown store '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: AppEnv,
    pub host: String,
    pub port: u16,

    // Persistence
    pub store: StoreKind,
    pub database_url: Option<Secret<String>>,

    // Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_env: AppEnv::Development,
            host: "127.0.0.1".to_string(),
            port: 5000,
            store: StoreKind::Postgres,
            database_url: None,
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Self::from_settings(&settings)
    }

    pub fn from_settings(settings: &config::Config) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let app_env = match settings.get::<String>("app_env") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.app_env,
        };
        let store = match settings.get::<String>("store") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.store,
        };

        let database_url = settings
            .get::<String>("database_url")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(Secret::new);

        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(config::ConfigError::NotFound("database_url".to_string()));
        }

        Ok(Self {
            app_env,
            host: settings.get("host").unwrap_or(defaults.host),
            port: settings.get("port").unwrap_or(defaults.port),
            store,
            database_url,
            cors_origins: settings
                .get::<String>("cors_origins")
                .map(|raw| split_origins(&raw))
                .unwrap_or(defaults.cors_origins),
        })
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
