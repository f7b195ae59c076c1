use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5002;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MONGO_URI is missing from the environment")]
    MissingMongoUri,
    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
    #[error("{key} must be a boolean, got '{value}'")]
    InvalidFlag { key: &'static str, value: String },
}

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mongo_uri: String,
    pub database_name: Option<String>,
    pub host: String,
    pub port: u16,
    /// Back the duplicate-name check with a unique index on `users.name`.
    pub unique_names: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri = lookup("MONGO_URI")
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(ConfigError::MissingMongoUri)?;

        let database_name = lookup("MONGO_DATABASE").filter(|name| !name.is_empty());
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let unique_names = match lookup("UNIQUE_NAME_INDEX") {
            Some(raw) => parse_flag("UNIQUE_NAME_INDEX", raw)?,
            None => false,
        };

        Ok(Self {
            mongo_uri,
            database_name,
            host,
            port,
            unique_names,
        })
    }
}

fn parse_flag(key: &'static str, raw: String) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value: raw }),
    }
}
