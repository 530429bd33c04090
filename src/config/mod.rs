use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/technexus";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// `None` disables the chat endpoint.
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub llm_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub index_file: PathBuf,
    pub cors_allowed_origins: String,
    pub production: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            gemini_api_key: None,
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
            index_file: PathBuf::from("index.html"),
            cors_allowed_origins: cors::ANY_ORIGIN.to_string(),
            production: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            database_url: text("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_nonzero(
                "DATABASE_MAX_CONNECTIONS",
                text("DATABASE_MAX_CONNECTIONS"),
                defaults.database_max_connections,
                "non-zero connection count",
            )?,
            gemini_api_key: text("GEMINI_API_KEY"),
            gemini_api_base: text("GEMINI_API_BASE").unwrap_or(defaults.gemini_api_base),
            llm_timeout: Duration::from_secs(parse_nonzero(
                "LLM_TIMEOUT_SECS",
                text("LLM_TIMEOUT_SECS"),
                DEFAULT_LLM_TIMEOUT_SECS,
                "non-zero number of seconds",
            )?),
            host: text("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", text("PORT"), defaults.port, "port number")?,
            static_dir: text("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            index_file: text("INDEX_FILE").map(PathBuf::from).unwrap_or(defaults.index_file),
            cors_allowed_origins: text("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
            production: text("RUST_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn chat_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    /// The database URL with any password replaced, safe to log.
    pub fn redacted_database_url(&self) -> String {
        redact_credentials(&self.database_url)
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
            expected,
        }),
    }
}

/// Like [`parse_or`], but zero is rejected too.
fn parse_nonzero<T>(
    name: &'static str,
    value: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
{
    let raw = value.clone();
    let parsed = parse_or(name, value, default, expected)?;

    if parsed == T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: raw.unwrap_or_default(),
            expected,
        });
    }

    Ok(parsed)
}

fn redact_credentials(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };

    match userinfo.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => format!("{}://{}@{}", scheme, userinfo, host),
    }
}
