//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DASHBOARD_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `DASHBOARD_TOKEN_SECRET` - Session token signing secret (min 32 chars, high entropy)
//! - `GEMINI_API_KEY` - Gemini API key; startup fails without it
//!
//! ## Optional
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (falls back to `PORT`, default: 8000)
//! - `DASHBOARD_STATIC_DIR` - Static asset directory (default: crates/dashboard/static)
//! - `ACCESS_TOKEN_EXPIRE_MINUTES` - Session token lifetime, at most one year (default: 30)
//! - `GEMINI_MODEL` - Model identifier (default: gemini-2.5-flash)
//! - `GEMINI_BASE_URL` - API base URL (default: <https://generativelanguage.googleapis.com>)
//! - `GEMINI_TIMEOUT_SECS` - Upper bound on a single generation call (default: 30)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "crates/dashboard/static";
const DEFAULT_TOKEN_TTL_MINUTES: &str = "30";
/// One year.
const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_TIMEOUT_SECS: &str = "30";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Session token configuration
    pub auth: AuthConfig,
    /// Generative-text provider configuration
    pub gemini: GeminiConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Session token signing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC key for session tokens
    pub token_secret: SecretString,
    /// Lifetime of an issued session token
    pub token_ttl: chrono::Duration,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent with every request
    pub api_key: SecretString,
    /// Model identifier (e.g., gemini-2.5-flash)
    pub model: String,
    /// API base URL, without a trailing slash
    pub base_url: String,
    /// Upper bound on a single generation call
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = env
            .first_of(&["DASHBOARD_DATABASE_URL", "DATABASE_URL"])
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("DASHBOARD_DATABASE_URL".to_string()))?;
        let host = env.parse_or_default::<IpAddr>("DASHBOARD_HOST", DEFAULT_HOST)?;
        let port = match env.first_of(&["DASHBOARD_PORT", "PORT"]) {
            Some(value) => value.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string())
            })?,
            None => DEFAULT_PORT,
        };
        let static_dir = PathBuf::from(env.get_or_default("DASHBOARD_STATIC_DIR", DEFAULT_STATIC_DIR));

        let auth = AuthConfig::from_env(&env)?;
        let gemini = GeminiConfig::from_env(&env)?;

        let log_format = match env.get("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            database_url,
            host,
            port,
            static_dir,
            auth,
            gemini,
            log_format,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    /// Load only the session-token settings, validated as in [`DashboardConfig::from_lookup`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_env(&Env(lookup))
    }

    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_secret = env.validated_secret("DASHBOARD_TOKEN_SECRET")?;
        validate_token_secret(&token_secret, "DASHBOARD_TOKEN_SECRET")?;

        let minutes =
            env.parse_or_default::<i64>("ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        let token_ttl = chrono::Duration::try_minutes(minutes)
            .filter(|_| (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes))
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "ACCESS_TOKEN_EXPIRE_MINUTES".to_string(),
                    format!("must be between 1 and {MAX_TOKEN_TTL_MINUTES} minutes"),
                )
            })?;

        Ok(Self {
            token_secret,
            token_ttl,
        })
    }
}

impl GeminiConfig {
    /// Load only the Gemini settings, validated as in [`DashboardConfig::from_lookup`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_env(&Env(lookup))
    }

    fn from_env<F>(env: &Env<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env
            .get("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let timeout_secs =
            env.parse_or_default::<u64>("GEMINI_TIMEOUT_SECS", DEFAULT_GEMINI_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GEMINI_TIMEOUT_SECS".to_string(),
                "must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model: env.get_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: env
                .get_or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup wrapper.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get the first variable that is set, in order.
    fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to a default.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self
            .get(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Validate that a token secret meets minimum length requirements.
fn validate_token_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GOOD_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgres://localhost/dashboard"),
            ("DASHBOARD_TOKEN_SECRET", GOOD_SECRET),
            ("GEMINI_API_KEY", "AIzaSyD-k3y"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::from_lookup(lookup(&minimal())).unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8000");
        assert_eq!(config.auth.token_ttl, chrono::Duration::minutes(30));
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.timeout, Duration::from_secs(30));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.static_dir, PathBuf::from("crates/dashboard/static"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = minimal();
        pairs.extend([
            ("PORT", "9100"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("GEMINI_BASE_URL", "http://127.0.0.1:9999/"),
            ("LOG_FORMAT", "json"),
        ]);
        let config = DashboardConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.auth.token_ttl, chrono::Duration::minutes(5));
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_dashboard_port_wins_over_port() {
        let mut pairs = minimal();
        pairs.extend([("PORT", "9100"), ("DASHBOARD_PORT", "9200")]);
        let config = DashboardConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 9200);
    }

    #[test]
    fn test_missing_gemini_key_is_fatal() {
        let pairs: Vec<_> = minimal()
            .into_iter()
            .filter(|(k, _)| *k != "GEMINI_API_KEY")
            .collect();
        let err = DashboardConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "GEMINI_API_KEY"));
    }

    #[test]
    fn test_blank_gemini_key_is_fatal() {
        let mut pairs: Vec<_> = minimal()
            .into_iter()
            .filter(|(k, _)| *k != "GEMINI_API_KEY")
            .collect();
        pairs.push(("GEMINI_API_KEY", "  "));
        assert!(DashboardConfig::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        let mut pairs = minimal();
        pairs.push(("ACCESS_TOKEN_EXPIRE_MINUTES", "0"));
        let err = DashboardConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_sections_load_alone() {
        let auth = AuthConfig::from_lookup(lookup(&[("DASHBOARD_TOKEN_SECRET", GOOD_SECRET)]))
            .unwrap();
        assert_eq!(auth.token_ttl, chrono::Duration::minutes(30));
        assert!(AuthConfig::from_lookup(lookup(&[("DASHBOARD_TOKEN_SECRET", "changeme")])).is_err());

        let gemini = GeminiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "AIzaSyD-k3y")])).unwrap();
        assert_eq!(gemini.model, "gemini-2.5-flash");
        assert!(GeminiConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_ttl_upper_bound() {
        let mut pairs = minimal();
        pairs.push(("ACCESS_TOKEN_EXPIRE_MINUTES", "525600"));
        let config = DashboardConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.auth.token_ttl, chrono::Duration::days(365));

        let mut pairs = minimal();
        pairs.push(("ACCESS_TOKEN_EXPIRE_MINUTES", "525601"));
        let err = DashboardConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ACCESS_TOKEN_EXPIRE_MINUTES"));

        let mut pairs = minimal();
        pairs.push(("ACCESS_TOKEN_EXPIRE_MINUTES", "100000000000000"));
        assert!(DashboardConfig::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_rejects_weak_token_secret() {
        let mut pairs: Vec<_> = minimal()
            .into_iter()
            .filter(|(k, _)| *k != "DASHBOARD_TOKEN_SECRET")
            .collect();
        pairs.push(("DASHBOARD_TOKEN_SECRET", "changeme-changeme-changeme-changeme"));
        let err = DashboardConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_validate_secret_strength() {
        assert!(validate_secret_strength("your-api-key-here", "TEST_VAR").is_err());
        assert!(validate_secret_strength(&"a".repeat(33), "TEST_VAR").is_err());
        assert!(validate_secret_strength(GOOD_SECRET, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_token_secret_length() {
        assert!(validate_token_secret(&SecretString::from("short"), "TEST").is_err());
        assert!(validate_token_secret(&SecretString::from("a".repeat(32)), "TEST").is_ok());
    }

    #[test]
    fn test_gemini_config_debug_redacts_key() {
        let config = DashboardConfig::from_lookup(lookup(&minimal())).unwrap();
        let debug_output = format!("{:?}", config.gemini);

        assert!(debug_output.contains("gemini-2.5-flash"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("AIzaSyD-k3y"));
    }
}
