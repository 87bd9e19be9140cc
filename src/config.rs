use crate::models::LookupFailurePolicy;
use crate::storage::sanity::SanitySettings;
use crate::storage::RetryConfig;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use zeroize::Zeroizing;

/// Minimum accepted length of `GATE_SECRET`, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Clone)]
pub struct Config {
    // Token signing
    pub gate_secret: Zeroizing<String>,

    // Content store
    pub sanity_project_id: String,
    pub sanity_dataset: String,
    pub sanity_api_version: String,
    pub sanity_token: Option<String>,
    pub sanity_timeout_ms: u64,
    pub sanity_max_attempts: u32,

    // Server
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,

    // Gate
    pub content_root: String,
    pub secure_cookies: bool,
    pub lookup_failure_policy: LookupFailurePolicy,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gate_secret", &"[REDACTED]")
            .field("sanity_project_id", &self.sanity_project_id)
            .field("sanity_dataset", &self.sanity_dataset)
            .field("sanity_api_version", &self.sanity_api_version)
            .field("sanity_token", &self.sanity_token.as_ref().map(|_| "[REDACTED]"))
            .field("sanity_timeout_ms", &self.sanity_timeout_ms)
            .field("sanity_max_attempts", &self.sanity_max_attempts)
            .field("bind_addr", &self.bind_addr)
            .field("static_dir", &self.static_dir)
            .field("content_root", &self.content_root)
            .field("secure_cookies", &self.secure_cookies)
            .field("lookup_failure_policy", &self.lookup_failure_policy)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Token signing secret - required, no fallback
        let gate_secret = Zeroizing::new(
            env::var("GATE_SECRET")
                .map_err(|_| ConfigError::MissingVar("GATE_SECRET".to_string()))?,
        );
        if gate_secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::InvalidValue(
                "GATE_SECRET".to_string(),
                format!("must be at least {} bytes", MIN_SECRET_BYTES),
            ));
        }

        // Content store
        let sanity_project_id = env::var("SANITY_PROJECT_ID")
            .map_err(|_| ConfigError::MissingVar("SANITY_PROJECT_ID".to_string()))?;
        if sanity_project_id.is_empty()
            || !sanity_project_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::InvalidValue(
                "SANITY_PROJECT_ID".to_string(),
                "may only contain alphanumeric characters and hyphens".to_string(),
            ));
        }
        let sanity_dataset =
            env::var("SANITY_DATASET").unwrap_or_else(|_| "production".to_string());
        let sanity_api_version =
            env::var("SANITY_API_VERSION").unwrap_or_else(|_| "2023-01-01".to_string());
        let sanity_token = env::var("SANITY_TOKEN").ok().filter(|t| !t.is_empty());
        let sanity_timeout_ms = parse_env_or_default("SANITY_TIMEOUT_MS", 5_000)?;
        let sanity_max_attempts: u32 = parse_env_or_default("SANITY_MAX_ATTEMPTS", 3)?;
        if sanity_max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "SANITY_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;
        let static_dir = PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "dist".to_string()));

        // Gate
        let content_root = env::var("CONTENT_ROOT")
            .unwrap_or_else(|_| "blog".to_string())
            .trim_matches('/')
            .to_string();
        if content_root.is_empty()
            || !content_root
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::InvalidValue(
                "CONTENT_ROOT".to_string(),
                "must be a single path segment (alphanumeric, hyphens, underscores)".to_string(),
            ));
        }
        let secure_cookies = parse_env_or_default("SECURE_COOKIES", true)?;
        let lookup_failure_policy = match env::var("LOOKUP_FAILURE_POLICY") {
            Ok(val) => val
                .parse::<LookupFailurePolicy>()
                .map_err(|e| ConfigError::InvalidValue("LOOKUP_FAILURE_POLICY".to_string(), e))?,
            Err(_) => LookupFailurePolicy::Open,
        };

        Ok(Config {
            gate_secret,
            sanity_project_id,
            sanity_dataset,
            sanity_api_version,
            sanity_token,
            sanity_timeout_ms,
            sanity_max_attempts,
            bind_addr,
            static_dir,
            content_root,
            secure_cookies,
            lookup_failure_policy,
        })
    }

    /// Key material for session token HMACs.
    pub fn secret_bytes(&self) -> &[u8] {
        self.gate_secret.as_bytes()
    }

    /// Settings for the Sanity content store client.
    pub fn sanity_settings(&self) -> SanitySettings {
        SanitySettings {
            project_id: self.sanity_project_id.clone(),
            dataset: self.sanity_dataset.clone(),
            api_version: self.sanity_api_version.clone(),
            token: self.sanity_token.clone(),
            timeout: Duration::from_millis(self.sanity_timeout_ms),
            retry: RetryConfig {
                max_attempts: self.sanity_max_attempts,
                ..RetryConfig::default()
            },
        }
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
