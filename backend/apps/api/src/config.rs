//! Environment configuration
//!
//! Everything the binary needs is read once at startup. Feature crates get
//! typed config structs and never touch the environment.

use std::fmt::Display;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::config::{AuthConfig, MIN_JWT_SECRET_LEN};
use catalog::CatalogConfig;
use platform::rate_limit::RateLimitConfig;

/// Process-wide configuration
#[derive(Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Reported by `/health`
    pub environment: String,
    pub database_url: String,
    pub database_max_connections: u32,
    /// `None` selects the in-process cache
    pub redis_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub rate_limit: RateLimitConfig,
    pub auth: AuthConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let jwt_secret = env.required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes long");
        }

        let hash_cost = match env.get("HASH_COST") {
            Some(_) => env.parse_or("HASH_COST", 2u32)?,
            None => env.parse_or("BCRYPT_ROUNDS", 2u32)?,
        };
        if hash_cost == 0 {
            bail!("HASH_COST must be at least 1");
        }

        let rate_limit_max = env.parse_or("RATE_LIMIT_MAX", 100u32)?;
        if rate_limit_max == 0 {
            bail!("RATE_LIMIT_MAX must be at least 1");
        }

        let auth = AuthConfig {
            jwt_secret: jwt_secret.into_bytes(),
            token_ttl: env.duration_or("JWT_EXPIRES_IN", "7d")?,
            hash_cost,
            allow_admin_self_registration: env
                .parse_or("ALLOW_ADMIN_SELF_REGISTRATION", false)?,
            ..AuthConfig::default()
        };

        Ok(Self {
            host: env.parse_or("HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: env.parse_or("PORT", 3000u16)?,
            environment: env
                .get("APP_ENV")
                .or_else(|| env.get("NODE_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            database_url: env.required("DATABASE_URL")?,
            database_max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 10u32)?,
            redis_url: env.get("REDIS_URL"),
            cors_origins: env
                .get("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            log_level: env.get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_file: env.get("LOG_FILE").map(PathBuf::from),
            rate_limit: RateLimitConfig::new(
                rate_limit_max,
                env.duration_or("RATE_LIMIT_WINDOW", "15m")?,
            ),
            auth,
            catalog: CatalogConfig::default(),
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> anyhow::Result<String> {
        self.get(key)
            .with_context(|| format!("{key} must be set in environment"))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
            None => Ok(default),
        }
    }

    fn duration_or(&self, key: &str, default: &str) -> anyhow::Result<Duration> {
        let raw = self.get(key).unwrap_or_else(|| default.to_string());
        let duration = humantime::parse_duration(&raw)
            .with_context(|| format!("invalid {key} duration {raw:?}"))?;
        if duration.is_zero() {
            bail!("{key} must be longer than zero");
        }
        Ok(duration)
    }
}
