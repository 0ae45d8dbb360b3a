use anyhow::{Context, anyhow};
use std::env;

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Server configuration loaded from environment variables (and `.env`).
#[derive(Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    /// Falls back to the in-memory store when unset
    pub database_url: Option<String>,

    // Upstream provider
    pub tmdb_api_token: Option<String>,
    pub tmdb_base_url: String,

    // Authentication
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub auth_password_pepper: String,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("tmdb_api_token", &self.tmdb_api_token.as_ref().map(|_| "<redacted>"))
            .field("tmdb_base_url", &self.tmdb_base_url)
            .field("jwt_ttl_hours", &self.jwt_ttl_hours)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let server_port = match var("SERVER_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("SERVER_PORT is not a valid port: {port}"))?,
            None => 3000,
        };

        let jwt_ttl_hours = match var("JWT_TTL_HOURS") {
            Some(hours) => hours
                .parse()
                .with_context(|| format!("JWT_TTL_HOURS is not a number: {hours}"))?,
            None => 12,
        };

        Ok(Self {
            server_host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,

            database_url: var("DATABASE_URL"),

            tmdb_api_token: var("TMDB_API_TOKEN"),
            tmdb_base_url: var("TMDB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string()),

            jwt_secret: var("JWT_SECRET").ok_or_else(|| anyhow!("JWT_SECRET must be set"))?,
            jwt_ttl_hours,
            auth_password_pepper: var("AUTH_PASSWORD_PEPPER").unwrap_or_default(),

            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
