//! Server configuration loaded from the environment.

/// Database connection string; the in-memory repository is used when unset.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Listen address.
pub const HOST_ENV: &str = "FLEET_HOST";
/// Listen port.
pub const PORT_ENV: &str = "FLEET_PORT";
/// Comma-separated CORS origins.
pub const UI_ORIGINS_ENV: &str = "FLEET_UI_ORIGINS";
/// Connection pool size.
pub const POOL_SIZE_ENV: &str = "FLEET_DB_POOL_SIZE";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Settings for the fleet registry server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// PostgreSQL connection string, if any.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl ServerConfig {
    /// Build the config from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("{PORT_ENV} must be a u16 number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };
        let pool_size = match lookup(POOL_SIZE_ENV) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(format!("{POOL_SIZE_ENV} must be a positive number, got {raw:?}")),
            },
            None => DEFAULT_POOL_SIZE,
        };
        let origins = lookup(UI_ORIGINS_ENV).unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            allowed_origins,
            database_url: lookup(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty()),
            pool_size,
        })
    }
}
