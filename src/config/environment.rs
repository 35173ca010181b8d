use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub api_prefix: String,
    pub rate_limit_per_second: u32,
    pub rate_limit_burst: u32,
}

impl ServerConfig {
    /// Deadline applied to a whole request/response cycle.
    pub fn request_timeout(&self) -> Duration {
        self.read_timeout + self.write_timeout
    }
}

#[derive(Debug, Clone)]
pub enum DatabaseConnection {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        name: String,
    },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connection: DatabaseConnection,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// Argon2 iteration count.
    pub hash_cost: u32,
    pub hash_memory_kib: u32,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_path: PathBuf,
    pub max_upload_size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("environment variable {key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let server = ServerConfig {
            host: vars.string_or("HOST", "0.0.0.0"),
            port: vars.parse_or("PORT", 8080)?,
            environment: vars.string_or("ENVIRONMENT", "development"),
            read_timeout: vars.duration_or("READ_TIMEOUT", Duration::from_secs(15))?,
            write_timeout: vars.duration_or("WRITE_TIMEOUT", Duration::from_secs(15))?,
            api_prefix: vars.string_or("API_PREFIX", "/api/v1"),
            rate_limit_per_second: vars.parse_or("RATE_LIMIT_PER_SECOND", 50)?,
            rate_limit_burst: vars.parse_or("RATE_LIMIT_BURST", 100)?,
        };

        let connection = match vars.get("DATABASE_URL") {
            Some(url) => DatabaseConnection::Url(url),
            None => DatabaseConnection::Parts {
                host: vars.string_or("DB_HOST", "localhost"),
                port: vars.parse_or("DB_PORT", 3306)?,
                user: vars.required("DB_USER")?,
                password: vars.required("DB_PASSWORD")?,
                name: vars.required("DB_NAME")?,
            },
        };

        let database = DatabaseConfig {
            connection,
            max_connections: vars.parse_or("DB_MAX_CONNECTIONS", 25)?,
            min_connections: vars.parse_or("DB_MIN_CONNECTIONS", 5)?,
            max_lifetime: vars.duration_or("DB_MAX_LIFETIME", Duration::from_secs(5 * 60))?,
        };

        let auth = AuthConfig {
            jwt_secret: vars.required("JWT_SECRET")?,
            access_token_ttl: vars.duration_or("JWT_EXPIRY", Duration::from_secs(15 * 60))?,
            refresh_token_ttl: vars
                .duration_or("REFRESH_TOKEN_EXPIRY", Duration::from_secs(60 * 24 * 60 * 60))?,
            hash_cost: vars.parse_or("HASH_COST", 2)?,
            hash_memory_kib: vars.parse_or("HASH_MEMORY_KIB", 8192)?,
        };

        let storage = StorageConfig {
            upload_path: PathBuf::from(vars.string_or("UPLOAD_PATH", "./uploads")),
            max_upload_size: vars.parse_or("MAX_UPLOAD_SIZE", 10 * 1024 * 1024)?,
        };

        Ok(Self {
            server,
            database,
            auth,
            storage,
        })
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.is_empty())
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }

    fn duration_or(&self, key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        match self.get(key) {
            Some(value) => parse_duration(&value).ok_or(ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }
}

/// Parses `90`, `90s`, `15m`, `2h` or `60d`.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: u64 = digits.parse().ok()?;

    let seconds = match unit {
        "" | "s" => amount,
        "m" => amount.checked_mul(60)?,
        "h" => amount.checked_mul(60 * 60)?,
        "d" => amount.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };

    Some(Duration::from_secs(seconds))
}
