//! Cloud service configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Persistence backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// In-process maps; development only
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, BoxError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("STORAGE must be postgres or memory, got {other}").into()),
        }
    }
}

/// Cloud service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL (unused with memory storage)
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    pub request_timeout_secs: u64,
    pub storage: StorageBackend,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let storage = match std::env::var("STORAGE") {
            Ok(v) => StorageBackend::parse(&v)?,
            Err(_) => StorageBackend::Postgres,
        };
        if storage == StorageBackend::Memory && environment != "development" {
            return Err(format!("STORAGE=memory is not allowed in {environment}").into());
        }

        let database_url = match (storage, std::env::var("DATABASE_URL")) {
            (_, Ok(url)) => url,
            (StorageBackend::Memory, Err(_)) => String::new(),
            (StorageBackend::Postgres, Err(_)) => return Err("DATABASE_URL must be set".into()),
        };

        Ok(Self {
            database_url,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(30),
            environment,
            storage,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
