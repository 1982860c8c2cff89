//! Food server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Minimum signing secret length in bytes (HS256 key size)
const MIN_JWT_SECRET_LEN: usize = 32;

/// Food server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; `None` selects the in-memory store (development only)
    pub database_url: Option<String>,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in minutes
    pub jwt_expiration_minutes: i64,
}

impl Config {
    /// Require the signing secret: must be set in every environment and long enough for HS256.
    fn require_jwt_secret() -> Result<String, BoxError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set")?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(
                format!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes long").into(),
            );
        }
        Ok(secret)
    }

    /// Database URL is optional only in development.
    fn database_url(environment: &str) -> Result<Option<String>, BoxError> {
        match std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
            Some(url) => Ok(Some(url)),
            None if environment == "development" => Ok(None),
            None => Err(format!("DATABASE_URL must be set in {environment} environment").into()),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: Self::database_url(&environment)?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3004),
            jwt_secret: Self::require_jwt_secret()?,
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            environment,
        })
    }
}
