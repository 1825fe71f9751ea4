/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `JWT_SECRET`: Secret key for session signing (required, min 32 chars)
/// - `DATABASE_URL`: PostgreSQL connection string (optional; in-memory store
///   when absent)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `FRONTEND_URL`: Base URL used in email links (default: http://localhost:5173)
/// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
///   `SMTP_FROM_ADDRESS`, `SMTP_FROM_NAME`: SMTP settings; mail is logged
///   instead of delivered when `SMTP_HOST` is unset
/// - `RUST_LOG`: Log filter (default: `taskhive_api=debug,tower_http=debug`)
///
/// # Example
///
/// ```no_run
/// use taskhive_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```
use std::env;

use taskhive_shared::mail::SmtpConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// PostgreSQL connection URL; `None` selects the in-memory store
    pub database_url: Option<String>,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// SMTP settings; `None` selects the logging mailer
    pub smtp: Option<SmtpConfig>,

    /// Frontend base URL embedded in confirmation/reset emails
    pub frontend_url: String,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive (development)
    pub cors_origins: Vec<String>,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for session signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - A numeric variable has an invalid value
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let database_url = env::var("DATABASE_URL").ok();

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) => Some(SmtpConfig {
                host,
                port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse::<u16>()?,
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from_address: env::var("SMTP_FROM_ADDRESS")
                    .unwrap_or_else(|_| "no-reply@taskhive.dev".to_string()),
                from_name: env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Taskhive".to_string()),
            }),
            Err(_) => None,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database_url,
            jwt: JwtConfig { secret: jwt_secret },
            smtp,
            frontend_url,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            smtp: None,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }

    #[test]
    fn test_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
