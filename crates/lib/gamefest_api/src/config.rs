//! API server configuration.

use gamefest_core::auth::token::resolve_token_secret;

/// Default upload limit for payment proofs: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Deployment environment. Development echoes internal error details.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse `APP_ENV`; anything other than `development`/`dev` is production.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Session token signing secret.
    pub token_secret: String,
    pub environment: Environment,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// Largest accepted payment-proof upload, in bytes.
    pub max_upload_bytes: usize,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable           | Default                                   |
    /// |--------------------|-------------------------------------------|
    /// | `BIND_ADDR`        | `127.0.0.1:5000`                          |
    /// | `DATABASE_URL`     | `postgres://localhost:5432/gamefest`      |
    /// | `TOKEN_SECRET`     | generated & persisted to file             |
    /// | `APP_ENV`          | `production`                              |
    /// | `COOKIE_SECURE`    | `true` unless `APP_ENV=development`       |
    /// | `MAX_UPLOAD_BYTES` | `5242880`                                 |
    pub fn from_env() -> Self {
        let environment = Environment::parse(&std::env::var("APP_ENV").unwrap_or_default());
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/gamefest".into()),
            token_secret: resolve_token_secret(),
            environment,
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(!environment.is_development()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    /// Development configuration with a fixed secret, used by tests.
    pub fn for_tests(token_secret: &str) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".into(),
            database_url: String::new(),
            token_secret: token_secret.into(),
            environment: Environment::Development,
            cookie_secure: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_defaults_to_production() {
        assert_eq!(Environment::parse(""), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Production);
        assert_eq!(Environment::parse("Development"), Environment::Development);
        assert_eq!(Environment::parse("dev"), Environment::Development);
    }
}
