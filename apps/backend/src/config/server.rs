//! Server configuration from environment variables.
//!
//! Environment variables must be set by the runtime environment
//! (docker-compose env_file, or sourced env files in local dev).

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    /// Read `BACKEND_HOST`, `BACKEND_PORT`, `BACKEND_CORS_ORIGIN`,
    /// falling back to dev defaults for anything unset.
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("BACKEND_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got {raw:?}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };
        let cors_origin = std::env::var("BACKEND_CORS_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        Ok(Self {
            host,
            port,
            cors_origin,
        })
    }
}
