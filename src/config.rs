//! Board configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

/// Default request body cap (16 MiB).
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Log output format for `tracing-subscriber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Plain,
    /// One JSON object per event.
    Json,
}

/// Top-level board configuration.
///
/// Loaded once at startup via [`BoardConfig::from_env`].
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// SQLite connection string. The file is created if missing.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Directory uploaded images are written to and served from.
    pub upload_dir: PathBuf,

    /// Maximum accepted request body in bytes.
    pub max_content_length: usize,

    /// HTML document served at `/`.
    pub index_html: PathBuf,

    /// Log output format.
    pub log_format: LogFormat,
}

impl BoardConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set or does not
    /// parse. Calls `dotenvy::dotenv().ok()` to optionally load a `.env`
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let raw_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .with_context(|| format!("invalid LISTEN_ADDR {raw_addr:?}"))?;

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://amicooked.db".to_string());

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Plain,
        };

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5),
            database_connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5),
            upload_dir: parse_env("UPLOAD_DIR", PathBuf::from("uploads")),
            max_content_length: parse_env("MAX_CONTENT_LENGTH", DEFAULT_MAX_CONTENT_LENGTH),
            index_html: parse_env("INDEX_HTML", PathBuf::from("static/index.html")),
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value: u32 = parse_env("COOKED_BOARD_TEST_UNSET_KEY", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn default_body_cap_is_sixteen_mib() {
        assert_eq!(DEFAULT_MAX_CONTENT_LENGTH, 16_777_216);
    }
}
