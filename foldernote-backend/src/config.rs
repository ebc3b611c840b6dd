use std::env;
use std::path::Path;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Maximum number of pooled SQLite connections
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
    /// How long a connection waits on a locked database before failing
    pub const DB_BUSY_TIMEOUT_MS: &str = "DB_BUSY_TIMEOUT_MS";
    /// Single origin allowed by CORS. Unset means any origin.
    pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 10000;
    pub const DATABASE_URL: &str = "./.db/foldernote.db";
    pub const DB_POOL_SIZE: u32 = 8;
    pub const DB_BUSY_TIMEOUT_MS: u64 = 5000;
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub db_pool_size: u32,
    pub db_busy_timeout_ms: u64,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_or_default(env_vars::PORT, defaults::PORT),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            db_pool_size: parse_or_default(env_vars::DB_POOL_SIZE, defaults::DB_POOL_SIZE).max(1),
            db_busy_timeout_ms: parse_or_default(
                env_vars::DB_BUSY_TIMEOUT_MS,
                defaults::DB_BUSY_TIMEOUT_MS,
            ),
            cors_allowed_origin: env::var(env_vars::CORS_ALLOWED_ORIGIN)
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Read and parse an env var, warning and falling back when it is malformed
fn parse_or_default<T: std::str::FromStr + std::fmt::Display + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("{} must be a valid number (got {:?}), using {}", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Create the parent directory of the database file if it doesn't exist
pub fn initialize_database_dir(database_url: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
            log::info!("Database directory: {:?}", parent);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_initialize_database_dir_creates_parent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/deeper/foldernote.db");

        initialize_database_dir(db_path.to_str().unwrap()).unwrap();

        assert!(dir.path().join("nested/deeper").is_dir());
        assert!(!db_path.exists());
    }

    #[test]
    fn test_initialize_database_dir_bare_filename() {
        initialize_database_dir("foldernote.db").unwrap();
    }
}
