use rusqlite::ErrorCode;

/// Failure from the persistence layer: either checking out a pooled
/// connection or running a statement.
#[derive(Debug)]
pub enum DbError {
    Pool(r2d2::Error),
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// The UNIQUE/PRIMARY KEY constraint message if this is a uniqueness violation,
    /// e.g. `UNIQUE constraint failed: entries.owner_account_id, entries.kind, entries.title`
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, msg))
                if err.code == ErrorCode::ConstraintViolation
                    && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY) =>
            {
                Some(msg.as_deref().unwrap_or("UNIQUE constraint failed"))
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::Pool(e) => write!(f, "Connection pool error: {}", e),
            DbError::Sqlite(e) => write!(f, "SQLite error: {}", e),
        }
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DbError::Pool(e) => Some(e),
            DbError::Sqlite(e) => Some(e),
        }
    }
}

impl From<r2d2::Error> for DbError {
    fn from(e: r2d2::Error) -> Self {
        DbError::Pool(e)
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::Sqlite(e)
    }
}

pub type DbResult<T> = Result<T, DbError>;
