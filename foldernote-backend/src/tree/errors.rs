use crate::db::DbError;

/// Errors surfaced by the document tree and account stores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Duplicate title or custom id within the relevant scope
    Conflict(String),
    /// Addressed entry, folder or note does not exist
    NotFound(String),
    /// Request is malformed (empty title, missing parent folder, ...)
    InvalidInput(String),
    /// Email unknown or password mismatch
    InvalidCredentials,
    /// The underlying storage operation failed
    Persistence(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict(msg) => write!(f, "{}", msg),
            StoreError::NotFound(msg) => write!(f, "{}", msg),
            StoreError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            StoreError::InvalidCredentials => write!(f, "Invalid email or password"),
            StoreError::Persistence(msg) => write!(f, "Persistence failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        StoreError::Persistence(e.to_string())
    }
}

impl StoreError {
    /// Map a database error, turning uniqueness violations into `Conflict(message)`
    pub fn from_db(e: DbError, conflict_message: impl FnOnce(&str) -> String) -> Self {
        match e.unique_violation() {
            Some(detail) => StoreError::Conflict(conflict_message(detail)),
            None => e.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
