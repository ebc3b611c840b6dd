pub mod errors;
pub mod sqlite;
pub mod tables;

pub use errors::{DbError, DbResult};
pub use sqlite::{Database, DbConn};
