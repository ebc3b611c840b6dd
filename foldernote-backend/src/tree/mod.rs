//! Document tree — folders, standalone notes, and notes nested in folders.
//!
//! `DocumentTreeStore` validates and routes each operation; uniqueness and
//! atomicity come from the SQLite schema underneath.

pub mod errors;
pub mod store;

pub use errors::{StoreError, StoreResult};
pub use store::{DocumentTreeStore, MutationOutcome};
