//! SQLite storage implementation for CareerPath notifications.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository and provider traits defined in `careerpath-core`:
//! - Database connection pooling and the single-writer actor
//! - Embedded Diesel migrations
//! - Postings, delivery records and the read-only platform adapters
//!   (career catalog, enrollment sources, company directory, applications)
//!
//! This crate is the only place in the application where Diesel dependencies exist.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Repository implementations
pub mod careers;
pub mod deliveries;
pub mod directory;
pub mod enrollment;
pub mod postings;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from careerpath-core for convenience
pub use careerpath_core::errors::{DatabaseError, Error, Result};
