//! CareerPath Core - Domain entities, services, and traits.
//!
//! This crate holds the hiring notification fan-out: enrollment resolution,
//! publishing, read-triggered backfill and the notification read cache.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod careers;
pub mod constants;
pub mod deliveries;
pub mod enrollment;
pub mod errors;
pub mod notifications;
pub mod postings;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
