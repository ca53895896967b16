//! SQLite storage implementation for the career catalog.

mod model;
mod repository;

pub use model::CareerRowDB;
pub use repository::{CareerCatalogRepository, CatalogSchema};
