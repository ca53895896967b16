//! Read-only adapters over platform tables: the company directory and job
//! applications.

mod model;
mod repository;

pub use model::CompanyDB;
pub use repository::{ApplicationTrackerRepository, CompanyDirectoryRepository};
