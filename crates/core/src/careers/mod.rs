//! Careers module - catalog models and lookup trait.

mod careers_model;
mod careers_traits;

pub use careers_model::{normalize_career_name, Career, CareerId, CareerIndex, TargetCareers};
pub use careers_traits::CareerCatalogTrait;
