//! Enrollment module - the two-source enrollment view and its resolver.

mod enrollment_model;
mod enrollment_resolver;
mod enrollment_traits;

pub use enrollment_model::{Enrollment, EnrollmentSource, ResolvedEnrollment};
pub use enrollment_resolver::EnrollmentResolver;
pub use enrollment_traits::EnrollmentProvider;
