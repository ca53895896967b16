//! SQLite enrollment sources: active career selections and the profile
//! career field.

mod model;
mod profile_provider;
mod selection_provider;

pub use model::{CareerSelectionDB, StudentProfileDB};
pub use profile_provider::ProfileCareerProvider;
pub use selection_provider::ActiveSelectionProvider;
