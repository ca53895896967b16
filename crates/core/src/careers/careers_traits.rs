use crate::careers::careers_model::Career;
use crate::errors::Result;

/// Read access to the career catalog owned by the wider platform.
pub trait CareerCatalogTrait: Send + Sync {
    /// All careers that carry a display name.
    fn list_careers(&self) -> Result<Vec<Career>>;
}
