use async_trait::async_trait;

use crate::careers::TargetCareers;
use crate::enrollment::enrollment_model::{Enrollment, EnrollmentSource};
use crate::errors::Result;

/// One independently maintained source of career enrollments.
///
/// Implementations are read-only views over data owned elsewhere. They may
/// return rows that do not match `targets` exactly; the resolver filters
/// again before using them.
#[async_trait]
pub trait EnrollmentProvider: Send + Sync {
    /// Which kind of enrollment this provider reports, for diagnostics.
    fn source(&self) -> EnrollmentSource;

    async fn enrollments_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<Enrollment>>;

    async fn enrollments_for_careers(&self, targets: &TargetCareers) -> Result<Vec<Enrollment>>;
}
