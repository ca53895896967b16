//! Merges every enrollment source into one logical enrollment view.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::try_join_all;
use log::debug;

use crate::careers::{CareerCatalogTrait, CareerId, CareerIndex, TargetCareers};
use crate::enrollment::enrollment_model::{Enrollment, ResolvedEnrollment};
use crate::enrollment::enrollment_traits::EnrollmentProvider;
use crate::errors::Result;

/// Unions the configured [`EnrollmentProvider`]s and matches their rows
/// against career ids, by id or by catalog display name.
///
/// Duplicates across sources are kept; callers that need one entry per
/// subscriber use [`EnrollmentResolver::subscribers_for_careers`].
pub struct EnrollmentResolver {
    providers: Vec<Arc<dyn EnrollmentProvider>>,
    catalog: Arc<dyn CareerCatalogTrait>,
}

impl EnrollmentResolver {
    pub fn new(
        providers: Vec<Arc<dyn EnrollmentProvider>>,
        catalog: Arc<dyn CareerCatalogTrait>,
    ) -> Self {
        EnrollmentResolver { providers, catalog }
    }

    fn career_index(&self) -> Result<CareerIndex> {
        Ok(CareerIndex::new(self.catalog.list_careers()?))
    }

    /// Target set for `career_ids`, with names resolved through the catalog.
    pub fn target_careers(&self, career_ids: &[CareerId]) -> Result<TargetCareers> {
        Ok(self.career_index()?.targets_for(career_ids))
    }

    /// Every enrollment, from any source, that matches one of `career_ids`.
    pub async fn resolve_for_careers(&self, career_ids: &[CareerId]) -> Result<Vec<Enrollment>> {
        let targets = self.target_careers(career_ids)?;
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let per_source = try_join_all(
            self.providers
                .iter()
                .map(|provider| provider.enrollments_for_careers(&targets)),
        )
        .await?;
        for (provider, rows) in self.providers.iter().zip(&per_source) {
            debug!("{:?} returned {} enrollment row(s)", provider.source(), rows.len());
        }

        Ok(per_source
            .into_iter()
            .flatten()
            .filter(|e| targets.matches(e.career_id, e.career_name.as_deref()))
            .collect())
    }

    /// Distinct subscriber ids enrolled in any of `career_ids`, in first-seen
    /// order.
    pub async fn subscribers_for_careers(&self, career_ids: &[CareerId]) -> Result<Vec<String>> {
        let enrollments = self.resolve_for_careers(career_ids).await?;
        let mut seen = HashSet::new();
        let subscribers: Vec<String> = enrollments
            .into_iter()
            .filter_map(|e| {
                if seen.insert(e.subscriber_id.clone()) {
                    Some(e.subscriber_id)
                } else {
                    None
                }
            })
            .collect();
        debug!(
            "Resolved {} subscriber(s) for careers {:?}",
            subscribers.len(),
            career_ids
        );
        Ok(subscribers)
    }

    /// The subscriber's current enrollments, each expanded to the catalog ids
    /// it refers to.
    pub async fn resolve_for_subscriber(
        &self,
        subscriber_id: &str,
    ) -> Result<Vec<ResolvedEnrollment>> {
        let per_source = try_join_all(
            self.providers
                .iter()
                .map(|provider| provider.enrollments_for_subscriber(subscriber_id)),
        )
        .await?;

        let enrollments: Vec<Enrollment> = per_source
            .into_iter()
            .flatten()
            .filter(Enrollment::refers_to_career)
            .collect();
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let index = self.career_index()?;
        Ok(enrollments
            .into_iter()
            .map(|enrollment| {
                let mut career_ids: HashSet<CareerId> = HashSet::new();
                if let Some(id) = enrollment.career_id {
                    career_ids.insert(id);
                }
                if let Some(name) = enrollment.career_name.as_deref() {
                    career_ids.extend(index.ids_named(name).iter().copied());
                }
                ResolvedEnrollment {
                    enrollment,
                    career_ids,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrollment::EnrollmentSource;
    use crate::test_support::{day, MockCareerCatalog, MockEnrollmentProvider};

    fn resolver(
        selections: &MockEnrollmentProvider,
        profiles: &MockEnrollmentProvider,
    ) -> EnrollmentResolver {
        EnrollmentResolver::new(
            vec![Arc::new(selections.clone()), Arc::new(profiles.clone())],
            Arc::new(MockCareerCatalog::with_careers(&[
                (5, "Software Engineer"),
                (7, "Data Analyst"),
            ])),
        )
    }

    #[tokio::test]
    async fn test_profile_only_subscriber_matches_by_name() {
        let selections = MockEnrollmentProvider::new(EnrollmentSource::ActiveSelection);
        let profiles = MockEnrollmentProvider::new(EnrollmentSource::ProfileField);
        profiles.add(Enrollment::from_profile("alice", "software engineer"));
        profiles.add(Enrollment::from_profile("bob", "Chef"));

        let subscribers = resolver(&selections, &profiles)
            .subscribers_for_careers(&[5])
            .await
            .unwrap();
        assert_eq!(subscribers, vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_subscribers_are_deduplicated_across_sources() {
        let selections = MockEnrollmentProvider::new(EnrollmentSource::ActiveSelection);
        let profiles = MockEnrollmentProvider::new(EnrollmentSource::ProfileField);
        selections.add(Enrollment::from_selection("alice", Some(5), None, day(0)));
        selections.add(Enrollment::from_selection("carol", Some(7), None, day(0)));
        profiles.add(Enrollment::from_profile("alice", "Software Engineer"));

        let resolver = resolver(&selections, &profiles);
        let enrollments = resolver.resolve_for_careers(&[5]).await.unwrap();
        assert_eq!(enrollments.len(), 2, "resolver keeps per-source duplicates");

        let subscribers = resolver.subscribers_for_careers(&[5]).await.unwrap();
        assert_eq!(subscribers, vec!["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_subscriber_enrollments_expand_names_to_ids() {
        let selections = MockEnrollmentProvider::new(EnrollmentSource::ActiveSelection);
        let profiles = MockEnrollmentProvider::new(EnrollmentSource::ProfileField);
        selections.add(Enrollment::from_selection("alice", Some(7), None, day(2)));
        profiles.add(Enrollment::from_profile("alice", "Software Engineer"));
        profiles.add(Enrollment::from_profile("alice", "  "));

        let resolved = resolver(&selections, &profiles)
            .resolve_for_subscriber("alice")
            .await
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(resolved[0].career_ids.contains(&7));
        assert_eq!(resolved[0].enrollment.selected_at, Some(day(2)));
        assert!(resolved[1].career_ids.contains(&5));
        assert_eq!(resolved[1].enrollment.selected_at, None);
    }

    #[tokio::test]
    async fn test_unknown_career_ids_still_match_by_id() {
        let selections = MockEnrollmentProvider::new(EnrollmentSource::ActiveSelection);
        let profiles = MockEnrollmentProvider::new(EnrollmentSource::ProfileField);
        selections.add(Enrollment::from_selection("dave", Some(42), None, day(0)));

        let subscribers = resolver(&selections, &profiles)
            .subscribers_for_careers(&[42])
            .await
            .unwrap();
        assert_eq!(subscribers, vec!["dave".to_string()]);
    }
}
