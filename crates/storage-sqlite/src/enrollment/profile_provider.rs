use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;

use careerpath_core::careers::TargetCareers;
use careerpath_core::enrollment::{Enrollment, EnrollmentProvider, EnrollmentSource};
use careerpath_core::errors::Result;

use super::model::StudentProfileDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::student_profiles;
use crate::utils::{chunk_for_sqlite, placeholders};

/// Enrollments from the free-text career field on student profiles.
///
/// Profiles only carry a name, so matching is by catalog display name. The
/// SQL filter folds ASCII case only; the resolver re-checks every row.
pub struct ProfileCareerProvider {
    pool: Arc<DbPool>,
}

impl ProfileCareerProvider {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ProfileCareerProvider { pool }
    }
}

#[async_trait]
impl EnrollmentProvider for ProfileCareerProvider {
    fn source(&self) -> EnrollmentSource {
        EnrollmentSource::ProfileField
    }

    async fn enrollments_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<Enrollment>> {
        let mut conn = get_connection(&self.pool)?;
        let profile = student_profiles::table
            .find(subscriber_id)
            .select(StudentProfileDB::as_select())
            .first::<StudentProfileDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(profile
            .and_then(StudentProfileDB::into_enrollment)
            .into_iter()
            .collect())
    }

    async fn enrollments_for_careers(&self, targets: &TargetCareers) -> Result<Vec<Enrollment>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows: Vec<StudentProfileDB> = Vec::new();

        for names in chunk_for_sqlite(&targets.sorted_names()) {
            let sql = format!(
                "SELECT student_id, full_name, career FROM student_profiles \
                 WHERE lower(trim(career)) IN ({})",
                placeholders(names.len())
            );
            let mut query = sql_query(sql).into_boxed::<Sqlite>();
            for name in names {
                query = query.bind::<Text, _>(name.clone());
            }
            rows.extend(query.load::<StudentProfileDB>(&mut conn).map_err(StorageError::from)?);
        }

        Ok(rows
            .into_iter()
            .filter_map(StudentProfileDB::into_enrollment)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use careerpath_core::careers::{Career, CareerIndex};

    #[tokio::test]
    async fn test_profile_rows_match_by_normalized_name() {
        let db = test_db();
        db.seed_platform();
        let provider = ProfileCareerProvider::new(db.pool.clone());
        let targets = CareerIndex::new(vec![Career {
            id: 5,
            name: "Software Engineer".to_string(),
        }])
        .targets_for(&[5]);

        let mut subscribers: Vec<String> = provider
            .enrollments_for_careers(&targets)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.subscriber_id)
            .collect();
        subscribers.sort();
        assert_eq!(subscribers, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_or_missing_profiles_yield_nothing() {
        let db = test_db();
        db.seed_platform();
        let provider = ProfileCareerProvider::new(db.pool.clone());

        assert!(provider
            .enrollments_for_subscriber("frank")
            .await
            .unwrap()
            .is_empty());
        assert!(provider
            .enrollments_for_subscriber("nobody")
            .await
            .unwrap()
            .is_empty());

        let bob = provider.enrollments_for_subscriber("bob").await.unwrap();
        assert_eq!(bob.len(), 1);
        assert_eq!(bob[0].selected_at, None);
        assert_eq!(bob[0].career_name.as_deref(), Some("Software Engineer"));
    }
}
