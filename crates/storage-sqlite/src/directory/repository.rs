use std::collections::HashSet;
use std::sync::Arc;

use diesel::prelude::*;

use careerpath_core::deliveries::ApplicationTrackerTrait;
use careerpath_core::errors::Result;
use careerpath_core::postings::{Publisher, PublisherDirectoryTrait};

use super::model::CompanyDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::{companies, job_applications};

pub struct CompanyDirectoryRepository {
    pool: Arc<DbPool>,
}

impl CompanyDirectoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        CompanyDirectoryRepository { pool }
    }
}

impl PublisherDirectoryTrait for CompanyDirectoryRepository {
    fn get_publisher(&self, publisher_id: &str) -> Result<Option<Publisher>> {
        let mut conn = get_connection(&self.pool)?;
        let company = companies::table
            .find(publisher_id)
            .select(CompanyDB::as_select())
            .first::<CompanyDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(company.map(Publisher::from))
    }
}

pub struct ApplicationTrackerRepository {
    pool: Arc<DbPool>,
}

impl ApplicationTrackerRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ApplicationTrackerRepository { pool }
    }
}

impl ApplicationTrackerTrait for ApplicationTrackerRepository {
    fn applied_posting_ids(&self, subscriber_id: &str) -> Result<HashSet<String>> {
        let mut conn = get_connection(&self.pool)?;
        let ids = job_applications::table
            .filter(job_applications::student_id.eq(subscriber_id))
            .select(job_applications::posting_id)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;

    #[tokio::test]
    async fn test_company_approval_lookup() {
        let db = test_db();
        db.seed_platform();
        let directory = CompanyDirectoryRepository::new(db.pool.clone());

        assert!(directory.is_approved("acme").unwrap());
        assert!(!directory.is_approved("shady").unwrap());
        assert!(!directory.is_approved("ghost").unwrap());
        assert_eq!(
            directory.get_publisher("acme").unwrap().map(|p| p.name),
            Some("Acme Corp".to_string())
        );
    }

    #[tokio::test]
    async fn test_applied_posting_ids() {
        let db = test_db();
        db.execute(
            "INSERT INTO job_applications (id, student_id, posting_id, created_at) VALUES
                 ('a1', 'alice', 'p1', '2024-01-03 10:00:00'),
                 ('a2', 'alice', 'p2', '2024-01-03 11:00:00'),
                 ('a3', 'bob', 'p1', '2024-01-03 12:00:00');",
        );
        let tracker = ApplicationTrackerRepository::new(db.pool.clone());

        let applied = tracker.applied_posting_ids("alice").unwrap();
        assert_eq!(applied.len(), 2);
        assert!(applied.contains("p2"));
        assert!(tracker.applied_posting_ids("carol").unwrap().is_empty());
    }
}
