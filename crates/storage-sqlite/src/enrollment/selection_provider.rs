use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::Sqlite;

use careerpath_core::careers::TargetCareers;
use careerpath_core::enrollment::{Enrollment, EnrollmentProvider, EnrollmentSource};
use careerpath_core::errors::Result;

use super::model::CareerSelectionDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::career_selections;
use crate::utils::{chunk_for_sqlite, placeholders};

const SELECTION_COLUMNS: &str = "id, student_id, career_id, career_name, selected_at, is_active";

/// Enrollments from the explicit, currently active career selections.
pub struct ActiveSelectionProvider {
    pool: Arc<DbPool>,
}

impl ActiveSelectionProvider {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ActiveSelectionProvider { pool }
    }
}

#[async_trait]
impl EnrollmentProvider for ActiveSelectionProvider {
    fn source(&self) -> EnrollmentSource {
        EnrollmentSource::ActiveSelection
    }

    async fn enrollments_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<Enrollment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = career_selections::table
            .filter(career_selections::student_id.eq(subscriber_id))
            .filter(career_selections::is_active.eq(true))
            .select(CareerSelectionDB::as_select())
            .load::<CareerSelectionDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Enrollment::from).collect())
    }

    async fn enrollments_for_careers(&self, targets: &TargetCareers) -> Result<Vec<Enrollment>> {
        let mut conn = get_connection(&self.pool)?;
        let mut rows: Vec<CareerSelectionDB> = Vec::new();

        for ids in chunk_for_sqlite(&targets.sorted_ids()) {
            let sql = format!(
                "SELECT {} FROM career_selections WHERE is_active = 1 AND career_id IN ({})",
                SELECTION_COLUMNS,
                placeholders(ids.len())
            );
            let mut query = sql_query(sql).into_boxed::<Sqlite>();
            for id in ids {
                query = query.bind::<BigInt, _>(*id);
            }
            rows.extend(query.load::<CareerSelectionDB>(&mut conn).map_err(StorageError::from)?);
        }

        for names in chunk_for_sqlite(&targets.sorted_names()) {
            let sql = format!(
                "SELECT {} FROM career_selections \
                 WHERE is_active = 1 AND lower(trim(career_name)) IN ({})",
                SELECTION_COLUMNS,
                placeholders(names.len())
            );
            let mut query = sql_query(sql).into_boxed::<Sqlite>();
            for name in names {
                query = query.bind::<Text, _>(name.clone());
            }
            rows.extend(query.load::<CareerSelectionDB>(&mut conn).map_err(StorageError::from)?);
        }

        Ok(rows.into_iter().map(Enrollment::from).collect())
    }
}
