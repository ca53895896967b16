use std::collections::HashSet;
use std::sync::Arc;

use diesel::prelude::*;
use diesel::sql_query;
use log::{info, warn};

use careerpath_core::careers::{Career, CareerCatalogTrait};
use careerpath_core::constants::DEFAULT_CAREER_NAME_COLUMN;
use careerpath_core::errors::{Error, Result};

use super::model::{CareerRowDB, TableColumnDB};
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;

/// Columns tried, in order, when the configured one is missing.
const CANDIDATE_NAME_COLUMNS: [&str; 4] = ["name", "title", "career_name", "display_name"];

/// Where the career catalog keeps its display name.
///
/// Resolved once at startup so queries never guess at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSchema {
    name_column: String,
}

impl CatalogSchema {
    pub fn with_name_column(column: &str) -> Result<Self> {
        if !is_identifier(column) {
            return Err(Error::InvalidConfigValue(format!(
                "career name column '{}' is not a plain identifier",
                column
            )));
        }
        Ok(Self {
            name_column: column.to_string(),
        })
    }

    pub fn name_column(&self) -> &str {
        &self.name_column
    }

    /// Picks the display-name column of `careers`: the configured one when
    /// it exists, else the first known candidate, else `name`.
    pub fn resolve(pool: &DbPool, configured: Option<&str>) -> Result<Self> {
        let mut conn = get_connection(pool)?;
        let columns: HashSet<String> =
            sql_query("SELECT name FROM pragma_table_info('careers')")
                .load::<TableColumnDB>(&mut conn)
                .map_err(StorageError::from)?
                .into_iter()
                .map(|c| c.name)
                .collect();

        if let Some(column) = configured {
            if is_identifier(column) && columns.contains(column) {
                info!("Career catalog uses configured column '{}'", column);
                return Self::with_name_column(column);
            }
            warn!(
                "Configured career name column '{}' is invalid or missing from careers",
                column
            );
        }

        if let Some(column) = CANDIDATE_NAME_COLUMNS
            .iter()
            .find(|candidate| columns.contains(**candidate))
        {
            info!("Career catalog uses column '{}'", column);
            return Self::with_name_column(column);
        }

        warn!(
            "No career name column found in careers (columns: {:?}); falling back to '{}'",
            columns, DEFAULT_CAREER_NAME_COLUMN
        );
        Self::with_name_column(DEFAULT_CAREER_NAME_COLUMN)
    }
}

impl Default for CatalogSchema {
    fn default() -> Self {
        Self {
            name_column: DEFAULT_CAREER_NAME_COLUMN.to_string(),
        }
    }
}

fn is_identifier(column: &str) -> bool {
    let mut chars = column.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub struct CareerCatalogRepository {
    pool: Arc<DbPool>,
    schema: CatalogSchema,
}

impl CareerCatalogRepository {
    pub fn new(pool: Arc<DbPool>, schema: CatalogSchema) -> Self {
        CareerCatalogRepository { pool, schema }
    }
}

impl CareerCatalogTrait for CareerCatalogRepository {
    fn list_careers(&self) -> Result<Vec<Career>> {
        let mut conn = get_connection(&self.pool)?;
        // The column is validated as an identifier in CatalogSchema.
        let query = format!(
            "SELECT id, {} AS name FROM careers ORDER BY id",
            self.schema.name_column()
        );
        let rows = sql_query(query)
            .load::<CareerRowDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().filter_map(CareerRowDB::into_career).collect())
    }
}
