//! Database models for careers.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};

use careerpath_core::careers::Career;

/// A catalog row read through the resolved display-name column.
#[derive(Debug, Clone, QueryableByName)]
pub struct CareerRowDB {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
}

impl CareerRowDB {
    /// Rows without a usable display name are not part of the catalog.
    pub fn into_career(self) -> Option<Career> {
        let name = self.name?;
        if name.trim().is_empty() {
            return None;
        }
        Some(Career { id: self.id, name })
    }
}

/// One row of `PRAGMA table_info`.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct TableColumnDB {
    #[diesel(sql_type = Text)]
    pub name: String,
}
