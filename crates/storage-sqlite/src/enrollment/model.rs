//! Database models for the enrollment sources.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use careerpath_core::enrollment::Enrollment;

#[derive(Queryable, QueryableByName, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::career_selections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CareerSelectionDB {
    pub id: String,
    pub student_id: String,
    pub career_id: Option<i64>,
    pub career_name: Option<String>,
    pub selected_at: NaiveDateTime,
    pub is_active: bool,
}

impl From<CareerSelectionDB> for Enrollment {
    fn from(db: CareerSelectionDB) -> Self {
        Enrollment::from_selection(db.student_id, db.career_id, db.career_name, db.selected_at)
    }
}

#[derive(Queryable, QueryableByName, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::student_profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StudentProfileDB {
    pub student_id: String,
    pub full_name: Option<String>,
    pub career: Option<String>,
}

impl StudentProfileDB {
    pub fn into_enrollment(self) -> Option<Enrollment> {
        let career = self.career.filter(|c| !c.trim().is_empty())?;
        Some(Enrollment::from_profile(self.student_id, career))
    }
}
