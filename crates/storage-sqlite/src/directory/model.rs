use diesel::prelude::*;

use careerpath_core::postings::Publisher;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::companies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CompanyDB {
    pub id: String,
    pub name: String,
    pub is_approved: bool,
}

impl From<CompanyDB> for Publisher {
    fn from(db: CompanyDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            is_approved: db.is_approved,
        }
    }
}
