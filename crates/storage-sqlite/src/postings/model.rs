//! Database models for postings.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use log::warn;

use careerpath_core::careers::CareerId;
use careerpath_core::errors::{Error, Result};
use careerpath_core::postings::{NewPosting, Posting};

#[derive(Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::postings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PostingDB {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub description: Option<String>,
    pub position: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub target_career_ids: String,
    pub application_deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::postings)]
pub struct NewPostingDB {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub description: Option<String>,
    pub position: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub target_career_ids: String,
    pub application_deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewPostingDB {
    pub fn from_domain(
        id: String,
        company_id: &str,
        posting: NewPosting,
        now: NaiveDateTime,
    ) -> Result<Self> {
        Ok(Self {
            id,
            company_id: company_id.to_string(),
            title: posting.title,
            description: posting.description,
            position: posting.position,
            location: posting.location,
            salary_range: posting.salary_range,
            requirements: posting.requirements,
            target_career_ids: encode_targets(&posting.target_career_ids)?,
            application_deadline: posting.application_deadline,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }
}

pub(crate) fn encode_targets(ids: &[CareerId]) -> Result<String> {
    Ok(serde_json::to_string(ids)?)
}

/// Lenient decode: a malformed column yields no targets instead of failing
/// the whole read.
pub(crate) fn decode_targets(posting_id: &str, raw: &str) -> Vec<CareerId> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(
            "Posting {} has malformed target_career_ids {:?}: {}",
            posting_id, raw, e
        );
        Vec::new()
    })
}

impl From<PostingDB> for Posting {
    fn from(db: PostingDB) -> Self {
        let target_career_ids = decode_targets(&db.id, &db.target_career_ids);
        Self {
            id: db.id,
            publisher_id: db.company_id,
            title: db.title,
            description: db.description,
            position: db.position,
            location: db.location,
            salary_range: db.salary_range,
            requirements: db.requirements,
            target_career_ids,
            application_deadline: db.application_deadline,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl TryFrom<Posting> for PostingDB {
    type Error = Error;

    fn try_from(domain: Posting) -> Result<Self> {
        let target_career_ids = encode_targets(&domain.target_career_ids)?;
        Ok(Self {
            id: domain.id,
            company_id: domain.publisher_id,
            title: domain.title,
            description: domain.description,
            position: domain.position,
            location: domain.location,
            salary_range: domain.salary_range,
            requirements: domain.requirements,
            target_career_ids,
            application_deadline: domain.application_deadline,
            is_active: domain.is_active,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_stored_as_json_list() {
        assert_eq!(encode_targets(&[5, 7]).unwrap(), "[5,7]");
        assert_eq!(decode_targets("p1", "[5,7]"), vec![5, 7]);
    }

    #[test]
    fn test_posting_row_keeps_targets() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let posting = Posting {
            id: "p1".to_string(),
            publisher_id: "acme".to_string(),
            title: "Backend Engineer".to_string(),
            description: None,
            position: "Engineer".to_string(),
            location: Some("Remote".to_string()),
            salary_range: None,
            requirements: None,
            target_career_ids: vec![5, 7],
            application_deadline: None,
            is_active: false,
            created_at: created,
            updated_at: created,
        };

        let row = PostingDB::try_from(posting.clone()).unwrap();
        assert_eq!(row.target_career_ids, "[5,7]");
        assert_eq!(row.company_id, "acme");
        assert_eq!(Posting::from(row), posting);
    }

    #[test]
    fn test_malformed_targets_decode_to_empty() {
        assert!(decode_targets("p1", "5,7").is_empty());
        assert!(decode_targets("p1", "").is_empty());
    }
}
