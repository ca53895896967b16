//! Enrollment domain models.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::careers::CareerId;

/// Where an enrollment row came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentSource {
    /// Explicit, currently active career selection.
    ActiveSelection,
    /// Free-text career field on the student profile.
    ProfileField,
}

/// A subscriber's association with a career, as reported by one source.
///
/// At least one of `career_id` / `career_name` is set. Profile rows never
/// carry `selected_at` and are eligible for any posting regardless of age.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub subscriber_id: String,
    pub career_id: Option<CareerId>,
    pub career_name: Option<String>,
    pub selected_at: Option<NaiveDateTime>,
    pub source: EnrollmentSource,
}

impl Enrollment {
    pub fn from_selection(
        subscriber_id: impl Into<String>,
        career_id: Option<CareerId>,
        career_name: Option<String>,
        selected_at: NaiveDateTime,
    ) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            career_id,
            career_name,
            selected_at: Some(selected_at),
            source: EnrollmentSource::ActiveSelection,
        }
    }

    pub fn from_profile(subscriber_id: impl Into<String>, career_name: impl Into<String>) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
            career_id: None,
            career_name: Some(career_name.into()),
            selected_at: None,
            source: EnrollmentSource::ProfileField,
        }
    }

    /// False for rows that name no career at all.
    pub fn refers_to_career(&self) -> bool {
        self.career_id.is_some()
            || self
                .career_name
                .as_deref()
                .is_some_and(|name| !name.trim().is_empty())
    }
}

/// An enrollment together with every catalog id it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEnrollment {
    pub enrollment: Enrollment,
    pub career_ids: HashSet<CareerId>,
}

impl ResolvedEnrollment {
    pub fn intersects(&self, target_ids: &[CareerId]) -> bool {
        target_ids.iter().any(|id| self.career_ids.contains(id))
    }
}
