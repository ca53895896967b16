//! Posting domain models.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::careers::CareerId;
use crate::errors::{Result, ValidationError};

/// A hiring notification published by a company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub id: String,
    pub publisher_id: String,
    pub title: String,
    pub description: Option<String>,
    pub position: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub target_career_ids: Vec<CareerId>,
    pub application_deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for publishing a posting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPosting {
    pub title: String,
    pub description: Option<String>,
    pub position: String,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub target_career_ids: Vec<CareerId>,
    pub application_deadline: Option<NaiveDate>,
}

impl NewPosting {
    /// Trims text fields, collapses duplicate targets and checks the
    /// publishing preconditions.
    pub fn validated(mut self) -> Result<Self> {
        self.title = require_text("title", &self.title)?;
        self.position = require_text("position", &self.position)?;
        self.target_career_ids = unique_targets(&self.target_career_ids)?;
        self.description = trim_optional(self.description);
        self.location = trim_optional(self.location);
        self.salary_range = trim_optional(self.salary_range);
        self.requirements = trim_optional(self.requirements);
        Ok(self)
    }
}

/// Partial update of a posting. `None` leaves the field untouched.
///
/// Changing `target_career_ids` affects future matching only; deliveries
/// already created are kept as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub target_career_ids: Option<Vec<CareerId>>,
    pub application_deadline: Option<NaiveDate>,
}

impl PostingUpdate {
    pub fn validated(mut self) -> Result<Self> {
        if let Some(title) = self.title.as_deref() {
            self.title = Some(require_text("title", title)?);
        }
        if let Some(position) = self.position.as_deref() {
            self.position = Some(require_text("position", position)?);
        }
        if let Some(targets) = self.target_career_ids.as_deref() {
            self.target_career_ids = Some(unique_targets(targets)?);
        }
        // Blank optional text carries no change.
        self.description = trim_optional(self.description);
        self.location = trim_optional(self.location);
        self.salary_range = trim_optional(self.salary_range);
        self.requirements = trim_optional(self.requirements);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == PostingUpdate::default()
    }

    /// Whether the update touches a field shown in notification lists.
    pub fn changes_notification_display(&self) -> bool {
        self.title.is_some()
            || self.position.is_some()
            || self.location.is_some()
            || self.salary_range.is_some()
            || self.application_deadline.is_some()
    }

    /// Applies the update to an in-memory posting.
    pub fn apply_to(self, posting: &mut Posting) {
        if let Some(title) = self.title {
            posting.title = title;
        }
        if let Some(description) = self.description {
            posting.description = Some(description);
        }
        if let Some(position) = self.position {
            posting.position = position;
        }
        if let Some(location) = self.location {
            posting.location = Some(location);
        }
        if let Some(salary_range) = self.salary_range {
            posting.salary_range = Some(salary_range);
        }
        if let Some(requirements) = self.requirements {
            posting.requirements = Some(requirements);
        }
        if let Some(targets) = self.target_career_ids {
            posting.target_career_ids = targets;
        }
        if let Some(deadline) = self.application_deadline {
            posting.application_deadline = Some(deadline);
        }
    }
}

/// Company directory entry, as far as this subsystem needs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    pub id: String,
    pub name: String,
    pub is_approved: bool,
}

/// Result of a publish unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub posting: Posting,
    /// Delivery rows actually inserted (conflicts excluded).
    pub deliveries_created: usize,
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(trimmed.to_string())
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn unique_targets(ids: &[CareerId]) -> Result<Vec<CareerId>> {
    let mut seen = HashSet::new();
    let unique: Vec<CareerId> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
    if unique.is_empty() {
        return Err(ValidationError::InvalidInput(
            "target_career_ids must contain at least one career".to_string(),
        )
        .into());
    }
    Ok(unique)
}
