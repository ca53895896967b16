//! In-memory doubles shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::careers::{Career, CareerCatalogTrait, CareerId, TargetCareers};
use crate::deliveries::{
    ApplicationTrackerTrait, DeliveryRecord, DeliveryRepositoryTrait, DeliveryWithPosting,
    MarkReadOutcome, NewDelivery,
};
use crate::enrollment::{Enrollment, EnrollmentProvider, EnrollmentSource};
use crate::errors::{DatabaseError, Error, Result};
use crate::postings::{
    NewPosting, Posting, PostingRepositoryTrait, PostingUpdate, PublishOutcome, Publisher,
    PublisherDirectoryTrait,
};

/// 2024-01-01 09:00 plus `n` days.
pub(crate) fn day(n: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
        + Duration::days(n)
}

pub(crate) fn posting_at(id: &str, targets: &[CareerId], created_at: NaiveDateTime) -> Posting {
    Posting {
        id: id.to_string(),
        publisher_id: "acme".to_string(),
        title: format!("Posting {}", id),
        description: None,
        position: "Engineer".to_string(),
        location: None,
        salary_range: None,
        requirements: None,
        target_career_ids: targets.to_vec(),
        application_deadline: None,
        is_active: true,
        created_at,
        updated_at: created_at,
    }
}

pub(crate) fn new_posting(title: &str, targets: &[CareerId]) -> NewPosting {
    NewPosting {
        title: title.to_string(),
        description: None,
        position: "Engineer".to_string(),
        location: Some("Remote".to_string()),
        salary_range: None,
        requirements: None,
        target_career_ids: targets.to_vec(),
        application_deadline: None,
    }
}

// --- Career catalog ---

#[derive(Clone, Default)]
pub(crate) struct MockCareerCatalog {
    careers: Arc<Mutex<Vec<Career>>>,
}

impl MockCareerCatalog {
    pub(crate) fn with_careers(careers: &[(CareerId, &str)]) -> Self {
        let careers = careers
            .iter()
            .map(|(id, name)| Career {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        Self {
            careers: Arc::new(Mutex::new(careers)),
        }
    }
}

impl CareerCatalogTrait for MockCareerCatalog {
    fn list_careers(&self) -> Result<Vec<Career>> {
        Ok(self.careers.lock().unwrap().clone())
    }
}

// --- Enrollment provider ---

/// Returns every stored row from `enrollments_for_careers`, leaving the
/// filtering to the resolver.
#[derive(Clone)]
pub(crate) struct MockEnrollmentProvider {
    source: EnrollmentSource,
    enrollments: Arc<Mutex<Vec<Enrollment>>>,
}

impl MockEnrollmentProvider {
    pub(crate) fn new(source: EnrollmentSource) -> Self {
        Self {
            source,
            enrollments: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn add(&self, enrollment: Enrollment) {
        self.enrollments.lock().unwrap().push(enrollment);
    }

    pub(crate) fn remove_subscriber(&self, subscriber_id: &str) {
        self.enrollments
            .lock()
            .unwrap()
            .retain(|e| e.subscriber_id != subscriber_id);
    }
}

#[async_trait]
impl EnrollmentProvider for MockEnrollmentProvider {
    fn source(&self) -> EnrollmentSource {
        self.source
    }

    async fn enrollments_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<Enrollment>> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.subscriber_id == subscriber_id)
            .cloned()
            .collect())
    }

    async fn enrollments_for_careers(&self, _targets: &TargetCareers) -> Result<Vec<Enrollment>> {
        Ok(self.enrollments.lock().unwrap().clone())
    }
}

// --- Posting and delivery store ---

#[derive(Default)]
struct StoreState {
    now: Option<NaiveDateTime>,
    postings: Vec<Posting>,
    deliveries: Vec<DeliveryRecord>,
    next_id: u64,
    failing_subscriber: Option<String>,
    delivery_writes: usize,
}

impl StoreState {
    fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| day(0))
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn has_delivery(&self, subscriber_id: &str, posting_id: &str) -> bool {
        self.deliveries
            .iter()
            .any(|d| d.subscriber_id == subscriber_id && d.posting_id == posting_id)
    }

    /// Inserts into `deliveries`, skipping existing pairs.
    fn insert_deliveries(
        &mut self,
        deliveries: &mut Vec<DeliveryRecord>,
        new_deliveries: Vec<NewDelivery>,
    ) -> Result<usize> {
        let mut created = 0;
        for new_delivery in new_deliveries {
            if self.failing_subscriber.as_deref() == Some(new_delivery.subscriber_id.as_str()) {
                return Err(Error::Database(DatabaseError::ConstraintViolation(format!(
                    "rejected delivery for {}",
                    new_delivery.subscriber_id
                ))));
            }
            let exists = deliveries.iter().any(|d| {
                d.subscriber_id == new_delivery.subscriber_id
                    && d.posting_id == new_delivery.posting_id
            });
            if exists {
                continue;
            }
            let id = self.next_id("delivery");
            deliveries.push(DeliveryRecord {
                id,
                subscriber_id: new_delivery.subscriber_id,
                posting_id: new_delivery.posting_id,
                is_read: false,
                read_at: None,
                created_at: self.now(),
            });
            created += 1;
        }
        Ok(created)
    }
}

/// Posting and delivery repositories over one shared in-memory state, with
/// a settable clock and a switch that makes one subscriber's insert fail.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_now(&self, now: NaiveDateTime) {
        self.state.lock().unwrap().now = Some(now);
    }

    pub(crate) fn fail_deliveries_for(&self, subscriber_id: &str) {
        self.state.lock().unwrap().failing_subscriber = Some(subscriber_id.to_string());
    }

    pub(crate) fn insert_posting(&self, posting: Posting) {
        self.state.lock().unwrap().postings.push(posting);
    }

    pub(crate) fn postings(&self) -> Vec<Posting> {
        self.state.lock().unwrap().postings.clone()
    }

    pub(crate) fn deliveries(&self) -> Vec<DeliveryRecord> {
        self.state.lock().unwrap().deliveries.clone()
    }

    pub(crate) fn deliveries_for(&self, subscriber_id: &str) -> Vec<DeliveryRecord> {
        self.deliveries()
            .into_iter()
            .filter(|d| d.subscriber_id == subscriber_id)
            .collect()
    }

    /// Number of delivery insert calls that reached the store.
    pub(crate) fn delivery_writes(&self) -> usize {
        self.state.lock().unwrap().delivery_writes
    }
}

#[async_trait]
impl PostingRepositoryTrait for InMemoryStore {
    fn get_posting(&self, posting_id: &str) -> Result<Option<Posting>> {
        let state = self.state.lock().unwrap();
        Ok(state.postings.iter().find(|p| p.id == posting_id).cloned())
    }

    fn list_postings_by_publisher(&self, publisher_id: &str) -> Result<Vec<Posting>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .postings
            .iter()
            .filter(|p| p.publisher_id == publisher_id)
            .cloned()
            .collect())
    }

    fn list_active_postings_since(&self, since: Option<NaiveDateTime>) -> Result<Vec<Posting>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .postings
            .iter()
            .filter(|p| p.is_active && since.map_or(true, |since| p.created_at >= since))
            .cloned()
            .collect())
    }

    async fn create_posting_with_deliveries(
        &self,
        publisher_id: &str,
        new_posting: NewPosting,
        subscriber_ids: Vec<String>,
    ) -> Result<PublishOutcome> {
        let mut state = self.state.lock().unwrap();
        state.delivery_writes += 1;
        let now = state.now();
        let posting = Posting {
            id: state.next_id("posting"),
            publisher_id: publisher_id.to_string(),
            title: new_posting.title,
            description: new_posting.description,
            position: new_posting.position,
            location: new_posting.location,
            salary_range: new_posting.salary_range,
            requirements: new_posting.requirements,
            target_career_ids: new_posting.target_career_ids,
            application_deadline: new_posting.application_deadline,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        // Work on a copy so a failure leaves nothing behind.
        let mut deliveries = state.deliveries.clone();
        let new_deliveries = subscriber_ids
            .iter()
            .map(|subscriber_id| NewDelivery::new(subscriber_id.as_str(), posting.id.as_str()))
            .collect();
        let created = state.insert_deliveries(&mut deliveries, new_deliveries)?;

        state.deliveries = deliveries;
        state.postings.push(posting.clone());
        Ok(PublishOutcome {
            posting,
            deliveries_created: created,
        })
    }

    async fn update_posting(&self, posting_id: &str, update: PostingUpdate) -> Result<Posting> {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        let posting = state
            .postings
            .iter_mut()
            .find(|p| p.id == posting_id)
            .ok_or_else(|| Error::NotFound(posting_id.to_string()))?;
        update.apply_to(posting);
        posting.updated_at = now;
        Ok(posting.clone())
    }

    async fn set_posting_active(&self, posting_id: &str, is_active: bool) -> Result<Posting> {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        let posting = state
            .postings
            .iter_mut()
            .find(|p| p.id == posting_id)
            .ok_or_else(|| Error::NotFound(posting_id.to_string()))?;
        posting.is_active = is_active;
        posting.updated_at = now;
        Ok(posting.clone())
    }
}

#[async_trait]
impl DeliveryRepositoryTrait for InMemoryStore {
    async fn insert_deliveries_ignore_conflicts(
        &self,
        new_deliveries: Vec<NewDelivery>,
    ) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.delivery_writes += 1;
        let mut deliveries = state.deliveries.clone();
        let created = state.insert_deliveries(&mut deliveries, new_deliveries)?;
        state.deliveries = deliveries;
        Ok(created)
    }

    fn list_active_for_subscriber(&self, subscriber_id: &str) -> Result<Vec<DeliveryWithPosting>> {
        let state = self.state.lock().unwrap();
        let postings: HashMap<&str, &Posting> =
            state.postings.iter().map(|p| (p.id.as_str(), p)).collect();
        Ok(state
            .deliveries
            .iter()
            .filter(|d| d.subscriber_id == subscriber_id)
            .filter_map(|d| {
                let posting = postings.get(d.posting_id.as_str())?;
                if !posting.is_active {
                    return None;
                }
                Some(DeliveryWithPosting {
                    delivery: d.clone(),
                    title: posting.title.clone(),
                    position: posting.position.clone(),
                    location: posting.location.clone(),
                    salary_range: posting.salary_range.clone(),
                    application_deadline: posting.application_deadline,
                    posting_created_at: posting.created_at,
                    publisher_id: posting.publisher_id.clone(),
                    publisher_name: None,
                })
            })
            .collect())
    }

    fn count_unread_active(&self, subscriber_id: &str) -> Result<i64> {
        Ok(self
            .list_active_for_subscriber(subscriber_id)?
            .iter()
            .filter(|row| !row.delivery.is_read)
            .count() as i64)
    }

    fn delivered_posting_ids(&self, subscriber_id: &str) -> Result<HashSet<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .deliveries
            .iter()
            .filter(|d| d.subscriber_id == subscriber_id)
            .map(|d| d.posting_id.clone())
            .collect())
    }

    fn subscriber_ids_for_posting(&self, posting_id: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .deliveries
            .iter()
            .filter(|d| d.posting_id == posting_id)
            .map(|d| d.subscriber_id.clone())
            .collect())
    }

    async fn mark_read(&self, subscriber_id: &str, posting_id: &str) -> Result<MarkReadOutcome> {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        if !state.has_delivery(subscriber_id, posting_id) {
            return Ok(MarkReadOutcome::NotFound);
        }
        let delivery = state
            .deliveries
            .iter_mut()
            .find(|d| d.subscriber_id == subscriber_id && d.posting_id == posting_id)
            .ok_or_else(|| Error::NotFound(posting_id.to_string()))?;
        if delivery.is_read {
            return Ok(MarkReadOutcome::AlreadyRead);
        }
        delivery.is_read = true;
        delivery.read_at = Some(now);
        Ok(MarkReadOutcome::Marked)
    }
}

// --- Directory and application tracking ---

#[derive(Clone, Default)]
pub(crate) struct MockPublisherDirectory {
    publishers: Arc<Mutex<Vec<Publisher>>>,
}

impl MockPublisherDirectory {
    pub(crate) fn with_publisher(id: &str, is_approved: bool) -> Self {
        let directory = Self::default();
        directory.add(id, is_approved);
        directory
    }

    pub(crate) fn add(&self, id: &str, is_approved: bool) {
        self.publishers.lock().unwrap().push(Publisher {
            id: id.to_string(),
            name: format!("{} Inc", id),
            is_approved,
        });
    }
}

impl PublisherDirectoryTrait for MockPublisherDirectory {
    fn get_publisher(&self, publisher_id: &str) -> Result<Option<Publisher>> {
        Ok(self
            .publishers
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == publisher_id)
            .cloned())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockApplicationTracker {
    applied: Arc<Mutex<HashSet<(String, String)>>>,
}

impl MockApplicationTracker {
    pub(crate) fn apply(&self, subscriber_id: &str, posting_id: &str) {
        self.applied
            .lock()
            .unwrap()
            .insert((subscriber_id.to_string(), posting_id.to_string()));
    }
}

impl ApplicationTrackerTrait for MockApplicationTracker {
    fn applied_posting_ids(&self, subscriber_id: &str) -> Result<HashSet<String>> {
        Ok(self
            .applied
            .lock()
            .unwrap()
            .iter()
            .filter(|(subscriber, _)| subscriber == subscriber_id)
            .map(|(_, posting)| posting.clone())
            .collect())
    }
}
