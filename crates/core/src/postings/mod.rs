//! Postings module - domain models, the publishing service, and traits.

mod postings_model;
mod postings_service;
mod postings_traits;


pub use postings_model::{NewPosting, Posting, PostingUpdate, PublishOutcome, Publisher};
pub use postings_service::PostingService;
pub use postings_traits::{PostingRepositoryTrait, PostingServiceTrait, PublisherDirectoryTrait};
