//! SQLite storage implementation for postings.

mod model;
mod repository;

pub use model::{NewPostingDB, PostingDB};
pub use repository::PostingRepository;
