//! SQLite storage implementation for delivery records.

mod model;
mod repository;

pub use model::{DeliveryRecordDB, NewDeliveryRecordDB};
pub(crate) use repository::insert_deliveries;
pub use repository::DeliveryRepository;
