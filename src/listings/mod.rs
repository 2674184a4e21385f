pub mod client;
pub mod criteria;
pub mod envelope;
pub mod exclusion;
pub mod listings_error;
pub mod models;
pub mod paging;
pub mod reconcile;

pub use client::{ListingsApi, ListingsClient};
pub use exclusion::ExclusionRules;
pub use listings_error::ListingsError;
