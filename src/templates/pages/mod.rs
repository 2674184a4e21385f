pub mod error;
pub mod property;
pub mod search;

pub use error::error_page;
pub use property::{property_page, PropertyVm};
pub use search::{search_page, SearchOutcome, SearchVm};
