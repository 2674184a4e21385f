pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{error_panel, filter_bar, listing_card, pagination_nav, search_href};
pub use layouts::desktop::desktop_layout;
