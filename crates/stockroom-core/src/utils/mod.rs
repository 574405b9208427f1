//! Display helpers for pagination and formatting.

pub mod format;
pub mod pagination;

// Re-export commonly used functions at module level
pub use format::{capitalize_first, format_currency, format_date, format_number, truncate_text};
pub use pagination::{page_window, PageLink};
