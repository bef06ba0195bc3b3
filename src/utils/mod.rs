//! Utility functions for tabular reports and array handling

pub mod frames;
pub mod misc;

// Re-export commonly used utility functions for convenience
pub use frames::{find_by_format, find_by_pattern, find_in_window};
pub use misc::array_from_rows;
