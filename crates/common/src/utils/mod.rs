//! Common utility functions
//!
//! This module provides reusable utilities including:
//! - **[`case`]**: camelCase / snake_case key conversion used by the JSON codec
//! - **[`serde`]**: field-level serde helpers for backend timestamps

pub mod case;
pub mod serde;

// Re-export commonly used items for convenience
pub use self::case::{to_camel_case, to_snake_case};
pub use self::serde::{wire_date, wire_date_option};
