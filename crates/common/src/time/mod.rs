//! Time utilities
//!
//! - **[`wire_date`]**: the backend's `yyyy-MM-dd HH:mm:ss` timestamps, always
//!   interpreted in `Asia/Shanghai` (UTC+8)
//!
//! ## Usage
//!
//! ```rust
//! use beautywiki_common::time::wire_date;
//! use chrono::{TimeZone, Utc};
//!
//! let instant = wire_date::parse("2025-06-01 12:00:00").unwrap();
//! assert_eq!(instant, Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).unwrap());
//! assert_eq!(wire_date::format(&instant), "2025-06-01 12:00:00");
//! ```

pub mod wire_date;

pub use wire_date::{format as format_wire_date, parse as parse_wire_date};
