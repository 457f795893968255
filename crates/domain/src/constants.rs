//! Application constants
//!
//! Centralized location for hosts, defaults and fixed request parameters.

// Hosts
pub const DEFAULT_API_BASE_URL: &str = "https://wiki.kinglyrobot.com";
pub const FACE_PLUS_PLUS_BASE_URL: &str = "https://api-cn.faceplusplus.com";
pub const IMGUR_BASE_URL: &str = "https://api.imgur.com";

// Transport defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("BeautyWiki/", env!("CARGO_PKG_VERSION"));

// Persistence
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "com.kinglyrobot.beautywiki";

// Logging
pub const DEFAULT_LOG_FILTER: &str = "info";

// Paging
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// Face++ detect attributes requested for skin analysis
pub const FACE_ATTRIBUTES: &str = "skinstatus,beauty,age,gender";

// Voice search result count
pub const VOICE_SEARCH_TOP_K: u32 = 5;
