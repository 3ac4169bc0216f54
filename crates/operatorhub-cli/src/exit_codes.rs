//! Process exit codes
//!
//! Zero on success, non-zero on any failure. The values distinguish the stage
//! that failed so release scripts can tell a bad config from a network outage.

/// Unspecified failure
pub const ERROR: i32 = 1;

/// Invalid or incomplete configuration, missing credentials
pub const VALIDATION_ERROR: i32 = 2;

/// Template rendering failed
pub const TEMPLATE_ERROR: i32 = 3;

/// File not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Download service or container catalog unreachable or returned an error
pub const NETWORK_ERROR: i32 = 6;
