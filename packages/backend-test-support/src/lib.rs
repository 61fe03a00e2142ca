//! Backend test support utilities
//!
//! Shared by the backend's integration test binaries: one-time logging setup,
//! RFC 7807 response assertions and unique identifiers for test isolation.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
