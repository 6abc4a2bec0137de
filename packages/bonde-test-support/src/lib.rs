//! BondeBridge test support utilities
//!
//! Shared by the integration tests: logging initialization, session fixtures
//! and a recording fake of the backend API.

pub mod fake_api;
pub mod fixtures;
pub mod logging;
