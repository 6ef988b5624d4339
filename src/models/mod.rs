//! Request and Response models for the API client
//!
//! This module defines the per-call options callers pass in and the error
//! body shape the backend sends back.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CancelledGetPolicy, Method, RequestOptions};
pub use responses::ErrorBody;
