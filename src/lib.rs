//! CRM Client - A cached, cancellation-aware HTTP client for the CRM backend
//!
//! Layers a time-boxed GET cache and in-flight request supersession over
//! `reqwest`. UI state stores receive an `ApiClient` and call its verb
//! wrappers; cancellation surfaces as `ApiError::Cancelled`, which callers
//! can tell apart from real failures with `ApiError::is_cancelled`.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use config::Config;
pub use error::{ApiError, Result};
pub use models::{CancelledGetPolicy, Method, RequestOptions};
