//! HTTP transport for the authorization check.
//!
//! This module provides the `ApiClient` used to ask the remote authority
//! whether the current session is authorized. Requests carry JWT bearer
//! token authentication when a token is set.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthCheckResponse};
pub use error::ApiError;
