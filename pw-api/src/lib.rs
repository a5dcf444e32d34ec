//! Pushwoosh API - HTTP client for the Pushwoosh remote push-notification
//! management service.
//!
//! This crate provides a typed client over the Pushwoosh JSON API: request
//! envelope construction, credential injection, bounded retry with exponential
//! backoff, response classification, cursor- and page-based pagination, and
//! synchronous polling for long-running jobs. A separate client covers the
//! Integrations API, which authenticates via an `Authorization` header instead
//! of a body-embedded token.

pub mod client;
pub mod endpoints;
pub mod integration;
pub mod response;

// Re-export key types
pub use client::{LastExchange, PushwooshClient, RetryConfig};
pub use integration::IntegrationClient;
pub use response::ApiResponse;
