//! API endpoint modules organized by category.
//!
//! Each module provides typed methods for a group of related remote
//! endpoints. Methods build the documented request shape and delegate to
//! [`crate::client::PushwooshClient::send`]; generic ones return the decoded
//! envelope as-is, leaving `response` extraction to the caller.

pub mod applications;
pub mod campaigns;
pub mod devices;
pub mod filters;
pub mod jobs;
pub mod messages;
pub mod presets;
pub mod tags;
