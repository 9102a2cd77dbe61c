//! Wrappers over the backend's REST resources.
//!
//! Pass-through by design: request shapes mirror the backend's endpoints
//! one to one and nothing here interprets payloads beyond deserialization.

mod admin;
mod auth;
mod crm;

/// Sign-in failure message used when the backend provides no detail.
pub const GENERIC_LOGIN_FAILURE: &str = "Login failed. Please try again.";
