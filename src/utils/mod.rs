//! Shared helpers used across services and routes.
pub mod email;
pub mod httperror;
pub mod ratelimit;
