//! Constants (primary environment variables/secrets) used across the application.
pub mod api;
pub mod db;
pub mod identity;
pub mod institution;
pub mod ratelimit;
pub mod redis;
mod secrets;
pub mod sessions;
