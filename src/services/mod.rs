//! Services which correspond to routes and define core business logic.
pub mod auth;
pub mod credentials;
pub mod errors;
pub mod identity;
pub mod profiles;
pub mod sessions;
pub mod verification;
