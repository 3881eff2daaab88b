//! Middleware applied to routers, mainly for authentication.
pub mod session;
