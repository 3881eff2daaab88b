//! Defines the state shared across the Axum application.
use crate::{db, services::identity, services::sessions, utils::ratelimit::LoginRateLimiter};

#[derive(Clone)]
/// The state struct shared across routers.
pub struct AppState {
    /// A connection pool for the student profile database.
    pub db_conn: db::ConnectionPool,
    /// A multiplexed connection for getting new session store connections.
    pub session_store_conn: sessions::store::Connection,
    /// A client for the external identity provider.
    pub identity: identity::Client,
    /// The shared sign-in attempt limiter.
    pub login_limiter: LoginRateLimiter,
}
