//! Constants related to authentication and session handling.

/// Timeout for authenticated sessions in seconds.
pub const SESSION_TIMEOUT: u32 = 7 * 24 * 60 * 60;
/// Extra seconds a stored session may outlive its expiry before the store
/// reaps it on its own. Expiry checks never rely on this backstop.
pub const SESSION_STORE_TTL_SLACK: i64 = 24 * 60 * 60;

/// Cookie carrying the session identifier.
pub const SESSION_ID_COOKIE: &str = "vp_session";
/// Cookie carrying the session secret.
pub const SESSION_SECRET_COOKIE: &str = "vp_session_key";
/// Cookie carrying the subject id the client claims to act as.
pub const SUBJECT_COOKIE: &str = "vp_subject";
/// Cookie carrying the cached profile blob.
pub const PROFILE_COOKIE: &str = "vp_profile";
/// Cookie carrying the identity provider access token.
pub const ID_TOKEN_COOKIE: &str = "vp_id_token";
