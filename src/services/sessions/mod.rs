//! Logic for session handling. Issuing, looking up and revoking sessions.
use crate::constants::sessions::SESSION_TIMEOUT;
pub mod store;
use core::fmt::Write as _;
use time::OffsetDateTime;
use uuid::Uuid;

/// Generates `N` random bytes as padded hex using a CSPRNG.
fn generate_token<const N: usize>() -> String {
    let mut token_buf: [u8; N] = [0; N];
    getrandom::fill(&mut token_buf).expect("Error getting OS random. Critical, aborting.");
    token_buf
        .into_iter()
        .fold(String::new(), |mut acc: String, x: u8| {
            write!(acc, "{x:02x}").unwrap();
            acc
        })
}

#[derive(Clone)]
/// A stored session binding a session id to a subject. Carries no secret:
/// the secret only ever exists inside [`IssuedSession`] and, digested, in
/// the store.
pub struct SessionRecord {
    /// The public session identifier.
    pub session_id: String,
    /// The subject this session authenticates.
    pub subject_id: Uuid,
    /// When the session was issued.
    pub created_at: OffsetDateTime,
    /// When the session stops being valid.
    pub expires_at: OffsetDateTime,
}

/// A freshly issued session, including the one chance to see the secret.
pub struct IssuedSession {
    /// The stored record.
    pub record: SessionRecord,
    /// The session secret, to be handed to the client and never persisted.
    pub secret: String,
}

/// The server-side session store. Verification and sign-in only ever touch
/// sessions through this seam.
pub trait SessionStore: Send + Sync {
    /// Look up the session stored under an id. Returns the record only when
    /// the secret and subject both match what is stored.
    async fn find_session(
        &mut self,
        session_id: &str,
        session_secret: &str,
        subject_id: Uuid,
    ) -> Result<Option<SessionRecord>, errors::SessionStorageError>;
    /// Delete a session, immediately invalidating it. Deleting a session
    /// which is already gone is a no-op, not an error.
    async fn delete_session(
        &mut self,
        session_id: &str,
    ) -> Result<(), errors::SessionStorageError>;
    /// Store a new session, atomically dropping any earlier session held by
    /// the same subject.
    async fn replace_session(
        &mut self,
        record: SessionRecord,
        session_secret: &str,
    ) -> Result<(), errors::SessionCreationError>;
}

/// Issue a brand new session for a subject, displacing any session they
/// already hold.
pub async fn issue_session<S: SessionStore>(
    subject_id: Uuid,
    session_store_conn: &mut S,
) -> Result<IssuedSession, errors::SessionStorageError> {
    loop {
        // Loop infinitely and return once a candidate id stores cleanly.
        let secret = generate_token::<32>();
        let created_at = OffsetDateTime::now_utc();
        let record = SessionRecord {
            session_id: generate_token::<24>(),
            subject_id,
            created_at,
            expires_at: created_at + time::Duration::seconds(i64::from(SESSION_TIMEOUT)),
        };
        match session_store_conn.replace_session(record.clone(), &secret).await {
            Ok(()) => return Ok(IssuedSession { record, secret }),
            Err(errors::SessionCreationError::Duplicate) => {} // keep looping
            Err(errors::SessionCreationError::StorageError(error)) => return Err(error),
        }
    }
}

/// Revoke a session by id, immediately invalidating it. Revoking an unknown
/// id succeeds silently.
pub async fn revoke_session<S: SessionStore>(
    session_id: &str,
    session_store_conn: &mut S,
) -> Result<(), errors::SessionStorageError> {
    session_store_conn.delete_session(session_id).await
}

/// Errors returned by functions within this module.
pub mod errors {
    pub use super::store::errors::{SessionCreationError, SessionStorageError};
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
