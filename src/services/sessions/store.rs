//! Provides an abstracted interface to the underlying session store. Accessible only
//! within the session service, since no other part of the code should ever access
//! the session store directly.
use super::{SessionRecord, SessionStore};
use crate::constants::{redis as constants, sessions::SESSION_STORE_TTL_SLACK};
use core::fmt::Write as _;
use redis::{aio::MultiplexedConnection, AsyncCommands as _};
use sha2::{Digest as _, Sha256};
use std::sync::LazyLock;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone)]
/// A connection to the session store. Guaranteed to be safe to clone and share
/// between threads.
pub struct Connection(MultiplexedConnection);

const SESSION_KEY_PREFIX: &str = "sessions:auth:";

fn session_key(session_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{session_id}")
}

/// Key of the single-session-per-subject index, mapping a subject to their
/// current session id.
fn owner_key(subject_id: Uuid) -> String {
    format!("sessions:owner:{subject_id}")
}

const SESSION_FIELDS: [&str; 4] = ["secret_digest", "subject_id", "created_at", "expires_at"];

/// The stored hash fields in [`SESSION_FIELDS`] order, as answered by a single
/// multi-field read. Sessions are written in one atomic step, so either every
/// field comes back or the session is gone and all four are absent.
type SessionFields = (Option<String>, Option<Uuid>, Option<i64>, Option<i64>);

/// Stores a session and deletes whichever session the owner index currently
/// names, as one atomic step. Answers 0 without writing anything when the
/// candidate session id is already taken.
static REPLACE_SESSION_SCRIPT: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r"
        if redis.call('EXISTS', KEYS[1]) == 1 then
            return 0
        end
        local prior = redis.call('GET', KEYS[2])
        if prior then
            redis.call('DEL', ARGV[7] .. prior)
        end
        redis.call('HSET', KEYS[1], 'secret_digest', ARGV[1], 'subject_id', ARGV[2], 'created_at', ARGV[3], 'expires_at', ARGV[4])
        redis.call('EXPIRE', KEYS[1], ARGV[5])
        redis.call('SET', KEYS[2], ARGV[6])
        redis.call('EXPIRE', KEYS[2], ARGV[5])
        return 1",
    )
});

/// Hex digest of a session secret. Only digests are ever stored, so a leaked
/// store dump cannot be replayed as credentials.
fn digest_secret(session_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(session_secret.as_bytes());
    hasher
        .finalize()
        .into_iter()
        .fold(String::new(), |mut acc: String, x: u8| {
            write!(acc, "{x:02x}").unwrap();
            acc
        })
}

/// Rebuild the [`SessionRecord`] behind a multi-field read, when every field
/// came back and the stored digest and subject vouch for the presented
/// credentials.
fn stored_session(
    session_id: &str,
    session_secret: &str,
    subject_id: Uuid,
    fields: SessionFields,
) -> Option<SessionRecord> {
    let (Some(secret_digest), Some(stored_subject), Some(created_at), Some(expires_at)) = fields
    else {
        return None;
    };
    if digest_secret(session_secret) != secret_digest || stored_subject != subject_id {
        return None;
    }
    Some(SessionRecord {
        session_id: session_id.to_owned(),
        subject_id: stored_subject,
        created_at: OffsetDateTime::from_unix_timestamp(created_at)
            .expect("Timestamp out of range read back from store. Redis is corrupted."),
        expires_at: OffsetDateTime::from_unix_timestamp(expires_at)
            .expect("Timestamp out of range read back from store. Redis is corrupted."),
    })
}

impl Connection {
    /// Initiate a new (multiplexed) connection to the session store.
    /// This connection can be cloned and is safe to share between threads.
    pub async fn connect() -> Result<Self, errors::SessionStorageError> {
        Ok(Self(
            redis::Client::open(constants::REDIS_URL.clone())?
                .get_multiplexed_async_connection()
                .await?,
        ))
    }
}

impl SessionStore for Connection {
    async fn find_session(
        &mut self,
        session_id: &str,
        session_secret: &str,
        subject_id: Uuid,
    ) -> Result<Option<SessionRecord>, errors::SessionStorageError> {
        // One round trip, so a session reaped mid-request reads back as
        // fully absent, never as a torn row.
        let fields: SessionFields = self
            .0
            .hget(session_key(session_id), SESSION_FIELDS.as_slice())
            .await?;
        Ok(stored_session(session_id, session_secret, subject_id, fields))
    }

    async fn delete_session(
        &mut self,
        session_id: &str,
    ) -> Result<(), errors::SessionStorageError> {
        let _: () = self.0.del(session_key(session_id)).await?;
        Ok(())
    }

    async fn replace_session(
        &mut self,
        record: SessionRecord,
        session_secret: &str,
    ) -> Result<(), errors::SessionCreationError> {
        // The store TTL is only a reaper for rows nothing ever read again.
        // The authoritative expiry check happens at verification time.
        let ttl = record.expires_at.unix_timestamp() - OffsetDateTime::now_utc().unix_timestamp()
            + SESSION_STORE_TTL_SLACK;
        let stored: i64 = REPLACE_SESSION_SCRIPT
            .key(session_key(&record.session_id))
            .key(owner_key(record.subject_id))
            .arg(digest_secret(session_secret))
            .arg(record.subject_id)
            .arg(record.created_at.unix_timestamp())
            .arg(record.expires_at.unix_timestamp())
            .arg(ttl)
            .arg(&record.session_id)
            .arg(SESSION_KEY_PREFIX)
            .invoke_async(&mut self.0)
            .await?;
        if stored == 0 {
            return Err(errors::SessionCreationError::Duplicate);
        }
        Ok(())
    }
}

/// Errors returned by functions in this module.
pub mod errors {
    use redis::RedisError;
    use thiserror::Error;

    /// An error returned by the underlying storage layer.
    #[derive(Error, Debug)]
    #[error(transparent)]
    pub struct SessionStorageError(#[from] RedisError);

    /// Errors which can be thrown when creating a new session in the store.
    #[derive(Error, Debug)]
    pub enum SessionCreationError {
        /// There is already a session with the same id.
        #[error("Attempted to store a session id which already exists.")]
        Duplicate,
        /// There was an error while writing to/reading from the store.
        #[error(transparent)]
        StorageError(#[from] SessionStorageError),
    }

    impl From<RedisError> for SessionCreationError {
        fn from(err: RedisError) -> Self {
            Self::from(SessionStorageError::from(err))
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
