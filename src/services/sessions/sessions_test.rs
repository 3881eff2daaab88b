use super::*;
use super::errors::{SessionCreationError, SessionStorageError};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn storage_offline() -> redis::RedisError {
    redis::RedisError::from(io::Error::other("session store offline"))
}

/// In-memory stand-in for the session store. Keeps plain secrets since
/// digesting is the real store's concern.
#[derive(Clone, Default)]
struct MemoryStore {
    sessions: Arc<Mutex<HashMap<String, (String, SessionRecord)>>>,
    replaces: Arc<AtomicUsize>,
    duplicates_to_serve: Arc<AtomicUsize>,
    fail: bool,
}

impl MemoryStore {
    fn with_duplicates(count: usize) -> Self {
        let store = Self::default();
        store.duplicates_to_serve.store(count, Ordering::SeqCst);
        store
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().unwrap().contains_key(session_id)
    }

    fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl SessionStore for MemoryStore {
    async fn find_session(
        &mut self,
        session_id: &str,
        session_secret: &str,
        subject_id: Uuid,
    ) -> Result<Option<SessionRecord>, SessionStorageError> {
        if self.fail {
            return Err(SessionStorageError::from(storage_offline()));
        }
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.get(session_id).and_then(|(secret, record)| {
            (secret == session_secret && record.subject_id == subject_id)
                .then(|| record.clone())
        }))
    }

    async fn delete_session(&mut self, session_id: &str) -> Result<(), SessionStorageError> {
        if self.fail {
            return Err(SessionStorageError::from(storage_offline()));
        }
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn replace_session(
        &mut self,
        record: SessionRecord,
        session_secret: &str,
    ) -> Result<(), SessionCreationError> {
        self.replaces.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SessionCreationError::from(storage_offline()));
        }
        if self.duplicates_to_serve.load(Ordering::SeqCst) > 0 {
            self.duplicates_to_serve.fetch_sub(1, Ordering::SeqCst);
            return Err(SessionCreationError::Duplicate);
        }
        let mut sessions = self.sessions.lock().unwrap();
        sessions.retain(|_, (_, stored)| stored.subject_id != record.subject_id);
        sessions.insert(
            record.session_id.clone(),
            (session_secret.to_owned(), record),
        );
        Ok(())
    }
}

#[test]
fn generated_ids_are_48_hex_chars() {
    let token = generate_token::<24>();
    assert_eq!(token.len(), 48);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generated_secrets_are_64_hex_chars() {
    let token = generate_token::<32>();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generated_tokens_differ() {
    assert_ne!(generate_token::<24>(), generate_token::<24>());
}

#[tokio::test]
async fn issued_session_lands_in_store() {
    let mut store = MemoryStore::default();
    let subject_id = Uuid::new_v4();

    let issued = issue_session(subject_id, &mut store).await.unwrap();

    assert_eq!(issued.record.subject_id, subject_id);
    assert!(store.contains(&issued.record.session_id));
    let found = store
        .find_session(&issued.record.session_id, &issued.secret, subject_id)
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn issued_session_expires_after_the_timeout() {
    let mut store = MemoryStore::default();

    let issued = issue_session(Uuid::new_v4(), &mut store).await.unwrap();

    let lifetime = issued.record.expires_at - issued.record.created_at;
    assert_eq!(lifetime.whole_seconds(), i64::from(SESSION_TIMEOUT));
}

#[tokio::test]
async fn issuing_replaces_the_subjects_prior_session() {
    let mut store = MemoryStore::default();
    let subject_id = Uuid::new_v4();

    let first = issue_session(subject_id, &mut store).await.unwrap();
    let second = issue_session(subject_id, &mut store).await.unwrap();

    assert!(!store.contains(&first.record.session_id));
    assert!(store.contains(&second.record.session_id));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn duplicate_id_is_regenerated() {
    let mut store = MemoryStore::with_duplicates(1);

    let issued = issue_session(Uuid::new_v4(), &mut store).await.unwrap();

    assert_eq!(store.replaces.load(Ordering::SeqCst), 2);
    assert!(store.contains(&issued.record.session_id));
}

#[tokio::test]
async fn storage_error_is_not_retried() {
    let mut store = MemoryStore::failing();

    let result = issue_session(Uuid::new_v4(), &mut store).await;

    assert!(result.is_err());
    assert_eq!(store.replaces.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn revoking_removes_the_session() {
    let mut store = MemoryStore::default();
    let issued = issue_session(Uuid::new_v4(), &mut store).await.unwrap();

    revoke_session(&issued.record.session_id, &mut store)
        .await
        .unwrap();

    assert!(!store.contains(&issued.record.session_id));
}

#[tokio::test]
async fn revoking_an_unknown_id_is_a_no_op() {
    let mut store = MemoryStore::default();
    assert!(revoke_session("never-issued", &mut store).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_issuances_leave_one_session() {
    let store = MemoryStore::default();
    let subject_id = Uuid::new_v4();

    let mut tasks = Vec::new();
    for _ in 0..2 {
        let mut task_store = store.clone();
        tasks.push(tokio::spawn(async move {
            issue_session(subject_id, &mut task_store).await
        }));
    }
    let mut session_ids = Vec::new();
    for task in tasks {
        session_ids.push(task.await.unwrap().unwrap().record.session_id);
    }

    // However the two issuances interleave, the subject ends up holding
    // exactly one live session, and it is one of the two just issued.
    assert_eq!(store.len(), 1);
    assert!(session_ids.iter().any(|id| store.contains(id)));
}
