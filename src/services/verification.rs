//! The session verification pipeline run for every authenticated request:
//! reconcile the presented credentials against the session store, then
//! materialize the student profile behind them. Fails closed: any storage
//! fault denies the request rather than guessing.
use crate::{
    db::errors::DatabaseError,
    services::{
        credentials::{CredentialBundle, SessionKey},
        errors::StorageError,
        identity::{errors::IdentityProviderError, IdentityProvider, TokenValidation},
        profiles::{Principal, ProfileStore},
        sessions::{errors::SessionStorageError, SessionRecord, SessionStore},
    },
};
use thiserror::Error;
use time::OffsetDateTime;

/// Why a request failed verification. Every variant denies access; none is
/// retryable within the request.
#[derive(Error, Debug)]
pub enum AuthFailure {
    /// The request is missing one or more of the session credentials.
    #[error("No usable session credentials were supplied.")]
    MissingCredentials,
    /// The presented credentials do not match any live session.
    #[error("Session credentials do not match any live session.")]
    InvalidSession,
    /// The session was found but its expiry has passed.
    #[error("Session has expired.")]
    SessionExpired,
    /// A bearer token was presented but does not vouch for the session's
    /// subject.
    #[error("Supplied identity does not belong to this session.")]
    SubjectMismatch,
    /// The session is valid but no student profile backs it.
    #[error("No profile exists for this subject.")]
    ProfileNotFound,
    /// A storage layer or the identity provider could not answer.
    #[error(transparent)]
    StorageUnavailable(#[from] StorageError),
}

impl From<SessionStorageError> for AuthFailure {
    fn from(err: SessionStorageError) -> Self {
        Self::StorageUnavailable(err.into())
    }
}

impl From<DatabaseError> for AuthFailure {
    fn from(err: DatabaseError) -> Self {
        Self::StorageUnavailable(err.into())
    }
}

impl From<IdentityProviderError> for AuthFailure {
    fn from(err: IdentityProviderError) -> Self {
        Self::StorageUnavailable(err.into())
    }
}

/// How the principal for a verified request was obtained.
pub enum MaterializedProfile {
    /// Served from the client's cookie cache without touching storage.
    Cached(Principal),
    /// Fetched from the profile store because the cache was absent or did
    /// not belong to the session's subject. The caller should refresh the
    /// client's cache.
    Fetched(Principal),
}

impl MaterializedProfile {
    /// The principal, however it was obtained.
    pub const fn principal(&self) -> &Principal {
        match *self {
            Self::Cached(ref principal) | Self::Fetched(ref principal) => principal,
        }
    }

    /// Consume the materialization, keeping only the principal.
    pub fn into_principal(self) -> Principal {
        match self {
            Self::Cached(principal) | Self::Fetched(principal) => principal,
        }
    }

    /// Whether the client's cached copy should be rewritten.
    pub const fn needs_refresh(&self) -> bool {
        matches!(*self, Self::Fetched(_))
    }
}

/// A fully verified request identity: the live session plus the student
/// behind it.
pub struct Verification {
    /// The reconciled session record.
    pub session: SessionRecord,
    /// The materialized principal.
    pub profile: MaterializedProfile,
}

/// Reconcile a credential bundle against the session store. Applies the
/// expiry check (reaping the row when it fails) and, only when a bearer
/// token was supplied, the identity provider cross-check.
pub async fn reconcile<S, I>(
    bundle: &CredentialBundle,
    session_store_conn: &mut S,
    identity_client: &I,
) -> Result<SessionRecord, AuthFailure>
where
    S: SessionStore,
    I: IdentityProvider,
{
    reconcile_at(
        bundle,
        session_store_conn,
        identity_client,
        OffsetDateTime::now_utc(),
    )
    .await
}

/// Internal: reconcile against an explicit clock (for testing the expiry
/// boundary).
async fn reconcile_at<S, I>(
    bundle: &CredentialBundle,
    session_store_conn: &mut S,
    identity_client: &I,
    now: OffsetDateTime,
) -> Result<SessionRecord, AuthFailure>
where
    S: SessionStore,
    I: IdentityProvider,
{
    let Some(SessionKey {
        session_id,
        session_secret,
        subject_id,
    }) = bundle.session_key()
    else {
        return Err(AuthFailure::MissingCredentials);
    };
    let record = session_store_conn
        .find_session(&session_id, &session_secret, subject_id)
        .await?
        .ok_or(AuthFailure::InvalidSession)?;
    if record.expires_at <= now {
        // Reap eagerly so an expired id stops answering at once. Concurrent
        // reaps of the same row are harmless, deletes are idempotent.
        session_store_conn.delete_session(&record.session_id).await?;
        return Err(AuthFailure::SessionExpired);
    }
    if let Some(token) = bundle.bearer_token.as_deref() {
        match identity_client.validate_token(token).await? {
            TokenValidation::Valid(token_identity)
                if token_identity.subject_id == record.subject_id => {}
            TokenValidation::Valid(_) | TokenValidation::Invalid => {
                return Err(AuthFailure::SubjectMismatch);
            }
        }
    }
    Ok(record)
}

/// Materialize the principal behind a reconciled session, preferring the
/// client's cached profile when it belongs to the session's subject.
pub async fn materialize<P: ProfileStore>(
    bundle: &CredentialBundle,
    session: &SessionRecord,
    profile_store: &P,
) -> Result<MaterializedProfile, AuthFailure> {
    if let Some(cached) = bundle.cached_profile.as_ref() {
        if cached.subject_id == session.subject_id {
            return Ok(MaterializedProfile::Cached(cached.clone()));
        }
    }
    let principal = profile_store
        .find_profile(session.subject_id)
        .await?
        .ok_or(AuthFailure::ProfileNotFound)?;
    Ok(MaterializedProfile::Fetched(principal))
}

/// Run the full pipeline over an extracted bundle: reconcile, then
/// materialize.
pub async fn verify<S, P, I>(
    bundle: &CredentialBundle,
    session_store_conn: &mut S,
    profile_store: &P,
    identity_client: &I,
) -> Result<Verification, AuthFailure>
where
    S: SessionStore,
    P: ProfileStore,
    I: IdentityProvider,
{
    let session = reconcile(bundle, session_store_conn, identity_client).await?;
    let profile = materialize(bundle, &session, profile_store).await?;
    Ok(Verification { session, profile })
}

#[cfg(test)]
#[path = "verification_test.rs"]
mod tests;
