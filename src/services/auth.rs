//! Sign-in orchestration. Exchanges a verified identity grant for a
//! first-party session, refusing accounts from outside the institution.
use crate::{
    db::errors::DatabaseError,
    services::{
        errors::StorageError,
        identity::IdentityGrant,
        profiles::{Principal, ProfileStore},
        sessions::{errors::SessionStorageError, issue_session, IssuedSession, SessionStore},
    },
    utils::email::EmailAddress,
};
use thiserror::Error;

/// Why a sign-in attempt was refused.
#[derive(Error, Debug)]
pub enum SignInError {
    /// The email on record is outside the institution's domain.
    #[error("This account does not belong to the institution.")]
    ForeignEmailDomain,
    /// The provider authenticated a subject with no student profile.
    #[error("No student profile exists for this account.")]
    UnknownStudent,
    /// A backing store failed while signing in.
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

impl From<DatabaseError> for SignInError {
    fn from(err: DatabaseError) -> Self {
        Self::StorageError(err.into())
    }
}

impl From<SessionStorageError> for SignInError {
    fn from(err: SessionStorageError) -> Self {
        Self::StorageError(err.into())
    }
}

/// Everything a fresh sign-in produces.
pub struct SignedIn {
    /// The issued session, including the one-time view of its secret.
    pub session: IssuedSession,
    /// The signed-in student's profile.
    pub principal: Principal,
    /// The provider access token, relayed to the client for later
    /// cross-checks.
    pub access_token: String,
}

/// Turn an identity grant into a first-party session.
///
/// The grant only proves that the provider authenticated the subject. The
/// subject must additionally have a student profile on record, and the email
/// stored there must belong to `allowed_domain`. Anything else is refused
/// before a session is issued.
pub async fn establish_session<S, P>(
    grant: IdentityGrant,
    allowed_domain: &str,
    session_store_conn: &mut S,
    profile_store: &P,
) -> Result<SignedIn, SignInError>
where
    S: SessionStore,
    P: ProfileStore,
{
    let Some(principal) = profile_store.find_profile(grant.subject_id).await? else {
        eprintln!(
            "Refused sign-in for {}: no student profile on record.",
            grant.email.as_deref().unwrap_or("<unknown email>")
        );
        return Err(SignInError::UnknownStudent);
    };

    // The stored email is authoritative, not whatever the provider echoed.
    let member = EmailAddress::try_from(principal.email.as_str())
        .is_ok_and(|address| address.in_domain(allowed_domain));
    if !member {
        eprintln!(
            "Refused sign-in for {}: stored email is outside the institution.",
            grant.subject_id
        );
        return Err(SignInError::ForeignEmailDomain);
    }

    let session = issue_session(grant.subject_id, session_store_conn).await?;
    Ok(SignedIn {
        session,
        principal,
        access_token: grant.access_token,
    })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
