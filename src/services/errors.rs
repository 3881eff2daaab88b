//! Shared errors used in multiple services.
use crate::{
    db::errors::DatabaseError,
    services::{
        identity::errors::IdentityProviderError, sessions::errors::SessionStorageError,
    },
};
use thiserror::Error;

/// Errors returned by underlying storage layers and upstream dependencies.
/// Anything in here means a backend could not answer, never that it said no.
#[derive(Error, Debug)]
pub enum StorageError {
    /// An error returned by the profile database.
    #[error(transparent)]
    DatabaseError(#[from] DatabaseError),
    /// An error returned by the session store.
    #[error(transparent)]
    SessionStorageError(#[from] SessionStorageError),
    /// An error returned by the identity provider.
    #[error(transparent)]
    IdentityProviderError(#[from] IdentityProviderError),
}
