//! Student profile lookups backing the principal half of verification.
use crate::db::{self, errors::DatabaseError, models::student::StudentRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fully materialized student profile, attached to every verified request.
/// Deserialization is strict so a tampered cookie cache falls apart instead
/// of half-parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Principal {
    /// The subject id the identity provider knows this student by.
    pub subject_id: Uuid,
    /// The name shown across the platform.
    pub display_name: String,
    /// The institutional registration number, e.g. `21BCE1000`.
    pub registration_number: String,
    /// The institutional email address.
    pub email: String,
    /// An avatar URL, when the student has set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Source of student profiles for principal materialization.
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile stored for a subject, if any. An incomplete row
    /// counts as no profile.
    async fn find_profile(&self, subject_id: Uuid) -> Result<Option<Principal>, DatabaseError>;
}

impl ProfileStore for db::ConnectionPool {
    async fn find_profile(&self, subject_id: Uuid) -> Result<Option<Principal>, DatabaseError> {
        Ok(StudentRecord::select_one(subject_id, self)
            .await?
            .and_then(StudentRecord::complete))
    }
}
