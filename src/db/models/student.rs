//! Models mapping to the `student_record` database table. Rows are written by
//! the institution sync job, so anything it could leave blank is optional here.
use crate::{
    db::{errors::DatabaseError, ConnectionPool},
    services::profiles::Principal,
};
use sqlx::Row as _;
use uuid::Uuid;

/// A student profile row exactly as stored. Use [`StudentRecord::complete`]
/// to turn it into something the rest of the application will accept.
pub struct StudentRecord {
    /// The subject id the identity provider knows this student by.
    pub subject_id: Uuid,
    /// The name shown across the platform.
    pub display_name: Option<String>,
    /// The institutional registration number.
    pub registration_number: Option<String>,
    /// The institutional email address.
    pub email: Option<String>,
    /// An avatar URL, if the student has set one.
    pub avatar_url: Option<String>,
}

impl StudentRecord {
    /// Select a `StudentRecord` from the database by subject id.
    pub async fn select_one(
        subject_id: Uuid,
        db_client: &ConnectionPool,
    ) -> Result<Option<Self>, DatabaseError> {
        let row_opt = sqlx::query(
            "SELECT subject_id, display_name, registration_number, email, avatar_url \
             FROM student_record WHERE subject_id = $1",
        )
        .bind(subject_id)
        .fetch_optional(db_client)
        .await?;
        Ok(row_opt.map(|row| Self {
            subject_id: row.get("subject_id"),
            display_name: row.get("display_name"),
            registration_number: row.get("registration_number"),
            email: row.get("email"),
            avatar_url: row.get("avatar_url"),
        }))
    }

    /// Validate this row into a [`Principal`]. Returns `None` when the sync
    /// job has not yet filled in the fields every active student must have.
    pub fn complete(self) -> Option<Principal> {
        Some(Principal {
            subject_id: self.subject_id,
            display_name: self.display_name?,
            registration_number: self.registration_number?,
            email: self.email?,
            avatar_url: self.avatar_url,
        })
    }
}

#[cfg(test)]
#[path = "student_test.rs"]
mod tests;
