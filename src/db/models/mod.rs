//! Defines data models (structs) which map directly to rows in the database.
pub mod student;
