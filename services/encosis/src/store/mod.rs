//! Catalog storage abstraction.
//!
//! # Purpose
//! Defines the `CatalogStore` trait implemented by the in-memory and MySQL
//! backends, the shared error type, and the policies that decide how
//! duplicate enrollments and deletes of referenced rows are handled.
//!
//! # Key invariants
//! - A workshop's `vagas_disponiveis` never drops below zero.
//! - `vagas_total - vagas_disponiveis` equals the number of enrollment rows
//!   referencing the workshop.
//! - No enrollment row references a missing student, workshop or lecture.
//! - Lecture enrollments never exceed the lecture's `capacidade`.
use crate::model::{
    CatalogSummary, Enrollment, Lecture, LectureEnrollment, NewLecture, NewProfessor, NewStudent,
    NewWorkshop, Professor, Student, StudentWithWorkshops, Workshop, WorkshopSummary,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

pub mod memory;
pub mod mysql;

/// Number of students returned in `CatalogSummary::alunos_recentes`.
pub const RECENT_STUDENTS_LIMIT: usize = 3;

/// What to do when a student enrolls twice in the same workshop or lecture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DuplicateEnrollmentPolicy {
    /// Fail the second attempt with `StoreError::Conflict`.
    #[default]
    Reject,
    /// Accept it; each row consumes its own seat.
    Allow,
}

impl FromStr for DuplicateEnrollmentPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            other => Err(format!("unknown duplicate enrollment policy: {other}")),
        }
    }
}

impl TryFrom<String> for DuplicateEnrollmentPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What to do when deleting a student, workshop or lecture that still has
/// enrollment rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DeletePolicy {
    /// Remove the dependent enrollments in the same transaction.
    #[default]
    Cascade,
    /// Refuse with `StoreError::Conflict`.
    Reject,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cascade" => Ok(Self::Cascade),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown delete policy: {other}")),
        }
    }
}

impl TryFrom<String> for DeletePolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub duplicate_enrollments: DuplicateEnrollmentPolicy,
    pub delete_policy: DeletePolicy,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_student(&self, student: NewStudent) -> StoreResult<Student>;
    async fn get_student(&self, id: u64) -> StoreResult<Student>;
    async fn list_students(&self) -> StoreResult<Vec<StudentWithWorkshops>>;
    async fn delete_student(&self, id: u64) -> StoreResult<()>;

    async fn create_professor(&self, professor: NewProfessor) -> StoreResult<Professor>;
    async fn get_professor(&self, id: u64) -> StoreResult<Professor>;
    async fn list_professors(&self) -> StoreResult<Vec<Professor>>;
    async fn delete_professor(&self, id: u64) -> StoreResult<()>;

    async fn create_workshop(&self, workshop: NewWorkshop) -> StoreResult<Workshop>;
    async fn get_workshop(&self, id: u64) -> StoreResult<Workshop>;
    async fn list_workshops(&self) -> StoreResult<Vec<WorkshopSummary>>;
    /// Returns the number of enrollment rows removed alongside the workshop.
    async fn delete_workshop(&self, id: u64) -> StoreResult<u64>;
    async fn list_workshop_enrollments(&self, id: u64) -> StoreResult<Vec<Enrollment>>;

    /// Enroll a student in a workshop as one atomic unit: lock the workshop,
    /// check the student, apply the duplicate policy, take a seat, insert
    /// the row. Either every step lands or none does.
    async fn create_enrollment(&self, student_id: u64, workshop_id: u64)
    -> StoreResult<Enrollment>;
    /// Conditionally take one seat. Returns the remaining count.
    async fn decrement_workshop_seats(&self, workshop_id: u64) -> StoreResult<u32>;

    async fn create_lecture(&self, lecture: NewLecture) -> StoreResult<Lecture>;
    async fn get_lecture(&self, id: u64) -> StoreResult<Lecture>;
    async fn list_lectures(&self) -> StoreResult<Vec<Lecture>>;
    /// Returns the number of lecture enrollment rows removed.
    async fn delete_lecture(&self, id: u64) -> StoreResult<u64>;
    async fn create_lecture_enrollment(
        &self,
        student_id: u64,
        lecture_id: u64,
    ) -> StoreResult<LectureEnrollment>;

    async fn catalog_summary(&self) -> StoreResult<CatalogSummary>;

    async fn health_check(&self) -> StoreResult<()>;
    /// Release backend resources. Called once after the HTTP server drains.
    async fn close(&self);
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_case_insensitively() {
        assert_eq!(
            "Allow".parse::<DuplicateEnrollmentPolicy>(),
            Ok(DuplicateEnrollmentPolicy::Allow)
        );
        assert_eq!(
            " reject ".parse::<DuplicateEnrollmentPolicy>(),
            Ok(DuplicateEnrollmentPolicy::Reject)
        );
        assert_eq!("CASCADE".parse::<DeletePolicy>(), Ok(DeletePolicy::Cascade));
        assert!("maybe".parse::<DeletePolicy>().is_err());
    }

    #[test]
    fn default_config_rejects_duplicates_and_cascades() {
        let config = StoreConfig::default();
        assert_eq!(
            config.duplicate_enrollments,
            DuplicateEnrollmentPolicy::Reject
        );
        assert_eq!(config.delete_policy, DeletePolicy::Cascade);
    }

    #[test]
    fn sqlx_errors_map_to_unexpected() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unexpected(_)));
    }
}
