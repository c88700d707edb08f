//! Catalog data model.
//!
//! # Purpose
//! Re-exports the student, professor, workshop, lecture and enrollment records
//! shared by the store, service and HTTP layers, together with the create
//! payloads accepted by the API.
mod enrollment;
mod lecture;
mod professor;
mod student;
mod summary;
mod workshop;

pub use enrollment::{Enrollment, EnrollmentRequest, LectureEnrollment, LectureEnrollmentRequest};
pub use lecture::{Lecture, LectureCreateRequest, NewLecture};
pub use professor::{NewProfessor, Professor, ProfessorCreateRequest};
pub use student::{NewStudent, Student, StudentCreateRequest, StudentWithWorkshops};
pub use summary::CatalogSummary;
pub use workshop::{NewWorkshop, Workshop, WorkshopCreateRequest, WorkshopSummary};
