//! OpenAPI schema aggregation for the ENCOSIS API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for docs
//! and client generation.
use crate::api::{
    dashboard, enrollments, lectures, professors, students, system,
    types::{
        DeletedWithEnrollmentsResponse, ErrorResponse, HealthStatus, MessageResponse, SystemInfo,
    },
    workshops,
};
use crate::model::{
    CatalogSummary, Enrollment, EnrollmentRequest, Lecture, LectureCreateRequest,
    LectureEnrollment, LectureEnrollmentRequest, Professor, ProfessorCreateRequest, Student,
    StudentCreateRequest, StudentWithWorkshops, Workshop, WorkshopCreateRequest, WorkshopSummary,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "encosis",
        version = "v1",
        description = "ENCOSIS academic event catalog and enrollment API"
    ),
    paths(
        system::system_info,
        system::system_health,
        students::list_students,
        students::create_student,
        students::get_student,
        students::delete_student,
        enrollments::enroll_workshop,
        enrollments::enroll_lecture,
        professors::list_professors,
        professors::create_professor,
        professors::get_professor,
        professors::delete_professor,
        workshops::list_workshops,
        workshops::create_workshop,
        workshops::get_workshop,
        workshops::delete_workshop,
        workshops::list_workshop_enrollments,
        lectures::list_lectures,
        lectures::create_lecture,
        lectures::get_lecture,
        lectures::delete_lecture,
        dashboard::dashboard
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        MessageResponse,
        DeletedWithEnrollmentsResponse,
        Student,
        StudentCreateRequest,
        StudentWithWorkshops,
        Professor,
        ProfessorCreateRequest,
        Workshop,
        WorkshopCreateRequest,
        WorkshopSummary,
        Lecture,
        LectureCreateRequest,
        Enrollment,
        EnrollmentRequest,
        LectureEnrollment,
        LectureEnrollmentRequest,
        CatalogSummary
    )),
    tags(
        (name = "system", description = "System and health endpoints"),
        (name = "alunos", description = "Student registration"),
        (name = "professores", description = "Professor registration"),
        (name = "oficinas", description = "Workshop catalog"),
        (name = "palestras", description = "Lecture catalog"),
        (name = "inscricoes", description = "Workshop and lecture enrollment"),
        (name = "dashboard", description = "Catalog totals")
    )
)]
pub struct ApiDoc;
