//! Enrollment rows linking students to workshops and lectures.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row of `alunos_oficinas`.
///
/// `presenca` and `certificado_emitido` are unset (`null`) at creation; they
/// are recorded later by event staff outside this service.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Enrollment {
    pub inscricao_id: u64,
    pub aluno_id: u64,
    pub oficina_id: u64,
    pub data_inscricao: DateTime<Utc>,
    pub presenca: Option<bool>,
    pub certificado_emitido: Option<bool>,
}

/// A row of `alunos_palestras`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct LectureEnrollment {
    pub inscricao_id: u64,
    pub aluno_id: u64,
    pub palestra_id: u64,
    pub data_inscricao: DateTime<Utc>,
    pub presenca: Option<bool>,
}

/// Body of `POST /alunos/oficinas/inscrever`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct EnrollmentRequest {
    #[serde(default)]
    pub aluno_id: Option<u64>,
    #[serde(default)]
    pub oficina_id: Option<u64>,
}

/// Body of `POST /alunos/palestras/inscrever`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct LectureEnrollmentRequest {
    #[serde(default)]
    pub aluno_id: Option<u64>,
    #[serde(default)]
    pub palestra_id: Option<u64>,
}
