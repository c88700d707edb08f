//! Student (`alunos`) records.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Student {
    pub id: u64,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub instituicao: Option<String>,
    pub data_cadastro: DateTime<Utc>,
}

/// Student row as returned by the listing endpoint.
///
/// `oficinas_inscritas` is the comma-joined list of workshop titles the
/// student is enrolled in, or `null` when there are none.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct StudentWithWorkshops {
    #[serde(flatten)]
    pub student: Student,
    pub oficinas_inscritas: Option<String>,
}

/// Validated input for a new student.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
    pub instituicao: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct StudentCreateRequest {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub instituicao: Option<String>,
}
