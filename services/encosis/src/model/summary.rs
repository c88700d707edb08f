//! Dashboard aggregate.
use super::Student;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Counts shown on the admin dashboard plus the latest registrations.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct CatalogSummary {
    pub total_alunos: u64,
    pub total_professores: u64,
    pub total_oficinas: u64,
    pub total_palestras: u64,
    pub total_inscricoes: u64,
    /// The three most recently registered students, newest first.
    pub alunos_recentes: Vec<Student>,
}
