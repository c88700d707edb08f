//! Professor (`professores`) records.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Professor {
    pub id: u64,
    pub nome: String,
    pub email: String,
    pub especialidade: Option<String>,
    pub biografia: Option<String>,
    pub telefone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProfessor {
    pub nome: String,
    pub email: String,
    pub especialidade: Option<String>,
    pub biografia: Option<String>,
    pub telefone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct ProfessorCreateRequest {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub especialidade: Option<String>,
    #[serde(default)]
    pub biografia: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
}
