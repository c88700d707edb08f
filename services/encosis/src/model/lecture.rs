//! Lecture (`palestras`) records.
//!
//! Lectures have no seat counter; capacity is enforced by counting
//! `alunos_palestras` rows against `capacidade`.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Lecture {
    pub id: u64,
    pub titulo: String,
    pub descricao: String,
    pub professor_id: u64,
    pub data_hora: NaiveDateTime,
    pub local: String,
    pub capacidade: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLecture {
    pub titulo: String,
    pub descricao: String,
    pub professor_id: u64,
    pub data_hora: NaiveDateTime,
    pub local: String,
    pub capacidade: u32,
}

impl NewLecture {
    pub fn into_lecture(self, id: u64) -> Lecture {
        Lecture {
            id,
            titulo: self.titulo,
            descricao: self.descricao,
            professor_id: self.professor_id,
            data_hora: self.data_hora,
            local: self.local,
            capacidade: self.capacidade,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct LectureCreateRequest {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub professor_id: Option<u64>,
    #[serde(default)]
    pub data_hora: Option<NaiveDateTime>,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub capacidade: Option<u32>,
}
