//! Workshop (`oficinas`) records.
//!
//! # Purpose
//! A workshop is the capacity-limited unit students enroll in. The seat
//! counter `vagas_disponiveis` starts equal to `vagas_total` and is the only
//! field that changes after creation; the store keeps it within
//! `0..=vagas_total` and equal to `vagas_total` minus the enrollment count.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct Workshop {
    pub id: u64,
    pub titulo: String,
    pub descricao: String,
    /// Workload in hours.
    pub carga_horaria: u32,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub vagas_total: u32,
    pub vagas_disponiveis: u32,
    pub local: String,
    pub materiais_necessarios: Option<String>,
    pub professor_id: u64,
}

impl Workshop {
    pub fn seats_taken(&self) -> u32 {
        self.vagas_total.saturating_sub(self.vagas_disponiveis)
    }

    pub fn summary(&self, professor_nome: Option<String>) -> WorkshopSummary {
        WorkshopSummary {
            id: self.id,
            titulo: self.titulo.clone(),
            vagas_disponiveis: self.vagas_disponiveis,
            data_inicio: self.data_inicio,
            data_fim: self.data_fim,
            professor_nome,
        }
    }
}

/// Listing shape for `GET /oficinas`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
pub struct WorkshopSummary {
    pub id: u64,
    pub titulo: String,
    pub vagas_disponiveis: u32,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    /// `null` when the referenced professor row is gone.
    pub professor_nome: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkshop {
    pub titulo: String,
    pub descricao: String,
    pub carga_horaria: u32,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub vagas_total: u32,
    pub local: String,
    pub materiais_necessarios: Option<String>,
    pub professor_id: u64,
}

impl NewWorkshop {
    /// Materialize the stored record; every seat starts available.
    pub fn into_workshop(self, id: u64) -> Workshop {
        Workshop {
            id,
            titulo: self.titulo,
            descricao: self.descricao,
            carga_horaria: self.carga_horaria,
            data_inicio: self.data_inicio,
            data_fim: self.data_fim,
            vagas_total: self.vagas_total,
            vagas_disponiveis: self.vagas_total,
            local: self.local,
            materiais_necessarios: self.materiais_necessarios,
            professor_id: self.professor_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct WorkshopCreateRequest {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub carga_horaria: Option<u32>,
    #[serde(default)]
    pub data_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub data_fim: Option<NaiveDate>,
    #[serde(default)]
    pub vagas_total: Option<u32>,
    #[serde(default)]
    pub local: Option<String>,
    #[serde(default)]
    pub materiais_necessarios: Option<String>,
    #[serde(default)]
    pub professor_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_workshop_starts_with_every_seat_available() {
        let workshop = NewWorkshop {
            titulo: "Rust".to_string(),
            descricao: "Ownership".to_string(),
            carga_horaria: 4,
            data_inicio: NaiveDate::from_ymd_opt(2025, 5, 10).expect("date"),
            data_fim: NaiveDate::from_ymd_opt(2025, 5, 11).expect("date"),
            vagas_total: 12,
            local: "Lab 1".to_string(),
            materiais_necessarios: None,
            professor_id: 3,
        }
        .into_workshop(7);
        assert_eq!(workshop.id, 7);
        assert_eq!(workshop.vagas_disponiveis, 12);
        assert_eq!(workshop.seats_taken(), 0);

        let summary = workshop.summary(Some("Ana".to_string()));
        assert_eq!(summary.vagas_disponiveis, 12);
        assert_eq!(summary.professor_nome.as_deref(), Some("Ana"));
    }
}
