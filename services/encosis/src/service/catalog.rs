//! Catalog maintenance: students, professors, workshops and lectures.
//!
//! # Purpose
//! Validates create payloads into the store's `New*` inputs and forwards
//! reads and deletes. Required text fields are trimmed; empty strings count
//! as missing. Optional text fields collapse to `None` when blank.
use super::{ServiceError, ServiceResult};
use crate::model::{
    CatalogSummary, Enrollment, Lecture, LectureCreateRequest, NewLecture, NewProfessor,
    NewStudent, NewWorkshop, Professor, ProfessorCreateRequest, Student, StudentCreateRequest,
    StudentWithWorkshops, Workshop, WorkshopCreateRequest, WorkshopSummary,
};
use crate::store::CatalogStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

/// Collects the names of missing fields so one response lists all of them.
#[derive(Default)]
struct Missing(Vec<&'static str>);

impl Missing {
    fn text(&mut self, field: &'static str, value: Option<String>) -> String {
        match value.map(|value| value.trim().to_string()) {
            Some(value) if !value.is_empty() => value,
            _ => {
                self.0.push(field);
                String::new()
            }
        }
    }

    fn value<T: Default>(&mut self, field: &'static str, value: Option<T>) -> T {
        match value {
            Some(value) => value,
            None => {
                self.0.push(field);
                T::default()
            }
        }
    }

    fn finish(self) -> ServiceResult<()> {
        if self.0.is_empty() {
            return Ok(());
        }
        Err(ServiceError::Validation(format!(
            "missing required fields: {}",
            self.0.join(", ")
        )))
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn positive(field: &str, value: u64) -> ServiceResult<()> {
    if value == 0 {
        return Err(ServiceError::Validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn create_student(&self, request: StudentCreateRequest) -> ServiceResult<Student> {
        let mut missing = Missing::default();
        let nome = missing.text("nome", request.nome);
        let email = missing.text("email", request.email);
        missing.finish()?;
        let student = self
            .store
            .create_student(NewStudent {
                nome,
                email,
                telefone: optional_text(request.telefone),
                instituicao: optional_text(request.instituicao),
            })
            .await?;
        tracing::info!(aluno_id = student.id, "student registered");
        Ok(student)
    }

    pub async fn get_student(&self, id: u64) -> ServiceResult<Student> {
        Ok(self.store.get_student(id).await?)
    }

    pub async fn list_students(&self) -> ServiceResult<Vec<StudentWithWorkshops>> {
        Ok(self.store.list_students().await?)
    }

    pub async fn delete_student(&self, id: u64) -> ServiceResult<()> {
        self.store.delete_student(id).await?;
        record_delete("student");
        tracing::info!(aluno_id = id, "student deleted");
        Ok(())
    }

    pub async fn create_professor(
        &self,
        request: ProfessorCreateRequest,
    ) -> ServiceResult<Professor> {
        let mut missing = Missing::default();
        let nome = missing.text("nome", request.nome);
        let email = missing.text("email", request.email);
        missing.finish()?;
        let professor = self
            .store
            .create_professor(NewProfessor {
                nome,
                email,
                especialidade: optional_text(request.especialidade),
                biografia: optional_text(request.biografia),
                telefone: optional_text(request.telefone),
            })
            .await?;
        tracing::info!(professor_id = professor.id, "professor registered");
        Ok(professor)
    }

    pub async fn get_professor(&self, id: u64) -> ServiceResult<Professor> {
        Ok(self.store.get_professor(id).await?)
    }

    pub async fn list_professors(&self) -> ServiceResult<Vec<Professor>> {
        Ok(self.store.list_professors().await?)
    }

    pub async fn delete_professor(&self, id: u64) -> ServiceResult<()> {
        self.store.delete_professor(id).await?;
        record_delete("professor");
        tracing::info!(professor_id = id, "professor deleted");
        Ok(())
    }

    /// Validate and create a workshop. Every field except
    /// `materiais_necessarios` is required; the store starts it with all
    /// seats available.
    pub async fn create_workshop(&self, request: WorkshopCreateRequest) -> ServiceResult<Workshop> {
        let mut missing = Missing::default();
        let titulo = missing.text("titulo", request.titulo);
        let descricao = missing.text("descricao", request.descricao);
        let carga_horaria = missing.value("carga_horaria", request.carga_horaria);
        let data_inicio = missing.value("data_inicio", request.data_inicio);
        let data_fim = missing.value("data_fim", request.data_fim);
        let vagas_total = missing.value("vagas_total", request.vagas_total);
        let local = missing.text("local", request.local);
        let professor_id = missing.value("professor_id", request.professor_id);
        missing.finish()?;

        positive("carga_horaria", u64::from(carga_horaria))?;
        positive("vagas_total", u64::from(vagas_total))?;
        positive("professor_id", professor_id)?;
        if data_fim < data_inicio {
            return Err(ServiceError::Validation(
                "data_fim must not be before data_inicio".to_string(),
            ));
        }

        let workshop = self
            .store
            .create_workshop(NewWorkshop {
                titulo,
                descricao,
                carga_horaria,
                data_inicio,
                data_fim,
                vagas_total,
                local,
                materiais_necessarios: optional_text(request.materiais_necessarios),
                professor_id,
            })
            .await?;
        metrics::gauge!(
            "encosis_workshop_seats_available",
            "oficina_id" => workshop.id.to_string()
        )
        .set(workshop.vagas_disponiveis as f64);
        tracing::info!(
            oficina_id = workshop.id,
            vagas_total = workshop.vagas_total,
            "workshop created"
        );
        Ok(workshop)
    }

    pub async fn get_workshop(&self, id: u64) -> ServiceResult<Workshop> {
        Ok(self.store.get_workshop(id).await?)
    }

    pub async fn list_workshops(&self) -> ServiceResult<Vec<WorkshopSummary>> {
        Ok(self.store.list_workshops().await?)
    }

    /// Delete a workshop. Returns how many enrollments went with it.
    pub async fn delete_workshop(&self, id: u64) -> ServiceResult<u64> {
        let removed = self.store.delete_workshop(id).await?;
        record_delete("workshop");
        tracing::info!(oficina_id = id, inscricoes_removidas = removed, "workshop deleted");
        Ok(removed)
    }

    pub async fn list_workshop_enrollments(&self, id: u64) -> ServiceResult<Vec<Enrollment>> {
        Ok(self.store.list_workshop_enrollments(id).await?)
    }

    pub async fn create_lecture(&self, request: LectureCreateRequest) -> ServiceResult<Lecture> {
        let mut missing = Missing::default();
        let titulo = missing.text("titulo", request.titulo);
        let descricao = missing.text("descricao", request.descricao);
        let professor_id = missing.value("professor_id", request.professor_id);
        let data_hora = missing.value("data_hora", request.data_hora);
        let local = missing.text("local", request.local);
        let capacidade = missing.value("capacidade", request.capacidade);
        missing.finish()?;

        positive("capacidade", u64::from(capacidade))?;
        positive("professor_id", professor_id)?;

        let lecture = self
            .store
            .create_lecture(NewLecture {
                titulo,
                descricao,
                professor_id,
                data_hora,
                local,
                capacidade,
            })
            .await?;
        tracing::info!(palestra_id = lecture.id, "lecture created");
        Ok(lecture)
    }

    pub async fn get_lecture(&self, id: u64) -> ServiceResult<Lecture> {
        Ok(self.store.get_lecture(id).await?)
    }

    pub async fn list_lectures(&self) -> ServiceResult<Vec<Lecture>> {
        Ok(self.store.list_lectures().await?)
    }

    pub async fn delete_lecture(&self, id: u64) -> ServiceResult<u64> {
        let removed = self.store.delete_lecture(id).await?;
        record_delete("lecture");
        tracing::info!(palestra_id = id, inscricoes_removidas = removed, "lecture deleted");
        Ok(removed)
    }

    pub async fn summary(&self) -> ServiceResult<CatalogSummary> {
        Ok(self.store.catalog_summary().await?)
    }
}

fn record_delete(entity: &'static str) {
    metrics::counter!("encosis_deletes_total", "entity" => entity).increment(1);
}
