//! In-memory implementation of the catalog store.
//!
//! # Purpose
//! Implements `CatalogStore` with ordered maps guarded by `tokio::sync` locks.
//! It exists for local development and tests, and as a fallback when no MySQL
//! server is configured.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: each workshop and lecture sits behind its
//!   own mutex, which plays the role of the row lock taken by the MySQL
//!   backend. Enrollments in the same workshop are serialized; enrollments in
//!   different workshops run in parallel.
//! - Deletes cross entity boundaries (returning seats, removing enrollment
//!   rows), so they take the store `gate` exclusively while inserts and
//!   enrollments hold it shared.
//!
//! # Lock order
//! Enrollments take `gate` (shared), then the workshop or lecture mutex, then
//! the maps. Reads that span several maps also hold `gate` shared, so a
//! delete holding it exclusively never meets a half-finished read. Single-map
//! reads skip the gate.
use super::{
    CatalogStore, DeletePolicy, DuplicateEnrollmentPolicy, RECENT_STUDENTS_LIMIT, StoreConfig,
    StoreError, StoreResult,
};
use crate::model::{
    CatalogSummary, Enrollment, Lecture, LectureEnrollment, NewLecture, NewProfessor, NewStudent,
    NewWorkshop, Professor, Student, StudentWithWorkshops, Workshop, WorkshopSummary,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Auto-increment counter for one table. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
struct IdSequence(AtomicU64);

impl IdSequence {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// In-memory catalog store.
///
/// Maps are keyed by id so iteration follows insertion order, which keeps
/// `list_workshop_enrollments` ordered by `inscricao_id` for free.
#[derive(Default)]
pub struct InMemoryStore {
    config: StoreConfig,
    /// Held shared by inserts, enrollments and multi-map reads; exclusively
    /// by deletes.
    gate: RwLock<()>,
    student_ids: IdSequence,
    professor_ids: IdSequence,
    workshop_ids: IdSequence,
    lecture_ids: IdSequence,
    enrollment_ids: IdSequence,
    lecture_enrollment_ids: IdSequence,
    students: RwLock<BTreeMap<u64, Student>>,
    professors: RwLock<BTreeMap<u64, Professor>>,
    /// One mutex per workshop guards its seat counter.
    workshops: RwLock<BTreeMap<u64, Arc<Mutex<Workshop>>>>,
    /// One mutex per lecture serializes its capacity check.
    lectures: RwLock<BTreeMap<u64, Arc<Mutex<Lecture>>>>,
    enrollments: RwLock<BTreeMap<u64, Enrollment>>,
    lecture_enrollments: RwLock<BTreeMap<u64, LectureEnrollment>>,
}

impl InMemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    async fn workshop_slot(&self, id: u64) -> StoreResult<Arc<Mutex<Workshop>>> {
        self.workshops
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("workshop".into()))
    }

    async fn lecture_slot(&self, id: u64) -> StoreResult<Arc<Mutex<Lecture>>> {
        self.lectures
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("lecture".into()))
    }

    async fn workshop_titles(&self) -> HashMap<u64, String> {
        let workshops = self.workshops.read().await;
        let mut titles = HashMap::with_capacity(workshops.len());
        for (id, slot) in workshops.iter() {
            titles.insert(*id, slot.lock().await.titulo.clone());
        }
        titles
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn create_student(&self, student: NewStudent) -> StoreResult<Student> {
        let student = Student {
            id: self.student_ids.next(),
            nome: student.nome,
            email: student.email,
            telefone: student.telefone,
            instituicao: student.instituicao,
            data_cadastro: Utc::now(),
        };
        self.students
            .write()
            .await
            .insert(student.id, student.clone());
        Ok(student)
    }

    async fn get_student(&self, id: u64) -> StoreResult<Student> {
        self.students
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("student".into()))
    }

    async fn list_students(&self) -> StoreResult<Vec<StudentWithWorkshops>> {
        let _gate = self.gate.read().await;
        let titles = self.workshop_titles().await;
        let mut enrolled: HashMap<u64, Vec<&str>> = HashMap::new();
        let enrollments = self.enrollments.read().await;
        for enrollment in enrollments.values() {
            if let Some(title) = titles.get(&enrollment.oficina_id) {
                enrolled
                    .entry(enrollment.aluno_id)
                    .or_default()
                    .push(title.as_str());
            }
        }

        let students = self.students.read().await;
        let mut items: Vec<StudentWithWorkshops> = students
            .values()
            .map(|student| {
                let oficinas_inscritas = enrolled.get_mut(&student.id).map(|titles| {
                    titles.sort_unstable();
                    titles.join(", ")
                });
                StudentWithWorkshops {
                    student: student.clone(),
                    oficinas_inscritas,
                }
            })
            .collect();
        items.sort_by(|a, b| {
            a.student
                .nome
                .cmp(&b.student.nome)
                .then(a.student.id.cmp(&b.student.id))
        });
        Ok(items)
    }

    async fn delete_student(&self, id: u64) -> StoreResult<()> {
        let _gate = self.gate.write().await;
        let mut students = self.students.write().await;
        if !students.contains_key(&id) {
            return Err(StoreError::NotFound("student".into()));
        }
        let mut enrollments = self.enrollments.write().await;
        let mut lecture_enrollments = self.lecture_enrollments.write().await;
        let held: Vec<u64> = enrollments
            .values()
            .filter(|enrollment| enrollment.aluno_id == id)
            .map(|enrollment| enrollment.oficina_id)
            .collect();
        let has_lectures = lecture_enrollments
            .values()
            .any(|enrollment| enrollment.aluno_id == id);
        if self.config.delete_policy == DeletePolicy::Reject && (!held.is_empty() || has_lectures) {
            return Err(StoreError::Conflict("student has enrollments".into()));
        }

        // Hand every seat the student held back to its workshop.
        let workshops = self.workshops.read().await;
        for workshop_id in held {
            if let Some(slot) = workshops.get(&workshop_id) {
                let mut workshop = slot.lock().await;
                workshop.vagas_disponiveis =
                    (workshop.vagas_disponiveis + 1).min(workshop.vagas_total);
                metrics::gauge!(
                    "encosis_workshop_seats_available",
                    "oficina_id" => workshop_id.to_string()
                )
                .set(workshop.vagas_disponiveis as f64);
            }
        }
        enrollments.retain(|_, enrollment| enrollment.aluno_id != id);
        lecture_enrollments.retain(|_, enrollment| enrollment.aluno_id != id);
        students.remove(&id);
        Ok(())
    }

    async fn create_professor(&self, professor: NewProfessor) -> StoreResult<Professor> {
        let professor = Professor {
            id: self.professor_ids.next(),
            nome: professor.nome,
            email: professor.email,
            especialidade: professor.especialidade,
            biografia: professor.biografia,
            telefone: professor.telefone,
        };
        self.professors
            .write()
            .await
            .insert(professor.id, professor.clone());
        Ok(professor)
    }

    async fn get_professor(&self, id: u64) -> StoreResult<Professor> {
        self.professors
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("professor".into()))
    }

    async fn list_professors(&self) -> StoreResult<Vec<Professor>> {
        let mut items: Vec<Professor> = self.professors.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.nome.cmp(&b.nome).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn delete_professor(&self, id: u64) -> StoreResult<()> {
        let _gate = self.gate.write().await;
        if !self.professors.read().await.contains_key(&id) {
            return Err(StoreError::NotFound("professor".into()));
        }
        for slot in self.workshops.read().await.values() {
            if slot.lock().await.professor_id == id {
                return Err(StoreError::Conflict("professor teaches a workshop".into()));
            }
        }
        for slot in self.lectures.read().await.values() {
            if slot.lock().await.professor_id == id {
                return Err(StoreError::Conflict("professor gives a lecture".into()));
            }
        }
        self.professors.write().await.remove(&id);
        Ok(())
    }

    async fn create_workshop(&self, workshop: NewWorkshop) -> StoreResult<Workshop> {
        let _gate = self.gate.read().await;
        if !self
            .professors
            .read()
            .await
            .contains_key(&workshop.professor_id)
        {
            return Err(StoreError::NotFound("professor".into()));
        }
        let workshop = workshop.into_workshop(self.workshop_ids.next());
        self.workshops
            .write()
            .await
            .insert(workshop.id, Arc::new(Mutex::new(workshop.clone())));
        Ok(workshop)
    }

    async fn get_workshop(&self, id: u64) -> StoreResult<Workshop> {
        let slot = self.workshop_slot(id).await?;
        let workshop = slot.lock().await.clone();
        Ok(workshop)
    }

    async fn list_workshops(&self) -> StoreResult<Vec<WorkshopSummary>> {
        let _gate = self.gate.read().await;
        let professors = self.professors.read().await;
        let workshops = self.workshops.read().await;
        let mut items = Vec::with_capacity(workshops.len());
        for slot in workshops.values() {
            let workshop = slot.lock().await;
            let professor_nome = professors
                .get(&workshop.professor_id)
                .map(|professor| professor.nome.clone());
            items.push(workshop.summary(professor_nome));
        }
        items.sort_by(|a, b| a.titulo.cmp(&b.titulo).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn delete_workshop(&self, id: u64) -> StoreResult<u64> {
        let _gate = self.gate.write().await;
        let mut workshops = self.workshops.write().await;
        if !workshops.contains_key(&id) {
            return Err(StoreError::NotFound("workshop".into()));
        }
        let mut enrollments = self.enrollments.write().await;
        let dependents = enrollments
            .values()
            .filter(|enrollment| enrollment.oficina_id == id)
            .count() as u64;
        if dependents > 0 && self.config.delete_policy == DeletePolicy::Reject {
            return Err(StoreError::Conflict("workshop has enrollments".into()));
        }
        enrollments.retain(|_, enrollment| enrollment.oficina_id != id);
        workshops.remove(&id);
        Ok(dependents)
    }

    async fn list_workshop_enrollments(&self, id: u64) -> StoreResult<Vec<Enrollment>> {
        let _gate = self.gate.read().await;
        if !self.workshops.read().await.contains_key(&id) {
            return Err(StoreError::NotFound("workshop".into()));
        }
        Ok(self
            .enrollments
            .read()
            .await
            .values()
            .filter(|enrollment| enrollment.oficina_id == id)
            .cloned()
            .collect())
    }

    async fn create_enrollment(
        &self,
        student_id: u64,
        workshop_id: u64,
    ) -> StoreResult<Enrollment> {
        let _gate = self.gate.read().await;
        let slot = self.workshop_slot(workshop_id).await?;
        // Held until the row is inserted; this is the per-workshop critical section.
        let mut workshop = slot.lock().await;

        if !self.students.read().await.contains_key(&student_id) {
            return Err(StoreError::NotFound("student".into()));
        }
        if self.config.duplicate_enrollments == DuplicateEnrollmentPolicy::Reject
            && self.enrollments.read().await.values().any(|enrollment| {
                enrollment.aluno_id == student_id && enrollment.oficina_id == workshop_id
            })
        {
            return Err(StoreError::Conflict("student already enrolled".into()));
        }
        if workshop.vagas_disponiveis == 0 {
            return Err(StoreError::CapacityExceeded("workshop is full".into()));
        }

        workshop.vagas_disponiveis -= 1;
        let enrollment = Enrollment {
            inscricao_id: self.enrollment_ids.next(),
            aluno_id: student_id,
            oficina_id: workshop_id,
            data_inscricao: Utc::now(),
            presenca: None,
            certificado_emitido: None,
        };
        self.enrollments
            .write()
            .await
            .insert(enrollment.inscricao_id, enrollment.clone());
        metrics::gauge!(
            "encosis_workshop_seats_available",
            "oficina_id" => workshop_id.to_string()
        )
        .set(workshop.vagas_disponiveis as f64);
        Ok(enrollment)
    }

    async fn decrement_workshop_seats(&self, workshop_id: u64) -> StoreResult<u32> {
        let _gate = self.gate.read().await;
        let slot = self.workshop_slot(workshop_id).await?;
        let mut workshop = slot.lock().await;
        if workshop.vagas_disponiveis == 0 {
            return Err(StoreError::CapacityExceeded("workshop is full".into()));
        }
        workshop.vagas_disponiveis -= 1;
        Ok(workshop.vagas_disponiveis)
    }

    async fn create_lecture(&self, lecture: NewLecture) -> StoreResult<Lecture> {
        let _gate = self.gate.read().await;
        if !self
            .professors
            .read()
            .await
            .contains_key(&lecture.professor_id)
        {
            return Err(StoreError::NotFound("professor".into()));
        }
        let lecture = lecture.into_lecture(self.lecture_ids.next());
        self.lectures
            .write()
            .await
            .insert(lecture.id, Arc::new(Mutex::new(lecture.clone())));
        Ok(lecture)
    }

    async fn get_lecture(&self, id: u64) -> StoreResult<Lecture> {
        let slot = self.lecture_slot(id).await?;
        let lecture = slot.lock().await.clone();
        Ok(lecture)
    }

    async fn list_lectures(&self) -> StoreResult<Vec<Lecture>> {
        let lectures = self.lectures.read().await;
        let mut items = Vec::with_capacity(lectures.len());
        for slot in lectures.values() {
            items.push(slot.lock().await.clone());
        }
        items.sort_by(|a, b| a.data_hora.cmp(&b.data_hora).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn delete_lecture(&self, id: u64) -> StoreResult<u64> {
        let _gate = self.gate.write().await;
        let mut lectures = self.lectures.write().await;
        if !lectures.contains_key(&id) {
            return Err(StoreError::NotFound("lecture".into()));
        }
        let mut lecture_enrollments = self.lecture_enrollments.write().await;
        let dependents = lecture_enrollments
            .values()
            .filter(|enrollment| enrollment.palestra_id == id)
            .count() as u64;
        if dependents > 0 && self.config.delete_policy == DeletePolicy::Reject {
            return Err(StoreError::Conflict("lecture has enrollments".into()));
        }
        lecture_enrollments.retain(|_, enrollment| enrollment.palestra_id != id);
        lectures.remove(&id);
        Ok(dependents)
    }

    async fn create_lecture_enrollment(
        &self,
        student_id: u64,
        lecture_id: u64,
    ) -> StoreResult<LectureEnrollment> {
        let _gate = self.gate.read().await;
        let slot = self.lecture_slot(lecture_id).await?;
        let lecture = slot.lock().await;

        if !self.students.read().await.contains_key(&student_id) {
            return Err(StoreError::NotFound("student".into()));
        }
        let (taken, duplicate) = self
            .lecture_enrollments
            .read()
            .await
            .values()
            .filter(|enrollment| enrollment.palestra_id == lecture_id)
            .fold((0u64, false), |(taken, duplicate), enrollment| {
                (taken + 1, duplicate || enrollment.aluno_id == student_id)
            });
        if duplicate && self.config.duplicate_enrollments == DuplicateEnrollmentPolicy::Reject {
            return Err(StoreError::Conflict("student already enrolled".into()));
        }
        if taken >= u64::from(lecture.capacidade) {
            return Err(StoreError::CapacityExceeded("lecture is full".into()));
        }

        let enrollment = LectureEnrollment {
            inscricao_id: self.lecture_enrollment_ids.next(),
            aluno_id: student_id,
            palestra_id: lecture_id,
            data_inscricao: Utc::now(),
            presenca: None,
        };
        self.lecture_enrollments
            .write()
            .await
            .insert(enrollment.inscricao_id, enrollment.clone());
        Ok(enrollment)
    }

    async fn catalog_summary(&self) -> StoreResult<CatalogSummary> {
        let _gate = self.gate.read().await;
        let students = self.students.read().await;
        let mut recent: Vec<Student> = students.values().cloned().collect();
        recent.sort_by(|a, b| {
            b.data_cadastro
                .cmp(&a.data_cadastro)
                .then(b.id.cmp(&a.id))
        });
        recent.truncate(RECENT_STUDENTS_LIMIT);
        Ok(CatalogSummary {
            total_alunos: students.len() as u64,
            total_professores: self.professors.read().await.len() as u64,
            total_oficinas: self.workshops.read().await.len() as u64,
            total_palestras: self.lectures.read().await.len() as u64,
            total_inscricoes: self.enrollments.read().await.len() as u64,
            alunos_recentes: recent,
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        // Always reachable; the maps live as long as the process.
        Ok(())
    }

    async fn close(&self) {}

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
