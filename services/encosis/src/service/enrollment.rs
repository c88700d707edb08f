//! Workshop and lecture enrollment.
//!
//! # Purpose
//! Turns an enrollment intent into one atomic store operation. The service
//! holds no state of its own: the seat check and the seat decrement happen
//! inside `CatalogStore::create_enrollment`, never as a read here followed by
//! a write later.
//!
//! # Observability
//! Every attempt increments `encosis_enrollments_total` labelled with the
//! target (`workshop` or `lecture`) and the outcome.
use super::{ServiceError, ServiceResult};
use crate::model::{Enrollment, EnrollmentRequest, LectureEnrollment, LectureEnrollmentRequest};
use crate::store::CatalogStore;
use std::sync::Arc;

pub const MISSING_WORKSHOP_IDS: &str = "aluno_id and oficina_id are required";
pub const MISSING_LECTURE_IDS: &str = "aluno_id and palestra_id are required";

#[derive(Clone)]
pub struct EnrollmentService {
    store: Arc<dyn CatalogStore>,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Enroll a student in a workshop, taking exactly one seat.
    ///
    /// # Errors
    /// - `Validation` when either id is missing or zero (nothing is touched).
    /// - `NotFound` naming `student` or `workshop`.
    /// - `CapacityExceeded` when no seat is left.
    /// - `Conflict` for a repeat enrollment under the reject policy.
    /// - `Storage` for backend failures; no partial state survives them.
    pub async fn enroll(&self, request: EnrollmentRequest) -> ServiceResult<Enrollment> {
        let (Some(student_id), Some(workshop_id)) = (
            request.aluno_id.filter(|id| *id > 0),
            request.oficina_id.filter(|id| *id > 0),
        ) else {
            let err = ServiceError::Validation(MISSING_WORKSHOP_IDS.to_string());
            record("workshop", Err(&err));
            return Err(err);
        };

        match self.store.create_enrollment(student_id, workshop_id).await {
            Ok(enrollment) => {
                tracing::info!(
                    aluno_id = student_id,
                    oficina_id = workshop_id,
                    inscricao_id = enrollment.inscricao_id,
                    "workshop enrollment accepted"
                );
                record("workshop", Ok(()));
                Ok(enrollment)
            }
            Err(err) => {
                let err = ServiceError::from(err);
                log_rejection("workshop", student_id, workshop_id, &err);
                record("workshop", Err(&err));
                Err(err)
            }
        }
    }

    /// Enroll a student in a lecture, bounded by the lecture's `capacidade`.
    pub async fn enroll_lecture(
        &self,
        request: LectureEnrollmentRequest,
    ) -> ServiceResult<LectureEnrollment> {
        let (Some(student_id), Some(lecture_id)) = (
            request.aluno_id.filter(|id| *id > 0),
            request.palestra_id.filter(|id| *id > 0),
        ) else {
            let err = ServiceError::Validation(MISSING_LECTURE_IDS.to_string());
            record("lecture", Err(&err));
            return Err(err);
        };

        match self
            .store
            .create_lecture_enrollment(student_id, lecture_id)
            .await
        {
            Ok(enrollment) => {
                tracing::info!(
                    aluno_id = student_id,
                    palestra_id = lecture_id,
                    inscricao_id = enrollment.inscricao_id,
                    "lecture enrollment accepted"
                );
                record("lecture", Ok(()));
                Ok(enrollment)
            }
            Err(err) => {
                let err = ServiceError::from(err);
                log_rejection("lecture", student_id, lecture_id, &err);
                record("lecture", Err(&err));
                Err(err)
            }
        }
    }
}

fn log_rejection(kind: &'static str, student_id: u64, target_id: u64, err: &ServiceError) {
    match err {
        ServiceError::Storage(source) => {
            tracing::error!(
                kind,
                aluno_id = student_id,
                target_id,
                error = ?source,
                "enrollment failed"
            );
        }
        other => {
            tracing::info!(
                kind,
                aluno_id = student_id,
                target_id,
                reason = %other,
                "enrollment rejected"
            );
        }
    }
}

fn record(kind: &'static str, result: Result<(), &ServiceError>) {
    let outcome = match result {
        Ok(()) => "accepted",
        Err(err) => err.outcome(),
    };
    metrics::counter!("encosis_enrollments_total", "target" => kind, "outcome" => outcome)
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewLecture, NewProfessor, NewStudent, NewWorkshop};
    use crate::store::memory::InMemoryStore;
    use crate::store::{CatalogStore, StoreConfig};
    use chrono::{NaiveDate, NaiveDateTime};

    async fn seeded(seats: u32) -> (Arc<InMemoryStore>, u64, u64) {
        let store = Arc::new(InMemoryStore::new(StoreConfig::default()));
        let professor = store
            .create_professor(NewProfessor {
                nome: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                especialidade: None,
                biografia: None,
                telefone: None,
            })
            .await
            .expect("professor");
        let workshop = store
            .create_workshop(NewWorkshop {
                titulo: "SQL".to_string(),
                descricao: "joins".to_string(),
                carga_horaria: 4,
                data_inicio: NaiveDate::from_ymd_opt(2025, 5, 10).expect("date"),
                data_fim: NaiveDate::from_ymd_opt(2025, 5, 10).expect("date"),
                vagas_total: seats,
                local: "Lab".to_string(),
                materiais_necessarios: None,
                professor_id: professor.id,
            })
            .await
            .expect("workshop");
        let student = store
            .create_student(NewStudent {
                nome: "Bia".to_string(),
                email: "bia@example.com".to_string(),
                telefone: None,
                instituicao: None,
            })
            .await
            .expect("student");
        (store, student.id, workshop.id)
    }

    fn request(aluno_id: Option<u64>, oficina_id: Option<u64>) -> EnrollmentRequest {
        EnrollmentRequest {
            aluno_id,
            oficina_id,
        }
    }

    #[tokio::test]
    async fn missing_or_zero_ids_fail_validation_without_touching_seats() {
        let (store, student_id, workshop_id) = seeded(1).await;
        let service = EnrollmentService::new(store.clone());

        for bad in [
            request(None, Some(workshop_id)),
            request(Some(student_id), None),
            request(Some(0), Some(workshop_id)),
            request(None, None),
        ] {
            let err = service.enroll(bad).await.expect_err("validation");
            assert!(matches!(err, ServiceError::Validation(ref msg) if msg == MISSING_WORKSHOP_IDS));
        }
        let workshop = store.get_workshop(workshop_id).await.expect("workshop");
        assert_eq!(workshop.vagas_disponiveis, 1);
    }

    #[tokio::test]
    async fn enroll_maps_store_outcomes() {
        let (store, student_id, workshop_id) = seeded(1).await;
        let service = EnrollmentService::new(store.clone());

        let enrollment = service
            .enroll(request(Some(student_id), Some(workshop_id)))
            .await
            .expect("enroll");
        assert_eq!(enrollment.oficina_id, workshop_id);

        let err = service
            .enroll(request(Some(student_id), Some(workshop_id)))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, ServiceError::Conflict(_)));

        let other = store
            .create_student(NewStudent {
                nome: "Caio".to_string(),
                email: "caio@example.com".to_string(),
                telefone: None,
                instituicao: None,
            })
            .await
            .expect("student");
        let err = service
            .enroll(request(Some(other.id), Some(workshop_id)))
            .await
            .expect_err("full");
        assert!(matches!(err, ServiceError::CapacityExceeded(_)));

        let err = service
            .enroll(request(Some(other.id), Some(4040)))
            .await
            .expect_err("missing workshop");
        assert!(matches!(err, ServiceError::NotFound(ref entity) if entity == "workshop"));
    }

    #[tokio::test]
    async fn lecture_enrollment_validates_and_delegates() {
        let (store, student_id, _) = seeded(1).await;
        let lecture = store
            .create_lecture(NewLecture {
                titulo: "Abertura".to_string(),
                descricao: "Boas-vindas".to_string(),
                professor_id: 1,
                data_hora: NaiveDateTime::parse_from_str("2025-05-10 08:00:00", "%Y-%m-%d %H:%M:%S")
                    .expect("datetime"),
                local: "Auditorio".to_string(),
                capacidade: 50,
            })
            .await
            .expect("lecture");
        let service = EnrollmentService::new(store);

        let err = service
            .enroll_lecture(LectureEnrollmentRequest {
                aluno_id: Some(student_id),
                palestra_id: None,
            })
            .await
            .expect_err("validation");
        assert!(matches!(err, ServiceError::Validation(_)));

        let enrollment = service
            .enroll_lecture(LectureEnrollmentRequest {
                aluno_id: Some(student_id),
                palestra_id: Some(lecture.id),
            })
            .await
            .expect("enroll");
        assert_eq!(enrollment.palestra_id, lecture.id);
        assert_eq!(enrollment.presenca, None);
    }
}
