//! MySQL-backed implementation of the catalog store.
//!
//! # What this module is
//! The durable `CatalogStore` backend. It talks to the `encosis2025` schema
//! (students, professors, workshops, lectures and the two enrollment tables)
//! through a `sqlx::MySqlPool` owned by the store.
//!
//! # Key invariants
//! - Seat accounting happens only inside transactions that hold the
//!   workshop row lock (`SELECT ... FOR UPDATE`). The conditional decrement
//!   `vagas_disponiveis > 0` is the last guard against overselling.
//! - Foreign keys exist without `ON DELETE CASCADE`; dependent rows are removed
//!   explicitly, in the same transaction as their parent, according to the
//!   configured [`DeletePolicy`].
//!
//! # Concurrency model
//! - Every operation acquires one pooled connection for its own scope and
//!   releases it on return (or on transaction commit/rollback).
//! - Enrollments in the same workshop queue on its row lock; enrollments in
//!   different workshops proceed in parallel up to the pool size.
//! - Deleting a student locks the workshops it holds seats in before the
//!   student row, the same order enrollment uses.
//!
//! # Operational notes
//! - Migrations run at startup via `sqlx::migrate!("./migrations")`; startup
//!   fails rather than serving against an unknown schema.
//! - Credentials come from configuration and are never logged.
//! - Dropping an uncommitted `sqlx::Transaction` rolls it back, so any early
//!   `return Err(..)` leaves no partial state behind.
use super::{
    CatalogStore, DeletePolicy, DuplicateEnrollmentPolicy, RECENT_STUDENTS_LIMIT, StoreConfig,
    StoreError, StoreResult,
};
use crate::config::MysqlConfig;
use crate::model::{
    CatalogSummary, Enrollment, Lecture, LectureEnrollment, NewLecture, NewProfessor, NewStudent,
    NewWorkshop, Professor, Student, StudentWithWorkshops, Workshop, WorkshopSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{FromRow, MySqlPool};
use std::time::Duration;

const STUDENT_COLUMNS: &str = "id, nome, email, telefone, instituicao, data_cadastro";
const PROFESSOR_COLUMNS: &str = "id, nome, email, especialidade, biografia, telefone";
const WORKSHOP_COLUMNS: &str = "id, titulo, descricao, carga_horaria, data_inicio, data_fim, \
     vagas_total, vagas_disponiveis, local, materiais_necessarios, professor_id";
const LECTURE_COLUMNS: &str = "id, titulo, descricao, professor_id, data_hora, local, capacidade";
const ENROLLMENT_COLUMNS: &str =
    "inscricao_id, aluno_id, oficina_id, data_inscricao, presenca, certificado_emitido";
const LECTURE_ENROLLMENT_COLUMNS: &str =
    "inscricao_id, aluno_id, palestra_id, data_inscricao, presenca";

/// Durable catalog store backed by MySQL.
///
/// # Example
/// ```rust,no_run
/// use encosis::config::MysqlConfig;
/// use encosis::store::{StoreConfig, mysql::MySqlStore};
///
/// async fn open(mysql: MysqlConfig) {
///     let _ = MySqlStore::connect(&mysql, StoreConfig::default()).await;
/// }
/// ```
pub struct MySqlStore {
    pool: MySqlPool,
    config: StoreConfig,
}

#[derive(Debug, Clone, FromRow)]
struct DbStudent {
    id: u64,
    nome: String,
    email: String,
    telefone: Option<String>,
    instituicao: Option<String>,
    data_cadastro: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct DbStudentListing {
    #[sqlx(flatten)]
    student: DbStudent,
    oficinas_inscritas: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct DbProfessor {
    id: u64,
    nome: String,
    email: String,
    especialidade: Option<String>,
    biografia: Option<String>,
    telefone: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct DbWorkshop {
    id: u64,
    titulo: String,
    descricao: String,
    carga_horaria: u32,
    data_inicio: NaiveDate,
    data_fim: NaiveDate,
    vagas_total: u32,
    vagas_disponiveis: u32,
    local: String,
    materiais_necessarios: Option<String>,
    professor_id: u64,
}

#[derive(Debug, Clone, FromRow)]
struct DbWorkshopSummary {
    id: u64,
    titulo: String,
    vagas_disponiveis: u32,
    data_inicio: NaiveDate,
    data_fim: NaiveDate,
    professor_nome: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct DbLecture {
    id: u64,
    titulo: String,
    descricao: String,
    professor_id: u64,
    data_hora: NaiveDateTime,
    local: String,
    capacidade: u32,
}

#[derive(Debug, Clone, FromRow)]
struct DbEnrollment {
    inscricao_id: u64,
    aluno_id: u64,
    oficina_id: u64,
    data_inscricao: DateTime<Utc>,
    presenca: Option<bool>,
    certificado_emitido: Option<bool>,
}

#[derive(Debug, Clone, FromRow)]
struct DbLectureEnrollment {
    inscricao_id: u64,
    aluno_id: u64,
    palestra_id: u64,
    data_inscricao: DateTime<Utc>,
    presenca: Option<bool>,
}

impl From<DbStudent> for Student {
    fn from(row: DbStudent) -> Self {
        Student {
            id: row.id,
            nome: row.nome,
            email: row.email,
            telefone: row.telefone,
            instituicao: row.instituicao,
            data_cadastro: row.data_cadastro,
        }
    }
}

impl From<DbProfessor> for Professor {
    fn from(row: DbProfessor) -> Self {
        Professor {
            id: row.id,
            nome: row.nome,
            email: row.email,
            especialidade: row.especialidade,
            biografia: row.biografia,
            telefone: row.telefone,
        }
    }
}

impl From<DbWorkshop> for Workshop {
    fn from(row: DbWorkshop) -> Self {
        Workshop {
            id: row.id,
            titulo: row.titulo,
            descricao: row.descricao,
            carga_horaria: row.carga_horaria,
            data_inicio: row.data_inicio,
            data_fim: row.data_fim,
            vagas_total: row.vagas_total,
            vagas_disponiveis: row.vagas_disponiveis,
            local: row.local,
            materiais_necessarios: row.materiais_necessarios,
            professor_id: row.professor_id,
        }
    }
}

impl From<DbWorkshopSummary> for WorkshopSummary {
    fn from(row: DbWorkshopSummary) -> Self {
        WorkshopSummary {
            id: row.id,
            titulo: row.titulo,
            vagas_disponiveis: row.vagas_disponiveis,
            data_inicio: row.data_inicio,
            data_fim: row.data_fim,
            professor_nome: row.professor_nome,
        }
    }
}

impl From<DbLecture> for Lecture {
    fn from(row: DbLecture) -> Self {
        Lecture {
            id: row.id,
            titulo: row.titulo,
            descricao: row.descricao,
            professor_id: row.professor_id,
            data_hora: row.data_hora,
            local: row.local,
            capacidade: row.capacidade,
        }
    }
}

impl From<DbEnrollment> for Enrollment {
    fn from(row: DbEnrollment) -> Self {
        Enrollment {
            inscricao_id: row.inscricao_id,
            aluno_id: row.aluno_id,
            oficina_id: row.oficina_id,
            data_inscricao: row.data_inscricao,
            presenca: row.presenca,
            certificado_emitido: row.certificado_emitido,
        }
    }
}

impl From<DbLectureEnrollment> for LectureEnrollment {
    fn from(row: DbLectureEnrollment) -> Self {
        LectureEnrollment {
            inscricao_id: row.inscricao_id,
            aluno_id: row.aluno_id,
            palestra_id: row.palestra_id,
            data_inscricao: row.data_inscricao,
            presenca: row.presenca,
        }
    }
}

impl MySqlStore {
    /// Open the pool described by `mysql`, run migrations, and return the store.
    ///
    /// # Errors
    /// - Connection, pool acquisition or migration failures map to
    ///   [`StoreError::Unexpected`].
    pub async fn connect(mysql: &MysqlConfig, config: StoreConfig) -> StoreResult<Self> {
        // `acquire_timeout` bounds how long a request waits for a pooled
        // connection; exhausting the pool fails fast instead of hanging.
        let options = MySqlConnectOptions::new()
            .host(&mysql.host)
            .port(mysql.port)
            .username(&mysql.user)
            .password(&mysql.password)
            .database(&mysql.database);
        let pool = MySqlPoolOptions::new()
            .max_connections(mysql.max_connections)
            .acquire_timeout(Duration::from_millis(mysql.acquire_timeout_ms))
            .connect_with(options)
            .await?;
        Self::with_pool(pool, config).await
    }

    /// Wrap an existing pool, applying pending migrations first.
    pub async fn with_pool(pool: MySqlPool, config: StoreConfig) -> StoreResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool, config })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn fetch_student(&self, id: u64) -> StoreResult<Option<Student>> {
        let row: Option<DbStudent> = sqlx::query_as(&format!(
            "SELECT {STUDENT_COLUMNS} FROM alunos WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Student::from))
    }
}

#[async_trait]
impl CatalogStore for MySqlStore {
    async fn create_student(&self, student: NewStudent) -> StoreResult<Student> {
        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query(
            "INSERT INTO alunos (nome, email, telefone, instituicao) VALUES (?, ?, ?, ?)",
        )
        .bind(&student.nome)
        .bind(&student.email)
        .bind(&student.telefone)
        .bind(&student.instituicao)
        .execute(&mut *tx)
        .await?;
        // Read back so `data_cadastro` reflects the stored (second-precision) value.
        let row: DbStudent = sqlx::query_as(&format!(
            "SELECT {STUDENT_COLUMNS} FROM alunos WHERE id = ?"
        ))
        .bind(inserted.last_insert_id())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn get_student(&self, id: u64) -> StoreResult<Student> {
        self.fetch_student(id)
            .await?
            .ok_or_else(|| StoreError::NotFound("student".into()))
    }

    async fn list_students(&self) -> StoreResult<Vec<StudentWithWorkshops>> {
        let rows: Vec<DbStudentListing> = sqlx::query_as(
            r#"SELECT a.id, a.nome, a.email, a.telefone, a.instituicao, a.data_cadastro,
                      GROUP_CONCAT(o.titulo ORDER BY o.titulo SEPARATOR ', ') AS oficinas_inscritas
               FROM alunos a
               LEFT JOIN alunos_oficinas ao ON ao.aluno_id = a.id
               LEFT JOIN oficinas o ON o.id = ao.oficina_id
               GROUP BY a.id
               ORDER BY a.nome, a.id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| StudentWithWorkshops {
                student: row.student.into(),
                oficinas_inscritas: row.oficinas_inscritas.filter(|titles| !titles.is_empty()),
            })
            .collect())
    }

    async fn delete_student(&self, id: u64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        // Lock the workshops first so this transaction and a concurrent
        // enrollment queue on the same row in the same order.
        sqlx::query(
            r#"SELECT id FROM oficinas
               WHERE id IN (SELECT oficina_id FROM alunos_oficinas WHERE aluno_id = ?)
               ORDER BY id FOR UPDATE"#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let found: Option<u64> = sqlx::query_scalar("SELECT id FROM alunos WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("student".into()));
        }

        let held: Vec<u64> =
            sqlx::query_scalar("SELECT oficina_id FROM alunos_oficinas WHERE aluno_id = ? FOR UPDATE")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        let lectures: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM alunos_palestras WHERE aluno_id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if self.config.delete_policy == DeletePolicy::Reject && (!held.is_empty() || lectures > 0) {
            return Err(StoreError::Conflict("student has enrollments".into()));
        }

        let mut returned: Vec<(u64, u32)> = Vec::new();
        for workshop_id in held {
            match returned.iter_mut().find(|(id, _)| *id == workshop_id) {
                Some((_, seats)) => *seats += 1,
                None => returned.push((workshop_id, 1)),
            }
        }
        for (workshop_id, seats) in &returned {
            sqlx::query(
                r#"UPDATE oficinas
                   SET vagas_disponiveis = LEAST(vagas_total, vagas_disponiveis + ?)
                   WHERE id = ?"#,
            )
            .bind(*seats)
            .bind(*workshop_id)
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query("DELETE FROM alunos_oficinas WHERE aluno_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM alunos_palestras WHERE aluno_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM alunos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_professor(&self, professor: NewProfessor) -> StoreResult<Professor> {
        let inserted = sqlx::query(
            r#"INSERT INTO professores (nome, email, especialidade, biografia, telefone)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&professor.nome)
        .bind(&professor.email)
        .bind(&professor.especialidade)
        .bind(&professor.biografia)
        .bind(&professor.telefone)
        .execute(&self.pool)
        .await?;
        Ok(Professor {
            id: inserted.last_insert_id(),
            nome: professor.nome,
            email: professor.email,
            especialidade: professor.especialidade,
            biografia: professor.biografia,
            telefone: professor.telefone,
        })
    }

    async fn get_professor(&self, id: u64) -> StoreResult<Professor> {
        let row: Option<DbProfessor> = sqlx::query_as(&format!(
            "SELECT {PROFESSOR_COLUMNS} FROM professores WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Professor::from)
            .ok_or_else(|| StoreError::NotFound("professor".into()))
    }

    async fn list_professors(&self) -> StoreResult<Vec<Professor>> {
        let rows: Vec<DbProfessor> = sqlx::query_as(&format!(
            "SELECT {PROFESSOR_COLUMNS} FROM professores ORDER BY nome, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Professor::from).collect())
    }

    async fn delete_professor(&self, id: u64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let found: Option<u64> =
            sqlx::query_scalar("SELECT id FROM professores WHERE id = ? FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("professor".into()));
        }
        let references: i64 = sqlx::query_scalar(
            r#"SELECT (SELECT COUNT(*) FROM oficinas WHERE professor_id = ?)
                    + (SELECT COUNT(*) FROM palestras WHERE professor_id = ?)"#,
        )
        .bind(id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if references > 0 {
            return Err(StoreError::Conflict(
                "professor teaches workshops or lectures".into(),
            ));
        }
        let deleted = sqlx::query("DELETE FROM professores WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await;
        if let Err(err) = deleted {
            if is_foreign_key_violation(&err) {
                return Err(StoreError::Conflict(
                    "professor teaches workshops or lectures".into(),
                ));
            }
            return Err(err.into());
        }
        tx.commit().await?;
        Ok(())
    }

    async fn create_workshop(&self, workshop: NewWorkshop) -> StoreResult<Workshop> {
        let inserted = sqlx::query(
            r#"INSERT INTO oficinas
               (titulo, descricao, carga_horaria, data_inicio, data_fim, vagas_total,
                vagas_disponiveis, local, materiais_necessarios, professor_id)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&workshop.titulo)
        .bind(&workshop.descricao)
        .bind(workshop.carga_horaria)
        .bind(workshop.data_inicio)
        .bind(workshop.data_fim)
        .bind(workshop.vagas_total)
        .bind(workshop.vagas_total)
        .bind(&workshop.local)
        .bind(&workshop.materiais_necessarios)
        .bind(workshop.professor_id)
        .execute(&self.pool)
        .await;
        match inserted {
            Ok(result) => Ok(workshop.into_workshop(result.last_insert_id())),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(StoreError::NotFound("professor".into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_workshop(&self, id: u64) -> StoreResult<Workshop> {
        let row: Option<DbWorkshop> = sqlx::query_as(&format!(
            "SELECT {WORKSHOP_COLUMNS} FROM oficinas WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Workshop::from)
            .ok_or_else(|| StoreError::NotFound("workshop".into()))
    }

    async fn list_workshops(&self) -> StoreResult<Vec<WorkshopSummary>> {
        let rows: Vec<DbWorkshopSummary> = sqlx::query_as(
            r#"SELECT o.id, o.titulo, o.vagas_disponiveis, o.data_inicio, o.data_fim,
                      p.nome AS professor_nome
               FROM oficinas o
               LEFT JOIN professores p ON p.id = o.professor_id
               ORDER BY o.titulo, o.id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(WorkshopSummary::from).collect())
    }

    async fn delete_workshop(&self, id: u64) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let found: Option<u64> = sqlx::query_scalar("SELECT id FROM oficinas WHERE id = ? FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("workshop".into()));
        }
        if self.config.delete_policy == DeletePolicy::Reject {
            let dependents: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM alunos_oficinas WHERE oficina_id = ?")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            if dependents > 0 {
                return Err(StoreError::Conflict("workshop has enrollments".into()));
            }
        }
        let removed = sqlx::query("DELETE FROM alunos_oficinas WHERE oficina_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM oficinas WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(removed)
    }

    async fn list_workshop_enrollments(&self, id: u64) -> StoreResult<Vec<Enrollment>> {
        let mut tx = self.pool.begin().await?;
        let found: Option<u64> = sqlx::query_scalar("SELECT id FROM oficinas WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("workshop".into()));
        }
        let rows: Vec<DbEnrollment> = sqlx::query_as(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM alunos_oficinas WHERE oficina_id = ? ORDER BY inscricao_id"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows.into_iter().map(Enrollment::from).collect())
    }

    async fn create_enrollment(
        &self,
        student_id: u64,
        workshop_id: u64,
    ) -> StoreResult<Enrollment> {
        let mut tx = self.pool.begin().await?;

        let seats: Option<u32> =
            sqlx::query_scalar("SELECT vagas_disponiveis FROM oficinas WHERE id = ? FOR UPDATE")
                .bind(workshop_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(seats) = seats else {
            return Err(StoreError::NotFound("workshop".into()));
        };

        let students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alunos WHERE id = ?")
            .bind(student_id)
            .fetch_one(&mut *tx)
            .await?;
        if students == 0 {
            return Err(StoreError::NotFound("student".into()));
        }

        if self.config.duplicate_enrollments == DuplicateEnrollmentPolicy::Reject {
            let existing: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM alunos_oficinas WHERE aluno_id = ? AND oficina_id = ?",
            )
            .bind(student_id)
            .bind(workshop_id)
            .fetch_one(&mut *tx)
            .await?;
            if existing > 0 {
                return Err(StoreError::Conflict("student already enrolled".into()));
            }
        }

        let taken = sqlx::query(
            "UPDATE oficinas SET vagas_disponiveis = vagas_disponiveis - 1 WHERE id = ? AND vagas_disponiveis > 0",
        )
        .bind(workshop_id)
        .execute(&mut *tx)
        .await?;
        if taken.rows_affected() == 0 {
            return Err(StoreError::CapacityExceeded("workshop is full".into()));
        }

        let inserted = sqlx::query("INSERT INTO alunos_oficinas (aluno_id, oficina_id) VALUES (?, ?)")
            .bind(student_id)
            .bind(workshop_id)
            .execute(&mut *tx)
            .await;
        let inserted = match inserted {
            Ok(result) => result,
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(StoreError::NotFound("student".into()));
            }
            Err(err) => return Err(err.into()),
        };
        let row: DbEnrollment = sqlx::query_as(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM alunos_oficinas WHERE inscricao_id = ?"
        ))
        .bind(inserted.last_insert_id())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        metrics::gauge!(
            "encosis_workshop_seats_available",
            "oficina_id" => workshop_id.to_string()
        )
        .set(seats.saturating_sub(1) as f64);
        Ok(row.into())
    }

    async fn decrement_workshop_seats(&self, workshop_id: u64) -> StoreResult<u32> {
        let mut tx = self.pool.begin().await?;
        let seats: Option<u32> =
            sqlx::query_scalar("SELECT vagas_disponiveis FROM oficinas WHERE id = ? FOR UPDATE")
                .bind(workshop_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(seats) = seats else {
            return Err(StoreError::NotFound("workshop".into()));
        };
        let taken = sqlx::query(
            "UPDATE oficinas SET vagas_disponiveis = vagas_disponiveis - 1 WHERE id = ? AND vagas_disponiveis > 0",
        )
        .bind(workshop_id)
        .execute(&mut *tx)
        .await?;
        if taken.rows_affected() == 0 {
            return Err(StoreError::CapacityExceeded("workshop is full".into()));
        }
        tx.commit().await?;
        Ok(seats - 1)
    }

    async fn create_lecture(&self, lecture: NewLecture) -> StoreResult<Lecture> {
        let inserted = sqlx::query(
            r#"INSERT INTO palestras (titulo, descricao, professor_id, data_hora, local, capacidade)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&lecture.titulo)
        .bind(&lecture.descricao)
        .bind(lecture.professor_id)
        .bind(lecture.data_hora)
        .bind(&lecture.local)
        .bind(lecture.capacidade)
        .execute(&self.pool)
        .await;
        match inserted {
            Ok(result) => Ok(lecture.into_lecture(result.last_insert_id())),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(StoreError::NotFound("professor".into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_lecture(&self, id: u64) -> StoreResult<Lecture> {
        let row: Option<DbLecture> = sqlx::query_as(&format!(
            "SELECT {LECTURE_COLUMNS} FROM palestras WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Lecture::from)
            .ok_or_else(|| StoreError::NotFound("lecture".into()))
    }

    async fn list_lectures(&self) -> StoreResult<Vec<Lecture>> {
        let rows: Vec<DbLecture> = sqlx::query_as(&format!(
            "SELECT {LECTURE_COLUMNS} FROM palestras ORDER BY data_hora, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Lecture::from).collect())
    }

    async fn delete_lecture(&self, id: u64) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let found: Option<u64> =
            sqlx::query_scalar("SELECT id FROM palestras WHERE id = ? FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if found.is_none() {
            return Err(StoreError::NotFound("lecture".into()));
        }
        if self.config.delete_policy == DeletePolicy::Reject {
            let dependents: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM alunos_palestras WHERE palestra_id = ?")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            if dependents > 0 {
                return Err(StoreError::Conflict("lecture has enrollments".into()));
            }
        }
        let removed = sqlx::query("DELETE FROM alunos_palestras WHERE palestra_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM palestras WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(removed)
    }

    async fn create_lecture_enrollment(
        &self,
        student_id: u64,
        lecture_id: u64,
    ) -> StoreResult<LectureEnrollment> {
        let mut tx = self.pool.begin().await?;
        let capacity: Option<u32> =
            sqlx::query_scalar("SELECT capacidade FROM palestras WHERE id = ? FOR UPDATE")
                .bind(lecture_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(capacity) = capacity else {
            return Err(StoreError::NotFound("lecture".into()));
        };

        let students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alunos WHERE id = ?")
            .bind(student_id)
            .fetch_one(&mut *tx)
            .await?;
        if students == 0 {
            return Err(StoreError::NotFound("student".into()));
        }

        if self.config.duplicate_enrollments == DuplicateEnrollmentPolicy::Reject {
            let existing: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM alunos_palestras WHERE aluno_id = ? AND palestra_id = ?",
            )
            .bind(student_id)
            .bind(lecture_id)
            .fetch_one(&mut *tx)
            .await?;
            if existing > 0 {
                return Err(StoreError::Conflict("student already enrolled".into()));
            }
        }

        let taken: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM alunos_palestras WHERE palestra_id = ?")
                .bind(lecture_id)
                .fetch_one(&mut *tx)
                .await?;
        if taken >= i64::from(capacity) {
            return Err(StoreError::CapacityExceeded("lecture is full".into()));
        }

        let inserted =
            sqlx::query("INSERT INTO alunos_palestras (aluno_id, palestra_id) VALUES (?, ?)")
                .bind(student_id)
                .bind(lecture_id)
                .execute(&mut *tx)
                .await?;
        let row: DbLectureEnrollment = sqlx::query_as(&format!(
            "SELECT {LECTURE_ENROLLMENT_COLUMNS} FROM alunos_palestras WHERE inscricao_id = ?"
        ))
        .bind(inserted.last_insert_id())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn catalog_summary(&self) -> StoreResult<CatalogSummary> {
        let (alunos, professores, oficinas, palestras, inscricoes): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"SELECT (SELECT COUNT(*) FROM alunos),
                          (SELECT COUNT(*) FROM professores),
                          (SELECT COUNT(*) FROM oficinas),
                          (SELECT COUNT(*) FROM palestras),
                          (SELECT COUNT(*) FROM alunos_oficinas)"#,
            )
            .fetch_one(&self.pool)
            .await?;
        let recent: Vec<DbStudent> = sqlx::query_as(&format!(
            "SELECT {STUDENT_COLUMNS} FROM alunos ORDER BY data_cadastro DESC, id DESC LIMIT ?"
        ))
        .bind(RECENT_STUDENTS_LIMIT as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(CatalogSummary {
            total_alunos: alunos as u64,
            total_professores: professores as u64,
            total_oficinas: oficinas as u64,
            total_palestras: palestras as u64,
            total_inscricoes: inscricoes as u64,
            alunos_recentes: recent.into_iter().map(Student::from).collect(),
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "mysql"
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_foreign_key_violation();
    }
    false
}
