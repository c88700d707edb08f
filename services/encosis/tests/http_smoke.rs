mod common;

use axum::http::StatusCode;
use common::{TestApp, memory_app, read_json};
use encosis::store::{DeletePolicy, DuplicateEnrollmentPolicy, StoreConfig};
use http_helpers::{empty_request, json_request};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: &TestApp, request: axum::http::Request<axum::body::Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    (status, read_json(response).await)
}

async fn create(app: &TestApp, uri: &str, body: Value) -> Value {
    let (status, body) = send(app, json_request("POST", uri, body)).await;
    assert_eq!(status, StatusCode::CREATED, "POST {uri}: {body}");
    body
}

async fn create_student(app: &TestApp, nome: &str) -> u64 {
    let body = create(
        app,
        "/alunos/cadastro",
        json!({
            "nome": nome,
            "email": format!("{}@example.com", nome.to_lowercase()),
            "instituicao": "UFRGS"
        }),
    )
    .await;
    body["id"].as_u64().expect("student id")
}

async fn create_professor(app: &TestApp) -> u64 {
    let body = create(
        app,
        "/professores/cadastro",
        json!({
            "nome": "Marta Souza",
            "email": "marta@example.com",
            "especialidade": "Banco de Dados"
        }),
    )
    .await;
    body["id"].as_u64().expect("professor id")
}

fn workshop_body(titulo: &str, vagas: u32, professor_id: u64) -> Value {
    json!({
        "titulo": titulo,
        "descricao": "Oficina pratica",
        "carga_horaria": 4,
        "data_inicio": "2025-05-12",
        "data_fim": "2025-05-13",
        "vagas_total": vagas,
        "local": "Lab 2",
        "professor_id": professor_id
    })
}

async fn create_workshop(app: &TestApp, titulo: &str, vagas: u32, professor_id: u64) -> u64 {
    let body = create(app, "/oficinas/cadastro", workshop_body(titulo, vagas, professor_id)).await;
    assert_eq!(body["vagas_disponiveis"], vagas);
    assert_eq!(body["vagas_total"], vagas);
    body["id"].as_u64().expect("workshop id")
}

async fn enroll(app: &TestApp, aluno_id: u64, oficina_id: u64) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            "POST",
            "/alunos/oficinas/inscrever",
            json!({ "aluno_id": aluno_id, "oficina_id": oficina_id }),
        ),
    )
    .await
}

#[tokio::test]
async fn two_seats_three_students_smoke() {
    let app = memory_app(StoreConfig::default());
    let professor_id = create_professor(&app).await;
    let oficina_id = create_workshop(&app, "Git", 2, professor_id).await;
    let a = create_student(&app, "Ana").await;
    let b = create_student(&app, "Bruno").await;
    let c = create_student(&app, "Carla").await;

    let (status, body) = enroll(&app, a, oficina_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["aluno_id"], a);
    assert_eq!(body["oficina_id"], oficina_id);
    assert!(body["inscricao_id"].as_u64().is_some());
    assert!(body["presenca"].is_null());
    assert!(body["certificado_emitido"].is_null());

    let (status, _) = enroll(&app, b, oficina_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = enroll(&app, c, oficina_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "capacity_exceeded");

    let (status, workshop) = send(&app, empty_request("GET", &format!("/oficinas/{oficina_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(workshop["vagas_disponiveis"], 0);

    let (status, enrollments) = send(
        &app,
        empty_request("GET", &format!("/oficinas/{oficina_id}/inscricoes")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let aluno_ids: Vec<u64> = enrollments
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|row| row["aluno_id"].as_u64())
        .collect();
    assert_eq!(aluno_ids, vec![a, b]);

    let (_, students) = send(&app, empty_request("GET", "/alunos")).await;
    let students = students.as_array().expect("array");
    let carla = students
        .iter()
        .find(|row| row["id"] == c)
        .expect("carla listed");
    assert!(carla["oficinas_inscritas"].is_null());
    let ana = students.iter().find(|row| row["id"] == a).expect("ana listed");
    assert_eq!(ana["oficinas_inscritas"], "Git");
    assert_eq!(ana["instituicao"], "UFRGS");

    let (_, summary) = send(&app, empty_request("GET", "/dashboard")).await;
    assert_eq!(summary["total_alunos"], 3);
    assert_eq!(summary["total_oficinas"], 1);
    assert_eq!(summary["total_inscricoes"], 2);
    assert_eq!(summary["alunos_recentes"].as_array().expect("recent").len(), 3);
}

#[tokio::test]
async fn workshop_listing_joins_professor_name() {
    let app = memory_app(StoreConfig::default());
    let professor_id = create_professor(&app).await;
    create_workshop(&app, "SQL", 10, professor_id).await;
    create_workshop(&app, "Docker", 5, professor_id).await;

    let (status, body) = send(&app, empty_request("GET", "/oficinas")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array");
    let titles: Vec<&str> = items.iter().filter_map(|row| row["titulo"].as_str()).collect();
    assert_eq!(titles, vec!["Docker", "SQL"]);
    assert_eq!(items[0]["professor_nome"], "Marta Souza");
    assert_eq!(items[0]["data_inicio"], "2025-05-12");
    assert!(items[0].get("descricao").is_none());
}

#[tokio::test]
async fn enrollment_errors_map_to_status_codes() {
    let app = memory_app(StoreConfig::default());
    let professor_id = create_professor(&app).await;
    let oficina_id = create_workshop(&app, "Rust", 3, professor_id).await;
    let aluno_id = create_student(&app, "Davi").await;

    let (status, body) = send(
        &app,
        json_request("POST", "/alunos/oficinas/inscrever", json!({ "aluno_id": aluno_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert_eq!(body["message"], "aluno_id and oficina_id are required");

    let (status, body) = enroll(&app, 999, oficina_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "student not found");

    let (status, body) = enroll(&app, aluno_id, 999).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "workshop not found");

    let (status, _) = enroll(&app, aluno_id, oficina_id).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = enroll(&app, aluno_id, oficina_id).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (_, workshop) = send(&app, empty_request("GET", &format!("/oficinas/{oficina_id}"))).await;
    assert_eq!(workshop["vagas_disponiveis"], 2);
}

#[tokio::test]
async fn duplicate_enrollments_can_be_allowed() {
    let app = memory_app(StoreConfig {
        duplicate_enrollments: DuplicateEnrollmentPolicy::Allow,
        ..StoreConfig::default()
    });
    let professor_id = create_professor(&app).await;
    let oficina_id = create_workshop(&app, "Rust", 3, professor_id).await;
    let aluno_id = create_student(&app, "Davi").await;

    for _ in 0..2 {
        let (status, _) = enroll(&app, aluno_id, oficina_id).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, workshop) = send(&app, empty_request("GET", &format!("/oficinas/{oficina_id}"))).await;
    assert_eq!(workshop["vagas_disponiveis"], 1);
}

#[tokio::test]
async fn create_validation_errors() {
    let app = memory_app(StoreConfig::default());

    let (status, body) = send(
        &app,
        json_request("POST", "/alunos/cadastro", json!({ "nome": "Sem Email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let professor_id = create_professor(&app).await;
    let mut zero_seats = workshop_body("Vazia", 0, professor_id);
    zero_seats["vagas_total"] = json!(0);
    let (status, _) = send(&app, json_request("POST", "/oficinas/cadastro", zero_seats)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request("POST", "/oficinas/cadastro", workshop_body("Orfa", 5, 999)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "professor not found");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/palestras/cadastro",
            json!({ "titulo": "Keynote", "professor_id": professor_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().expect("message").contains("capacidade"));

    let (_, workshops) = send(&app, empty_request("GET", "/oficinas")).await;
    assert_eq!(workshops.as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn malformed_bodies_are_validation_errors() {
    let app = memory_app(StoreConfig::default());
    let aluno_id = create_student(&app, "Bruna").await;
    let professor_id = create_professor(&app).await;
    let oficina_id = create_workshop(&app, "Rust", 1, professor_id).await;

    for body in [
        json!({ "aluno_id": "abc", "oficina_id": oficina_id }),
        json!({ "aluno_id": -1, "oficina_id": oficina_id }),
        json!({ "aluno_id": aluno_id, "oficina_id": 1.5 }),
        json!("inscrever"),
    ] {
        let (status, error) = send(
            &app,
            json_request("POST", "/alunos/oficinas/inscrever", body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error["code"], "validation_error");
        assert!(!error["message"].as_str().expect("message").is_empty());
        assert!(error.get("request_id").is_some());
    }

    let broken = axum::http::Request::builder()
        .method("POST")
        .uri("/alunos/cadastro")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"nome\": \"Bruna\""))
        .expect("request");
    let (status, error) = send(&app, broken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "validation_error");

    let untyped = axum::http::Request::builder()
        .method("POST")
        .uri("/professores/cadastro")
        .body(axum::body::Body::from("{\"nome\": \"Ana\", \"email\": \"ana@example.com\"}"))
        .expect("request");
    let (status, error) = send(&app, untyped).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "validation_error");

    let (_, workshop) = send(&app, empty_request("GET", &format!("/oficinas/{oficina_id}"))).await;
    assert_eq!(workshop["vagas_disponiveis"], 1);
}

#[tokio::test]
async fn workshop_delete_cascades_enrollments() {
    let app = memory_app(StoreConfig::default());
    let professor_id = create_professor(&app).await;
    let oficina_id = create_workshop(&app, "Git", 5, professor_id).await;
    let a = create_student(&app, "Ana").await;
    let b = create_student(&app, "Bruno").await;
    enroll(&app, a, oficina_id).await;
    enroll(&app, b, oficina_id).await;

    let (status, body) = send(&app, empty_request("DELETE", &format!("/oficinas/{oficina_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inscricoes_removidas"], 2);
    assert!(body["message"].is_string());

    let (status, _) = send(&app, empty_request("GET", &format!("/oficinas/{oficina_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, summary) = send(&app, empty_request("GET", "/dashboard")).await;
    assert_eq!(summary["total_inscricoes"], 0);

    let (status, _) = send(&app, empty_request("DELETE", &format!("/professores/{professor_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, empty_request("DELETE", &format!("/professores/{professor_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reject_policy_blocks_deletes_with_enrollments() {
    let app = memory_app(StoreConfig {
        delete_policy: DeletePolicy::Reject,
        ..StoreConfig::default()
    });
    let professor_id = create_professor(&app).await;
    let oficina_id = create_workshop(&app, "Git", 5, professor_id).await;
    let aluno_id = create_student(&app, "Ana").await;
    enroll(&app, aluno_id, oficina_id).await;

    let (status, body) = send(&app, empty_request("DELETE", &format!("/oficinas/{oficina_id}"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    let (status, _) = send(&app, empty_request("DELETE", &format!("/alunos/{aluno_id}"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, empty_request("DELETE", &format!("/professores/{professor_id}"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, enrollments) = send(
        &app,
        empty_request("GET", &format!("/oficinas/{oficina_id}/inscricoes")),
    )
    .await;
    assert_eq!(enrollments.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn student_delete_returns_the_seat() {
    let app = memory_app(StoreConfig::default());
    let professor_id = create_professor(&app).await;
    let oficina_id = create_workshop(&app, "Git", 1, professor_id).await;
    let a = create_student(&app, "Ana").await;
    let b = create_student(&app, "Bruno").await;
    enroll(&app, a, oficina_id).await;

    let (status, body) = send(&app, empty_request("DELETE", &format!("/alunos/{a}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    let (status, _) = send(&app, empty_request("GET", &format!("/alunos/{a}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = enroll(&app, b, oficina_id).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn lecture_enrollment_respects_capacity() {
    let app = memory_app(StoreConfig::default());
    let professor_id = create_professor(&app).await;
    let lecture = create(
        &app,
        "/palestras/cadastro",
        json!({
            "titulo": "Abertura",
            "descricao": "Palestra de abertura",
            "professor_id": professor_id,
            "data_hora": "2025-05-12T09:00:00",
            "local": "Auditorio",
            "capacidade": 1
        }),
    )
    .await;
    let palestra_id = lecture["id"].as_u64().expect("lecture id");
    let a = create_student(&app, "Ana").await;
    let b = create_student(&app, "Bruno").await;

    let body = create(
        &app,
        "/alunos/palestras/inscrever",
        json!({ "aluno_id": a, "palestra_id": palestra_id }),
    )
    .await;
    assert_eq!(body["palestra_id"], palestra_id);
    assert!(body["presenca"].is_null());

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/alunos/palestras/inscrever",
            json!({ "aluno_id": b, "palestra_id": palestra_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "capacity_exceeded");

    let (status, body) = send(&app, empty_request("GET", &format!("/palestras/{palestra_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data_hora"], "2025-05-12T09:00:00");

    let (status, body) = send(&app, empty_request("DELETE", &format!("/palestras/{palestra_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inscricoes_removidas"], 1);
    let (_, lectures) = send(&app, empty_request("GET", "/palestras")).await;
    assert_eq!(lectures.as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn professor_routes_smoke() {
    let app = memory_app(StoreConfig::default());
    let professor_id = create_professor(&app).await;

    let (status, body) = send(&app, empty_request("GET", &format!("/professores/{professor_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["especialidade"], "Banco de Dados");
    assert!(body["biografia"].is_null());

    let (_, list) = send(&app, empty_request("GET", "/professores")).await;
    assert_eq!(list.as_array().expect("array").len(), 1);

    let (status, body) = send(&app, empty_request("GET", "/professores/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn system_endpoints_and_docs() {
    let app = memory_app(StoreConfig::default());

    let (status, body) = send(&app, empty_request("GET", "/system/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, empty_request("GET", "/system/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "encosis");
    assert_eq!(body["storage_backend"], "memory");
    assert_eq!(body["durable_storage"], false);

    let (status, body) = send(&app, empty_request("GET", "/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/alunos/oficinas/inscrever").is_some());
    assert!(body["paths"].get("/oficinas/{id}").is_some());
    let schemas = &body["components"]["schemas"];
    assert!(schemas.get("Enrollment").is_some());
    assert!(schemas.get("LectureEnrollment").is_some());
    assert!(schemas.get("ErrorResponse").is_some());
}
