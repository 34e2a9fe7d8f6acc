use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use odonto_core::db::open_pool;
use odonto_http::{router, ApiError, AppState};
use rusqlite::{Connection, TransactionBehavior};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tower::ServiceExt;

/// Router over a file-backed pooled store that lives as long as the value.
struct TestApp {
    state: AppState,
    router: Router,
    _dir: TempDir,
}

fn app_with(seed: impl FnOnce(&Connection)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let pool = open_pool(dir.path().join("odonto.sqlite3"), 4).unwrap();
    let conn = pool.get().unwrap();
    seed(&conn);
    drop(conn);
    let state = AppState::new(pool);
    TestApp {
        router: router(state.clone()),
        state,
        _dir: dir,
    }
}

fn app() -> TestApp {
    app_with(|_| {})
}

fn seed_patient_7(conn: &Connection) {
    conn.execute(
        "INSERT INTO paciente (cod_paciente, nome, cpf, matricula, sexo, idade)
         VALUES (7, 'Paciente Sete', '777', 'M7', 'M', 52);",
        [],
    )
    .unwrap();
}

async fn send(app: &TestApp, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(&body.to_string())).await
}

#[tokio::test]
async fn health_reports_version() {
    let (status, body) = send(&app(), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], odonto_core::core_version());
}

#[tokio::test]
async fn arch_submission_is_stored_in_order() {
    let app = app_with(seed_patient_7);

    let (status, body) = post_json(
        &app,
        "/adddentes",
        json!({
            "Avaliacao_arcada": "5,4,3",
            "fk_Paciente_Cod_Paciente": "7",
            "fk_Dente_Cod_dente": "11,12,13"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dados inseridos com sucesso.");
    assert_eq!(body["linhas"], 3);

    let (status, rows) = send(&app, "GET", "/dentes", None).await;
    assert_eq!(status, StatusCode::OK);
    let triples: Vec<(String, i64, i64)> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["avaliacao_arcada"].as_str().unwrap().to_string(),
                row["fk_paciente_cod_paciente"].as_i64().unwrap(),
                row["fk_dente_cod_dente"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        triples,
        vec![
            ("5".to_string(), 7, 11),
            ("4".to_string(), 7, 12),
            ("3".to_string(), 7, 13),
        ]
    );
}

#[tokio::test]
async fn arch_submission_accepts_json_arrays() {
    let app = app_with(seed_patient_7);

    let (status, body) = post_json(
        &app,
        "/adddentes",
        json!({
            "Avaliacao_arcada": [2, 1],
            "fk_Paciente_Cod_Paciente": 7,
            "fk_Dente_Cod_dente": [21, 22]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["linhas"], 2);
}

#[tokio::test]
async fn length_mismatch_is_rejected_and_nothing_is_stored() {
    let app = app_with(seed_patient_7);

    let (status, body) = post_json(
        &app,
        "/adddentes",
        json!({
            "Avaliacao_arcada": "5,4",
            "fk_Paciente_Cod_Paciente": "7",
            "fk_Dente_Cod_dente": "11,12,13"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Notas e dentes não correspondem.");

    let (_, rows) = send(&app, "GET", "/dentes", None).await;
    assert_eq!(rows, json!([]));
}

#[tokio::test]
async fn missing_arch_fields_are_rejected() {
    let app = app_with(seed_patient_7);

    let (status, body) = post_json(
        &app,
        "/adddentes",
        json!({ "Avaliacao_arcada": "5", "fk_Dente_Cod_dente": "11" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Por favor, forneça todos os dados necessários."
    );
}

#[tokio::test]
async fn failed_insert_returns_500_and_rolls_back() {
    let app = app_with(seed_patient_7);

    let (status, body) = post_json(
        &app,
        "/adddentes",
        json!({
            "Avaliacao_arcada": "5,4,3",
            "fk_Paciente_Cod_Paciente": "7",
            "fk_Dente_Cod_dente": "11,12,99"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Erro ao salvar os dados");
    assert!(body["error"].as_str().unwrap().contains("insert 2"));

    let (_, rows) = send(&app, "GET", "/dentes", None).await;
    assert_eq!(rows, json!([]));
}

#[tokio::test]
async fn patient_registration_round_trips_through_lookup() {
    let app = app();

    let (status, stored) = post_json(
        &app,
        "/addpaciente",
        json!({
            "nome": "Joana Prado",
            "cpf": "987.654.321-00",
            "matricula": "2025-03",
            "sexo": "F",
            "idade": 27
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(stored["cod_paciente"].as_i64().unwrap() > 0);
    assert_eq!(stored["idade"], 27);

    let (status, found) = send(&app, "GET", "/paciente/2025-03", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, stored);
}

#[tokio::test]
async fn patient_registration_requires_every_field() {
    let (status, body) = post_json(
        &app(),
        "/addpaciente",
        json!({ "nome": "Joana", "cpf": "1", "matricula": "2", "sexo": "" , "idade": "30" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Por favor, preencha todos os campos.");
}

#[tokio::test]
async fn duplicate_national_id_is_a_server_error() {
    let app = app();
    let patient = json!({
        "nome": "Rui",
        "cpf": "555",
        "matricula": "R1",
        "sexo": "M",
        "idade": "60"
    });

    let (status, _) = post_json(&app, "/addpaciente", patient.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post_json(&app, "/addpaciente", patient).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Erro ao cadastrar paciente.");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_and_blank_enrollment_codes() {
    let app = app();

    let (status, body) = send(&app, "GET", "/paciente/desconhecido", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Paciente não encontrado.");

    let (status, _) = send(&app, "GET", "/paciente/%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn averages_are_recorded_and_listed() {
    let app = app_with(seed_patient_7);

    let (status, stored) = post_json(
        &app,
        "/addmedia",
        json!({ "cod_paciente": 7, "media": "8.5" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["media"], 8.5);
    assert_eq!(stored["fk_paciente_cod_paciente"], 7);

    let (status, first) = send(&app, "GET", "/media", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(&app, "GET", "/media", None).await;
    assert_eq!(first, json!([stored]));
    assert_eq!(first, second);
}

#[tokio::test]
async fn average_requires_both_fields() {
    let (status, body) = post_json(&app(), "/addmedia", json!({ "media": 9 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Por favor, forneça o código e a média do paciente."
    );
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (status, body) = send(&app(), "POST", "/addmedia", Some("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Corpo da requisição inválido.");
}

#[tokio::test]
async fn tooth_catalogue_is_listed() {
    let (status, teeth) = send(&app(), "GET", "/dentes/catalogo", None).await;

    assert_eq!(status, StatusCode::OK);
    let teeth = teeth.as_array().unwrap();
    assert_eq!(teeth.len(), 32);
    assert_eq!(teeth[0]["cod_dente"], 11);
}

#[tokio::test]
async fn invalid_arch_tokens_are_rejected_and_nothing_is_stored() {
    let app = app_with(seed_patient_7);
    let cases = [
        json!({
            "Avaliacao_arcada": "5,,3",
            "fk_Paciente_Cod_Paciente": "7",
            "fk_Dente_Cod_dente": "11,12,13"
        }),
        json!({
            "Avaliacao_arcada": "5,4",
            "fk_Paciente_Cod_Paciente": "abc",
            "fk_Dente_Cod_dente": "11,12"
        }),
        json!({
            "Avaliacao_arcada": "5,4",
            "fk_Paciente_Cod_Paciente": "7",
            "fk_Dente_Cod_dente": "11,dezoito"
        }),
    ];

    for submission in cases {
        let (status, body) = post_json(&app, "/adddentes", submission).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Dados da arcada inválidos.");
        assert!(body["error"].is_string());
    }

    let (_, rows) = send(&app, "GET", "/dentes", None).await;
    assert_eq!(rows, json!([]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_submissions_for_one_patient_both_persist() {
    let app = app_with(seed_patient_7);
    let first = json!({
        "Avaliacao_arcada": "5,4,3",
        "fk_Paciente_Cod_Paciente": "7",
        "fk_Dente_Cod_dente": "11,12,13"
    });
    let second = json!({
        "Avaliacao_arcada": "2,1",
        "fk_Paciente_Cod_Paciente": "7",
        "fk_Dente_Cod_dente": "21,22"
    });

    let ((first_status, _), (second_status, _)) = tokio::join!(
        post_json(&app, "/adddentes", first),
        post_json(&app, "/adddentes", second)
    );
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);

    let (_, rows) = send(&app, "GET", "/dentes", None).await;
    let mut teeth: Vec<i64> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["fk_dente_cod_dente"].as_i64().unwrap())
        .collect();
    teeth.sort_unstable();
    assert_eq!(teeth, vec![11, 12, 13, 21, 22]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reads_do_not_wait_for_an_unrelated_operation() {
    let app = app_with(seed_patient_7);

    let state = app.state.clone();
    let slow = tokio::spawn(async move {
        state
            .with_connection(|_conn| {
                std::thread::sleep(Duration::from_millis(800));
                Ok(())
            })
            .await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started_at = Instant::now();
    let (status, _) = send(&app, "GET", "/media", None).await;
    let waited = started_at.elapsed();

    assert_eq!(status, StatusCode::OK);
    assert!(waited < Duration::from_millis(500), "read waited {waited:?}");
    slow.await.unwrap().unwrap();
}

#[tokio::test]
async fn store_stays_usable_after_a_panicking_operation() {
    let app = app_with(seed_patient_7);

    let result = app
        .state
        .with_connection(|conn| -> Result<(), ApiError> {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .unwrap();
            tx.execute(
                "INSERT INTO arcada_dentaria (
                    avaliacao_arcada, fk_paciente_cod_paciente, fk_dente_cod_dente
                ) VALUES ('9', 7, 18);",
                [],
            )
            .unwrap();
            panic!("operation aborted mid-transaction");
        })
        .await;
    assert!(matches!(result, Err(ApiError::Internal { .. })));

    for _ in 0..3 {
        let (status, rows) = send(&app, "GET", "/dentes", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rows, json!([]));
    }
    let (status, body) = post_json(
        &app,
        "/adddentes",
        json!({
            "Avaliacao_arcada": "5",
            "fk_Paciente_Cod_Paciente": "7",
            "fk_Dente_Cod_dente": "11"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["linhas"], 1);
}
