// dashboard-client/tests/http_client.rs
// 网络客户端集成测试 (axum mock server)

mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use common::{ADMIN_EMAIL, ADMIN_PASSWORD, asha, mint_token};
use dashboard_client::{
    ClientConfig, ClientError, Dashboard, DashboardApi, ExportFormat, NetworkHttpClient,
};
use serde_json::json;
use shared::models::is_valid_email;
use shared::{LoginRequest, StudentCreate, StudentRecord, StudentUpdate};

#[derive(Default)]
struct ServerState {
    students: Mutex<Vec<StudentRecord>>,
    issued: Mutex<Option<String>>,
    uploads: Mutex<Vec<(String, usize)>>,
    slow: AtomicBool,
}

type Shared = Arc<ServerState>;

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn authorized(state: &ServerState, headers: &HeaderMap) -> bool {
    let issued = state.issued.lock().unwrap().clone();
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    matches!((issued, presented), (Some(a), Some(b)) if a == b)
}

async fn login(State(state): State<Shared>, Json(req): Json<LoginRequest>) -> Response {
    if req.email == ADMIN_EMAIL && req.password == ADMIN_PASSWORD {
        let token = mint_token(&req.email, 3600);
        *state.issued.lock().unwrap() = Some(token.clone());
        Json(json!({ "token": token })).into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn list_students(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    if state.slow.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    // identities go out as numbers, the way the database stores them
    let students: Vec<serde_json::Value> = state
        .students
        .lock()
        .unwrap()
        .iter()
        .map(|s| {
            let mut value = serde_json::to_value(s).unwrap();
            let id: u64 = s.aadhar_no.parse().unwrap();
            value["Aadhar No"] = json!(id);
            value
        })
        .collect();
    Json(students).into_response()
}

async fn create_student(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(student): Json<StudentCreate>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    if !is_valid_email(&student.email) {
        return error(StatusCode::BAD_REQUEST, "Invalid email");
    }
    let mut students = state.students.lock().unwrap();
    if students.iter().any(|s| s.aadhar_no == student.aadhar_no) {
        return error(
            StatusCode::BAD_REQUEST,
            "Student with this Aadhar No already exists",
        );
    }
    students.push(student.into_record());
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Student added successfully" })),
    )
        .into_response()
}

async fn update_student(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<StudentUpdate>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    let mut students = state.students.lock().unwrap();
    match students.iter_mut().find(|s| s.aadhar_no == id) {
        Some(record) => {
            record.apply(&update);
            Json(record.clone()).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Student not found"),
    }
}

async fn delete_student(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    if id == "500000000000" {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }
    let mut students = state.students.lock().unwrap();
    let before = students.len();
    students.retain(|s| s.aadhar_no != id);
    if students.len() == before {
        return error(StatusCode::NOT_FOUND, "Student not found");
    }
    Json(json!({ "success": true })).into_response()
}

async fn upload_csv(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        let rows = String::from_utf8_lossy(&bytes)
            .lines()
            .skip(1)
            .filter(|l| !l.trim().is_empty())
            .count();
        state.uploads.lock().unwrap().push((file_name, rows));
        return Json(json!({
            "inserted_records": rows,
            "message": format!("{rows} students added successfully")
        }))
        .into_response();
    }
    error(StatusCode::BAD_REQUEST, "No file part")
}

async fn export(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&state, &headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    match params.get("format").map(String::as_str) {
        Some("csv") => ([(header::CONTENT_TYPE, "text/csv")], "Name,Email\n").into_response(),
        Some("pdf") => {
            ([(header::CONTENT_TYPE, "application/pdf")], b"%PDF-1.4".to_vec()).into_response()
        }
        _ => error(StatusCode::BAD_REQUEST, "Invalid format"),
    }
}

async fn spawn_server(state: Shared) -> String {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/students", get(list_students).post(create_student))
        .route(
            "/api/students/{id}",
            put(update_student).delete(delete_student),
        )
        .route("/api/upload-csv", post(upload_csv))
        .route("/api/export", get(export))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn signed_in_client() -> (NetworkHttpClient, Shared) {
    let state = Shared::default();
    let base_url = spawn_server(state.clone()).await;
    let client = NetworkHttpClient::new(&ClientConfig::new(base_url).with_timeout(1)).unwrap();
    let login = client.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    client.set_token(Some(login.token));
    (client, state)
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let state = Shared::default();
    let base_url = spawn_server(state).await;
    let client = NetworkHttpClient::new(&ClientConfig::new(base_url)).unwrap();

    let err = client.login(ADMIN_EMAIL, "nope").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Invalid credentials"));
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let state = Shared::default();
    let base_url = spawn_server(state).await;
    let client = NetworkHttpClient::new(&ClientConfig::new(base_url)).unwrap();

    let err = client.list_students().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
}

#[tokio::test]
async fn test_create_list_update_delete() {
    let (client, _state) = signed_in_client().await;

    // acknowledgement only
    assert!(client.create_student(&asha()).await.unwrap().is_none());

    let students = client.list_students().await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id(), "111122223333");

    let update = StudentUpdate {
        state: Some("Kerala".to_string()),
        ..Default::default()
    };
    let updated = client
        .update_student("111122223333", &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.state, "Kerala");
    assert_eq!(updated.name, "Asha");

    client.delete_student("111122223333").await.unwrap();
    assert!(client.list_students().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_status_mapping() {
    let (client, _state) = signed_in_client().await;
    client.create_student(&asha()).await.unwrap();

    let err = client.create_student(&asha()).await.unwrap_err();
    assert!(matches!(err, ClientError::DuplicateIdentity { ref id } if id == "111122223333"));

    let mut bad = asha();
    bad.aadhar_no = "222233334444".to_string();
    bad.email = "broken".to_string();
    let err = client.create_student(&bad).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref m) if m == "Invalid email"));

    let err = client
        .update_student("999999999999", &StudentUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound { ref id } if id == "999999999999"));

    let err = client.delete_student("999999999999").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));

    let err = client.delete_student("500000000000").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Server { status: 500, ref message } if message == "database unavailable"
    ));
}

#[tokio::test]
async fn test_timeout_is_surfaced() {
    let (client, state) = signed_in_client().await;
    state.slow.store(true, Ordering::SeqCst);

    let err = client.list_students().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));
}

#[tokio::test]
async fn test_upload_is_multipart_file() {
    let (client, state) = signed_in_client().await;
    let csv = "Name,Email\nAsha,a@x.com\nRavi,r@x.com\n";

    let response = client
        .upload_csv("batch.csv", csv.as_bytes().to_vec())
        .await
        .unwrap();
    assert_eq!(response.inserted_records, 2);

    let uploads = state.uploads.lock().unwrap().clone();
    assert_eq!(uploads, vec![("batch.csv".to_string(), 2)]);
}

#[tokio::test]
async fn test_export_saves_named_file() {
    let state = Shared::default();
    let base_url = spawn_server(state).await;
    let dashboard = Dashboard::connect(ClientConfig::new(base_url)).unwrap();
    dashboard
        .session()
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dashboard
        .exporter()
        .save_to(ExportFormat::Csv, dir.path())
        .await
        .unwrap();
    assert_eq!(csv_path.file_name().unwrap(), "students_data.csv");
    assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), "Name,Email\n");

    let pdf_path = dashboard
        .exporter()
        .save_to(ExportFormat::Pdf, dir.path())
        .await
        .unwrap();
    assert!(std::fs::read(pdf_path).unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_dashboard_end_to_end() {
    let state = Shared::default();
    let base_url = spawn_server(state.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(base_url).with_token_path(dir.path().join("token.json"));

    let dashboard = Dashboard::connect(config.clone()).unwrap();
    assert!(!dashboard.start().await);
    dashboard
        .session()
        .login(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();

    let records = dashboard.records();
    records.add(asha()).await.unwrap();
    let err = records.add(asha()).await.unwrap_err();
    assert!(matches!(err, ClientError::DuplicateIdentity { .. }));

    let csv = "Name,Email,Gender,Aadhar No,Migration From City,State,Education,Duration of Living\n\
               Ravi,r@x.com,M,999988887777,Kochi,Kerala,PG,5\n";
    let report = dashboard
        .importer()
        .import("batch.csv", csv.as_bytes().to_vec())
        .await
        .unwrap();
    assert_eq!(report.inserted, 1);
    assert!(report.refreshed);

    // a second client picks the session up from disk
    let again = Dashboard::connect(config).unwrap();
    assert!(again.start().await);
    assert_eq!(again.session().current_user().await.unwrap().email, ADMIN_EMAIL);
}
