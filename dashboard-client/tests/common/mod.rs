// dashboard-client/tests/common/mod.rs
// 测试公共设施：内存 API 与 JWT 签发

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use dashboard_client::import::parse_csv;
use dashboard_client::{ClientError, ClientResult, DashboardApi};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use shared::{
    EducationLevel, ExportFormat, LoginResponse, StudentCreate, StudentRecord, StudentUpdate,
    UploadResponse,
};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "secret";
pub const JWT_SECRET: &[u8] = b"dashboard-test-secret";

#[derive(Debug, Serialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// HS256 token for `sub` expiring `ttl_secs` from now (negative = already expired)
pub fn mint_token(sub: &str, ttl_secs: i64) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: Utc::now().timestamp() + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .unwrap()
}

/// Token whose payload has no `exp`
pub fn mint_token_without_exp(sub: &str) -> String {
    #[derive(Serialize)]
    struct NoExp<'a> {
        sub: &'a str,
    }
    encode(
        &Header::default(),
        &NoExp { sub },
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .unwrap()
}

pub fn student(id: &str, name: &str, state: &str, education: &str, duration: &str) -> StudentCreate {
    StudentCreate {
        aadhar_no: id.to_string(),
        name: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase()),
        gender: Some("Female".to_string()),
        migration_from_city: "Panaji".to_string(),
        state: state.to_string(),
        education: EducationLevel::from(education),
        duration_of_living: duration.to_string(),
        application_date: Some("2024-06-01".to_string()),
        notes: None,
    }
}

pub fn asha() -> StudentCreate {
    StudentCreate {
        email: "a@x.com".to_string(),
        ..student("111122223333", "Asha", "Goa", "UG", "3")
    }
}

/// In-memory stand-in for the remote API
#[derive(Default)]
pub struct MockApi {
    pub students: Mutex<Vec<StudentRecord>>,
    token: RwLock<Option<String>>,
    pub list_calls: AtomicUsize,
    pub mutation_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub fail_list: AtomicBool,
    /// Answer create/update with an acknowledgement instead of the record
    pub ack_only: AtomicBool,
    /// Held by a test to keep mutations suspended on the wire
    pub hold: tokio::sync::Mutex<()>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_students(students: Vec<StudentRecord>) -> Arc<Self> {
        let api = Self::default();
        *api.students.lock().unwrap() = students;
        Arc::new(api)
    }

    pub fn server_ids(&self) -> Vec<String> {
        self.students
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.id().to_string())
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DashboardApi for MockApi {
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
            Ok(LoginResponse {
                token: mint_token(email, 3600),
            })
        } else {
            Err(ClientError::Unauthorized("Invalid credentials".into()))
        }
    }

    async fn list_students(&self) -> ClientResult<Vec<StudentRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".into()));
        }
        Ok(self.students.lock().unwrap().clone())
    }

    async fn create_student(
        &self,
        student: &StudentCreate,
    ) -> ClientResult<Option<StudentRecord>> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let _hold = self.hold.lock().await;
        let record = student.clone().into_record();
        let mut students = self.students.lock().unwrap();
        if students.iter().any(|s| s.id() == record.id()) {
            return Err(ClientError::DuplicateIdentity {
                id: record.id().to_string(),
            });
        }
        students.push(record.clone());
        Ok((!self.ack_only.load(Ordering::SeqCst)).then_some(record))
    }

    async fn update_student(
        &self,
        id: &str,
        update: &StudentUpdate,
    ) -> ClientResult<Option<StudentRecord>> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let _hold = self.hold.lock().await;
        let mut students = self.students.lock().unwrap();
        let Some(record) = students.iter_mut().find(|s| s.id() == id) else {
            return Err(ClientError::NotFound { id: id.to_string() });
        };
        record.apply(update);
        Ok((!self.ack_only.load(Ordering::SeqCst)).then(|| record.clone()))
    }

    async fn delete_student(&self, id: &str) -> ClientResult<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let _hold = self.hold.lock().await;
        let mut students = self.students.lock().unwrap();
        let before = students.len();
        students.retain(|s| s.id() != id);
        if students.len() == before {
            return Err(ClientError::NotFound { id: id.to_string() });
        }
        Ok(())
    }

    /// Inserts rows whose headers use the wire field names; duplicates are skipped
    async fn upload_csv(&self, _file_name: &str, bytes: Vec<u8>) -> ClientResult<UploadResponse> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let _hold = self.hold.lock().await;
        let parsed = parse_csv(&bytes)?;
        let mut students = self.students.lock().unwrap();
        let mut inserted = 0;
        for row in parsed.rows {
            let value = serde_json::to_value(row).unwrap();
            let Ok(record) = serde_json::from_value::<StudentRecord>(value) else {
                continue;
            };
            if students.iter().all(|s| s.id() != record.id()) {
                students.push(record);
                inserted += 1;
            }
        }
        Ok(UploadResponse {
            inserted_records: inserted,
            message: Some(format!("{inserted} students added")),
        })
    }

    async fn export(&self, format: ExportFormat) -> ClientResult<Vec<u8>> {
        Ok(match format {
            ExportFormat::Csv => b"Name,Email\nAsha,a@x.com\n".to_vec(),
            ExportFormat::Pdf => b"%PDF-1.4 mock".to_vec(),
        })
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap() = token;
    }

    fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }
}
