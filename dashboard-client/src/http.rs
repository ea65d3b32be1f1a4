// dashboard-client/src/http.rs
// HTTP 客户端 - 网络通信

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::client::{ErrorBody, MessageResponse, MutationResponse};
use shared::util::normalize_identity;
use shared::{
    ExportFormat, LoginRequest, LoginResponse, StudentCreate, StudentRecord, StudentUpdate,
    UploadResponse,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Remote dashboard API
///
/// Every store talks to the server through this trait, so tests can swap
/// in an in-memory implementation.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse>;

    async fn list_students(&self) -> ClientResult<Vec<StudentRecord>>;

    /// `None` when the server only acknowledges the insert
    async fn create_student(&self, student: &StudentCreate)
    -> ClientResult<Option<StudentRecord>>;

    /// `None` when the server only acknowledges the update
    async fn update_student(
        &self,
        id: &str,
        update: &StudentUpdate,
    ) -> ClientResult<Option<StudentRecord>>;

    async fn delete_student(&self, id: &str) -> ClientResult<()>;

    async fn upload_csv(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<UploadResponse>;

    async fn export(&self, format: ExportFormat) -> ClientResult<Vec<u8>>;

    /// Install or remove the bearer credential
    fn set_token(&self, token: Option<String>);

    fn token(&self) -> Option<String>;
}

/// 网络 HTTP 客户端
#[derive(Debug)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Map a non-2xx status onto the client taxonomy.
    ///
    /// `identity` is the record the request targeted, if any.
    async fn check_status(
        response: reqwest::Response,
        identity: Option<&str>,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        // 服务端错误体为 {"error": "..."}，其他格式原样保留
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        let id = identity.map(normalize_identity).unwrap_or_default();

        tracing::debug!(status = status.as_u16(), %message, "Request rejected");

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound { id },
            StatusCode::CONFLICT => ClientError::DuplicateIdentity { id },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                if message.to_ascii_lowercase().contains("already exists") {
                    ClientError::DuplicateIdentity { id }
                } else {
                    ClientError::Validation(message)
                }
            }
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
        identity: Option<&str>,
    ) -> ClientResult<T> {
        let response = Self::check_status(response, identity).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl DashboardApi for NetworkHttpClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.client.post(self.url("login")).json(&body).send().await?;
        Self::handle_response(response, None).await
    }

    async fn list_students(&self) -> ClientResult<Vec<StudentRecord>> {
        let req = self.authorize(self.client.get(self.url("students")));
        let response = req.send().await?;
        Self::handle_response(response, None).await
    }

    async fn create_student(
        &self,
        student: &StudentCreate,
    ) -> ClientResult<Option<StudentRecord>> {
        let req = self.authorize(self.client.post(self.url("students")).json(student));
        let response = req.send().await?;
        let body: MutationResponse =
            Self::handle_response(response, Some(&student.aadhar_no)).await?;
        Ok(body.into_record())
    }

    async fn update_student(
        &self,
        id: &str,
        update: &StudentUpdate,
    ) -> ClientResult<Option<StudentRecord>> {
        let path = format!("students/{}", normalize_identity(id));
        let req = self.authorize(self.client.put(self.url(&path)).json(update));
        let response = req.send().await?;
        let body: MutationResponse = Self::handle_response(response, Some(id)).await?;
        Ok(body.into_record())
    }

    async fn delete_student(&self, id: &str) -> ClientResult<()> {
        let path = format!("students/{}", normalize_identity(id));
        let req = self.authorize(self.client.delete(self.url(&path)));
        let response = req.send().await?;
        let response = Self::check_status(response, Some(id)).await?;
        // 成功体可能为空或 {"success": true}
        let bytes = response.bytes().await?;
        if !bytes.is_empty() {
            let ack: MessageResponse = serde_json::from_slice(&bytes)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            if ack.success == Some(false) {
                return Err(ClientError::Server {
                    status: 200,
                    message: ack.message.unwrap_or_default(),
                });
            }
        }
        Ok(())
    }

    async fn upload_csv(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<UploadResponse> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);
        let req = self.authorize(self.client.post(self.url("upload-csv")).multipart(form));
        let response = req.send().await?;
        Self::handle_response(response, None).await
    }

    async fn export(&self, format: ExportFormat) -> ClientResult<Vec<u8>> {
        let req = self.authorize(
            self.client
                .get(self.url("export"))
                .query(&[("format", format.as_str())]),
        );
        let response = req.send().await?;
        let response = Self::check_status(response, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
