//! Session Store
//!
//! Owns the authentication state. The bearer credential on the API client
//! is installed and removed while the state lock is held, so no request
//! can observe a state change without the matching credential.

use std::sync::Arc;

use shared::UserInfo;
use shared::error::ErrorCode;
use shared::util::now_secs;
use tokio::sync::RwLock;

use super::claims::{decode_claims, validate_claims};
use super::token::TokenStorage;
use crate::error::{ClientError, ClientResult};
use crate::http::DashboardApi;

/// Authentication status snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<UserInfo>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SessionState {
    /// Startup state: nothing known until `restore` runs
    fn default() -> Self {
        Self {
            authenticated: false,
            user: None,
            loading: true,
            error: None,
        }
    }
}

impl SessionState {
    fn signed_out() -> Self {
        Self {
            loading: false,
            ..Self::default()
        }
    }

    fn signed_in(user: UserInfo) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
            loading: false,
            error: None,
        }
    }
}

pub struct SessionStore {
    api: Arc<dyn DashboardApi>,
    storage: Arc<dyn TokenStorage>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn DashboardApi>, storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            api,
            storage,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Current state (cloned)
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.authenticated
    }

    pub async fn current_user(&self) -> Option<UserInfo> {
        self.state.read().await.user.clone()
    }

    /// Rebuild the session from the persisted token without contacting the server.
    ///
    /// Never fails: a missing, undecodable or expired token ends in the
    /// signed-out state with no error set.
    pub async fn restore(&self) {
        let mut state = self.state.write().await;

        let token = match self.storage.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::debug!("No persisted session token");
                self.api.set_token(None);
                *state = SessionState::signed_out();
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted session token unreadable, discarding");
                self.discard_token(&mut state);
                return;
            }
        };

        let user = decode_claims(&token).and_then(|claims| validate_claims(&claims, now_secs()));
        match user {
            Ok(user) => {
                tracing::info!(user = %user.email, "Session restored");
                self.api.set_token(Some(token));
                *state = SessionState::signed_in(user);
            }
            Err(ClientError::ExpiredToken) => {
                tracing::info!("Persisted session token expired, signing out");
                self.discard_token(&mut state);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Persisted session token invalid, signing out");
                self.discard_token(&mut state);
            }
        }
    }

    /// Authenticate against the server and persist the issued token.
    ///
    /// On failure the error is recorded in the state and also returned.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserInfo> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self.try_login(email, password).await;

        let mut state = self.state.write().await;
        match result {
            Ok((token, user)) => {
                if let Err(e) = self.storage.save(&token) {
                    // 会话仍然有效，只是重启后需要重新登录
                    tracing::warn!(error = %e, "Failed to persist session token");
                }
                self.api.set_token(Some(token));
                *state = SessionState::signed_in(user.clone());
                tracing::info!(user = %user.email, "Logged in");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.api.set_token(None);
                *state = SessionState {
                    error: Some(login_error_message(&e)),
                    ..SessionState::signed_out()
                };
                Err(e)
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> ClientResult<(String, UserInfo)> {
        let response = self.api.login(email.trim(), password).await?;
        let claims = decode_claims(&response.token)?;
        let user = validate_claims(&claims, now_secs())?;
        Ok((response.token, user))
    }

    /// Forget the session locally and on disk
    pub async fn logout(&self) -> ClientResult<()> {
        let mut state = self.state.write().await;
        self.api.set_token(None);
        *state = SessionState::signed_out();
        tracing::info!("Logged out");
        self.storage.clear()
    }

    fn discard_token(&self, state: &mut SessionState) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted session token");
        }
        self.api.set_token(None);
        *state = SessionState::signed_out();
    }
}

fn login_error_message(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized(_) => ErrorCode::InvalidCredentials.message().to_string(),
        other => other.user_message(),
    }
}
