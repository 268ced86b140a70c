use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Tokens this close to expiry are treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "nutricionista")]
    Nutritionist,
    #[serde(alias = "paciente")]
    Patient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// The signed-in identity. Passed explicitly to whatever needs the current
/// user or role.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User, access_token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            user,
            access_token,
            expires_at,
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS)
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Gate for role-specific views.
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.user.role == role {
            Ok(())
        } else {
            Err(anyhow!(
                "{:?} access required, signed in as {:?}",
                role,
                self.user.role
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    access_token: String,
    expires_in: Option<i64>,
    user: User,
}

#[derive(Clone)]
pub struct SessionAuth {
    client: Client,
    config: ClientConfig,
    session: Arc<Mutex<Option<Session>>>,
}

impl SessionAuth {
    /// Wrap an already established session.
    pub fn new(client: Client, config: ClientConfig, session: Option<Session>) -> Self {
        Self {
            client,
            config,
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(
        client: Client,
        config: ClientConfig,
        email: &str,
        password: &str,
    ) -> Result<Self> {
        let auth = Self::new(client, config, None);
        auth.login(email, password).await?;
        Ok(auth)
    }

    /// Replace the current session with a fresh one for `email`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let path = "auth/login";
        let resp = self
            .client
            .post(self.config.url(path))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::new("POST", path, status, body).into());
        }

        let sign_in: SignInResponse = resp.json().await?;
        let expires_in = sign_in.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let session = Session::new(
            sign_in.user,
            sign_in.access_token,
            Utc::now() + Duration::seconds(expires_in),
        );

        info!(user = %session.user.id, role = ?session.user.role, "Signed in");
        *self.session.lock().await = Some(session.clone());
        Ok(session)
    }

    /// The current session, unless missing or expired.
    pub async fn current_session(&self) -> Option<Session> {
        self.session
            .lock()
            .await
            .as_ref()
            .filter(|s| !s.is_expired())
            .cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_session().await.is_some()
    }

    pub async fn current_role(&self) -> Option<Role> {
        self.current_session().await.map(|s| s.role())
    }

    pub async fn access_token(&self) -> Result<String> {
        self.current_session()
            .await
            .map(|s| s.access_token)
            .ok_or_else(|| anyhow!("Not signed in or session expired"))
    }

    /// Forget the local session and tell the server. The local session is
    /// dropped even if the server call fails.
    pub async fn logout(&self) -> Result<()> {
        let Some(session) = self.session.lock().await.take() else {
            return Ok(());
        };

        let path = "auth/logout";
        let resp = self
            .client
            .post(self.config.url(path))
            .bearer_auth(session.access_token())
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!(status, "Server rejected logout");
            return Err(ApiError::new("POST", path, status, body).into());
        }

        info!(user = %session.user.id, "Signed out");
        Ok(())
    }
}
