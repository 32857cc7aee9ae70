//! Authentication session: obtains a token once and follows host migration.

use std::sync::Arc;

use serde_json::Value;

use crate::error::TiqResult;
use crate::http::{HttpClient, HttpRequest};

/// Identity used for the auth call and for addressing the profile.
#[derive(Clone)]
pub struct Credentials {
    pub account: String,
    pub profile: String,
    pub username: String,
    pub key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("profile", &self.profile)
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    /// The server's answer is trusted as-is, so the token may be missing.
    Authenticated { token: Option<String> },
}

/// Endpoint host plus auth state for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub endpoint_host: String,
    pub state: AuthState,
}

impl Session {
    pub fn new(endpoint_host: impl Into<String>) -> Self {
        Self {
            endpoint_host: endpoint_host.into(),
            state: AuthState::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::Authenticated { token } => token.as_deref(),
            AuthState::Unauthenticated => None,
        }
    }
}

/// Owns the [`Session`] and performs the auth call at most once.
pub struct SessionManager {
    http: Arc<dyn HttpClient>,
    credentials: Credentials,
    session: Session,
}

impl SessionManager {
    pub fn new(
        http: Arc<dyn HttpClient>,
        credentials: Credentials,
        endpoint_host: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credentials,
            session: Session::new(endpoint_host),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn http(&self) -> &Arc<dyn HttpClient> {
        &self.http
    }

    fn auth_url(&self) -> String {
        format!(
            "https://{}/v3/auth/accounts/{}/profiles/{}",
            self.session.endpoint_host, self.credentials.account, self.credentials.profile
        )
    }

    /// Authenticate unless already done. Safe to call before every request.
    pub async fn ensure_authenticated(&mut self) -> TiqResult<()> {
        if self.session.is_authenticated() {
            return Ok(());
        }

        let url = self.auth_url();
        // Form values go out verbatim, without percent-encoding.
        let body = format!(
            "username={}&key={}",
            self.credentials.username, self.credentials.key
        );
        let request = HttpRequest::post(&url, body)
            .with_header("Content-Type", "application/x-www-form-urlencoded");

        tracing::info!(host = %self.session.endpoint_host, "Authenticating");
        let response = self.http.send(request).await?.error_for_status(&url)?;
        let payload = response.json()?;

        if let Some(host) = payload.get("host").and_then(Value::as_str) {
            if !host.is_empty() && host != self.session.endpoint_host {
                tracing::info!(from = %self.session.endpoint_host, to = %host, "API host migrated");
                self.session.endpoint_host = host.to_string();
            }
        }

        let token = payload
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string);
        if token.is_none() {
            tracing::warn!("Auth response carried no token");
        }
        self.session.state = AuthState::Authenticated { token };
        Ok(())
    }
}
