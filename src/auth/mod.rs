use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Authenticated identity context for a request
///
/// Absent for anonymous callers. Always passed explicitly into service calls,
/// never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
}

impl Session {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Trait for identity providers
///
/// Resolves an opaque bearer token to a user identity. A `None` result means
/// the token is missing, expired, or otherwise not recognized; errors are
/// reserved for the provider itself being unreachable.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    async fn authenticate(&self, token: &str) -> AppResult<Option<Session>>;
}

/// Identity provider backed by a hosted auth service
///
/// Calls `GET {base_url}/user` with the caller's bearer token and reads the
/// user id out of the response. 401/403 from the service mean "not a valid
/// session" and map to `None`, not an error.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    http_client: HttpClient,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
}

impl HttpIdentityProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl IdentityStore for HttpIdentityProvider {
    async fn authenticate(&self, token: &str) -> AppResult<Option<Session>> {
        let url = format!("{}/user", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Unavailable(format!("Identity service unreachable: {}", e)))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("Bearer token rejected by identity service");
                Ok(None)
            }
            status if status.is_success() => {
                let user: AuthUser = response.json().await?;
                Ok(Some(Session::new(user.id)))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::ExternalApi(format!(
                    "Identity service returned status {}: {}",
                    status, body
                )))
            }
        }
    }
}
