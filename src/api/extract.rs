use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::Session;
use crate::error::AppError;

use super::AppState;

/// Optional session extractor
///
/// Resolves the bearer token (if any) against the identity store. A missing
/// or rejected token yields `None` so handlers can serve anonymous traffic;
/// the auth-gating decision itself belongs to the watchlist service, not to
/// extraction. An unreachable identity service is a transport failure and
/// does propagate.
pub struct MaybeSession(pub Option<Session>);

/// Pulls the token out of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[async_trait::async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Self(None));
        };

        let session = state.identity.authenticate(token).await?;
        Ok(Self(session))
    }
}
