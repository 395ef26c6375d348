//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use vouch_core::models::account::EmployerAccount;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated account behind the request's session token.
///
/// Resolving the token hits the session store, so expiry is enforced
/// on every request. Role checks happen in the workflow layer, which
/// receives this account as the caller.
pub struct AuthAccount(pub EmployerAccount);

impl FromRequestParts<AppState> for AuthAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let account = state.accounts.authenticate(token).await?;
        Ok(AuthAccount(account))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("invalid Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("invalid token format"))
}
