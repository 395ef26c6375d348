//! Registration, login, and logout handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;
use vouch_core::models::account::{AccountRole, CreateAccount};

use crate::error::ApiResult;
use crate::extract::bearer_token;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub company_id: Option<Uuid>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    // Self-registration always yields an employer; admins are
    // bootstrapped from configuration.
    let account = state
        .accounts
        .register(CreateAccount {
            email: req.email,
            password: req.password,
            company_name: req.company_name,
            company_id: req.company_id,
            role: AccountRole::Employer,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "account_id": account.id })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let out = state.accounts.login(&req.email, &req.password).await?;
    Ok(Json(json!({
        "token": out.token,
        "expires_at": out.expires_at.to_rfc3339(),
    })))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let token = bearer_token(&headers)?;
    state.accounts.logout(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
