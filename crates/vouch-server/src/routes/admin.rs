//! Admin review handlers. Role enforcement happens in the workflow
//! layer, which receives the authenticated caller.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;
use vouch_core::models::verification::{ReviewDecision, VerificationRecord};
use vouch_core::repository::Pagination;

use crate::error::ApiResult;
use crate::extract::AuthAccount;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

pub async fn list_pending(
    State(state): State<AppState>,
    AuthAccount(caller): AuthAccount,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let defaults = Pagination::default();
    let page = state
        .verifications
        .list_pending(
            &caller,
            Pagination {
                offset: query.offset.unwrap_or(defaults.offset),
                limit: query.limit.unwrap_or(defaults.limit),
            },
        )
        .await?;

    Ok(Json(json!({
        "items": page.items,
        "total": page.total,
        "offset": page.offset,
        "limit": page.limit,
    })))
}

#[derive(Debug, Deserialize)]
pub enum ReviewVerdict {
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub status: ReviewVerdict,
    pub rejection_reason: Option<String>,
}

impl ReviewRequest {
    fn into_decision(self) -> ReviewDecision {
        match self.status {
            ReviewVerdict::Approved => ReviewDecision::Approve,
            // A missing reason is treated as blank and rejected by the
            // workflow's validation.
            ReviewVerdict::Rejected => ReviewDecision::Reject {
                reason: self.rejection_reason.unwrap_or_default(),
            },
        }
    }
}

pub async fn id_card_file(
    State(state): State<AppState>,
    AuthAccount(caller): AuthAccount,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let url = state
        .verifications
        .id_card_file_url(&caller, account_id)
        .await?;
    Ok(Json(json!({ "url": url })))
}

pub async fn document_file(
    State(state): State<AppState>,
    AuthAccount(caller): AuthAccount,
    Path((account_id, document_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    let url = state
        .verifications
        .document_file_url(&caller, account_id, document_id)
        .await?;
    Ok(Json(json!({ "url": url })))
}

pub async fn review_id_card(
    State(state): State<AppState>,
    AuthAccount(caller): AuthAccount,
    Path(account_id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> ApiResult<Json<VerificationRecord>> {
    let record = state
        .verifications
        .review_id_card(&caller, account_id, req.into_decision())
        .await?;
    Ok(Json(record))
}

pub async fn review_document(
    State(state): State<AppState>,
    AuthAccount(caller): AuthAccount,
    Path((account_id, document_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ReviewRequest>,
) -> ApiResult<Json<VerificationRecord>> {
    let record = state
        .verifications
        .review_document(&caller, account_id, document_id, req.into_decision())
        .await?;
    Ok(Json(record))
}
