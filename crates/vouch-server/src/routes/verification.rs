//! Employer-facing verification handlers.

use axum::Json;
use axum::extract::State;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};
use vouch_core::error::VouchError;
use vouch_core::models::verification::{DocumentKind, VerificationRecord};
use vouch_workflow::Upload;

use crate::error::ApiResult;
use crate::extract::AuthAccount;
use crate::state::AppState;

pub async fn send_otp(
    State(state): State<AppState>,
    AuthAccount(account): AuthAccount,
) -> ApiResult<Json<Value>> {
    state.verifications.request_otp(account.id).await?;
    Ok(Json(json!({
        "message": "verification code sent to your registered email"
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    AuthAccount(account): AuthAccount,
    Json(req): Json<VerifyOtpRequest>,
) -> ApiResult<Json<Value>> {
    let record = state.verifications.verify_otp(account.id, &req.otp).await?;
    Ok(Json(json!({
        "message": "email verified",
        "level": record.level,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UploadIdCardRequest {
    pub file_name: String,
    pub content_type: String,
    /// Base64-encoded file content.
    pub data: String,
}

pub async fn upload_id_card(
    State(state): State<AppState>,
    AuthAccount(account): AuthAccount,
    Json(req): Json<UploadIdCardRequest>,
) -> ApiResult<Json<Value>> {
    let upload = decode_upload(req.file_name, req.content_type, &req.data)?;
    state.verifications.upload_id_card(account.id, upload).await?;
    Ok(Json(json!({ "status": "Pending" })))
}

#[derive(Debug, Deserialize)]
pub struct UploadDocumentRequest {
    pub kind: DocumentKind,
    pub file_name: String,
    pub content_type: String,
    /// Base64-encoded file content.
    pub data: String,
}

pub async fn upload_document(
    State(state): State<AppState>,
    AuthAccount(account): AuthAccount,
    Json(req): Json<UploadDocumentRequest>,
) -> ApiResult<Json<Value>> {
    let upload = decode_upload(req.file_name, req.content_type, &req.data)?;
    let (document_id, _) = state
        .verifications
        .upload_document(account.id, req.kind, upload)
        .await?;
    Ok(Json(json!({
        "status": "Pending",
        "document_id": document_id,
    })))
}

pub async fn status(
    State(state): State<AppState>,
    AuthAccount(account): AuthAccount,
) -> ApiResult<Json<VerificationRecord>> {
    let record = state.verifications.status(account.id).await?;
    Ok(Json(record))
}

fn decode_upload(
    file_name: String,
    content_type: String,
    data: &str,
) -> Result<Upload, VouchError> {
    let data = BASE64.decode(data).map_err(|e| VouchError::Validation {
        message: format!("file data is not valid base64: {e}"),
    })?;
    Ok(Upload {
        file_name,
        content_type,
        data,
    })
}
