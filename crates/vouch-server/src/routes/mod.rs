//! HTTP route table.

use axum::Router;
use axum::routing::{get, post, put};

use crate::state::AppState;

mod admin;
mod auth;
mod verification;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/verification/send-otp", post(verification::send_otp))
        .route("/verification/verify-otp", post(verification::verify_otp))
        .route("/verification/id-card", post(verification::upload_id_card))
        .route("/verification/documents", post(verification::upload_document))
        .route("/verification/status", get(verification::status))
        .route("/admin/verifications", get(admin::list_pending))
        .route(
            "/admin/verifications/{account_id}/id-card",
            put(admin::review_id_card),
        )
        .route(
            "/admin/verifications/{account_id}/id-card/file",
            get(admin::id_card_file),
        )
        .route(
            "/admin/verifications/{account_id}/documents/{document_id}",
            put(admin::review_document),
        )
        .route(
            "/admin/verifications/{account_id}/documents/{document_id}/file",
            get(admin::document_file),
        )
        .with_state(state)
}
