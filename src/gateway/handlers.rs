//! HTTP handlers

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::state::AppState;
use super::types::{ApiError, ApiResponse};
use crate::account::{AccountTransfers, AccountView, BalanceView, CreatedAccount, NewAccount};
use crate::auth::{Login, LoginResponse};
use crate::gatekeeper::Credential;
use crate::transfer::{TransferReceipt, TransferRequest};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build: String,
    pub timestamp_ms: i64,
}

pub async fn health_check() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: env!("BUILD_ID").to_string(),
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
    }))
}

/// POST /api/v1/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Login>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(login) = payload?;
    let credential = state.auth.login(&login).await?;
    Ok(Json(ApiResponse::success(LoginResponse {
        token: credential.digest,
    })))
}

/// POST /api/v1/transfers
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(credential): Extension<Credential>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<TransferReceipt>>), ApiError> {
    let Json(req) = payload?;
    let receipt = state.coordinator.execute_verified(&credential, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(receipt))))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

/// POST /api/v1/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(credential): Extension<Credential>,
) -> ApiResult<LogoutResponse> {
    state.auth.revoke(&credential).await?;
    Ok(Json(ApiResponse::success(LogoutResponse { revoked: true })))
}

/// POST /api/v1/accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> Result<
    (
        StatusCode,
        [(header::HeaderName, String); 1],
        Json<ApiResponse<CreatedAccount>>,
    ),
    ApiError,
> {
    let Json(req) = payload?;
    let id = state.accounts.create(req).await?;
    let location = format!("/api/v1/accounts/{}", id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(CreatedAccount { id })),
    ))
}

/// GET /api/v1/accounts
pub async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Vec<AccountView>> {
    let accounts = state.accounts.list().await?;
    Ok(Json(ApiResponse::success(accounts)))
}

/// GET /api/v1/accounts/{id}/balance
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<BalanceView> {
    let balance = state.accounts.balance(&account_id).await?;
    Ok(Json(ApiResponse::success(BalanceView { balance })))
}

/// GET /api/v1/transfers
///
/// Transfers of the authenticated account only.
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    Extension(credential): Extension<Credential>,
) -> ApiResult<AccountTransfers> {
    let history = state.accounts.transfers(&credential.client_id).await?;
    Ok(Json(ApiResponse::success(history)))
}
