//! Account API handlers
//!
//! Handles endpoints related to account management:
//! - Create, update and soft-delete accounts
//! - Get one account, list all open accounts, list by owner
//! - Deposit and withdraw funds
//! - Suspend or reactivate an account

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use common::decimal::{Amount, Balance};
use common::model::account::{Account, AccountDraft, AccountStatus, AccountType};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extract::{ApiJson, ApiPath};
use crate::error::ApiError;
use crate::AppState;

/// Create or update account request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AccountRequest {
    /// Owner (cooperative member) reference
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    pub owner_id: String,
    /// Account number, unique among active accounts
    #[schema(example = "001-123456789")]
    pub account_number: String,
    /// Balance, strictly positive
    #[schema(value_type = f64, example = 1000.0)]
    pub balance: Balance,
    /// Account type
    pub account_type: AccountType,
}

impl From<AccountRequest> for AccountDraft {
    fn from(request: AccountRequest) -> Self {
        AccountDraft {
            owner_id: request.owner_id,
            account_number: request.account_number,
            balance: request.balance,
            account_type: request.account_type,
        }
    }
}

impl AccountRequest {
    /// Validate the request and turn it into a draft
    fn into_draft(self) -> Result<AccountDraft, ApiError> {
        let draft = AccountDraft::from(self);
        draft.validate()?;
        Ok(draft)
    }
}

/// Deposit or withdrawal request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AmountRequest {
    /// Amount, strictly positive
    #[schema(value_type = f64, example = 500.0)]
    pub amount: Amount,
}

/// Status change request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct StatusRequest {
    /// ACTIVE or SUSPENDED
    pub status: AccountStatus,
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account successfully created", body = Account),
        (status = 400, description = "Invalid request body"),
        (status = 409, description = "Account number already exists")
    ),
    tag = "account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<AccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let draft = request.into_draft()?;
    let account = state.account_service.create_account(draft).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Replace an account's owner, number, type and balance
#[utoipa::path(
    put,
    path = "/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = AccountRequest,
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 400, description = "Invalid request body"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Account number already in use")
    ),
    tag = "account"
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AccountRequest>,
) -> Result<Json<Account>, ApiError> {
    let draft = request.into_draft()?;
    let account = state.account_service.update_account(id, draft).await?;

    Ok(Json(account))
}

/// Get an account by ID
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account details retrieved successfully", body = Account),
        (status = 404, description = "Account not found")
    ),
    tag = "account"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.account_service.get_account(id).await?))
}

/// List every open account
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "Active accounts in ACTIVE status", body = [Account])
    ),
    tag = "account"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.account_service.list_accounts().await?))
}

/// List the accounts of one owner, newest first
#[utoipa::path(
    get,
    path = "/accounts/owner/{owner_id}",
    params(
        ("owner_id" = String, Path, description = "Owner reference")
    ),
    responses(
        (status = 200, description = "Active accounts of the owner, possibly empty", body = [Account])
    ),
    tag = "account"
)]
pub async fn list_accounts_by_owner(
    State(state): State<Arc<AppState>>,
    ApiPath(owner_id): ApiPath<String>,
) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.account_service.list_accounts_by_owner(&owner_id).await?))
}

/// Soft-delete an account
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 204, description = "Account cancelled"),
        (status = 404, description = "Account not found")
    ),
    tag = "account"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.account_service.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Withdraw funds from an account
#[utoipa::path(
    post,
    path = "/accounts/{id}/withdraw",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Funds withdrawn successfully", body = Account),
        (status = 400, description = "Invalid amount"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Account not active or insufficient balance")
    ),
    tag = "account"
)]
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AmountRequest>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.account_service.withdraw(id, request.amount).await?))
}

/// Deposit funds into an account
#[utoipa::path(
    post,
    path = "/accounts/{id}/deposit",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Funds deposited successfully", body = Account),
        (status = 400, description = "Invalid amount"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Account not active")
    ),
    tag = "account"
)]
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<AmountRequest>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.account_service.deposit(id, request.amount).await?))
}

/// Suspend or reactivate an account
#[utoipa::path(
    put,
    path = "/accounts/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Account),
        (status = 400, description = "Status cannot be set directly"),
        (status = 404, description = "Account not found")
    ),
    tag = "account"
)]
pub async fn set_status(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<StatusRequest>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.account_service.set_status(id, request.status).await?))
}
