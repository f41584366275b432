//! HTTP gateway for the cooperative account service

pub mod api;
pub mod config;
pub mod error;
pub mod web;

use std::sync::Arc;

use account_service::AccountService;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    account::{
        create_account, delete_account, deposit, get_account, list_accounts,
        list_accounts_by_owner, set_status, update_account, withdraw,
    },
    health::health,
};

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        api::account::create_account,
        api::account::update_account,
        api::account::get_account,
        api::account::list_accounts,
        api::account::list_accounts_by_owner,
        api::account::delete_account,
        api::account::withdraw,
        api::account::deposit,
        api::account::set_status,
        api::health::health,
    ),
    components(
        schemas(
            api::account::AccountRequest,
            api::account::AmountRequest,
            api::account::StatusRequest,
            common::model::account::Account,
            common::model::account::AccountType,
            common::model::account::AccountStatus,
        )
    ),
    tags(
        (name = "account", description = "Account management endpoints"),
        (name = "health", description = "Liveness")
    ),
    info(
        title = "Cooperative Accounts API",
        version = "1.0.0",
        description = "Account management for the cooperative: account lifecycle, deposits and withdrawals"
    )
)]
pub struct ApiDoc;

/// App state shared across handlers
pub struct AppState {
    /// Account service
    pub account_service: Arc<AccountService>,
}

impl AppState {
    /// Wrap a service for use as router state
    pub fn new(account_service: AccountService) -> Arc<Self> {
        Arc::new(Self {
            account_service: Arc::new(account_service),
        })
    }
}

/// Build the full application router
pub fn router(state: Arc<AppState>, log_level: Level) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/accounts", post(create_account).get(list_accounts))
        .route(
            "/accounts/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/owner/:owner_id", get(list_accounts_by_owner))
        .route("/accounts/:id/withdraw", post(withdraw))
        .route("/accounts/:id/deposit", post(deposit))
        .route("/accounts/:id/status", put(set_status))
        .route("/health", get(health));

    let swagger_ui = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .route("/", get(web::index))
        .merge(api_routes)
        .merge(swagger_ui)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(log_level))
                .on_request(DefaultOnRequest::new().level(log_level))
                .on_response(DefaultOnResponse::new().level(log_level)),
        )
        .with_state(state)
}
