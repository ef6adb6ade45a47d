//! HTTP handlers and routes for credit endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::adapters::http::error::session_error_response;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{CreditBalance, GetCreditBalanceHandler, GetCreditBalanceQuery};
use crate::ports::CreditLedger;

#[derive(Clone)]
pub struct CreditHandlers {
    pub balance: Arc<GetCreditBalanceHandler>,
}

impl CreditHandlers {
    pub fn new(ledger: Arc<dyn CreditLedger>) -> Self {
        Self {
            balance: Arc::new(GetCreditBalanceHandler::new(ledger)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub user_id: String,
    pub credits: u32,
}

impl From<CreditBalance> for BalanceResponse {
    fn from(balance: CreditBalance) -> Self {
        Self {
            user_id: balance.user_id.to_string(),
            credits: balance.credits,
        }
    }
}

/// GET /api/credits/balance
pub async fn get_balance(
    State(handlers): State<CreditHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers
        .balance
        .handle(GetCreditBalanceQuery { user_id: user.id })
        .await
    {
        Ok(balance) => (StatusCode::OK, Json(BalanceResponse::from(balance))).into_response(),
        Err(e) => session_error_response(e),
    }
}

pub fn credit_routes(handlers: CreditHandlers) -> Router {
    Router::new()
        .route("/balance", get(get_balance))
        .with_state(handlers)
}
