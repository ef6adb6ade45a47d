//! HTTP adapter for credit endpoints.
//!
//! - `GET /api/credits/balance` - Caller's spendable balance

mod handlers;

pub use handlers::{credit_routes, BalanceResponse, CreditHandlers};
