//! GetCreditBalanceHandler - Query for the caller's spendable credits.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::session::SessionError;
use crate::ports::CreditLedger;

#[derive(Debug, Clone)]
pub struct GetCreditBalanceQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditBalance {
    pub user_id: UserId,
    /// Credits reserved by open bookings are not included.
    pub credits: u32,
}

pub struct GetCreditBalanceHandler {
    ledger: Arc<dyn CreditLedger>,
}

impl GetCreditBalanceHandler {
    pub fn new(ledger: Arc<dyn CreditLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: GetCreditBalanceQuery) -> Result<CreditBalance, SessionError> {
        let credits = self.ledger.balance(&query.user_id).await?;
        Ok(CreditBalance {
            user_id: query.user_id,
            credits,
        })
    }
}
