//! PostgreSQL implementation of CreditLedger.

use async_trait::async_trait;
use sqlx::PgPool;

use super::ledger_ops::{apply_movement, to_credits, user_not_found};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::ledger::CreditMovement;
use crate::ports::CreditLedger;

#[derive(Clone)]
pub struct PostgresCreditLedger {
    pool: PgPool,
}

impl PostgresCreditLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn apply(&self, movement: CreditMovement) -> Result<u32, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let balance = apply_movement(&mut tx, &movement).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(balance)
    }
}

#[async_trait]
impl CreditLedger for PostgresCreditLedger {
    async fn balance(&self, user_id: &UserId) -> Result<u32, DomainError> {
        let credits: Option<i64> = sqlx::query_scalar("SELECT credits FROM users WHERE id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to read balance", e))?;

        to_credits(credits.ok_or_else(|| user_not_found(user_id))?)
    }

    async fn credit(&self, user_id: &UserId, amount: u32) -> Result<u32, DomainError> {
        self.apply(CreditMovement::grant(user_id.clone(), amount, Timestamp::now()))
            .await
    }

    async fn debit(&self, user_id: &UserId, amount: u32) -> Result<u32, DomainError> {
        self.apply(CreditMovement::withdrawal(user_id.clone(), amount, Timestamp::now()))
            .await
    }
}
