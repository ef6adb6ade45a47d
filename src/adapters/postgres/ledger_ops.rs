//! Credit movement primitives shared by the Postgres adapters.
//!
//! Each function runs inside a caller-owned transaction, so a session write
//! and its balance change commit or roll back together.

use sqlx::{Postgres, Transaction};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::ledger::CreditMovement;

/// Applies a movement to its owner's balance and journals it.
///
/// Debits are conditional (`credits >= amount`), so the check and the
/// decrement are a single statement. Returns the new balance.
pub(super) async fn apply_movement(
    tx: &mut Transaction<'_, Postgres>,
    movement: &CreditMovement,
) -> Result<u32, DomainError> {
    let amount = i64::from(movement.amount);

    let balance: Option<i64> = match movement.kind.direction() {
        d if d < 0 => {
            sqlx::query_scalar(
                "UPDATE users SET credits = credits - $2 WHERE id = $1 AND credits >= $2 RETURNING credits",
            )
            .bind(movement.user_id.as_str())
            .bind(amount)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DomainError::database("Failed to debit credits", e))?
        }
        d if d > 0 => {
            sqlx::query_scalar(
                "UPDATE users SET credits = credits + $2 WHERE id = $1 RETURNING credits",
            )
            .bind(movement.user_id.as_str())
            .bind(amount)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DomainError::database("Failed to credit credits", e))?
        }
        _ => current_balance(tx, &movement.user_id).await?,
    };

    let balance = match balance {
        Some(balance) => to_credits(balance)?,
        None => {
            // The conditional update matched nothing: unknown user or short balance.
            let available = current_balance(tx, &movement.user_id)
                .await?
                .ok_or_else(|| user_not_found(&movement.user_id))?;
            return Err(DomainError::insufficient_credits(
                movement.amount,
                to_credits(available)?,
            ));
        }
    };

    sqlx::query(
        r#"
        INSERT INTO credit_transactions (id, user_id, session_id, kind, amount, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(movement.id.as_uuid())
    .bind(movement.user_id.as_str())
    .bind(movement.session_id.map(|id| *id.as_uuid()))
    .bind(movement.kind.as_str())
    .bind(amount)
    .bind(movement.at.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::database("Failed to journal credit movement", e))?;

    Ok(balance)
}

/// Reads a balance inside the transaction. `None` if the user is unknown.
pub(super) async fn current_balance(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &UserId,
) -> Result<Option<i64>, DomainError> {
    sqlx::query_scalar("SELECT credits FROM users WHERE id = $1")
        .bind(user_id.as_str())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DomainError::database("Failed to read balance", e))
}

pub(super) fn to_credits(value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Stored credit amount out of range: {}", value),
        )
    })
}

pub(super) fn user_not_found(id: &UserId) -> DomainError {
    DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", id))
        .with_detail("user_id", id.as_str())
}
