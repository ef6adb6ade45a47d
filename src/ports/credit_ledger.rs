//! Credit ledger port.
//!
//! Standalone balance operations outside the session lifecycle. Session
//! reservations, settlements and refunds go through `SessionRepository`
//! so they commit together with the status change.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};

/// Port for reading and adjusting credit balances.
///
/// Every adjustment is journaled (`grant` for credits, `withdrawal` for
/// debits) so the conservation of credits stays auditable.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Current spendable balance.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    async fn balance(&self, user_id: &UserId) -> Result<u32, DomainError>;

    /// Unconditionally adds credits. Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user does not exist
    async fn credit(&self, user_id: &UserId, amount: u32) -> Result<u32, DomainError>;

    /// Removes credits if the balance covers them. Returns the new balance.
    ///
    /// The check and the decrement are one atomic store operation.
    ///
    /// # Errors
    ///
    /// - `InsufficientCredits` (with `required`/`available`) if the balance is short
    /// - `UserNotFound` if the user does not exist
    async fn debit(&self, user_id: &UserId, amount: u32) -> Result<u32, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn CreditLedger) {}
    }
}
