//! Credit movements, the unit of the ledger journal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    CreditTransactionId, DomainError, ErrorCode, SessionId, Timestamp, UserId, ValidationError,
};

/// Why a balance changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Credits entering the system (registration grant, top-up).
    Grant,
    /// Credits leaving the system outside the session lifecycle.
    Withdrawal,
    /// Learner's credits held against a booked session.
    Reservation,
    /// Reserved credits paid to the instructor on completion.
    Settlement,
    /// Reserved credits returned to the learner on cancellation.
    Refund,
    /// Reserved credits destroyed by a same-day cancellation.
    Forfeiture,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Grant => "grant",
            MovementKind::Withdrawal => "withdrawal",
            MovementKind::Reservation => "reservation",
            MovementKind::Settlement => "settlement",
            MovementKind::Refund => "refund",
            MovementKind::Forfeiture => "forfeiture",
        }
    }

    /// Sign of the effect on the owner's balance: +1, -1 or 0.
    pub fn direction(&self) -> i64 {
        match self {
            MovementKind::Grant | MovementKind::Settlement | MovementKind::Refund => 1,
            MovementKind::Withdrawal | MovementKind::Reservation => -1,
            MovementKind::Forfeiture => 0,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grant" => Ok(MovementKind::Grant),
            "withdrawal" => Ok(MovementKind::Withdrawal),
            "reservation" => Ok(MovementKind::Reservation),
            "settlement" => Ok(MovementKind::Settlement),
            "refund" => Ok(MovementKind::Refund),
            "forfeiture" => Ok(MovementKind::Forfeiture),
            other => Err(ValidationError::invalid_format(
                "kind",
                format!("unknown credit movement '{}'", other),
            )),
        }
    }
}

/// One journal entry: `amount` credits moved for `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditMovement {
    pub id: CreditTransactionId,
    pub user_id: UserId,
    pub session_id: Option<SessionId>,
    pub kind: MovementKind,
    pub amount: u32,
    pub at: Timestamp,
}

impl CreditMovement {
    pub fn new(
        user_id: UserId,
        session_id: Option<SessionId>,
        kind: MovementKind,
        amount: u32,
        at: Timestamp,
    ) -> Self {
        Self {
            id: CreditTransactionId::new(),
            user_id,
            session_id,
            kind,
            amount,
            at,
        }
    }

    pub fn grant(user_id: UserId, amount: u32, at: Timestamp) -> Self {
        Self::new(user_id, None, MovementKind::Grant, amount, at)
    }

    pub fn withdrawal(user_id: UserId, amount: u32, at: Timestamp) -> Self {
        Self::new(user_id, None, MovementKind::Withdrawal, amount, at)
    }

    /// Signed change this movement makes to its owner's balance.
    pub fn balance_delta(&self) -> i64 {
        self.kind.direction() * i64::from(self.amount)
    }

    /// Applies this movement to a balance.
    ///
    /// # Errors
    ///
    /// - `InsufficientCredits` if a debit exceeds the balance
    /// - `InternalError` if a credit would overflow the balance
    pub fn apply_to(&self, balance: u32) -> Result<u32, DomainError> {
        match self.kind.direction() {
            d if d < 0 => balance
                .checked_sub(self.amount)
                .ok_or_else(|| DomainError::insufficient_credits(self.amount, balance)),
            d if d > 0 => balance.checked_add(self.amount).ok_or_else(|| {
                DomainError::new(ErrorCode::InternalError, "Credit balance overflow")
            }),
            _ => Ok(balance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("learner-1").unwrap()
    }

    fn movement(kind: MovementKind, amount: u32) -> CreditMovement {
        CreditMovement::new(user(), Some(SessionId::new()), kind, amount, Timestamp::now())
    }

    #[test]
    fn reservation_debits_and_refund_credits() {
        assert_eq!(movement(MovementKind::Reservation, 3).apply_to(5).unwrap(), 2);
        assert_eq!(movement(MovementKind::Refund, 3).apply_to(2).unwrap(), 5);
    }

    #[test]
    fn debit_beyond_balance_reports_amounts() {
        let err = movement(MovementKind::Reservation, 3).apply_to(1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientCredits);
        assert_eq!(err.detail_u32("required"), Some(3));
        assert_eq!(err.detail_u32("available"), Some(1));
    }

    #[test]
    fn debit_of_exact_balance_leaves_zero() {
        assert_eq!(movement(MovementKind::Withdrawal, 4).apply_to(4).unwrap(), 0);
    }

    #[test]
    fn forfeiture_leaves_balance_untouched() {
        let forfeit = movement(MovementKind::Forfeiture, 2);
        assert_eq!(forfeit.balance_delta(), 0);
        assert_eq!(forfeit.apply_to(7).unwrap(), 7);
    }

    #[test]
    fn credit_overflow_is_an_error() {
        assert!(movement(MovementKind::Grant, 1).apply_to(u32::MAX).is_err());
    }

    #[test]
    fn kind_names_parse_back() {
        for kind in [
            MovementKind::Grant,
            MovementKind::Withdrawal,
            MovementKind::Reservation,
            MovementKind::Settlement,
            MovementKind::Refund,
            MovementKind::Forfeiture,
        ] {
            assert_eq!(kind.as_str().parse::<MovementKind>().unwrap(), kind);
        }
    }
}
