//! Credit balance handlers.

mod get_balance;

pub use get_balance::{CreditBalance, GetCreditBalanceHandler, GetCreditBalanceQuery};
