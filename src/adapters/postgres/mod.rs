//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSessionRepository` - Sessions with transactional credit movements
//! - `PostgresUserDirectory` - Users, skills and balances
//! - `PostgresCreditLedger` - Standalone balance reads and adjustments

mod credit_ledger;
mod ledger_ops;
mod session_repository;
mod user_directory;

pub use credit_ledger::PostgresCreditLedger;
pub use session_repository::PostgresSessionRepository;
pub use user_directory::PostgresUserDirectory;
