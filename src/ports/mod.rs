//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `SessionRepository` - Sessions plus the credit movements of their transitions
//! - `UserDirectory` - Read access to users, skills and balances
//! - `CreditLedger` - Standalone balance reads and adjustments
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Other Ports
//!
//! - `AccessTokenValidator` - Bearer token validation
//! - `Clock` - Current time
//! - `Notifier` - Outbound participant notifications

mod access_token_validator;
mod clock;
mod credit_ledger;
mod event_publisher;
mod event_subscriber;
mod notifier;
mod session_repository;
mod user_directory;

pub use access_token_validator::AccessTokenValidator;
pub use clock::Clock;
pub use credit_ledger::CreditLedger;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use notifier::{Notification, NotificationKind, Notifier};
pub use session_repository::SessionRepository;
pub use user_directory::UserDirectory;
