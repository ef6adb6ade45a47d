//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token validation (JWT, mock)
//! - `clock` - System and fixed clocks
//! - `events` - Queued and synchronous in-process event buses
//! - `http` - axum routes, DTOs and middleware
//! - `memory` - In-memory persistence for tests and local runs
//! - `notification` - Log-backed notifier
//! - `postgres` - PostgreSQL persistence

pub mod auth;
pub mod clock;
pub mod events;
pub mod http;
pub mod memory;
pub mod notification;
pub mod postgres;

pub use auth::{JwtAccessTokenValidator, MockAccessTokenValidator};
pub use clock::{FixedClock, SystemClock};
pub use events::{DispatchingEventBus, InMemoryEventBus};
pub use memory::InMemoryMarketplaceStore;
pub use notification::LogNotifier;
pub use postgres::{PostgresCreditLedger, PostgresSessionRepository, PostgresUserDirectory};
