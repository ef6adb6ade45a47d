//! Skill Exchange - Session booking and time-credit ledger
//!
//! Members trade skills for credits: a learner books an instructor, credits
//! are held while the session is open, and they move to the instructor on
//! completion or back to the learner on cancellation.
//!
//! Layers follow the ports-and-adapters layout:
//! - `domain` - Users, sessions, credit movements and their rules
//! - `ports` - Traits the use cases depend on
//! - `application` - One handler per command or query
//! - `adapters` - PostgreSQL, in-memory, HTTP and auth implementations
//! - `config` - Environment-driven settings

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
