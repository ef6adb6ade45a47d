//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `user` - Marketplace members, roles and skills
//! - `ledger` - Time credits, pricing and the movement journal
//! - `session` - Booked session lifecycle, validation and events

pub mod foundation;
pub mod ledger;
pub mod session;
pub mod user;
