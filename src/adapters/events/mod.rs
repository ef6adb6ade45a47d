//! Event bus adapters.
//!
//! - `DispatchingEventBus` - Bounded queue drained by a background worker
//! - `InMemoryEventBus` - Synchronous, in-process bus that keeps events for tests

mod dispatching;
mod in_memory;

pub use dispatching::{DispatchingEventBus, DEFAULT_QUEUE_CAPACITY};
pub use in_memory::InMemoryEventBus;
