//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod credits;
pub mod notification;
pub mod session;

pub use credits::{CreditBalance, GetCreditBalanceHandler, GetCreditBalanceQuery};
pub use notification::{SessionNotificationHandler, NOTIFIED_EVENT_TYPES};
pub use session::{
    BookSessionCommand, BookSessionHandler, BookSessionResult, CancelSessionCommand,
    CancelSessionHandler, CancelSessionResult, CompleteSessionCommand, CompleteSessionHandler,
    ConfirmSessionCommand, ConfirmSessionHandler, GetSessionHandler, GetSessionQuery,
    JoinSessionCommand, JoinSessionHandler, JoinSessionResult, ListUpcomingSessionsHandler,
    ListUpcomingSessionsQuery, RateSessionCommand, RateSessionHandler, UpcomingSession,
};
