//! In-memory marketplace store.
//!
//! Implements `SessionRepository`, `UserDirectory` and `CreditLedger` over a
//! single mutex, so a status change and its credit movements are applied as
//! one step exactly like the Postgres transaction does.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::{
    DomainError, ErrorCode, MeetingRoomId, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::ledger::CreditMovement;
use crate::domain::session::{transition_rejected, Session, SessionTransition};
use crate::domain::user::{UserContact, UserProfile};
use crate::ports::{CreditLedger, SessionRepository, UserDirectory};

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserProfile>,
    balances: HashMap<UserId, u32>,
    sessions: HashMap<SessionId, Session>,
    journal: Vec<CreditMovement>,
}

impl State {
    /// Applies movements all-or-nothing.
    fn apply(&mut self, movements: &[CreditMovement]) -> Result<(), DomainError> {
        let mut staged: HashMap<UserId, u32> = HashMap::new();
        for movement in movements {
            let current = match staged.get(&movement.user_id) {
                Some(balance) => *balance,
                None => *self
                    .balances
                    .get(&movement.user_id)
                    .ok_or_else(|| user_not_found(&movement.user_id))?,
            };
            staged.insert(movement.user_id.clone(), movement.apply_to(current)?);
        }

        self.balances.extend(staged);
        self.journal.extend(movements.iter().cloned());
        Ok(())
    }

    fn stored(&self, id: &SessionId) -> Result<&Session, DomainError> {
        self.sessions.get(id).ok_or_else(|| session_not_found(id))
    }
}

/// In-memory implementation of the persistence ports.
///
/// Used by tests and by local runs without a database.
#[derive(Default)]
pub struct InMemoryMarketplaceStore {
    state: Mutex<State>,
}

impl InMemoryMarketplaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a user. Their starting balance is journaled as a grant.
    pub fn insert_user(&self, profile: UserProfile) {
        let mut state = self.state();
        let id = profile.id().clone();
        let credits = profile.credits();
        if credits > 0 {
            state
                .journal
                .push(CreditMovement::grant(id.clone(), credits, Timestamp::now()));
        }
        state.balances.insert(id.clone(), credits);
        state.users.insert(id, profile);
    }

    /// Every credit movement applied so far, in order.
    pub fn journal(&self) -> Vec<CreditMovement> {
        self.state().journal.clone()
    }

    /// Sum of all user balances.
    pub fn total_balance(&self) -> u64 {
        self.state().balances.values().map(|b| u64::from(*b)).sum()
    }

    /// Credits held by pending and confirmed sessions.
    pub fn total_reserved(&self) -> u64 {
        self.state()
            .sessions
            .values()
            .filter(|s| s.status().holds_reservation())
            .map(|s| u64::from(s.credits()))
            .sum()
    }
}

#[async_trait]
impl SessionRepository for InMemoryMarketplaceStore {
    async fn insert_with_reservation(
        &self,
        session: &Session,
        reservation: &CreditMovement,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        state.apply(std::slice::from_ref(reservation))?;
        state.sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn commit_transition(
        &self,
        session: &Session,
        expected: SessionStatus,
        movements: &[CreditMovement],
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        if state.stored(session.id())?.status() != expected {
            return Err(concurrent_modification(session.id()));
        }
        state.apply(movements)?;
        state.sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn record_rating(&self, session: &Session) -> Result<(), DomainError> {
        let mut state = self.state();
        let stored = state.stored(session.id())?;
        if stored.status() != SessionStatus::Completed {
            return Err(transition_rejected(
                session.id(),
                stored.status(),
                SessionTransition::Rate,
            ));
        }
        if stored.rating().is_some() {
            return Err(already_rated(session.id()));
        }
        state.sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn assign_room_if_absent(
        &self,
        id: &SessionId,
        room: &MeetingRoomId,
    ) -> Result<MeetingRoomId, DomainError> {
        let mut state = self.state();
        let stored = state
            .sessions
            .get_mut(id)
            .ok_or_else(|| session_not_found(id))?;
        if stored.status() != SessionStatus::Confirmed {
            return Err(concurrent_modification(id));
        }
        stored.attach_room(room.clone());
        stored
            .meeting_room()
            .cloned()
            .ok_or_else(|| DomainError::new(ErrorCode::InternalError, "Meeting room not stored"))
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.state().sessions.get(id).cloned())
    }

    async fn find_upcoming_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Vec<Session>, DomainError> {
        let mut upcoming: Vec<Session> = self
            .state()
            .sessions
            .values()
            .filter(|s| s.role_of(user_id).is_some())
            .filter(|s| s.status().holds_reservation())
            .filter(|s| s.start_time().is_after(&now))
            .cloned()
            .collect();
        upcoming.sort_by(|a, b| {
            a.start_time()
                .cmp(b.start_time())
                .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
        });
        Ok(upcoming)
    }
}

#[async_trait]
impl UserDirectory for InMemoryMarketplaceStore {
    async fn find_user(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let state = self.state();
        Ok(state.users.get(id).map(|profile| {
            let balance = state.balances.get(id).copied().unwrap_or_default();
            profile.clone().with_credits(balance)
        }))
    }

    async fn find_contacts(&self, ids: &[UserId]) -> Result<Vec<UserContact>, DomainError> {
        let state = self.state();
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(UserProfile::contact)
            .collect())
    }
}

#[async_trait]
impl CreditLedger for InMemoryMarketplaceStore {
    async fn balance(&self, user_id: &UserId) -> Result<u32, DomainError> {
        self.state()
            .balances
            .get(user_id)
            .copied()
            .ok_or_else(|| user_not_found(user_id))
    }

    async fn credit(&self, user_id: &UserId, amount: u32) -> Result<u32, DomainError> {
        let mut state = self.state();
        state.apply(&[CreditMovement::grant(user_id.clone(), amount, Timestamp::now())])?;
        Ok(state.balances.get(user_id).copied().unwrap_or_default())
    }

    async fn debit(&self, user_id: &UserId, amount: u32) -> Result<u32, DomainError> {
        let mut state = self.state();
        state.apply(&[CreditMovement::withdrawal(user_id.clone(), amount, Timestamp::now())])?;
        Ok(state.balances.get(user_id).copied().unwrap_or_default())
    }
}

fn user_not_found(id: &UserId) -> DomainError {
    DomainError::new(ErrorCode::UserNotFound, format!("User not found: {}", id))
        .with_detail("user_id", id.as_str())
}

fn session_not_found(id: &SessionId) -> DomainError {
    DomainError::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
        .with_detail("session_id", id.to_string())
}

fn concurrent_modification(id: &SessionId) -> DomainError {
    DomainError::new(
        ErrorCode::ConcurrentModification,
        format!("Session {} changed since it was loaded", id),
    )
    .with_detail("session_id", id.to_string())
}

fn already_rated(id: &SessionId) -> DomainError {
    DomainError::new(ErrorCode::AlreadyRated, format!("Session {} is already rated", id))
        .with_detail("session_id", id.to_string())
}
