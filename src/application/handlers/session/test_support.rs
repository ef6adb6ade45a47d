//! Shared fixtures for the session handler tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::{FixedClock, InMemoryEventBus, InMemoryMarketplaceStore};
use crate::domain::foundation::{
    CommandMetadata, DomainError, ErrorCode, EventEnvelope, Timestamp, UserId,
};
use crate::domain::session::{BookingRequest, Session};
use crate::domain::user::{Skill, SkillLevel, UserProfile, UserRole};
use crate::ports::EventPublisher;

pub const INSTRUCTOR: &str = "instructor-1";
pub const LEARNER: &str = "learner-1";
pub const STRANGER: &str = "stranger-1";

pub fn uid(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

pub fn metadata(user: &str) -> CommandMetadata {
    CommandMetadata::new(uid(user))
        .with_correlation_id("test-correlation")
        .with_source("test")
}

/// 2026-03-10 09:00 UTC.
pub fn morning() -> Timestamp {
    Timestamp::from_datetime(
        chrono::DateTime::parse_from_rfc3339("2026-03-10T09:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc),
    )
}

/// Marketplace with one verified Rust instructor, a learner and an
/// unrelated user.
pub struct Fixture {
    pub store: Arc<InMemoryMarketplaceStore>,
    pub bus: Arc<InMemoryEventBus>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub fn new(learner_credits: u32) -> Self {
        let store = Arc::new(InMemoryMarketplaceStore::new());
        store.insert_user(
            UserProfile::new(
                uid(INSTRUCTOR),
                "Ines",
                "ines@example.com",
                UserRole::Instructor,
                0,
            )
            .with_skill(Skill::new("Rust", SkillLevel::Expert, true).unwrap())
            .unwrap()
            .with_skill(Skill::new("Go", SkillLevel::Advanced, false).unwrap())
            .unwrap(),
        );
        store.insert_user(UserProfile::new(
            uid(LEARNER),
            "Lee",
            "lee@example.com",
            UserRole::Learner,
            learner_credits,
        ));
        store.insert_user(UserProfile::new(
            uid(STRANGER),
            "Sam",
            "sam@example.com",
            UserRole::Learner,
            10,
        ));

        Self {
            store,
            bus: Arc::new(InMemoryEventBus::new()),
            clock: Arc::new(FixedClock::new(morning())),
        }
    }

    pub fn request(&self, start_in_days: i64, duration_minutes: i64) -> BookingRequest {
        BookingRequest {
            instructor_id: uid(INSTRUCTOR),
            learner_id: uid(LEARNER),
            skill: "rust".to_string(),
            start_time: morning().plus_days(start_in_days),
            duration_minutes,
        }
    }

    /// Books a session directly against the store, bypassing the handler.
    pub async fn booked(&self, start_in_days: i64, duration_minutes: i64) -> Session {
        use crate::domain::session::validate_booking;
        use crate::ports::{SessionRepository, UserDirectory};

        let request = self.request(start_in_days, duration_minutes);
        let instructor = self.store.find_user(&request.instructor_id).await.unwrap();
        let learner = self.store.find_user(&request.learner_id).await.unwrap();
        let draft =
            validate_booking(&request, instructor.as_ref(), learner.as_ref(), morning()).unwrap();
        let (session, reservation) = Session::book(draft, morning());
        self.store
            .insert_with_reservation(&session, &reservation)
            .await
            .unwrap();
        session
    }

    pub async fn confirmed(&self, start_in_days: i64, duration_minutes: i64) -> Session {
        use crate::ports::SessionRepository;

        let mut session = self.booked(start_in_days, duration_minutes).await;
        let expected = session.status();
        session.confirm(&uid(INSTRUCTOR), morning()).unwrap();
        self.store
            .commit_transition(&session, expected, &[])
            .await
            .unwrap();
        session
    }

    pub async fn balance(&self, user: &str) -> u32 {
        use crate::ports::CreditLedger;
        self.store.balance(&uid(user)).await.unwrap()
    }
}

/// Publisher whose every publish fails.
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: EventEnvelope) -> Result<(), DomainError> {
        Err(DomainError::new(
            ErrorCode::InternalError,
            "Simulated publish failure",
        ))
    }

    async fn publish_all(&self, _events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        Err(DomainError::new(
            ErrorCode::InternalError,
            "Simulated publish failure",
        ))
    }
}
