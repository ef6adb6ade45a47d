//! Booking validation.
//!
//! Turns a booking request plus the two participants' profiles into an
//! unsaved `BookingDraft`. Checks run in a fixed order so that a request
//! failing several of them always reports the same error.

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::ledger::credits_for_duration;
use crate::domain::user::{UserContact, UserProfile};

use super::SessionError;

/// What the learner asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub instructor_id: UserId,
    pub learner_id: UserId,
    pub skill: String,
    pub start_time: Timestamp,
    pub duration_minutes: i64,
}

/// A validated booking that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub instructor: UserContact,
    pub learner: UserContact,
    /// The instructor's canonical spelling of the skill.
    pub skill: String,
    pub start_time: Timestamp,
    pub duration_minutes: u32,
    pub credits: u32,
}

/// Validates a booking request.
///
/// Checks, in order:
/// 1. `InvalidDuration` for non-positive or unpriceable durations
/// 2. `SelfBooking` when instructor and learner are the same user
/// 3. `InstructorNotFound`, then `InvalidInstructor` for a non-instructor
/// 4. `SkillNotOffered` unless the instructor holds a verified matching skill
/// 5. `StartTimeInPast` when the start is not strictly after `now`
/// 6. `UserNotFound` for an unknown learner
/// 7. `InsufficientCredits` when the learner cannot cover the price
pub fn validate_booking(
    request: &BookingRequest,
    instructor: Option<&UserProfile>,
    learner: Option<&UserProfile>,
    now: Timestamp,
) -> Result<BookingDraft, SessionError> {
    let duration_minutes = u32::try_from(request.duration_minutes)
        .map_err(|_| SessionError::InvalidDuration(request.duration_minutes))?;
    let credits = credits_for_duration(request.duration_minutes)
        .ok_or(SessionError::InvalidDuration(request.duration_minutes))?;

    if request.instructor_id == request.learner_id {
        return Err(SessionError::SelfBooking);
    }

    let instructor =
        instructor.ok_or_else(|| SessionError::InstructorNotFound(request.instructor_id.clone()))?;
    if !instructor.is_instructor() {
        return Err(SessionError::InvalidInstructor(request.instructor_id.clone()));
    }

    let skill = instructor
        .verified_skill(&request.skill)
        .ok_or_else(|| SessionError::SkillNotOffered {
            skill: request.skill.trim().to_string(),
        })?;

    if !request.start_time.is_after(&now) {
        return Err(SessionError::StartTimeInPast);
    }

    let learner = learner.ok_or_else(|| SessionError::UserNotFound(request.learner_id.clone()))?;
    if learner.credits() < credits {
        return Err(SessionError::InsufficientCredits {
            required: credits,
            available: learner.credits(),
        });
    }

    Ok(BookingDraft {
        instructor: instructor.contact(),
        learner: learner.contact(),
        skill: skill.name().to_string(),
        start_time: request.start_time,
        duration_minutes,
        credits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{Skill, SkillLevel, UserRole};

    fn now() -> Timestamp {
        Timestamp::now()
    }

    fn instructor() -> UserProfile {
        UserProfile::new(
            UserId::new("inst-1").unwrap(),
            "Ines",
            "ines@example.com",
            UserRole::Instructor,
            0,
        )
        .with_skill(Skill::new("Rust", SkillLevel::Expert, true).unwrap())
        .unwrap()
        .with_skill(Skill::new("Go", SkillLevel::Beginner, false).unwrap())
        .unwrap()
    }

    fn learner(credits: u32) -> UserProfile {
        UserProfile::new(
            UserId::new("learner-1").unwrap(),
            "Lee",
            "lee@example.com",
            UserRole::Learner,
            credits,
        )
    }

    fn request() -> BookingRequest {
        BookingRequest {
            instructor_id: UserId::new("inst-1").unwrap(),
            learner_id: UserId::new("learner-1").unwrap(),
            skill: "rust".to_string(),
            start_time: now().plus_days(2),
            duration_minutes: 60,
        }
    }

    fn validate(request: &BookingRequest, learner_credits: u32) -> Result<BookingDraft, SessionError> {
        let inst = instructor();
        let learn = learner(learner_credits);
        validate_booking(request, Some(&inst), Some(&learn), now())
    }

    #[test]
    fn valid_request_produces_priced_draft() {
        let draft = validate(&request(), 5).unwrap();

        assert_eq!(draft.credits, 2);
        assert_eq!(draft.duration_minutes, 60);
        assert_eq!(draft.skill, "Rust");
        assert_eq!(draft.learner.email, "lee@example.com");
        assert_eq!(draft.instructor.name, "Ines");
    }

    #[test]
    fn zero_duration_is_rejected_first() {
        let mut req = request();
        req.duration_minutes = 0;
        req.learner_id = req.instructor_id.clone();
        assert_eq!(validate(&req, 0), Err(SessionError::InvalidDuration(0)));
    }

    #[test]
    fn booking_yourself_is_rejected() {
        let mut req = request();
        req.learner_id = req.instructor_id.clone();
        assert_eq!(validate(&req, 5), Err(SessionError::SelfBooking));
    }

    #[test]
    fn unknown_instructor_is_reported() {
        let learn = learner(5);
        let result = validate_booking(&request(), None, Some(&learn), now());
        assert!(matches!(result, Err(SessionError::InstructorNotFound(_))));
    }

    #[test]
    fn learner_role_cannot_teach() {
        let not_teacher = learner(5);
        let other = UserProfile::new(
            UserId::new("learner-1").unwrap(),
            "Lee",
            "lee@example.com",
            UserRole::Learner,
            5,
        );
        let mut req = request();
        req.instructor_id = UserId::new("learner-2").unwrap();
        let result = validate_booking(&req, Some(&not_teacher), Some(&other), now());
        assert!(matches!(result, Err(SessionError::InvalidInstructor(_))));
    }

    #[test]
    fn unverified_skill_is_not_offered() {
        let mut req = request();
        req.skill = " Go ".to_string();
        assert_eq!(
            validate(&req, 5),
            Err(SessionError::SkillNotOffered {
                skill: "Go".to_string()
            })
        );
    }

    #[test]
    fn start_time_equal_to_now_is_in_the_past() {
        let at = now();
        let inst = instructor();
        let learn = learner(5);
        let mut req = request();
        req.start_time = at;
        assert_eq!(
            validate_booking(&req, Some(&inst), Some(&learn), at),
            Err(SessionError::StartTimeInPast)
        );
    }

    #[test]
    fn unknown_learner_is_reported_after_instructor_checks() {
        let inst = instructor();
        let result = validate_booking(&request(), Some(&inst), None, now());
        assert!(matches!(result, Err(SessionError::UserNotFound(_))));
    }

    #[test]
    fn short_balance_reports_required_and_available() {
        let mut req = request();
        req.duration_minutes = 90;
        assert_eq!(
            validate(&req, 1),
            Err(SessionError::InsufficientCredits {
                required: 3,
                available: 1
            })
        );
    }

    #[test]
    fn exact_balance_is_enough() {
        assert!(validate(&request(), 2).is_ok());
    }
}
