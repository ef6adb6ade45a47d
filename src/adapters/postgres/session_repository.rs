//! PostgreSQL implementation of SessionRepository.
//!
//! Status changes are compare-and-set on the expected status and share a
//! transaction with the credit movements they produce.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::ledger_ops::{apply_movement, to_credits};
use crate::domain::foundation::{
    DomainError, ErrorCode, MeetingRoomId, Rating, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::ledger::CreditMovement;
use crate::domain::session::{transition_rejected, Session, SessionTransition};
use crate::ports::SessionRepository;

const SESSION_COLUMNS: &str = r#"
    id, instructor_id, learner_id, skill, start_time, duration_minutes, credits,
    status, meeting_room, rating, review, created_at, updated_at
"#;

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Creates a new PostgresSessionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn insert_with_reservation(
        &self,
        session: &Session,
        reservation: &CreditMovement,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, instructor_id, learner_id, skill, start_time, duration_minutes,
                credits, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.instructor_id().as_str())
        .bind(session.learner_id().as_str())
        .bind(session.skill())
        .bind(session.start_time().as_datetime())
        .bind(i64::from(session.duration_minutes()))
        .bind(i64::from(session.credits()))
        .bind(session.status().as_str())
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to insert session", e))?;

        // Dropping the transaction on error rolls back the insert.
        apply_movement(&mut tx, reservation).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(())
    }

    async fn commit_transition(
        &self,
        session: &Session,
        expected: SessionStatus,
        movements: &[CreditMovement],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let result = sqlx::query(
            "UPDATE sessions SET status = $2, updated_at = $3 WHERE id = $1 AND status = $4",
        )
        .bind(session.id().as_uuid())
        .bind(session.status().as_str())
        .bind(session.updated_at().as_datetime())
        .bind(expected.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to update session status", e))?;

        if result.rows_affected() == 0 {
            return Err(concurrent_modification(session.id()));
        }

        for movement in movements {
            apply_movement(&mut tx, movement).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(())
    }

    async fn record_rating(&self, session: &Session) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET rating = $2, review = $3, updated_at = $4
            WHERE id = $1 AND status = 'completed' AND rating IS NULL
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.rating().map(|r| i16::from(r.value())))
        .bind(session.review())
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to record rating", e))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Lost the race; report what the session turned into.
        let stored = self
            .find_by_id(session.id())
            .await?
            .ok_or_else(|| session_not_found(session.id()))?;
        if stored.status() != SessionStatus::Completed {
            return Err(transition_rejected(
                session.id(),
                stored.status(),
                SessionTransition::Rate,
            ));
        }
        Err(
            DomainError::new(ErrorCode::AlreadyRated, "Session is already rated")
                .with_detail("session_id", session.id().to_string()),
        )
    }

    async fn assign_room_if_absent(
        &self,
        id: &SessionId,
        room: &MeetingRoomId,
    ) -> Result<MeetingRoomId, DomainError> {
        let assigned: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE sessions SET meeting_room = COALESCE(meeting_room, $2)
            WHERE id = $1 AND status = 'confirmed'
            RETURNING meeting_room
            "#,
        )
        .bind(id.as_uuid())
        .bind(room.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to assign meeting room", e))?;

        assigned
            .map(MeetingRoomId::from_string)
            .ok_or_else(|| concurrent_modification(id))
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM sessions WHERE id = $1", SESSION_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn find_upcoming_for_user(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM sessions
            WHERE (instructor_id = $1 OR learner_id = $1)
              AND status IN ('pending', 'confirmed')
              AND start_time > $2
            ORDER BY start_time ASC, id ASC
            "#,
            SESSION_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch upcoming sessions", e))?;

        rows.into_iter().map(row_to_session).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

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

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, DomainError> {
    let column_err = |column: &str, e: sqlx::Error| {
        DomainError::database(&format!("Failed to get {}", column), e)
    };

    let id: uuid::Uuid = row.try_get("id").map_err(|e| column_err("id", e))?;
    let instructor_id: String = row
        .try_get("instructor_id")
        .map_err(|e| column_err("instructor_id", e))?;
    let learner_id: String = row
        .try_get("learner_id")
        .map_err(|e| column_err("learner_id", e))?;
    let skill: String = row.try_get("skill").map_err(|e| column_err("skill", e))?;
    let start_time: chrono::DateTime<chrono::Utc> = row
        .try_get("start_time")
        .map_err(|e| column_err("start_time", e))?;
    let duration_minutes: i64 = row
        .try_get("duration_minutes")
        .map_err(|e| column_err("duration_minutes", e))?;
    let credits: i64 = row.try_get("credits").map_err(|e| column_err("credits", e))?;
    let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;
    let meeting_room: Option<String> = row
        .try_get("meeting_room")
        .map_err(|e| column_err("meeting_room", e))?;
    let rating: Option<i16> = row.try_get("rating").map_err(|e| column_err("rating", e))?;
    let review: Option<String> = row.try_get("review").map_err(|e| column_err("review", e))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(|e| column_err("created_at", e))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| column_err("updated_at", e))?;

    let invalid = |what: &str, e: &dyn std::fmt::Display| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", what, e))
    };

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        UserId::new(instructor_id).map_err(|e| invalid("instructor_id", &e))?,
        UserId::new(learner_id).map_err(|e| invalid("learner_id", &e))?,
        skill,
        Timestamp::from_datetime(start_time),
        to_credits(duration_minutes)?,
        to_credits(credits)?,
        status
            .parse::<SessionStatus>()
            .map_err(|e| invalid("status", &e))?,
        meeting_room.map(MeetingRoomId::from_string),
        rating
            .map(|r| Rating::new(i64::from(r)))
            .transpose()
            .map_err(|e| invalid("rating", &e))?,
        review,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_error_names_the_session() {
        let id = SessionId::new();
        let err = concurrent_modification(&id);
        assert_eq!(err.code, ErrorCode::ConcurrentModification);
        assert_eq!(err.details.get("session_id"), Some(&id.to_string()));
    }

    #[test]
    fn stored_status_names_parse() {
        for status in SessionStatus::ALL {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
    }
}
