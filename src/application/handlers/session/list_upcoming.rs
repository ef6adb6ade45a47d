//! ListUpcomingSessionsHandler - Query for a user's upcoming sessions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::session::{ParticipantRole, Session, SessionError};
use crate::domain::user::UserContact;
use crate::ports::{Clock, SessionRepository, UserDirectory};

#[derive(Debug, Clone)]
pub struct ListUpcomingSessionsQuery {
    pub user_id: UserId,
}

/// One upcoming session seen from the caller's side.
#[derive(Debug, Clone)]
pub struct UpcomingSession {
    pub session: Session,
    pub role: ParticipantRole,
    pub counterpart: UserContact,
}

pub struct ListUpcomingSessionsHandler {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl ListUpcomingSessionsHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            users,
            clock,
        }
    }

    /// Pending and confirmed sessions starting after now, earliest first.
    pub async fn handle(
        &self,
        query: ListUpcomingSessionsQuery,
    ) -> Result<Vec<UpcomingSession>, SessionError> {
        let sessions = self
            .sessions
            .find_upcoming_for_user(&query.user_id, self.clock.now())
            .await?;

        let mut counterpart_ids: Vec<UserId> = sessions
            .iter()
            .filter_map(|s| s.role_of(&query.user_id).map(|role| s.counterpart_of(role).clone()))
            .collect();
        counterpart_ids.sort();
        counterpart_ids.dedup();

        let contacts: HashMap<UserId, UserContact> = self
            .users
            .find_contacts(&counterpart_ids)
            .await?
            .into_iter()
            .map(|contact| (contact.id.clone(), contact))
            .collect();

        sessions
            .into_iter()
            .map(|session| {
                let role = session.authorize_participant(&query.user_id)?;
                let counterpart_id = session.counterpart_of(role);
                let counterpart = contacts
                    .get(counterpart_id)
                    .cloned()
                    .ok_or_else(|| SessionError::UserNotFound(counterpart_id.clone()))?;
                Ok(UpcomingSession {
                    session,
                    role,
                    counterpart,
                })
            })
            .collect()
    }
}
