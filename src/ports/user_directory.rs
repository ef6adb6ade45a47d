//! User directory port (read side of the identity collaborator).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{UserContact, UserProfile};

/// Read-only access to marketplace users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user with their skills and current balance.
    ///
    /// Returns `None` if not found.
    async fn find_user(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Contact cards for the given users. Unknown ids are skipped.
    async fn find_contacts(&self, ids: &[UserId]) -> Result<Vec<UserContact>, DomainError>;
}
