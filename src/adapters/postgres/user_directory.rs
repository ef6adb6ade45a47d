//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::ledger_ops::to_credits;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::{Skill, SkillLevel, UserContact, UserProfile, UserRole};
use crate::ports::UserDirectory;

#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_user(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row = sqlx::query("SELECT id, name, email, role, credits FROM users WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch user", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let name: String = row.try_get("name").map_err(column_err)?;
        let email: String = row.try_get("email").map_err(column_err)?;
        let role: String = row.try_get("role").map_err(column_err)?;
        let credits: i64 = row.try_get("credits").map_err(column_err)?;

        let mut profile = UserProfile::new(
            id.clone(),
            name,
            email,
            role.parse::<UserRole>().map_err(DomainError::from)?,
            to_credits(credits)?,
        );

        let skill_rows = sqlx::query(
            "SELECT name, level, verified FROM user_skills WHERE user_id = $1 ORDER BY position",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch user skills", e))?;

        for row in skill_rows {
            let name: String = row.try_get("name").map_err(column_err)?;
            let level: String = row.try_get("level").map_err(column_err)?;
            let verified: bool = row.try_get("verified").map_err(column_err)?;
            let skill = Skill::new(name, level.parse::<SkillLevel>()?, verified)?;
            profile = profile.with_skill(skill)?;
        }

        Ok(Some(profile))
    }

    async fn find_contacts(&self, ids: &[UserId]) -> Result<Vec<UserContact>, DomainError> {
        let keys: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        let rows = sqlx::query("SELECT id, name, email FROM users WHERE id = ANY($1)")
            .bind(&keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch contacts", e))?;

        rows.into_iter()
            .map(|row| {
                let id: String = row.try_get("id").map_err(column_err)?;
                Ok(UserContact {
                    id: UserId::new(id)?,
                    name: row.try_get("name").map_err(column_err)?,
                    email: row.try_get("email").map_err(column_err)?,
                })
            })
            .collect()
    }
}

fn column_err(e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to read user row: {}", e))
}
