//! Marketplace user profile and contact card.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Skill;
use crate::domain::foundation::{UserId, ValidationError};

/// Role a user registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Learner,
    Instructor,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Learner => "learner",
            UserRole::Instructor => "instructor",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learner" => Ok(UserRole::Learner),
            "instructor" => Ok(UserRole::Instructor),
            "moderator" => Ok(UserRole::Moderator),
            "admin" => Ok(UserRole::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// Contact fields shared with the other participant of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContact {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Read model of a marketplace user.
///
/// # Invariants
///
/// - skill names are unique per user, compared case-insensitively
/// - `credits` is a non-negative balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    name: String,
    email: String,
    role: UserRole,
    skills: Vec<Skill>,
    credits: u32,
}

impl UserProfile {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        credits: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            skills: Vec::new(),
            credits,
        }
    }

    /// Builder: append a skill, rejecting a duplicate name.
    pub fn with_skill(mut self, skill: Skill) -> Result<Self, ValidationError> {
        if self.skills.iter().any(|s| s.matches(skill.name())) {
            return Err(ValidationError::invalid_format(
                "skill",
                format!("skill '{}' is already listed", skill.name()),
            ));
        }
        self.skills.push(skill);
        Ok(self)
    }

    /// Builder: replace the balance with a freshly read one.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn is_instructor(&self) -> bool {
        self.role == UserRole::Instructor
    }

    /// Finds a verified skill by name (case-insensitive, trimmed).
    pub fn verified_skill(&self, requested: &str) -> Option<&Skill> {
        self.skills
            .iter()
            .find(|s| s.is_verified() && s.matches(requested))
    }

    pub fn contact(&self) -> UserContact {
        UserContact {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}
