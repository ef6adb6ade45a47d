//! Skills listed on a user's profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Self-declared proficiency for a listed skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "expert" => Ok(SkillLevel::Expert),
            other => Err(ValidationError::invalid_format(
                "skill_level",
                format!("unknown skill level '{}'", other),
            )),
        }
    }
}

/// A skill a user lists on their profile.
///
/// Only `verified` skills can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    name: String,
    level: SkillLevel,
    verified: bool,
}

impl Skill {
    /// Creates a skill; the name is stored trimmed and must not be blank.
    pub fn new(
        name: impl Into<String>,
        level: SkillLevel,
        verified: bool,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("skill"));
        }
        Ok(Self {
            name,
            level,
            verified,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> SkillLevel {
        self.level
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace.
    pub fn matches(&self, requested: &str) -> bool {
        self.name.to_lowercase() == requested.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_required() {
        let skill = Skill::new("  Rust  ", SkillLevel::Expert, true).unwrap();
        assert_eq!(skill.name(), "Rust");
        assert!(Skill::new("   ", SkillLevel::Beginner, false).is_err());
    }

    #[test]
    fn matches_ignores_case_and_padding() {
        let skill = Skill::new("Guitar", SkillLevel::Advanced, true).unwrap();
        assert!(skill.matches("guitar"));
        assert!(skill.matches(" GUITAR "));
        assert!(!skill.matches("bass guitar"));
    }

    #[test]
    fn level_parses_lowercase_names() {
        assert_eq!("expert".parse::<SkillLevel>().unwrap(), SkillLevel::Expert);
        assert!("guru".parse::<SkillLevel>().is_err());
    }
}
