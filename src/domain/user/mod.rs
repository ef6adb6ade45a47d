//! User module - marketplace members as seen by the booking core.
//!
//! Users are owned by the identity collaborator. The booking core only
//! reads them: role and verified skills decide who may teach, the
//! credit balance decides who may book, and the contact fields are
//! shared with the counterpart of a session.

mod profile;
mod skill;

pub use profile::{UserContact, UserProfile, UserRole};
pub use skill::{Skill, SkillLevel};
