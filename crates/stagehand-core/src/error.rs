//! Error types for stagehand-core

use crate::{ActorId, RuleId};
use thiserror::Error;

/// Core error type
///
/// None of these are fatal: dispatch isolates them per actor, the cloner
/// skips the offending rule, and authoring checks report them before any
/// state is touched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Level not found: {0}")]
    LevelNotFound(usize),

    #[error("Action {action} must be owned by an actor")]
    RuleRequiresActor { action: String },

    #[error("Action {action} needs a collision partner")]
    MissingPartner { action: String },

    #[error("Invalid rule {rule}: {reason}")]
    InvalidRule { rule: RuleId, reason: String },

    #[error("Invalid play order: {0}")]
    InvalidPlayOrder(String),

    #[error("No reference actor to copy")]
    NoReference,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
