//! Identity types for actors and rules

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an actor, unique within its level
///
/// Ids are handed out by the owning level. The raw value `0` means "not yet
/// assigned" and is replaced when the actor is added to a level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl ActorId {
    /// The placeholder id of an actor that no level owns yet
    pub const UNASSIGNED: ActorId = ActorId(0);

    /// Create a new actor ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Whether a level has assigned this id
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// Identifier of a rule, unique within the rule book that owns it
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RuleId(pub u64);

impl RuleId {
    /// Create a new rule ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule:{}", self.0)
    }
}
