//! Attribute and role model attached to actors

use crate::ActorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a numeric attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    /// Score
    Points,
    /// Hit points
    Health,
    /// A named, author-defined attribute
    Custom(String),
}

impl AttributeType {
    /// Create a custom attribute type
    pub fn custom(name: impl Into<String>) -> Self {
        AttributeType::Custom(name.into())
    }

    /// Display name of the attribute
    pub fn name(&self) -> &str {
        match self {
            AttributeType::Points => "Points",
            AttributeType::Health => "Health",
            AttributeType::Custom(name) => name,
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A read view of one attribute and the actor that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub owner: ActorId,
    pub kind: AttributeType,
    pub value: i64,
}

/// Coarse role tag held by an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorState {
    /// The main playable actor
    Main,
    Enemy,
    Neutral,
}
