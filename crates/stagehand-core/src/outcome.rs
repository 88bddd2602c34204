//! Outcomes of performing actions and of a whole dispatch

use crate::{Actor, ActorId, AttributeType, Error};
use serde::{Deserialize, Serialize};

/// A level or game transition requested by an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSignal {
    NextLevel,
    WinGame,
    LoseGame,
}

/// One attribute mutation made by an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub actor: ActorId,
    pub attribute: AttributeType,
    pub previous: i64,
    pub value: i64,
}

/// Side effects collected while actions run
///
/// Nothing in here has touched the level yet; the level applies it after
/// the dispatch pass.
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// Actors to add, ids not yet assigned
    pub spawned: Vec<Actor>,
    /// Actors to remove
    pub destroyed: Vec<ActorId>,
    pub signals: Vec<GameSignal>,
    pub sounds: Vec<String>,
    pub attribute_changes: Vec<AttributeChange>,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty()
            && self.destroyed.is_empty()
            && self.signals.is_empty()
            && self.sounds.is_empty()
            && self.attribute_changes.is_empty()
    }

    /// Merge another outcome into this one
    pub fn merge(&mut self, other: Outcome) {
        self.spawned.extend(other.spawned);
        self.destroyed.extend(other.destroyed);
        self.signals.extend(other.signals);
        self.sounds.extend(other.sounds);
        self.attribute_changes.extend(other.attribute_changes);
    }
}

/// A dispatch failure isolated to one rule owner
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchFailure {
    /// The failing actor, `None` for a level rule
    pub owner: Option<ActorId>,
    pub error: Error,
}

/// What a call to `Level::handle_trigger` did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// Number of actions performed
    pub matched: usize,
    /// Ids given to actors spawned during the dispatch
    pub spawned: Vec<ActorId>,
    pub destroyed: Vec<ActorId>,
    /// Transitions in the order they were requested
    pub signals: Vec<GameSignal>,
    pub sounds: Vec<String>,
    pub attribute_changes: Vec<AttributeChange>,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    /// True if no rule owner failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// The transition that wins when several were requested
    pub fn last_signal(&self) -> Option<GameSignal> {
        self.signals.last().copied()
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: DispatchReport) {
        self.matched += other.matched;
        self.spawned.extend(other.spawned);
        self.destroyed.extend(other.destroyed);
        self.signals.extend(other.signals);
        self.sounds.extend(other.sounds);
        self.attribute_changes.extend(other.attribute_changes);
        self.failures.extend(other.failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_merge() {
        let mut a = Outcome::new();
        a.signals.push(GameSignal::WinGame);

        let mut b = Outcome::new();
        b.signals.push(GameSignal::LoseGame);
        b.destroyed.push(ActorId::new(2));

        a.merge(b);
        assert_eq!(a.signals, vec![GameSignal::WinGame, GameSignal::LoseGame]);
        assert_eq!(a.destroyed, vec![ActorId::new(2)]);
        assert!(!a.is_empty());
        assert!(Outcome::new().is_empty());
    }

    #[test]
    fn test_report_merge_keeps_order() {
        let mut a = DispatchReport {
            matched: 1,
            signals: vec![GameSignal::WinGame],
            ..Default::default()
        };
        let b = DispatchReport {
            matched: 2,
            signals: vec![GameSignal::LoseGame],
            failures: vec![DispatchFailure {
                owner: None,
                error: Error::NoReference,
            }],
            ..Default::default()
        };

        a.merge(b);
        assert_eq!(a.matched, 3);
        assert_eq!(a.last_signal(), Some(GameSignal::LoseGame));
        assert!(!a.is_clean());
    }
}
