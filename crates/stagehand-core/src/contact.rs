//! Contact detection: the collision event source
//!
//! Compares every ordered pair of actors in a level and raises a collision
//! event when a pair starts overlapping. A pair that stays in contact does
//! not raise again until it has separated, so a collision rule fires once
//! per contact rather than once per tick.

use crate::{ActorId, Bounds, CollisionSide, Level, TriggerEvent};
use std::collections::HashSet;
use tracing::debug;

/// Tracks which actor pairs are currently touching
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    /// Ordered (mover, partner) pairs in contact after the last detection
    active: HashSet<(ActorId, ActorId)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collision events for pairs that entered contact since the last call
    ///
    /// Events are only raised for actors that hold a rule under the
    /// event's key.
    pub fn detect(&mut self, level: &Level) -> Vec<TriggerEvent> {
        let boxes: Vec<(ActorId, Bounds)> = level
            .actors()
            .map(|actor| (actor.id(), actor.bounds()))
            .collect();

        let mut touching = HashSet::new();
        let mut events = Vec::new();
        for (actor, bounds) in &boxes {
            for (partner, partner_bounds) in &boxes {
                if actor == partner {
                    continue;
                }
                let Some((dx, dy)) = bounds.overlap(partner_bounds) else {
                    continue;
                };
                touching.insert((*actor, *partner));
                if self.active.contains(&(*actor, *partner)) {
                    continue;
                }

                let event = TriggerEvent::Collision {
                    side: classify(bounds, partner_bounds, dx, dy),
                    actor: *actor,
                    partner: *partner,
                };
                if level.actors_for(&event.key()).contains(actor) {
                    debug!(%actor, %partner, "contact");
                    events.push(event);
                }
            }
        }

        self.active = touching;
        events
    }

    /// Forget every contact, e.g. when the level changes
    pub fn reset(&mut self) {
        self.active.clear();
    }

    pub fn is_touching(&self, actor: ActorId, partner: ActorId) -> bool {
        self.active.contains(&(actor, partner))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// Which side of `mover` met `other`, judged by the shallower overlap axis
fn classify(mover: &Bounds, other: &Bounds, dx: f64, dy: f64) -> CollisionSide {
    if dx < dy {
        CollisionSide::Side
    } else if mover.min_y() < other.min_y() {
        CollisionSide::Bottom
    } else {
        CollisionSide::Top
    }
}
