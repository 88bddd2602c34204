//! Triggers: held conditions and the live events matched against them
//!
//! A [`Trigger`] is stored inside a rule and describes the condition the
//! rule waits for. A [`TriggerEvent`] is raised by an event source (input,
//! scheduler, contact detector, attribute change) and is matched against
//! held triggers by [`TriggerEvent::evaluate`]. Both classify into a
//! [`TriggerKey`], which is what levels index actors by.

use crate::{Actor, ActorId, AttributeType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Char(char),
}

/// Which side of the moving actor made contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionSide {
    /// Left or right edge
    Side,
    /// The mover's top edge hit something above it
    Top,
    /// The mover's bottom edge hit something below it
    Bottom,
}

/// Classification key grouping triggers that react to the same class of event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKey {
    Key(KeyCode),
    Tick,
    Collision { side: CollisionSide, partner: ActorId },
    Attribute(AttributeType),
    Click,
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerKey::Key(key) => write!(f, "key:{:?}", key),
            TriggerKey::Tick => write!(f, "tick"),
            TriggerKey::Collision { side, partner } => {
                write!(f, "collision:{:?}:{}", side, partner)
            }
            TriggerKey::Attribute(attribute) => write!(f, "attribute:{}", attribute),
            TriggerKey::Click => write!(f, "click"),
        }
    }
}

/// A condition held by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// A key was pressed
    KeyPress { key: KeyCode },
    /// Every `interval` ticks
    Tick { interval: u64 },
    /// The owner touched `partner` with the given side
    Collision {
        side: CollisionSide,
        partner: ActorId,
    },
    /// The owner's attribute crossed or landed on `value`
    AttributeReached {
        attribute: AttributeType,
        value: i64,
    },
    /// The owner was clicked (any click for level rules)
    Click,
}

impl Trigger {
    pub fn key_press(key: KeyCode) -> Self {
        Trigger::KeyPress { key }
    }

    pub fn tick(interval: u64) -> Self {
        Trigger::Tick { interval }
    }

    pub fn collision(side: CollisionSide, partner: ActorId) -> Self {
        Trigger::Collision { side, partner }
    }

    pub fn attribute_reached(attribute: AttributeType, value: i64) -> Self {
        Trigger::AttributeReached { attribute, value }
    }

    /// The classification key this trigger is indexed under
    pub fn key(&self) -> TriggerKey {
        match self {
            Trigger::KeyPress { key } => TriggerKey::Key(*key),
            Trigger::Tick { .. } => TriggerKey::Tick,
            Trigger::Collision { side, partner } => TriggerKey::Collision {
                side: *side,
                partner: *partner,
            },
            Trigger::AttributeReached { attribute, .. } => {
                TriggerKey::Attribute(attribute.clone())
            }
            Trigger::Click => TriggerKey::Click,
        }
    }

    /// Variant name, for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Trigger::KeyPress { .. } => "KeyPress",
            Trigger::Tick { .. } => "Tick",
            Trigger::Collision { .. } => "Collision",
            Trigger::AttributeReached { .. } => "AttributeReached",
            Trigger::Click => "Click",
        }
    }
}

/// A live event raised by an event source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TriggerEvent {
    KeyPressed {
        key: KeyCode,
    },
    /// The scheduler advanced to tick `count` (starting at 1)
    Tick {
        count: u64,
    },
    /// `actor` touched `partner` with its `side`
    Collision {
        side: CollisionSide,
        actor: ActorId,
        partner: ActorId,
    },
    AttributeChanged {
        actor: ActorId,
        attribute: AttributeType,
        previous: i64,
        value: i64,
    },
    Clicked {
        x: f64,
        y: f64,
    },
}

impl TriggerEvent {
    /// The classification key used to look up candidate actors
    pub fn key(&self) -> TriggerKey {
        match self {
            TriggerEvent::KeyPressed { key } => TriggerKey::Key(*key),
            TriggerEvent::Tick { .. } => TriggerKey::Tick,
            TriggerEvent::Collision { side, partner, .. } => TriggerKey::Collision {
                side: *side,
                partner: *partner,
            },
            TriggerEvent::AttributeChanged { attribute, .. } => {
                TriggerKey::Attribute(attribute.clone())
            }
            TriggerEvent::Clicked { .. } => TriggerKey::Click,
        }
    }

    /// The other actor involved in a collision event
    pub fn partner(&self) -> Option<ActorId> {
        match self {
            TriggerEvent::Collision { partner, .. } => Some(*partner),
            _ => None,
        }
    }

    /// Whether this event satisfies the held trigger
    ///
    /// `owner` is the actor holding the trigger, or `None` for level rules.
    /// Collision events only match the actor that moved into contact, so a
    /// level rule never matches one.
    pub fn evaluate(&self, held: &Trigger, owner: Option<&Actor>) -> bool {
        match (self, held) {
            (TriggerEvent::KeyPressed { key }, Trigger::KeyPress { key: wanted }) => key == wanted,
            (TriggerEvent::Tick { count }, Trigger::Tick { interval }) => {
                *interval <= 1 || count % interval == 0
            }
            (
                TriggerEvent::Collision {
                    side,
                    actor,
                    partner,
                },
                Trigger::Collision {
                    side: wanted_side,
                    partner: wanted_partner,
                },
            ) => {
                owner.is_some_and(|owner| owner.id() == *actor)
                    && side == wanted_side
                    && partner == wanted_partner
            }
            (
                TriggerEvent::AttributeChanged {
                    actor,
                    attribute,
                    previous,
                    value,
                },
                Trigger::AttributeReached {
                    attribute: wanted,
                    value: threshold,
                },
            ) => {
                attribute == wanted
                    && owner.map_or(true, |owner| owner.id() == *actor)
                    && crosses(*previous, *value, *threshold)
            }
            (TriggerEvent::Clicked { x, y }, Trigger::Click) => {
                owner.map_or(true, |owner| owner.bounds().contains(*x, *y))
            }
            _ => false,
        }
    }
}

/// A change from `previous` to `value` reaches `threshold` from either side
fn crosses(previous: i64, value: i64, threshold: i64) -> bool {
    (previous < threshold && value >= threshold) || (previous > threshold && value <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match_between_trigger_and_event() {
        let wall = ActorId::new(9);
        let pairs = [
            (
                Trigger::key_press(KeyCode::Right),
                TriggerEvent::KeyPressed {
                    key: KeyCode::Right,
                },
            ),
            (Trigger::tick(3), TriggerEvent::Tick { count: 6 }),
            (
                Trigger::collision(CollisionSide::Side, wall),
                TriggerEvent::Collision {
                    side: CollisionSide::Side,
                    actor: ActorId::new(1),
                    partner: wall,
                },
            ),
            (
                Trigger::attribute_reached(AttributeType::Health, 0),
                TriggerEvent::AttributeChanged {
                    actor: ActorId::new(1),
                    attribute: AttributeType::Health,
                    previous: 1,
                    value: 0,
                },
            ),
            (Trigger::Click, TriggerEvent::Clicked { x: 1.0, y: 1.0 }),
        ];

        for (trigger, event) in pairs {
            assert_eq!(trigger.key(), event.key(), "{}", trigger.kind());
        }
    }

    #[test]
    fn test_key_press() {
        let event = TriggerEvent::KeyPressed {
            key: KeyCode::Right,
        };
        assert!(event.evaluate(&Trigger::key_press(KeyCode::Right), None));
        assert!(!event.evaluate(&Trigger::key_press(KeyCode::Left), None));
        assert!(!event.evaluate(&Trigger::Click, None));
    }

    #[test]
    fn test_tick_interval() {
        let every_third = Trigger::tick(3);
        assert!(!TriggerEvent::Tick { count: 1 }.evaluate(&every_third, None));
        assert!(TriggerEvent::Tick { count: 3 }.evaluate(&every_third, None));
        assert!(TriggerEvent::Tick { count: 75 }.evaluate(&every_third, None));
        assert!(TriggerEvent::Tick { count: 7 }.evaluate(&Trigger::tick(1), None));
    }

    #[test]
    fn test_collision_needs_matching_owner() {
        let mut ball = Actor::new("ball");
        ball.set_id(ActorId::new(1));
        let wall = ActorId::new(2);
        let event = TriggerEvent::Collision {
            side: CollisionSide::Side,
            actor: ActorId::new(1),
            partner: wall,
        };

        assert!(event.evaluate(&Trigger::collision(CollisionSide::Side, wall), Some(&ball)));
        assert!(!event.evaluate(&Trigger::collision(CollisionSide::Top, wall), Some(&ball)));
        assert!(!event.evaluate(&Trigger::collision(CollisionSide::Side, wall), None));

        let mut other = Actor::new("other");
        other.set_id(ActorId::new(3));
        assert!(!event.evaluate(&Trigger::collision(CollisionSide::Side, wall), Some(&other)));
    }

    #[test]
    fn test_attribute_crossing_both_directions() {
        let held = Trigger::attribute_reached(AttributeType::Points, 10);
        let change = |previous, value| TriggerEvent::AttributeChanged {
            actor: ActorId::new(1),
            attribute: AttributeType::Points,
            previous,
            value,
        };

        assert!(change(9, 10).evaluate(&held, None));
        assert!(change(5, 12).evaluate(&held, None));
        assert!(change(12, 10).evaluate(&held, None));
        assert!(!change(10, 11).evaluate(&held, None));
        assert!(!change(3, 4).evaluate(&held, None));
        assert!(!change(9, 10).evaluate(
            &Trigger::attribute_reached(AttributeType::Health, 10),
            None
        ));
    }

    #[test]
    fn test_click_inside_owner() {
        let actor = Actor::new("button").with_position(100.0, 100.0);
        let inside = TriggerEvent::Clicked { x: 120.0, y: 110.0 };
        let outside = TriggerEvent::Clicked { x: 10.0, y: 10.0 };

        assert!(inside.evaluate(&Trigger::Click, Some(&actor)));
        assert!(!outside.evaluate(&Trigger::Click, Some(&actor)));
        assert!(outside.evaluate(&Trigger::Click, None));
    }
}
