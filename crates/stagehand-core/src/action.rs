//! Actions: the behavior a rule performs when its trigger fires
//!
//! Actions that change the owning actor run against it directly. Actions
//! that reach outside the actor (spawning, destroying, level and game
//! transitions, sounds) are recorded in the [`Outcome`] and applied by the
//! level once the dispatch pass is over.

use crate::cloner::make_copy;
use crate::{
    Actor, ActorId, AttributeChange, AttributeType, Bounds, Error, GameRng, GameSignal, Outcome,
    PhysicsEngine, Result, Vec2,
};
use serde::{Deserialize, Serialize};

/// Where a spawned actor is placed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    Fixed {
        x: f64,
        y: f64,
    },
    /// Uniformly inside `[min, max)` on each axis
    Random {
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
    },
}

impl Placement {
    /// Pick the spawn position
    pub fn resolve(&self, rng: &mut GameRng) -> Vec2 {
        match *self {
            Placement::Fixed { x, y } => Vec2::new(x, y),
            Placement::Random {
                min_x,
                max_x,
                min_y,
                max_y,
            } => {
                let x = rng.range_f64(min_x, max_x);
                let y = rng.range_f64(min_y, max_y);
                Vec2::new(x, y)
            }
        }
    }

    /// Check that the placement describes a usable position or range
    pub fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            Placement::Fixed { x, y } => {
                if x.is_finite() && y.is_finite() {
                    Ok(())
                } else {
                    Err("fixed placement must be finite".to_string())
                }
            }
            Placement::Random {
                min_x,
                max_x,
                min_y,
                max_y,
            } => {
                if ![min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite()) {
                    Err("random placement must be finite".to_string())
                } else if min_x > max_x || min_y > max_y {
                    Err("random placement range is inverted".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Behavior performed when a rule fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    // === Physics movement ===
    MoveRight,
    MoveLeft,
    /// Jump
    MoveUp,
    MoveForward,
    MoveBackward,
    /// One gravity and friction step
    ApplyPhysics,

    // === Direct translation ===
    // Without an offset a glide covers the configured glide distance
    GlideRight {
        #[serde(default)]
        offset: Option<f64>,
    },
    GlideLeft {
        #[serde(default)]
        offset: Option<f64>,
    },
    GlideUp {
        #[serde(default)]
        offset: Option<f64>,
    },
    GlideDown {
        #[serde(default)]
        offset: Option<f64>,
    },
    GlideForward {
        #[serde(default)]
        offset: Option<f64>,
    },

    // === Heading ===
    /// Turn around (heading + 180)
    ReverseHeading,
    /// Mirror across the vertical axis (180 - heading)
    HorizontalHeadingSwitch,
    /// Mirror across the horizontal axis (-heading)
    VerticalHeadingSwitch,

    // === Attributes ===
    ChangeAttribute { attribute: AttributeType, delta: i64 },

    // === Actor set ===
    /// Spawn a copy of `template`
    CreateActor {
        template: Box<Actor>,
        placement: Placement,
    },
    /// Remove the owner from its level
    Destroy,

    // === Game flow ===
    NextLevel,
    WinGame,
    LoseGame,
    PlaySound { sound: String },
    /// Advance the owner's sprite cycle
    NextImage,

    // === Collision responses (need a collision partner) ===
    HorizontalStaticCollision,
    VerticalStaticCollision,
    HorizontalBounceCollision,
    VerticalBounceCollision,
}

/// Everything an action may touch besides its owner
pub struct ActionEnv<'a> {
    pub physics: &'a PhysicsEngine,
    /// Bounds of the other actor when dispatching a collision
    pub partner: Option<Bounds>,
    pub rng: &'a mut GameRng,
    pub outcome: &'a mut Outcome,
}

impl Action {
    pub fn glide_right(offset: f64) -> Self {
        Action::GlideRight {
            offset: Some(offset),
        }
    }

    pub fn glide_left(offset: f64) -> Self {
        Action::GlideLeft {
            offset: Some(offset),
        }
    }

    pub fn glide_up(offset: f64) -> Self {
        Action::GlideUp {
            offset: Some(offset),
        }
    }

    pub fn glide_down(offset: f64) -> Self {
        Action::GlideDown {
            offset: Some(offset),
        }
    }

    pub fn glide_forward(offset: f64) -> Self {
        Action::GlideForward {
            offset: Some(offset),
        }
    }

    pub fn change_attribute(attribute: AttributeType, delta: i64) -> Self {
        Action::ChangeAttribute { attribute, delta }
    }

    pub fn create_actor(template: Actor, placement: Placement) -> Self {
        Action::CreateActor {
            template: Box::new(template),
            placement,
        }
    }

    pub fn play_sound(sound: impl Into<String>) -> Self {
        Action::PlaySound {
            sound: sound.into(),
        }
    }

    /// Variant name, for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Action::MoveRight => "MoveRight",
            Action::MoveLeft => "MoveLeft",
            Action::MoveUp => "MoveUp",
            Action::MoveForward => "MoveForward",
            Action::MoveBackward => "MoveBackward",
            Action::ApplyPhysics => "ApplyPhysics",
            Action::GlideRight { .. } => "GlideRight",
            Action::GlideLeft { .. } => "GlideLeft",
            Action::GlideUp { .. } => "GlideUp",
            Action::GlideDown { .. } => "GlideDown",
            Action::GlideForward { .. } => "GlideForward",
            Action::ReverseHeading => "ReverseHeading",
            Action::HorizontalHeadingSwitch => "HorizontalHeadingSwitch",
            Action::VerticalHeadingSwitch => "VerticalHeadingSwitch",
            Action::ChangeAttribute { .. } => "ChangeAttribute",
            Action::CreateActor { .. } => "CreateActor",
            Action::Destroy => "Destroy",
            Action::NextLevel => "NextLevel",
            Action::WinGame => "WinGame",
            Action::LoseGame => "LoseGame",
            Action::PlaySound { .. } => "PlaySound",
            Action::NextImage => "NextImage",
            Action::HorizontalStaticCollision => "HorizontalStaticCollision",
            Action::VerticalStaticCollision => "VerticalStaticCollision",
            Action::HorizontalBounceCollision => "HorizontalBounceCollision",
            Action::VerticalBounceCollision => "VerticalBounceCollision",
        }
    }

    /// Whether the action can run from a level rule with no owning actor
    pub fn is_level_action(&self) -> bool {
        matches!(
            self,
            Action::CreateActor { .. }
                | Action::NextLevel
                | Action::WinGame
                | Action::LoseGame
                | Action::PlaySound { .. }
        )
    }

    /// Run the action
    ///
    /// `owner` is the actor whose rule fired, `None` for level rules.
    pub fn perform(&self, owner: Option<&mut Actor>, env: &mut ActionEnv<'_>) -> Result<()> {
        match self {
            Action::NextLevel => env.outcome.signals.push(GameSignal::NextLevel),
            Action::WinGame => env.outcome.signals.push(GameSignal::WinGame),
            Action::LoseGame => env.outcome.signals.push(GameSignal::LoseGame),
            Action::PlaySound { sound } => env.outcome.sounds.push(sound.clone()),
            Action::CreateActor {
                template,
                placement,
            } => {
                let mut spawned = make_copy(template);
                spawned.set_id(ActorId::UNASSIGNED);
                spawned.position = placement.resolve(env.rng);
                env.outcome.spawned.push(spawned);
            }
            _ => {
                let actor = owner.ok_or_else(|| Error::RuleRequiresActor {
                    action: self.kind().to_string(),
                })?;
                self.perform_on(actor, env)?;
            }
        }
        Ok(())
    }

    fn perform_on(&self, actor: &mut Actor, env: &mut ActionEnv<'_>) -> Result<()> {
        let physics = env.physics;
        match self {
            Action::MoveRight => physics.move_right(actor),
            Action::MoveLeft => physics.move_left(actor),
            Action::MoveUp => physics.jump(actor),
            Action::MoveForward => physics.move_forward(actor),
            Action::MoveBackward => physics.move_backward(actor),
            Action::ApplyPhysics => physics.tick(actor),
            Action::GlideRight { offset } => {
                actor.set_heading(0.0);
                physics.glide_right(actor, physics.glide_distance(*offset));
            }
            Action::GlideLeft { offset } => {
                actor.set_heading(180.0);
                physics.glide_left(actor, physics.glide_distance(*offset));
            }
            Action::GlideUp { offset } => {
                actor.set_heading(90.0);
                physics.glide_up(actor, physics.glide_distance(*offset));
            }
            Action::GlideDown { offset } => {
                actor.set_heading(270.0);
                physics.glide_down(actor, physics.glide_distance(*offset));
            }
            Action::GlideForward { offset } => {
                physics.glide_forward(actor, physics.glide_distance(*offset));
            }
            Action::ReverseHeading => actor.set_heading(actor.heading() + 180.0),
            Action::HorizontalHeadingSwitch => actor.set_heading(180.0 - actor.heading()),
            Action::VerticalHeadingSwitch => actor.set_heading(-actor.heading()),
            Action::ChangeAttribute { attribute, delta } => {
                let previous = actor.attribute(attribute).unwrap_or(0);
                let value = previous.saturating_add(*delta);
                actor.set_attribute(attribute.clone(), value);
                env.outcome.attribute_changes.push(AttributeChange {
                    actor: actor.id(),
                    attribute: attribute.clone(),
                    previous,
                    value,
                });
            }
            Action::Destroy => env.outcome.destroyed.push(actor.id()),
            Action::NextImage => actor.next_sprite(),
            Action::HorizontalStaticCollision => {
                physics.static_horizontal_collision(actor, &self.partner(env)?);
            }
            Action::VerticalStaticCollision => {
                physics.static_vertical_collision(actor, &self.partner(env)?);
            }
            Action::HorizontalBounceCollision => {
                physics.elastic_horizontal_collision(actor, &self.partner(env)?);
            }
            Action::VerticalBounceCollision => {
                physics.elastic_vertical_collision(actor, &self.partner(env)?);
            }
            // Level actions are handled in `perform`
            Action::NextLevel
            | Action::WinGame
            | Action::LoseGame
            | Action::PlaySound { .. }
            | Action::CreateActor { .. } => {}
        }
        Ok(())
    }

    fn partner(&self, env: &ActionEnv<'_>) -> Result<Bounds> {
        env.partner.ok_or_else(|| Error::MissingPartner {
            action: self.kind().to_string(),
        })
    }
}
