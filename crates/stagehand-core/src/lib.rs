//! Stagehand Core - Rule-driven actor simulation engine
//!
//! This crate provides the engine behind a 2D authoring tool's games:
//! - Actors with kinematic state, attributes, role tags and rule books
//! - Triggers (held conditions) and trigger events (live occurrences)
//! - Actions performed when a rule's trigger fires
//! - Levels that index actors by trigger key and dispatch events to them
//! - A physics integrator for movement, gravity, friction and collisions
//! - An actor cloner that rebuilds an actor's whole rule graph on a copy
//!
//! ## Driving a game
//!
//! Event sources call [`Level::handle_trigger`] directly, or go through
//! [`Game`], which raises tick and collision events, forwards input, and
//! turns requested transitions into level changes and win/lose status.
//!
//! ```
//! use stagehand_core::{Action, Actor, Game, KeyCode, Level, Trigger};
//!
//! let mut level = Level::new("first");
//! let hero = level.add_actor(
//!     Actor::new("hero").with_rule(Trigger::key_press(KeyCode::Right), Action::MoveRight),
//! );
//!
//! let mut game = Game::new("demo");
//! game.add_level(level);
//! game.key_pressed(KeyCode::Right);
//!
//! let hero = game.current_level().and_then(|level| level.actor(hero)).unwrap();
//! assert!(hero.position.x > 0.0);
//! ```

mod action;
mod actor;
mod attribute;
pub mod authoring;
pub mod cloner;
mod config;
mod contact;
mod error;
mod game;
mod geometry;
mod identity;
pub mod level;
mod outcome;
pub mod physics;
mod rng;
mod rule;
mod trigger;

pub use action::{Action, ActionEnv, Placement};
pub use actor::Actor;
pub use attribute::{ActorState, Attribute, AttributeType};
pub use authoring::{reorder_levels, validate_play_order, ActorLibrary, PlacedCopy};
pub use cloner::{copy_actor, make_copy, ActorCopier, CloneReport, SkippedRule};
pub use config::{EngineConfig, MAX_CASCADE_DEPTH};
pub use contact::ContactTracker;
pub use error::{Error, Result};
pub use game::{Game, GameEvent, GameInfo, GameListener, GameStatus};
pub use geometry::{Bounds, Extent, Vec2};
pub use identity::{ActorId, RuleId};
pub use level::{Level, ScrollingDirection};
pub use outcome::{AttributeChange, DispatchFailure, DispatchReport, GameSignal, Outcome};
pub use physics::{PhysicsConfig, PhysicsEngine};
pub use rng::GameRng;
pub use rule::{Rule, RuleBook};
pub use trigger::{CollisionSide, KeyCode, Trigger, TriggerEvent, TriggerKey};
