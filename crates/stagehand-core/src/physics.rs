//! Physics integrator
//!
//! A stateless engine that advances an actor's velocity and position from a
//! requested force and resolves axis-aligned collisions. All constants come
//! from an immutable [`PhysicsConfig`]; the only per-actor input is the
//! actor's friction coefficient and its airborne flag.
//!
//! Screen coordinates are used throughout: a negative vertical force pushes
//! an actor up, gravity is positive.

use crate::{Actor, Bounds};
use serde::{Deserialize, Serialize};

/// Default friction coefficient for new actors (negative, so it decays velocity)
pub const DEFAULT_FRICTION: f64 = -0.05;

/// Constants the integrator runs with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Integration step applied to every force and velocity
    pub time_step: f64,
    /// Friction used by the free `tick` step; forced moves use the actor's own
    pub friction: f64,
    /// Downward force applied while an actor is airborne
    pub gravity: f64,
    pub max_horizontal_velocity: f64,
    pub max_vertical_velocity: f64,
    /// Force supplied by `move_right` / `move_left` / `move_forward`
    pub horizontal_force: f64,
    /// Upward force supplied by `jump` (negative in screen coordinates)
    pub jump_force: f64,
    /// Distance covered by a glide that does not give its own offset
    pub glide_offset: f64,
    /// Speed imparted by an elastic horizontal collision
    pub horizontal_rebound: f64,
    /// Speed imparted by an elastic vertical collision
    pub vertical_rebound: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0,
            friction: DEFAULT_FRICTION,
            gravity: 0.11,
            max_horizontal_velocity: 50.0,
            max_vertical_velocity: 50.0,
            horizontal_force: 5.0,
            jump_force: -5.0,
            glide_offset: 5.0,
            horizontal_rebound: 3.0,
            vertical_rebound: 5.0,
        }
    }
}

/// The physics integrator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicsEngine {
    config: PhysicsConfig,
}

impl PhysicsEngine {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance one step under the requested force, damped by the actor's friction
    ///
    /// While the actor is airborne the downward component is replaced by
    /// gravity. Both velocities are clamped by magnitude before the
    /// positions move, and the four scalars are written back together.
    pub fn update(&self, actor: &mut Actor, force_x: f64, force_y_up: f64, force_y_down: f64) {
        let friction = actor.friction;
        self.step(actor, force_x, force_y_up, force_y_down, friction);
    }

    fn step(
        &self,
        actor: &mut Actor,
        force_x: f64,
        force_y_up: f64,
        force_y_down: f64,
        friction: f64,
    ) {
        let dt = self.config.time_step;
        let force_y_down = if actor.in_air {
            self.config.gravity
        } else {
            force_y_down
        };

        let mut vy = apply_force(actor.velocity.y, force_y_up, dt);
        vy = apply_force(vy, force_y_down, dt);
        vy = clamp_velocity(vy, self.config.max_vertical_velocity);
        let y = actor.position.y + vy * dt;

        let mut vx = apply_force(actor.velocity.x, force_x, dt);
        vx = apply_force(vx, friction * vx, dt);
        vx = clamp_velocity(vx, self.config.max_horizontal_velocity);
        let x = actor.position.x + vx * dt;

        actor.velocity.x = vx;
        actor.velocity.y = vy;
        actor.position.x = x;
        actor.position.y = y;
    }

    pub fn move_right(&self, actor: &mut Actor) {
        self.update(actor, self.config.horizontal_force, 0.0, 0.0);
    }

    pub fn move_left(&self, actor: &mut Actor) {
        self.update(actor, -self.config.horizontal_force, 0.0, 0.0);
    }

    /// Push the actor upwards and mark it airborne
    pub fn jump(&self, actor: &mut Actor) {
        actor.in_air = true;
        self.update(actor, 0.0, self.config.jump_force, self.config.gravity);
    }

    /// Push the actor along its heading
    pub fn move_forward(&self, actor: &mut Actor) {
        let (fx, fy) = along_heading(actor.heading(), self.config.horizontal_force);
        self.update(actor, fx, fy, 0.0);
    }

    /// Push the actor against its heading
    pub fn move_backward(&self, actor: &mut Actor) {
        let (fx, fy) = along_heading(actor.heading(), -self.config.horizontal_force);
        self.update(actor, fx, fy, 0.0);
    }

    /// One step with no external force: gravity and the engine's friction
    pub fn tick(&self, actor: &mut Actor) {
        self.step(actor, 0.0, 0.0, self.config.gravity, self.config.friction);
    }

    /// The glide distance for a requested offset, falling back to the config
    pub fn glide_distance(&self, offset: Option<f64>) -> f64 {
        offset.unwrap_or(self.config.glide_offset)
    }

    pub fn glide_right(&self, actor: &mut Actor, offset: f64) {
        actor.position.x += offset;
    }

    pub fn glide_left(&self, actor: &mut Actor, offset: f64) {
        actor.position.x -= offset;
    }

    pub fn glide_up(&self, actor: &mut Actor, offset: f64) {
        actor.position.y -= offset;
    }

    pub fn glide_down(&self, actor: &mut Actor, offset: f64) {
        actor.position.y += offset;
    }

    /// Translate along the heading without touching velocity
    pub fn glide_forward(&self, actor: &mut Actor, offset: f64) {
        let (dx, dy) = along_heading(actor.heading(), offset);
        actor.position.x += dx;
        actor.position.y += dy;
    }

    /// Stop a horizontally moving actor at the near edge of `obstacle`
    ///
    /// Does nothing unless the mover has horizontal velocity. The edge is
    /// picked by position only: a mover left of the obstacle is placed
    /// against its left edge, otherwise against its right edge. Returns
    /// whether the mover was resolved.
    pub fn static_horizontal_collision(&self, mover: &mut Actor, obstacle: &Bounds) -> bool {
        if mover.velocity.x == 0.0 {
            return false;
        }
        let bounds = mover.bounds();
        if bounds.x < obstacle.x {
            mover.position.x = obstacle.min_x() - bounds.width;
        } else {
            mover.position.x = obstacle.max_x();
        }
        mover.velocity.x = 0.0;
        true
    }

    /// Stop a vertically moving actor at the near edge of `obstacle`
    ///
    /// A mover at or above the obstacle lands on its top edge and is no
    /// longer airborne; otherwise it is placed under the bottom edge.
    pub fn static_vertical_collision(&self, mover: &mut Actor, obstacle: &Bounds) -> bool {
        if mover.velocity.y == 0.0 {
            return false;
        }
        let bounds = mover.bounds();
        if bounds.y <= obstacle.y {
            mover.position.y = obstacle.min_y() - bounds.height;
            mover.in_air = false;
        } else {
            mover.position.y = obstacle.max_y();
        }
        mover.velocity.y = 0.0;
        true
    }

    /// Static resolution followed by a fixed rebound against the prior direction
    pub fn elastic_horizontal_collision(&self, mover: &mut Actor, obstacle: &Bounds) -> bool {
        let prior = mover.velocity.x;
        if !self.static_horizontal_collision(mover, obstacle) {
            return false;
        }
        mover.velocity.x = -prior.signum() * self.config.horizontal_rebound;
        true
    }

    /// Static resolution followed by a fixed rebound against the prior direction
    ///
    /// The mover is airborne again after bouncing.
    pub fn elastic_vertical_collision(&self, mover: &mut Actor, obstacle: &Bounds) -> bool {
        let prior = mover.velocity.y;
        if !self.static_vertical_collision(mover, obstacle) {
            return false;
        }
        mover.velocity.y = -prior.signum() * self.config.vertical_rebound;
        mover.in_air = true;
        true
    }
}

/// New velocity after applying `force` for one step
pub fn apply_force(velocity: f64, force: f64, time_step: f64) -> f64 {
    velocity + force * time_step
}

/// Limit a velocity to `limit` in magnitude, keeping its sign
pub fn clamp_velocity(velocity: f64, limit: f64) -> f64 {
    if velocity.abs() > limit.abs() {
        limit.abs().copysign(velocity)
    } else {
        velocity
    }
}

/// Split a magnitude along a heading in degrees (0 = right, 90 = up)
fn along_heading(heading: f64, magnitude: f64) -> (f64, f64) {
    let radians = heading.to_radians();
    (magnitude * radians.cos(), -magnitude * radians.sin())
}
