//! Actor cloner
//!
//! Rebuilds an actor's whole rule graph onto another actor. Each rule is
//! reconstructed from its trigger and action parameters, so the copy owns
//! independent rules that behave like the source's but act on the copy.
//!
//! Used for runtime spawning (`Action::CreateActor`) and for keeping placed
//! copies of a reference actor in sync with it.

use crate::{Action, Actor, ActorId, AttributeType, Error, Result, Rule, RuleId, Trigger};
use tracing::warn;

/// A rule that could not be rebuilt
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRule {
    /// Id of the rule in the source actor
    pub rule: RuleId,
    pub error: Error,
}

/// What a call to [`copy_actor`] copied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloneReport {
    pub copied: usize,
    pub skipped: Vec<SkippedRule>,
}

impl CloneReport {
    /// True if every rule was rebuilt
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Copy `source` onto `target`
///
/// Scalar fields (name, friction, sprites, extent, size, id, heading,
/// states, attributes) are always copied. The target's rules are replaced
/// by rebuilt copies of the source's rules, with ids taken from the
/// target's own sequence. A rule with missing or invalid parameters is
/// skipped and reported; the rest are still copied. Position, velocity, the
/// airborne flag and the library origin stay as they were on the target.
pub fn copy_actor(target: &mut Actor, source: &Actor) -> CloneReport {
    target.name = source.name.clone();
    target.friction = source.friction;
    target.set_sprites(source.sprites().to_vec());
    target.extent = source.extent;
    target.size = source.size;
    target.set_id(source.id());
    target.set_heading(source.heading());
    target.set_states(source.states().collect());
    target.set_attribute_map(source.attribute_map().clone());

    target.clear_rules();
    let mut report = CloneReport::default();
    for rule in source.rules().iter() {
        match rebuild_rule(rule, source.id()) {
            Ok((trigger, action)) => {
                target.add_rule(trigger, action);
                report.copied += 1;
            }
            Err(error) => {
                warn!(
                    actor = %source.id(),
                    rule = %rule.id(),
                    %error,
                    "skipping rule while copying actor"
                );
                report.skipped.push(SkippedRule {
                    rule: rule.id(),
                    error,
                });
            }
        }
    }
    report
}

/// Build a new actor from `reference`
pub fn make_copy(reference: &Actor) -> Actor {
    let mut copy = Actor::default();
    copy_actor(&mut copy, reference);
    copy
}

/// Copies a designated reference actor
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorCopier<'a> {
    reference: Option<&'a Actor>,
}

impl<'a> ActorCopier<'a> {
    pub fn new(reference: &'a Actor) -> Self {
        Self {
            reference: Some(reference),
        }
    }

    pub fn reference(&self) -> Option<&'a Actor> {
        self.reference
    }

    pub fn set_reference(&mut self, reference: &'a Actor) {
        self.reference = Some(reference);
    }

    /// A brand-new copy of the reference
    pub fn make_copy(&self) -> Result<Actor> {
        self.reference.map(make_copy).ok_or(Error::NoReference)
    }

    /// Copy the reference onto an existing actor
    pub fn copy_onto(&self, target: &mut Actor) -> Result<CloneReport> {
        let reference = self.reference.ok_or(Error::NoReference)?;
        Ok(copy_actor(target, reference))
    }
}

fn rebuild_rule(rule: &Rule, source: ActorId) -> Result<(Trigger, Action)> {
    let trigger = rebuild_trigger(rule.trigger(), rule.id(), source)?;
    let action = rebuild_action(rule.action(), rule.id())?;
    Ok((trigger, action))
}

fn rebuild_trigger(trigger: &Trigger, rule: RuleId, source: ActorId) -> Result<Trigger> {
    match trigger {
        Trigger::KeyPress { key } => Ok(Trigger::KeyPress { key: *key }),
        Trigger::Tick { interval } => {
            if *interval == 0 {
                return Err(invalid(rule, "tick interval must be at least 1"));
            }
            Ok(Trigger::Tick {
                interval: *interval,
            })
        }
        Trigger::Collision { side, partner } => {
            if !partner.is_assigned() {
                return Err(invalid(rule, "collision partner is not set"));
            }
            if source.is_assigned() && *partner == source {
                return Err(invalid(rule, "collision partner is the actor itself"));
            }
            Ok(Trigger::Collision {
                side: *side,
                partner: *partner,
            })
        }
        Trigger::AttributeReached { attribute, value } => {
            check_attribute(attribute, rule)?;
            Ok(Trigger::AttributeReached {
                attribute: attribute.clone(),
                value: *value,
            })
        }
        Trigger::Click => Ok(Trigger::Click),
    }
}

fn rebuild_action(action: &Action, rule: RuleId) -> Result<Action> {
    let rebuilt = match action {
        Action::MoveRight => Action::MoveRight,
        Action::MoveLeft => Action::MoveLeft,
        Action::MoveUp => Action::MoveUp,
        Action::MoveForward => Action::MoveForward,
        Action::MoveBackward => Action::MoveBackward,
        Action::ApplyPhysics => Action::ApplyPhysics,
        Action::GlideRight { offset } => Action::GlideRight {
            offset: check_offset(*offset, rule)?,
        },
        Action::GlideLeft { offset } => Action::GlideLeft {
            offset: check_offset(*offset, rule)?,
        },
        Action::GlideUp { offset } => Action::GlideUp {
            offset: check_offset(*offset, rule)?,
        },
        Action::GlideDown { offset } => Action::GlideDown {
            offset: check_offset(*offset, rule)?,
        },
        Action::GlideForward { offset } => Action::GlideForward {
            offset: check_offset(*offset, rule)?,
        },
        Action::ReverseHeading => Action::ReverseHeading,
        Action::HorizontalHeadingSwitch => Action::HorizontalHeadingSwitch,
        Action::VerticalHeadingSwitch => Action::VerticalHeadingSwitch,
        Action::ChangeAttribute { attribute, delta } => {
            check_attribute(attribute, rule)?;
            Action::ChangeAttribute {
                attribute: attribute.clone(),
                delta: *delta,
            }
        }
        Action::CreateActor {
            template,
            placement,
        } => {
            placement
                .validate()
                .map_err(|reason| Error::InvalidRule { rule, reason })?;
            let mut spawned = Actor::default();
            if !copy_actor(&mut spawned, template).is_complete() {
                return Err(invalid(rule, "spawn template has invalid rules"));
            }
            Action::CreateActor {
                template: Box::new(spawned),
                placement: *placement,
            }
        }
        Action::Destroy => Action::Destroy,
        Action::NextLevel => Action::NextLevel,
        Action::WinGame => Action::WinGame,
        Action::LoseGame => Action::LoseGame,
        Action::PlaySound { sound } => {
            if sound.trim().is_empty() {
                return Err(invalid(rule, "sound name is empty"));
            }
            Action::PlaySound {
                sound: sound.clone(),
            }
        }
        Action::NextImage => Action::NextImage,
        Action::HorizontalStaticCollision => Action::HorizontalStaticCollision,
        Action::VerticalStaticCollision => Action::VerticalStaticCollision,
        Action::HorizontalBounceCollision => Action::HorizontalBounceCollision,
        Action::VerticalBounceCollision => Action::VerticalBounceCollision,
    };
    Ok(rebuilt)
}

fn check_attribute(attribute: &AttributeType, rule: RuleId) -> Result<()> {
    match attribute {
        AttributeType::Custom(name) if name.trim().is_empty() => {
            Err(invalid(rule, "custom attribute has no name"))
        }
        _ => Ok(()),
    }
}

fn check_offset(offset: Option<f64>, rule: RuleId) -> Result<Option<f64>> {
    match offset {
        Some(value) if !value.is_finite() => Err(invalid(rule, "glide offset must be finite")),
        _ => Ok(offset),
    }
}

fn invalid(rule: RuleId, reason: &str) -> Error {
    Error::InvalidRule {
        rule,
        reason: reason.to_string(),
    }
}
