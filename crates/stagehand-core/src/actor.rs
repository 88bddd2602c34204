//! Actors: the things a level simulates
//!
//! An actor carries its kinematic state, bounding geometry, attributes, role
//! tags and the rule book that drives it. Levels own actors and assign
//! their ids.

use crate::physics::DEFAULT_FRICTION;
use crate::{
    Action, ActionEnv, ActorId, ActorState, Attribute, AttributeType, Bounds, Extent, Result,
    Rule, RuleBook, RuleId, Trigger, TriggerEvent, Vec2,
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A simulated actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    id: ActorId,
    /// Library reference this actor was placed from
    origin: Option<ActorId>,
    pub name: String,
    /// Top-left corner
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees in `[0, 360)`, 0 pointing right and 90 pointing up
    heading: f64,
    /// Unscaled image size
    pub extent: Extent,
    pub friction: f64,
    /// Scale applied to `extent`
    pub size: f64,
    pub in_air: bool,
    sprites: Vec<String>,
    sprite_index: usize,
    attributes: IndexMap<AttributeType, i64>,
    states: IndexSet<ActorState>,
    rules: RuleBook,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            id: ActorId::UNASSIGNED,
            origin: None,
            name: String::new(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            heading: 0.0,
            extent: Extent::default(),
            friction: DEFAULT_FRICTION,
            size: 1.0,
            in_air: true,
            sprites: Vec::new(),
            sprite_index: 0,
            attributes: IndexMap::new(),
            states: IndexSet::new(),
            rules: RuleBook::new(),
        }
    }
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    // === Builders ===

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_extent(mut self, width: f64, height: f64) -> Self {
        self.extent = Extent::new(width, height);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.set_heading(heading);
        self
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprites.push(sprite.into());
        self
    }

    pub fn with_state(mut self, state: ActorState) -> Self {
        self.states.insert(state);
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeType, value: i64) -> Self {
        self.attributes.insert(attribute, value);
        self
    }

    pub fn with_rule(mut self, trigger: Trigger, action: Action) -> Self {
        self.add_rule(trigger, action);
        self
    }

    // === Identity and geometry ===

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ActorId) {
        self.id = id;
    }

    /// The library reference this actor is a placed copy of, if any
    pub fn origin(&self) -> Option<ActorId> {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: Option<ActorId>) {
        self.origin = origin;
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Set the heading, normalized into `[0, 360)`
    pub fn set_heading(&mut self, degrees: f64) {
        let heading = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        self.heading = if heading >= 360.0 { 0.0 } else { heading };
    }

    /// Bounding box at the current position, scaled by `size`
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.position.x,
            self.position.y,
            self.extent.width * self.size,
            self.extent.height * self.size,
        )
    }

    // === Sprites ===

    pub fn sprites(&self) -> &[String] {
        &self.sprites
    }

    pub fn set_sprites(&mut self, sprites: Vec<String>) {
        self.sprites = sprites;
        self.sprite_index = 0;
    }

    /// The sprite currently shown
    pub fn sprite(&self) -> Option<&str> {
        self.sprites.get(self.sprite_index).map(String::as_str)
    }

    /// Cycle to the next sprite
    pub fn next_sprite(&mut self) {
        if !self.sprites.is_empty() {
            self.sprite_index = (self.sprite_index + 1) % self.sprites.len();
        }
    }

    // === Attributes and states ===

    pub fn attribute(&self, attribute: &AttributeType) -> Option<i64> {
        self.attributes.get(attribute).copied()
    }

    pub fn set_attribute(&mut self, attribute: AttributeType, value: i64) {
        self.attributes.insert(attribute, value);
    }

    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.attributes.iter().map(|(kind, value)| Attribute {
            owner: self.id,
            kind: kind.clone(),
            value: *value,
        })
    }

    pub(crate) fn attribute_map(&self) -> &IndexMap<AttributeType, i64> {
        &self.attributes
    }

    pub(crate) fn set_attribute_map(&mut self, attributes: IndexMap<AttributeType, i64>) {
        self.attributes = attributes;
    }

    pub fn states(&self) -> impl Iterator<Item = ActorState> + '_ {
        self.states.iter().copied()
    }

    pub fn has_state(&self, state: ActorState) -> bool {
        self.states.contains(&state)
    }

    pub fn add_state(&mut self, state: ActorState) {
        self.states.insert(state);
    }

    pub fn remove_state(&mut self, state: ActorState) {
        self.states.shift_remove(&state);
    }

    pub(crate) fn set_states(&mut self, states: IndexSet<ActorState>) {
        self.states = states;
    }

    /// Whether this is a main playable actor
    pub fn is_main(&self) -> bool {
        self.has_state(ActorState::Main)
    }

    // === Rules ===

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Add a rule to an actor that no level owns yet
    ///
    /// Once the actor is in a level, go through `Level::add_actor_rule` so
    /// the level's trigger index stays in step.
    pub fn add_rule(&mut self, trigger: Trigger, action: Action) -> RuleId {
        self.rules.add(Rule::new(trigger, action))
    }

    pub(crate) fn clear_rules(&mut self) {
        self.rules.clear();
    }

    /// Run every action whose trigger matches `event`, in rule order
    ///
    /// Stops at the first failing action and returns its error; actions
    /// before it keep their effect. Returns the number of actions run.
    pub fn perform_actions_for(
        &mut self,
        event: &TriggerEvent,
        env: &mut ActionEnv<'_>,
    ) -> Result<usize> {
        let key = event.key();
        let this: &Actor = self;
        let matched: Vec<Action> = this
            .rules
            .rules_for(&key)
            .iter()
            .filter(|rule| event.evaluate(rule.trigger(), Some(this)))
            .map(|rule| rule.action().clone())
            .collect();

        for action in &matched {
            action.perform(Some(&mut *self), env)?;
        }
        Ok(matched.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameRng, KeyCode, Outcome, PhysicsEngine};

    #[test]
    fn test_defaults() {
        let actor = Actor::new("hero");
        assert_eq!(actor.name, "hero");
        assert!(!actor.id().is_assigned());
        assert_eq!(actor.friction, DEFAULT_FRICTION);
        assert_eq!(actor.size, 1.0);
        assert!(actor.in_air);
        assert_eq!(actor.bounds(), Bounds::new(0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_bounds_scale_with_size() {
        let mut actor = Actor::new("big").with_position(10.0, 20.0).with_extent(40.0, 30.0);
        actor.size = 2.0;
        assert_eq!(actor.bounds(), Bounds::new(10.0, 20.0, 80.0, 60.0));
    }

    #[test]
    fn test_heading_normalized() {
        let mut actor = Actor::new("a");
        actor.set_heading(-90.0);
        assert_eq!(actor.heading(), 270.0);
        actor.set_heading(720.0);
        assert_eq!(actor.heading(), 0.0);
        actor.set_heading(-1e-20);
        assert!(actor.heading() < 360.0);
    }

    #[test]
    fn test_sprite_cycle() {
        let mut actor = Actor::new("a").with_sprite("a.png").with_sprite("b.png");
        assert_eq!(actor.sprite(), Some("a.png"));
        actor.next_sprite();
        assert_eq!(actor.sprite(), Some("b.png"));
        actor.next_sprite();
        assert_eq!(actor.sprite(), Some("a.png"));

        let mut bare = Actor::new("b");
        bare.next_sprite();
        assert_eq!(bare.sprite(), None);
    }

    #[test]
    fn test_attributes_and_states() {
        let mut actor = Actor::new("hero")
            .with_attribute(AttributeType::Health, 3)
            .with_state(ActorState::Main);
        actor.set_id(ActorId::new(2));

        assert!(actor.is_main());
        actor.remove_state(ActorState::Main);
        assert!(!actor.is_main());

        let attributes: Vec<Attribute> = actor.attributes().collect();
        assert_eq!(
            attributes,
            vec![Attribute {
                owner: ActorId::new(2),
                kind: AttributeType::Health,
                value: 3,
            }]
        );
    }

    #[test]
    fn test_perform_actions_in_rule_order() {
        let physics = PhysicsEngine::default();
        let mut rng = GameRng::default();
        let mut outcome = Outcome::default();
        let mut actor = Actor::new("ball")
            .with_rule(Trigger::key_press(KeyCode::Space), Action::glide_right(10.0))
            .with_rule(Trigger::key_press(KeyCode::Space), Action::ReverseHeading)
            .with_rule(Trigger::key_press(KeyCode::Left), Action::Destroy);

        let mut env = ActionEnv {
            physics: &physics,
            partner: None,
            rng: &mut rng,
            outcome: &mut outcome,
        };
        let ran = actor
            .perform_actions_for(
                &TriggerEvent::KeyPressed {
                    key: KeyCode::Space,
                },
                &mut env,
            )
            .unwrap();

        assert_eq!(ran, 2);
        assert_eq!(actor.position.x, 10.0);
        // glide right points at 0, then the reverse turns around
        assert_eq!(actor.heading(), 180.0);
        assert!(outcome.destroyed.is_empty());
    }

    #[test]
    fn test_perform_stops_at_first_error() {
        let physics = PhysicsEngine::default();
        let mut rng = GameRng::default();
        let mut outcome = Outcome::default();
        let mut actor = Actor::new("box")
            .with_rule(Trigger::tick(1), Action::glide_down(1.0))
            .with_rule(Trigger::tick(1), Action::VerticalStaticCollision)
            .with_rule(Trigger::tick(1), Action::glide_down(1.0));
        actor.velocity.y = 1.0;

        let mut env = ActionEnv {
            physics: &physics,
            partner: None,
            rng: &mut rng,
            outcome: &mut outcome,
        };
        let result = actor.perform_actions_for(&TriggerEvent::Tick { count: 1 }, &mut env);

        assert!(result.is_err());
        assert_eq!(actor.position.y, 1.0);
    }

    #[test]
    fn test_ron_round_trip() {
        let actor = Actor::new("hero")
            .with_position(5.0, 6.0)
            .with_sprite("hero.png")
            .with_attribute(AttributeType::custom("Ammo"), 12)
            .with_state(ActorState::Main)
            .with_rule(Trigger::key_press(KeyCode::Up), Action::MoveUp);

        let text = ron::to_string(&actor).unwrap();
        let restored: Actor = ron::from_str(&text).unwrap();
        assert_eq!(restored, actor);
    }
}
