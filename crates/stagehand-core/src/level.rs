//! Levels: actor ownership, the trigger index and event dispatch
//!
//! A level owns its actors and keeps a derived index from trigger key to the
//! actors holding a rule under that key. `handle_trigger` is the single
//! entry point event sources use to drive the simulation.
//!
//! ## Dispatch
//!
//! 1. Look up the actors indexed under the event's key (insertion order).
//! 2. Each actor runs its matching actions; a failing actor is logged and
//!    reported, and the remaining actors still run.
//! 3. The level's own rules run for the same event.
//! 4. Destroys, then spawns, are applied once the pass is over.
//! 5. Attribute changes raise `AttributeChanged` events that are dispatched
//!    the same way, up to the cascade limit.

use crate::{
    Action, ActionEnv, Actor, ActorId, ActorState, DispatchFailure, DispatchReport, Error,
    GameRng, Outcome, PhysicsEngine, Result, Rule, RuleBook, RuleId, Trigger, TriggerEvent,
    TriggerKey,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Default limit on chained attribute-change dispatches
pub const DEFAULT_CASCADE_LIMIT: usize = 8;

/// Direction the level view scrolls in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollingDirection {
    Horizontal,
    #[default]
    Vertical,
}

/// A level of the game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "LevelRecord", into = "LevelRecord")]
pub struct Level {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub scrolling: ScrollingDirection,
    /// How the level ends, as shown to the player
    pub termination: String,
    pub winning_condition: String,
    pub losing_condition: String,
    pub soundtrack: Option<String>,
    pub hud_options: Vec<String>,
    /// Position in the game's play order
    pub play_position: usize,
    actors: IndexMap<ActorId, Actor>,
    rules: RuleBook,
    trigger_index: IndexMap<TriggerKey, Vec<ActorId>>,
    next_actor_id: u64,
    rng: GameRng,
    cascade_limit: usize,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            width: 1024.0,
            height: 800.0,
            background: "default_landscape.png".to_string(),
            scrolling: ScrollingDirection::default(),
            termination: "Infinite".to_string(),
            winning_condition: "Survival time".to_string(),
            losing_condition: "Player dies".to_string(),
            soundtrack: None,
            hud_options: Vec::new(),
            play_position: 0,
            actors: IndexMap::new(),
            rules: RuleBook::new(),
            trigger_index: IndexMap::new(),
            next_actor_id: 1,
            rng: GameRng::default(),
            cascade_limit: DEFAULT_CASCADE_LIMIT,
        }
    }
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reseed the level's placement RNG
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = GameRng::new(seed);
    }

    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    pub fn cascade_limit(&self) -> usize {
        self.cascade_limit
    }

    pub fn set_cascade_limit(&mut self, limit: usize) {
        self.cascade_limit = limit;
    }

    // === Actors ===

    /// Add an actor and index its rule keys
    ///
    /// Keeps the actor's id when it is assigned, below `u64::MAX` and free in
    /// this level, otherwise gives it a fresh one. Returns the id the actor
    /// ends up with.
    pub fn add_actor(&mut self, mut actor: Actor) -> ActorId {
        let id = actor.id();
        if !id.is_assigned() || id.raw() == u64::MAX || self.actors.contains_key(&id) {
            actor.set_id(self.allocate_actor_id());
        } else if id.raw() >= self.next_actor_id {
            self.next_actor_id = id.raw() + 1;
        }

        let id = actor.id();
        self.index_actor(&actor);
        self.actors.insert(id, actor);
        id
    }

    /// Remove an actor and drop it from the trigger index
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.shift_remove(&id)?;
        for key in actor.rules().keys() {
            if let Some(ids) = self.trigger_index.get_mut(key) {
                ids.retain(|indexed| *indexed != id);
                if ids.is_empty() {
                    self.trigger_index.shift_remove(key);
                }
            }
        }
        Some(actor)
    }

    /// Give an owned actor a new rule, indexing its key
    pub fn add_actor_rule(
        &mut self,
        id: ActorId,
        trigger: Trigger,
        action: Action,
    ) -> Result<RuleId> {
        let actor = self.actors.get_mut(&id).ok_or(Error::ActorNotFound(id))?;
        let key = trigger.key();
        let rule = actor.add_rule(trigger, action);
        let ids = self.trigger_index.entry(key).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
        Ok(rule)
    }

    /// Edit an actor in place, then rebuild the whole trigger index
    ///
    /// This is the authoring path. The actor keeps its id whatever `edit` does.
    pub fn edit_actor<F>(&mut self, id: ActorId, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Actor),
    {
        let actor = self.actors.get_mut(&id).ok_or(Error::ActorNotFound(id))?;
        edit(actor);
        actor.set_id(id);
        self.rebuild_trigger_index();
        Ok(())
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Actors in insertion order
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn actor_ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.keys().copied()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Actors tagged as main playable actors
    pub fn main_actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors_with_state(ActorState::Main)
    }

    pub fn actors_with_state(&self, state: ActorState) -> impl Iterator<Item = &Actor> {
        self.actors.values().filter(move |actor| actor.has_state(state))
    }

    // === Level rules ===

    /// Add a rule owned by the level itself
    ///
    /// Level rules run after the indexed actors. Actions that need an owning
    /// actor are rejected here; one loaded from a file still fails at
    /// dispatch instead.
    pub fn add_rule(&mut self, trigger: Trigger, action: Action) -> Result<RuleId> {
        if !action.is_level_action() {
            return Err(Error::RuleRequiresActor {
                action: action.kind().to_string(),
            });
        }
        Ok(self.rules.add(Rule::new(trigger, action)))
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    // === Trigger index ===

    pub fn trigger_index(&self) -> &IndexMap<TriggerKey, Vec<ActorId>> {
        &self.trigger_index
    }

    /// Actors holding a rule under `key`, in insertion order
    pub fn actors_for(&self, key: &TriggerKey) -> &[ActorId] {
        self.trigger_index
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any actor or level rule listens for `key`
    pub fn listens_for(&self, key: &TriggerKey) -> bool {
        self.trigger_index.contains_key(key) || self.rules.contains_key(key)
    }

    /// Throw the index away and rebuild it from every actor's rules
    pub fn rebuild_trigger_index(&mut self) {
        self.trigger_index.clear();
        let actors = std::mem::take(&mut self.actors);
        for actor in actors.values() {
            self.index_actor(actor);
        }
        self.actors = actors;
    }

    fn index_actor(&mut self, actor: &Actor) {
        for key in actor.rules().keys() {
            let ids = self.trigger_index.entry(key.clone()).or_default();
            if !ids.contains(&actor.id()) {
                ids.push(actor.id());
            }
        }
    }

    /// Next free id; `u64::MAX` is never handed out and the counter wraps
    /// round to the lowest free id once it runs out
    fn allocate_actor_id(&mut self) -> ActorId {
        let mut raw = self.next_actor_id;
        while raw == 0 || raw == u64::MAX || self.actors.contains_key(&ActorId::new(raw)) {
            raw = raw.wrapping_add(1);
        }
        self.next_actor_id = raw + 1;
        ActorId::new(raw)
    }

    // === Dispatch ===

    /// Dispatch a live event to every actor indexed under its key
    pub fn handle_trigger(
        &mut self,
        event: &TriggerEvent,
        physics: &PhysicsEngine,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut queue = VecDeque::new();
        queue.push_back((event.clone(), 0usize));

        while let Some((event, depth)) = queue.pop_front() {
            if depth > self.cascade_limit {
                warn!(
                    level = %self.name,
                    key = %event.key(),
                    depth,
                    "attribute cascade too deep, dropping event"
                );
                continue;
            }

            let outcome = self.dispatch_once(&event, physics, &mut report);
            for change in &outcome.attribute_changes {
                let cascaded = TriggerEvent::AttributeChanged {
                    actor: change.actor,
                    attribute: change.attribute.clone(),
                    previous: change.previous,
                    value: change.value,
                };
                if self.listens_for(&cascaded.key()) {
                    queue.push_back((cascaded, depth + 1));
                }
            }
            self.apply_outcome(outcome, &mut report);
        }

        report
    }

    fn dispatch_once(
        &mut self,
        event: &TriggerEvent,
        physics: &PhysicsEngine,
        report: &mut DispatchReport,
    ) -> Outcome {
        let key = event.key();
        let mut outcome = Outcome::default();
        let partner = event
            .partner()
            .and_then(|partner| self.actors.get(&partner))
            .map(Actor::bounds);

        // Snapshot: the index must not change under the pass
        let candidates = self.actors_for(&key).to_vec();
        debug!(level = %self.name, %key, candidates = candidates.len(), "dispatching");

        for id in candidates {
            let Some(actor) = self.actors.get_mut(&id) else {
                continue;
            };
            let mut env = ActionEnv {
                physics,
                partner,
                rng: &mut self.rng,
                outcome: &mut outcome,
            };
            match actor.perform_actions_for(event, &mut env) {
                Ok(ran) => report.matched += ran,
                Err(error) => {
                    warn!(level = %self.name, actor = %id, %error, "action failed");
                    report.failures.push(DispatchFailure {
                        owner: Some(id),
                        error,
                    });
                }
            }
        }

        let level_actions: Vec<Action> = self
            .rules
            .rules_for(&key)
            .iter()
            .filter(|rule| event.evaluate(rule.trigger(), None))
            .map(|rule| rule.action().clone())
            .collect();
        for action in level_actions {
            let mut env = ActionEnv {
                physics,
                partner,
                rng: &mut self.rng,
                outcome: &mut outcome,
            };
            match action.perform(None, &mut env) {
                Ok(()) => report.matched += 1,
                Err(error) => {
                    warn!(level = %self.name, %error, "level action failed");
                    report.failures.push(DispatchFailure { owner: None, error });
                }
            }
        }

        outcome
    }

    fn apply_outcome(&mut self, outcome: Outcome, report: &mut DispatchReport) {
        for id in outcome.destroyed {
            if self.remove_actor(id).is_some() {
                debug!(level = %self.name, actor = %id, "destroyed actor");
                report.destroyed.push(id);
            }
        }
        for actor in outcome.spawned {
            let id = self.add_actor(actor);
            debug!(level = %self.name, actor = %id, "spawned actor");
            report.spawned.push(id);
        }
        report.signals.extend(outcome.signals);
        report.sounds.extend(outcome.sounds);
        report.attribute_changes.extend(outcome.attribute_changes);
    }
}

/// Serialized form of a level; the trigger index is derived on load
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct LevelRecord {
    name: String,
    width: f64,
    height: f64,
    background: String,
    scrolling: ScrollingDirection,
    termination: String,
    winning_condition: String,
    losing_condition: String,
    soundtrack: Option<String>,
    hud_options: Vec<String>,
    play_position: usize,
    rng: GameRng,
    actors: Vec<Actor>,
    rules: RuleBook,
}

impl Default for LevelRecord {
    fn default() -> Self {
        Level::default().into()
    }
}

impl From<LevelRecord> for Level {
    fn from(record: LevelRecord) -> Self {
        let mut level = Level {
            name: record.name,
            width: record.width,
            height: record.height,
            background: record.background,
            scrolling: record.scrolling,
            termination: record.termination,
            winning_condition: record.winning_condition,
            losing_condition: record.losing_condition,
            soundtrack: record.soundtrack,
            hud_options: record.hud_options,
            play_position: record.play_position,
            rng: record.rng,
            rules: record.rules,
            ..Level::default()
        };
        for actor in record.actors {
            level.add_actor(actor);
        }
        level
    }
}

impl From<Level> for LevelRecord {
    fn from(level: Level) -> Self {
        LevelRecord {
            name: level.name,
            width: level.width,
            height: level.height,
            background: level.background,
            scrolling: level.scrolling,
            termination: level.termination,
            winning_condition: level.winning_condition,
            losing_condition: level.losing_condition,
            soundtrack: level.soundtrack,
            hud_options: level.hud_options,
            play_position: level.play_position,
            rng: level.rng,
            actors: level.actors.into_values().collect(),
            rules: level.rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeType, CollisionSide, GameSignal, KeyCode, Placement};

    fn physics() -> PhysicsEngine {
        PhysicsEngine::default()
    }

    #[test]
    fn test_add_actor_indexes_every_key() {
        let mut level = Level::new("one");
        let actor = Actor::new("hero")
            .with_rule(Trigger::key_press(KeyCode::Right), Action::MoveRight)
            .with_rule(Trigger::key_press(KeyCode::Left), Action::MoveLeft)
            .with_rule(Trigger::tick(1), Action::ApplyPhysics);
        let keys: Vec<TriggerKey> = actor.rules().keys().cloned().collect();

        let id = level.add_actor(actor);

        for key in keys {
            assert!(level.actors_for(&key).contains(&id), "{} not indexed", key);
        }
    }

    #[test]
    fn test_add_actor_assigns_unique_ids() {
        let mut level = Level::new("one");
        let a = level.add_actor(Actor::new("a"));
        let b = level.add_actor(Actor::new("b"));

        let mut taken = Actor::new("c");
        taken.set_id(a);
        let c = level.add_actor(taken);

        let mut explicit = Actor::new("d");
        explicit.set_id(ActorId::new(40));
        let d = level.add_actor(explicit);
        let e = level.add_actor(Actor::new("e"));

        assert_eq!(a, ActorId::new(1));
        assert_eq!(b, ActorId::new(2));
        assert_eq!(c, ActorId::new(3));
        assert_eq!(d, ActorId::new(40));
        assert_eq!(e, ActorId::new(41));
        assert_eq!(level.actor_count(), 5);
    }

    #[test]
    fn test_ids_near_the_top_wrap_round() {
        let mut level = Level::new("one");
        let mut near_top = Actor::new("a");
        near_top.set_id(ActorId::new(u64::MAX - 1));
        let mut top = Actor::new("b");
        top.set_id(ActorId::new(u64::MAX));

        let a = level.add_actor(near_top);
        let b = level.add_actor(top);
        let c = level.add_actor(Actor::new("c"));

        assert_eq!(a, ActorId::new(u64::MAX - 1));
        assert_eq!(b, ActorId::new(1));
        assert_eq!(c, ActorId::new(2));
        assert_eq!(level.actor_count(), 3);
    }

    #[test]
    fn test_remove_actor_prunes_index() {
        let mut level = Level::new("one");
        let a = level.add_actor(Actor::new("a").with_rule(Trigger::tick(1), Action::MoveRight));
        let b = level.add_actor(
            Actor::new("b")
                .with_rule(Trigger::tick(1), Action::MoveLeft)
                .with_rule(Trigger::Click, Action::Destroy),
        );

        let removed = level.remove_actor(b).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(level.actors_for(&TriggerKey::Tick), &[a]);
        assert!(!level.trigger_index().contains_key(&TriggerKey::Click));
        assert!(level.remove_actor(b).is_none());
    }

    #[test]
    fn test_add_actor_rule_updates_index() {
        let mut level = Level::new("one");
        let id = level.add_actor(Actor::new("hero"));

        level
            .add_actor_rule(id, Trigger::key_press(KeyCode::Space), Action::MoveUp)
            .unwrap();
        assert_eq!(level.actors_for(&TriggerKey::Key(KeyCode::Space)), &[id]);

        let err = level
            .add_actor_rule(ActorId::new(99), Trigger::Click, Action::Destroy)
            .unwrap_err();
        assert_eq!(err, Error::ActorNotFound(ActorId::new(99)));
    }

    #[test]
    fn test_edit_actor_rebuilds_index() {
        let mut level = Level::new("one");
        let id = level.add_actor(Actor::new("hero").with_rule(Trigger::Click, Action::Destroy));

        level
            .edit_actor(id, |actor| {
                actor.clear_rules();
                actor.add_rule(Trigger::tick(2), Action::MoveRight);
                actor.set_id(ActorId::new(500));
            })
            .unwrap();

        assert!(!level.trigger_index().contains_key(&TriggerKey::Click));
        assert_eq!(level.actors_for(&TriggerKey::Tick), &[id]);
        assert_eq!(level.actor(id).map(Actor::id), Some(id));
    }

    #[test]
    fn test_dispatch_key_press_moves_actor() {
        let mut level = Level::new("one");
        let id = level.add_actor(
            Actor::new("hero").with_rule(Trigger::key_press(KeyCode::Right), Action::MoveRight),
        );

        let report = level.handle_trigger(
            &TriggerEvent::KeyPressed {
                key: KeyCode::Right,
            },
            &physics(),
        );

        assert_eq!(report.matched, 1);
        let hero = level.actor(id).unwrap();
        assert!(hero.velocity.x > 0.0);
        assert!(hero.position.x > 0.0);
    }

    #[test]
    fn test_dispatch_ignores_unindexed_events() {
        let mut level = Level::new("one");
        level.add_actor(
            Actor::new("hero").with_rule(Trigger::key_press(KeyCode::Right), Action::MoveRight),
        );

        let up = TriggerEvent::KeyPressed { key: KeyCode::Up };
        let report = level.handle_trigger(&up, &physics());
        assert_eq!(report, DispatchReport::default());
    }

    #[test]
    fn test_failure_is_isolated_per_actor() {
        let mut level = Level::new("one");
        let broken = level.add_actor(
            Actor::new("broken").with_rule(Trigger::tick(1), Action::HorizontalStaticCollision),
        );
        let healthy = level.add_actor(
            Actor::new("healthy").with_rule(Trigger::tick(1), Action::glide_right(4.0)),
        );

        let report = level.handle_trigger(&TriggerEvent::Tick { count: 1 }, &physics());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].owner, Some(broken));
        assert_eq!(level.actor(healthy).unwrap().position.x, 4.0);
    }

    #[test]
    fn test_destroy_is_deferred_until_after_pass() {
        let mut level = Level::new("one");
        let doomed = level.add_actor(
            Actor::new("doomed")
                .with_rule(Trigger::tick(1), Action::Destroy)
                .with_rule(Trigger::tick(1), Action::glide_right(1.0)),
        );
        let other = level.add_actor(
            Actor::new("other").with_rule(Trigger::tick(1), Action::glide_down(1.0)),
        );

        let report = level.handle_trigger(&TriggerEvent::Tick { count: 1 }, &physics());

        assert_eq!(report.matched, 3);
        assert_eq!(report.destroyed, vec![doomed]);
        assert!(level.actor(doomed).is_none());
        assert_eq!(level.actors_for(&TriggerKey::Tick), &[other]);
    }

    #[test]
    fn test_level_rule_spawns_actor() {
        let mut level = Level::new("flappy");
        level.set_seed(99);
        let pipe = Actor::new("pipe").with_rule(Trigger::tick(1), Action::glide_left(3.0));
        level
            .add_rule(
                Trigger::tick(75),
                Action::create_actor(pipe, Placement::Fixed { x: 1024.0, y: 200.0 }),
            )
            .unwrap();

        let quiet = level.handle_trigger(&TriggerEvent::Tick { count: 74 }, &physics());
        assert!(quiet.spawned.is_empty());

        let report = level.handle_trigger(&TriggerEvent::Tick { count: 75 }, &physics());
        assert_eq!(report.spawned.len(), 1);
        let id = report.spawned[0];
        let spawned = level.actor(id).unwrap();
        assert_eq!(spawned.position.x, 1024.0);
        assert_eq!(level.actors_for(&TriggerKey::Tick), &[id]);
    }

    #[test]
    fn test_level_rule_needing_actor_fails() {
        let mut level = Level::new("one");
        assert_eq!(
            level.add_rule(Trigger::tick(1), Action::MoveRight).unwrap_err(),
            Error::RuleRequiresActor {
                action: "MoveRight".to_string()
            }
        );
        assert!(level.rules().is_empty());

        let saved = r#"(name: "one", rules: [(trigger: Tick(interval: 1), action: MoveRight)])"#;
        let mut level: Level = ron::from_str(saved).unwrap();
        let report = level.handle_trigger(&TriggerEvent::Tick { count: 1 }, &physics());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].owner, None);
    }

    #[test]
    fn test_last_signal_wins() {
        let mut level = Level::new("one");
        level.add_actor(Actor::new("a").with_rule(Trigger::Click, Action::WinGame));
        level.add_actor(Actor::new("b").with_rule(Trigger::Click, Action::LoseGame));

        let report = level.handle_trigger(&TriggerEvent::Clicked { x: 10.0, y: 10.0 }, &physics());
        assert_eq!(report.signals, vec![GameSignal::WinGame, GameSignal::LoseGame]);
        assert_eq!(report.last_signal(), Some(GameSignal::LoseGame));
    }

    #[test]
    fn test_attribute_change_cascades() {
        let mut level = Level::new("one");
        let hero = level.add_actor(
            Actor::new("hero")
                .with_attribute(AttributeType::Health, 1)
                .with_rule(Trigger::Click, Action::change_attribute(AttributeType::Health, -1))
                .with_rule(Trigger::attribute_reached(AttributeType::Health, 0), Action::LoseGame),
        );

        let report = level.handle_trigger(&TriggerEvent::Clicked { x: 5.0, y: 5.0 }, &physics());

        assert_eq!(level.actor(hero).unwrap().attribute(&AttributeType::Health), Some(0));
        assert_eq!(report.signals, vec![GameSignal::LoseGame]);
        assert_eq!(report.attribute_changes.len(), 1);
    }

    #[test]
    fn test_attribute_cascade_is_bounded() {
        let mut level = Level::new("one");
        level.set_cascade_limit(3);
        let points = AttributeType::Points;
        // every change re-triggers itself: 0 -> 1 reaches 1, 1 -> 2 reaches 2, ...
        let mut actor = Actor::new("counter").with_attribute(points.clone(), 0);
        for threshold in 1..=10 {
            actor.add_rule(
                Trigger::attribute_reached(points.clone(), threshold),
                Action::change_attribute(points.clone(), 1),
            );
        }
        actor.add_rule(Trigger::Click, Action::change_attribute(points.clone(), 1));
        let id = level.add_actor(actor);

        let report = level.handle_trigger(&TriggerEvent::Clicked { x: 1.0, y: 1.0 }, &physics());

        // the click plus three cascaded rounds
        assert_eq!(level.actor(id).unwrap().attribute(&points), Some(4));
        assert_eq!(report.attribute_changes.len(), 4);
    }

    #[test]
    fn test_collision_action_uses_partner_bounds() {
        let mut level = Level::new("one");
        let wall = level.add_actor(
            Actor::new("wall")
                .with_position(100.0, 0.0)
                .with_extent(10.0, 400.0),
        );
        let mut ball = Actor::new("ball").with_position(60.0, 10.0);
        ball.velocity.x = 5.0;
        let ball = level.add_actor(ball);
        level
            .add_actor_rule(
                ball,
                Trigger::collision(CollisionSide::Side, wall),
                Action::HorizontalBounceCollision,
            )
            .unwrap();

        let report = level.handle_trigger(
            &TriggerEvent::Collision {
                side: CollisionSide::Side,
                actor: ball,
                partner: wall,
            },
            &physics(),
        );

        assert!(report.is_clean());
        let ball = level.actor(ball).unwrap();
        assert_eq!(ball.position.x, 50.0);
        assert_eq!(ball.velocity.x, -3.0);
    }

    #[test]
    fn test_ron_round_trip_rebuilds_index() {
        let mut level = Level::new("one");
        level.add_actor(
            Actor::new("hero")
                .with_rule(Trigger::key_press(KeyCode::Right), Action::MoveRight)
                .with_rule(Trigger::tick(1), Action::ApplyPhysics),
        );
        level.add_actor(Actor::new("rock").with_rule(Trigger::tick(3), Action::glide_down(1.0)));
        level
            .add_rule(Trigger::tick(10), Action::play_sound("drum.wav"))
            .unwrap();

        let text = ron::to_string(&level).unwrap();
        let mut restored: Level = ron::from_str(&text).unwrap();

        assert_eq!(restored.trigger_index(), level.trigger_index());
        assert_eq!(restored.rules(), level.rules());

        let tick = TriggerEvent::Tick { count: 30 };
        let expected = level.handle_trigger(&tick, &physics());
        let actual = restored.handle_trigger(&tick, &physics());
        assert_eq!(actual, expected);
        let positions: Vec<_> = level.actors().map(|a| a.position).collect();
        let restored_positions: Vec<_> = restored.actors().map(|a| a.position).collect();
        assert_eq!(restored_positions, positions);
    }
}
