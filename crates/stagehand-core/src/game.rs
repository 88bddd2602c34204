//! Game runtime
//!
//! Owns the ordered levels and drives the current one: raises tick events,
//! runs contact detection, forwards input events, and turns the signals
//! actions raise into level changes and win/lose status. Consumers hook in
//! through [`GameListener`], which is called synchronously.

use crate::{
    authoring, ActorId, ContactTracker, DispatchReport, EngineConfig, GameSignal, KeyCode, Level,
    PhysicsEngine, Result, TriggerEvent,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Whether the game is still being played
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

/// Descriptive data about a game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameInfo {
    pub name: String,
    pub description: String,
    /// Index of the level being played
    pub current_level: usize,
}

/// Notifications delivered to listeners
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ActorAdded { level: usize, actor: ActorId },
    ActorRemoved { level: usize, actor: ActorId },
    Signal(GameSignal),
    Sound(String),
    LevelChanged { from: usize, to: usize },
    StatusChanged(GameStatus),
}

/// Receives game events as they happen
pub trait GameListener {
    fn on_event(&mut self, event: &GameEvent);
}

/// A playable game
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct Game {
    pub info: GameInfo,
    levels: Vec<Level>,
    status: GameStatus,
    tick: u64,
    config: EngineConfig,
    #[serde(skip)]
    contacts: ContactTracker,
    #[serde(skip)]
    listeners: Vec<Box<dyn GameListener>>,
}

impl Default for Game {
    fn default() -> Self {
        Self::with_config("", EngineConfig::default())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("info", &self.info)
            .field("levels", &self.levels.len())
            .field("status", &self.status)
            .field("tick", &self.tick)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Game {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, EngineConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            info: GameInfo {
                name: name.into(),
                ..GameInfo::default()
            },
            levels: Vec::new(),
            status: GameStatus::Playing,
            tick: 0,
            config,
            contacts: ContactTracker::new(),
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the engine configuration, reseeding every level
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
        for (index, level) in self.levels.iter_mut().enumerate() {
            level.set_seed(self.config.rng_seed().wrapping_add(index as u64));
        }
    }

    // === Levels ===

    /// Append a level, seeding its RNG from the config and its index
    pub fn add_level(&mut self, mut level: Level) -> usize {
        let index = self.levels.len();
        level.set_seed(self.config.rng_seed().wrapping_add(index as u64));
        self.levels.push(level);
        index
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn level_mut(&mut self, index: usize) -> Option<&mut Level> {
        self.levels.get_mut(index)
    }

    /// Mutable access to every level, for the authoring path
    pub fn levels_mut(&mut self) -> &mut [Level] {
        &mut self.levels
    }

    pub fn current_level_index(&self) -> usize {
        self.info.current_level
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.get(self.info.current_level)
    }

    pub fn current_level_mut(&mut self) -> Option<&mut Level> {
        self.levels.get_mut(self.info.current_level)
    }

    /// Reorder levels by play position
    ///
    /// `positions[i]` is the new play position of the level currently at
    /// index `i`. Nothing changes unless the order is valid.
    pub fn reorder_levels(&mut self, positions: &[usize]) -> Result<()> {
        authoring::reorder_levels(&mut self.levels, positions)?;
        self.info.current_level = 0;
        self.contacts.reset();
        Ok(())
    }

    // === Status ===

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    /// Number of ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn add_listener(&mut self, listener: Box<dyn GameListener>) {
        self.listeners.push(listener);
    }

    // === Event sources ===

    /// Advance one tick: raise the tick event, then collision events
    ///
    /// Does nothing once the game is over. Collision detection is skipped
    /// when the tick moved the game to another level.
    pub fn tick(&mut self) -> DispatchReport {
        let mut report = DispatchReport::default();
        if self.is_over() {
            return report;
        }

        self.tick += 1;
        let level = self.info.current_level;
        report.merge(self.handle_trigger(&TriggerEvent::Tick { count: self.tick }));

        let still_here = !self.is_over() && self.info.current_level == level;
        let events = match self.levels.get(level) {
            Some(current) if still_here => self.contacts.detect(current),
            _ => Vec::new(),
        };
        for event in events {
            if self.is_over() || self.info.current_level != level {
                break;
            }
            report.merge(self.handle_trigger(&event));
        }
        report
    }

    pub fn key_pressed(&mut self, key: KeyCode) -> DispatchReport {
        self.handle_trigger(&TriggerEvent::KeyPressed { key })
    }

    pub fn clicked(&mut self, x: f64, y: f64) -> DispatchReport {
        self.handle_trigger(&TriggerEvent::Clicked { x, y })
    }

    /// Dispatch an event to the current level and apply its signals
    pub fn handle_trigger(&mut self, event: &TriggerEvent) -> DispatchReport {
        if self.is_over() {
            return DispatchReport::default();
        }
        let physics = PhysicsEngine::new(self.config.physics().clone());
        let limit = self.config.max_cascade_depth();
        let index = self.info.current_level;
        let Some(level) = self.levels.get_mut(index) else {
            warn!(level = index, "no level to dispatch to");
            return DispatchReport::default();
        };

        level.set_cascade_limit(limit);
        let report = level.handle_trigger(event, &physics);
        self.apply_report(index, &report);
        report
    }

    /// Notify listeners and play out the requested transitions in order
    ///
    /// When several transitions are requested the last one decides.
    fn apply_report(&mut self, level: usize, report: &DispatchReport) {
        for actor in &report.destroyed {
            self.notify(GameEvent::ActorRemoved {
                level,
                actor: *actor,
            });
        }
        for actor in &report.spawned {
            self.notify(GameEvent::ActorAdded {
                level,
                actor: *actor,
            });
        }
        for sound in &report.sounds {
            self.notify(GameEvent::Sound(sound.clone()));
        }
        for signal in &report.signals {
            self.notify(GameEvent::Signal(*signal));
            match signal {
                GameSignal::NextLevel => self.advance_level(),
                GameSignal::WinGame => self.set_status(GameStatus::Won),
                GameSignal::LoseGame => self.set_status(GameStatus::Lost),
            }
        }
    }

    fn advance_level(&mut self) {
        let from = self.info.current_level;
        let to = from + 1;
        if to >= self.levels.len() {
            debug!(level = from, "last level finished");
            self.set_status(GameStatus::Won);
            return;
        }

        self.info.current_level = to;
        self.contacts.reset();
        debug!(from, to, "level changed");
        self.notify(GameEvent::LevelChanged { from, to });
        self.set_status(GameStatus::Playing);
    }

    fn set_status(&mut self, status: GameStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        info!(game = %self.info.name, ?status, "game status changed");
        self.notify(GameEvent::StatusChanged(status));
    }

    fn notify(&mut self, event: GameEvent) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, Actor, CollisionSide, Trigger};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<GameEvent>>>);

    impl GameListener for Recorder {
        fn on_event(&mut self, event: &GameEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn recorded(game: &mut Game) -> Rc<RefCell<Vec<GameEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        game.add_listener(Box::new(Recorder(events.clone())));
        events
    }

    #[test]
    fn test_tick_counts_and_dispatches() {
        let mut game = Game::new("test");
        let mut level = Level::new("one");
        let cloud = level.add_actor(
            Actor::new("cloud").with_rule(Trigger::tick(2), Action::glide_right(1.0)),
        );
        game.add_level(level);

        for _ in 0..4 {
            game.tick();
        }

        assert_eq!(game.tick_count(), 4);
        assert_eq!(game.current_level().unwrap().actor(cloud).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_next_level_and_win_at_end() {
        let mut game = Game::new("test");
        for name in ["one", "two"] {
            let mut level = Level::new(name);
            level.add_actor(Actor::new("door").with_rule(Trigger::Click, Action::NextLevel));
            game.add_level(level);
        }
        let events = recorded(&mut game);

        game.clicked(1.0, 1.0);
        assert_eq!(game.current_level_index(), 1);
        assert_eq!(game.status(), GameStatus::Playing);

        game.clicked(1.0, 1.0);
        assert_eq!(game.status(), GameStatus::Won);
        assert!(events
            .borrow()
            .contains(&GameEvent::LevelChanged { from: 0, to: 1 }));
        assert!(events
            .borrow()
            .contains(&GameEvent::StatusChanged(GameStatus::Won)));
    }

    #[test]
    fn test_last_signal_decides_status() {
        let mut game = Game::new("test");
        let mut level = Level::new("one");
        level.add_actor(Actor::new("a").with_rule(Trigger::Click, Action::WinGame));
        level.add_actor(Actor::new("b").with_rule(Trigger::Click, Action::LoseGame));
        game.add_level(level);

        game.clicked(1.0, 1.0);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn test_game_over_stops_ticks() {
        let mut game = Game::new("test");
        let mut level = Level::new("one");
        level.add_rule(Trigger::tick(1), Action::LoseGame).unwrap();
        game.add_level(level);

        game.tick();
        assert!(game.is_over());
        let report = game.tick();
        assert_eq!(report, DispatchReport::default());
        assert_eq!(game.tick_count(), 1);
    }

    #[test]
    fn test_tick_raises_collisions_once() {
        let mut game = Game::new("pong");
        let mut level = Level::new("court");
        let wall = level.add_actor(
            Actor::new("wall")
                .with_position(100.0, 0.0)
                .with_extent(10.0, 400.0),
        );
        let ball = level.add_actor(
            Actor::new("ball")
                .with_position(70.0, 100.0)
                .with_extent(20.0, 20.0)
                .with_rule(Trigger::tick(1), Action::glide_forward(5.0)),
        );
        level
            .add_actor_rule(
                ball,
                Trigger::collision(CollisionSide::Side, wall),
                Action::play_sound("pock.wav"),
            )
            .unwrap();
        game.add_level(level);

        let mut sounds = 0;
        for _ in 0..6 {
            sounds += game.tick().sounds.len();
        }

        // the ball glides into the wall and stays there
        assert_eq!(sounds, 1);
    }

    #[test]
    fn test_listener_sees_spawn_and_sound() {
        let mut game = Game::new("test");
        let mut level = Level::new("one");
        let coin = Action::create_actor(
            Actor::new("coin"),
            crate::Placement::Fixed { x: 5.0, y: 5.0 },
        );
        level.add_rule(Trigger::tick(1), coin).unwrap();
        level
            .add_rule(Trigger::tick(1), Action::play_sound("spawn.wav"))
            .unwrap();
        game.add_level(level);
        let events = recorded(&mut game);

        let report = game.tick();

        let events = events.borrow();
        assert!(events.contains(&GameEvent::ActorAdded {
            level: 0,
            actor: report.spawned[0],
        }));
        assert!(events.contains(&GameEvent::Sound("spawn.wav".to_string())));
    }

    #[test]
    fn test_missing_level_is_harmless() {
        let mut game = Game::new("empty");
        let report = game.key_pressed(KeyCode::Space);
        assert_eq!(report, DispatchReport::default());
        assert!(game.current_level().is_none());
    }
}
