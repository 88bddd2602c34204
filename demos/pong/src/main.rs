//! Headless Pong
//!
//! Builds a court in code, runs it with scripted paddle input until the
//! ball has scored enough points, and optionally saves the finished game
//! as RON: `pong [save-path]`.

use stagehand_core::{
    Action, Actor, ActorId, ActorState, AttributeType, CollisionSide, Game, GameEvent,
    GameListener, KeyCode, Level, Trigger,
};
use tracing::{debug, info};

const WINNING_SCORE: i64 = 6;
const MAX_TICKS: u64 = 5_000;

/// Logs what the game reports
struct EventLog;

impl GameListener for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Sound(sound) => debug!(%sound, "sound"),
            GameEvent::StatusChanged(status) => info!(?status, "game status changed"),
            other => debug!(?other, "game event"),
        }
    }
}

fn wall(name: &str, x: f64) -> Actor {
    Actor::new(name)
        .with_position(x, -3000.0)
        .with_extent(10.0, 6000.0)
        .with_sprite("wall.png")
}

fn paddle(name: &str, x: f64, up: KeyCode, down: KeyCode) -> Actor {
    Actor::new(name)
        .with_position(x, 250.0)
        .with_extent(10.0, 80.0)
        .with_sprite("paddle.png")
        .with_state(ActorState::Main)
        .with_rule(Trigger::key_press(up), Action::glide_up(20.0))
        .with_rule(Trigger::key_press(down), Action::glide_down(20.0))
}

fn build_court() -> stagehand_core::Result<(Game, ActorId)> {
    let mut level = Level::new("court");
    level.width = 800.0;
    level.height = 600.0;
    level.background = "court.png".to_string();

    let left = level.add_actor(wall("left wall", 0.0));
    let right = level.add_actor(wall("right wall", 790.0));
    level.add_actor(paddle("left paddle", 30.0, KeyCode::Char('w'), KeyCode::Char('s')));
    level.add_actor(paddle("right paddle", 760.0, KeyCode::Up, KeyCode::Down));

    let ball = level.add_actor(
        Actor::new("ball")
            .with_position(400.0, 300.0)
            .with_extent(10.0, 10.0)
            .with_heading(170.0)
            .with_sprite("ball.png")
            .with_attribute(AttributeType::Points, 0)
            .with_rule(Trigger::tick(1), Action::glide_forward(5.0))
            .with_rule(
                Trigger::attribute_reached(AttributeType::Points, WINNING_SCORE),
                Action::WinGame,
            ),
    );
    for partner in [left, right] {
        let hit = Trigger::collision(CollisionSide::Side, partner);
        level.add_actor_rule(ball, hit.clone(), Action::ReverseHeading)?;
        level.add_actor_rule(ball, hit.clone(), Action::play_sound("pock.wav"))?;
        level.add_actor_rule(ball, hit, Action::change_attribute(AttributeType::Points, 1))?;
    }

    let mut game = Game::new("Pong");
    game.info.description = "One ball, two walls".to_string();
    game.add_level(level);
    game.add_listener(Box::new(EventLog));
    Ok((game, ball))
}

fn main() -> stagehand_script::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (mut game, ball) = build_court()?;
    let script = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Down, KeyCode::Char('s')];

    while !game.is_over() && game.tick_count() < MAX_TICKS {
        if game.tick_count() % 40 == 0 {
            let key = script[(game.tick_count() / 40) as usize % script.len()];
            game.key_pressed(key);
        }
        let report = game.tick();
        for failure in &report.failures {
            tracing::warn!(owner = ?failure.owner, error = %failure.error, "rule failed");
        }
        if !report.sounds.is_empty() {
            if let Some(ball) = game.current_level().and_then(|level| level.actor(ball)) {
                info!(
                    tick = game.tick_count(),
                    points = ball.attribute(&AttributeType::Points).unwrap_or(0),
                    heading = ball.heading(),
                    "bounce"
                );
            }
        }
    }

    info!(
        status = ?game.status(),
        ticks = game.tick_count(),
        "finished"
    );

    if let Some(path) = std::env::args().nth(1) {
        stagehand_script::save_game_file(&game, &path)?;
        info!(%path, "saved game");
    }
    Ok(())
}
