//! RON content loader

use crate::error::{Error, Result};
use indexmap::IndexMap;
use stagehand_core::{EngineConfig, Game};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loaded games and engine configuration
#[derive(Debug, Default)]
pub struct Content {
    /// Games by name, in load order
    pub games: IndexMap<String, Game>,
    /// Engine configuration loaded from a config file, if any
    pub config: Option<EngineConfig>,
}

impl Content {
    /// Create empty content
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a loaded game
    pub fn game(&self, name: &str) -> Option<&Game> {
        self.games.get(name)
    }

    pub fn game_names(&self) -> impl Iterator<Item = &str> {
        self.games.keys().map(String::as_str)
    }

    /// Take a game out, applying the loaded engine configuration to it
    pub fn take_game(&mut self, name: &str) -> Option<Game> {
        let mut game = self.games.shift_remove(name)?;
        if let Some(config) = &self.config {
            game.set_config(config.clone());
        }
        Some(game)
    }
}

/// Loader for RON content files
pub struct Loader {
    content: Content,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            content: Content::new(),
        }
    }

    /// Load a single RON file
    ///
    /// Files whose name contains `config` are read as an engine
    /// configuration, everything else as a game.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if filename.contains("config") {
            self.load_config_file(path)?;
        } else {
            let content = fs::read_to_string(path)?;
            self.load_game_str(&content)?;
        }
        debug!(?path, "loaded content file");
        Ok(())
    }

    /// Load a game from a RON string, returning its name
    pub fn load_game_str(&mut self, content: &str) -> Result<String> {
        let game = parse_game(content)?;
        let name = game.info.name.clone();
        if self.content.games.contains_key(&name) {
            return Err(Error::DuplicateGame(name));
        }
        self.content.games.insert(name.clone(), game);
        Ok(name)
    }

    /// Load the engine configuration from a RON string
    pub fn load_config_str(&mut self, content: &str) -> Result<()> {
        let config: EngineConfig = ron::from_str(content)?;
        if self.content.config.is_some() {
            return Err(Error::InvalidContent(
                "engine configuration loaded twice".to_string(),
            ));
        }
        self.content.config = Some(config);
        Ok(())
    }

    /// Load the engine configuration from a RON file
    pub fn load_config_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.load_config_str(&content)
    }

    /// Load all RON files from a directory
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.extension().map(|e| e == "ron").unwrap_or(false) {
                self.load_file(&file_path)?;
            } else if file_path.is_dir() {
                self.load_directory(&file_path)?;
            }
        }

        Ok(())
    }

    /// Finish loading and return the content
    pub fn finish(self) -> Content {
        self.content
    }

    /// Get the current content (for inspection during loading)
    pub fn content(&self) -> &Content {
        &self.content
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse and check one game
///
/// A game needs a name and at least one level, and its level play
/// positions must form a valid order. Files that leave every position at
/// zero are played in file order.
pub fn parse_game(content: &str) -> Result<Game> {
    let mut game: Game = ron::from_str(content)?;

    if game.info.name.trim().is_empty() {
        return Err(Error::InvalidContent("game has no name".to_string()));
    }
    if game.levels().is_empty() {
        return Err(Error::InvalidContent(format!(
            "game {} has no levels",
            game.info.name
        )));
    }
    if game.current_level_index() >= game.levels().len() {
        return Err(Error::InvalidContent(format!(
            "current level {} is out of range",
            game.current_level_index()
        )));
    }

    let positions: Vec<usize> = game.levels().iter().map(|level| level.play_position).collect();
    let in_order = positions.iter().enumerate().all(|(i, p)| i == *p);
    if !in_order {
        if positions.iter().all(|p| *p == 0) {
            let file_order: Vec<usize> = (0..positions.len()).collect();
            game.reorder_levels(&file_order)?;
        } else {
            game.reorder_levels(&positions)?;
        }
    }

    Ok(game)
}

/// Serialize a game to pretty RON
pub fn save_game_string(game: &Game) -> Result<String> {
    Ok(ron::ser::to_string_pretty(game, ron::ser::PrettyConfig::new())?)
}

/// Write a game to a RON file
pub fn save_game_file(game: &Game, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, save_game_string(game)?)?;
    debug!(?path, game = %game.info.name, "saved game");
    Ok(())
}
