//! Stagehand Script - RON loading and saving for games
//!
//! Reads game content from RON files:
//! - Games with their levels, actors and rules
//! - Engine configuration (files named `*config*.ron`)

mod error;
mod loader;

pub use error::{Error, Result};
pub use loader::{parse_game, save_game_file, save_game_string, Content, Loader};
