//! Game configuration

use serde::{Deserialize, Serialize};

use crate::{SetupError, MAX_PLAYERS, MIN_PLAYERS};

/// Parameters fixed for the lifetime of one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players in the game (2..=4)
    #[serde(default = "default_num_players")]
    pub num_players: u8,

    /// Player who opens the first round
    #[serde(default)]
    pub starting_player: u8,

    /// RNG seed for the tile bag. `None` draws a fresh seed, which the engine
    /// then records in its own copy of the config.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_num_players() -> u8 {
    2
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: default_num_players(),
            starting_player: 0,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(num_players: u8) -> Self {
        Self {
            num_players,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_starting_player(mut self, starting_player: u8) -> Self {
        self.starting_player = starting_player;
        self
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(SetupError::UnsupportedPlayerCount(self.num_players));
        }
        if self.starting_player >= self.num_players {
            return Err(SetupError::InvalidStartingPlayer {
                starting_player: self.starting_player,
                num_players: self.num_players,
            });
        }
        Ok(())
    }
}
