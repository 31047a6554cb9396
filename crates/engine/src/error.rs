use thiserror::Error;

use crate::{Color, DraftDestination, DraftSource, PlayerIdx};

/// Rejections raised while building a game. No engine exists afterwards.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum SetupError {
    #[error("unsupported player count {0} (expected 2, 3 or 4)")]
    UnsupportedPlayerCount(u8),
    #[error("starting player {starting_player} out of range for {num_players} players")]
    InvalidStartingPlayer { starting_player: u8, num_players: u8 },
}

/// Rejected drafting commands. The engine is left untouched, so the caller
/// can re-prompt and issue another command.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum CommandError {
    #[error("the game is over")]
    GameOver,
    #[error("no player with index {0}")]
    UnknownPlayer(PlayerIdx),
    #[error("player {player} tried to move but it is player {current}'s turn")]
    NotYourTurn {
        player: PlayerIdx,
        current: PlayerIdx,
    },
    #[error("no factory display with index {0}")]
    UnknownFactory(usize),
    #[error("{offer} holds no {color} tile")]
    ColorNotAvailable { offer: DraftSource, color: Color },
    #[error("{color} tiles cannot go to {dest}")]
    IllegalDestination {
        dest: DraftDestination,
        color: Color,
    },
}
