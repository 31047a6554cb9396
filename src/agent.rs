//! Agent API for action selection, plus a driver that plays a whole game
//! through the engine's public command contract.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use azul_engine::{Action, CommandError, GameEngine, PlayerIdx};

/// Trait for anything that can choose drafting actions: a random policy, a
/// scripted strategy, or human input.
pub trait Agent {
    /// Choose one of `legal` for the player whose turn it is.
    ///
    /// `legal` is never empty while the game is running. The returned action
    /// should come from `legal`; anything else is rejected by the engine and
    /// aborts `play_game`.
    fn select_action(&mut self, engine: &GameEngine, legal: &[Action], rng: &mut impl Rng)
        -> Action;
}

/// Random agent that uniformly samples from legal actions
#[derive(Clone, Debug, Default)]
pub struct RandomAgent;

impl RandomAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Agent for RandomAgent {
    fn select_action(
        &mut self,
        _engine: &GameEngine,
        legal: &[Action],
        rng: &mut impl Rng,
    ) -> Action {
        legal[rng.random_range(0..legal.len())]
    }
}

#[derive(Debug, Error)]
pub enum PlayError {
    #[error("{agents} agents supplied for a {players}-player game")]
    SeatMismatch { agents: usize, players: usize },
    #[error("player {player} has no legal action")]
    NoLegalAction { player: PlayerIdx },
    #[error("agent for player {player} chose an illegal action: {source}")]
    IllegalAction {
        player: PlayerIdx,
        #[source]
        source: CommandError,
    },
}

/// One accepted drafting command
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Move {
    pub player: PlayerIdx,
    pub action: Action,
}

/// Summary of a finished game
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GameRecord {
    pub seed: Option<u64>,
    pub moves: Vec<Move>,
    pub rounds: u32,
    pub final_scores: Vec<u16>,
    pub winners: Vec<PlayerIdx>,
}

/// Play `engine` to the end, asking `agents[p]` for every move of player `p`.
pub fn play_game<A: Agent>(
    engine: &mut GameEngine,
    agents: &mut [A],
    rng: &mut impl Rng,
) -> Result<GameRecord, PlayError> {
    if agents.len() != engine.num_players() {
        return Err(PlayError::SeatMismatch {
            agents: agents.len(),
            players: engine.num_players(),
        });
    }

    let mut moves = Vec::new();
    while !engine.is_game_over() {
        let player = engine.current_player();
        let legal = engine.legal_actions();
        if legal.is_empty() {
            return Err(PlayError::NoLegalAction { player });
        }

        let action = agents[player].select_action(engine, &legal, rng);
        engine
            .apply(player, action)
            .map_err(|source| PlayError::IllegalAction { player, source })?;
        moves.push(Move { player, action });
    }

    let final_scores = engine.final_scores().unwrap_or_default();
    let winners = engine.winners().unwrap_or_default();
    tracing::debug!(
        moves = moves.len(),
        rounds = engine.round(),
        ?final_scores,
        "game finished"
    );

    Ok(GameRecord {
        seed: engine.config().seed,
        moves,
        rounds: engine.round(),
        final_scores,
        winners,
    })
}
