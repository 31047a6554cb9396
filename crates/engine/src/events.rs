//! Notifications for presentation layers

use serde::Serialize;

use crate::{Phase, PlayerIdx};

/// Something a presentation layer may want to react to. Events are queued by
/// the engine and collected with `GameEngine::drain_events`; they never feed
/// back into engine state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    FirstPlayerTokenClaimed { player: PlayerIdx },
    RoundStarted { round: u32, starting_player: PlayerIdx },
    GameEnded { final_scores: Vec<u16> },
}
