//! Game engine: turn order, phases and the round lifecycle.
//!
//! `GameEngine` is the single owner of every board, the offers and the
//! supply. Commands either complete atomically or are rejected before any
//! state is touched. The Tiling and Preparing phases run inside the command
//! that empties the offers, so callers only ever observe `Drafting` or
//! `Ended` between commands.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::{
    num_factories_for_players, Color, CommandError, DraftDestination, DraftSource, GameConfig,
    GameEvent, OfferBoard, PlayerBoard, PlayerIdx, SetupError, TileSupply, BOARD_SIZE,
};

/// Game phase
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Drafting,  // Players take tiles from the offers
    Tiling,    // Wall transfers and floor penalties
    Preparing, // Choosing the next starter and refilling the offers
    Ended,     // Terminal; no more commands
}

/// A drafting command: take every `color` tile from `source` and send them
/// to `dest`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub source: DraftSource,
    pub color: Color,
    pub dest: DraftDestination,
}

/// What followed an accepted command
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TurnOutcome {
    /// Drafting continues with this player
    NextTurn(PlayerIdx),
    /// The offers ran out; the round was scored and a new one began
    RoundStarted {
        round: u32,
        starting_player: PlayerIdx,
    },
    /// The round was scored and the game is over
    GameEnded { final_scores: Vec<u16> },
}

/// Owned copy of the whole game, for presentation layers
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub round: u32,
    pub current_player: PlayerIdx,
    pub offers: OfferBoard,
    pub supply: TileSupply,
    pub boards: Vec<PlayerBoard>,
}

#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    players: Vec<PlayerBoard>,
    offers: OfferBoard,
    supply: TileSupply,
    current_player: PlayerIdx,
    phase: Phase,
    /// Rounds are numbered from 1
    round: u32,
    /// Holder of the first player token in the round being scored
    next_starting_player: Option<PlayerIdx>,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Build a game and deal the first round. Nothing is constructed when the
    /// configuration is rejected.
    ///
    /// A missing seed is drawn at random and recorded in the engine's config,
    /// so every game can be replayed.
    pub fn new(mut config: GameConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let factory_count = num_factories_for_players(config.num_players)
            .ok_or(SetupError::UnsupportedPlayerCount(config.num_players))?;
        let seed = *config.seed.get_or_insert_with(rand::random);

        let mut engine = GameEngine {
            players: vec![PlayerBoard::new(); config.num_players as usize],
            offers: OfferBoard::setup(factory_count),
            supply: TileSupply::filled(),
            current_player: config.starting_player as usize,
            phase: Phase::Drafting,
            round: 1,
            next_starting_player: None,
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
            config,
        };
        engine
            .offers
            .refill_all(&mut engine.supply, &mut engine.rng);

        tracing::info!(
            players = engine.players.len(),
            factories = factory_count,
            seed,
            "new game"
        );
        engine.events.push(GameEvent::RoundStarted {
            round: engine.round,
            starting_player: engine.current_player,
        });
        Ok(engine)
    }

    /// Start a game with `num_players` players, player 0 first and a random
    /// seed.
    pub fn new_game(num_players: u8) -> Result<Self, SetupError> {
        Self::new(GameConfig::new(num_players))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player(&self) -> PlayerIdx {
        self.current_player
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// Distinct colors at `source`, empty for an empty or unknown source.
    pub fn available_colors(&self, source: DraftSource) -> Vec<Color> {
        self.offers.available_colors(source)
    }

    pub fn board(&self, player: PlayerIdx) -> Option<&PlayerBoard> {
        self.players.get(player)
    }

    pub fn boards(&self) -> &[PlayerBoard] {
        &self.players
    }

    pub fn offers(&self) -> &OfferBoard {
        &self.offers
    }

    pub fn supply(&self) -> &TileSupply {
        &self.supply
    }

    /// Whether someone took the first player token this round
    pub fn first_player_token_claimed(&self) -> bool {
        !self.offers.token_in_center()
    }

    /// Current score of every player
    pub fn scores(&self) -> Vec<u16> {
        self.players.iter().map(PlayerBoard::score).collect()
    }

    /// Final scores, once the game has ended
    pub fn final_scores(&self) -> Option<Vec<u16>> {
        self.is_game_over().then(|| self.scores())
    }

    /// Every player sharing the highest final score
    pub fn winners(&self) -> Option<Vec<PlayerIdx>> {
        let scores = self.final_scores()?;
        let best = scores.iter().copied().max()?;
        Some(
            scores
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s == best)
                .map(|(p, _)| p)
                .collect(),
        )
    }

    /// Tiles across supply, offers and boards; always `TOTAL_TILES`.
    pub fn tile_count(&self) -> usize {
        self.supply.len()
            + self.offers.tile_count()
            + self.players.iter().map(PlayerBoard::tile_count).sum::<usize>()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            round: self.round,
            current_player: self.current_player,
            offers: self.offers.clone(),
            supply: self.supply.clone(),
            boards: self.players.clone(),
        }
    }

    /// Notifications accumulated since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enumerate all legal actions for the current player
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.phase != Phase::Drafting {
            return Vec::new();
        }

        let board = &self.players[self.current_player];
        let sources = (0..self.offers.factories().len())
            .map(DraftSource::Factory)
            .chain(std::iter::once(DraftSource::Center));

        let mut actions = Vec::new();
        for source in sources {
            for color in self.offers.available_colors(source) {
                let dests = (0..BOARD_SIZE as u8)
                    .map(DraftDestination::PatternLine)
                    .chain(std::iter::once(DraftDestination::Floor));
                for dest in dests {
                    if board.can_place(dest, color) {
                        actions.push(Action {
                            source,
                            color,
                            dest,
                        });
                    }
                }
            }
        }
        actions
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn take_from_factory(
        &mut self,
        player: PlayerIdx,
        factory: usize,
        color: Color,
        dest: DraftDestination,
    ) -> Result<TurnOutcome, CommandError> {
        self.apply(
            player,
            Action {
                source: DraftSource::Factory(factory),
                color,
                dest,
            },
        )
    }

    pub fn take_from_center(
        &mut self,
        player: PlayerIdx,
        color: Color,
        dest: DraftDestination,
    ) -> Result<TurnOutcome, CommandError> {
        self.apply(
            player,
            Action {
                source: DraftSource::Center,
                color,
                dest,
            },
        )
    }

    /// Apply a drafting command for `player`. If it empties the offers, the
    /// round is scored and either the next round is dealt or the game ends
    /// before this returns.
    #[tracing::instrument(level = "debug", skip(self), fields(round = self.round))]
    pub fn apply(
        &mut self,
        player: PlayerIdx,
        action: Action,
    ) -> Result<TurnOutcome, CommandError> {
        self.validate(player, &action)?;

        let taken = match action.source {
            DraftSource::Factory(f) => self.offers.take_from_factory(f, action.color)?.taken,
            DraftSource::Center => {
                let take = self.offers.take_from_center(action.color)?;
                if take.first_player_token {
                    self.players[player].grant_first_player_token();
                    self.events
                        .push(GameEvent::FirstPlayerTokenClaimed { player });
                }
                take.taken
            }
        };

        tracing::debug!(
            player,
            source = %action.source,
            color = %action.color,
            dest = %action.dest,
            tiles = taken.len(),
            "tiles drafted"
        );

        let board = &mut self.players[player];
        let overflow = board.place(action.dest, taken);
        board.add_to_floor(overflow);

        Ok(self.advance())
    }

    fn validate(&self, player: PlayerIdx, action: &Action) -> Result<(), CommandError> {
        if self.phase != Phase::Drafting {
            return Err(CommandError::GameOver);
        }
        let board = self
            .players
            .get(player)
            .ok_or(CommandError::UnknownPlayer(player))?;
        if player != self.current_player {
            return Err(CommandError::NotYourTurn {
                player,
                current: self.current_player,
            });
        }
        if let DraftSource::Factory(f) = action.source {
            if f >= self.offers.factories().len() {
                return Err(CommandError::UnknownFactory(f));
            }
        }
        if self.offers.count(action.source, action.color) == 0 {
            return Err(CommandError::ColorNotAvailable {
                offer: action.source,
                color: action.color,
            });
        }
        if !board.can_place(action.dest, action.color) {
            return Err(CommandError::IllegalDestination {
                dest: action.dest,
                color: action.color,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Round lifecycle
    // =========================================================================

    fn set_phase(&mut self, to: Phase) {
        let from = std::mem::replace(&mut self.phase, to);
        tracing::debug!(?from, ?to, round = self.round, "phase changed");
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    fn advance(&mut self) -> TurnOutcome {
        if !self.offers.is_exhausted() {
            self.current_player = (self.current_player + 1) % self.players.len();
            return TurnOutcome::NextTurn(self.current_player);
        }

        self.set_phase(Phase::Tiling);
        self.score_round();

        if self.players.iter().any(PlayerBoard::has_complete_row) {
            return self.end_game();
        }

        self.set_phase(Phase::Preparing);
        self.prepare_next_round()
    }

    /// Wall transfers then floor penalties, player by player.
    fn score_round(&mut self) {
        for (p, board) in self.players.iter_mut().enumerate() {
            let leftovers = board.resolve_wall_transfers();
            self.supply.discard(leftovers);

            let penalty = board.score_penalty_row();
            if penalty.held_token {
                self.next_starting_player = Some(p);
            }
            self.supply.discard(penalty.discarded);

            tracing::debug!(
                player = p,
                score = board.score(),
                points_lost = penalty.points_lost,
                "round scored"
            );
        }
    }

    fn prepare_next_round(&mut self) -> TurnOutcome {
        // Nobody drafted from the center: the same player keeps the lead.
        if let Some(p) = self.next_starting_player.take() {
            self.current_player = p;
        }

        self.offers.reset_token();
        self.offers.refill_all(&mut self.supply, &mut self.rng);

        if self.offers.is_exhausted() {
            tracing::warn!(round = self.round, "no tiles left to deal, ending game");
            return self.end_game();
        }

        self.round += 1;
        self.set_phase(Phase::Drafting);
        self.events.push(GameEvent::RoundStarted {
            round: self.round,
            starting_player: self.current_player,
        });
        tracing::info!(
            round = self.round,
            starting_player = self.current_player,
            "round started"
        );

        TurnOutcome::RoundStarted {
            round: self.round,
            starting_player: self.current_player,
        }
    }

    fn end_game(&mut self) -> TurnOutcome {
        for board in &mut self.players {
            board.apply_end_game_bonus();
        }
        self.set_phase(Phase::Ended);

        let final_scores = self.scores();
        tracing::info!(round = self.round, scores = ?final_scores, "game over");
        self.events.push(GameEvent::GameEnded {
            final_scores: final_scores.clone(),
        });
        TurnOutcome::GameEnded { final_scores }
    }
}
