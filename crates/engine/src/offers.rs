//! Factory displays and the center pool

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Color, CommandError, TileSupply, ALL_COLORS, FACTORY_CAPACITY, TILE_COLORS};

/// Source of tiles for drafting
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DraftSource {
    Factory(usize), // index 0..num_factories-1
    Center,
}

impl fmt::Display for DraftSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftSource::Factory(i) => write!(f, "factory {i}"),
            DraftSource::Center => f.write_str("the center"),
        }
    }
}

/// Get the number of factory displays for a given player count
pub fn num_factories_for_players(num_players: u8) -> Option<usize> {
    match num_players {
        2 => Some(5),
        3 => Some(7),
        4 => Some(9),
        _ => None,
    }
}

/// A single factory display: empty, or exactly four tiles after a refill
/// unless the supply ran dry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Factory {
    pub(crate) tiles: Vec<Color>,
}

impl Factory {
    pub fn tiles(&self) -> &[Color] {
        &self.tiles
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Tiles removed from a factory display. `spillover` counts the tiles of
/// other colors that were pushed to the center.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactoryTake {
    pub taken: Vec<Color>,
    pub spillover: usize,
}

/// Tiles removed from the center. `first_player_token` is set when this take
/// claimed the token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CenterTake {
    pub taken: Vec<Color>,
    pub first_player_token: bool,
}

/// All factory displays plus the shared center pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OfferBoard {
    pub(crate) factories: Vec<Factory>,
    pub(crate) center: Vec<Color>,
    /// True while the first player token still sits in the center
    pub(crate) token_in_center: bool,
}

impl OfferBoard {
    /// `factory_count` empty displays, an empty center and the first player
    /// token available.
    pub fn setup(factory_count: usize) -> Self {
        OfferBoard {
            factories: vec![Factory::default(); factory_count],
            center: Vec::new(),
            token_in_center: true,
        }
    }

    /// Put the first player token back into the center for a new round.
    pub fn reset_token(&mut self) {
        self.token_in_center = true;
    }

    /// Refill every display with `FACTORY_CAPACITY` tiles from the supply.
    /// Displays stay short if the supply runs out.
    pub fn refill_all(&mut self, supply: &mut TileSupply, rng: &mut impl Rng) {
        for factory in &mut self.factories {
            debug_assert!(factory.tiles.is_empty(), "refilling a non-empty display");
            factory.tiles = supply.draw(FACTORY_CAPACITY, rng);
        }
    }

    /// Take every `color` tile from display `index`; the rest of the display
    /// moves to the center and the display is left empty.
    pub fn take_from_factory(
        &mut self,
        index: usize,
        color: Color,
    ) -> Result<FactoryTake, CommandError> {
        let factory = self
            .factories
            .get_mut(index)
            .ok_or(CommandError::UnknownFactory(index))?;
        if !factory.tiles.contains(&color) {
            return Err(CommandError::ColorNotAvailable {
                offer: DraftSource::Factory(index),
                color,
            });
        }

        let (taken, spillover): (Vec<Color>, Vec<Color>) = std::mem::take(&mut factory.tiles)
            .into_iter()
            .partition(|&c| c == color);
        let spill_count = spillover.len();
        self.center.extend(spillover);

        Ok(FactoryTake {
            taken,
            spillover: spill_count,
        })
    }

    /// Take every `color` tile from the center, along with the first player
    /// token if nobody has claimed it yet this round.
    pub fn take_from_center(&mut self, color: Color) -> Result<CenterTake, CommandError> {
        if !self.center.contains(&color) {
            return Err(CommandError::ColorNotAvailable {
                offer: DraftSource::Center,
                color,
            });
        }

        let (taken, remaining): (Vec<Color>, Vec<Color>) = std::mem::take(&mut self.center)
            .into_iter()
            .partition(|&c| c == color);
        self.center = remaining;

        let first_player_token = std::mem::replace(&mut self.token_in_center, false);
        Ok(CenterTake {
            taken,
            first_player_token,
        })
    }

    /// Distinct colors present at `source`, in `ALL_COLORS` order. Empty for
    /// an empty or unknown source.
    pub fn available_colors(&self, source: DraftSource) -> Vec<Color> {
        let tiles = match self.tiles_at(source) {
            Some(tiles) => tiles,
            None => return Vec::new(),
        };

        let mut seen = [false; TILE_COLORS];
        for &c in tiles {
            seen[c.index()] = true;
        }
        ALL_COLORS
            .into_iter()
            .filter(|c| seen[c.index()])
            .collect()
    }

    /// Number of `color` tiles at `source`.
    pub fn count(&self, source: DraftSource, color: Color) -> usize {
        self.tiles_at(source)
            .map_or(0, |tiles| tiles.iter().filter(|&&c| c == color).count())
    }

    /// True once every display and the center are empty: drafting is over.
    pub fn is_exhausted(&self) -> bool {
        self.center.is_empty() && self.factories.iter().all(Factory::is_empty)
    }

    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }

    pub fn center(&self) -> &[Color] {
        &self.center
    }

    pub fn token_in_center(&self) -> bool {
        self.token_in_center
    }

    /// Total tiles on all displays and in the center
    pub fn tile_count(&self) -> usize {
        self.center.len() + self.factories.iter().map(|f| f.tiles.len()).sum::<usize>()
    }

    fn tiles_at(&self, source: DraftSource) -> Option<&[Color]> {
        match source {
            DraftSource::Factory(i) => self.factories.get(i).map(|f| f.tiles.as_slice()),
            DraftSource::Center => Some(&self.center),
        }
    }
}
