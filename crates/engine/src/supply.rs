//! Bag and discard (tile supply)

use rand::Rng;
use serde::Serialize;

use crate::{Color, TILES_PER_COLOR, TILE_COLORS};

/// Tile supply: counts of tiles in bag and discard.
///
/// Tiles carry no identity beyond their color, so both piles are kept as
/// per-color counts. Drawing picks uniformly among the remaining tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TileSupply {
    /// Count of tiles of each color in the bag
    pub(crate) bag: [u8; TILE_COLORS],
    /// Count of tiles of each color in the discard ("lid")
    pub(crate) discard: [u8; TILE_COLORS],
}

impl TileSupply {
    /// An empty supply (no tiles anywhere).
    pub fn new() -> Self {
        Self::default()
    }

    /// A full bag of 20 tiles per color and an empty discard.
    pub fn filled() -> Self {
        let mut supply = Self::new();
        supply.fill();
        supply
    }

    /// Put 20 tiles of each color into the bag and empty the discard.
    pub fn fill(&mut self) {
        self.bag = [TILES_PER_COLOR; TILE_COLORS];
        self.discard = [0; TILE_COLORS];
    }

    /// Draw up to `n` tiles. When the bag runs dry the discard is poured back
    /// into it; fewer than `n` tiles come back only if both are empty.
    pub fn draw(&mut self, n: usize, rng: &mut impl Rng) -> Vec<Color> {
        let mut drawn = Vec::with_capacity(n);
        while drawn.len() < n {
            match self.draw_tile(rng) {
                Some(color) => drawn.push(color),
                None => break,
            }
        }
        drawn
    }

    /// Return tiles to the discard pile.
    pub fn discard<I>(&mut self, tiles: I)
    where
        I: IntoIterator<Item = Color>,
    {
        for color in tiles {
            self.discard[color.index()] += 1;
        }
    }

    pub fn bag_len(&self) -> usize {
        self.bag.iter().map(|&c| c as usize).sum()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.iter().map(|&c| c as usize).sum()
    }

    pub fn len(&self) -> usize {
        self.bag_len() + self.discard_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bag_count(&self, color: Color) -> u8 {
        self.bag[color.index()]
    }

    pub fn discard_count(&self, color: Color) -> u8 {
        self.discard[color.index()]
    }

    /// Draw a single random tile from the bag (refilling from discard if needed)
    fn draw_tile(&mut self, rng: &mut impl Rng) -> Option<Color> {
        if self.bag_len() == 0 {
            if self.discard_len() == 0 {
                return None;
            }
            tracing::debug!(tiles = self.discard_len(), "refilling bag from discard");
            self.bag = self.discard;
            self.discard = [0; TILE_COLORS];
        }

        let mut pick = rng.random_range(0..self.bag_len());
        for (i, count) in self.bag.iter_mut().enumerate() {
            let count_usize = *count as usize;
            if pick < count_usize {
                *count -= 1;
                return Color::from_index(i as u8);
            }
            pick -= count_usize;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TOTAL_TILES;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fill_creates_hundred_tiles() {
        let supply = TileSupply::filled();
        assert_eq!(supply.bag_len(), TOTAL_TILES);
        assert_eq!(supply.discard_len(), 0);
        for color in crate::ALL_COLORS {
            assert_eq!(supply.bag_count(color), TILES_PER_COLOR);
        }
    }

    #[test]
    fn test_draw_removes_from_bag() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut supply = TileSupply::filled();

        let drawn = supply.draw(4, &mut rng);
        assert_eq!(drawn.len(), 4);
        assert_eq!(supply.bag_len(), TOTAL_TILES - 4);
    }

    #[test]
    fn test_draw_refills_from_discard() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut supply = TileSupply {
            bag: [1, 1, 0, 0, 0],
            discard: [0, 0, 3, 3, 0],
        };

        let drawn = supply.draw(5, &mut rng);
        assert_eq!(drawn.len(), 5);
        // The two bag tiles come out before the discard is touched.
        assert!(drawn[..2].contains(&Color::Blue));
        assert!(drawn[..2].contains(&Color::Yellow));
        assert!(drawn[2..]
            .iter()
            .all(|&c| c == Color::Red || c == Color::Black));
        assert_eq!(supply.discard_len(), 0);
        assert_eq!(supply.bag_len(), 3);
    }

    #[test]
    fn test_draw_degrades_when_exhausted() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut supply = TileSupply {
            bag: [1, 0, 0, 0, 0],
            discard: [0, 0, 0, 0, 1],
        };

        let drawn = supply.draw(4, &mut rng);
        assert_eq!(drawn, vec![Color::Blue, Color::White]);
        assert!(supply.is_empty());
        assert!(supply.draw(4, &mut rng).is_empty());
    }

    #[test]
    fn test_discard_bookkeeping() {
        let mut supply = TileSupply::new();
        supply.discard([Color::Red, Color::Red, Color::Blue]);
        assert_eq!(supply.discard_count(Color::Red), 2);
        assert_eq!(supply.discard_count(Color::Blue), 1);
        assert_eq!(supply.bag_len(), 0);
    }

    #[test]
    fn test_draw_is_deterministic_for_seed() {
        let mut a = TileSupply::filled();
        let mut b = TileSupply::filled();
        let drawn_a = a.draw(20, &mut StdRng::seed_from_u64(99));
        let drawn_b = b.draw(20, &mut StdRng::seed_from_u64(99));
        assert_eq!(drawn_a, drawn_b);
    }
}
