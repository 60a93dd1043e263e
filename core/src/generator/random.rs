use super::*;

/// Uniformly random board, reproducible from its seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, deck: &TileDeck, rules: BingoRules) -> Result<Board> {
        use rand::prelude::*;

        deck.check_size()?;

        let pool = deck.pool();
        let needed = usize::from(POOL_TILES_NEEDED);
        let mut order: Vec<usize> = (0..pool.len()).collect();

        // partial Fisher-Yates, only the drawn prefix needs to be shuffled
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in 0..needed {
            let j = rng.random_range(i..order.len());
            order.swap(i, j);
        }

        let mut tiles: Vec<Tile> = order[..needed]
            .iter()
            .map(|&index| Tile::open(pool[index].clone()))
            .collect();
        let center_image = deck.reserved().and_then(|spec| spec.image.clone());
        let center_index = usize::from(CENTER.0) * usize::from(BOARD_SIZE) + usize::from(CENTER.1);
        tiles.insert(center_index, Tile::free(center_image, rules.center_is_fixed));

        log::debug!(
            "Generated board from {} tiles with seed {}",
            pool.len(),
            self.seed
        );
        Board::from_tiles(tiles)
    }
}
