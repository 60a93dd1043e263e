use core::ops::Index;
use ndarray::Array2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::*;

/// Square grid of tiles, serialized as a row-major array of rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tiles: Array2<Tile>,
}

impl Board {
    #[cfg(test)]
    pub(crate) fn from_fn(mut tile_at: impl FnMut(Coord2) -> Tile) -> Self {
        let side = usize::from(BOARD_SIZE);
        let tiles = Array2::from_shape_fn((side, side), |(row, col)| {
            tile_at((row as Coord, col as Coord))
        });
        Self { tiles }
    }

    /// Builds a board from tiles in row-major order.
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self> {
        let side = usize::from(BOARD_SIZE);
        let tiles =
            Array2::from_shape_vec((side, side), tiles).map_err(|_| BingoError::InvalidBoardShape)?;
        Ok(Self { tiles })
    }

    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self> {
        let side = usize::from(BOARD_SIZE);
        if rows.len() != side || rows.iter().any(|row| row.len() != side) {
            return Err(BingoError::InvalidBoardShape);
        }
        Self::from_tiles(rows.into_iter().flatten().collect())
    }

    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.tiles.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Checks raw client coordinates against the board bounds.
    pub fn validate_coords(row: i64, col: i64) -> Result<Coord2> {
        let side = i64::from(BOARD_SIZE);
        if (0..side).contains(&row) && (0..side).contains(&col) {
            Ok((row as Coord, col as Coord))
        } else {
            Err(BingoError::InvalidCell { row, col })
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> &Tile {
        &self.tiles[coords.to_nd_index()]
    }

    pub fn is_satisfied(&self, coords: Coord2) -> bool {
        self.tile_at(coords).is_satisfied()
    }

    /// Every tile is either marked or fixed.
    pub fn is_complete(&self) -> bool {
        self.tiles.iter().all(Tile::is_satisfied)
    }

    /// Flips the mark on a tile, fixed tiles are left untouched.
    pub fn toggle(&mut self, coords: Coord2) -> MarkOutcome {
        let tile = &mut self.tiles[coords.to_nd_index()];
        if tile.fixed {
            return MarkOutcome::NoChange;
        }
        tile.clicked = !tile.clicked;
        MarkOutcome::Changed
    }

    /// Tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn marked_count(&self) -> CellCount {
        self.tiles.iter().filter(|tile| tile.clicked).count() as CellCount
    }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        self.tile_at(coords)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.tiles.rows().into_iter().map(|row| row.to_vec()))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let rows = Vec::<Vec<Tile>>::deserialize(deserializer)?;
        Board::from_rows(rows).map_err(D::Error::custom)
    }
}
