/// Single coordinate axis used for rows, columns and the board side.
pub type Coord = u8;

/// Count type used for tile counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Side length of every board.
pub const BOARD_SIZE: Coord = 5;

/// Position of the FREE tile.
pub const CENTER: Coord2 = (BOARD_SIZE / 2, BOARD_SIZE / 2);

/// Number of tiles drawn from the pool for one board, everything except the center.
pub const POOL_TILES_NEEDED: CellCount = mult(BOARD_SIZE, BOARD_SIZE) - 1;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Iterates every position of the board in row-major order.
pub fn iter_coords() -> impl Iterator<Item = Coord2> {
    (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_are_row_major() {
        let coords: Vec<_> = iter_coords().take(6).collect();
        assert_eq!(coords, [(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (1, 0)]);
        assert_eq!(iter_coords().count(), 25);
    }

    #[test]
    fn center_is_middle_cell() {
        assert_eq!(CENTER, (2, 2));
        assert_eq!(POOL_TILES_NEEDED, 24);
    }
}
