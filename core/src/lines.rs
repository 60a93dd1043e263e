use core::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    /// Set of board lines, one bit per row, column and diagonal.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct LineSet: u16 {
        const ROW_0         = 1;
        const ROW_1         = 1 << 1;
        const ROW_2         = 1 << 2;
        const ROW_3         = 1 << 3;
        const ROW_4         = 1 << 4;
        const COLUMN_0      = 1 << 5;
        const COLUMN_1      = 1 << 6;
        const COLUMN_2      = 1 << 7;
        const COLUMN_3      = 1 << 8;
        const COLUMN_4      = 1 << 9;
        const DIAGONAL      = 1 << 10;
        const ANTI_DIAGONAL = 1 << 11;
    }
}

impl LineSet {
    pub fn lines(self) -> impl Iterator<Item = Line> {
        Line::all().filter(move |line| self.contains(line.bit()))
    }
}

impl FromIterator<Line> for LineSet {
    fn from_iter<T: IntoIterator<Item = Line>>(iter: T) -> Self {
        iter.into_iter()
            .fold(LineSet::empty(), |set, line| set | line.bit())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Line {
    Row(Coord),
    Column(Coord),
    /// Top-left to bottom-right.
    Diagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Horizontal,
    Vertical,
    Diagonal,
}

impl LineKind {
    pub const fn banner(self) -> &'static str {
        match self {
            Self::Horizontal => "Horizontal Bingo!",
            Self::Vertical => "Vertical Bingo!",
            Self::Diagonal => "Diagonal Bingo!",
        }
    }
}

impl Line {
    /// Every line of the board, rows first, then columns, then both diagonals.
    pub fn all() -> impl Iterator<Item = Line> {
        (0..BOARD_SIZE)
            .map(Line::Row)
            .chain((0..BOARD_SIZE).map(Line::Column))
            .chain([Line::Diagonal, Line::AntiDiagonal])
    }

    pub const fn kind(self) -> LineKind {
        match self {
            Self::Row(_) => LineKind::Horizontal,
            Self::Column(_) => LineKind::Vertical,
            Self::Diagonal | Self::AntiDiagonal => LineKind::Diagonal,
        }
    }

    pub fn bit(self) -> LineSet {
        let index = match self {
            Self::Row(row) => row,
            Self::Column(col) => BOARD_SIZE + col,
            Self::Diagonal => 2 * BOARD_SIZE,
            Self::AntiDiagonal => 2 * BOARD_SIZE + 1,
        };
        LineSet::from_bits_retain(1 << index)
    }

    pub fn cells(self) -> impl Iterator<Item = Coord2> {
        (0..BOARD_SIZE).map(move |i| match self {
            Self::Row(row) => (row, i),
            Self::Column(col) => (i, col),
            Self::Diagonal => (i, i),
            Self::AntiDiagonal => (i, BOARD_SIZE - 1 - i),
        })
    }

    pub fn is_satisfied(self, board: &Board) -> bool {
        self.cells().all(|coords| board.is_satisfied(coords))
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(row) => write!(f, "row {row}"),
            Self::Column(col) => write!(f, "column {col}"),
            Self::Diagonal => f.write_str("diagonal"),
            Self::AntiDiagonal => f.write_str("anti-diagonal"),
        }
    }
}

/// All lines whose tiles are all clicked or fixed, recomputed from scratch.
pub fn satisfied_lines(board: &Board) -> LineSet {
    Line::all().filter(|line| line.is_satisfied(board)).collect()
}

/// Result of checking a board against the previously satisfied lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinReport {
    pub newly_completed: LineSet,
    pub satisfied: LineSet,
    pub full_board: bool,
}

impl WinReport {
    pub fn any_line(&self) -> bool {
        !self.satisfied.is_empty()
    }

    pub fn newly_completed_lines(&self) -> Vec<Line> {
        self.newly_completed.lines().collect()
    }
}

/// Remembers which lines were satisfied on the last seen board.
///
/// Call [`WinTracker::load`] whenever a different board is shown (first load, fresh or
/// regenerated board) so lines from the previous board are never carried over.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WinTracker {
    satisfied: LineSet,
}

impl WinTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking a new board, its already complete lines are not reported as new.
    pub fn load(&mut self, board: &Board) -> LineSet {
        self.satisfied = satisfied_lines(board);
        log::debug!("Tracking board with {} complete lines", self.satisfied.bits().count_ones());
        self.satisfied
    }

    /// Checks an updated snapshot of the tracked board.
    pub fn update(&mut self, board: &Board) -> WinReport {
        let current = satisfied_lines(board);
        let newly_completed = current.difference(self.satisfied);
        self.satisfied = current;
        for line in newly_completed.lines() {
            log::debug!("Line complete: {line}");
        }
        WinReport {
            newly_completed,
            satisfied: current,
            full_board: board.is_complete(),
        }
    }
}
