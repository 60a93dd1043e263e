use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::*;

/// Per-visitor state, persisted as `{ created, lastGenerated, completed, preference, board }`.
///
/// The identifier is the storage key and is not part of the persisted value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(skip)]
    identifier: Option<Identifier>,
    pub created: NaiveDate,
    pub last_generated: NaiveDate,
    pub completed: bool,
    /// Regenerate automatically on a new day once the board is completed.
    pub preference: bool,
    pub board: Board,
}

/// Board after a toggle, with the recomputed completion flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub board: Board,
    pub completed: bool,
    pub outcome: MarkOutcome,
}

impl UserRecord {
    pub fn new(identifier: Identifier, board: Board, today: NaiveDate) -> Self {
        let completed = board.is_complete();
        Self {
            identifier: Some(identifier),
            created: today,
            last_generated: today,
            completed,
            preference: false,
            board,
        }
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// Attaches the storage key after the record was read back from a store.
    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Opted in, finished, and the board is from an earlier day.
    pub fn needs_daily_reset(&self, today: NaiveDate) -> bool {
        self.preference && self.completed && self.last_generated != today
    }

    pub fn replace_board(&mut self, board: Board, today: NaiveDate) {
        self.board = board;
        self.last_generated = today;
        self.refresh_completed();
    }

    /// Toggles one tile and recomputes completion from the whole board.
    pub fn toggle(&mut self, coords: Coord2) -> MarkOutcome {
        let outcome = self.board.toggle(coords);
        self.refresh_completed();
        outcome
    }

    pub fn refresh_completed(&mut self) {
        self.completed = self.board.is_complete();
    }

    pub fn state(&self) -> RecordState {
        if self.completed {
            RecordState::Completed
        } else if self.board.iter().any(|tile| tile.clicked && !tile.fixed) {
            RecordState::Active
        } else {
            RecordState::Fresh
        }
    }
}

/// Lifecycle of a record, `Completed` is not terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordState {
    Fresh,
    Active,
    Completed,
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fresh => "fresh",
            Self::Active => "in progress",
            Self::Completed => "complete",
        })
    }
}
