use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::*;

/// Source of the calendar date used for record dates and daily resets.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Clock stuck on one date, used by tests and by transports that compute the date per request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Orchestrates record lifecycle and board mutations on top of a [`RecordStore`].
#[derive(Debug)]
pub struct GameSession<S, C> {
    store: S,
    deck: TileDeck,
    rules: BingoRules,
    clock: C,
    rng: Mutex<SmallRng>,
}

impl<S: RecordStore, C: Clock> GameSession<S, C> {
    pub fn new(store: S, deck: TileDeck, rules: BingoRules, clock: C, seed: u64) -> Self {
        Self {
            store,
            deck,
            rules,
            clock,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the record, creating it on first access and applying the opt-in daily reset.
    ///
    /// A due reset that cannot draw a new board leaves the stored record as it is.
    pub fn get_or_create_board(&self, identifier: &Identifier) -> Result<UserRecord> {
        let today = self.clock.today();

        let Some(mut record) = self.store.get(identifier)? else {
            let board = self.generate_board()?;
            let record = UserRecord::new(identifier.clone(), board, today);
            self.store.put(identifier, &record)?;
            log::info!("Created record for {identifier}");
            return Ok(record);
        };

        if record.needs_daily_reset(today) {
            match self.generate_board() {
                Ok(board) => {
                    record.replace_board(board, today);
                    self.store.put(identifier, &record)?;
                    log::info!("Daily reset for {identifier}");
                }
                Err(err) => log::warn!("Skipped daily reset for {identifier}: {err}"),
            }
        }

        Ok(record)
    }

    /// Flips one tile, fixed tiles are left as they are and nothing is written.
    pub fn toggle_cell(
        &self,
        identifier: &Identifier,
        row: i64,
        col: i64,
    ) -> Result<ToggleOutcome> {
        let coords = Board::validate_coords(row, col)?;
        let mut record = self.load(identifier)?;

        let outcome = record.toggle(coords);
        if outcome.has_update() {
            self.store.put(identifier, &record)?;
            log::debug!(
                "Toggled {coords:?} for {identifier}, completed: {}",
                record.completed
            );
        } else {
            log::debug!("Ignored toggle of fixed tile {coords:?} for {identifier}");
        }

        Ok(ToggleOutcome {
            board: record.board,
            completed: record.completed,
            outcome,
        })
    }

    /// Replaces the board unconditionally, any confirmation is up to the caller.
    pub fn regenerate_board(&self, identifier: &Identifier) -> Result<Board> {
        let mut record = self.load(identifier)?;
        let board = self.generate_board()?;
        record.replace_board(board, self.clock.today());
        self.store.put(identifier, &record)?;
        log::info!("Regenerated board for {identifier}");
        Ok(record.board)
    }

    pub fn set_preference(&self, identifier: &Identifier, value: bool) -> Result<bool> {
        let mut record = self.load(identifier)?;
        record.preference = value;
        self.store.put(identifier, &record)?;
        log::debug!("Set daily reset preference for {identifier} to {value}");
        Ok(record.preference)
    }

    fn load(&self, identifier: &Identifier) -> Result<UserRecord> {
        self.store
            .get(identifier)?
            .ok_or(BingoError::RecordNotFound)
    }

    fn generate_board(&self) -> Result<Board> {
        let seed = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_u64();
        RandomBoardGenerator::new(seed).generate(&self.deck, self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 5).unwrap()
    }

    fn deck(count: usize) -> TileDeck {
        TileDeck::new(
            (0..count).map(|i| {
                TileSpec::new(format!("tile {i}"), Some(format!("/images/{i}.png")))
            }),
            None,
        )
    }

    fn session(count: usize) -> GameSession<MemoryStore, FixedClock> {
        GameSession::new(
            MemoryStore::new(),
            deck(count),
            BingoRules::default(),
            FixedClock(today()),
            42,
        )
    }

    fn id() -> Identifier {
        Identifier::from_raw("visitor")
    }

    #[test]
    fn creates_record_on_first_access() {
        let session = session(30);
        let record = session.get_or_create_board(&id()).unwrap();

        assert!(!record.completed);
        assert!(!record.preference);
        assert_eq!(record.created, today());
        assert_eq!(record.last_generated, today());
        assert_eq!(session.store().len(), 1);

        let again = session.get_or_create_board(&id()).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn small_pool_creates_nothing() {
        let session = session(23);
        assert!(matches!(
            session.get_or_create_board(&id()),
            Err(BingoError::InsufficientTiles { .. })
        ));
        assert!(session.store().is_empty());
    }

    #[test]
    fn mutations_need_a_record() {
        let session = session(30);
        assert_eq!(
            session.toggle_cell(&id(), 0, 0),
            Err(BingoError::RecordNotFound)
        );
        assert_eq!(session.regenerate_board(&id()), Err(BingoError::RecordNotFound));
        assert_eq!(session.set_preference(&id(), true), Err(BingoError::RecordNotFound));
    }

    #[test]
    fn invalid_cell_is_checked_first() {
        let session = session(30);
        assert_eq!(
            session.toggle_cell(&id(), 5, 0),
            Err(BingoError::InvalidCell { row: 5, col: 0 })
        );
        assert_eq!(
            session.toggle_cell(&id(), -1, 2),
            Err(BingoError::InvalidCell { row: -1, col: 2 })
        );
    }

    #[test]
    fn toggle_is_self_inverse() {
        let session = session(30);
        let before = session.get_or_create_board(&id()).unwrap();

        let first = session.toggle_cell(&id(), 1, 3).unwrap();
        assert!(first.board[(1, 3)].clicked);
        assert_eq!(first.outcome, MarkOutcome::Changed);

        let second = session.toggle_cell(&id(), 1, 3).unwrap();
        assert_eq!(second.board, before.board);
        assert_eq!(session.get_or_create_board(&id()).unwrap(), before);
    }

    #[test]
    fn fixed_center_toggle_is_a_no_op() {
        let session = session(30);
        let before = session.get_or_create_board(&id()).unwrap();

        let outcome = session.toggle_cell(&id(), 2, 2).unwrap();
        assert_eq!(outcome.outcome, MarkOutcome::NoChange);
        assert_eq!(outcome.board, before.board);
        assert!(!outcome.completed);
    }

    #[test]
    fn toggleable_center_flips() {
        let session = GameSession::new(
            MemoryStore::new(),
            deck(30),
            BingoRules::new(false),
            FixedClock(today()),
            1,
        );
        session.get_or_create_board(&id()).unwrap();
        let outcome = session.toggle_cell(&id(), 2, 2).unwrap();
        assert_eq!(outcome.outcome, MarkOutcome::Changed);
        assert!(outcome.board[CENTER].clicked);
    }

    #[test]
    fn regenerate_replaces_board_and_keeps_preference() {
        let session = session(60);
        let before = session.get_or_create_board(&id()).unwrap();
        session.set_preference(&id(), true).unwrap();
        session.toggle_cell(&id(), 0, 0).unwrap();

        let board = session.regenerate_board(&id()).unwrap();
        assert_ne!(board, before.board);
        assert_eq!(board.marked_count(), 1);

        let record = session.get_or_create_board(&id()).unwrap();
        assert!(record.preference);
        assert!(!record.completed);
        assert_eq!(record.board, board);
    }

    #[test]
    fn small_pool_keeps_existing_record() {
        let store = MemoryStore::new();
        let first = GameSession::new(
            &store,
            deck(30),
            BingoRules::default(),
            FixedClock(today()),
            7,
        );
        first.get_or_create_board(&id()).unwrap();
        first.set_preference(&id(), true).unwrap();
        for (row, col) in iter_coords().filter(|&pos| pos != CENTER) {
            first.toggle_cell(&id(), row.into(), col.into()).unwrap();
        }
        let stored = store.get(&id()).unwrap().unwrap();
        assert!(stored.completed && stored.preference);

        let tomorrow = today().succ_opt().unwrap();
        let shrunk = GameSession::new(
            &store,
            deck(10),
            BingoRules::default(),
            FixedClock(tomorrow),
            8,
        );
        assert_eq!(
            shrunk.regenerate_board(&id()),
            Err(BingoError::InsufficientTiles {
                required: 24,
                available: 10
            })
        );
        assert_eq!(store.get(&id()).unwrap().unwrap(), stored);

        assert_eq!(shrunk.get_or_create_board(&id()).unwrap(), stored);
        assert_eq!(store.get(&id()).unwrap().unwrap(), stored);
    }

    #[test]
    fn set_preference_round_trips() {
        let session = session(30);
        session.get_or_create_board(&id()).unwrap();
        assert_eq!(session.set_preference(&id(), true), Ok(true));
        assert!(session.get_or_create_board(&id()).unwrap().preference);
        assert_eq!(session.set_preference(&id(), false), Ok(false));
        assert!(!session.get_or_create_board(&id()).unwrap().preference);
    }
}
