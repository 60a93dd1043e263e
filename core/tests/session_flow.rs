use std::collections::BTreeSet;
use std::thread;

use bingo_core::*;
use chrono::NaiveDate;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, day).unwrap()
}

fn deck() -> TileDeck {
    let names: Vec<String> = (0..40)
        .map(|i| format!("costume_{i:02}.png"))
        .chain(["emlogo.png".to_string()])
        .collect();
    TileDeck::from_image_files(names, &DeckOptions::default())
}

fn identities(board: &Board) -> BTreeSet<String> {
    board
        .iter()
        .filter(|tile| !tile.fixed)
        .map(|tile| tile.identity().to_string())
        .collect()
}

#[test]
fn marking_every_open_tile_completes_on_the_last_toggle() {
    let resolver = IdentityResolver::new("test-salt", IdentityFallback::None);
    let id = resolver
        .resolve(&IdentityMaterial::from_token("booth-visitor-1"))
        .unwrap();
    let session = GameSession::new(
        MemoryStore::new(),
        deck(),
        BingoRules::default(),
        FixedClock(date(2)),
        9,
    );

    let record = session.get_or_create_board(&id).unwrap();
    assert!(!record.completed);
    assert_eq!(record.board[CENTER].image.as_deref(), Some("/images/emlogo.png"));

    let open: Vec<Coord2> = iter_coords().filter(|&pos| pos != CENTER).collect();
    assert_eq!(open.len(), 24);

    let mut tracker = WinTracker::new();
    tracker.load(&record.board);
    let mut seen_lines = LineSet::empty();

    for (i, &(row, col)) in open.iter().enumerate() {
        let outcome = session
            .toggle_cell(&id, i64::from(row), i64::from(col))
            .unwrap();
        let last = i == open.len() - 1;
        assert_eq!(outcome.completed, last, "toggle {i} at ({row}, {col})");

        let report = tracker.update(&outcome.board);
        assert!(report.newly_completed.intersection(seen_lines).is_empty());
        seen_lines |= report.newly_completed;
        assert_eq!(report.full_board, last);
    }

    assert_eq!(seen_lines, LineSet::all());
    assert!(session.get_or_create_board(&id).unwrap().completed);
}

#[test]
fn completed_board_resets_on_a_new_day_when_opted_in() {
    let store = MemoryStore::new();
    let id = Identifier::from_raw("daily");

    let yesterday = GameSession::new(&store, deck(), BingoRules::default(), FixedClock(date(2)), 1);
    yesterday.get_or_create_board(&id).unwrap();
    yesterday.set_preference(&id, true).unwrap();
    for (row, col) in iter_coords().filter(|&pos| pos != CENTER) {
        yesterday.toggle_cell(&id, row.into(), col.into()).unwrap();
    }
    let finished = store.get(&id).unwrap().unwrap();
    assert!(finished.completed);

    let same_day = GameSession::new(&store, deck(), BingoRules::default(), FixedClock(date(2)), 2);
    assert_eq!(same_day.get_or_create_board(&id).unwrap(), finished);

    let today = GameSession::new(&store, deck(), BingoRules::default(), FixedClock(date(3)), 3);
    let reset = today.get_or_create_board(&id).unwrap();
    assert!(!reset.completed);
    assert_eq!(reset.last_generated, date(3));
    assert_eq!(reset.created, date(2));
    assert!(reset.preference);
    assert_ne!(identities(&reset.board), identities(&finished.board));
    assert_eq!(store.get(&id).unwrap().unwrap(), reset);
}

#[test]
fn no_reset_without_preference_or_completion() {
    let store = MemoryStore::new();
    let id = Identifier::from_raw("steady");

    let day_one = GameSession::new(&store, deck(), BingoRules::default(), FixedClock(date(2)), 1);
    let created = day_one.get_or_create_board(&id).unwrap();
    day_one.set_preference(&id, true).unwrap();
    day_one.toggle_cell(&id, 0, 0).unwrap();

    let day_two = GameSession::new(&store, deck(), BingoRules::default(), FixedClock(date(3)), 2);
    let record = day_two.get_or_create_board(&id).unwrap();
    assert_eq!(record.last_generated, date(2));
    assert_eq!(identities(&record.board), identities(&created.board));
    assert!(record.board[(0, 0)].clicked);
}

#[test]
fn fixed_tile_never_changes_for_any_board() {
    for seed in 0..20 {
        let session = GameSession::new(
            MemoryStore::new(),
            deck(),
            BingoRules::default(),
            FixedClock(date(2)),
            seed,
        );
        let id = Identifier::from_raw(format!("visitor-{seed}"));
        let before = session.get_or_create_board(&id).unwrap();
        for _ in 0..3 {
            let outcome = session.toggle_cell(&id, 2, 2).unwrap();
            assert_eq!(outcome.board, before.board);
            assert_eq!(outcome.outcome, MarkOutcome::NoChange);
        }
    }
}

#[test]
fn completion_tracks_every_tile() {
    let session = GameSession::new(
        MemoryStore::new(),
        deck(),
        BingoRules::new(false),
        FixedClock(date(2)),
        5,
    );
    let id = Identifier::from_raw("center-toggles");
    session.get_or_create_board(&id).unwrap();

    let mut last = None;
    for (row, col) in iter_coords() {
        let outcome = session.toggle_cell(&id, row.into(), col.into()).unwrap();
        assert_eq!(outcome.completed, outcome.board.is_complete());
        last = Some(outcome);
    }
    assert!(last.unwrap().completed);

    let outcome = session.toggle_cell(&id, 2, 2).unwrap();
    assert!(!outcome.completed);
    assert!(!outcome.board[CENTER].clicked);
}

#[test]
fn visitors_are_independent_across_threads() {
    let session = GameSession::new(
        MemoryStore::new(),
        deck(),
        BingoRules::default(),
        FixedClock(date(2)),
        11,
    );

    thread::scope(|scope| {
        for visitor in 0..8 {
            let session = &session;
            scope.spawn(move || {
                let id = Identifier::from_raw(format!("visitor-{visitor}"));
                session.get_or_create_board(&id).unwrap();
                for col in 0..5 {
                    session.toggle_cell(&id, 0, col).unwrap();
                }
            });
        }
    });

    assert_eq!(session.store().len(), 8);
    for visitor in 0..8 {
        let record = session
            .get_or_create_board(&Identifier::from_raw(format!("visitor-{visitor}")))
            .unwrap();
        assert_eq!(satisfied_lines(&record.board), LineSet::ROW_0);
        assert!(!record.completed);
    }
}
