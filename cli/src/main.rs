use std::path::PathBuf;

use anyhow::Context;
use bingo_core::*;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

mod images;
mod render;

#[derive(Parser)]
#[command(name = "bingo", version, about = "Play and inspect booth bingo boards")]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    /// Database file, defaults to db.json under $RENDER_DISK_PATH or the working directory
    #[arg(long, env = "BINGO_DB", global = true)]
    db: Option<PathBuf>,
    /// Directory holding the tile images
    #[arg(long, env = "BINGO_IMAGES_DIR", default_value = "images", global = true)]
    images: PathBuf,
    #[arg(
        long,
        env = "BINGO_SALT",
        default_value = DEV_SALT,
        hide_env_values = true,
        global = true
    )]
    salt: String,
    /// Visitor token the identifier is derived from
    #[arg(long, env = "BINGO_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,
    /// Let the center tile be toggled like any other
    #[arg(long, global = true)]
    center_toggleable: bool,
    /// Force a seed instead of random
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the tiles boards are drawn from
    Tiles,
    /// List identifiers with a stored record
    Visitors,
    #[command(flatten)]
    Play(PlayCommand),
}

/// Commands acting on the board of the visitor given by `--token`.
#[derive(Subcommand)]
enum PlayCommand {
    /// Show the board, creating it on first use
    Board,
    /// Mark or unmark a cell of an existing board
    Toggle { row: i64, col: i64 },
    /// Replace the board with a new one
    Regenerate,
    /// Opt in or out of a new board each day after completing one
    Preference {
        #[arg(value_parser = parse_switch, action = clap::ArgAction::Set)]
        value: bool,
    },
    /// List completed lines
    Lines,
}

fn parse_switch(raw: &str) -> std::result::Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(format!("expected on or off, got {raw:?}")),
    }
}

struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

fn default_db_path() -> PathBuf {
    std::env::var_os("RENDER_DISK_PATH")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join("db.json")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let deck = images::load_deck(&cli.images, &DeckOptions::default())?;
    let store = FileStore::new(cli.db.unwrap_or_else(default_db_path));
    log::debug!("Using database {}", store.path().display());

    let command = match cli.command {
        Command::Tiles => {
            print_tiles(&deck);
            return Ok(());
        }
        Command::Visitors => {
            for identifier in store.identifiers()? {
                println!("{identifier}");
            }
            return Ok(());
        }
        Command::Play(command) => command,
    };

    let resolver = IdentityResolver::new(cli.salt, IdentityFallback::None);
    let identifier = resolver
        .resolve(&IdentityMaterial {
            token: cli.token,
            ..IdentityMaterial::default()
        })
        .context("pass --token or set BINGO_TOKEN")?;

    let session = GameSession::new(
        store,
        deck,
        BingoRules::new(!cli.center_toggleable),
        LocalClock,
        cli.seed.unwrap_or_else(rand::random),
    );
    play(&session, &identifier, command)
}

fn print_tiles(deck: &TileDeck) {
    for spec in deck.pool() {
        println!("{}\t{}", spec.text, spec.identity());
    }
    match deck.reserved() {
        Some(spec) => println!("center: {}", spec.identity()),
        None => println!("center: {FREE_TEXT}"),
    }
    match deck.check_size() {
        Ok(()) => println!("{} tiles, enough for a board", deck.available()),
        Err(err) => println!("{err}"),
    }
}

fn play<S: RecordStore, C: Clock>(
    session: &GameSession<S, C>,
    identifier: &Identifier,
    command: PlayCommand,
) -> anyhow::Result<()> {
    match command {
        PlayCommand::Board => {
            let record = session.get_or_create_board(identifier)?;
            if let Some(identifier) = record.identifier() {
                println!("visitor {identifier}");
            }
            print!("{}", render::board(&record.board));
            println!("board {}", record.state());
        }
        PlayCommand::Toggle { row, col } => {
            let (outcome, report) = toggle(session, identifier, row, col)?;
            print!("{}", render::board(&outcome.board));
            for line in report.newly_completed.lines() {
                println!("{}", render::line(line));
            }
            if outcome.completed {
                println!("Board complete!");
            } else if !outcome.outcome.has_update() {
                println!("That tile cannot be changed");
            }
        }
        PlayCommand::Regenerate => {
            let board = session.regenerate_board(identifier)?;
            print!("{}", render::board(&board));
        }
        PlayCommand::Preference { value } => {
            let value = session.set_preference(identifier, value)?;
            println!("daily new board: {}", if value { "on" } else { "off" });
        }
        PlayCommand::Lines => {
            let record = session.get_or_create_board(identifier)?;
            let lines = render::lines(satisfied_lines(&record.board));
            if lines.is_empty() {
                println!("no complete lines");
            }
            for line in lines {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Toggles without creating the record, so the baseline lines come from a plain read.
fn toggle<S: RecordStore, C: Clock>(
    session: &GameSession<S, C>,
    identifier: &Identifier,
    row: i64,
    col: i64,
) -> Result<(ToggleOutcome, WinReport)> {
    let mut tracker = WinTracker::new();
    if let Some(record) = session.store().get(identifier)? {
        tracker.load(&record.board);
    }
    let outcome = session.toggle_cell(identifier, row, col)?;
    let report = tracker.update(&outcome.board);
    Ok((outcome, report))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn session() -> GameSession<MemoryStore, FixedClock> {
        let names: Vec<String> = (0..30).map(|i| format!("tile-{i}.png")).collect();
        GameSession::new(
            MemoryStore::new(),
            TileDeck::from_image_files(names, &DeckOptions::default()),
            BingoRules::default(),
            FixedClock(NaiveDate::from_ymd_opt(2024, 11, 2).unwrap()),
            3,
        )
    }

    #[test]
    fn toggle_needs_an_existing_board() {
        let session = session();
        let id = Identifier::from_raw("unseen");
        assert!(matches!(
            toggle(&session, &id, 0, 0),
            Err(BingoError::RecordNotFound)
        ));
        assert!(session.store().is_empty());
    }

    #[test]
    fn toggle_reports_new_lines_only() {
        let session = session();
        let id = Identifier::from_raw("visitor");
        session.get_or_create_board(&id).unwrap();
        for col in 0..4 {
            let (_, report) = toggle(&session, &id, 0, col).unwrap();
            assert!(report.newly_completed.is_empty());
        }
        let (outcome, report) = toggle(&session, &id, 0, 4).unwrap();
        assert_eq!(report.newly_completed, LineSet::ROW_0);
        assert!(!outcome.completed);

        let (_, report) = toggle(&session, &id, 1, 0).unwrap();
        assert!(report.newly_completed.is_empty());
        assert_eq!(report.satisfied, LineSet::ROW_0);
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from([
            "bingo",
            "--token",
            "abc",
            "--center-toggleable",
            "toggle",
            "1",
            "4",
        ])
        .unwrap();
        assert!(cli.center_toggleable);
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(matches!(
            cli.command,
            Command::Play(PlayCommand::Toggle { row: 1, col: 4 })
        ));

        let cli = Cli::try_parse_from(["bingo", "preference", "off"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Play(PlayCommand::Preference { value: false })
        ));
        assert!(Cli::try_parse_from(["bingo", "preference", "maybe"]).is_err());
    }

    #[test]
    fn command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
