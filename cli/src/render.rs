use std::fmt::Write;

use bingo_core::{BOARD_SIZE, Board, Line, LineSet, Tile, mult};

const LABEL_WIDTH: usize = 14;

fn mark(tile: &Tile) -> &'static str {
    match (tile.fixed, tile.clicked) {
        (true, _) => "[*]",
        (false, true) => "[x]",
        (false, false) => "[ ]",
    }
}

fn label(tile: &Tile) -> String {
    let mut label: String = tile.text.chars().take(LABEL_WIDTH).collect();
    if tile.text.chars().count() > LABEL_WIDTH {
        label.pop();
        label.push('~');
    }
    label
}

/// Text grid of the board, one line per row.
pub fn board(board: &Board) -> String {
    let mut out = String::new();
    for row in board.to_rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|tile| format!("{} {:<width$}", mark(tile), label(tile), width = LABEL_WIDTH))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | ").trim_end());
    }
    let _ = writeln!(
        out,
        "{} of {} marked",
        board.marked_count(),
        mult(BOARD_SIZE, BOARD_SIZE)
    );
    out
}

pub fn line(line: Line) -> String {
    format!("{line} ({})", line.kind().banner())
}

pub fn lines(set: LineSet) -> Vec<String> {
    set.lines().map(line).collect()
}
