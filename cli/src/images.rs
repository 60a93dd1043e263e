use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use bingo_core::{DeckOptions, TileDeck};

/// Builds the deck from the files in `dir`. A missing directory gives an empty deck.
pub fn load_deck(dir: &Path, options: &DeckOptions) -> anyhow::Result<TileDeck> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::warn!("Image directory {} does not exist", dir.display());
            return Ok(TileDeck::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading {}", dir.display()));
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("reading {}", dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => log::warn!("Skipping non UTF-8 file name {name:?}"),
        }
    }
    log::debug!("Found {} files in {}", names.len(), dir.display());
    Ok(TileDeck::from_image_files(names, options))
}
