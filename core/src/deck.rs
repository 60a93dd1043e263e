use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::*;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// How image file names are turned into tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOptions {
    /// URL prefix the images are served under.
    pub image_base: String,
    /// File stem of the image reserved for the center tile.
    pub reserved_stem: String,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            image_base: "/images".to_string(),
            reserved_stem: "emlogo".to_string(),
        }
    }
}

/// Pool of tiles boards are drawn from, plus the optional center image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDeck {
    pool: Vec<TileSpec>,
    reserved: Option<TileSpec>,
}

impl TileDeck {
    /// Builds a deck keeping the first entry for every identity.
    pub fn new(pool: impl IntoIterator<Item = TileSpec>, reserved: Option<TileSpec>) -> Self {
        let mut seen = BTreeSet::new();
        let pool = pool
            .into_iter()
            .filter(|spec| {
                let fresh = seen.insert(spec.identity().to_string());
                if !fresh {
                    log::warn!("Duplicate tile {:?} dropped from pool", spec.identity());
                }
                fresh
            })
            .collect();
        Self { pool, reserved }
    }

    /// Builds a deck from the file names of an image directory.
    pub fn from_image_files<I, S>(names: I, options: &DeckOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut images: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .filter(|name| is_image_file(name))
            .collect();
        images.sort();

        let mut reserved = None;
        let mut pool = Vec::with_capacity(images.len());
        for name in images {
            let spec = TileSpec::new(label_for(&name), Some(image_uri(&options.image_base, &name)));
            if reserved.is_none() && file_stem(&name).eq_ignore_ascii_case(&options.reserved_stem) {
                log::debug!("Reserved {name} for the center tile");
                reserved = Some(spec);
            } else if file_stem(&name).eq_ignore_ascii_case(&options.reserved_stem) {
                log::warn!("Ignoring extra reserved image {name}");
            } else {
                pool.push(spec);
            }
        }

        Self::new(pool, reserved)
    }

    pub fn pool(&self) -> &[TileSpec] {
        &self.pool
    }

    pub fn reserved(&self) -> Option<&TileSpec> {
        self.reserved.as_ref()
    }

    pub fn available(&self) -> CellCount {
        self.pool.len().try_into().unwrap_or(CellCount::MAX)
    }

    /// Fails when the pool cannot fill a board.
    pub fn check_size(&self) -> Result<()> {
        let available = self.available();
        if available < POOL_TILES_NEEDED {
            Err(BingoError::InsufficientTiles {
                required: POOL_TILES_NEEDED,
                available,
            })
        } else {
            Ok(())
        }
    }
}

fn is_image_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        _ => false,
    }
}

fn file_stem(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

fn label_for(name: &str) -> String {
    file_stem(name).replace(['-', '_'], " ")
}

fn image_uri(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), urlencoding::encode(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_labels_and_uris() {
        let deck = TileDeck::from_image_files(
            ["Darth_Vader.png", "spider-man costume.JPG", "notes.txt"],
            &DeckOptions::default(),
        );

        assert_eq!(
            deck.pool(),
            [
                TileSpec::new("Darth Vader", Some("/images/Darth_Vader.png".into())),
                TileSpec::new(
                    "spider man costume",
                    Some("/images/spider-man%20costume.JPG".into())
                ),
            ]
        );
        assert!(deck.reserved().is_none());
    }

    #[test]
    fn reserves_logo_outside_pool() {
        let deck = TileDeck::from_image_files(
            ["b.png", "EmLogo.webp", "a.gif"],
            &DeckOptions::default(),
        );

        assert_eq!(deck.available(), 2);
        assert_eq!(deck.pool()[0].text, "a");
        let reserved = deck.reserved().unwrap();
        assert_eq!(reserved.image.as_deref(), Some("/images/EmLogo.webp"));
    }

    #[test]
    fn drops_duplicate_identities() {
        let deck = TileDeck::new(
            [
                TileSpec::new("one", None),
                TileSpec::new("two", None),
                TileSpec::new("one", None),
            ],
            None,
        );
        assert_eq!(deck.available(), 2);
    }

    #[test]
    fn check_size_boundary() {
        let specs = |count: usize| (0..count).map(|i| TileSpec::new(format!("tile {i}"), None));

        assert_eq!(TileDeck::new(specs(24), None).check_size(), Ok(()));
        assert_eq!(
            TileDeck::new(specs(23), None).check_size(),
            Err(BingoError::InsufficientTiles {
                required: 24,
                available: 23
            })
        );
    }

    #[test]
    fn hidden_files_without_stem_are_skipped() {
        assert!(!is_image_file(".png"));
        assert!(!is_image_file("png"));
        assert!(is_image_file("x.PNG"));
    }
}
