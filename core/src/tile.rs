use serde::{Deserialize, Serialize};

/// Text shown on the FREE tile.
pub const FREE_TEXT: &str = "FREE";

/// Pool entry a board tile is drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSpec {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl TileSpec {
    pub fn new(text: impl Into<String>, image: Option<String>) -> Self {
        Self {
            text: text.into(),
            image,
        }
    }

    /// The value that must be unique across a board, the image when there is one.
    pub fn identity(&self) -> &str {
        self.image.as_deref().unwrap_or(&self.text)
    }
}

/// One cell of a board as the player sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub clicked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fixed: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Tile {
    /// Fresh unmarked tile.
    pub fn open(spec: TileSpec) -> Self {
        Self {
            text: spec.text,
            image: spec.image,
            clicked: false,
            fixed: false,
        }
    }

    /// FREE tile, locked in the marked state when `fixed`.
    pub fn free(image: Option<String>, fixed: bool) -> Self {
        Self {
            text: FREE_TEXT.to_string(),
            image,
            clicked: fixed,
            fixed,
        }
    }

    /// Whether the tile counts towards completing a line.
    pub const fn is_satisfied(&self) -> bool {
        self.clicked || self.fixed
    }

    pub fn identity(&self) -> &str {
        self.image.as_deref().unwrap_or(&self.text)
    }
}
