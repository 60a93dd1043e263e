use serde::{Deserialize, Serialize};

pub use board::*;
pub use deck::*;
pub use error::*;
pub use generator::*;
pub use identity::*;
pub use lines::*;
pub use record::*;
pub use session::*;
pub use store::*;
pub use tile::*;
pub use types::*;

mod board;
mod deck;
mod error;
mod generator;
mod identity;
mod lines;
mod record;
mod session;
mod store;
mod tile;
mod types;

/// Game rules that differ between booth setups.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BingoRules {
    /// Whether the center FREE tile is pre-marked and locked, or an ordinary toggleable tile.
    pub center_is_fixed: bool,
}

impl BingoRules {
    pub const fn new(center_is_fixed: bool) -> Self {
        Self { center_is_fixed }
    }
}

impl Default for BingoRules {
    fn default() -> Self {
        Self::new(true)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}
