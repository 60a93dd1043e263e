use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self, deck: &TileDeck, rules: BingoRules) -> Result<Board>;
}
