use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BingoError {
    #[error("No identity material available")]
    IdentityUnavailable,
    #[error("Not enough tiles, need {required} but only {available} available")]
    InsufficientTiles {
        required: CellCount,
        available: CellCount,
    },
    #[error("Invalid cell ({row}, {col})")]
    InvalidCell { row: i64, col: i64 },
    #[error("No record for this identifier")]
    RecordNotFound,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type Result<T> = core::result::Result<T, BingoError>;
