//! JSON contracts between the bingo client and server.

use bingo_core::{BingoError, Board, UserRecord};
use serde::{Deserialize, Serialize};

/// Header carrying the client's opaque identity token.
pub const TOKEN_HEADER: &str = "x-bingo-token";

pub const BOARD_PATH: &str = "/api/board";
pub const CLICK_PATH: &str = "/api/click";
pub const NEW_BOARD_PATH: &str = "/api/newboard";
pub const PREFERENCE_PATH: &str = "/api/preference";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Board,
    Click,
    NewBoard,
    Preference,
}

impl Endpoint {
    /// Matches a request method and path against the API routes.
    pub fn route(method: &str, path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        match (method.to_ascii_uppercase().as_str(), path) {
            ("GET", BOARD_PATH) => Some(Self::Board),
            ("POST", CLICK_PATH) => Some(Self::Click),
            ("POST", NEW_BOARD_PATH) => Some(Self::NewBoard),
            ("POST", PREFERENCE_PATH) => Some(Self::Preference),
            _ => None,
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Board => BOARD_PATH,
            Self::Click => CLICK_PATH,
            Self::NewBoard => NEW_BOARD_PATH,
            Self::Preference => PREFERENCE_PATH,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardResponse {
    pub board: Board,
    pub meta: UserRecord,
}

impl From<UserRecord> for BoardResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            board: record.board.clone(),
            meta: record,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub row: i64,
    pub col: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub ok: bool,
    pub completed: bool,
    pub board: Board,
}

impl ToggleResponse {
    pub fn new(board: Board, completed: bool) -> Self {
        Self {
            ok: true,
            completed,
            board,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegenerateResponse {
    pub ok: bool,
    pub board: Board,
}

impl RegenerateResponse {
    pub fn new(board: Board) -> Self {
        Self { ok: true, board }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRequest {
    #[serde(default)]
    pub preference: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceResponse {
    pub ok: bool,
    pub preference: bool,
}

impl PreferenceResponse {
    pub fn new(preference: bool) -> Self {
        Self {
            ok: true,
            preference,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    IdentityUnavailable,
    InvalidCell,
    RecordNotFound,
    InsufficientTiles,
    StoreUnavailable,
    InvalidBoard,
    BadRequest,
    NotFound,
}

impl ErrorCode {
    /// HTTP status the error is reported with.
    pub const fn status(self) -> u16 {
        use ErrorCode::*;
        match self {
            IdentityUnavailable => 400,
            InvalidCell => 400,
            BadRequest => 400,
            RecordNotFound => 404,
            NotFound => 404,
            InvalidBoard => 500,
            InsufficientTiles => 503,
            StoreUnavailable => 503,
        }
    }
}

impl From<&BingoError> for ErrorCode {
    fn from(err: &BingoError) -> Self {
        match err {
            BingoError::IdentityUnavailable => Self::IdentityUnavailable,
            BingoError::InsufficientTiles { .. } => Self::InsufficientTiles,
            BingoError::InvalidCell { .. } => Self::InvalidCell,
            BingoError::RecordNotFound => Self::RecordNotFound,
            BingoError::InvalidBoardShape => Self::InvalidBoard,
            BingoError::StoreUnavailable(_) => Self::StoreUnavailable,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, "Not found")
    }

    pub fn status(&self) -> u16 {
        self.error.status()
    }
}

impl From<&BingoError> for ErrorResponse {
    fn from(err: &BingoError) -> Self {
        let message = match err {
            // internal details stay in the server log
            BingoError::StoreUnavailable(_) => "Storage temporarily unavailable".to_string(),
            BingoError::IdentityUnavailable => format!("Missing token header {TOKEN_HEADER}"),
            other => other.to_string(),
        };
        Self::new(err.into(), message)
    }
}

impl From<BingoError> for ErrorResponse {
    fn from(err: BingoError) -> Self {
        Self::from(&err)
    }
}
